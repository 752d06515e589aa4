//! Brings up the whole runtime on a generated documentation page.

use crate::{
	chrome::{code_language, most_visible, permalink, share_url, Chrome},
	config::{LiveReload, SiteConfig},
	error::Result,
	mimic::Mimic,
	preview::Previews,
	settings::{Settings, Theme, STORAGE_KEY},
	tree::Root,
	viewer::{Viewer, ViewerConfig},
	web::{bind, doc_navi, expand_doc_groups, window, ApiTree, Bindings, WebHost},
};
use core::cell::RefCell;
use js_sys::{Array, Function, Reflect, JSON};
use std::rc::Rc;
use tracing::{debug, error, instrument, trace, warn};
use wasm_bindgen::{closure::Closure, prelude::wasm_bindgen, JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit, Response, Storage};

/// Band of the viewport in which a section counts as the one being read.
const READING_MARGIN: &str = "-40% 0px -60% 0px";

struct Site {
	_viewer: Viewer<WebHost>,
	_bindings: Bindings,
	_tree: Rc<ApiTree>,
	_reading: Closure<dyn FnMut(Array, IntersectionObserver)>,
	_live_reload: Option<Closure<dyn FnMut()>>,
}

thread_local! {
	static SITE: RefCell<Option<Site>> = RefCell::new(None);
}

/// Boots the runtime. `module_url` is the URL of the loading module, `root` the generated documentation tree.
///
/// # Errors
///
/// Iff the page can't be set up at all. Everything after that degrades by itself.
#[wasm_bindgen]
pub fn boot(module_url: &str, root: JsValue) -> core::result::Result<(), JsValue> {
	#[cfg(debug_assertions)]
	drop(tracing_wasm::try_set_as_global_default());

	start(module_url, &root).map_err(|error| {
		error!("Failed to boot: {}", error);
		JsValue::from_str(&error.to_string())
	})
}

#[instrument(skip(root))]
fn start(module_url: &str, root: &JsValue) -> Result<()> {
	let config = SiteConfig::from_module_url(module_url)?;
	let icons = config.icons();
	let storage = window().local_storage()?;
	themes(storage);

	let data = Root::from_json(&String::from(JSON::stringify(root)?))?;
	let tree = ApiTree::new(&data, &config.prefix, &icons);
	Mimic::select("main>nav").append(tree.root()).append(&doc_navi(&data.docs, &icons));

	let reading = Closure::wrap(Box::new(|entries: Array, _: IntersectionObserver| {
		let entries: Vec<(String, bool, f64)> = entries
			.iter()
			.map(|entry| {
				let entry: IntersectionObserverEntry = entry.unchecked_into();
				(entry.target().id(), entry.is_intersecting(), entry.intersection_ratio())
			})
			.collect();
		if let Some(id) = most_visible(entries.iter().map(|(id, intersecting, ratio)| (id.as_str(), *intersecting, *ratio))) {
			Mimic::select("#DocNavi .now").remove("now");
			Mimic::select(&format!("#DocNavi a[href$='#{}']", id)).add("now");
		}
	}) as Box<dyn FnMut(Array, IntersectionObserver)>);
	let init = IntersectionObserverInit::new();
	init.set_root_margin(READING_MARGIN);
	let navi = IntersectionObserver::new_with_options(reading.as_ref().unchecked_ref(), &init)?;

	let chrome = Chrome::new(config.prefix.clone());
	let paged = move || follow_page(&chrome, &navi);

	let host = WebHost::new(previews(&icons))?;
	let viewer = Viewer::new(host, ViewerConfig::new(paged));
	let bindings = bind(&viewer)?;
	debug!(listeners = bindings.len(), "Viewer bound.");

	let live_reload = match &config.live_reload {
		Some(reload) => Some(live_reload(reload)?),
		None => None,
	};

	SITE.with(|site| {
		*site.borrow_mut() = Some(Site { _viewer: viewer, _bindings: bindings, _tree: tree, _reading: reading, _live_reload: live_reload });
	});
	Ok(())
}

/// Applies the stored theme and lets `#light` and `#dark` switch it.
fn themes(storage: Option<Storage>) {
	let stored = storage.as_ref().and_then(|storage| storage.get_item(STORAGE_KEY).ok().flatten());
	let settings = Settings::parse(stored.as_deref());
	Mimic::select("html").reset(settings.theme.class());

	Mimic::select("#light,#dark").on("click", move |event| {
		let id = match event.current_target().and_then(|target| target.dyn_into::<Element>().ok()) {
			Some(button) => button.id(),
			None => return,
		};
		if let Some(theme) = Theme::from_class(&id) {
			Mimic::select("html").reset(theme.class());
			if let Some(storage) = &storage {
				if let Err(error) = storage.set_item(STORAGE_KEY, &Settings { theme }.to_json()) {
					warn!("Could not save settings: {:?}", error);
				}
			}
		}
	});
}

/// Brings the navigation up to date with the page that was just shown.
fn follow_page(chrome: &Chrome, navi: &IntersectionObserver) {
	let path = window().location().pathname().unwrap_or_default();
	let panels = chrome.panels(&path);
	Mimic::select("#APINavi").set_hidden(!panels.api);
	Mimic::select("#DocNavi").set_hidden(!panels.doc);

	expand_doc_groups(&path);

	navi.disconnect();
	for section in Mimic::select("#Article section").nodes() {
		navi.observe(section);
	}
}

fn previews(icons: &str) -> Previews<Element> {
	let copy_icon = format!("{}#copy", icons);
	Previews::new()
		.with("pre", move |pre| enhance_code(pre, &copy_icon))
		.with(".perp", |perp| {
			let perp = Mimic::from(perp.clone());
			perp.set_title("Copy the permanent link");
			perp.on("click", {
				let perp = perp.clone();
				move |_| {
					let location = window().location();
					let link = permalink(&location.origin().unwrap_or_default(), &location.pathname().unwrap_or_default(), &perp.closest("section").attr("id").unwrap_or_default());
					copy_text(&link);
				}
			});
		})
		.with(".tweet", |tweet| {
			let tweet = Mimic::from(tweet.clone());
			let location = window().location();
			let link = permalink(&location.origin().unwrap_or_default(), &location.pathname().unwrap_or_default(), &tweet.closest("section").attr("id").unwrap_or_default());
			let text = tweet.closest("header").first().text();
			match share_url(&link, &text) {
				Ok(href) => {
					tweet.set_href(&href);
				}
				Err(error) => warn!(%error, "Could not build share link."),
			}
			tweet.set_title("Post this article to Twitter").set_attr("target", "_blank").set_attr("rel", "noopener noreferrer");
		})
		.with(".edit", |edit| {
			Mimic::from(edit.clone()).set_title("Edit this article").set_attr("target", "_blank").set_attr("rel", "noopener noreferrer");
		})
}

/// Highlights a code block if a highlighter is loaded, labels its language and adds a copy button.
fn enhance_code(pre: &Element, copy_icon: &str) {
	if let Err(error) = highlight(pre) {
		warn!("Highlighting failed: {:?}", error);
	}
	if let Some(class) = pre.class_list().item(0) {
		drop(pre.set_attribute("lang", &code_language(&class)));
	}

	let block = Mimic::from(pre.clone());
	let code = Mimic::create("code");
	code.insert_before(&block);
	block.append_to(&code);

	let copy = block.make("a");
	copy.set_title("Copy this code").svg(copy_icon);
	copy.on("click", {
		let pre = pre.clone();
		move |_| copy_text(&pre.text_content().unwrap_or_default())
	});
}

/// Calls the page's `hljs.highlightElement`, if there is one.
fn highlight(pre: &Element) -> core::result::Result<(), JsValue> {
	let hljs = Reflect::get(&js_sys::global(), &JsValue::from_str("hljs"))?;
	if hljs.is_undefined() {
		trace!("No highlighter loaded.");
		return Ok(());
	}
	let highlight: Function = Reflect::get(&hljs, &JsValue::from_str("highlightElement"))?.dyn_into()?;
	highlight.call1(&hljs, pre)?;
	Ok(())
}

fn copy_text(text: &str) {
	let written = Reflect::get(&window(), &JsValue::from_str("navigator"))
		.and_then(|navigator| Reflect::get(&navigator, &JsValue::from_str("clipboard")))
		.and_then(|clipboard| {
			let write: Function = Reflect::get(&clipboard, &JsValue::from_str("writeText"))?.dyn_into()?;
			write.call1(&clipboard, &JsValue::from_str(text))
		});
	if let Err(error) = written {
		warn!("Could not copy to the clipboard: {:?}", error);
	}
}

/// Reloads the page once the development server reports a rebuild.
fn live_reload(reload: &LiveReload) -> Result<Closure<dyn FnMut()>> {
	let endpoint = reload.endpoint.clone();
	let poll = Closure::wrap(Box::new(move || {
		let request = JsFuture::from(window().fetch_with_str(&endpoint));
		spawn_local(async move {
			let response: Response = match request.await {
				Ok(response) => response.unchecked_into(),
				Err(error) => {
					trace!("Live reload server unreachable: {:?}", error);
					return;
				}
			};
			if response.status() == 200 {
				if let Err(error) = window().location().reload() {
					error!("Failed to reload: {:?}", error);
				}
			}
		});
	}) as Box<dyn FnMut()>);
	let interval = i32::try_from(reload.interval.as_millis()).unwrap_or(i32::MAX);
	window().set_interval_with_callback_and_timeout_and_arguments_0(poll.as_ref().unchecked_ref(), interval)?;
	Ok(poll)
}
