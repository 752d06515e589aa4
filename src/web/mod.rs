//! The browser side: [`WebHost`] implements [`Host`] with `web-sys`, and [`bind`] wires a [`Viewer`] to DOM events.

mod bind;
mod widgets;

pub use bind::{bind, Bindings};
pub use widgets::{doc_navi, expand_doc_groups, ApiTree, SelectView};

use crate::{
	error::{describe, Error, Result},
	host::{Host, Regions, ScrollBehavior},
	location::Location,
	mimic::Mimic,
	preview::{PreviewTarget, Previews},
};
use core::time::Duration;
use futures::future::LocalBoxFuture;
use js_sys::{Array, Function, Promise};
use std::rc::Rc;
use tracing::{error, trace, warn};
use wasm_bindgen::{closure::Closure, JsCast, JsValue, UnwrapThrowExt};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
	Document, DomParser, Element, HtmlAnchorElement, HtmlElement, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit, Response, ScrollToOptions, Storage,
	SupportedType, Window,
};

#[cfg(doc)]
use crate::viewer::Viewer;

/// Attribute marking content sections whose enhancements have run.
pub const PREVIEWED: &str = "data-previewed";

/// How far outside the viewport a section may still be when its enhancements start.
const PREVIEW_MARGIN: &str = "60px 0px";

/// Class of the content region while it fades out.
const LEAVING: &str = "fadeout";

impl PreviewTarget for Element {
	fn mark_initialized(&self) -> bool {
		if self.has_attribute(PREVIEWED) {
			return false;
		}
		if let Err(error) = self.set_attribute(PREVIEWED, "") {
			warn!("Could not mark section as previewed: {:?}", error);
		}
		true
	}

	fn select_all(&self, selector: &str) -> Vec<Self> {
		Mimic::from(self.clone()).find(selector).nodes().to_vec()
	}
}

/// The location an anchor points to.
#[must_use]
pub fn anchor_location(anchor: &HtmlAnchorElement) -> Location {
	Location {
		href: anchor.href(),
		origin: anchor.origin(),
		path: anchor.pathname(),
		hash: anchor.hash(),
	}
}

#[must_use]
pub fn window() -> Window {
	web_sys::window().expect_throw("docs-runtime: No window.")
}

pub struct WebHost {
	window: Window,
	document: Document,
	storage: Option<Storage>,
	observer: IntersectionObserver,
	_on_intersect: Closure<dyn FnMut(Array, IntersectionObserver)>,
}

impl WebHost {
	/// Creates a host for the current window that runs `previews` on content sections as they come into view.
	pub fn new(previews: Previews<Element>) -> Result<Self> {
		let window = window();
		let document = window.document().expect_throw("docs-runtime: No document.");
		let storage = match window.local_storage() {
			Ok(storage) => storage,
			Err(error) => {
				warn!("Local storage is unavailable, scroll positions won't be restored: {:?}", error);
				None
			}
		};

		let previews = Rc::new(previews);
		let on_intersect = Closure::wrap(Box::new(move |entries: Array, observer: IntersectionObserver| {
			for entry in entries.iter() {
				let entry: IntersectionObserverEntry = entry.unchecked_into();
				if entry.is_intersecting() {
					let target = entry.target();
					previews.activate(&target);
					observer.unobserve(&target);
				}
			}
		}) as Box<dyn FnMut(Array, IntersectionObserver)>);

		let init = IntersectionObserverInit::new();
		init.set_root_margin(PREVIEW_MARGIN);
		let observer = IntersectionObserver::new_with_options(on_intersect.as_ref().unchecked_ref(), &init)?;

		Ok(Self { window, document, storage, observer, _on_intersect: on_intersect })
	}

	#[must_use]
	pub fn window(&self) -> &Window {
		&self.window
	}

	#[must_use]
	pub fn document(&self) -> &Document {
		&self.document
	}

	#[must_use]
	pub fn storage(&self) -> Option<&Storage> {
		self.storage.as_ref()
	}
}

impl Drop for WebHost {
	fn drop(&mut self) {
		self.observer.disconnect();
	}
}

impl Host for WebHost {
	fn location(&self) -> Location {
		let location = self.window.location();
		let part = |value: core::result::Result<String, JsValue>| value.unwrap_or_default();
		Location {
			href: part(location.href()),
			origin: part(location.origin()),
			path: part(location.pathname()),
			hash: part(location.hash()),
		}
	}

	fn push_state(&self, href: &str) {
		let pushed = self.window.history().and_then(|history| history.push_state_with_url(&JsValue::NULL, "", Some(href)));
		if let Err(error) = pushed {
			error!("Failed to push history state for {:?}: {:?}", href, error);
		}
	}

	fn document_html(&self) -> String {
		self.document.document_element().map(|root| root.outer_html()).unwrap_or_default()
	}

	fn fetch(&self, path: &str) -> LocalBoxFuture<'static, Result<String>> {
		let request = JsFuture::from(self.window.fetch_with_str(path));
		let path = path.to_owned();
		Box::pin(async move {
			let response: Response = match request.await {
				Ok(response) => response.unchecked_into(),
				Err(error) => return Err(Error::Fetch { path, reason: describe(&error) }),
			};
			if !response.ok() {
				return Err(Error::Status { path, status: response.status() });
			}
			let text = JsFuture::from(response.text()?).await?;
			Ok(text.as_string().unwrap_or_default())
		})
	}

	fn sleep(&self, delay: Duration) -> LocalBoxFuture<'static, ()> {
		let timeout = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
		let window = self.window.clone();
		let promise = Promise::new(&mut |resolve: Function, _reject| {
			if let Err(error) = window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, timeout) {
				error!("Failed to set timeout, continuing right away: {:?}", error);
				drop(resolve.call0(&JsValue::UNDEFINED));
			}
		});
		Box::pin(async move {
			drop(JsFuture::from(promise).await);
		})
	}

	fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
		wasm_bindgen_futures::spawn_local(task);
	}

	fn scroll_y(&self) -> f64 {
		self.window.scroll_y().unwrap_or(0.)
	}

	fn scroll_to(&self, top: f64, behavior: ScrollBehavior) {
		let options = ScrollToOptions::new();
		options.set_top(top);
		options.set_left(0.);
		options.set_behavior(match behavior {
			ScrollBehavior::Instant => web_sys::ScrollBehavior::Instant,
			ScrollBehavior::Smooth => web_sys::ScrollBehavior::Smooth,
		});
		self.window.scroll_to_with_scroll_to_options(&options);
	}

	fn element_top(&self, id: &str) -> Option<f64> {
		let element = self.document.get_element_by_id(id)?;
		Some(f64::from(element.dyn_ref::<HtmlElement>()?.offset_top()))
	}

	fn load_offset(&self, path: &str) -> Option<f64> {
		let stored = self.storage.as_ref()?.get_item(path).ok().flatten()?;
		stored.parse().ok()
	}

	fn save_offset(&self, path: &str, offset: f64) {
		if let Some(storage) = &self.storage {
			if let Err(error) = storage.set_item(path, &offset.to_string()) {
				trace!("Could not save scroll offset: {:?}", error);
			}
		}
	}

	fn set_leaving(&self, selector: &str, leaving: bool) {
		Mimic::select(selector).set(&[(LEAVING, leaving)]);
	}

	fn swap_regions(&self, html: &str, regions: &Regions) -> Result<()> {
		let fetched = DomParser::new()?.parse_from_string(html, SupportedType::TextHtml)?;

		// All regions are resolved before any is replaced.
		let mut swaps = Vec::with_capacity(2);
		for selector in regions.iter() {
			let missing = || Error::MissingRegion(selector.to_owned());
			let source = fetched.query_selector(selector)?.ok_or_else(missing)?;
			let target = self.document.query_selector(selector)?.ok_or_else(missing)?;
			swaps.push((target, source.inner_html()));
		}
		for (target, html) in swaps {
			target.set_inner_html(&html);
		}
		Ok(())
	}

	fn observe_previews(&self, selector: &str) {
		self.observer.disconnect();
		for section in Mimic::select(selector).nodes() {
			if !section.has_attribute(PREVIEWED) {
				self.observer.observe(section);
			}
		}
	}
}
