#![cfg(target_arch = "wasm32")]

use core::{cell::Cell, time::Duration};
use docs_runtime::{
	mimic::{document, Mimic},
	preview::Previews,
	select::Selection,
	tree::Root,
	web::{doc_navi, expand_doc_groups, SelectView, WebHost, PREVIEWED},
	Error, Host, Regions,
};
use std::{rc::Rc, sync::Once};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::HtmlElement;

wasm_bindgen_test_configure!(run_in_browser);

static LOG: Once = Once::new();

fn page(content: &str) {
	LOG.call_once(tracing_wasm::set_as_global_default);
	document().body().unwrap().set_inner_html(content);
}

#[wasm_bindgen_test]
fn swaps_both_regions() {
	page("<main><article>old</article><aside>old toc</aside></main>");
	let host = WebHost::new(Previews::new()).unwrap();
	host.swap_regions("<html><body><article><h1>new</h1></article><aside>new toc</aside></body></html>", &Regions::default()).unwrap();
	assert_eq!(Mimic::select("article").html(), "<h1>new</h1>");
	assert_eq!(Mimic::select("aside").text(), "new toc");
}

#[wasm_bindgen_test]
fn missing_region_changes_nothing() {
	page("<main><article>old</article><aside>old toc</aside></main>");
	let host = WebHost::new(Previews::new()).unwrap();
	let swapped = host.swap_regions("<html><body><article>new</article></body></html>", &Regions::default());
	assert!(matches!(swapped, Err(Error::MissingRegion(region)) if region == "aside"));
	assert_eq!(Mimic::select("article").text(), "old");
}

#[wasm_bindgen_test]
fn leaving_class_is_toggled() {
	page("<article>content</article>");
	let host = WebHost::new(Previews::new()).unwrap();
	host.set_leaving("article", true);
	assert!(Mimic::select("article").has("fadeout"));
	host.set_leaving("article", false);
	assert!(!Mimic::select("article").has("fadeout"));
}

#[wasm_bindgen_test]
fn offsets_are_stored_per_path() {
	let host = WebHost::new(Previews::new()).unwrap();
	host.save_offset("/web-host-test.html", 123.5);
	assert_eq!(host.load_offset("/web-host-test.html"), Some(123.5));
	assert_eq!(host.load_offset("/never-visited.html"), None);
}

#[wasm_bindgen_test]
fn select_view_follows_clicks() {
	page("");
	let view = SelectView::new(Selection::new(vec!["alpha".to_owned(), "beta".to_owned()], "Pick one"), "/main.svg");
	Mimic::select("body").append(view.root());
	assert_eq!(view.root().find("now").text(), "Pick one");

	let click = |selector: &str| view.root().find(selector).node().unwrap().dyn_ref::<HtmlElement>().unwrap().click();
	click("li[data-index='1']");
	assert_eq!(view.selection().selected().collect::<Vec<_>>(), vec!["beta"]);
	assert_eq!(view.root().find("now").text(), "beta");
	assert!(view.root().find(".x").has("active"));

	click(".x");
	assert!(view.selection().is_empty());
	assert_eq!(view.root().find("now").text(), "Pick one");
}

#[wasm_bindgen_test]
fn only_the_current_doc_group_unfolds() {
	page("<main><nav></nav></main>");
	let data = Root::from_json(
		r#"{"docs": [
			{"path": "doc/intro.html", "title": "Intro", "subs": [{"path": "doc/intro.html#a", "title": "A", "subs": []}]},
			{"path": "doc/usage.html", "title": "Usage", "subs": [{"path": "doc/usage.html#b", "title": "B", "subs": []}]}
		]}"#,
	)
	.unwrap();
	let navi = doc_navi(&data.docs, "/main.svg");
	navi.set_hidden(false);
	Mimic::select("main>nav").append(&navi);

	expand_doc_groups("/site/doc/usage.html");
	let groups = Mimic::select("#DocNavi>div");
	let (intro, usage) = (groups.at(0), groups.at(1));
	assert!(usage.has("active") && !intro.has("active"));

	let height = |group: &Mimic| group.find("ol.sub").node().unwrap().dyn_ref::<HtmlElement>().unwrap().style().get_property_value("height").unwrap();
	assert_ne!(height(&usage), "0px");
	assert!(height(&usage).ends_with("px"));
	assert_eq!(height(&intro), "0px");
	assert_eq!(usage.find("li").node().unwrap().dyn_ref::<HtmlElement>().unwrap().style().get_property_value("height").unwrap(), "");
}

#[wasm_bindgen_test]
async fn previews_follow_swapped_sections() {
	page("<main><article id='Article'><section id='one'><pre>a</pre></section></article><aside></aside></main>");
	let enhanced = Rc::new(Cell::new(0));
	let host = WebHost::new(Previews::new().with("pre", {
		let enhanced = Rc::clone(&enhanced);
		move |_| enhanced.set(enhanced.get() + 1)
	}))
	.unwrap();

	host.observe_previews("#Article>section");
	host.sleep(Duration::from_millis(100)).await;
	assert_eq!(enhanced.get(), 1);
	assert!(Mimic::select("#one").attr(PREVIEWED).is_some());

	host.swap_regions("<html><body><article><section id='two'><pre>b</pre></section></article><aside></aside></body></html>", &Regions::default()).unwrap();
	host.observe_previews("#Article>section");
	host.observe_previews("#Article>section");
	host.sleep(Duration::from_millis(100)).await;
	assert_eq!(enhanced.get(), 2);
}
