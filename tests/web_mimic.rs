#![cfg(target_arch = "wasm32")]

use core::cell::Cell;
use docs_runtime::mimic::{document, Mimic};
use std::{rc::Rc, sync::Once};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{HtmlBodyElement, HtmlElement};

wasm_bindgen_test_configure!(run_in_browser);

static LOG: Once = Once::new();

fn body() -> Mimic {
	LOG.call_once(tracing_wasm::set_as_global_default);
	let body = document().body().unwrap().dyn_into::<HtmlBodyElement>().unwrap();
	body.set_inner_html("");
	Mimic::from(body.unchecked_into::<web_sys::Element>())
}

#[wasm_bindgen_test]
fn build_and_traverse() {
	let body = body();
	let list = body.make("ol");
	let items = list.make_each("li", ["one", "two", "three"], |text, li| {
		li.set_text(text).add("item");
	});
	assert_eq!(items.len(), 3);
	assert_eq!(Mimic::select("ol>li.item").len(), 3);
	assert_eq!(items.at(0).text(), "one");
	assert_eq!(items.at(2).prev().text(), "two");
	assert_eq!(items.at(0).next().text(), "two");
	assert!(items.at(3).is_empty());
	assert_eq!(items.parent().len(), 1);
	assert_eq!(items.at(0).closest("ol").node(), list.node());
	assert_eq!(list.children().len(), 3);
	assert_eq!(items.filter(|li| li.text_content().unwrap_or_default().starts_with('t')).len(), 2);
	assert!(list.contains(items.at(2).node().unwrap()));
}

#[wasm_bindgen_test]
fn first_and_last_are_child_elements() {
	let body = body();
	let header = body.make("header");
	header.make("h2").set_text("Usage");
	header.make("p").make("a").add("tweet");

	assert_eq!(header.first().text(), "Usage");
	assert!(header.last().first().has("tweet"));
	assert_eq!(Mimic::select(".tweet").closest("header").first().text(), "Usage");
	assert!(Mimic::select(".tweet").first().is_empty());
}

#[wasm_bindgen_test]
fn classes_and_attributes() {
	let body = body();
	let div = body.make("div");
	div.add("a").set(&[("b", true), ("c", false)]);
	assert!(div.has("a") && div.has("b") && !div.has("c"));
	assert!(!div.toggle("a"));
	assert!(div.toggle("a"));
	div.reset("only");
	assert_eq!(div.attr("class").as_deref(), Some("only"));

	div.set_id("box").set_title("A box");
	assert_eq!(Mimic::select("#box").attr("title").as_deref(), Some("A box"));

	div.set_hidden(true);
	assert!(div.node().unwrap().dyn_ref::<HtmlElement>().unwrap().hidden());

	let parsed = Mimic::parse("<p>one</p><p>two</p>");
	assert_eq!(parsed.len(), 2);
	parsed.append_to(&div);
	assert_eq!(div.find("p").len(), 2);
	div.empty();
	assert!(div.find("p").is_empty());
}

#[wasm_bindgen_test]
fn delegated_events() {
	let body = body();
	let list = body.make("ul");
	list.make_each("li", 0..3, |index, li| {
		li.set_attr("data-index", &index.to_string());
	});

	let clicked = Rc::new(Cell::new(None));
	list.on_where("click", "li", {
		let clicked = Rc::clone(&clicked);
		move |_, li| clicked.set(li.get_attribute("data-index"))
	});
	list.find("li").at(2).node().unwrap().dyn_ref::<HtmlElement>().unwrap().click();
	assert_eq!(clicked.take().as_deref(), Some("2"));

	let changes = Rc::new(Cell::new(0));
	body.on("change", {
		let changes = Rc::clone(&changes);
		move |_| changes.set(changes.get() + 1)
	});
	list.find("li").at(0).dispatch("change");
	assert_eq!(changes.get(), 1);
}
