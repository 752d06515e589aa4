//! A small chainable wrapper around sets of DOM elements.
//!
//! [`Mimic`] holds an ordered list of distinct elements. Traversals return a new `Mimic`, setters return `&Self`
//! so that calls can be chained, and getters read from the first element.

use js_sys::Function;
use std::rc::Rc;
use tracing::{error, warn};
use wasm_bindgen::{closure::Closure, JsCast, UnwrapThrowExt};
use web_sys::{Document, Element, Event, EventInit, HtmlCollection, HtmlElement, HtmlInputElement, HtmlTemplateElement, NodeList};

/// The document of the current window.
///
/// # Panics
///
/// Throws into JavaScript outside of a browsing context.
#[must_use]
pub fn document() -> Document {
	web_sys::window().expect_throw("docs-runtime: No window.").document().expect_throw("docs-runtime: No document.")
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mimic {
	nodes: Vec<Element>,
}

impl From<Element> for Mimic {
	fn from(element: Element) -> Self {
		Self { nodes: vec![element] }
	}
}

impl From<Vec<Element>> for Mimic {
	fn from(elements: Vec<Element>) -> Self {
		elements.into_iter().collect()
	}
}

impl FromIterator<Element> for Mimic {
	fn from_iter<I: IntoIterator<Item = Element>>(iter: I) -> Self {
		let mut nodes: Vec<Element> = Vec::new();
		for element in iter {
			if !nodes.contains(&element) {
				nodes.push(element);
			}
		}
		Self { nodes }
	}
}

fn node_list(list: &NodeList) -> impl Iterator<Item = Element> + '_ {
	(0..list.length()).filter_map(move |i| list.item(i)).filter_map(|node| node.dyn_into::<Element>().ok())
}

fn collection(collection: &HtmlCollection) -> impl Iterator<Item = Element> + '_ {
	(0..collection.length()).filter_map(move |i| collection.item(i))
}

impl Mimic {
	/// All elements in the document matching `selector`.
	#[must_use]
	pub fn select(selector: &str) -> Self {
		match document().query_selector_all(selector) {
			Ok(list) => node_list(&list).collect(),
			Err(error) => {
				error!("Invalid selector {:?}: {:?}", selector, error);
				Self::default()
			}
		}
	}

	/// The top-level elements of an HTML snippet, not yet attached to the document.
	#[must_use]
	pub fn parse(html: &str) -> Self {
		let template: HtmlTemplateElement = document().create_element("template").unwrap_throw().unchecked_into();
		template.set_inner_html(html.trim());
		collection(&template.content().children()).collect()
	}

	/// A new, detached element.
	#[must_use]
	pub fn create(tag: &str) -> Self {
		match document().create_element(tag) {
			Ok(element) => element.into(),
			Err(error) => {
				error!("Could not create <{}>: {:?}", tag, error);
				Self::default()
			}
		}
	}

	#[must_use]
	pub fn nodes(&self) -> &[Element] {
		&self.nodes
	}

	#[must_use]
	pub fn node(&self) -> Option<&Element> {
		self.nodes.first()
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn each(&self, mut action: impl FnMut(&Element)) -> &Self {
		self.nodes.iter().for_each(|element| action(element));
		self
	}

	fn flat<I: IntoIterator<Item = Element>>(&self, traverse: impl FnMut(&Element) -> I) -> Self {
		self.nodes.iter().flat_map(traverse).collect()
	}

	// Traversal.

	#[must_use]
	pub fn find(&self, selector: &str) -> Self {
		self.flat(|element| match element.query_selector_all(selector) {
			Ok(list) => node_list(&list).collect::<Vec<_>>(),
			Err(error) => {
				error!("Invalid selector {:?}: {:?}", selector, error);
				Vec::new()
			}
		})
	}

	#[must_use]
	pub fn children(&self) -> Self {
		self.flat(|element| collection(&element.children()).collect::<Vec<_>>())
	}

	#[must_use]
	pub fn parent(&self) -> Self {
		self.flat(|element| element.parent_element())
	}

	#[must_use]
	pub fn closest(&self, selector: &str) -> Self {
		self.flat(|element| element.closest(selector).ok().flatten())
	}

	/// The element at `index` within the set, or an empty set.
	#[must_use]
	pub fn at(&self, index: usize) -> Self {
		self.nodes.get(index).cloned().map(Self::from).unwrap_or_default()
	}

	/// The first child element of each element.
	#[must_use]
	pub fn first(&self) -> Self {
		self.flat(|element| element.first_element_child())
	}

	/// The last child element of each element.
	#[must_use]
	pub fn last(&self) -> Self {
		self.flat(|element| element.last_element_child())
	}

	#[must_use]
	pub fn prev(&self) -> Self {
		self.flat(|element| element.previous_element_sibling())
	}

	#[must_use]
	pub fn next(&self) -> Self {
		self.flat(|element| element.next_element_sibling())
	}

	/// The elements that match `selector`.
	#[must_use]
	pub fn is(&self, selector: &str) -> Self {
		self.filter(|element| element.matches(selector).unwrap_or(false))
	}

	#[must_use]
	pub fn filter(&self, mut condition: impl FnMut(&Element) -> bool) -> Self {
		self.nodes.iter().filter(|element| condition(element)).cloned().collect()
	}

	/// Whether any of the elements is `node` or one of its ancestors.
	#[must_use]
	pub fn contains(&self, node: &web_sys::Node) -> bool {
		self.nodes.iter().any(|element| element.contains(Some(node)))
	}

	// Construction.

	/// Appends a new `<tag>` to each element and returns the new elements.
	pub fn make(&self, tag: &str) -> Self {
		let document = document();
		self.flat(|parent| {
			let child = document.create_element(tag).ok()?;
			parent.append_child(&child).ok()?;
			Some(child)
		})
	}

	/// Appends one new `<tag>` per item to each element and lets `build` fill it in.
	pub fn make_each<T>(&self, tag: &str, items: impl IntoIterator<Item = T>, mut build: impl FnMut(T, &Mimic)) -> Self {
		let mut made = Vec::new();
		for item in items {
			let child = self.make(tag);
			build(item, &child);
			made.extend(child.nodes);
		}
		made.into()
	}

	/// Appends a reference to the SVG symbol at `href` (`file.svg#name`) to each element.
	pub fn svg(&self, href: &str) -> Self {
		let name = href.rsplit('#').next().unwrap_or_default();
		self.flat(|parent| {
			let icon = Mimic::parse(&format!("<svg class='svg {}' viewBox='0 0 24 24'><use href='{}'/></svg>", name, href));
			icon.append_to(&parent.clone().into());
			icon.nodes
		})
	}

	pub fn append(&self, children: &Mimic) -> &Self {
		for parent in &self.nodes {
			for child in &children.nodes {
				if let Err(error) = parent.append_child(child) {
					warn!("Could not append {:?}: {:?}", child, error);
				}
			}
		}
		self
	}

	pub fn append_to(&self, parent: &Mimic) -> &Self {
		parent.append(self);
		self
	}

	/// Moves the elements in front of `target`'s first element.
	pub fn insert_before(&self, target: &Mimic) -> &Self {
		if let Some(target) = target.node() {
			for element in &self.nodes {
				if let Err(error) = target.before_with_node_1(element) {
					warn!("Could not insert {:?}: {:?}", element, error);
				}
			}
		}
		self
	}

	pub fn empty(&self) -> &Self {
		self.set_html("")
	}

	// Content.

	#[must_use]
	pub fn html(&self) -> String {
		self.node().map(Element::inner_html).unwrap_or_default()
	}

	pub fn set_html(&self, html: &str) -> &Self {
		self.each(|element| element.set_inner_html(html))
	}

	#[must_use]
	pub fn text(&self) -> String {
		self.node().and_then(|element| element.text_content()).unwrap_or_default()
	}

	pub fn set_text(&self, text: &str) -> &Self {
		self.each(|element| element.set_text_content(Some(text)))
	}

	#[must_use]
	pub fn attr(&self, name: &str) -> Option<String> {
		self.node().and_then(|element| element.get_attribute(name))
	}

	pub fn set_attr(&self, name: &str, value: &str) -> &Self {
		self.each(|element| {
			if let Err(error) = element.set_attribute(name, value) {
				warn!("Could not set attribute {:?}={:?}: {:?}", name, value, error);
			}
		})
	}

	pub fn set_id(&self, id: &str) -> &Self {
		self.set_attr("id", id)
	}

	pub fn set_title(&self, title: &str) -> &Self {
		self.set_attr("title", title)
	}

	pub fn set_href(&self, href: &str) -> &Self {
		self.set_attr("href", href)
	}

	pub fn set_placeholder(&self, placeholder: &str) -> &Self {
		self.set_attr("placeholder", placeholder)
	}

	/// The current value of the first element, if it is an `<input>`.
	#[must_use]
	pub fn value(&self) -> String {
		self.node().and_then(|element| element.dyn_ref::<HtmlInputElement>()).map(HtmlInputElement::value).unwrap_or_default()
	}

	pub fn set_hidden(&self, hidden: bool) -> &Self {
		self.each(|element| {
			if let Some(element) = element.dyn_ref::<HtmlElement>() {
				element.set_hidden(hidden);
			}
		})
	}

	pub fn show(&self, show: bool) -> &Self {
		self.css("display", if show { "" } else { "none" })
	}

	pub fn css(&self, property: &str, value: &str) -> &Self {
		self.each(|element| {
			if let Some(element) = element.dyn_ref::<HtmlElement>() {
				if let Err(error) = element.style().set_property(property, value) {
					warn!("Could not set style {}: {}: {:?}", property, value, error);
				}
			}
		})
	}

	// Classes.

	pub fn add(&self, class: &str) -> &Self {
		self.each(|element| drop(element.class_list().add_1(class)))
	}

	pub fn remove(&self, class: &str) -> &Self {
		self.each(|element| drop(element.class_list().remove_1(class)))
	}

	/// Flips `class` on each element. Returns whether the first element has it afterwards.
	pub fn toggle(&self, class: &str) -> bool {
		let mut first = None;
		for element in &self.nodes {
			let now = element.class_list().toggle(class).unwrap_or(false);
			first.get_or_insert(now);
		}
		first.unwrap_or(false)
	}

	#[must_use]
	pub fn has(&self, class: &str) -> bool {
		self.node().map_or(false, |element| element.class_list().contains(class))
	}

	/// Adds or removes each class according to its condition.
	pub fn set(&self, classes: &[(&str, bool)]) -> &Self {
		for &(class, condition) in classes {
			if condition {
				self.add(class);
			} else {
				self.remove(class);
			}
		}
		self
	}

	/// Replaces all classes.
	pub fn reset(&self, class: &str) -> &Self {
		self.each(|element| element.set_class_name(class))
	}

	// Events.

	/// Listens for `event` on each element for as long as the elements live.
	pub fn on(&self, event: &str, handler: impl Fn(&Event) + 'static) -> &Self {
		let listener = Closure::wrap(Box::new(move |event: Event| handler(&event)) as Box<dyn Fn(Event)>).into_js_value();
		let listener: &Function = listener.unchecked_ref();
		self.each(|element| {
			if let Err(error) = element.add_event_listener_with_callback(event, listener) {
				error!("Failed to add event listener {:?}: {:?}", event, error);
			}
		})
	}

	/// Like [`Mimic::on`], but only for events whose target is inside an element matching `selector`.
	pub fn on_where(&self, event: &str, selector: &str, handler: impl Fn(&Event, Element) + 'static) -> &Self {
		let handler = Rc::new(handler);
		let selector = selector.to_owned();
		self.on(event, move |event| {
			let target = event.target().and_then(|target| target.dyn_into::<Element>().ok());
			if let Some(matched) = target.and_then(|target| target.closest(&selector).ok().flatten()) {
				handler(event, matched);
			}
		})
	}

	/// Dispatches a new bubbling `event` from each element.
	pub fn dispatch(&self, event: &str) -> &Self {
		let init = EventInit::new();
		init.set_bubbles(true);
		match Event::new_with_event_init_dict(event, &init) {
			Ok(event) => self.each(|element| drop(element.dispatch_event(&event))),
			Err(error) => {
				error!("Could not create event {:?}: {:?}", event, error);
				self
			}
		}
	}
}
