use super::{anchor_location, WebHost};
use crate::{error::Result, viewer::Viewer};
use tracing::{error, trace_span};
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{AddEventListenerOptions, Element, Event, EventTarget, HtmlAnchorElement, ScrollRestoration};

struct Listener {
	target: EventTarget,
	event: String,
	capture: bool,
	closure: Closure<dyn Fn(Event)>,
}

impl Drop for Listener {
	fn drop(&mut self) {
		if let Err(error) = self.target.remove_event_listener_with_callback_and_bool(&self.event, self.closure.as_ref().unchecked_ref(), self.capture) {
			error!("Failed to remove event listener {:?}: {:?}", self.event, error);
		}
	}
}

/// The event listeners that drive a [`Viewer`]. Dropping this removes them again.
#[must_use = "The viewer stops receiving events once its bindings are dropped."]
pub struct Bindings {
	listeners: Vec<Listener>,
}

impl Bindings {
	fn listen(&mut self, target: &EventTarget, event: &str, capture: bool, handler: impl Fn(Event) + 'static) -> Result<()> {
		let closure = Closure::wrap(Box::new(handler) as Box<dyn Fn(Event)>);
		let options = AddEventListenerOptions::new();
		options.set_capture(capture);
		target.add_event_listener_with_callback_and_add_event_listener_options(event, closure.as_ref().unchecked_ref(), &options)?;
		self.listeners.push(Listener { target: target.clone(), event: event.to_owned(), capture, closure });
		Ok(())
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.listeners.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.listeners.is_empty()
	}
}

fn anchor(event: &Event) -> Option<HtmlAnchorElement> {
	let target: Element = event.target()?.dyn_into().ok()?;
	target.closest("a").ok()??.dyn_into().ok()
}

/// Takes over navigation, scrolling and preloading in the current window.
///
/// If the document is still loading, [`Viewer::start`] runs on `DOMContentLoaded`. Otherwise it runs right away.
pub fn bind(viewer: &Viewer<WebHost>) -> Result<Bindings> {
	let host = viewer.host();
	let window: &EventTarget = host.window().as_ref();
	let document: &EventTarget = host.document().as_ref();
	let mut bindings = Bindings { listeners: Vec::new() };

	// Scroll positions are restored by the viewer.
	host.window().history()?.set_scroll_restoration(ScrollRestoration::Manual)?;

	bindings.listen(window, "popstate", false, {
		let viewer = viewer.clone();
		move |_| {
			let span = trace_span!("popstate");
			let _enter = span.enter();
			viewer.popped();
		}
	})?;

	bindings.listen(document, "click", false, {
		let viewer = viewer.clone();
		move |event| {
			let span = trace_span!("click");
			let _enter = span.enter();
			if let Some(anchor) = anchor(&event) {
				if viewer.activate(&anchor_location(&anchor)) {
					event.prevent_default();
				}
			}
		}
	})?;

	bindings.listen(window, "scroll", false, {
		let viewer = viewer.clone();
		move |_| viewer.scrolled()
	})?;

	// Capturing, as the default `pointerenter` doesn't bubble.
	bindings.listen(document, &viewer.config().preload, true, {
		let viewer = viewer.clone();
		move |event| {
			if let Some(anchor) = event.target().and_then(|target| target.dyn_into::<HtmlAnchorElement>().ok()) {
				let span = trace_span!("preload");
				let _enter = span.enter();
				viewer.preload(&anchor_location(&anchor));
			}
		}
	})?;

	if host.document().ready_state() == "loading" {
		bindings.listen(document, "DOMContentLoaded", false, {
			let viewer = viewer.clone();
			move |_| viewer.start()
		})?;
	} else {
		viewer.start();
	}

	Ok(bindings)
}
