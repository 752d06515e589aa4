//! Lazy enhancement of content sections.
//!
//! Work like syntax highlighting or wiring up share buttons is only worth doing for sections somebody actually
//! scrolls to. [`Previews`] holds the enhancements and runs them for a section the first time it becomes visible.

use core::fmt;
use tracing::trace_span;

/// Something enhancements can be applied to, in practice a DOM element.
pub trait PreviewTarget: Sized {
	/// Marks the target as enhanced. Returns `false` if it already was.
	fn mark_initialized(&self) -> bool;

	/// Descendants matching `selector`, in document order.
	fn select_all(&self, selector: &str) -> Vec<Self>;
}

type Enhancement<T> = Box<dyn Fn(&T)>;

pub struct Previews<T> {
	enhancements: Vec<(String, Enhancement<T>)>,
}

impl<T> Default for Previews<T> {
	fn default() -> Self {
		Self { enhancements: Vec::new() }
	}
}

impl<T> fmt::Debug for Previews<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_list().entries(self.enhancements.iter().map(|(selector, _)| selector)).finish()
	}
}

impl<T: PreviewTarget> Previews<T> {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds an enhancement for descendants matching `selector`. Enhancements run in the order they were added.
	#[must_use]
	pub fn with(mut self, selector: impl Into<String>, enhance: impl Fn(&T) + 'static) -> Self {
		self.enhancements.push((selector.into(), Box::new(enhance)));
		self
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.enhancements.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.enhancements.is_empty()
	}

	/// Called whenever `target` becomes visible. Only the first call for each target does anything.
	///
	/// Returns whether the enhancements ran.
	pub fn activate(&self, target: &T) -> bool {
		if !target.mark_initialized() {
			return false;
		}
		for (selector, enhance) in &self.enhancements {
			let span = trace_span!("Enhancing", %selector);
			let _enter = span.enter();
			for element in target.select_all(selector) {
				enhance(&element);
			}
		}
		true
	}
}
