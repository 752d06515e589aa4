//! State of a drop-down selection, independent of how it is drawn.

use std::fmt;

pub struct Selection<T> {
	model: Vec<T>,
	/// Indices into `model`, in selection order.
	selected: Vec<usize>,
	multiple: bool,
	placeholder: String,
	label: Box<dyn Fn(&T) -> String>,
}

/// What a call to [`Selection::select`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
	Selected,
	Deselected,
	/// The item was already the single selection. The drop-down should just close.
	Unchanged,
}

impl<T: fmt::Display + 'static> Selection<T> {
	pub fn new(model: Vec<T>, placeholder: impl Into<String>) -> Self {
		Self::with_label(model, placeholder, ToString::to_string)
	}
}

impl<T> Selection<T> {
	pub fn with_label(model: Vec<T>, placeholder: impl Into<String>, label: impl Fn(&T) -> String + 'static) -> Self {
		Self {
			model,
			selected: Vec::new(),
			multiple: false,
			placeholder: placeholder.into(),
			label: Box::new(label),
		}
	}

	#[must_use]
	pub fn multiple(mut self, multiple: bool) -> Self {
		self.multiple = multiple;
		self
	}

	#[must_use]
	pub fn is_multiple(&self) -> bool {
		self.multiple
	}

	pub fn model(&self) -> &[T] {
		&self.model
	}

	#[must_use]
	pub fn placeholder(&self) -> &str {
		&self.placeholder
	}

	pub fn label_of(&self, item: &T) -> String {
		(self.label)(item)
	}

	/// Selects or toggles the item at `index`.
	///
	/// # Panics
	///
	/// If `index` is out of bounds.
	pub fn select(&mut self, index: usize) -> Change {
		assert!(index < self.model.len(), "selection index {} out of bounds", index);
		if let Some(position) = self.selected.iter().position(|&i| i == index) {
			if self.multiple {
				self.selected.remove(position);
				Change::Deselected
			} else {
				Change::Unchanged
			}
		} else {
			if !self.multiple {
				self.selected.clear();
			}
			self.selected.push(index);
			Change::Selected
		}
	}

	pub fn deselect(&mut self) {
		self.selected.clear();
	}

	#[must_use]
	pub fn is_selected(&self, index: usize) -> bool {
		self.selected.contains(&index)
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.selected.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.selected.is_empty()
	}

	pub fn selected(&self) -> impl Iterator<Item = &T> {
		self.selected.iter().map(move |&i| &self.model[i])
	}

	/// The text shown in the closed drop-down.
	#[must_use]
	pub fn summary(&self) -> String {
		if self.selected.is_empty() {
			self.placeholder.clone()
		} else {
			self.selected().map(|item| self.label_of(item)).collect::<Vec<_>>().join(", ")
		}
	}
}

impl<T: fmt::Debug> fmt::Debug for Selection<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Selection")
			.field("model", &self.model)
			.field("selected", &self.selected)
			.field("multiple", &self.multiple)
			.field("placeholder", &self.placeholder)
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	fn packages() -> Selection<&'static str> {
		Selection::new(vec!["cointoss", "cointoss.util", "trademate"], "Select Package")
	}

	#[test]
	fn single_selection_replaces() {
		let mut selection = packages();
		assert_eq!(selection.summary(), "Select Package");

		assert_eq!(selection.select(0), Change::Selected);
		assert_eq!(selection.select(2), Change::Selected);
		assert_eq!(selection.selected().collect::<Vec<_>>(), [&"trademate"]);

		assert_eq!(selection.select(2), Change::Unchanged);
		assert_eq!(selection.len(), 1);
	}

	#[test]
	fn multiple_selection_toggles() {
		let mut selection = packages().multiple(true);
		selection.select(1);
		selection.select(0);
		assert_eq!(selection.summary(), "cointoss.util, cointoss");

		assert_eq!(selection.select(1), Change::Deselected);
		assert_eq!(selection.summary(), "cointoss");
		assert!(selection.is_selected(0));

		selection.deselect();
		assert!(selection.is_empty());
		assert_eq!(selection.summary(), "Select Package");
	}

	#[test]
	fn custom_labels() {
		let mut selection = Selection::with_label(vec![1, 2], "Pick", |n: &i32| format!("#{}", n)).multiple(true);
		selection.select(0);
		selection.select(1);
		assert_eq!(selection.summary(), "#1, #2");
	}
}
