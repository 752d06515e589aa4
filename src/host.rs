//! The browser, as seen by the page viewer.
//!
//! [`Viewer`](`crate::viewer::Viewer`) never touches a browser API directly. Everything it needs goes through [`Host`],
//! which [`WebHost`](`crate::web::WebHost`) implements with `web-sys` and tests implement with a scripted double.

use crate::{error::Result, location::Location};
use core::time::Duration;
use futures::future::LocalBoxFuture;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
	Instant,
	Smooth,
}

/// Selectors of the two regions that are swapped on navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Regions {
	/// The primary content region. This is also the one that fades out during a transition.
	pub content: String,
	pub sidebar: String,
}

impl Default for Regions {
	fn default() -> Self {
		Self { content: "article".to_owned(), sidebar: "aside".to_owned() }
	}
}

impl Regions {
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		[self.content.as_str(), self.sidebar.as_str()].into_iter()
	}
}

pub trait Host: 'static {
	// Location and history.

	fn location(&self) -> Location;

	/// Pushes `href` onto session history without loading it.
	fn push_state(&self, href: &str);

	/// The serialized markup of the document the browser loaded itself.
	fn document_html(&self) -> String;

	// Tasks.

	/// Requests `path` and resolves to the response body.
	fn fetch(&self, path: &str) -> LocalBoxFuture<'static, Result<String>>;

	fn sleep(&self, delay: Duration) -> LocalBoxFuture<'static, ()>;

	/// Runs `task` to completion on the current thread's event loop.
	fn spawn(&self, task: LocalBoxFuture<'static, ()>);

	// Scrolling.

	fn scroll_y(&self) -> f64;

	fn scroll_to(&self, top: f64, behavior: ScrollBehavior);

	/// The top offset of the element with the given id, or [`None`] if there is no such element.
	fn element_top(&self, id: &str) -> Option<f64>;

	/// The scroll offset last saved for `path`.
	fn load_offset(&self, path: &str) -> Option<f64>;

	fn save_offset(&self, path: &str, offset: f64);

	// Content.

	/// Toggles the transient "leaving" look of the region matching `selector`.
	fn set_leaving(&self, selector: &str, leaving: bool);

	/// Parses `html` and replaces the contents of each live region with that of its counterpart.
	///
	/// # Errors
	///
	/// Fails without modifying either region if one of them can't be found in either document.
	fn swap_regions(&self, html: &str, regions: &Regions) -> Result<()>;

	/// Starts watching elements matching `selector` for their first appearance in the viewport.
	fn observe_previews(&self, selector: &str);
}
