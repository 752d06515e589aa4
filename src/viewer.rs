//! The page viewer: swaps in-site pages without a full reload.
//!
//! A [`Viewer`] keeps a bounded cache of fetched page text, makes sure no page is requested twice at the same time,
//! and turns navigation events into transitions of the content regions, followed by the right scroll position.
//!
//! All state lives in one instance per page session, and everything happens on the browser's event loop.
//! The only suspension points are page fetches and the fade delay of a transition.

use crate::{
	cache::{FragmentCache, InFlight},
	error::Result,
	host::{Host, Regions},
	location::Location,
	scroll,
};
use core::{cell::RefCell, fmt, time::Duration};
use std::rc::Rc;
use tracing::{debug, instrument, trace, warn};

/// How the page being shown was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
	/// The document the browser loaded by itself.
	Initial,
	/// A different page, reached through a link (`popped: false`) or through back/forward.
	Page { popped: bool },
	/// Only the hash changed.
	Hash,
}

impl Transition {
	const LINK: Self = Self::Page { popped: false };
}

pub struct ViewerConfig {
	/// How many pages to keep cached.
	pub cache_size: usize,
	/// The DOM event on anchors that starts a background fetch of their target.
	pub preload: String,
	/// Selector of the elements that are enhanced lazily, see [`Previews`](`crate::preview::Previews`).
	pub preview: String,
	pub regions: Regions,
	/// How long the outgoing content gets to fade out.
	pub delay: Duration,
	paged: Box<dyn Fn()>,
}

impl ViewerConfig {
	pub const DEFAULT_CACHE_SIZE: usize = 20;
	pub const DEFAULT_PRELOAD: &'static str = "pointerenter";
	pub const DEFAULT_PREVIEW: &'static str = "#Article>section";
	pub const DEFAULT_DELAY: Duration = Duration::from_millis(300);

	/// `paged` runs after every transition, once the new content is in place,
	/// so that the surrounding chrome can update itself from the new DOM.
	pub fn new(paged: impl Fn() + 'static) -> Self {
		Self {
			cache_size: Self::DEFAULT_CACHE_SIZE,
			preload: Self::DEFAULT_PRELOAD.to_owned(),
			preview: Self::DEFAULT_PREVIEW.to_owned(),
			regions: Regions::default(),
			delay: Self::DEFAULT_DELAY,
			paged: Box::new(paged),
		}
	}

	#[must_use]
	pub fn with_cache_size(mut self, cache_size: usize) -> Self {
		self.cache_size = cache_size;
		self
	}

	#[must_use]
	pub fn with_preload(mut self, event: impl Into<String>) -> Self {
		self.preload = event.into();
		self
	}

	#[must_use]
	pub fn with_preview(mut self, selector: impl Into<String>) -> Self {
		self.preview = selector.into();
		self
	}

	#[must_use]
	pub fn with_regions(mut self, regions: Regions) -> Self {
		self.regions = regions;
		self
	}

	#[must_use]
	pub fn with_delay(mut self, delay: Duration) -> Self {
		self.delay = delay;
		self
	}
}

impl fmt::Debug for ViewerConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ViewerConfig")
			.field("cache_size", &self.cache_size)
			.field("preload", &self.preload)
			.field("preview", &self.preview)
			.field("regions", &self.regions)
			.field("delay", &self.delay)
			.finish_non_exhaustive()
	}
}

#[derive(Debug)]
struct State {
	path: String,
	hash: String,
	/// The path whose content is actually on screen.
	shown: Option<String>,
	cache: FragmentCache,
	/// For each outstanding request, the transition to run if its page is still current when it arrives.
	in_flight: InFlight<Option<Transition>>,
	/// Incremented by each transition. Only the newest one may touch the DOM once its delay is over.
	token: u64,
}

struct Inner<H> {
	host: H,
	config: ViewerConfig,
	state: RefCell<State>,
}

struct Page {
	path: String,
	text: Rc<str>,
}

/// Cheap to clone. All clones share the same cache and navigation state.
pub struct Viewer<H: Host> {
	inner: Rc<Inner<H>>,
}

impl<H: Host> Clone for Viewer<H> {
	fn clone(&self) -> Self {
		Self { inner: Rc::clone(&self.inner) }
	}
}

impl<H: Host> fmt::Debug for Viewer<H> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Viewer").field("config", &self.inner.config).field("state", &self.inner.state).finish_non_exhaustive()
	}
}

impl<H: Host> Viewer<H> {
	#[must_use]
	pub fn new(host: H, config: ViewerConfig) -> Self {
		let Location { path, hash, .. } = host.location();
		let state = State {
			path,
			hash,
			shown: None,
			cache: FragmentCache::new(config.cache_size),
			in_flight: InFlight::new(),
			token: 0,
		};
		Self { inner: Rc::new(Inner { host, config, state: RefCell::new(state) }) }
	}

	pub fn host(&self) -> &H {
		&self.inner.host
	}

	pub fn config(&self) -> &ViewerConfig {
		&self.inner.config
	}

	#[must_use]
	pub fn current_path(&self) -> String {
		self.inner.state.borrow().path.clone()
	}

	#[must_use]
	pub fn is_cached(&self, path: &str) -> bool {
		self.inner.state.borrow().cache.contains(path)
	}

	#[must_use]
	pub fn is_loading(&self, path: &str) -> bool {
		self.inner.state.borrow().in_flight.contains(path)
	}

	/// Cached paths, oldest first.
	#[must_use]
	pub fn cached_paths(&self) -> Vec<String> {
		self.inner.state.borrow().cache.paths().map(ToOwned::to_owned).collect()
	}

	/// Takes over the document the browser has just loaded.
	///
	/// Its markup is cached so that coming back to it doesn't refetch it, then the chrome is brought up to date.
	#[instrument(skip(self))]
	pub fn start(&self) {
		let html = self.inner.host.document_html();
		{
			let mut state = self.inner.state.borrow_mut();
			let path = state.path.clone();
			state.cache.insert(path.clone(), html);
			state.shown = Some(path);
		}
		self.update(None, Transition::Initial);
	}

	/// Handles activation of a link to `link`.
	///
	/// Returns whether the browser's own navigation has to be prevented, which is the case for every same-origin link.
	#[instrument(skip(self), fields(href = %link.href))]
	pub fn activate(&self, link: &Location) -> bool {
		let location = self.inner.host.location();
		if !location.same_origin(link) {
			return false;
		}

		if location.href == link.href {
			let retry = {
				let state = self.inner.state.borrow();
				state.path == link.path && state.shown.as_deref() != Some(link.path.as_str())
			};
			if retry {
				debug!("Current page is not on screen, loading it again.");
				self.load_with(&link.path, Some(Transition::LINK));
			}
		} else {
			self.inner.host.push_state(&link.href);
			self.changed(false);
		}
		true
	}

	/// Handles back/forward navigation. The browser has already updated its location.
	#[instrument(skip(self))]
	pub fn popped(&self) {
		self.changed(true);
	}

	/// Starts fetching the target of a hovered link in the background, unless there's nothing to gain.
	pub fn preload(&self, link: &Location) {
		let location = self.inner.host.location();
		if link.same_origin(&location) && link.path != location.path && !self.is_cached(&link.path) {
			self.load(&link.path);
		}
	}

	/// Remembers the current scroll offset for the current page.
	pub fn scrolled(&self) {
		let host = &self.inner.host;
		host.save_offset(&host.location().path, host.scroll_y());
	}

	/// Makes sure `path` is cached or being fetched. This never starts a transition to a page that isn't current.
	pub fn load(&self, path: &str) {
		self.load_with(path, None);
	}

	fn changed(&self, popped: bool) {
		let location = self.inner.host.location();
		let mut state = self.inner.state.borrow_mut();
		if state.path == location.path {
			if state.hash != location.hash {
				state.hash = location.hash;
				drop(state);
				self.scroll(Transition::Hash);
			}
		} else {
			state.path = location.path.clone();
			state.hash = location.hash;
			drop(state);
			self.load_with(&location.path, Some(Transition::Page { popped }));
		}
	}

	#[instrument(skip(self))]
	fn load_with(&self, path: &str, transition: Option<Transition>) {
		let mut state = self.inner.state.borrow_mut();
		if let Some(text) = state.cache.get(path) {
			let current = state.path == path;
			drop(state);
			trace!(current, "Cache hit.");
			if current {
				self.update(Some(Page { path: path.to_owned(), text }), transition.unwrap_or(Transition::LINK));
			}
			return;
		}

		if !state.in_flight.begin(path, transition) {
			if let (Some(transition), Some(pending)) = (transition, state.in_flight.get_mut(path)) {
				*pending = Some(transition);
			}
			trace!("Already in flight.");
			return;
		}
		drop(state);

		debug!("Fetching.");
		let request = self.inner.host.fetch(path);
		let viewer = self.clone();
		let path = path.to_owned();
		self.inner.host.spawn(Box::pin(async move {
			let response = request.await;
			viewer.settle(path, response);
		}));
	}

	#[instrument(skip(self, response))]
	fn settle(&self, path: String, response: Result<String>) {
		let mut state = self.inner.state.borrow_mut();
		let transition = state.in_flight.finish(&path).flatten();
		match response {
			Ok(text) => {
				#[cfg(feature = "dangerous-logging")]
				trace!(%text, "Fetched page.");

				let text: Rc<str> = text.into();
				state.cache.insert(path.clone(), Rc::clone(&text));
				let current = state.path == path;
				drop(state);
				if current {
					self.update(Some(Page { path, text }), transition.unwrap_or(Transition::LINK));
				} else {
					debug!("No longer current, only cached.");
				}
			}
			Err(error) => {
				drop(state);
				warn!(%error, "Failed to load page. Keeping the current content.");
			}
		}
	}

	fn update(&self, page: Option<Page>, transition: Transition) {
		let token = {
			let mut state = self.inner.state.borrow_mut();
			state.token += 1;
			state.token
		};

		let Inner { host, config, .. } = &*self.inner;
		if transition != Transition::Initial {
			host.set_leaving(&config.regions.content, true);
		}

		let delay = host.sleep(config.delay);
		let viewer = self.clone();
		host.spawn(Box::pin(async move {
			delay.await;
			viewer.render(token, page, transition);
		}));
	}

	#[instrument(skip(self, page), fields(path = page.as_ref().map(|page| page.path.as_str())))]
	fn render(&self, token: u64, page: Option<Page>, transition: Transition) {
		if self.inner.state.borrow().token != token {
			debug!("Superseded by a newer transition.");
			return;
		}

		let Inner { host, config, state } = &*self.inner;
		if let Some(Page { path, text }) = page {
			match host.swap_regions(&text, &config.regions) {
				Ok(()) => state.borrow_mut().shown = Some(path),
				Err(error) => warn!(%error, "Could not swap content regions."),
			}
		}

		(config.paged)();
		host.observe_previews(&config.preview);
		self.scroll(transition);
		host.set_leaving(&config.regions.content, false);
	}

	fn scroll(&self, transition: Transition) {
		let host = &self.inner.host;
		let target = scroll::resolve(host, &host.location(), transition);
		trace!(?transition, ?target, "Scrolling.");
		host.scroll_to(target.top, target.behavior);
	}
}
