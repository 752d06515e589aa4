//! A scripted [`Host`]: fetches and timers stay pending until the test resolves them.

#![allow(dead_code)]

use core::{
	cell::{Cell, RefCell},
	time::Duration,
};
use docs_runtime::{Error, Host, Location, Regions, Result, ScrollBehavior, Viewer, ViewerConfig};
use futures::{
	channel::oneshot,
	executor::{LocalPool, LocalSpawner},
	future::LocalBoxFuture,
	task::LocalSpawnExt,
};
use std::{collections::HashMap, rc::Rc};

pub const ORIGIN: &str = "https://docs.example.com";

/// A page with both content regions.
pub fn page(content: &str) -> String {
	format!("<html><body><main><article>{}</article><aside>toc of {}</aside></main></body></html>", content, content)
}

pub fn url(path: &str) -> Location {
	Location::parse(&format!("{}{}", ORIGIN, path)).unwrap()
}

#[derive(Default)]
pub struct MockState {
	pub location: Option<Location>,
	pub pushed: Vec<String>,
	pub fetches: Vec<String>,
	pending: HashMap<String, Vec<oneshot::Sender<Result<String>>>>,
	timers: Vec<oneshot::Sender<()>>,
	pub scroll_y: f64,
	pub offsets: HashMap<String, f64>,
	pub tops: HashMap<String, f64>,
	pub scrolls: Vec<(f64, ScrollBehavior)>,
	pub leaving: Vec<bool>,
	/// `<article>` contents, in the order they were swapped in.
	pub swapped: Vec<String>,
	pub observed: usize,
}

#[derive(Clone)]
pub struct MockHost {
	state: Rc<RefCell<MockState>>,
	spawner: LocalSpawner,
}

impl MockHost {
	pub fn state(&self) -> std::cell::RefMut<'_, MockState> {
		self.state.borrow_mut()
	}
}

fn region<'a>(html: &'a str, tag: &str) -> Option<&'a str> {
	let open = format!("<{}>", tag);
	let start = html.find(&open)? + open.len();
	let end = html[start..].find(&format!("</{}>", tag))? + start;
	Some(&html[start..end])
}

impl Host for MockHost {
	fn location(&self) -> Location {
		self.state.borrow().location.clone().unwrap()
	}

	fn push_state(&self, href: &str) {
		let mut state = self.state.borrow_mut();
		state.pushed.push(href.to_owned());
		state.location = Some(Location::parse(href).unwrap());
	}

	fn document_html(&self) -> String {
		page("initial")
	}

	fn fetch(&self, path: &str) -> LocalBoxFuture<'static, Result<String>> {
		let (sender, receiver) = oneshot::channel();
		let mut state = self.state.borrow_mut();
		state.fetches.push(path.to_owned());
		state.pending.entry(path.to_owned()).or_default().push(sender);
		let path = path.to_owned();
		Box::pin(async move { receiver.await.unwrap_or_else(|_| Err(Error::Fetch { path, reason: "dropped".to_owned() })) })
	}

	fn sleep(&self, _: Duration) -> LocalBoxFuture<'static, ()> {
		let (sender, receiver) = oneshot::channel();
		self.state.borrow_mut().timers.push(sender);
		Box::pin(async move {
			drop(receiver.await);
		})
	}

	fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
		self.spawner.spawn_local(task).unwrap();
	}

	fn scroll_y(&self) -> f64 {
		self.state.borrow().scroll_y
	}

	fn scroll_to(&self, top: f64, behavior: ScrollBehavior) {
		let mut state = self.state.borrow_mut();
		state.scroll_y = top;
		state.scrolls.push((top, behavior));
	}

	fn element_top(&self, id: &str) -> Option<f64> {
		self.state.borrow().tops.get(id).copied()
	}

	fn load_offset(&self, path: &str) -> Option<f64> {
		self.state.borrow().offsets.get(path).copied()
	}

	fn save_offset(&self, path: &str, offset: f64) {
		self.state.borrow_mut().offsets.insert(path.to_owned(), offset);
	}

	fn set_leaving(&self, selector: &str, leaving: bool) {
		assert_eq!(selector, "article");
		self.state.borrow_mut().leaving.push(leaving);
	}

	fn swap_regions(&self, html: &str, regions: &Regions) -> Result<()> {
		let mut contents = Vec::new();
		for tag in regions.iter() {
			contents.push(region(html, tag).ok_or_else(|| Error::MissingRegion(tag.to_owned()))?);
		}
		self.state.borrow_mut().swapped.push(contents[0].to_owned());
		Ok(())
	}

	fn observe_previews(&self, selector: &str) {
		assert_eq!(selector, "#Article>section");
		self.state.borrow_mut().observed += 1;
	}
}

/// A viewer on a mock host, plus the executor its tasks run on.
pub struct Harness {
	pub pool: LocalPool,
	pub host: MockHost,
	pub viewer: Viewer<MockHost>,
	pub paged: Rc<Cell<usize>>,
}

impl Harness {
	/// A started viewer on `path` whose initial transition has completed.
	pub fn new(path: &str) -> Self {
		Self::with_config(path, |config| config)
	}

	pub fn with_config(path: &str, configure: impl FnOnce(ViewerConfig) -> ViewerConfig) -> Self {
		let pool = LocalPool::new();
		let host = MockHost {
			state: Rc::new(RefCell::new(MockState { location: Some(url(path)), ..MockState::default() })),
			spawner: pool.spawner(),
		};
		let paged = Rc::new(Cell::new(0));
		let config = configure(ViewerConfig::new({
			let paged = Rc::clone(&paged);
			move || paged.set(paged.get() + 1)
		}));
		let viewer = Viewer::new(host.clone(), config);

		let mut harness = Self { pool, host, viewer, paged };
		harness.viewer.start();
		harness.elapse();
		harness
	}

	pub fn state(&self) -> std::cell::RefMut<'_, MockState> {
		self.host.state()
	}

	pub fn run(&mut self) {
		self.pool.run_until_stalled();
	}

	/// Lets every pending delay run out.
	pub fn elapse(&mut self) {
		self.run();
		let timers: Vec<_> = self.state().timers.drain(..).collect();
		for timer in timers {
			drop(timer.send(()));
		}
		self.run();
	}

	pub fn pending_timers(&self) -> usize {
		self.host.state.borrow().timers.len()
	}

	/// Answers the oldest outstanding request for `path`.
	pub fn respond(&mut self, path: &str, body: &str) {
		self.answer(path, Ok(body.to_owned()));
	}

	pub fn fail(&mut self, path: &str) {
		self.answer(path, Err(Error::Status { path: path.to_owned(), status: 503 }));
	}

	fn answer(&mut self, path: &str, response: Result<String>) {
		let sender = {
			let mut state = self.state();
			let senders = state.pending.get_mut(path).expect("no request outstanding");
			senders.remove(0)
		};
		drop(sender.send(response));
		self.run();
	}

	/// Clicks a link to `path`, which is relative to the origin.
	pub fn click(&mut self, path: &str) -> bool {
		let prevented = self.viewer.activate(&url(path));
		self.run();
		prevented
	}

	/// Goes back or forward to `path`. The browser updates the location itself before `popstate`.
	pub fn pop(&mut self, path: &str) {
		self.state().location = Some(url(path));
		self.viewer.popped();
		self.run();
	}
}
