use wasm_bindgen::JsValue;

/// Everything that can go wrong while the runtime talks to the browser.
///
/// None of these are fatal to the page. The worst outcome is that stale or unchanged content stays on screen.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// The request for a page never produced a response.
	#[error("failed to fetch {path}: {reason}")]
	Fetch { path: String, reason: String },

	/// The server answered, but not with a page.
	#[error("fetching {path} returned HTTP {status}")]
	Status { path: String, status: u16 },

	/// A content region marker matched nothing in the fetched or the live document.
	#[error("no element matches region selector {0:?}")]
	MissingRegion(String),

	#[error("invalid URL: {0}")]
	Url(#[from] url::ParseError),

	#[error("invalid documentation tree: {0}")]
	Tree(#[from] serde_json::Error),

	/// An exception thrown by a browser API, stringified.
	#[error("JavaScript exception: {0}")]
	Js(String),
}

impl From<JsValue> for Error {
	fn from(value: JsValue) -> Self {
		Self::Js(describe(&value))
	}
}

/// A readable rendition of a thrown JavaScript value.
pub(crate) fn describe(value: &JsValue) -> String {
	value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
