use crate::error::Result;
use url::Url;

/// The parts of a URL the page viewer cares about.
///
/// This describes both the browser's current location and the target of an anchor.
/// `hash` keeps its leading `#` and is empty when there is no fragment, like `Location.hash` does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
	pub href: String,
	pub origin: String,
	pub path: String,
	pub hash: String,
}

impl Location {
	pub fn parse(href: &str) -> Result<Self> {
		let url = Url::parse(href)?;
		Ok(Self::from(&url))
	}

	/// Resolves `href` against `self`, the way an anchor's `href` attribute is resolved.
	pub fn join(&self, href: &str) -> Result<Self> {
		let url = Url::parse(&self.href)?.join(href)?;
		Ok(Self::from(&url))
	}

	/// The id the hash points at, if any.
	#[must_use]
	pub fn fragment(&self) -> Option<&str> {
		self.hash.strip_prefix('#').filter(|id| !id.is_empty())
	}

	#[must_use]
	pub fn same_origin(&self, other: &Self) -> bool {
		self.origin == other.origin
	}
}

impl From<&Url> for Location {
	fn from(url: &Url) -> Self {
		Self {
			href: url.as_str().to_owned(),
			origin: url.origin().ascii_serialization(),
			path: url.path().to_owned(),
			hash: url.fragment().filter(|fragment| !fragment.is_empty()).map(|fragment| format!("#{}", fragment)).unwrap_or_default(),
		}
	}
}
