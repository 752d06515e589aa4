//! Where the site's assets live, and how it reloads during local development.

use crate::error::Result;
use core::time::Duration;
use url::Url;

/// Polling setup for a local development server that answers `200` once the site has been rebuilt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveReload {
	pub endpoint: String,
	pub interval: Duration,
}

impl Default for LiveReload {
	fn default() -> Self {
		Self { endpoint: "http://localhost:9321/live".to_owned(), interval: Duration::from_secs(3) }
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
	/// Path of the directory the runtime was loaded from, with trailing `/`. Generated pages and icons are relative to it.
	pub prefix: String,
	pub live_reload: Option<LiveReload>,
}

impl SiteConfig {
	/// Derives the configuration from the URL of the module that boots the runtime.
	///
	/// # Errors
	///
	/// Iff `module_url` is not an absolute URL.
	pub fn from_module_url(module_url: &str) -> Result<Self> {
		let url = Url::parse(module_url)?;
		let path = url.path();
		let prefix = path.rfind('/').map_or("/", |end| &path[..=end]).to_owned();
		let live_reload = (url.host_str() == Some("localhost")).then(LiveReload::default);
		Ok(Self { prefix, live_reload })
	}

	/// The sprite sheet holding the chrome's icons.
	#[must_use]
	pub fn icons(&self) -> String {
		format!("{}main.svg", self.prefix)
	}
}
