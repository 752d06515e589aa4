//! Decisions behind the site chrome that don't need a browser to make.

use crate::error::Result;
use url::Url;

/// Which navigation panel belongs to a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Panels {
	pub api: bool,
	pub doc: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chrome {
	prefix: String,
}

impl Chrome {
	pub fn new(prefix: impl Into<String>) -> Self {
		Self { prefix: prefix.into() }
	}

	#[must_use]
	pub fn prefix(&self) -> &str {
		&self.prefix
	}

	#[must_use]
	pub fn panels(&self, path: &str) -> Panels {
		let section = path.strip_prefix(self.prefix.as_str()).unwrap_or_default();
		Panels { api: section.starts_with("api/"), doc: section.starts_with("doc/") }
	}

	/// Whether the doc group with id `group` is the one for `path`.
	#[must_use]
	pub fn is_active_group(path: &str, group: &str) -> bool {
		!group.is_empty() && path.ends_with(group)
	}
}

/// The address of the section with id `section` on the page at `origin` + `path`.
#[must_use]
pub fn permalink(origin: &str, path: &str, section: &str) -> String {
	format!("{}{}#{}", origin, path, section)
}

/// A link that drafts a post sharing `link`, introduced by `text`.
pub fn share_url(link: &str, text: &str) -> Result<String> {
	Ok(Url::parse_with_params(SHARE_ENDPOINT, &[("url", link), ("text", text)])?.into())
}

const SHARE_ENDPOINT: &str = "https://twitter.com/intent/tweet";

/// The language label of a code block, from its first class (`lang-rust`, `language-java`).
#[must_use]
pub fn code_language(class: &str) -> String {
	let name = class.strip_prefix("language-").or_else(|| class.strip_prefix("lang-")).unwrap_or(class);
	name.to_uppercase()
}

/// Picks the id of the most visible section among those reported as intersecting.
///
/// Ties go to the section reported last.
pub fn most_visible<'a>(entries: impl IntoIterator<Item = (&'a str, bool, f64)>) -> Option<&'a str> {
	entries
		.into_iter()
		.filter(|&(_, intersecting, _)| intersecting)
		.fold(None, |best: Option<(&str, f64)>, (id, _, ratio)| match best {
			Some((_, best_ratio)) if best_ratio > ratio => best,
			_ => Some((id, ratio)),
		})
		.map(|(id, _)| id)
}
