use serde::{Deserialize, Serialize};
use tracing::warn;

/// The `localStorage` key the settings are kept under.
pub const STORAGE_KEY: &str = "user";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
	#[default]
	Light,
	Dark,
}

impl Theme {
	/// The class put on the root element, which is also the id of the button that selects the theme.
	#[must_use]
	pub fn class(self) -> &'static str {
		match self {
			Self::Light => "light",
			Self::Dark => "dark",
		}
	}

	#[must_use]
	pub fn from_class(class: &str) -> Option<Self> {
		match class {
			"light" => Some(Self::Light),
			"dark" => Some(Self::Dark),
			_ => None,
		}
	}
}

/// Per-visitor preferences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
	pub theme: Theme,
}

impl Settings {
	/// Reads stored settings. Anything unreadable yields the defaults.
	#[must_use]
	pub fn parse(stored: Option<&str>) -> Self {
		match stored.map(serde_json::from_str) {
			Some(Ok(settings)) => settings,
			Some(Err(error)) => {
				warn!(%error, "Ignoring unreadable settings.");
				Self::default()
			}
			None => Self::default(),
		}
	}

	#[must_use]
	pub fn to_json(&self) -> String {
		serde_json::to_string(self).unwrap_or_else(|_| String::from("{}"))
	}
}
