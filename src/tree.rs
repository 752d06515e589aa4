//! The generated description of the documented project, and filtering of its API types.

use crate::error::Result;
use hashbrown::HashSet;
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Root {
	pub docs: Vec<DocEntry>,
	pub modules: Vec<String>,
	pub packages: Vec<String>,
	pub types: Vec<TypeEntry>,
}

impl Root {
	/// Parses the generated data file's JSON.
	pub fn from_json(json: &str) -> Result<Self> {
		Ok(serde_json::from_str(json)?)
	}

	/// The types declared in `package`, in data file order.
	pub fn types_in<'a>(&'a self, package: &'a str) -> impl Iterator<Item = &'a TypeEntry> + 'a {
		self.types.iter().filter(move |entry| entry.package_name == package)
	}
}

/// A documentation page, with up to two levels of headings below it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DocEntry {
	pub path: String,
	pub title: String,
	#[serde(default)]
	pub subs: Vec<DocEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeEntry {
	pub name: String,
	pub package_name: String,
	#[serde(rename = "type")]
	pub kind: TypeKind,
}

impl TypeEntry {
	#[must_use]
	pub fn qualified_name(&self) -> String {
		format!("{}.{}", self.package_name, self.name)
	}

	/// Where the generated page for this type lives, below the site prefix.
	#[must_use]
	pub fn href(&self, prefix: &str) -> String {
		format!("{}api/{}.html", prefix, self.qualified_name())
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum TypeKind {
	Interface,
	Functional,
	AbstractClass,
	Class,
	Enum,
	Annotation,
	Exception,
}

impl TypeKind {
	pub const ALL: [Self; 7] = [Self::Interface, Self::Functional, Self::AbstractClass, Self::Class, Self::Enum, Self::Annotation, Self::Exception];

	#[must_use]
	pub fn name(self) -> &'static str {
		match self {
			Self::Interface => "Interface",
			Self::Functional => "Functional",
			Self::AbstractClass => "AbstractClass",
			Self::Class => "Class",
			Self::Enum => "Enum",
			Self::Annotation => "Annotation",
			Self::Exception => "Exception",
		}
	}
}

/// The criteria of the API navigation. Empty criteria don't filter.
#[derive(Debug, Clone, Default)]
pub struct TreeFilter {
	pub kinds: HashSet<TypeKind>,
	pub packages: HashSet<String>,
	pub name: String,
}

impl TreeFilter {
	#[must_use]
	pub fn matches(&self, entry: &TypeEntry) -> bool {
		if !self.kinds.is_empty() && !self.kinds.contains(&entry.kind) {
			return false;
		}
		if !self.packages.is_empty() && !self.packages.contains(&entry.package_name) {
			return false;
		}
		self.name.is_empty() || entry.qualified_name().to_lowercase().contains(&self.name.to_lowercase())
	}

	/// Whether any criterion is set, in which case all packages are shown expanded.
	#[must_use]
	pub fn is_active(&self) -> bool {
		!self.kinds.is_empty() || !self.packages.is_empty() || !self.name.is_empty()
	}
}
