//! Client-side runtime of a generated documentation site.
//!
//! The heart of it is the [`Viewer`], which turns in-site link clicks and back/forward navigation into
//! in-place swaps of the page's content regions, backed by a small page cache.
//! It talks to the browser only through [`Host`], so it runs just as well against a scripted double.
//!
//! The rest builds the site's chrome: [`mimic`] wraps DOM element sets, [`tree`] and [`select`] model the
//! filterable API navigation, and [`site::boot`] wires everything up on a real page.

#![doc(html_root_url = "https://docs.rs/docs-runtime/0.0.3")]
#![warn(clippy::pedantic)]

pub mod cache;
pub mod chrome;
pub mod config;
pub mod error;
pub mod host;
pub mod location;
pub mod mimic;
pub mod preview;
pub mod scroll;
pub mod select;
pub mod settings;
pub mod site;
pub mod tree;
pub mod viewer;
pub mod web;

pub use error::{Error, Result};
pub use host::{Host, Regions, ScrollBehavior};
pub use location::Location;
pub use viewer::{Transition, Viewer, ViewerConfig};
