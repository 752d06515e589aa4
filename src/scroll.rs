use crate::{
	host::{Host, ScrollBehavior},
	location::Location,
	viewer::Transition,
};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollTarget {
	pub top: f64,
	pub behavior: ScrollBehavior,
}

impl ScrollTarget {
	pub const TOP: Self = Self { top: 0., behavior: ScrollBehavior::Instant };
}

/// Decides where a finished transition to `location` should leave the viewport.
///
/// - History traversal to another page restores that page's saved offset.
/// - Otherwise the hash target is scrolled to, smoothly only if nothing but the hash changed.
/// - Everything else, including a hash naming no element, goes to the top.
pub fn resolve<H: Host + ?Sized>(host: &H, location: &Location, transition: Transition) -> ScrollTarget {
	if let Transition::Page { popped: true } = transition {
		return ScrollTarget {
			top: host.load_offset(&location.path).unwrap_or(0.),
			behavior: ScrollBehavior::Instant,
		};
	}

	let behavior = match transition {
		Transition::Hash => ScrollBehavior::Smooth,
		Transition::Initial | Transition::Page { .. } => ScrollBehavior::Instant,
	};
	match location.fragment() {
		Some(id) => match host.element_top(id) {
			Some(top) => ScrollTarget { top, behavior },
			None => {
				debug!(id, "Hash target not found, scrolling to top instead.");
				ScrollTarget { behavior, ..ScrollTarget::TOP }
			}
		},
		None => ScrollTarget { behavior, ..ScrollTarget::TOP },
	}
}
