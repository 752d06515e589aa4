use crate::{
	chrome::Chrome,
	mimic::{document, Mimic},
	select::{Change, Selection},
	tree::{DocEntry, Root, TreeFilter, TypeEntry, TypeKind},
};
use core::cell::{Ref, RefCell};
use std::rc::Rc;
use tracing::warn;
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{Event, Node};

/// An `<o-select>` drop-down over a [`Selection`].
///
/// Every change of the selection dispatches a bubbling `change` event from the widget.
pub struct SelectView<T> {
	root: Mimic,
	selection: Rc<RefCell<Selection<T>>>,
}

impl<T: 'static> SelectView<T> {
	/// `icons` is the URL of the SVG sprite sheet, without fragment.
	pub fn new(selection: Selection<T>, icons: &str) -> Self {
		let root = Mimic::create("o-select");
		root.set(&[("disabled", selection.model().is_empty())]);

		let view = root.make("view");
		view.make("now").set_text(selection.placeholder());
		view.svg(&format!("{}#chevron", icons));
		root.svg(&format!("{}#x", icons));

		let list = root.make("ol");
		list.make_each("li", selection.model().iter().enumerate(), |(index, item), li| {
			li.set_text(&selection.label_of(item)).set_attr("data-index", &index.to_string());
		});

		let this = Self { root, selection: Rc::new(RefCell::new(selection)) };

		view.on("click", {
			let root = this.root.clone();
			move |_| {
				if root.find("ol").has("active") {
					close(&root);
				} else {
					root.find("ol, .chevron").add("active");
				}
			}
		});
		this.root.find(".x").on("click", {
			let (root, selection) = (this.root.clone(), Rc::clone(&this.selection));
			move |_| {
				selection.borrow_mut().deselect();
				root.find("li").remove("select");
				close(&root);
				refresh(&root, &selection.borrow());
			}
		});
		list.on_where("click", "li", {
			let (root, selection) = (this.root.clone(), Rc::clone(&this.selection));
			move |_, li| {
				let index = match li.get_attribute("data-index").and_then(|index| index.parse().ok()) {
					Some(index) => index,
					None => return,
				};
				let li = Mimic::from(li);
				let multiple = selection.borrow().is_multiple();
				match selection.borrow_mut().select(index) {
					Change::Unchanged => return close(&root),
					Change::Selected if !multiple => {
						root.find("li").remove("select");
						li.add("select");
						close(&root);
					}
					Change::Selected => {
						li.add("select");
					}
					Change::Deselected => {
						li.remove("select");
					}
				}
				refresh(&root, &selection.borrow());
			}
		});
		let closer = Closure::wrap(Box::new({
			let root = this.root.clone();
			move |event: Event| {
				let inside = event.target().and_then(|target| target.dyn_into::<Node>().ok()).map_or(false, |target| root.contains(&target));
				if !inside {
					close(&root);
				}
			}
		}) as Box<dyn Fn(Event)>)
		.into_js_value();
		if let Err(error) = document().add_event_listener_with_callback("click", closer.unchecked_ref()) {
			warn!("Could not listen for outside clicks: {:?}", error);
		}

		this
	}

	#[must_use]
	pub fn root(&self) -> &Mimic {
		&self.root
	}

	pub fn selection(&self) -> Ref<'_, Selection<T>> {
		self.selection.borrow()
	}
}

fn close(root: &Mimic) {
	root.find("ol, .chevron").remove("active");
}

fn refresh<T>(root: &Mimic, selection: &Selection<T>) {
	let selected = !selection.is_empty();
	root.find("now").set(&[("select", selected)]).set_text(&selection.summary());
	root.find(".x").set(&[("active", selected)]);
	root.dispatch("change");
}

/// The filterable API navigation, `#APINavi`.
pub struct ApiTree {
	root: Mimic,
	packages: SelectView<String>,
	kinds: SelectView<TypeKind>,
	name: Mimic,
	entries: Vec<(Mimic, TypeEntry)>,
}

impl ApiTree {
	/// Builds the navigation for `data`. Links are relative to `prefix`, icons come from the sprite sheet at `icons`.
	pub fn new(data: &Root, prefix: &str, icons: &str) -> Rc<Self> {
		let root = Mimic::create("o-tree");
		root.set_id("APINavi").set_hidden(true);

		let modules = SelectView::new(Selection::new(data.modules.clone(), "Select Module"), icons);
		let packages = SelectView::new(Selection::new(data.packages.clone(), "Select Package"), icons);
		let kinds = SelectView::new(Selection::with_label(TypeKind::ALL.to_vec(), "Select Type", |kind: &TypeKind| kind.name().to_owned()).multiple(true), icons);
		let name = Mimic::create("input");
		name.set_id("NameFilter").set_placeholder("Search by Name");

		root.append(modules.root()).append(packages.root()).append(kinds.root()).append(&name);

		let mut entries = Vec::new();
		let list = root.make("div");
		list.add("tree").make_each("dl", &data.packages, |package, dl| {
			dl.set_id(package);
			let dt = dl.make("dt");
			dt.make("code").set_text(package);
			dt.on("click", {
				let dl = dl.clone();
				move |_| {
					dl.toggle("show");
				}
			});

			for entry in data.types_in(package) {
				let dd = dl.make("dd");
				dd.add(entry.kind.name());
				dd.make("code").make("a").set_href(&entry.href(prefix)).set_text(&entry.name);
				entries.push((dd, entry.clone()));
			}
		});

		let tree = Rc::new(Self { root, packages, kinds, name, entries });
		for event in ["change", "input"] {
			let weak = Rc::downgrade(&tree);
			tree.root.on(event, move |_| {
				if let Some(tree) = weak.upgrade() {
					tree.update();
				}
			});
		}
		tree
	}

	#[must_use]
	pub fn root(&self) -> &Mimic {
		&self.root
	}

	#[must_use]
	pub fn filter(&self) -> TreeFilter {
		TreeFilter {
			kinds: self.kinds.selection().selected().copied().collect(),
			packages: self.packages.selection().selected().cloned().collect(),
			name: self.name.value(),
		}
	}

	/// Shows the types matching the current filter.
	pub fn update(&self) {
		let filter = self.filter();
		self.root.find("dl").set(&[("expand", filter.is_active())]);
		for (dd, entry) in &self.entries {
			dd.show(filter.matches(entry));
		}
	}
}

/// The documentation navigation, `#DocNavi`: one group per page with its headings below it.
pub fn doc_navi(docs: &[DocEntry], icons: &str) -> Mimic {
	let chevrons = format!("{}#chevrons", icons);
	let navi = Mimic::create("div");
	navi.set_id("DocNavi").set_hidden(true);
	navi.make_each("div", docs, |doc, group| {
		group.add("doc").set_id(&doc.path);
		group.make("a").set_href(&doc.path).set_text(&doc.title);
		group.make("ol").add("sub").make_each("li", &doc.subs, |sub, li| {
			let link = li.make("a");
			link.set_href(&sub.path).svg(&chevrons);
			link.make("span").set_text(&sub.title);
			li.make_each("a", &sub.subs, |foot, link| {
				link.set_href(&foot.path).svg(&chevrons);
				link.make("span").add("foot").set_text(&foot.title);
			});
		});
	});
	navi
}

/// Marks the `#DocNavi` group of the page at `path` as active and unfolds its outline, folding all others.
pub fn expand_doc_groups(path: &str) {
	for group in Mimic::select("#DocNavi>div").nodes() {
		let active = Chrome::is_active_group(path, &group.id());
		let group = Mimic::from(group.clone());
		group.set(&[("active", active)]);
		let outline = group.last();
		let height = match outline.node() {
			Some(outline) if active => format!("{}px", outline.scroll_height()),
			_ => "0".to_owned(),
		};
		outline.css("height", &height);
	}
}
