//! Selection and tool state machine.
//!
//! Raw pointer events arrive from the component already classified as "click
//! on node X", "click on link Y", "click on background", or rectangular-drag
//! verbs; this module turns them into selection changes under the currently
//! active tool. Exactly one tool is active at a time and switching tools
//! never clears the existing selection.
//!
//! Destructive tools mutate the store directly (`Remove` cascades and
//! commits); generative tools return an [`ExpandRequest`] for the component
//! to hand to its [`GraphSource`](super::source::GraphSource). Group dragging
//! lives in the layout adapter because it moves simulation positions, not
//! selection.

use std::collections::HashSet;

use super::source::ExpandDirection;
use super::store::GraphStore;
use super::types::{LinkId, NodeId};

/// The active interaction mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tool {
	/// Select, multi-select, drag nodes, pan: the default.
	#[default]
	Move,
	/// Drag a rectangle to select the nodes inside it.
	RectangularSelection,
	/// Click a node to pull in its outgoing neighbors.
	ExpandOutgoing,
	/// Click a node to pull in its incoming neighbors.
	ExpandIncoming,
	/// Click a node or link to delete it.
	Remove,
}

impl Tool {
	/// Every tool, in toolbar order.
	pub const ALL: [Tool; 5] = [
		Tool::Move,
		Tool::RectangularSelection,
		Tool::ExpandOutgoing,
		Tool::ExpandIncoming,
		Tool::Remove,
	];

	/// Human-readable tooltip for the toolbar.
	pub fn title(self) -> &'static str {
		match self {
			Tool::Move => "Move",
			Tool::RectangularSelection => "Rectangle selection",
			Tool::ExpandOutgoing => "Expand outgoing",
			Tool::ExpandIncoming => "Expand incoming",
			Tool::Remove => "Remove",
		}
	}

	/// Short glyph shown on the toolbar button.
	pub fn glyph(self) -> &'static str {
		match self {
			Tool::Move => "\u{2196}",               // arrow
			Tool::RectangularSelection => "\u{25a2}", // rectangle
			Tool::ExpandOutgoing => "\u{2197}",
			Tool::ExpandIncoming => "\u{2199}",
			Tool::Remove => "\u{2715}",
		}
	}
}

/// Modifier keys held during a pointer event. Any of them switches clicks
/// and rectangle drags into multi-select mode.
#[derive(Clone, Copy, Debug, Default)]
pub struct Modifiers {
	pub alt: bool,
	pub ctrl: bool,
	pub shift: bool,
}

impl Modifiers {
	/// Whether any multi-select modifier is held.
	pub fn any(self) -> bool {
		self.alt || self.ctrl || self.shift
	}
}

/// A click on an expand tool, to be served by the host's graph source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpandRequest {
	/// The clicked node.
	pub id: NodeId,
	/// Which adjacency direction to expand.
	pub direction: ExpandDirection,
}

/// In-progress rectangular selection, in widget-local pixels.
#[derive(Clone, Debug)]
pub struct RectDraft {
	/// Drag start corner.
	pub start: (f64, f64),
	/// Current drag corner.
	pub current: (f64, f64),
	/// Nodes currently inside the rectangle, excluding already-selected
	/// ones. Unioned into the selection when the drag ends.
	pub candidates: HashSet<NodeId>,
}

impl RectDraft {
	/// The rectangle as `(min_x, min_y, max_x, max_y)`.
	pub fn bounds(&self) -> (f64, f64, f64, f64) {
		(
			self.start.0.min(self.current.0),
			self.start.1.min(self.current.1),
			self.start.0.max(self.current.0),
			self.start.1.max(self.current.1),
		)
	}
}

/// Selection sets, hover state, and the active tool.
#[derive(Clone, Debug, Default)]
pub struct ToolState {
	tool: Tool,
	/// Selected node ids. Every id must exist in the store; removals purge.
	pub selected_nodes: HashSet<NodeId>,
	/// Selected link ids.
	pub selected_links: HashSet<LinkId>,
	/// At most one hovered node, render emphasis only.
	pub hovered_node: Option<NodeId>,
	/// At most one hovered link.
	pub hovered_link: Option<LinkId>,
	/// The rectangle drag in progress, if any.
	pub rect: Option<RectDraft>,
}

impl ToolState {
	/// Default state: `Move` tool, nothing selected, nothing hovered.
	pub fn new() -> Self {
		Self::default()
	}

	/// The active tool.
	pub fn tool(&self) -> Tool {
		self.tool
	}

	/// Activates a tool. Selection survives the switch; an unfinished
	/// rectangle draft does not.
	pub fn set_tool(&mut self, tool: Tool) {
		self.tool = tool;
		if tool != Tool::RectangularSelection {
			self.rect = None;
		}
	}

	/// A click landed on a node. Returns an [`ExpandRequest`] when the
	/// active tool defers to the host's graph source.
	pub fn node_click(
		&mut self,
		store: &mut GraphStore,
		id: &NodeId,
		modifiers: Modifiers,
	) -> Option<ExpandRequest> {
		match self.tool {
			Tool::Move => {
				if modifiers.any() {
					if !self.selected_nodes.remove(id) {
						self.selected_nodes.insert(id.clone());
					}
				} else {
					self.selected_nodes.clear();
					self.selected_nodes.insert(id.clone());
					self.selected_links.clear();
				}
				None
			}
			Tool::ExpandOutgoing => Some(ExpandRequest {
				id: id.clone(),
				direction: ExpandDirection::Outgoing,
			}),
			Tool::ExpandIncoming => Some(ExpandRequest {
				id: id.clone(),
				direction: ExpandDirection::Incoming,
			}),
			Tool::Remove => {
				store.remove_node(id);
				store.commit();
				self.prune(store);
				None
			}
			Tool::RectangularSelection => None,
		}
	}

	/// A click landed on a link.
	pub fn link_click(&mut self, store: &mut GraphStore, id: &LinkId, modifiers: Modifiers) {
		match self.tool {
			Tool::Move => {
				if modifiers.any() {
					if !self.selected_links.remove(id) {
						self.selected_links.insert(id.clone());
					}
				} else {
					self.selected_links.clear();
					self.selected_links.insert(id.clone());
					self.selected_nodes.clear();
				}
			}
			Tool::Remove => {
				store.remove_link(id);
				store.commit();
				self.prune(store);
			}
			Tool::ExpandOutgoing | Tool::ExpandIncoming | Tool::RectangularSelection => {}
		}
	}

	/// A click landed on empty background. Clears the selection under the
	/// `Move` tool; inert otherwise.
	pub fn background_click(&mut self) {
		if self.tool == Tool::Move {
			self.selected_nodes.clear();
			self.selected_links.clear();
		}
	}

	/// Starts a rectangle drag at widget-local `(x, y)`. Without a modifier
	/// the existing node selection is cleared first.
	pub fn begin_rect(&mut self, x: f64, y: f64, modifiers: Modifiers) {
		if !modifiers.any() {
			self.selected_nodes.clear();
		}
		self.rect = Some(RectDraft {
			start: (x, y),
			current: (x, y),
			candidates: HashSet::new(),
		});
	}

	/// Drags the rectangle to `(x, y)` and recomputes which nodes fall
	/// inside it. `screen_to_graph` converts widget-local pixels into the
	/// layout engine's coordinate space; `positions` are current layout
	/// positions per node. Already-selected nodes are never candidates.
	pub fn update_rect<'a>(
		&mut self,
		x: f64,
		y: f64,
		screen_to_graph: impl Fn(f64, f64) -> (f64, f64),
		positions: impl IntoIterator<Item = (&'a NodeId, &'a (f64, f64))>,
	) {
		let Some(rect) = self.rect.as_mut() else {
			return;
		};
		rect.current = (x, y);

		let (min_x, min_y, max_x, max_y) = rect.bounds();
		let (gx1, gy1) = screen_to_graph(min_x, min_y);
		let (gx2, gy2) = screen_to_graph(max_x, max_y);

		rect.candidates = positions
			.into_iter()
			.filter(|(id, _)| !self.selected_nodes.contains(id))
			.filter(|(_, (px, py))| *px >= gx1 && *px <= gx2 && *py >= gy1 && *py <= gy2)
			.map(|(id, _)| id.clone())
			.collect();
	}

	/// Ends the rectangle drag: candidates join the selection, the draft is
	/// discarded, and the tool reverts to `Move`.
	pub fn finish_rect(&mut self) {
		if let Some(rect) = self.rect.take() {
			self.selected_nodes.extend(rect.candidates);
		}
		self.tool = Tool::Move;
	}

	/// Whether a node is a live rectangle-selection candidate.
	pub fn is_rect_candidate(&self, id: &NodeId) -> bool {
		self.rect
			.as_ref()
			.is_some_and(|rect| rect.candidates.contains(id))
	}

	/// Drops selection and hover entries whose entity left the store.
	pub fn prune(&mut self, store: &GraphStore) {
		self.selected_nodes.retain(|id| store.contains_node(id));
		self.selected_links.retain(|id| store.contains_link(id));
		if let Some(id) = &self.hovered_node {
			if !store.contains_node(id) {
				self.hovered_node = None;
			}
		}
		if let Some(id) = &self.hovered_link {
			if !store.contains_link(id) {
				self.hovered_link = None;
			}
		}
	}
}
