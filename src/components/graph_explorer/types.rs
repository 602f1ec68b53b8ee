//! Graph data structures for input to the explorer component.
//!
//! Nodes and links are plain value types keyed by opaque string ids. Every
//! derived relationship the engine maintains (adjacency, selection, curvature,
//! label boxes, pinned positions) is keyed by the same id space, so the ids get
//! distinct newtypes to keep node and link keys from mixing.

use std::fmt;

use serde::Deserialize;

/// Opaque, unique identifier of a node.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

/// Opaque, unique identifier of a link.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct LinkId(pub String);

impl NodeId {
	/// The raw id string.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl LinkId {
	/// The raw id string.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl fmt::Display for LinkId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for NodeId {
	fn from(s: &str) -> Self {
		Self(s.to_string())
	}
}

impl From<&str> for LinkId {
	fn from(s: &str) -> Self {
		Self(s.to_string())
	}
}

/// A node (entity) in the graph.
#[derive(Clone, Debug, Deserialize)]
pub struct GraphNode {
	/// Unique identifier. Referenced by links and by every derived index.
	pub id: NodeId,
	/// Display name rendered under the node.
	pub name: String,
	/// Category tags, used for slice coloring and host-side filtering.
	#[serde(default)]
	pub labels: Vec<String>,
}

/// A directed link (relation) between two nodes.
#[derive(Clone, Debug, Deserialize)]
pub struct GraphLink {
	/// Unique identifier, distinct from both endpoint ids.
	pub id: LinkId,
	/// Display name rendered at the link's midpoint.
	pub name: String,
	/// Source node id.
	pub source: NodeId,
	/// Target node id.
	pub target: NodeId,
}

impl GraphLink {
	/// Whether source and target are the same node.
	pub fn is_self_loop(&self) -> bool {
		self.source == self.target
	}
}

/// Bulk graph payload: nodes and links, in the order they should be inserted.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphData {
	/// Nodes to insert, in order.
	pub nodes: Vec<GraphNode>,
	/// Links to insert, in order. Endpoints must appear in `nodes` or already
	/// exist in the store, or the link is dropped.
	pub links: Vec<GraphLink>,
}

/// World-space rectangle occupied by a rendered display name.
///
/// Captured by the render pass as a side effect of measuring text, then fed to
/// the label-overlap resolver.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelBox {
	/// Left edge.
	pub x: f64,
	/// Top edge.
	pub y: f64,
	/// Box width.
	pub width: f64,
	/// Box height.
	pub height: f64,
}

impl LabelBox {
	/// Axis-aligned rectangle intersection test. Touching edges do not count
	/// as overlap.
	pub fn overlaps(&self, other: &LabelBox) -> bool {
		self.x < other.x + other.width
			&& self.x + self.width > other.x
			&& self.y < other.y + other.height
			&& self.y + self.height > other.y
	}
}
