//! Label overlap suppression.
//!
//! Drawing every node and link name unconditionally turns into unreadable
//! clutter once labels start overlapping on screen. The resolver sweeps the
//! elements in a fixed order (nodes in snapshot order, then links) and hides
//! every later label whose box intersects an earlier, still-visible one. The
//! sweep is greedy and order-dependent on purpose: the first-added element
//! always keeps its label, which keeps the outcome stable across frames.
//!
//! Boxes are captured by the render pass as a side effect of measuring text,
//! so a resolve is only meaningful after at least one render. The `dirty`
//! latch records that the viewport or the element set changed; the frame loop
//! resolves once the next render pass has refreshed the boxes.

use std::collections::{HashMap, HashSet};

use super::store::GraphSnapshot;
use super::types::{LabelBox, LinkId, NodeId};

/// Per-element label boxes and visibility decisions.
#[derive(Clone, Debug, Default)]
pub struct LabelLayout {
	node_boxes: HashMap<NodeId, LabelBox>,
	link_boxes: HashMap<LinkId, LabelBox>,
	hidden_nodes: HashSet<NodeId>,
	hidden_links: HashSet<LinkId>,
	dirty: bool,
}

impl LabelLayout {
	/// Creates an empty layout with every label visible.
	pub fn new() -> Self {
		Self::default()
	}

	/// Records the measured box of a node's label.
	pub fn set_node_box(&mut self, id: NodeId, label_box: LabelBox) {
		self.node_boxes.insert(id, label_box);
	}

	/// Records the measured box of a link's label.
	pub fn set_link_box(&mut self, id: LinkId, label_box: LabelBox) {
		self.link_boxes.insert(id, label_box);
	}

	/// Whether this node's label should be drawn. Nodes without a recorded
	/// box default to visible.
	pub fn node_label_visible(&self, id: &NodeId) -> bool {
		!self.hidden_nodes.contains(id)
	}

	/// Whether this link's label should be drawn.
	pub fn link_label_visible(&self, id: &LinkId) -> bool {
		!self.hidden_links.contains(id)
	}

	/// Marks the layout stale (viewport zoomed, element set changed). The
	/// frame loop checks [`LabelLayout::take_dirty`] after the next
	/// box-capturing render and resolves then.
	pub fn mark_dirty(&mut self) {
		self.dirty = true;
	}

	/// Clears and returns the dirty latch.
	pub fn take_dirty(&mut self) -> bool {
		std::mem::take(&mut self.dirty)
	}

	/// Drops boxes and visibility decisions for elements no longer in the
	/// snapshot.
	pub fn retain(&mut self, snapshot: &GraphSnapshot) {
		let nodes: HashSet<&NodeId> = snapshot.nodes.iter().map(|n| &n.id).collect();
		let links: HashSet<&LinkId> = snapshot.links.iter().map(|l| &l.id).collect();

		self.node_boxes.retain(|id, _| nodes.contains(id));
		self.hidden_nodes.retain(|id| nodes.contains(id));
		self.link_boxes.retain(|id, _| links.contains(id));
		self.hidden_links.retain(|id| links.contains(id));
	}

	/// Recomputes visibility over the snapshot's elements.
	///
	/// Every element starts visible. Elements are swept in snapshot order,
	/// nodes first; each still-visible element hides every later element
	/// whose box overlaps its own. Elements without a recorded box neither
	/// suppress nor get suppressed. O(n^2) over elements with boxes, which
	/// stays small because only on-screen labels get measured.
	pub fn resolve(&mut self, snapshot: &GraphSnapshot) {
		self.hidden_nodes.clear();
		self.hidden_links.clear();

		enum Element<'a> {
			Node(&'a NodeId),
			Link(&'a LinkId),
		}

		let mut elements: Vec<(Element<'_>, LabelBox)> = Vec::new();
		for node in &snapshot.nodes {
			if let Some(b) = self.node_boxes.get(&node.id) {
				elements.push((Element::Node(&node.id), *b));
			}
		}
		for link in &snapshot.links {
			if let Some(b) = self.link_boxes.get(&link.id) {
				elements.push((Element::Link(&link.id), *b));
			}
		}

		let mut hidden = vec![false; elements.len()];
		for i in 0..elements.len() {
			if hidden[i] {
				continue;
			}
			for j in (i + 1)..elements.len() {
				if !hidden[j] && elements[i].1.overlaps(&elements[j].1) {
					hidden[j] = true;
				}
			}
		}

		for (i, (element, _)) in elements.iter().enumerate() {
			if !hidden[i] {
				continue;
			}
			match element {
				Element::Node(id) => {
					self.hidden_nodes.insert((*id).clone());
				}
				Element::Link(id) => {
					self.hidden_links.insert((*id).clone());
				}
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::graph_explorer::types::{GraphLink, GraphNode};

	fn node(id: &str) -> GraphNode {
		GraphNode {
			id: NodeId::from(id),
			name: id.to_string(),
			labels: Vec::new(),
		}
	}

	fn link(id: &str, source: &str, target: &str) -> GraphLink {
		GraphLink {
			id: LinkId::from(id),
			name: id.to_string(),
			source: NodeId::from(source),
			target: NodeId::from(target),
		}
	}

	fn boxed(x: f64, y: f64) -> LabelBox {
		LabelBox {
			x,
			y,
			width: 10.0,
			height: 4.0,
		}
	}

	fn snapshot(nodes: Vec<GraphNode>, links: Vec<GraphLink>) -> GraphSnapshot {
		GraphSnapshot { nodes, links }
	}

	#[test]
	fn earlier_element_wins_overlap() {
		let snap = snapshot(vec![node("a"), node("b")], vec![]);
		let mut layout = LabelLayout::new();
		layout.set_node_box(NodeId::from("a"), boxed(0.0, 0.0));
		layout.set_node_box(NodeId::from("b"), boxed(5.0, 2.0));

		layout.resolve(&snap);
		assert!(layout.node_label_visible(&NodeId::from("a")));
		assert!(!layout.node_label_visible(&NodeId::from("b")));
	}

	#[test]
	fn nodes_take_priority_over_links() {
		let snap = snapshot(vec![node("a"), node("b")], vec![link("e", "a", "b")]);
		let mut layout = LabelLayout::new();
		// the link box overlaps the first node's box
		layout.set_node_box(NodeId::from("a"), boxed(0.0, 0.0));
		layout.set_node_box(NodeId::from("b"), boxed(100.0, 0.0));
		layout.set_link_box(LinkId::from("e"), boxed(5.0, 0.0));

		layout.resolve(&snap);
		assert!(layout.node_label_visible(&NodeId::from("a")));
		assert!(layout.node_label_visible(&NodeId::from("b")));
		assert!(!layout.link_label_visible(&LinkId::from("e")));
	}

	#[test]
	fn hidden_elements_do_not_suppress() {
		// b overlaps a (hidden), c overlaps b but not a, so c stays visible
		let snap = snapshot(vec![node("a"), node("b"), node("c")], vec![]);
		let mut layout = LabelLayout::new();
		layout.set_node_box(NodeId::from("a"), boxed(0.0, 0.0));
		layout.set_node_box(NodeId::from("b"), boxed(8.0, 0.0));
		layout.set_node_box(NodeId::from("c"), boxed(16.0, 0.0));

		layout.resolve(&snap);
		assert!(layout.node_label_visible(&NodeId::from("a")));
		assert!(!layout.node_label_visible(&NodeId::from("b")));
		assert!(layout.node_label_visible(&NodeId::from("c")));
	}

	#[test]
	fn elements_without_boxes_stay_visible() {
		let snap = snapshot(vec![node("a"), node("b")], vec![]);
		let mut layout = LabelLayout::new();
		layout.set_node_box(NodeId::from("a"), boxed(0.0, 0.0));

		layout.resolve(&snap);
		assert!(layout.node_label_visible(&NodeId::from("a")));
		assert!(layout.node_label_visible(&NodeId::from("b")));
	}

	#[test]
	fn resolve_recovers_visibility() {
		let snap = snapshot(vec![node("a"), node("b")], vec![]);
		let mut layout = LabelLayout::new();
		layout.set_node_box(NodeId::from("a"), boxed(0.0, 0.0));
		layout.set_node_box(NodeId::from("b"), boxed(5.0, 0.0));
		layout.resolve(&snap);
		assert!(!layout.node_label_visible(&NodeId::from("b")));

		// boxes drift apart (zoomed in); next resolve shows both again
		layout.set_node_box(NodeId::from("b"), boxed(50.0, 0.0));
		layout.resolve(&snap);
		assert!(layout.node_label_visible(&NodeId::from("b")));
	}

	#[test]
	fn retain_drops_departed_elements() {
		let mut layout = LabelLayout::new();
		layout.set_node_box(NodeId::from("a"), boxed(0.0, 0.0));
		layout.set_node_box(NodeId::from("gone"), boxed(5.0, 0.0));
		layout.set_link_box(LinkId::from("e-gone"), boxed(7.0, 0.0));
		layout.resolve(&snapshot(vec![node("a"), node("gone")], vec![]));

		layout.retain(&snapshot(vec![node("a")], vec![]));
		layout.resolve(&snapshot(vec![node("a")], vec![]));
		assert!(layout.node_label_visible(&NodeId::from("a")));
	}

	#[test]
	fn dirty_latch_is_one_shot() {
		let mut layout = LabelLayout::new();
		assert!(!layout.take_dirty());

		layout.mark_dirty();
		assert!(layout.take_dirty());
		assert!(!layout.take_dirty());
	}
}
