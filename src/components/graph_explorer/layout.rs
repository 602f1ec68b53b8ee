//! Adapter over the external force simulation.
//!
//! The physics itself belongs to the `force_graph` crate; this module owns
//! the mapping between store ids and simulation nodes. The simulation is
//! rebuilt from scratch on every commit, carrying positions and anchors over
//! by id, which keeps the adapter free of incremental-removal bookkeeping:
//! nodes that left the snapshot simply do not come back.
//!
//! Dragged nodes become anchors so the simulation stops moving them.
//! Self-loops contribute no spring; they are a render-only concern.

use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::store::GraphSnapshot;
use super::types::NodeId;

/// Parameters handed to the force simulation.
#[derive(Clone, Debug)]
pub struct SimulationConfig {
	pub force_charge: f32,
	pub force_spring: f32,
	pub force_max: f32,
	pub node_speed: f32,
	pub damping_factor: f32,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		Self {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		}
	}
}

/// Pan and zoom transform between widget-local pixels and graph coordinates.
#[derive(Clone, Debug)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Zoom factor, clamped to 0.1..10.0.
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	/// Converts widget-local pixels to graph coordinates.
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	/// Zooms by `factor` about the widget-local point `(sx, sy)`, keeping
	/// that point fixed on screen.
	pub fn zoom_about(&mut self, sx: f64, sy: f64, factor: f64) {
		let new_k = (self.k * factor).clamp(0.1, 10.0);
		let ratio = new_k / self.k;
		self.x = sx - (sx - self.x) * ratio;
		self.y = sy - (sy - self.y) * ratio;
		self.k = new_k;
	}
}

/// Simulation node payload: the store id, so positions map back.
#[derive(Clone, Debug)]
struct NodeBody {
	id: NodeId,
}

/// The force simulation keyed by store ids.
pub struct GraphLayout {
	graph: ForceGraph<NodeBody, ()>,
	index: HashMap<NodeId, DefaultNodeIdx>,
	config: SimulationConfig,
	width: f64,
	height: f64,
}

impl GraphLayout {
	/// An empty simulation for a viewport of the given size.
	pub fn new(width: f64, height: f64, config: SimulationConfig) -> Self {
		Self {
			graph: Self::make_graph(&config),
			index: HashMap::new(),
			config,
			width,
			height,
		}
	}

	fn make_graph(config: &SimulationConfig) -> ForceGraph<NodeBody, ()> {
		ForceGraph::new(SimulationParameters {
			force_charge: config.force_charge,
			force_spring: config.force_spring,
			force_max: config.force_max,
			node_speed: config.node_speed,
			damping_factor: config.damping_factor,
		})
	}

	/// Rebuilds the simulation from a fresh snapshot.
	///
	/// Nodes already simulated keep their position and anchor state; new
	/// nodes are seeded on a circle around the viewport center. Links add
	/// springs, except self-loops.
	pub fn rebuild(&mut self, snapshot: &GraphSnapshot) {
		let mut carry: HashMap<NodeId, (f32, f32, bool)> = HashMap::new();
		self.graph.visit_nodes(|node| {
			carry.insert(
				node.data.user_data.id.clone(),
				(node.x(), node.y(), node.data.is_anchor),
			);
		});

		self.graph = Self::make_graph(&self.config);
		self.index.clear();

		let total = snapshot.nodes.len().max(1);
		for (i, node) in snapshot.nodes.iter().enumerate() {
			let (x, y, is_anchor) = carry.get(&node.id).copied().unwrap_or_else(|| {
				let angle = i as f64 * 2.0 * PI / total as f64;
				(
					(self.width / 2.0 + 100.0 * angle.cos()) as f32,
					(self.height / 2.0 + 100.0 * angle.sin()) as f32,
					false,
				)
			});

			let idx = self.graph.add_node(NodeData {
				x,
				y,
				mass: 10.0,
				is_anchor,
				user_data: NodeBody {
					id: node.id.clone(),
				},
			});
			self.index.insert(node.id.clone(), idx);
		}

		for link in &snapshot.links {
			if link.is_self_loop() {
				continue;
			}
			if let (Some(&src), Some(&tgt)) =
				(self.index.get(&link.source), self.index.get(&link.target))
			{
				self.graph.add_edge(src, tgt, EdgeData::default());
			}
		}
	}

	/// Advances the simulation by `dt` seconds.
	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
	}

	/// Current position of every simulated node, in graph coordinates.
	pub fn positions(&self) -> HashMap<NodeId, (f64, f64)> {
		let mut positions = HashMap::with_capacity(self.index.len());
		self.graph.visit_nodes(|node| {
			positions.insert(
				node.data.user_data.id.clone(),
				(node.x() as f64, node.y() as f64),
			);
		});
		positions
	}

	/// The topmost node within `hit_radius` of graph point `(gx, gy)`.
	pub fn node_at(&self, gx: f64, gy: f64, hit_radius: f64) -> Option<NodeId> {
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			if (dx * dx + dy * dy).sqrt() < hit_radius {
				found = Some(node.data.user_data.id.clone());
			}
		});
		found
	}

	/// Moves every listed node by the same graph-space delta and anchors it
	/// so the simulation does not pull it back. Backs the group drag.
	pub fn translate(&mut self, ids: &HashSet<NodeId>, dx: f64, dy: f64) {
		self.graph.visit_nodes_mut(|node| {
			if ids.contains(&node.data.user_data.id) {
				node.data.x += dx as f32;
				node.data.y += dy as f32;
				node.data.is_anchor = true;
			}
		});
	}

	/// Pins a node at its current position.
	pub fn anchor(&mut self, id: &NodeId) {
		self.graph.visit_nodes_mut(|node| {
			if node.data.user_data.id == *id {
				node.data.is_anchor = true;
			}
		});
	}

	/// Whether a node is currently pinned.
	#[allow(dead_code, reason = "completes the pinning API alongside anchor/translate")]
	pub fn is_anchored(&self, id: &NodeId) -> bool {
		let mut anchored = false;
		self.graph.visit_nodes(|node| {
			if node.data.user_data.id == *id {
				anchored = node.data.is_anchor;
			}
		});
		anchored
	}

	/// Updates the viewport size used to seed new nodes.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::graph_explorer::types::{GraphLink, GraphNode, LinkId};

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

	fn snapshot(nodes: Vec<GraphNode>, links: Vec<GraphLink>) -> GraphSnapshot {
		GraphSnapshot { nodes, links }
	}

	#[test]
	fn rebuild_seeds_every_snapshot_node() {
		let mut layout = GraphLayout::new(800.0, 600.0, SimulationConfig::default());
		layout.rebuild(&snapshot(
			vec![node("a"), node("b")],
			vec![link("e", "a", "b"), link("s", "a", "a")],
		));

		let positions = layout.positions();
		assert_eq!(positions.len(), 2);
		assert!(positions.contains_key(&NodeId::from("a")));
	}

	#[test]
	fn rebuild_carries_positions_and_anchors_over() {
		let mut layout = GraphLayout::new(800.0, 600.0, SimulationConfig::default());
		layout.rebuild(&snapshot(vec![node("a")], vec![]));

		let ids = HashSet::from([NodeId::from("a")]);
		layout.translate(&ids, 37.0, -12.0);
		let before = layout.positions()[&NodeId::from("a")];

		layout.rebuild(&snapshot(vec![node("a"), node("b")], vec![]));
		let after = layout.positions()[&NodeId::from("a")];
		assert!((after.0 - before.0).abs() < 1e-3);
		assert!((after.1 - before.1).abs() < 1e-3);
		assert!(layout.is_anchored(&NodeId::from("a")));
		assert!(!layout.is_anchored(&NodeId::from("b")));
	}

	#[test]
	fn removed_nodes_do_not_survive_rebuild() {
		let mut layout = GraphLayout::new(800.0, 600.0, SimulationConfig::default());
		layout.rebuild(&snapshot(vec![node("a"), node("b")], vec![]));
		layout.rebuild(&snapshot(vec![node("b")], vec![]));

		assert_eq!(layout.positions().len(), 1);
		assert!(layout.node_at(0.0, 0.0, 1e9).is_some());
	}

	#[test]
	fn node_at_respects_hit_radius() {
		let mut layout = GraphLayout::new(800.0, 600.0, SimulationConfig::default());
		layout.rebuild(&snapshot(vec![node("a")], vec![]));
		let (x, y) = layout.positions()[&NodeId::from("a")];

		assert_eq!(layout.node_at(x + 2.0, y, 5.0), Some(NodeId::from("a")));
		assert_eq!(layout.node_at(x + 50.0, y, 5.0), None);
	}

	#[test]
	fn translate_moves_listed_nodes_together() {
		let mut layout = GraphLayout::new(800.0, 600.0, SimulationConfig::default());
		layout.rebuild(&snapshot(vec![node("a"), node("b"), node("c")], vec![]));
		let before = layout.positions();

		let ids = HashSet::from([NodeId::from("a"), NodeId::from("b")]);
		layout.translate(&ids, 5.0, 5.0);
		let after = layout.positions();

		for id in ["a", "b"] {
			let id = NodeId::from(id);
			assert!((after[&id].0 - before[&id].0 - 5.0).abs() < 1e-3);
			assert!((after[&id].1 - before[&id].1 - 5.0).abs() < 1e-3);
			assert!(layout.is_anchored(&id));
		}
		assert_eq!(after[&NodeId::from("c")], before[&NodeId::from("c")]);
		assert!(!layout.is_anchored(&NodeId::from("c")));
	}

	#[test]
	fn anchored_nodes_resist_the_simulation() {
		let mut layout = GraphLayout::new(800.0, 600.0, SimulationConfig::default());
		layout.rebuild(&snapshot(
			vec![node("a"), node("b")],
			vec![link("e", "a", "b")],
		));

		let ids = HashSet::from([NodeId::from("a")]);
		layout.translate(&ids, 0.0, 0.0);
		let pinned = layout.positions()[&NodeId::from("a")];

		for _ in 0..30 {
			layout.tick(0.016);
		}
		let after = layout.positions()[&NodeId::from("a")];
		assert!((after.0 - pinned.0).abs() < 1e-3);
		assert!((after.1 - pinned.1).abs() < 1e-3);
	}

	#[test]
	fn view_transform_round_trips_zoom() {
		let mut view = ViewTransform::default();
		view.zoom_about(100.0, 50.0, 2.0);
		assert!((view.k - 2.0).abs() < 1e-9);

		// the zoom anchor stays put on screen
		let (gx, gy) = view.screen_to_graph(100.0, 50.0);
		assert!((gx - 100.0).abs() < 1e-9);
		assert!((gy - 50.0).abs() < 1e-9);

		// clamped at the top end
		for _ in 0..10 {
			view.zoom_about(0.0, 0.0, 10.0);
		}
		assert!((view.k - 10.0).abs() < 1e-9);
	}
}
