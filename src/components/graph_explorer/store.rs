//! Mutable graph store with batched snapshot publication.
//!
//! The store keeps two representations: live id-keyed collections plus
//! adjacency indices that every mutation touches, and an immutable snapshot
//! published for rendering. Mutations only mark the store dirty; [`GraphStore::commit`]
//! materializes a fresh snapshot when (and only when) something changed, so a
//! burst of additions (a neighbor expansion, a bulk load) costs one
//! publication instead of one per entity.
//!
//! Invalid references — duplicate ids, links whose endpoints are missing,
//! removals of absent ids — are silent no-ops reported through `bool` returns,
//! never errors. Out-of-order collaborator results are expected and harmless.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use super::types::{GraphData, GraphLink, GraphNode, LinkId, NodeId};

/// Immutable view of the graph published by [`GraphStore::commit`].
///
/// Node and link order is insertion order. The order carries no meaning
/// except as the tie-break for curvature assignment and label suppression,
/// where the earlier element wins.
#[derive(Clone, Debug, Default)]
pub struct GraphSnapshot {
	/// Nodes in insertion order.
	pub nodes: Vec<GraphNode>,
	/// Links in insertion order.
	pub links: Vec<GraphLink>,
}

/// Adjacency-indexed node/link collections with commit-on-demand publication.
pub struct GraphStore {
	nodes: HashMap<NodeId, GraphNode>,
	links: HashMap<LinkId, GraphLink>,
	node_order: Vec<NodeId>,
	link_order: Vec<LinkId>,
	outgoing: HashMap<NodeId, HashSet<LinkId>>,
	incoming: HashMap<NodeId, HashSet<LinkId>>,
	dirty: bool,
	snapshot: Rc<GraphSnapshot>,
}

impl Default for GraphStore {
	fn default() -> Self {
		Self {
			nodes: HashMap::new(),
			links: HashMap::new(),
			node_order: Vec::new(),
			link_order: Vec::new(),
			outgoing: HashMap::new(),
			incoming: HashMap::new(),
			dirty: false,
			snapshot: Rc::new(GraphSnapshot::default()),
		}
	}
}

impl GraphStore {
	/// Creates an empty store with an empty published snapshot.
	pub fn new() -> Self {
		Self::default()
	}

	/// Inserts a node. No-op returning `false` if the id is already present.
	pub fn add_node(&mut self, node: GraphNode) -> bool {
		if self.nodes.contains_key(&node.id) {
			return false;
		}

		self.node_order.push(node.id.clone());
		self.outgoing.insert(node.id.clone(), HashSet::new());
		self.incoming.insert(node.id.clone(), HashSet::new());
		self.nodes.insert(node.id.clone(), node);

		self.dirty = true;
		true
	}

	/// Inserts a link. No-op returning `false` if the id is already present
	/// or either endpoint does not exist. A self-loop registers the link in
	/// both of its node's index sets.
	pub fn add_link(&mut self, link: GraphLink) -> bool {
		if self.links.contains_key(&link.id) {
			return false;
		}
		if !self.nodes.contains_key(&link.source) || !self.nodes.contains_key(&link.target) {
			return false;
		}

		if let Some(out) = self.outgoing.get_mut(&link.source) {
			out.insert(link.id.clone());
		}
		if let Some(inc) = self.incoming.get_mut(&link.target) {
			inc.insert(link.id.clone());
		}
		self.link_order.push(link.id.clone());
		self.links.insert(link.id.clone(), link);

		self.dirty = true;
		true
	}

	/// Removes a node and every link touching it, in either direction.
	/// Cascaded links are also scrubbed from the opposite endpoint's index.
	/// No-op returning `false` if the id is absent.
	pub fn remove_node(&mut self, id: &NodeId) -> bool {
		if !self.nodes.contains_key(id) {
			return false;
		}

		let mut touching: HashSet<LinkId> = HashSet::new();
		if let Some(out) = self.outgoing.get(id) {
			touching.extend(out.iter().cloned());
		}
		if let Some(inc) = self.incoming.get(id) {
			touching.extend(inc.iter().cloned());
		}

		for link_id in &touching {
			if let Some(link) = self.links.remove(link_id) {
				if let Some(out) = self.outgoing.get_mut(&link.source) {
					out.remove(link_id);
				}
				if let Some(inc) = self.incoming.get_mut(&link.target) {
					inc.remove(link_id);
				}
			}
		}
		if !touching.is_empty() {
			self.link_order.retain(|l| !touching.contains(l));
		}

		self.nodes.remove(id);
		self.node_order.retain(|n| n != id);
		self.outgoing.remove(id);
		self.incoming.remove(id);

		self.dirty = true;
		true
	}

	/// Removes a link and unregisters it from both endpoint indices.
	/// No-op returning `false` if the id is absent.
	pub fn remove_link(&mut self, id: &LinkId) -> bool {
		let Some(link) = self.links.remove(id) else {
			return false;
		};

		if let Some(out) = self.outgoing.get_mut(&link.source) {
			out.remove(id);
		}
		if let Some(inc) = self.incoming.get_mut(&link.target) {
			inc.remove(id);
		}
		self.link_order.retain(|l| l != id);

		self.dirty = true;
		true
	}

	/// Replaces the display fields (`name`, `labels`) of an existing node.
	/// Identity and adjacency are untouched. No-op if the id is absent.
	pub fn update_node(&mut self, node: GraphNode) -> bool {
		let Some(existing) = self.nodes.get_mut(&node.id) else {
			return false;
		};

		existing.name = node.name;
		existing.labels = node.labels;
		self.dirty = true;
		true
	}

	/// Replaces the display name of an existing link. No-op if absent.
	pub fn update_link_name(&mut self, id: &LinkId, name: String) -> bool {
		let Some(existing) = self.links.get_mut(id) else {
			return false;
		};

		existing.name = name;
		self.dirty = true;
		true
	}

	/// Looks up a node by id.
	pub fn get_node(&self, id: &NodeId) -> Option<&GraphNode> {
		self.nodes.get(id)
	}

	/// Looks up a link by id.
	pub fn get_link(&self, id: &LinkId) -> Option<&GraphLink> {
		self.links.get(id)
	}

	/// Whether a node with this id exists.
	pub fn contains_node(&self, id: &NodeId) -> bool {
		self.nodes.contains_key(id)
	}

	/// Whether a link with this id exists.
	pub fn contains_link(&self, id: &LinkId) -> bool {
		self.links.contains_key(id)
	}

	/// Links whose source is this node. Empty for unknown ids.
	pub fn outgoing_links(&self, id: &NodeId) -> Vec<&GraphLink> {
		self.outgoing
			.get(id)
			.map(|set| set.iter().filter_map(|l| self.links.get(l)).collect())
			.unwrap_or_default()
	}

	/// Links whose target is this node. Empty for unknown ids.
	pub fn incoming_links(&self, id: &NodeId) -> Vec<&GraphLink> {
		self.incoming
			.get(id)
			.map(|set| set.iter().filter_map(|l| self.links.get(l)).collect())
			.unwrap_or_default()
	}

	/// Number of nodes currently stored.
	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	/// Number of links currently stored.
	pub fn link_count(&self) -> usize {
		self.links.len()
	}

	/// Whether the store holds no nodes and no links.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty() && self.links.is_empty()
	}

	/// Empties every collection and index. Calling this on an already-empty
	/// store is a no-op that does not mark the store dirty, so unconditional
	/// `clear()` + `commit()` never produces a spurious publication.
	pub fn clear(&mut self) -> bool {
		if self.is_empty() {
			return false;
		}

		self.nodes.clear();
		self.links.clear();
		self.node_order.clear();
		self.link_order.clear();
		self.outgoing.clear();
		self.incoming.clear();

		self.dirty = true;
		true
	}

	/// Merges a bulk payload, or replaces the whole graph when `replace` is
	/// set. Applies [`GraphStore::add_node`] / [`GraphStore::add_link`] per
	/// entry with their usual no-op semantics. Does not commit; callers
	/// publish explicitly when the batch is done.
	pub fn add_graph_data(&mut self, data: GraphData, replace: bool) {
		if replace {
			self.clear();
		}

		for node in data.nodes {
			self.add_node(node);
		}
		for link in data.links {
			self.add_link(link);
		}
	}

	/// Publishes a fresh snapshot if any mutation happened since the last
	/// commit. Returns `true` when a new snapshot was published. The previous
	/// snapshot value (and its `Rc` identity) is retained otherwise.
	pub fn commit(&mut self) -> bool {
		if !self.dirty {
			return false;
		}

		let nodes = self
			.node_order
			.iter()
			.filter_map(|id| self.nodes.get(id).cloned())
			.collect();
		let links = self
			.link_order
			.iter()
			.filter_map(|id| self.links.get(id).cloned())
			.collect();

		self.snapshot = Rc::new(GraphSnapshot { nodes, links });
		self.dirty = false;
		true
	}

	/// The most recently published snapshot. Mutations after the last
	/// [`GraphStore::commit`] are not visible here.
	pub fn snapshot(&self) -> Rc<GraphSnapshot> {
		Rc::clone(&self.snapshot)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn node(id: &str) -> GraphNode {
		GraphNode {
			id: NodeId::from(id),
			name: id.to_uppercase(),
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

	fn ids(links: Vec<&GraphLink>) -> HashSet<LinkId> {
		links.into_iter().map(|l| l.id.clone()).collect()
	}

	#[test]
	fn add_node_is_idempotent() {
		let mut store = GraphStore::new();
		assert!(store.add_node(node("a")));
		assert!(!store.add_node(GraphNode {
			name: "other".into(),
			..node("a")
		}));
		assert_eq!(store.node_count(), 1);
		// the first insert wins; re-adding is not an upsert
		assert_eq!(store.get_node(&NodeId::from("a")).unwrap().name, "A");
	}

	#[test]
	fn add_link_requires_both_endpoints() {
		let mut store = GraphStore::new();
		store.add_node(node("a"));
		assert!(!store.add_link(link("e", "a", "missing")));
		assert!(!store.add_link(link("e", "missing", "a")));
		assert_eq!(store.link_count(), 0);

		store.add_node(node("b"));
		assert!(store.add_link(link("e", "a", "b")));
		assert!(!store.add_link(link("e", "a", "b")));
		assert_eq!(store.link_count(), 1);
	}

	#[test]
	fn self_loop_registers_in_both_indices() {
		let mut store = GraphStore::new();
		store.add_node(node("a"));
		assert!(store.add_link(link("loop", "a", "a")));

		let out = ids(store.outgoing_links(&NodeId::from("a")));
		let inc = ids(store.incoming_links(&NodeId::from("a")));
		assert!(out.contains(&LinkId::from("loop")));
		assert!(inc.contains(&LinkId::from("loop")));
	}

	#[test]
	fn remove_node_cascades_and_scrubs_opposite_index() {
		let mut store = GraphStore::new();
		store.add_node(node("a"));
		store.add_node(node("b"));
		store.add_node(node("c"));
		store.add_link(link("ab", "a", "b"));
		store.add_link(link("ca", "c", "a"));
		store.add_link(link("bc", "b", "c"));
		store.commit();

		assert!(store.remove_node(&NodeId::from("a")));
		assert!(!store.remove_node(&NodeId::from("a")));
		store.commit();

		let snapshot = store.snapshot();
		assert!(!snapshot.nodes.iter().any(|n| n.id == NodeId::from("a")));
		let remaining: Vec<_> = snapshot.links.iter().map(|l| l.id.as_str()).collect();
		assert_eq!(remaining, vec!["bc"]);

		// surviving endpoints no longer index the cascaded links
		assert!(ids(store.incoming_links(&NodeId::from("b"))).is_empty());
		assert_eq!(
			ids(store.outgoing_links(&NodeId::from("c"))),
			HashSet::new()
		);
	}

	#[test]
	fn remove_link_unregisters_endpoints() {
		let mut store = GraphStore::new();
		store.add_node(node("a"));
		store.add_node(node("b"));
		store.add_link(link("e", "a", "b"));

		assert!(store.remove_link(&LinkId::from("e")));
		assert!(!store.remove_link(&LinkId::from("e")));
		assert!(store.outgoing_links(&NodeId::from("a")).is_empty());
		assert!(store.incoming_links(&NodeId::from("b")).is_empty());
	}

	#[test]
	fn update_touches_display_fields_only() {
		let mut store = GraphStore::new();
		store.add_node(node("a"));
		store.add_node(node("b"));
		store.add_link(link("e", "a", "b"));

		assert!(store.update_node(GraphNode {
			id: NodeId::from("a"),
			name: "renamed".into(),
			labels: vec!["Tag".into()],
		}));
		assert!(store.update_link_name(&LinkId::from("e"), "renamed edge".into()));
		assert!(!store.update_node(node("missing")));

		assert_eq!(store.get_node(&NodeId::from("a")).unwrap().name, "renamed");
		assert_eq!(
			store.get_link(&LinkId::from("e")).unwrap().name,
			"renamed edge"
		);
		assert_eq!(
			ids(store.outgoing_links(&NodeId::from("a"))),
			HashSet::from([LinkId::from("e")])
		);
	}

	#[test]
	fn commit_batches_mutations() {
		let mut store = GraphStore::new();
		store.add_node(node("a"));
		store.add_node(node("b"));
		store.add_link(link("e", "a", "b"));

		// nothing published yet
		assert!(store.snapshot().nodes.is_empty());

		assert!(store.commit());
		assert_eq!(store.snapshot().nodes.len(), 2);
		assert_eq!(store.snapshot().links.len(), 1);

		// clean store: no new publication, same snapshot identity
		let before = store.snapshot();
		assert!(!store.commit());
		assert!(Rc::ptr_eq(&before, &store.snapshot()));
	}

	#[test]
	fn clear_on_empty_store_is_inert() {
		let mut store = GraphStore::new();
		store.add_node(node("a"));
		store.commit();

		assert!(store.clear());
		assert!(store.commit());

		let empty = store.snapshot();
		assert!(!store.clear());
		assert!(!store.commit());
		assert!(Rc::ptr_eq(&empty, &store.snapshot()));
	}

	#[test]
	fn snapshot_preserves_insertion_order_across_removal() {
		let mut store = GraphStore::new();
		for id in ["n1", "n2", "n3", "n4"] {
			store.add_node(node(id));
		}
		store.remove_node(&NodeId::from("n2"));
		store.commit();

		let order: Vec<_> = store
			.snapshot()
			.nodes
			.iter()
			.map(|n| n.id.as_str().to_string())
			.collect();
		assert_eq!(order, vec!["n1", "n3", "n4"]);
	}

	#[test]
	fn adjacency_matches_published_snapshot() {
		let mut store = GraphStore::new();
		for id in ["a", "b", "c"] {
			store.add_node(node(id));
		}
		store.add_link(link("e1", "a", "b"));
		store.add_link(link("e2", "a", "c"));
		store.add_link(link("e3", "c", "a"));
		store.add_link(link("e4", "b", "b"));
		store.remove_link(&LinkId::from("e2"));
		store.commit();

		let snapshot = store.snapshot();
		for id in ["a", "b", "c"] {
			let id = NodeId::from(id);
			let from_snapshot: HashSet<LinkId> = snapshot
				.links
				.iter()
				.filter(|l| l.source == id)
				.map(|l| l.id.clone())
				.collect();
			assert_eq!(ids(store.outgoing_links(&id)), from_snapshot);

			let into_snapshot: HashSet<LinkId> = snapshot
				.links
				.iter()
				.filter(|l| l.target == id)
				.map(|l| l.id.clone())
				.collect();
			assert_eq!(ids(store.incoming_links(&id)), into_snapshot);
		}
	}

	#[test]
	fn add_graph_data_replace_swaps_contents() {
		let mut store = GraphStore::new();
		store.add_graph_data(
			GraphData {
				nodes: vec![node("a"), node("b")],
				links: vec![link("e", "a", "b")],
			},
			false,
		);
		store.commit();

		store.add_graph_data(
			GraphData {
				nodes: vec![node("x")],
				// dangling: "a" is gone after the replace-clear
				links: vec![link("xa", "x", "a")],
			},
			true,
		);

		// replace cleared but did not publish on its own
		assert_eq!(store.snapshot().nodes.len(), 2);
		store.commit();
		let snapshot = store.snapshot();
		assert_eq!(snapshot.nodes.len(), 1);
		assert_eq!(snapshot.nodes[0].id, NodeId::from("x"));
		assert!(snapshot.links.is_empty());
	}
}
