//! Data-supplier capability interface.
//!
//! The explorer never talks to a database itself. Anything that can answer
//! "what are this node's neighbors" and "which nodes match this text"
//! implements [`GraphSource`]; the component calls it from the expand tools
//! and the search box, feeds the results into the store, and commits.
//! [`StaticGraphSource`] is the shipped in-memory implementation backing the
//! demo and the tests; host applications provide their own for live backends.

use std::collections::HashMap;

use serde::Deserialize;

use super::types::{GraphData, GraphLink, GraphNode, NodeId};

/// Which adjacency direction an expansion follows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExpandDirection {
	/// Follow links out of the clicked node.
	Outgoing,
	/// Follow links into the clicked node.
	Incoming,
}

/// One expansion result: the neighbor node and the link reaching it.
///
/// The link is oriented as stored: for [`ExpandDirection::Outgoing`] its
/// source is the expanded node, for [`ExpandDirection::Incoming`] its target.
#[derive(Clone, Debug)]
pub struct Neighbor {
	/// The neighbor node.
	pub node: GraphNode,
	/// The link between the expanded node and the neighbor.
	pub link: GraphLink,
}

/// One search result.
#[derive(Clone, Debug)]
pub struct SearchHit {
	/// The matching node.
	pub node: GraphNode,
	/// Which field matched: `"name"`, `"label"`, or the `"id"` fallback.
	/// The search overlay groups hits by this.
	pub category: String,
	/// The text that matched.
	pub matched: String,
}

/// Capability interface for everything that supplies graph data on demand.
pub trait GraphSource {
	/// Nodes adjacent to `id` in the given direction, with their links.
	fn neighbors(&self, id: &NodeId, direction: ExpandDirection) -> Vec<Neighbor>;

	/// Nodes matching a text query, at most `limit` of them.
	fn search(&self, query: &str, limit: usize) -> Vec<SearchHit>;
}

/// An in-memory [`GraphSource`] over a fixed dataset.
pub struct StaticGraphSource {
	nodes: HashMap<NodeId, GraphNode>,
	node_order: Vec<NodeId>,
	outgoing: HashMap<NodeId, Vec<GraphLink>>,
	incoming: HashMap<NodeId, Vec<GraphLink>>,
}

impl StaticGraphSource {
	/// Indexes a dataset. Links referencing nodes absent from the dataset
	/// are dropped.
	pub fn new(data: GraphData) -> Self {
		let mut nodes = HashMap::new();
		let mut node_order = Vec::new();
		for node in data.nodes {
			if !nodes.contains_key(&node.id) {
				node_order.push(node.id.clone());
				nodes.insert(node.id.clone(), node);
			}
		}

		let mut outgoing: HashMap<NodeId, Vec<GraphLink>> = HashMap::new();
		let mut incoming: HashMap<NodeId, Vec<GraphLink>> = HashMap::new();
		for link in data.links {
			if !nodes.contains_key(&link.source) || !nodes.contains_key(&link.target) {
				continue;
			}
			outgoing
				.entry(link.source.clone())
				.or_default()
				.push(link.clone());
			incoming.entry(link.target.clone()).or_default().push(link);
		}

		Self {
			nodes,
			node_order,
			outgoing,
			incoming,
		}
	}

	/// Looks up a node in the dataset.
	pub fn get_node(&self, id: &NodeId) -> Option<&GraphNode> {
		self.nodes.get(id)
	}

	fn matches(text: &str, query: &str) -> bool {
		// match at the start of the text or of any word in it
		let text = text.to_lowercase();
		text.starts_with(query) || text.split_whitespace().any(|w| w.starts_with(query))
	}
}

impl GraphSource for StaticGraphSource {
	fn neighbors(&self, id: &NodeId, direction: ExpandDirection) -> Vec<Neighbor> {
		let links = match direction {
			ExpandDirection::Outgoing => self.outgoing.get(id),
			ExpandDirection::Incoming => self.incoming.get(id),
		};

		links
			.into_iter()
			.flatten()
			.filter_map(|link| {
				let neighbor_id = match direction {
					ExpandDirection::Outgoing => &link.target,
					ExpandDirection::Incoming => &link.source,
				};
				self.nodes.get(neighbor_id).map(|node| Neighbor {
					node: node.clone(),
					link: link.clone(),
				})
			})
			.collect()
	}

	fn search(&self, query: &str, limit: usize) -> Vec<SearchHit> {
		let query = query.trim().to_lowercase();
		if query.is_empty() {
			return Vec::new();
		}

		let mut hits = Vec::new();
		for id in &self.node_order {
			if hits.len() >= limit {
				break;
			}
			let node = &self.nodes[id];

			let hit = if Self::matches(&node.name, &query) {
				Some(("name", node.name.clone()))
			} else if let Some(label) = node.labels.iter().find(|l| Self::matches(l, &query)) {
				Some(("label", label.clone()))
			} else if node.id.as_str().to_lowercase().starts_with(&query) {
				// fall back to the raw id
				Some(("id", node.id.as_str().to_string()))
			} else {
				None
			};

			if let Some((category, matched)) = hit {
				hits.push(SearchHit {
					node: node.clone(),
					category: category.to_string(),
					matched,
				});
			}
		}
		hits
	}
}

/// The serde document the demo application loads.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Dataset {
	/// The full graph served through expansion and search.
	pub graph: GraphData,
	/// Initially visible nodes. Empty means show the whole graph.
	#[serde(default)]
	pub seeds: Vec<NodeId>,
}

impl Dataset {
	/// The initially visible subgraph: the seed nodes plus every link whose
	/// endpoints are both seeds. With no seeds, the whole graph.
	pub fn seed_graph(&self) -> GraphData {
		if self.seeds.is_empty() {
			return self.graph.clone();
		}

		let nodes: Vec<GraphNode> = self
			.graph
			.nodes
			.iter()
			.filter(|n| self.seeds.contains(&n.id))
			.cloned()
			.collect();
		let links = self
			.graph
			.links
			.iter()
			.filter(|l| self.seeds.contains(&l.source) && self.seeds.contains(&l.target))
			.cloned()
			.collect();

		GraphData { nodes, links }
	}
}
