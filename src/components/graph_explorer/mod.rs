//! Interactive graph exploration component.
//!
//! Renders a directed, labeled graph on an HTML canvas with:
//! - Physics-based node positioning via force simulation
//! - Pan, zoom, node dragging, and rectangular selection
//! - Parallel links fanned out with distinct curvatures
//! - Greedy label placement that hides overlapping labels
//! - Tools for selecting, expanding, and removing graph elements
//! - A pluggable [`GraphSource`] for on-demand expansion and search
//!
//! # Example
//!
//! ```ignore
//! use graph_explorer::{GraphExplorer, GraphData, GraphNode, GraphLink};
//!
//! let data = GraphData {
//!     nodes: vec![
//!         GraphNode { id: "a".into(), name: "Node A".into(), labels: vec!["Thing".into()] },
//!         GraphNode { id: "b".into(), name: "Node B".into(), labels: vec![] },
//!     ],
//!     links: vec![
//!         GraphLink { id: "e1".into(), name: "KNOWS".into(), source: "a".into(), target: "b".into() },
//!     ],
//! };
//!
//! view! { <GraphExplorer data=data.into() fullscreen=true /> }
//! ```

mod component;
mod curvature;
mod labels;
mod layout;
mod render;
pub mod scale;
mod source;
mod store;
pub mod theme;
mod tools;
mod types;

pub use component::GraphExplorer;
pub use source::{Dataset, ExpandDirection, GraphSource, Neighbor, SearchHit, StaticGraphSource};
pub use store::{GraphSnapshot, GraphStore};
pub use theme::GraphColors;
pub use tools::Tool;
pub use types::{GraphData, GraphLink, GraphNode, LinkId, NodeId};
