//! graph-explorer: Interactive graph exploration widget for the browser.
//!
//! This crate provides a WASM-based graph widget that renders directed,
//! labeled graphs with physics-based layout, pan/zoom, selection tools, and
//! on-demand expansion through a pluggable data source.

use std::rc::Rc;

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::graph_explorer::{
	Dataset, ExpandDirection, GraphColors, GraphData, GraphExplorer, GraphLink, GraphNode,
	GraphSnapshot, GraphSource, GraphStore, LinkId, Neighbor, NodeId, SearchHit,
	StaticGraphSource, Tool,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("graph-explorer: logging initialized");
}

/// Load a dataset from a script element with id="graph-data".
/// Expected format: JSON with { graph: { nodes: [...], links: [...] }, seeds: [...] }
fn load_dataset() -> Option<Dataset> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("graph-data")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match serde_json::from_str::<Dataset>(&json_text) {
		Ok(dataset) => {
			info!(
				"graph-explorer: loaded {} nodes, {} links, {} seeds",
				dataset.graph.nodes.len(),
				dataset.graph.links.len(),
				dataset.seeds.len()
			);
			Some(dataset)
		}
		Err(e) => {
			warn!("graph-explorer: failed to parse dataset: {}", e);
			None
		}
	}
}

/// Main application component.
/// Loads a dataset from the DOM and renders the explorer, with the full
/// dataset served through an in-memory source for expansion and search.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let dataset = load_dataset().unwrap_or_default();
	let seed = dataset.seed_graph();
	let source: Rc<dyn GraphSource> = Rc::new(StaticGraphSource::new(dataset.graph));
	let graph_signal = Signal::derive(move || seed.clone());

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />
		<Title text="Graph Explorer" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			<GraphExplorer data=graph_signal source=source fullscreen=true />
			<div class="graph-overlay">
				<h1>"Graph Explorer"</h1>
				<p class="subtitle">"Drag nodes to reposition. Scroll to zoom. Drag background to pan."</p>
			</div>
		</div>
	}
}
