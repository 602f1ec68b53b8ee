//! Browser entrypoint: set up logging, then mount the explorer shell.

// Bin target reuses lib deps, silence noisy lint.
#![allow(unused_crate_dependencies)]

use graph_explorer::{init_logging, App};
use leptos::prelude::*;
use log::info;

fn main() {
	init_logging();
	info!("graph-explorer {} starting", env!("CARGO_PKG_VERSION"));

	mount_to_body(App)
}
