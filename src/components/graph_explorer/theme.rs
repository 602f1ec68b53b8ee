//! Color configuration for the explorer.
//!
//! Colors are plain CSS strings handed straight to the canvas. Node fills
//! come from the label palette: the first time a label is seen it claims the
//! next palette color and keeps it for the widget's lifetime, so a node type
//! never changes color as the graph grows.

use std::collections::HashMap;

/// Palette cycled through by label, in claim order.
const LABEL_PALETTE: [&str; 20] = [
	"#ff6b6b", // soft red
	"#4ecdc4", // teal
	"#ffe66d", // yellow
	"#1a73e8", // blue
	"#ffa94d", // orange
	"#9b59b6", // purple
	"#00cec9", // cyan
	"#e84393", // magenta
	"#b8e994", // lime
	"#fab1a0", // pink
	"#0984e3", // strong blue
	"#dfe6e9", // light grey
	"#6c5ce7", // violet
	"#f6e58d", // light yellow
	"#c44569", // maroon
	"#55efc4", // mint
	"#636e72", // dark grey
	"#fdcb6e", // peach
	"#2d3436", // charcoal
	"#b2bec3", // silver grey
];

/// Node colors.
#[derive(Clone, Debug)]
pub struct NodeColors {
	/// Fill for nodes without any label.
	pub fill: String,
	/// Border while hovered.
	pub border_hovered: String,
	/// Border while selected or rectangle-candidate.
	pub border_selected: String,
}

/// Link colors.
#[derive(Clone, Debug)]
pub struct LinkColors {
	pub default: String,
	pub hovered: String,
	pub selected: String,
}

/// Label text colors.
#[derive(Clone, Debug)]
pub struct TextColors {
	/// Background box behind the text.
	pub background: String,
	/// The text itself.
	pub foreground: String,
}

/// Complete color configuration.
#[derive(Clone, Debug)]
pub struct GraphColors {
	pub background: String,
	pub node: NodeColors,
	pub link: LinkColors,
	pub text: TextColors,
	/// Selection rectangle fill and border.
	pub selection_fill: String,
	pub selection_border: String,
	/// Per-label palette, cycled in claim order.
	pub palette: Vec<String>,
}

impl GraphColors {
	/// Light scheme: white canvas, dark text.
	pub fn light() -> Self {
		Self {
			background: "#ffffff".into(),
			node: NodeColors {
				fill: "#3498db".into(),
				border_hovered: "#6666ff".into(),
				border_selected: "#ff6b6b".into(),
			},
			link: LinkColors {
				default: "#848484".into(),
				hovered: "#6666ff".into(),
				selected: "#ff6b6b".into(),
			},
			text: TextColors {
				background: "rgba(255, 255, 255, 0.8)".into(),
				foreground: "#212121".into(),
			},
			selection_fill: "rgba(102, 102, 255, 0.1)".into(),
			selection_border: "#6666ff".into(),
			palette: LABEL_PALETTE.iter().map(|c| c.to_string()).collect(),
		}
	}

	/// Dark scheme.
	pub fn dark() -> Self {
		Self {
			background: "#121212".into(),
			node: NodeColors {
				fill: "#74b9ff".into(),
				border_hovered: "#a29bfe".into(),
				border_selected: "#ff7675".into(),
			},
			link: LinkColors {
				default: "#848484".into(),
				hovered: "#a29bfe".into(),
				selected: "#ff7675".into(),
			},
			text: TextColors {
				background: "rgba(0, 0, 0, 0.6)".into(),
				foreground: "#f1f1f1".into(),
			},
			selection_fill: "rgba(162, 155, 254, 0.12)".into(),
			selection_border: "#a29bfe".into(),
			palette: LABEL_PALETTE.iter().map(|c| c.to_string()).collect(),
		}
	}
}

impl Default for GraphColors {
	fn default() -> Self {
		Self::light()
	}
}

/// First-seen label to palette color assignment.
#[derive(Clone, Debug, Default)]
pub struct LabelColors {
	assigned: HashMap<String, String>,
}

impl LabelColors {
	pub fn new() -> Self {
		Self::default()
	}

	/// The color for a label, claiming the next palette entry on first use.
	/// The palette wraps around when exhausted.
	pub fn color_for(&mut self, label: &str, palette: &[String]) -> String {
		if let Some(color) = self.assigned.get(label) {
			return color.clone();
		}
		let color = palette[self.assigned.len() % palette.len()].clone();
		self.assigned.insert(label.to_string(), color.clone());
		color
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn labels_claim_palette_colors_in_first_seen_order() {
		let colors = GraphColors::light();
		let mut labels = LabelColors::new();

		let person = labels.color_for("Person", &colors.palette);
		let machine = labels.color_for("Machine", &colors.palette);
		assert_eq!(person, colors.palette[0]);
		assert_eq!(machine, colors.palette[1]);

		// stable on repeat lookups, regardless of call order
		assert_eq!(labels.color_for("Machine", &colors.palette), machine);
		assert_eq!(labels.color_for("Person", &colors.palette), person);
	}

	#[test]
	fn palette_wraps_when_exhausted() {
		let palette: Vec<String> = vec!["#111111".into(), "#222222".into()];
		let mut labels = LabelColors::new();

		labels.color_for("a", &palette);
		labels.color_for("b", &palette);
		assert_eq!(labels.color_for("c", &palette), "#111111");
	}
}
