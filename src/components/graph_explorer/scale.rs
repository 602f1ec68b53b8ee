//! Zoom-dependent sizing for graph visuals.
//!
//! Drawing happens in world space after the canvas pan/zoom transform, so
//! anything that should keep a constant on-screen size (text, borders, line
//! widths) has to be divided by the zoom factor. This module centralizes
//! those decisions so the renderer and the hit test agree on sizes.

/// Defines how a visual property scales with zoom level.
#[derive(Clone, Debug)]
pub enum ScaleBehavior {
	/// Constant world-space size. Appears larger when zoomed in.
	World,
	/// Constant screen-space size (pixels). Unaffected by zoom.
	Screen,
	/// World-space scaling, clamped to min/max screen-space bounds.
	Clamped { min_screen: f64, max_screen: f64 },
}

impl ScaleBehavior {
	/// Computes the world-space value for a base value at zoom `k`.
	pub fn apply(&self, base: f64, k: f64) -> f64 {
		match self {
			ScaleBehavior::World => base,
			ScaleBehavior::Screen => base / k,
			ScaleBehavior::Clamped {
				min_screen,
				max_screen,
			} => {
				// screen_size = world_size * k
				base.clamp(min_screen / k, max_screen / k)
			}
		}
	}
}

/// Node sizing.
#[derive(Clone, Debug)]
pub struct NodeScaleConfig {
	/// Node radius in world units.
	pub radius: f64,
	/// How the radius scales with zoom.
	pub radius_behavior: ScaleBehavior,
	/// Hit detection radius in world units.
	pub hit_radius: f64,
	/// How the hit radius scales with zoom.
	pub hit_behavior: ScaleBehavior,
	/// Gap between the node's edge and its label box, in world units.
	pub label_offset: f64,
}

/// Link sizing.
#[derive(Clone, Debug)]
pub struct LinkScaleConfig {
	/// Line width in screen pixels.
	pub line_width: f64,
	/// Line width in screen pixels while hovered.
	pub hovered_line_width: f64,
	/// Pointer distance (screen pixels) within which a link counts as hit.
	pub hit_distance: f64,
	/// Arrowhead length in world units.
	pub arrow_size: f64,
}

/// Label sizing.
#[derive(Clone, Debug)]
pub struct LabelScaleConfig {
	/// Font size in screen pixels.
	pub font_size: f64,
	/// Maximum label width, in multiples of the font size. Longer names get
	/// truncated with an ellipsis.
	pub max_width_ems: f64,
	/// Padding added around the measured text, in world units.
	pub padding: f64,
}

/// Selection/hover border sizing.
#[derive(Clone, Debug)]
pub struct BorderScaleConfig {
	/// Border width in screen pixels for the hovered element.
	pub hovered_width: f64,
	/// Border width in screen pixels for selected elements.
	pub selected_width: f64,
}

/// Complete scale configuration.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	pub node: NodeScaleConfig,
	pub link: LinkScaleConfig,
	pub label: LabelScaleConfig,
	pub border: BorderScaleConfig,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			node: NodeScaleConfig {
				radius: 4.0,
				radius_behavior: ScaleBehavior::World,
				hit_radius: 10.0,
				hit_behavior: ScaleBehavior::Clamped {
					min_screen: 6.0,
					max_screen: f64::INFINITY,
				},
				label_offset: 1.0,
			},
			link: LinkScaleConfig {
				line_width: 1.0,
				hovered_line_width: 2.0,
				hit_distance: 6.0,
				arrow_size: 4.0,
			},
			label: LabelScaleConfig {
				font_size: 14.0,
				max_width_ems: 10.0,
				padding: 1.0,
			},
			border: BorderScaleConfig {
				hovered_width: 4.0,
				selected_width: 3.0,
			},
		}
	}
}

/// Scale values resolved for one zoom level. Computed once per frame.
#[derive(Clone, Debug)]
pub struct ScaledValues {
	/// Current zoom level.
	pub k: f64,
	/// Node radius in world space.
	pub node_radius: f64,
	/// Node hit radius in world space.
	pub hit_radius: f64,
	/// Label font size in world space, floored so text never degenerates.
	pub font_size: f64,
	/// Canvas font specification for labels.
	pub label_font: String,
	/// Maximum label width in world space before truncation.
	pub max_label_width: f64,
	/// Link line width in world space.
	pub link_width: f64,
	/// Hovered link line width in world space.
	pub hovered_link_width: f64,
	/// Link hit distance in world space.
	pub link_hit_distance: f64,
	/// Arrowhead length in world space.
	pub arrow_size: f64,
	/// Hovered border width in world space.
	pub hovered_border: f64,
	/// Selected border width in world space.
	pub selected_border: f64,
}

impl ScaledValues {
	/// Resolves the configuration at zoom `k`.
	pub fn new(config: &ScaleConfig, k: f64) -> Self {
		let font_size = (config.label.font_size / k).max(1.0);
		Self {
			k,
			node_radius: config.node.radius_behavior.apply(config.node.radius, k),
			hit_radius: config.node.hit_behavior.apply(config.node.hit_radius, k),
			font_size,
			label_font: format!("{font_size}px Sans-Serif"),
			max_label_width: font_size * config.label.max_width_ems,
			link_width: config.link.line_width / k,
			hovered_link_width: config.link.hovered_line_width / k,
			link_hit_distance: config.link.hit_distance / k,
			arrow_size: config.link.arrow_size,
			hovered_border: config.border.hovered_width / k,
			selected_border: config.border.selected_width / k,
		}
	}
}
