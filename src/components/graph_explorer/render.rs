//! Canvas rendering for the explorer.
//!
//! Draws in passes for correct z-ordering: background, links (with
//! arrowheads), nodes (pie slices plus emphasis borders), labels, and the
//! rectangular-selection overlay on top in screen space. The label pass
//! measures every name and records its box into the [`LabelLayout`] whether
//! or not the label ends up drawn; the overlap resolver runs on those boxes
//! after the frame.

use std::collections::HashMap;
use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::curvature::{CurvatureMap, LinkPath};
use super::labels::LabelLayout;
use super::layout::ViewTransform;
use super::scale::{ScaleConfig, ScaledValues};
use super::store::GraphSnapshot;
use super::theme::{GraphColors, LabelColors};
use super::tools::ToolState;
use super::types::{GraphLink, LabelBox, NodeId};

/// Everything one frame needs to draw.
pub struct Scene<'a> {
	pub snapshot: &'a GraphSnapshot,
	pub positions: &'a HashMap<NodeId, (f64, f64)>,
	pub curvature: &'a CurvatureMap,
	pub labels: &'a mut LabelLayout,
	pub label_colors: &'a mut LabelColors,
	pub tools: &'a ToolState,
	pub transform: &'a ViewTransform,
	pub colors: &'a GraphColors,
	pub width: f64,
	pub height: f64,
}

/// Renders a complete frame.
pub fn render(scene: &mut Scene<'_>, ctx: &CanvasRenderingContext2d, config: &ScaleConfig) {
	let scale = ScaledValues::new(config, scene.transform.k);

	ctx.set_fill_style_str(&scene.colors.background);
	ctx.fill_rect(0.0, 0.0, scene.width, scene.height);

	ctx.save();
	let _ = ctx.translate(scene.transform.x, scene.transform.y);
	let _ = ctx.scale(scene.transform.k, scene.transform.k);

	draw_links(scene, ctx, &scale);
	draw_nodes(scene, ctx, config, &scale);
	draw_labels(scene, ctx, config, &scale);

	ctx.restore();

	draw_selection_rect(scene, ctx);
}

/// The drawable path of a link, if both endpoints have positions.
pub fn link_path(
	link: &GraphLink,
	curvature: &CurvatureMap,
	positions: &HashMap<NodeId, (f64, f64)>,
) -> Option<LinkPath> {
	let source = *positions.get(&link.source)?;
	if link.is_self_loop() {
		return Some(LinkPath::self_loop(source, curvature.get(&link.id)));
	}
	let target = *positions.get(&link.target)?;
	Some(LinkPath::between(source, target, curvature.get(&link.id)))
}

fn draw_links(scene: &mut Scene<'_>, ctx: &CanvasRenderingContext2d, scale: &ScaledValues) {
	for link in &scene.snapshot.links {
		let Some(path) = link_path(link, scene.curvature, scene.positions) else {
			continue;
		};

		let hovered = scene.tools.hovered_link.as_ref() == Some(&link.id);
		let selected = scene.tools.selected_links.contains(&link.id);
		let color = if selected {
			&scene.colors.link.selected
		} else if hovered {
			&scene.colors.link.hovered
		} else {
			&scene.colors.link.default
		};
		let width = if hovered {
			scale.hovered_link_width
		} else {
			scale.link_width
		};

		ctx.set_stroke_style_str(color);
		ctx.set_line_width(width);
		ctx.begin_path();
		ctx.move_to(path.start.0, path.start.1);
		let _ = ctx.quadratic_curve_to(path.control.0, path.control.1, path.end.0, path.end.1);
		ctx.stroke();

		if let Some((ux, uy)) = path.end_direction() {
			draw_arrowhead(ctx, &path, (ux, uy), scale, color);
		}
	}
}

fn draw_arrowhead(
	ctx: &CanvasRenderingContext2d,
	path: &LinkPath,
	(ux, uy): (f64, f64),
	scale: &ScaledValues,
	color: &str,
) {
	// pull the tip back to the target node's edge
	let (tip_x, tip_y) = (
		path.end.0 - ux * scale.node_radius,
		path.end.1 - uy * scale.node_radius,
	);
	let (back_x, back_y) = (tip_x - ux * scale.arrow_size, tip_y - uy * scale.arrow_size);
	let (px, py) = (-uy * scale.arrow_size * 0.5, ux * scale.arrow_size * 0.5);

	ctx.set_fill_style_str(color);
	ctx.begin_path();
	ctx.move_to(tip_x, tip_y);
	ctx.line_to(back_x + px, back_y + py);
	ctx.line_to(back_x - px, back_y - py);
	ctx.close_path();
	ctx.fill();
}

fn draw_nodes(
	scene: &mut Scene<'_>,
	ctx: &CanvasRenderingContext2d,
	_config: &ScaleConfig,
	scale: &ScaledValues,
) {
	for node in &scene.snapshot.nodes {
		let Some(&(x, y)) = scene.positions.get(&node.id) else {
			continue;
		};

		if node.labels.is_empty() {
			ctx.begin_path();
			let _ = ctx.arc(x, y, scale.node_radius, 0.0, 2.0 * PI);
			ctx.set_fill_style_str(&scene.colors.node.fill);
			ctx.fill();
		} else {
			// one equal pie slice per label
			let slice = 2.0 * PI / node.labels.len() as f64;
			for (i, label) in node.labels.iter().enumerate() {
				let color = scene.label_colors.color_for(label, &scene.colors.palette);
				let start = slice * i as f64;

				ctx.begin_path();
				ctx.move_to(x, y);
				let _ = ctx.arc(x, y, scale.node_radius, start, start + slice);
				ctx.set_fill_style_str(&color);
				ctx.fill();
			}
		}

		let hovered = scene.tools.hovered_node.as_ref() == Some(&node.id);
		let selected = scene.tools.selected_nodes.contains(&node.id)
			|| scene.tools.is_rect_candidate(&node.id);

		let border = if hovered {
			Some((scale.hovered_border, &scene.colors.node.border_hovered))
		} else if selected {
			Some((scale.selected_border, &scene.colors.node.border_selected))
		} else {
			None
		};

		if let Some((width, color)) = border {
			ctx.begin_path();
			let _ = ctx.arc(x, y, scale.node_radius + width / 2.0, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(color);
			ctx.set_line_width(width);
			ctx.stroke();
		}
	}
}

fn draw_labels(
	scene: &mut Scene<'_>,
	ctx: &CanvasRenderingContext2d,
	config: &ScaleConfig,
	scale: &ScaledValues,
) {
	ctx.set_font(&scale.label_font);
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");

	for node in &scene.snapshot.nodes {
		let Some(&(x, y)) = scene.positions.get(&node.id) else {
			continue;
		};

		let text = truncate_text(ctx, &node.name, scale.max_label_width);
		let (bg_width, bg_height) = measure_box(ctx, &text, config, scale);
		let box_x = x - bg_width / 2.0;
		let box_y = y + scale.node_radius + config.node.label_offset;

		scene.labels.set_node_box(
			node.id.clone(),
			LabelBox {
				x: box_x,
				y: box_y,
				width: bg_width,
				height: bg_height,
			},
		);

		if !scene.labels.node_label_visible(&node.id) {
			continue;
		}

		ctx.set_fill_style_str(&scene.colors.text.background);
		ctx.fill_rect(box_x, box_y, bg_width, bg_height);
		ctx.set_fill_style_str(&scene.colors.text.foreground);
		let _ = ctx.fill_text(&text, x, box_y + bg_height / 2.0);
	}

	for link in &scene.snapshot.links {
		let Some(path) = link_path(link, scene.curvature, scene.positions) else {
			continue;
		};
		let (mx, my) = path.midpoint();

		let text = truncate_text(ctx, &link.name, scale.max_label_width);
		let (bg_width, bg_height) = measure_box(ctx, &text, config, scale);
		let box_x = mx - bg_width / 2.0;
		let box_y = my - bg_height / 2.0;

		scene.labels.set_link_box(
			link.id.clone(),
			LabelBox {
				x: box_x,
				y: box_y,
				width: bg_width,
				height: bg_height,
			},
		);

		if !scene.labels.link_label_visible(&link.id) {
			continue;
		}

		ctx.set_fill_style_str(&scene.colors.text.background);
		ctx.fill_rect(box_x, box_y, bg_width, bg_height);
		ctx.set_fill_style_str(&scene.colors.text.foreground);
		let _ = ctx.fill_text(&text, mx, my);
	}
}

fn measure_box(
	ctx: &CanvasRenderingContext2d,
	text: &str,
	config: &ScaleConfig,
	scale: &ScaledValues,
) -> (f64, f64) {
	let text_width = ctx
		.measure_text(text)
		.map(|m| m.width())
		.unwrap_or_default();
	(
		(text_width + config.label.padding).ceil(),
		(scale.font_size + config.label.padding).ceil(),
	)
}

/// Shortens `text` with a trailing ellipsis until it fits `max_width` under
/// the context's current font.
fn truncate_text(ctx: &CanvasRenderingContext2d, text: &str, max_width: f64) -> String {
	let measure = |s: &str| ctx.measure_text(s).map(|m| m.width()).unwrap_or_default();

	if measure(text) <= max_width {
		return text.to_string();
	}

	let ellipsis = '\u{2026}';
	let ellipsis_width = measure(&ellipsis.to_string());
	let mut truncated: String = text.to_string();
	while !truncated.is_empty() && measure(&truncated) + ellipsis_width > max_width {
		truncated.pop();
	}
	truncated.push(ellipsis);
	truncated
}

fn draw_selection_rect(scene: &Scene<'_>, ctx: &CanvasRenderingContext2d) {
	let Some(rect) = &scene.tools.rect else {
		return;
	};

	let (min_x, min_y, max_x, max_y) = rect.bounds();
	let (w, h) = (max_x - min_x, max_y - min_y);

	ctx.set_fill_style_str(&scene.colors.selection_fill);
	ctx.fill_rect(min_x, min_y, w, h);
	ctx.set_stroke_style_str(&scene.colors.selection_border);
	ctx.set_line_width(1.0);
	let _ = ctx.set_line_dash(&js_sys::Array::of2(
		&JsValue::from_f64(4.0),
		&JsValue::from_f64(2.0),
	));
	ctx.stroke_rect(min_x, min_y, w, h);
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}
