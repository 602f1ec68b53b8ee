//! Curvature assignment and link path geometry.
//!
//! Multiple links between the same pair of nodes, and multiple self-loops on
//! one node, would render as perfectly overlapping paths. Each link gets a
//! signed curvature scalar so parallel links fan out: the first link of a pair
//! stays straight, later ones alternate to either side with growing magnitude.
//! Self-loops start bent (a straight self-loop is not drawable) and alternate
//! the same way with their own step constant.
//!
//! Assignment order is link insertion order, so the result is deterministic
//! for a fixed sequence of additions and the first-added link always wins the
//! straight line. [`LinkPath`] turns a curvature into the quadratic-Bezier
//! path the renderer strokes and the hit test samples.

use std::collections::HashMap;
use std::f64::consts::PI;

use super::types::{GraphLink, LinkId, NodeId};

/// Curvature increment between successive links of the same node pair.
pub const CURVATURE_STEP: f64 = 0.2;

/// Curvature increment between successive self-loops on the same node.
pub const SELF_LOOP_CURVATURE_STEP: f64 = 0.3;

/// Self-loop control point distance per unit of curvature magnitude.
const SELF_LOOP_RADIUS: f64 = 75.0;

/// Sample count for the subdivision-based distance approximation.
const HIT_TEST_SAMPLES: usize = 16;

/// Signed bend factor per link, derived from the current link list.
#[derive(Clone, Debug, Default)]
pub struct CurvatureMap {
	curvatures: HashMap<LinkId, f64>,
}

impl CurvatureMap {
	/// Assigns curvatures over `links` in iteration order.
	///
	/// Inter-node links are grouped by the unordered endpoint pair and get
	/// `0, +step, -step, +2 step, -2 step, ...` within the group. Self-loops
	/// are grouped per node and get `+step, -step, +2 step, -2 step, ...`
	/// with [`SELF_LOOP_CURVATURE_STEP`].
	pub fn assign(links: &[GraphLink]) -> Self {
		let mut pair_counts: HashMap<(NodeId, NodeId), usize> = HashMap::new();
		let mut self_counts: HashMap<NodeId, usize> = HashMap::new();
		let mut curvatures = HashMap::new();

		for link in links {
			let curvature = if link.is_self_loop() {
				let count = self_counts.entry(link.source.clone()).or_insert(0);
				let index = (*count / 2 + 1) as f64;
				let sign = if *count % 2 == 0 { 1.0 } else { -1.0 };
				*count += 1;
				sign * index * SELF_LOOP_CURVATURE_STEP
			} else {
				let pair = if link.source <= link.target {
					(link.source.clone(), link.target.clone())
				} else {
					(link.target.clone(), link.source.clone())
				};
				let count = pair_counts.entry(pair).or_insert(0);
				let curvature = if *count == 0 {
					0.0
				} else {
					let index = ((*count - 1) / 2 + 1) as f64;
					let sign = if *count % 2 == 1 { 1.0 } else { -1.0 };
					sign * index * CURVATURE_STEP
				};
				*count += 1;
				curvature
			};

			curvatures.insert(link.id.clone(), curvature);
		}

		Self { curvatures }
	}

	/// Curvature for a link, `0.0` for unknown ids.
	pub fn get(&self, id: &LinkId) -> f64 {
		self.curvatures.get(id).copied().unwrap_or(0.0)
	}
}

/// Quadratic-Bezier path of one rendered link.
///
/// Shared by the renderer (stroke + arrowhead + label midpoint) and the
/// pointer hit test so both agree on where the link actually is.
#[derive(Clone, Copy, Debug)]
pub struct LinkPath {
	/// Path start (source node position).
	pub start: (f64, f64),
	/// Bezier control point.
	pub control: (f64, f64),
	/// Path end (target node position).
	pub end: (f64, f64),
}

impl LinkPath {
	/// Path between two distinct endpoints.
	///
	/// The control point sits at the segment midpoint, offset perpendicular
	/// to the source-target line by `curvature * distance`. Zero curvature
	/// degenerates to the straight segment.
	pub fn between(source: (f64, f64), target: (f64, f64), curvature: f64) -> Self {
		let (dx, dy) = (target.0 - source.0, target.1 - source.1);
		let len = (dx * dx + dy * dy).sqrt();
		let mid = ((source.0 + target.0) / 2.0, (source.1 + target.1) / 2.0);

		let control = if len < f64::EPSILON || curvature == 0.0 {
			mid
		} else {
			// unit normal to the source->target line
			let (nx, ny) = (-dy / len, dx / len);
			(mid.0 - curvature * len * nx, mid.1 - curvature * len * ny)
		};

		Self {
			start: source,
			control,
			end: target,
		}
	}

	/// Path of a self-loop: both endpoints at the node, control point at a
	/// fixed-radius diagonal offset. Positive curvature loops up-right,
	/// negative down-left.
	pub fn self_loop(position: (f64, f64), curvature: f64) -> Self {
		let radius = SELF_LOOP_RADIUS * curvature.abs();
		let angle = if curvature > 0.0 { -PI / 4.0 } else { 3.0 * PI / 4.0 };
		let control = (
			position.0 + angle.cos() * radius,
			position.1 + angle.sin() * radius,
		);

		Self {
			start: position,
			control,
			end: position,
		}
	}

	/// Evaluates the path at parameter `t` in `[0, 1]`.
	pub fn point_at(&self, t: f64) -> (f64, f64) {
		let u = 1.0 - t;
		(
			u * u * self.start.0 + 2.0 * u * t * self.control.0 + t * t * self.end.0,
			u * u * self.start.1 + 2.0 * u * t * self.control.1 + t * t * self.end.1,
		)
	}

	/// Visual midpoint of the path, where the link label is placed.
	pub fn midpoint(&self) -> (f64, f64) {
		self.point_at(0.5)
	}

	/// Path tangent direction at the end point, unit length. Used to orient
	/// the arrowhead. `None` when the path has no extent.
	pub fn end_direction(&self) -> Option<(f64, f64)> {
		// quadratic derivative at t = 1 points from control to end
		let (dx, dy) = (self.end.0 - self.control.0, self.end.1 - self.control.1);
		let len = (dx * dx + dy * dy).sqrt();
		if len < f64::EPSILON {
			return None;
		}
		Some((dx / len, dy / len))
	}

	/// Approximate distance from a point to the path, by sampling a fixed
	/// subdivision and taking the nearest sample.
	pub fn distance_to(&self, point: (f64, f64)) -> f64 {
		let mut best = f64::INFINITY;
		for i in 0..=HIT_TEST_SAMPLES {
			let t = i as f64 / HIT_TEST_SAMPLES as f64;
			let (x, y) = self.point_at(t);
			let (dx, dy) = (x - point.0, y - point.1);
			best = best.min((dx * dx + dy * dy).sqrt());
		}
		best
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn link(id: &str, source: &str, target: &str) -> GraphLink {
		GraphLink {
			id: LinkId::from(id),
			name: id.to_string(),
			source: NodeId::from(source),
			target: NodeId::from(target),
		}
	}

	fn assert_close(actual: f64, expected: f64) {
		assert!(
			(actual - expected).abs() < 1e-9,
			"expected {expected}, got {actual}"
		);
	}

	#[test]
	fn first_link_of_a_pair_is_straight() {
		let map = CurvatureMap::assign(&[link("e1", "x", "y")]);
		assert_close(map.get(&LinkId::from("e1")), 0.0);
	}

	#[test]
	fn parallel_links_fan_out_regardless_of_direction() {
		// e2 runs the opposite way; grouping is by unordered pair
		let links = vec![
			link("e1", "x", "y"),
			link("e2", "y", "x"),
			link("e3", "x", "y"),
			link("e4", "x", "y"),
			link("e5", "y", "x"),
		];
		let map = CurvatureMap::assign(&links);

		assert_close(map.get(&LinkId::from("e1")), 0.0);
		assert_close(map.get(&LinkId::from("e2")), CURVATURE_STEP);
		assert_close(map.get(&LinkId::from("e3")), -CURVATURE_STEP);
		assert_close(map.get(&LinkId::from("e4")), 2.0 * CURVATURE_STEP);
		assert_close(map.get(&LinkId::from("e5")), -2.0 * CURVATURE_STEP);
	}

	#[test]
	fn self_loops_alternate_with_growing_magnitude() {
		let links = vec![
			link("s1", "n", "n"),
			link("s2", "n", "n"),
			link("s3", "n", "n"),
			link("s4", "n", "n"),
		];
		let map = CurvatureMap::assign(&links);

		assert_close(map.get(&LinkId::from("s1")), SELF_LOOP_CURVATURE_STEP);
		assert_close(map.get(&LinkId::from("s2")), -SELF_LOOP_CURVATURE_STEP);
		assert_close(map.get(&LinkId::from("s3")), 2.0 * SELF_LOOP_CURVATURE_STEP);
		assert_close(map.get(&LinkId::from("s4")), -2.0 * SELF_LOOP_CURVATURE_STEP);
	}

	#[test]
	fn groups_are_independent() {
		let links = vec![
			link("e1", "x", "y"),
			link("e2", "x", "z"),
			link("s1", "x", "x"),
		];
		let map = CurvatureMap::assign(&links);

		// each singleton pair stays straight; the self-loop does not
		assert_close(map.get(&LinkId::from("e1")), 0.0);
		assert_close(map.get(&LinkId::from("e2")), 0.0);
		assert_close(map.get(&LinkId::from("s1")), SELF_LOOP_CURVATURE_STEP);
	}

	#[test]
	fn unknown_link_is_straight() {
		let map = CurvatureMap::assign(&[]);
		assert_close(map.get(&LinkId::from("missing")), 0.0);
	}

	#[test]
	fn straight_path_midpoint_is_segment_midpoint() {
		let path = LinkPath::between((0.0, 0.0), (10.0, 6.0), 0.0);
		let (mx, my) = path.midpoint();
		assert_close(mx, 5.0);
		assert_close(my, 3.0);
	}

	#[test]
	fn curved_path_midpoint_offsets_perpendicular() {
		// horizontal segment of length 10; curvature 0.2 puts the control
		// point at curvature * distance = 2 below the midpoint, so the curve
		// midpoint sits half that far from the chord
		let path = LinkPath::between((0.0, 0.0), (10.0, 0.0), 0.2);
		assert_close(path.control.0, 5.0);
		assert_close(path.control.1, -2.0);

		let (mx, my) = path.midpoint();
		assert_close(mx, 5.0);
		assert_close(my, -1.0);
	}

	#[test]
	fn self_loop_path_returns_to_node() {
		let path = LinkPath::self_loop((4.0, 4.0), SELF_LOOP_CURVATURE_STEP);
		assert_eq!(path.start, (4.0, 4.0));
		assert_eq!(path.end, (4.0, 4.0));

		// positive curvature loops toward the upper-right diagonal
		assert!(path.control.0 > 4.0);
		assert!(path.control.1 < 4.0);

		let (mx, my) = path.midpoint();
		assert!(mx > 4.0);
		assert!(my < 4.0);
	}

	#[test]
	fn distance_to_tracks_the_curve() {
		let straight = LinkPath::between((0.0, 0.0), (10.0, 0.0), 0.0);
		assert!(straight.distance_to((5.0, 0.0)) < 1e-9);
		assert_close(straight.distance_to((5.0, 3.0)), 3.0);

		// a point on the curved midpoint is near the curved path but not the chord
		let curved = LinkPath::between((0.0, 0.0), (10.0, 0.0), 0.2);
		assert!(curved.distance_to((5.0, -1.0)) < 0.1);
		assert!(curved.distance_to((5.0, 1.0)) > 1.5);
	}
}
