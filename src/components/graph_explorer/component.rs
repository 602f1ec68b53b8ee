//! Leptos component wrapping the graph explorer canvas.
//!
//! The component owns the engine (store, tools, layout, derived maps) behind
//! an `Rc<RefCell<..>>`, wires mouse/wheel events into gesture interpretation,
//! and runs a `requestAnimationFrame` loop that ticks the simulation and
//! redraws. Tool and search chrome render as overlays above the canvas.
//!
//! Every event handler funnels into the engine's synchronous methods; the
//! engine applies mutations, commits, and refreshes derived state in one
//! step, so handlers never observe a half-updated graph.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use leptos::prelude::*;
use log::debug;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::curvature::CurvatureMap;
use super::labels::LabelLayout;
use super::layout::{GraphLayout, SimulationConfig, ViewTransform};
use super::render::{self, Scene};
use super::scale::{ScaleConfig, ScaledValues};
use super::source::{GraphSource, SearchHit};
use super::store::{GraphSnapshot, GraphStore};
use super::theme::{GraphColors, LabelColors};
use super::tools::{ExpandRequest, Modifiers, Tool, ToolState};
use super::types::{GraphData, LinkId, NodeId};

/// Pixels of movement before a press becomes a drag instead of a click.
const DRAG_TOLERANCE: f64 = 3.0;

/// Maximum search results shown in the overlay.
const SEARCH_LIMIT: usize = 10;

/// What the current pointer press is doing.
enum Gesture {
	Idle,
	/// Pressed on a node; becomes a drag past the tolerance.
	PressNode {
		id: NodeId,
		start: (f64, f64),
		last: (f64, f64),
		modifiers: Modifiers,
		dragging: bool,
	},
	/// Pressed on the background; pans the view.
	Pan {
		start: (f64, f64),
		origin: (f64, f64),
		modifiers: Modifiers,
		moved: bool,
	},
	/// Dragging the selection rectangle.
	Rect,
}

/// The complete engine state behind the canvas.
struct Engine {
	store: GraphStore,
	tools: ToolState,
	layout: GraphLayout,
	curvature: CurvatureMap,
	labels: LabelLayout,
	label_colors: LabelColors,
	snapshot: Rc<GraphSnapshot>,
	transform: ViewTransform,
	scale: ScaleConfig,
	colors: GraphColors,
	source: Option<Rc<dyn GraphSource>>,
	gesture: Gesture,
	width: f64,
	height: f64,
}

impl Engine {
	fn new(
		data: GraphData,
		source: Option<Rc<dyn GraphSource>>,
		colors: GraphColors,
		width: f64,
		height: f64,
	) -> Self {
		let store = GraphStore::new();
		let snapshot = store.snapshot();
		let mut engine = Self {
			store,
			tools: ToolState::new(),
			layout: GraphLayout::new(width, height, SimulationConfig::default()),
			curvature: CurvatureMap::default(),
			labels: LabelLayout::new(),
			label_colors: LabelColors::new(),
			snapshot,
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			scale: ScaleConfig::default(),
			colors,
			source,
			gesture: Gesture::Idle,
			width,
			height,
		};
		engine.load(data);
		engine
	}

	/// Replace-loads a dataset and publishes it.
	fn load(&mut self, data: GraphData) {
		self.store.add_graph_data(data, true);
		self.store.commit();
		self.refresh();
	}

	/// Rebuilds everything derived from the published snapshot.
	fn refresh(&mut self) {
		self.snapshot = self.store.snapshot();
		self.layout.rebuild(&self.snapshot);
		self.curvature = CurvatureMap::assign(&self.snapshot.links);
		self.tools.prune(&self.store);
		self.labels.retain(&self.snapshot);
		self.labels.mark_dirty();
	}

	/// Commits pending mutations and refreshes if a new snapshot appeared.
	/// Also catches snapshots published by the tool machine itself.
	fn sync(&mut self) {
		self.store.commit();
		if !Rc::ptr_eq(&self.snapshot, &self.store.snapshot()) {
			self.refresh();
		}
	}

	/// Serves an expand-tool click from the graph source.
	fn expand(&mut self, request: &ExpandRequest) {
		let Some(source) = self.source.clone() else {
			return;
		};
		let neighbors = source.neighbors(&request.id, request.direction);
		debug!(
			"expand {}: {} neighbors",
			request.id,
			neighbors.len()
		);
		for neighbor in neighbors {
			self.store.add_node(neighbor.node);
			self.store.add_link(neighbor.link);
		}
		self.sync();
	}

	/// Adds a node picked from the search overlay.
	fn add_search_hit(&mut self, hit: &SearchHit) {
		self.store.add_node(hit.node.clone());
		self.sync();
	}

	fn scaled(&self) -> ScaledValues {
		ScaledValues::new(&self.scale, self.transform.k)
	}

	fn node_at(&self, sx: f64, sy: f64) -> Option<NodeId> {
		let (gx, gy) = self.transform.screen_to_graph(sx, sy);
		self.layout.node_at(gx, gy, self.scaled().hit_radius)
	}

	fn link_at(&self, sx: f64, sy: f64) -> Option<LinkId> {
		let (gx, gy) = self.transform.screen_to_graph(sx, sy);
		let hit_distance = self.scaled().link_hit_distance;
		let positions = self.layout.positions();

		let mut found = None;
		for link in &self.snapshot.links {
			if let Some(path) = render::link_path(link, &self.curvature, &positions) {
				if path.distance_to((gx, gy)) < hit_distance {
					found = Some(link.id.clone());
				}
			}
		}
		found
	}

	fn mousedown(&mut self, x: f64, y: f64, modifiers: Modifiers) {
		// the rectangle draft starts anywhere, nodes included
		if self.tools.tool() == Tool::RectangularSelection {
			self.tools.begin_rect(x, y, modifiers);
			self.gesture = Gesture::Rect;
		} else if let Some(id) = self.node_at(x, y) {
			self.gesture = Gesture::PressNode {
				id,
				start: (x, y),
				last: (x, y),
				modifiers,
				dragging: false,
			};
		} else {
			self.gesture = Gesture::Pan {
				start: (x, y),
				origin: (self.transform.x, self.transform.y),
				modifiers,
				moved: false,
			};
		}
	}

	fn mousemove(&mut self, x: f64, y: f64) {
		match &mut self.gesture {
			Gesture::Idle => {
				self.tools.hovered_node = self.node_at(x, y);
				self.tools.hovered_link = if self.tools.hovered_node.is_none() {
					self.link_at(x, y)
				} else {
					None
				};
			}
			Gesture::PressNode {
				id,
				start,
				last,
				dragging,
				..
			} => {
				let (dx, dy) = (x - start.0, y - start.1);
				if !*dragging && (dx * dx + dy * dy).sqrt() > DRAG_TOLERANCE {
					*dragging = true;
				}
				if *dragging {
					let (gdx, gdy) = (
						(x - last.0) / self.transform.k,
						(y - last.1) / self.transform.k,
					);
					*last = (x, y);

					// dragging a selected node drags the whole selection
					let ids: HashSet<NodeId> = if self.tools.selected_nodes.contains(id) {
						self.tools.selected_nodes.clone()
					} else {
						HashSet::from([id.clone()])
					};
					self.layout.translate(&ids, gdx, gdy);
				}
			}
			Gesture::Pan {
				start,
				origin,
				moved,
				..
			} => {
				let (dx, dy) = (x - start.0, y - start.1);
				if (dx * dx + dy * dy).sqrt() > DRAG_TOLERANCE {
					*moved = true;
				}
				self.transform.x = origin.0 + dx;
				self.transform.y = origin.1 + dy;
			}
			Gesture::Rect => {
				let transform = self.transform.clone();
				let positions = self.layout.positions();
				self.tools.update_rect(
					x,
					y,
					|sx, sy| transform.screen_to_graph(sx, sy),
					&positions,
				);
			}
		}
	}

	/// Ends the current gesture. Returns the active tool afterwards, which
	/// may have auto-reverted to `Move`.
	fn mouseup(&mut self, x: f64, y: f64) -> Tool {
		let gesture = std::mem::replace(&mut self.gesture, Gesture::Idle);
		match gesture {
			Gesture::Idle => {}
			Gesture::PressNode {
				id,
				modifiers,
				dragging,
				..
			} => {
				if dragging {
					// pin every dragged node where the drag left it
					if self.tools.selected_nodes.contains(&id) {
						for moved in &self.tools.selected_nodes {
							self.layout.anchor(moved);
						}
					} else {
						self.layout.anchor(&id);
					}
				} else {
					let request = self.tools.node_click(&mut self.store, &id, modifiers);
					self.sync();
					if let Some(request) = request {
						self.expand(&request);
					}
				}
			}
			Gesture::Pan {
				moved, modifiers, ..
			} => {
				if !moved {
					// a stationary background press is a click
					if let Some(link) = self.link_at(x, y) {
						self.tools.link_click(&mut self.store, &link, modifiers);
						self.sync();
					} else {
						self.tools.background_click();
					}
				}
			}
			Gesture::Rect => {
				self.tools.finish_rect();
			}
		}
		self.tools.tool()
	}

	fn mouseleave(&mut self) {
		self.gesture = Gesture::Idle;
		self.tools.hovered_node = None;
		self.tools.hovered_link = None;
	}

	fn wheel(&mut self, x: f64, y: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		self.transform.zoom_about(x, y, factor);
		self.labels.mark_dirty();
	}

	fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.layout.resize(width, height);
	}

	/// One animation frame: advance the simulation, draw, then resolve
	/// label overlaps from the boxes this draw just captured.
	fn frame(&mut self, ctx: &CanvasRenderingContext2d, dt: f32) {
		self.layout.tick(dt);

		let positions = self.layout.positions();
		let mut scene = Scene {
			snapshot: self.snapshot.as_ref(),
			positions: &positions,
			curvature: &self.curvature,
			labels: &mut self.labels,
			label_colors: &mut self.label_colors,
			tools: &self.tools,
			transform: &self.transform,
			colors: &self.colors,
			width: self.width,
			height: self.height,
		};
		render::render(&mut scene, ctx, &self.scale);

		if self.labels.take_dirty() {
			self.labels.resolve(&self.snapshot);
		}
	}
}

fn event_position(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

fn event_modifiers(ev: &MouseEvent) -> Modifiers {
	Modifiers {
		alt: ev.alt_key(),
		ctrl: ev.ctrl_key(),
		shift: ev.shift_key(),
	}
}

/// Renders an interactive graph explorer on a canvas element.
///
/// Pass graph data via the reactive `data` signal; changes replace-load the
/// store. Give a [`GraphSource`] to enable the expand tools and the search
/// box. The component sizes itself to its parent container by default; set
/// `fullscreen = true` to fill the viewport and resize with the window.
#[component]
pub fn GraphExplorer(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(default = None, strip_option)] source: Option<Rc<dyn GraphSource>>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	#[prop(default = None, strip_option)] colors: Option<GraphColors>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let engine: Rc<RefCell<Option<Engine>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));

	let active_tool = RwSignal::new(Tool::Move);
	let search_query = RwSignal::new(String::new());
	let search_hits = RwSignal::new(Vec::<SearchHit>::new());

	let (engine_init, animate_init, resize_cb_init) =
		(engine.clone(), animate.clone(), resize_cb.clone());
	let source_init = source.clone();
	let colors_init = colors.clone();

	Effect::new(move |_| {
		let data = data.get();

		// later runs only reload the dataset
		if let Some(ref mut e) = *engine_init.borrow_mut() {
			e.load(data);
			return;
		}

		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let window: Window = web_sys::window().unwrap();

		let (w, h) = if fullscreen {
			(
				window.inner_width().unwrap().as_f64().unwrap(),
				window.inner_height().unwrap().as_f64().unwrap(),
			)
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.unwrap()
			.unwrap()
			.dyn_into()
			.unwrap();

		*engine_init.borrow_mut() = Some(Engine::new(
			data,
			source_init.clone(),
			colors_init.clone().unwrap_or_default(),
			w,
			h,
		));

		if fullscreen {
			let (engine_resize, canvas_resize) = (engine_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let win: Window = web_sys::window().unwrap();
				let (nw, nh) = (
					win.inner_width().unwrap().as_f64().unwrap(),
					win.inner_height().unwrap().as_f64().unwrap(),
				);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut e) = *engine_resize.borrow_mut() {
					e.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (engine_anim, animate_inner) = (engine_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut e) = *engine_anim.borrow_mut() {
				e.frame(&ctx, 0.016);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				let _ = web_sys::window()
					.unwrap()
					.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let engine_md = engine.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let (x, y) = event_position(&canvas, &ev);
		if let Some(ref mut e) = *engine_md.borrow_mut() {
			e.mousedown(x, y, event_modifiers(&ev));
		}
	};

	let engine_mm = engine.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let (x, y) = event_position(&canvas, &ev);
		if let Some(ref mut e) = *engine_mm.borrow_mut() {
			e.mousemove(x, y);
		}
	};

	let engine_mu = engine.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let (x, y) = event_position(&canvas, &ev);
		if let Some(ref mut e) = *engine_mu.borrow_mut() {
			// rectangular selection auto-reverts the tool on release
			active_tool.set(e.mouseup(x, y));
		}
	};

	let engine_ml = engine.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut e) = *engine_ml.borrow_mut() {
			e.mouseleave();
		}
	};

	let engine_wh = engine.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);
		if let Some(ref mut e) = *engine_wh.borrow_mut() {
			e.wheel(x, y, ev.delta_y());
		}
	};

	let engine_toolbar = engine.clone();
	let toolbar = Tool::ALL
		.into_iter()
		.map(|tool| {
			let engine_btn = engine_toolbar.clone();
			view! {
				<button
					class="graph-explorer-tool"
					class:active=move || active_tool.get() == tool
					title=tool.title()
					on:click=move |_| {
						if let Some(ref mut e) = *engine_btn.borrow_mut() {
							e.tools.set_tool(tool);
						}
						active_tool.set(tool);
					}
				>
					{tool.glyph()}
				</button>
			}
		})
		.collect_view();

	let source_search = source.clone();
	let on_search_input = move |ev: web_sys::Event| {
		let query = event_target_value(&ev);
		search_query.set(query.clone());

		let hits = match &source_search {
			Some(source) if !query.trim().is_empty() => source.search(&query, SEARCH_LIMIT),
			_ => Vec::new(),
		};
		search_hits.set(hits);
	};

	// reactive children must be Send; this local handle is, the Rc is not
	let engine_pick = StoredValue::new_local(engine.clone());
	let search_results = move || {
		search_hits
			.get()
			.into_iter()
			.map(|hit| {
				let label = format!("{} ({})", hit.node.name, hit.category);
				view! {
					<button
						class="graph-explorer-search-hit"
						on:click=move |_| {
							engine_pick.with_value(|engine| {
								if let Some(ref mut e) = *engine.borrow_mut() {
									e.add_search_hit(&hit);
								}
							});
							search_query.set(String::new());
							search_hits.set(Vec::new());
						}
					>
						{label}
					</button>
				}
			})
			.collect_view()
	};

	view! {
		<div class="graph-explorer" style="position: relative; display: block;">
			<canvas
				node_ref=canvas_ref
				class="graph-explorer-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style="display: block; cursor: grab;"
			/>
			<div
				class="graph-explorer-toolbar"
				style="position: absolute; top: 8px; left: 8px; display: flex; gap: 4px;"
			>
				{toolbar}
			</div>
			{source.is_some().then(|| view! {
				<div
					class="graph-explorer-search"
					style="position: absolute; top: 8px; right: 8px; display: flex; flex-direction: column; gap: 2px;"
				>
					<input
						type="text"
						placeholder="Search nodes"
						prop:value=move || search_query.get()
						on:input=on_search_input
					/>
					{search_results}
				</div>
			})}
		</div>
	}
}
