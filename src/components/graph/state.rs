use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::types::{ClusterId, GraphEdge, GraphNode};

const COLORS: &[&str] = &[
	"#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
	"#bcbd22", "#17becf",
];

pub const NODE_RADIUS: f64 = 6.0;
pub const HIT_RADIUS: f64 = 12.0;
pub const SELF_LOOP_RADIUS: f64 = 14.0;

/// Per-node payload carried through the physics engine.
#[derive(Clone, Debug)]
pub struct NodeInfo {
	pub id: ClusterId,
	pub label: String,
	/// Resolved fill: highlight override or group-derived palette color.
	pub color: String,
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Drawable edge resolved against the physics node indices.
#[derive(Clone, Debug)]
pub struct CanvasEdge {
	pub source: DefaultNodeIdx,
	pub target: DefaultNodeIdx,
	/// Aggregated claim count in collapsed mode.
	pub weight: Option<u64>,
	pub title: String,
	/// Perpendicular offset separating parallel edges.
	pub offset: f64,
}

/// Canvas-side state: the force layout plus view/interaction bookkeeping.
pub struct GraphCanvasState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	edges: Vec<CanvasEdge>,
	index_of: HashMap<ClusterId, DefaultNodeIdx>,
}

/// Palette color for a node group.
pub fn group_color(group: &ClusterId) -> &'static str {
	let index = match group {
		ClusterId::Id(id) => id.rem_euclid(COLORS.len() as i64) as usize,
		ClusterId::Entity(name) => {
			name.bytes()
				.fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize))
				% COLORS.len()
		}
	};
	COLORS[index]
}

fn resolve_color(node: &GraphNode) -> String {
	node.color
		.clone()
		.unwrap_or_else(|| group_color(&node.group).to_string())
}

impl GraphCanvasState {
	/// Build the layout from an aggregated `{nodes, edges}` pair.
	pub fn new(nodes: &[GraphNode], edges: &[GraphEdge], width: f64, height: f64) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		});
		let mut index_of = HashMap::new();

		for (i, node) in nodes.iter().enumerate() {
			let angle = (i as f64) * 2.0 * PI / nodes.len().max(1) as f64;
			let (x, y) = (
				(width / 2.0 + 100.0 * angle.cos()) as f32,
				(height / 2.0 + 100.0 * angle.sin()) as f32,
			);

			let idx = graph.add_node(NodeData {
				x,
				y,
				mass: 10.0,
				is_anchor: false,
				user_data: NodeInfo {
					id: node.id.clone(),
					label: node.label.clone(),
					color: resolve_color(node),
				},
			});
			index_of.insert(node.id.clone(), idx);
		}

		// one spring per distinct pair; parallel edges only fan out visually
		let mut springs: HashSet<(DefaultNodeIdx, DefaultNodeIdx)> = HashSet::new();
		let mut lanes: HashMap<(DefaultNodeIdx, DefaultNodeIdx), u32> = HashMap::new();
		let mut canvas_edges = Vec::new();

		for edge in edges {
			let (Some(&src), Some(&tgt)) = (index_of.get(&edge.from), index_of.get(&edge.to))
			else {
				continue;
			};
			if src != tgt && springs.insert((src, tgt)) {
				graph.add_edge(src, tgt, EdgeData::default());
			}

			let lane = lanes.entry((src, tgt)).or_insert(0);
			let magnitude = ((*lane + 1) / 2) as f64 * 10.0;
			let offset = if *lane % 2 == 0 { magnitude } else { -magnitude };
			*lane += 1;

			canvas_edges.push(CanvasEdge {
				source: src,
				target: tgt,
				weight: edge.value,
				title: edge.title.clone(),
				offset,
			});
		}

		Self {
			graph,
			transform: ViewTransform {
				x: 0.0,
				y: 0.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			width,
			height,
			animation_running: true,
			edges: canvas_edges,
			index_of,
		}
	}

	pub fn edges(&self) -> &[CanvasEdge] {
		&self.edges
	}

	/// Graph-space positions of every node, keyed by physics index.
	pub fn node_positions(&self) -> HashMap<DefaultNodeIdx, (f64, f64)> {
		let mut positions = HashMap::new();
		self.graph.visit_nodes(|node| {
			positions.insert(node.index(), (node.x() as f64, node.y() as f64));
		});
		positions
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			// HIT_RADIUS is in world-space, scales with zoom like nodes
			if (dx * dx + dy * dy).sqrt() < HIT_RADIUS {
				found = Some(node.index());
			}
		});
		found
	}

	/// Cluster id of the node under the cursor, if any.
	pub fn node_id_at_position(&self, sx: f64, sy: f64) -> Option<ClusterId> {
		let idx = self.node_at_position(sx, sy)?;
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				found = Some(node.data.user_data.id.clone());
			}
		});
		found
	}

	/// Tooltip of the edge under the cursor, if any. Nodes shadow edges.
	pub fn edge_title_at_position(&self, sx: f64, sy: f64) -> Option<String> {
		if self.node_at_position(sx, sy).is_some() {
			return None;
		}
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let positions = self.node_positions();
		let tolerance = 6.0;

		for edge in &self.edges {
			let (Some(&(x1, y1)), Some(&(x2, y2))) =
				(positions.get(&edge.source), positions.get(&edge.target))
			else {
				continue;
			};

			let hit = if edge.source == edge.target {
				// self-loop drawn as a ring above the node
				let (cx, cy) = (x1, y1 - SELF_LOOP_RADIUS);
				let dist = ((gx - cx).powi(2) + (gy - cy).powi(2)).sqrt();
				(dist - SELF_LOOP_RADIUS).abs() < tolerance
			} else {
				segment_distance(gx, gy, x1, y1, x2, y2) < tolerance
			};
			if hit {
				return Some(edge.title.clone());
			}
		}
		None
	}

	/// Push highlighter output into the node fills.
	pub fn apply_colors(&mut self, updates: &[GraphNode]) {
		let mut fills: HashMap<DefaultNodeIdx, String> = updates
			.iter()
			.filter_map(|node| {
				self.index_of
					.get(&node.id)
					.map(|&idx| (idx, resolve_color(node)))
			})
			.collect();

		self.graph.visit_nodes_mut(|node| {
			if let Some(fill) = fills.remove(&node.index()) {
				node.data.user_data.color = fill;
			}
		});
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

/// Distance from a point to a line segment, in graph space.
fn segment_distance(px: f64, py: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
	let (dx, dy) = (x2 - x1, y2 - y1);
	let len_sq = dx * dx + dy * dy;
	if len_sq < f64::EPSILON {
		return ((px - x1).powi(2) + (py - y1).powi(2)).sqrt();
	}
	let t = (((px - x1) * dx + (py - y1) * dy) / len_sq).clamp(0.0, 1.0);
	let (cx, cy) = (x1 + t * dx, y1 + t * dy);
	((px - cx).powi(2) + (py - cy).powi(2)).sqrt()
}
