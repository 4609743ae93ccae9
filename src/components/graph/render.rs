use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::{GraphCanvasState, NODE_RADIUS, SELF_LOOP_RADIUS};

const EDGE_COLOR: &str = "rgba(100, 140, 200, 0.6)";
const ARROW_COLOR: &str = "rgba(100, 140, 200, 0.8)";
const LABEL_COLOR: &str = "rgba(40, 40, 40, 0.9)";
const BACKGROUND: &str = "#fdfdfd";

pub fn render(state: &GraphCanvasState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

/// Line width scaled by the collapsed-edge weight, in screen pixels.
fn edge_width(weight: Option<u64>, k: f64) -> f64 {
	let base = 1.5 / k;
	match weight {
		Some(w) if w > 1 => (base * (1.0 + (w as f64).ln())).min(6.0 / k),
		_ => base,
	}
}

fn draw_edges(state: &GraphCanvasState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let positions = state.node_positions();
	let arrow_size = 8.0 / k;

	for edge in state.edges() {
		let (Some(&(x1, y1)), Some(&(x2, y2))) =
			(positions.get(&edge.source), positions.get(&edge.target))
		else {
			continue;
		};

		ctx.set_stroke_style_str(EDGE_COLOR);
		ctx.set_line_width(edge_width(edge.weight, k));

		if edge.source == edge.target {
			draw_self_loop(ctx, x1, y1, edge.weight, k);
			continue;
		}

		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}
		let (ux, uy) = (dx / dist, dy / dist);
		// perpendicular control point separates parallel edges
		let (mx, my) = (
			(x1 + x2) / 2.0 - uy * edge.offset * 2.0,
			(y1 + y2) / 2.0 + ux * edge.offset * 2.0,
		);

		let (start_x, start_y) = (x1 + ux * NODE_RADIUS, y1 + uy * NODE_RADIUS);
		let (tip_x, tip_y) = (x2 - ux * NODE_RADIUS, y2 - uy * NODE_RADIUS);

		ctx.begin_path();
		ctx.move_to(start_x, start_y);
		ctx.quadratic_curve_to(mx, my, tip_x - ux * arrow_size, tip_y - uy * arrow_size);
		ctx.stroke();

		// arrowhead aligned with the curve's approach direction
		let (adx, ady) = (tip_x - mx, tip_y - my);
		let alen = (adx * adx + ady * ady).sqrt().max(0.001);
		let (aux, auy) = (adx / alen, ady / alen);
		let (back_x, back_y) = (tip_x - aux * arrow_size, tip_y - auy * arrow_size);
		let (px, py) = (-auy * arrow_size * 0.5, aux * arrow_size * 0.5);

		ctx.set_fill_style_str(ARROW_COLOR);
		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();

		if let Some(weight) = edge.weight {
			if weight > 1 {
				ctx.set_fill_style_str(LABEL_COLOR);
				ctx.set_font(&format!("{}px sans-serif", 11.0 / k.max(0.5)));
				let _ = ctx.fill_text(&weight.to_string(), mx, my - 3.0 / k);
			}
		}
	}
}

fn draw_self_loop(ctx: &CanvasRenderingContext2d, x: f64, y: f64, weight: Option<u64>, k: f64) {
	let (cx, cy) = (x, y - SELF_LOOP_RADIUS);
	ctx.begin_path();
	// leave a gap where the loop meets the node
	let _ = ctx.arc(cx, cy, SELF_LOOP_RADIUS, 0.75 * PI, 2.25 * PI);
	ctx.stroke();

	if let Some(weight) = weight {
		if weight > 1 {
			ctx.set_fill_style_str(LABEL_COLOR);
			ctx.set_font(&format!("{}px sans-serif", 11.0 / k.max(0.5)));
			let _ = ctx.fill_text(&weight.to_string(), cx, cy - SELF_LOOP_RADIUS - 3.0 / k);
		}
	}
}

fn draw_nodes(state: &GraphCanvasState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;

	state.graph.visit_nodes(|node| {
		let (x, y) = (node.x() as f64, node.y() as f64);

		ctx.begin_path();
		let _ = ctx.arc(x, y, NODE_RADIUS, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&node.data.user_data.color);
		ctx.fill();

		ctx.set_fill_style_str(LABEL_COLOR);
		ctx.set_font(&format!("{}px sans-serif", 12.0 / k.max(0.5)));
		let _ = ctx.fill_text(&node.data.user_data.label, x + NODE_RADIUS + 3.0, y + 3.0);
	});
}
