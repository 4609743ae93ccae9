//! Aggregation of claim records into a renderable node/edge graph.

use indexmap::IndexMap;

use super::types::{ClaimRecord, ClusterId, GraphEdge, GraphNode};

/// Build the `{nodes, edges}` pair handed to the rendering layer.
///
/// Pure and deterministic: the same record sequence yields value-equal
/// collections, in insertion order. Runs in a single pass over the records,
/// O(distinct clusters + distinct pairs) extra space.
///
/// With `collapse` set, parallel edges between the same (cause, effect)
/// cluster pair merge into one weighted edge whose value is the claim count;
/// otherwise every record yields its own edge carrying a tooltip. Nodes are
/// identical in both modes. A record missing one cluster id still contributes
/// a node for the defined side but never an edge.
pub fn build_graph(records: &[ClaimRecord], collapse: bool) -> (Vec<GraphNode>, Vec<GraphEdge>) {
	let mut nodes: IndexMap<ClusterId, GraphNode> = IndexMap::new();
	let mut pair_counts: IndexMap<(ClusterId, ClusterId), u64> = IndexMap::new();
	let mut edges = Vec::new();

	for record in records {
		if let Some(cause) = &record.cause_cluster {
			nodes
				.entry(cause.clone())
				.or_insert_with(|| GraphNode::new(cause));
		}
		if let Some(effect) = &record.effect_cluster {
			nodes
				.entry(effect.clone())
				.or_insert_with(|| GraphNode::new(effect));
		}

		let (Some(cause), Some(effect)) = (&record.cause_cluster, &record.effect_cluster) else {
			continue;
		};

		*pair_counts
			.entry((cause.clone(), effect.clone()))
			.or_insert(0) += 1;

		if !collapse {
			edges.push(GraphEdge {
				from: cause.clone(),
				to: effect.clone(),
				value: None,
				title: edge_title(&record.text, &record.cause, &record.effect),
			});
		}
	}

	if collapse {
		for ((from, to), count) in pair_counts {
			edges.push(GraphEdge {
				from,
				to,
				value: Some(count),
				title: count.to_string(),
			});
		}
	}

	(nodes.into_values().collect(), edges)
}

/// Tooltip for an expanded-mode edge: the source sentence, annotated with
/// the extracted pair when both entity strings are present.
fn edge_title(text: &str, cause: &str, effect: &str) -> String {
	if !cause.is_empty() && !effect.is_empty() {
		format!("{text}\n\nExtracted Cause-Effect: ({cause} \u{2192} {effect})")
	} else {
		text.to_string()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn claim(cause_cluster: i64, effect_cluster: i64, cause: &str, effect: &str, text: &str) -> ClaimRecord {
		ClaimRecord {
			cause: cause.to_string(),
			cause_cluster: Some(ClusterId::Id(cause_cluster)),
			effect: effect.to_string(),
			effect_cluster: Some(ClusterId::Id(effect_cluster)),
			text: text.to_string(),
			id: None,
		}
	}

	fn rain_flood_records() -> Vec<ClaimRecord> {
		vec![
			claim(1, 2, "rain", "flood", "rain causes flood"),
			claim(1, 2, "storm", "flood", "storm causes flood"),
		]
	}

	#[test]
	fn expanded_mode_keeps_parallel_edges() {
		let (nodes, edges) = build_graph(&rain_flood_records(), false);

		assert_eq!(nodes.len(), 2);
		assert_eq!(nodes[0].id, ClusterId::Id(1));
		assert_eq!(nodes[1].id, ClusterId::Id(2));
		assert_eq!(edges.len(), 2);
		assert!(edges.iter().all(|e| e.value.is_none()));
		assert!(edges[0].title.contains("rain causes flood"));
		assert!(edges[0].title.contains("(rain \u{2192} flood)"));
	}

	#[test]
	fn collapsed_mode_merges_parallel_edges() {
		let (nodes, edges) = build_graph(&rain_flood_records(), true);

		assert_eq!(nodes.len(), 2);
		assert_eq!(edges.len(), 1);
		assert_eq!(edges[0].from, ClusterId::Id(1));
		assert_eq!(edges[0].to, ClusterId::Id(2));
		assert_eq!(edges[0].value, Some(2));
		assert_eq!(edges[0].title, "2");
	}

	#[test]
	fn collapsed_weights_sum_to_complete_record_count() {
		let mut records = rain_flood_records();
		records.push(claim(2, 1, "flood", "rain", "reversed"));
		records.push(claim(3, 3, "x", "x", "self loop"));
		// one side undefined: contributes no edge weight
		records.push(ClaimRecord {
			cause: "orphan".to_string(),
			cause_cluster: Some(ClusterId::Id(9)),
			effect: String::new(),
			effect_cluster: None,
			text: "dangling".to_string(),
			id: None,
		});

		let complete = records
			.iter()
			.filter(|r| r.cause_cluster.is_some() && r.effect_cluster.is_some())
			.count() as u64;
		let (_, edges) = build_graph(&records, true);
		let total: u64 = edges.iter().filter_map(|e| e.value).sum();
		assert_eq!(total, complete);
	}

	#[test]
	fn node_set_is_independent_of_collapse_mode() {
		let mut records = rain_flood_records();
		records.push(claim(4, 1, "wind", "rain", "wind brings rain"));

		let (expanded_nodes, _) = build_graph(&records, false);
		let (collapsed_nodes, _) = build_graph(&records, true);
		assert_eq!(expanded_nodes, collapsed_nodes);
	}

	#[test]
	fn build_graph_is_idempotent() {
		let records = rain_flood_records();
		let first = build_graph(&records, true);
		let second = build_graph(&records, true);
		assert_eq!(first, second);

		let first = build_graph(&records, false);
		let second = build_graph(&records, false);
		assert_eq!(first, second);
	}

	#[test]
	fn undefined_side_still_contributes_a_node() {
		let records = vec![ClaimRecord {
			cause: "rain".to_string(),
			cause_cluster: Some(ClusterId::Id(1)),
			effect: String::new(),
			effect_cluster: None,
			text: "half a claim".to_string(),
			id: None,
		}];

		let (nodes, edges) = build_graph(&records, false);
		assert_eq!(nodes.len(), 1);
		assert_eq!(nodes[0].id, ClusterId::Id(1));
		assert!(edges.is_empty());
	}

	#[test]
	fn self_pairs_are_kept_as_self_loops() {
		let records = vec![claim(5, 5, "debt", "debt", "debt feeds debt")];
		let (nodes, edges) = build_graph(&records, true);
		assert_eq!(nodes.len(), 1);
		assert_eq!(edges.len(), 1);
		assert_eq!(edges[0].from, edges[0].to);
		assert_eq!(edges[0].value, Some(1));
	}

	#[test]
	fn entity_string_ids_aggregate_like_numeric_ids() {
		let entity = |name: &str| Some(ClusterId::Entity(name.to_string()));
		let records = vec![
			ClaimRecord {
				cause: "rain".to_string(),
				cause_cluster: entity("rain"),
				effect: "flood".to_string(),
				effect_cluster: entity("flood"),
				text: "rain causes flood".to_string(),
				id: None,
			},
			ClaimRecord {
				cause: "rain".to_string(),
				cause_cluster: entity("rain"),
				effect: "flood".to_string(),
				effect_cluster: entity("flood"),
				text: "more rain".to_string(),
				id: None,
			},
		];

		let (nodes, edges) = build_graph(&records, true);
		assert_eq!(nodes.len(), 2);
		assert_eq!(nodes[0].label, "rain");
		assert_eq!(edges.len(), 1);
		assert_eq!(edges[0].value, Some(2));
	}

	#[test]
	fn empty_input_yields_empty_graph() {
		let (nodes, edges) = build_graph(&[], true);
		assert!(nodes.is_empty());
		assert!(edges.is_empty());
	}

	#[test]
	fn tooltip_omits_annotation_when_entities_missing() {
		let records = vec![ClaimRecord {
			cause: String::new(),
			cause_cluster: Some(ClusterId::Id(1)),
			effect: String::new(),
			effect_cluster: Some(ClusterId::Id(2)),
			text: "bare sentence".to_string(),
			id: None,
		}];
		let (_, edges) = build_graph(&records, false);
		assert_eq!(edges[0].title, "bare sentence");
	}
}
