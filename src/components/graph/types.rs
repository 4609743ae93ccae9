//! Data model for the causal-claim graph.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Identifier of an entity cluster.
///
/// The remote job emits integer ids when clustering is enabled (`-1` marks
/// the outlier cluster) and falls back to the processed entity text as a
/// per-entity identifier when clustering is disabled, so the wire value is
/// either a number or a string.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClusterId {
	/// Numeric cluster assignment.
	Id(i64),
	/// Per-entity identifier used when clustering is disabled.
	Entity(String),
}

impl ClusterId {
	/// Sentinel id for unclustered/outlier entities.
	pub const OUTLIER: ClusterId = ClusterId::Id(-1);

	/// Whether this id denotes the outlier cluster.
	pub fn is_outlier(&self) -> bool {
		*self == Self::OUTLIER
	}
}

impl fmt::Display for ClusterId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ClusterId::Id(id) => write!(f, "{id}"),
			ClusterId::Entity(name) => f.write_str(name),
		}
	}
}

/// One extracted cause→effect relation with its supporting text.
///
/// Records are immutable: a re-clustering run produces a fresh set with new
/// cluster assignments rather than mutating an existing one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClaimRecord {
	/// Raw extracted cause entity text.
	#[serde(default)]
	pub cause: String,
	/// Cluster assignment of the cause side, when defined.
	#[serde(default)]
	pub cause_cluster: Option<ClusterId>,
	/// Raw extracted effect entity text.
	#[serde(default)]
	pub effect: String,
	/// Cluster assignment of the effect side, when defined.
	#[serde(default)]
	pub effect_cluster: Option<ClusterId>,
	/// Source sentence the relation was extracted from.
	#[serde(default)]
	pub text: String,
	// Row index assigned by the job's dataframe; accepted but unused.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<i64>,
}

/// Node handed to the rendering layer. Identity is the cluster id.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GraphNode {
	/// Unique node identity.
	pub id: ClusterId,
	/// Display label (stringified id).
	pub label: String,
	/// Color group, equal to the cluster id.
	pub group: ClusterId,
	/// Highlight override; `None` falls back to the group-derived color.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub color: Option<String>,
}

impl GraphNode {
	/// Node derived from a cluster id, with no color override.
	pub fn new(id: &ClusterId) -> Self {
		Self {
			id: id.clone(),
			label: id.to_string(),
			group: id.clone(),
			color: None,
		}
	}
}

/// Directed edge handed to the rendering layer.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GraphEdge {
	/// Cause-side cluster.
	pub from: ClusterId,
	/// Effect-side cluster.
	pub to: ClusterId,
	/// Aggregated claim count in collapsed mode; `None` in expanded mode.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub value: Option<u64>,
	/// Tooltip text.
	pub title: String,
}

/// Ranked `(entity, probability)` pair of a topic's representation.
pub type TopicEntry = (String, f64);

/// Per-cluster ranked representative entities, keyed by topic id.
///
/// Keys are strings on the wire; `"-1"` holds the outliers and is excluded
/// from user-facing listings. Insertion order is preserved so listings are
/// stable across renders.
pub type TopicMap = IndexMap<String, Vec<TopicEntry>>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn cluster_id_decodes_numbers_and_strings() {
		let id: ClusterId = serde_json::from_str("3").unwrap();
		assert_eq!(id, ClusterId::Id(3));

		let entity: ClusterId = serde_json::from_str("\"heavy rain\"").unwrap();
		assert_eq!(entity, ClusterId::Entity("heavy rain".to_string()));
	}

	#[test]
	fn outlier_sentinel() {
		assert!(ClusterId::Id(-1).is_outlier());
		assert!(!ClusterId::Id(0).is_outlier());
		assert!(!ClusterId::Entity("-1".to_string()).is_outlier());
	}

	#[test]
	fn claim_record_decodes_wire_row() {
		let record: ClaimRecord = serde_json::from_value(serde_json::json!({
			"cause": "rain",
			"cause_cluster": 1,
			"effect": "flood",
			"effect_cluster": 2,
			"text": "rain causes flood",
			"id": 0
		}))
		.unwrap();
		assert_eq!(record.cause_cluster, Some(ClusterId::Id(1)));
		assert_eq!(record.effect_cluster, Some(ClusterId::Id(2)));
		assert_eq!(record.text, "rain causes flood");
	}

	#[test]
	fn claim_record_tolerates_missing_fields() {
		let record: ClaimRecord = serde_json::from_value(serde_json::json!({
			"text": "no pairs extracted",
			"pairs": []
		}))
		.unwrap();
		assert_eq!(record.cause_cluster, None);
		assert_eq!(record.effect_cluster, None);
		assert_eq!(record.cause, "");
	}

	#[test]
	fn cluster_id_display_matches_wire_value() {
		assert_eq!(ClusterId::Id(-1).to_string(), "-1");
		assert_eq!(ClusterId::Entity("storm".to_string()).to_string(), "storm");
	}
}
