//! Graph view state and its reducer.

use crate::components::graph::{ClaimRecord, TopicMap};

/// Session-wide view model consumed by the rendering layer.
///
/// Created empty at session start, replaced wholesale when the initial job
/// finishes, and partially replaced on re-clustering. `claims` keeps the
/// original pre-clustering records as the input for later re-clustering
/// requests; only [`GraphAction::FetchSuccessInit`] may replace it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphViewState {
	/// Records currently rendered.
	pub data: Vec<ClaimRecord>,
	/// Original records from the initial job, retained for re-clustering.
	pub claims: Vec<ClaimRecord>,
	/// Topic representations keyed by cluster id.
	pub topics: TopicMap,
	/// Whether the initial job ran with clustering enabled.
	pub clustered: bool,
	/// A fetch is in flight.
	pub is_loading: bool,
	/// The last fetch failed.
	pub is_error: bool,
}

/// State transitions of the graph view model.
#[derive(Clone, Debug)]
pub enum GraphAction {
	/// A fetch started.
	FetchInit,
	/// The initial job completed; installs the full result tuple.
	FetchSuccessInit {
		data: Vec<ClaimRecord>,
		claims: Vec<ClaimRecord>,
		clustered: bool,
		topics: TopicMap,
	},
	/// A re-clustering completed; replaces data and topics only.
	FetchSuccessCluster {
		data: Vec<ClaimRecord>,
		topics: TopicMap,
	},
	/// A fetch failed; prior data stays intact.
	FetchFailure,
}

/// Pure transition function: previous state + action → next state.
///
/// Never mutates `prev`; state is only reachable through this function.
pub fn reduce(prev: &GraphViewState, action: GraphAction) -> GraphViewState {
	let mut next = prev.clone();
	match action {
		GraphAction::FetchInit => {
			next.is_loading = true;
			next.is_error = false;
		}
		GraphAction::FetchSuccessInit {
			data,
			claims,
			clustered,
			topics,
		} => {
			next.is_loading = false;
			next.is_error = false;
			next.data = data;
			next.claims = claims;
			next.clustered = clustered;
			next.topics = topics;
		}
		GraphAction::FetchSuccessCluster { data, topics } => {
			next.is_loading = false;
			next.is_error = false;
			next.data = data;
			next.topics = topics;
		}
		GraphAction::FetchFailure => {
			next.is_loading = false;
			next.is_error = true;
		}
	}
	next
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::graph::ClusterId;
	use indexmap::IndexMap;

	fn record(cause_cluster: i64, effect_cluster: i64) -> ClaimRecord {
		ClaimRecord {
			cause: "a".to_string(),
			cause_cluster: Some(ClusterId::Id(cause_cluster)),
			effect: "b".to_string(),
			effect_cluster: Some(ClusterId::Id(effect_cluster)),
			text: "a causes b".to_string(),
			id: None,
		}
	}

	fn topics(key: &str) -> TopicMap {
		let mut map = IndexMap::new();
		map.insert(key.to_string(), vec![("dog".to_string(), 0.9)]);
		map
	}

	fn initialized() -> GraphViewState {
		reduce(
			&GraphViewState::default(),
			GraphAction::FetchSuccessInit {
				data: vec![record(1, 2)],
				claims: vec![record(1, 2)],
				clustered: true,
				topics: topics("0"),
			},
		)
	}

	#[test]
	fn fetch_init_sets_loading_and_clears_error() {
		let prev = GraphViewState {
			is_error: true,
			..GraphViewState::default()
		};
		let next = reduce(&prev, GraphAction::FetchInit);
		assert!(next.is_loading);
		assert!(!next.is_error);
		// untouched fields survive
		assert_eq!(next.data, prev.data);
	}

	#[test]
	fn success_init_sets_all_four_fields() {
		let next = initialized();
		assert_eq!(next.data.len(), 1);
		assert_eq!(next.claims.len(), 1);
		assert!(next.clustered);
		assert!(next.topics.contains_key("0"));
		assert!(!next.is_loading);
		assert!(!next.is_error);
	}

	#[test]
	fn success_cluster_never_touches_claims_or_clustered() {
		let prev = initialized();
		let next = reduce(
			&prev,
			GraphAction::FetchSuccessCluster {
				data: vec![record(3, 4), record(3, 4)],
				topics: topics("1"),
			},
		);

		assert_eq!(next.claims, prev.claims);
		assert_eq!(next.clustered, prev.clustered);
		assert_eq!(next.data.len(), 2);
		assert!(next.topics.contains_key("1"));
		assert!(!next.topics.contains_key("0"));
	}

	#[test]
	fn failure_sets_error_and_keeps_prior_data() {
		let prev = initialized();
		let next = reduce(&prev, GraphAction::FetchFailure);
		assert!(next.is_error);
		assert!(!next.is_loading);
		assert_eq!(next.data, prev.data);
		assert_eq!(next.claims, prev.claims);
		assert_eq!(next.topics, prev.topics);
	}

	#[test]
	fn reduce_leaves_the_previous_state_untouched() {
		let prev = initialized();
		let snapshot = prev.clone();
		let _ = reduce(&prev, GraphAction::FetchFailure);
		assert_eq!(prev, snapshot);
	}
}
