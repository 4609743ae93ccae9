//! Selection-driven node highlighting.

use super::types::{ClusterId, GraphNode};

/// Overlay color applied to every node except the selected one.
pub const DIM_COLOR: &str = "rgba(200,200,200,0.5)";

/// Single-selection highlight state.
///
/// Owns the "highlight active" flag across renders; the owning component
/// calls [`Highlighter::reset`] whenever a new aggregation run replaces the
/// graph data. Selecting a second node replaces the first selection, it does
/// not accumulate a multi-select set.
#[derive(Debug, Default)]
pub struct Highlighter {
	active: bool,
}

impl Highlighter {
	pub fn new() -> Self {
		Self::default()
	}

	/// Drop the active flag; called when the underlying graph data changes.
	pub fn reset(&mut self) {
		self.active = false;
	}

	pub fn is_active(&self) -> bool {
		self.active
	}

	/// React to a selection change and return the nodes needing a color
	/// update (empty when nothing needs to reach the renderer).
	///
	/// With a selection, every node but the selected one gets the dim
	/// overlay and the selected node reverts to its group-derived default.
	/// Clearing the selection restores defaults once, and is a no-op when no
	/// highlight was active.
	pub fn on_select(&mut self, selected: Option<&ClusterId>, nodes: &[GraphNode]) -> Vec<GraphNode> {
		match selected {
			Some(id) => {
				self.active = true;
				nodes
					.iter()
					.map(|node| {
						let mut node = node.clone();
						node.color = if node.id == *id {
							None
						} else {
							Some(DIM_COLOR.to_string())
						};
						node
					})
					.collect()
			}
			None if self.active => {
				self.active = false;
				nodes
					.iter()
					.map(|node| {
						let mut node = node.clone();
						node.color = None;
						node
					})
					.collect()
			}
			None => Vec::new(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn nodes(ids: &[i64]) -> Vec<GraphNode> {
		ids.iter().map(|id| GraphNode::new(&ClusterId::Id(*id))).collect()
	}

	#[test]
	fn selection_dims_everything_but_the_selected_node() {
		let mut highlighter = Highlighter::new();
		let updates = highlighter.on_select(Some(&ClusterId::Id(2)), &nodes(&[1, 2, 3]));

		assert_eq!(updates.len(), 3);
		let undimmed: Vec<_> = updates.iter().filter(|n| n.color.is_none()).collect();
		assert_eq!(undimmed.len(), 1);
		assert_eq!(undimmed[0].id, ClusterId::Id(2));
		assert!(
			updates
				.iter()
				.filter(|n| n.id != ClusterId::Id(2))
				.all(|n| n.color.as_deref() == Some(DIM_COLOR))
		);
	}

	#[test]
	fn reselection_moves_the_single_undimmed_node() {
		let mut highlighter = Highlighter::new();
		let all = nodes(&[1, 2, 3]);

		highlighter.on_select(Some(&ClusterId::Id(1)), &all);
		let updates = highlighter.on_select(Some(&ClusterId::Id(3)), &all);

		let undimmed: Vec<_> = updates.iter().filter(|n| n.color.is_none()).collect();
		assert_eq!(undimmed.len(), 1);
		assert_eq!(undimmed[0].id, ClusterId::Id(3));
	}

	#[test]
	fn clearing_restores_defaults_exactly_once() {
		let mut highlighter = Highlighter::new();
		let all = nodes(&[1, 2]);

		highlighter.on_select(Some(&ClusterId::Id(1)), &all);
		let restored = highlighter.on_select(None, &all);
		assert_eq!(restored.len(), 2);
		assert!(restored.iter().all(|n| n.color.is_none()));

		// second clear produces no renderer traffic
		let noop = highlighter.on_select(None, &all);
		assert!(noop.is_empty());
		assert!(!highlighter.is_active());
	}

	#[test]
	fn clear_without_prior_highlight_is_a_noop() {
		let mut highlighter = Highlighter::new();
		assert!(highlighter.on_select(None, &nodes(&[1, 2])).is_empty());
	}

	#[test]
	fn reset_drops_the_active_flag() {
		let mut highlighter = Highlighter::new();
		highlighter.on_select(Some(&ClusterId::Id(1)), &nodes(&[1]));
		assert!(highlighter.is_active());

		highlighter.reset();
		assert!(!highlighter.is_active());
		// after a data change, a cleared selection must not emit updates
		assert!(highlighter.on_select(None, &nodes(&[1])).is_empty());
	}
}
