//! Topic listing panel.

use leptos::prelude::*;

use super::graph::TopicMap;

/// Topic key holding unclustered/outlier entities; never listed.
const OUTLIER_KEY: &str = "-1";

/// User-facing listing: topic id → representative entities, outliers
/// excluded, probabilities dropped, map order preserved.
pub fn visible_topics(topics: &TopicMap) -> Vec<(String, Vec<String>)> {
	topics
		.iter()
		.filter(|(id, _)| id.as_str() != OUTLIER_KEY)
		.map(|(id, entries)| {
			let entities = entries.iter().map(|(entity, _)| entity.clone()).collect();
			(id.clone(), entities)
		})
		.collect()
}

/// Panel listing each cluster's representative entities.
#[component]
pub fn TopicsPanel(#[prop(into)] topics: Signal<TopicMap>) -> impl IntoView {
	let listing = Memo::new(move |_| visible_topics(&topics.get()));

	view! {
		<Show when=move || !listing.get().is_empty()>
			<div class="topics-panel">
				<p class="topics-heading">"Clusters"</p>
				<For
					each=move || listing.get()
					key=|(id, _)| id.clone()
					children=|(id, entities)| {
						view! {
							<div class="topic-block">
								<div class="topic-header">{id}</div>
								<ul class="topic-entities">
									{entities
										.into_iter()
										.map(|entity| view! { <li class="topic-tag">{entity}</li> })
										.collect_view()}
								</ul>
							</div>
						}
					}
				/>
			</div>
		</Show>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn topic_map(entries: &[(&str, &[&str])]) -> TopicMap {
		entries
			.iter()
			.map(|(id, entities)| {
				let ranked = entities
					.iter()
					.enumerate()
					.map(|(i, entity)| (entity.to_string(), 0.9 - i as f64 * 0.1))
					.collect();
				(id.to_string(), ranked)
			})
			.collect()
	}

	#[test]
	fn outlier_topic_is_excluded() {
		let topics = topic_map(&[("-1", &["noise"]), ("0", &["dog"])]);
		let listing = visible_topics(&topics);
		assert_eq!(listing.len(), 1);
		assert_eq!(listing[0].0, "0");
		assert_eq!(listing[0].1, vec!["dog".to_string()]);
	}

	#[test]
	fn listing_preserves_order_and_drops_probabilities() {
		let topics = topic_map(&[("0", &["dog", "cat"]), ("1", &["rain", "flood"])]);
		let listing = visible_topics(&topics);
		assert_eq!(listing.len(), 2);
		assert_eq!(listing[0].0, "0");
		assert_eq!(listing[0].1, vec!["dog".to_string(), "cat".to_string()]);
		assert_eq!(listing[1].0, "1");
	}

	#[test]
	fn empty_map_yields_empty_listing() {
		assert!(visible_topics(&TopicMap::default()).is_empty());
	}
}
