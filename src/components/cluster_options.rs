//! Re-clustering options form.

use leptos::prelude::*;

/// User-tunable re-clustering parameters; unset fields keep server defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClusterParams {
	pub nr_topics: Option<i64>,
	pub n_gram_range: Option<(u32, u32)>,
	pub top_n_words: Option<u32>,
}

/// Build params from the raw form fields. An n-gram bound left empty falls
/// back to the conventional (1, 2) range for that side, matching the
/// server's default.
fn parse_params(nr_topics: &str, ngram_min: &str, ngram_max: &str, top_n_words: &str) -> ClusterParams {
	let n_gram_range = if ngram_min.is_empty() && ngram_max.is_empty() {
		None
	} else {
		Some((
			ngram_min.parse().unwrap_or(1),
			ngram_max.parse().unwrap_or(2),
		))
	};

	ClusterParams {
		nr_topics: nr_topics.parse().ok(),
		n_gram_range,
		top_n_words: top_n_words.parse().ok(),
	}
}

/// Form for submitting a re-clustering request. Disabled while one is in
/// flight.
#[component]
pub fn ClusterOptionsForm(
	#[prop(into)] disabled: Signal<bool>,
	on_submit: Callback<ClusterParams>,
) -> impl IntoView {
	let nr_topics = RwSignal::new(String::new());
	let ngram_min = RwSignal::new(String::new());
	let ngram_max = RwSignal::new(String::new());
	let top_n_words = RwSignal::new(String::new());

	let submit = move |ev: leptos::ev::SubmitEvent| {
		ev.prevent_default();
		on_submit.run(parse_params(
			&nr_topics.get_untracked(),
			&ngram_min.get_untracked(),
			&ngram_max.get_untracked(),
			&top_n_words.get_untracked(),
		));
	};

	view! {
		<form class="cluster-options" on:submit=submit>
			<fieldset disabled=move || disabled.get()>
				<label class="label">"Cluster Options"</label>
				<div class="field">
					<label class="label">"Number of Clusters"</label>
					<p class="help">
						"0 reduces topics automatically, -1 keeps all topics. Empty keeps the default."
					</p>
					<input
						class="input"
						type="number"
						min="-1"
						max="100"
						placeholder="0"
						prop:value=move || nr_topics.get()
						on:input=move |ev| nr_topics.set(event_target_value(&ev))
					/>
				</div>
				<div class="field">
					<label class="label">"N-gram range"</label>
					<input
						class="input"
						type="number"
						min="1"
						placeholder="1"
						prop:value=move || ngram_min.get()
						on:input=move |ev| ngram_min.set(event_target_value(&ev))
					/>
					<input
						class="input"
						type="number"
						min="1"
						placeholder="2"
						prop:value=move || ngram_max.get()
						on:input=move |ev| ngram_max.set(event_target_value(&ev))
					/>
				</div>
				<div class="field">
					<label class="label">"Top words per topic"</label>
					<input
						class="input"
						type="number"
						min="1"
						placeholder="10"
						prop:value=move || top_n_words.get()
						on:input=move |ev| top_n_words.set(event_target_value(&ev))
					/>
				</div>
				<button class="button" type="submit">
					{move || if disabled.get() { "Re-clustering..." } else { "Re-cluster" }}
				</button>
			</fieldset>
		</form>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_form_keeps_server_defaults() {
		assert_eq!(parse_params("", "", "", ""), ClusterParams::default());
	}

	#[test]
	fn partial_ngram_range_fills_the_other_side() {
		let params = parse_params("", "2", "", "");
		assert_eq!(params.n_gram_range, Some((2, 2)));

		let params = parse_params("", "", "3", "");
		assert_eq!(params.n_gram_range, Some((1, 3)));
	}

	#[test]
	fn all_fields_parse() {
		let params = parse_params("0", "1", "2", "10");
		assert_eq!(params.nr_topics, Some(0));
		assert_eq!(params.n_gram_range, Some((1, 2)));
		assert_eq!(params.top_n_words, Some(10));
	}

	#[test]
	fn garbage_numeric_input_is_ignored() {
		let params = parse_params("many", "", "", "few");
		assert_eq!(params.nr_topics, None);
		assert_eq!(params.top_n_words, None);
	}
}
