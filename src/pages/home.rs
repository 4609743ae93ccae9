use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::components::cluster_options::{ClusterOptionsForm, ClusterParams};
use crate::components::graph::GraphCanvas;
use crate::components::job_status::{JobPhase, JobStatus, JobStatusPanel};
use crate::components::topics::TopicsPanel;
use crate::config;
use crate::socket::SocketHandle;
use crate::store::{GraphAction, GraphViewState, reduce};

/// Session page: submits a job, tracks its push events and explores the
/// resulting claim graph.
///
/// All state updates funnel through signals on the single wasm event loop,
/// applied in arrival order. There is no guard against out-of-order
/// re-clustering responses; the in-flight flag prevents overlap through this
/// UI, so that remains documented best-effort behavior.
#[component]
pub fn Home() -> impl IntoView {
	let job_id = RwSignal::new(None::<String>);
	let phase = RwSignal::new(JobPhase::Idle);
	let job_status = RwSignal::new(None::<JobStatus>);
	let graph = RwSignal::new(GraphViewState::default());
	let last_error = RwSignal::new(None::<String>);

	// thin submission control; the upload/column-selection forms proper are
	// external collaborators
	let file_name = RwSignal::new(String::new());
	let column_name = RwSignal::new(String::new());
	let cluster_enabled = RwSignal::new(true);

	// the push channel is scoped to the current job id: replaced on change,
	// dropped (and closed) on teardown
	let socket: Rc<RefCell<Option<SocketHandle>>> = Rc::new(RefCell::new(None));

	let socket_effect = socket.clone();
	Effect::new(move |_| {
		let id = job_id.get();
		// close the previous subscription before the next opens
		socket_effect.borrow_mut().take();
		let Some(id) = id else {
			return;
		};

		let handle = SocketHandle::open(config::SOCKET_URL, &id, move |event| {
			phase.set(phase.get_untracked().on_event(&event));
			job_status.set(Some(JobStatus::from_event(&event)));

			if event.is_finished() {
				match event.finished_payload() {
					Ok(payload) => {
						graph.set(reduce(
							&graph.get_untracked(),
							GraphAction::FetchSuccessInit {
								data: payload.data,
								claims: payload.claims,
								clustered: payload.clustered,
								topics: payload.topics,
							},
						));
					}
					Err(err) => {
						log::warn!("{err}");
						last_error.set(Some(err.to_string()));
					}
				}
			}
		});

		match handle {
			Ok(handle) => *socket_effect.borrow_mut() = Some(handle),
			Err(err) => {
				log::error!("{err}");
				last_error.set(Some(err.to_string()));
			}
		}
	});

	let socket_cleanup = send_wrapper::SendWrapper::new(socket.clone());
	on_cleanup(move || {
		socket_cleanup.borrow_mut().take();
	});

	let submit_job = move |ev: leptos::ev::SubmitEvent| {
		ev.prevent_default();
		if job_id.get_untracked().is_some() {
			return;
		}
		let request = api::JobRequest {
			file_name: file_name.get_untracked(),
			column_name: column_name.get_untracked(),
			cluster: cluster_enabled.get_untracked(),
			preprocess: true,
		};
		spawn_local(async move {
			match api::submit_job(&request).await {
				Ok(response) => {
					phase.set(JobPhase::Queued);
					job_id.set(Some(response.job_id));
				}
				Err(err) => {
					log::error!("{err}");
					last_error.set(Some(err.to_string()));
				}
			}
		});
	};

	let submit_recluster = Callback::new(move |params: ClusterParams| {
		// at most one re-clustering in flight
		if graph.get_untracked().is_loading {
			return;
		}
		let claims = graph.get_untracked().claims;
		let graph_json = match serde_json::to_string(&claims) {
			Ok(json) => json,
			Err(err) => {
				log::error!("claims encode failed: {err}");
				last_error.set(Some(err.to_string()));
				return;
			}
		};

		graph.set(reduce(&graph.get_untracked(), GraphAction::FetchInit));
		spawn_local(async move {
			let request = api::ClusterRequest {
				nr_topics: params.nr_topics,
				n_gram_range: params.n_gram_range,
				top_n_words: params.top_n_words,
				graph: graph_json,
			};
			match api::submit_cluster_request(&request).await {
				Ok((data, topics)) => {
					graph.set(reduce(
						&graph.get_untracked(),
						GraphAction::FetchSuccessCluster { data, topics },
					));
				}
				Err(err) => {
					// prior graph state stays intact; no automatic retry
					log::error!("{err}");
					last_error.set(Some(err.to_string()));
					graph.set(reduce(&graph.get_untracked(), GraphAction::FetchFailure));
				}
			}
		});
	});

	let records = Signal::derive(move || graph.get().data);
	let clustered = Signal::derive(move || graph.get().clustered);
	let topics = Signal::derive(move || graph.get().topics);
	let recluster_available = Signal::derive(move || clustered.get() && !records.get().is_empty());
	let recluster_loading = Signal::derive(move || graph.get().is_loading);

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>
			<section class="hero">
				<h1 class="title">"Causal Graph Explorer"</h1>
				<p class="subtitle">
					"Submit a dataset, watch the extraction job, then explore the cause\u{2192}effect graph."
				</p>
			</section>

			{move || {
				last_error
					.get()
					.map(|message| {
						view! {
							<div class="notification is-danger" on:click=move |_| last_error.set(None)>
								{format!("Error: {message}")}
							</div>
						}
					})
			}}

			<section class="job-form">
				<form on:submit=submit_job>
					<fieldset disabled=move || job_id.get().is_some()>
						<input
							class="input"
							type="text"
							placeholder="Uploaded file name"
							prop:value=move || file_name.get()
							on:input=move |ev| file_name.set(event_target_value(&ev))
						/>
						<input
							class="input"
							type="text"
							placeholder="Text column"
							prop:value=move || column_name.get()
							on:input=move |ev| column_name.set(event_target_value(&ev))
						/>
						<label class="checkbox">
							<input
								type="checkbox"
								prop:checked=move || cluster_enabled.get()
								on:change=move |_| cluster_enabled.update(|c| *c = !*c)
							/>
							" Cluster entities"
						</label>
						<button class="button" type="submit">"Submit job"</button>
					</fieldset>
				</form>
			</section>

			<JobStatusPanel job_id=job_id phase=phase status=job_status />

			<div class="columns">
				<div class="column graph-column">
					<GraphCanvas records=records clustered=clustered />
					<Show when=move || recluster_available.get()>
						<ClusterOptionsForm disabled=recluster_loading on_submit=submit_recluster />
					</Show>
				</div>
				<div class="column">
					<TopicsPanel topics=topics />
				</div>
			</div>
		</ErrorBoundary>
	}
}
