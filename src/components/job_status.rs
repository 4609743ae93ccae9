//! Job progress state machine and its status panel.

use leptos::prelude::*;

use crate::socket::PushEvent;

/// Remote job lifecycle as observed from this session.
///
/// `Idle → Queued` happens when a job id is obtained; every later transition
/// is driven exclusively by inbound push events. Progress numbers never feed
/// back into the phase.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum JobPhase {
	/// No job id known; nothing displayed.
	#[default]
	Idle,
	/// Job id obtained, no push event received yet.
	Queued,
	/// A push event arrived with the given stage name.
	Running(String),
	/// The job completed and delivered its result payload.
	Finished,
	/// The job failed.
	Error,
}

impl JobPhase {
	/// Phase after receiving a push event.
	pub fn on_event(&self, event: &PushEvent) -> JobPhase {
		match event.status.as_str() {
			"finished" => JobPhase::Finished,
			"error" | "failed" => JobPhase::Error,
			status => JobPhase::Running(status.to_string()),
		}
	}
}

/// Latest status view, updated only by inbound push events.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct JobStatus {
	pub status: String,
	pub progress: Option<u64>,
	pub total: Option<u64>,
}

impl JobStatus {
	pub fn from_event(event: &PushEvent) -> Self {
		Self {
			status: event.status.clone(),
			progress: event.progress,
			total: event.total,
		}
	}
}

/// Display label for a job stage. Unrecognized stages pass through verbatim.
pub fn status_label(status: &str) -> &str {
	match status {
		"cause_effect" => "Running causal model...",
		"create_clusters" => "Creating entity clusters...",
		"finished" => "Finished",
		"job_queued" => "Job queued",
		other => other,
	}
}

/// Advisory display percentage, `floor(progress/total)`. Never used to
/// derive state.
pub fn percentage(progress: u64, total: u64) -> u64 {
	if total == 0 { 0 } else { progress / total }
}

/// Panel showing the current job id, stage label and progress.
#[component]
pub fn JobStatusPanel(
	#[prop(into)] job_id: Signal<Option<String>>,
	#[prop(into)] phase: Signal<JobPhase>,
	#[prop(into)] status: Signal<Option<JobStatus>>,
) -> impl IntoView {
	let body = move || match phase.get() {
		JobPhase::Idle => view! { <div>"No job currently queued"</div> }.into_any(),
		_ => {
			let current = status.get().unwrap_or(JobStatus {
				status: "job_queued".to_string(),
				progress: None,
				total: None,
			});
			let label = status_label(&current.status).to_string();
			view! {
				<div class="job-status-line">"Job Id: " {job_id.get().unwrap_or_default()}</div>
				<div class="job-status-line">"Status: " {label}</div>
				{match (current.progress, current.total) {
					(Some(progress), Some(total)) => view! {
						<div class="job-status-line">{progress.to_string()} " / " {total.to_string()}</div>
						<progress class="job-progress" value=progress.to_string() max=total.to_string()>
							{format!("{}%", percentage(progress, total))}
						</progress>
					}
					.into_any(),
					_ => ().into_any(),
				}}
			}
			.into_any()
		}
	};

	view! {
		<article class="job-status">
			<div class="job-status-header">
				<p>"Job Status"</p>
			</div>
			<div class="job-status-body">{body}</div>
		</article>
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::socket::decode_push_event;

	#[test]
	fn status_label_table() {
		assert_eq!(status_label("cause_effect"), "Running causal model...");
		assert_eq!(status_label("create_clusters"), "Creating entity clusters...");
		assert_eq!(status_label("finished"), "Finished");
		assert_eq!(status_label("job_queued"), "Job queued");
	}

	#[test]
	fn unknown_status_passes_through_verbatim() {
		assert_eq!(status_label("warming_up"), "warming_up");
	}

	#[test]
	fn percentage_is_floored_and_total_zero_safe() {
		assert_eq!(percentage(3, 10), 0);
		assert_eq!(percentage(10, 10), 1);
		assert_eq!(percentage(25, 10), 2);
		assert_eq!(percentage(5, 0), 0);
	}

	#[test]
	fn push_sequence_drives_queued_running_finished() {
		// job id obtained out of band
		let mut phase = JobPhase::Queued;
		let mut replacements = 0;

		let frames = [
			r#"{"status":"job_queued"}"#,
			r#"{"status":"cause_effect","progress":3,"total":10}"#,
			r#"{"status":"finished","result_df":"[]","claims_df":"[]","cluster":false,"topics":{}}"#,
		];

		let mut seen = Vec::new();
		for frame in frames {
			let event = decode_push_event(frame).unwrap();
			phase = phase.on_event(&event);
			seen.push(phase.clone());
			if event.is_finished() {
				let payload = event.finished_payload().unwrap();
				assert!(payload.data.is_empty());
				assert!(payload.claims.is_empty());
				replacements += 1;
			}
		}

		assert_eq!(
			seen,
			vec![
				JobPhase::Running("job_queued".to_string()),
				JobPhase::Running("cause_effect".to_string()),
				JobPhase::Finished,
			]
		);
		assert_eq!(replacements, 1);
	}

	#[test]
	fn error_event_enters_the_error_phase() {
		let event = decode_push_event(r#"{"status":"error"}"#).unwrap();
		assert_eq!(JobPhase::Queued.on_event(&event), JobPhase::Error);
	}

	#[test]
	fn job_status_mirrors_event_fields() {
		let event = decode_push_event(r#"{"status":"cause_effect","progress":3,"total":10}"#).unwrap();
		let status = JobStatus::from_event(&event);
		assert_eq!(status.status, "cause_effect");
		assert_eq!(status.progress, Some(3));
		assert_eq!(status.total, Some(10));
	}
}
