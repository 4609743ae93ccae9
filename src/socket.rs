//! Push channel delivering job-status events.
//!
//! The channel is a scoped resource: it is opened only once a job id is
//! known, subscribed to the single `job_status` topic, and torn down when the
//! job id changes or the owning session ends. [`SocketHandle`] detaches its
//! callbacks and closes the socket in `Drop`, so teardown is guaranteed on
//! every exit path and no late event can mutate state after the owner is
//! gone.

use serde::Deserialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{CloseEvent, ErrorEvent, Event, MessageEvent, WebSocket};

use crate::components::graph::{ClaimRecord, TopicMap};
use crate::error::AppError;

/// Server-initiated job status update.
///
/// `result_df` and `claims_df` are JSON documents nested inside the JSON
/// envelope (the job serializes its dataframes as strings), so they decode
/// in a second stage via [`PushEvent::finished_payload`].
#[derive(Clone, Debug, Deserialize)]
pub struct PushEvent {
	/// Job stage name; see `job_status::status_label` for the display table.
	pub status: String,
	/// Rows processed so far, when the stage reports progress.
	pub progress: Option<u64>,
	/// Total rows of the current stage.
	pub total: Option<u64>,
	/// Serialized rendered records; mandatory when `status == "finished"`.
	pub result_df: Option<String>,
	/// Serialized original claims; mandatory when `status == "finished"`.
	pub claims_df: Option<String>,
	/// Whether the job ran with clustering; mandatory when finished.
	pub cluster: Option<bool>,
	/// Topic representations; mandatory when finished.
	pub topics: Option<TopicMap>,
}

/// Decoded completed-result payload of a `finished` push event.
#[derive(Clone, Debug, PartialEq)]
pub struct FinishedPayload {
	pub data: Vec<ClaimRecord>,
	pub claims: Vec<ClaimRecord>,
	pub clustered: bool,
	pub topics: TopicMap,
}

/// Decode a raw push frame. Malformed frames become
/// [`AppError::MalformedPushPayload`] and are expected to be dropped by the
/// caller rather than crash the status pipeline.
pub fn decode_push_event(raw: &str) -> Result<PushEvent, AppError> {
	serde_json::from_str(raw).map_err(|err| AppError::MalformedPushPayload(err.to_string()))
}

impl PushEvent {
	pub fn is_finished(&self) -> bool {
		self.status == "finished"
	}

	/// Extract and decode the result payload of a `finished` event.
	pub fn finished_payload(&self) -> Result<FinishedPayload, AppError> {
		let missing =
			|field: &str| AppError::MalformedPushPayload(format!("finished event without {field}"));

		let result_df = self.result_df.as_deref().ok_or_else(|| missing("result_df"))?;
		let claims_df = self.claims_df.as_deref().ok_or_else(|| missing("claims_df"))?;
		let clustered = self.cluster.ok_or_else(|| missing("cluster"))?;
		let topics = self.topics.clone().ok_or_else(|| missing("topics"))?;

		let data = serde_json::from_str(result_df)
			.map_err(|err| AppError::MalformedPushPayload(format!("result_df: {err}")))?;
		let claims = serde_json::from_str(claims_df)
			.map_err(|err| AppError::MalformedPushPayload(format!("claims_df: {err}")))?;

		Ok(FinishedPayload {
			data,
			claims,
			clustered,
			topics,
		})
	}
}

/// Owned handle to the job-status subscription.
///
/// Holds the callback closures so they outlive the JavaScript side; dropping
/// the handle detaches them and closes the socket.
pub struct SocketHandle {
	socket: WebSocket,
	_on_open: Closure<dyn FnMut(Event)>,
	_on_message: Closure<dyn FnMut(MessageEvent)>,
	_on_error: Closure<dyn FnMut(Event)>,
	_on_close: Closure<dyn FnMut(CloseEvent)>,
}

impl SocketHandle {
	/// Connect and subscribe to the given job's status events. `on_event`
	/// fires once per well-formed push event, in arrival order; malformed
	/// frames are logged and dropped.
	pub fn open(
		url: &str,
		job_id: &str,
		on_event: impl Fn(PushEvent) + 'static,
	) -> Result<Self, AppError> {
		let socket = WebSocket::new(url)
			.map_err(|err| AppError::JobSubmission(format!("socket open failed: {err:?}")))?;

		// join the job's event room once the channel is up
		let join_socket = socket.clone();
		let join_message = serde_json::json!({ "jobId": job_id }).to_string();
		let on_open = Closure::new(move |_event: Event| {
			if let Err(err) = join_socket.send_with_str(&join_message) {
				log::warn!("job status subscribe failed: {err:?}");
			}
		});
		socket.set_onopen(Some(on_open.as_ref().unchecked_ref()));

		let on_message = Closure::new(move |event: MessageEvent| {
			let Some(text) = event.data().as_string() else {
				log::warn!("dropping non-text job status frame");
				return;
			};
			match decode_push_event(&text) {
				Ok(push) => on_event(push),
				Err(err) => log::warn!("dropping push event: {err}"),
			}
		});
		socket.set_onmessage(Some(on_message.as_ref().unchecked_ref()));

		let on_error = Closure::new(move |event: Event| {
			let detail = event
				.dyn_ref::<ErrorEvent>()
				.map(|err| err.message())
				.unwrap_or_else(|| "network error".to_string());
			log::warn!("job status socket error: {detail}");
		});
		socket.set_onerror(Some(on_error.as_ref().unchecked_ref()));

		let on_close = Closure::new(move |event: CloseEvent| {
			log::debug!("job status socket closed: code={}", event.code());
		});
		socket.set_onclose(Some(on_close.as_ref().unchecked_ref()));

		Ok(Self {
			socket,
			_on_open: on_open,
			_on_message: on_message,
			_on_error: on_error,
			_on_close: on_close,
		})
	}

	/// Detach all callbacks and close the socket. Idempotent.
	pub fn close(&self) {
		self.socket.set_onopen(None);
		self.socket.set_onmessage(None);
		self.socket.set_onerror(None);
		self.socket.set_onclose(None);
		let _ = self.socket.close();
	}
}

impl Drop for SocketHandle {
	fn drop(&mut self) {
		self.close();
		log::info!("job status socket disconnected");
	}
}
