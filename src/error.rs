//! Error kinds surfaced by the session.
//!
//! Every failure is scoped to the operation that raised it; none is fatal to
//! the session and none triggers an automatic retry.

use thiserror::Error;

/// Failures of the upload/job/re-cluster boundary and the push channel.
#[derive(Debug, Error)]
pub enum AppError {
	/// Dataset upload was rejected or unreachable.
	#[error("upload failed: {0}")]
	Upload(String),

	/// Job submission or the push channel could not be established.
	#[error("job submission failed: {0}")]
	JobSubmission(String),

	/// Re-clustering request failed; prior graph state stays intact.
	#[error("re-clustering failed: {0}")]
	Recluster(String),

	/// A push event failed to decode; the event is dropped and logged.
	#[error("malformed push payload: {0}")]
	MalformedPushPayload(String),
}
