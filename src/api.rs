//! Boundary types and thin wrappers for the upload/job REST API.
//!
//! The upload and column-selection forms themselves live outside this core;
//! these are the typed call shapes they go through.

use serde::{Deserialize, Serialize};

use crate::components::graph::{ClaimRecord, TopicMap};
use crate::config;
use crate::error::AppError;

/// Response of the submit-dataset call.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct UploadResponse {
	pub file_name: String,
	pub column_names: Vec<String>,
}

/// Parameters of the submit-job call.
#[derive(Clone, Debug, Serialize)]
pub struct JobRequest {
	/// Name of a previously uploaded dataset file.
	pub file_name: String,
	/// Column holding the text to extract claims from.
	pub column_name: String,
	/// Whether to cluster extracted entities.
	pub cluster: bool,
	/// Whether to preprocess text before extraction.
	pub preprocess: bool,
}

/// Response of the submit-job call.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct JobSubmitResponse {
	#[serde(rename = "jobId")]
	pub job_id: String,
}

/// Parameters of a re-clustering request.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ClusterRequest {
	/// Target topic count after reduction. `0` auto-reduces, `-1` disables
	/// reduction; omitted fields keep the server defaults.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub nr_topics: Option<i64>,
	/// Inclusive n-gram range of the topic representation.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub n_gram_range: Option<(u32, u32)>,
	/// Number of representative words kept per topic.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub top_n_words: Option<u32>,
	/// Serialized original claim records; the job re-clusters these.
	pub graph: String,
}

/// Raw response of the re-clustering call; `result_df` is a nested JSON
/// document.
#[derive(Clone, Debug, Deserialize)]
pub struct ClusterResponse {
	pub result_df: String,
	pub topics: TopicMap,
}

/// Upload a dataset file and obtain its stored name and column names.
pub async fn upload_dataset(file_name: &str, bytes: Vec<u8>) -> Result<UploadResponse, AppError> {
	let upload = |err: reqwest::Error| AppError::Upload(err.to_string());

	let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
	let form = reqwest::multipart::Form::new().part("file", part);

	let response = reqwest::Client::new()
		.post(format!("{}/file", config::API_URL))
		.multipart(form)
		.send()
		.await
		.map_err(upload)?
		.error_for_status()
		.map_err(upload)?;

	response.json().await.map_err(upload)
}

/// Submit a job over the uploaded dataset and obtain its id.
pub async fn submit_job(request: &JobRequest) -> Result<JobSubmitResponse, AppError> {
	let job_submission = |err: reqwest::Error| AppError::JobSubmission(err.to_string());

	let response = reqwest::Client::new()
		.get(format!("{}/graph", config::API_URL))
		.query(request)
		.send()
		.await
		.map_err(job_submission)?
		.error_for_status()
		.map_err(job_submission)?;

	response.json().await.map_err(job_submission)
}

/// Submit a re-clustering request over the original claims and decode the
/// resulting record set.
pub async fn submit_cluster_request(
	request: &ClusterRequest,
) -> Result<(Vec<ClaimRecord>, TopicMap), AppError> {
	let recluster = |err: reqwest::Error| AppError::Recluster(err.to_string());

	let response: ClusterResponse = reqwest::Client::new()
		.post(format!("{}/cluster", config::API_URL))
		.json(request)
		.send()
		.await
		.map_err(recluster)?
		.error_for_status()
		.map_err(recluster)?
		.json()
		.await
		.map_err(recluster)?;

	let data = serde_json::from_str(&response.result_df)
		.map_err(|err| AppError::Recluster(format!("result_df: {err}")))?;
	Ok((data, response.topics))
}
