//! UI components.

pub mod cluster_options;
pub mod graph;
pub mod job_status;
pub mod topics;
