//! Endpoint configuration, overridable at compile time.

/// Base URL of the REST API.
pub const API_URL: &str = match option_env!("API_URL") {
	Some(url) => url,
	None => "http://localhost:5000/api",
};

/// URL of the job-status push channel.
pub const SOCKET_URL: &str = match option_env!("SOCKET_URL") {
	Some(url) => url,
	None => "ws://localhost:5000/socket",
};
