use std::env;

/// Server settings, read from the environment.
///
/// | Variable                | Default     |
/// |-------------------------|-------------|
/// | `PREDICT_HOST`          | `127.0.0.1` |
/// | `PREDICT_PORT`          | `5000`      |
/// | `PREDICT_DATA_DIR`      | `./data`    |
/// | `PREDICT_DEFAULT_LIMIT` | `50`        |
#[derive(Clone, Debug)]
pub struct Config {
	pub host: String,
	pub port: u16,
	/// Folder holding the `.dat` corpora and their `.bin` caches.
	pub data_dir: String,
	/// Number of predictions returned when a request gives no limit.
	pub default_limit: usize,
}

impl Config {
	pub fn new() -> Self {
		let host = env::var("PREDICT_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

		let port = env::var("PREDICT_PORT")
			.ok()
			.and_then(|v| v.parse().ok())
			.unwrap_or(5000);

		let data_dir = env::var("PREDICT_DATA_DIR").unwrap_or_else(|_| "./data".to_string());

		let default_limit = env::var("PREDICT_DEFAULT_LIMIT")
			.ok()
			.and_then(|v| v.parse().ok())
			.unwrap_or(50);

		Config { host, port, data_dir, default_limit }
	}
}

impl Default for Config {
	fn default() -> Self {
		Self::new()
	}
}
