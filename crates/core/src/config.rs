//! Engine configuration: `<config_dir>/ghost/config.json`, then environment.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::backend::{DEFAULT_BACKEND_URL, DEFAULT_TIMEOUT};
use crate::error::{GhostError, Result};

pub const APP_DIR: &str = "ghost";
pub const CONFIG_FILE: &str = "config.json";
pub const STATE_FILE: &str = "state.json";

pub const ENV_BACKEND_URL: &str = "GHOST_BACKEND_URL";
pub const ENV_STORE_PATH: &str = "GHOST_STORE_PATH";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GhostConfig {
	pub backend_url: String,
	pub request_timeout_ms: u64,
	/// Record store location; `None` means the platform default.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub store_path: Option<PathBuf>,
}

impl Default for GhostConfig {
	fn default() -> Self {
		Self {
			backend_url: DEFAULT_BACKEND_URL.to_string(),
			request_timeout_ms: DEFAULT_TIMEOUT.as_millis() as u64,
			store_path: None,
		}
	}
}

impl GhostConfig {
	/// Loads the user config file, if any, then applies environment overrides.
	pub fn load() -> Result<Self> {
		let mut config = match default_config_path() {
			Some(path) => Self::from_file(&path)?,
			None => Self::default(),
		};
		config.apply_env(|key| std::env::var(key).ok());
		Ok(config)
	}

	/// Reads a config file. A missing file yields defaults; a malformed one is an error.
	pub fn from_file(path: &Path) -> Result<Self> {
		let data = match std::fs::read_to_string(path) {
			Ok(data) => data,
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
				debug!(target = "ghost.config", path = %path.display(), "no config file; using defaults");
				return Ok(Self::default());
			}
			Err(err) => return Err(err.into()),
		};
		serde_json::from_str(&data).map_err(|err| GhostError::Config(format!("{}: {err}", path.display())))
	}

	/// Applies `GHOST_*` overrides through `lookup`.
	pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
		if let Some(url) = lookup(ENV_BACKEND_URL).filter(|v| !v.trim().is_empty()) {
			self.backend_url = url;
		}
		if let Some(path) = lookup(ENV_STORE_PATH).filter(|v| !v.trim().is_empty()) {
			self.store_path = Some(PathBuf::from(path));
		}
	}

	pub fn request_timeout(&self) -> Duration {
		Duration::from_millis(self.request_timeout_ms)
	}

	/// Effective store path: configured, else `<data_dir>/ghost/state.json`.
	pub fn resolved_store_path(&self) -> Result<PathBuf> {
		if let Some(path) = &self.store_path {
			return Ok(path.clone());
		}
		dirs::data_dir()
			.or_else(dirs::config_dir)
			.map(|dir| dir.join(APP_DIR).join(STATE_FILE))
			.ok_or_else(|| GhostError::Config("no data directory available; set GHOST_STORE_PATH".to_string()))
	}
}

pub fn default_config_path() -> Option<PathBuf> {
	dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
	use std::collections::HashMap;

	use super::*;

	#[test]
	fn missing_file_gives_defaults() {
		let dir = tempfile::tempdir().unwrap();
		let config = GhostConfig::from_file(&dir.path().join("nope.json")).unwrap();
		assert_eq!(config, GhostConfig::default());
		assert_eq!(config.request_timeout(), DEFAULT_TIMEOUT);
	}

	#[test]
	fn partial_file_keeps_other_defaults() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("config.json");
		std::fs::write(&path, r#"{"requestTimeoutMs": 1500}"#).unwrap();
		let config = GhostConfig::from_file(&path).unwrap();
		assert_eq!(config.request_timeout_ms, 1500);
		assert_eq!(config.backend_url, DEFAULT_BACKEND_URL);
	}

	#[test]
	fn malformed_file_is_a_config_error() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("config.json");
		std::fs::write(&path, "{not json").unwrap();
		assert!(matches!(GhostConfig::from_file(&path), Err(GhostError::Config(_))));
	}

	#[test]
	fn env_overrides_file_values() {
		let env: HashMap<&str, &str> = HashMap::from([(ENV_BACKEND_URL, "http://backend:9000"), (ENV_STORE_PATH, "/tmp/ghost.json")]);
		let mut config = GhostConfig::default();
		config.apply_env(|key| env.get(key).map(|v| v.to_string()));
		assert_eq!(config.backend_url, "http://backend:9000");
		assert_eq!(config.resolved_store_path().unwrap(), PathBuf::from("/tmp/ghost.json"));
	}
}
