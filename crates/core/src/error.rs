//! Error taxonomy for the hidden-tab engine.

use ghost_protocol::{TabId, WindowId};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GhostError>;

#[derive(Debug, Error)]
pub enum GhostError {
	/// Privileged or unsupported URL, rejected before any side effect.
	#[error("cannot hide {url}: {reason}")]
	InvalidResource { url: String, reason: String },

	/// A remembered tab id no longer resolves.
	#[error("{0} no longer exists")]
	HandleNotFound(TabId),

	/// The hidden window was closed underneath us.
	#[error("hidden container {0} is unavailable")]
	ContainerUnavailable(WindowId),

	#[error("backend unreachable: {0}")]
	BackendUnreachable(String),

	#[error("extraction failed: {0}")]
	Extraction(String),

	/// Unexpected rejection from the browser host.
	#[error("host rejected {operation}: {message}")]
	Host { operation: &'static str, message: String },

	#[error("record store error: {0}")]
	Store(String),

	#[error("configuration error: {0}")]
	Config(String),

	#[error("no active tab to hide")]
	NoActiveTab,

	#[error("dispatcher stopped")]
	DispatcherClosed,

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),
}

impl GhostError {
	pub fn host(operation: &'static str, message: impl Into<String>) -> Self {
		GhostError::Host {
			operation,
			message: message.into(),
		}
	}

	/// Errors that the engine recovers from on its own rather than surfacing as fatal.
	pub fn is_recoverable(&self) -> bool {
		matches!(
			self,
			GhostError::HandleNotFound(_) | GhostError::ContainerUnavailable(_) | GhostError::BackendUnreachable(_) | GhostError::Extraction(_)
		)
	}
}

impl From<reqwest::Error> for GhostError {
	fn from(err: reqwest::Error) -> Self {
		GhostError::BackendUnreachable(err.to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn invalid_resource_message_names_url() {
		let err = GhostError::InvalidResource {
			url: "chrome://settings".to_string(),
			reason: "privileged scheme".to_string(),
		};
		assert_eq!(err.to_string(), "cannot hide chrome://settings: privileged scheme");
		assert!(!err.is_recoverable());
	}

	#[test]
	fn stale_handles_are_recoverable() {
		assert!(GhostError::HandleNotFound(TabId(3)).is_recoverable());
		assert!(!GhostError::host("moveTab", "boom").is_recoverable());
	}
}
