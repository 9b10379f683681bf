use ghost::GhostError;
use serde::Serialize;

/// Current schema version for command output.
pub const SCHEMA_VERSION: u32 = 1;

/// The result envelope returned by all commands.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult<T: Serialize> {
	pub schema_version: u32,
	pub ok: bool,
	pub command: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub data: Option<T>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<CommandError>,
	pub duration_ms: u64,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub diagnostics: Vec<Diagnostic>,
}

/// Error information for failed commands.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandError {
	pub code: ErrorCode,
	pub message: String,
}

/// Standardized error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
	InvalidInput,
	NotFound,
	BackendUnreachable,
	StoreError,
	ConfigError,
	IoError,
	InternalError,
}

impl ErrorCode {
	pub fn as_str(self) -> &'static str {
		match self {
			ErrorCode::InvalidInput => "INVALID_INPUT",
			ErrorCode::NotFound => "NOT_FOUND",
			ErrorCode::BackendUnreachable => "BACKEND_UNREACHABLE",
			ErrorCode::StoreError => "STORE_ERROR",
			ErrorCode::ConfigError => "CONFIG_ERROR",
			ErrorCode::IoError => "IO_ERROR",
			ErrorCode::InternalError => "INTERNAL_ERROR",
		}
	}

	/// Classifies an error raised anywhere below the command layer.
	pub fn classify(err: &anyhow::Error) -> Self {
		if let Some(err) = err.downcast_ref::<GhostError>() {
			return Self::from(err);
		}
		if err.downcast_ref::<std::io::Error>().is_some() {
			return ErrorCode::IoError;
		}
		ErrorCode::InternalError
	}
}

impl From<&GhostError> for ErrorCode {
	fn from(err: &GhostError) -> Self {
		match err {
			GhostError::InvalidResource { .. } => ErrorCode::InvalidInput,
			GhostError::HandleNotFound(_) | GhostError::ContainerUnavailable(_) | GhostError::NoActiveTab => ErrorCode::NotFound,
			GhostError::BackendUnreachable(_) => ErrorCode::BackendUnreachable,
			GhostError::Store(_) | GhostError::Json(_) => ErrorCode::StoreError,
			GhostError::Config(_) => ErrorCode::ConfigError,
			GhostError::Io(_) => ErrorCode::IoError,
			GhostError::Extraction(_) | GhostError::Host { .. } | GhostError::DispatcherClosed => ErrorCode::InternalError,
		}
	}
}

/// Diagnostic message attached to a command result.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
	pub level: DiagnosticLevel,
	pub message: String,
}

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
	Info,
	Warning,
}
