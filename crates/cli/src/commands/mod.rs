//! Command implementations and the shared execution context.

mod backend;
mod extract;
mod hidden;

use std::path::PathBuf;
use std::sync::Arc;

use ghost::{GhostConfig, HttpBackend, JsonFileStore, RecordRepository};
use ghost_protocol::LlmConfig;
use serde_json::Value;
use tracing::debug;

use crate::cli::{Cli, Commands, HiddenAction};
use crate::output::{Diagnostic, DiagnosticLevel, ErrorCode, ResultBuilder, print_result};

/// Payload and side notes produced by one command.
pub struct Outcome {
	pub data: Value,
	pub diagnostics: Vec<Diagnostic>,
}

impl Outcome {
	pub fn new(data: Value) -> Self {
		Self {
			data,
			diagnostics: Vec::new(),
		}
	}

	pub fn warn(&mut self, message: impl Into<String>) {
		self.diagnostics.push(Diagnostic {
			level: DiagnosticLevel::Warning,
			message: message.into(),
		});
	}

	pub fn note(&mut self, message: impl Into<String>) {
		self.diagnostics.push(Diagnostic {
			level: DiagnosticLevel::Info,
			message: message.into(),
		});
	}
}

/// Effective configuration after file, environment, and flags.
pub struct CommandContext {
	config: GhostConfig,
}

impl CommandContext {
	pub fn new(config: GhostConfig) -> Self {
		Self { config }
	}

	pub fn config(&self) -> &GhostConfig {
		&self.config
	}

	pub fn backend(&self) -> ghost::Result<HttpBackend> {
		HttpBackend::new(&self.config.backend_url, self.config.request_timeout())
	}

	pub fn repository(&self) -> ghost::Result<(RecordRepository, PathBuf)> {
		let path = self.config.resolved_store_path()?;
		debug!(target = "ghost.cli", path = %path.display(), "opening record store");
		let store = JsonFileStore::open(path.clone());
		Ok((RecordRepository::new(Arc::new(store)), path))
	}
}

/// Runs the parsed command, prints its envelope, and reports success.
pub async fn run(cli: Cli) -> bool {
	let Cli {
		format, backend, store, command, ..
	} = cli;

	let builder = ResultBuilder::new(command.name());
	let result = match execute(command, backend, store).await {
		Ok(outcome) => builder.data(outcome.data).diagnostics(outcome.diagnostics).build(),
		Err(err) => {
			debug!(target = "ghost.cli", error = ?err, "command failed");
			builder.error(ErrorCode::classify(&err), format!("{err:#}")).build()
		}
	};

	print_result(&result, format);
	result.ok
}

fn context(backend_url: Option<String>, store: Option<PathBuf>) -> anyhow::Result<CommandContext> {
	let mut config = GhostConfig::load()?;
	if let Some(url) = backend_url {
		config.backend_url = url;
	}
	if let Some(path) = store {
		config.store_path = Some(path);
	}
	Ok(CommandContext::new(config))
}

async fn execute(command: Commands, backend_url: Option<String>, store: Option<PathBuf>) -> anyhow::Result<Outcome> {
	match command {
		Commands::Extract { file, url, title } => extract::run(&file, url, title),
		Commands::Search { query, top_k } => backend::search(&context(backend_url, store)?, query, top_k).await,
		Commands::LlmSearch { query, top_k } => backend::llm_search(&context(backend_url, store)?, query, top_k).await,
		Commands::Indexed => backend::indexed(&context(backend_url, store)?).await,
		Commands::LlmConfig { base_url, api_key, model } => {
			let update = match (base_url, api_key, model) {
				(Some(base_url), Some(api_key), Some(model)) => Some(LlmConfig { base_url, api_key, model }),
				_ => None,
			};
			backend::llm_config(&context(backend_url, store)?, update).await
		}
		Commands::Status => backend::status(&context(backend_url, store)?).await,
		Commands::Hidden { action: HiddenAction::List } => hidden::list(&context(backend_url, store)?),
		Commands::Hidden {
			action: HiddenAction::Remove { url },
		} => hidden::remove(&context(backend_url, store)?, &url).await,
		Commands::Settings { auto_discard } => hidden::settings(&context(backend_url, store)?, auto_discard),
	}
}
