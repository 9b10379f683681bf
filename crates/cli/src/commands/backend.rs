use ghost::SearchBackend;
use ghost_protocol::{LlmConfig, SearchRequest};
use serde_json::json;

use super::{CommandContext, Outcome};

pub async fn search(ctx: &CommandContext, query: String, top_k: usize) -> anyhow::Result<Outcome> {
	let backend = ctx.backend()?;
	let reply = backend.search(SearchRequest::new(query).with_top_k(top_k)).await?;
	let mut outcome = Outcome::new(serde_json::to_value(&reply)?);
	if reply.results.is_empty() {
		outcome.note("no matching pages");
	}
	Ok(outcome)
}

pub async fn llm_search(ctx: &CommandContext, query: String, top_k: usize) -> anyhow::Result<Outcome> {
	let backend = ctx.backend()?;
	let reply = backend.llm_search(SearchRequest::new(query).with_top_k(top_k)).await?;
	let mut outcome = Outcome::new(serde_json::to_value(&reply)?);
	if let Some(err) = &reply.llm_error {
		outcome.warn(format!("keyword expansion unavailable: {err}"));
	}
	Ok(outcome)
}

pub async fn indexed(ctx: &CommandContext) -> anyhow::Result<Outcome> {
	let backend = ctx.backend()?;
	let listing = backend.list().await?;
	Ok(Outcome::new(json!({
		"count": listing.pages.len(),
		"pages": listing.pages,
	})))
}

/// Reads the backend's LLM settings, replacing them first when `update` is given.
pub async fn llm_config(ctx: &CommandContext, update: Option<LlmConfig>) -> anyhow::Result<Outcome> {
	let backend = ctx.backend()?;
	let updated = update.is_some();
	if let Some(config) = update {
		backend.set_llm_config(&config).await?;
	}

	let current = backend.llm_config().await?;
	let mut outcome = Outcome::new(json!({
		"updated": updated,
		"config": current.config,
	}));
	if !current.config.configured {
		outcome.note("no LLM configured; llm-search will use the raw query");
	}
	Ok(outcome)
}

/// Backend health plus a summary of the local record store. An offline
/// backend is reported, not treated as a failure.
pub async fn status(ctx: &CommandContext) -> anyhow::Result<Outcome> {
	let backend = ctx.backend()?;
	let (repository, path) = ctx.repository()?;
	let mut notes = Vec::new();

	let backend_status = match backend.health().await {
		Ok(health) => json!({
			"url": backend.base_url().as_str(),
			"alive": health.status == "alive",
			"service": health.service,
		}),
		Err(err) => {
			notes.push(format!("backend offline: {err}"));
			json!({
				"url": backend.base_url().as_str(),
				"alive": false,
			})
		}
	};

	let records = repository.hidden_records()?;
	let mut outcome = Outcome::new(json!({
		"backend": backend_status,
		"store": {
			"path": path,
			"hiddenRecords": records.len(),
			"containerHandle": repository.container_handle()?,
			"settings": repository.settings()?,
		},
		"timeoutMs": ctx.config().request_timeout_ms,
	}));
	for note in notes {
		outcome.warn(note);
	}
	Ok(outcome)
}
