use ghost::SearchBackend;
use serde_json::json;
use tracing::info;

use super::{CommandContext, Outcome};

pub fn list(ctx: &CommandContext) -> anyhow::Result<Outcome> {
	let (repository, _) = ctx.repository()?;
	let records = repository.hidden_records()?;
	Ok(Outcome::new(json!({
		"count": records.len(),
		"records": records,
	})))
}

/// Drops a hidden record and asks the backend to forget the page.
///
/// Without a running engine there is no live tab to close; the next engine
/// start simply no longer finds the record.
pub async fn remove(ctx: &CommandContext, url: &str) -> anyhow::Result<Outcome> {
	let (repository, _) = ctx.repository()?;
	let removed = repository.remove_record(url)?;

	let backend = ctx.backend()?;
	let mut outcome = Outcome::new(json!({}));
	let deleted = match backend.delete(url).await {
		Ok(reply) => reply.deleted,
		Err(err) => {
			outcome.warn(format!("backend offline; index entry kept: {err}"));
			false
		}
	};
	if !removed {
		outcome.note(format!("{url} was not hidden"));
	}

	info!(target = "ghost.cli", %url, removed, deleted, "hidden record removed");
	outcome.data = json!({
		"url": url,
		"removed": removed,
		"backendDeleted": deleted,
	});
	Ok(outcome)
}

pub fn settings(ctx: &CommandContext, auto_discard: Option<bool>) -> anyhow::Result<Outcome> {
	let (repository, _) = ctx.repository()?;
	let mut settings = repository.settings()?;
	if let Some(auto_discard) = auto_discard {
		settings.auto_discard = auto_discard;
		repository.set_settings(settings)?;
	}
	Ok(Outcome::new(serde_json::to_value(settings)?))
}
