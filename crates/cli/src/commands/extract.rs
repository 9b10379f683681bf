use std::path::Path;

use anyhow::Context;
use ghost::host::PageSnapshot;
use ghost::readable::extract;
use serde_json::json;

use super::Outcome;

/// Offline run of the vanish-time extractor over a saved page.
pub fn run(file: &Path, url: Option<String>, title: Option<String>) -> anyhow::Result<Outcome> {
	let html = std::fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))?;
	let url = url.unwrap_or_else(|| format!("file://{}", file.display()));

	let digest = extract(&PageSnapshot {
		url,
		title: title.unwrap_or_default(),
		html,
		favicon_ref: String::new(),
	});

	let mut outcome = Outcome::new(json!({
		"sourceUrl": digest.source_url,
		"title": digest.title,
		"strategy": digest.strategy.to_string(),
		"chars": digest.char_count(),
		"text": digest.text,
	}));
	if digest.text.is_empty() {
		outcome.warn("no text could be extracted");
	}
	Ok(outcome)
}
