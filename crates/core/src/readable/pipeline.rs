//! Orchestration for the extraction layers.

use std::panic::{AssertUnwindSafe, catch_unwind};

use scraper::{Html, Selector};
use tracing::{debug, warn};

use crate::error::{GhostError, Result};
use crate::host::PageSnapshot;
use crate::readable::dom::visible_text;
use crate::readable::metadata::{extract_description, extract_title};
use crate::readable::site::{extract_site, select_extractor};
use crate::readable::scoring::extract_generic;
use crate::readable::text::truncate_chars;
use crate::readable::types::{ExtractionResult, Strategy};
use crate::url_policy::host_of;

/// Upper bound on digest length, in characters.
pub const MAX_TEXT_CHARS: usize = 50_000;

/// Runs one layer, turning errors and panics into a fall-through.
fn attempt<F>(layer: &str, url: &str, f: F) -> Option<String>
where
	F: FnOnce() -> Result<Option<String>>,
{
	match catch_unwind(AssertUnwindSafe(f)) {
		Ok(Ok(Some(text))) if !text.trim().is_empty() => Some(text),
		Ok(Ok(_)) => {
			debug!(target = "ghost.extract", layer, url, "layer produced nothing");
			None
		}
		Ok(Err(err)) => {
			warn!(target = "ghost.extract", layer, url, error = %err, "layer failed");
			None
		}
		Err(_) => {
			warn!(target = "ghost.extract", layer, url, "layer panicked");
			None
		}
	}
}

fn fallback_text(document: &Html) -> Result<Option<String>> {
	let body = Selector::parse("body").map_err(|err| GhostError::Extraction(err.to_string()))?;
	let text = match document.select(&body).next() {
		Some(body) => visible_text(body),
		None => visible_text(document.root_element()),
	};

	let parts: Vec<String> = extract_description(document).into_iter().chain(Some(text)).filter(|part| !part.is_empty()).collect();
	Ok(Some(parts.join("\n\n")))
}

fn run_layers(document: &Html, url: &str) -> Option<(String, Strategy)> {
	if let Some(extractor) = host_of(url).as_deref().and_then(select_extractor) {
		if let Some(text) = attempt(extractor.name(), url, || extract_site(extractor, document)) {
			return Some((text, Strategy::Site(extractor.name())));
		}
	}

	if let Some(text) = attempt("generic", url, || extract_generic(document)) {
		return Some((text, Strategy::Generic));
	}

	attempt("fallback", url, || fallback_text(document)).map(|text| (text, Strategy::Fallback))
}

/// Produces the bounded text digest of a captured page.
///
/// Never fails: when every layer comes up empty the result carries empty text.
pub fn extract(snapshot: &PageSnapshot) -> ExtractionResult {
	let url = snapshot.url.as_str();
	let parsed = catch_unwind(AssertUnwindSafe(|| {
		let document = Html::parse_document(&snapshot.html);
		let title = extract_title(&document);
		(run_layers(&document, url), title)
	}));

	let (outcome, page_title) = match parsed {
		Ok(parsed) => parsed,
		Err(_) => {
			warn!(target = "ghost.extract", url, "document parse panicked");
			(None, None)
		}
	};

	let (text, strategy) = outcome.unwrap_or_else(|| (String::new(), Strategy::Fallback));
	let text = truncate_chars(&text, MAX_TEXT_CHARS);
	let title = Some(snapshot.title.trim())
		.filter(|t| !t.is_empty())
		.map(str::to_string)
		.or(page_title)
		.unwrap_or_default();

	debug!(target = "ghost.extract", url, %strategy, chars = text.chars().count(), "extracted");
	ExtractionResult {
		text,
		title,
		source_url: snapshot.url.clone(),
		strategy,
	}
}
