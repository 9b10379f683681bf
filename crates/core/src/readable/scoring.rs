//! Generic content detection: semantic landmarks first, then readability-style
//! candidate scoring.

use scraper::{ElementRef, Html, Selector};

use crate::error::{GhostError, Result};
use crate::readable::dom::{TextStats, is_within_stripped, measure};
use crate::readable::vocabulary::{scoring_regexes, vocabulary};

/// A landmark with more text than this is taken as-is.
pub(crate) const MIN_LANDMARK_CHARS: usize = 200;

const POSITIVE_WEIGHT: f64 = 25.0;
const NEGATIVE_WEIGHT: f64 = -25.0;
const UNLIKELY_WEIGHT: f64 = -20.0;
const MAYBE_WEIGHT: f64 = 5.0;
const MAX_LENGTH_BONUS: usize = 3;

fn selector(css: &str) -> Result<Selector> {
	Selector::parse(css).map_err(|err| GhostError::Extraction(format!("selector {css:?}: {err}")))
}

/// Sum of keyword adjustments for an element's `class` and `id`.
pub(crate) fn keyword_adjustment(element: ElementRef<'_>) -> f64 {
	let value = element.value();
	let signature = format!("{} {}", value.attr("class").unwrap_or_default(), value.attr("id").unwrap_or_default()).to_lowercase();
	if signature.trim().is_empty() {
		return 0.0;
	}

	let regexes = scoring_regexes();
	let mut adjustment = 0.0;
	if regexes.positive.is_match(&signature) {
		adjustment += POSITIVE_WEIGHT;
	}
	if regexes.negative.is_match(&signature) {
		adjustment += NEGATIVE_WEIGHT;
	}
	if regexes.unlikely.is_match(&signature) {
		adjustment += UNLIKELY_WEIGHT;
	}
	if regexes.maybe.is_match(&signature) {
		adjustment += MAYBE_WEIGHT;
	}
	adjustment
}

/// `(paragraphs + min(chars / 100, 3) + keywords) * (1 - link density)`
pub(crate) fn score(element: ElementRef<'_>, stats: &TextStats) -> f64 {
	let length_bonus = (stats.text_chars / 100).min(MAX_LENGTH_BONUS);
	let base = stats.paragraphs as f64 + length_bonus as f64 + keyword_adjustment(element);
	base * (1.0 - stats.link_density())
}

fn landmark_text(document: &Html) -> Result<Option<String>> {
	let landmarks = selector(&vocabulary().landmark_selector)?;
	Ok(document
		.select(&landmarks)
		.filter(|el| !is_within_stripped(*el))
		.map(measure)
		.find(|stats| stats.text_chars > MIN_LANDMARK_CHARS)
		.map(|stats| stats.text))
}

fn best_candidate(document: &Html) -> Result<Option<String>> {
	let candidates = selector(&vocabulary().candidate_tags.join(", "))?;

	let mut best: Option<(f64, String)> = None;
	for element in document.select(&candidates) {
		if is_within_stripped(element) {
			continue;
		}
		let stats = measure(element);
		if stats.text_chars == 0 {
			continue;
		}
		let score = score(element, &stats);
		if score > 0.0 && best.as_ref().is_none_or(|(top, _)| score > *top) {
			best = Some((score, stats.text));
		}
	}

	Ok(best.map(|(_, text)| text))
}

/// Main content of the page, or `None` when nothing scores above zero.
pub(crate) fn extract_generic(document: &Html) -> Result<Option<String>> {
	if let Some(text) = landmark_text(document)? {
		return Ok(Some(text));
	}
	best_candidate(document)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn first<'a>(doc: &'a Html, css: &str) -> ElementRef<'a> {
		doc.select(&Selector::parse(css).unwrap()).next().unwrap()
	}

	#[test]
	fn keywords_shift_score() {
		let doc = Html::parse_document("<div id='a' class='post-body'></div><div id='b' class='share-widget'></div><div id='c' class='sidebar'></div>");
		assert_eq!(keyword_adjustment(first(&doc, "#a")), POSITIVE_WEIGHT + MAYBE_WEIGHT);
		assert_eq!(keyword_adjustment(first(&doc, "#b")), NEGATIVE_WEIGHT);
		assert_eq!(keyword_adjustment(first(&doc, "#c")), NEGATIVE_WEIGHT + UNLIKELY_WEIGHT);
	}

	#[test]
	fn long_landmark_wins_directly() {
		let body = "Landmark paragraph text. ".repeat(10);
		let html = format!("<html><body><div class='content'><p>short</p></div><main><p>{body}</p></main></body></html>");
		let doc = Html::parse_document(&html);
		assert_eq!(extract_generic(&doc).unwrap(), Some(body.trim().to_string()));
	}

	#[test]
	fn short_landmark_defers_to_scoring() {
		let html = "<html><body><main>tiny</main><div id='x'><p>one</p><p>two</p><p>three</p></div></body></html>";
		let doc = Html::parse_document(html);
		assert_eq!(extract_generic(&doc).unwrap(), Some("one\ntwo\nthree".to_string()));
	}

	#[test]
	fn link_heavy_blocks_lose() {
		let html = "<html><body>\
			<div id='links'><p><a href='#'>one</a></p><p><a href='#'>two</a></p><p><a href='#'>three</a></p><p><a href='#'>four</a></p></div>\
			<div id='prose'><p>Real sentence here.</p><p>Another one.</p></div>\
			</body></html>";
		let doc = Html::parse_document(html);
		assert_eq!(extract_generic(&doc).unwrap(), Some("Real sentence here.\nAnother one.".to_string()));
	}

	#[test]
	fn nothing_positive_yields_none() {
		let doc = Html::parse_document("<html><body><div class='comment'>x</div></body></html>");
		assert_eq!(extract_generic(&doc).unwrap(), None);
	}
}
