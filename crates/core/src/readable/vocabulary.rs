//! Keyword vocabulary loaded from `vocabulary.json`.

use std::sync::LazyLock;

use regex_lite::Regex;
use serde::Deserialize;

static VOCABULARY: LazyLock<Vocabulary> = LazyLock::new(|| {
	let json = include_str!("vocabulary.json");
	serde_json::from_str(json).expect("Failed to parse vocabulary.json")
});

static SCORING_REGEXES: LazyLock<ScoringRegexes> = LazyLock::new(|| {
	let scoring = &VOCABULARY.scoring;
	ScoringRegexes {
		positive: keyword_regex(&scoring.positive),
		negative: keyword_regex(&scoring.negative),
		unlikely: keyword_regex(&scoring.unlikely),
		maybe: keyword_regex(&scoring.maybe),
	}
});

pub(crate) fn vocabulary() -> &'static Vocabulary {
	&VOCABULARY
}

pub(crate) fn scoring_regexes() -> &'static ScoringRegexes {
	&SCORING_REGEXES
}

fn keyword_regex(keywords: &[String]) -> Regex {
	if keywords.is_empty() {
		return Regex::new(r"[^\s\S]").expect("empty keyword fallback regex should compile");
	}
	let pattern = keywords.iter().map(|k| regex_lite::escape(k)).collect::<Vec<_>>().join("|");
	Regex::new(&format!("(?i){pattern}")).expect("keyword regex should compile")
}

#[derive(Debug, Deserialize)]
pub(crate) struct Vocabulary {
	pub(crate) navigation: NavigationVocabulary,
	pub(crate) stripped_tags: Vec<String>,
	pub(crate) block_tags: Vec<String>,
	pub(crate) candidate_tags: Vec<String>,
	pub(crate) landmark_selector: String,
	pub(crate) scoring: ScoringVocabulary,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NavigationVocabulary {
	pub(crate) tags: Vec<String>,
	pub(crate) roles: Vec<String>,
	/// Matched as substrings of each lowercased class token.
	pub(crate) class_keywords: Vec<String>,
	/// Matched against whole class tokens only.
	pub(crate) class_tokens: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScoringVocabulary {
	pub(crate) positive: Vec<String>,
	pub(crate) negative: Vec<String>,
	pub(crate) unlikely: Vec<String>,
	pub(crate) maybe: Vec<String>,
}

pub(crate) struct ScoringRegexes {
	pub(crate) positive: Regex,
	pub(crate) negative: Regex,
	pub(crate) unlikely: Regex,
	pub(crate) maybe: Regex,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn vocabulary_loads() {
		let vocab = vocabulary();
		assert!(vocab.navigation.tags.iter().any(|t| t == "nav"));
		assert!(!vocab.candidate_tags.is_empty());
		assert!(!vocab.stripped_tags.is_empty());
		assert!(scraper::Selector::parse(&vocab.landmark_selector).is_ok());
	}

	#[test]
	fn scoring_regexes_match_case_insensitively() {
		let regexes = scoring_regexes();
		assert!(regexes.positive.is_match("Post-Body"));
		assert!(regexes.negative.is_match("share-widget"));
		assert!(regexes.unlikely.is_match("site-HEADER"));
		assert!(!regexes.unlikely.is_match("story"));
	}
}
