//! Site-specific extractors and the ordered domain registry that selects them.

use std::collections::HashSet;

use scraper::{Html, Selector};

use crate::error::{GhostError, Result};
use crate::readable::dom::{is_navigation_like, visible_text};
use crate::readable::text::{char_len, fingerprint};

/// Minimum combined length for site output to be accepted.
pub(crate) const MIN_SITE_CHARS: usize = 200;

/// One labelled piece of page content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
	pub label: &'static str,
	pub text: String,
}

/// How a registry entry matches a page host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainMatcher {
	/// The host exactly.
	Exact(&'static str),
	/// The host or any subdomain of it.
	Suffix(&'static str),
}

impl DomainMatcher {
	pub fn matches(self, host: &str) -> bool {
		match self {
			DomainMatcher::Exact(domain) => host == domain,
			DomainMatcher::Suffix(domain) => host == domain || host.strip_suffix(domain).is_some_and(|prefix| prefix.ends_with('.')),
		}
	}
}

struct Section {
	label: &'static str,
	selector: &'static str,
	limit: usize,
}

const fn section(label: &'static str, selector: &'static str, limit: usize) -> Section {
	Section { label, selector, limit }
}

/// Known sites with hand-written content layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteExtractor {
	GitHub,
	StackExchange,
	Wikipedia,
	HackerNews,
	Reddit,
	Zhihu,
}

const GITHUB: &[Section] = &[
	section("Title", ".js-issue-title, .markdown-title, strong[itemprop=\"name\"], h1", 1),
	section("About", "[itemprop=\"about\"], .f4.my-3", 1),
	section("README", "article.markdown-body", 1),
	section("Comment", ".comment-body", 20),
];

const STACK_EXCHANGE: &[Section] = &[
	section("Question", "#question-header h1, h1[itemprop=\"name\"]", 1),
	section("Question body", "#question .s-prose, .question .js-post-body", 1),
	section("Answer", ".answer .s-prose, .answer .js-post-body", 10),
];

const WIKIPEDIA: &[Section] = &[
	section("Title", "#firstHeading", 1),
	section("Content", "#mw-content-text .mw-parser-output > p", 40),
];

const HACKER_NEWS: &[Section] = &[
	section("Story", ".titleline", 1),
	section("Text", ".toptext", 1),
	section("Comment", ".commtext", 40),
];

const REDDIT: &[Section] = &[
	section("Title", "shreddit-post h1, h1[slot=\"title\"], [data-test-id=\"post-content\"] h1, a.title", 1),
	section("Post", "shreddit-post [slot=\"text-body\"], [data-test-id=\"post-content\"] .md, .expando .usertext-body .md", 1),
	section("Comment", "shreddit-comment [slot=\"comment\"], .comment .usertext-body .md", 30),
];

const ZHIHU: &[Section] = &[
	section("Question", ".QuestionHeader-title, .Post-Title", 1),
	section("Detail", ".QuestionRichText, .Post-RichText", 1),
	section("Answer", ".RichContent-inner, .RichText", 10),
];

impl SiteExtractor {
	pub fn name(self) -> &'static str {
		match self {
			SiteExtractor::GitHub => "github",
			SiteExtractor::StackExchange => "stackexchange",
			SiteExtractor::Wikipedia => "wikipedia",
			SiteExtractor::HackerNews => "hackernews",
			SiteExtractor::Reddit => "reddit",
			SiteExtractor::Zhihu => "zhihu",
		}
	}

	fn sections(self) -> &'static [Section] {
		match self {
			SiteExtractor::GitHub => GITHUB,
			SiteExtractor::StackExchange => STACK_EXCHANGE,
			SiteExtractor::Wikipedia => WIKIPEDIA,
			SiteExtractor::HackerNews => HACKER_NEWS,
			SiteExtractor::Reddit => REDDIT,
			SiteExtractor::Zhihu => ZHIHU,
		}
	}

	/// Collects labelled fragments in section order, skipping navigation-like
	/// regions and fragments whose fingerprint was already seen.
	pub fn fragments(self, document: &Html) -> Result<Vec<Fragment>> {
		let mut seen = HashSet::new();
		let mut fragments = Vec::new();

		for section in self.sections() {
			let selector = Selector::parse(section.selector)
				.map_err(|err| GhostError::Extraction(format!("{} selector {:?}: {err}", self.name(), section.selector)))?;

			let mut taken = 0;
			for element in document.select(&selector) {
				if taken >= section.limit {
					break;
				}
				if is_navigation_like(element) {
					continue;
				}
				let text = visible_text(element);
				if text.is_empty() || !seen.insert(fingerprint(&text)) {
					continue;
				}
				fragments.push(Fragment { label: section.label, text });
				taken += 1;
			}
		}

		Ok(fragments)
	}
}

/// Joins fragments into the digest text.
pub(crate) fn render_fragments(fragments: &[Fragment]) -> String {
	fragments
		.iter()
		.map(|fragment| format!("{}: {}", fragment.label, fragment.text))
		.collect::<Vec<_>>()
		.join("\n\n")
}

/// Runs a site extractor and applies the minimum-length gate.
///
/// The gate counts extracted content only; labels and separators added by
/// rendering do not count toward it.
pub(crate) fn extract_site(extractor: SiteExtractor, document: &Html) -> Result<Option<String>> {
	let fragments = extractor.fragments(document)?;
	let content: usize = fragments.iter().map(|fragment| char_len(&fragment.text)).sum();
	if content > MIN_SITE_CHARS {
		Ok(Some(render_fragments(&fragments)))
	} else {
		Ok(None)
	}
}

/// One registry row.
#[derive(Debug, Clone, Copy)]
pub struct SiteEntry {
	pub matcher: DomainMatcher,
	pub extractor: SiteExtractor,
}

const fn entry(matcher: DomainMatcher, extractor: SiteExtractor) -> SiteEntry {
	SiteEntry { matcher, extractor }
}

/// Ordered registry; the first matching row wins.
pub static REGISTRY: &[SiteEntry] = &[
	entry(DomainMatcher::Exact("gist.github.com"), SiteExtractor::GitHub),
	entry(DomainMatcher::Exact("github.com"), SiteExtractor::GitHub),
	entry(DomainMatcher::Suffix("stackoverflow.com"), SiteExtractor::StackExchange),
	entry(DomainMatcher::Suffix("stackexchange.com"), SiteExtractor::StackExchange),
	entry(DomainMatcher::Suffix("superuser.com"), SiteExtractor::StackExchange),
	entry(DomainMatcher::Suffix("serverfault.com"), SiteExtractor::StackExchange),
	entry(DomainMatcher::Suffix("askubuntu.com"), SiteExtractor::StackExchange),
	entry(DomainMatcher::Suffix("wikipedia.org"), SiteExtractor::Wikipedia),
	entry(DomainMatcher::Exact("news.ycombinator.com"), SiteExtractor::HackerNews),
	entry(DomainMatcher::Suffix("reddit.com"), SiteExtractor::Reddit),
	entry(DomainMatcher::Suffix("zhihu.com"), SiteExtractor::Zhihu),
];

/// Selects the extractor for a lowercased host.
pub fn select_extractor(host: &str) -> Option<SiteExtractor> {
	REGISTRY.iter().find(|entry| entry.matcher.matches(host)).map(|entry| entry.extractor)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn suffix_matches_subdomains_only_on_dot_boundary() {
		let matcher = DomainMatcher::Suffix("reddit.com");
		assert!(matcher.matches("reddit.com"));
		assert!(matcher.matches("old.reddit.com"));
		assert!(!matcher.matches("notreddit.com"));
		assert!(!DomainMatcher::Exact("github.com").matches("api.github.com"));
	}

	#[test]
	fn registry_lookup() {
		assert_eq!(select_extractor("github.com"), Some(SiteExtractor::GitHub));
		assert_eq!(select_extractor("en.wikipedia.org"), Some(SiteExtractor::Wikipedia));
		assert_eq!(select_extractor("math.stackexchange.com"), Some(SiteExtractor::StackExchange));
		assert_eq!(select_extractor("example.com"), None);
	}

	#[test]
	fn every_section_selector_parses() {
		for entry in REGISTRY {
			for section in entry.extractor.sections() {
				assert!(Selector::parse(section.selector).is_ok(), "{} selector {:?}", entry.extractor.name(), section.selector);
			}
		}
	}

	#[test]
	fn duplicate_fingerprints_collapse() {
		let shared = "Same answer text repeated. ".repeat(12);
		let html = format!(
			"<html><body><div id='question-header'><h1>How?</h1></div><div class='answer'><div class='s-prose'>{shared} variant A</div></div><div class='answer'><div class='s-prose'>{shared} variant B</div></div></body></html>"
		);
		let doc = Html::parse_document(&html);
		let fragments = SiteExtractor::StackExchange.fragments(&doc).unwrap();
		let answers: Vec<_> = fragments.iter().filter(|f| f.label == "Answer").collect();
		assert_eq!(answers.len(), 1);
		assert!(answers[0].text.ends_with("variant A"));
	}

	#[test]
	fn navigation_regions_are_skipped() {
		let html = "<html><body><div class='sidebar'><span class='commtext'>sidebar chatter</span></div><span class='commtext'>real comment</span></body></html>";
		let doc = Html::parse_document(html);
		let fragments = SiteExtractor::HackerNews.fragments(&doc).unwrap();
		assert_eq!(fragments.len(), 1);
		assert_eq!(fragments[0].text, "real comment");
	}

	fn story_page(title_chars: usize, comment_chars: usize) -> Html {
		Html::parse_document(&format!(
			"<html><body><span class='titleline'>{}</span><span class='commtext'>{}</span></body></html>",
			"t".repeat(title_chars),
			"c".repeat(comment_chars)
		))
	}

	#[test]
	fn length_gate_ignores_labels() {
		let doc = story_page(100, 95);
		assert_eq!(extract_site(SiteExtractor::HackerNews, &doc).unwrap(), None);

		let doc = story_page(100, 101);
		let text = extract_site(SiteExtractor::HackerNews, &doc).unwrap().unwrap();
		assert!(text.starts_with("Story: ttt"));
		assert!(text.contains("\n\nComment: ccc"));
	}

	#[test]
	fn short_site_output_is_rejected() {
		let doc = Html::parse_document("<html><body><span class='titleline'>Tiny</span></body></html>");
		assert_eq!(extract_site(SiteExtractor::HackerNews, &doc).unwrap(), None);
	}
}
