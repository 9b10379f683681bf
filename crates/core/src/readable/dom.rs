//! Tree walks over parsed pages: visible text, link density, and navigation detection.

use scraper::ElementRef;
use scraper::node::Element;

use crate::readable::text::{char_len, normalize_block_text, normalize_inline};
use crate::readable::vocabulary::vocabulary;

/// Text measurements for one subtree, ignoring stripped elements.
#[derive(Debug, Default, Clone)]
pub(crate) struct TextStats {
	pub(crate) text: String,
	pub(crate) text_chars: usize,
	pub(crate) link_chars: usize,
	pub(crate) paragraphs: usize,
}

impl TextStats {
	/// Share of the text that sits inside links, in `[0, 1]`.
	pub(crate) fn link_density(&self) -> f64 {
		if self.text_chars == 0 {
			return 0.0;
		}
		(self.link_chars as f64 / self.text_chars as f64).min(1.0)
	}
}

#[derive(Default)]
struct Walk {
	text: String,
	link_text: String,
	paragraphs: usize,
}

/// Scripts, styles, hidden nodes, and form controls never contribute text.
pub(crate) fn is_stripped(element: &Element) -> bool {
	let name = element.name();
	if vocabulary().stripped_tags.iter().any(|tag| tag == name) {
		return true;
	}
	if element.attr("hidden").is_some() {
		return true;
	}
	if element.attr("aria-hidden").is_some_and(|v| v.eq_ignore_ascii_case("true")) {
		return true;
	}
	element.attr("style").is_some_and(|style| {
		let compact: String = style.chars().filter(|c| !c.is_whitespace()).collect::<String>().to_ascii_lowercase();
		compact.contains("display:none") || compact.contains("visibility:hidden")
	})
}

/// True when the element or any ancestor is stripped.
pub(crate) fn is_within_stripped(element: ElementRef<'_>) -> bool {
	is_stripped(element.value()) || element.ancestors().filter_map(ElementRef::wrap).any(|a| is_stripped(a.value()))
}

fn is_block(name: &str) -> bool {
	name == "br" || vocabulary().block_tags.iter().any(|tag| tag == name)
}

fn walk(element: ElementRef<'_>, in_link: bool, acc: &mut Walk) {
	for child in element.children() {
		if let Some(text) = child.value().as_text() {
			acc.text.push_str(text);
			if in_link {
				acc.link_text.push_str(text);
				acc.link_text.push(' ');
			}
			continue;
		}
		let Some(child) = ElementRef::wrap(child) else {
			continue;
		};
		let value = child.value();
		if is_stripped(value) {
			continue;
		}
		let name = value.name();
		if name == "p" {
			acc.paragraphs += 1;
		}
		let block = is_block(name);
		if block {
			acc.text.push('\n');
		}
		walk(child, in_link || name == "a", acc);
		if block {
			acc.text.push('\n');
		}
	}
}

/// Measures the visible text of `element`'s subtree.
pub(crate) fn measure(element: ElementRef<'_>) -> TextStats {
	let mut acc = Walk::default();
	walk(element, element.value().name() == "a", &mut acc);
	let text = normalize_block_text(&acc.text);
	let link_text = normalize_inline(&acc.link_text);
	TextStats {
		text_chars: char_len(&text),
		link_chars: char_len(&link_text),
		paragraphs: acc.paragraphs,
		text,
	}
}

/// Visible text of `element`'s subtree with block boundaries as newlines.
pub(crate) fn visible_text(element: ElementRef<'_>) -> String {
	measure(element).text
}

fn class_is_navigation(class: &str) -> bool {
	let nav = &vocabulary().navigation;
	class.split_whitespace().any(|token| {
		let token = token.to_ascii_lowercase();
		nav.class_tokens.iter().any(|t| *t == token) || nav.class_keywords.iter().any(|k| token.contains(k.as_str()))
	})
}

fn looks_like_navigation(element: &Element) -> bool {
	let nav = &vocabulary().navigation;
	let name = element.name();
	if nav.tags.iter().any(|tag| tag == name) {
		return true;
	}
	if element
		.attr("role")
		.is_some_and(|role| nav.roles.iter().any(|r| r.eq_ignore_ascii_case(role.trim())))
	{
		return true;
	}
	element.attr("class").is_some_and(class_is_navigation)
}

/// True when the element or any ancestor is navigation, sidebar, or similar chrome.
pub(crate) fn is_navigation_like(element: ElementRef<'_>) -> bool {
	looks_like_navigation(element.value()) || element.ancestors().filter_map(ElementRef::wrap).any(|a| looks_like_navigation(a.value()))
}

#[cfg(test)]
mod tests {
	use scraper::{Html, Selector};

	use super::*;

	fn first<'a>(doc: &'a Html, css: &str) -> ElementRef<'a> {
		let selector = Selector::parse(css).unwrap();
		doc.select(&selector).next().unwrap()
	}

	#[test]
	fn visible_text_skips_scripts_hidden_and_controls() {
		let doc = Html::parse_document(
			"<div id='x'><p>Keep me</p><script>var x = 1;</script><p hidden>secret</p><span style='display: none'>gone</span><button>Click</button><p>And me</p></div>",
		);
		let text = visible_text(first(&doc, "#x"));
		assert_eq!(text, "Keep me\nAnd me");
	}

	#[test]
	fn measures_links_and_paragraphs() {
		let doc = Html::parse_document("<div id='x'><p>abcde <a href='#'>fghij</a></p><p>klmno</p></div>");
		let stats = measure(first(&doc, "#x"));
		assert_eq!(stats.paragraphs, 2);
		assert_eq!(stats.link_chars, 5);
		assert_eq!(stats.text_chars, 17);
		assert!((stats.link_density() - 5.0 / 17.0).abs() < 1e-9);
	}

	#[test]
	fn navigation_detected_through_ancestors() {
		let doc = Html::parse_document(
			"<body><div class='site-sidebar'><p id='a'>side</p></div><div role='navigation'><p id='b'>nav</p></div><nav><p id='c'>n</p></nav><div class='main'><p id='d'>body</p></div></body>",
		);
		assert!(is_navigation_like(first(&doc, "#a")));
		assert!(is_navigation_like(first(&doc, "#b")));
		assert!(is_navigation_like(first(&doc, "#c")));
		assert!(!is_navigation_like(first(&doc, "#d")));
	}

	#[test]
	fn class_tokens_match_whole_words_only() {
		assert!(class_is_navigation("nav top"));
		assert!(!class_is_navigation("unavailable canvas-wrap"));
		assert!(class_is_navigation("MainMenu"));
	}
}
