//! Shared text cleanup helpers.

use std::sync::LazyLock;

use regex_lite::Regex;

static INLINE_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t\u{a0}\r\f\v]+").expect("INLINE_SPACE regex should compile"));
static ANY_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("ANY_SPACE regex should compile"));

/// Length of a fingerprint in characters.
pub(crate) const FINGERPRINT_CHARS: usize = 200;

/// Collapses spaces within lines, trims lines, and drops blank ones.
pub(crate) fn normalize_block_text(s: &str) -> String {
	s.lines()
		.map(|line| INLINE_SPACE.replace_all(line, " ").trim().to_string())
		.filter(|line| !line.is_empty())
		.collect::<Vec<_>>()
		.join("\n")
}

/// Collapses every whitespace run, including newlines, to one space.
pub(crate) fn normalize_inline(s: &str) -> String {
	ANY_SPACE.replace_all(s, " ").trim().to_string()
}

/// Identity used to drop repeated fragments: the first characters of the normalized text.
pub(crate) fn fingerprint(s: &str) -> String {
	normalize_inline(s).chars().take(FINGERPRINT_CHARS).collect()
}

pub(crate) fn char_len(s: &str) -> usize {
	s.chars().count()
}

/// Cuts `s` to at most `max` characters on a char boundary.
pub fn truncate_chars(s: &str, max: usize) -> String {
	match s.char_indices().nth(max) {
		Some((byte, _)) => s[..byte].to_string(),
		None => s.to_string(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn block_text_keeps_line_structure() {
		assert_eq!(normalize_block_text("  a   b \n\n\t\n c\u{a0}d  "), "a b\nc d");
	}

	#[test]
	fn fingerprint_ignores_layout_whitespace() {
		let a = format!("{}tail one", "x ".repeat(150));
		let b = format!("{}\n\ntail two", "x  ".repeat(150));
		assert_eq!(fingerprint(&a), fingerprint(&b));
		assert_ne!(fingerprint("short one"), fingerprint("short two"));
	}

	#[test]
	fn truncation_respects_char_boundaries() {
		assert_eq!(truncate_chars("héllo", 2), "hé");
		assert_eq!(truncate_chars("知乎问答", 3), "知乎问");
		assert_eq!(truncate_chars("abc", 10), "abc");
	}
}
