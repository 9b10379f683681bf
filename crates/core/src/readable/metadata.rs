//! Title and description lookup.

use scraper::{Html, Selector};

use crate::readable::text::normalize_inline;

fn first_text(doc: &Html, css: &str) -> Option<String> {
	let selector = Selector::parse(css).ok()?;
	doc.select(&selector)
		.map(|el| normalize_inline(&el.text().collect::<String>()))
		.find(|text| !text.is_empty())
}

fn first_content(doc: &Html, css: &str) -> Option<String> {
	let selector = Selector::parse(css).ok()?;
	doc.select(&selector)
		.filter_map(|el| el.value().attr("content"))
		.map(normalize_inline)
		.find(|text| !text.is_empty())
}

/// Document title: `<title>`, then `og:title`, then the first `<h1>`.
pub(crate) fn extract_title(doc: &Html) -> Option<String> {
	first_text(doc, "title")
		.or_else(|| first_content(doc, r#"meta[property="og:title"]"#))
		.or_else(|| first_text(doc, "h1"))
}

/// Meta description, then `og:description`.
pub(crate) fn extract_description(doc: &Html) -> Option<String> {
	first_content(doc, r#"meta[name="description"]"#).or_else(|| first_content(doc, r#"meta[property="og:description"]"#))
}
