use ghost::host::PageSnapshot;
use ghost::readable::{MAX_TEXT_CHARS, SiteExtractor, Strategy, extract, select_extractor};
use scraper::Html;

fn page(url: &str, html: String) -> PageSnapshot {
	PageSnapshot {
		url: url.to_string(),
		title: String::new(),
		html,
		favicon_ref: String::new(),
	}
}

#[test]
fn wikipedia_pages_use_the_site_extractor() {
	let paragraphs = (0..5)
		.map(|i| format!("<p>Paragraph {i} explains one more aspect of the topic in some detail.</p>"))
		.collect::<String>();
	let html = format!(
		"<html><body><div id='mw-navigation'><nav>Main page Contents</nav></div><h1 id='firstHeading'>Rust</h1><div id='mw-content-text'><div class='mw-parser-output'>{paragraphs}</div></div></body></html>"
	);
	let result = extract(&page("https://en.wikipedia.org/wiki/Rust", html));

	assert_eq!(result.strategy, Strategy::Site("wikipedia"));
	assert!(result.text.starts_with("Title: Rust\n\nContent: Paragraph 0"));
	assert!(!result.text.contains("Main page"));
	assert_eq!(result.title, "Rust");
}

#[test]
fn short_site_output_never_beats_generic_scoring() {
	let body = "Discussion text that lives outside the usual comment markup. ".repeat(5);
	let html = format!("<html><body><div class='toptext'>brief</div><div class='story-body'><p>{body}</p><p>{body}</p></div></body></html>");
	let result = extract(&page("https://news.ycombinator.com/item?id=9", html));

	assert_eq!(result.strategy, Strategy::Generic);
	assert!(!result.text.contains("brief"));
}

#[test]
fn site_labels_do_not_count_toward_the_minimum() {
	let html = format!(
		"<html><body><span class='titleline'>{}</span><span class='commtext'>{}</span></body></html>",
		"s".repeat(100),
		"c".repeat(95)
	);
	let result = extract(&page("https://news.ycombinator.com/item?id=10", html));

	assert_ne!(result.strategy, Strategy::Site("hackernews"));
	assert!(!result.text.contains("Story:"));
}

#[test]
fn repeated_fragments_collapse_by_fingerprint() {
	let answer = "Use an iterator adaptor here instead of a manual loop. ".repeat(6);
	let html = format!(
		"<html><body><div id='question-header'><h1>How do I sum?</h1></div>\
		<div class='answer'><div class='s-prose'>{answer}</div></div>\
		<div class='answer'><div class='s-prose'>{answer}</div></div></body></html>"
	);
	let doc = Html::parse_document(&html);
	let fragments = SiteExtractor::StackExchange.fragments(&doc).unwrap();
	assert_eq!(fragments.iter().filter(|f| f.label == "Answer").count(), 1);

	let result = extract(&page("https://stackoverflow.com/questions/1", html));
	assert_eq!(result.text.matches("Answer:").count(), 1);
}

#[test]
fn digest_never_exceeds_the_bound() {
	let html = format!("<html><body><div><p>{}</p></div></body></html>", "知识 ".repeat(40_000));
	let result = extract(&page("https://example.com/", html));
	assert!(result.text.chars().count() <= MAX_TEXT_CHARS);
	assert_eq!(result.text.chars().count(), MAX_TEXT_CHARS);
}

#[test]
fn registry_order_is_respected() {
	assert_eq!(select_extractor("gist.github.com"), Some(SiteExtractor::GitHub));
	assert_eq!(select_extractor("www.zhihu.com"), Some(SiteExtractor::Zhihu));
	assert_eq!(select_extractor("superuser.com"), Some(SiteExtractor::StackExchange));
	assert_eq!(select_extractor("github.io"), None);
}
