//! URL classification: which tabs may be hidden and which are placeholders.

use url::Url;

use crate::error::{GhostError, Result};

/// Schemes owned by the browser itself. Tabs on these can't be scripted or restored by URL.
const PRIVILEGED_SCHEMES: &[&str] = &[
	"about",
	"brave",
	"chrome",
	"chrome-extension",
	"chrome-search",
	"chrome-untrusted",
	"devtools",
	"edge",
	"moz-extension",
	"opera",
	"view-source",
	"vivaldi",
];

/// URLs a restoring browser drops into otherwise empty windows.
const PLACEHOLDER_URLS: &[&str] = &["about:blank", "about:newtab", "chrome://newtab/", "chrome://new-tab-page/", "edge://newtab/"];

/// Rejects URLs that must never be hidden.
pub fn ensure_hideable(url: &str) -> Result<()> {
	let parsed = Url::parse(url).map_err(|err| GhostError::InvalidResource {
		url: url.to_string(),
		reason: format!("unparseable URL ({err})"),
	})?;

	let scheme = parsed.scheme();
	if PRIVILEGED_SCHEMES.contains(&scheme) {
		return Err(GhostError::InvalidResource {
			url: url.to_string(),
			reason: format!("internal {scheme}: pages cannot be hidden"),
		});
	}
	Ok(())
}

pub fn is_placeholder(url: &str) -> bool {
	let url = url.trim();
	url.is_empty() || PLACEHOLDER_URLS.iter().any(|p| url.eq_ignore_ascii_case(p))
}

/// Lowercased host name without a leading `www.`.
pub fn host_of(url: &str) -> Option<String> {
	let parsed = Url::parse(url).ok()?;
	let host = parsed.host_str()?.to_ascii_lowercase();
	Some(host.trim_start_matches("www.").to_string())
}
