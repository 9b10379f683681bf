//! Volatile URL → live tab map.

use std::collections::HashMap;

use ghost_protocol::TabId;
use parking_lot::RwLock;
use tracing::debug;

use crate::error::Result;
use crate::host::BrowserHost;

/// Process-lifetime cache of which live tab currently shows each URL.
///
/// Keys are compared verbatim; no normalization is applied. When several tabs
/// show the same URL the most recently observed one wins.
#[derive(Debug, Default)]
pub struct SessionIndex {
	entries: RwLock<HashMap<String, TabId>>,
}

impl SessionIndex {
	pub fn new() -> Self {
		Self::default()
	}

	/// Replaces the contents with one full scan of the host's tabs.
	pub async fn build(&self, host: &dyn BrowserHost) -> Result<usize> {
		let tabs = host.tabs().await?;
		let mut entries = HashMap::with_capacity(tabs.len());
		for tab in tabs {
			if !tab.url.is_empty() {
				entries.insert(tab.url, tab.id);
			}
		}
		let count = entries.len();
		*self.entries.write() = entries;
		debug!(target = "ghost.session", entries = count, "session index built");
		Ok(count)
	}

	/// Records that `tab` now shows `url`, dropping any entry the tab held before.
	pub fn update(&self, url: &str, tab: TabId) {
		let mut entries = self.entries.write();
		entries.retain(|existing_url, existing| *existing != tab || existing_url == url);
		if !url.is_empty() {
			entries.insert(url.to_string(), tab);
		}
	}

	/// Forgets a closed tab. Returns the URL it was indexed under.
	pub fn remove(&self, tab: TabId) -> Option<String> {
		let mut entries = self.entries.write();
		let url = entries.iter().find(|(_, id)| **id == tab).map(|(url, _)| url.clone())?;
		entries.remove(&url);
		Some(url)
	}

	/// Drops the entry for `url` if it still points at `tab`.
	pub fn forget(&self, url: &str, tab: TabId) {
		let mut entries = self.entries.write();
		if entries.get(url) == Some(&tab) {
			entries.remove(url);
		}
	}

	pub fn lookup(&self, url: &str) -> Option<TabId> {
		self.entries.read().get(url).copied()
	}

	pub fn len(&self) -> usize {
		self.entries.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.read().is_empty()
	}

	pub fn clear(&self) {
		self.entries.write().clear();
	}
}
