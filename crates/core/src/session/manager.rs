//! Process-lifetime owner of the hidden container and the session index.

use std::sync::Arc;

use ghost_protocol::{TabId, WindowId};
use tracing::{debug, info, warn};

use super::container::{HiddenContainerManager, Reconciliation};
use super::index::SessionIndex;
use crate::error::Result;
use crate::host::{BrowserHost, HostEvent};
use crate::store::RecordRepository;

/// Holds the engine's shared mutable state behind `ensure`/`lookup`/`update`.
///
/// Callers never cache the hidden window id; they ask [`SessionManager::ensure`]
/// each time so a window recreated mid-flight is always observed.
pub struct SessionManager {
	host: Arc<dyn BrowserHost>,
	container: HiddenContainerManager,
	index: SessionIndex,
}

impl SessionManager {
	pub fn new(host: Arc<dyn BrowserHost>, repository: RecordRepository) -> Self {
		Self {
			container: HiddenContainerManager::new(Arc::clone(&host), repository),
			index: SessionIndex::new(),
			host,
		}
	}

	/// Builds the session index and reconciles the hidden container.
	pub async fn init(&self) -> Result<Reconciliation> {
		let indexed = self.index.build(self.host.as_ref()).await?;
		let reconciliation = self.container.reconcile().await?;
		info!(target = "ghost.session", indexed, ?reconciliation, "session initialised");
		Ok(reconciliation)
	}

	/// Drops all in-memory state. Persisted state is left for the next run.
	pub fn teardown(&self) {
		self.index.clear();
		self.container.reset();
		debug!(target = "ghost.session", "session torn down");
	}

	pub async fn ensure(&self) -> Result<WindowId> {
		self.container.ensure().await
	}

	pub fn lookup(&self, url: &str) -> Option<TabId> {
		self.index.lookup(url)
	}

	pub fn update(&self, url: &str, tab: TabId) {
		self.index.update(url, tab);
	}

	pub fn remove(&self, tab: TabId) {
		self.index.remove(tab);
	}

	/// Drops a stale index entry found during lookup.
	pub fn forget(&self, url: &str, tab: TabId) {
		self.index.forget(url, tab);
	}

	pub fn container(&self) -> &HiddenContainerManager {
		&self.container
	}

	pub fn indexed_count(&self) -> usize {
		self.index.len()
	}

	/// Applies one host lifecycle event.
	pub async fn handle_event(&self, event: HostEvent) {
		match event {
			HostEvent::TabCreated(tab) | HostEvent::TabUpdated(tab) => self.index.update(&tab.url, tab.id),
			HostEvent::TabRemoved(tab) => {
				if let Some(url) = self.index.remove(tab) {
					debug!(target = "ghost.session", %tab, %url, "tab closed");
				}
			}
			HostEvent::WindowRemoved(window) => self.container.on_window_removed(window),
			HostEvent::WindowFocused(Some(window)) => self.container.on_window_focused(window).await,
			HostEvent::WindowFocused(None) => {}
		}
	}

	/// Re-resolves a tab id against the host, treating lookup failures as "gone".
	pub async fn resolve_tab(&self, tab: TabId) -> Option<crate::host::TabInfo> {
		match self.host.tab(tab).await {
			Ok(found) => found,
			Err(err) => {
				warn!(target = "ghost.session", %tab, error = %err, "tab lookup failed");
				None
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::host::fake::FakeHost;
	use crate::host::{TabInfo, WindowKind};
	use crate::store::MemoryStore;

	fn manager(host: &Arc<FakeHost>) -> SessionManager {
		let repository = RecordRepository::new(Arc::new(MemoryStore::new()));
		SessionManager::new(Arc::clone(host) as Arc<dyn BrowserHost>, repository)
	}

	#[tokio::test]
	async fn init_without_records_creates_nothing() {
		let host = Arc::new(FakeHost::new());
		let window = host.add_window(WindowKind::Normal);
		host.add_tab(window, "https://a.test/", "A");

		let session = manager(&host);
		assert_eq!(session.init().await.unwrap(), Reconciliation::Deferred);
		assert_eq!(host.window_ids(), vec![window]);
		assert!(host.calls().is_empty());
		assert_eq!(session.indexed_count(), 1);
	}

	#[tokio::test]
	async fn tab_events_keep_index_current() {
		let host = Arc::new(FakeHost::new());
		let session = manager(&host);
		let tab = TabInfo {
			id: TabId(9),
			window_id: WindowId(1),
			url: "https://a.test/".to_string(),
			title: String::new(),
			favicon_url: String::new(),
			active: true,
		};
		session.handle_event(HostEvent::TabCreated(tab.clone())).await;
		assert_eq!(session.lookup("https://a.test/"), Some(TabId(9)));

		let moved = TabInfo {
			url: "https://a.test/other".to_string(),
			..tab
		};
		session.handle_event(HostEvent::TabUpdated(moved)).await;
		assert_eq!(session.lookup("https://a.test/"), None);

		session.handle_event(HostEvent::TabRemoved(TabId(9))).await;
		assert_eq!(session.lookup("https://a.test/other"), None);
	}

	#[tokio::test]
	async fn teardown_clears_memory() {
		let host = Arc::new(FakeHost::new());
		let session = manager(&host);
		session.ensure().await.unwrap();
		session.update("https://a.test/", TabId(1));
		session.teardown();
		assert_eq!(session.lookup("https://a.test/"), None);
		assert_eq!(session.container().current(), None);
	}
}
