//! Hidden container lifecycle.

use std::collections::HashSet;
use std::sync::Arc;

use ghost_protocol::WindowId;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::host::{BrowserHost, CreateWindow, WindowInfo};
use crate::store::RecordRepository;
use crate::url_policy::is_placeholder;

/// What the hidden window currently is, as far as this process knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContainerState {
	pub id: Option<WindowId>,
	/// Set only between observing an unwanted focus and re-hiding.
	pub visible: bool,
}

/// Outcome of startup reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
	/// The stored window id still resolved.
	Reused(WindowId),
	/// A window was claimed by counting tabs whose URL is a hidden record.
	Recovered { window: WindowId, matches: usize },
	/// Nothing to claim; creation waits for the first vanish.
	Deferred,
}

/// Picks the ordinary window holding strictly the most hidden URLs.
///
/// Windows with no match are never picked. On a tie the first window in
/// enumeration order wins.
pub fn pick_container(windows: &[WindowInfo], hidden_urls: &HashSet<String>) -> Option<(WindowId, usize)> {
	let mut best: Option<(WindowId, usize)> = None;
	for window in windows.iter().filter(|w| w.is_ordinary()) {
		let matches = window.tabs.iter().filter(|tab| hidden_urls.contains(&tab.url)).count();
		if matches == 0 {
			continue;
		}
		if best.is_none_or(|(_, best_matches)| matches > best_matches) {
			best = Some((window.id, matches));
		}
	}
	best
}

/// Owns the single hidden window: lazy creation, restart reconciliation, and invisibility.
pub struct HiddenContainerManager {
	host: Arc<dyn BrowserHost>,
	repository: RecordRepository,
	state: Mutex<ContainerState>,
	last_ordinary: Mutex<Option<WindowId>>,
	creation: tokio::sync::Mutex<()>,
}

impl HiddenContainerManager {
	pub fn new(host: Arc<dyn BrowserHost>, repository: RecordRepository) -> Self {
		Self {
			host,
			repository,
			state: Mutex::new(ContainerState::default()),
			last_ordinary: Mutex::new(None),
			creation: tokio::sync::Mutex::new(()),
		}
	}

	pub fn state(&self) -> ContainerState {
		*self.state.lock()
	}

	pub fn current(&self) -> Option<WindowId> {
		self.state.lock().id
	}

	pub fn is_container(&self, id: WindowId) -> bool {
		self.current() == Some(id)
	}

	/// Recovers the hidden window after a restart without creating one.
	pub async fn reconcile(&self) -> Result<Reconciliation> {
		if let Some(stored) = self.repository.container_handle()? {
			if self.host.window(stored).await?.is_some() {
				self.adopt(stored);
				self.hide().await;
				info!(target = "ghost.container", window = %stored, "reusing stored hidden container");
				return Ok(Reconciliation::Reused(stored));
			}
			debug!(target = "ghost.container", window = %stored, "stored hidden container no longer resolves");
		}

		let hidden_urls = self.repository.hidden_urls()?;
		if hidden_urls.is_empty() {
			return Ok(Reconciliation::Deferred);
		}

		let windows = self.host.windows().await?;
		let Some((window, matches)) = pick_container(&windows, &hidden_urls) else {
			debug!(target = "ghost.container", known = hidden_urls.len(), "no window holds hidden tabs; deferring creation");
			return Ok(Reconciliation::Deferred);
		};

		self.adopt(window);
		if let Err(err) = self.repository.set_container_handle(window) {
			warn!(target = "ghost.container", %window, error = %err, "failed to persist recovered container");
		}
		self.hide().await;
		let purged = self.purge_placeholders(window).await;
		info!(target = "ghost.container", %window, matches, purged, "recovered hidden container after restart");
		Ok(Reconciliation::Recovered { window, matches })
	}

	/// Returns a live hidden window, creating one if none exists.
	pub async fn ensure(&self) -> Result<WindowId> {
		let _creating = self.creation.lock().await;

		if let Some(id) = self.current() {
			if self.host.window(id).await?.is_some() {
				return Ok(id);
			}
			warn!(target = "ghost.container", window = %id, "hidden container vanished; recreating");
			self.forget(id);
		}

		let window = self.host.create_window(CreateWindow::hidden()).await?;
		self.adopt(window.id);
		if let Err(err) = self.repository.set_container_handle(window.id) {
			warn!(target = "ghost.container", window = %window.id, error = %err, "failed to persist hidden container");
		}
		self.hide().await;
		info!(target = "ghost.container", window = %window.id, "created hidden container");
		Ok(window.id)
	}

	/// Minimizes the hidden window. Idempotent; failures are only logged.
	pub async fn hide(&self) {
		let Some(id) = self.current() else {
			return;
		};
		match self.host.hide_window(id).await {
			Ok(()) => self.state.lock().visible = false,
			Err(err) => warn!(target = "ghost.container", window = %id, error = %err, "failed to hide container"),
		}
	}

	/// Closes blank tabs in `window` as long as it also holds real content.
	pub async fn purge_placeholders(&self, window: WindowId) -> usize {
		let info = match self.host.window(window).await {
			Ok(Some(info)) => info,
			Ok(None) => return 0,
			Err(err) => {
				warn!(target = "ghost.container", %window, error = %err, "failed to inspect window for placeholders");
				return 0;
			}
		};

		if info.tabs.iter().all(|tab| is_placeholder(&tab.url)) {
			return 0;
		}

		let mut purged = 0;
		for tab in info.tabs.iter().filter(|tab| is_placeholder(&tab.url)) {
			match self.host.close_tab(tab.id).await {
				Ok(()) => purged += 1,
				Err(err) => warn!(target = "ghost.container", tab = %tab.id, error = %err, "failed to close placeholder tab"),
			}
		}
		purged
	}

	/// Best ordinary window to show things in: last focused, else any, else a new one.
	pub async fn ordinary_target(&self) -> Result<WindowId> {
		Ok(self.ordinary_target_or_open().await?.0)
	}

	/// Like [`ordinary_target`](Self::ordinary_target), also reporting whether
	/// the window was opened by this call and may still hold its seed tab.
	pub async fn ordinary_target_or_open(&self) -> Result<(WindowId, bool)> {
		if let Some(id) = self.existing_ordinary().await? {
			return Ok((id, false));
		}

		let created = self.host.create_window(CreateWindow::focused()).await?;
		debug!(target = "ghost.container", window = %created.id, "opened new ordinary window");
		Ok((created.id, true))
	}

	async fn existing_ordinary(&self) -> Result<Option<WindowId>> {
		let remembered = *self.last_ordinary.lock();
		if let Some(id) = remembered {
			if self.is_usable_ordinary(id).await? {
				return Ok(Some(id));
			}
		}

		if let Some(id) = self.host.last_focused_window().await? {
			if self.is_usable_ordinary(id).await? {
				return Ok(Some(id));
			}
		}

		let hidden = self.current();
		let windows = self.host.windows().await?;
		Ok(windows.iter().find(|w| w.is_ordinary() && Some(w.id) != hidden).map(|w| w.id))
	}

	/// Reacts to a window closing. Losing the hidden window clears both memory and the stored pointer.
	pub fn on_window_removed(&self, id: WindowId) {
		{
			let mut last = self.last_ordinary.lock();
			if *last == Some(id) {
				*last = None;
			}
		}

		if !self.is_container(id) {
			return;
		}
		self.forget(id);
		info!(target = "ghost.container", window = %id, "hidden container closed externally");
	}

	/// Reacts to focus changes; the hidden window is pushed back out of sight.
	pub async fn on_window_focused(&self, id: WindowId) {
		if !self.is_container(id) {
			*self.last_ordinary.lock() = Some(id);
			return;
		}

		self.state.lock().visible = true;
		warn!(target = "ghost.container", window = %id, "hidden container gained focus; re-hiding");
		self.hide().await;

		match self.ordinary_target().await {
			Ok(target) => {
				if let Err(err) = self.host.focus_window(target).await {
					warn!(target = "ghost.container", window = %target, error = %err, "failed to hand focus back");
				}
			}
			Err(err) => warn!(target = "ghost.container", error = %err, "no ordinary window to hand focus to"),
		}
	}

	/// Drops in-memory state without touching the stored pointer.
	pub fn reset(&self) {
		*self.state.lock() = ContainerState::default();
		*self.last_ordinary.lock() = None;
	}

	fn adopt(&self, id: WindowId) {
		*self.state.lock() = ContainerState { id: Some(id), visible: false };
	}

	fn forget(&self, id: WindowId) {
		{
			let mut state = self.state.lock();
			if state.id == Some(id) {
				*state = ContainerState::default();
			}
		}
		if let Err(err) = self.repository.clear_container_handle() {
			warn!(target = "ghost.container", window = %id, error = %err, "failed to evict stored container pointer");
		}
	}

	async fn is_usable_ordinary(&self, id: WindowId) -> Result<bool> {
		if self.is_container(id) {
			return Ok(false);
		}
		Ok(self.host.window(id).await?.is_some_and(|w| w.is_ordinary()))
	}
}

#[cfg(test)]
mod tests {
	use ghost_protocol::TabId;

	use super::*;
	use crate::host::{TabInfo, WindowKind};

	fn window(id: i64, kind: WindowKind, urls: &[&str]) -> WindowInfo {
		WindowInfo {
			id: WindowId(id),
			kind,
			focused: false,
			minimized: false,
			tabs: urls
				.iter()
				.enumerate()
				.map(|(i, url)| TabInfo {
					id: TabId(id * 100 + i as i64),
					window_id: WindowId(id),
					url: url.to_string(),
					title: String::new(),
					favicon_url: String::new(),
					active: false,
				})
				.collect(),
		}
	}

	fn known(urls: &[&str]) -> HashSet<String> {
		urls.iter().map(|u| u.to_string()).collect()
	}

	#[test]
	fn picks_window_with_most_matches() {
		let hidden = known(&["a", "b", "c"]);
		let windows = vec![
			window(1, WindowKind::Normal, &["x"]),
			window(2, WindowKind::Normal, &["a", "b", "y"]),
			window(3, WindowKind::Normal, &["a", "b", "c"]),
		];
		assert_eq!(pick_container(&windows, &hidden), Some((WindowId(3), 3)));
	}

	#[test]
	fn claims_nothing_without_matches() {
		let hidden = known(&["a", "b", "c"]);
		let windows = vec![window(1, WindowKind::Normal, &["x"]), window(2, WindowKind::Normal, &["y", "z"])];
		assert_eq!(pick_container(&windows, &hidden), None);
	}

	#[test]
	fn tie_goes_to_first_window() {
		let hidden = known(&["a", "b"]);
		let windows = vec![window(5, WindowKind::Normal, &["a"]), window(6, WindowKind::Normal, &["b"])];
		assert_eq!(pick_container(&windows, &hidden), Some((WindowId(5), 1)));
	}

	#[test]
	fn ignores_non_ordinary_windows() {
		let hidden = known(&["a", "b"]);
		let windows = vec![window(1, WindowKind::Popup, &["a", "b"]), window(2, WindowKind::Normal, &["a"])];
		assert_eq!(pick_container(&windows, &hidden), Some((WindowId(2), 1)));
	}
}
