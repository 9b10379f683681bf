//! Deterministic in-memory browser host.
//!
//! Models windows and tabs closely enough to exercise the engine without a
//! browser: ids are allocated from one counter, windows enumerate in creation
//! order, and closing the last tab of a window closes the window. Every
//! mutating call is recorded so tests can assert on side effects.
//!
//! # Example
//!
//! ```ignore
//! let host = FakeHost::new();
//! let window = host.add_window(WindowKind::Normal);
//! let tab = host.add_page(window, "https://example.com/", "Example", "<p>hi</p>");
//! host.fail("move_tab");
//! ```

use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use ghost_protocol::{TabId, WindowId};
use parking_lot::Mutex;

use super::{BrowserHost, CreateWindow, PageSnapshot, TabInfo, WindowInfo, WindowKind};
use crate::error::{GhostError, Result};

#[derive(Debug, Clone)]
struct FakeTab {
	window: WindowId,
	url: String,
	title: String,
	favicon: String,
	html: String,
	active: bool,
	auto_discardable: bool,
	discarded: bool,
}

#[derive(Debug, Clone)]
struct FakeWindow {
	kind: WindowKind,
	minimized: bool,
	tabs: Vec<TabId>,
}

#[derive(Debug, Default)]
struct FakeState {
	next_id: i64,
	windows: BTreeMap<WindowId, FakeWindow>,
	tabs: BTreeMap<TabId, FakeTab>,
	focused: Option<WindowId>,
	focus_history: Vec<WindowId>,
	calls: Vec<String>,
	failing: HashSet<String>,
}

impl FakeState {
	fn allocate(&mut self) -> i64 {
		self.next_id += 1;
		self.next_id
	}

	fn check(&self, operation: &'static str) -> Result<()> {
		if self.failing.contains(operation) {
			return Err(GhostError::host(operation, "injected failure"));
		}
		Ok(())
	}

	fn tab_info(&self, id: TabId) -> Option<TabInfo> {
		self.tabs.get(&id).map(|tab| TabInfo {
			id,
			window_id: tab.window,
			url: tab.url.clone(),
			title: tab.title.clone(),
			favicon_url: tab.favicon.clone(),
			active: tab.active,
		})
	}

	fn window_info(&self, id: WindowId) -> Option<WindowInfo> {
		self.windows.get(&id).map(|window| WindowInfo {
			id,
			kind: window.kind,
			focused: self.focused == Some(id),
			minimized: window.minimized,
			tabs: window.tabs.iter().filter_map(|tab| self.tab_info(*tab)).collect(),
		})
	}

	fn insert_window(&mut self, kind: WindowKind, minimized: bool) -> WindowId {
		let id = WindowId(self.allocate());
		self.windows.insert(
			id,
			FakeWindow {
				kind,
				minimized,
				tabs: Vec::new(),
			},
		);
		id
	}

	fn insert_tab(&mut self, window: WindowId, url: &str, title: &str, html: &str) -> Result<TabId> {
		if !self.windows.contains_key(&window) {
			return Err(GhostError::ContainerUnavailable(window));
		}
		let id = TabId(self.allocate());
		self.deactivate_window_tabs(window);
		self.tabs.insert(
			id,
			FakeTab {
				window,
				url: url.to_string(),
				title: title.to_string(),
				favicon: String::new(),
				html: html.to_string(),
				active: true,
				auto_discardable: true,
				discarded: false,
			},
		);
		if let Some(w) = self.windows.get_mut(&window) {
			w.tabs.push(id);
		}
		Ok(id)
	}

	fn deactivate_window_tabs(&mut self, window: WindowId) {
		for tab in self.tabs.values_mut().filter(|tab| tab.window == window) {
			tab.active = false;
		}
	}

	/// Detaches a tab from its window, closing the window when it empties.
	fn detach_tab(&mut self, id: TabId) {
		let Some(window_id) = self.tabs.get(&id).map(|tab| tab.window) else {
			return;
		};
		let mut emptied = false;
		if let Some(window) = self.windows.get_mut(&window_id) {
			window.tabs.retain(|tab| *tab != id);
			emptied = window.tabs.is_empty();
		}
		if emptied {
			self.drop_window(window_id);
			return;
		}
		let was_active = self.tabs.get(&id).is_some_and(|tab| tab.active);
		if was_active {
			let next = self.windows.get(&window_id).and_then(|window| window.tabs.last().copied());
			if let Some(next) = next.and_then(|next| self.tabs.get_mut(&next)) {
				next.active = true;
			}
		}
	}

	fn drop_window(&mut self, id: WindowId) {
		if let Some(window) = self.windows.remove(&id) {
			for tab in window.tabs {
				self.tabs.remove(&tab);
			}
		}
		if self.focused == Some(id) {
			self.focused = None;
		}
		self.focus_history.retain(|w| *w != id);
	}
}

/// In-memory [`BrowserHost`] used by tests and local experiments.
#[derive(Debug, Default)]
pub struct FakeHost {
	state: Mutex<FakeState>,
}

impl FakeHost {
	pub fn new() -> Self {
		Self::default()
	}

	/// Opens a window without recording a call.
	pub fn add_window(&self, kind: WindowKind) -> WindowId {
		self.state.lock().insert_window(kind, false)
	}

	pub fn add_tab(&self, window: WindowId, url: &str, title: &str) -> TabId {
		self.add_page(window, url, title, "")
	}

	/// Opens a tab whose captured page will be `html`.
	///
	/// Panics if `window` does not exist.
	pub fn add_page(&self, window: WindowId, url: &str, title: &str, html: &str) -> TabId {
		match self.state.lock().insert_tab(window, url, title, html) {
			Ok(id) => id,
			Err(err) => panic!("add_page on missing window: {err}"),
		}
	}

	/// Simulates the user focusing a window.
	pub fn focus(&self, window: WindowId) {
		let mut state = self.state.lock();
		state.focused = Some(window);
		state.focus_history.push(window);
		if let Some(w) = state.windows.get_mut(&window) {
			w.minimized = false;
		}
	}

	/// Simulates the user closing a window.
	pub fn remove_window(&self, window: WindowId) {
		self.state.lock().drop_window(window);
	}

	/// Simulates the user closing a tab.
	pub fn remove_tab(&self, tab: TabId) {
		let mut state = self.state.lock();
		state.detach_tab(tab);
		state.tabs.remove(&tab);
	}

	/// Simulates in-page navigation.
	pub fn navigate(&self, tab: TabId, url: &str) {
		if let Some(tab) = self.state.lock().tabs.get_mut(&tab) {
			tab.url = url.to_string();
		}
	}

	/// Simulates a browser restart: every window and tab is renumbered,
	/// structure and order are preserved. Returns the old-to-new window map.
	pub fn restart(&self) -> HashMap<WindowId, WindowId> {
		let mut state = self.state.lock();
		let old_windows = std::mem::take(&mut state.windows);
		let mut old_tabs = std::mem::take(&mut state.tabs);
		let mut mapping = HashMap::new();
		for (old_id, window) in old_windows {
			let new_id = WindowId(state.allocate());
			mapping.insert(old_id, new_id);
			let mut new_window = FakeWindow {
				kind: window.kind,
				minimized: window.minimized,
				tabs: Vec::new(),
			};
			for tab in window.tabs {
				if let Some(mut data) = old_tabs.remove(&tab) {
					let tab_id = TabId(state.allocate());
					data.window = new_id;
					state.tabs.insert(tab_id, data);
					new_window.tabs.push(tab_id);
				}
			}
			state.windows.insert(new_id, new_window);
		}
		state.focused = None;
		state.focus_history.clear();
		state.calls.clear();
		mapping
	}

	/// Makes every later call to `operation` fail.
	pub fn fail(&self, operation: &str) {
		self.state.lock().failing.insert(operation.to_string());
	}

	pub fn recover(&self, operation: &str) {
		self.state.lock().failing.remove(operation);
	}

	/// Mutating calls made through [`BrowserHost`] so far.
	pub fn calls(&self) -> Vec<String> {
		self.state.lock().calls.clone()
	}

	pub fn clear_calls(&self) {
		self.state.lock().calls.clear();
	}

	pub fn window_of(&self, tab: TabId) -> Option<WindowId> {
		self.state.lock().tabs.get(&tab).map(|tab| tab.window)
	}

	pub fn window_tabs(&self, window: WindowId) -> Vec<TabId> {
		self.state.lock().windows.get(&window).map(|w| w.tabs.clone()).unwrap_or_default()
	}

	pub fn window_ids(&self) -> Vec<WindowId> {
		self.state.lock().windows.keys().copied().collect()
	}

	pub fn is_minimized(&self, window: WindowId) -> bool {
		self.state.lock().windows.get(&window).is_some_and(|w| w.minimized)
	}

	pub fn focused_window(&self) -> Option<WindowId> {
		self.state.lock().focused
	}

	pub fn is_discarded(&self, tab: TabId) -> bool {
		self.state.lock().tabs.get(&tab).is_some_and(|t| t.discarded)
	}

	pub fn is_auto_discardable(&self, tab: TabId) -> bool {
		self.state.lock().tabs.get(&tab).is_some_and(|t| t.auto_discardable)
	}

	pub fn is_active(&self, tab: TabId) -> bool {
		self.state.lock().tabs.get(&tab).is_some_and(|t| t.active)
	}

	fn record(&self, state: &mut FakeState, call: String) {
		state.calls.push(call);
	}
}

#[async_trait]
impl BrowserHost for FakeHost {
	async fn windows(&self) -> Result<Vec<WindowInfo>> {
		let state = self.state.lock();
		state.check("windows")?;
		Ok(state.windows.keys().filter_map(|id| state.window_info(*id)).collect())
	}

	async fn window(&self, id: WindowId) -> Result<Option<WindowInfo>> {
		let state = self.state.lock();
		state.check("window")?;
		Ok(state.window_info(id))
	}

	async fn create_window(&self, options: CreateWindow) -> Result<WindowInfo> {
		let mut state = self.state.lock();
		state.check("create_window")?;
		let id = state.insert_window(WindowKind::Normal, options.hidden);
		let url = options.url.as_deref().unwrap_or("about:blank");
		state.insert_tab(id, url, "", "")?;
		if options.focused && !options.hidden {
			state.focused = Some(id);
			state.focus_history.push(id);
		}
		let call = format!("create_window:{}", if options.hidden { "hidden" } else { "normal" });
		self.record(&mut state, call);
		state.window_info(id).ok_or(GhostError::ContainerUnavailable(id))
	}

	async fn hide_window(&self, id: WindowId) -> Result<()> {
		let mut state = self.state.lock();
		state.check("hide_window")?;
		let Some(window) = state.windows.get_mut(&id) else {
			return Err(GhostError::ContainerUnavailable(id));
		};
		window.minimized = true;
		if state.focused == Some(id) {
			state.focused = None;
		}
		self.record(&mut state, format!("hide_window:{}", id.0));
		Ok(())
	}

	async fn focus_window(&self, id: WindowId) -> Result<()> {
		let mut state = self.state.lock();
		state.check("focus_window")?;
		let Some(window) = state.windows.get_mut(&id) else {
			return Err(GhostError::ContainerUnavailable(id));
		};
		window.minimized = false;
		state.focused = Some(id);
		state.focus_history.push(id);
		self.record(&mut state, format!("focus_window:{}", id.0));
		Ok(())
	}

	async fn last_focused_window(&self) -> Result<Option<WindowId>> {
		let state = self.state.lock();
		state.check("last_focused_window")?;
		Ok(state.focus_history.iter().rev().copied().find(|id| state.windows.contains_key(id)))
	}

	async fn tabs(&self) -> Result<Vec<TabInfo>> {
		let state = self.state.lock();
		state.check("tabs")?;
		Ok(state
			.windows
			.values()
			.flat_map(|window| window.tabs.iter())
			.filter_map(|id| state.tab_info(*id))
			.collect())
	}

	async fn tab(&self, id: TabId) -> Result<Option<TabInfo>> {
		let state = self.state.lock();
		state.check("tab")?;
		Ok(state.tab_info(id))
	}

	async fn active_tab(&self) -> Result<Option<TabInfo>> {
		let state = self.state.lock();
		state.check("active_tab")?;
		let window = state
			.focused
			.or_else(|| state.focus_history.iter().rev().copied().find(|id| state.windows.contains_key(id)));
		let Some(window) = window else {
			return Ok(None);
		};
		Ok(state
			.windows
			.get(&window)
			.and_then(|w| w.tabs.iter().copied().find(|tab| state.tabs.get(tab).is_some_and(|t| t.active)))
			.and_then(|tab| state.tab_info(tab)))
	}

	async fn create_tab(&self, window: WindowId, url: &str) -> Result<TabInfo> {
		let mut state = self.state.lock();
		state.check("create_tab")?;
		let id = state.insert_tab(window, url, "", "")?;
		self.record(&mut state, format!("create_tab:{}:{}", window.0, url));
		state.tab_info(id).ok_or(GhostError::HandleNotFound(id))
	}

	async fn move_tab(&self, tab: TabId, window: WindowId) -> Result<()> {
		let mut state = self.state.lock();
		state.check("move_tab")?;
		if !state.tabs.contains_key(&tab) {
			return Err(GhostError::HandleNotFound(tab));
		}
		if !state.windows.contains_key(&window) {
			return Err(GhostError::ContainerUnavailable(window));
		}
		if state.tabs.get(&tab).is_some_and(|t| t.window == window) {
			return Ok(());
		}
		state.detach_tab(tab);
		if let Some(t) = state.tabs.get_mut(&tab) {
			t.window = window;
			t.active = false;
		}
		if let Some(w) = state.windows.get_mut(&window) {
			w.tabs.push(tab);
		}
		self.record(&mut state, format!("move_tab:{}->{}", tab.0, window.0));
		Ok(())
	}

	async fn activate_tab(&self, tab: TabId) -> Result<()> {
		let mut state = self.state.lock();
		state.check("activate_tab")?;
		let Some(window) = state.tabs.get(&tab).map(|t| t.window) else {
			return Err(GhostError::HandleNotFound(tab));
		};
		state.deactivate_window_tabs(window);
		if let Some(t) = state.tabs.get_mut(&tab) {
			t.active = true;
		}
		self.record(&mut state, format!("activate_tab:{}", tab.0));
		Ok(())
	}

	async fn close_tab(&self, tab: TabId) -> Result<()> {
		let mut state = self.state.lock();
		state.check("close_tab")?;
		if !state.tabs.contains_key(&tab) {
			return Err(GhostError::HandleNotFound(tab));
		}
		state.detach_tab(tab);
		state.tabs.remove(&tab);
		self.record(&mut state, format!("close_tab:{}", tab.0));
		Ok(())
	}

	async fn set_auto_discardable(&self, tab: TabId, discardable: bool) -> Result<()> {
		let mut state = self.state.lock();
		state.check("set_auto_discardable")?;
		let Some(t) = state.tabs.get_mut(&tab) else {
			return Err(GhostError::HandleNotFound(tab));
		};
		t.auto_discardable = discardable;
		if discardable {
			t.discarded = false;
		}
		self.record(&mut state, format!("set_auto_discardable:{}:{}", tab.0, discardable));
		Ok(())
	}

	async fn discard_tab(&self, tab: TabId) -> Result<()> {
		let mut state = self.state.lock();
		state.check("discard_tab")?;
		let Some(t) = state.tabs.get_mut(&tab) else {
			return Err(GhostError::HandleNotFound(tab));
		};
		t.discarded = true;
		self.record(&mut state, format!("discard_tab:{}", tab.0));
		Ok(())
	}

	async fn capture_page(&self, tab: TabId) -> Result<PageSnapshot> {
		let state = self.state.lock();
		state.check("capture_page")?;
		let Some(t) = state.tabs.get(&tab) else {
			return Err(GhostError::HandleNotFound(tab));
		};
		Ok(PageSnapshot {
			url: t.url.clone(),
			title: t.title.clone(),
			html: t.html.clone(),
			favicon_ref: t.favicon.clone(),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn closing_last_tab_closes_window() {
		let host = FakeHost::new();
		let window = host.add_window(WindowKind::Normal);
		let tab = host.add_tab(window, "https://a.test/", "A");
		host.close_tab(tab).await.unwrap();
		assert!(host.window(window).await.unwrap().is_none());
	}

	#[tokio::test]
	async fn move_tab_reparents_and_records_call() {
		let host = FakeHost::new();
		let from = host.add_window(WindowKind::Normal);
		let to = host.add_window(WindowKind::Normal);
		let keep = host.add_tab(from, "https://keep.test/", "Keep");
		let tab = host.add_tab(from, "https://a.test/", "A");
		host.move_tab(tab, to).await.unwrap();
		assert_eq!(host.window_of(tab), Some(to));
		assert!(host.is_active(keep));
		assert_eq!(host.calls(), vec![format!("move_tab:{}->{}", tab.0, to.0)]);
	}

	#[tokio::test]
	async fn restart_renumbers_but_keeps_layout() {
		let host = FakeHost::new();
		let window = host.add_window(WindowKind::Normal);
		host.add_tab(window, "https://a.test/", "A");
		let mapping = host.restart();
		let new_window = mapping[&window];
		assert_ne!(new_window, window);
		let tabs = host.tabs().await.unwrap();
		assert_eq!(tabs.len(), 1);
		assert_eq!(tabs[0].window_id, new_window);
		assert_eq!(tabs[0].url, "https://a.test/");
	}

	#[tokio::test]
	async fn injected_failures_surface_as_host_errors() {
		let host = FakeHost::new();
		let window = host.add_window(WindowKind::Normal);
		host.fail("hide_window");
		let err = host.hide_window(window).await.unwrap_err();
		assert!(matches!(err, GhostError::Host { operation: "hide_window", .. }));
		host.recover("hide_window");
		host.hide_window(window).await.unwrap();
		assert!(host.is_minimized(window));
	}
}
