//! Browser host abstraction.
//!
//! The engine never talks to a browser directly. Everything it needs from the
//! tab/window API goes through [`BrowserHost`], and everything the browser
//! reports back arrives as a [`HostEvent`].

pub mod fake;

use async_trait::async_trait;
use ghost_protocol::{TabId, WindowId};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Window flavour as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WindowKind {
	#[default]
	Normal,
	Popup,
	App,
	Devtools,
}

/// Snapshot of one tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabInfo {
	pub id: TabId,
	pub window_id: WindowId,
	pub url: String,
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub favicon_url: String,
	#[serde(default)]
	pub active: bool,
}

/// Snapshot of one window and its tabs in strip order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowInfo {
	pub id: WindowId,
	pub kind: WindowKind,
	#[serde(default)]
	pub focused: bool,
	#[serde(default)]
	pub minimized: bool,
	#[serde(default)]
	pub tabs: Vec<TabInfo>,
}

impl WindowInfo {
	pub fn is_ordinary(&self) -> bool {
		self.kind == WindowKind::Normal
	}
}

/// Parameters for [`BrowserHost::create_window`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CreateWindow {
	pub url: Option<String>,
	/// Create minimized and unfocused.
	pub hidden: bool,
	pub focused: bool,
}

impl CreateWindow {
	pub fn hidden() -> Self {
		Self {
			url: None,
			hidden: true,
			focused: false,
		}
	}

	pub fn focused() -> Self {
		Self {
			url: None,
			hidden: false,
			focused: true,
		}
	}

	pub fn with_url(mut self, url: impl Into<String>) -> Self {
		self.url = Some(url.into());
		self
	}
}

/// Serialized page state captured from inside the tab.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageSnapshot {
	pub url: String,
	pub title: String,
	pub html: String,
	pub favicon_ref: String,
}

/// Lifecycle notifications delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
	TabCreated(TabInfo),
	/// A tab changed in a way that may affect its URL.
	TabUpdated(TabInfo),
	TabRemoved(TabId),
	WindowRemoved(WindowId),
	/// Focus moved to a window, or left the browser entirely.
	WindowFocused(Option<WindowId>),
}

/// Asynchronous tab/window API of the hosting browser.
///
/// Implementations return [`GhostError::HandleNotFound`] for tabs and
/// [`GhostError::ContainerUnavailable`] for windows that no longer exist.
///
/// [`GhostError::HandleNotFound`]: crate::error::GhostError::HandleNotFound
/// [`GhostError::ContainerUnavailable`]: crate::error::GhostError::ContainerUnavailable
#[async_trait]
pub trait BrowserHost: Send + Sync {
	async fn windows(&self) -> Result<Vec<WindowInfo>>;

	/// Resolves a window id, `None` when it no longer exists.
	async fn window(&self, id: WindowId) -> Result<Option<WindowInfo>>;

	async fn create_window(&self, options: CreateWindow) -> Result<WindowInfo>;

	/// Minimizes and unfocuses a window.
	async fn hide_window(&self, id: WindowId) -> Result<()>;

	async fn focus_window(&self, id: WindowId) -> Result<()>;

	/// Most recently focused window of any kind.
	async fn last_focused_window(&self) -> Result<Option<WindowId>>;

	async fn tabs(&self) -> Result<Vec<TabInfo>>;

	/// Resolves a tab id, `None` when it no longer exists.
	async fn tab(&self, id: TabId) -> Result<Option<TabInfo>>;

	/// Active tab of the last focused window.
	async fn active_tab(&self) -> Result<Option<TabInfo>>;

	async fn create_tab(&self, window: WindowId, url: &str) -> Result<TabInfo>;

	async fn move_tab(&self, tab: TabId, window: WindowId) -> Result<()>;

	async fn activate_tab(&self, tab: TabId) -> Result<()>;

	async fn close_tab(&self, tab: TabId) -> Result<()>;

	async fn set_auto_discardable(&self, tab: TabId, discardable: bool) -> Result<()>;

	async fn discard_tab(&self, tab: TabId) -> Result<()>;

	async fn capture_page(&self, tab: TabId) -> Result<PageSnapshot>;
}
