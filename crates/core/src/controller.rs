//! Vanish/summon orchestration.
//!
//! The controller owns no state of its own: the hidden window and the session
//! index live in [`SessionManager`], hidden records in [`RecordRepository`].
//! Every step re-reads them, so a summon racing a container recreation always
//! sees the fresh window.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use ghost_protocol::{Command, DeleteRequest, HiddenRecord, HiddenRecords, IndexRequest, RecoveryMode, Response, TabId, WindowId};
use tracing::{debug, error, info, warn};

use crate::backend::{Detached, SearchBackend, delete_detached, index_detached};
use crate::error::{GhostError, Result};
use crate::host::{BrowserHost, PageSnapshot, TabInfo};
use crate::readable::extract;
use crate::session::SessionManager;
use crate::store::RecordRepository;
use crate::url_policy::ensure_hideable;

/// Result of a successful vanish.
#[derive(Debug)]
pub struct Vanished {
	pub tab: TabId,
	pub title: String,
	pub container: WindowId,
	/// Pending index call. Dropping it does not cancel the request.
	pub indexing: Detached,
}

/// Result of a successful summon.
#[derive(Debug)]
pub struct Summoned {
	pub mode: RecoveryMode,
	pub handle: TabId,
	pub window: WindowId,
	/// Pending delete call. Dropping it does not cancel the request.
	pub deletion: Detached,
}

pub struct VanishSummonController {
	host: Arc<dyn BrowserHost>,
	session: Arc<SessionManager>,
	repository: RecordRepository,
	backend: Arc<dyn SearchBackend>,
}

impl VanishSummonController {
	pub fn new(host: Arc<dyn BrowserHost>, session: Arc<SessionManager>, repository: RecordRepository, backend: Arc<dyn SearchBackend>) -> Self {
		Self {
			host,
			session,
			repository,
			backend,
		}
	}

	pub fn session(&self) -> &Arc<SessionManager> {
		&self.session
	}

	/// Parks a tab in the hidden window. Without `tab` the active tab is used.
	///
	/// Privileged URLs are rejected before anything is touched.
	pub async fn vanish(&self, tab: Option<TabId>) -> Result<Vanished> {
		let tab = self.target_tab(tab).await?;
		ensure_hideable(&tab.url)?;

		let origin = tab.window_id;
		let snapshot = self.capture(&tab).await;
		let digest = extract(&snapshot);
		let title = if digest.title.is_empty() { tab.title.clone() } else { digest.title.clone() };
		let favicon_ref = if snapshot.favicon_ref.is_empty() {
			tab.favicon_url.clone()
		} else {
			snapshot.favicon_ref.clone()
		};

		let indexing = index_detached(
			Arc::clone(&self.backend),
			IndexRequest {
				url: tab.url.clone(),
				title: title.clone(),
				text: digest.text,
				handle: tab.id,
				favicon_ref: favicon_ref.clone(),
			},
		);

		let container = self.session.ensure().await?;
		self.host.move_tab(tab.id, container).await?;
		let purged = self.session.container().purge_placeholders(container).await;
		self.session.container().hide().await;

		if origin != container {
			self.restore_focus(origin).await;
		}
		self.apply_discard_policy(tab.id).await;

		self.repository.put_record(HiddenRecord {
			url: tab.url.clone(),
			title: title.clone(),
			favicon_ref,
			original_handle: Some(tab.id),
			hidden_at: now_millis(),
		})?;
		self.session.update(&tab.url, tab.id);

		info!(
			target = "ghost.vanish",
			tab = %tab.id,
			url = %tab.url,
			window = %container,
			strategy = %digest.strategy,
			purged,
			"tab hidden"
		);
		Ok(Vanished {
			tab: tab.id,
			title,
			container,
			indexing,
		})
	}

	/// Brings a hidden URL back into an ordinary window.
	///
	/// A live tab (from the session index or the remembered handle) is moved
	/// back; otherwise a fresh tab is opened. Either way the record is dropped.
	pub async fn summon(&self, url: &str, remembered: Option<TabId>) -> Result<Summoned> {
		let (window, opened) = self.session.container().ordinary_target_or_open().await?;

		let remembered = match remembered {
			Some(handle) => Some(handle),
			None => self.repository.record(url)?.and_then(|record| record.original_handle),
		};

		let mut outcome = None;
		if let Some(tab) = self.live_tab(url, remembered).await {
			match self.restore(tab, window).await {
				Ok(()) => {
					self.session.update(url, tab);
					outcome = Some((RecoveryMode::Perfect, tab));
				}
				Err(err) if err.is_recoverable() => {
					debug!(target = "ghost.summon", %tab, error = %err, "live tab vanished mid-restore");
					self.session.forget(url, tab);
				}
				Err(err) => return Err(err),
			}
		}

		let (mode, handle) = match outcome {
			Some(found) => found,
			None => {
				let created = self.host.create_tab(window, url).await?;
				if let Err(err) = self.host.focus_window(window).await {
					warn!(target = "ghost.summon", %window, error = %err, "failed to focus target window");
				}
				self.session.update(url, created.id);
				(RecoveryMode::Recovered, created.id)
			}
		};

		if opened {
			self.session.container().purge_placeholders(window).await;
		}

		if let Err(err) = self.repository.remove_record(url) {
			warn!(target = "ghost.summon", %url, error = %err, "failed to drop hidden record");
		}
		let deletion = delete_detached(Arc::clone(&self.backend), url.to_string());

		info!(target = "ghost.summon", %url, ?mode, tab = %handle, %window, "tab restored");
		Ok(Summoned {
			mode,
			handle,
			window,
			deletion,
		})
	}

	pub fn list_hidden(&self) -> Result<HiddenRecords> {
		self.repository.hidden_records()
	}

	/// Forgets a hidden URL. A tab still parked in the hidden window is closed.
	///
	/// The parked tab is closed before the record is dropped, so a failed close
	/// leaves the URL hidden and summonable.
	pub async fn remove_hidden(&self, url: &str) -> Result<bool> {
		let remembered = self.repository.record(url)?.and_then(|record| record.original_handle);
		if let Some(tab) = self.live_tab(url, remembered).await {
			let parked = self.host.tab(tab).await?.is_some_and(|info| self.session.container().is_container(info.window_id));
			if parked {
				match self.host.close_tab(tab).await {
					Ok(()) | Err(GhostError::HandleNotFound(_)) => {}
					Err(err) => return Err(err),
				}
				self.session.remove(tab);
				debug!(target = "ghost.vanish", %tab, %url, "closed parked tab");
			}
		}

		let removed = self.repository.remove_record(url)?;
		drop(delete_detached(Arc::clone(&self.backend), url.to_string()));

		info!(target = "ghost.vanish", %url, removed, "hidden record removed");
		Ok(removed)
	}

	/// Runs one command to a resolved response. Errors become `{success:false}`.
	pub async fn handle(&self, command: Command) -> Response {
		let name = command.name();
		match self.execute(command).await {
			Ok(response) => response,
			Err(err) => {
				match &err {
					GhostError::Host { .. } => error!(target = "ghost.session", command = name, error = %err, "host rejected command"),
					_ => warn!(target = "ghost.session", command = name, error = %err, "command failed"),
				}
				Response::failure(err.to_string())
			}
		}
	}

	async fn execute(&self, command: Command) -> Result<Response> {
		Ok(match command {
			Command::Vanish { tab } => {
				let vanished = self.vanish(tab).await?;
				Response::Vanished {
					success: true,
					title: vanished.title,
				}
			}
			Command::Summon { url, handle } => {
				let summoned = self.summon(&url, handle).await?;
				Response::Summoned {
					success: true,
					mode: summoned.mode,
					handle: summoned.handle,
				}
			}
			Command::ListHidden => Response::Hidden { records: self.list_hidden()? },
			Command::RemoveHidden { url } => {
				self.remove_hidden(&url).await?;
				Response::Removed { success: true }
			}
			Command::Index(request) => Response::Indexed(self.backend.index(request).await?),
			Command::Search(request) => Response::Searched(self.backend.search(request).await?),
			Command::Delete(DeleteRequest { url }) => Response::Deleted(self.backend.delete(&url).await?),
			Command::LlmSearch(request) => Response::LlmSearched(self.backend.llm_search(request).await?),
		})
	}

	async fn target_tab(&self, tab: Option<TabId>) -> Result<TabInfo> {
		match tab {
			Some(id) => self.host.tab(id).await?.ok_or(GhostError::HandleNotFound(id)),
			None => self.host.active_tab().await?.ok_or(GhostError::NoActiveTab),
		}
	}

	/// Page snapshot for extraction; a failed capture degrades to an empty page.
	async fn capture(&self, tab: &TabInfo) -> PageSnapshot {
		match self.host.capture_page(tab.id).await {
			Ok(snapshot) => snapshot,
			Err(err) => {
				warn!(target = "ghost.extract", tab = %tab.id, error = %err, "page capture failed");
				PageSnapshot {
					url: tab.url.clone(),
					title: tab.title.clone(),
					html: String::new(),
					favicon_ref: tab.favicon_url.clone(),
				}
			}
		}
	}

	/// Live tab for `url`, from the session index and the remembered handle.
	///
	/// Both must still show `url`. When both qualify, the one parked in the
	/// hidden window wins over a visible duplicate; otherwise the indexed tab does.
	async fn live_tab(&self, url: &str, remembered: Option<TabId>) -> Option<TabId> {
		let mut candidates: Vec<TabInfo> = Vec::with_capacity(2);
		if let Some(tab) = self.session.lookup(url) {
			match self.session.resolve_tab(tab).await {
				Some(info) if info.url == url => candidates.push(info),
				_ => self.session.forget(url, tab),
			}
		}

		if let Some(tab) = remembered.filter(|tab| candidates.iter().all(|info| info.id != *tab)) {
			if let Some(info) = self.session.resolve_tab(tab).await.filter(|info| info.url == url) {
				candidates.push(info);
			}
		}

		let container = self.session.container();
		candidates
			.iter()
			.find(|info| container.is_container(info.window_id))
			.or_else(|| candidates.first())
			.map(|info| info.id)
	}

	async fn restore(&self, tab: TabId, window: WindowId) -> Result<()> {
		self.host.move_tab(tab, window).await?;
		self.host.activate_tab(tab).await?;
		if let Err(err) = self.host.focus_window(window).await {
			warn!(target = "ghost.summon", %window, error = %err, "failed to focus target window");
		}
		if let Err(err) = self.host.set_auto_discardable(tab, true).await {
			warn!(target = "ghost.summon", %tab, error = %err, "failed to restore discard policy");
		}
		Ok(())
	}

	async fn restore_focus(&self, origin: WindowId) {
		match self.host.window(origin).await {
			Ok(Some(_)) => {
				if let Err(err) = self.host.focus_window(origin).await {
					warn!(target = "ghost.vanish", window = %origin, error = %err, "failed to refocus origin window");
				}
			}
			Ok(None) => debug!(target = "ghost.vanish", window = %origin, "origin window closed with its last tab"),
			Err(err) => warn!(target = "ghost.vanish", window = %origin, error = %err, "failed to inspect origin window"),
		}
	}

	async fn apply_discard_policy(&self, tab: TabId) {
		let settings = match self.repository.settings() {
			Ok(settings) => settings,
			Err(err) => {
				warn!(target = "ghost.vanish", error = %err, "failed to read settings; using defaults");
				Default::default()
			}
		};

		let applied = if settings.auto_discard {
			self.host.discard_tab(tab).await
		} else {
			self.host.set_auto_discardable(tab, false).await
		};
		if let Err(err) = applied {
			warn!(target = "ghost.vanish", %tab, auto_discard = settings.auto_discard, error = %err, "failed to apply discard policy");
		}
	}
}

fn now_millis() -> u64 {
	SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.map(|elapsed| elapsed.as_millis() as u64)
		.unwrap_or_default()
}
