//! Durable key-value storage for engine state.
//!
//! [`KeyValueStore`] is the get/set/remove contract the engine relies on;
//! [`RecordRepository`] layers the typed keys on top of it. Two backings ship
//! here: [`JsonFileStore`] keeps the whole map in one JSON file and replaces it
//! atomically on every write, [`MemoryStore`] keeps it in process.

mod repository;

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{GhostError, Result};

pub use repository::RecordRepository;

/// Minimal durable map used for the container pointer, hidden records, and settings.
///
/// Each `set`/`remove` must be crash-consistent on its own: after a crash the
/// store holds either the old or the new value for the key, never a mix.
pub trait KeyValueStore: Send + Sync {
	fn get(&self, key: &str) -> Result<Option<Value>>;
	fn set(&self, key: &str, value: Value) -> Result<()>;
	fn remove(&self, key: &str) -> Result<()>;
}

/// In-process store; contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
	entries: Mutex<BTreeMap<String, Value>>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}
}

impl KeyValueStore for MemoryStore {
	fn get(&self, key: &str) -> Result<Option<Value>> {
		Ok(self.entries.lock().get(key).cloned())
	}

	fn set(&self, key: &str, value: Value) -> Result<()> {
		self.entries.lock().insert(key.to_string(), value);
		Ok(())
	}

	fn remove(&self, key: &str) -> Result<()> {
		self.entries.lock().remove(key);
		Ok(())
	}
}

/// Single-file JSON store.
#[derive(Debug)]
pub struct JsonFileStore {
	path: PathBuf,
	entries: Mutex<BTreeMap<String, Value>>,
}

impl JsonFileStore {
	/// Opens the store at `path`. A missing or unreadable file starts empty.
	pub fn open(path: impl Into<PathBuf>) -> Self {
		let path = path.into();
		let entries = match fs::read_to_string(&path) {
			Ok(content) => serde_json::from_str(&content).unwrap_or_else(|err| {
				warn!(target = "ghost.store", path = %path.display(), error = %err, "store file is corrupt; starting empty");
				BTreeMap::new()
			}),
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
			Err(err) => {
				warn!(target = "ghost.store", path = %path.display(), error = %err, "store file unreadable; starting empty");
				BTreeMap::new()
			}
		};
		debug!(target = "ghost.store", path = %path.display(), keys = entries.len(), "opened record store");
		Self {
			path,
			entries: Mutex::new(entries),
		}
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	fn write_atomic(&self, entries: &BTreeMap<String, Value>) -> Result<()> {
		let parent = match self.path.parent() {
			Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
			_ => PathBuf::from("."),
		};
		fs::create_dir_all(&parent)?;

		let mut temp = tempfile::NamedTempFile::new_in(&parent)?;
		serde_json::to_writer_pretty(&mut temp, entries)?;
		temp.write_all(b"\n")?;
		temp.as_file().sync_all()?;
		temp.persist(&self.path).map_err(|err| GhostError::Store(format!("failed to replace {}: {}", self.path.display(), err.error)))?;
		Ok(())
	}

	/// Applies `change` to a copy of the map and only commits it once the file is replaced.
	fn update(&self, change: impl FnOnce(&mut BTreeMap<String, Value>)) -> Result<()> {
		let mut entries = self.entries.lock();
		let mut next = entries.clone();
		change(&mut next);
		self.write_atomic(&next)?;
		*entries = next;
		Ok(())
	}
}

impl KeyValueStore for JsonFileStore {
	fn get(&self, key: &str) -> Result<Option<Value>> {
		Ok(self.entries.lock().get(key).cloned())
	}

	fn set(&self, key: &str, value: Value) -> Result<()> {
		self.update(|entries| {
			entries.insert(key.to_string(), value);
		})
	}

	fn remove(&self, key: &str) -> Result<()> {
		if !self.entries.lock().contains_key(key) {
			return Ok(());
		}
		self.update(|entries| {
			entries.remove(key);
		})
	}
}
