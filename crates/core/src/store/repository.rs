//! Typed facade over the key-value store.

use std::collections::HashSet;
use std::sync::Arc;

use ghost_protocol::{HiddenRecord, HiddenRecords, Settings, WindowId};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use super::KeyValueStore;
use crate::error::Result;

const CONTAINER_KEY: &str = "hiddenWindowId";
const RECORDS_KEY: &str = "hiddenTabs";
const SETTINGS_KEY: &str = "settings";

/// Repository for the container pointer, hidden records, and settings.
#[derive(Clone)]
pub struct RecordRepository {
	store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for RecordRepository {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RecordRepository").finish_non_exhaustive()
	}
}

impl RecordRepository {
	pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
		Self { store }
	}

	/// Remembered hidden window id from a previous run, if any.
	pub fn container_handle(&self) -> Result<Option<WindowId>> {
		self.load(CONTAINER_KEY)
	}

	pub fn set_container_handle(&self, id: WindowId) -> Result<()> {
		self.store.set(CONTAINER_KEY, serde_json::to_value(id)?)
	}

	pub fn clear_container_handle(&self) -> Result<()> {
		self.store.remove(CONTAINER_KEY)
	}

	pub fn hidden_records(&self) -> Result<HiddenRecords> {
		Ok(self.load(RECORDS_KEY)?.unwrap_or_default())
	}

	/// URL key set of every hidden record.
	pub fn hidden_urls(&self) -> Result<HashSet<String>> {
		Ok(self.hidden_records()?.into_keys().collect())
	}

	pub fn record(&self, url: &str) -> Result<Option<HiddenRecord>> {
		Ok(self.hidden_records()?.remove(url))
	}

	/// Inserts or overwrites the record for its URL.
	pub fn put_record(&self, record: HiddenRecord) -> Result<()> {
		let mut records = self.hidden_records()?;
		records.insert(record.url.clone(), record);
		self.store.set(RECORDS_KEY, serde_json::to_value(&records)?)
	}

	/// Deletes the record for `url`. Returns whether one existed.
	pub fn remove_record(&self, url: &str) -> Result<bool> {
		let mut records = self.hidden_records()?;
		if records.remove(url).is_none() {
			return Ok(false);
		}
		self.store.set(RECORDS_KEY, serde_json::to_value(&records)?)?;
		Ok(true)
	}

	pub fn settings(&self) -> Result<Settings> {
		Ok(self.load(SETTINGS_KEY)?.unwrap_or_default())
	}

	pub fn set_settings(&self, settings: Settings) -> Result<()> {
		self.store.set(SETTINGS_KEY, serde_json::to_value(settings)?)
	}

	/// Reads a key, treating a value of the wrong shape as absent.
	fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
		let Some(value) = self.store.get(key)? else {
			return Ok(None);
		};
		if value == Value::Null {
			return Ok(None);
		}
		match serde_json::from_value(value) {
			Ok(parsed) => Ok(Some(parsed)),
			Err(err) => {
				warn!(target = "ghost.store", key, error = %err, "ignoring malformed stored value");
				Ok(None)
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;
	use crate::store::MemoryStore;

	fn record(url: &str) -> HiddenRecord {
		HiddenRecord {
			url: url.to_string(),
			title: "t".to_string(),
			favicon_ref: String::new(),
			original_handle: None,
			hidden_at: 1,
		}
	}

	#[test]
	fn put_record_overwrites_by_url() {
		let repo = RecordRepository::new(Arc::new(MemoryStore::new()));
		repo.put_record(record("https://a.test/")).unwrap();
		let mut again = record("https://a.test/");
		again.title = "second".to_string();
		repo.put_record(again).unwrap();

		let records = repo.hidden_records().unwrap();
		assert_eq!(records.len(), 1);
		assert_eq!(records["https://a.test/"].title, "second");
	}

	#[test]
	fn remove_record_reports_presence() {
		let repo = RecordRepository::new(Arc::new(MemoryStore::new()));
		repo.put_record(record("https://a.test/")).unwrap();
		assert!(repo.remove_record("https://a.test/").unwrap());
		assert!(!repo.remove_record("https://a.test/").unwrap());
	}

	#[test]
	fn malformed_values_read_as_absent() {
		let store = Arc::new(MemoryStore::new());
		store.set(CONTAINER_KEY, json!("not-a-number")).unwrap();
		store.set(RECORDS_KEY, json!([1, 2, 3])).unwrap();
		let repo = RecordRepository::new(store);
		assert_eq!(repo.container_handle().unwrap(), None);
		assert!(repo.hidden_records().unwrap().is_empty());
	}

	#[test]
	fn container_handle_round_trips() {
		let repo = RecordRepository::new(Arc::new(MemoryStore::new()));
		repo.set_container_handle(WindowId(77)).unwrap();
		assert_eq!(repo.container_handle().unwrap(), Some(WindowId(77)));
		repo.clear_container_handle().unwrap();
		assert_eq!(repo.container_handle().unwrap(), None);
	}
}
