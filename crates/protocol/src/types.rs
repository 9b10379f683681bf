//! Identity and record types shared by the engine and its persisted state.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque host-assigned identifier of a tab.
///
/// Hosts reassign these across restarts, so they are only trusted after
/// re-resolving against the live host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(pub i64);

/// Opaque host-assigned identifier of a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(pub i64);

impl fmt::Display for TabId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "tab:{}", self.0)
	}
}

impl fmt::Display for WindowId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "window:{}", self.0)
	}
}

/// Durable metadata for one hidden tab, keyed by its URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HiddenRecord {
	pub url: String,
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub favicon_ref: String,
	/// Tab id at hide time. Best-effort only; it may not survive a restart.
	#[serde(default)]
	pub original_handle: Option<TabId>,
	/// Milliseconds since the Unix epoch.
	#[serde(default)]
	pub hidden_at: u64,
}

/// URL-keyed collection of hidden records.
pub type HiddenRecords = BTreeMap<String, HiddenRecord>;

/// User settings persisted next to the hidden records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
	/// Discard hidden tabs to release memory instead of keeping them warm.
	#[serde(default)]
	pub auto_discard: bool,
}

/// Which path `summon` took to bring a tab back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryMode {
	/// The original live tab was moved back.
	Perfect,
	/// The tab was gone and a fresh one was opened at the URL.
	Recovered,
}

impl fmt::Display for RecoveryMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			RecoveryMode::Perfect => write!(f, "perfect"),
			RecoveryMode::Recovered => write!(f, "recovered"),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn hidden_record_uses_camel_case_keys() {
		let record = HiddenRecord {
			url: "https://example.com/".to_string(),
			title: "Example".to_string(),
			favicon_ref: "https://example.com/favicon.ico".to_string(),
			original_handle: Some(TabId(42)),
			hidden_at: 1_700_000_000_000,
		};
		let json = serde_json::to_value(&record).unwrap();
		assert_eq!(json["faviconRef"], "https://example.com/favicon.ico");
		assert_eq!(json["originalHandle"], 42);
		assert_eq!(json["hiddenAt"], 1_700_000_000_000u64);
	}

	#[test]
	fn hidden_record_tolerates_sparse_legacy_entries() {
		let record: HiddenRecord = serde_json::from_str(r#"{"url":"https://a.test/"}"#).unwrap();
		assert_eq!(record.original_handle, None);
		assert!(record.title.is_empty());
	}

	#[test]
	fn settings_default_keeps_tabs_warm() {
		let settings: Settings = serde_json::from_str("{}").unwrap();
		assert!(!settings.auto_discard);
	}
}
