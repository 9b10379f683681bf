//! Single-request, single-response command protocol.

use serde::{Deserialize, Serialize};

use crate::backend::{DeleteRequest, DeleteResponse, IndexRequest, IndexResponse, LlmSearchResponse, SearchRequest, SearchResponse};
use crate::types::{HiddenRecords, RecoveryMode, TabId};

/// Commands accepted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Command {
	/// Hide a tab. Without an explicit tab the active tab is used.
	Vanish {
		#[serde(default, skip_serializing_if = "Option::is_none")]
		tab: Option<TabId>,
	},
	/// Restore a hidden URL, preferring the remembered tab when it is still alive.
	Summon {
		url: String,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		handle: Option<TabId>,
	},
	ListHidden,
	RemoveHidden {
		url: String,
	},
	Index(IndexRequest),
	Search(SearchRequest),
	Delete(DeleteRequest),
	#[serde(rename = "llm-search")]
	LlmSearch(SearchRequest),
}

impl Command {
	/// Short name used in logs.
	pub fn name(&self) -> &'static str {
		match self {
			Command::Vanish { .. } => "vanish",
			Command::Summon { .. } => "summon",
			Command::ListHidden => "listHidden",
			Command::RemoveHidden { .. } => "removeHidden",
			Command::Index(_) => "index",
			Command::Search(_) => "search",
			Command::Delete(_) => "delete",
			Command::LlmSearch(_) => "llm-search",
		}
	}
}

/// Resolved reply for a [`Command`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
	Vanished { success: bool, title: String },
	Summoned { success: bool, mode: RecoveryMode, handle: TabId },
	Hidden { records: HiddenRecords },
	Removed { success: bool },
	Indexed(IndexResponse),
	Searched(SearchResponse),
	Deleted(DeleteResponse),
	LlmSearched(LlmSearchResponse),
	Failed { success: bool, error: String },
}

impl Response {
	pub fn failure(error: impl Into<String>) -> Self {
		Response::Failed {
			success: false,
			error: error.into(),
		}
	}

	pub fn is_success(&self) -> bool {
		match self {
			Response::Vanished { success, .. } | Response::Summoned { success, .. } | Response::Removed { success } | Response::Failed { success, .. } => *success,
			Response::Hidden { .. } | Response::Searched(_) | Response::LlmSearched(_) | Response::Deleted(_) => true,
			Response::Indexed(reply) => reply.status == "ok",
		}
	}
}
