//! Request and response bodies of the search backend HTTP API.
//!
//! Field names follow the backend's snake_case JSON verbatim.

use serde::{Deserialize, Serialize};

use crate::types::TabId;

/// Default number of results requested from search endpoints.
pub const DEFAULT_TOP_K: usize = 5;

fn default_top_k() -> usize {
	DEFAULT_TOP_K
}

/// Body of `POST /api/index`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexRequest {
	pub url: String,
	pub title: String,
	pub text: String,
	#[serde(rename = "tab_id")]
	pub handle: TabId,
	#[serde(rename = "favicon", default)]
	pub favicon_ref: String,
}

/// Reply of `POST /api/index`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexResponse {
	pub status: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub doc_id: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub chunks: Option<u64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
}

/// Body of `POST /api/delete`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteRequest {
	pub url: String,
}

/// Reply of `POST /api/delete`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResponse {
	pub status: String,
	#[serde(default)]
	pub deleted: bool,
}

/// Body of `POST /api/search` and `POST /api/llm-search`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
	pub query: String,
	#[serde(default = "default_top_k")]
	pub top_k: usize,
}

impl SearchRequest {
	pub fn new(query: impl Into<String>) -> Self {
		Self {
			query: query.into(),
			top_k: DEFAULT_TOP_K,
		}
	}

	pub fn with_top_k(mut self, top_k: usize) -> Self {
		self.top_k = top_k;
		self
	}
}

/// One hit returned by the search endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
	pub url: String,
	pub title: String,
	#[serde(default)]
	pub tab_id: Option<TabId>,
	#[serde(default)]
	pub favicon: String,
	pub score: f64,
}

/// Reply of `POST /api/search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SearchResponse {
	#[serde(default)]
	pub results: Vec<SearchResult>,
}

/// Reply of `POST /api/llm-search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LlmSearchResponse {
	#[serde(default)]
	pub keywords: Vec<String>,
	#[serde(default)]
	pub results: Vec<SearchResult>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub llm_error: Option<String>,
}

/// One indexed page as listed by `GET /api/list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedPage {
	pub url: String,
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub tab_id: Option<TabId>,
	#[serde(default)]
	pub favicon: String,
	#[serde(default)]
	pub chunks: u64,
}

/// Reply of `GET /api/list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ListResponse {
	#[serde(default)]
	pub status: String,
	#[serde(default)]
	pub pages: Vec<IndexedPage>,
}

/// OpenAI-compatible LLM settings held by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmConfig {
	pub base_url: String,
	pub api_key: String,
	pub model: String,
}

/// LLM settings as reported back; the key is masked by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LlmConfigView {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub base_url: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub api_key_masked: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub model: Option<String>,
	#[serde(default)]
	pub configured: bool,
}

/// Reply of `GET /api/llm/config`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LlmConfigResponse {
	#[serde(default)]
	pub status: String,
	#[serde(default)]
	pub config: LlmConfigView,
}

/// Bare `{status}` acknowledgement, e.g. from `POST /api/llm/config`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
	pub status: String,
}

/// Reply of `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
	pub status: String,
	#[serde(default)]
	pub service: String,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn index_request_uses_backend_field_names() {
		let request = IndexRequest {
			url: "https://example.com/".to_string(),
			title: "Example".to_string(),
			text: "body".to_string(),
			handle: TabId(7),
			favicon_ref: "icon.png".to_string(),
		};
		let json = serde_json::to_value(&request).unwrap();
		assert_eq!(json["tab_id"], 7);
		assert_eq!(json["favicon"], "icon.png");
		assert!(json.get("handle").is_none());
	}

	#[test]
	fn search_request_defaults_top_k() {
		let request: SearchRequest = serde_json::from_str(r#"{"query":"rust"}"#).unwrap();
		assert_eq!(request.top_k, DEFAULT_TOP_K);
	}

	#[test]
	fn llm_search_response_accepts_missing_error() {
		let json = r#"{"keywords":["a"],"results":[{"url":"u","title":"t","tab_id":3,"favicon":"","score":0.5}]}"#;
		let response: LlmSearchResponse = serde_json::from_str(json).unwrap();
		assert_eq!(response.results[0].tab_id, Some(TabId(3)));
		assert!(response.llm_error.is_none());
	}
}
