//! Client for the semantic search backend.
//!
//! Indexing and deletion are fire-and-forget from the engine's point of view:
//! [`index_detached`] and [`delete_detached`] spawn the request and hand back a
//! [`Detached`] handle the caller is free to drop. Failures are logged as
//! "backend offline" and never reach the command that triggered them.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ghost_protocol::{
	DeleteRequest, DeleteResponse, HealthResponse, IndexRequest, IndexResponse, ListResponse, LlmConfig, LlmConfigResponse, LlmSearchResponse, SearchRequest,
	SearchResponse, StatusResponse,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::error::{GhostError, Result};

/// Default backend origin.
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";

/// Default per-request client timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Handle to a spawned backend call whose outcome is deliberately unobserved.
pub type Detached = tokio::task::JoinHandle<()>;

/// Indexing and search operations offered by the backend.
#[async_trait]
pub trait SearchBackend: Send + Sync {
	async fn index(&self, request: IndexRequest) -> Result<IndexResponse>;

	async fn delete(&self, url: &str) -> Result<DeleteResponse>;

	async fn search(&self, request: SearchRequest) -> Result<SearchResponse>;

	async fn llm_search(&self, request: SearchRequest) -> Result<LlmSearchResponse>;

	async fn list(&self) -> Result<ListResponse>;
}

/// Spawns an index call; errors are logged and dropped.
pub fn index_detached(backend: Arc<dyn SearchBackend>, request: IndexRequest) -> Detached {
	tokio::spawn(async move {
		let url = request.url.clone();
		match backend.index(request).await {
			Ok(reply) if reply.status == "ok" => {
				debug!(target = "ghost.backend", %url, chunks = ?reply.chunks, "page indexed");
			}
			Ok(reply) => {
				warn!(target = "ghost.backend", %url, status = %reply.status, message = ?reply.message, "backend declined to index page");
			}
			Err(err) => {
				warn!(target = "ghost.backend", %url, error = %err, "backend offline; page not indexed");
			}
		}
	})
}

/// Spawns a delete call; errors are logged and dropped.
pub fn delete_detached(backend: Arc<dyn SearchBackend>, url: String) -> Detached {
	tokio::spawn(async move {
		match backend.delete(&url).await {
			Ok(reply) => debug!(target = "ghost.backend", %url, deleted = reply.deleted, "index entry deleted"),
			Err(err) => warn!(target = "ghost.backend", %url, error = %err, "backend offline; index entry kept"),
		}
	})
}

/// HTTP implementation talking JSON to the backend's `/api` routes.
#[derive(Debug, Clone)]
pub struct HttpBackend {
	client: reqwest::Client,
	base: Url,
}

impl HttpBackend {
	pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
		let mut base = Url::parse(base_url).map_err(|err| GhostError::Config(format!("invalid backend URL {base_url:?}: {err}")))?;
		if !base.path().ends_with('/') {
			let path = format!("{}/", base.path());
			base.set_path(&path);
		}
		let client = reqwest::Client::builder()
			.timeout(timeout)
			.build()
			.map_err(|err| GhostError::Config(format!("failed to build HTTP client: {err}")))?;
		Ok(Self { client, base })
	}

	pub fn base_url(&self) -> &Url {
		&self.base
	}

	/// Liveness probe against `GET /`.
	pub async fn health(&self) -> Result<HealthResponse> {
		self.get("").await
	}

	/// Current LLM settings with the key masked.
	pub async fn llm_config(&self) -> Result<LlmConfigResponse> {
		self.get("api/llm/config").await
	}

	pub async fn set_llm_config(&self, config: &LlmConfig) -> Result<StatusResponse> {
		self.post("api/llm/config", config).await
	}

	fn endpoint(&self, path: &str) -> Result<Url> {
		self.base
			.join(path)
			.map_err(|err| GhostError::Config(format!("invalid backend path {path:?}: {err}")))
	}

	async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R> {
		let url = self.endpoint(path)?;
		debug!(target = "ghost.backend", %url, "GET");
		let response = self.client.get(url).send().await?.error_for_status()?;
		Ok(response.json().await?)
	}

	async fn post<B: Serialize + ?Sized, R: DeserializeOwned>(&self, path: &str, body: &B) -> Result<R> {
		let url = self.endpoint(path)?;
		debug!(target = "ghost.backend", %url, "POST");
		let response = self.client.post(url).json(body).send().await?.error_for_status()?;
		Ok(response.json().await?)
	}
}

#[async_trait]
impl SearchBackend for HttpBackend {
	async fn index(&self, request: IndexRequest) -> Result<IndexResponse> {
		self.post("api/index", &request).await
	}

	async fn delete(&self, url: &str) -> Result<DeleteResponse> {
		self.post("api/delete", &DeleteRequest { url: url.to_string() }).await
	}

	async fn search(&self, request: SearchRequest) -> Result<SearchResponse> {
		self.post("api/search", &request).await
	}

	async fn llm_search(&self, request: SearchRequest) -> Result<LlmSearchResponse> {
		self.post("api/llm-search", &request).await
	}

	async fn list(&self) -> Result<ListResponse> {
		self.get("api/list").await
	}
}
