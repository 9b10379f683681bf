//! Hidden-tab lifecycle engine.
//!
//! Moves browser tabs into a single hidden window ("vanish") and brings them
//! back ("summon"), capturing a bounded text digest of each page on the way
//! out for a separate search backend.
//!
//! # Layout
//!
//! - [`host`]: the [`BrowserHost`](host::BrowserHost) trait the engine drives, plus an in-memory fake
//! - [`session`]: hidden container manager and URL → tab index behind [`SessionManager`](session::SessionManager)
//! - [`controller`]: vanish/summon state machine and the command surface
//! - [`dispatch`]: serialized event/command loop
//! - [`readable`]: content digest extraction
//! - [`store`] and [`backend`]: the durable record store and the search backend client

pub mod backend;
pub mod config;
pub mod controller;
pub mod dispatch;
pub mod error;
pub mod host;
pub mod readable;
pub mod session;
pub mod store;
pub mod url_policy;

pub use backend::{Detached, HttpBackend, SearchBackend};
pub use config::GhostConfig;
pub use controller::{Summoned, VanishSummonController, Vanished};
pub use dispatch::{Dispatcher, DispatcherHandle, Inbound};
pub use error::{GhostError, Result};
pub use host::{BrowserHost, HostEvent};
pub use session::{HiddenContainerManager, Reconciliation, SessionIndex, SessionManager};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore, RecordRepository};
