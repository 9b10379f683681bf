//! Wire types for the ghost tab protocol.
//!
//! This crate contains the serde-serializable types exchanged between the
//! command surface (popup, shortcuts, CLI), the engine in `ghost-core`, and the
//! search backend. Types here are pure data with no behaviour beyond
//! serialization; the engine builds on top of them.

pub mod backend;
pub mod command;
pub mod types;

pub use backend::*;
pub use command::*;
pub use types::*;
