//! Command-line companion for the ghost tabs engine.
//!
//! Everything here works without a live browser: offline extraction of saved
//! pages, queries against the search backend, and maintenance of the
//! persisted hidden-record store.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod output;
