//! Content digest extraction for hidden pages.
//!
//! A captured page goes through three layers, first success wins:
//! a site-specific extractor chosen from an ordered domain registry,
//! generic landmark/candidate scoring, and a whole-body fallback.
//! Every layer is isolated so that a failure only means falling through.
//!
//! [`scraper::Html`] is not `Send`; extraction is synchronous and must finish
//! before the caller awaits anything.

mod dom;
mod metadata;
mod pipeline;
mod scoring;
mod site;
mod text;
mod types;
mod vocabulary;

pub use pipeline::{MAX_TEXT_CHARS, extract};
pub use site::{DomainMatcher, Fragment, REGISTRY, SiteEntry, SiteExtractor, select_extractor};
pub use text::truncate_chars;
pub use types::{ExtractionResult, Strategy};
