//!
//! Common types and utilities shared by the quote dashboard.
//!
//! This crate aggregates:
//! - `error` — unified error type `QuoteError` used across the workspace.
//! - `result` — handy `Result<T, QuoteError>` alias.
//! - `model` — normalized `Quote` and `SuggestionItem` records.
//! - `symbols` — symbol-list parsing for queries and watchlist files.
//! - `request` — upstream request descriptions and query parameters.
//! - `normalize` — conversion of upstream response shapes into the model.
//! - `net` — upstream endpoint constants and response keys.
#![warn(missing_docs)]
pub mod error;
pub mod model;
pub mod net;
pub mod normalize;
pub mod request;
pub mod result;
pub mod symbols;

pub use error::QuoteError;
pub use model::{Quote, SuggestionItem};
pub use request::{QueryMode, UpstreamRequest};
pub use result::Result;
