// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Article Search Batch Source
//!
//! A batch data source for paginated, rate-limited article search APIs.
//!
//! The source walks a page-numbered search endpoint, buffers the raw records
//! it returns, flattens each nested JSON record into dotted-path keys, and
//! hands the result to the consumer in fixed-size batches.
//!
//! ## Features
//!
//! - **Page-number pagination**: monotone page cursor, driven by buffer demand
//! - **Quota policy**: daily call cap with a wait-until-next-day reset, plus
//!   fixed inter-request pacing (10 requests/minute by default)
//! - **Recursive flattening**: nested objects and arrays become a single level
//!   of separator-joined keys (`headline.main`, `keywords.0.value`, ...)
//! - **Lazy batch stream**: pull batches one at a time, or consume the source
//!   as a `futures::Stream` of batches
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use articlesearch_source::{ArticleSource, BatchSource, QueryContext, Result};
//! use futures::TryStreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let context = QueryContext::new("Silicon Valley", "my-api-key");
//!     let mut source = ArticleSource::new(context);
//!     source.connect(None, None);
//!
//!     let mut batches = source.into_batches(20);
//!     while let Some(batch) = batches.try_next().await? {
//!         for record in &batch {
//!             println!("{:?} - {:?}", record.get("_id"), record.get("headline.main"));
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)] // TODO: Add docs before 1.0 release

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the source
pub mod error;

/// Common types and type aliases
pub mod types;

/// Query context and configuration loading
pub mod config;

/// Recursive JSON flattening
pub mod flatten;

/// HTTP client, request pacing, and daily quota
pub mod http;

/// The batch-producing data source
pub mod source;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::QueryContext;
pub use error::{Error, Result};
pub use flatten::{flatten, flatten_with_separator};
pub use source::{batch_stream, ArticleSource, BatchSource, BatchStream};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
