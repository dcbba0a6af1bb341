//! HTTP layer: search client, request pacing, and the daily quota
//!
//! # Overview
//!
//! - `SearchClient` - thin GET client that parses JSON responses and maps
//!   transport failures onto the crate error taxonomy. Transport failures are
//!   fatal: nothing here retries.
//! - `Pacer` - fixed inter-request spacing (10 requests/minute by default)
//! - `DailyQuota` - call counter against a daily cap, with a
//!   wait-until-next-day reset

mod client;
mod rate_limit;

pub use client::{SearchClient, SearchClientConfig};
pub use rate_limit::{duration_until_next_midnight, DailyQuota, Pacer};
