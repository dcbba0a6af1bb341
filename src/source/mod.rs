//! The batch-producing data source
//!
//! # Overview
//!
//! `ArticleSource` owns the pagination cursor, the request-and-quota policy,
//! and an internal record buffer. Callers pull fixed-size batches of
//! flattened records, either one at a time through [`BatchSource::next_batch`]
//! or as a lazy [`futures::Stream`] via [`ArticleSource::into_batches`].
//!
//! Production is single-consumer and sequential: the cursor only advances
//! when the buffer needs more data, and every buffered record is drained at
//! most once, in arrival order. The produced sequence is finite (bounded by
//! the total-hit count the API reports) and is not restartable — build a
//! fresh source to iterate again.
//!
//! Known limitation, by design: only full-size batches are ever emitted. If
//! the total record count leaves a trailing remainder smaller than one batch,
//! those records stay buffered and are dropped when the source completes.

use crate::config::QueryContext;
use crate::error::{Error, Result};
use crate::flatten::flatten;
use crate::http::{DailyQuota, Pacer, SearchClient};
use crate::types::{Batch, RawRecord};
use async_trait::async_trait;
use futures::Stream;
use serde_json::Value;
use std::collections::VecDeque;
use std::pin::Pin;
use tracing::{debug, info};

// ============================================================================
// Batch Source Trait
// ============================================================================

/// Type alias for the lazy batch sequence returned by [`batch_stream`]
pub type BatchStream = Pin<Box<dyn Stream<Item = Result<Batch>> + Send>>;

/// Core trait for batch-producing data sources
#[async_trait]
pub trait BatchSource: Send {
    /// Record optional incremental-sync hints. Diagnostic only: performs no
    /// I/O and always succeeds.
    fn connect(&mut self, incremental_column: Option<&str>, max_incremental_value: Option<&str>);

    /// Disconnect from the source. No-op; always succeeds.
    fn disconnect(&mut self);

    /// Produce the next batch of exactly `batch_size` flattened records,
    /// or `None` once the declared total is exhausted.
    async fn next_batch(&mut self, batch_size: usize) -> Result<Option<Batch>>;

    /// Column names of the dataset, in flattening-traversal order.
    ///
    /// Fetches one page if the buffer is empty and derives the schema from
    /// the first buffered record without consuming it.
    async fn schema(&mut self) -> Result<Vec<String>>;
}

// ============================================================================
// Article Source
// ============================================================================

/// Batch source for a page-numbered article search API
#[derive(Debug)]
pub struct ArticleSource {
    context: QueryContext,
    client: SearchClient,
    pacer: Pacer,
    quota: DailyQuota,
    /// Page cursor: starts at 0, +1 per fetch, never reset within a run
    page: u32,
    /// Unfetched matching records; `None` until the first successful fetch
    remaining: Option<u64>,
    /// Raw records fetched but not yet handed out, in arrival order
    buffer: VecDeque<RawRecord>,
    done: bool,
    incremental_column: Option<String>,
    max_incremental_value: Option<String>,
}

impl ArticleSource {
    /// Create a source from a query context
    pub fn new(context: QueryContext) -> Self {
        let pacer = Pacer::new(context.pacing_interval());
        let quota = DailyQuota::new(context.day_limit);
        Self {
            context,
            client: SearchClient::new(),
            pacer,
            quota,
            page: 0,
            remaining: None,
            buffer: VecDeque::new(),
            done: false,
            incremental_column: None,
            max_incremental_value: None,
        }
    }

    /// Create a source with a custom HTTP client
    pub fn with_client(context: QueryContext, client: SearchClient) -> Self {
        let mut source = Self::new(context);
        source.client = client;
        source
    }

    /// The query context this source was built with
    pub fn context(&self) -> &QueryContext {
        &self.context
    }

    /// Number of API calls made since the last quota reset
    pub fn call_count(&self) -> u32 {
        self.quota.calls()
    }

    /// Unfetched matching records, once the first fetch has reported a total
    pub fn remaining(&self) -> Option<u64> {
        self.remaining
    }

    /// Number of raw records currently buffered
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Consume the source and produce its batches as a lazy stream.
    ///
    /// Equivalent to repeated [`BatchSource::next_batch`] calls; the stream
    /// terminates after the exhaustion signal or the first error.
    pub fn into_batches(self, batch_size: usize) -> BatchStream {
        batch_stream(self, batch_size)
    }

    /// Fetch the page at the current cursor and advance the cursor.
    ///
    /// Applies the quota policy first (wait-for-next-day, then the pending
    /// page is still fetched), then the fixed inter-request pacing. Any
    /// transport or response-shape failure is fatal for this fetch.
    async fn fetch_next_page(&mut self) -> Result<()> {
        if self.quota.exceeded() {
            self.quota.wait_until_next_day().await;
        }
        self.pacer.acquire().await;

        let page = self.page;
        let body = self
            .client
            .get_json(
                &self.context.base_url,
                &[
                    ("page", page.to_string()),
                    ("keyword", self.context.keyword.clone()),
                    ("api-key", self.context.api_key.clone()),
                ],
            )
            .await?;

        let docs = body
            .pointer("/response/docs")
            .and_then(Value::as_array)
            .ok_or_else(|| Error::malformed_response("response.docs"))?;

        if self.remaining.is_none() {
            let hits = body
                .pointer("/response/meta/hits")
                .and_then(Value::as_u64)
                .ok_or_else(|| Error::malformed_response("response.meta.hits"))?;
            debug!(hits, "total matches reported by the API");
            self.remaining = Some(hits);
        }

        // Saturating: a last-page overshoot must not drive the count negative
        if let Some(remaining) = self.remaining.as_mut() {
            *remaining = remaining.saturating_sub(docs.len() as u64);
        }

        self.quota.record_call();
        self.buffer.extend(docs.iter().cloned());
        self.page += 1;

        debug!(
            page,
            fetched = docs.len(),
            buffered = self.buffer.len(),
            remaining = self.remaining,
            "fetched page"
        );
        Ok(())
    }

    /// Check whether the declared total has been fetched
    fn exhausted(&self) -> bool {
        self.remaining == Some(0)
    }
}

#[async_trait]
impl BatchSource for ArticleSource {
    fn connect(&mut self, incremental_column: Option<&str>, max_incremental_value: Option<&str>) {
        debug!(?incremental_column, "Incremental Column");
        debug!(?max_incremental_value, "Incremental Last Value");
        self.incremental_column = incremental_column.map(str::to_string);
        self.max_incremental_value = max_incremental_value.map(str::to_string);
    }

    fn disconnect(&mut self) {
        // Nothing to do
    }

    async fn next_batch(&mut self, batch_size: usize) -> Result<Option<Batch>> {
        if batch_size == 0 {
            return Err(Error::InvalidBatchSize);
        }
        if self.done {
            return Ok(None);
        }

        // Fill the buffer page by page until a full batch is available or the
        // declared total runs out. The in-progress batch is completed from
        // whatever is already buffered — never truncated early.
        while self.buffer.len() < batch_size {
            if self.exhausted() {
                if !self.buffer.is_empty() {
                    debug!(
                        leftover = self.buffer.len(),
                        "trailing records smaller than one batch are not emitted"
                    );
                }
                self.done = true;
                info!("task completed");
                return Ok(None);
            }
            self.fetch_next_page().await?;
        }

        let batch: Batch = self
            .buffer
            .drain(..batch_size)
            .map(|record| flatten(&record))
            .collect();
        Ok(Some(batch))
    }

    async fn schema(&mut self) -> Result<Vec<String>> {
        if self.buffer.is_empty() {
            self.fetch_next_page().await?;
        }

        // Peek, don't pop: the record stays available for batch production
        let first = self
            .buffer
            .front()
            .ok_or_else(|| Error::schema("the API returned no records to derive a schema from"))?;
        Ok(flatten(first).keys().cloned().collect())
    }
}

// ============================================================================
// Stream Adapter
// ============================================================================

/// Adapt any [`BatchSource`] into a lazy stream of batches.
///
/// The source is moved into the stream, so the sequence cannot be restarted;
/// iteration ends at the exhaustion signal or the first error.
pub fn batch_stream<S>(source: S, batch_size: usize) -> BatchStream
where
    S: BatchSource + 'static,
{
    Box::pin(futures::stream::try_unfold(source, move |mut source| {
        async move {
            match source.next_batch(batch_size).await? {
                Some(batch) => Ok(Some((batch, source))),
                None => Ok(None),
            }
        }
    }))
}

#[cfg(test)]
mod tests;
