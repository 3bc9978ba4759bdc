//! Record store abstraction over the hosted table database.
//!
//! The registration flow needs exactly three capabilities from the store:
//!
//! - Select rows matching an "OR of equality" predicate
//! - Create a batch of rows
//! - Update a batch of rows addressed by their opaque identifiers
//!
//! # Implementations
//!
//! - `AirtableClient` (in `registration-airtable`): Production implementation
//! - `InMemoryRecordStore` (in `registration-testing`): Fast, deterministic testing
//!
//! # Dyn Compatibility
//!
//! Methods return `Pin<Box<dyn Future>>` instead of using `async fn` so the
//! store can be held as `Arc<dyn RecordStore>` by the processor and the web
//! state.

use crate::record::{Fields, Query, Record, RecordUpdate};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Boxed future returned by [`RecordStore`] methods.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

/// Errors that can occur during record store operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The request never produced a response (connect, TLS, timeout).
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The response body could not be decoded.
    #[error("Response parsing failed: {0}")]
    ResponseParseFailed(String),

    /// Credentials rejected by the store.
    #[error("Unauthorized - invalid API key or missing permissions")]
    Unauthorized,

    /// Store throttled the caller.
    #[error("Rate limited - too many requests")]
    RateLimited,

    /// Store answered with a non-success status.
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error body returned by the store
        message: String,
    },

    /// Anything else (misconfiguration, poisoned in-memory state).
    #[error("Store error: {0}")]
    Other(String),
}

/// Minimal table-store contract used by the ledger and the processor.
///
/// Implementations must be `Send + Sync`; one instance is shared by every
/// in-flight request.
pub trait RecordStore: Send + Sync {
    /// Return every row of `table` matching `query.filter`.
    ///
    /// Pagination is the implementation's concern: the returned vector holds
    /// the complete result. No match is an empty vector, not an error.
    ///
    /// # Errors
    ///
    /// Any transport, authorization or decoding failure.
    fn select(&self, table: String, query: Query) -> StoreFuture<'_, Vec<Record>>;

    /// Create one row per entry in `rows`, returning the stored rows in order.
    ///
    /// # Errors
    ///
    /// Any transport, authorization or decoding failure. Chunked
    /// implementations may have persisted earlier chunks before failing.
    fn create(&self, table: String, rows: Vec<Fields>) -> StoreFuture<'_, Vec<Record>>;

    /// Apply partial updates, returning the updated rows.
    ///
    /// # Errors
    ///
    /// Any transport, authorization or decoding failure, including an
    /// unknown record id.
    fn update(&self, table: String, updates: Vec<RecordUpdate>) -> StoreFuture<'_, Vec<Record>>;
}
