//! # Airtable Record Store
//!
//! [`RecordStore`](registration_core::RecordStore) implementation over the
//! Airtable REST API, used by the registration server in production.
//!
//! ## Example
//!
//! ```no_run
//! use registration_airtable::AirtableClient;
//! use registration_core::{Filter, Query, RecordStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads AIRTABLE_API_KEY and AIRTABLE_BASE_ID
//!     let client = AirtableClient::from_env()?;
//!
//!     let query = Query::filtered(Filter::any_of("ID Validador", ["ABC123"]));
//!     let rows = client.select("Validaciones".to_string(), query).await?;
//!
//!     println!("{} matching ledger rows", rows.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Behavior
//!
//! - Bearer authentication on every request
//! - Filters sent as `filterByFormula`, projections as `fields[]`
//! - Pages followed through `offset` until exhausted
//! - Writes chunked at 10 records per request with `typecast: true`
//! - 401/403 map to `Unauthorized`, 429 to `RateLimited`, other non-2xx to
//!   `ApiError`

pub mod client;
pub mod config;
pub mod error;
pub mod wire;

// Re-export main types for convenience
pub use client::AirtableClient;
pub use config::AirtableConfig;
pub use error::AirtableError;
