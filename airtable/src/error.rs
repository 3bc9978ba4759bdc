//! Error types for building an Airtable client

use thiserror::Error;

/// Errors that can occur while configuring the Airtable client.
///
/// Request-time failures are reported as
/// [`registration_core::StoreError`] instead.
#[derive(Debug, Error)]
pub enum AirtableError {
    /// A required environment variable is not set
    #[error("Missing {0} environment variable")]
    MissingEnv(&'static str),

    /// An environment variable is set but unusable
    #[error("Invalid {name} value: {value}")]
    InvalidEnv {
        /// Variable name
        name: &'static str,
        /// Rejected value
        value: String,
    },

    /// The endpoint URL does not parse or cannot carry a path
    #[error("Invalid endpoint URL: {0}")]
    InvalidEndpoint(String),

    /// The underlying HTTP client could not be built
    #[error("HTTP client construction failed: {0}")]
    ClientBuild(String),
}
