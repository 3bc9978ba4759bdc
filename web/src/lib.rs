//! HTTP server for the conference registration service.
//!
//! A thin Axum shell around [`registration_core::RegistrationProcessor`]:
//! decode the batch, hand it to the processor, map the outcome to a status.
//!
//! # Request Flow
//!
//! 1. **Correlation ID** attached (echoed or generated)
//! 2. **Decode** the JSON body; failure is a 400
//! 3. **Process** the batch (shape check, ledger lookup, writes)
//! 4. **Map** the outcome: 200 / 400 / 409 / 500
//!
//! # Example
//!
//! ```ignore
//! use registration_web::{AppState, build_router};
//!
//! let state = AppState::new(Arc::new(processor));
//! let app = build_router(state);
//! axum::serve(listener, app).await?;
//! ```

#![forbid(unsafe_code)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

// Re-export key types for convenience
pub use config::{Config, ConfigError, ServerConfig};
pub use error::AppError;
pub use middleware::{CORRELATION_ID_HEADER, CorrelationId, correlation_id_layer};
pub use routes::{REGISTER_PATH, build_router};
pub use state::AppState;
