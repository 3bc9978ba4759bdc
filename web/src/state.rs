//! Application state for Axum handlers.

use registration_core::processor::RegistrationProcessor;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// Holds the one processor instance of this deployment; its single-writer
/// gate only serializes registrations that go through the same instance.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Registration processor
    pub processor: Arc<RegistrationProcessor>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub const fn new(processor: Arc<RegistrationProcessor>) -> Self {
        Self { processor }
    }
}
