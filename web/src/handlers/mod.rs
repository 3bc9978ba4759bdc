//! HTTP request handlers.

pub mod health;
pub mod registration;

// Re-export common handler utilities
pub use health::health_check;
pub use registration::{method_not_allowed, register};
