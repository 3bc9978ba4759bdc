//! # Registration Testing
//!
//! Test doubles and fixtures for the conference registration service.
//!
//! This crate provides:
//! - [`InMemoryRecordStore`]: a `RecordStore` with failure injection
//! - [`FixedClock`]: deterministic time
//! - [`fixtures`]: well-formed batches and processor configuration
//!
//! ## Example
//!
//! ```ignore
//! use registration_testing::{fixtures, test_clock, InMemoryRecordStore};
//! use registration_core::RegistrationProcessor;
//! use std::sync::Arc;
//!
//! #[tokio::test]
//! async fn test_single_registration() {
//!     let store = InMemoryRecordStore::new();
//!     store.seed_ledger(fixtures::VALIDATION_TABLE, &[("ABC123", false)]);
//!
//!     let processor = RegistrationProcessor::new(
//!         Arc::new(store.clone()),
//!         Arc::new(test_clock()),
//!         fixtures::processor_config(),
//!     );
//!
//!     let receipt = processor.register(fixtures::batch(&["ABC123"])).await.unwrap();
//!     assert_eq!(receipt.record_count, 1);
//! }
//! ```

use chrono::{DateTime, Utc};
use registration_core::environment::Clock;

pub mod fixtures;
pub mod store;

/// Mock implementations of Environment traits.
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making billing keys reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use registration_testing::mocks::FixedClock;
    /// use registration_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Install a test-writer tracing subscriber.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

// Re-export commonly used items
pub use mocks::{FixedClock, test_clock};
pub use store::{InMemoryRecordStore, Operation};
