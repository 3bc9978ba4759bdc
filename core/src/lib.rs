//! # Registration Core
//!
//! Validator-code ledger and registration processor for the conference
//! registration service.
//!
//! ## Core Concepts
//!
//! - **Batch**: shared billing data plus one or more participants
//! - **Validator code**: single-use code proving a participant's ticket
//! - **Ledger**: hosted table of issuable codes and their consumed state
//! - **Processor**: validates a batch against the ledger, then writes it
//! - **Environment**: the record store and clock, injected as trait objects
//!
//! ## Architecture Principles
//!
//! - All I/O goes through [`store::RecordStore`]; the processor never talks
//!   HTTP itself
//! - Configuration is an explicit [`processor::ProcessorConfig`] value, never
//!   process-wide state
//! - Time comes from [`environment::Clock`] so tests are deterministic
//!
//! ## Example
//!
//! ```ignore
//! use registration_core::{ProcessorConfig, RegistrationProcessor, SystemClock};
//! use std::sync::Arc;
//!
//! let processor = RegistrationProcessor::new(
//!     Arc::new(airtable_client),
//!     Arc::new(SystemClock),
//!     ProcessorConfig::new("Inscripciones", "Validaciones"),
//! );
//!
//! let receipt = processor.register(batch).await?;
//! println!("{} attendees registered", receipt.record_count);
//! ```

pub mod batch;
pub mod error;
pub mod identity;
pub mod ledger;
pub mod processor;
pub mod record;
pub mod schema;
pub mod store;

/// Environment module - Dependency injection traits
///
/// All external dependencies of the processor are abstracted behind traits
/// and injected at construction time.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```ignore
    /// // Production - uses system clock
    /// let clock = SystemClock;
    ///
    /// // Test - fixed time for deterministic tests
    /// let clock = FixedClock::new(time);
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Wall-clock time.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}

// Re-export commonly used types
pub use batch::{BillingData, Participant, RegistrationBatch, RegistrationResponse, TicketKind};
pub use environment::{Clock, SystemClock};
pub use error::{ErrorKind, RegistrationError};
pub use identity::{IdPrefix, Nationality, TaxId, TaxIdError};
pub use ledger::{LedgerEntry, ValidationLedger};
pub use processor::{DuplicateCodePolicy, ProcessorConfig, RegistrationProcessor, RegistrationReceipt};
pub use record::{FieldValue, Fields, Filter, Query, Record, RecordId, RecordUpdate};
pub use store::{RecordStore, StoreError, StoreFuture};
