//! # Registration Client
//!
//! Submission side of the registration form: the draft being edited,
//! advisory local checks, and the HTTP call to the server.
//!
//! The server re-validates everything that matters (validator codes in
//! particular); these checks only save a round trip and give the user a
//! message naming the field and the participant.
//!
//! ## Example
//!
//! ```no_run
//! use registration_client::{RegistrationClient, SubmissionDraft};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = RegistrationClient::new("http://localhost:8080").unwrap();
//!
//!     let mut draft = SubmissionDraft::new();
//!     draft.set_participant_count(2);
//!     // ... fill in draft.billing and the participants ...
//!
//!     match client.submit(&draft).await {
//!         Ok(response) => println!("{} ({} records)", response.message, response.record_count),
//!         Err(err) => eprintln!("Error: {}", err.display_message()),
//!     }
//! }
//! ```

pub mod client;
pub mod draft;
pub mod input;
pub mod validation;

// Re-export main types for convenience
pub use client::{ClientError, RegistrationClient};
pub use draft::{MAX_PARTICIPANTS, MIN_PARTICIPANTS, SubmissionDraft};
pub use input::{format_identifier, sanitize_phone};
pub use validation::ValidationError;
