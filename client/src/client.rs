//! HTTP submission to the registration server

use crate::draft::SubmissionDraft;
use crate::validation::ValidationError;
use registration_core::batch::RegistrationResponse;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use thiserror::Error;

/// Path of the registration endpoint.
pub const REGISTER_PATH: &str = "/api/register-participants";

/// Shown when the server cannot be reached or answers with garbage.
pub const CONNECTION_ERROR_MESSAGE: &str = "Connection error: the server did not respond with valid data.";

/// Shown when the server rejects a batch without saying why.
pub const GENERIC_REJECTION_MESSAGE: &str =
    "The server reported an error while validating the submission.";

/// Errors that can occur while submitting a draft
#[derive(Debug, Error)]
pub enum ClientError {
    /// Local checks failed; nothing was sent
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// The request never produced a response
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The response body was not the expected JSON
    #[error("Response parsing failed: {0}")]
    ResponseParseFailed(String),

    /// The server refused the batch
    #[error("Rejected (status {status}): {message}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Message from the server, verbatim
        message: String,
    },

    /// The server URL cannot be used
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    /// Text to show the person filling in the form.
    ///
    /// Server messages are shown verbatim; transport and decoding failures
    /// collapse into one connection message.
    #[must_use]
    pub fn display_message(&self) -> String {
        match self {
            Self::Invalid(err) => err.to_string(),
            Self::Rejected { message, .. } => message.clone(),
            Self::RequestFailed(_) | Self::ResponseParseFailed(_) | Self::InvalidUrl(_) => {
                CONNECTION_ERROR_MESSAGE.to_string()
            },
        }
    }

    /// HTTP status of a server rejection.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Rejected { status, .. } => StatusCode::from_u16(*status).ok(),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Client for the registration endpoint
#[derive(Debug, Clone)]
pub struct RegistrationClient {
    client: Client,
    endpoint: Url,
}

impl RegistrationClient {
    /// Create a client for the server at `base_url`
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidUrl` if `base_url` does not parse.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let endpoint = Url::parse(base_url)
            .and_then(|base| base.join(REGISTER_PATH))
            .map_err(|e| ClientError::InvalidUrl(e.to_string()))?;

        Ok(Self {
            client: Client::new(),
            endpoint,
        })
    }

    /// Check `draft` locally, then submit it
    ///
    /// # Errors
    ///
    /// - `ClientError::Invalid` if a local check fails (no request is sent)
    /// - `ClientError::Rejected` with the server's message on any non-2xx
    /// - `ClientError::RequestFailed` / `ClientError::ResponseParseFailed`
    ///   for transport or decoding failures
    pub async fn submit(&self, draft: &SubmissionDraft) -> Result<RegistrationResponse, ClientError> {
        draft.validate()?;

        let batch = draft.to_batch();
        tracing::debug!(participants = batch.participants.len(), "Submitting registration batch");

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&batch)
            .send()
            .await
            .map_err(|e| ClientError::RequestFailed(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::RequestFailed(e.to_string()))?;

        if status.is_success() {
            return serde_json::from_str::<RegistrationResponse>(&body)
                .map_err(|e| ClientError::ResponseParseFailed(e.to_string()));
        }

        let error: ErrorBody =
            serde_json::from_str(&body).map_err(|e| ClientError::ResponseParseFailed(e.to_string()))?;

        Err(ClientError::Rejected {
            status: status.as_u16(),
            message: error
                .message
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| GENERIC_REJECTION_MESSAGE.to_string()),
        })
    }
}
