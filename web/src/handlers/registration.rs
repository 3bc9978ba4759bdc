//! Registration endpoint.

use crate::error::AppError;
use crate::middleware::CorrelationId;
use crate::state::AppState;
use axum::{Json, extract::State, extract::rejection::JsonRejection};
use registration_core::batch::{RegistrationBatch, RegistrationResponse};

/// Message returned with every accepted batch.
pub const SUCCESS_MESSAGE: &str =
    "Registration and validator code check succeeded. The data has been recorded.";

/// Message returned for any method other than POST.
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Method not allowed. Only POST is accepted.";

/// Validate and persist one registration batch.
///
/// # Endpoint
///
/// ```text
/// POST /api/register-participants
/// Content-Type: application/json
/// ```
///
/// # Responses
///
/// - `200 {message, recordCount}`
/// - `400` for undecodable JSON or an incomplete batch
/// - `409` for unknown, consumed, or (under the reject policy) repeated codes
/// - `500` for record store failures
///
/// # Errors
///
/// Returns `AppError` for every non-200 outcome.
pub async fn register(
    State(state): State<AppState>,
    correlation_id: CorrelationId,
    payload: Result<Json<RegistrationBatch>, JsonRejection>,
) -> Result<Json<RegistrationResponse>, AppError> {
    let Json(batch) = payload.inspect_err(|rejection| {
        tracing::warn!(%correlation_id, error = %rejection.body_text(), "Rejected undecodable body");
    })?;

    let receipt = state.processor.register(batch).await?;

    tracing::debug!(
        %correlation_id,
        billing_key = %receipt.billing_key,
        "Registration batch stored"
    );

    Ok(Json(RegistrationResponse {
        message: SUCCESS_MESSAGE.to_string(),
        record_count: receipt.record_count,
    }))
}

/// Fallback for every non-POST method on the registration path.
///
/// # Errors
///
/// Always returns 405 with `Allow: POST`.
#[allow(clippy::unused_async)]
pub async fn method_not_allowed() -> AppError {
    AppError::method_not_allowed(METHOD_NOT_ALLOWED_MESSAGE, "POST")
}
