//! Turns a `RawResponse` into an `ApiResponse<T>`.
//!
//! # Design
//! Success bodies are deserialized into the caller's type; everything else is
//! folded into a `ProblemDetails`. A server that already speaks
//! `application/problem+json` has its document passed through as-is, other
//! error bodies are wrapped in a synthesized problem so the caller always sees
//! the same shape.

use http::StatusCode;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::error::{ConsumerError, TransportError};
use crate::http::RawResponse;
use crate::problem::ProblemDetails;
use crate::response::ApiResponse;

/// Convert a raw response into a typed payload or a problem.
///
/// An empty success body is read as JSON `null`, so `()` and `Option<_>`
/// targets accept `204 No Content`.
pub fn to_with_details<T: DeserializeOwned>(
    response: RawResponse,
    cancel: &CancellationToken,
) -> Result<ApiResponse<T>, ConsumerError> {
    if cancel.is_cancelled() {
        return Err(ConsumerError::Cancelled);
    }

    if !response.is_success() {
        let problem = problem_from_error(&response);
        tracing::debug!(status = response.status, %problem, "request returned a problem");
        return Ok(ApiResponse::Problem(problem));
    }

    let body: &[u8] = if response.body.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        &response.body
    };

    match serde_json::from_slice::<T>(body) {
        Ok(payload) => Ok(ApiResponse::Payload(payload)),
        Err(err) => {
            tracing::warn!(
                status = response.status,
                error = %err,
                "response body did not match the expected type"
            );
            Ok(ApiResponse::Problem(
                ProblemDetails::new(response.status, "Invalid response body").with_detail(err.to_string()),
            ))
        }
    }
}

/// Fold a transport failure into the problem half of the outcome.
///
/// Cancellation is not a remote failure and stays an error.
pub fn transport_problem<T>(err: TransportError) -> Result<ApiResponse<T>, ConsumerError> {
    let status = match &err {
        TransportError::Cancelled => return Err(ConsumerError::Cancelled),
        TransportError::Connect(_) => StatusCode::SERVICE_UNAVAILABLE,
        TransportError::InvalidUri(_) => StatusCode::BAD_REQUEST,
        TransportError::Body(_) => StatusCode::BAD_GATEWAY,
    };
    tracing::warn!(error = %err, "transport failure");
    Ok(ApiResponse::Problem(
        ProblemDetails::new(status.as_u16(), reason(status.as_u16())).with_detail(err.to_string()),
    ))
}

fn problem_from_error(response: &RawResponse) -> ProblemDetails {
    if let Ok(mut problem) = serde_json::from_slice::<ProblemDetails>(&response.body) {
        if problem.title.is_some() || problem.detail.is_some() || problem.type_uri.is_some() {
            problem.status.get_or_insert(response.status);
            return problem;
        }
    }

    let problem = ProblemDetails::new(response.status, reason(response.status));
    let text = response.text();
    if text.trim().is_empty() {
        problem
    } else {
        problem.with_detail(text)
    }
}

fn reason(status: u16) -> &'static str {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown Status")
}
