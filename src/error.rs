//! Error types surfaced by the controller.
//!
//! The `Display` text of every variant is what ends up in the error banner,
//! so wording here is user-facing.

use crate::api::Endpoint;
use serde::Deserialize;
use thiserror::Error;

/// Failure talking to the prediction API.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// The request never produced a response (offline, CORS, aborted).
    #[error("network error: {0}")]
    Network(String),
    /// The server answered with a non-2xx status.
    #[error("server responded with status {status}")]
    Rejected { status: u16, message: Option<String> },
    /// A 2xx response whose body did not match the expected shape.
    #[error("malformed response: {0}")]
    Decode(String),
}

/// Body shape the backend uses for failures: `{"error": "..."}`.
#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

impl ApiError {
    pub fn network(err: impl std::fmt::Display) -> Self {
        ApiError::Network(err.to_string())
    }

    pub fn decode(err: impl std::fmt::Display) -> Self {
        ApiError::Decode(err.to_string())
    }

    /// Build a `Rejected` error from a status code and raw response body,
    /// picking up the server's `error` field when the body carries one.
    pub fn rejected(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty());
        ApiError::Rejected { status, message }
    }

    /// Message to show the user for a failed call to `endpoint`.
    ///
    /// Server-supplied messages win; otherwise a rejection and a transport
    /// failure fall back to the endpoint's own wording.
    pub fn user_message(&self, endpoint: Endpoint) -> String {
        match self {
            ApiError::Rejected {
                message: Some(m), ..
            } => m.clone(),
            ApiError::Rejected { message: None, .. } => endpoint.rejection_fallback().to_string(),
            ApiError::Network(_) | ApiError::Decode(_) => endpoint.transport_fallback().to_string(),
        }
    }
}

/// Why a lap list could not be turned into a slider range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LapRangeError {
    #[error("No pit stop data available for this race")]
    NoLaps,
    #[error("No valid lap data available (all laps are below 1)")]
    NoValidLaps,
}

/// Reasons a prediction request is refused before it is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select year, race, and lap")]
    MissingRaceContext,
    #[error("Please select year and race")]
    MissingSeasonContext,
    #[error("Please select both chaser and defender drivers")]
    MissingDrivers,
    #[error("Chaser and defender must be different drivers")]
    SameDriver,
}
