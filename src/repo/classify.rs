//! Turns a raw transport outcome into a [`ResultState`].
//!
//! Rules, first match wins:
//! 1. transport failure (unreachable host, timeout, I/O) → `InternetError`
//! 2. status 500..=599 → `InternalServerError`
//! 3. 2xx with a present payload → `Success`
//! 4. 2xx without a payload → `NoDataFound`
//! 5. anything else → `Failed`

use crate::state::ResultState;
use cattle_api::{ApiEnvelope, ApiResponse, RawResponse, TransportError};
use serde::de::{DeserializeOwned, IgnoredAny};

pub fn classify<T: DeserializeOwned>(
    outcome: Result<RawResponse, TransportError>,
) -> ResultState<ApiResponse<T>> {
    let response = match outcome {
        Ok(response) => response,
        Err(e) if e.is_unreachable() => return ResultState::InternetError,
        Err(e) => return ResultState::Failed(format!("Unexpected error: {}", e)),
    };

    match response.status {
        500..=599 => ResultState::InternalServerError(format!("Server error: {}", response.status)),
        200..=299 => classify_body(&response.body),
        status => ResultState::Failed(format!(
            "API Error: {} - {}",
            status,
            failure_message(&response)
        )),
    }
}

fn classify_body<T: DeserializeOwned>(body: &[u8]) -> ResultState<ApiResponse<T>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return ResultState::NoDataFound;
    }

    // `null` at the top level or in the envelope's body both mean "no payload"
    match serde_json::from_slice::<Option<ApiEnvelope<T>>>(body) {
        Ok(Some(envelope)) => match envelope.into_response() {
            Some(response) => ResultState::Success(response),
            None => ResultState::NoDataFound,
        },
        Ok(None) => ResultState::NoDataFound,
        Err(e) => ResultState::Failed(format!("Unexpected error: malformed response body: {}", e)),
    }
}

/// The server's own message when the error body carries one, else the reason phrase
fn failure_message(response: &RawResponse) -> String {
    serde_json::from_slice::<ApiEnvelope<IgnoredAny>>(&response.body)
        .ok()
        .and_then(|envelope| envelope.message)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| response.reason.clone())
}
