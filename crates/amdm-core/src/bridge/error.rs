//! Bridge error taxonomy.

use thiserror::Error;

/// Failure of one backend round-trip.
///
/// Every variant renders a human-readable message; callers surface it
/// inline (a notification or a status line) and never retry on their own.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The backend processed the request and reported a failure.
    #[error("backend error: {0}")]
    Backend(String),
    /// The request never completed a round-trip (socket, framing, encoding).
    #[error("transport error: {0}")]
    Transport(String),
    #[error("backend request timed out")]
    Timeout,
    #[error("backend disconnected")]
    Disconnected,
}
