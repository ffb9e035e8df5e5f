//! Device push hand-off to an external gateway.
//!
//! [`PushDelivery`] POSTs a JSON-encoded [`ActivityEvent`] to the push
//! gateway (the APNs/FCM fan-out lives behind it). Failed attempts are
//! retried up to three times with exponential backoff (1 s, 2 s, 4 s);
//! after that the push is abandoned — the in-app record is the durable
//! copy.

use std::time::Duration;

use clipflow_core::types::DbId;

use crate::bus::ActivityEvent;

/// Retry delays in seconds (exponential backoff: 1s, 2s, 4s).
const RETRY_DELAYS_SECS: [u64; 3] = [1, 2, 4];

/// HTTP request timeout for a single delivery attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for push delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum PushError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The gateway returned a non-2xx status code.
    #[error("Push gateway returned HTTP {0}")]
    HttpStatus(u16),
}

// ---------------------------------------------------------------------------
// PushDelivery
// ---------------------------------------------------------------------------

/// Delivers activity events to the device push gateway.
pub struct PushDelivery {
    client: reqwest::Client,
    gateway_url: String,
}

impl PushDelivery {
    /// Create a new delivery service targeting the given gateway URL.
    pub fn new(gateway_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            client,
            gateway_url: gateway_url.into(),
        }
    }

    /// Load the gateway URL from `PUSH_GATEWAY_URL`.
    ///
    /// Returns `None` when the variable is not set, signalling that the
    /// push channel is not configured and should be skipped.
    pub fn from_env() -> Option<Self> {
        let url = std::env::var("PUSH_GATEWAY_URL").ok()?;
        Some(Self::new(url))
    }

    /// Deliver an event for a user to the gateway with retry.
    ///
    /// Retries up to 3 times with exponential backoff before giving up.
    /// Returns `Ok(())` on the first successful attempt.
    pub async fn deliver(&self, user_id: DbId, event: &ActivityEvent) -> Result<(), PushError> {
        let payload = serde_json::json!({
            "user_id": user_id,
            "notification_type": event.notification_type,
            "title": event.title,
            "message": event.message,
            "thumbnail_ref": event.thumbnail_ref,
            "action_ref": event.action_ref,
            "timestamp": event.timestamp,
        });

        let mut last_err: Option<PushError> = None;

        for (attempt, delay_secs) in RETRY_DELAYS_SECS.iter().enumerate() {
            match self.try_send(&payload).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    tracing::warn!(
                        attempt = attempt + 1,
                        user_id,
                        error = %e,
                        "Push delivery attempt failed, retrying"
                    );
                    last_err = Some(e);
                    tokio::time::sleep(Duration::from_secs(*delay_secs)).await;
                }
            }
        }

        // Final attempt after the last backoff.
        match self.try_send(&payload).await {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::error!(user_id, error = %e, "Push delivery failed after all retries");
                Err(last_err.unwrap_or(e))
            }
        }
    }

    /// Execute a single POST request and check the response status.
    async fn try_send(&self, payload: &serde_json::Value) -> Result<(), PushError> {
        let response = self
            .client
            .post(&self.gateway_url)
            .json(payload)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(PushError::HttpStatus(response.status().as_u16()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_does_not_panic() {
        let _delivery = PushDelivery::new("http://localhost:9999/push");
    }

    #[test]
    fn from_env_returns_none_without_gateway_url() {
        std::env::remove_var("PUSH_GATEWAY_URL");
        assert!(PushDelivery::from_env().is_none());
    }

    #[test]
    fn push_error_display_http_status() {
        let err = PushError::HttpStatus(502);
        assert_eq!(err.to_string(), "Push gateway returned HTTP 502");
    }

    #[test]
    fn push_error_display_request() {
        // Build a reqwest error from an invalid URL.
        let req_err = reqwest::Client::new().get("://bad").build().unwrap_err();
        let err = PushError::Request(req_err);
        assert!(err.to_string().contains("HTTP request failed"));
    }
}
