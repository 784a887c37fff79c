//! Device tier HTTP client
//!
//! Pulls a file from an operator-hosted device server with a hard per-attempt
//! timeout. Every transport condition (timeout, refused connection, non-2xx,
//! empty body) comes back as an explicit [`TierError`] for the resolver's loop to
//! consume; there are no retries inside a single attempt.

use arsip_core::config::DEVICE_FETCH_TIMEOUT;
use arsip_core::FileCategory;
use bytes::Bytes;

use crate::traits::{TierError, TierResult};

#[derive(Clone)]
pub struct DeviceClient {
    client: reqwest::Client,
}

impl DeviceClient {
    /// Build a client with the fixed 5-second attempt timeout.
    pub fn new() -> TierResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(DEVICE_FETCH_TIMEOUT)
            .build()
            .map_err(|e| TierError::Backend(e.to_string()))?;
        Ok(Self { client })
    }

    /// Request `(filename, category)` from one device. A wedged or unreachable
    /// device surfaces here as `Timeout`/`Refused` and is simply absent for the
    /// current resolution.
    pub async fn fetch(
        &self,
        device_url: &str,
        filename: &str,
        category: FileCategory,
    ) -> TierResult<Bytes> {
        let response = self
            .client
            .get(device_url)
            .query(&[("file", filename), ("type", category.as_str())])
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TierError::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(map_transport_error)?;
        if body.is_empty() {
            return Err(TierError::EmptyBody);
        }

        Ok(body)
    }
}

fn map_transport_error(e: reqwest::Error) -> TierError {
    if e.is_timeout() {
        TierError::Timeout
    } else if e.is_connect() {
        TierError::Refused(e.to_string())
    } else {
        TierError::Backend(e.to_string())
    }
}
