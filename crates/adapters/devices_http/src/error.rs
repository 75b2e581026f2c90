//! HTTP device adapter error types.

use geppetto_app::ports::DeviceError;
use reqwest::StatusCode;

/// Errors specific to the HTTP device adapter.
#[derive(Debug, thiserror::Error)]
pub enum HttpDeviceError {
    /// The configured service URL is not an absolute http(s) URL.
    #[error("invalid service url {0:?}")]
    InvalidBaseUrl(String),

    /// The device name cannot be used as a single URL path segment.
    #[error("invalid device name {0:?}")]
    InvalidDeviceName(String),

    /// The request could not be sent or no response came back.
    #[error("device service request failed")]
    Request(#[source] reqwest::Error),

    /// The service answered with something other than `200 OK`.
    #[error("device service responded with {0}")]
    Status(StatusCode),
}

impl From<HttpDeviceError> for DeviceError {
    fn from(err: HttpDeviceError) -> Self {
        match err {
            HttpDeviceError::Status(status) => DeviceError::Status(status.as_u16()),
            other => DeviceError::Transport(Box::new(other)),
        }
    }
}
