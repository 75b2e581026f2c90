//! Switches service client.

use geppetto_app::ports::{DeviceError, SwitchPort};

use crate::client::ServiceClient;
use crate::error::HttpDeviceError;

/// Media type accepted by the switch power endpoints.
pub const DEVICE_MEDIA_TYPE: &str = "application/se.novafaen.stick.device.v1+json";

/// [`SwitchPort`] backed by the switches REST service.
#[derive(Debug, Clone)]
pub struct HttpSwitches {
    client: ServiceClient,
}

impl HttpSwitches {
    /// # Errors
    ///
    /// Returns [`HttpDeviceError::InvalidBaseUrl`] if `base_url` is not an
    /// absolute http(s) URL.
    pub fn new(base_url: &str) -> Result<Self, HttpDeviceError> {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// # Errors
    ///
    /// See [`HttpSwitches::new`].
    pub fn with_client(http: reqwest::Client, base_url: &str) -> Result<Self, HttpDeviceError> {
        Ok(Self {
            client: ServiceClient::new(http, base_url)?,
        })
    }

    async fn power(&self, device: &str, command: &str) -> Result<(), DeviceError> {
        tracing::debug!(device, command, "switch power");
        self.client
            .put(
                &["device", device, "power", command],
                Some(DEVICE_MEDIA_TYPE),
                None,
            )
            .await
            .map_err(DeviceError::from)
    }
}

impl SwitchPort for HttpSwitches {
    async fn power_on(&self, device: &str) -> Result<(), DeviceError> {
        self.power(device, "on").await
    }

    async fn power_off(&self, device: &str) -> Result<(), DeviceError> {
        self.power(device, "off").await
    }

    async fn toggle_power(&self, device: &str) -> Result<(), DeviceError> {
        self.power(device, "toggle").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn should_put_power_commands() {
        let server = MockServer::start().await;
        for command in ["on", "off", "toggle"] {
            Mock::given(method("PUT"))
                .and(path(format!("/device/coffee/power/{command}")))
                .and(header("accept", DEVICE_MEDIA_TYPE))
                .respond_with(ResponseTemplate::new(200))
                .expect(1)
                .mount(&server)
                .await;
        }

        let switches = HttpSwitches::new(&server.uri()).unwrap();
        switches.power_on("coffee").await.unwrap();
        switches.power_off("coffee").await.unwrap();
        switches.toggle_power("coffee").await.unwrap();
    }

    #[tokio::test]
    async fn should_report_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/device/fan/power/on"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let switches = HttpSwitches::new(&server.uri()).unwrap();
        let err = switches.power_on("fan").await.unwrap_err();

        assert!(matches!(err, DeviceError::Status(503)));
    }
}
