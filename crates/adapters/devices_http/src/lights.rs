//! Lights service client.

use geppetto_app::ports::{DeviceError, LightPort, LightState};

use crate::client::ServiceClient;
use crate::error::HttpDeviceError;

/// Media type accepted by the light endpoints.
pub const LIGHT_MEDIA_TYPE: &str = "application/se.novafaen.prism.light.v1+json";
/// Media type of a light state update body.
pub const LIGHT_STATE_MEDIA_TYPE: &str = "application/se.novafaen.prism.lightstate.v1+json";

/// [`LightPort`] backed by the lights REST service.
#[derive(Debug, Clone)]
pub struct HttpLights {
    client: ServiceClient,
}

impl HttpLights {
    /// Talk to the lights service at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpDeviceError::InvalidBaseUrl`] if `base_url` is not an
    /// absolute http(s) URL.
    pub fn new(base_url: &str) -> Result<Self, HttpDeviceError> {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Same as [`HttpLights::new`] with a caller-supplied reqwest client.
    ///
    /// # Errors
    ///
    /// See [`HttpLights::new`].
    pub fn with_client(http: reqwest::Client, base_url: &str) -> Result<Self, HttpDeviceError> {
        Ok(Self {
            client: ServiceClient::new(http, base_url)?,
        })
    }

    async fn power(&self, light: &str, command: &str) -> Result<(), DeviceError> {
        tracing::debug!(light, command, "light power");
        self.client
            .put(
                &["light", light, "state", "power", command],
                Some(LIGHT_MEDIA_TYPE),
                None,
            )
            .await
            .map_err(DeviceError::from)
    }
}

impl LightPort for HttpLights {
    async fn power_on(&self, light: &str) -> Result<(), DeviceError> {
        self.power(light, "on").await
    }

    async fn power_off(&self, light: &str) -> Result<(), DeviceError> {
        self.power(light, "off").await
    }

    async fn toggle_power(&self, light: &str) -> Result<(), DeviceError> {
        self.power(light, "toggle").await
    }

    async fn set_state(&self, light: &str, state: &LightState) -> Result<(), DeviceError> {
        tracing::debug!(light, ?state, "light state");
        self.client
            .put(
                &["light", light, "state"],
                Some(LIGHT_MEDIA_TYPE),
                Some((LIGHT_STATE_MEDIA_TYPE, state)),
            )
            .await
            .map_err(DeviceError::from)
    }
}
