//! Device ports: the lights and switches services.
//!
//! Both services are addressed by device name. Every call is a single
//! request with no retry; implementations log the outcome themselves and
//! callers treat the result as informational.

use std::future::Future;

use serde::Serialize;

/// Target state for a light. Unset fields are left untouched by the service.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LightState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kelvin: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Transition time in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
}

/// Failure talking to a device service.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    /// The request could not be sent or the response could not be read.
    #[error("device service unreachable")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The service answered with something other than `200 OK`.
    #[error("device service responded with status {0}")]
    Status(u16),
}

/// Commands understood by the lights service.
pub trait LightPort: Send + Sync {
    fn power_on(&self, light: &str) -> impl Future<Output = Result<(), DeviceError>> + Send;

    fn power_off(&self, light: &str) -> impl Future<Output = Result<(), DeviceError>> + Send;

    fn toggle_power(&self, light: &str) -> impl Future<Output = Result<(), DeviceError>> + Send;

    /// Apply the provided fields of `state` to `light`.
    fn set_state(
        &self,
        light: &str,
        state: &LightState,
    ) -> impl Future<Output = Result<(), DeviceError>> + Send;
}

/// Commands understood by the switches service.
pub trait SwitchPort: Send + Sync {
    fn power_on(&self, device: &str) -> impl Future<Output = Result<(), DeviceError>> + Send;

    fn power_off(&self, device: &str) -> impl Future<Output = Result<(), DeviceError>> + Send;

    fn toggle_power(&self, device: &str) -> impl Future<Output = Result<(), DeviceError>> + Send;
}
