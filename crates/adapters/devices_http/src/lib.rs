//! # geppetto-adapter-devices-http
//!
//! HTTP adapter for the two device services.
//!
//! ## Responsibilities
//! - Implement `LightPort` against the lights service
//!   (`PUT light/{name}/state/power/{on|off|toggle}`, `PUT light/{name}/state`)
//! - Implement `SwitchPort` against the switches service
//!   (`PUT device/{name}/power/{on|off|toggle}`)
//! - Treat anything but `200 OK` as a failed call and log every outcome
//!
//! Calls are made once; there is no retry.
//!
//! ## Dependency rule
//! Depends on `geppetto-app` for the port traits. The app never depends on this crate.

mod client;
pub mod error;
pub mod lights;
pub mod switches;

pub use error::HttpDeviceError;
pub use lights::HttpLights;
pub use switches::HttpSwitches;
