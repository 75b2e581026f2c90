//! Shared application state for axum handlers.

use std::sync::Arc;

use geppetto_app::registry::TriggerRegistry;

/// Name and version reported by `/status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            name: "Geppetto".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Application state shared across all axum handlers.
///
/// Cloning only bumps the `Arc` counts.
#[derive(Debug, Clone)]
pub struct AppState {
    pub info: Arc<ServiceInfo>,
    /// The same registry the scheduler was built from.
    pub registry: Arc<TriggerRegistry>,
}

impl AppState {
    pub fn new(info: ServiceInfo, registry: Arc<TriggerRegistry>) -> Self {
        Self {
            info: Arc::new(info),
            registry,
        }
    }
}
