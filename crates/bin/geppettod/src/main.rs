//! # geppettod, the geppetto daemon
//!
//! Composition root that wires all adapters together and starts the
//! scheduler and the HTTP server.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Install the `tracing` subscriber
//! - Construct the lights and switches HTTP clients (adapters)
//! - Build the trigger registry and bind the stock actions to every handler slot
//! - Start the scheduler loop on a background task
//! - Build the axum router and serve it
//! - Handle graceful shutdown (SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;

use std::sync::Arc;

use geppetto_adapter_devices_http::{HttpLights, HttpSwitches};
use geppetto_adapter_http_axum::router;
use geppetto_adapter_http_axum::state::{AppState, ServiceInfo};
use geppetto_app::actions::{Actions, Inventory};
use geppetto_app::clock::SystemClock;
use geppetto_app::handlers::HandlerTable;
use geppetto_app::registry::TriggerRegistry;
use geppetto_app::scheduler::Scheduler;
use geppetto_domain::solar::Spa;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    // Device services
    let lights = HttpLights::new(&config.services.light)?;
    let switches = HttpSwitches::new(&config.services.switch)?;

    // Triggers and handlers
    let registry = Arc::new(TriggerRegistry::build(&config.schedule));
    let actions = Arc::new(Actions::new(
        lights,
        switches,
        Inventory::new(config.lights.clone(), config.switches.clone()),
        config.schedule.location,
        Spa,
        SystemClock,
    ));
    let mut handlers = HandlerTable::new();
    Actions::bind(&actions, &mut handlers);

    let scheduler = Scheduler::new(Arc::clone(&registry), handlers, SystemClock).start()?;

    // HTTP
    let state = AppState::new(
        ServiceInfo {
            name: "Geppetto".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        registry,
    );
    let app = router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, "geppettod listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.abort();
    scheduler.join().await?;
    tracing::info!("geppettod stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
