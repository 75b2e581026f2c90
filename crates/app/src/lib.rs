//! # geppetto-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `Clock`: local wall-clock time and UTC instants
//!   - `LightPort`: power and state calls against the lights service
//!   - `SwitchPort`: power calls against the switches service
//! - Turn configuration into triggers (`TriggerRegistry`)
//! - Keep track of when each trigger is next due (`JobQueue`)
//! - Run the polling loop and dispatch to host handlers (`Scheduler`)
//! - Provide the stock handler bodies (`Actions`)
//!
//! ## Dependency rule
//! Depends on `geppetto-domain` only (plus `tokio` for the background task).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod actions;
pub mod clock;
pub mod handlers;
pub mod job_queue;
pub mod ports;
pub mod registry;
pub mod scheduler;
