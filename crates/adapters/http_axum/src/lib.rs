//! # geppetto-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Answer liveness probes on `/health`
//! - Report the service name and version on `/status`
//! - Expose the registered weekly and window triggers as JSON under `/api`
//!
//! The API is read-only. Triggers come from configuration and are fixed
//! for the lifetime of the process.
//!
//! ## Dependency rule
//! Depends on `geppetto-app` (for the trigger registry) and `geppetto-domain`
//! (for trigger types used in response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod router;
pub mod state;
