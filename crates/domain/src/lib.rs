//! # geppetto-domain
//!
//! Pure domain model for the geppetto event scheduler.
//!
//! ## Responsibilities
//! - Foundational types: wall-clock times, timestamps, error conventions
//! - Define **Triggers** (weekly events and daily time windows)
//! - Define the **schedule configuration** shape consumed by the registry
//! - Evaluate **time windows**, including windows that wrap past midnight
//! - Compute **solar altitude** and map it onto a light temperature and brightness
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod time;

pub mod config;
pub mod solar;
pub mod trigger;
pub mod window;
