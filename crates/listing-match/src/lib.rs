//! Listing match and filter engine for a real-estate catalog.
//!
//! The [`catalog`] module holds the pure filter/sort pipeline, the demand
//! matcher and the notification emitter, plus the store traits and the
//! service that wires them into the listing publication flow.

pub mod catalog;
pub mod config;
pub mod error;
pub mod telemetry;
