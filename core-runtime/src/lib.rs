//! # Core Runtime Module
//!
//! Foundational runtime infrastructure for the health bridge:
//! - Logging and tracing infrastructure
//! - Configuration management
//! - Health update wire model and the live event channel
//!
//! ## Overview
//!
//! This crate holds the pieces every other core crate leans on: the
//! validated [`BridgeConfig`](config::BridgeConfig), the `tracing` setup that
//! mirrors logs into the host, and the single-subscriber channel that pushes
//! health updates to the application layer.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
