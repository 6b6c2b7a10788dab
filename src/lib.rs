//! Workspace placeholder crate.
//!
//! This crate exists to expose shared feature flags that map to the individual
//! workspace crates. Host applications can depend on `terra-bridge-workspace`
//! and enable the documented features without wiring each crate individually.

#[cfg(feature = "desktop-shims")]
pub use core_service::*;
