//! Module initialization.
//!
//! Each boxtally crate is initialized here from the loaded configuration
//! and registered into the core
//! [`PluginRegistry`](boxtally_core::plugin::PluginRegistry) by the
//! orchestrator.

pub mod scan_pipeline;
