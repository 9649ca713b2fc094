//! Signoff RPC - CLI orchestrator
//!
//! This crate provides the `signoff` binary and command orchestration.

pub mod commands;
pub mod context;

pub use context::AppContext;
