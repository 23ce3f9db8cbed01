//! Test utilities shared across the credkit workspace
//!
//! This crate provides common testing infrastructure including:
//! - XDG and backend environment isolation ([`EnvTestGuard`])
//! - Configuration directory fixtures ([`ConfigDirsTestGuard`])
//! - Scripted permission policies ([`ScriptedPolicy`])
//!
//! The clippy dead_code lint is disabled for this crate because test utilities
//! may not be used by all tests, and the compiler cannot detect usage across
//! crate boundaries in development dependencies.

#![allow(dead_code)]

pub mod config;
pub mod env;
pub mod policy;

// Re-export commonly used items
pub use config::ConfigDirsTestGuard;
pub use env::EnvTestGuard;
pub use policy::ScriptedPolicy;
