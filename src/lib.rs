//! # Credkit
//!
//! Facade over [`credkit_core`]: credentials with protected, permission-gated
//! passwords, and generic identity and principal types.

pub use credkit_core::*;
