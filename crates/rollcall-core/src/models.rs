//! Domain models for Rollcall.
//!
//! These are the core types shared across all crates.

pub mod attendance;
pub mod claim;
pub mod reason;
pub mod session;
