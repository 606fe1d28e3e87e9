//! Domain models for the Dietly platform.
//!
//! These are the core types shared across all crates.

pub mod dietitian;
pub mod patient;
pub mod tenant;
pub mod user;
