//! Data models
//!
//! Rust structs representing persisted unit table registrations.

mod custom_factor;
mod custom_unit;

pub use custom_factor::CustomFactor;
pub use custom_unit::CustomUnit;
