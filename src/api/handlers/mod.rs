// src/api/handlers/mod.rs
mod health;
mod visualize;

pub use health::health_check;
pub use visualize::{method_not_allowed, relay_visualize, RELAY_FAILURE_MESSAGE};
