//! rprompt - turn an image into a reusable generation prompt.
//!
//! This library provides the pieces behind the rprompt CLI: a terminal
//! spinner that stays out of the way of a blocking call, a Gemini vision
//! client, and the configuration and output handling around them.

#![deny(missing_docs)]

/// Version string from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod config;
pub mod feedback;
pub mod vision;

// Re-export key types for convenience
pub use feedback::{Spinner, SpinnerConfig};
pub use vision::{VisionError, VisionModel};
