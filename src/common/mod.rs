//! Common types and utilities shared by the generator, the style registry and
//! the output sinks.

// Submodule declarations
pub mod error;
pub mod unit;
pub mod xml;

// Re-exports for convenience
pub use error::{Error, Result};
pub use unit::{Unit, format_number};
