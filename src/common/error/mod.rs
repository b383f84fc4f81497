//! Unified error types for odfgen.
//!
//! Structural problems in the incoming event stream are never reported through
//! this type: they are logged and repaired by the generator. Only conditions
//! that stop a conversion (I/O, rejected input, misuse) become an [`Error`].

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use types::{Error, Result};
