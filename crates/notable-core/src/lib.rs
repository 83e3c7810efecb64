//! # notable-core
//!
//! Core types, traits, and abstractions for the notable service.
//!
//! This crate provides the domain models, repository traits, and error
//! type that the other notable crates depend on.

pub mod error;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use traits::*;
