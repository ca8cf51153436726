//! Core types shared across the crate.

mod error;
mod uri;

pub use error::{Result, SecretError};
pub use uri::SecretUri;
