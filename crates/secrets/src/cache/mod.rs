//! TTL cache for resolved secret values.
//!
//! [`SecretCache`] caches *values*; backend providers keep their own caches
//! of *connections* (see [`crate::providers`]). The two are independent.

mod config;
mod memory;

pub use config::{CacheConfig, ConfigError};
pub use memory::{CacheStats, SecretCache};
