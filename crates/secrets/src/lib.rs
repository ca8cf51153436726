//! Toolbridge Secrets
//!
//! Secret resolution and caching for connector credentials.
//!
//! A credential field in a connector's configuration is either a literal
//! secret value or a URI referencing an external secret store
//! (`ssm:///service/api-key?region=us-east-1`). [`SecretResolver`] hides the
//! difference: plain strings pass through unchanged, URIs are dispatched to
//! the provider registered for their scheme, and resolved values are cached
//! with a TTL so repeated credential loads do not hammer the backend.
//!
//! # Features
//!
//! - **Plain-value passthrough** - existing literal credentials keep working
//! - **Scheme-based provider dispatch** - one provider per secret backend
//! - **TTL caching with background sweep** - per-reference `ttl` override
//! - **Descriptive failures** - errors name the offending path or scheme

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![forbid(unsafe_code)]

/// TTL cache for resolved secret values
pub mod cache;
/// Core types, errors, and the secret URI grammar
pub mod core;
/// Secret backend providers
pub mod providers;
/// Resolver - single entry point for credential-loading code
pub mod resolver;

// Root re-exports for the common path.
pub use crate::cache::{CacheConfig, CacheStats, ConfigError, SecretCache};
pub use crate::core::{Result, SecretError, SecretUri};
pub use crate::providers::{MemoryProvider, SecretProvider};
#[cfg(feature = "provider-ssm")]
pub use crate::providers::{SsmProvider, SsmProviderConfig};
pub use crate::resolver::{ResolverBuilder, SecretResolver};

/// Commonly used types and traits
pub mod prelude {
    pub use crate::cache::{CacheConfig, SecretCache};
    pub use crate::core::{Result, SecretError, SecretUri};
    pub use crate::providers::{MemoryProvider, SecretProvider};
    #[cfg(feature = "provider-ssm")]
    pub use crate::providers::{SsmProvider, SsmProviderConfig};
    pub use crate::resolver::{ResolverBuilder, SecretResolver};
    pub use async_trait::async_trait;
}
