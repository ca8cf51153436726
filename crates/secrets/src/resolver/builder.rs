//! Builder for [`SecretResolver`].

use crate::cache::{CacheConfig, ConfigError, SecretCache};
use crate::providers::SecretProvider;
use crate::resolver::SecretResolver;
use std::sync::Arc;

/// Builder for [`SecretResolver`]
pub struct ResolverBuilder {
    cache_config: CacheConfig,
    providers: Vec<Arc<dyn SecretProvider>>,
}

impl ResolverBuilder {
    /// Create a builder with the default cache configuration and no
    /// providers.
    pub fn new() -> Self {
        Self {
            cache_config: CacheConfig::default(),
            providers: Vec::new(),
        }
    }

    /// Set the cache configuration.
    pub fn with_cache_config(mut self, config: CacheConfig) -> Self {
        self.cache_config = config;
        self
    }

    /// Register a provider (may be called multiple times).
    pub fn with_provider(mut self, provider: Arc<dyn SecretProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Build the resolver.
    pub fn build(self) -> Result<SecretResolver, ConfigError> {
        let cache = SecretCache::new(self.cache_config)?;
        let resolver = SecretResolver::with_cache(cache);
        for provider in self.providers {
            resolver.register_provider(provider);
        }
        Ok(resolver)
    }
}

impl Default for ResolverBuilder {
    fn default() -> Self {
        Self::new()
    }
}
