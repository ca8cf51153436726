//! Scheme-based dispatch of credential values to secret providers.

use crate::cache::SecretCache;
use crate::core::{Result, SecretError, SecretUri};
use crate::providers::SecretProvider;
use crate::resolver::ResolverBuilder;
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;

/// Resolves credential values that may be literal secrets or URI references.
///
/// Each process constructs and owns its own resolver (and cache); there is
/// no global registry, so tests stay isolated and no timer leaks across
/// instances. Call [`destroy`](Self::destroy) during shutdown to release the
/// cache's background sweep.
pub struct SecretResolver {
    cache: SecretCache,
    providers: DashMap<String, Arc<dyn SecretProvider>>,
}

impl SecretResolver {
    /// Builder with the default cache configuration.
    pub fn builder() -> ResolverBuilder {
        ResolverBuilder::new()
    }

    pub(crate) fn with_cache(cache: SecretCache) -> Self {
        Self {
            cache,
            providers: DashMap::new(),
        }
    }

    /// Register a provider under its scheme.
    ///
    /// Registering a second provider for the same scheme silently replaces
    /// the first (last registration wins).
    pub fn register_provider(&self, provider: Arc<dyn SecretProvider>) {
        tracing::info!(scheme = provider.scheme(), "Registered secret provider");
        self.providers.insert(provider.scheme().to_string(), provider);
    }

    /// Schemes with a registered provider.
    pub fn schemes(&self) -> Vec<String> {
        self.providers.iter().map(|e| e.key().clone()).collect()
    }

    /// Resolve a raw credential value.
    ///
    /// Values without the `scheme://` shape are literal secrets and are
    /// returned unchanged, with no cache lookup and no provider call. A
    /// URI-shaped value is dispatched to the provider registered for its
    /// scheme, with the resolved value cached under the full raw string so
    /// references differing only in query parameters get distinct entries.
    ///
    /// Concurrent misses on the same key may each call the provider (no
    /// single-flight de-duplication); provider reads are idempotent, so this
    /// costs a duplicate fetch, not correctness.
    pub async fn resolve(&self, raw: &str) -> Result<String> {
        if !SecretUri::looks_like_reference(raw) {
            return Ok(raw.to_string());
        }

        let uri = SecretUri::parse(raw)?;
        let ttl = uri.ttl_override()?;

        let provider = self
            .providers
            .get(uri.scheme())
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| SecretError::UnknownScheme {
                scheme: uri.scheme().to_string(),
            })?;

        if let Some(value) = self.cache.get(raw) {
            tracing::debug!(scheme = uri.scheme(), path = uri.path(), "Secret cache hit");
            return Ok(value);
        }

        // Miss: fetch from the backend. Failures propagate unchanged and are
        // never cached.
        let value = provider.resolve(&uri).await?;
        self.cache.set(raw, value.clone(), ttl);

        tracing::debug!(scheme = uri.scheme(), path = uri.path(), "Resolved secret reference");
        Ok(value)
    }

    /// Resolve every field of a connector's credential map.
    ///
    /// Plain values pass through, references resolve; the first failure
    /// aborts and surfaces to the caller.
    pub async fn resolve_map(
        &self,
        fields: &HashMap<String, String>,
    ) -> Result<HashMap<String, String>> {
        let mut resolved = HashMap::with_capacity(fields.len());
        for (name, value) in fields {
            resolved.insert(name.clone(), self.resolve(value).await?);
        }
        Ok(resolved)
    }

    /// The value cache (exposed for inspection and tests).
    pub fn cache(&self) -> &SecretCache {
        &self.cache
    }

    /// Release the cache's background sweep. Idempotent; call at shutdown.
    pub fn destroy(&self) {
        self.cache.destroy();
    }
}
