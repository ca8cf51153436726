//! In-memory secret provider.
//!
//! Backed by a plain map, with failure injection and a resolve-call counter.
//! Useful for connector tests and local development where no real secret
//! backend is available.

use crate::core::{Result, SecretError, SecretUri};
use crate::providers::{SecretProvider, normalize_path};
use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use std::sync::atomic::{AtomicU64, Ordering};

/// Map-backed provider for tests and local development.
pub struct MemoryProvider {
    scheme: &'static str,
    values: DashMap<String, String>,
    denied: DashSet<String>,
    calls: AtomicU64,
}

impl MemoryProvider {
    /// Create an empty provider with scheme `"mem"`.
    pub fn new() -> Self {
        Self::with_scheme("mem")
    }

    /// Create an empty provider with a custom scheme.
    pub fn with_scheme(scheme: &'static str) -> Self {
        Self {
            scheme,
            values: DashMap::new(),
            denied: DashSet::new(),
            calls: AtomicU64::new(0),
        }
    }

    /// Store a secret under a path (normalized to absolute form).
    pub fn insert(&self, path: &str, value: impl Into<String>) {
        self.values.insert(normalize_path(path), value.into());
    }

    /// Make resolution of a path fail with access denied.
    pub fn deny(&self, path: &str) {
        self.denied.insert(normalize_path(path));
    }

    /// How many times `resolve` has been called.
    pub fn resolve_calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }
}

impl Default for MemoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SecretProvider for MemoryProvider {
    fn scheme(&self) -> &'static str {
        self.scheme
    }

    async fn resolve(&self, uri: &SecretUri) -> Result<String> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let path = normalize_path(uri.path());

        if self.denied.contains(&path) {
            return Err(SecretError::AccessDenied { path });
        }

        self.values
            .get(&path)
            .map(|entry| entry.value().clone())
            .ok_or(SecretError::NotFound { path })
    }
}
