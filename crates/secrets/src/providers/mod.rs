//! Secret backend providers.
//!
//! A provider resolves one [`SecretUri`] to a concrete secret string by
//! calling an external secret backend. Providers are registered on a
//! [`SecretResolver`](crate::resolver::SecretResolver) keyed by URI scheme.

use crate::core::{Result, SecretUri};
use async_trait::async_trait;

mod memory;
#[cfg(feature = "provider-ssm")]
mod ssm;

pub use memory::MemoryProvider;
#[cfg(feature = "provider-ssm")]
pub use ssm::{SsmProvider, SsmProviderConfig};

/// Capability implemented once per external secret backend.
#[async_trait]
pub trait SecretProvider: Send + Sync {
    /// URI scheme this provider handles (e.g. `"ssm"`).
    fn scheme(&self) -> &'static str;

    /// Resolve a parsed reference to its secret value.
    ///
    /// Fails with a descriptive [`SecretError`](crate::core::SecretError)
    /// naming the path on not-found/access-denied/invalid-key conditions;
    /// any other backend failure propagates with its original message.
    async fn resolve(&self, uri: &SecretUri) -> Result<String>;
}

/// Normalize a backend path to absolute form.
///
/// A convenience for backends with absolute path namespaces, not a security
/// boundary.
pub(crate) fn normalize_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_prefixes_missing_slash() {
        assert_eq!(normalize_path("service/api-key"), "/service/api-key");
        assert_eq!(normalize_path("/service/api-key"), "/service/api-key");
    }
}
