//! Error types for secret resolution
//!
//! Every failure surfaces synchronously to the caller of
//! [`resolve`](crate::resolver::SecretResolver::resolve); nothing is retried
//! or logged-and-suppressed inside this crate, and a failed resolution never
//! populates the cache. Messages name the offending path or scheme so a
//! misconfigured secret reference can be diagnosed from the error alone.

use thiserror::Error;

/// Result type alias for secret resolution operations
pub type Result<T> = std::result::Result<T, SecretError>;

/// Errors produced while resolving a secret reference
#[derive(Debug, Error)]
pub enum SecretError {
    /// The reference is URI-shaped but malformed, or carries a bad parameter
    #[error("Invalid secret reference '{uri}': {reason}")]
    InvalidUri {
        /// The offending reference, verbatim
        uri: String,
        /// What was wrong with it
        reason: String,
    },

    /// The reference parses but no provider is registered for its scheme
    #[error("No provider registered for scheme '{scheme}'")]
    UnknownScheme {
        /// The unrecognized scheme
        scheme: String,
    },

    /// The backend has no value at the given path or version
    #[error("Secret '{path}' not found")]
    NotFound {
        /// Backend-specific locator
        path: String,
    },

    /// The backend rejected the request due to permissions
    #[error("Access denied for secret '{path}'")]
    AccessDenied {
        /// Backend-specific locator
        path: String,
    },

    /// The backend rejected the encryption/decryption key reference
    #[error("Invalid key for secret '{path}'")]
    InvalidKey {
        /// Backend-specific locator
        path: String,
    },

    /// Any other backend failure, with the backend's own message intact
    #[error("Backend error from '{scheme}' provider: {message}")]
    Backend {
        /// Scheme of the provider that failed
        scheme: String,
        /// The backend's original message, never replaced with a generic one
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_path() {
        let err = SecretError::NotFound {
            path: "/service/api-key".to_string(),
        };
        assert_eq!(err.to_string(), "Secret '/service/api-key' not found");
    }

    #[test]
    fn unknown_scheme_names_scheme() {
        let err = SecretError::UnknownScheme {
            scheme: "vault".to_string(),
        };
        assert!(err.to_string().contains("vault"));
    }

    #[test]
    fn backend_error_keeps_original_message() {
        let err = SecretError::Backend {
            scheme: "ssm".to_string(),
            message: "Rate exceeded (ThrottlingException)".to_string(),
        };
        assert!(err.to_string().contains("Rate exceeded (ThrottlingException)"));
    }

    #[test]
    fn invalid_uri_names_reference_and_reason() {
        let err = SecretError::InvalidUri {
            uri: "ssm:///x?ttl=soon".to_string(),
            reason: "parameter 'ttl' must be an integer, got 'soon'".to_string(),
        };
        assert!(err.to_string().contains("ssm:///x?ttl=soon"));
        assert!(err.to_string().contains("'ttl'"));
    }
}
