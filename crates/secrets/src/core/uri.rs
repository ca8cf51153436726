//! Secret reference URI grammar: `<scheme>://<path>[?<query>]`.
//!
//! The scheme selects the provider; the path is backend-specific; query
//! parameters carry per-reference options (`decrypt`, `version`, `region`,
//! `ttl`). Any string without this shape is a literal secret value and is
//! never parsed.

use crate::core::{Result, SecretError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Canonical representation of a parsed secret reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretUri {
    scheme: String,
    path: String,
    params: Vec<(String, String)>,
}

impl SecretUri {
    /// Parses a secret reference from a string.
    pub fn parse(input: &str) -> Result<Self> {
        let raw = input.trim();
        let (scheme, rest) = raw.split_once("://").ok_or_else(|| SecretError::InvalidUri {
            uri: raw.to_string(),
            reason: "missing '://' separator".to_string(),
        })?;

        if !is_valid_scheme(scheme) {
            return Err(SecretError::InvalidUri {
                uri: raw.to_string(),
                reason: format!("invalid scheme '{scheme}'"),
            });
        }

        let (path, query) = match rest.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (rest, None),
        };

        if path.is_empty() {
            return Err(SecretError::InvalidUri {
                uri: raw.to_string(),
                reason: "empty path".to_string(),
            });
        }

        let params = query
            .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();

        Ok(Self {
            scheme: scheme.to_ascii_lowercase(),
            path: path.to_string(),
            params,
        })
    }

    /// Whether a raw credential value has the `scheme://...` shape.
    ///
    /// This is the passthrough gate used by the resolver: values without the
    /// shape are literal secrets and are returned unchanged, without parsing.
    pub fn looks_like_reference(value: &str) -> bool {
        value
            .split_once("://")
            .is_some_and(|(scheme, _)| is_valid_scheme(scheme))
    }

    /// Scheme component, lowercased (selects the provider).
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Path component, raw as written (backend-specific locator).
    pub fn path(&self) -> &str {
        &self.path
    }

    /// All query parameters, percent-decoded, in order of appearance.
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// First value of the named query parameter, if present.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Boolean parameter: absent means `false`; accepts `true`/`1`/`false`/`0`.
    pub fn bool_param(&self, name: &str) -> Result<bool> {
        match self.param(name) {
            None => Ok(false),
            Some("true" | "1") => Ok(true),
            Some("false" | "0") => Ok(false),
            Some(other) => Err(SecretError::InvalidUri {
                uri: self.to_string(),
                reason: format!("parameter '{name}' must be a boolean, got '{other}'"),
            }),
        }
    }

    /// Integer parameter, if present.
    pub fn int_param(&self, name: &str) -> Result<Option<i64>> {
        match self.param(name) {
            None => Ok(None),
            Some(raw) => raw.parse::<i64>().map(Some).map_err(|_| SecretError::InvalidUri {
                uri: self.to_string(),
                reason: format!("parameter '{name}' must be an integer, got '{raw}'"),
            }),
        }
    }

    /// Per-reference cache TTL override from the `ttl` parameter, in seconds.
    pub fn ttl_override(&self) -> Result<Option<Duration>> {
        match self.int_param("ttl")? {
            None => Ok(None),
            Some(secs) if secs > 0 => Ok(Some(Duration::from_secs(secs.unsigned_abs()))),
            Some(secs) => Err(SecretError::InvalidUri {
                uri: self.to_string(),
                reason: format!("parameter 'ttl' must be positive, got {secs}"),
            }),
        }
    }
}

fn is_valid_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

impl fmt::Display for SecretUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.path)?;
        if !self.params.is_empty() {
            let query = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(self.params.iter().map(|(k, v)| (k.as_str(), v.as_str())))
                .finish();
            write!(f, "?{query}")?;
        }
        Ok(())
    }
}

impl FromStr for SecretUri {
    type Err = SecretError;

    fn from_str(s: &str) -> Result<Self> {
        SecretUri::parse(s)
    }
}

impl TryFrom<&str> for SecretUri {
    type Error = SecretError;

    fn try_from(value: &str) -> Result<Self> {
        SecretUri::parse(value)
    }
}

impl Serialize for SecretUri {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for SecretUri {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        SecretUri::parse(&value).map_err(serde::de::Error::custom)
    }
}
