//! Uniqueness tokens embedded in globally-scoped resource names.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{ConfigResult, ConfigurationError};

/// Longest token accepted from the caller. Derived tokens are always 13.
pub const MAX_TOKEN_LEN: usize = 24;

/// Length of tokens produced by [`UniqueToken::derive`].
pub const DERIVED_TOKEN_LEN: usize = 13;

const BASE32_ALPHABET: &[u8; 32] = b"abcdefghijklmnopqrstuvwxyz234567";

static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+$").expect("static regex"));

/// A per-deployment seed: lowercase ASCII alphanumeric, 1 to 24 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UniqueToken(String);

impl UniqueToken {
    /// Validate an explicitly supplied token.
    pub fn parse(token: &str) -> ConfigResult<Self> {
        let invalid = |reason: &str| ConfigurationError::InvalidToken {
            token: token.to_string(),
            reason: reason.to_string(),
        };

        if token.is_empty() {
            return Err(invalid("must not be empty"));
        }
        if token.len() > MAX_TOKEN_LEN {
            return Err(invalid(&format!("must be at most {MAX_TOKEN_LEN} characters")));
        }
        if !TOKEN_PATTERN.is_match(token) {
            return Err(invalid("only lowercase letters and digits are allowed"));
        }
        Ok(UniqueToken(token.to_string()))
    }

    /// Derive a stable token from a deployment scope, e.g.
    /// `["<subscription-id>", "<resource-group>"]`.
    ///
    /// The same scope always yields the same token, so redeploying into the
    /// same resource group reuses existing names.
    pub fn derive(scope: &[&str]) -> Self {
        let digest = hash_scope(scope);
        let bits = digest
            .iter()
            .take(16)
            .fold(0u128, |acc, b| (acc << 8) | u128::from(*b));

        let token: String = (0..DERIVED_TOKEN_LEN)
            .map(|i| {
                let shift = 123 - 5 * i as u32;
                let idx = ((bits >> shift) & 0x1f) as usize;
                BASE32_ALPHABET[idx] as char
            })
            .collect();

        debug!(scope = %scope.join("/"), token = %token, "derived uniqueness token");
        UniqueToken(token)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Hex SHA-256 of a deployment scope, for diagnostics.
pub fn scope_digest(scope: &[&str]) -> String {
    hex::encode(hash_scope(scope))
}

/// Each part is fed with its length first, so part boundaries are part of
/// the hash: `["a/b", "c"]` and `["a", "b/c"]` never collide.
fn hash_scope(scope: &[&str]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    for part in scope {
        hasher.update((part.len() as u64).to_be_bytes());
        hasher.update(part.as_bytes());
    }
    hasher.finalize().to_vec()
}

impl fmt::Display for UniqueToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for UniqueToken {
    type Error = ConfigurationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        UniqueToken::parse(&value)
    }
}

impl From<UniqueToken> for String {
    fn from(token: UniqueToken) -> Self {
        token.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let token = UniqueToken::parse("abc123").unwrap();
        assert_eq!(token.as_str(), "abc123");
    }

    #[test]
    fn test_parse_rejects_uppercase_and_symbols() {
        assert!(UniqueToken::parse("ABC").is_err());
        assert!(UniqueToken::parse("ab-c").is_err());
        assert!(UniqueToken::parse("").is_err());
    }

    #[test]
    fn test_parse_rejects_overlong() {
        let long = "a".repeat(MAX_TOKEN_LEN + 1);
        assert!(matches!(
            UniqueToken::parse(&long),
            Err(ConfigurationError::InvalidToken { .. })
        ));
    }

    #[test]
    fn test_derive_is_deterministic() {
        let scope = ["00000000-0000-0000-0000-000000000000", "rg-workshop"];
        let a = UniqueToken::derive(&scope);
        let b = UniqueToken::derive(&scope);
        assert_eq!(a, b);
        assert_eq!(a.len(), DERIVED_TOKEN_LEN);
        assert!(UniqueToken::parse(a.as_str()).is_ok());
    }

    #[test]
    fn test_derive_differs_by_scope() {
        let a = UniqueToken::derive(&["sub", "rg-one"]);
        let b = UniqueToken::derive(&["sub", "rg-two"]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_derive_respects_part_boundaries() {
        assert_ne!(UniqueToken::derive(&["a/b", "c"]), UniqueToken::derive(&["a", "b/c"]));
        assert_ne!(UniqueToken::derive(&["ab", ""]), UniqueToken::derive(&["a", "b"]));
        assert_ne!(scope_digest(&["a/b", "c"]), scope_digest(&["a", "b/c"]));
    }

    #[test]
    fn test_scope_digest_is_hex() {
        let digest = scope_digest(&["sub", "rg"]);
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
