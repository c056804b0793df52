//! Alias-bearing record contract

use std::fmt::Debug;

use crate::domain::DomainError;

/// Default prefix of canonical table identifiers issued by the schema service
pub const DEFAULT_ID_PREFIX: &str = "md_";

/// A record that can be indexed under its canonical id and its display title
pub trait CachedRecord: Debug + Send + Sync + 'static {
    /// Canonical, stable identifier
    fn id(&self) -> Option<&str>;

    /// Human-readable title; unique at a point in time but may change
    fn title(&self) -> Option<&str>;

    /// Returns both aliases, failing if either one is missing or empty
    fn aliases(&self) -> Result<(&str, &str), DomainError> {
        let id = self
            .id()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| DomainError::invalid_record("record has no id"))?;
        let title = self
            .title()
            .filter(|title| !title.is_empty())
            .ok_or_else(|| {
                DomainError::invalid_record(format!("record '{}' has no title", id))
            })?;

        Ok((id, title))
    }
}

/// Distinguishes canonical identifiers from display names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierFormat {
    prefix: String,
}

impl IdentifierFormat {
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// True if `key` is already a canonical identifier and needs no directory lookup
    pub fn is_canonical(&self, key: &str) -> bool {
        !self.prefix.is_empty() && key.starts_with(&self.prefix)
    }
}

impl Default for IdentifierFormat {
    fn default() -> Self {
        Self::with_prefix(DEFAULT_ID_PREFIX)
    }
}
