// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable cross-reference key for a project record.
///
/// Keys are non-empty and URL-safe: ASCII letters, digits, `-` and `_`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProjectKey(String);

impl ProjectKey {
    pub fn parse(value: &str) -> Option<Self> {
        if is_valid_key(value) {
            Some(Self(value.to_owned()))
        } else {
            None
        }
    }

    pub(crate) fn from_static(value: &'static str) -> Self {
        debug_assert!(is_valid_key(value), "invalid built-in project id {value:?}");
        Self(value.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ProjectKey {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if is_valid_key(&value) {
            Ok(Self(value))
        } else {
            Err(format!(
                "project id {value:?} must be non-empty and use only letters, digits, '-' or '_'"
            ))
        }
    }
}

impl From<ProjectKey> for String {
    fn from(value: ProjectKey) -> Self {
        value.0
    }
}

impl fmt::Display for ProjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_valid_key(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
}

#[cfg(test)]
mod tests {
    use super::ProjectKey;

    #[test]
    fn parse_accepts_url_safe_keys() {
        assert_eq!(ProjectKey::parse("qtl").map(|key| key.to_string()), Some("qtl".to_owned()));
        assert!(ProjectKey::parse("wright-fisher_2").is_some());
    }

    #[test]
    fn parse_rejects_whitespace_and_reserved_characters() {
        assert!(ProjectKey::parse("").is_none());
        assert!(ProjectKey::parse("two words").is_none());
        assert!(ProjectKey::parse("a#b").is_none());
        assert!(ProjectKey::parse("ünï").is_none());
    }
}
