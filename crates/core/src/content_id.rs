//! Namespaced content identifiers.
//!
//! Content ids name every authored definition (biomes, structures, structure
//! parts) using the form `namespace:path`, e.g. `dd:vault_core`. They order
//! lexically by `(namespace, path)`, so maps keyed by them iterate the same
//! way on every run.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Namespace applied when an id omits one.
pub const DEFAULT_NAMESPACE: &str = "dd";

const MAX_NAMESPACE_LEN: usize = 64;
const MAX_PATH_LEN: usize = 128;

/// Error returned when a string is not a valid [`ContentId`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentIdError {
    /// Input was empty or whitespace.
    #[error("content id cannot be empty")]
    Empty,
    /// Namespace or path segment was empty.
    #[error("content id `{0}` has an empty namespace or path")]
    EmptySegment(String),
    /// A segment exceeded its length limit.
    #[error("content id `{0}` is too long")]
    TooLong(String),
    /// A segment contained a disallowed character.
    #[error("content id `{input}` contains invalid character {found:?}")]
    InvalidChar {
        /// The rejected input.
        input: String,
        /// First offending character.
        found: char,
    },
}

/// A namespaced identifier of the form `namespace:path`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentId {
    namespace: String,
    path: String,
}

impl ContentId {
    /// Parse an id, applying [`DEFAULT_NAMESPACE`] when none is given.
    pub fn parse(input: &str) -> Result<Self, ContentIdError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ContentIdError::Empty);
        }

        let (namespace, path) = input
            .split_once(':')
            .unwrap_or((DEFAULT_NAMESPACE, input));

        if namespace.is_empty() || path.is_empty() {
            return Err(ContentIdError::EmptySegment(input.to_string()));
        }
        if namespace.len() > MAX_NAMESPACE_LEN || path.len() > MAX_PATH_LEN {
            return Err(ContentIdError::TooLong(input.to_string()));
        }
        if let Some(found) = namespace.chars().find(|c| !is_namespace_char(*c)) {
            return Err(ContentIdError::InvalidChar {
                input: input.to_string(),
                found,
            });
        }
        if let Some(found) = path.chars().find(|c| !is_namespace_char(*c) && *c != '/') {
            return Err(ContentIdError::InvalidChar {
                input: input.to_string(),
                found,
            });
        }

        Ok(Self {
            namespace: namespace.to_string(),
            path: path.to_string(),
        })
    }

    /// Id namespace.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Id path.
    pub fn path(&self) -> &str {
        &self.path
    }
}

fn is_namespace_char(c: char) -> bool {
    matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.')
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

impl FromStr for ContentId {
    type Err = ContentIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ContentId {
    type Error = ContentIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ContentId> for String {
    fn from(id: ContentId) -> Self {
        id.to_string()
    }
}
