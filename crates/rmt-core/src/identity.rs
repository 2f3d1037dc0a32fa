//! # Operator Identity
//!
//! Newtype for the party authorized to commit batches and reconfigure the
//! recorder. Keeping it a distinct type means a receipt target or any other
//! string cannot be passed where an authority check is expected.

use serde::{Deserialize, Serialize};

/// Identity of an operator (the authority over a batch recorder).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperatorId(String);

impl OperatorId {
    /// Create an operator identity. Surrounding whitespace is trimmed.
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(id.as_ref().trim().to_string())
    }

    /// Access the identity string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OperatorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "operator:{}", self.0)
    }
}

impl From<&str> for OperatorId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
