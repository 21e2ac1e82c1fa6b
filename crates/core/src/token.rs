// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Owner tokens identifying lock holders

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Opaque value stored under a lock key by the holder that set it
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerToken(String);

impl OwnerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OwnerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for OwnerToken {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for OwnerToken {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Generates owner tokens
pub trait TokenGen: Clone + Send + Sync + 'static {
    fn next(&self) -> OwnerToken;
}

/// Random UUID tokens for production use
///
/// An optional prefix (e.g. the service name) makes store contents easier to
/// read without weakening uniqueness.
#[derive(Clone, Debug, Default)]
pub struct UuidTokenGen {
    prefix: Option<String>,
}

impl UuidTokenGen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }
}

impl TokenGen for UuidTokenGen {
    fn next(&self) -> OwnerToken {
        let id = uuid::Uuid::new_v4();
        match &self.prefix {
            Some(prefix) => OwnerToken(format!("{prefix}:{id}")),
            None => OwnerToken(id.to_string()),
        }
    }
}

/// Sequential tokens for testing
#[derive(Clone, Debug)]
pub struct SequentialTokenGen {
    prefix: String,
    counter: Arc<AtomicU64>,
}

impl SequentialTokenGen {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: Arc::new(AtomicU64::new(1)),
        }
    }
}

impl Default for SequentialTokenGen {
    fn default() -> Self {
        Self::new("owner")
    }
}

impl TokenGen for SequentialTokenGen {
    fn next(&self) -> OwnerToken {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        OwnerToken(format!("{}-{}", self.prefix, n))
    }
}

#[cfg(test)]
#[path = "token_tests.rs"]
mod tests;
