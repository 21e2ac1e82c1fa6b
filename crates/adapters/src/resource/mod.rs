// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resource managers: create, destroy and health-check pooled resources

mod tcp;

pub use tcp::TcpConnector;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeConn, FakeResourceManager, ResourceCall};

use async_trait::async_trait;
use thiserror::Error;

/// Errors from resource operations
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("failed to create resource: {0}")]
    Create(String),
    #[error("failed to destroy resource: {0}")]
    Destroy(String),
    #[error("resource unhealthy: {0}")]
    Unhealthy(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Creates, destroys and checks one kind of pooled resource
#[async_trait]
pub trait ResourceManager: Send + Sync + 'static {
    type Resource: Send + Sync + 'static;

    /// Open a new resource
    async fn create(&self) -> Result<Self::Resource, ResourceError>;

    /// Tear a resource down
    async fn destroy(&self, resource: Self::Resource) -> Result<(), ResourceError>;

    /// Verify an idle resource is still usable
    async fn check(&self, _resource: &Self::Resource) -> Result<(), ResourceError> {
        Ok(())
    }

    /// Whether `check` does anything; pools skip the call when it does not
    fn checks_liveness(&self) -> bool {
        false
    }
}
