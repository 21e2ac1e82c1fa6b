// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::resource::{ResourceError, ResourceManager};
use crate::store::{CoordinationStore, SetOutcome, StoreError};
use async_trait::async_trait;
use std::time::Duration;
use tracing::Instrument;

/// Wrapper that adds tracing to any CoordinationStore
#[derive(Clone)]
pub struct TracedStore<S> {
    inner: S,
}

impl<S> TracedStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: CoordinationStore> CoordinationStore for TracedStore<S> {
    async fn set_if_absent(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<SetOutcome, StoreError> {
        let span =
            tracing::debug_span!("store.set_if_absent", key, ttl_ms = ttl.as_millis() as u64);
        async {
            let start = std::time::Instant::now();
            let result = self.inner.set_if_absent(key, value, ttl).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(outcome) => tracing::debug!(elapsed_ms, outcome = ?outcome, "set"),
                Err(e) => tracing::warn!(elapsed_ms, error = %e, "set failed"),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let span = tracing::debug_span!("store.get", key);
        async {
            let result = self.inner.get(key).await;
            match &result {
                Ok(value) => tracing::trace!(found = value.is_some(), "get"),
                Err(e) => tracing::warn!(error = %e, "get failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let span = tracing::debug_span!("store.delete", key);
        async {
            let result = self.inner.delete(key).await;
            match &result {
                Ok(()) => tracing::debug!("deleted"),
                Err(e) => tracing::warn!(error = %e, "delete failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn refresh_expiry(&self, key: &str, ttl: Duration) -> Result<(), StoreError> {
        let span =
            tracing::debug_span!("store.refresh_expiry", key, ttl_ms = ttl.as_millis() as u64);
        async {
            let result = self.inner.refresh_expiry(key, ttl).await;
            // NotFound is expected once a lease has lapsed
            match &result {
                Ok(()) => tracing::debug!("refreshed"),
                Err(StoreError::NotFound(_)) => tracing::debug!("key gone"),
                Err(e) => tracing::warn!(error = %e, "refresh failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn delete_if_equals(&self, key: &str, value: &str) -> Result<bool, StoreError> {
        let span = tracing::debug_span!("store.delete_if_equals", key);
        async {
            let result = self.inner.delete_if_equals(key, value).await;
            match &result {
                Ok(removed) => tracing::debug!(removed, "compare-and-delete"),
                Err(e) => tracing::warn!(error = %e, "compare-and-delete failed"),
            }
            result
        }
        .instrument(span)
        .await
    }
}

/// Wrapper that adds tracing to any ResourceManager
pub struct TracedManager<M> {
    inner: M,
    name: String,
}

impl<M> TracedManager<M> {
    /// `name` labels the resource kind in every span
    pub fn new(inner: M, name: impl Into<String>) -> Self {
        Self {
            inner,
            name: name.into(),
        }
    }

    pub fn inner(&self) -> &M {
        &self.inner
    }
}

#[async_trait]
impl<M: ResourceManager> ResourceManager for TracedManager<M> {
    type Resource = M::Resource;

    async fn create(&self) -> Result<M::Resource, ResourceError> {
        let span = tracing::info_span!("resource.create", kind = %self.name);
        async {
            let start = std::time::Instant::now();
            let result = self.inner.create().await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(_) => tracing::info!(elapsed_ms, "resource created"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "create failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn destroy(&self, resource: M::Resource) -> Result<(), ResourceError> {
        let span = tracing::info_span!("resource.destroy", kind = %self.name);
        async {
            let result = self.inner.destroy(resource).await;
            match &result {
                Ok(()) => tracing::info!("resource destroyed"),
                Err(e) => tracing::warn!(error = %e, "destroy failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn check(&self, resource: &M::Resource) -> Result<(), ResourceError> {
        let span = tracing::debug_span!("resource.check", kind = %self.name);
        async {
            let result = self.inner.check(resource).await;
            match &result {
                Ok(()) => tracing::trace!("healthy"),
                Err(e) => tracing::warn!(error = %e, "unhealthy"),
            }
            result
        }
        .instrument(span)
        .await
    }

    fn checks_liveness(&self) -> bool {
        self.inner.checks_liveness()
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
