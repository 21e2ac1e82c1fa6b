// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake resource manager for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ResourceError, ResourceManager};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Resource handed out by [`FakeResourceManager`]
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct FakeConn {
    pub id: u64,
}

/// Recorded resource call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceCall {
    Create,
    Destroy { id: u64 },
    Check { id: u64 },
}

#[derive(Default)]
struct FakeState {
    calls: Vec<ResourceCall>,
    next_id: u64,
    /// Creations left before `create` starts failing
    creates_left: Option<usize>,
    fail_destroy: bool,
    unhealthy: HashSet<u64>,
}

/// Fake resource manager with call recording and failure injection
#[derive(Clone)]
pub struct FakeResourceManager {
    state: Arc<Mutex<FakeState>>,
    liveness: bool,
}

impl Default for FakeResourceManager {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeResourceManager {
    /// Manager whose resources are health-checked
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeState::default())),
            liveness: true,
        }
    }

    /// Manager with no liveness check
    pub fn without_check() -> Self {
        Self {
            liveness: false,
            ..Self::new()
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<ResourceCall> {
        self.state().calls.clone()
    }

    /// Number of `create` calls, successful or not
    pub fn create_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, ResourceCall::Create))
            .count()
    }

    /// Ids passed to `destroy`, in call order
    pub fn destroyed(&self) -> Vec<u64> {
        self.calls()
            .iter()
            .filter_map(|call| match call {
                ResourceCall::Destroy { id } => Some(*id),
                _ => None,
            })
            .collect()
    }

    /// Ids passed to `check`, in call order
    pub fn checked(&self) -> Vec<u64> {
        self.calls()
            .iter()
            .filter_map(|call| match call {
                ResourceCall::Check { id } => Some(*id),
                _ => None,
            })
            .collect()
    }

    /// Let `n` more creations succeed, then fail every one after
    pub fn fail_create_after(&self, n: usize) {
        self.state().creates_left = Some(n);
    }

    /// Make every creation succeed again
    pub fn allow_create(&self) {
        self.state().creates_left = None;
    }

    pub fn set_fail_destroy(&self, fails: bool) {
        self.state().fail_destroy = fails;
    }

    /// Make `check` fail for resource `id`
    pub fn mark_unhealthy(&self, id: u64) {
        self.state().unhealthy.insert(id);
    }
}

#[async_trait]
impl ResourceManager for FakeResourceManager {
    type Resource = FakeConn;

    async fn create(&self) -> Result<FakeConn, ResourceError> {
        let mut state = self.state();
        state.calls.push(ResourceCall::Create);
        if let Some(left) = state.creates_left.as_mut() {
            if *left == 0 {
                return Err(ResourceError::Create("fake create failure".to_string()));
            }
            *left -= 1;
        }
        state.next_id += 1;
        Ok(FakeConn { id: state.next_id })
    }

    async fn destroy(&self, resource: FakeConn) -> Result<(), ResourceError> {
        let mut state = self.state();
        state.calls.push(ResourceCall::Destroy { id: resource.id });
        if state.fail_destroy {
            return Err(ResourceError::Destroy(format!(
                "fake destroy failure for {}",
                resource.id
            )));
        }
        Ok(())
    }

    async fn check(&self, resource: &FakeConn) -> Result<(), ResourceError> {
        let mut state = self.state();
        state.calls.push(ResourceCall::Check { id: resource.id });
        if state.unhealthy.contains(&resource.id) {
            return Err(ResourceError::Unhealthy(format!("fake conn {}", resource.id)));
        }
        Ok(())
    }

    fn checks_liveness(&self) -> bool {
        self.liveness
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
