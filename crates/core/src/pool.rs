// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resource pool configuration

use crate::settings::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What `get` does when no idle resource is left
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutPolicy {
    /// Always create a new resource; the ceiling only caps idle storage
    #[default]
    Lenient,
    /// Refuse to create once open resources reach the ceiling
    Bounded,
}

/// Pool configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Resources created eagerly at construction
    pub initial: usize,
    /// Capacity ceiling
    pub max: usize,
    /// Idle resources older than this are destroyed on checkout (zero disables)
    #[serde(with = "humantime_serde")]
    pub idle_timeout: Duration,
    pub checkout: CheckoutPolicy,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            initial: 1,
            max: 8,
            idle_timeout: Duration::ZERO,
            checkout: CheckoutPolicy::Lenient,
        }
    }
}

impl PoolConfig {
    pub fn new(initial: usize, max: usize) -> Self {
        Self {
            initial,
            max,
            ..Self::default()
        }
    }

    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    pub fn with_checkout(mut self, checkout: CheckoutPolicy) -> Self {
        self.checkout = checkout;
        self
    }

    /// Whether idle eviction is enabled
    pub fn evicts_idle(&self) -> bool {
        !self.idle_timeout.is_zero()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial > self.max {
            return Err(ConfigError::Invalid(format!(
                "initial pool size {} exceeds max {}",
                self.initial, self.max
            )));
        }
        if self.initial == 0 || self.max == 0 {
            return Err(ConfigError::Invalid(
                "initial and max pool size must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "pool_tests.rs"]
mod tests;
