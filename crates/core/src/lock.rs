// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lock manager configuration and lease arithmetic

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Pause between conditional-set attempts while a lock is contended
pub const DEFAULT_BACKOFF: Duration = Duration::from_millis(200);
/// Renewal cycles before a held lease is left to lapse
pub const DEFAULT_MAX_RENEWALS: u32 = 3;
/// Lease used when the caller does not pick one
pub const DEFAULT_LEASE: Duration = Duration::from_secs(10);

/// Lock manager configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LockConfig {
    /// How long to sleep between acquisition attempts
    #[serde(with = "humantime_serde")]
    pub backoff: Duration,
    /// How many times the renewal task refreshes a lease before giving up
    pub max_renewals: u32,
    /// Lease for acquisitions that do not name one
    #[serde(with = "humantime_serde")]
    pub lease: Duration,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            backoff: DEFAULT_BACKOFF,
            max_renewals: DEFAULT_MAX_RENEWALS,
            lease: DEFAULT_LEASE,
        }
    }
}

impl LockConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn with_max_renewals(mut self, max_renewals: u32) -> Self {
        self.max_renewals = max_renewals;
        self
    }

    pub fn with_lease(mut self, lease: Duration) -> Self {
        self.lease = lease;
        self
    }
}

/// Lease length in whole seconds, rounded up.
///
/// The store counts expiry in seconds, so sub-second remainders extend the
/// lease rather than truncate it. Saturates at `u64::MAX`.
pub fn lease_seconds(lease: Duration) -> u64 {
    let secs = lease.as_secs();
    if lease.subsec_nanos() > 0 {
        secs.saturating_add(1)
    } else {
        secs
    }
}

/// Interval between renewals: half the lease, rounded up to whole seconds.
///
/// Each renewal also uses this interval as the new TTL.
pub fn renewal_interval(lease: Duration) -> Duration {
    Duration::from_secs(lease_seconds(lease).div_ceil(2))
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
