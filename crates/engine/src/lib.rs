// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Distributed locks and pooled resources

mod error;
mod lock;
mod pool;

pub use error::{LockError, PoolError};
pub use lock::{Lease, LockManager};
pub use pool::{Pool, PoolStats};
