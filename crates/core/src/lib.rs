// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! warden-core: shared vocabulary for distributed locks and resource pools
//!
//! This crate provides:
//! - Clock abstractions (system, tokio-driven, fake)
//! - Owner token generation
//! - Lock and pool configuration with TOML settings loading

pub mod clock;
pub mod lock;
pub mod pool;
pub mod settings;
pub mod token;

pub use clock::{Clock, FakeClock, SystemClock, TokioClock};
pub use lock::{lease_seconds, renewal_interval, LockConfig};
pub use pool::{CheckoutPolicy, PoolConfig};
pub use settings::{ConfigError, RedisSettings, Settings};
pub use token::{OwnerToken, SequentialTokenGen, TokenGen, UuidTokenGen};
