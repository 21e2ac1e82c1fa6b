// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for the coordination store and pooled resources

pub mod resource;
pub mod store;
pub mod traced;

pub use resource::{ResourceError, ResourceManager, TcpConnector};
pub use store::{CoordinationStore, MemoryStore, RedisStore, SetOutcome, StoreError};
pub use traced::{TracedManager, TracedStore};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use resource::{FakeConn, FakeResourceManager, ResourceCall};
#[cfg(any(test, feature = "test-support"))]
pub use store::{FakeStore, StoreCall};
