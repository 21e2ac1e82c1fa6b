// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for locks and pools

use std::time::Duration;
use thiserror::Error;
use warden_adapters::{ResourceError, StoreError};
use warden_core::ConfigError;

/// Errors from the lock manager
#[derive(Debug, Error)]
pub enum LockError {
    #[error("timed out seizing lock {key}")]
    SeizeTimeout { key: String },
    #[error("lease must be at least one second, got {0:?}")]
    InvalidLease(Duration),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Errors from the resource pool
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("invalid pool config: {0}")]
    Config(String),
    #[error("failed to fill pool: {0}")]
    Fill(ResourceError),
    #[error("pool is closed")]
    Closed,
    #[error("pool exhausted: {max} resources already open")]
    Exhausted { max: usize },
    #[error("resource error: {0}")]
    Resource(#[from] ResourceError),
}

impl From<ConfigError> for PoolError {
    fn from(e: ConfigError) -> Self {
        PoolError::Config(e.to_string())
    }
}
