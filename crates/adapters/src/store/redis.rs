// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Redis-backed coordination store

use super::{CoordinationStore, SetOutcome, StoreError};
use ::redis::aio::ConnectionManager;
use ::redis::{Client, RedisError, Script};
use async_trait::async_trait;
use std::time::Duration;
use warden_core::RedisSettings;

/// Deletes KEYS[1] only while it still holds ARGV[1]
const COMPARE_AND_DELETE: &str = r#"
if redis.call("GET", KEYS[1]) == ARGV[1] then
    return redis.call("DEL", KEYS[1])
else
    return 0
end
"#;

impl From<RedisError> for StoreError {
    fn from(e: RedisError) -> Self {
        if e.is_io_error()
            || e.is_connection_refusal()
            || e.is_connection_dropped()
            || e.is_timeout()
        {
            StoreError::Connection(e.to_string())
        } else {
            StoreError::Command(e.to_string())
        }
    }
}

/// Coordination store on a Redis server.
///
/// Uses a reconnecting [`ConnectionManager`], so clones share one
/// multiplexed connection.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
    compare_and_delete: Script,
}

impl RedisStore {
    /// Connect using the given settings, failing after `connect_timeout`
    pub async fn connect(settings: &RedisSettings) -> Result<Self, StoreError> {
        let url = settings
            .url()
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        let client = Client::open(url)?;
        let conn = tokio::time::timeout(settings.connect_timeout, client.get_connection_manager())
            .await
            .map_err(|_| {
                StoreError::Connection(format!(
                    "timed out after {:?} connecting to {}",
                    settings.connect_timeout, settings.addr
                ))
            })??;
        tracing::info!(addr = %settings.addr, "connected to redis");
        Ok(Self::from_connection(conn))
    }

    /// Wrap an existing connection manager
    pub fn from_connection(conn: ConnectionManager) -> Self {
        Self {
            conn,
            compare_and_delete: Script::new(COMPARE_AND_DELETE),
        }
    }
}

/// TTL in milliseconds for `PX`/`PEXPIRE`; Redis rejects a zero expiry
fn ttl_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1)
}

#[async_trait]
impl CoordinationStore for RedisStore {
    async fn set_if_absent(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<SetOutcome, StoreError> {
        let mut conn = self.conn.clone();
        let reply: Option<String> = ::redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("NX")
            .arg("PX")
            .arg(ttl_millis(ttl))
            .query_async(&mut conn)
            .await?;
        Ok(match reply {
            Some(_) => SetOutcome::Acquired,
            None => SetOutcome::Exists,
        })
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.conn.clone();
        let value: Option<String> = ::redis::cmd("GET").arg(key).query_async(&mut conn).await?;
        Ok(value)
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _removed: i64 = ::redis::cmd("DEL").arg(key).query_async(&mut conn).await?;
        Ok(())
    }

    async fn refresh_expiry(&self, key: &str, ttl: Duration) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let updated: i64 = ::redis::cmd("PEXPIRE")
            .arg(key)
            .arg(ttl_millis(ttl))
            .query_async(&mut conn)
            .await?;
        match updated {
            1 => Ok(()),
            0 => Err(StoreError::NotFound(key.to_string())),
            other => Err(StoreError::Command(format!(
                "unexpected PEXPIRE reply {other} for {key}"
            ))),
        }
    }

    async fn delete_if_equals(&self, key: &str, value: &str) -> Result<bool, StoreError> {
        let mut conn = self.conn.clone();
        let removed: i64 = self
            .compare_and_delete
            .key(key)
            .arg(value)
            .invoke_async(&mut conn)
            .await?;
        Ok(removed == 1)
    }
}

#[cfg(test)]
#[path = "redis_tests.rs"]
mod tests;
