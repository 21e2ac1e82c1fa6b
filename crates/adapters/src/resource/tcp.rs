// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! TCP connection manager

use super::{ResourceError, ResourceManager};
use async_trait::async_trait;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

/// Opens TCP connections to a fixed endpoint
#[derive(Clone, Debug)]
pub struct TcpConnector {
    addr: String,
    connect_timeout: Duration,
    nodelay: bool,
}

impl TcpConnector {
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            connect_timeout: Duration::from_secs(3),
            nodelay: true,
        }
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_nodelay(mut self, nodelay: bool) -> Self {
        self.nodelay = nodelay;
        self
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }
}

#[async_trait]
impl ResourceManager for TcpConnector {
    type Resource = TcpStream;

    async fn create(&self) -> Result<TcpStream, ResourceError> {
        let stream = tokio::time::timeout(self.connect_timeout, TcpStream::connect(&self.addr))
            .await
            .map_err(|_| {
                ResourceError::Create(format!(
                    "timed out after {:?} connecting to {}",
                    self.connect_timeout, self.addr
                ))
            })?
            .map_err(|e| ResourceError::Create(format!("{}: {}", self.addr, e)))?;
        stream.set_nodelay(self.nodelay)?;
        Ok(stream)
    }

    async fn destroy(&self, mut resource: TcpStream) -> Result<(), ResourceError> {
        match resource.shutdown().await {
            Ok(()) => Ok(()),
            // Peer already hung up; nothing left to tear down
            Err(e) if e.kind() == std::io::ErrorKind::NotConnected => Ok(()),
            Err(e) => Err(ResourceError::Destroy(e.to_string())),
        }
    }

    /// Surfaces pending socket errors and detached peers. A peer that closed
    /// cleanly is only noticed on the next read or write.
    async fn check(&self, resource: &TcpStream) -> Result<(), ResourceError> {
        if let Some(e) = resource.take_error()? {
            return Err(ResourceError::Unhealthy(e.to_string()));
        }
        resource
            .peer_addr()
            .map_err(|e| ResourceError::Unhealthy(e.to_string()))?;
        Ok(())
    }

    fn checks_liveness(&self) -> bool {
        true
    }
}

#[cfg(test)]
#[path = "tcp_tests.rs"]
mod tests;
