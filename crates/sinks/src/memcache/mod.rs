//! memcached sink client
//!
//! Speaks the memcached text protocol over one TCP connection:
//!
//! ```text
//! set <key> 0 0 <len>\r\n
//! <value>\r\n
//! ```
//!
//! The server answers `STORED\r\n` on success. Any other reply is a
//! rejection and is not retried.
//!
//! # Connection handling
//!
//! - The connection is opened lazily on the first `set`
//! - Connect and request/reply exchanges run under separate timeouts
//! - Any transport failure drops the connection; the next attempt reconnects
//! - Transport failures are retried up to `retry_attempts` times

use std::io::{self, ErrorKind};
use std::time::Duration;

use async_trait::async_trait;
use socket2::{SockRef, TcpKeepalive};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufStream};
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::common::validate_key;
use crate::{SinkClient, SinkError, SinkOptions};

const STORED: &[u8] = b"STORED\r\n";

/// memcached client for one partition
pub struct MemcacheClient {
    address: String,
    options: SinkOptions,
    connection: Option<BufStream<TcpStream>>,
    /// Reused request buffer
    request: Vec<u8>,
    /// Reused reply buffer
    reply: Vec<u8>,
    connects: u64,
}

impl MemcacheClient {
    /// Create a client; no connection is made until the first `set`
    pub fn new(address: impl Into<String>, options: SinkOptions) -> Self {
        Self {
            address: address.into(),
            options,
            connection: None,
            request: Vec::with_capacity(256),
            reply: Vec::with_capacity(64),
            connects: 0,
        }
    }

    #[inline]
    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Number of connections opened so far
    #[inline]
    pub fn connect_count(&self) -> u64 {
        self.connects
    }

    async fn connect(&mut self) -> Result<(), SinkError> {
        self.connection = None;

        let stream = match timeout(
            self.options.connect_timeout,
            TcpStream::connect(&self.address),
        )
        .await
        {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => return Err(SinkError::connection(&self.address, e)),
            Err(_) => return Err(SinkError::timeout(&self.address, "connect")),
        };

        if let Err(e) = stream.set_nodelay(true) {
            tracing::debug!(
                address = %self.address,
                error = %e,
                "failed to set TCP_NODELAY, continuing with default buffering"
            );
        }

        if let Some(interval) = self.options.tcp_keepalive {
            set_keepalive(&stream, interval, &self.address);
        }

        self.connects += 1;
        tracing::debug!(address = %self.address, connects = self.connects, "connected to memcached");

        self.connection = Some(BufStream::new(stream));
        Ok(())
    }

    /// One request/reply exchange on the current connection
    async fn exchange(&mut self, key: &str, value: &[u8]) -> Result<(), SinkError> {
        if self.connection.is_none() {
            self.connect().await?;
        }

        self.request.clear();
        self.request.extend_from_slice(b"set ");
        self.request.extend_from_slice(key.as_bytes());
        self.request.extend_from_slice(b" 0 0 ");
        self.request
            .extend_from_slice(value.len().to_string().as_bytes());
        self.request.extend_from_slice(b"\r\n");
        self.request.extend_from_slice(value);
        self.request.extend_from_slice(b"\r\n");

        let Some(stream) = self.connection.as_mut() else {
            return Err(SinkError::Io(io::Error::from(ErrorKind::NotConnected)));
        };
        let request = &self.request;
        let reply = &mut self.reply;

        let result = timeout(self.options.io_timeout, async {
            stream.write_all(request).await?;
            stream.flush().await?;
            reply.clear();
            if stream.read_until(b'\n', reply).await? == 0 {
                return Err(io::Error::new(
                    ErrorKind::UnexpectedEof,
                    "connection closed by server",
                ));
            }
            Ok::<(), io::Error>(())
        })
        .await;

        match result {
            Ok(Ok(())) if self.reply == STORED => Ok(()),
            Ok(Ok(())) => {
                // Unknown protocol state after an error reply
                self.connection = None;
                Err(SinkError::rejected(
                    String::from_utf8_lossy(&self.reply).trim_end(),
                ))
            }
            Ok(Err(e)) => {
                self.connection = None;
                Err(SinkError::Io(e))
            }
            Err(_) => {
                self.connection = None;
                Err(SinkError::timeout(&self.address, "set"))
            }
        }
    }
}

#[async_trait]
impl SinkClient for MemcacheClient {
    async fn set(&mut self, key: &str, value: &[u8]) -> Result<(), SinkError> {
        validate_key(key)?;

        let attempts = self.options.retry_attempts.max(1);
        let mut last_error = String::new();

        for attempt in 0..attempts {
            if attempt > 0 {
                tokio::time::sleep(self.options.retry_interval).await;
            }

            match self.exchange(key, value).await {
                Ok(()) => return Ok(()),
                Err(e) if e.is_transient() => {
                    tracing::debug!(
                        address = %self.address,
                        attempt = attempt + 1,
                        max_attempts = attempts,
                        error = %e,
                        "set attempt failed"
                    );
                    last_error = e.to_string();
                }
                Err(e) => return Err(e),
            }
        }

        Err(SinkError::RetriesExhausted {
            attempts,
            last_error,
        })
    }

    fn address(&self) -> &str {
        &self.address
    }
}

impl std::fmt::Debug for MemcacheClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemcacheClient")
            .field("address", &self.address)
            .field("connected", &self.is_connected())
            .field("connects", &self.connects)
            .finish()
    }
}

/// Enable TCP keep-alive (non-fatal if it fails)
fn set_keepalive(stream: &TcpStream, interval: Duration, address: &str) {
    let sock_ref = SockRef::from(stream);
    let keepalive = TcpKeepalive::new().with_time(interval);

    #[cfg(target_os = "linux")]
    let keepalive = keepalive.with_interval(interval);

    if let Err(e) = sock_ref.set_tcp_keepalive(&keepalive) {
        tracing::debug!(
            address = %address,
            error = %e,
            "failed to set TCP keep-alive, continuing without keep-alive"
        );
    }
}

#[cfg(test)]
#[path = "memcache_test.rs"]
mod memcache_test;
