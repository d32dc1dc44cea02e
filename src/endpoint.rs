//! The public client endpoints: given an already-connected proxy transport,
//! drive a SOCKS4/4a or SOCKS5 negotiation and hand back a transparent byte
//! stream to the target.

use std::future::Future;
use std::sync::Arc;

use crate::auth::{AuthMethod, Anonymous};
use crate::error::{Error, Result};
use crate::session;
use crate::stream::{AsyncStream, SocksStream};
use crate::target::{TargetAddr, ToTargetAddr};

/// Configuration for a [`Socks5Endpoint`]. The default offers only
/// [`Anonymous`] authentication, matching this crate's default client
/// behaviour when no credentials are supplied.
#[derive(Clone)]
pub struct Socks5Config {
    pub methods: Vec<Arc<dyn AuthMethod>>,
}

impl Default for Socks5Config {
    fn default() -> Self {
        Socks5Config { methods: vec![Arc::new(Anonymous)] }
    }
}

impl Socks5Config {
    pub fn with_methods(methods: Vec<Arc<dyn AuthMethod>>) -> Result<Self> {
        if methods.is_empty() {
            return Err(Error::InvalidArgument("no auth methods configured"));
        }
        Ok(Socks5Config { methods })
    }
}

/// A client endpoint that negotiates a SOCKS5 CONNECT to `target` over
/// whatever already-connected transport it is given.
pub struct Socks5Endpoint {
    target: TargetAddr,
    config: Socks5Config,
}

impl Socks5Endpoint {
    pub fn new(target: impl ToTargetAddr, config: Socks5Config) -> Result<Self> {
        Ok(Socks5Endpoint { target: target.to_target_addr()?, config })
    }

    /// Drives negotiation to completion on `proxy`, returning a transparent
    /// stream to the target on success. On any error the proxy transport is
    /// dropped (and thereby closed) before returning.
    pub async fn connect<S>(&self, mut proxy: S) -> Result<SocksStream<S>>
    where
        S: AsyncStream,
    {
        let prelude = session::negotiate_socks5(&mut proxy, &self.target, &self.config.methods).await?;
        Ok(SocksStream::new(proxy, prelude))
    }

    /// As [`connect`](Self::connect), but races negotiation against
    /// `cancel`. If `cancel` resolves first, the proxy transport is dropped
    /// (aborting it) and [`Error::Cancelled`] is returned; a transport loss
    /// that happens to be observed afterwards never overwrites this result,
    /// because the losing branch of `select!` is dropped, not polled again.
    pub async fn connect_cancellable<S, C>(&self, mut proxy: S, cancel: C) -> Result<SocksStream<S>>
    where
        S: AsyncStream,
        C: Future<Output = ()>,
    {
        tokio::select! {
            biased;
            _ = cancel => Err(Error::Cancelled),
            result = session::negotiate_socks5(&mut proxy, &self.target, &self.config.methods) => {
                result.map(|prelude| SocksStream::new(proxy, prelude))
            }
        }
    }

    /// Convenience mirroring the "inner factory" abstraction: builds `T`
    /// from the established stream via `adapt`. A `None` return from `adapt`
    /// is treated the same as a cancelled negotiation and drops the
    /// transport.
    pub async fn connect_and_adapt<S, F, T>(&self, proxy: S, adapt: F) -> Result<T>
    where
        S: AsyncStream,
        F: FnOnce(SocksStream<S>) -> Option<T>,
    {
        let stream = self.connect(proxy).await?;
        adapt(stream).ok_or(Error::Cancelled)
    }
}

/// A client endpoint that negotiates a SOCKS4/4a CONNECT to `target`.
pub struct Socks4Endpoint {
    target: TargetAddr,
    user: String,
}

impl Socks4Endpoint {
    pub fn new(target: impl ToTargetAddr, user: impl Into<String>) -> Result<Self> {
        Ok(Socks4Endpoint { target: target.to_target_addr()?, user: user.into() })
    }

    pub async fn connect<S>(&self, mut proxy: S) -> Result<SocksStream<S>>
    where
        S: AsyncStream,
    {
        let prelude = session::negotiate_socks4(&mut proxy, &self.target, &self.user).await?;
        Ok(SocksStream::new(proxy, prelude))
    }

    pub async fn connect_cancellable<S, C>(&self, mut proxy: S, cancel: C) -> Result<SocksStream<S>>
    where
        S: AsyncStream,
        C: Future<Output = ()>,
    {
        tokio::select! {
            biased;
            _ = cancel => Err(Error::Cancelled),
            result = session::negotiate_socks4(&mut proxy, &self.target, &self.user) => {
                result.map(|prelude| SocksStream::new(proxy, prelude))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn socks5_connect_happy_path() {
        let io = tokio_test::io::Builder::new()
            .write(&[0x05, 0x01, 0x00])
            .read(&[0x05, 0x00])
            .write(&[0x05, 0x01, 0x00, 0x03, 4, b'h', b'o', b's', b't', 0x00, 0x50])
            .read(&[0x05, 0x00, 0x00, 0x01, 1, 2, 3, 4, 0x00, 0x50])
            .build();
        let endpoint = Socks5Endpoint::new("host:80", Socks5Config::default()).unwrap();
        endpoint.connect(io).await.unwrap();
    }

    #[tokio::test]
    async fn socks5_connect_cancellable_resolves_exactly_once_on_cancel() {
        let io = tokio_test::io::Builder::new().wait(Duration::from_secs(3600)).build();
        let endpoint = Socks5Endpoint::new("host:80", Socks5Config::default()).unwrap();
        let cancelled = AtomicBool::new(false);
        let result = endpoint
            .connect_cancellable(io, async {
                cancelled.store(true, Ordering::SeqCst);
            })
            .await;
        assert!(cancelled.load(Ordering::SeqCst));
        assert!(matches!(result, Err(Error::Cancelled)));
    }

    #[tokio::test]
    async fn socks4_connect_happy_path() {
        let io = tokio_test::io::Builder::new()
            .write(&[0x04, 0x01, 0x00, 0x50, 127, 0, 0, 1, 0x00])
            .read(&[0x00, 0x5a, 0x00, 0x50, 0, 0, 0, 0])
            .build();
        let endpoint = Socks4Endpoint::new("127.0.0.1:80", "").unwrap();
        endpoint.connect(io).await.unwrap();
    }
}
