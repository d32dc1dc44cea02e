//! Client-side negotiation for the SOCKS4, SOCKS4a, and SOCKS5 proxy
//! protocols.
//!
//! Given a transport that is already connected to a proxy server, the types
//! in this crate drive the proxy's handshake (greeting, authentication,
//! CONNECT request) and hand back a transparent byte stream to the target.
//! Dialing the proxy itself, resuming after a dropped connection, and
//! running a SOCKS server are out of scope -- see [`endpoint`] for the
//! supported entry points.

#[cfg(feature = "tokio")]
pub mod auth;
#[cfg(feature = "tokio")]
pub mod endpoint;
pub mod error;
pub mod grammar;
pub mod sender;
#[cfg(feature = "tokio")]
pub mod session;
#[cfg(feature = "tokio")]
pub mod stream;
pub mod target;

#[cfg(feature = "tls")]
pub mod tls;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "tokio")]
pub use auth::{Anonymous, AuthMethod, UsernamePassword};
#[cfg(feature = "tokio")]
pub use endpoint::{Socks4Endpoint, Socks5Config, Socks5Endpoint};
pub use error::{Error, Result};
#[cfg(feature = "tokio")]
pub use stream::SocksStream;
pub use target::{TargetAddr, ToTargetAddr};
