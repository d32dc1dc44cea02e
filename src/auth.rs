//! Pluggable SOCKS5 authentication sub-negotiators.
//!
//! An [`AuthMethod`] is identified by its one-byte method code and knows how
//! to drive its own sub-protocol to completion once the server selects it.
//! The crate ships [`Anonymous`] and [`UsernamePassword`]; callers may
//! implement the trait themselves to add others without touching the core
//! negotiation engine.

use async_trait::async_trait;
use bytes::BytesMut;
use tokio::io::AsyncWriteExt;

use crate::error::{Error, Result};
use crate::grammar;
use crate::sender;
use crate::session::read_message;
use crate::stream::AsyncStream;

pub const METHOD_ANONYMOUS: u8 = 0x00;
pub const METHOD_USERNAME_PASSWORD: u8 = 0x02;
pub const METHOD_NO_ACCEPTABLE: u8 = 0xff;

/// A SOCKS5 authentication sub-protocol, selected by [`method_byte`](AuthMethod::method_byte).
#[async_trait]
pub trait AuthMethod: Send + Sync {
    /// The one-byte code advertised in the greeting and matched against the
    /// server's selection.
    fn method_byte(&self) -> u8;

    /// Drives this method's sub-protocol to completion on an already
    /// version-negotiated stream. `buf` is the shared read buffer; any bytes
    /// read past this method's own messages must be left in it untouched.
    async fn negotiate(&self, stream: &mut dyn AsyncStream, buf: &mut BytesMut) -> Result<()>;
}

/// No authentication: the server need only echo `0x00` in the greeting and
/// negotiation proceeds straight to the CONNECT request.
#[derive(Debug, Default, Clone, Copy)]
pub struct Anonymous;

#[async_trait]
impl AuthMethod for Anonymous {
    fn method_byte(&self) -> u8 {
        METHOD_ANONYMOUS
    }

    async fn negotiate(&self, _stream: &mut dyn AsyncStream, _buf: &mut BytesMut) -> Result<()> {
        Ok(())
    }
}

/// RFC 1929 username/password authentication.
#[derive(Clone)]
pub struct UsernamePassword {
    pub username: String,
    pub password: String,
}

impl UsernamePassword {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        UsernamePassword { username: username.into(), password: password.into() }
    }
}

#[async_trait]
impl AuthMethod for UsernamePassword {
    fn method_byte(&self) -> u8 {
        METHOD_USERNAME_PASSWORD
    }

    async fn negotiate(&self, stream: &mut dyn AsyncStream, buf: &mut BytesMut) -> Result<()> {
        let frame = sender::build_login(&self.username, &self.password)?;
        stream.write_all(&frame).await?;

        let response = read_message(stream, buf, grammar::parse_login_response).await?;

        if response.success {
            Ok(())
        } else {
            Err(Error::LoginAuthFailed)
        }
    }
}
