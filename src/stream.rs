//! Transport abstractions: an object-safe stand-in for
//! `AsyncRead + AsyncWrite + Unpin + Send` so authentication methods can be
//! stored as trait objects, and the post-handoff pass-through stream that
//! prepends any bytes buffered during negotiation but not yet consumed.

use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::{Buf, BytesMut};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

/// Object-safe erasure of `AsyncRead + AsyncWrite + Unpin + Send`, so
/// [`crate::auth::AuthMethod`] implementations can operate generically on
/// `&mut dyn AsyncStream` without infecting the whole crate with a type
/// parameter.
pub trait AsyncStream: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T: AsyncRead + AsyncWrite + Unpin + Send + ?Sized> AsyncStream for T {}

/// The transport handed back to the caller after a successful negotiation.
///
/// Wraps the now-transparent proxy connection. Any bytes that arrived in the
/// same read as the final handshake reply are buffered here and drained
/// before further reads reach the inner socket, so no byte is ever lost or
/// reordered across the handoff boundary.
pub struct SocksStream<S> {
    inner: S,
    prelude: BytesMut,
}

impl<S> SocksStream<S> {
    pub(crate) fn new(inner: S, prelude: BytesMut) -> Self {
        SocksStream { inner, prelude }
    }

    /// Consumes the wrapper, returning the underlying transport. Any
    /// buffered prelude bytes not yet read are discarded -- callers that
    /// need them should read through the `AsyncRead` impl instead.
    pub fn into_inner(self) -> S {
        self.inner
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.inner
    }
}

impl<S: AsyncRead + Unpin> AsyncRead for SocksStream<S> {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        if !self.prelude.is_empty() {
            let n = std::cmp::min(buf.remaining(), self.prelude.len());
            buf.put_slice(&self.prelude[..n]);
            self.prelude.advance(n);
            return Poll::Ready(Ok(()));
        }
        Pin::new(&mut self.inner).poll_read(cx, buf)
    }
}

impl<S: AsyncWrite + Unpin> AsyncWrite for SocksStream<S> {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<std::io::Result<usize>> {
        Pin::new(&mut self.get_mut().inner).poll_write(cx, buf)
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_flush(cx)
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_shutdown(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn prelude_bytes_are_delivered_before_inner_socket_bytes() {
        let mut prelude = BytesMut::new();
        prelude.extend_from_slice(b"xxxxx");
        let inner = tokio_test::io::Builder::new().build();
        let mut stream = SocksStream::new(inner, prelude);
        let mut out = [0u8; 5];
        stream.read_exact(&mut out).await.unwrap();
        assert_eq!(&out, b"xxxxx");
    }
}
