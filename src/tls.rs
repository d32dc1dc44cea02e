//! TLS-starter endpoint wrapper: on successful connection through an inner
//! endpoint, starts TLS on the resulting transport before handing it back.

use tokio_native_tls::{native_tls, TlsConnector};

use crate::error::{Error, Result};
use crate::stream::AsyncStream;

/// Wraps another connect step so that, once it succeeds, a TLS handshake is
/// performed on the resulting stream. `connector` carries whatever
/// certificate/verification policy the caller configured.
pub struct TlsStarter {
    connector: TlsConnector,
}

impl TlsStarter {
    pub fn new(connector: native_tls::TlsConnector) -> Self {
        TlsStarter { connector: TlsConnector::from(connector) }
    }

    /// Starts TLS for `domain` on an already-established stream, such as the
    /// one returned by [`crate::endpoint::Socks5Endpoint::connect`].
    pub async fn start<S>(&self, domain: &str, stream: S) -> Result<tokio_native_tls::TlsStream<S>>
    where
        S: AsyncStream,
    {
        self.connector
            .connect(domain, stream)
            .await
            .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))
    }
}
