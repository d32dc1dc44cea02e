//! HTTP user-agent adapter: a `hyper::service::Service<Uri>` that dials a
//! fixed SOCKS proxy and negotiates a CONNECT to whatever host/port hyper
//! asks to reach, optionally starting TLS for `https://` destinations.

use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::task::{Context, Poll};

use hyper::service::Service;
use hyper::Uri;
use tokio::net::TcpStream;
use tokio_native_tls::native_tls;

use crate::endpoint::{Socks4Endpoint, Socks5Config, Socks5Endpoint};
use crate::error::Error;
use crate::stream::AsyncStream;
use crate::tls::TlsStarter;

/// Which SOCKS dialect the agent should speak to the proxy.
#[derive(Clone)]
pub enum ProxyProtocol {
    Socks4 { user: String },
    Socks5 { config: Socks5Config },
}

/// A `hyper` connector that tunnels every request through one fixed SOCKS
/// proxy address, with an optional TLS context for `https://` targets.
#[derive(Clone)]
pub struct SocksHttpConnector {
    proxy_addr: SocketAddr,
    protocol: ProxyProtocol,
    tls: Option<native_tls::TlsConnector>,
}

impl SocksHttpConnector {
    pub fn new(proxy_addr: SocketAddr, protocol: ProxyProtocol) -> Self {
        SocksHttpConnector { proxy_addr, protocol, tls: None }
    }

    pub fn with_tls(mut self, connector: native_tls::TlsConnector) -> Self {
        self.tls = Some(connector);
        self
    }
}

impl Service<Uri> for SocksHttpConnector {
    type Response = SocksHttpStream;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, dst: Uri) -> Self::Future {
        let this = self.clone();
        Box::pin(async move {
            let scheme = dst.scheme_str().unwrap_or("http");
            let host = dst.host().ok_or(Error::InvalidTargetAddress("no host in URI"))?.to_owned();
            let port = dst.port_u16().unwrap_or(match scheme {
                "https" => 443,
                _ => 80,
            });

            let proxy = TcpStream::connect(this.proxy_addr).await?;

            let negotiated: Box<dyn AsyncStream> = match &this.protocol {
                ProxyProtocol::Socks4 { user } => {
                    let endpoint = Socks4Endpoint::new((host.as_str(), port), user.clone())?;
                    Box::new(endpoint.connect(proxy).await?)
                }
                ProxyProtocol::Socks5 { config } => {
                    let endpoint = Socks5Endpoint::new((host.as_str(), port), config.clone())?;
                    Box::new(endpoint.connect(proxy).await?)
                }
            };

            match scheme {
                "https" => {
                    let connector = this.tls.clone().ok_or(Error::InvalidArgument(
                        "TLS connector not configured for https:// target",
                    ))?;
                    let starter = TlsStarter::new(connector);
                    let tls_stream = starter.start(&host, negotiated).await?;
                    Ok(SocksHttpStream::Tls(tls_stream))
                }
                "http" => Ok(SocksHttpStream::Plain(negotiated)),
                other => Err(Error::UnsupportedScheme(other.to_owned())),
            }
        })
    }
}

/// The stream type handed back to hyper: either a plain relayed connection
/// or one wrapped in TLS, erased behind a single enum so `Service::Response`
/// stays a concrete type.
pub enum SocksHttpStream {
    Plain(Box<dyn AsyncStream>),
    Tls(tokio_native_tls::TlsStream<Box<dyn AsyncStream>>),
}

impl tokio::io::AsyncRead for SocksHttpStream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut tokio::io::ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        match self.get_mut() {
            SocksHttpStream::Plain(s) => Pin::new(s).poll_read(cx, buf),
            SocksHttpStream::Tls(s) => Pin::new(s).poll_read(cx, buf),
        }
    }
}

impl tokio::io::AsyncWrite for SocksHttpStream {
    fn poll_write(self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &[u8]) -> Poll<std::io::Result<usize>> {
        match self.get_mut() {
            SocksHttpStream::Plain(s) => Pin::new(s).poll_write(cx, buf),
            SocksHttpStream::Tls(s) => Pin::new(s).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        match self.get_mut() {
            SocksHttpStream::Plain(s) => Pin::new(s).poll_flush(cx),
            SocksHttpStream::Tls(s) => Pin::new(s).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        match self.get_mut() {
            SocksHttpStream::Plain(s) => Pin::new(s).poll_shutdown(cx),
            SocksHttpStream::Tls(s) => Pin::new(s).poll_shutdown(cx),
        }
    }
}

impl hyper::client::connect::Connection for SocksHttpStream {
    fn connected(&self) -> hyper::client::connect::Connected {
        hyper::client::connect::Connected::new()
    }
}
