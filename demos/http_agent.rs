//! Fetches a URL with `hyper` over the [`socksx::http`] adapter, tunnelling
//! every request through one fixed SOCKS5 proxy.
//!
//! Usage: `http-agent <proxy-host:port> <url>`

use hyper::Client;
use socksx::http::{ProxyProtocol, SocksHttpConnector};
use socksx::Socks5Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let proxy_addr: std::net::SocketAddr =
        args.next().unwrap_or_else(|| "127.0.0.1:1080".to_owned()).parse()?;
    let url = args.next().unwrap_or_else(|| "http://httpbin.org/ip".to_owned());

    let connector =
        SocksHttpConnector::new(proxy_addr, ProxyProtocol::Socks5 { config: Socks5Config::default() });
    let client = Client::builder().build::<_, hyper::Body>(connector);

    tracing::info!(%url, "fetching");
    let response = client.get(url.parse()?).await?;
    tracing::info!(status = %response.status(), "got response");

    let body = hyper::body::to_bytes(response.into_body()).await?;
    println!("{}", String::from_utf8_lossy(&body));

    Ok(())
}
