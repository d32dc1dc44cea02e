//! Fetches a URL through a SOCKS5 proxy by hand, writing a raw HTTP/1.0
//! GET request over the negotiated stream: point it at a local SOCKS proxy
//! and a host to resolve.
//!
//! Usage: `get-ip <proxy-host:port> <target-host:port>`

use socksx::{Socks5Config, Socks5Endpoint};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let proxy_addr = args.next().unwrap_or_else(|| "127.0.0.1:1080".to_owned());
    let target = args.next().unwrap_or_else(|| "httpbin.org:80".to_owned());

    tracing::info!(%proxy_addr, %target, "dialing proxy");
    let proxy = TcpStream::connect(&proxy_addr).await?;

    let endpoint = Socks5Endpoint::new(target.as_str(), Socks5Config::default())?;
    let mut stream = endpoint.connect(proxy).await?;
    tracing::info!("negotiation complete, sending request");

    let host = target.split(':').next().unwrap_or(&target);
    let request = format!("GET /ip HTTP/1.0\r\nHost: {host}\r\nConnection: close\r\n\r\n");
    stream.write_all(request.as_bytes()).await?;

    let mut response = String::new();
    stream.read_to_string(&mut response).await?;
    println!("{response}");

    Ok(())
}
