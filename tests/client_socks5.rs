mod common;

use socksx::{Socks5Config, Socks5Endpoint};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

#[tokio::test]
async fn connects_and_relays_through_a_real_socks5_proxy() {
    let echo_port = common::spawn_echo_server().await;
    let proxy_port = common::spawn_socks5_proxy(echo_port).await;

    let proxy = TcpStream::connect(("127.0.0.1", proxy_port)).await.unwrap();
    let endpoint = Socks5Endpoint::new("example.invalid:80", Socks5Config::default()).unwrap();
    let mut stream = endpoint.connect(proxy).await.unwrap();

    stream.write_all(b"hello through socks5").await.unwrap();
    let mut buf = [0u8; 21];
    stream.read_exact(&mut buf).await.unwrap();
    assert_eq!(&buf, b"hello through socks5");
}

#[tokio::test]
async fn connects_with_ip_literal_target() {
    let echo_port = common::spawn_echo_server().await;
    let proxy_port = common::spawn_socks5_proxy(echo_port).await;

    let proxy = TcpStream::connect(("127.0.0.1", proxy_port)).await.unwrap();
    let endpoint = Socks5Endpoint::new("127.0.0.1:9", Socks5Config::default()).unwrap();
    let mut stream = endpoint.connect(proxy).await.unwrap();

    stream.write_all(b"ip literal target").await.unwrap();
    let mut buf = [0u8; 18];
    stream.read_exact(&mut buf).await.unwrap();
    assert_eq!(&buf, b"ip literal target");
}

#[tokio::test]
async fn empty_auth_methods_is_rejected_before_any_byte_is_sent() {
    let err = Socks5Config::with_methods(vec![]).unwrap_err();
    assert!(matches!(err, socksx::Error::InvalidArgument(_)));
}
