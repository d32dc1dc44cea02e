//! Shared helpers for the integration tests: a loopback echo server and a
//! minimal scripted SOCKS5/SOCKS4 proxy good enough to drive a real
//! `TcpStream` through this crate's public endpoints.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Spawns a TCP server on an ephemeral loopback port that echoes back
/// whatever it reads, once. Returns the port to connect to.
pub async fn spawn_echo_server() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        let (mut sock, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 1024];
        loop {
            match sock.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    if sock.write_all(&buf[..n]).await.is_err() {
                        break;
                    }
                }
            }
        }
    });
    port
}

/// Spawns a SOCKS5 proxy that accepts anonymous auth and, for any CONNECT
/// request, answers `granted` and then splices the client to `target_port`
/// on loopback -- just enough behaviour to exercise the full client-side
/// handshake and the post-handoff relay over real sockets.
pub async fn spawn_socks5_proxy(target_port: u16) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        let (mut client, _) = listener.accept().await.unwrap();

        let mut greeting = [0u8; 3];
        client.read_exact(&mut greeting).await.unwrap();
        assert_eq!(greeting[0], 0x05);
        client.write_all(&[0x05, 0x00]).await.unwrap();

        let mut header = [0u8; 4];
        client.read_exact(&mut header).await.unwrap();
        assert_eq!((header[0], header[1]), (0x05, 0x01));
        match header[3] {
            0x01 => {
                let mut addr = [0u8; 6];
                client.read_exact(&mut addr).await.unwrap();
            }
            0x03 => {
                let mut len = [0u8; 1];
                client.read_exact(&mut len).await.unwrap();
                let mut host = vec![0u8; len[0] as usize];
                client.read_exact(&mut host).await.unwrap();
                let mut port = [0u8; 2];
                client.read_exact(&mut port).await.unwrap();
            }
            other => panic!("unexpected ATYP {other}"),
        }

        client
            .write_all(&[0x05, 0x00, 0x00, 0x01, 0, 0, 0, 0, 0, 0])
            .await
            .unwrap();

        let mut target = TcpStream::connect(("127.0.0.1", target_port)).await.unwrap();
        tokio::io::copy_bidirectional(&mut client, &mut target).await.ok();
    });
    port
}

/// As [`spawn_socks5_proxy`], but speaks SOCKS4/4a. Always grants; no
/// status byte other than `0x5a` is ever produced here.
pub async fn spawn_socks4_proxy(target_port: u16) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        let (mut client, _) = listener.accept().await.unwrap();

        let mut header = [0u8; 8];
        client.read_exact(&mut header).await.unwrap();
        assert_eq!((header[0], header[1]), (0x04, 0x01));

        // Drain the NUL-terminated user-id field.
        let mut byte = [0u8; 1];
        loop {
            client.read_exact(&mut byte).await.unwrap();
            if byte[0] == 0 {
                break;
            }
        }

        // SOCKS4a: if the embedded address was the reserved sentinel, a
        // NUL-terminated hostname follows.
        if header[4..7] == [0, 0, 0] && header[7] != 0 {
            loop {
                client.read_exact(&mut byte).await.unwrap();
                if byte[0] == 0 {
                    break;
                }
            }
        }

        client
            .write_all(&[0x00, 0x5a, 0x00, 0x00, 0, 0, 0, 0])
            .await
            .unwrap();

        let mut target = TcpStream::connect(("127.0.0.1", target_port)).await.unwrap();
        tokio::io::copy_bidirectional(&mut client, &mut target).await.ok();
    });
    port
}
