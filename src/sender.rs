//! Pure frame builders plus thin async wrappers that write them to the
//! proxy transport. Keeping the byte-construction logic in free functions
//! that return `Vec<u8>` lets the byte-exactness tests assert on the wire
//! format directly, without needing a mock socket.

use crate::error::{Error, Result};
use crate::grammar::{ATYP_DOMAINNAME, ATYP_IPV4, ATYP_IPV6, SOCKS4_VERSION, SOCKS5_VERSION};
use crate::target::TargetAddr;
use std::net::{IpAddr, SocketAddr};

pub const CMD_CONNECT: u8 = 0x01;
const RSV: u8 = 0x00;

pub fn build_auth_methods(methods: &[u8]) -> Result<Vec<u8>> {
    if methods.is_empty() {
        return Err(Error::InvalidArgument("no auth methods configured"));
    }
    if methods.len() > 255 {
        return Err(Error::InvalidArgument("too many auth methods"));
    }
    let mut buf = Vec::with_capacity(2 + methods.len());
    buf.push(SOCKS5_VERSION);
    buf.push(methods.len() as u8);
    buf.extend_from_slice(methods);
    Ok(buf)
}

pub fn build_login(user: &str, pass: &str) -> Result<Vec<u8>> {
    if user.len() > 255 || pass.len() > 255 {
        return Err(Error::InvalidArgument("username or password too long"));
    }
    let mut buf = Vec::with_capacity(3 + user.len() + pass.len());
    buf.push(0x01);
    buf.push(user.len() as u8);
    buf.extend_from_slice(user.as_bytes());
    buf.push(pass.len() as u8);
    buf.extend_from_slice(pass.as_bytes());
    Ok(buf)
}

pub fn build_connect5(target: &TargetAddr) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(10);
    buf.push(SOCKS5_VERSION);
    buf.push(CMD_CONNECT);
    buf.push(RSV);
    match target {
        TargetAddr::Ip(SocketAddr::V4(addr)) => {
            buf.push(ATYP_IPV4);
            buf.extend_from_slice(&addr.ip().octets());
        }
        TargetAddr::Ip(SocketAddr::V6(addr)) => {
            buf.push(ATYP_IPV6);
            buf.extend_from_slice(&addr.ip().octets());
        }
        TargetAddr::Domain(host, _) => {
            if host.len() > 255 {
                return Err(Error::InvalidTargetAddress("overlong domain"));
            }
            buf.push(ATYP_DOMAINNAME);
            buf.push(host.len() as u8);
            buf.extend_from_slice(host.as_bytes());
        }
    }
    buf.extend_from_slice(&target.port().to_be_bytes());
    Ok(buf)
}

pub fn build_connect4(target: &TargetAddr, user: &str) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(9 + user.len());
    buf.push(SOCKS4_VERSION);
    buf.push(CMD_CONNECT);
    buf.extend_from_slice(&target.port().to_be_bytes());

    match target {
        TargetAddr::Ip(SocketAddr::V4(addr)) => {
            if TargetAddr::is_socks4a_reserved(addr.ip()) {
                return Err(Error::InvalidArgument(
                    "IPv4 literal falls in the SOCKS4a reserved 0.0.0.x range",
                ));
            }
            buf.extend_from_slice(&addr.ip().octets());
            buf.extend_from_slice(user.as_bytes());
            buf.push(0x00);
        }
        TargetAddr::Ip(SocketAddr::V6(_)) => {
            return Err(Error::InvalidArgument("SOCKS4 does not support IPv6 targets"));
        }
        TargetAddr::Domain(host, _) => {
            // SOCKS4a: IPv4 field is the reserved sentinel 0.0.0.1, hostname follows.
            buf.extend_from_slice(&[0, 0, 0, 1]);
            buf.extend_from_slice(user.as_bytes());
            buf.push(0x00);
            buf.extend_from_slice(host.as_bytes());
            buf.push(0x00);
        }
    }
    Ok(buf)
}

/// Splits a pre-parsed IP literal target into its kind, kept here so callers
/// that already hold an `IpAddr` (rather than a `TargetAddr`) can still reuse
/// the frame builders above via `TargetAddr::Ip`.
pub fn target_from_ip(ip: IpAddr, port: u16) -> TargetAddr {
    TargetAddr::Ip(SocketAddr::new(ip, port))
}

#[cfg(feature = "tokio")]
pub(crate) mod io {
    use super::*;
    use tokio::io::{AsyncWrite, AsyncWriteExt};

    pub async fn send_auth_methods<W: AsyncWrite + Unpin>(w: &mut W, methods: &[u8]) -> Result<()> {
        let frame = build_auth_methods(methods)?;
        w.write_all(&frame).await?;
        Ok(())
    }

    pub async fn send_login<W: AsyncWrite + Unpin>(w: &mut W, user: &str, pass: &str) -> Result<()> {
        let frame = build_login(user, pass)?;
        w.write_all(&frame).await?;
        Ok(())
    }

    pub async fn send_connect5<W: AsyncWrite + Unpin>(w: &mut W, target: &TargetAddr) -> Result<()> {
        let frame = build_connect5(target)?;
        w.write_all(&frame).await?;
        Ok(())
    }

    pub async fn send_connect4<W: AsyncWrite + Unpin>(
        w: &mut W,
        target: &TargetAddr,
        user: &str,
    ) -> Result<()> {
        let frame = build_connect4(target, user)?;
        w.write_all(&frame).await?;
        Ok(())
    }
}
