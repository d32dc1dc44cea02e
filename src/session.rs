//! The negotiation state machines. Each `negotiate_*` function owns the
//! proxy transport for the duration of one handshake, expressed as
//! straight-line `async fn` control flow: each step below is the sequential
//! `await` point that the decision table it implements describes, and
//! termination on any error path simply returns -- there is no separate
//! state-tag to keep in sync.

use std::sync::Arc;

use bytes::{Buf, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::auth::{AuthMethod, METHOD_NO_ACCEPTABLE};
use crate::error::{Error, Result, Socks4ReplyKind, Socks5ReplyKind};
use crate::grammar::{self, ParseOutcome};
use crate::sender;
use crate::stream::AsyncStream;
use crate::target::TargetAddr;

/// Reads from `stream` into `buf`, re-invoking `parse` after every read,
/// until it reports a complete message. Leftover, unconsumed bytes remain in
/// `buf` for the next call -- or, after the final reply, become the relay
/// prelude handed to the caller's stream.
pub(crate) async fn read_message<S, T, F>(stream: &mut S, buf: &mut BytesMut, mut parse: F) -> Result<T>
where
    S: AsyncRead + Unpin + ?Sized,
    F: FnMut(&[u8]) -> Result<ParseOutcome<T>>,
{
    loop {
        if let ParseOutcome::Done(value, consumed) = parse(buf)? {
            buf.advance(consumed);
            return Ok(value);
        }

        let mut tmp = [0u8; 4096];
        let n = stream.read(&mut tmp).await.map_err(Error::TransportLost)?;
        if n == 0 {
            return Err(Error::TransportLost(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "proxy closed the connection during negotiation",
            )));
        }
        buf.extend_from_slice(&tmp[..n]);
    }
}

/// Drives the SOCKS5 greeting, auth sub-negotiation, and CONNECT request to
/// completion on an already-connected `stream`. On success, returns any
/// bytes that arrived past the CONNECT reply in the same read -- these must
/// be delivered to the caller's protocol before any further socket reads.
pub async fn negotiate_socks5<S>(
    stream: &mut S,
    target: &TargetAddr,
    methods: &[Arc<dyn AuthMethod>],
) -> Result<BytesMut>
where
    S: AsyncStream + ?Sized,
{
    if methods.is_empty() {
        return Err(Error::InvalidArgument("no auth methods configured"));
    }
    let offered: Vec<u8> = methods.iter().map(|m| m.method_byte()).collect();

    sender::io::send_auth_methods(stream, &offered).await?;

    let mut buf = BytesMut::new();
    let selection = read_message(stream, &mut buf, grammar::parse_auth_selection).await?;

    if selection.method == METHOD_NO_ACCEPTABLE {
        return Err(Error::MethodsNotAccepted { selected: selection.method, offered });
    }
    let chosen = methods
        .iter()
        .find(|m| m.method_byte() == selection.method)
        .ok_or_else(|| Error::MethodsNotAccepted { selected: selection.method, offered: offered.clone() })?;

    chosen.negotiate(stream, &mut buf).await?;

    sender::io::send_connect5(stream, target).await?;
    let reply = read_message(stream, &mut buf, grammar::parse_socks5_reply).await?;
    if reply.status != 0x00 {
        return Err(Error::Socks5Reply(Socks5ReplyKind::from_byte(reply.status)));
    }

    Ok(buf)
}

/// Drives the SOCKS4/4a CONNECT request to completion. `user` is the ident
/// string (may be empty). Returns any bytes received past the reply, as
/// [`negotiate_socks5`] does.
pub async fn negotiate_socks4<S>(stream: &mut S, target: &TargetAddr, user: &str) -> Result<BytesMut>
where
    S: AsyncStream + ?Sized,
{
    sender::io::send_connect4(stream, target, user).await?;

    let mut buf = BytesMut::new();
    let reply = read_message(stream, &mut buf, grammar::parse_socks4_reply).await?;
    if reply.status != 0x5a {
        return Err(Error::Socks4Reply(Socks4ReplyKind::from_byte(reply.status)));
    }

    Ok(buf)
}
