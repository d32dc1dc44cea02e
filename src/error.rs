use thiserror::Error;

/// Reply status reported by a SOCKS5 proxy in response to a CONNECT request.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Socks5ReplyKind {
    #[error("general SOCKS server failure")]
    ServerFailure,
    #[error("connection not allowed by ruleset")]
    ConnectionNotAllowed,
    #[error("network unreachable")]
    NetworkUnreachable,
    #[error("host unreachable")]
    HostUnreachable,
    #[error("connection refused")]
    ConnectionRefused,
    #[error("TTL expired")]
    TtlExpired,
    #[error("command not supported")]
    CommandNotSupported,
    #[error("address type not supported")]
    AddressTypeNotSupported,
    #[error("unknown reply code {0:#04x}")]
    Unknown(u8),
}

impl Socks5ReplyKind {
    pub(crate) fn from_byte(b: u8) -> Self {
        match b {
            0x01 => Socks5ReplyKind::ServerFailure,
            0x02 => Socks5ReplyKind::ConnectionNotAllowed,
            0x03 => Socks5ReplyKind::NetworkUnreachable,
            0x04 => Socks5ReplyKind::HostUnreachable,
            0x05 => Socks5ReplyKind::ConnectionRefused,
            0x06 => Socks5ReplyKind::TtlExpired,
            0x07 => Socks5ReplyKind::CommandNotSupported,
            0x08 => Socks5ReplyKind::AddressTypeNotSupported,
            other => Socks5ReplyKind::Unknown(other),
        }
    }
}

/// Reply status reported by a SOCKS4/4a proxy in response to a CONNECT request.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Socks4ReplyKind {
    #[error("request rejected or failed")]
    RequestRejectedOrFailed,
    #[error("request rejected: identd unreachable")]
    IdentdUnreachable,
    #[error("request rejected: identd could not confirm user id")]
    IdentdMismatch,
    #[error("unknown reply code {0:#04x}")]
    Unknown(u8),
}

impl Socks4ReplyKind {
    pub(crate) fn from_byte(b: u8) -> Self {
        match b {
            0x5b => Socks4ReplyKind::RequestRejectedOrFailed,
            0x5c => Socks4ReplyKind::IdentdUnreachable,
            0x5d => Socks4ReplyKind::IdentdMismatch,
            other => Socks4ReplyKind::Unknown(other),
        }
    }
}

/// Error type of `socksx`.
#[derive(Error, Debug)]
pub enum Error {
    /// Failure caused by an IO error on the proxy transport.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A method/argument was invalid before any byte was sent.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// Target host/domain could not be interpreted.
    #[error("invalid target address: {0}")]
    InvalidTargetAddress(&'static str),

    /// The server selected an authentication method that was not offered,
    /// or signalled that no offered method was acceptable (`0xFF`).
    #[error("no acceptable auth methods (server selected {selected:#04x}, offered {offered:?})")]
    MethodsNotAccepted { selected: u8, offered: Vec<u8> },

    /// SOCKS5 username/password sub-negotiation returned a non-zero status.
    #[error("username/password authentication failed")]
    LoginAuthFailed,

    /// The proxy replied with a non-success status to the CONNECT request.
    #[error("SOCKS5 proxy error: {0}")]
    Socks5Reply(Socks5ReplyKind),

    /// The proxy replied with a non-success status to the CONNECT request.
    #[error("SOCKS4 proxy error: {0}")]
    Socks4Reply(Socks4ReplyKind),

    /// Server sent bytes that could not be parsed as a well-formed message.
    #[error("malformed proxy response: {0}")]
    ProtocolError(&'static str),

    /// The underlying transport was lost before negotiation completed.
    #[error("proxy transport closed before negotiation completed: {0}")]
    TransportLost(std::io::Error),

    /// Negotiation was cancelled by the caller before completion.
    #[error("negotiation cancelled")]
    Cancelled,

    /// The HTTP agent adapter was asked for an unsupported scheme.
    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),
}

/// Result type of `socksx`.
pub type Result<T> = std::result::Result<T, Error>;
