//! A dedicated error for all possible failures of a DNS exchange: I/O, malformed
//! wire data, name server misbehavior, cache and signer prerequisites.
use std::fmt;
use std::io;
use std::str;

use crate::rfc1035::ResponseCode;

#[derive(Debug)]
pub enum DNSError {
    /// underlying socket or file descriptor error
    Io(io::Error),
    FromUtf8(std::string::FromUtf8Error),
    Utf8(str::Utf8Error),
    Logger(log::SetLoggerError),

    /// malformed wire data: bad name, truncated buffer, bogus pointer
    Parse(String),
    /// ID mismatch, QR=0 in a response, wrong opcode
    HeaderInvalid(String),
    /// response RCODE != NOERROR
    Rcode(ResponseCode),
    /// a name server entry could not be used (bad address, empty list)
    NSInvalidEntry(String),
    /// every configured name server was tried and none answered
    NSFailed(String),
    /// the I/O deadline elapsed while waiting for a reply
    SocketTimeout,
    /// the requested cache backend is not usable from the core
    CacheUnsupported(String),
    /// signing was requested but no usable signer is attached
    SignerUnavailable(String),
    /// the signing algorithm code is not one the library supports
    SignerInvalidAlgorithm(u8),
    /// unknown record type requested, or a typed record could not be built
    RRInvalid(String),
    /// the assembled request is too short or empty and cannot be sent
    PacketInvalid(String),
}

impl DNSError {
    /// True when the error was recorded against a name server during the send
    /// loop rather than raised from configuration.
    pub fn is_timeout(&self) -> bool {
        matches!(self, DNSError::SocketTimeout)
    }
}

/// A specific custom `Result` for all functions
pub type DNSResult<T> = Result<T, DNSError>;

impl fmt::Display for DNSError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DNSError::Io(e) => write!(f, "i/o error: {}", e),
            DNSError::FromUtf8(e) => write!(f, "utf-8 conversion error: {}", e),
            DNSError::Utf8(e) => write!(f, "utf-8 conversion error: {}", e),
            DNSError::Logger(e) => write!(f, "logger setup error: {}", e),
            DNSError::Parse(s) => write!(f, "parse error: {}", s),
            DNSError::HeaderInvalid(s) => write!(f, "invalid header: {}", s),
            DNSError::Rcode(rc) => write!(f, "response code: {:?}", rc),
            DNSError::NSInvalidEntry(s) => write!(f, "invalid name server entry: {}", s),
            DNSError::NSFailed(s) => write!(f, "name servers failed: {}", s),
            DNSError::SocketTimeout => write!(f, "timeout waiting for a reply"),
            DNSError::CacheUnsupported(s) => write!(f, "cache backend unsupported: {}", s),
            DNSError::SignerUnavailable(s) => write!(f, "signer unavailable: {}", s),
            DNSError::SignerInvalidAlgorithm(a) => write!(f, "unsupported signing algorithm: {}", a),
            DNSError::RRInvalid(s) => write!(f, "invalid resource record: {}", s),
            DNSError::PacketInvalid(s) => write!(f, "invalid packet: {}", s),
        }
    }
}

impl std::error::Error for DNSError {}

// All conversions from internal errors to DNSError
impl From<io::Error> for DNSError {
    fn from(err: io::Error) -> Self {
        // read timeouts surface as WouldBlock or TimedOut depending on the platform
        match err.kind() {
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => DNSError::SocketTimeout,
            _ => DNSError::Io(err),
        }
    }
}

impl From<std::string::FromUtf8Error> for DNSError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        DNSError::FromUtf8(err)
    }
}

impl From<str::Utf8Error> for DNSError {
    fn from(err: str::Utf8Error) -> Self {
        DNSError::Utf8(err)
    }
}

impl From<log::SetLoggerError> for DNSError {
    fn from(err: log::SetLoggerError) -> Self {
        DNSError::Logger(err)
    }
}
