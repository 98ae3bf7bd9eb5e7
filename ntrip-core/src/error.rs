use thiserror::Error;

/// Errors surfaced by the NTRIP session, the frame parser and the message
/// decoders. Framing recoveries (resync after a bad length field) are not
/// represented here because they never leave the parser.
#[derive(Debug, Error)]
pub enum NtripError {
    #[error("could not connect to caster {host}:{port}: {source}")]
    ConnectFailed {
        host: String,
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("caster rejected the request (status line: {status_line})")]
    AuthRejected { status_line: String },

    #[error("could not find end of response header within {limit} bytes")]
    ProtocolDesync { limit: usize },

    #[error("frame is shorter than its declared length (have {have}, need {need})")]
    Truncated { have: usize, need: usize },

    #[error("payload too short for message {msg_type} (have {have}, need {need})")]
    PayloadTooShort {
        msg_type: u16,
        have: usize,
        need: usize,
    },

    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    #[error("session cancelled")]
    Cancelled,

    #[error("io error: {0}")]
    Io(#[source] std::io::Error),
}

impl From<std::io::Error> for NtripError {
    fn from(source: std::io::Error) -> Self {
        NtripError::Io(source)
    }
}

pub type Result<T> = std::result::Result<T, NtripError>;
