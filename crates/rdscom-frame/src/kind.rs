use crate::error::FrameError;

/// Role of a message in the request/response exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MessageKind {
    /// Asks the peer to act and (usually) answer.
    Request = 0,
    /// Answers a request; carries the request's number.
    Response = 1,
    /// Reports a failure; numbered like a request.
    Error = 2,
}

impl MessageKind {
    /// Wire byte for this kind.
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Parse a wire byte.
    pub fn from_u8(byte: u8) -> Result<Self, FrameError> {
        match byte {
            0 => Ok(MessageKind::Request),
            1 => Ok(MessageKind::Response),
            2 => Ok(MessageKind::Error),
            other => Err(FrameError::UnknownKind(other)),
        }
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MessageKind::Request => "request",
            MessageKind::Response => "response",
            MessageKind::Error => "error",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for MessageKind {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "request" => Ok(MessageKind::Request),
            "response" => Ok(MessageKind::Response),
            "error" => Ok(MessageKind::Error),
            _ => Err(FrameError::UnknownKind(u8::MAX)),
        }
    }
}
