/// Basic Error types.
#[derive(Debug)]
pub enum LkError {
    /// TryFromSliceError from the std library.
    TryFromSlice(std::array::TryFromSliceError),
    /// TryFromSliceError from the std library.
    TryFromUtf8(std::string::FromUtf8Error),
    /// IoError from the std library.
    StdIoError(std::io::Error),
    /// The byte sequence does not conform to the format grammar.
    MalformedInput { msg: String },
    /// An operation was invoked on a writer after `flush`.
    AlreadyFlushed,
    /// A fixed-capacity format cannot accept another record.
    ContainerFull { msg: String },
    /// The requested format has no reader (or no writer).
    UnsupportedDirection { token: String, direction: &'static str },
    /// A streaming decoder ran out of input mid-record. Carries the
    /// number of bytes consumed so far; never surfaced past the
    /// decoder boundary.
    NeedMoreInput { consumed: usize },
    /// Enum creation error.
    ParseEnum { f: String, code: u16 },
    #[cfg(feature = "to_json")]
    /// Serialisation/Deserialisation error.
    SerdeError(serde_json::Error),
}

impl LkError {
    /// Shorthand for the most common error in the format parsers.
    pub fn malformed(msg: impl Into<String>) -> Self {
        LkError::MalformedInput { msg: msg.into() }
    }

    pub fn container_full(msg: impl Into<String>) -> Self {
        LkError::ContainerFull { msg: msg.into() }
    }
}

impl From<std::array::TryFromSliceError> for LkError {
    fn from(e: std::array::TryFromSliceError) -> Self {
        Self::TryFromSlice(e)
    }
}

impl From<std::string::FromUtf8Error> for LkError {
    fn from(e: std::string::FromUtf8Error) -> Self {
        Self::TryFromUtf8(e)
    }
}

impl From<std::io::Error> for LkError {
    fn from(e: std::io::Error) -> Self {
        Self::StdIoError(e)
    }
}

impl std::fmt::Display for LkError {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use self::LkError::*;
        match self {
            #[cfg(feature = "to_json")]
            SerdeError(x) => write!(fmt, "{}", x),
            StdIoError(x) => write!(fmt, "{}", x),
            TryFromSlice(x) => write!(fmt, "{}", x),
            TryFromUtf8(x) => write!(fmt, "{}", x),
            MalformedInput { msg } => write!(fmt, "Malformed input: {}", msg),
            AlreadyFlushed => write!(fmt, "Writer was already flushed"),
            ContainerFull { msg } => write!(fmt, "Container full: {}", msg),
            UnsupportedDirection { token, direction } => {
                write!(fmt, "Format '{}' does not support {}", token, direction)
            }
            NeedMoreInput { consumed } => {
                write!(fmt, "Decoder needs more input ({} bytes consumed)", consumed)
            }
            ParseEnum { f, code } => write!(fmt, "Could not parse source ({}) to {}.", code, f),
        }
    }
}

impl From<LkError> for String {
    fn from(e: LkError) -> String {
        e.to_string()
    }
}

impl std::error::Error for LkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        use self::LkError::*;
        match self {
            #[cfg(feature = "to_json")]
            SerdeError(x) => x.source(),
            StdIoError(x) => x.source(),
            TryFromSlice(x) => x.source(),
            TryFromUtf8(x) => x.source(),
            _ => None,
        }
    }
}
