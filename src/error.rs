use core::fmt;

/// The high-level class of an error.
///
/// The value engine distinguishes:
/// - **Value** errors: invalid arguments, type mismatches, and allocation
///   failures raised by constructors and container mutators.
/// - **Encode** errors: sink rejection or a payload too large for the wire.
/// - **Decode** errors: malformed input or failure while materializing a
///   decoded value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Constructor/accessor/mutator failure.
    Value,
    /// Wire encoding failure.
    Encode,
    /// Wire decoding failure.
    Decode,
}

/// A structured error code identifying the reason an operation failed.
///
/// This enum is intentionally stable and string-free to remain `no_std` and
/// hot-path friendly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorCode {
    /// Memory allocation failed; prior state is unchanged.
    AllocationFailed,
    /// Arithmetic overflow while computing a length/size.
    LengthOverflow,

    /// The value does not have the tag the operation requires.
    TypeMismatch,
    /// Container index out of range.
    IndexOutOfRange,
    /// Array element tag differs from the existing element tag.
    ElementTypeMismatch,
    /// Symbol contains non-ASCII bytes.
    SymbolNotAscii,

    /// The encode sink rejected a write; the encoding must be discarded.
    SinkRejected,

    /// `decode_bytes` was called with an empty buffer.
    EmptyDecodeInput,
    /// Undefined type-constructor code.
    InvalidConstructor,
    /// Compound size field smaller than its minimum valid payload.
    CompoundSizeTooSmall,
    /// Map count field is odd (the count covers keys and values together).
    OddMapCount,
    /// Boolean payload octet other than 0x00/0x01.
    InvalidBoolean,
    /// Char payload is not a Unicode scalar value.
    InvalidCharCode,
    /// String payload is not valid UTF-8.
    Utf8Invalid,
    /// The decoder previously reported a fatal error and must be re-created.
    DecoderFailed,
}

/// An engine error with structured classification, a stable code, and a byte
/// offset.
///
/// Offsets are meaningful for `Decode` errors (total bytes consumed by the
/// decoder when the error was detected). For `Value` and `Encode` errors,
/// `offset` is `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmqpError {
    /// The error kind.
    pub kind: ErrorKind,
    /// The error code.
    pub code: ErrorCode,
    /// Byte offset into the decode stream where the error was detected.
    pub offset: usize,
}

impl AmqpError {
    /// Construct a value-model error.
    #[inline]
    #[must_use]
    pub const fn value(code: ErrorCode) -> Self {
        Self {
            kind: ErrorKind::Value,
            code,
            offset: 0,
        }
    }

    /// Construct an encoding error.
    #[inline]
    #[must_use]
    pub const fn encode(code: ErrorCode) -> Self {
        Self {
            kind: ErrorKind::Encode,
            code,
            offset: 0,
        }
    }

    /// Construct a decode error at `offset`.
    #[inline]
    #[must_use]
    pub const fn decode(code: ErrorCode, offset: usize) -> Self {
        Self {
            kind: ErrorKind::Decode,
            code,
            offset,
        }
    }

    /// Returns true iff this error is a decode error.
    #[inline]
    #[must_use]
    pub const fn is_decode(self) -> bool {
        matches!(self.kind, ErrorKind::Decode)
    }
}

impl fmt::Display for AmqpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self.code {
            ErrorCode::AllocationFailed => "allocation failed",
            ErrorCode::LengthOverflow => "length overflow",

            ErrorCode::TypeMismatch => "value tag does not match the requested type",
            ErrorCode::IndexOutOfRange => "container index out of range",
            ErrorCode::ElementTypeMismatch => "array elements must share one tag",
            ErrorCode::SymbolNotAscii => "symbols must be ASCII",

            ErrorCode::SinkRejected => "encode sink rejected the write",

            ErrorCode::EmptyDecodeInput => "decode input buffer is empty",
            ErrorCode::InvalidConstructor => "undefined type-constructor code",
            ErrorCode::CompoundSizeTooSmall => "compound size below minimum valid payload",
            ErrorCode::OddMapCount => "map count field must be even",
            ErrorCode::InvalidBoolean => "boolean octet must be 0x00 or 0x01",
            ErrorCode::InvalidCharCode => "char is not a Unicode scalar value",
            ErrorCode::Utf8Invalid => "string must be valid UTF-8",
            ErrorCode::DecoderFailed => "decoder is unusable after a fatal error",
        };

        match self.kind {
            ErrorKind::Value => write!(f, "amqp value operation failed: {msg}"),
            ErrorKind::Encode => write!(f, "amqp encode failed: {msg}"),
            ErrorKind::Decode => write!(f, "amqp decode failed at {}: {msg}", self.offset),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for AmqpError {}
