//! AMQP 1.0 type-constructor codes and form classification.
//!
//! Each encoded value begins with a one-byte constructor selecting both the
//! type and the specific form/width (AMQP 1.0 §1.6). The encoder writes these
//! directly; the decoder classifies them with [`classify`].

/// The null value.
pub const NULL: u8 = 0x40;
/// Boolean true, encoded in the constructor alone.
pub const BOOL_TRUE: u8 = 0x41;
/// Boolean false, encoded in the constructor alone.
pub const BOOL_FALSE: u8 = 0x42;
/// The uint value zero, encoded in the constructor alone.
pub const UINT0: u8 = 0x43;
/// The ulong value zero, encoded in the constructor alone.
pub const ULONG0: u8 = 0x44;
/// The empty list, encoded in the constructor alone.
pub const LIST0: u8 = 0x45;

/// An 8-bit unsigned integer.
pub const UBYTE: u8 = 0x50;
/// An 8-bit signed integer.
pub const BYTE: u8 = 0x51;
/// A uint in the range 0..=255, one payload byte.
pub const SMALL_UINT: u8 = 0x52;
/// A ulong in the range 0..=255, one payload byte.
pub const SMALL_ULONG: u8 = 0x53;
/// An int in the range -128..=127, one payload byte.
pub const SMALL_INT: u8 = 0x54;
/// A long in the range -128..=127, one payload byte.
pub const SMALL_LONG: u8 = 0x55;
/// A boolean as one payload octet (0x00 or 0x01).
pub const BOOL: u8 = 0x56;

/// A 16-bit unsigned integer.
pub const USHORT: u8 = 0x60;
/// A 16-bit signed integer.
pub const SHORT: u8 = 0x61;

/// A 32-bit unsigned integer, full width.
pub const UINT: u8 = 0x70;
/// A 32-bit signed integer, full width.
pub const INT: u8 = 0x71;
/// An IEEE 754 binary32.
pub const FLOAT: u8 = 0x72;
/// A Unicode scalar value as a UTF-32BE code point.
pub const CHAR: u8 = 0x73;

/// A 64-bit unsigned integer, full width.
pub const ULONG: u8 = 0x80;
/// A 64-bit signed integer, full width.
pub const LONG: u8 = 0x81;
/// An IEEE 754 binary64.
pub const DOUBLE: u8 = 0x82;
/// Milliseconds since the Unix epoch, signed 64-bit.
pub const TIMESTAMP: u8 = 0x83;

/// A 16-byte UUID.
pub const UUID: u8 = 0x98;

/// Binary data with a one-byte length.
pub const VBIN8: u8 = 0xa0;
/// A UTF-8 string with a one-byte length.
pub const STR8: u8 = 0xa1;
/// An ASCII symbol with a one-byte length.
pub const SYM8: u8 = 0xa3;
/// Binary data with a four-byte length.
pub const VBIN32: u8 = 0xb0;
/// A UTF-8 string with a four-byte length.
pub const STR32: u8 = 0xb1;
/// An ASCII symbol with a four-byte length.
pub const SYM32: u8 = 0xb3;

/// A list with one-byte size and count fields.
pub const LIST8: u8 = 0xc0;
/// A map with one-byte size and count fields.
pub const MAP8: u8 = 0xc1;
/// A list with four-byte size and count fields.
pub const LIST32: u8 = 0xd0;
/// A map with four-byte size and count fields.
pub const MAP32: u8 = 0xd1;

/// An array with one-byte size and count fields.
pub const ARRAY8: u8 = 0xe0;
/// An array with four-byte size and count fields.
pub const ARRAY32: u8 = 0xf0;

/// The shape of the payload that follows a constructor byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form {
    /// No payload; the constructor alone denotes the value.
    ZeroWidth,
    /// A fixed number of payload bytes (1, 2, 4, 8, or 16).
    Fixed(usize),
    /// A length field of the given width, then that many payload bytes.
    Variable {
        /// Width in bytes of the length field (1 or 4).
        len_width: usize,
    },
    /// Size and count fields of the given width, then `count` nested
    /// element encodings (list/map) or one shared element constructor and
    /// raw payloads (array).
    Compound {
        /// Width in bytes of the size and count fields (1 or 4).
        field_width: usize,
    },
}

/// Classify a constructor code, or `None` if the code is undefined.
#[must_use]
pub fn classify(code: u8) -> Option<Form> {
    match code {
        NULL | BOOL_TRUE | BOOL_FALSE | UINT0 | ULONG0 | LIST0 => Some(Form::ZeroWidth),
        UBYTE | BYTE | SMALL_UINT | SMALL_ULONG | SMALL_INT | SMALL_LONG | BOOL => {
            Some(Form::Fixed(1))
        }
        USHORT | SHORT => Some(Form::Fixed(2)),
        UINT | INT | FLOAT | CHAR => Some(Form::Fixed(4)),
        ULONG | LONG | DOUBLE | TIMESTAMP => Some(Form::Fixed(8)),
        UUID => Some(Form::Fixed(16)),
        VBIN8 | STR8 | SYM8 => Some(Form::Variable { len_width: 1 }),
        VBIN32 | STR32 | SYM32 => Some(Form::Variable { len_width: 4 }),
        LIST8 | MAP8 | ARRAY8 => Some(Form::Compound { field_width: 1 }),
        LIST32 | MAP32 | ARRAY32 => Some(Form::Compound { field_width: 4 }),
        _ => None,
    }
}
