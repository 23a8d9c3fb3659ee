use alloc::vec::Vec;

use crate::alloc_util::try_reserve;
use crate::constructor as ctor;
use crate::value::Repr;
use crate::{AmqpError, AmqpValue, ErrorCode};

/// Byte sink driven by [`AmqpValue::encode`].
///
/// The encoder calls [`write`](Self::write) one or more times with contiguous
/// runs of encoded bytes. A failing write aborts the encoding immediately;
/// bytes already delivered are not un-sent, so a failed encode must be
/// treated as producing no usable output.
pub trait EncodeSink {
    /// Accept the next contiguous run of encoded bytes.
    ///
    /// # Errors
    ///
    /// Return any error to abort the encoding; [`ErrorCode::SinkRejected`]
    /// is conventional for sinks without a more specific cause.
    fn write(&mut self, bytes: &[u8]) -> Result<(), AmqpError>;
}

impl EncodeSink for Vec<u8> {
    fn write(&mut self, bytes: &[u8]) -> Result<(), AmqpError> {
        try_reserve(self, bytes.len())?;
        self.extend_from_slice(bytes);
        Ok(())
    }
}

impl AmqpValue {
    /// Compute, without emitting any bytes, the exact number of bytes
    /// [`encode`](Self::encode) will produce for this value.
    ///
    /// # Errors
    ///
    /// Returns `LengthOverflow` if a payload is too large for the wire
    /// format.
    pub fn encoded_size(&self) -> Result<usize, AmqpError> {
        value_size(self)
    }

    /// Serialize this value into `sink`, always choosing the smallest wire
    /// form that fits.
    ///
    /// # Errors
    ///
    /// Fails immediately (no further writes) if the sink rejects a write,
    /// or with `LengthOverflow` if a payload is too large for the wire
    /// format.
    pub fn encode<S: EncodeSink>(&self, sink: &mut S) -> Result<(), AmqpError> {
        encode_value(self, sink)
    }

    /// Serialize this value into a freshly allocated buffer sized by
    /// [`encoded_size`](Self::encoded_size).
    ///
    /// # Errors
    ///
    /// Returns `AllocationFailed` if the buffer cannot be reserved, or any
    /// error [`encode`](Self::encode) reports.
    pub fn encode_to_vec(&self) -> Result<Vec<u8>, AmqpError> {
        let size = self.encoded_size()?;
        let mut out = Vec::new();
        try_reserve(&mut out, size)?;
        self.encode(&mut out)?;
        Ok(out)
    }
}

const fn compound_is_narrow(count: usize, payload: usize) -> bool {
    // The narrow size field also covers the one-byte count field, so the
    // payload itself must fit in 254 bytes.
    count <= 255 && payload <= 254
}

fn checked_sum(base: usize, add: usize) -> Result<usize, AmqpError> {
    base.checked_add(add)
        .ok_or(AmqpError::encode(ErrorCode::LengthOverflow))
}

fn var_len(len: usize) -> Result<u32, AmqpError> {
    u32::try_from(len).map_err(|_| AmqpError::encode(ErrorCode::LengthOverflow))
}

fn var_size(len: usize) -> Result<usize, AmqpError> {
    let _ = var_len(len)?;
    if len <= 255 {
        checked_sum(len, 2)
    } else {
        checked_sum(len, 5)
    }
}

fn compound_total(count: usize, payload: usize) -> Result<usize, AmqpError> {
    if compound_is_narrow(count, payload) {
        Ok(payload + 3)
    } else {
        // The wide size field covers the payload plus the 4-byte count.
        let _ = var_len(checked_sum(payload, 4)?)?;
        let _ = u32::try_from(count).map_err(|_| AmqpError::encode(ErrorCode::LengthOverflow))?;
        checked_sum(payload, 9)
    }
}

fn value_size(v: &AmqpValue) -> Result<usize, AmqpError> {
    Ok(match v.repr() {
        Repr::Null | Repr::Bool(_) => 1,
        Repr::Ubyte(_) | Repr::Byte(_) => 2,
        Repr::Ushort(_) | Repr::Short(_) => 3,
        Repr::Uint(n) => match n {
            0 => 1,
            1..=255 => 2,
            _ => 5,
        },
        Repr::Ulong(n) => match n {
            0 => 1,
            1..=255 => 2,
            _ => 9,
        },
        Repr::Int(n) => {
            if i8::try_from(*n).is_ok() {
                2
            } else {
                5
            }
        }
        Repr::Long(n) => {
            if i8::try_from(*n).is_ok() {
                2
            } else {
                9
            }
        }
        Repr::Float(_) | Repr::Char(_) => 5,
        Repr::Double(_) | Repr::Timestamp(_) => 9,
        Repr::Uuid(_) => 17,
        Repr::Binary(b) => var_size(b.len())?,
        Repr::String(s) | Repr::Symbol(s) => var_size(s.len())?,
        Repr::List(items) => {
            let items = items.borrow();
            if items.is_empty() {
                return Ok(1);
            }
            let payload = sequence_payload_size(&items)?;
            compound_total(items.len(), payload)?
        }
        Repr::Map(pairs) => {
            let pairs = pairs.borrow();
            let payload = map_payload_size(&pairs)?;
            let count = pairs
                .len()
                .checked_mul(2)
                .ok_or(AmqpError::encode(ErrorCode::LengthOverflow))?;
            compound_total(count, payload)?
        }
        Repr::Array(items) => {
            let items = items.borrow();
            let payload = array_payload_size(&items)?;
            compound_total(items.len(), payload)?
        }
    })
}

fn sequence_payload_size(items: &[AmqpValue]) -> Result<usize, AmqpError> {
    let mut total = 0usize;
    for item in items {
        total = checked_sum(total, value_size(item)?)?;
    }
    Ok(total)
}

fn map_payload_size(pairs: &[(AmqpValue, AmqpValue)]) -> Result<usize, AmqpError> {
    let mut total = 0usize;
    for (key, value) in pairs {
        total = checked_sum(total, value_size(key)?)?;
        total = checked_sum(total, value_size(value)?)?;
    }
    Ok(total)
}

fn array_payload_size(items: &[AmqpValue]) -> Result<usize, AmqpError> {
    if items.is_empty() {
        return Ok(0);
    }
    // One shared element constructor, then raw fixed-width payloads.
    let mut total = 1usize;
    for item in items {
        total = checked_sum(total, array_elem_size(item)?)?;
    }
    Ok(total)
}

fn array_elem_size(v: &AmqpValue) -> Result<usize, AmqpError> {
    Ok(match v.repr() {
        Repr::Null => 0,
        Repr::Bool(_) | Repr::Ubyte(_) | Repr::Byte(_) => 1,
        Repr::Ushort(_) | Repr::Short(_) => 2,
        Repr::Uint(_) | Repr::Int(_) | Repr::Float(_) | Repr::Char(_) => 4,
        Repr::Ulong(_) | Repr::Long(_) | Repr::Double(_) | Repr::Timestamp(_) => 8,
        Repr::Uuid(_) => 16,
        Repr::Binary(b) => {
            let _ = var_len(b.len())?;
            checked_sum(b.len(), 4)?
        }
        Repr::String(s) | Repr::Symbol(s) => {
            let _ = var_len(s.len())?;
            checked_sum(s.len(), 4)?
        }
        Repr::List(items) => {
            let items = items.borrow();
            checked_sum(sequence_payload_size(&items)?, 8)?
        }
        Repr::Map(pairs) => {
            let pairs = pairs.borrow();
            checked_sum(map_payload_size(&pairs)?, 8)?
        }
        Repr::Array(items) => {
            let items = items.borrow();
            checked_sum(array_payload_size(&items)?, 8)?
        }
    })
}

fn write_u8<S: EncodeSink>(sink: &mut S, byte: u8) -> Result<(), AmqpError> {
    sink.write(&[byte])
}

fn encode_var<S: EncodeSink>(
    sink: &mut S,
    code8: u8,
    code32: u8,
    bytes: &[u8],
) -> Result<(), AmqpError> {
    let len = var_len(bytes.len())?;
    if len <= 255 {
        #[allow(clippy::cast_possible_truncation)]
        sink.write(&[code8, len as u8])?;
    } else {
        write_u8(sink, code32)?;
        sink.write(&len.to_be_bytes())?;
    }
    sink.write(bytes)
}

fn encode_compound_header<S: EncodeSink>(
    sink: &mut S,
    code8: u8,
    code32: u8,
    count: usize,
    payload: usize,
) -> Result<(), AmqpError> {
    if compound_is_narrow(count, payload) {
        #[allow(clippy::cast_possible_truncation)]
        sink.write(&[code8, (payload + 1) as u8, count as u8])
    } else {
        let size = var_len(checked_sum(payload, 4)?)?;
        let count =
            u32::try_from(count).map_err(|_| AmqpError::encode(ErrorCode::LengthOverflow))?;
        write_u8(sink, code32)?;
        sink.write(&size.to_be_bytes())?;
        sink.write(&count.to_be_bytes())
    }
}

fn encode_value<S: EncodeSink>(v: &AmqpValue, sink: &mut S) -> Result<(), AmqpError> {
    match v.repr() {
        Repr::Null => write_u8(sink, ctor::NULL),
        Repr::Bool(true) => write_u8(sink, ctor::BOOL_TRUE),
        Repr::Bool(false) => write_u8(sink, ctor::BOOL_FALSE),
        Repr::Ubyte(n) => sink.write(&[ctor::UBYTE, *n]),
        Repr::Ushort(n) => {
            write_u8(sink, ctor::USHORT)?;
            sink.write(&n.to_be_bytes())
        }
        Repr::Uint(n) => match n {
            0 => write_u8(sink, ctor::UINT0),
            #[allow(clippy::cast_possible_truncation)]
            1..=255 => sink.write(&[ctor::SMALL_UINT, *n as u8]),
            _ => {
                write_u8(sink, ctor::UINT)?;
                sink.write(&n.to_be_bytes())
            }
        },
        Repr::Ulong(n) => match n {
            0 => write_u8(sink, ctor::ULONG0),
            #[allow(clippy::cast_possible_truncation)]
            1..=255 => sink.write(&[ctor::SMALL_ULONG, *n as u8]),
            _ => {
                write_u8(sink, ctor::ULONG)?;
                sink.write(&n.to_be_bytes())
            }
        },
        Repr::Byte(n) => sink.write(&[ctor::BYTE, n.to_be_bytes()[0]]),
        Repr::Short(n) => {
            write_u8(sink, ctor::SHORT)?;
            sink.write(&n.to_be_bytes())
        }
        Repr::Int(n) => {
            if let Ok(small) = i8::try_from(*n) {
                sink.write(&[ctor::SMALL_INT, small.to_be_bytes()[0]])
            } else {
                write_u8(sink, ctor::INT)?;
                sink.write(&n.to_be_bytes())
            }
        }
        Repr::Long(n) => {
            if let Ok(small) = i8::try_from(*n) {
                sink.write(&[ctor::SMALL_LONG, small.to_be_bytes()[0]])
            } else {
                write_u8(sink, ctor::LONG)?;
                sink.write(&n.to_be_bytes())
            }
        }
        Repr::Float(n) => {
            write_u8(sink, ctor::FLOAT)?;
            sink.write(&n.to_be_bytes())
        }
        Repr::Double(n) => {
            write_u8(sink, ctor::DOUBLE)?;
            sink.write(&n.to_be_bytes())
        }
        Repr::Char(c) => {
            write_u8(sink, ctor::CHAR)?;
            sink.write(&u32::from(*c).to_be_bytes())
        }
        Repr::Timestamp(ms) => {
            write_u8(sink, ctor::TIMESTAMP)?;
            sink.write(&ms.to_be_bytes())
        }
        Repr::Uuid(bytes) => {
            write_u8(sink, ctor::UUID)?;
            sink.write(bytes)
        }
        Repr::Binary(b) => encode_var(sink, ctor::VBIN8, ctor::VBIN32, b),
        Repr::String(s) => encode_var(sink, ctor::STR8, ctor::STR32, s.as_bytes()),
        Repr::Symbol(s) => encode_var(sink, ctor::SYM8, ctor::SYM32, s.as_bytes()),
        Repr::List(items) => {
            let items = items.borrow();
            if items.is_empty() {
                return write_u8(sink, ctor::LIST0);
            }
            let payload = sequence_payload_size(&items)?;
            encode_compound_header(sink, ctor::LIST8, ctor::LIST32, items.len(), payload)?;
            for item in items.iter() {
                encode_value(item, sink)?;
            }
            Ok(())
        }
        Repr::Map(pairs) => {
            let pairs = pairs.borrow();
            let payload = map_payload_size(&pairs)?;
            let count = pairs
                .len()
                .checked_mul(2)
                .ok_or(AmqpError::encode(ErrorCode::LengthOverflow))?;
            encode_compound_header(sink, ctor::MAP8, ctor::MAP32, count, payload)?;
            for (key, value) in pairs.iter() {
                encode_value(key, sink)?;
                encode_value(value, sink)?;
            }
            Ok(())
        }
        Repr::Array(items) => {
            let items = items.borrow();
            let payload = array_payload_size(&items)?;
            encode_compound_header(sink, ctor::ARRAY8, ctor::ARRAY32, items.len(), payload)?;
            if let Some(first) = items.first() {
                write_u8(sink, array_ctor(first))?;
                for item in items.iter() {
                    encode_array_elem(item, sink)?;
                }
            }
            Ok(())
        }
    }
}

/// The shared element constructor for an array: always the full-width form,
/// so one constructor fits every element.
fn array_ctor(v: &AmqpValue) -> u8 {
    match v.repr() {
        Repr::Null => ctor::NULL,
        Repr::Bool(_) => ctor::BOOL,
        Repr::Ubyte(_) => ctor::UBYTE,
        Repr::Ushort(_) => ctor::USHORT,
        Repr::Uint(_) => ctor::UINT,
        Repr::Ulong(_) => ctor::ULONG,
        Repr::Byte(_) => ctor::BYTE,
        Repr::Short(_) => ctor::SHORT,
        Repr::Int(_) => ctor::INT,
        Repr::Long(_) => ctor::LONG,
        Repr::Float(_) => ctor::FLOAT,
        Repr::Double(_) => ctor::DOUBLE,
        Repr::Char(_) => ctor::CHAR,
        Repr::Timestamp(_) => ctor::TIMESTAMP,
        Repr::Uuid(_) => ctor::UUID,
        Repr::Binary(_) => ctor::VBIN32,
        Repr::String(_) => ctor::STR32,
        Repr::Symbol(_) => ctor::SYM32,
        Repr::List(_) => ctor::LIST32,
        Repr::Map(_) => ctor::MAP32,
        Repr::Array(_) => ctor::ARRAY32,
    }
}

fn encode_wide_len_bytes<S: EncodeSink>(sink: &mut S, bytes: &[u8]) -> Result<(), AmqpError> {
    let len = var_len(bytes.len())?;
    sink.write(&len.to_be_bytes())?;
    sink.write(bytes)
}

fn encode_wide_compound_header<S: EncodeSink>(
    sink: &mut S,
    count: usize,
    payload: usize,
) -> Result<(), AmqpError> {
    let size = var_len(checked_sum(payload, 4)?)?;
    let count = u32::try_from(count).map_err(|_| AmqpError::encode(ErrorCode::LengthOverflow))?;
    sink.write(&size.to_be_bytes())?;
    sink.write(&count.to_be_bytes())
}

/// Encode an array element payload: the shared constructor already named the
/// type, so only the raw full-width payload is emitted.
fn encode_array_elem<S: EncodeSink>(v: &AmqpValue, sink: &mut S) -> Result<(), AmqpError> {
    match v.repr() {
        Repr::Null => Ok(()),
        Repr::Bool(b) => write_u8(sink, u8::from(*b)),
        Repr::Ubyte(n) => write_u8(sink, *n),
        Repr::Ushort(n) => sink.write(&n.to_be_bytes()),
        Repr::Uint(n) => sink.write(&n.to_be_bytes()),
        Repr::Ulong(n) => sink.write(&n.to_be_bytes()),
        Repr::Byte(n) => sink.write(&n.to_be_bytes()),
        Repr::Short(n) => sink.write(&n.to_be_bytes()),
        Repr::Int(n) => sink.write(&n.to_be_bytes()),
        Repr::Long(n) => sink.write(&n.to_be_bytes()),
        Repr::Float(n) => sink.write(&n.to_be_bytes()),
        Repr::Double(n) => sink.write(&n.to_be_bytes()),
        Repr::Char(c) => sink.write(&u32::from(*c).to_be_bytes()),
        Repr::Timestamp(ms) => sink.write(&ms.to_be_bytes()),
        Repr::Uuid(bytes) => sink.write(bytes),
        Repr::Binary(b) => encode_wide_len_bytes(sink, b),
        Repr::String(s) | Repr::Symbol(s) => encode_wide_len_bytes(sink, s.as_bytes()),
        Repr::List(items) => {
            let items = items.borrow();
            let payload = sequence_payload_size(&items)?;
            encode_wide_compound_header(sink, items.len(), payload)?;
            for item in items.iter() {
                encode_value(item, sink)?;
            }
            Ok(())
        }
        Repr::Map(pairs) => {
            let pairs = pairs.borrow();
            let payload = map_payload_size(&pairs)?;
            let count = pairs
                .len()
                .checked_mul(2)
                .ok_or(AmqpError::encode(ErrorCode::LengthOverflow))?;
            encode_wide_compound_header(sink, count, payload)?;
            for (key, value) in pairs.iter() {
                encode_value(key, sink)?;
                encode_value(value, sink)?;
            }
            Ok(())
        }
        Repr::Array(items) => {
            let items = items.borrow();
            let payload = array_payload_size(&items)?;
            encode_wide_compound_header(sink, items.len(), payload)?;
            if let Some(first) = items.first() {
                write_u8(sink, array_ctor(first))?;
                for item in items.iter() {
                    encode_array_elem(item, sink)?;
                }
            }
            Ok(())
        }
    }
}
