use alloc::vec::Vec;
use core::mem;

use crate::alloc_util::try_reserve;
use crate::constructor::{self as ctor, classify, Form};
use crate::{AmqpError, AmqpValue, ErrorCode};

/// Resumable streaming decoder for AMQP 1.0 values.
///
/// One decoder serves one logical byte stream. Bytes are pushed in with
/// [`decode_bytes`](Self::decode_bytes) in any chunking, down to one byte per
/// call; the decoder parks mid-field when input runs out and resumes on the
/// next call, producing identical results regardless of chunking.
///
/// Each time a complete top-level value has been reconstructed, the
/// `on_value` callback fires exactly once with an owned handle (the decoder
/// retains nothing), and decoding continues with the next value.
///
/// A fatal error (malformed input or allocation failure) leaves the decoder
/// unusable: every later call fails with `DecoderFailed`. Drop it and create
/// a new one to recover.
pub struct Decoder<F: FnMut(AmqpValue)> {
    on_value: F,
    state: State,
    stack: Vec<Frame>,
    scratch: [u8; 16],
    scratch_len: usize,
    body: Vec<u8>,
    consumed: usize,
    failed: bool,
}

#[derive(Clone, Copy)]
enum State {
    /// The next byte is a type constructor.
    Constructor,
    /// Accumulating `need` fixed payload bytes into the scratch.
    FixedBody { code: u8, need: usize },
    /// Accumulating a 1- or 4-byte length field into the scratch.
    VarHeader { code: u8, need: usize },
    /// Accumulating `remaining` variable payload bytes.
    VarBody { code: u8, remaining: usize },
    /// Accumulating the size and count fields of a compound header.
    CompoundHeader { code: u8, need: usize },
    /// The next byte is the shared element constructor of an array.
    ArrayConstructor,
}

/// One in-progress composite per nesting level.
enum Frame {
    List {
        remaining: usize,
        items: Vec<AmqpValue>,
    },
    Map {
        /// Values still expected, counting keys and values individually.
        remaining: usize,
        pending_key: Option<AmqpValue>,
        pairs: Vec<(AmqpValue, AmqpValue)>,
    },
    Array {
        remaining: usize,
        /// Shared element constructor, read once after the header.
        code: u8,
        items: Vec<AmqpValue>,
    },
}

impl<F: FnMut(AmqpValue)> Decoder<F> {
    /// Create a decoder that passes each completed top-level value to
    /// `on_value`.
    pub fn new(on_value: F) -> Self {
        Self {
            on_value,
            state: State::Constructor,
            stack: Vec::new(),
            scratch: [0; 16],
            scratch_len: 0,
            body: Vec::new(),
            consumed: 0,
            failed: false,
        }
    }

    /// Return the total number of bytes consumed so far.
    #[must_use]
    pub fn bytes_consumed(&self) -> usize {
        self.consumed
    }

    /// Feed the next chunk of the byte stream.
    ///
    /// Insufficient bytes is not an error: the call succeeds having consumed
    /// the whole buffer, and decoding resumes where it left off on the next
    /// call.
    ///
    /// # Errors
    ///
    /// Returns `EmptyDecodeInput` (decoder unaffected) if `buffer` is empty.
    /// Returns a fatal decode error on malformed input or allocation
    /// failure; after that every call fails with `DecoderFailed`.
    pub fn decode_bytes(&mut self, buffer: &[u8]) -> Result<(), AmqpError> {
        if buffer.is_empty() {
            return Err(AmqpError::value(ErrorCode::EmptyDecodeInput));
        }
        if self.failed {
            return Err(AmqpError::decode(ErrorCode::DecoderFailed, self.consumed));
        }
        match self.run(buffer) {
            Ok(()) => Ok(()),
            Err(err) => {
                self.failed = true;
                Err(err)
            }
        }
    }

    fn fail(&self, code: ErrorCode) -> AmqpError {
        AmqpError::decode(code, self.consumed)
    }

    fn alloc_err(&self, err: AmqpError) -> AmqpError {
        AmqpError::decode(err.code, self.consumed)
    }

    fn run(&mut self, buffer: &[u8]) -> Result<(), AmqpError> {
        let mut pos = 0usize;
        while pos < buffer.len() {
            match self.state {
                State::Constructor => {
                    let code = buffer[pos];
                    pos += 1;
                    self.consumed += 1;
                    self.begin(code)?;
                }
                State::ArrayConstructor => {
                    let code = buffer[pos];
                    pos += 1;
                    self.consumed += 1;
                    if classify(code).is_none() {
                        return Err(self.fail(ErrorCode::InvalidConstructor));
                    }
                    if let Some(Frame::Array { code: slot, .. }) = self.stack.last_mut() {
                        *slot = code;
                    }
                    self.begin(code)?;
                }
                State::FixedBody { code, need } => {
                    let take = (need - self.scratch_len).min(buffer.len() - pos);
                    self.scratch[self.scratch_len..self.scratch_len + take]
                        .copy_from_slice(&buffer[pos..pos + take]);
                    self.scratch_len += take;
                    pos += take;
                    self.consumed += take;
                    if self.scratch_len == need {
                        let value = self.finish_fixed(code, need)?;
                        self.complete_value(value)?;
                    }
                }
                State::VarHeader { code, need } => {
                    let take = (need - self.scratch_len).min(buffer.len() - pos);
                    self.scratch[self.scratch_len..self.scratch_len + take]
                        .copy_from_slice(&buffer[pos..pos + take]);
                    self.scratch_len += take;
                    pos += take;
                    self.consumed += take;
                    if self.scratch_len == need {
                        let len = self.field_value(0, need);
                        if len == 0 {
                            let value = self.finish_var(code, Vec::new())?;
                            self.complete_value(value)?;
                        } else {
                            self.state = State::VarBody {
                                code,
                                remaining: len,
                            };
                        }
                    }
                }
                State::VarBody { code, remaining } => {
                    let take = remaining.min(buffer.len() - pos);
                    try_reserve(&mut self.body, take).map_err(|e| self.alloc_err(e))?;
                    self.body.extend_from_slice(&buffer[pos..pos + take]);
                    pos += take;
                    self.consumed += take;
                    if take == remaining {
                        let payload = mem::take(&mut self.body);
                        let value = self.finish_var(code, payload)?;
                        self.complete_value(value)?;
                    } else {
                        self.state = State::VarBody {
                            code,
                            remaining: remaining - take,
                        };
                    }
                }
                State::CompoundHeader { code, need } => {
                    let take = (need - self.scratch_len).min(buffer.len() - pos);
                    self.scratch[self.scratch_len..self.scratch_len + take]
                        .copy_from_slice(&buffer[pos..pos + take]);
                    self.scratch_len += take;
                    pos += take;
                    self.consumed += take;
                    if self.scratch_len == need {
                        let field_width = need / 2;
                        let size = self.field_value(0, field_width);
                        let count = self.field_value(field_width, field_width);
                        self.begin_compound(code, field_width, size, count)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Read a big-endian 1- or 4-byte field out of the scratch.
    fn field_value(&self, at: usize, width: usize) -> usize {
        if width == 1 {
            usize::from(self.scratch[at])
        } else {
            let mut buf = [0u8; 4];
            buf.copy_from_slice(&self.scratch[at..at + 4]);
            u32::from_be_bytes(buf) as usize
        }
    }

    /// Start decoding a value whose constructor is `code`. Zero-width forms
    /// complete immediately; everything else parks the machine in the state
    /// its payload requires.
    fn begin(&mut self, code: u8) -> Result<(), AmqpError> {
        match classify(code) {
            None => Err(self.fail(ErrorCode::InvalidConstructor)),
            Some(Form::ZeroWidth) => {
                let value = zero_width_value(code);
                self.complete_value(value)
            }
            Some(form) => {
                self.scratch_len = 0;
                self.state = payload_state(code, form);
                Ok(())
            }
        }
    }

    fn begin_compound(
        &mut self,
        code: u8,
        field_width: usize,
        size: usize,
        count: usize,
    ) -> Result<(), AmqpError> {
        // The size field covers the count field plus the payload. Lists and
        // maps need at least one constructor byte per declared element;
        // arrays need one shared constructor byte when non-empty.
        let min_payload = match code {
            ctor::ARRAY8 | ctor::ARRAY32 => usize::from(count > 0),
            _ => count,
        };
        let min_size = field_width
            .checked_add(min_payload)
            .ok_or(self.fail(ErrorCode::LengthOverflow))?;
        if size < min_size {
            return Err(self.fail(ErrorCode::CompoundSizeTooSmall));
        }

        match code {
            ctor::LIST8 | ctor::LIST32 => {
                if count == 0 {
                    return self.complete_value(AmqpValue::from_list(Vec::new()));
                }
                self.push_frame(Frame::List {
                    remaining: count,
                    items: Vec::new(),
                })?;
                self.state = State::Constructor;
                Ok(())
            }
            ctor::MAP8 | ctor::MAP32 => {
                if count % 2 != 0 {
                    return Err(self.fail(ErrorCode::OddMapCount));
                }
                if count == 0 {
                    return self.complete_value(AmqpValue::from_map(Vec::new()));
                }
                self.push_frame(Frame::Map {
                    remaining: count,
                    pending_key: None,
                    pairs: Vec::new(),
                })?;
                self.state = State::Constructor;
                Ok(())
            }
            _ => {
                if count == 0 {
                    return self.complete_value(AmqpValue::from_array(Vec::new()));
                }
                self.push_frame(Frame::Array {
                    remaining: count,
                    code: ctor::NULL,
                    items: Vec::new(),
                })?;
                self.state = State::ArrayConstructor;
                Ok(())
            }
        }
    }

    fn push_frame(&mut self, frame: Frame) -> Result<(), AmqpError> {
        try_reserve(&mut self.stack, 1).map_err(|e| self.alloc_err(e))?;
        self.stack.push(frame);
        Ok(())
    }

    /// Absorb a completed value into the innermost frame, unwinding every
    /// container it completes, and fire the callback at stack depth zero.
    ///
    /// Iterative on purpose: array elements with zero-width constructors
    /// complete without consuming payload bytes, so a declared count must
    /// not translate into recursion depth.
    fn complete_value(&mut self, value: AmqpValue) -> Result<(), AmqpError> {
        let mut value = value;
        loop {
            let alloc_failed = AmqpError::decode(ErrorCode::AllocationFailed, self.consumed);
            let finished = match self.stack.last_mut() {
                None => {
                    (self.on_value)(value);
                    self.state = State::Constructor;
                    return Ok(());
                }
                Some(Frame::List { remaining, items }) => {
                    try_reserve(items, 1).map_err(|_| alloc_failed)?;
                    items.push(value);
                    *remaining -= 1;
                    *remaining == 0
                }
                Some(Frame::Map {
                    remaining,
                    pending_key,
                    pairs,
                }) => {
                    match pending_key.take() {
                        None => *pending_key = Some(value),
                        Some(key) => {
                            try_reserve(pairs, 1).map_err(|_| alloc_failed)?;
                            pairs.push((key, value));
                        }
                    }
                    *remaining -= 1;
                    *remaining == 0
                }
                Some(Frame::Array {
                    remaining, items, ..
                }) => {
                    try_reserve(items, 1).map_err(|_| alloc_failed)?;
                    items.push(value);
                    *remaining -= 1;
                    *remaining == 0
                }
            };

            if finished {
                value = match self.stack.pop() {
                    Some(Frame::List { items, .. }) => AmqpValue::from_list(items),
                    Some(Frame::Map { pairs, .. }) => AmqpValue::from_map(pairs),
                    Some(Frame::Array { items, .. }) => AmqpValue::from_array(items),
                    None => return Err(self.fail(ErrorCode::DecoderFailed)),
                };
                continue;
            }

            // More elements expected. Lists and maps read a constructor per
            // element; arrays reuse the shared one.
            match self.stack.last() {
                Some(Frame::Array { code, .. }) => {
                    let code = *code;
                    match classify(code) {
                        Some(Form::ZeroWidth) => {
                            value = zero_width_value(code);
                            continue;
                        }
                        Some(form) => {
                            self.scratch_len = 0;
                            self.state = payload_state(code, form);
                            return Ok(());
                        }
                        None => return Err(self.fail(ErrorCode::InvalidConstructor)),
                    }
                }
                _ => {
                    self.state = State::Constructor;
                    return Ok(());
                }
            }
        }
    }

    fn finish_fixed(&mut self, code: u8, need: usize) -> Result<AmqpValue, AmqpError> {
        let bytes = &self.scratch[..need];
        let value = match code {
            ctor::UBYTE => AmqpValue::ubyte(bytes[0]),
            ctor::BYTE => AmqpValue::byte(i8::from_be_bytes([bytes[0]])),
            ctor::SMALL_UINT => AmqpValue::uint(u32::from(bytes[0])),
            ctor::SMALL_ULONG => AmqpValue::ulong(u64::from(bytes[0])),
            ctor::SMALL_INT => AmqpValue::int(i32::from(i8::from_be_bytes([bytes[0]]))),
            ctor::SMALL_LONG => AmqpValue::long(i64::from(i8::from_be_bytes([bytes[0]]))),
            ctor::BOOL => match bytes[0] {
                0x00 => AmqpValue::bool(false),
                0x01 => AmqpValue::bool(true),
                _ => return Err(self.fail(ErrorCode::InvalidBoolean)),
            },
            ctor::USHORT => AmqpValue::ushort(u16::from_be_bytes([bytes[0], bytes[1]])),
            ctor::SHORT => AmqpValue::short(i16::from_be_bytes([bytes[0], bytes[1]])),
            ctor::UINT => AmqpValue::uint(u32::from_be_bytes(four(bytes))),
            ctor::INT => AmqpValue::int(i32::from_be_bytes(four(bytes))),
            ctor::FLOAT => AmqpValue::float(f32::from_bits(u32::from_be_bytes(four(bytes)))),
            ctor::CHAR => {
                let cp = u32::from_be_bytes(four(bytes));
                match char::from_u32(cp) {
                    Some(c) => AmqpValue::char(c),
                    None => return Err(self.fail(ErrorCode::InvalidCharCode)),
                }
            }
            ctor::ULONG => AmqpValue::ulong(u64::from_be_bytes(eight(bytes))),
            ctor::LONG => AmqpValue::long(i64::from_be_bytes(eight(bytes))),
            ctor::DOUBLE => AmqpValue::double(f64::from_bits(u64::from_be_bytes(eight(bytes)))),
            ctor::TIMESTAMP => AmqpValue::timestamp(i64::from_be_bytes(eight(bytes))),
            ctor::UUID => {
                let mut uuid = [0u8; 16];
                uuid.copy_from_slice(bytes);
                AmqpValue::uuid(uuid)
            }
            _ => return Err(self.fail(ErrorCode::InvalidConstructor)),
        };
        self.scratch_len = 0;
        Ok(value)
    }

    fn finish_var(&mut self, code: u8, payload: Vec<u8>) -> Result<AmqpValue, AmqpError> {
        self.scratch_len = 0;
        match code {
            ctor::VBIN8 | ctor::VBIN32 => Ok(AmqpValue::from_binary(payload)),
            ctor::STR8 | ctor::STR32 => crate::utf8::into_utf8(payload)
                .map(AmqpValue::from_string)
                .map_err(|()| self.fail(ErrorCode::Utf8Invalid)),
            ctor::SYM8 | ctor::SYM32 => {
                if !payload.is_ascii() {
                    return Err(self.fail(ErrorCode::SymbolNotAscii));
                }
                crate::utf8::into_utf8(payload)
                    .map(AmqpValue::from_symbol)
                    .map_err(|()| self.fail(ErrorCode::SymbolNotAscii))
            }
            _ => Err(self.fail(ErrorCode::InvalidConstructor)),
        }
    }
}

fn four(bytes: &[u8]) -> [u8; 4] {
    [bytes[0], bytes[1], bytes[2], bytes[3]]
}

fn eight(bytes: &[u8]) -> [u8; 8] {
    [
        bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
    ]
}

fn zero_width_value(code: u8) -> AmqpValue {
    match code {
        ctor::BOOL_TRUE => AmqpValue::bool(true),
        ctor::BOOL_FALSE => AmqpValue::bool(false),
        ctor::UINT0 => AmqpValue::uint(0),
        ctor::ULONG0 => AmqpValue::ulong(0),
        ctor::LIST0 => AmqpValue::from_list(Vec::new()),
        _ => AmqpValue::null(),
    }
}

fn payload_state(code: u8, form: Form) -> State {
    match form {
        Form::Fixed(need) => State::FixedBody { code, need },
        Form::Variable { len_width } => State::VarHeader {
            code,
            need: len_width,
        },
        Form::Compound { field_width } => State::CompoundHeader {
            code,
            need: field_width * 2,
        },
        // Zero-width forms never park the machine.
        Form::ZeroWidth => State::Constructor,
    }
}
