use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use crate::alloc_util::{try_box_str_from_str, try_reserve, try_vec_from_slice};
use crate::{AmqpError, ErrorCode};

/// The type tag of an [`AmqpValue`].
///
/// The tag is fixed at construction and never changes; only the contents of
/// `List`/`Map`/`Array` values mutate in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmqpType {
    /// The null value.
    Null,
    /// Boolean.
    Bool,
    /// Unsigned 8-bit integer.
    Ubyte,
    /// Unsigned 16-bit integer.
    Ushort,
    /// Unsigned 32-bit integer.
    Uint,
    /// Unsigned 64-bit integer.
    Ulong,
    /// Signed 8-bit integer.
    Byte,
    /// Signed 16-bit integer.
    Short,
    /// Signed 32-bit integer.
    Int,
    /// Signed 64-bit integer.
    Long,
    /// IEEE-754 binary32.
    Float,
    /// IEEE-754 binary64.
    Double,
    /// Unicode scalar value.
    Char,
    /// Milliseconds since the Unix epoch, signed.
    Timestamp,
    /// 128-bit UUID.
    Uuid,
    /// Opaque byte sequence.
    Binary,
    /// UTF-8 string.
    String,
    /// ASCII symbol.
    Symbol,
    /// Ordered, heterogeneous sequence.
    List,
    /// Ordered key/value pairs.
    Map,
    /// Ordered sequence constrained to a single element tag.
    Array,
}

pub(crate) enum Repr {
    Null,
    Bool(bool),
    Ubyte(u8),
    Ushort(u16),
    Uint(u32),
    Ulong(u64),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Char(char),
    Timestamp(i64),
    Uuid([u8; 16]),
    Binary(Vec<u8>),
    String(Box<str>),
    Symbol(Box<str>),
    List(RefCell<Vec<AmqpValue>>),
    Map(RefCell<Vec<(AmqpValue, AmqpValue)>>),
    Array(RefCell<Vec<AmqpValue>>),
}

/// A refcounted handle to an AMQP 1.0 value.
///
/// `Clone` bumps the reference count and returns a handle aliasing the same
/// storage; it never deep-copies. Container mutation through one handle is
/// therefore visible through every alias. Dropping the last handle tears the
/// value tree down recursively.
///
/// Inserting a value into a container stores another handle to it, so the
/// caller keeps its own handle. Value graphs built through this API are DAGs;
/// do not insert a container into its own subtree.
#[derive(Clone)]
pub struct AmqpValue(Rc<Repr>);

impl AmqpValue {
    #[inline]
    fn new(repr: Repr) -> Self {
        Self(Rc::new(repr))
    }

    #[inline]
    pub(crate) fn repr(&self) -> &Repr {
        &self.0
    }

    /// Construct the null value.
    #[must_use]
    pub fn null() -> Self {
        Self::new(Repr::Null)
    }

    /// Construct a boolean value.
    #[must_use]
    pub fn bool(v: bool) -> Self {
        Self::new(Repr::Bool(v))
    }

    /// Construct an unsigned 8-bit integer value.
    #[must_use]
    pub fn ubyte(v: u8) -> Self {
        Self::new(Repr::Ubyte(v))
    }

    /// Construct an unsigned 16-bit integer value.
    #[must_use]
    pub fn ushort(v: u16) -> Self {
        Self::new(Repr::Ushort(v))
    }

    /// Construct an unsigned 32-bit integer value.
    #[must_use]
    pub fn uint(v: u32) -> Self {
        Self::new(Repr::Uint(v))
    }

    /// Construct an unsigned 64-bit integer value.
    #[must_use]
    pub fn ulong(v: u64) -> Self {
        Self::new(Repr::Ulong(v))
    }

    /// Construct a signed 8-bit integer value.
    #[must_use]
    pub fn byte(v: i8) -> Self {
        Self::new(Repr::Byte(v))
    }

    /// Construct a signed 16-bit integer value.
    #[must_use]
    pub fn short(v: i16) -> Self {
        Self::new(Repr::Short(v))
    }

    /// Construct a signed 32-bit integer value.
    #[must_use]
    pub fn int(v: i32) -> Self {
        Self::new(Repr::Int(v))
    }

    /// Construct a signed 64-bit integer value.
    #[must_use]
    pub fn long(v: i64) -> Self {
        Self::new(Repr::Long(v))
    }

    /// Construct an IEEE-754 binary32 value.
    #[must_use]
    pub fn float(v: f32) -> Self {
        Self::new(Repr::Float(v))
    }

    /// Construct an IEEE-754 binary64 value.
    #[must_use]
    pub fn double(v: f64) -> Self {
        Self::new(Repr::Double(v))
    }

    /// Construct a char value.
    ///
    /// `char` is a Unicode scalar value, so code points outside
    /// `[0, 0x10FFFF]` (and surrogates) are unrepresentable here.
    #[must_use]
    pub fn char(v: char) -> Self {
        Self::new(Repr::Char(v))
    }

    /// Construct a millisecond-epoch timestamp value.
    #[must_use]
    pub fn timestamp(ms: i64) -> Self {
        Self::new(Repr::Timestamp(ms))
    }

    /// Construct a UUID value from its 16 big-endian bytes.
    #[must_use]
    pub fn uuid(bytes: [u8; 16]) -> Self {
        Self::new(Repr::Uuid(bytes))
    }

    /// Construct a binary value owning a copy of `bytes`.
    ///
    /// The payload may be empty and may contain embedded zero bytes.
    ///
    /// # Errors
    ///
    /// Returns `AllocationFailed` if the backing buffer cannot be reserved.
    pub fn binary(bytes: &[u8]) -> Result<Self, AmqpError> {
        Ok(Self::new(Repr::Binary(try_vec_from_slice(bytes)?)))
    }

    /// Construct a UTF-8 string value owning a copy of `s`.
    ///
    /// # Errors
    ///
    /// Returns `AllocationFailed` if the backing buffer cannot be reserved.
    pub fn string(s: &str) -> Result<Self, AmqpError> {
        Ok(Self::new(Repr::String(try_box_str_from_str(s)?)))
    }

    /// Construct an ASCII symbol value owning a copy of `s`.
    ///
    /// # Errors
    ///
    /// Returns `SymbolNotAscii` if `s` contains non-ASCII characters, or
    /// `AllocationFailed` if the backing buffer cannot be reserved.
    pub fn symbol(s: &str) -> Result<Self, AmqpError> {
        if !s.is_ascii() {
            return Err(AmqpError::value(ErrorCode::SymbolNotAscii));
        }
        Ok(Self::new(Repr::Symbol(try_box_str_from_str(s)?)))
    }

    /// Construct an empty list.
    #[must_use]
    pub fn list() -> Self {
        Self::new(Repr::List(RefCell::new(Vec::new())))
    }

    /// Construct an empty map.
    #[must_use]
    pub fn map() -> Self {
        Self::new(Repr::Map(RefCell::new(Vec::new())))
    }

    /// Construct an empty array.
    #[must_use]
    pub fn array() -> Self {
        Self::new(Repr::Array(RefCell::new(Vec::new())))
    }

    pub(crate) fn from_binary(bytes: Vec<u8>) -> Self {
        Self::new(Repr::Binary(bytes))
    }

    pub(crate) fn from_string(s: Box<str>) -> Self {
        Self::new(Repr::String(s))
    }

    pub(crate) fn from_symbol(s: Box<str>) -> Self {
        Self::new(Repr::Symbol(s))
    }

    pub(crate) fn from_list(items: Vec<AmqpValue>) -> Self {
        Self::new(Repr::List(RefCell::new(items)))
    }

    pub(crate) fn from_map(pairs: Vec<(AmqpValue, AmqpValue)>) -> Self {
        Self::new(Repr::Map(RefCell::new(pairs)))
    }

    pub(crate) fn from_array(items: Vec<AmqpValue>) -> Self {
        Self::new(Repr::Array(RefCell::new(items)))
    }

    /// Return the type tag of this value.
    #[must_use]
    pub fn amqp_type(&self) -> AmqpType {
        match self.repr() {
            Repr::Null => AmqpType::Null,
            Repr::Bool(_) => AmqpType::Bool,
            Repr::Ubyte(_) => AmqpType::Ubyte,
            Repr::Ushort(_) => AmqpType::Ushort,
            Repr::Uint(_) => AmqpType::Uint,
            Repr::Ulong(_) => AmqpType::Ulong,
            Repr::Byte(_) => AmqpType::Byte,
            Repr::Short(_) => AmqpType::Short,
            Repr::Int(_) => AmqpType::Int,
            Repr::Long(_) => AmqpType::Long,
            Repr::Float(_) => AmqpType::Float,
            Repr::Double(_) => AmqpType::Double,
            Repr::Char(_) => AmqpType::Char,
            Repr::Timestamp(_) => AmqpType::Timestamp,
            Repr::Uuid(_) => AmqpType::Uuid,
            Repr::Binary(_) => AmqpType::Binary,
            Repr::String(_) => AmqpType::String,
            Repr::Symbol(_) => AmqpType::Symbol,
            Repr::List(_) => AmqpType::List,
            Repr::Map(_) => AmqpType::Map,
            Repr::Array(_) => AmqpType::Array,
        }
    }

    /// Returns `true` iff this is the null value.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self.repr(), Repr::Null)
    }

    /// Return the boolean payload, or `None` if the tag differs.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self.repr() {
            Repr::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Return the ubyte payload, or `None` if the tag differs.
    ///
    /// No widening or narrowing across the numeric tags: a `ubyte` accessor
    /// on a `ushort` value fails even when the number would fit.
    #[must_use]
    pub fn as_ubyte(&self) -> Option<u8> {
        match self.repr() {
            Repr::Ubyte(v) => Some(*v),
            _ => None,
        }
    }

    /// Return the ushort payload, or `None` if the tag differs.
    #[must_use]
    pub fn as_ushort(&self) -> Option<u16> {
        match self.repr() {
            Repr::Ushort(v) => Some(*v),
            _ => None,
        }
    }

    /// Return the uint payload, or `None` if the tag differs.
    #[must_use]
    pub fn as_uint(&self) -> Option<u32> {
        match self.repr() {
            Repr::Uint(v) => Some(*v),
            _ => None,
        }
    }

    /// Return the ulong payload, or `None` if the tag differs.
    #[must_use]
    pub fn as_ulong(&self) -> Option<u64> {
        match self.repr() {
            Repr::Ulong(v) => Some(*v),
            _ => None,
        }
    }

    /// Return the byte payload, or `None` if the tag differs.
    #[must_use]
    pub fn as_byte(&self) -> Option<i8> {
        match self.repr() {
            Repr::Byte(v) => Some(*v),
            _ => None,
        }
    }

    /// Return the short payload, or `None` if the tag differs.
    #[must_use]
    pub fn as_short(&self) -> Option<i16> {
        match self.repr() {
            Repr::Short(v) => Some(*v),
            _ => None,
        }
    }

    /// Return the int payload, or `None` if the tag differs.
    #[must_use]
    pub fn as_int(&self) -> Option<i32> {
        match self.repr() {
            Repr::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Return the long payload, or `None` if the tag differs.
    #[must_use]
    pub fn as_long(&self) -> Option<i64> {
        match self.repr() {
            Repr::Long(v) => Some(*v),
            _ => None,
        }
    }

    /// Return the float payload, or `None` if the tag differs.
    #[must_use]
    pub fn as_float(&self) -> Option<f32> {
        match self.repr() {
            Repr::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Return the double payload, or `None` if the tag differs.
    #[must_use]
    pub fn as_double(&self) -> Option<f64> {
        match self.repr() {
            Repr::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// Return the char payload, or `None` if the tag differs.
    #[must_use]
    pub fn as_char(&self) -> Option<char> {
        match self.repr() {
            Repr::Char(v) => Some(*v),
            _ => None,
        }
    }

    /// Return the timestamp payload, or `None` if the tag differs.
    #[must_use]
    pub fn as_timestamp(&self) -> Option<i64> {
        match self.repr() {
            Repr::Timestamp(v) => Some(*v),
            _ => None,
        }
    }

    /// Return the UUID payload, or `None` if the tag differs.
    #[must_use]
    pub fn as_uuid(&self) -> Option<[u8; 16]> {
        match self.repr() {
            Repr::Uuid(v) => Some(*v),
            _ => None,
        }
    }

    /// Borrow the binary payload, or `None` if the tag differs.
    ///
    /// The slice is valid for the lifetime of this handle and carries its
    /// own length; the buffer is never NUL-terminated.
    #[must_use]
    pub fn as_binary(&self) -> Option<&[u8]> {
        match self.repr() {
            Repr::Binary(v) => Some(v),
            _ => None,
        }
    }

    /// Borrow the string payload, or `None` if the tag differs.
    #[must_use]
    pub fn as_string(&self) -> Option<&str> {
        match self.repr() {
            Repr::String(v) => Some(v),
            _ => None,
        }
    }

    /// Borrow the symbol payload, or `None` if the tag differs.
    #[must_use]
    pub fn as_symbol(&self) -> Option<&str> {
        match self.repr() {
            Repr::Symbol(v) => Some(v),
            _ => None,
        }
    }

    fn with_list<R>(
        &self,
        f: impl FnOnce(&RefCell<Vec<AmqpValue>>) -> Result<R, AmqpError>,
    ) -> Result<R, AmqpError> {
        match self.repr() {
            Repr::List(items) => f(items),
            _ => Err(AmqpError::value(ErrorCode::TypeMismatch)),
        }
    }

    fn with_map<R>(
        &self,
        f: impl FnOnce(&RefCell<Vec<(AmqpValue, AmqpValue)>>) -> Result<R, AmqpError>,
    ) -> Result<R, AmqpError> {
        match self.repr() {
            Repr::Map(pairs) => f(pairs),
            _ => Err(AmqpError::value(ErrorCode::TypeMismatch)),
        }
    }

    fn with_array<R>(
        &self,
        f: impl FnOnce(&RefCell<Vec<AmqpValue>>) -> Result<R, AmqpError>,
    ) -> Result<R, AmqpError> {
        match self.repr() {
            Repr::Array(items) => f(items),
            _ => Err(AmqpError::value(ErrorCode::TypeMismatch)),
        }
    }

    /// Return the number of list elements.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` if this value is not a list.
    pub fn list_item_count(&self) -> Result<usize, AmqpError> {
        self.with_list(|items| Ok(items.borrow().len()))
    }

    /// Grow or shrink the list to exactly `count` elements.
    ///
    /// Growing fills the new slots with null values; shrinking drops the
    /// tail elements without releasing the backing capacity. Growth is
    /// all-or-nothing: a reservation failure leaves the list exactly as it
    /// was.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` if this value is not a list, or
    /// `AllocationFailed` on reservation failure (list unchanged).
    pub fn set_list_item_count(&self, count: usize) -> Result<(), AmqpError> {
        self.with_list(|items| {
            let mut items = items.borrow_mut();
            grow_with_nulls(&mut items, count)
        })
    }

    /// Store a handle to `item` at `index`, replacing any previous occupant.
    ///
    /// If `index` is beyond the current size the list grows first, filling
    /// intervening slots with nulls under the same all-or-nothing rule as
    /// [`set_list_item_count`](Self::set_list_item_count).
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` if this value is not a list, or
    /// `AllocationFailed` on reservation failure (list unchanged).
    pub fn set_list_item(&self, index: usize, item: &AmqpValue) -> Result<(), AmqpError> {
        self.with_list(|items| {
            let mut items = items.borrow_mut();
            if index >= items.len() {
                let count = index
                    .checked_add(1)
                    .ok_or(AmqpError::value(ErrorCode::LengthOverflow))?;
                grow_with_nulls(&mut items, count)?;
            }
            items[index] = item.clone();
            Ok(())
        })
    }

    /// Return a handle to the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` if this value is not a list, or
    /// `IndexOutOfRange` if `index` is beyond the current size.
    pub fn list_item(&self, index: usize) -> Result<AmqpValue, AmqpError> {
        self.with_list(|items| {
            items
                .borrow()
                .get(index)
                .cloned()
                .ok_or(AmqpError::value(ErrorCode::IndexOutOfRange))
        })
    }

    /// Return the number of key/value pairs.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` if this value is not a map.
    pub fn map_pair_count(&self) -> Result<usize, AmqpError> {
        self.with_map(|pairs| Ok(pairs.borrow().len()))
    }

    /// Set `key` to `value`, replacing in place when a structurally equal
    /// key already exists (pair order preserved) and appending otherwise.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` if this value is not a map, or
    /// `AllocationFailed` on reservation failure (map unchanged).
    pub fn set_map_value(&self, key: &AmqpValue, value: &AmqpValue) -> Result<(), AmqpError> {
        self.with_map(|pairs| {
            let mut pairs = pairs.borrow_mut();
            if let Some(pair) = pairs.iter_mut().find(|(k, _)| k == key) {
                pair.1 = value.clone();
                return Ok(());
            }
            try_reserve(&mut pairs, 1)?;
            pairs.push((key.clone(), value.clone()));
            Ok(())
        })
    }

    /// Return a handle to the value stored under `key`, or `Ok(None)` if the
    /// key is absent. Lookup is a linear scan by structural equality.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` if this value is not a map.
    pub fn map_value(&self, key: &AmqpValue) -> Result<Option<AmqpValue>, AmqpError> {
        self.with_map(|pairs| {
            Ok(pairs
                .borrow()
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone()))
        })
    }

    /// Return handles to the pair at `index`, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` if this value is not a map, or
    /// `IndexOutOfRange` if `index` is beyond the pair count.
    pub fn map_pair(&self, index: usize) -> Result<(AmqpValue, AmqpValue), AmqpError> {
        self.with_map(|pairs| {
            pairs
                .borrow()
                .get(index)
                .cloned()
                .ok_or(AmqpError::value(ErrorCode::IndexOutOfRange))
        })
    }

    /// Return the number of array elements.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` if this value is not an array.
    pub fn array_item_count(&self) -> Result<usize, AmqpError> {
        self.with_array(|items| Ok(items.borrow().len()))
    }

    /// Append a handle to `item`.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` if this value is not an array,
    /// `ElementTypeMismatch` if `item`'s tag differs from the existing
    /// element tag (array unchanged), or `AllocationFailed` on reservation
    /// failure (array unchanged).
    pub fn array_add(&self, item: &AmqpValue) -> Result<(), AmqpError> {
        self.with_array(|items| {
            let mut items = items.borrow_mut();
            if let Some(first) = items.first() {
                if first.amqp_type() != item.amqp_type() {
                    return Err(AmqpError::value(ErrorCode::ElementTypeMismatch));
                }
            }
            try_reserve(&mut items, 1)?;
            items.push(item.clone());
            Ok(())
        })
    }

    /// Return a handle to the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` if this value is not an array, or
    /// `IndexOutOfRange` if `index` is beyond the current size.
    pub fn array_item(&self, index: usize) -> Result<AmqpValue, AmqpError> {
        self.with_array(|items| {
            items
                .borrow()
                .get(index)
                .cloned()
                .ok_or(AmqpError::value(ErrorCode::IndexOutOfRange))
        })
    }
}

fn grow_with_nulls(items: &mut Vec<AmqpValue>, count: usize) -> Result<(), AmqpError> {
    if count <= items.len() {
        items.truncate(count);
        return Ok(());
    }
    // Reserve before pushing so a failure leaves the list untouched.
    try_reserve(items, count - items.len())?;
    while items.len() < count {
        items.push(AmqpValue::null());
    }
    Ok(())
}

impl PartialEq for AmqpValue {
    fn eq(&self, other: &Self) -> bool {
        if Rc::ptr_eq(&self.0, &other.0) {
            return true;
        }
        match (self.repr(), other.repr()) {
            (Repr::Null, Repr::Null) => true,
            (Repr::Bool(a), Repr::Bool(b)) => a == b,
            (Repr::Ubyte(a), Repr::Ubyte(b)) => a == b,
            (Repr::Ushort(a), Repr::Ushort(b)) => a == b,
            (Repr::Uint(a), Repr::Uint(b)) => a == b,
            (Repr::Ulong(a), Repr::Ulong(b)) => a == b,
            (Repr::Byte(a), Repr::Byte(b)) => a == b,
            (Repr::Short(a), Repr::Short(b)) => a == b,
            (Repr::Int(a), Repr::Int(b)) => a == b,
            (Repr::Long(a), Repr::Long(b)) => a == b,
            // Floats compare by bit pattern so equality stays total.
            (Repr::Float(a), Repr::Float(b)) => a.to_bits() == b.to_bits(),
            (Repr::Double(a), Repr::Double(b)) => a.to_bits() == b.to_bits(),
            (Repr::Char(a), Repr::Char(b)) => a == b,
            (Repr::Timestamp(a), Repr::Timestamp(b)) => a == b,
            (Repr::Uuid(a), Repr::Uuid(b)) => a == b,
            (Repr::Binary(a), Repr::Binary(b)) => a == b,
            (Repr::String(a), Repr::String(b)) => a == b,
            (Repr::Symbol(a), Repr::Symbol(b)) => a == b,
            (Repr::List(a), Repr::List(b)) | (Repr::Array(a), Repr::Array(b)) => {
                *a.borrow() == *b.borrow()
            }
            // Pair order is semantically significant for maps: identical
            // pairs in a different order are unequal.
            (Repr::Map(a), Repr::Map(b)) => *a.borrow() == *b.borrow(),
            _ => false,
        }
    }
}

impl Eq for AmqpValue {}

impl fmt::Display for AmqpValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.repr() {
            Repr::Null => f.write_str("NULL"),
            Repr::Bool(v) => write!(f, "{v}"),
            Repr::Ubyte(v) => write!(f, "{v}"),
            Repr::Ushort(v) => write!(f, "{v}"),
            Repr::Uint(v) => write!(f, "{v}"),
            Repr::Ulong(v) => write!(f, "{v}"),
            Repr::Byte(v) => write!(f, "{v}"),
            Repr::Short(v) => write!(f, "{v}"),
            Repr::Int(v) => write!(f, "{v}"),
            Repr::Long(v) => write!(f, "{v}"),
            Repr::Float(v) => write!(f, "{v}"),
            Repr::Double(v) => write!(f, "{v}"),
            Repr::Char(v) => write!(f, "{v}"),
            Repr::Timestamp(v) => write!(f, "{v}"),
            Repr::Uuid(b) => write!(
                f,
                "{:02x}{:02x}{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
                b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
                b[8], b[9], b[10], b[11], b[12], b[13], b[14], b[15]
            ),
            Repr::Binary(bytes) => {
                f.write_str("<")?;
                for (i, b) in bytes.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{b:02X}")?;
                }
                f.write_str(">")
            }
            Repr::String(s) | Repr::Symbol(s) => f.write_str(s),
            Repr::List(items) | Repr::Array(items) => {
                f.write_str("{")?;
                for (i, item) in items.borrow().iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("}")
            }
            Repr::Map(pairs) => {
                f.write_str("{")?;
                for (i, (k, v)) in pairs.borrow().iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "[{k}:{v}]")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl fmt::Debug for AmqpValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AmqpValue({:?}: {self})", self.amqp_type())
    }
}
