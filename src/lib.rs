//! AMQP 1.0 value type engine.
//!
//! This crate implements the AMQP 1.0 type system as a dynamically tagged
//! value model with refcounted shared ownership, together with a
//! size-minimal canonical binary encoder and a chunk-agnostic resumable
//! streaming decoder.
//!
//! # Value model
//!
//! [`AmqpValue`] is a cheap-to-clone handle: cloning aliases the same
//! underlying value rather than copying it, so a value inserted into several
//! containers is shared, and mutation through one handle is visible through
//! all of them. Containers (lists, maps, arrays) hold further handles and
//! nest arbitrarily.
//!
//! ```
//! use amqp_value::AmqpValue;
//!
//! let list = AmqpValue::list();
//! list.set_list_item(0, &AmqpValue::uint(42))?;
//! list.set_list_item(2, &AmqpValue::string("hello")?)?;
//! assert_eq!(list.list_item_count()?, 3);
//! assert!(list.list_item(1)?.is_null());
//! # Ok::<(), amqp_value::AmqpError>(())
//! ```
//!
//! # Encoding
//!
//! [`AmqpValue::encode`] emits the size-minimal encoding of a value into an
//! [`EncodeSink`]; [`AmqpValue::encoded_size`] predicts the exact byte count
//! without emitting anything.
//!
//! ```
//! use amqp_value::AmqpValue;
//!
//! let value = AmqpValue::uint(255);
//! assert_eq!(value.encode_to_vec()?, [0x52, 0xFF]);
//! # Ok::<(), amqp_value::AmqpError>(())
//! ```
//!
//! # Decoding
//!
//! [`Decoder`] consumes a byte stream in arbitrary chunks and fires a
//! callback once per completed top-level value:
//!
//! ```
//! use amqp_value::{AmqpValue, Decoder};
//!
//! let mut decoded = Vec::new();
//! let mut decoder = Decoder::new(|v| decoded.push(v));
//! decoder.decode_bytes(&[0x56])?;
//! decoder.decode_bytes(&[0x01])?;
//! drop(decoder);
//! assert_eq!(decoded, [AmqpValue::bool(true)]);
//! # Ok::<(), amqp_value::AmqpError>(())
//! ```
//!
//! # Features
//!
//! - `std` (default): implements `std::error::Error` for [`AmqpError`].
//!   Without it the crate is `no_std` + `alloc`.
//! - `simdutf8`: SIMD-accelerated UTF-8 validation of decoded strings.

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

extern crate alloc;

mod alloc_util;
pub mod constructor;
mod decode;
mod encode;
mod error;
mod utf8;
mod value;

pub use decode::Decoder;
pub use encode::EncodeSink;
pub use error::{AmqpError, ErrorCode, ErrorKind};
pub use value::{AmqpType, AmqpValue};
