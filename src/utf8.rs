use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

#[cfg(feature = "simdutf8")]
use simdutf8::basic as simd_utf8;

/// Validates UTF-8 and converts the bytes into an owned `Box<str>`.
///
/// With the `simdutf8` feature the validation is SIMD-accelerated where
/// supported.
#[inline]
pub fn into_utf8(bytes: Vec<u8>) -> Result<Box<str>, ()> {
    #[cfg(feature = "simdutf8")]
    if simd_utf8::from_utf8(&bytes).is_err() {
        return Err(());
    }

    String::from_utf8(bytes)
        .map(String::into_boxed_str)
        .map_err(|_| ())
}
