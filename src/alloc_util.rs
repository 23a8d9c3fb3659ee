use alloc::string::String;
use alloc::vec::Vec;
use core::alloc::Layout;

use crate::{AmqpError, ErrorCode};

#[inline]
fn check_reserve_len<T>(len: usize, additional: usize) -> Result<(), AmqpError> {
    let needed = len
        .checked_add(additional)
        .ok_or(AmqpError::value(ErrorCode::LengthOverflow))?;
    Layout::array::<T>(needed).map_err(|_| AmqpError::value(ErrorCode::LengthOverflow))?;
    Ok(())
}

#[inline]
pub fn try_reserve<T>(v: &mut Vec<T>, additional: usize) -> Result<(), AmqpError> {
    let needed = v
        .len()
        .checked_add(additional)
        .ok_or(AmqpError::value(ErrorCode::LengthOverflow))?;
    if needed <= v.capacity() {
        return Ok(());
    }
    check_reserve_len::<T>(v.len(), additional)?;
    v.try_reserve(additional)
        .map_err(|_| AmqpError::value(ErrorCode::AllocationFailed))
}

#[inline]
pub fn try_reserve_exact<T>(v: &mut Vec<T>, additional: usize) -> Result<(), AmqpError> {
    let needed = v
        .len()
        .checked_add(additional)
        .ok_or(AmqpError::value(ErrorCode::LengthOverflow))?;
    if needed <= v.capacity() {
        return Ok(());
    }
    check_reserve_len::<T>(v.len(), additional)?;
    v.try_reserve_exact(additional)
        .map_err(|_| AmqpError::value(ErrorCode::AllocationFailed))
}

#[inline]
pub fn try_vec_from_slice(bytes: &[u8]) -> Result<Vec<u8>, AmqpError> {
    let mut v = Vec::new();
    try_reserve_exact(&mut v, bytes.len())?;
    v.extend_from_slice(bytes);
    Ok(v)
}

#[inline]
pub fn try_box_str_from_str(s: &str) -> Result<alloc::boxed::Box<str>, AmqpError> {
    let mut out = String::new();
    if s.len() > out.capacity() {
        check_reserve_len::<u8>(0, s.len())?;
        out.try_reserve_exact(s.len())
            .map_err(|_| AmqpError::value(ErrorCode::AllocationFailed))?;
    }
    out.push_str(s);
    Ok(out.into_boxed_str())
}
