use alloc::vec::Vec;
use core::alloc::Layout;

use crate::{CborError, ErrorKind};

#[inline]
fn check_reserve_len<T>(len: usize, additional: usize, offset: usize) -> Result<(), CborError> {
    let needed = len
        .checked_add(additional)
        .ok_or_else(|| CborError::new(ErrorKind::Malformed, offset))?;
    Layout::array::<T>(needed).map_err(|_| CborError::new(ErrorKind::Malformed, offset))?;
    Ok(())
}

#[inline]
pub fn try_reserve_exact<T>(
    v: &mut Vec<T>,
    additional: usize,
    offset: usize,
) -> Result<(), CborError> {
    let needed = v
        .len()
        .checked_add(additional)
        .ok_or_else(|| CborError::new(ErrorKind::Malformed, offset))?;
    if needed <= v.capacity() {
        return Ok(());
    }
    check_reserve_len::<T>(v.len(), additional, offset)?;
    v.try_reserve_exact(additional)
        .map_err(|_| CborError::new(ErrorKind::AllocationFailed, offset))
}

#[inline]
pub fn try_reserve<T>(v: &mut Vec<T>, additional: usize, offset: usize) -> Result<(), CborError> {
    let needed = v
        .len()
        .checked_add(additional)
        .ok_or_else(|| CborError::new(ErrorKind::Malformed, offset))?;
    if needed <= v.capacity() {
        return Ok(());
    }
    check_reserve_len::<T>(v.len(), additional, offset)?;
    v.try_reserve(additional)
        .map_err(|_| CborError::new(ErrorKind::AllocationFailed, offset))
}

#[inline]
pub fn try_vec_from_slice(bytes: &[u8], offset: usize) -> Result<Vec<u8>, CborError> {
    let mut v = Vec::new();
    try_reserve_exact(&mut v, bytes.len(), offset)?;
    v.extend_from_slice(bytes);
    Ok(v)
}

#[inline]
pub fn try_vec_with_capacity<T>(cap: usize, offset: usize) -> Result<Vec<T>, CborError> {
    let mut v: Vec<T> = Vec::new();
    try_reserve_exact(&mut v, cap, offset)?;
    Ok(v)
}
