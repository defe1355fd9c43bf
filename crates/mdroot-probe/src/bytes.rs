//! Bounds-checked integer reads.
//!
//! Every read goes through [`field`], which turns an out-of-range access into
//! [`ProbeError::Truncated`] instead of a panic.

use crate::error::{ProbeError, ProbeResult};

/// Borrow `len` bytes starting at `offset`.
pub(crate) fn field(data: &[u8], offset: usize, len: usize) -> ProbeResult<&[u8]> {
    let end = offset.checked_add(len).ok_or(ProbeError::Truncated {
        needed: usize::MAX,
        available: data.len(),
    })?;
    data.get(offset..end).ok_or(ProbeError::Truncated {
        needed: end,
        available: data.len(),
    })
}

/// Fail with [`ProbeError::Truncated`] unless `data` holds at least `len` bytes.
pub(crate) fn require_len(data: &[u8], len: usize) -> ProbeResult<()> {
    if data.len() < len {
        return Err(ProbeError::Truncated {
            needed: len,
            available: data.len(),
        });
    }
    Ok(())
}

pub(crate) fn u8_at(data: &[u8], offset: usize) -> ProbeResult<u8> {
    Ok(field(data, offset, 1)?[0])
}

pub(crate) fn be_u16(data: &[u8], offset: usize) -> ProbeResult<u16> {
    let b = field(data, offset, 2)?;
    Ok(u16::from_be_bytes([b[0], b[1]]))
}

pub(crate) fn le_u16(data: &[u8], offset: usize) -> ProbeResult<u16> {
    let b = field(data, offset, 2)?;
    Ok(u16::from_le_bytes([b[0], b[1]]))
}

pub(crate) fn be_u32(data: &[u8], offset: usize) -> ProbeResult<u32> {
    let b = field(data, offset, 4)?;
    Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
}

pub(crate) fn le_u32(data: &[u8], offset: usize) -> ProbeResult<u32> {
    let b = field(data, offset, 4)?;
    Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

pub(crate) fn le_i32(data: &[u8], offset: usize) -> ProbeResult<i32> {
    let b = field(data, offset, 4)?;
    Ok(i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}
