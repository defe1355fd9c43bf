//! WebP: only the lossless `VP8L` bitstream header is decoded.
//!
//! The 14-bit `width - 1` and `height - 1` fields are packed little-endian
//! into the 32 bits starting at offset 21. Lossy (`VP8 `) and extended
//! (`VP8X`) files are recognised but reported as unsupported.

use crate::bytes::{field, le_u32, require_len};
use crate::{ImageDimensions, ProbeError, ProbeResult};

pub(crate) const SIGNATURE: &[u8] = b"RIFF";

pub(crate) const MIN_LEN: usize = 25;

const FORM_TYPE: &[u8] = b"WEBP";
const LOSSLESS: &[u8] = b"VP8L";
const LOSSY: &[u8] = b"VP8 ";
const EXTENDED: &[u8] = b"VP8X";
const SIZE_BITS_OFFSET: usize = 21;
const FIELD_MASK: u32 = 0x3FFF;

pub(crate) fn dimensions(data: &[u8]) -> ProbeResult<ImageDimensions> {
    require_len(data, MIN_LEN)?;

    let chunk = chunk_type(data)?;
    if chunk == LOSSY {
        return Err(ProbeError::Unsupported("lossy VP8 bitstream"));
    }
    if chunk == EXTENDED {
        return Err(ProbeError::Unsupported("extended VP8X container"));
    }
    if chunk != LOSSLESS {
        return Err(ProbeError::Malformed("unknown RIFF chunk"));
    }

    let (width, height) = unpack_size(le_u32(data, SIZE_BITS_OFFSET)?);
    ImageDimensions::new(width, height)
}

/// Locate the first chunk's fourcc.
///
/// Standard files carry the `WEBP` form type at offset 8 and the chunk at 12.
/// Some writers emit the chunk fourcc directly at offset 8; both are accepted.
fn chunk_type(data: &[u8]) -> ProbeResult<&[u8]> {
    let at_eight = field(data, 8, 4)?;
    if at_eight == FORM_TYPE {
        return field(data, 12, 4);
    }
    Ok(at_eight)
}

/// Split the packed size field into `(width, height)`.
pub(crate) fn unpack_size(bits: u32) -> (u32, u32) {
    let width = (bits & FIELD_MASK) + 1;
    let height = ((bits >> 14) & FIELD_MASK) + 1;
    (width, height)
}
