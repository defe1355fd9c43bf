//! GIF: logical screen descriptor follows the six-byte version header.

use crate::bytes::{le_u16, require_len};
use crate::{ImageDimensions, ProbeResult};

pub(crate) const SIGNATURE: &[u8] = b"GIF";

pub(crate) const MIN_LEN: usize = 10;

pub(crate) fn dimensions(data: &[u8]) -> ProbeResult<ImageDimensions> {
    require_len(data, MIN_LEN)?;
    let width = le_u16(data, 6)?;
    let height = le_u16(data, 8)?;
    ImageDimensions::new(u32::from(width), u32::from(height))
}
