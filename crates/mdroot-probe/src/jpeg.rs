//! JPEG: walk marker segments until the first baseline, extended or
//! progressive frame header (SOF0/SOF1/SOF2).

use crate::bytes::{be_u16, require_len, u8_at};
use crate::{ImageDimensions, ProbeError, ProbeResult};

pub(crate) const SIGNATURE: &[u8] = &[0xFF, 0xD8];

pub(crate) const MIN_LEN: usize = 2;

const MARKER_PREFIX: u8 = 0xFF;
const SOF0: u8 = 0xC0;
const SOF2: u8 = 0xC2;
const SOS: u8 = 0xDA;
const EOI: u8 = 0xD9;
const TEM: u8 = 0x01;
const RST0: u8 = 0xD0;
const RST7: u8 = 0xD7;

pub(crate) fn dimensions(data: &[u8]) -> ProbeResult<ImageDimensions> {
    require_len(data, MIN_LEN)?;

    let mut offset = MIN_LEN;
    loop {
        // Running off the end here is the "no frame header" outcome.
        if u8_at(data, offset)? != MARKER_PREFIX {
            offset += 1;
            continue;
        }

        let marker = u8_at(data, offset + 1)?;
        match marker {
            // Fill byte before the real marker.
            MARKER_PREFIX => offset += 1,
            TEM | RST0..=RST7 => offset += 2,
            SOS | EOI => return Err(ProbeError::Malformed("scan data before frame header")),
            SOF0..=SOF2 => {
                let height = be_u16(data, offset + 5)?;
                let width = be_u16(data, offset + 7)?;
                return ImageDimensions::new(u32::from(width), u32::from(height));
            }
            _ => {
                let length = usize::from(be_u16(data, offset + 2)?);
                if length < 2 {
                    return Err(ProbeError::Malformed("segment length below 2"));
                }
                offset += 2 + length;
            }
        }
    }
}
