//! PNG: dimensions live in the IHDR chunk that directly follows the signature.

use crate::bytes::{be_u32, require_len};
use crate::{ImageDimensions, ProbeResult};

pub(crate) const SIGNATURE: &[u8] = &[0x89, 0x50, 0x4E, 0x47];

/// Signature (8) + IHDR length (4) + IHDR type (4) + width (4) + height (4).
pub(crate) const MIN_LEN: usize = 24;

pub(crate) fn dimensions(data: &[u8]) -> ProbeResult<ImageDimensions> {
    require_len(data, MIN_LEN)?;
    ImageDimensions::new(be_u32(data, 16)?, be_u32(data, 20)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProbeError;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let mut data = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        data.extend_from_slice(&13u32.to_be_bytes());
        data.extend_from_slice(b"IHDR");
        data.extend_from_slice(&width.to_be_bytes());
        data.extend_from_slice(&height.to_be_bytes());
        data.extend_from_slice(&[8, 6, 0, 0, 0]);
        data
    }

    #[test]
    fn test_reads_ihdr() {
        let dims = dimensions(&png(1920, 1080)).unwrap();
        assert_eq!((dims.width, dims.height), (1920, 1080));
    }

    #[test]
    fn test_large_values_are_big_endian() {
        let dims = dimensions(&png(0x0001_0203, 7)).unwrap();
        assert_eq!(dims.width, 0x0001_0203);
    }

    #[test]
    fn test_truncated_header() {
        let data = png(10, 10);
        assert_eq!(
            dimensions(&data[..23]),
            Err(ProbeError::Truncated {
                needed: 24,
                available: 23
            })
        );
    }

    #[test]
    fn test_zero_width_is_malformed() {
        assert!(matches!(
            dimensions(&png(0, 10)),
            Err(ProbeError::Malformed(_))
        ));
    }
}
