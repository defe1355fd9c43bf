//! BMP: signed sizes in the `BITMAPINFOHEADER`.
//!
//! A negative height marks top-down row order; only the magnitude matters here.

use crate::bytes::{le_i32, require_len};
use crate::{ImageDimensions, ProbeError, ProbeResult};

pub(crate) const SIGNATURE: &[u8] = b"BM";

pub(crate) const MIN_LEN: usize = 26;

pub(crate) fn dimensions(data: &[u8]) -> ProbeResult<ImageDimensions> {
    require_len(data, MIN_LEN)?;
    let width = le_i32(data, 18)?;
    let height = le_i32(data, 22)?;
    let width = u32::try_from(width).map_err(|_| ProbeError::Malformed("negative width"))?;
    ImageDimensions::new(width, height.unsigned_abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bmp(width: i32, height: i32) -> Vec<u8> {
        let mut data = b"BM".to_vec();
        data.extend_from_slice(&[0; 12]);
        data.extend_from_slice(&40u32.to_le_bytes());
        data.extend_from_slice(&width.to_le_bytes());
        data.extend_from_slice(&height.to_le_bytes());
        data.extend_from_slice(&[1, 0, 24, 0]);
        data
    }

    #[test]
    fn test_bottom_up() {
        let dims = dimensions(&bmp(640, 480)).unwrap();
        assert_eq!((dims.width, dims.height), (640, 480));
    }

    #[test]
    fn test_top_down_uses_magnitude() {
        let dims = dimensions(&bmp(640, -480)).unwrap();
        assert_eq!((dims.width, dims.height), (640, 480));
    }

    #[test]
    fn test_negative_width_is_malformed() {
        assert!(matches!(
            dimensions(&bmp(-1, 10)),
            Err(ProbeError::Malformed(_))
        ));
    }

    #[test]
    fn test_truncated() {
        let data = bmp(1, 1);
        assert!(matches!(
            dimensions(&data[..25]),
            Err(ProbeError::Truncated { .. })
        ));
    }
}
