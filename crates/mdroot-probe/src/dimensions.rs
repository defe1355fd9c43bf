//! Pixel geometry value type.

use std::fmt;

use crate::error::{ProbeError, ProbeResult};

/// Width and height in pixels, both strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageDimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ImageDimensions {
    /// Build dimensions, rejecting a zero width or height.
    ///
    /// # Example
    ///
    /// ```
    /// use mdroot_probe::ImageDimensions;
    ///
    /// assert!(ImageDimensions::new(640, 480).is_ok());
    /// assert!(ImageDimensions::new(0, 480).is_err());
    /// ```
    pub fn new(width: u32, height: u32) -> ProbeResult<Self> {
        if width == 0 || height == 0 {
            return Err(ProbeError::Malformed("zero width or height"));
        }
        Ok(Self { width, height })
    }

    /// Width divided by height.
    #[must_use]
    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }
}

impl fmt::Display for ImageDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
