//! Choosing how large to show an image preview.

use std::fmt;

use mdroot_probe::ImageDimensions;

/// The constraint applied to a preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplaySize {
    Width(u32),
    Height(u32),
}

impl fmt::Display for DisplaySize {
    /// Renders the `|width=N` / `|height=N` link suffix.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Width(w) => write!(f, "|width={w}"),
            Self::Height(h) => write!(f, "|height={h}"),
        }
    }
}

/// Aspect ratio heuristic for previews.
///
/// Images wider than `wide_ratio` (width / height, exclusive) are
/// constrained by width, everything else by height. Unknown sizes are
/// constrained by height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayPolicy {
    pub wide_ratio: f64,
    pub max_width: u32,
    pub max_height: u32,
}

impl Default for DisplayPolicy {
    fn default() -> Self {
        Self {
            wide_ratio: 2.5,
            max_width: 600,
            max_height: 240,
        }
    }
}

impl DisplayPolicy {
    /// Pick the constraint for an image.
    #[must_use]
    pub fn choose(&self, dimensions: Option<ImageDimensions>) -> DisplaySize {
        match dimensions {
            Some(dims) if dims.aspect_ratio() > self.wide_ratio => {
                DisplaySize::Width(self.max_width)
            }
            _ => DisplaySize::Height(self.max_height),
        }
    }
}
