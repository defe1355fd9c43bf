//! Header-level image dimension probing.
//!
//! [`probe`] classifies a byte buffer by its magic bytes and reads the pixel
//! size from the container header without decoding any image data.
//!
//! # Supported formats
//!
//! Checked in this order, first signature match wins:
//!
//! | Format | Signature | Size source |
//! |--------|-----------|-------------|
//! | PNG    | `89 50 4E 47` | IHDR, big-endian |
//! | JPEG   | `FF D8` | first SOF0/SOF1/SOF2 segment |
//! | GIF    | `GIF` | logical screen descriptor |
//! | BMP    | `BM` | `BITMAPINFOHEADER`, absolute height |
//! | WebP   | `RIFF` + `VP8L` | lossless bitstream header only |
//! | SVG    | `<svg` anywhere | `width`/`height`, else `viewBox` |
//!
//! Every read is bounds-checked: truncated, malformed or unrecognised input
//! yields `None`, never a panic.
//!
//! # Example
//!
//! ```
//! use mdroot_probe::{ImageFormat, probe, probe_with_format};
//!
//! let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 64 32"></svg>"#;
//! let dims = probe(svg).unwrap();
//! assert_eq!((dims.width, dims.height), (64, 32));
//!
//! assert_eq!(probe_with_format(svg).map(|(f, _)| f), Some(ImageFormat::Svg));
//! assert!(probe(b"\x89PNG").is_none());
//! ```

mod bmp;
mod bytes;
mod dimensions;
mod error;
mod gif;
mod jpeg;
mod png;
mod svg;
mod webp;

use std::fmt;

pub use dimensions::ImageDimensions;
pub use error::{ProbeError, ProbeResult};

/// Container formats recognised by the probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
    WebP,
    Svg,
}

impl ImageFormat {
    /// Lowercase format name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
            Self::WebP => "webp",
            Self::Svg => "svg",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One row of the signature dispatch table.
struct Signature {
    format: ImageFormat,
    matches: fn(&[u8]) -> bool,
    decode: fn(&[u8]) -> ProbeResult<ImageDimensions>,
}

/// Dispatch table in priority order.
const SIGNATURES: &[Signature] = &[
    Signature {
        format: ImageFormat::Png,
        matches: |data| data.starts_with(png::SIGNATURE),
        decode: png::dimensions,
    },
    Signature {
        format: ImageFormat::Jpeg,
        matches: |data| data.starts_with(jpeg::SIGNATURE),
        decode: jpeg::dimensions,
    },
    Signature {
        format: ImageFormat::Gif,
        matches: |data| data.starts_with(gif::SIGNATURE),
        decode: gif::dimensions,
    },
    Signature {
        format: ImageFormat::Bmp,
        matches: |data| data.starts_with(bmp::SIGNATURE),
        decode: bmp::dimensions,
    },
    Signature {
        format: ImageFormat::WebP,
        matches: |data| data.starts_with(webp::SIGNATURE),
        decode: webp::dimensions,
    },
    Signature {
        format: ImageFormat::Svg,
        matches: svg::matches,
        decode: svg::dimensions,
    },
];

fn signature_for(data: &[u8]) -> Option<&'static Signature> {
    SIGNATURES.iter().find(|sig| (sig.matches)(data))
}

/// Classify a buffer by signature without reading its size.
#[must_use]
pub fn detect_format(data: &[u8]) -> Option<ImageFormat> {
    signature_for(data).map(|sig| sig.format)
}

/// Classify a buffer and decode its dimensions, keeping the failure reason.
///
/// Returns `Ok(None)` when no signature matches.
pub fn try_probe(data: &[u8]) -> ProbeResult<Option<(ImageFormat, ImageDimensions)>> {
    let Some(sig) = signature_for(data) else {
        return Ok(None);
    };
    let dims = (sig.decode)(data)?;
    Ok(Some((sig.format, dims)))
}

/// Probe a buffer, returning the detected format alongside the dimensions.
#[must_use]
pub fn probe_with_format(data: &[u8]) -> Option<(ImageFormat, ImageDimensions)> {
    match try_probe(data) {
        Ok(found) => found,
        Err(e) => {
            tracing::trace!(len = data.len(), error = %e, "image probe rejected buffer");
            None
        }
    }
}

/// Read the pixel size of an image from its header bytes.
///
/// Returns `None` for unrecognised, truncated or malformed input.
#[must_use]
pub fn probe(data: &[u8]) -> Option<ImageDimensions> {
    probe_with_format(data).map(|(_, dims)| dims)
}
