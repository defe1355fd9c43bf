//! SVG: read `width`/`height` from the root element, falling back to `viewBox`.

use std::borrow::Cow;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::{ImageDimensions, ProbeError, ProbeResult};

const OPEN_TAG: &str = "<svg";

/// Byte offset of the first `<svg` opening tag, matched case-insensitively.
fn find_open_tag(text: &str) -> Option<usize> {
    // ASCII lowercasing keeps byte offsets stable.
    let lowered = text.to_ascii_lowercase();
    let mut from = 0;
    while let Some(found) = lowered[from..].find(OPEN_TAG) {
        let start = from + found;
        let after = lowered.as_bytes().get(start + OPEN_TAG.len());
        if matches!(after, None | Some(b'>' | b'/') | Some(b' ' | b'\t' | b'\r' | b'\n')) {
            return Some(start);
        }
        from = start + OPEN_TAG.len();
    }
    None
}

pub(crate) fn matches(data: &[u8]) -> bool {
    find_open_tag(&String::from_utf8_lossy(data)).is_some()
}

pub(crate) fn dimensions(data: &[u8]) -> ProbeResult<ImageDimensions> {
    let text = String::from_utf8_lossy(data);
    let start = find_open_tag(&text).ok_or(ProbeError::Malformed("no <svg> element"))?;

    let mut reader = Reader::from_str(&text[start..]);
    let attrs = match reader.read_event() {
        Ok(Event::Start(e) | Event::Empty(e)) => RootAttributes::from_element(&e),
        Ok(_) => return Err(ProbeError::Malformed("unexpected content at <svg>")),
        Err(_) => return Err(ProbeError::Malformed("unterminated <svg> tag")),
    };

    if let (Some(width), Some(height)) = (
        attrs.width.as_deref().and_then(parse_length),
        attrs.height.as_deref().and_then(parse_length),
    ) {
        return ImageDimensions::new(width, height);
    }

    let (width, height) = attrs
        .view_box
        .as_deref()
        .and_then(parse_view_box)
        .ok_or(ProbeError::Malformed("no usable width/height or viewBox"))?;
    ImageDimensions::new(width, height)
}

/// The three sizing attributes of the root element.
#[derive(Debug, Default)]
struct RootAttributes {
    width: Option<String>,
    height: Option<String>,
    view_box: Option<String>,
}

impl RootAttributes {
    fn from_element(e: &BytesStart<'_>) -> Self {
        let mut attrs = Self::default();
        for attr in e.attributes().flatten() {
            let value = attr.unescape_value().map_or_else(
                |_| String::from_utf8_lossy(&attr.value).into_owned(),
                Cow::into_owned,
            );
            let key = attr.key.as_ref();
            if key.eq_ignore_ascii_case(b"width") {
                attrs.width = Some(value);
            } else if key.eq_ignore_ascii_case(b"height") {
                attrs.height = Some(value);
            } else if key.eq_ignore_ascii_case(b"viewbox") {
                attrs.view_box = Some(value);
            }
        }
        attrs
    }
}

/// Parse a length attribute: a plain number with an optional `px` unit.
///
/// Percentages and other units are rejected so the caller falls back to `viewBox`.
fn parse_length(value: &str) -> Option<u32> {
    let trimmed = value.trim();
    let number = trimmed.strip_suffix("px").unwrap_or(trimmed).trim_end();
    to_pixels(number.parse().ok()?)
}

/// Third and fourth `viewBox` components as `(width, height)`.
fn parse_view_box(value: &str) -> Option<(u32, u32)> {
    let parts: Vec<&str> = value
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .collect();
    if parts.len() < 4 {
        return None;
    }
    let width = to_pixels(parts[2].parse().ok()?)?;
    let height = to_pixels(parts[3].parse().ok()?)?;
    Some((width, height))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_pixels(value: f64) -> Option<u32> {
    if !value.is_finite() || value <= 0.0 || value > f64::from(u32::MAX) {
        return None;
    }
    let rounded = value.round() as u32;
    (rounded > 0).then_some(rounded)
}
