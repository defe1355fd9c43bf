//! Fenced code block delimiters.
//!
//! Tag markers inside a fenced code block are literal text.

/// An open fence: its marker byte and run length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Fence {
    marker: u8,
    len: usize,
}

impl Fence {
    /// Parse an opening fence: three or more backticks or tildes. A backtick
    /// fence's info string may not contain backticks.
    pub(crate) fn opening(line: &str) -> Option<Self> {
        let trimmed = line.trim_start();
        let marker = *trimmed.as_bytes().first()?;
        if marker != b'`' && marker != b'~' {
            return None;
        }
        let len = trimmed.bytes().take_while(|&b| b == marker).count();
        if len < 3 || (marker == b'`' && trimmed[len..].contains('`')) {
            return None;
        }
        Some(Self { marker, len })
    }

    /// A closing fence uses the same marker, is at least as long and has
    /// nothing but whitespace after it.
    pub(crate) fn is_closed_by(self, line: &str) -> bool {
        let trimmed = line.trim_start();
        let run = trimmed.bytes().take_while(|&b| b == self.marker).count();
        run >= self.len && trimmed[run..].trim().is_empty()
    }
}
