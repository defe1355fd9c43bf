//! Container structure of source lines.
//!
//! A block tag belongs to the CommonMark container its marker sits in: the
//! document, a blockquote or a list item. Each line is split into its
//! container prefix (`>` markers, list markers and item indentation) and its
//! content, and tagged with the containers enclosing it. Markers are only
//! recognised in content outside code and indented less than four columns.
//!
//! Lazy continuation lines are not modelled: a line that does not repeat
//! its container's prefix ends the container.

use super::fence::Fence;
use crate::html::is_thematic_break;

/// Indentation, in columns, at which content becomes indented code.
const CODE_INDENT: usize = 4;

/// One source line with its container context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SourceLine<'a> {
    /// Full line, line ending included.
    pub text: &'a str,
    /// Container prefix of the line.
    pub prefix: &'a str,
    /// The rest of the line after the prefix.
    pub content: &'a str,
    /// Ids of the enclosing containers, outermost first.
    pub containers: Vec<usize>,
    /// Fenced code, fence delimiters, or content indented as code.
    pub literal: bool,
}

impl<'a> SourceLine<'a> {
    /// Content to match marker syntax against, unless the line is literal.
    pub(crate) fn marker_text(&self) -> Option<&'a str> {
        (!self.literal).then_some(self.content)
    }

    /// Check whether the line lies inside the container path `scope`.
    pub(crate) fn within(&self, scope: &[usize]) -> bool {
        self.containers.starts_with(scope)
    }
}

/// Split a document into lines with their container context.
pub(crate) fn classify(text: &str) -> Vec<SourceLine<'_>> {
    let mut state = LineState::default();
    text.split_inclusive('\n')
        .map(|line| state.next_line(line))
        .collect()
}

#[derive(Debug, Clone, Copy)]
enum Kind {
    Quote,
    Item { content_col: usize },
}

#[derive(Debug, Clone, Copy)]
struct Container {
    id: usize,
    kind: Kind,
}

#[derive(Debug, Clone, Copy)]
struct OpenFence {
    fence: Fence,
    /// Innermost container the fence was opened in; `None` for the document.
    owner: Option<usize>,
}

#[derive(Debug, Default)]
struct LineState {
    stack: Vec<Container>,
    fence: Option<OpenFence>,
    next_id: usize,
}

impl LineState {
    fn next_line<'a>(&mut self, line: &'a str) -> SourceLine<'a> {
        let mut cursor = Cursor::new(line);

        let matched = self
            .stack
            .iter()
            .take_while(|container| cursor.continues(container.kind))
            .count();
        self.stack.truncate(matched);

        if let Some(open) = self.fence
            && let Some(owner) = open.owner
            && !self.stack.iter().any(|c| c.id == owner)
        {
            self.fence = None;
        }

        if self.fence.is_none() {
            while let Some(kind) = cursor.open_container() {
                self.stack.push(Container {
                    id: self.next_id,
                    kind,
                });
                self.next_id += 1;
            }
        }

        let content = cursor.rest();
        let indent = cursor.indent();
        let literal = if let Some(open) = self.fence {
            if indent < CODE_INDENT && open.fence.is_closed_by(content) {
                self.fence = None;
            }
            true
        } else if indent < CODE_INDENT
            && let Some(fence) = Fence::opening(content)
        {
            self.fence = Some(OpenFence {
                fence,
                owner: self.stack.last().map(|c| c.id),
            });
            true
        } else {
            indent >= CODE_INDENT && !cursor.is_blank()
        };

        SourceLine {
            text: line,
            prefix: &line[..cursor.pos],
            content,
            containers: self.stack.iter().map(|c| c.id).collect(),
            literal,
        }
    }
}

/// Position within a line, in bytes and in columns (tabs stop every 4).
#[derive(Debug, Clone, Copy)]
struct Cursor<'a> {
    line: &'a str,
    pos: usize,
    col: usize,
}

impl<'a> Cursor<'a> {
    fn new(line: &'a str) -> Self {
        Self {
            line,
            pos: 0,
            col: 0,
        }
    }

    fn rest(&self) -> &'a str {
        &self.line[self.pos..]
    }

    fn is_blank(&self) -> bool {
        self.rest().trim().is_empty()
    }

    /// Columns of whitespace at the cursor.
    fn indent(&self) -> usize {
        let mut col = self.col;
        for b in self.rest().bytes() {
            match b {
                b' ' => col += 1,
                b'\t' => col += 4 - col % 4,
                _ => break,
            }
        }
        col - self.col
    }

    /// Skip up to `cols` columns of whitespace.
    fn skip_indent(&mut self, cols: usize) {
        let target = self.col + cols;
        while self.col < target {
            match self.line.as_bytes().get(self.pos) {
                Some(b' ') => self.col += 1,
                Some(b'\t') => self.col += 4 - self.col % 4,
                _ => break,
            }
            self.pos += 1;
        }
    }

    fn advance(&mut self, len: usize) {
        self.pos += len;
        self.col += len;
    }

    fn eat(&mut self, byte: u8) -> bool {
        let found = self.line.as_bytes().get(self.pos) == Some(&byte);
        if found {
            self.advance(1);
        }
        found
    }

    /// `>` after up to three columns of indentation, plus one optional space.
    fn eat_quote_marker(&mut self) -> bool {
        let indent = self.indent();
        if indent >= CODE_INDENT {
            return false;
        }
        let saved = *self;
        self.skip_indent(indent);
        if self.eat(b'>') {
            self.eat(b' ');
            true
        } else {
            *self = saved;
            false
        }
    }

    /// Consume the prefix of an already open container, if the line has it.
    fn continues(&mut self, kind: Kind) -> bool {
        match kind {
            Kind::Quote => self.eat_quote_marker(),
            Kind::Item { content_col } => {
                if self.is_blank() {
                    return true;
                }
                let needed = content_col.saturating_sub(self.col);
                if self.indent() < needed {
                    return false;
                }
                self.skip_indent(needed);
                true
            }
        }
    }

    /// Consume the start of a new blockquote or list item.
    fn open_container(&mut self) -> Option<Kind> {
        if self.eat_quote_marker() {
            return Some(Kind::Quote);
        }

        let indent = self.indent();
        if indent >= CODE_INDENT {
            return None;
        }
        let saved = *self;
        self.skip_indent(indent);
        let Some(len) = list_marker(self.rest()) else {
            *self = saved;
            return None;
        };

        self.advance(len);
        let spaces = self.indent();
        let content_col = if self.is_blank() {
            self.col + 1
        } else if spaces > CODE_INDENT {
            self.skip_indent(1);
            self.col
        } else {
            self.skip_indent(spaces);
            self.col
        };
        Some(Kind::Item { content_col })
    }
}

/// Byte length of a list item marker (`-`, `+`, `*`, `1.`, `1)`) at the
/// start of `s`, if followed by whitespace or the end of the line.
fn list_marker(s: &str) -> Option<usize> {
    if is_thematic_break(s) {
        return None;
    }
    let bytes = s.as_bytes();
    let len = match bytes.first()? {
        b'-' | b'+' | b'*' => 1,
        b'0'..=b'9' => {
            let digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
            if digits > 9 || !matches!(bytes.get(digits), Some(b'.' | b')')) {
                return None;
            }
            digits + 1
        }
        _ => return None,
    };
    matches!(bytes.get(len), None | Some(b' ' | b'\t' | b'\r' | b'\n')).then_some(len)
}
