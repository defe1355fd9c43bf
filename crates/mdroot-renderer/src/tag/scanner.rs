//! Lookahead for the closing marker of a block.

use super::lines::SourceLine;
use super::syntax::{closes, opens, parse_open};

/// Find the line that closes the block opened at `open`.
///
/// Scans from the next line with a depth counter starting at 1: same-name
/// openings increment it, same-name closings decrement it, and the line
/// that brings it to 0 is the match. Only markers in the opening line's own
/// container count; leaving that container ends the search. Literal lines
/// are skipped. Pure lookahead; nothing is emitted.
pub(crate) fn find_closing(lines: &[SourceLine<'_>], open: usize, name: &str) -> Option<usize> {
    let scope = &lines.get(open)?.containers;
    let mut depth = 1usize;

    for (idx, line) in lines.iter().enumerate().skip(open + 1) {
        if !line.within(scope) {
            return None;
        }
        if line.containers != *scope {
            continue;
        }
        let Some(text) = line.marker_text() else {
            continue;
        };
        if opens(text, name) {
            depth += 1;
        } else if closes(text, name) {
            depth -= 1;
            if depth == 0 {
                return Some(idx);
            }
        }
    }
    None
}

/// Trial mode: check whether the line at `idx` opens a block that is closed
/// within `lines`.
pub(crate) fn matches_at(lines: &[SourceLine<'_>], idx: usize) -> bool {
    lines
        .get(idx)
        .and_then(SourceLine::marker_text)
        .and_then(parse_open)
        .is_some_and(|marker| find_closing(lines, idx, marker.name).is_some())
}
