//! Splitting a document into markdown runs and matched tag tokens.

use super::lines::{SourceLine, classify};
use super::scanner::find_closing;
use super::syntax::parse_open;
use super::tokens::{BlockTagToken, Token};

/// Tokenize a document.
///
/// Opening markers without a matching close stay in the markdown runs as
/// ordinary text.
pub(crate) fn tokenize(text: &str) -> Vec<Token> {
    let lines = classify(text);
    let mut tokens = Vec::new();
    tokenize_lines(&lines, 0, &mut tokens);
    tokens
}

fn tokenize_lines(lines: &[SourceLine<'_>], level: usize, tokens: &mut Vec<Token>) {
    let mut pending = String::new();
    let mut idx = 0;

    while idx < lines.len() {
        let line = &lines[idx];

        if let Some(marker) = line.marker_text().and_then(parse_open) {
            if let Some(close) = find_closing(lines, idx, marker.name) {
                tracing::debug!(tag = %marker.name, line = idx, level, "Matched block tag");
                flush(&mut pending, tokens);
                tokens.push(Token::Tag(
                    BlockTagToken::open(marker.name, marker.params, level)
                        .with_prefix(line.prefix),
                ));
                tokenize_lines(&lines[idx + 1..close], level + 1, tokens);
                tokens.push(Token::Tag(
                    BlockTagToken::close(marker.name, level).with_prefix(lines[close].prefix),
                ));
                idx = close + 1;
                continue;
            }
            tracing::debug!(tag = %marker.name, line = idx, "Unmatched block tag left as text");
        }

        pending.push_str(line.text);
        idx += 1;
    }

    flush(&mut pending, tokens);
}

fn flush(pending: &mut String, tokens: &mut Vec<Token>) {
    if !pending.is_empty() {
        tokens.push(Token::Markdown(std::mem::take(pending)));
    }
}
