//! Block tag token stream.

use std::fmt;

/// Direction of a tag token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nesting {
    Open,
    Close,
}

impl Nesting {
    /// `+1` for opening, `-1` for closing.
    #[must_use]
    pub fn delta(self) -> i8 {
        match self {
            Self::Open => 1,
            Self::Close => -1,
        }
    }
}

/// One side of a matched `{% tag %}` ... `{% endtag %}` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockTagToken {
    /// Tag name, shared by the open and close tokens of a pair.
    pub tag: String,
    pub nesting: Nesting,
    /// Raw parameter text of the opening marker. Empty on close tokens.
    pub params: String,
    /// Block nesting depth, `0` at the document top level.
    pub level: usize,
    /// Blockquote and list item prefix of the marker line. Empty outside
    /// containers.
    pub prefix: String,
}

impl BlockTagToken {
    pub(crate) fn open(tag: &str, params: &str, level: usize) -> Self {
        Self {
            tag: tag.to_owned(),
            nesting: Nesting::Open,
            params: params.to_owned(),
            level,
            prefix: String::new(),
        }
    }

    pub(crate) fn close(tag: &str, level: usize) -> Self {
        Self {
            tag: tag.to_owned(),
            nesting: Nesting::Close,
            params: String::new(),
            level,
            prefix: String::new(),
        }
    }

    pub(crate) fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_owned();
        self
    }

    /// Check whether this is an opening token.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.nesting == Nesting::Open
    }
}

impl fmt::Display for BlockTagToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.nesting {
            Nesting::Open if self.params.is_empty() => write!(f, "{{% {} %}}", self.tag),
            Nesting::Open => write!(f, "{{% {} {} %}}", self.tag, self.params),
            Nesting::Close => write!(f, "{{% end{} %}}", self.tag),
        }
    }
}

/// An element of a tokenized document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A tag boundary.
    Tag(BlockTagToken),
    /// Consecutive source lines outside any tag marker, line endings kept.
    Markdown(String),
}
