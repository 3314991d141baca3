//! Placeholder tokens standing in for masked spans
//!
//! A placeholder renders as `~<tag>_<index>~`. The token contains no
//! whitespace and none of the characters later stages treat as syntax
//! (`# . ; , [ ] ( ) < > " '`), so it always survives as a single token.
//!
//! Document text has its own `~` replaced by [`ESCAPED_TILDE`] before any
//! token is written, so only the pipeline can produce a token.

use std::fmt;
use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;

/// The kind of span a placeholder stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PlaceholderKind {
    /// `<...>` identifier
    Url,
    /// `'...'` literal
    SingleQuoted,
    /// `"..."` literal
    DoubleQuoted,
    /// `"""..."""` literal
    TripleQuoted,
    /// `[...]` anonymous node body
    AnonymousNode,
    /// `(...)` ordered list body
    OrderedList,
}

impl PlaceholderKind {
    pub const ALL: [PlaceholderKind; 6] = [
        PlaceholderKind::Url,
        PlaceholderKind::SingleQuoted,
        PlaceholderKind::DoubleQuoted,
        PlaceholderKind::TripleQuoted,
        PlaceholderKind::AnonymousNode,
        PlaceholderKind::OrderedList,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            PlaceholderKind::Url => "iri",
            PlaceholderKind::SingleQuoted => "lit1",
            PlaceholderKind::DoubleQuoted => "lit2",
            PlaceholderKind::TripleQuoted => "lit3",
            PlaceholderKind::AnonymousNode => "bnode",
            PlaceholderKind::OrderedList => "list",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        PlaceholderKind::ALL.into_iter().find(|k| k.tag() == tag)
    }

    /// Position in [`PlaceholderKind::ALL`]
    pub fn slot(&self) -> usize {
        *self as usize
    }

    /// Quoted literal kinds
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            PlaceholderKind::SingleQuoted
                | PlaceholderKind::DoubleQuoted
                | PlaceholderKind::TripleQuoted
        )
    }

    /// Kinds resolved by substituting their span back into the text
    pub fn is_textual(&self) -> bool {
        self.is_literal() || *self == PlaceholderKind::Url
    }
}

/// A `(kind, index)` reference into the mask table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placeholder {
    pub kind: PlaceholderKind,
    pub index: usize,
}

impl Placeholder {
    pub fn new(kind: PlaceholderKind, index: usize) -> Self {
        Placeholder { kind, index }
    }

    /// The token written into the text
    pub fn token(&self) -> String {
        format!("~{}_{}~", self.kind.tag(), self.index)
    }

    /// Parse a string that is exactly one token
    pub fn parse(token: &str) -> Option<Self> {
        let (range, placeholder) = find_all(token).into_iter().next()?;
        (range == (0..token.len())).then_some(placeholder)
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "~{}_{}~", self.kind.tag(), self.index)
    }
}

/// Private-use stand-in for a document `~` while tokens are live
pub const ESCAPED_TILDE: &str = "\u{E000}";

/// Hide every `~` in document text
pub fn escape_tildes(text: &str) -> String {
    text.replace('~', ESCAPED_TILDE)
}

/// Bring back the `~` hidden by [`escape_tildes`]
pub fn unescape_tildes(text: &str) -> String {
    text.replace(ESCAPED_TILDE, "~")
}

fn token_regex() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| Regex::new(r"~(iri|lit1|lit2|lit3|bnode|list)_(\d+)~").expect("valid regex"))
}

/// All placeholder tokens in `text`, with their byte ranges, left to right
pub fn find_all(text: &str) -> Vec<(Range<usize>, Placeholder)> {
    token_regex()
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let kind = PlaceholderKind::from_tag(caps.get(1)?.as_str())?;
            let index = caps.get(2)?.as_str().parse().ok()?;
            Some((whole.range(), Placeholder::new(kind, index)))
        })
        .collect()
}

/// Check if `text` carries any placeholder token
pub fn contains_any(text: &str) -> bool {
    token_regex().is_match(text)
}
