//! Nested bracket harvesting
//!
//! Ordered lists `( ... )` and anonymous nodes `[ ... ]` are pulled out of the
//! text innermost-first. Each matched pair is registered in the
//! [`MaskTable`] with its body, and the whole bracketed span is replaced by a
//! placeholder token padded with spaces to the span's original width.
//!
//! All bracket pairs are located in a single scan over the unmodified text,
//! so every offset recorded in a [`Replacement`] is in the coordinate space of
//! the input. Bodies and the rewritten text are then rendered from that span
//! list; a replacement never has to shift an offset taken earlier.

use tracing::trace;

use crate::parser::mask::MaskTable;
use crate::parser::ParseError;
use crate::term::{Placeholder, PlaceholderKind};

/// One of the two bracket grammars
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketKind {
    /// `( ... )`
    OrderedList,
    /// `[ ... ]`
    AnonymousNode,
}

impl BracketKind {
    pub fn open(&self) -> char {
        match self {
            BracketKind::OrderedList => '(',
            BracketKind::AnonymousNode => '[',
        }
    }

    pub fn close(&self) -> char {
        match self {
            BracketKind::OrderedList => ')',
            BracketKind::AnonymousNode => ']',
        }
    }

    pub fn placeholder_kind(&self) -> PlaceholderKind {
        match self {
            BracketKind::OrderedList => PlaceholderKind::OrderedList,
            BracketKind::AnonymousNode => PlaceholderKind::AnonymousNode,
        }
    }
}

/// A bracketed span replaced by a placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    /// Byte offset of the opening bracket
    pub start: usize,
    /// Byte offset just past the closing bracket
    pub end: usize,
    /// Width of the span in characters, delimiters included
    pub width: usize,
    pub placeholder: Placeholder,
}

impl Replacement {
    /// The text written in place of the span
    pub fn rendered(&self) -> String {
        let token = format!(" {} ", self.placeholder);
        let filler = self.width.saturating_sub(token.chars().count());
        format!("{}{}", token, " ".repeat(filler))
    }
}

/// Result of one harvesting pass
#[derive(Debug, Clone)]
pub struct Harvest {
    /// Input text with every outermost span replaced
    pub text: String,
    /// All replacements, in harvest (innermost-first) order
    pub replacements: Vec<Replacement>,
}

/// Harvest every bracket pair of `kind` from `text` into `table`
pub fn harvest(text: &str, kind: BracketKind, table: &mut MaskTable) -> Result<Harvest, ParseError> {
    let pairs = match_pairs(text, kind)?;

    let mut replacements = Vec::with_capacity(pairs.len());
    // Replacements not yet enclosed by a later (outer) pair
    let mut frontier: Vec<Replacement> = Vec::new();

    for (open, close) in pairs {
        let end = close + kind.close().len_utf8();
        let (children, rest): (Vec<_>, Vec<_>) = frontier
            .into_iter()
            .partition(|r| r.start > open && r.end < end);
        frontier = rest;

        let body = splice(text, open + kind.open().len_utf8(), close, &children);
        let placeholder = table.push(kind.placeholder_kind(), body);
        trace!(%placeholder, start = open, end, "harvested span");

        let replacement = Replacement {
            start: open,
            end,
            width: text[open..end].chars().count(),
            placeholder,
        };
        replacements.push(replacement.clone());
        frontier.push(replacement);
    }

    frontier.sort_by_key(|r| r.start);
    let text = splice(text, 0, text.len(), &frontier);

    Ok(Harvest { text, replacements })
}

/// Locate matching bracket pairs, innermost first
fn match_pairs(text: &str, kind: BracketKind) -> Result<Vec<(usize, usize)>, ParseError> {
    let mut stack = Vec::new();
    let mut pairs = Vec::new();

    for (position, c) in text.char_indices() {
        if c == kind.open() {
            stack.push(position);
        } else if c == kind.close() {
            let open = stack.pop().ok_or(ParseError::UnbalancedBracket {
                bracket: c,
                position,
            })?;
            pairs.push((open, position));
        }
    }

    if let Some(&position) = stack.first() {
        return Err(ParseError::UnclosedBracket {
            bracket: kind.open(),
            position,
        });
    }

    Ok(pairs)
}

/// Copy `text[from..to]`, writing each (sorted, disjoint) replacement over its span
fn splice(text: &str, from: usize, to: usize, replacements: &[Replacement]) -> String {
    let mut children: Vec<&Replacement> = replacements.iter().collect();
    children.sort_by_key(|r| r.start);

    let mut out = String::with_capacity(to - from);
    let mut cursor = from;
    for child in children {
        out.push_str(&text[cursor..child.start]);
        out.push_str(&child.rendered());
        cursor = child.end;
    }
    out.push_str(&text[cursor..to]);
    out
}
