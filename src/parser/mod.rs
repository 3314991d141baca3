//! Turtle flattening pipeline
//!
//! Turns a Turtle-style document into a flat list of triples through purely
//! sequential text rewriting:
//!
//! 1. [`mask`]: normalize directives, mask identifiers and literals, strip
//!    comments
//! 2. [`harvest`]: pull ordered lists, then anonymous nodes, out of the text
//! 3. [`statement`]: split the masked text into statements
//! 4. [`expand`]: expand `;`/`,` shorthand and resolve harvested spans
//! 5. [`resolve`]: write literals and identifiers back, generate node and
//!    list identifiers
//! 6. [`prefix`]: collect declarations and expand abbreviations

pub mod expand;
pub mod harvest;
pub mod mask;
pub mod prefix;
pub mod resolve;
pub mod statement;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::store::TripleStore;
use crate::term::{placeholder, PlaceholderKind, Triple};

use expand::Expander;
use harvest::BracketKind;
pub use prefix::{PrefixMatch, PrefixTable};

/// Parser error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Unbalanced '{bracket}' at position {position}")]
    UnbalancedBracket { bracket: char, position: usize },

    #[error("Unclosed '{bracket}' at position {position}")]
    UnclosedBracket { bracket: char, position: usize },

    #[error("Malformed statement: {statement}")]
    MalformedStatement { statement: String },

    #[error("Malformed group '{group}': expected {expected} token(s), found {found}")]
    MalformedGroup {
        group: String,
        expected: usize,
        found: usize,
    },

    #[error("Unterminated statement: {statement}")]
    UnterminatedStatement { statement: String },

    #[error("Unresolved placeholder: {token}")]
    UnresolvedPlaceholder { token: String },
}

impl ParseError {
    /// Errors that permissive parsing may downgrade to warnings
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ParseError::MalformedStatement { .. }
                | ParseError::MalformedGroup { .. }
                | ParseError::UnterminatedStatement { .. }
        )
    }
}

/// How malformed input is treated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    /// Malformed statements and groups are errors
    Strict,
    /// Malformed statements and groups are logged and collected as warnings
    #[default]
    Permissive,
}

impl Strictness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strictness::Strict => "strict",
            Strictness::Permissive => "permissive",
        }
    }
}

impl std::str::FromStr for Strictness {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strict" | "true" | "1" => Ok(Strictness::Strict),
            "permissive" | "false" | "0" => Ok(Strictness::Permissive),
            _ => Err(format!("Unknown strictness: {}", s)),
        }
    }
}

/// Options for a [`TurtleFlattener`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    pub strictness: Strictness,
    pub prefix_match: PrefixMatch,
}

impl ParseOptions {
    pub fn strict() -> Self {
        ParseOptions {
            strictness: Strictness::Strict,
            ..Default::default()
        }
    }
}

/// A recoverable problem met while parsing in permissive mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    pub error: ParseError,
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

/// Routes recoverable errors according to the configured [`Strictness`]
#[derive(Debug, Clone)]
pub struct Diagnostics {
    strictness: Strictness,
    warnings: Vec<ParseWarning>,
}

impl Diagnostics {
    pub fn new(strictness: Strictness) -> Self {
        Diagnostics {
            strictness,
            warnings: Vec::new(),
        }
    }

    /// Fail in strict mode; otherwise log and keep the error as a warning
    pub fn report(&mut self, error: ParseError) -> Result<(), ParseError> {
        if self.strictness == Strictness::Strict || !error.is_recoverable() {
            return Err(error);
        }
        warn!("{}", error);
        self.warnings.push(ParseWarning { error });
        Ok(())
    }

    pub fn warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<ParseWarning> {
        self.warnings
    }
}

/// Final triples of one document, with its prefixes and warnings
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    triples: TripleStore,
    prefixes: PrefixTable,
    warnings: Vec<ParseWarning>,
}

impl ParsedDocument {
    pub fn triples(&self) -> &[Triple] {
        self.triples.triples()
    }

    pub fn store(&self) -> &TripleStore {
        &self.triples
    }

    pub fn prefixes(&self) -> &PrefixTable {
        &self.prefixes
    }

    pub fn warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }

    /// The declared base namespace, if any
    pub fn base(&self) -> Option<&str> {
        self.prefixes.base()
    }

    pub fn into_triples(self) -> Vec<Triple> {
        self.triples.into_vec()
    }
}

/// Runs the flattening pipeline over one document at a time
#[derive(Debug, Clone, Default)]
pub struct TurtleFlattener {
    options: ParseOptions,
}

impl TurtleFlattener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParseOptions) -> Self {
        TurtleFlattener { options }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Flatten a document into triples
    pub fn parse(&self, input: &str) -> Result<ParsedDocument, ParseError> {
        let normalized = mask::normalize(input);
        let mask::Masked { text, mut table } = mask::mask(&normalized);
        let text = mask::flatten_whitespace(&mask::strip_comments(&text));
        debug!(
            identifiers = table.len(PlaceholderKind::Url),
            "masked identifiers and literals"
        );

        let lists = harvest::harvest(&text, BracketKind::OrderedList, &mut table)?;
        let nodes = harvest::harvest(&lists.text, BracketKind::AnonymousNode, &mut table)?;
        debug!(
            lists = lists.replacements.len(),
            nodes = nodes.replacements.len(),
            "harvested brackets"
        );

        let mut diagnostics = Diagnostics::new(self.options.strictness);
        let text = mask::flatten_whitespace(&nodes.text);
        let statements = statement::split_statements(&text, &mut diagnostics)?;
        debug!(statements = statements.len(), "split statements");

        let mut store = TripleStore::new();
        {
            let mut expander = Expander::new(&mut store, &mut diagnostics);
            for statement in &statements {
                expander.expand_statement(statement)?;
            }
            expander.resolve_collections(&mut table)?;
        }
        debug!(triples = store.len(), "expanded shorthand");

        resolve::resolve_literals(&mut store, &table)?;
        resolve::resolve_identifiers(&mut store);

        if let Some(token) = store
            .iter()
            .filter(|t| t.has_placeholder())
            .flat_map(|t| t.components())
            .find_map(|c| placeholder::find_all(c).into_iter().next())
            .map(|(_, p)| p.token())
        {
            return Err(ParseError::UnresolvedPlaceholder { token });
        }
        resolve::restore_tildes(&mut store);

        let mut prefixes = PrefixTable::new();
        prefixes.collect(&store);
        prefixes.expand_store(&mut store, self.options.prefix_match);
        let removed = prefix::remove_declarations(&mut store);
        debug!(triples = store.len(), declarations = removed, "resolved prefixes");

        Ok(ParsedDocument {
            triples: store,
            prefixes,
            warnings: diagnostics.into_warnings(),
        })
    }
}

/// Flatten a document with default options
pub fn parse(input: &str) -> Result<ParsedDocument, ParseError> {
    TurtleFlattener::new().parse(input)
}
