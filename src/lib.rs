//! tripleflat - Turtle document flattener
//!
//! Converts Turtle-style documents, with their `;`/`,` shorthand, nested
//! anonymous nodes and ordered lists, into a flat list of
//! `(subject, predicate, object)` string triples, and renders that list as a
//! delimited table, as fully bracketed Turtle, or as JSON.
//!
//! # Architecture
//!
//! - [`parser`] - the flattening pipeline: masking, bracket harvesting,
//!   statement splitting, shorthand expansion, placeholder and prefix resolution
//! - [`store`] - ordered, append-only triple list
//! - [`term`] - triples, placeholder tokens and generated identifiers
//! - [`render`] - tabular, Turtle and JSON renderers
//! - [`config`] - layered TOML/environment configuration
//! - [`error`] - structured errors with codes and hints
//!
//! # Example
//!
//! ```rust
//! use tripleflat::render::{Renderer, TabularRenderer};
//!
//! let doc = tripleflat::parse(
//!     "@prefix ex: <http://ex.org/> . ex:a ex:b ex:c , ex:d ; ex:e [ ex:f ex:g ] .",
//! ).unwrap();
//!
//! assert_eq!(doc.triples().len(), 4);
//! assert_eq!(doc.triples()[0].subject, "http://ex.org/a");
//! assert_eq!(doc.triples()[2].object, "blank_node_(id=0)");
//!
//! let table = TabularRenderer::default().render(&doc);
//! assert!(table.starts_with("Subject\tPredicate\tObject\n"));
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod parser;
pub mod render;
pub mod store;
pub mod term;

pub use crate::core::ns;

// Re-export term types
pub use term::{Placeholder, PlaceholderKind, Triple};

// Re-export parser types
pub use parser::{
    parse, Diagnostics, ParseError, ParseOptions, ParseWarning, ParsedDocument, PrefixMatch,
    PrefixTable, Strictness, TurtleFlattener,
};

// Re-export store types
pub use store::TripleStore;

// Re-export renderer types
pub use render::{renderer_for, JsonRenderer, Renderer, TabularRenderer, TurtleRenderer};

// Re-export configuration types
pub use config::{ConfigError, FlattenConfig, GeneralConfig, LogLevel, OutputConfig, OutputFormat, ParseConfig};

// Re-export error types
pub use error::{ErrorCode, ErrorContext, FlattenError, FlattenResult};
