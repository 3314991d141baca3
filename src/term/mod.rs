//! Triple and placeholder representations
//!
//! Triples are kept as plain strings: every component is the textual form the
//! pipeline produced for it. During intermediate stages a component may still
//! carry a placeholder token (see [`placeholder`]); final triples never do.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

pub mod placeholder;

pub use placeholder::{Placeholder, PlaceholderKind};

/// Prefix of generated anonymous-node identifiers
pub const BLANK_NODE_PREFIX: &str = "blank_node_";
/// Prefix of generated ordered-list identifiers
pub const COLLECTION_PREFIX: &str = "collection_";
/// Prefix of generated list element predicates
pub const ELEMENT_PREFIX: &str = "element_";

/// A (subject, predicate, object) statement
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

impl Triple {
    pub fn new(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Triple {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }

    /// The three components in subject, predicate, object order
    pub fn components(&self) -> [&str; 3] {
        [&self.subject, &self.predicate, &self.object]
    }

    /// Mutable access to the three components
    pub fn components_mut(&mut self) -> [&mut String; 3] {
        [&mut self.subject, &mut self.predicate, &mut self.object]
    }

    /// Check if any component still carries a placeholder token
    pub fn has_placeholder(&self) -> bool {
        self.components().iter().any(|c| placeholder::contains_any(c))
    }
}

impl fmt::Debug for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:?}, {:?}, {:?})", self.subject, self.predicate, self.object)
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}

/// Stable identifier for the anonymous node with the given index
pub fn blank_node_id(index: usize) -> String {
    format!("{}(id={})", BLANK_NODE_PREFIX, index)
}

/// Stable identifier for the ordered list with the given index
pub fn collection_id(index: usize) -> String {
    format!("{}(id={})", COLLECTION_PREFIX, index)
}

/// Predicate linking a list to its `position`-th item (1-based)
pub fn element_predicate(position: usize) -> String {
    format!("{}(#{})", ELEMENT_PREFIX, position)
}

/// Check if a component is a generated anonymous-node or list identifier
pub fn is_generated_id(component: &str) -> bool {
    component.starts_with(BLANK_NODE_PREFIX) || component.starts_with(COLLECTION_PREFIX)
}

/// Check if a component already is a full identifier (`scheme://...`, `urn:`, `mailto:`)
pub fn is_full_identifier(component: &str) -> bool {
    static ABSOLUTE: OnceLock<Regex> = OnceLock::new();
    let re = ABSOLUTE.get_or_init(|| {
        Regex::new(r"^(?:[A-Za-z][A-Za-z0-9+.\-]*://|urn:|mailto:)").expect("valid regex")
    });
    re.is_match(component)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triple_display() {
        let t = Triple::new("http://ex.org/a", "http://ex.org/b", "\"c\"");
        assert_eq!(t.to_string(), "http://ex.org/a http://ex.org/b \"c\" .");
    }

    #[test]
    fn test_generated_ids() {
        assert_eq!(blank_node_id(0), "blank_node_(id=0)");
        assert_eq!(collection_id(12), "collection_(id=12)");
        assert_eq!(element_predicate(1), "element_(#1)");
        assert!(is_generated_id("blank_node_(id=3)"));
        assert!(is_generated_id("collection_(id=0)"));
        assert!(!is_generated_id("element_(#1)"));
    }

    #[test]
    fn test_full_identifier() {
        assert!(is_full_identifier("http://ex.org/a"));
        assert!(is_full_identifier("https://ex.org/a"));
        assert!(is_full_identifier("urn:isbn:123"));
        assert!(!is_full_identifier("ex:a"));
        assert!(!is_full_identifier(":a"));
        assert!(!is_full_identifier("\"http://quoted\""));
        assert!(!is_full_identifier("42"));
    }

    #[test]
    fn test_placeholder_detection() {
        let t = Triple::new("~bnode_0~", "ex:p", "ex:o");
        assert!(t.has_placeholder());
        let t = Triple::new("ex:s", "ex:p", "ex:o");
        assert!(!t.has_placeholder());
    }
}
