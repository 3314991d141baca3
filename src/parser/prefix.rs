//! Namespace prefix resolution
//!
//! Collects `@prefix` declarations from the expanded triples and rewrites
//! abbreviated components into full identifiers.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::ns;
use crate::store::TripleStore;
use crate::term::is_full_identifier;

/// Subject of the triples produced by `@prefix` declarations
pub const PREFIX_KEYWORD: &str = "@prefix";
/// Key the default (`:`) namespace is registered under
pub const BASE_KEY: &str = "base:";

/// How an abbreviation is located inside a component
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrefixMatch {
    /// First registered abbreviation found anywhere in the component
    #[default]
    First,
    /// Longest registered abbreviation the component starts with
    Longest,
}

impl PrefixMatch {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrefixMatch::First => "first",
            PrefixMatch::Longest => "longest",
        }
    }
}

impl std::str::FromStr for PrefixMatch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "first" => Ok(PrefixMatch::First),
            "longest" => Ok(PrefixMatch::Longest),
            _ => Err(format!("Unknown prefix match mode: {}", s)),
        }
    }
}

/// Ordered abbreviation → namespace mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixTable {
    prefixes: IndexMap<String, String>,
}

impl Default for PrefixTable {
    fn default() -> Self {
        Self::new()
    }
}

impl PrefixTable {
    /// Create a table with `rdf:` pre-registered
    pub fn new() -> Self {
        let mut prefixes = IndexMap::new();
        prefixes.insert("rdf:".to_string(), ns::RDF.to_string());
        PrefixTable { prefixes }
    }

    /// Register every `@prefix` triple in the store
    pub fn collect(&mut self, store: &TripleStore) {
        for triple in store.iter().filter(|t| t.subject == PREFIX_KEYWORD) {
            self.register(&triple.predicate, &triple.object);
        }
        debug!(prefixes = self.prefixes.len(), base = ?self.base(), "collected prefixes");
    }

    /// Register an abbreviation; `:` is stored as the base namespace
    ///
    /// The first registration of an abbreviation wins.
    pub fn register(&mut self, abbreviation: &str, namespace: &str) {
        let key = if abbreviation == ":" { BASE_KEY } else { abbreviation };
        self.prefixes
            .entry(key.to_string())
            .or_insert_with(|| namespace.to_string());
    }

    /// The declared base namespace, if any
    pub fn base(&self) -> Option<&str> {
        self.get(BASE_KEY)
    }

    pub fn get(&self, abbreviation: &str) -> Option<&str> {
        self.prefixes.get(abbreviation).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefixes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    /// Expand one component
    pub fn expand(&self, component: &str, mode: PrefixMatch) -> String {
        if component.starts_with('"') {
            return self.expand_literal(component, mode);
        }
        self.expand_name(component, mode)
            .unwrap_or_else(|| component.to_string())
    }

    /// Expand every component of every non-declaration triple
    pub fn expand_store(&self, store: &mut TripleStore, mode: PrefixMatch) {
        for triple in store.iter_mut().filter(|t| t.subject != PREFIX_KEYWORD) {
            for component in triple.components_mut() {
                *component = self.expand(component, mode);
            }
        }
    }

    /// Only the `^^` datatype of a literal is expanded
    fn expand_literal(&self, component: &str, mode: PrefixMatch) -> String {
        match component.rsplit_once("\"^^") {
            Some((text, datatype)) => {
                let datatype = self
                    .expand_name(datatype, mode)
                    .unwrap_or_else(|| datatype.to_string());
                format!("{}\"^^{}", text, datatype)
            }
            None => component.to_string(),
        }
    }

    fn expand_name(&self, component: &str, mode: PrefixMatch) -> Option<String> {
        if is_full_identifier(component) {
            return None;
        }
        if let Some(local) = component.strip_prefix(':') {
            return self.base().map(|base| format!("{}{}", base, local));
        }

        let mut abbreviations = self.prefixes.iter().filter(|(k, _)| k.as_str() != BASE_KEY);
        match mode {
            PrefixMatch::First => abbreviations
                .find(|(k, _)| component.contains(k.as_str()))
                .map(|(k, v)| component.replacen(k.as_str(), v, 1)),
            PrefixMatch::Longest => abbreviations
                .filter(|(k, _)| component.starts_with(k.as_str()))
                .max_by_key(|(k, _)| k.len())
                .map(|(k, v)| format!("{}{}", v, &component[k.len()..])),
        }
    }
}

/// Remove the `@prefix` declaration triples, returning how many were removed
pub fn remove_declarations(store: &mut TripleStore) -> usize {
    store.retain(|t| t.subject != PREFIX_KEYWORD)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Triple;

    fn table() -> PrefixTable {
        let mut table = PrefixTable::new();
        table.register("ex:", "http://ex.org/");
        table.register(":", "http://base.org/");
        table
    }

    #[test]
    fn test_rdf_is_preregistered() {
        let table = PrefixTable::new();
        assert_eq!(table.get("rdf:"), Some(ns::RDF));
        assert_eq!(table.base(), None);
    }

    #[test]
    fn test_collect_from_store() {
        let mut store = TripleStore::new();
        store.add(Triple::new("@prefix", "ex:", "http://ex.org/"));
        store.add(Triple::new("@prefix", ":", "http://base.org/"));
        store.add(Triple::new("ex:a", "ex:b", "ex:c"));
        let mut table = PrefixTable::new();
        table.collect(&store);

        assert_eq!(table.len(), 3);
        assert_eq!(table.get("ex:"), Some("http://ex.org/"));
        assert_eq!(table.base(), Some("http://base.org/"));
    }

    #[test]
    fn test_first_registration_wins() {
        let mut table = table();
        table.register("ex:", "http://other.org/");
        assert_eq!(table.get("ex:"), Some("http://ex.org/"));
    }

    #[test]
    fn test_expand_abbreviations() {
        let table = table();
        assert_eq!(table.expand("ex:thing", PrefixMatch::First), "http://ex.org/thing");
        assert_eq!(table.expand(":local", PrefixMatch::First), "http://base.org/local");
        assert_eq!(table.expand("rdf:type", PrefixMatch::First), ns::rdf_type());
        assert_eq!(table.expand("plain", PrefixMatch::First), "plain");
    }

    #[test]
    fn test_base_key_is_not_a_substring_match() {
        let table = table();
        assert_eq!(table.expand("database:x", PrefixMatch::First), "database:x");
    }

    #[test]
    fn test_leading_colon_without_base() {
        let table = PrefixTable::new();
        assert_eq!(table.expand(":local", PrefixMatch::First), ":local");
    }

    #[test]
    fn test_longest_match_is_anchored() {
        let mut table = PrefixTable::new();
        table.register("ex:", "http://ex.org/");
        table.register("myex:", "http://my.org/");

        assert_eq!(table.expand("myex:a", PrefixMatch::First), "myhttp://ex.org/a");
        assert_eq!(table.expand("myex:a", PrefixMatch::Longest), "http://my.org/a");
    }

    #[test]
    fn test_literal_only_expands_datatype() {
        let table = table();
        assert_eq!(
            table.expand("\"ex:not-a-name\"^^ex:type", PrefixMatch::First),
            "\"ex:not-a-name\"^^http://ex.org/type"
        );
        assert_eq!(table.expand("\"ex:quoted\"", PrefixMatch::First), "\"ex:quoted\"");
    }

    #[test]
    fn test_expansion_is_idempotent() {
        let table = table();
        for mode in [PrefixMatch::First, PrefixMatch::Longest] {
            for component in ["ex:a", ":b", "\"5\"^^ex:int", "http://ex.org/c", "blank_node_(id=0)"] {
                let once = table.expand(component, mode);
                assert_eq!(table.expand(&once, mode), once);
            }
        }
    }

    #[test]
    fn test_expand_store_and_remove_declarations() {
        let mut store = TripleStore::new();
        store.add(Triple::new("@prefix", "ex:", "http://ex.org/"));
        store.add(Triple::new("ex:a", "ex:b", "ex:c"));
        let mut table = PrefixTable::new();
        table.collect(&store);
        table.expand_store(&mut store, PrefixMatch::First);

        assert_eq!(store.triples()[0], Triple::new("@prefix", "ex:", "http://ex.org/"));
        assert_eq!(remove_declarations(&mut store), 1);
        assert_eq!(
            store.into_vec(),
            vec![Triple::new("http://ex.org/a", "http://ex.org/b", "http://ex.org/c")]
        );
    }

    #[test]
    fn test_prefix_match_from_str() {
        assert_eq!("LONGEST".parse::<PrefixMatch>(), Ok(PrefixMatch::Longest));
        assert!("widest".parse::<PrefixMatch>().is_err());
    }
}
