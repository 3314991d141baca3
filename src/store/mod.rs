//! Triple store
//!
//! An ordered, append-only list of triples. Insertion order is document
//! order and duplicates are kept.

use crate::term::Triple;

/// The triples produced from one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripleStore {
    triples: Vec<Triple>,
}

impl TripleStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a triple
    pub fn add(&mut self, triple: Triple) {
        self.triples.push(triple);
    }

    /// Append multiple triples
    pub fn add_all(&mut self, triples: impl IntoIterator<Item = Triple>) {
        self.triples.extend(triples);
    }

    /// Get all triples
    pub fn triples(&self) -> &[Triple] {
        &self.triples
    }

    /// Get the number of triples
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Triple> {
        self.triples.iter_mut()
    }

    /// Keep only the triples matching `keep`, preserving order. Returns the number removed.
    pub fn retain(&mut self, keep: impl FnMut(&Triple) -> bool) -> usize {
        let before = self.triples.len();
        self.triples.retain(keep);
        before - self.triples.len()
    }

    pub fn into_vec(self) -> Vec<Triple> {
        self.triples
    }
}

impl<'a> IntoIterator for &'a TripleStore {
    type Item = &'a Triple;
    type IntoIter = std::slice::Iter<'a, Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_are_kept_in_order() {
        let mut store = TripleStore::new();
        store.add(Triple::new("s", "p", "o"));
        store.add(Triple::new("s", "p", "o2"));
        store.add(Triple::new("s", "p", "o"));
        assert_eq!(store.len(), 3);
        let objects: Vec<_> = store.iter().map(|t| t.object.as_str()).collect();
        assert_eq!(objects, vec!["o", "o2", "o"]);
    }

    #[test]
    fn test_retain_reports_removed() {
        let mut store = TripleStore::new();
        store.add_all(vec![
            Triple::new("@prefix", "ex:", "http://ex.org/"),
            Triple::new("s", "p", "o"),
        ]);
        assert_eq!(store.retain(|t| t.subject != "@prefix"), 1);
        assert_eq!(store.triples(), &[Triple::new("s", "p", "o")]);
    }
}
