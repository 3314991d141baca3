//! Shorthand expansion
//!
//! Expands `;` predicate lists and `,` object lists into independent triples,
//! then turns every harvested ordered list and anonymous node into triples of
//! its own. Lists are resolved before nodes because a list body may hold
//! anonymous nodes that are only harvested when the list is resolved.

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::core::ns;
use crate::parser::harvest::{self, BracketKind};
use crate::parser::mask::{flatten_whitespace, MaskTable};
use crate::parser::statement::Statement;
use crate::parser::{Diagnostics, ParseError};
use crate::store::TripleStore;
use crate::term::{element_predicate, Placeholder, PlaceholderKind, Triple};

/// Reserved predicate shorthand for `rdf:type`
const TYPE_SHORTHAND: &str = "a";

/// Spaces immediately inside/outside `[ ] ; ,`
fn delimiter_spacing() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s*([\[\];,])\s*").expect("valid regex"))
}

/// Remove incidental whitespace around delimiters
pub fn tighten_delimiters(clause: &str) -> String {
    delimiter_spacing().replace_all(clause.trim(), "${1}").into_owned()
}

/// Rewrite the `a` shorthand to the full `rdf:type` identifier
pub fn expand_shorthand(predicate: &str) -> String {
    if predicate == TYPE_SHORTHAND {
        ns::rdf_type()
    } else {
        predicate.to_string()
    }
}

/// Emits triples into a store, reporting malformed input through [`Diagnostics`]
pub struct Expander<'a> {
    store: &'a mut TripleStore,
    diagnostics: &'a mut Diagnostics,
}

impl<'a> Expander<'a> {
    pub fn new(store: &'a mut TripleStore, diagnostics: &'a mut Diagnostics) -> Self {
        Expander { store, diagnostics }
    }

    /// Expand one statement's `;`/`,` shorthand into triples
    pub fn expand_statement(&mut self, statement: &Statement) -> Result<(), ParseError> {
        let subject = statement.subject.as_str();
        let predicate = expand_shorthand(&statement.predicate);

        let clause = tighten_delimiters(&statement.object);
        // `ex:c ;` before the terminator closes the statement, it does not open a group
        let clause = clause.trim_end_matches(';');

        if !clause.contains(';') {
            return self.emit_objects(subject, &predicate, clause);
        }

        let mut groups = clause.split(';');
        if let Some(first) = groups.next() {
            if !first.is_empty() {
                self.emit_objects(subject, &predicate, first)?;
            }
        }

        for group in groups {
            if group.trim().is_empty() {
                continue;
            }
            if let Some((group_predicate, object)) = self.predicate_object(group)? {
                self.emit_objects(subject, &expand_shorthand(group_predicate), object)?;
            }
        }

        Ok(())
    }

    /// Resolve every harvested ordered list, then every anonymous node
    pub fn resolve_collections(&mut self, table: &mut MaskTable) -> Result<(), ParseError> {
        let lists = table.len(PlaceholderKind::OrderedList);
        for index in 0..lists {
            self.resolve_list(index, table)?;
        }

        // Resolving lists may have harvested more nodes, so re-check the length each turn
        let mut index = 0;
        while index < table.len(PlaceholderKind::AnonymousNode) {
            self.resolve_node(index, table)?;
            index += 1;
        }

        debug!(
            lists,
            nodes = table.len(PlaceholderKind::AnonymousNode),
            "resolved harvested spans"
        );
        Ok(())
    }

    fn resolve_list(&mut self, index: usize, table: &mut MaskTable) -> Result<(), ParseError> {
        let list = Placeholder::new(PlaceholderKind::OrderedList, index);
        let body = table
            .get(list)
            .map(flatten_whitespace)
            .ok_or_else(|| ParseError::UnresolvedPlaceholder { token: list.token() })?;

        // Lists may contain anonymous nodes that the document-wide pass never saw
        let harvested = harvest::harvest(&body, BracketKind::AnonymousNode, table)?;

        let subject = list.token();
        for (position, item) in harvested.text.split_whitespace().enumerate() {
            self.store
                .add(Triple::new(subject.as_str(), element_predicate(position + 1), item));
        }
        Ok(())
    }

    fn resolve_node(&mut self, index: usize, table: &MaskTable) -> Result<(), ParseError> {
        let node = Placeholder::new(PlaceholderKind::AnonymousNode, index);
        let body = table
            .get(node)
            .ok_or_else(|| ParseError::UnresolvedPlaceholder { token: node.token() })?;

        let body = tighten_delimiters(&flatten_whitespace(body));
        let body = body.trim_end_matches(|c: char| c == ';' || c == '.' || c.is_whitespace());

        let subject = node.token();
        for entry in body.split(';').map(str::trim).filter(|e| !e.is_empty()) {
            let tokens: Vec<&str> = entry.split_whitespace().collect();
            if let [predicate, object] = tokens.as_slice() {
                self.emit_objects(&subject, &expand_shorthand(predicate), object)?;
            } else {
                self.diagnostics.report(ParseError::MalformedGroup {
                    group: entry.to_string(),
                    expected: 2,
                    found: tokens.len(),
                })?;
            }
        }
        Ok(())
    }

    /// Split a `;` group into its predicate and object
    ///
    /// Only the first two tokens are used; anything else is reported.
    fn predicate_object<'g>(&mut self, group: &'g str) -> Result<Option<(&'g str, &'g str)>, ParseError> {
        let tokens: Vec<&str> = group.split_whitespace().collect();
        if tokens.len() != 2 {
            self.diagnostics.report(ParseError::MalformedGroup {
                group: group.to_string(),
                expected: 2,
                found: tokens.len(),
            })?;
        }
        Ok(match tokens.as_slice() {
            [predicate, object, ..] => Some((*predicate, *object)),
            _ => None,
        })
    }

    /// Emit one triple per `,`-separated object
    fn emit_objects(&mut self, subject: &str, predicate: &str, objects: &str) -> Result<(), ParseError> {
        for object in objects.split(',') {
            let object = object.trim();
            let found = object.split_whitespace().count();
            if found != 1 {
                self.diagnostics.report(ParseError::MalformedGroup {
                    group: objects.to_string(),
                    expected: 1,
                    found,
                })?;
            }
            // An empty item between commas carries nothing to emit
            if found > 0 {
                self.store.add(Triple::new(subject, predicate, object));
            }
        }
        Ok(())
    }
}
