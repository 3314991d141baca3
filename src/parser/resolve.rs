//! Placeholder resolution
//!
//! Runs once expansion is complete. Identifiers and literals are written back
//! into the components that carry their tokens; anonymous-node and list tokens
//! then become stable generated identifiers.

use std::sync::OnceLock;

use regex::Regex;

use crate::parser::mask::MaskTable;
use crate::parser::ParseError;
use crate::store::TripleStore;
use crate::term::placeholder::{self, Placeholder};
use crate::term::{blank_node_id, collection_id, PlaceholderKind};

fn line_breaks() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s*[\r\n]+\s*").expect("valid regex"))
}

/// Substitute every identifier and literal token in the store
pub fn resolve_literals(store: &mut TripleStore, table: &MaskTable) -> Result<(), ParseError> {
    for triple in store.iter_mut() {
        for component in triple.components_mut() {
            if placeholder::contains_any(component) {
                *component = substitute_textual(component, table)?;
            }
        }
    }
    Ok(())
}

/// Replace components carrying node or list tokens with generated identifiers
pub fn resolve_identifiers(store: &mut TripleStore) {
    for triple in store.iter_mut() {
        for component in triple.components_mut() {
            let generated = placeholder::find_all(component)
                .into_iter()
                .find_map(|(_, p)| generated_id(p));
            if let Some(id) = generated {
                *component = id;
            }
        }
    }
}

/// Turn hidden document `~` characters back into `~`
pub fn restore_tildes(store: &mut TripleStore) {
    for triple in store.iter_mut() {
        for component in triple.components_mut() {
            if component.contains(placeholder::ESCAPED_TILDE) {
                *component = placeholder::unescape_tildes(component);
            }
        }
    }
}

fn generated_id(placeholder: Placeholder) -> Option<String> {
    match placeholder.kind {
        PlaceholderKind::AnonymousNode => Some(blank_node_id(placeholder.index)),
        PlaceholderKind::OrderedList => Some(collection_id(placeholder.index)),
        _ => None,
    }
}

/// Write textual spans back over their tokens, leaving node and list tokens in place
fn substitute_textual(component: &str, table: &MaskTable) -> Result<String, ParseError> {
    let mut out = String::with_capacity(component.len());
    let mut cursor = 0;

    for (range, placeholder) in placeholder::find_all(component) {
        if !placeholder.kind.is_textual() {
            continue;
        }
        let span = table
            .get(placeholder)
            .ok_or_else(|| ParseError::UnresolvedPlaceholder {
                token: placeholder.token(),
            })?;

        out.push_str(&component[cursor..range.start]);
        if placeholder.kind.is_literal() {
            out.push('"');
            out.push_str(&line_breaks().replace_all(span, " "));
            out.push('"');
        } else {
            out.push_str(span);
        }
        cursor = range.end;
    }

    out.push_str(&component[cursor..]);
    Ok(out)
}
