//! Statement splitting
//!
//! Turns the flattened, fully masked text into raw `(subject, predicate,
//! object-clause)` records. Statements end at a ` . ` token; the first two
//! whitespace tokens are the subject and predicate and the rest is the
//! object clause, which the expander takes apart.

use std::sync::OnceLock;

use regex::Regex;

use crate::parser::{Diagnostics, ParseError};
use crate::term::{Placeholder, PlaceholderKind};

/// A statement before shorthand expansion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

impl Statement {
    pub fn new(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Statement {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }
}

const TERMINATOR: &str = " . ";

/// A `.` glued to the end of a token: `ex:c.` or `~lit2_0~.`
fn glued_terminator() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\S)\.(\s|$)").expect("valid regex"))
}

/// Split flattened text into statements
///
/// A trailing segment with no terminator is reported as an unterminated
/// statement; when the diagnostics tolerate it, it is still returned.
pub fn split_statements(text: &str, diagnostics: &mut Diagnostics) -> Result<Vec<Statement>, ParseError> {
    let spaced = glued_terminator().replace_all(text, "${1} .${2}");
    let padded = format!("{} ", spaced.trim());

    let segments: Vec<&str> = padded.split(TERMINATOR).collect();
    let mut statements = Vec::with_capacity(segments.len());

    if let Some((trailing, complete)) = segments.split_last() {
        for segment in complete {
            if let Some(statement) = parse_segment(segment, diagnostics)? {
                statements.push(statement);
            }
        }

        let trailing = trailing.trim();
        if !trailing.is_empty() {
            diagnostics.report(ParseError::UnterminatedStatement {
                statement: trailing.to_string(),
            })?;
            if let Some(statement) = parse_segment(trailing, diagnostics)? {
                statements.push(statement);
            }
        }
    }

    Ok(statements)
}

fn parse_segment(segment: &str, diagnostics: &mut Diagnostics) -> Result<Option<Statement>, ParseError> {
    let segment = segment.trim();
    if segment.is_empty() {
        return Ok(None);
    }

    let mut parts = segment.splitn(3, ' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(subject), Some(predicate), Some(object)) if !object.trim().is_empty() => {
            Ok(Some(Statement::new(subject, predicate, object.trim())))
        }
        // `[ ex:p ex:o ] .` only describes the node itself
        (Some(subject), None, None) if is_anonymous_node(subject) => Ok(None),
        _ => {
            diagnostics.report(ParseError::MalformedStatement {
                statement: segment.to_string(),
            })?;
            Ok(None)
        }
    }
}

fn is_anonymous_node(token: &str) -> bool {
    Placeholder::parse(token).is_some_and(|p| p.kind == PlaceholderKind::AnonymousNode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Strictness;

    fn split(text: &str) -> (Vec<Statement>, Diagnostics) {
        let mut diagnostics = Diagnostics::new(Strictness::Permissive);
        let statements = split_statements(text, &mut diagnostics).unwrap();
        (statements, diagnostics)
    }

    #[test]
    fn test_split_two_statements() {
        let (statements, diagnostics) = split("ex:a ex:b ex:c . ex:d ex:e ex:f , ex:g .");
        assert_eq!(
            statements,
            vec![
                Statement::new("ex:a", "ex:b", "ex:c"),
                Statement::new("ex:d", "ex:e", "ex:f , ex:g"),
            ]
        );
        assert!(diagnostics.warnings().is_empty());
    }

    #[test]
    fn test_glued_terminator() {
        let (statements, _) = split("ex:a ex:b ex:c. ex:d ex:e ~lit2_0~.");
        assert_eq!(
            statements,
            vec![
                Statement::new("ex:a", "ex:b", "ex:c"),
                Statement::new("ex:d", "ex:e", "~lit2_0~"),
            ]
        );
    }

    #[test]
    fn test_dotted_local_name_is_not_a_terminator() {
        let (statements, _) = split("ex:a ex:b ex:c.d . ex:e ex:f 1.5 .");
        assert_eq!(statements[0].object, "ex:c.d");
        assert_eq!(statements[1].object, "1.5");
    }

    #[test]
    fn test_standalone_anonymous_node() {
        let (statements, diagnostics) = split("~bnode_0~ . ex:a ex:b ex:c .");
        assert_eq!(statements, vec![Statement::new("ex:a", "ex:b", "ex:c")]);
        assert!(diagnostics.warnings().is_empty());
    }

    #[test]
    fn test_malformed_statement_permissive() {
        let (statements, diagnostics) = split("ex:a ex:b . ex:c ex:d ex:e .");
        assert_eq!(statements, vec![Statement::new("ex:c", "ex:d", "ex:e")]);
        assert_eq!(diagnostics.warnings().len(), 1);
    }

    #[test]
    fn test_malformed_statement_strict() {
        let mut diagnostics = Diagnostics::new(Strictness::Strict);
        let err = split_statements("ex:a ex:b . ex:c ex:d ex:e .", &mut diagnostics).unwrap_err();
        assert!(matches!(err, ParseError::MalformedStatement { statement } if statement == "ex:a ex:b"));
    }

    #[test]
    fn test_unterminated_trailing_statement() {
        let (statements, diagnostics) = split("ex:a ex:b ex:c . ex:d ex:e ex:f");
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[1], Statement::new("ex:d", "ex:e", "ex:f"));
        assert_eq!(diagnostics.warnings().len(), 1);

        let mut strict = Diagnostics::new(Strictness::Strict);
        let err = split_statements("ex:a ex:b ex:c . ex:d ex:e ex:f", &mut strict).unwrap_err();
        assert!(matches!(err, ParseError::UnterminatedStatement { .. }));
    }

    #[test]
    fn test_empty_document() {
        let (statements, diagnostics) = split("");
        assert!(statements.is_empty());
        assert!(diagnostics.warnings().is_empty());
    }
}
