//! Masking of identifiers and quoted literals
//!
//! Every `<...>` identifier and every quoted literal is moved into a
//! [`MaskTable`] and replaced in the text by a placeholder token, so that the
//! later stages can treat the document as whitespace-separated tokens without
//! tripping over delimiters that live inside those spans.
//!
//! Extraction order is fixed: identifiers, then `"""` literals, then `"`
//! literals, then `'` literals. Each class is scanned only after the previous
//! one has been masked, and each uses shortest-match spans.

use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::term::placeholder::{self, Placeholder, PlaceholderKind};

/// Spans extracted from a document, keyed by kind and sequential index
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaskTable {
    spans: [Vec<String>; 6],
}

impl MaskTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a span and return the placeholder that refers to it
    pub fn push(&mut self, kind: PlaceholderKind, span: impl Into<String>) -> Placeholder {
        let spans = &mut self.spans[kind.slot()];
        spans.push(span.into());
        Placeholder::new(kind, spans.len() - 1)
    }

    /// Look up the span behind a placeholder
    pub fn get(&self, placeholder: Placeholder) -> Option<&str> {
        self.spans[placeholder.kind.slot()]
            .get(placeholder.index)
            .map(String::as_str)
    }

    /// Look up the span behind a placeholder token
    pub fn lookup(&self, token: &str) -> Option<&str> {
        Placeholder::parse(token).and_then(|p| self.get(p))
    }

    /// All spans of one kind, in index order
    pub fn spans(&self, kind: PlaceholderKind) -> &[String] {
        &self.spans[kind.slot()]
    }

    /// Number of spans of one kind
    pub fn len(&self, kind: PlaceholderKind) -> usize {
        self.spans[kind.slot()].len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.iter().all(Vec::is_empty)
    }
}

/// A document with its identifiers and literals masked
#[derive(Debug, Clone)]
pub struct Masked {
    pub text: String,
    pub table: MaskTable,
}

macro_rules! static_regex {
    ($name:ident, $pattern:expr) => {
        fn $name() -> &'static Regex {
            static RE: OnceLock<Regex> = OnceLock::new();
            RE.get_or_init(|| Regex::new($pattern).expect("valid regex"))
        }
    };
}

static_regex!(quote_run, r#""{4,}"#);
static_regex!(escaped_quote, r#"\\["']"#);
static_regex!(base_directive, r"@base\b");
static_regex!(sparql_prefix, r"(?mi)^[ \t]*PREFIX[ \t]+(\S*:)[ \t]*(<[^>\n]*>)[ \t]*$");
static_regex!(sparql_base, r"(?mi)^[ \t]*BASE[ \t]+(<[^>\n]*>)[ \t]*$");
static_regex!(iri_span, r"(?s)<(.*?)>");
static_regex!(triple_quoted, r#"(?s)"""(.*?)""""#);
static_regex!(double_quoted, r#"(?s)"(.*?)""#);
static_regex!(single_quoted, r"(?s)'(.*?)'");
static_regex!(comment, r"#[^\n]*");
static_regex!(whitespace, r"\s+");

/// Clean up raw text before extraction
///
/// Hides `~` so document text never reads as a placeholder token, deletes runs
/// of four or more `"` and backslash-escaped quotes, and rewrites `@base`,
/// `PREFIX` and `BASE` directives into `@prefix` statements.
pub fn normalize(raw: &str) -> String {
    let raw = placeholder::escape_tildes(raw);
    let text = quote_run().replace_all(&raw, "");
    let text = escaped_quote().replace_all(&text, "");
    let text = sparql_prefix().replace_all(&text, "@prefix $1 $2 .");
    let text = sparql_base().replace_all(&text, "@prefix : $1 .");
    base_directive().replace_all(&text, "@prefix :").into_owned()
}

/// Mask identifiers and literals in normalized text
pub fn mask(text: &str) -> Masked {
    let mut table = MaskTable::new();

    // Identifiers get padding spaces so `ex:a<...>` still splits into two
    // tokens, except after `^^` where the datatype must stay glued to its literal.
    let text = iri_span()
        .replace_all(text, |caps: &Captures| {
            let placeholder = table.push(PlaceholderKind::Url, &caps[1]);
            let start = caps.get(0).map_or(0, |m| m.start());
            if text[..start].ends_with("^^") {
                placeholder.token()
            } else {
                format!(" {} ", placeholder)
            }
        })
        .into_owned();

    let text = mask_literals(&text, triple_quoted(), PlaceholderKind::TripleQuoted, &mut table);
    let text = mask_literals(&text, double_quoted(), PlaceholderKind::DoubleQuoted, &mut table);
    let text = mask_literals(&text, single_quoted(), PlaceholderKind::SingleQuoted, &mut table);

    Masked { text, table }
}

fn mask_literals(text: &str, re: &Regex, kind: PlaceholderKind, table: &mut MaskTable) -> String {
    re.replace_all(text, |caps: &Captures| {
        let span = unmask_nested(&caps[1], table);
        table.push(kind, span).token()
    })
    .into_owned()
}

/// Put identifiers and literals masked by an earlier pass back into a literal body
fn unmask_nested(span: &str, table: &MaskTable) -> String {
    let mut out = String::with_capacity(span.len());
    let mut cursor = 0;

    for (range, placeholder) in placeholder::find_all(span) {
        let Some(inner) = table.get(placeholder) else {
            continue;
        };
        let (mut start, mut end) = (range.start, range.end);
        let (open, close) = match placeholder.kind {
            PlaceholderKind::Url => {
                // Drop the padding the identifier pass added
                if !span[..start].ends_with("^^") {
                    if span[cursor..start].ends_with(' ') {
                        start -= 1;
                    }
                    if span[end..].starts_with(' ') {
                        end += 1;
                    }
                }
                ("<", ">")
            }
            PlaceholderKind::TripleQuoted => ("\"\"\"", "\"\"\""),
            PlaceholderKind::DoubleQuoted => ("\"", "\""),
            _ => continue,
        };
        out.push_str(&span[cursor..start]);
        out.push_str(open);
        out.push_str(inner);
        out.push_str(close);
        cursor = end;
    }

    out.push_str(&span[cursor..]);
    out
}

/// Remove `#` comments up to the end of the line
pub fn strip_comments(text: &str) -> String {
    comment().replace_all(text, "").into_owned()
}

/// Collapse every whitespace run to a single space and trim the ends
pub fn flatten_whitespace(text: &str) -> String {
    whitespace().replace_all(text, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::placeholder;
    use proptest::prelude::*;

    #[test]
    fn test_mask_identifiers() {
        let masked = mask("<http://ex.org/a> <http://ex.org/b> <http://ex.org/a> .");
        assert_eq!(masked.table.spans(PlaceholderKind::Url), &[
            "http://ex.org/a".to_string(),
            "http://ex.org/b".to_string(),
            "http://ex.org/a".to_string(),
        ]);
        assert_eq!(flatten_whitespace(&masked.text), "~iri_0~ ~iri_1~ ~iri_2~ .");
    }

    #[test]
    fn test_identifier_masked_before_literals() {
        // The quote inside the identifier must not open a literal
        let masked = mask(r#"<http://ex.org/a"b> ex:p "x" ."#);
        assert_eq!(masked.table.spans(PlaceholderKind::Url), &["http://ex.org/a\"b".to_string()]);
        assert_eq!(masked.table.spans(PlaceholderKind::DoubleQuoted), &["x".to_string()]);
    }

    #[test]
    fn test_literal_classes_in_order() {
        let masked = mask(r#"ex:a ex:b """long "quoted" text""", "plain", 'single' ."#);
        assert_eq!(
            masked.table.spans(PlaceholderKind::TripleQuoted),
            &["long \"quoted\" text".to_string()]
        );
        assert_eq!(masked.table.spans(PlaceholderKind::DoubleQuoted), &["plain".to_string()]);
        assert_eq!(masked.table.spans(PlaceholderKind::SingleQuoted), &["single".to_string()]);
        assert_eq!(masked.text, "ex:a ex:b ~lit3_0~, ~lit2_0~, ~lit1_0~ .");
    }

    #[test]
    fn test_double_quotes_win_over_single() {
        let masked = mask(r#"ex:a ex:b "it's" ."#);
        assert_eq!(masked.table.spans(PlaceholderKind::DoubleQuoted), &["it's".to_string()]);
        assert_eq!(masked.table.len(PlaceholderKind::SingleQuoted), 0);
    }

    #[test]
    fn test_typed_literal_stays_one_token() {
        let masked = mask(r#"ex:a ex:b "5"^^<http://www.w3.org/2001/XMLSchema#integer> ."#);
        assert_eq!(masked.text, "ex:a ex:b ~lit2_0~^^~iri_0~ .");
    }

    #[test]
    fn test_multiline_literal() {
        let masked = mask("ex:a ex:b \"\"\"line one\nline two\"\"\" .");
        assert_eq!(
            masked.table.spans(PlaceholderKind::TripleQuoted),
            &["line one\nline two".to_string()]
        );
    }

    #[test]
    fn test_normalize_quote_runs_and_escapes() {
        assert_eq!(normalize(r#"ex:a ex:b """""""" ."#), "ex:a ex:b  .");
        assert_eq!(normalize(r#""say \"hi\"""#), r#""say hi""#);
        assert_eq!(normalize(r"'it\'s'"), "'its'");
    }

    #[test]
    fn test_normalize_directives() {
        assert_eq!(normalize("@base <http://ex.org/> ."), "@prefix : <http://ex.org/> .");
        assert_eq!(
            normalize("PREFIX ex: <http://ex.org/>\nex:a ex:b ex:c ."),
            "@prefix ex: <http://ex.org/> .\nex:a ex:b ex:c ."
        );
        assert_eq!(normalize("base <http://ex.org/>"), "@prefix : <http://ex.org/> .");
    }

    #[test]
    fn test_comments_after_masking() {
        let masked = mask("<http://ex.org/#frag> ex:p \"# not a comment\" . # real comment\nex:a ex:b ex:c .");
        let text = flatten_whitespace(&strip_comments(&masked.text));
        assert_eq!(text, "~iri_0~ ex:p ~lit2_0~ . ex:a ex:b ex:c .");
        assert_eq!(masked.table.spans(PlaceholderKind::Url), &["http://ex.org/#frag".to_string()]);
    }

    #[test]
    fn test_identifier_inside_literal_is_kept_verbatim() {
        let masked = mask(r#"ex:a ex:b "see <http://x.org/> here" ."#);
        assert_eq!(
            masked.table.spans(PlaceholderKind::DoubleQuoted),
            &["see <http://x.org/> here".to_string()]
        );

        let masked = mask(r#"ex:a ex:b """a <b>bold</b>word <i><em>x</em></i>""" ."#);
        assert_eq!(
            masked.table.spans(PlaceholderKind::TripleQuoted),
            &["a <b>bold</b>word <i><em>x</em></i>".to_string()]
        );
        assert_eq!(masked.text, "ex:a ex:b ~lit3_0~ .");
    }

    #[test]
    fn test_quoted_text_inside_single_quotes_is_kept_verbatim() {
        let masked = mask(r#"ex:a ex:b 'say "hi" to ^^<x>' ."#);
        assert_eq!(
            masked.table.spans(PlaceholderKind::SingleQuoted),
            &["say \"hi\" to ^^<x>".to_string()]
        );
    }

    #[test]
    fn test_document_tilde_is_not_a_token() {
        let masked = mask(&normalize("ex:a ex:b ~iri_0~ ."));
        assert!(!placeholder::contains_any(&masked.text));
        assert!(masked.table.is_empty());
    }

    #[test]
    fn test_table_is_bidirectional() {
        let mut table = MaskTable::new();
        let p = table.push(PlaceholderKind::DoubleQuoted, "hello");
        assert_eq!(table.lookup("~lit2_0~"), Some("hello"));
        assert_eq!(table.get(p), Some("hello"));
        assert_eq!(table.lookup("~lit1_0~"), None);
    }

    #[test]
    fn test_unterminated_quote_yields_no_match() {
        let masked = mask("ex:a ex:b \"open .");
        assert!(masked.table.is_empty());
        assert_eq!(masked.text, "ex:a ex:b \"open .");
    }

    proptest! {
        #[test]
        fn every_token_resolves_to_one_span(
            words in proptest::collection::vec("[a-z]{1,6}", 1..8),
            quoting in proptest::collection::vec(0u8..4, 1..8),
        ) {
            let mut doc = String::new();
            for (word, q) in words.iter().zip(quoting.iter().cycle()) {
                match q {
                    0 => doc.push_str(&format!("<http://ex.org/{}> ", word)),
                    1 => doc.push_str(&format!("\"{}\" ", word)),
                    2 => doc.push_str(&format!("'{}' ", word)),
                    _ => doc.push_str(&format!("\"\"\"{}\"\"\" ", word)),
                }
            }
            let masked = mask(&doc);
            let found = placeholder::find_all(&masked.text);
            for kind in PlaceholderKind::ALL {
                let indices: Vec<usize> = found
                    .iter()
                    .filter(|(_, p)| p.kind == kind)
                    .map(|(_, p)| p.index)
                    .collect();
                let expected: Vec<usize> = (0..masked.table.len(kind)).collect();
                prop_assert_eq!(indices, expected);
            }
        }
    }
}
