//! Output renderers
//!
//! Each renderer is a read-only consumer of a [`ParsedDocument`].

use crate::config::{OutputConfig, OutputFormat};
use crate::parser::ParsedDocument;
use crate::term::{is_full_identifier, is_generated_id, Triple, ELEMENT_PREFIX};

/// Renders a flattened document to text
pub trait Renderer {
    fn render(&self, doc: &ParsedDocument) -> String;
}

/// Pick the renderer for an output format
pub fn renderer_for(format: OutputFormat, config: &OutputConfig) -> Box<dyn Renderer> {
    match format {
        OutputFormat::Tsv => Box::new(TabularRenderer {
            delimiter: config.delimiter.clone(),
            header: config.header,
        }),
        OutputFormat::Turtle => Box::new(TurtleRenderer {
            fallback_namespace: config.fallback_namespace.clone(),
        }),
        OutputFormat::Json => Box::new(JsonRenderer { pretty: true }),
    }
}

/// Delimited `Subject Predicate Object` table
#[derive(Debug, Clone)]
pub struct TabularRenderer {
    pub delimiter: String,
    pub header: bool,
}

impl Default for TabularRenderer {
    fn default() -> Self {
        TabularRenderer {
            delimiter: "\t".to_string(),
            header: true,
        }
    }
}

impl Renderer for TabularRenderer {
    fn render(&self, doc: &ParsedDocument) -> String {
        let mut output = String::new();
        if self.header {
            output.push_str(&["Subject", "Predicate", "Object"].join(self.delimiter.as_str()));
            output.push('\n');
        }
        for triple in doc.triples() {
            output.push_str(&triple.components().join(self.delimiter.as_str()));
            output.push('\n');
        }
        output
    }
}

/// One fully bracketed Turtle statement per triple
#[derive(Debug, Clone)]
pub struct TurtleRenderer {
    /// Namespace for generated and relative names when no base is declared
    pub fallback_namespace: String,
}

impl Default for TurtleRenderer {
    fn default() -> Self {
        TurtleRenderer {
            fallback_namespace: crate::core::ns::FALLBACK_BASE.to_string(),
        }
    }
}

impl TurtleRenderer {
    fn format_triple(&self, triple: &Triple, base: &str) -> String {
        let subject = if is_generated_id(&triple.subject) || !is_full_identifier(&triple.subject) {
            format!("<{}{}>", base, triple.subject)
        } else {
            format!("<{}>", triple.subject)
        };

        let predicate = if triple.predicate.starts_with(ELEMENT_PREFIX) {
            format!("<{}{}>", base, triple.predicate)
        } else {
            format!("<{}>", triple.predicate)
        };

        format!("{} {} {} .\n", subject, predicate, self.format_object(&triple.object, base))
    }

    fn format_object(&self, object: &str, base: &str) -> String {
        if is_generated_id(object) {
            return format!("<{}{}>", base, object);
        }
        if object.starts_with('"') || !is_full_identifier(object) {
            return format_literal(object);
        }
        format!("<{}>", object)
    }
}

/// Quote a literal, bracketing only the identifier of a `^^` datatype
fn format_literal(object: &str) -> String {
    if let Some(split) = object.find("\"^^") {
        let (text, datatype) = object.split_at(split + 3);
        return format!("{}<{}>", text, datatype);
    }
    if object.starts_with('"') {
        object.to_string()
    } else {
        format!("\"{}\"", object)
    }
}

impl Renderer for TurtleRenderer {
    fn render(&self, doc: &ParsedDocument) -> String {
        let base = doc.base().unwrap_or(&self.fallback_namespace);
        doc.triples()
            .iter()
            .map(|t| self.format_triple(t, base))
            .collect()
    }
}

/// JSON array of `{subject, predicate, object}` records
#[derive(Debug, Clone, Default)]
pub struct JsonRenderer {
    pub pretty: bool,
}

impl Renderer for JsonRenderer {
    fn render(&self, doc: &ParsedDocument) -> String {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(doc.triples())
        } else {
            serde_json::to_string(doc.triples())
        };
        // Plain string fields always serialize
        let mut output = rendered.unwrap_or_default();
        output.push('\n');
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ns;
    use crate::parser::parse;

    #[test]
    fn test_tabular_output() {
        let doc = parse("<http://ex.org/a> <http://ex.org/b> 'c' .").unwrap();
        let output = TabularRenderer::default().render(&doc);
        assert_eq!(
            output,
            "Subject\tPredicate\tObject\nhttp://ex.org/a\thttp://ex.org/b\t\"c\"\n"
        );

        let csv = TabularRenderer {
            delimiter: ",".into(),
            header: false,
        };
        assert_eq!(csv.render(&doc), "http://ex.org/a,http://ex.org/b,\"c\"\n");
    }

    #[test]
    fn test_turtle_generated_ids_use_fallback_namespace() {
        let doc = parse("<http://ex.org/a> <http://ex.org/b> ( <http://ex.org/c> ) .").unwrap();
        let output = TurtleRenderer::default().render(&doc);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines,
            vec![
                "<http://ex.org/a> <http://ex.org/b> <http://www.example-domain.org#collection_(id=0)> .",
                "<http://www.example-domain.org#collection_(id=0)> <http://www.example-domain.org#element_(#1)> <http://ex.org/c> .",
            ]
        );
    }

    #[test]
    fn test_turtle_uses_declared_base() {
        let doc = parse("@base <http://base.org/> . <http://ex.org/a> <http://ex.org/b> [ <http://ex.org/c> 'd' ] .")
            .unwrap();
        let output = TurtleRenderer::default().render(&doc);
        assert!(output.contains("<http://base.org/blank_node_(id=0)> <http://ex.org/c> \"d\" ."));
    }

    #[test]
    fn test_turtle_typed_literal_round_trip() {
        let input = format!(
            "@prefix xsd: <{}> . <http://ex.org/a> <http://ex.org/b> \"5\"^^xsd:integer .",
            ns::XSD
        );
        let doc = parse(&input).unwrap();
        let output = TurtleRenderer::default().render(&doc);
        assert_eq!(
            output,
            "<http://ex.org/a> <http://ex.org/b> \"5\"^^<http://www.w3.org/2001/XMLSchema#integer> .\n"
        );
    }

    #[test]
    fn test_turtle_bare_object_is_quoted() {
        assert_eq!(format_literal("42"), "\"42\"");
        assert_eq!(format_literal("\"already\""), "\"already\"");
        assert_eq!(format_literal("\"5\"^^xsd:int"), "\"5\"^^<xsd:int>");
    }

    #[test]
    fn test_turtle_relative_subject_gets_namespace() {
        let doc = parse("ex:a <http://ex.org/b> <http://ex.org/c> .").unwrap();
        let renderer = TurtleRenderer {
            fallback_namespace: "urn:fallback:".into(),
        };
        assert_eq!(
            renderer.render(&doc),
            "<urn:fallback:ex:a> <http://ex.org/b> <http://ex.org/c> .\n"
        );
    }

    #[test]
    fn test_json_output() {
        let doc = parse("<http://ex.org/a> a <http://ex.org/T> .").unwrap();
        let output = JsonRenderer::default().render(&doc);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value[0]["subject"], "http://ex.org/a");
        assert_eq!(value[0]["predicate"], ns::rdf_type());
        assert_eq!(value[0]["object"], "http://ex.org/T");
    }

    #[test]
    fn test_renderer_for_format() {
        let doc = parse("<http://ex.org/a> <http://ex.org/b> <http://ex.org/c> .").unwrap();
        let config = OutputConfig::default();
        assert!(renderer_for(OutputFormat::Tsv, &config)
            .render(&doc)
            .starts_with("Subject\t"));
        assert!(renderer_for(OutputFormat::Turtle, &config)
            .render(&doc)
            .ends_with(" .\n"));
        assert!(renderer_for(OutputFormat::Json, &config)
            .render(&doc)
            .starts_with('['));
    }
}
