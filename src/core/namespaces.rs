//! Standard namespace URI constants

/// Standard namespace URI constants
pub mod ns {
    /// RDF namespace
    pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    /// XML Schema Datatypes namespace
    pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";

    /// Namespace given to generated identifiers when a document declares no base
    pub const FALLBACK_BASE: &str = "http://www.example-domain.org#";

    /// Helper to construct a full URI from namespace and local name
    #[inline]
    pub fn uri(namespace: &str, local: &str) -> String {
        format!("{}{}", namespace, local)
    }

    /// The `rdf:type` identifier the `a` shorthand stands for
    pub fn rdf_type() -> String {
        uri(RDF, "type")
    }
}
