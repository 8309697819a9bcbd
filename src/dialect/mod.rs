//! Query language dialects
//!
//! A [`Dialect`] captures the syntax rules and capabilities of one query
//! language family. The retrieval operations never inspect a store's query
//! language themselves; they branch on the dialect the store reports.
//!
//! Adding a dialect means adding one variant here and its arms in the
//! renderers; no retrieval operation changes.

pub mod builder;

use crate::model::RdfSubject;

/// A query language family and its capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Pattern-style queries: triples written as `subject predicate object`,
    /// graph scoping via `FROM`, boolean queries via `ASK`.
    Sparql,
    /// Pattern-style with extensions: engines in this family additionally
    /// accept skolemized blank node constants (`<_:id>`) as stable query
    /// tokens, so blank node subjects may appear in query text.
    ExtendedSparql,
    /// Clause-style queries: triples written as `{subject} predicate
    /// {object}`, graph scoping via `FROM CONTEXT`. No boolean query form.
    Serql,
}

impl Dialect {
    /// Render a subject in this dialect's query syntax.
    ///
    /// IRIs render in angle brackets everywhere. Blank nodes render in the
    /// dialect's native `_:id` syntax, except for [`Dialect::ExtendedSparql`]
    /// which uses the skolem constant form `<_:id>`.
    pub fn as_query_string(&self, subject: &RdfSubject) -> String {
        match subject {
            RdfSubject::NamedNode(node) => format!("<{}>", node.as_str()),
            RdfSubject::BlankNode(node) => match self {
                Dialect::ExtendedSparql => format!("<_:{}>", node.as_str()),
                Dialect::Sparql | Dialect::Serql => format!("_:{}", node.as_str()),
            },
        }
    }

    /// Check if this dialect belongs to the pattern-style family
    pub fn is_pattern_style(&self) -> bool {
        matches!(self, Dialect::Sparql | Dialect::ExtendedSparql)
    }

    /// Check if this dialect belongs to the clause-style family
    pub fn is_clause_style(&self) -> bool {
        matches!(self, Dialect::Serql)
    }

    /// Check if blank node subjects are stable query tokens in this dialect.
    ///
    /// Outside the extended family a blank node identifier is parsed as a
    /// fresh variable, so a query for it would match the entire store.
    pub fn supports_bnode_subjects(&self) -> bool {
        matches!(self, Dialect::ExtendedSparql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BlankNode, NamedNode};

    #[test]
    fn test_iri_rendering() {
        let subject: RdfSubject = NamedNode::new("http://example.org/a").unwrap().into();
        for dialect in [Dialect::Sparql, Dialect::ExtendedSparql, Dialect::Serql] {
            assert_eq!(dialect.as_query_string(&subject), "<http://example.org/a>");
        }
    }

    #[test]
    fn test_bnode_rendering() {
        let subject: RdfSubject = BlankNode::new("b42").unwrap().into();
        assert_eq!(Dialect::Sparql.as_query_string(&subject), "_:b42");
        assert_eq!(Dialect::Serql.as_query_string(&subject), "_:b42");
        assert_eq!(Dialect::ExtendedSparql.as_query_string(&subject), "<_:b42>");
    }

    #[test]
    fn test_families() {
        assert!(Dialect::Sparql.is_pattern_style());
        assert!(Dialect::ExtendedSparql.is_pattern_style());
        assert!(Dialect::Serql.is_clause_style());
        assert!(!Dialect::Serql.is_pattern_style());
    }

    #[test]
    fn test_bnode_safety() {
        assert!(Dialect::ExtendedSparql.supports_bnode_subjects());
        assert!(!Dialect::Sparql.supports_bnode_subjects());
        assert!(!Dialect::Serql.supports_bnode_subjects());
    }
}
