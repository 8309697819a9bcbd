//! RDF vocabulary constants

use crate::model::NamedNode;

/// The RDF namespace
pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

/// `rdf:type`
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

/// The `rdf:type` predicate as a named node
pub fn rdf_type() -> NamedNode {
    NamedNode::new_unchecked(RDF_TYPE)
}
