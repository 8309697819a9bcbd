//! RDF data model
//!
//! Term and statement types shared by every component of the retrieval
//! layer: named nodes, blank nodes, literals, the subject/object/term
//! enums, statements with optional named-graph context, and the [`Graph`]
//! statement set.

mod graph;
mod types;

pub use graph::Graph;
pub use types::{
    BlankNode, Literal, ModelError, ModelResult, NamedNode, RdfObject, RdfSubject, RdfTerm,
    Statement,
};
