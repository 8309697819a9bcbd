//! Object identity
//!
//! Retrieval works on anything that can say what its subject is. The
//! [`RdfIdentity`] trait is that seam: an object reports its resource
//! reference (or that it has none yet) and, optionally, the named graph
//! its statements live in. The retrieval layer only reads identities, it
//! never assigns them.

use crate::model::{NamedNode, RdfSubject};

/// An object with an (optional) RDF identity.
pub trait RdfIdentity {
    /// The subject identifying this object, if it has one.
    ///
    /// `None` means the object has no identity yet; retrieval treats that
    /// as "nothing to look up", not as an error.
    fn rdf_id(&self) -> Option<RdfSubject>;

    /// The named graph this object's statements are scoped to, if any.
    ///
    /// Only honored against stores that support named graphs.
    fn named_graph(&self) -> Option<NamedNode> {
        None
    }
}

/// A plain identity holder for callers that track subject and graph
/// explicitly.
#[derive(Debug, Clone)]
pub struct EntityRef {
    id: Option<RdfSubject>,
    graph: Option<NamedNode>,
}

impl EntityRef {
    /// An entity identified by the given subject
    pub fn new(id: RdfSubject) -> Self {
        Self {
            id: Some(id),
            graph: None,
        }
    }

    /// An entity with no identity yet
    pub fn unidentified() -> Self {
        Self {
            id: None,
            graph: None,
        }
    }

    /// Scope this entity's statements to a named graph
    pub fn with_graph(mut self, graph: NamedNode) -> Self {
        self.graph = Some(graph);
        self
    }
}

impl RdfIdentity for EntityRef {
    fn rdf_id(&self) -> Option<RdfSubject> {
        self.id.clone()
    }

    fn named_graph(&self) -> Option<NamedNode> {
        self.graph.clone()
    }
}
