//! Tessera
//!
//! A dialect-aware triple-retrieval layer for mapping objects onto
//! heterogeneous RDF stores. Callers ask object-oriented questions (what
//! are this entity's statements, does it exist, what values does this
//! property have) without knowing whether the store underneath exposes
//! triple-level access or only a query language endpoint, or which query
//! language that endpoint speaks.
//!
//! # Architecture
//!
//! - [`model`]: RDF terms, statements, and the [`model::Graph`] statement
//!   set, wrapping the oxrdf primitives
//! - [`dialect`]: query language families and the query text builders
//! - [`source`]: the data source boundary with query execution traits,
//!   capability flags, row cursors, and the statement-source adapter
//! - [`entity`]: the identity seam between objects and subjects
//! - [`retrieve`]: the retrieval operations themselves
//!
//! # Requirements Implemented
//!
//! - ✅ REQ-DIALECT-001: Pattern-style and clause-style query rendering
//! - ✅ REQ-DIALECT-002: Blank node subjects via skolemized constants
//! - ✅ REQ-SOURCE-001: Explicit capability flags at the store boundary
//! - ✅ REQ-SOURCE-002: Statement retrieval over query-only stores
//! - ✅ REQ-SOURCE-003: Row cursors released on every exit path
//! - ✅ REQ-RETRIEVE-001: Describe, exists, value and type lookup
//! - ✅ REQ-RETRIEVE-002: Named graph scoping behind a capability check
//!
//! # Example
//!
//! ```rust
//! use tessera::model::{Literal, NamedNode, Statement};
//! use tessera::source::MemoryStore;
//! use tessera::{retrieve, Dialect, EntityRef};
//!
//! let mut store = MemoryStore::new(Dialect::Sparql);
//! let alice = NamedNode::new("http://example.org/alice").unwrap();
//! store.insert(Statement::new(
//!     alice.clone().into(),
//!     NamedNode::new("http://xmlns.com/foaf/0.1/name").unwrap(),
//!     Literal::new_simple_literal("Alice").into(),
//! ));
//!
//! let entity = EntityRef::new(alice.into());
//! let graph = retrieve::describe(&store, &entity).unwrap();
//! assert_eq!(graph.len(), 1);
//! assert!(retrieve::exists(&store, &entity).unwrap());
//! ```

pub mod dialect;
pub mod entity;
pub mod model;
pub mod retrieve;
pub mod source;
pub mod vocab;

pub use dialect::Dialect;
pub use entity::{EntityRef, RdfIdentity};
pub use model::{Graph, Statement};
pub use source::{
    DataSource, DataSourceError, QueryError, StatementSource, StatementSourceAdapter,
};
