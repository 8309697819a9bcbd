//! Data source boundary
//!
//! The [`DataSource`] trait is the contract this layer requires of a
//! triple store: execute select, graph, and boolean queries, and report
//! which [`Dialect`] it speaks. Stores advertise optional capabilities
//! explicitly: named graph scoping via [`DataSource::supports_named_graphs`]
//! and native statement retrieval via [`DataSource::as_statement_source`],
//! both queried once at the boundary instead of scattered type tests.
//!
//! Select results come back as a [`Solutions`] cursor: a lazy sequence of
//! binding sets holding a store-side resource until dropped. Release runs
//! exactly once on every exit path, normal or not.

mod adapter;
mod memory;

pub use adapter::StatementSourceAdapter;
pub use memory::MemoryStore;

use crate::dialect::Dialect;
use crate::model::{Graph, NamedNode, RdfObject, RdfSubject, RdfTerm};
use std::collections::HashMap;
use thiserror::Error;

/// Query execution errors
#[derive(Error, Debug)]
pub enum QueryError {
    /// The store failed to execute or parse a query
    #[error("query execution failed: {0}")]
    Execution(String),

    /// The store does not understand this query form
    #[error("unsupported query form: {0}")]
    Unsupported(String),
}

pub type QueryResult<T> = Result<T, QueryError>;

/// Data source failures, as surfaced by value retrieval
#[derive(Error, Debug)]
pub enum DataSourceError {
    /// A query against the source failed
    #[error(transparent)]
    Query(#[from] QueryError),

    /// Any other failure at the source boundary
    #[error("data source failure: {0}")]
    Other(String),
}

pub type DataSourceResult<T> = Result<T, DataSourceError>;

/// One result row from a select query: variable name to bound term.
#[derive(Debug, Clone, Default)]
pub struct QuerySolution {
    bindings: HashMap<String, RdfTerm>,
}

impl QuerySolution {
    /// Create an empty solution
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a variable to a term
    pub fn bind(&mut self, variable: impl Into<String>, term: RdfTerm) {
        self.bindings.insert(variable.into(), term);
    }

    /// Get the term bound to a variable
    pub fn get(&self, variable: &str) -> Option<&RdfTerm> {
        self.bindings.get(variable)
    }
}

/// A lazy cursor over select query results.
///
/// The cursor may hold a store-side resource. An optional release hook runs
/// exactly once when the cursor is dropped, whether or not it was fully
/// consumed, so every exit path of a consumer releases the cursor.
pub struct Solutions {
    rows: Box<dyn Iterator<Item = QueryResult<QuerySolution>>>,
    release: Option<Box<dyn FnOnce()>>,
}

impl Solutions {
    /// Wrap an iterator of rows with no release hook
    pub fn new<I>(rows: I) -> Self
    where
        I: Iterator<Item = QueryResult<QuerySolution>> + 'static,
    {
        Self {
            rows: Box::new(rows),
            release: None,
        }
    }

    /// Wrap already-materialized rows
    pub fn from_vec(rows: Vec<QuerySolution>) -> Self {
        Self::new(rows.into_iter().map(Ok))
    }

    /// Wrap an iterator of rows with a release hook run once on drop
    pub fn with_release<I, F>(rows: I, release: F) -> Self
    where
        I: Iterator<Item = QueryResult<QuerySolution>> + 'static,
        F: FnOnce() + 'static,
    {
        Self {
            rows: Box::new(rows),
            release: Some(Box::new(release)),
        }
    }
}

impl Iterator for Solutions {
    type Item = QueryResult<QuerySolution>;

    fn next(&mut self) -> Option<Self::Item> {
        self.rows.next()
    }
}

impl Drop for Solutions {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

/// A store that executes queries.
///
/// Implementations must be safe for concurrent query execution if callers
/// are to invoke retrieval operations concurrently; this layer adds no
/// synchronization of its own.
pub trait DataSource {
    /// The query language this store speaks
    fn dialect(&self) -> Dialect;

    /// Execute a select query, returning a row cursor
    fn select(&self, query: &str) -> QueryResult<Solutions>;

    /// Execute a construct-style query, returning the matching statements
    fn graph_query(&self, query: &str) -> QueryResult<Graph>;

    /// Execute a boolean query.
    ///
    /// Only pattern-style stores have a native boolean form; clause-style
    /// stores report [`QueryError::Unsupported`].
    fn ask(&self, query: &str) -> QueryResult<bool>;

    /// Whether this store can scope queries to a named graph
    fn supports_named_graphs(&self) -> bool {
        false
    }

    /// Native statement retrieval, if this store offers it.
    ///
    /// The default is `None`; stores with a triple-level API override this
    /// to expose the fast path.
    fn as_statement_source(&self) -> Option<&dyn StatementSource> {
        None
    }
}

/// Triple-level retrieval: fetch statements by pattern.
///
/// `None` components are wildcards. The result is never partial; a failure
/// is a failure.
pub trait StatementSource: DataSource {
    /// Fetch every statement matching the pattern
    fn statements(
        &self,
        subject: Option<&RdfSubject>,
        predicate: Option<&NamedNode>,
        object: Option<&RdfObject>,
        graph: Option<&NamedNode>,
    ) -> QueryResult<Graph>;
}
