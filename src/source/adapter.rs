//! Statement retrieval over query-only stores
//!
//! [`StatementSourceAdapter`] gives any [`DataSource`] the
//! [`StatementSource`] capability by translating statement patterns into
//! dialect-correct queries. This is the one seam where "native fast path"
//! versus "query fallback" is decided: wrapping a store that already
//! retrieves statements natively delegates straight through, so callers
//! never re-make that choice.

use super::{DataSource, QueryResult, Solutions, StatementSource};
use crate::dialect::{builder, Dialect};
use crate::model::{Graph, NamedNode, RdfObject, RdfSubject};

/// Adapter implementing [`StatementSource`] for any [`DataSource`].
///
/// A subject-only pattern becomes a describe query; any other pattern
/// becomes a general construct with wildcards as variables. Either way the
/// result is the full matching statement set or an error, never a partial
/// set.
pub struct StatementSourceAdapter<S> {
    inner: S,
}

impl<S: DataSource> StatementSourceAdapter<S> {
    /// Wrap a data source
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    /// Get the wrapped source
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Unwrap the adapter
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: DataSource> DataSource for StatementSourceAdapter<S> {
    fn dialect(&self) -> Dialect {
        self.inner.dialect()
    }

    fn select(&self, query: &str) -> QueryResult<Solutions> {
        self.inner.select(query)
    }

    fn graph_query(&self, query: &str) -> QueryResult<Graph> {
        self.inner.graph_query(query)
    }

    fn ask(&self, query: &str) -> QueryResult<bool> {
        self.inner.ask(query)
    }

    fn supports_named_graphs(&self) -> bool {
        self.inner.supports_named_graphs()
    }

    fn as_statement_source(&self) -> Option<&dyn StatementSource> {
        Some(self)
    }
}

impl<S: DataSource> StatementSource for StatementSourceAdapter<S> {
    fn statements(
        &self,
        subject: Option<&RdfSubject>,
        predicate: Option<&NamedNode>,
        object: Option<&RdfObject>,
        graph: Option<&NamedNode>,
    ) -> QueryResult<Graph> {
        // native capability wins; the adapter only fills the gap
        if let Some(native) = self.inner.as_statement_source() {
            return native.statements(subject, predicate, object, graph);
        }

        let dialect = self.inner.dialect();
        let query = match (subject, predicate, object) {
            (Some(s), None, None) => builder::describe_query(dialect, s, graph),
            _ => builder::statements_query(dialect, subject, predicate, object, graph),
        };
        self.inner.graph_query(&query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Statement;
    use crate::source::{MemoryStore, QueryError};

    fn named(iri: &str) -> NamedNode {
        NamedNode::new(iri).unwrap()
    }

    fn store() -> MemoryStore {
        let mut store = MemoryStore::new(Dialect::Sparql);
        store.insert(Statement::new(
            named("http://ex/1").into(),
            named("http://ex/p"),
            named("http://ex/o").into(),
        ));
        store.insert(Statement::new(
            named("http://ex/2").into(),
            named("http://ex/p"),
            named("http://ex/o").into(),
        ));
        store
    }

    #[test]
    fn test_query_fallback_matches_native() {
        let native = store();
        let adapted = StatementSourceAdapter::new(store().query_only());

        let subject: RdfSubject = named("http://ex/1").into();
        let direct = native.statements(Some(&subject), None, None, None).unwrap();
        let translated = adapted.statements(Some(&subject), None, None, None).unwrap();
        assert_eq!(direct, translated);
        assert_eq!(translated.len(), 1);
    }

    #[test]
    fn test_bound_predicate_pattern() {
        let adapted = StatementSourceAdapter::new(store().query_only());
        let predicate = named("http://ex/p");
        let graph = adapted
            .statements(None, Some(&predicate), None, None)
            .unwrap();
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn test_native_source_bypasses_query_path() {
        // a source whose query surface always fails but whose native
        // statement retrieval works; the adapter must use the latter
        struct NativeOnly(MemoryStore);

        impl DataSource for NativeOnly {
            fn dialect(&self) -> Dialect {
                Dialect::Sparql
            }
            fn select(&self, query: &str) -> QueryResult<Solutions> {
                Err(QueryError::Execution(query.to_string()))
            }
            fn graph_query(&self, query: &str) -> QueryResult<Graph> {
                Err(QueryError::Execution(query.to_string()))
            }
            fn ask(&self, query: &str) -> QueryResult<bool> {
                Err(QueryError::Execution(query.to_string()))
            }
            fn as_statement_source(&self) -> Option<&dyn StatementSource> {
                Some(self)
            }
        }

        impl StatementSource for NativeOnly {
            fn statements(
                &self,
                subject: Option<&RdfSubject>,
                predicate: Option<&NamedNode>,
                object: Option<&RdfObject>,
                graph: Option<&NamedNode>,
            ) -> QueryResult<Graph> {
                self.0.statements(subject, predicate, object, graph)
            }
        }

        let adapted = StatementSourceAdapter::new(NativeOnly(store()));
        let subject: RdfSubject = named("http://ex/1").into();
        let graph = adapted.statements(Some(&subject), None, None, None).unwrap();
        assert_eq!(graph.len(), 1);
    }
}
