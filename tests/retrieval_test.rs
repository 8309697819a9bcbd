use std::cell::RefCell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tessera::dialect::Dialect;
use tessera::model::{BlankNode, Literal, NamedNode, RdfSubject, Statement};
use tessera::source::{
    DataSource, MemoryStore, QueryError, QueryResult, QuerySolution, Solutions,
    StatementSourceAdapter,
};
use tessera::{retrieve, vocab, EntityRef};

fn named(iri: &str) -> NamedNode {
    NamedNode::new(iri).unwrap()
}

/// The two-types fixture: <http://ex/1> is a Person and an Agent.
fn typed_store(dialect: Dialect) -> MemoryStore {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let mut store = MemoryStore::new(dialect);
    store.insert(Statement::new(
        named("http://ex/1").into(),
        vocab::rdf_type(),
        named("http://ex/Person").into(),
    ));
    store.insert(Statement::new(
        named("http://ex/1").into(),
        vocab::rdf_type(),
        named("http://ex/Agent").into(),
    ));
    store
}

/// Wraps a store, hiding its native statement capability and recording
/// every query it executes.
struct RecordingSource {
    inner: MemoryStore,
    queries: RefCell<Vec<String>>,
}

impl RecordingSource {
    fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            queries: RefCell::new(Vec::new()),
        }
    }

    fn last_query(&self) -> String {
        self.queries.borrow().last().cloned().unwrap()
    }
}

impl DataSource for RecordingSource {
    fn dialect(&self) -> Dialect {
        self.inner.dialect()
    }

    fn select(&self, query: &str) -> QueryResult<Solutions> {
        self.queries.borrow_mut().push(query.to_string());
        self.inner.select(query)
    }

    fn graph_query(&self, query: &str) -> QueryResult<tessera::Graph> {
        self.queries.borrow_mut().push(query.to_string());
        self.inner.graph_query(query)
    }

    fn ask(&self, query: &str) -> QueryResult<bool> {
        self.queries.borrow_mut().push(query.to_string());
        self.inner.ask(query)
    }

    fn supports_named_graphs(&self) -> bool {
        self.inner.supports_named_graphs()
    }
}

/// A source whose every query fails.
struct FailingSource;

impl DataSource for FailingSource {
    fn dialect(&self) -> Dialect {
        Dialect::Sparql
    }

    fn select(&self, _query: &str) -> QueryResult<Solutions> {
        Err(QueryError::Execution("store unreachable".to_string()))
    }

    fn graph_query(&self, _query: &str) -> QueryResult<tessera::Graph> {
        Err(QueryError::Execution("store unreachable".to_string()))
    }

    fn ask(&self, _query: &str) -> QueryResult<bool> {
        Err(QueryError::Execution("store unreachable".to_string()))
    }
}

#[test]
fn test_describe_without_identity_is_empty() {
    let store = typed_store(Dialect::Sparql);
    let entity = EntityRef::unidentified();
    let graph = retrieve::describe(&store, &entity).unwrap();
    assert!(graph.is_empty());

    // holds for any source: the identity gate runs before any query
    let graph = retrieve::describe(&FailingSource, &entity).unwrap();
    assert!(graph.is_empty());
}

#[test]
fn test_exists_without_identity_is_false() {
    let store = typed_store(Dialect::Sparql);
    let entity = EntityRef::unidentified();
    assert!(!retrieve::exists(&store, &entity).unwrap());
    assert!(!retrieve::exists(&FailingSource, &entity).unwrap());
}

#[test]
fn test_blank_node_describe_short_circuits() {
    let bnode = BlankNode::new("b1").unwrap();
    let entity = EntityRef::new(bnode.clone().into());

    for dialect in [Dialect::Sparql, Dialect::Serql] {
        let mut store = MemoryStore::new(dialect);
        store.insert(Statement::new(
            bnode.clone().into(),
            named("http://ex/p"),
            named("http://ex/o").into(),
        ));
        // the store holds a matching statement, but the identifier is not
        // a stable query token in this dialect
        let graph = retrieve::describe(&store, &entity).unwrap();
        assert!(graph.is_empty());
    }
}

#[test]
fn test_blank_node_describe_in_extended_dialect() {
    let bnode = BlankNode::new("b1").unwrap();
    let entity = EntityRef::new(bnode.clone().into());

    let mut store = MemoryStore::new(Dialect::ExtendedSparql);
    store.insert(Statement::new(
        bnode.clone().into(),
        named("http://ex/p"),
        named("http://ex/o").into(),
    ));

    // native path
    let graph = retrieve::describe(&store, &entity).unwrap();
    assert_eq!(graph.len(), 1);

    // query path, through the skolemized constant form
    let graph = retrieve::describe(&store.clone().query_only(), &entity).unwrap();
    assert_eq!(graph.len(), 1);
}

#[test]
fn test_blank_node_exists_is_not_short_circuited() {
    // existence checks return rows or a boolean, never a match-everything
    // statement set, so blank node subjects are allowed in every dialect
    let bnode = BlankNode::new("b1").unwrap();
    let entity = EntityRef::new(bnode.clone().into());

    for dialect in [Dialect::Sparql, Dialect::Serql] {
        let mut store = MemoryStore::new(dialect);
        store.insert(Statement::new(
            bnode.clone().into(),
            named("http://ex/p"),
            named("http://ex/o").into(),
        ));
        assert!(retrieve::exists(&store, &entity).unwrap());
    }
}

#[test]
fn test_exists_known_and_unknown_subject() {
    let store = typed_store(Dialect::Sparql);

    let known = EntityRef::new(named("http://ex/1").into());
    assert!(retrieve::exists(&store, &known).unwrap());

    let unknown = EntityRef::new(named("http://ex/99").into());
    assert!(!retrieve::exists(&store, &unknown).unwrap());
}

#[test]
fn test_get_types_returns_type_set() {
    let store = typed_store(Dialect::Sparql);
    let subject: RdfSubject = named("http://ex/1").into();

    let types = retrieve::get_types(&store, &subject);
    assert_eq!(types.len(), 2);
    assert!(types.contains(&named("http://ex/Person").into()));
    assert!(types.contains(&named("http://ex/Agent").into()));
}

#[test]
fn test_get_values_deduplicates() {
    let mut store = MemoryStore::new(Dialect::Sparql);
    let subject: RdfSubject = named("http://ex/1").into();
    let predicate = named("http://ex/p");

    // the same value asserted in the default graph and in a named graph
    store.insert(Statement::new(
        subject.clone(),
        predicate.clone(),
        Literal::new_simple_literal("dup").into(),
    ));
    store.insert(
        Statement::new(
            subject.clone(),
            predicate.clone(),
            Literal::new_simple_literal("dup").into(),
        )
        .in_graph(named("http://ex/g")),
    );

    let values = retrieve::get_values(&store, &subject, &predicate).unwrap();
    assert_eq!(values.len(), 1);
}

#[test]
fn test_get_values_is_idempotent() {
    let store = typed_store(Dialect::Sparql);
    let subject: RdfSubject = named("http://ex/1").into();
    let predicate = vocab::rdf_type();

    let first = retrieve::get_values(&store, &subject, &predicate).unwrap();
    let second = retrieve::get_values(&store, &subject, &predicate).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
}

#[test]
fn test_get_value_none_iff_no_values() {
    let store = typed_store(Dialect::Sparql);
    let subject: RdfSubject = named("http://ex/1").into();

    let absent = named("http://ex/nothing");
    assert!(retrieve::get_values(&store, &subject, &absent)
        .unwrap()
        .is_empty());
    assert!(retrieve::get_value(&store, &subject, &absent)
        .unwrap()
        .is_none());

    let predicate = vocab::rdf_type();
    let values = retrieve::get_values(&store, &subject, &predicate).unwrap();
    let value = retrieve::get_value(&store, &subject, &predicate)
        .unwrap()
        .unwrap();
    assert!(values.contains(&value));
}

#[test]
fn test_adapter_describe_matches_native_describe() {
    let entity = EntityRef::new(named("http://ex/1").into());

    // 1. describe against the store's native statement retrieval
    let native = typed_store(Dialect::Sparql);
    let direct = retrieve::describe(&native, &entity).unwrap();

    // 2. describe against the same content behind a query-only endpoint,
    //    wrapped back into a statement source by the adapter
    let adapted = StatementSourceAdapter::new(typed_store(Dialect::Sparql).query_only());
    let translated = retrieve::describe(&adapted, &entity).unwrap();

    assert_eq!(direct, translated);
    assert_eq!(direct.len(), 2);
}

#[test]
fn test_named_graph_clause_only_with_capability_and_graph() {
    let g = named("http://ex/g");
    let scoped_entity = EntityRef::new(named("http://ex/1").into()).with_graph(g.clone());
    let plain_entity = EntityRef::new(named("http://ex/1").into());

    // capability and entity graph present: the clause appears
    let source = RecordingSource::new(typed_store(Dialect::Sparql).with_named_graph_support());
    retrieve::describe(&source, &scoped_entity).unwrap();
    assert!(source.last_query().contains("FROM <http://ex/g>"));

    // no capability: no clause, even though the entity names a graph
    let source = RecordingSource::new(typed_store(Dialect::Sparql));
    retrieve::describe(&source, &scoped_entity).unwrap();
    assert!(!source.last_query().contains("FROM"));

    // capability but no entity graph: no clause
    let source = RecordingSource::new(typed_store(Dialect::Sparql).with_named_graph_support());
    retrieve::describe(&source, &plain_entity).unwrap();
    assert!(!source.last_query().contains("FROM"));
}

#[test]
fn test_named_graph_scope_filters_statements() {
    let g = named("http://ex/g");
    let mut store = MemoryStore::new(Dialect::Sparql).with_named_graph_support();
    store.insert(
        Statement::new(
            named("http://ex/1").into(),
            named("http://ex/p"),
            named("http://ex/in").into(),
        )
        .in_graph(g.clone()),
    );
    store.insert(Statement::new(
        named("http://ex/1").into(),
        named("http://ex/p"),
        named("http://ex/out").into(),
    ));

    let entity = EntityRef::new(named("http://ex/1").into()).with_graph(g);
    let graph = retrieve::describe(&store, &entity).unwrap();
    assert_eq!(graph.len(), 1);
}

#[test]
fn test_clause_style_existence_probe() {
    let store = typed_store(Dialect::Serql);
    let source = RecordingSource::new(store.clone());

    // 1. unknown subject: probe runs, no rows, cursor released
    let unknown = EntityRef::new(named("http://ex/99").into());
    assert!(!retrieve::exists(&source, &unknown).unwrap());
    assert_eq!(
        source.last_query(),
        "select distinct s from {s} p {o} where s = <http://ex/99> limit 1"
    );
    assert_eq!(store.open_cursors(), 0);

    // 2. known subject: at least one row means it exists
    let known = EntityRef::new(named("http://ex/1").into());
    assert!(retrieve::exists(&source, &known).unwrap());
    assert_eq!(store.open_cursors(), 0);
}

#[test]
fn test_clause_style_probe_with_graph_scope() {
    let g = named("http://ex/g");
    let mut inner = MemoryStore::new(Dialect::Serql).with_named_graph_support();
    inner.insert(
        Statement::new(
            named("http://ex/1").into(),
            named("http://ex/p"),
            named("http://ex/o").into(),
        )
        .in_graph(g.clone()),
    );
    let source = RecordingSource::new(inner);

    let entity = EntityRef::new(named("http://ex/1").into()).with_graph(g);
    assert!(retrieve::exists(&source, &entity).unwrap());
    assert!(source
        .last_query()
        .contains("from context <http://ex/g>"));
}

#[test]
fn test_describe_surfaces_query_failure() {
    let entity = EntityRef::new(named("http://ex/1").into());
    assert!(retrieve::describe(&FailingSource, &entity).is_err());
}

#[test]
fn test_get_values_surfaces_failure_but_get_types_degrades() {
    let subject: RdfSubject = named("http://ex/1").into();

    let result = retrieve::get_values(&FailingSource, &subject, &vocab::rdf_type());
    assert!(result.is_err());

    // type lookup is advisory: same failure, empty answer
    let types = retrieve::get_types(&FailingSource, &subject);
    assert!(types.is_empty());
}

#[test]
fn test_cursor_released_when_a_row_fails() {
    struct ErrorRowSource {
        released: Arc<AtomicBool>,
    }

    impl DataSource for ErrorRowSource {
        fn dialect(&self) -> Dialect {
            Dialect::Sparql
        }

        fn select(&self, _query: &str) -> QueryResult<Solutions> {
            let mut row = QuerySolution::new();
            row.bind("obj", named("http://ex/a").into());
            let rows = vec![
                Ok(row),
                Err(QueryError::Execution("cursor failed".to_string())),
            ];
            let released = Arc::clone(&self.released);
            Ok(Solutions::with_release(rows.into_iter(), move || {
                released.store(true, Ordering::SeqCst);
            }))
        }

        fn graph_query(&self, query: &str) -> QueryResult<tessera::Graph> {
            Err(QueryError::Unsupported(query.to_string()))
        }

        fn ask(&self, query: &str) -> QueryResult<bool> {
            Err(QueryError::Unsupported(query.to_string()))
        }
    }

    let released = Arc::new(AtomicBool::new(false));
    let source = ErrorRowSource {
        released: Arc::clone(&released),
    };

    let subject: RdfSubject = named("http://ex/1").into();
    let result = retrieve::get_values(&source, &subject, &named("http://ex/p"));
    assert!(result.is_err());
    assert!(released.load(Ordering::SeqCst));
}
