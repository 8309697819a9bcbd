//! In-memory reference store
//!
//! [`MemoryStore`] keeps statements in a duplicate-free set and serves both
//! capabilities of the source boundary: native statement retrieval by
//! pattern, and query execution for the query shapes this crate's builders
//! emit (describe, ask, existence probe, value select) in either dialect
//! family. It recognizes those shapes by extracting the bound terms back
//! out of the query text; anything else is reported as unsupported.
//!
//! The store counts open row cursors so tests can assert that every code
//! path releases its cursor.

use super::{
    DataSource, QueryError, QueryResult, QuerySolution, Solutions, StatementSource,
};
use crate::dialect::Dialect;
use crate::model::{
    BlankNode, Graph, Literal, NamedNode, RdfObject, RdfSubject, RdfTerm, Statement,
};
use indexmap::IndexSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// In-memory statement store.
///
/// Named graph membership lives on each [`Statement`]; unscoped queries
/// match across all graphs, scoped queries match only statements in the
/// named graph.
#[derive(Clone)]
pub struct MemoryStore {
    dialect: Dialect,
    named_graphs: bool,
    native_statements: bool,
    statements: IndexSet<Statement>,
    open_cursors: Arc<AtomicUsize>,
}

impl MemoryStore {
    /// Create an empty store speaking the given dialect
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            named_graphs: false,
            native_statements: true,
            statements: IndexSet::new(),
            open_cursors: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Enable the named graph scoping capability
    pub fn with_named_graph_support(mut self) -> Self {
        self.named_graphs = true;
        self
    }

    /// Hide the native statement retrieval capability.
    ///
    /// The store then behaves like a query-endpoint-only source, which is
    /// what the statement-source adapter exists for.
    pub fn query_only(mut self) -> Self {
        self.native_statements = false;
        self
    }

    /// Insert a statement, collapsing duplicates.
    ///
    /// Returns `true` if the statement was not already present.
    pub fn insert(&mut self, statement: Statement) -> bool {
        self.statements.insert(statement)
    }

    /// Number of statements in the store
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Number of row cursors currently open against this store
    pub fn open_cursors(&self) -> usize {
        self.open_cursors.load(Ordering::SeqCst)
    }

    fn matching(&self, pattern: &Pattern) -> Vec<&Statement> {
        self.statements
            .iter()
            .filter(|statement| pattern.matches(statement))
            .collect()
    }

    fn open_rows(&self, rows: Vec<QuerySolution>) -> Solutions {
        let counter = Arc::clone(&self.open_cursors);
        counter.fetch_add(1, Ordering::SeqCst);
        Solutions::with_release(rows.into_iter().map(Ok), move || {
            counter.fetch_sub(1, Ordering::SeqCst);
        })
    }
}

impl DataSource for MemoryStore {
    fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn select(&self, query: &str) -> QueryResult<Solutions> {
        let select = parse_select(query)?;
        let matches = self.matching(&select.pattern);

        let rows = match select.variable {
            SelectVariable::Subject => {
                // distinct subjects, as the probe form requests
                let mut seen: IndexSet<RdfTerm> = IndexSet::new();
                for statement in &matches {
                    seen.insert(statement.subject.clone().into());
                }
                seen.into_iter()
                    .map(|term| {
                        let mut row = QuerySolution::new();
                        row.bind("s", term);
                        row
                    })
                    .collect::<Vec<_>>()
            }
            SelectVariable::Object => matches
                .iter()
                .map(|statement| {
                    let mut row = QuerySolution::new();
                    row.bind("obj", statement.object.clone().into());
                    row
                })
                .collect(),
        };

        let rows = match select.limit {
            Some(limit) => rows.into_iter().take(limit).collect(),
            None => rows,
        };
        Ok(self.open_rows(rows))
    }

    fn graph_query(&self, query: &str) -> QueryResult<Graph> {
        let pattern = parse_construct(query)?;
        Ok(self
            .matching(&pattern)
            .into_iter()
            .cloned()
            .collect())
    }

    fn ask(&self, query: &str) -> QueryResult<bool> {
        let Some(rest) = query.strip_prefix("ASK") else {
            return Err(QueryError::Unsupported(query.to_string()));
        };
        let graph = graph_token(rest, "FROM <")?;
        let body = between(rest, "{", "}")
            .ok_or_else(|| QueryError::Unsupported(query.to_string()))?;
        let mut pattern = parse_triple_body(body)
            .ok_or_else(|| QueryError::Unsupported(query.to_string()))?;
        pattern.graph = graph;
        Ok(!self.matching(&pattern).is_empty())
    }

    fn supports_named_graphs(&self) -> bool {
        self.named_graphs
    }

    fn as_statement_source(&self) -> Option<&dyn StatementSource> {
        if self.native_statements {
            Some(self)
        } else {
            None
        }
    }
}

impl StatementSource for MemoryStore {
    fn statements(
        &self,
        subject: Option<&RdfSubject>,
        predicate: Option<&NamedNode>,
        object: Option<&RdfObject>,
        graph: Option<&NamedNode>,
    ) -> QueryResult<Graph> {
        let pattern = Pattern {
            subject: subject.cloned(),
            predicate: predicate.cloned(),
            object: object.cloned(),
            graph: graph.cloned(),
        };
        Ok(self.matching(&pattern).into_iter().cloned().collect())
    }
}

/// A statement pattern recovered from query text
#[derive(Debug, Default)]
struct Pattern {
    subject: Option<RdfSubject>,
    predicate: Option<NamedNode>,
    object: Option<RdfObject>,
    graph: Option<NamedNode>,
}

impl Pattern {
    fn matches(&self, statement: &Statement) -> bool {
        self.subject
            .as_ref()
            .map_or(true, |s| s == &statement.subject)
            && self
                .predicate
                .as_ref()
                .map_or(true, |p| p == &statement.predicate)
            && self.object.as_ref().map_or(true, |o| o == &statement.object)
            && self
                .graph
                .as_ref()
                .map_or(true, |g| statement.graph.as_ref() == Some(g))
    }
}

enum SelectVariable {
    Subject,
    Object,
}

struct Select {
    pattern: Pattern,
    variable: SelectVariable,
    limit: Option<usize>,
}

fn parse_select(query: &str) -> QueryResult<Select> {
    let unsupported = || QueryError::Unsupported(query.to_string());

    if query.starts_with("SELECT ?obj") {
        let body = between(query, "WHERE {", "}").ok_or_else(unsupported)?;
        let pattern = parse_triple_body(body).ok_or_else(unsupported)?;
        return Ok(Select {
            pattern,
            variable: SelectVariable::Object,
            limit: None,
        });
    }

    if query.starts_with("select distinct s") {
        let graph = graph_token(query, "context <")?;
        let token = between(query, "where s = ", " limit").ok_or_else(unsupported)?;
        let subject = parse_subject(token.trim()).ok_or_else(unsupported)?;
        return Ok(Select {
            pattern: Pattern {
                subject: Some(subject),
                graph,
                ..Pattern::default()
            },
            variable: SelectVariable::Subject,
            limit: Some(1),
        });
    }

    if query.starts_with("select obj from {") {
        let subject_token = between(query, "from {", "}").ok_or_else(unsupported)?;
        let subject = parse_subject(subject_token).ok_or_else(unsupported)?;
        let predicate_iri = between(query, "} <", ">").ok_or_else(unsupported)?;
        let predicate = NamedNode::new(predicate_iri).map_err(|_| unsupported())?;
        return Ok(Select {
            pattern: Pattern {
                subject: Some(subject),
                predicate: Some(predicate),
                ..Pattern::default()
            },
            variable: SelectVariable::Object,
            limit: None,
        });
    }

    Err(unsupported())
}

fn parse_construct(query: &str) -> QueryResult<Pattern> {
    let unsupported = || QueryError::Unsupported(query.to_string());

    if query.starts_with("CONSTRUCT") {
        let graph = graph_token(query, "FROM <")?;
        let body = between(query, "WHERE {", "}").ok_or_else(unsupported)?;
        let mut pattern = parse_triple_body(body).ok_or_else(unsupported)?;
        pattern.graph = graph;
        return Ok(pattern);
    }

    if query.starts_with("construct") {
        let graph = graph_token(query, "context <")?;
        let mut pattern = Pattern {
            graph,
            ..Pattern::default()
        };
        if let Some((_, conditions)) = query.split_once(" where ") {
            for condition in conditions.split(" and ") {
                let condition = condition.trim();
                if let Some(token) = condition.strip_prefix("s = ") {
                    pattern.subject = Some(parse_subject(token).ok_or_else(unsupported)?);
                } else if let Some(token) = condition.strip_prefix("p = ") {
                    let iri = unwrap_angle(token).ok_or_else(unsupported)?;
                    pattern.predicate =
                        Some(NamedNode::new(iri).map_err(|_| unsupported())?);
                } else if let Some(token) = condition.strip_prefix("o = ") {
                    pattern.object = Some(parse_object(token).ok_or_else(unsupported)?);
                } else {
                    return Err(unsupported());
                }
            }
        }
        return Ok(pattern);
    }

    Err(unsupported())
}

/// Parse the `s p o` body of a pattern-style group, `?vars` as wildcards
fn parse_triple_body(body: &str) -> Option<Pattern> {
    let tokens: Vec<&str> = body.split_whitespace().filter(|t| *t != ".").collect();
    if tokens.len() != 3 {
        return None;
    }
    let mut pattern = Pattern::default();
    if !tokens[0].starts_with('?') {
        pattern.subject = Some(parse_subject(tokens[0])?);
    }
    if !tokens[1].starts_with('?') {
        pattern.predicate = Some(NamedNode::new(unwrap_angle(tokens[1])?).ok()?);
    }
    if !tokens[2].starts_with('?') {
        pattern.object = Some(parse_object(tokens[2])?);
    }
    Some(pattern)
}

fn parse_subject(token: &str) -> Option<RdfSubject> {
    if let Some(id) = token.strip_prefix("<_:").and_then(|t| t.strip_suffix('>')) {
        return BlankNode::new(id).ok().map(RdfSubject::from);
    }
    if let Some(iri) = unwrap_angle(token) {
        return NamedNode::new(iri).ok().map(RdfSubject::from);
    }
    token
        .strip_prefix("_:")
        .and_then(|id| BlankNode::new(id).ok())
        .map(RdfSubject::from)
}

fn parse_object(token: &str) -> Option<RdfObject> {
    if let Some(rest) = token.strip_prefix('"') {
        let close = rest.find('"')?;
        let value = &rest[..close];
        let suffix = &rest[close + 1..];
        if suffix.is_empty() {
            return Some(Literal::new_simple_literal(value).into());
        }
        if let Some(lang) = suffix.strip_prefix('@') {
            return Literal::new_language_tagged_literal(value, lang)
                .ok()
                .map(RdfObject::from);
        }
        if let Some(datatype) = suffix.strip_prefix("^^<").and_then(|t| t.strip_suffix('>')) {
            return NamedNode::new(datatype)
                .ok()
                .map(|d| Literal::new_typed_literal(value, d).into());
        }
        return None;
    }
    parse_subject(token).map(RdfObject::from)
}

/// Extract the graph IRI following `marker`, if the clause is present
fn graph_token(query: &str, marker: &str) -> QueryResult<Option<NamedNode>> {
    match between(query, marker, ">") {
        Some(iri) => NamedNode::new(iri)
            .map(Some)
            .map_err(|_| QueryError::Unsupported(query.to_string())),
        None => Ok(None),
    }
}

fn unwrap_angle(token: &str) -> Option<&str> {
    token.strip_prefix('<').and_then(|t| t.strip_suffix('>'))
}

fn between<'a>(text: &'a str, start: &str, end: &str) -> Option<&'a str> {
    let from = text.find(start)? + start.len();
    let to = text[from..].find(end)? + from;
    Some(&text[from..to])
}
