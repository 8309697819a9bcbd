//! Retrieval operations
//!
//! The object-level questions this layer answers: what are an entity's
//! statements ([`describe`]), does it exist ([`exists`]), what values does
//! a property have ([`get_values`], [`get_value`]), what are its types
//! ([`get_types`]). Each operation resolves the entity's identity, decides
//! whether named graph scoping applies, decides blank node safety, then
//! either uses the store's native statement retrieval or builds and
//! executes dialect-correct query text.
//!
//! Every operation is a synchronous call issuing at most one query, fully
//! consuming its result before returning. Failures surface to the caller,
//! with one exception: [`get_types`] degrades to an empty result, since
//! type metadata is advisory.

use crate::dialect::builder;
use crate::entity::RdfIdentity;
use crate::model::{Graph, NamedNode, RdfSubject, RdfTerm};
use crate::source::{DataSource, DataSourceResult, QueryResult, StatementSource};
use crate::vocab;
use indexmap::IndexSet;
use tracing::{debug, error};

/// Fetch every statement about an entity.
///
/// An entity with no identity yields an empty graph. A blank node subject
/// also yields an empty graph unless the store's dialect can express blank
/// nodes as stable query tokens: in the other dialects the identifier
/// would be parsed as a variable and match the entire store.
///
/// Named graph scoping applies only when the store supports it and the
/// entity names a graph. Stores with native statement retrieval are asked
/// directly; anything else gets a describe query.
pub fn describe<S, E>(source: &S, entity: &E) -> QueryResult<Graph>
where
    S: DataSource + ?Sized,
    E: RdfIdentity + ?Sized,
{
    let Some(subject) = entity.rdf_id() else {
        return Ok(Graph::new());
    };
    let graph = named_graph_scope(source, entity);
    let dialect = source.dialect();

    if subject.is_blank_node() && !dialect.supports_bnode_subjects() {
        debug!("describe {}: blank node not expressible in dialect", subject);
        return Ok(Graph::new());
    }

    let result = match source.as_statement_source() {
        Some(native) => native.statements(Some(&subject), None, None, graph.as_ref())?,
        None => {
            let query = builder::describe_query(dialect, &subject, graph.as_ref());
            source.graph_query(&query)?
        }
    };

    debug!("describe {}: {} statements", subject, result.len());
    Ok(result)
}

/// Check whether any statement has the entity's subject as subject.
///
/// An entity with no identity does not exist. Pattern-style stores are
/// asked with a boolean query; clause-style stores get a limit-1 probe
/// whose cursor is released before returning, and existence is the probe
/// returning at least one row. Blank node subjects are not short-circuited
/// here: an existence check returns rows or a boolean, never a
/// match-everything statement set.
pub fn exists<S, E>(source: &S, entity: &E) -> QueryResult<bool>
where
    S: DataSource + ?Sized,
    E: RdfIdentity + ?Sized,
{
    let Some(subject) = entity.rdf_id() else {
        return Ok(false);
    };
    let graph = named_graph_scope(source, entity);
    let dialect = source.dialect();
    let query = builder::ask_query(dialect, &subject, graph.as_ref());

    let found = if dialect.is_clause_style() {
        let mut rows = source.select(&query)?;
        match rows.next() {
            Some(row) => {
                row?;
                true
            }
            None => false,
        }
    } else {
        source.ask(&query)?
    };

    debug!("{} exists: {}", subject, found);
    Ok(found)
}

/// Fetch every value of `predicate` on `subject`, as a de-duplicated set.
///
/// Always goes through query text, never the native statement path. The
/// returned set iterates in a stable order, so "the first value" means the
/// same thing across calls against an unchanged store. The row cursor is
/// released on every exit path, including failure.
pub fn get_values<S>(
    source: &S,
    subject: &RdfSubject,
    predicate: &NamedNode,
) -> DataSourceResult<IndexSet<RdfTerm>>
where
    S: DataSource + ?Sized,
{
    let query = builder::values_query(source.dialect(), subject, predicate);
    let rows = source.select(&query)?;

    let mut values = IndexSet::new();
    for row in rows {
        let row = row?;
        if let Some(term) = row.get("obj") {
            values.insert(term.clone());
        }
    }
    Ok(values)
}

/// Fetch one value of `predicate` on `subject`.
///
/// Returns the first element of [`get_values`] in set order, or `None` when
/// the property has no values; an empty result is a valid answer, not an
/// error.
pub fn get_value<S>(
    source: &S,
    subject: &RdfSubject,
    predicate: &NamedNode,
) -> DataSourceResult<Option<RdfTerm>>
where
    S: DataSource + ?Sized,
{
    let values = get_values(source, subject, predicate)?;
    Ok(values.into_iter().next())
}

/// Fetch the `rdf:type` resources of `subject`.
///
/// Best effort: a failed lookup is logged and reported as "no types
/// found" rather than propagated. No other operation in this layer
/// swallows failures.
pub fn get_types<S>(source: &S, subject: &RdfSubject) -> Vec<RdfSubject>
where
    S: DataSource + ?Sized,
{
    let types = match get_values(source, subject, &vocab::rdf_type()) {
        Ok(values) => values
            .into_iter()
            .filter_map(|term| term.as_resource())
            .collect(),
        Err(e) => {
            error!("type lookup for {} failed: {}", subject, e);
            Vec::new()
        }
    };
    debug!("types for {}: {}", subject, types.len());
    types
}

/// The graph to scope queries to: only set when the store supports named
/// graphs and the entity names one.
fn named_graph_scope<S, E>(source: &S, entity: &E) -> Option<NamedNode>
where
    S: DataSource + ?Sized,
    E: RdfIdentity + ?Sized,
{
    if source.supports_named_graphs() {
        entity.named_graph()
    } else {
        None
    }
}
