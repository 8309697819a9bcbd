//! Query text construction
//!
//! One pure function per retrieval operation. Each renders a dialect-correct
//! query string from a subject, an optional predicate, and an optional named
//! graph. The two families disagree on bracket style, clause ordering, and
//! whether a boolean query form exists at all, so each renderer is a plain
//! string template.
//!
//! Graph-scoping clauses appear exactly when a graph is passed. Deciding
//! whether a store supports named graphs is the caller's job.

use super::Dialect;
use crate::model::{NamedNode, RdfObject, RdfSubject};

/// Build a query returning every statement with `subject` as subject.
///
/// Pattern style emits a `CONSTRUCT`; clause style emits a `construct`
/// with a `where s = …` restriction.
pub fn describe_query(
    dialect: Dialect,
    subject: &RdfSubject,
    graph: Option<&NamedNode>,
) -> String {
    let s = dialect.as_query_string(subject);
    if dialect.is_clause_style() {
        match graph {
            Some(g) => format!(
                "construct {{s}} p {{o}} from context <{}> {{s}} p {{o}} where s = {}",
                g.as_str(),
                s
            ),
            None => format!("construct {{s}} p {{o}} from {{s}} p {{o}} where s = {}", s),
        }
    } else {
        match graph {
            Some(g) => format!(
                "CONSTRUCT {{ {s} ?p ?o }} FROM <{}> WHERE {{ {s} ?p ?o . }}",
                g.as_str()
            ),
            None => format!("CONSTRUCT {{ {s} ?p ?o }} WHERE {{ {s} ?p ?o . }}"),
        }
    }
}

/// Build an existence query for `subject`.
///
/// Pattern style has a native boolean form and emits `ASK`. Clause style
/// has none, so the query is a `select … limit 1` probe and existence is
/// derived from the result being non-empty; the probe binds the variable
/// `s`.
pub fn ask_query(dialect: Dialect, subject: &RdfSubject, graph: Option<&NamedNode>) -> String {
    let s = dialect.as_query_string(subject);
    if dialect.is_clause_style() {
        match graph {
            Some(g) => format!(
                "select distinct s from context <{}> {{s}} p {{o}} where s = {} limit 1",
                g.as_str(),
                s
            ),
            None => format!(
                "select distinct s from {{s}} p {{o}} where s = {} limit 1",
                s
            ),
        }
    } else {
        match graph {
            Some(g) => format!("ASK FROM <{}> {{ {s} ?p ?o . }}", g.as_str()),
            None => format!("ASK {{ {s} ?p ?o . }}"),
        }
    }
}

/// Build a query binding every value of `predicate` on `subject` to the
/// single free variable `obj`.
pub fn values_query(dialect: Dialect, subject: &RdfSubject, predicate: &NamedNode) -> String {
    let s = dialect.as_query_string(subject);
    if dialect.is_clause_style() {
        format!("select obj from {{{}}} <{}> {{obj}}", s, predicate.as_str())
    } else {
        format!(
            "SELECT ?obj WHERE {{ {} <{}> ?obj . }}",
            s,
            predicate.as_str()
        )
    }
}

/// Build a query returning every statement matching the given pattern,
/// `None` components meaning wildcard.
///
/// This is the general form the statement-source adapter falls back to when
/// the pattern is not a plain describe. Bound components are inlined into
/// the triple pattern (pattern style) or added as `where` conditions
/// (clause style); wildcards become variables.
pub fn statements_query(
    dialect: Dialect,
    subject: Option<&RdfSubject>,
    predicate: Option<&NamedNode>,
    object: Option<&RdfObject>,
    graph: Option<&NamedNode>,
) -> String {
    if dialect.is_clause_style() {
        let scope = match graph {
            Some(g) => format!("from context <{}> ", g.as_str()),
            None => "from ".to_string(),
        };
        let mut conditions = Vec::new();
        if let Some(s) = subject {
            conditions.push(format!("s = {}", dialect.as_query_string(s)));
        }
        if let Some(p) = predicate {
            conditions.push(format!("p = <{}>", p.as_str()));
        }
        if let Some(o) = object {
            conditions.push(format!("o = {}", object_token(dialect, o)));
        }
        let mut query = format!("construct {{s}} p {{o}} {}{{s}} p {{o}}", scope);
        if !conditions.is_empty() {
            query.push_str(" where ");
            query.push_str(&conditions.join(" and "));
        }
        query
    } else {
        let s = subject
            .map(|s| dialect.as_query_string(s))
            .unwrap_or_else(|| "?s".to_string());
        let p = predicate
            .map(|p| format!("<{}>", p.as_str()))
            .unwrap_or_else(|| "?p".to_string());
        let o = object
            .map(|o| object_token(dialect, o))
            .unwrap_or_else(|| "?o".to_string());
        match graph {
            Some(g) => format!(
                "CONSTRUCT {{ {s} {p} {o} }} FROM <{}> WHERE {{ {s} {p} {o} . }}",
                g.as_str()
            ),
            None => format!("CONSTRUCT {{ {s} {p} {o} }} WHERE {{ {s} {p} {o} . }}"),
        }
    }
}

fn object_token(dialect: Dialect, object: &RdfObject) -> String {
    match object {
        RdfObject::NamedNode(n) => format!("<{}>", n.as_str()),
        RdfObject::BlankNode(b) => {
            dialect.as_query_string(&RdfSubject::BlankNode(b.clone()))
        }
        RdfObject::Literal(l) => l.to_string(),
    }
}
