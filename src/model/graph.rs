//! Statement graphs
//!
//! A [`Graph`] is the aggregate returned by describe-style retrieval: an
//! unordered set of statements with duplicates collapsed. Iteration order is
//! insertion order, so repeated retrievals against an unchanged store walk
//! the set the same way.

use super::types::Statement;
use indexmap::IndexSet;

/// An unordered, duplicate-free collection of statements.
///
/// Equality is set equality: two graphs are equal when they hold the same
/// statements, regardless of insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    statements: IndexSet<Statement>,
}

impl Graph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of statements in the graph
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// Check if the graph is empty
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Insert a statement, collapsing duplicates.
    ///
    /// Returns `true` if the statement was not already present.
    pub fn insert(&mut self, statement: Statement) -> bool {
        self.statements.insert(statement)
    }

    /// Check if a statement is in the graph
    pub fn contains(&self, statement: &Statement) -> bool {
        self.statements.contains(statement)
    }

    /// Iterate over the statements
    pub fn iter(&self) -> impl Iterator<Item = &Statement> {
        self.statements.iter()
    }
}

impl FromIterator<Statement> for Graph {
    fn from_iter<I: IntoIterator<Item = Statement>>(iter: I) -> Self {
        Self {
            statements: iter.into_iter().collect(),
        }
    }
}

impl Extend<Statement> for Graph {
    fn extend<I: IntoIterator<Item = Statement>>(&mut self, iter: I) {
        self.statements.extend(iter);
    }
}

impl IntoIterator for Graph {
    type Item = Statement;
    type IntoIter = indexmap::set::IntoIter<Statement>;

    fn into_iter(self) -> Self::IntoIter {
        self.statements.into_iter()
    }
}

impl<'a> IntoIterator for &'a Graph {
    type Item = &'a Statement;
    type IntoIter = indexmap::set::Iter<'a, Statement>;

    fn into_iter(self) -> Self::IntoIter {
        self.statements.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::NamedNode;

    fn statement(n: u32) -> Statement {
        Statement::new(
            NamedNode::new(&format!("http://example.org/s{}", n))
                .unwrap()
                .into(),
            NamedNode::new("http://example.org/p").unwrap(),
            NamedNode::new("http://example.org/o").unwrap().into(),
        )
    }

    #[test]
    fn test_duplicates_collapse() {
        let mut graph = Graph::new();
        assert!(graph.insert(statement(1)));
        assert!(!graph.insert(statement(1)));
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_set_equality_ignores_order() {
        let forward: Graph = vec![statement(1), statement(2)].into_iter().collect();
        let reversed: Graph = vec![statement(2), statement(1)].into_iter().collect();
        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_contains() {
        let graph: Graph = vec![statement(1)].into_iter().collect();
        assert!(graph.contains(&statement(1)));
        assert!(!graph.contains(&statement(2)));
        assert!(!graph.is_empty());
    }
}
