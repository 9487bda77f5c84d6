//! # Action Relationships
//!
//! Two graphs over dense [`ActionId`] indices:
//!
//! - a directed **main-of** graph: an accompanying action may only appear in
//!   a combination together with all of its main actions
//! - an undirected **exclusion** graph: incompatible actions never carry a
//!   nonzero coefficient in the same combination
//!
//! Edges are validated when they are added (self references and main-of
//! cycles are rejected), so the enumerator can rely on an acyclic main-of
//! graph. Name-keyed validation lives in [`crate::actions::ActionCatalog`].

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::actions::ActionId;

/// Reason an edge could not be added to the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeRejection {
    /// An action cannot relate to itself
    SelfReference,
    /// The main-of edge would close a cycle
    Cycle,
}

/// Why an action can never be part of a combination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Contradiction {
    /// The action is incompatible with one of its (transitive) main actions
    IncompatibleWithMain(ActionId),
    /// Two of the action's (transitive) main actions exclude each other
    MainsIncompatible(ActionId, ActionId),
    /// One of the action's main actions is itself contradictory
    DependsOnContradictory(ActionId),
}

/// Main-of and exclusion graphs for a catalogue of actions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelationshipGraph {
    /// Direct main actions per action
    mains: Vec<Vec<ActionId>>,
    /// Symmetric exclusion sets per action
    exclusions: Vec<BTreeSet<ActionId>>,
}

impl RelationshipGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of actions tracked
    pub fn len(&self) -> usize {
        self.mains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mains.is_empty()
    }

    /// Register a new node. Returns its id, which is always the next dense index.
    pub fn add_node(&mut self) -> ActionId {
        self.mains.push(Vec::new());
        self.exclusions.push(BTreeSet::new());
        ActionId(self.mains.len() - 1)
    }

    /// Declare `main` as a main action of `dependent`. Idempotent.
    pub fn add_main(&mut self, dependent: ActionId, main: ActionId) -> Result<(), EdgeRejection> {
        if dependent == main {
            return Err(EdgeRejection::SelfReference);
        }
        if self.main_closure(main).contains(&dependent) {
            return Err(EdgeRejection::Cycle);
        }
        let mains = &mut self.mains[dependent.0];
        if !mains.contains(&main) {
            mains.push(main);
        }
        Ok(())
    }

    /// Declare `a` and `b` mutually incompatible. Idempotent.
    pub fn add_exclusion(&mut self, a: ActionId, b: ActionId) -> Result<(), EdgeRejection> {
        if a == b {
            return Err(EdgeRejection::SelfReference);
        }
        self.exclusions[a.0].insert(b);
        self.exclusions[b.0].insert(a);
        Ok(())
    }

    /// Direct main actions of `id`
    pub fn mains_of(&self, id: ActionId) -> &[ActionId] {
        &self.mains[id.0]
    }

    /// Whether `id` is an accompanying action (has at least one main)
    pub fn has_mains(&self, id: ActionId) -> bool {
        !self.mains[id.0].is_empty()
    }

    /// Actions declared incompatible with `id`
    pub fn exclusions_of(&self, id: ActionId) -> &BTreeSet<ActionId> {
        &self.exclusions[id.0]
    }

    pub fn is_excluded(&self, a: ActionId, b: ActionId) -> bool {
        self.exclusions[a.0].contains(&b)
    }

    /// Transitive main actions of `id` (not including `id` itself)
    pub fn main_closure(&self, id: ActionId) -> BTreeSet<ActionId> {
        let mut closure = BTreeSet::new();
        let mut stack: Vec<ActionId> = self.mains[id.0].clone();
        while let Some(next) = stack.pop() {
            if closure.insert(next) {
                stack.extend(self.mains[next.0].iter().copied());
            }
        }
        closure
    }

    /// True iff no excluded pair co-occurs in `subset` and every member's
    /// main actions are also members.
    ///
    /// # Example
    /// ```
    /// use std::collections::BTreeSet;
    /// use comb_core::relationships::RelationshipGraph;
    ///
    /// let mut graph = RelationshipGraph::new();
    /// let q1 = graph.add_node();
    /// let q2 = graph.add_node();
    /// let w = graph.add_node();
    /// graph.add_main(q2, q1).unwrap();
    /// graph.add_exclusion(q1, w).unwrap();
    ///
    /// assert!(graph.is_compatible(&BTreeSet::from([q1, q2])));
    /// assert!(!graph.is_compatible(&BTreeSet::from([q2])));
    /// assert!(!graph.is_compatible(&BTreeSet::from([q1, w])));
    /// ```
    pub fn is_compatible(&self, subset: &BTreeSet<ActionId>) -> bool {
        subset.iter().all(|&id| {
            self.exclusions[id.0].is_disjoint(subset)
                && self.mains[id.0].iter().all(|m| subset.contains(m))
        })
    }

    /// Actions that can never be selected, in id order.
    pub fn contradictions(&self) -> Vec<(ActionId, Contradiction)> {
        let closures: Vec<BTreeSet<ActionId>> =
            (0..self.len()).map(|i| self.main_closure(ActionId(i))).collect();

        let direct: Vec<Option<Contradiction>> = closures
            .iter()
            .enumerate()
            .map(|(i, closure)| self.direct_contradiction(ActionId(i), closure))
            .collect();

        let mut found = Vec::new();
        for (i, closure) in closures.iter().enumerate() {
            let id = ActionId(i);
            // Report the root cause on the contradictory main, and plain
            // dependency on everything downstream of it.
            let upstream = closure.iter().find(|m| direct[m.0].is_some()).copied();
            if let Some(main) = upstream {
                found.push((id, Contradiction::DependsOnContradictory(main)));
            } else if let Some(reason) = direct[i] {
                found.push((id, reason));
            }
        }
        found
    }

    fn direct_contradiction(&self, id: ActionId, closure: &BTreeSet<ActionId>) -> Option<Contradiction> {
        if let Some(&main) = self.exclusions[id.0].intersection(closure).next() {
            return Some(Contradiction::IncompatibleWithMain(main));
        }
        closure.iter().find_map(|&a| {
            self.exclusions[a.0]
                .intersection(closure)
                .next()
                .map(|&b| Contradiction::MainsIncompatible(a.min(b), a.max(b)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_with(n: usize) -> (RelationshipGraph, Vec<ActionId>) {
        let mut graph = RelationshipGraph::new();
        let ids = (0..n).map(|_| graph.add_node()).collect();
        (graph, ids)
    }

    #[test]
    fn test_nodes_are_dense() {
        let (graph, ids) = graph_with(3);
        assert_eq!(ids, vec![ActionId(0), ActionId(1), ActionId(2)]);
        assert_eq!(graph.len(), 3);
    }

    #[test]
    fn test_self_relationships_rejected() {
        let (mut graph, ids) = graph_with(1);
        assert_eq!(graph.add_main(ids[0], ids[0]), Err(EdgeRejection::SelfReference));
        assert_eq!(graph.add_exclusion(ids[0], ids[0]), Err(EdgeRejection::SelfReference));
    }

    #[test]
    fn test_main_cycle_rejected() {
        let (mut graph, ids) = graph_with(3);
        graph.add_main(ids[1], ids[0]).unwrap();
        graph.add_main(ids[2], ids[1]).unwrap();
        assert_eq!(graph.add_main(ids[0], ids[2]), Err(EdgeRejection::Cycle));
        assert_eq!(graph.add_main(ids[0], ids[1]), Err(EdgeRejection::Cycle));
    }

    #[test]
    fn test_add_main_is_idempotent() {
        let (mut graph, ids) = graph_with(2);
        graph.add_main(ids[1], ids[0]).unwrap();
        graph.add_main(ids[1], ids[0]).unwrap();
        assert_eq!(graph.mains_of(ids[1]), &[ids[0]]);
    }

    #[test]
    fn test_exclusion_is_symmetric() {
        let (mut graph, ids) = graph_with(2);
        graph.add_exclusion(ids[0], ids[1]).unwrap();
        assert!(graph.is_excluded(ids[0], ids[1]));
        assert!(graph.is_excluded(ids[1], ids[0]));
    }

    #[test]
    fn test_main_closure_is_transitive() {
        let (mut graph, ids) = graph_with(4);
        graph.add_main(ids[1], ids[0]).unwrap();
        graph.add_main(ids[2], ids[1]).unwrap();
        assert_eq!(graph.main_closure(ids[2]), BTreeSet::from([ids[0], ids[1]]));
        assert!(graph.main_closure(ids[3]).is_empty());
    }

    #[test]
    fn test_compatibility_requires_mains() {
        let (mut graph, ids) = graph_with(3);
        graph.add_main(ids[2], ids[1]).unwrap();
        assert!(graph.is_compatible(&BTreeSet::new()));
        assert!(graph.is_compatible(&BTreeSet::from([ids[0], ids[1], ids[2]])));
        assert!(!graph.is_compatible(&BTreeSet::from([ids[0], ids[2]])));
    }

    #[test]
    fn test_no_contradictions_in_consistent_graph() {
        let (mut graph, ids) = graph_with(3);
        graph.add_main(ids[1], ids[0]).unwrap();
        graph.add_exclusion(ids[0], ids[2]).unwrap();
        assert!(graph.contradictions().is_empty());
    }

    #[test]
    fn test_contradiction_incompatible_with_main() {
        let (mut graph, ids) = graph_with(3);
        graph.add_main(ids[1], ids[0]).unwrap();
        graph.add_exclusion(ids[1], ids[0]).unwrap();
        graph.add_main(ids[2], ids[1]).unwrap();

        let found = graph.contradictions();
        assert_eq!(
            found,
            vec![
                (ids[1], Contradiction::IncompatibleWithMain(ids[0])),
                (ids[2], Contradiction::DependsOnContradictory(ids[1])),
            ]
        );
    }

    #[test]
    fn test_contradiction_mains_incompatible() {
        let (mut graph, ids) = graph_with(3);
        graph.add_main(ids[2], ids[0]).unwrap();
        graph.add_main(ids[2], ids[1]).unwrap();
        graph.add_exclusion(ids[1], ids[0]).unwrap();

        assert_eq!(
            graph.contradictions(),
            vec![(ids[2], Contradiction::MainsIncompatible(ids[0], ids[1]))]
        );
    }
}
