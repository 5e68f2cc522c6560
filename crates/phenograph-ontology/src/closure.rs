//! Ancestor / descendant closure over the `is_a` DAG.
//!
//! Traversal is an iterative DFS with an explicit stack. Each visited term
//! is marked `OnPath` while its edges are being explored and `Done` after;
//! meeting an `OnPath` term again means the hierarchy has a cycle, which is
//! reported instead of looping. Diamonds are cheap: a `Done` term is never
//! expanded twice.

use crate::error::{OntologyError, Result};
use crate::graph::{Ontology, TermIdx};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    /// Follow `parents`.
    Up,
    /// Follow `children`.
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    OnPath,
    Done,
}

/// Visited-state shared by every seed of one query.
#[derive(Default)]
struct Walk {
    marks: HashMap<TermIdx, Mark>,
}

impl Walk {
    fn visit(&mut self, ontology: &Ontology, seed: TermIdx, direction: Direction) -> Result<()> {
        if self.marks.contains_key(&seed) {
            return Ok(());
        }
        // (term, next edge to explore)
        let mut stack: Vec<(TermIdx, usize)> = vec![(seed, 0)];
        self.marks.insert(seed, Mark::OnPath);

        while let Some(frame) = stack.last_mut() {
            let current = frame.0;
            let Some(&next) = ontology.edges(current, direction).get(frame.1) else {
                self.marks.insert(current, Mark::Done);
                stack.pop();
                continue;
            };
            frame.1 += 1;

            match self.marks.get(&next).copied() {
                None => {
                    self.marks.insert(next, Mark::OnPath);
                    stack.push((next, 0));
                }
                Some(Mark::Done) => {}
                Some(Mark::OnPath) => {
                    let start = stack
                        .iter()
                        .position(|&(idx, _)| idx == next)
                        .unwrap_or(0);
                    let mut path: Vec<String> = stack[start..]
                        .iter()
                        .map(|&(idx, _)| ontology.term(idx).id().to_string())
                        .collect();
                    path.push(ontology.term(next).id().to_string());
                    tracing::error!(cycle = %path.join(" -> "), "is_a cycle detected");
                    return Err(OntologyError::Cycle { path });
                }
            }
        }
        Ok(())
    }

    fn into_ids(self, ontology: &Ontology) -> HashSet<String> {
        self.marks
            .into_keys()
            .map(|idx| ontology.term(idx).id().to_string())
            .collect()
    }
}

impl Ontology {
    fn edges(&self, idx: TermIdx, direction: Direction) -> &[TermIdx] {
        let node = self.node(idx);
        match direction {
            Direction::Up => &node.parents,
            Direction::Down => &node.children,
        }
    }

    fn walk<I, S>(&self, ids: I, direction: Direction) -> Result<HashSet<String>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut walk = Walk::default();
        for id in ids {
            let seed = self.resolve_idx(id.as_ref())?;
            walk.visit(self, seed, direction)?;
        }
        Ok(walk.into_ids(self))
    }

    /// The given terms plus all of their transitive parents, as canonical ids.
    ///
    /// Seeds may be alternate ids; unknown seeds fail with `NotFound`.
    /// The result has no meaningful order.
    pub fn closure<I, S>(&self, ids: I) -> Result<HashSet<String>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.walk(ids, Direction::Up)
    }

    /// The given terms plus all of their transitive children.
    pub fn descendants<I, S>(&self, ids: I) -> Result<HashSet<String>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.walk(ids, Direction::Down)
    }

    /// Walk the whole hierarchy and fail on the first `is_a` cycle.
    pub fn check_acyclic(&self) -> Result<()> {
        let mut walk = Walk::default();
        for term in self.iter() {
            walk.visit(self, term.idx(), Direction::Up)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phenograph_obo::{ParsedTerm, TermEntry};

    fn term(id: &str, parents: &[&str]) -> ParsedTerm {
        ParsedTerm {
            entry: TermEntry::new(id, id.to_lowercase()),
            parent_ids: parents.iter().map(|p| p.to_string()).collect(),
            alt_ids: Vec::new(),
        }
    }

    fn set(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn diamond() -> Ontology {
        Ontology::from_terms([
            term("A", &[]),
            term("B", &["A"]),
            term("C", &["A"]),
            term("D", &["B", "C"]),
        ])
        .unwrap()
    }

    #[test]
    fn closure_of_diamond_has_no_duplicates() {
        let onto = diamond();
        assert_eq!(onto.closure(["D"]).unwrap(), set(&["D", "B", "C", "A"]));
        assert_eq!(onto.closure(["B"]).unwrap(), set(&["B", "A"]));
        assert_eq!(onto.closure(["A"]).unwrap(), set(&["A"]));
    }

    #[test]
    fn closure_of_several_seeds_is_flat_union() {
        let onto = diamond();
        assert_eq!(onto.closure(["B", "C"]).unwrap(), set(&["A", "B", "C"]));
        assert!(onto.closure(Vec::<String>::new()).unwrap().is_empty());
    }

    #[test]
    fn descendants_mirror_closure() {
        let onto = diamond();
        assert_eq!(onto.descendants(["A"]).unwrap(), set(&["A", "B", "C", "D"]));
        assert_eq!(onto.descendants(["C"]).unwrap(), set(&["C", "D"]));
    }

    #[test]
    fn unknown_seed_is_not_found() {
        let err = diamond().closure(["Z"]).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn cycle_fails_fast() {
        // Single root R, but X and Y point at each other.
        let onto = Ontology::from_terms([
            term("R", &[]),
            term("X", &["R", "Y"]),
            term("Y", &["X"]),
        ])
        .unwrap();

        let err = onto.closure(["Y"]).unwrap_err();
        match err {
            OntologyError::Cycle { path } => {
                assert_eq!(path.first(), path.last());
                assert!(path.contains(&"X".to_string()));
                assert!(path.contains(&"Y".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(matches!(onto.check_acyclic(), Err(OntologyError::Cycle { .. })));
        assert!(diamond().check_acyclic().is_ok());
    }
}
