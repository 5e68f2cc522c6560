use phenograph_ontology::{Ontology, ParsedTerm, TermEntry};
use proptest::prelude::*;
use std::collections::{BTreeSet, HashSet};

const MAX_TERMS: usize = 40;
const MAX_PARENTS: usize = 3;

/// Random single-root DAG: term 0 is the root, term `i > 0` picks 1..=3
/// distinct parents among `0..i`, so edges always point to earlier terms.
fn dag_strategy() -> impl Strategy<Value = Vec<BTreeSet<usize>>> {
    (1usize..=MAX_TERMS).prop_flat_map(|n| {
        let per_term: Vec<BoxedStrategy<BTreeSet<usize>>> = (0..n)
            .map(|i| {
                if i == 0 {
                    Just(BTreeSet::new()).boxed()
                } else {
                    prop::collection::btree_set(0..i, 1..=MAX_PARENTS.min(i)).boxed()
                }
            })
            .collect();
        per_term
    })
}

fn id(i: usize) -> String {
    format!("T:{i:04}")
}

fn build(parents: &[BTreeSet<usize>]) -> Ontology {
    let terms = parents.iter().enumerate().map(|(i, ps)| ParsedTerm {
        entry: TermEntry::new(id(i), format!("term {i}")),
        parent_ids: ps.iter().map(|&p| id(p)).collect(),
        alt_ids: vec![format!("ALT:{i:04}")],
    });
    Ontology::from_terms(terms).expect("generated DAG is valid")
}

/// Reference closure: fixed point over the parent lists.
fn naive_closure(parents: &[BTreeSet<usize>], seed: usize) -> HashSet<String> {
    let mut reached = BTreeSet::from([seed]);
    loop {
        let next: BTreeSet<usize> = reached
            .iter()
            .flat_map(|&t| parents[t].iter().copied())
            .chain(reached.iter().copied())
            .collect();
        if next.len() == reached.len() {
            break;
        }
        reached = next;
    }
    reached.into_iter().map(id).collect()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        failure_persistence: None,
        ..ProptestConfig::default()
    })]

    #[test]
    fn closure_matches_reference(parents in dag_strategy()) {
        let onto = build(&parents);
        for i in 0..parents.len() {
            prop_assert_eq!(onto.closure([id(i)]).unwrap(), naive_closure(&parents, i));
        }
    }

    #[test]
    fn closure_is_reflexive_and_monotone(parents in dag_strategy()) {
        let onto = build(&parents);
        for term in onto.iter() {
            let up = onto.closure([term.id()]).unwrap();
            prop_assert!(up.contains(term.id()));
            prop_assert!(up.contains(onto.root().id()));
            for child in term.children() {
                let child_up = onto.closure([child.id()]).unwrap();
                prop_assert!(child_up.is_superset(&up));
            }
        }
    }

    #[test]
    fn descendants_invert_closure(parents in dag_strategy()) {
        let onto = build(&parents);
        for a in onto.iter() {
            let down = onto.descendants([a.id()]).unwrap();
            for b in onto.iter() {
                let up = onto.closure([b.id()]).unwrap();
                prop_assert_eq!(down.contains(b.id()), up.contains(a.id()));
            }
        }
        prop_assert!(onto.check_acyclic().is_ok());
    }

    #[test]
    fn alternate_ids_resolve(parents in dag_strategy()) {
        let onto = build(&parents);
        for i in 0..parents.len() {
            let alt = format!("ALT:{i:04}");
            prop_assert_eq!(onto.resolve_alias(&alt).unwrap(), id(i));
            prop_assert_eq!(onto.resolve_alias(&id(i)).unwrap(), id(i));
        }
    }
}
