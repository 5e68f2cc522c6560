//! Output shapes for the CLI: serialized with `--json`, rendered as colored
//! text otherwise.

use colored::Colorize;
use phenograph_ontology::{Ontology, Tags, Term};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt::Write;

#[derive(Debug, Serialize)]
pub struct TermRef {
    pub id: String,
    pub name: String,
}

impl TermRef {
    fn new(term: Term<'_>) -> Self {
        Self {
            id: term.id().to_string(),
            name: term.name().to_string(),
        }
    }

    fn line(&self) -> String {
        format!("{} {}", self.id.bold(), self.name)
    }
}

#[derive(Debug, Serialize)]
pub struct SummaryReport {
    pub terms: usize,
    pub alt_ids: usize,
    pub root: TermRef,
    pub max_depth: usize,
}

impl SummaryReport {
    pub fn new(ontology: &Ontology) -> Self {
        Self {
            terms: ontology.len(),
            alt_ids: ontology.alias_count(),
            root: TermRef::new(ontology.root()),
            max_depth: max_depth(ontology),
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{} single-rooted DAG", "ok".green().bold());
        let _ = writeln!(out, "  terms:     {}", self.terms);
        let _ = writeln!(out, "  alt ids:   {}", self.alt_ids);
        let _ = writeln!(out, "  max depth: {}", self.max_depth);
        let _ = writeln!(out, "  root:      {}", self.root.line());
        out
    }
}

/// Longest `is_a` chain from the root, counted in edges.
///
/// Terms are visited in topological order, so on a cyclic ontology the
/// terms on and below the cycle are simply never reached.
fn max_depth(ontology: &Ontology) -> usize {
    let index = |term: &Term<'_>| term.idx().raw() as usize;
    let mut unvisited_parents: Vec<usize> = ontology.iter().map(|t| t.parents().len()).collect();
    let mut depth = vec![0usize; ontology.len()];

    let mut ready = vec![ontology.root()];
    while let Some(term) = ready.pop() {
        let d = depth[index(&term)];
        for child in term.children() {
            let c = index(&child);
            depth[c] = depth[c].max(d + 1);
            unvisited_parents[c] -= 1;
            if unvisited_parents[c] == 0 {
                ready.push(child);
            }
        }
    }
    depth.into_iter().max().unwrap_or(0)
}

#[derive(Debug, Serialize)]
pub struct TermReport {
    pub id: String,
    pub name: String,
    pub is_root: bool,
    pub parents: Vec<TermRef>,
    pub children: Vec<TermRef>,
    pub tags: Tags,
}

impl TermReport {
    pub fn new(term: Term<'_>) -> Self {
        Self {
            id: term.id().to_string(),
            name: term.name().to_string(),
            is_root: term.is_root(),
            parents: term.parents().map(TermRef::new).collect(),
            children: term.children().map(TermRef::new).collect(),
            tags: term.tags().clone(),
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{} {}", self.id.bold(), self.name);
        if self.is_root {
            let _ = writeln!(out, "  {}", "(root)".cyan());
        }
        for (label, terms) in [("is_a", &self.parents), ("children", &self.children)] {
            if terms.is_empty() {
                continue;
            }
            let _ = writeln!(out, "  {}", label.yellow());
            for t in terms {
                let _ = writeln!(out, "    {}", t.line());
            }
        }
        for (tag, values) in &self.tags {
            for value in values {
                let _ = writeln!(out, "  {}: {}", tag.dimmed(), value);
            }
        }
        out
    }
}

#[derive(Debug, Serialize)]
pub struct ClosureReport {
    pub seeds: Vec<String>,
    pub terms: Vec<TermRef>,
}

impl ClosureReport {
    /// `found` comes back unordered; the report lists it sorted by id.
    pub fn new(ontology: &Ontology, seeds: &[String], found: HashSet<String>) -> Self {
        let mut ids: Vec<String> = found.into_iter().collect();
        ids.sort();
        let terms = ids
            .iter()
            .filter_map(|id| ontology.get(id))
            .map(TermRef::new)
            .collect();
        Self {
            seeds: seeds.to_vec(),
            terms,
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for t in &self.terms {
            let _ = writeln!(out, "{}", t.line());
        }
        let _ = writeln!(out, "{} {} terms", "total".green().bold(), self.terms.len());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIAMOND: &str = "\
[Term]
id: A
name: top
[Term]
id: B
name: left
is_a: A
[Term]
id: C
name: right
alt_id: C_OLD
is_a: A
[Term]
id: D
name: bottom
comment: sits under both
is_a: B
is_a: C
[Term]
id: E
name: deeper
is_a: D
";

    fn ontology() -> Ontology {
        Ontology::from_obo_str(DIAMOND).unwrap()
    }

    #[test]
    fn summary_counts_terms_aliases_and_depth() {
        let onto = ontology();
        let summary = SummaryReport::new(&onto);
        assert_eq!(summary.terms, 5);
        assert_eq!(summary.alt_ids, 1);
        assert_eq!(summary.root.id, "A");
        assert_eq!(summary.max_depth, 3);
    }

    #[test]
    fn term_report_lists_edges_and_tags() {
        let onto = ontology();
        let report = TermReport::new(onto.lookup("D").unwrap());
        let parents: Vec<&str> = report.parents.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(parents, ["B", "C"]);
        assert_eq!(report.children.len(), 1);
        assert_eq!(report.tags["comment"], ["sits under both"]);
        assert!(!report.is_root);
        assert!(report.render().contains("sits under both"));
    }

    #[test]
    fn closure_report_is_sorted_and_serializable() {
        let onto = ontology();
        let seeds = vec!["D".to_string()];
        let report = ClosureReport::new(&onto, &seeds, onto.closure(&seeds).unwrap());
        let ids: Vec<&str> = report.terms.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["A", "B", "C", "D"]);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["terms"][0]["name"], "top");
        assert_eq!(json["seeds"][0], "D");
    }
}
