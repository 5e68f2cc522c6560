//! The ontology graph: an arena of terms linked by `is_a` edges.
//!
//! Terms live in a `Vec` owned by [`Ontology`]; edges are stored as
//! [`TermIdx`] lists on both endpoints. The only way to add an edge is
//! `OntologyBuilder::link`, which updates `parents` and `children`
//! together, so the two directions cannot drift apart.

use crate::error::{OntologyError, Result};
use phenograph_obo::{parse_terms, ParsedTerm, Tags, TermEntry};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Arena index of a term. Only meaningful for the ontology that issued it.
///
/// 32 bits wide, so one ontology holds at most `u32::MAX + 1` terms; the
/// builder rejects anything larger with [`OntologyError::TooManyTerms`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TermIdx(u32);

impl TermIdx {
    pub const fn raw(self) -> u32 {
        self.0
    }

    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }

    /// `None` if `index` does not fit in 32 bits.
    pub(crate) fn from_index(index: usize) -> Option<Self> {
        u32::try_from(index).ok().map(Self)
    }
}

#[derive(Debug)]
pub(crate) struct Node {
    pub(crate) entry: TermEntry,
    pub(crate) parents: Vec<TermIdx>,
    pub(crate) children: Vec<TermIdx>,
}

/// A fully linked, validated `is_a` hierarchy with exactly one root.
///
/// Immutable once built; share it across threads behind an `Arc`.
#[derive(Debug)]
pub struct Ontology {
    pub(crate) nodes: Vec<Node>,
    entries_by_id: HashMap<String, TermIdx>,
    /// Every alternate id, plus every canonical id mapped to itself.
    alias_to_canonical: HashMap<String, TermIdx>,
    root: TermIdx,
}

// ============================================================================
// Construction
// ============================================================================

/// Build-time state. Never escapes [`Ontology::from_terms`].
struct OntologyBuilder {
    nodes: Vec<Node>,
    entries_by_id: HashMap<String, TermIdx>,
    alias_to_canonical: HashMap<String, TermIdx>,
}

impl OntologyBuilder {
    fn with_capacity(n: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(n),
            entries_by_id: HashMap::with_capacity(n),
            alias_to_canonical: HashMap::with_capacity(n),
        }
    }

    fn id(&self, idx: TermIdx) -> &str {
        &self.nodes[idx.index()].entry.id
    }

    fn add_entry(&mut self, entry: TermEntry) -> Result<TermIdx> {
        if self.entries_by_id.contains_key(&entry.id) {
            return Err(OntologyError::DuplicateId { id: entry.id });
        }
        let idx = TermIdx::from_index(self.nodes.len()).ok_or(OntologyError::TooManyTerms {
            limit: u64::from(u32::MAX) + 1,
        })?;
        self.entries_by_id.insert(entry.id.clone(), idx);
        self.alias_to_canonical.insert(entry.id.clone(), idx);
        self.nodes.push(Node {
            entry,
            parents: Vec::new(),
            children: Vec::new(),
        });
        Ok(idx)
    }

    fn add_alias(&mut self, alias: &str, idx: TermIdx) -> Result<()> {
        match self.alias_to_canonical.get(alias) {
            Some(&existing) if existing != idx => Err(OntologyError::DuplicateAlias {
                alias: alias.to_string(),
                existing: self.id(existing).to_string(),
                requested: self.id(idx).to_string(),
            }),
            Some(_) => Ok(()),
            None => {
                self.alias_to_canonical.insert(alias.to_string(), idx);
                Ok(())
            }
        }
    }

    fn resolve_parent(&self, child: TermIdx, parent_id: &str) -> Result<TermIdx> {
        self.alias_to_canonical
            .get(parent_id)
            .copied()
            .ok_or_else(|| OntologyError::UnknownParent {
                child: self.id(child).to_string(),
                parent: parent_id.to_string(),
            })
    }

    /// Add the edge `child is_a parent` to both endpoints.
    fn link(&mut self, parent: TermIdx, child: TermIdx) -> Result<()> {
        if self.nodes[child.index()].parents.contains(&parent) {
            return Err(OntologyError::DuplicateEdge {
                child: self.id(child).to_string(),
                parent: self.id(parent).to_string(),
            });
        }
        debug_assert!(!self.nodes[parent.index()].children.contains(&child));
        self.nodes[child.index()].parents.push(parent);
        self.nodes[parent.index()].children.push(child);
        Ok(())
    }

    fn finish(self) -> Result<Ontology> {
        let roots: Vec<TermIdx> = self
            .entries_by_id
            .values()
            .copied()
            .filter(|&idx| self.nodes[idx.index()].parents.is_empty())
            .collect();

        let [root] = roots.as_slice() else {
            let mut ids: Vec<String> = roots.iter().map(|&r| self.id(r).to_string()).collect();
            ids.sort();
            return Err(OntologyError::RootCount {
                count: ids.len(),
                ids,
            });
        };

        Ok(Ontology {
            root: *root,
            nodes: self.nodes,
            entries_by_id: self.entries_by_id,
            alias_to_canonical: self.alias_to_canonical,
        })
    }
}

impl Ontology {
    /// Build the graph from every parsed term of a source, in file order.
    ///
    /// Steps: index entries, register alternate ids, resolve parent ids
    /// (alternate ids are accepted), wire edges, then require a single root.
    /// Acyclicity is not checked here; see [`Ontology::check_acyclic`].
    pub fn from_terms(terms: impl IntoIterator<Item = ParsedTerm>) -> Result<Self> {
        let terms: Vec<ParsedTerm> = terms.into_iter().collect();
        let mut builder = OntologyBuilder::with_capacity(terms.len());

        let mut pending = Vec::with_capacity(terms.len());
        for term in terms {
            let idx = builder.add_entry(term.entry)?;
            pending.push((idx, term.parent_ids, term.alt_ids));
        }

        for (idx, _, alt_ids) in &pending {
            for alt in alt_ids {
                builder.add_alias(alt, *idx)?;
            }
        }

        for (child, parent_ids, _) in &pending {
            for parent_id in parent_ids {
                let parent = builder.resolve_parent(*child, parent_id)?;
                builder.link(parent, *child)?;
            }
        }

        let ontology = builder.finish()?;
        tracing::info!(
            terms = ontology.len(),
            aliases = ontology.alias_count(),
            root = %ontology.root().id(),
            "ontology built"
        );
        Ok(ontology)
    }

    /// Parse OBO text from `reader` and build the graph. All or nothing.
    pub fn from_obo_reader<R: BufRead>(reader: R) -> Result<Self> {
        let terms = parse_terms(reader).collect::<std::result::Result<Vec<_>, _>>()?;
        Self::from_terms(terms)
    }

    pub fn from_obo_str(text: &str) -> Result<Self> {
        Self::from_obo_reader(text.as_bytes())
    }

    pub fn from_obo_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading ontology");
        let file = File::open(path).map_err(|source| OntologyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_obo_reader(BufReader::new(file))
    }
}

// ============================================================================
// Queries
// ============================================================================

impl Ontology {
    pub(crate) fn node(&self, idx: TermIdx) -> &Node {
        &self.nodes[idx.index()]
    }

    pub(crate) fn term(&self, idx: TermIdx) -> Term<'_> {
        Term {
            ontology: self,
            idx,
        }
    }

    /// Number of (non-obsolete) terms.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of alternate ids, not counting the canonical self-mappings.
    pub fn alias_count(&self) -> usize {
        self.alias_to_canonical.len() - self.entries_by_id.len()
    }

    /// Whether `id` is a canonical id.
    pub fn contains(&self, id: &str) -> bool {
        self.entries_by_id.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<Term<'_>> {
        self.entries_by_id.get(id).map(|&idx| self.term(idx))
    }

    /// Look up a term by canonical id.
    pub fn lookup(&self, id: &str) -> Result<Term<'_>> {
        self.get(id).ok_or_else(|| OntologyError::NotFound { id: id.to_string() })
    }

    pub(crate) fn resolve_idx(&self, id: &str) -> Result<TermIdx> {
        self.alias_to_canonical
            .get(id)
            .copied()
            .ok_or_else(|| OntologyError::NotFound { id: id.to_string() })
    }

    /// Canonical id for `id`, which may be canonical itself or an alternate id.
    pub fn resolve_alias(&self, id: &str) -> Result<&str> {
        let idx = self.resolve_idx(id)?;
        Ok(&self.node(idx).entry.id)
    }

    /// Resolve a batch of ids to canonical form. Empty strings are skipped.
    pub fn canonicalize<I, S>(&self, ids: I) -> Result<BTreeSet<String>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut canonical = BTreeSet::new();
        for id in ids {
            let id = id.as_ref();
            if id.is_empty() {
                continue;
            }
            canonical.insert(self.resolve_alias(id)?.to_string());
        }
        Ok(canonical)
    }

    pub fn root(&self) -> Term<'_> {
        self.term(self.root)
    }

    /// All terms in source order.
    pub fn iter(&self) -> impl Iterator<Item = Term<'_>> + '_ {
        (0..self.nodes.len())
            .filter_map(TermIdx::from_index)
            .map(|idx| self.term(idx))
    }
}

// ============================================================================
// Term view
// ============================================================================

/// Read-only view of one term inside an [`Ontology`].
#[derive(Clone, Copy)]
pub struct Term<'a> {
    ontology: &'a Ontology,
    idx: TermIdx,
}

impl<'a> Term<'a> {
    pub fn idx(&self) -> TermIdx {
        self.idx
    }

    pub fn entry(&self) -> &'a TermEntry {
        &self.ontology.node(self.idx).entry
    }

    pub fn id(&self) -> &'a str {
        &self.entry().id
    }

    pub fn name(&self) -> &'a str {
        &self.entry().name
    }

    pub fn tags(&self) -> &'a Tags {
        &self.entry().tags
    }

    pub fn parents(&self) -> impl ExactSizeIterator<Item = Term<'a>> + 'a {
        let ontology = self.ontology;
        ontology
            .node(self.idx)
            .parents
            .iter()
            .map(move |&idx| ontology.term(idx))
    }

    pub fn children(&self) -> impl ExactSizeIterator<Item = Term<'a>> + 'a {
        let ontology = self.ontology;
        ontology
            .node(self.idx)
            .children
            .iter()
            .map(move |&idx| ontology.term(idx))
    }

    pub fn is_root(&self) -> bool {
        self.idx == self.ontology.root
    }
}

impl PartialEq for Term<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.ontology, other.ontology) && self.idx == other.idx
    }
}

impl Eq for Term<'_> {}

impl fmt::Debug for Term<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Term {} {:?}>", self.id(), self.name())
    }
}
