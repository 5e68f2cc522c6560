use phenograph_obo::OboError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, OntologyError>;

#[derive(Debug, Error)]
pub enum OntologyError {
    #[error("OBO parse error: {0}")]
    Parse(#[from] OboError),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("duplicate term id `{id}`")]
    DuplicateId { id: String },

    /// An alternate id that collides with another term's id or alias.
    #[error("alternate id `{alias}` already refers to `{existing}`, cannot also refer to `{requested}`")]
    DuplicateAlias {
        alias: String,
        existing: String,
        requested: String,
    },

    #[error("too many terms: at most {limit} fit in a term index")]
    TooManyTerms { limit: u64 },

    #[error("term `{child}` declares unknown parent `{parent}`")]
    UnknownParent { child: String, parent: String },

    #[error("term `{child}` declares parent `{parent}` more than once")]
    DuplicateEdge { child: String, parent: String },

    #[error("expected exactly one root term, found {count}: [{}]", .ids.join(", "))]
    RootCount { count: usize, ids: Vec<String> },

    #[error("is_a cycle: {}", .path.join(" -> "))]
    Cycle { path: Vec<String> },

    #[error("unknown term id `{id}`")]
    NotFound { id: String },
}

impl OntologyError {
    /// Query-time errors leave the graph untouched and can be handled by the caller.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
