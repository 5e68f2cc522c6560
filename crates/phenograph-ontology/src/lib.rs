//! Phenograph ontology graph.
//!
//! Builds an immutable `is_a` DAG from OBO terms (see `phenograph-obo`) and
//! answers the queries feature extraction needs:
//!
//! - id lookup and alternate-id resolution,
//! - ancestor closure (and its mirror, descendants),
//! - the single root of the hierarchy.
//!
//! ```
//! use phenograph_ontology::Ontology;
//!
//! let onto = Ontology::from_obo_str(
//!     "[Term]\nid: R\nname: Root\n\n\
//!      [Term]\nid: A\nname: AA\nis_a: R\n\n\
//!      [Term]\nid: B\nname: BB\nis_a: A\n",
//! )
//! .unwrap();
//!
//! assert_eq!(onto.root().id(), "R");
//! let ancestors = onto.closure(["B"]).unwrap();
//! assert_eq!(ancestors.len(), 3);
//! ```

pub mod closure;
pub mod error;
pub mod graph;

pub use error::{OntologyError, Result};
pub use graph::{Ontology, Term, TermIdx};
pub use phenograph_obo::{OboError, ParsedTerm, Tags, TermEntry};
