//! OBO ingestion for Phenograph.
//!
//! This crate turns the line-oriented OBO format into term records:
//!
//! - [`stanza`] tokenizes lines and groups them into `[Term]` stanzas.
//! - [`entry`] converts a stanza into a [`ParsedTerm`] (entry, parent ids,
//!   alternate ids), dropping obsolete terms.
//! - [`escape`] decodes the backslash escapes used in free-text values.
//!
//! Only the `[Term]` subset of OBO 1.4 is supported. Graph wiring happens in
//! `phenograph-ontology`; nothing here touches graph-wide state.

pub mod entry;
pub mod error;
pub mod escape;
pub mod stanza;

pub use entry::{build_term, parse_terms, ParsedTerm, Tags, TermEntry, Terms};
pub use error::OboError;
pub use escape::unescape;
pub use stanza::{parse_tag_value_line, Stanza, StanzaReader, TagValue};
