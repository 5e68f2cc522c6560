//! Term entries and the stanza → entry conversion.

use crate::error::OboError;
use crate::escape::unescape;
use crate::stanza::{Stanza, StanzaReader};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::io::BufRead;
use std::iter::FusedIterator;

pub const TAG_ID: &str = "id";
pub const TAG_NAME: &str = "name";
pub const TAG_IS_A: &str = "is_a";
pub const TAG_ALT_ID: &str = "alt_id";
pub const TAG_IS_OBSOLETE: &str = "is_obsolete";

/// Metadata tags of a term, in order of first appearance.
pub type Tags = IndexMap<String, Vec<String>>;

/// A single ontology term, e.g. `HP:0000118 "Phenotypic abnormality"`.
///
/// Edges are not stored here; the graph owns them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermEntry {
    pub id: String,
    pub name: String,
    /// Every tag other than `id`, `name`, `is_a` and `alt_id`, verbatim and
    /// in order of first appearance.
    pub tags: Tags,
}

impl TermEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tags: IndexMap::new(),
        }
    }

    /// Raw values of a metadata tag.
    pub fn tag_values(&self, tag: &str) -> &[String] {
        self.tags.get(tag).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Values of a free-text tag (`def`, `comment`, ...) with escapes decoded.
    pub fn text_values(&self, tag: &str) -> Vec<String> {
        self.tag_values(tag).iter().map(|v| unescape(v)).collect()
    }
}

/// Output of the entry builder: the entry plus the ids it still needs
/// resolved against the whole ontology.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTerm {
    pub entry: TermEntry,
    pub parent_ids: Vec<String>,
    pub alt_ids: Vec<String>,
}

fn take_exactly_one(
    tags: &mut Tags,
    tag: &str,
    line: usize,
) -> Result<String, OboError> {
    let mut values = tags.shift_remove(tag).unwrap_or_default();
    if values.len() != 1 {
        return Err(OboError::format(
            line,
            format!(
                "stanza must have exactly one `{tag}`, found {}",
                values.len()
            ),
        ));
    }
    Ok(values.remove(0))
}

/// Convert one stanza into a [`ParsedTerm`].
///
/// Returns `Ok(None)` for obsolete terms. `id` and `name` are checked first,
/// so a malformed obsolete stanza is still an error.
pub fn build_term(stanza: Stanza) -> Result<Option<ParsedTerm>, OboError> {
    let obsolete = stanza.contains(TAG_IS_OBSOLETE);
    let Stanza { line, mut tags } = stanza;

    let id = take_exactly_one(&mut tags, TAG_ID, line)?;
    let name = take_exactly_one(&mut tags, TAG_NAME, line)?;
    let parent_ids = tags.shift_remove(TAG_IS_A).unwrap_or_default();
    let alt_ids = tags.shift_remove(TAG_ALT_ID).unwrap_or_default();

    if obsolete {
        tracing::debug!(%id, line, "skipping obsolete term");
        return Ok(None);
    }

    Ok(Some(ParsedTerm {
        entry: TermEntry { id, name, tags },
        parent_ids,
        alt_ids,
    }))
}

/// Iterator over the non-obsolete terms of an OBO document.
///
/// The first error ends the stream, whether it came from the stanza reader
/// or from [`build_term`].
pub struct Terms<R> {
    stanzas: StanzaReader<R>,
    done: bool,
}

impl<R: BufRead> Iterator for Terms<R> {
    type Item = Result<ParsedTerm, OboError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        for stanza in self.stanzas.by_ref() {
            match stanza.and_then(build_term) {
                Ok(Some(term)) => return Some(Ok(term)),
                Ok(None) => continue,
                Err(err) => {
                    self.done = true;
                    return Some(Err(err));
                }
            }
        }
        self.done = true;
        None
    }
}

impl<R: BufRead> FusedIterator for Terms<R> {}

/// Parse every `[Term]` stanza of `reader` into [`ParsedTerm`]s.
pub fn parse_terms<R: BufRead>(reader: R) -> Terms<R> {
    Terms {
        stanzas: StanzaReader::new(reader),
        done: false,
    }
}
