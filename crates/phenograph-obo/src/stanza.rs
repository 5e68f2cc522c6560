//! Stanza parser for OBO documents.
//!
//! The grammar handled here (OBO 1.4, `[Term]` subset):
//!
//! ```text
//! <header line>*            -- everything before the first `[` line, ignored
//! ( "[Term]"
//!   <tag> ": " <value> [" {" <modifiers> "}"] [" ! " <comment>]
//! )*
//! ```
//!
//! Blank lines and lines starting with `!` are skipped everywhere. A stanza
//! only ends when the next `[` line (or end of input) is read, so parsing is
//! strictly sequential.

use crate::error::OboError;
use indexmap::IndexMap;
use std::io::{BufRead, Lines};

/// The only stanza header this parser accepts.
pub const TERM_HEADER: &str = "[Term]";

/// One `[Term]` block: tag -> values, both in encounter order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stanza {
    /// 1-based line of the `[Term]` header.
    pub line: usize,
    pub tags: IndexMap<String, Vec<String>>,
}

impl Stanza {
    pub fn new(line: usize) -> Self {
        Self {
            line,
            tags: IndexMap::new(),
        }
    }

    pub fn push(&mut self, tag: &str, value: &str) {
        self.tags
            .entry(tag.to_string())
            .or_default()
            .push(value.to_string());
    }

    /// Values of `tag`, empty if the tag never occurred.
    #[cfg(test)]
    pub fn values(&self, tag: &str) -> &[String] {
        self.tags.get(tag).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains_key(tag)
    }
}

/// A tokenized `tag: value` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagValue<'a> {
    pub tag: &'a str,
    pub value: &'a str,
    /// Trailing `! comment`. Parsed but not kept in the term model.
    pub comment: Option<&'a str>,
}

/// Tokenize a single `tag: value {modifiers} ! comment` line.
///
/// Trailing modifiers are discarded. Errors carry a message only; the caller
/// attaches the line number.
pub fn parse_tag_value_line(line: &str) -> Result<TagValue<'_>, String> {
    let Some((tag, rest)) = line.split_once(": ") else {
        return Err(format!("expected `<tag>: <value>`, got `{line}`"));
    };
    if tag.contains('\\') {
        return Err(format!("escape sequence in tag `{tag}`"));
    }

    let (value, comment) = match rest.split_once(" ! ") {
        Some((value, comment)) => (value, Some(comment)),
        None => (rest, None),
    };
    let value = match value.split_once(" {") {
        Some((value, _modifiers)) => value,
        None => value,
    };

    Ok(TagValue {
        tag,
        value,
        comment,
    })
}

/// Streaming reader yielding one [`Stanza`] per `[Term]` block.
///
/// One-shot: once the input is exhausted or an error was returned, the
/// reader yields `None` forever.
pub struct StanzaReader<R> {
    lines: Lines<R>,
    line_no: usize,
    /// Bracketed line that closed the previous stanza (or the header).
    pending: Option<(usize, String)>,
    header_skipped: bool,
    done: bool,
}

impl<R: BufRead> StanzaReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
            pending: None,
            header_skipped: false,
            done: false,
        }
    }

    /// Next line that is neither blank nor a `!` comment.
    fn next_significant(&mut self) -> Result<Option<(usize, String)>, OboError> {
        for line in self.lines.by_ref() {
            let mut line = line?;
            self.line_no += 1;
            if line.ends_with('\r') {
                line.pop();
            }
            if line.trim().is_empty() || line.starts_with('!') {
                continue;
            }
            return Ok(Some((self.line_no, line)));
        }
        Ok(None)
    }

    fn skip_header(&mut self) -> Result<(), OboError> {
        while let Some((line_no, line)) = self.next_significant()? {
            if line.starts_with('[') {
                self.pending = Some((line_no, line));
                break;
            }
        }
        self.header_skipped = true;
        Ok(())
    }

    fn read_stanza(&mut self) -> Result<Option<Stanza>, OboError> {
        if !self.header_skipped {
            self.skip_header()?;
        }
        let Some((header_line, header)) = self.pending.take() else {
            return Ok(None);
        };
        if header != TERM_HEADER {
            return Err(OboError::format(
                header_line,
                format!("unsupported stanza `{header}`, only {TERM_HEADER} is supported"),
            ));
        }

        let mut stanza = Stanza::new(header_line);
        while let Some((line_no, line)) = self.next_significant()? {
            if line.starts_with('[') {
                self.pending = Some((line_no, line));
                break;
            }
            let tv = parse_tag_value_line(&line).map_err(|m| OboError::format(line_no, m))?;
            stanza.push(tv.tag, tv.value);
        }
        Ok(Some(stanza))
    }
}

impl<R: BufRead> Iterator for StanzaReader<R> {
    type Item = Result<Stanza, OboError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_stanza() {
            Ok(Some(stanza)) => Some(Ok(stanza)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

impl<R: BufRead> std::iter::FusedIterator for StanzaReader<R> {}
