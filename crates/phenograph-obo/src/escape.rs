//! Backslash escapes in OBO free-text values.
//!
//! Only `\n` and `\"` are defined. Unknown escapes are dropped with a
//! warning; they never fail a parse.

/// Decode the escape sequences of an OBO value.
pub fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('"') => out.push('"'),
            Some(other) => {
                tracing::warn!(escape = %other, "unknown escape character in OBO value");
            }
            None => {
                tracing::warn!("dangling backslash at end of OBO value");
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_newline_and_quote() {
        assert_eq!(unescape(r#"say \"hi\"\nbye"#), "say \"hi\"\nbye");
    }

    #[test]
    fn plain_text_is_unchanged() {
        assert_eq!(unescape("Phenotypic abnormality"), "Phenotypic abnormality");
    }

    #[test]
    fn unknown_escape_is_dropped() {
        assert_eq!(unescape(r"a\tb"), "ab");
        assert_eq!(unescape("trailing\\"), "trailing");
    }
}
