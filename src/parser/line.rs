// Single-line GEDCOM tokenizer.
//
// A line is `LEVEL [@XREF@] TAG [VALUE]`. The tokenizer has no knowledge of
// genealogy semantics; it only splits tokens and preserves the value text
// verbatim, internal spaces included.

/// One successfully tokenized line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    /// Leading level number
    pub level: usize,
    /// Cross-reference id without the surrounding `@` delimiters
    pub xref: Option<String>,
    /// Record tag, as written
    pub tag: String,
    /// Remaining text after the tag, if any
    pub value: Option<String>,
}

/// Why a line failed to tokenize
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineError {
    /// Nothing but whitespace
    Blank,
    /// First token is not a non-negative integer
    NoLevel(String),
    /// Level parsed but no tag followed
    NoTag,
}

/// Check whether a token is a cross-reference id, `@...@` with content
pub fn is_xref_token(token: &str) -> bool {
    token.len() > 2 && token.starts_with('@') && token.ends_with('@')
}

/// Strip the `@` delimiters from a cross-reference token
fn strip_xref(token: &str) -> String {
    token[1..token.len() - 1].to_string()
}

/// Tokenize one line into level, optional xref, tag, and value
pub fn tokenize(line: &str) -> Result<RawLine, LineError> {
    let trimmed = line.trim_start().trim_end_matches(&['\r', ' ', '\t'][..]);
    if trimmed.is_empty() {
        return Err(LineError::Blank);
    }

    let (first, rest) = split_token(trimmed);
    let level: usize = first
        .parse()
        .map_err(|_| LineError::NoLevel(first.to_string()))?;

    let rest = rest.ok_or(LineError::NoTag)?;
    let (second, after_second) = split_token(rest);

    if is_xref_token(second) {
        let rest = after_second.ok_or(LineError::NoTag)?;
        let (tag, value) = split_token(rest);
        Ok(RawLine {
            level,
            xref: Some(strip_xref(second)),
            tag: tag.to_string(),
            value: value.map(str::to_string),
        })
    } else {
        Ok(RawLine {
            level,
            xref: None,
            tag: second.to_string(),
            value: after_second.map(str::to_string),
        })
    }
}

/// Split off the first whitespace-delimited token; the remainder keeps its
/// internal spacing
fn split_token(s: &str) -> (&str, Option<&str>) {
    match s.split_once(' ') {
        Some((head, tail)) => {
            let tail = tail.trim_start_matches(' ');
            if tail.is_empty() {
                (head, None)
            } else {
                (head, Some(tail))
            }
        }
        None => (s, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_line() {
        let line = tokenize("1 SEX M").unwrap();
        assert_eq!(line.level, 1);
        assert_eq!(line.xref, None);
        assert_eq!(line.tag, "SEX");
        assert_eq!(line.value.as_deref(), Some("M"));
    }

    #[test]
    fn test_line_with_xref() {
        let line = tokenize("0 @I1@ INDI").unwrap();
        assert_eq!(line.level, 0);
        assert_eq!(line.xref.as_deref(), Some("I1"));
        assert_eq!(line.tag, "INDI");
        assert_eq!(line.value, None);
    }

    #[test]
    fn test_value_keeps_internal_spaces() {
        let line = tokenize("1 NAME John  Q /Doe/").unwrap();
        assert_eq!(line.tag, "NAME");
        assert_eq!(line.value.as_deref(), Some("John  Q /Doe/"));
    }

    #[test]
    fn test_pointer_value_is_not_an_xref_definition() {
        // The @...@ here is a value, not a definition: it comes after the tag
        let line = tokenize("1 HUSB @I1@").unwrap();
        assert_eq!(line.xref, None);
        assert_eq!(line.tag, "HUSB");
        assert_eq!(line.value.as_deref(), Some("@I1@"));
    }

    #[test]
    fn test_blank_line() {
        assert_eq!(tokenize(""), Err(LineError::Blank));
        assert_eq!(tokenize("   "), Err(LineError::Blank));
        assert_eq!(tokenize("\r"), Err(LineError::Blank));
    }

    #[test]
    fn test_no_level() {
        assert_eq!(
            tokenize("HEAD"),
            Err(LineError::NoLevel("HEAD".to_string()))
        );
        assert_eq!(tokenize("-1 TAG"), Err(LineError::NoLevel("-1".to_string())));
    }

    #[test]
    fn test_level_without_tag() {
        assert_eq!(tokenize("0"), Err(LineError::NoTag));
        assert_eq!(tokenize("0 @I1@"), Err(LineError::NoTag));
    }

    #[test]
    fn test_trailing_cr_stripped() {
        let line = tokenize("0 HEAD\r").unwrap();
        assert_eq!(line.tag, "HEAD");
        assert_eq!(line.value, None);
    }

    #[test]
    fn test_leading_whitespace_tolerated() {
        let line = tokenize("  2 DATE 2 JAN 1990").unwrap();
        assert_eq!(line.level, 2);
        assert_eq!(line.value.as_deref(), Some("2 JAN 1990"));
    }

    #[test]
    fn test_is_xref_token() {
        assert!(is_xref_token("@I1@"));
        assert!(is_xref_token("@FAM_22@"));
        assert!(!is_xref_token("@@"));
        assert!(!is_xref_token("@I1"));
        assert!(!is_xref_token("I1@"));
        assert!(!is_xref_token("INDI"));
    }
}
