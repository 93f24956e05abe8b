//! Metadata header parsing
//!
//! A source document starts with `key: value` lines, closed by a separator
//! line of dashes (or a blank line), followed by the markdown body:
//!
//! ```text
//! title: Hello
//! date: 14-10-2026
//! tags: rust, blog
//! -------------
//!
//! # Body
//! ```

use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;

use super::MarkdownRenderer;
use crate::error::{Error, Result};

lazy_static! {
    static ref HEADER_LINE: Regex =
        Regex::new(r"^([A-Za-z0-9_-]+)[ \t]*:[ \t]*(.*?)\s*$").unwrap();
}

/// A parsed source document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Header keys in the order they appear
    pub metadata: IndexMap<String, String>,
    /// Body converted to HTML
    pub body_html: String,
}

/// Turns the raw bytes of one source document into a [`Document`]
pub trait MetadataParser: Send + Sync {
    /// `source` names the document in error messages.
    fn parse(&self, source: &str, raw: &[u8]) -> Result<Document>;
}

/// Default parser: header block plus pulldown-cmark body
#[derive(Debug, Clone, Default)]
pub struct MarkdownDocumentParser;

impl MarkdownDocumentParser {
    pub fn new() -> Self {
        Self
    }
}

impl MetadataParser for MarkdownDocumentParser {
    fn parse(&self, source: &str, raw: &[u8]) -> Result<Document> {
        let text = std::str::from_utf8(raw)
            .map_err(|e| Error::malformed(source, format!("not valid UTF-8: {}", e)))?;

        let (metadata, body) =
            split_header(text).ok_or_else(|| Error::malformed(source, "missing metadata header"))?;

        let numbering = metadata
            .get("numbering")
            .map(|v| is_truthy(v))
            .unwrap_or(false);
        let body_html = MarkdownRenderer::new()
            .with_section_numbers(numbering)
            .render(body);

        Ok(Document {
            metadata,
            body_html,
        })
    }
}

/// Split a document into its header entries and the remaining body.
/// Returns `None` when the document has no header line at all.
pub fn split_header(text: &str) -> Option<(IndexMap<String, String>, &str)> {
    let mut rest = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut metadata = IndexMap::new();
    let mut opened = false;

    loop {
        let (line, tail) = match rest.find('\n') {
            Some(pos) => (&rest[..pos], &rest[pos + 1..]),
            None => (rest, ""),
        };

        if is_separator(line) {
            rest = tail;
            if metadata.is_empty() && !opened {
                // Opening fence of a `---` delimited block
                opened = true;
                continue;
            }
            break;
        }

        match HEADER_LINE.captures(line) {
            Some(caps) => {
                metadata.insert(caps[1].to_string(), unquote(&caps[2]).to_string());
                rest = tail;
                if rest.is_empty() {
                    break;
                }
            }
            None => break,
        }
    }

    if metadata.is_empty() {
        None
    } else {
        Some((metadata, rest))
    }
}

fn is_separator(line: &str) -> bool {
    let line = line.trim();
    line.len() >= 3 && line.chars().all(|c| c == '-')
}

/// Strip one pair of matching surrounding quotes
fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "yes" | "1"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "title: test\ndate: 14-10-2026\ntags: test\nname: test\nsummary: test\n-------------\n\n#test header\ntest content";

    #[test]
    fn test_parse_header_and_body() {
        let doc = MarkdownDocumentParser::new()
            .parse("test.md", SAMPLE.as_bytes())
            .unwrap();

        let keys: Vec<_> = doc.metadata.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["title", "date", "tags", "name", "summary"]);
        assert_eq!(doc.metadata["date"], "14-10-2026");
        assert_eq!(doc.body_html, "<h1>test header</h1>\n\n<p>test content</p>\n");
    }

    #[test]
    fn test_missing_header() {
        let err = MarkdownDocumentParser::new()
            .parse("plain.md", b"# Just a heading\n\nNo metadata here.")
            .unwrap_err();
        assert!(matches!(err, Error::MalformedMetadata { ref file, .. } if file == "plain.md"));
    }

    #[test]
    fn test_empty_document() {
        assert!(split_header("").is_none());
        assert!(split_header("---\n---\n").is_none());
    }

    #[test]
    fn test_yaml_style_fences() {
        let (meta, body) = split_header("---\ntitle: Fenced\n---\nBody text\n").unwrap();
        assert_eq!(meta["title"], "Fenced");
        assert_eq!(body, "Body text\n");
    }

    #[test]
    fn test_blank_line_ends_header() {
        let (meta, body) = split_header("title: A\nsummary: B\n\nNote: not metadata\n").unwrap();
        assert_eq!(meta.len(), 2);
        assert_eq!(body, "\nNote: not metadata\n");
    }

    #[test]
    fn test_values_are_trimmed_and_unquoted() {
        let (meta, _) = split_header("title:   Spaced out  \r\ntags: \"\"\nsummary: 'quoted'\n---\n").unwrap();
        assert_eq!(meta["title"], "Spaced out");
        assert_eq!(meta["tags"], "");
        assert_eq!(meta["summary"], "quoted");
    }

    #[test]
    fn test_header_only_document() {
        let (meta, body) = split_header("title: Only\nname: only").unwrap();
        assert_eq!(meta["name"], "only");
        assert_eq!(body, "");
    }

    #[test]
    fn test_invalid_utf8() {
        let err = MarkdownDocumentParser::new()
            .parse("bad.md", &[0x74, 0x3a, 0xff, 0xfe])
            .unwrap_err();
        assert!(err.to_string().contains("UTF-8"));
    }

    #[test]
    fn test_numbering_flag() {
        let doc = MarkdownDocumentParser::new()
            .parse("n.md", b"title: N\nnumbering: yes\n---\n## One\n\n## Two\n")
            .unwrap();
        assert!(doc.body_html.contains("<h2>1 One</h2>"));
        assert!(doc.body_html.contains("<h2>2 Two</h2>"));
    }
}
