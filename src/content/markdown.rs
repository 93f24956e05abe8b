//! Markdown rendering

use lazy_static::lazy_static;
use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag};
use regex::Regex;
use std::borrow::Cow;

lazy_static! {
    /// `#Title` style headings that CommonMark would read as a paragraph
    static ref TIGHT_HEADING: Regex = Regex::new(r"^(#{1,6})([^#\s])").unwrap();
}

/// Markdown renderer over pulldown-cmark
#[derive(Debug, Clone, Default)]
pub struct MarkdownRenderer {
    section_numbers: bool,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefix every heading with its dotted section number
    pub fn with_section_numbers(mut self, enabled: bool) -> Self {
        self.section_numbers = enabled;
        self
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> String {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS;
        let source = normalize_headings(markdown);
        let parser = Parser::new_ext(&source, options);

        let mut events: Vec<Event> = Vec::new();
        let mut depth = 0usize;
        let mut wrote_block = false;
        let mut sections = SectionCounter::default();

        for event in parser {
            match event {
                Event::Start(tag) => {
                    if depth == 0 && wrote_block {
                        events.push(Event::Html(CowStr::Borrowed("\n")));
                    }
                    depth += 1;
                    let level = match &tag {
                        Tag::Heading { level, .. } => Some(*level as usize),
                        _ => None,
                    };
                    events.push(Event::Start(tag));
                    if let Some(level) = level.filter(|_| self.section_numbers) {
                        events.push(Event::Text(CowStr::from(format!(
                            "{} ",
                            sections.next(level)
                        ))));
                    }
                }
                Event::End(tag) => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        wrote_block = true;
                    }
                    events.push(Event::End(tag));
                }
                Event::Rule if depth == 0 => {
                    if wrote_block {
                        events.push(Event::Html(CowStr::Borrowed("\n")));
                    }
                    wrote_block = true;
                    events.push(Event::Rule);
                }
                other => events.push(other),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());
        html_output
    }
}

/// Insert the missing space in `#Title` headings, leaving fenced code alone.
fn normalize_headings(markdown: &str) -> Cow<'_, str> {
    if !markdown.contains('#') {
        return Cow::Borrowed(markdown);
    }

    let mut output = String::with_capacity(markdown.len() + 16);
    let mut fence: Option<&str> = None;

    for line in markdown.split_inclusive('\n') {
        let trimmed = line.trim_start();
        let marker = if trimmed.starts_with("```") {
            Some("```")
        } else if trimmed.starts_with("~~~") {
            Some("~~~")
        } else {
            None
        };

        match (fence, marker) {
            (None, Some(m)) => {
                fence = Some(m);
                output.push_str(line);
            }
            (Some(open), Some(m)) if open == m => {
                fence = None;
                output.push_str(line);
            }
            (None, None) => output.push_str(&TIGHT_HEADING.replace(line, "$1 $2")),
            _ => output.push_str(line),
        }
    }

    Cow::Owned(output)
}

/// Dotted section numbers, counted from the outermost heading level in use
#[derive(Debug, Default)]
struct SectionCounter {
    counts: [usize; 6],
}

impl SectionCounter {
    fn next(&mut self, level: usize) -> String {
        let index = level.clamp(1, 6) - 1;
        self.counts[index] += 1;
        for deeper in &mut self.counts[index + 1..] {
            *deeper = 0;
        }

        self.counts[..=index]
            .iter()
            .skip_while(|count| **count == 0)
            .map(|count| count.to_string())
            .collect::<Vec<_>>()
            .join(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_basic_markdown() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("# Hello World\n\nThis is a test.");
        assert_eq!(html, "<h1>Hello World</h1>\n\n<p>This is a test.</p>\n");
    }

    #[test]
    fn test_tight_heading() {
        let html = MarkdownRenderer::new().render("#test header\ntest content");
        assert_eq!(html, "<h1>test header</h1>\n\n<p>test content</p>\n");
    }

    #[test]
    fn test_fenced_code_untouched() {
        let html = MarkdownRenderer::new().render("```python\n#comment\n```\n");
        assert!(html.contains(r#"<pre><code class="language-python">#comment"#));
        assert!(!html.contains("<h1>"));
    }

    #[test]
    fn test_extensions() {
        let renderer = MarkdownRenderer::new();

        let html = renderer.render("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));

        let html = renderer.render("~~gone~~");
        assert!(html.contains("<del>gone</del>"));

        let html = renderer.render("- [x] done\n- [ ] todo\n");
        assert!(html.contains(r#"type="checkbox""#));

        let html = renderer.render("Text[^1]\n\n[^1]: A note.\n");
        assert!(html.contains("footnote-definition"));
    }

    #[test]
    fn test_section_numbers() {
        let renderer = MarkdownRenderer::new().with_section_numbers(true);
        let html = renderer.render("## Intro\n\n## Setup\n\n### Install\n\n## Usage\n");
        assert!(html.contains("<h2>1 Intro</h2>"));
        assert!(html.contains("<h2>2 Setup</h2>"));
        assert!(html.contains("<h3>2.1 Install</h3>"));
        assert!(html.contains("<h2>3 Usage</h2>"));
    }
}
