//! Markdown to plain-text outline for the preview tab.
//!
//! The outline keeps one output line per source line and marks structure
//! with plain-text prefixes (`H1  `, `• `, `| `, `[code]`) instead of styling,
//! so it reads the same in any terminal.
//!
//! Includes a small render cache to avoid re-parsing unchanged documents on
//! every frame.

use std::cell::RefCell;
use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

pub const EMPTY_PREVIEW: &str =
    "Preview is empty. Start writing markdown to see a formatted outline.";

const CACHE_MAX_ENTRIES: usize = 64;

thread_local! {
    static PREVIEW_CACHE: RefCell<HashMap<u64, String>> = RefCell::new(HashMap::new());
}

pub fn clear_preview_cache() {
    PREVIEW_CACHE.with(|cache| cache.borrow_mut().clear());
}

fn content_hash(content: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    hasher.finish()
}

/// Render `markdown` as a readable outline.
#[must_use]
pub fn render_preview(markdown: &str) -> String {
    if markdown.trim().is_empty() {
        return EMPTY_PREVIEW.to_string();
    }

    let key = content_hash(markdown);
    if let Some(hit) = PREVIEW_CACHE.with(|cache| cache.borrow().get(&key).cloned()) {
        return hit;
    }

    let rendered = OutlineRenderer::default().render(markdown);

    PREVIEW_CACHE.with(|cache| {
        let mut cache = cache.borrow_mut();
        if cache.len() >= CACHE_MAX_ENTRIES {
            let evict: Vec<u64> = cache.keys().take(CACHE_MAX_ENTRIES / 2).copied().collect();
            for k in evict {
                cache.remove(&k);
            }
        }
        cache.insert(key, rendered.clone());
    });

    rendered
}

#[derive(Default)]
struct OutlineRenderer {
    lines: Vec<String>,
    current: String,
    /// Marker for the first line of the current list item.
    item_marker: Option<String>,
    /// `None` for bullet lists, `Some(next)` for ordered ones.
    lists: Vec<Option<u64>>,
    quote_depth: usize,
    heading: Option<HeadingLevel>,
    in_code_block: bool,
    link_targets: Vec<String>,
    /// Nesting depth of open tags; zero between top-level blocks.
    depth: usize,
    /// Source offset where the previous top-level block ended.
    last_block_end: Option<usize>,
}

impl OutlineRenderer {
    fn render(mut self, source: &str) -> String {
        let parser = Parser::new_ext(source, Options::empty()).into_offset_iter();
        for (event, range) in parser {
            let top_level_start = self.depth == 0
                && matches!(event, Event::Start(_) | Event::Rule | Event::Html(_));
            if top_level_start {
                self.separate_blocks(source, range.start);
            }

            match event {
                Event::Start(tag) => {
                    self.depth += 1;
                    self.start_tag(tag);
                }
                Event::End(tag) => {
                    self.depth = self.depth.saturating_sub(1);
                    self.end_tag(tag);
                    if self.depth == 0 {
                        self.last_block_end = Some(range.end);
                    }
                }
                Event::Text(text) => self.handle_text(&text),
                Event::Code(code) => self.current.push_str(&code),
                Event::Html(html) | Event::InlineHtml(html) => {
                    self.handle_text(html.trim_end_matches('\n'));
                    if self.depth == 0 {
                        self.flush_line();
                        self.last_block_end = Some(range.end);
                    }
                }
                Event::SoftBreak | Event::HardBreak => self.flush_line(),
                Event::Rule => {
                    self.flush_line();
                    self.lines.push("---".to_string());
                    self.last_block_end = Some(range.end);
                }
                _ => {}
            }
        }
        self.flush_line();

        let out = self.lines.join("\n");
        let trimmed = out.trim();
        if trimmed.is_empty() {
            EMPTY_PREVIEW.to_string()
        } else {
            trimmed.to_string()
        }
    }

    /// Blank source lines between top-level blocks survive as one blank line.
    fn separate_blocks(&mut self, source: &str, start: usize) {
        let Some(end) = self.last_block_end else {
            return;
        };
        let content_end = source[..end.min(start)].trim_end().len();
        let gap = &source[content_end..start];
        if gap.matches('\n').count() >= 2 {
            self.lines.push(String::new());
        }
    }

    fn start_tag(&mut self, tag: Tag) {
        match tag {
            Tag::Heading { level, .. } => {
                self.flush_line();
                self.heading = Some(level);
            }
            Tag::CodeBlock(_) => {
                self.flush_line();
                self.in_code_block = true;
                self.lines.push("[code]".to_string());
            }
            Tag::List(start) => {
                self.flush_line();
                self.lists.push(start);
            }
            Tag::Item => {
                self.flush_line();
                let indent = "  ".repeat(self.lists.len().saturating_sub(1));
                let marker = match self.lists.last_mut() {
                    Some(Some(next)) => {
                        let marker = format!("{indent}{next}. ");
                        *next += 1;
                        marker
                    }
                    _ => format!("{indent}• "),
                };
                self.item_marker = Some(marker);
            }
            Tag::BlockQuote(_) => {
                self.flush_line();
                self.quote_depth += 1;
            }
            Tag::Link { dest_url, .. } => {
                self.link_targets.push(dest_url.to_string());
            }
            _ => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Heading(level) => {
                let text = std::mem::take(&mut self.current);
                let prefix = match level {
                    HeadingLevel::H1 => Some("H1"),
                    HeadingLevel::H2 => Some("H2"),
                    HeadingLevel::H3 => Some("H3"),
                    _ => None,
                };
                self.heading = None;
                match prefix {
                    Some(prefix) => self.push_line(format!("{prefix}  {}", text.to_uppercase())),
                    None => self.push_line(text),
                }
            }
            TagEnd::CodeBlock => {
                self.in_code_block = false;
                self.lines.push("[code]".to_string());
            }
            TagEnd::List(_) => {
                self.flush_line();
                self.lists.pop();
            }
            TagEnd::BlockQuote(_) => {
                self.flush_line();
                self.quote_depth = self.quote_depth.saturating_sub(1);
            }
            TagEnd::Link => {
                if let Some(url) = self.link_targets.pop()
                    && !url.is_empty()
                {
                    self.current.push_str(&format!(" ({url})"));
                }
            }
            TagEnd::Item | TagEnd::Paragraph => self.flush_line(),
            _ => {}
        }
    }

    fn handle_text(&mut self, text: &str) {
        if self.in_code_block {
            for line in text.lines() {
                self.lines.push(format!("    {line}"));
            }
            return;
        }
        self.current.push_str(text);
    }

    fn flush_line(&mut self) {
        if self.heading.is_some() {
            return;
        }
        if self.current.is_empty() && self.item_marker.is_none() {
            return;
        }
        let text = std::mem::take(&mut self.current);
        let line = match self.item_marker.take() {
            Some(marker) => format!("{marker}{text}").trim_end().to_string(),
            None => text,
        };
        self.push_line(line);
    }

    fn push_line(&mut self, line: String) {
        if self.quote_depth > 0 {
            let bars = "| ".repeat(self.quote_depth);
            self.lines.push(format!("{bars}{line}").trim_end().to_string());
        } else {
            self.lines.push(line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(markdown: &str) -> Vec<String> {
        render_preview(markdown).lines().map(str::to_owned).collect()
    }

    #[test]
    fn empty_input_shows_placeholder() {
        assert_eq!(render_preview(""), EMPTY_PREVIEW);
        assert_eq!(render_preview("   \n\t"), EMPTY_PREVIEW);
    }

    #[test]
    fn headings_and_lists() {
        assert_eq!(
            lines("# Title\n## Section\n- item one\n1. item two"),
            ["H1  TITLE", "H2  SECTION", "• item one", "1. item two"]
        );
    }

    #[test]
    fn third_level_heading_and_deeper() {
        let out = render_preview("### Small\n\n#### Tiny");
        assert!(out.contains("H3  SMALL"));
        assert!(out.contains("Tiny"));
        assert!(!out.contains("H4"));
    }

    #[test]
    fn inline_markers_are_stripped() {
        assert_eq!(
            render_preview("Some **bold** and *soft* and `code`."),
            "Some bold and soft and code."
        );
    }

    #[test]
    fn links_show_their_target() {
        assert_eq!(
            render_preview("See [the docs](https://example.com) today"),
            "See the docs (https://example.com) today"
        );
    }

    #[test]
    fn block_quotes_get_a_bar() {
        assert_eq!(render_preview("> quoted *line*"), "| quoted line");
    }

    #[test]
    fn fenced_code_is_indented_between_markers() {
        assert_eq!(
            lines("```\nlet x = 1;\nlet y = 2;\n```"),
            ["[code]", "    let x = 1;", "    let y = 2;", "[code]"]
        );
    }

    #[test]
    fn ordered_lists_keep_their_numbers() {
        assert_eq!(lines("3. three\n4. four"), ["3. three", "4. four"]);
    }

    #[test]
    fn blank_lines_between_blocks_are_kept() {
        assert_eq!(lines("# Title\n\nBody text"), ["H1  TITLE", "", "Body text"]);
    }

    #[test]
    fn soft_breaks_keep_source_lines() {
        assert_eq!(lines("first line\nsecond line"), ["first line", "second line"]);
    }

    #[test]
    fn cache_returns_same_result() {
        clear_preview_cache();
        let first = render_preview("# Cached\n- a");
        let second = render_preview("# Cached\n- a");
        assert_eq!(first, second);
        PREVIEW_CACHE.with(|cache| assert_eq!(cache.borrow().len(), 1));
    }
}
