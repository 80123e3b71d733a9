//! Markdown rendering for post bodies

use pulldown_cmark::{html, Options, Parser};

use crate::config::RenderConfig;

/// Markdown renderer
#[derive(Debug, Clone, Copy)]
pub struct MarkdownRenderer {
    options: Options,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer {
    /// Create a new markdown renderer with the default extensions
    pub fn new() -> Self {
        Self::with_config(&RenderConfig::default())
    }

    /// Create with custom settings
    pub fn with_config(config: &RenderConfig) -> Self {
        // Never ENABLE_YAML_STYLE_METADATA_BLOCKS: front-matter is stripped
        // before the body gets here
        let mut options = Options::empty();
        options.set(Options::ENABLE_TABLES, config.tables);
        options.set(Options::ENABLE_FOOTNOTES, config.footnotes);
        options.set(Options::ENABLE_STRIKETHROUGH, config.strikethrough);
        options.set(Options::ENABLE_TASKLISTS, config.tasklists);
        options.set(Options::ENABLE_SMART_PUNCTUATION, config.smart_punctuation);
        Self { options }
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.options);
        let mut html_output = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut html_output, parser);
        html_output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_markdown() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("# Hello\n\nThis is **bold** text.");
        assert!(html.contains("<h1>Hello</h1>"));
        assert!(html.contains("<strong>bold</strong>"));
    }

    #[test]
    fn test_fenced_code_keeps_language() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("```rust\nfn main() {}\n```");
        assert!(html.contains(r#"<code class="language-rust">"#));
    }

    #[test]
    fn test_tables_can_be_disabled() {
        let table = "| a | b |\n|---|---|\n| 1 | 2 |";
        assert!(MarkdownRenderer::new().render(table).contains("<table>"));

        let config = RenderConfig {
            tables: false,
            ..RenderConfig::default()
        };
        let html = MarkdownRenderer::with_config(&config).render(table);
        assert!(!html.contains("<table>"));
    }

    #[test]
    fn test_smart_punctuation() {
        let config = RenderConfig {
            smart_punctuation: true,
            ..RenderConfig::default()
        };
        let html = MarkdownRenderer::with_config(&config).render("\"quoted\"");
        assert!(html.contains('\u{201c}'));
    }
}
