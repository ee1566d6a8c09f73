//! Markdown rendering with heading anchors and syntax highlighting

use lazy_static::lazy_static;
use pulldown_cmark::{
    html, CodeBlockKind, CowStr, Event, LinkType, Options, Parser, Tag, TagEnd, TextMergeStream,
};
use regex::Regex;
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use super::outline::{annotate_headings, TocItem};
use crate::config::{MarkdownConfig, Theme};

lazy_static! {
    static ref BARE_URL: Regex = Regex::new(r"(?:https?://|www\.)[^\s<>]+").unwrap();
}

/// GitHub-flavoured parser options shared by rendering and outline extraction
fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_GFM
}

/// Parse markdown into an owned event list
pub(crate) fn parse_events(markdown: &str) -> Vec<Event<'_>> {
    Parser::new_ext(markdown, parser_options()).collect()
}

/// Rendered HTML together with the outline of its headings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMarkdown {
    pub html: String,
    pub outline: Vec<TocItem>,
}

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    config: MarkdownConfig,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_config(MarkdownConfig::default())
    }

    /// Create with custom settings
    pub fn with_config(config: MarkdownConfig) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            config,
        }
    }

    /// Render markdown to HTML and collect its outline in one pass
    pub fn render(&self, markdown: &str, theme: Theme) -> RenderedMarkdown {
        let mut events = parse_events(markdown);
        let outline = annotate_headings(&mut events);
        let events = self.rewrite(events, theme);

        let mut html_output = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut html_output, events.into_iter());

        RenderedMarkdown {
            html: html_output,
            outline,
        }
    }

    /// Render markdown to HTML
    pub fn render_to_html(&self, markdown: &str, theme: Theme) -> String {
        self.render(markdown, theme).html
    }

    /// Apply line breaks, autolinks and code highlighting to the event stream
    fn rewrite<'a>(&self, events: Vec<Event<'a>>, theme: Theme) -> Vec<Event<'a>> {
        let mut out = Vec::with_capacity(events.len());
        let mut code_block: Option<(Option<String>, String)> = None;
        let mut in_code = false;
        let mut link_depth = 0usize;

        // Adjacent text events are merged so a URL split by the parser stays whole
        for event in TextMergeStream::new(events.into_iter()) {
            match event {
                Event::Start(Tag::CodeBlock(kind)) if self.config.highlight.enable => {
                    code_block = Some((code_block_lang(&kind), String::new()));
                }
                Event::End(TagEnd::CodeBlock) if code_block.is_some() => {
                    if let Some((lang, code)) = code_block.take() {
                        let highlighted = self.highlight_code(&code, lang.as_deref(), theme);
                        out.push(Event::Html(CowStr::from(highlighted)));
                    }
                }
                Event::Text(text) if code_block.is_some() => {
                    if let Some((_, code)) = code_block.as_mut() {
                        code.push_str(&text);
                    }
                }
                Event::Start(Tag::CodeBlock(kind)) => {
                    in_code = true;
                    out.push(Event::Start(Tag::CodeBlock(kind)));
                }
                Event::End(TagEnd::CodeBlock) => {
                    in_code = false;
                    out.push(Event::End(TagEnd::CodeBlock));
                }
                Event::Start(Tag::Link {
                    link_type,
                    dest_url,
                    title,
                    id,
                }) => {
                    link_depth += 1;
                    out.push(Event::Start(Tag::Link {
                        link_type,
                        dest_url,
                        title,
                        id,
                    }));
                }
                Event::End(TagEnd::Link) => {
                    link_depth = link_depth.saturating_sub(1);
                    out.push(Event::End(TagEnd::Link));
                }
                Event::SoftBreak if self.config.breaks => out.push(Event::HardBreak),
                Event::Text(text) if self.config.autolink && !in_code && link_depth == 0 => {
                    autolink_text(text, &mut out);
                }
                other => out.push(other),
            }
        }

        out
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: Option<&str>, theme: Theme) -> String {
        let lang = lang.unwrap_or("text");

        // Try to find syntax for the language
        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme_name = self.config.highlight.theme_name(theme);
        let Some(syntect_theme) = self.theme_set.themes.get(theme_name) else {
            tracing::warn!("Unknown highlight theme {:?}, rendering plain code", theme_name);
            return plain_code_block(code, lang);
        };

        match highlighted_html_for_string(code, &self.syntax_set, syntax, syntect_theme) {
            Ok(highlighted) => {
                if self.config.highlight.line_number {
                    add_line_numbers(&highlighted, code, lang)
                } else {
                    format!(
                        r#"<figure class="highlight {}">{}</figure>"#,
                        html_escape(lang),
                        highlighted
                    )
                }
            }
            Err(e) => {
                tracing::debug!("Highlighting failed for {}: {}", lang, e);
                plain_code_block(code, lang)
            }
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Language token of a fenced block's info string
fn code_block_lang(kind: &CodeBlockKind<'_>) -> Option<String> {
    match kind {
        CodeBlockKind::Fenced(info) => info.split_whitespace().next().map(str::to_string),
        CodeBlockKind::Indented => None,
    }
}

/// Split a text event around bare URLs, wrapping each in a link
///
/// Inline markup ends the URL: `https://a.example/x*y*z` links only up to `x`.
fn autolink_text<'a>(text: CowStr<'a>, out: &mut Vec<Event<'a>>) {
    if !BARE_URL.is_match(&text) {
        out.push(Event::Text(text));
        return;
    }

    let mut last = 0;
    for m in BARE_URL.find_iter(&text) {
        let url = m
            .as_str()
            .trim_end_matches(['.', ',', ':', ';', '!', '?', ')', '\'', '"']);
        if url.ends_with("://") || url == "www." {
            continue;
        }

        if m.start() > last {
            out.push(Event::Text(CowStr::from(text[last..m.start()].to_string())));
        }

        let href = if url.starts_with("www.") {
            format!("http://{}", url)
        } else {
            url.to_string()
        };
        out.push(Event::Start(Tag::Link {
            link_type: LinkType::Autolink,
            dest_url: CowStr::from(href),
            title: CowStr::from(""),
            id: CowStr::from(""),
        }));
        out.push(Event::Text(CowStr::from(url.to_string())));
        out.push(Event::End(TagEnd::Link));

        last = m.start() + url.len();
    }

    if last < text.len() {
        out.push(Event::Text(CowStr::from(text[last..].to_string())));
    }
}

/// Wrap highlighted code in a table with a line-number gutter
fn add_line_numbers(highlighted: &str, code: &str, lang: &str) -> String {
    let line_count = code.lines().count().max(1);
    let gutter = (1..=line_count)
        .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code">{}</td></tr></table></figure>"#,
        html_escape(lang),
        gutter,
        highlighted
    )
}

fn plain_code_block(code: &str, lang: &str) -> String {
    format!(
        r#"<pre><code class="language-{}">{}</code></pre>"#,
        html_escape(lang),
        html_escape(code)
    )
}

/// Simple HTML escaping
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HighlightConfig;
    use crate::content::extract_outline;

    fn plain_renderer() -> MarkdownRenderer {
        MarkdownRenderer::with_config(MarkdownConfig {
            highlight: HighlightConfig {
                enable: false,
                ..Default::default()
            },
            ..Default::default()
        })
    }

    #[test]
    fn test_render_basic_markdown() {
        let renderer = plain_renderer();
        let html = renderer.render_to_html("# Hello World\n\nThis is a test.", Theme::Light);
        assert!(html.contains(r#"<h1 id="hello-world-0" class="heading-1">Hello World</h1>"#));
        assert!(html.contains("<p>This is a test.</p>"));
    }

    #[test]
    fn test_heading_ids_match_outline() {
        let md = "# Intro\n\n## Setup `env`\n\npara\n\n# Intro\n\n### *Wrap* up\n";
        let renderer = plain_renderer();
        let rendered = renderer.render(md, Theme::Light);

        assert_eq!(rendered.outline, extract_outline(md));
        for item in &rendered.outline {
            let attr = format!(r#"id="{}" class="heading-{}""#, item.id, item.level);
            assert!(rendered.html.contains(&attr), "missing {}", attr);
        }
        assert_eq!(rendered.outline[0].id, "intro-0");
        assert_eq!(rendered.outline[2].id, "intro-2");
    }

    #[test]
    fn test_soft_breaks_become_line_breaks() {
        let html = plain_renderer().render_to_html("first line\nsecond line", Theme::Light);
        assert!(html.contains("first line<br />"));
    }

    #[test]
    fn test_soft_breaks_can_be_disabled() {
        let renderer = MarkdownRenderer::with_config(MarkdownConfig {
            breaks: false,
            ..Default::default()
        });
        let html = renderer.render_to_html("first line\nsecond line", Theme::Light);
        assert!(!html.contains("<br />"));
    }

    #[test]
    fn test_gfm_extensions() {
        let md = "| a | b |\n|---|---|\n| 1 | 2 |\n\n~~gone~~\n\n- [x] done\n- [ ] todo\n";
        let html = plain_renderer().render_to_html(md, Theme::Light);
        assert!(html.contains("<table>"));
        assert!(html.contains("<del>gone</del>"));
        assert!(html.contains(r#"type="checkbox""#));
    }

    #[test]
    fn test_bare_urls_are_linked() {
        let html = plain_renderer().render_to_html(
            "See https://example.com/docs. Or www.rust-lang.org, today.",
            Theme::Light,
        );
        assert!(html.contains(r#"<a href="https://example.com/docs">https://example.com/docs</a>."#));
        assert!(html.contains(r#"<a href="http://www.rust-lang.org">www.rust-lang.org</a>,"#));
    }

    #[test]
    fn test_existing_links_and_code_are_not_autolinked() {
        let md = "[https://a.example](https://a.example) and `https://b.example`";
        let html = plain_renderer().render_to_html(md, Theme::Light);
        assert_eq!(html.matches("<a ").count(), 1);
        assert!(html.contains("<code>https://b.example</code>"));
    }

    #[test]
    fn test_bare_url_with_brackets_stays_whole() {
        let html = plain_renderer().render_to_html("See www.example.com/a[1] here", Theme::Light);
        assert!(html.contains(">www.example.com/a[1]</a> here"));
    }

    #[test]
    fn test_emphasis_ends_bare_url() {
        let html = plain_renderer().render_to_html("https://example.com/x*y*z", Theme::Light);
        assert!(html.contains(r#"<a href="https://example.com/x">https://example.com/x</a>"#));
        assert!(html.contains("<em>y</em>"));
    }

    #[test]
    fn test_code_block_language_is_escaped() {
        let md = "```a\"><x\nbody\n```";
        let highlighted = MarkdownRenderer::new().render_to_html(md, Theme::Light);
        assert!(highlighted.contains(r#"<figure class="highlight a&quot;&gt;&lt;x">"#));
        assert!(!highlighted.contains("<x"));

        let numbered = MarkdownRenderer::with_config(MarkdownConfig {
            highlight: HighlightConfig {
                line_number: true,
                ..Default::default()
            },
            ..Default::default()
        })
        .render_to_html(md, Theme::Light);
        assert!(numbered.contains(r#"<figure class="highlight a&quot;&gt;&lt;x">"#));
    }

    #[test]
    fn test_plain_code_block_when_highlight_disabled() {
        let html = plain_renderer().render_to_html("```rust\nfn main() {}\n```", Theme::Light);
        assert!(html.contains(r#"<pre><code class="language-rust">fn main() {}"#));
    }

    #[test]
    fn test_render_code_block_highlighted() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render_to_html("```rust\nfn main() {}\n```", Theme::Dark);
        assert!(html.contains(r#"<figure class="highlight rust">"#));
        assert!(html.contains("<span"));
    }

    #[test]
    fn test_theme_changes_highlight_colours() {
        let renderer = MarkdownRenderer::new();
        let md = "```rust\nlet x = 1;\n```";
        let light = renderer.render_to_html(md, Theme::Light);
        let dark = renderer.render_to_html(md, Theme::Dark);
        assert_ne!(light, dark);
    }

    #[test]
    fn test_line_numbers() {
        let renderer = MarkdownRenderer::with_config(MarkdownConfig {
            highlight: HighlightConfig {
                line_number: true,
                ..Default::default()
            },
            ..Default::default()
        });
        let html = renderer.render_to_html("```\na\nb\n```", Theme::Light);
        assert!(html.contains(r#"<span class="line-number">2</span>"#));
        assert!(!html.contains(r#"<span class="line-number">3</span>"#));
    }

    #[test]
    fn test_unknown_highlight_theme_falls_back_to_plain() {
        let renderer = MarkdownRenderer::with_config(MarkdownConfig {
            highlight: HighlightConfig {
                dark_theme: "no-such-theme".to_string(),
                ..Default::default()
            },
            ..Default::default()
        });
        let html = renderer.render_to_html("```\n<tag>\n```", Theme::Dark);
        assert!(html.contains(r#"<pre><code class="language-text">&lt;tag&gt;"#));
    }
}
