//! Heading anchors and table of contents
//!
//! Anchors and the outline are produced by one pass over the parsed event
//! stream, so every outline entry links to an id that exists in the HTML.

use lazy_static::lazy_static;
use pulldown_cmark::{CowStr, Event, Tag, TagEnd};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::markdown::parse_events;

lazy_static! {
    static ref NON_ANCHOR_CHARS: Regex = Regex::new(r"[^\w\s-]").unwrap();
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
}

/// One heading in the table of contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocItem {
    /// Anchor id, unique within the document
    pub id: String,
    /// Heading text with inline markup stripped
    pub text: String,
    /// Heading level, 1 to 6
    pub level: u8,
}

/// Anchor id for the `index`-th heading of a document
///
/// ```
/// assert_eq!(mdblog::content::anchor_id("Hello, World!", 3), "hello-world-3");
/// ```
pub fn anchor_id(text: &str, index: usize) -> String {
    let lowered = text.trim().to_lowercase();
    let stripped = NON_ANCHOR_CHARS.replace_all(&lowered, "");
    let slug = WHITESPACE_RUN.replace_all(&stripped, "-");
    format!("{}-{}", slug, index)
}

/// Extract the outline of a markdown document
pub fn extract_outline(markdown: &str) -> Vec<TocItem> {
    let mut events = parse_events(markdown);
    annotate_headings(&mut events)
}

/// Attach `id` and `heading-<level>` class to every heading in place and
/// return the matching outline.
///
/// Headings with no text get no anchor and do not advance the index.
pub(crate) fn annotate_headings(events: &mut [Event<'_>]) -> Vec<TocItem> {
    let mut outline = Vec::new();
    let mut open: Option<(usize, String)> = None;
    let mut image_depth = 0usize;

    for i in 0..events.len() {
        let mut closed = false;

        match &events[i] {
            Event::Start(Tag::Heading { .. }) => open = Some((i, String::new())),
            Event::End(TagEnd::Heading(_)) => closed = true,
            Event::Start(Tag::Image { .. }) => image_depth += 1,
            Event::End(TagEnd::Image) => image_depth = image_depth.saturating_sub(1),
            Event::Text(text) | Event::Code(text) if image_depth == 0 => {
                if let Some((_, buf)) = open.as_mut() {
                    buf.push_str(text);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some((_, buf)) = open.as_mut() {
                    buf.push(' ');
                }
            }
            _ => {}
        }

        if !closed {
            continue;
        }

        let Some((start, text)) = open.take() else {
            continue;
        };
        let text = text.trim();
        if text.is_empty() {
            continue;
        }

        if let Event::Start(Tag::Heading {
            level, id, classes, ..
        }) = &mut events[start]
        {
            let level = *level as u8;
            let anchor = anchor_id(text, outline.len());
            *id = Some(CowStr::from(anchor.clone()));
            classes.push(CowStr::from(format!("heading-{}", level)));
            outline.push(TocItem {
                id: anchor,
                text: text.to_string(),
                level,
            });
        }
    }

    outline
}
