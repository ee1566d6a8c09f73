//! Show a single post's outline or rendered body

use anyhow::{Context, Result};

use crate::config::Theme;
use crate::content::{extract_outline, MarkdownRenderer, TocItem};
use crate::Blog;

/// Print the table of contents of a post
pub fn outline(blog: &Blog, slug: &str) -> Result<()> {
    let post = blog.loader().load_one(slug)?;
    let items = extract_outline(&post.content);

    if items.is_empty() {
        println!("{} has no headings", post.meta.title);
        return Ok(());
    }

    println!("{}", post.meta.title);
    print!("{}", format_outline(&items));
    Ok(())
}

/// Print the rendered HTML of a post
pub fn render(blog: &Blog, slug: &str, theme: Option<&str>) -> Result<()> {
    let theme = match theme {
        Some(name) => name.parse::<Theme>()?,
        None => blog.config.theme,
    };

    let post = blog
        .loader()
        .load_one(slug)
        .with_context(|| format!("cannot render {:?}", slug))?;
    let renderer = MarkdownRenderer::with_config(blog.config.markdown.clone());
    print!("{}", renderer.render_to_html(&post.content, theme));
    Ok(())
}

/// Indented outline, one heading per line with its anchor
fn format_outline(items: &[TocItem]) -> String {
    let mut out = String::new();
    for item in items {
        let indent = "  ".repeat(item.level.saturating_sub(1) as usize + 1);
        out.push_str(&format!("{}{} (#{})\n", indent, item.text, item.id));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_outline_indents_by_level() {
        let items = extract_outline("# A\n## B\n# A");
        assert_eq!(format_outline(&items), "  A (#a-0)\n    B (#b-1)\n  A (#a-2)\n");
    }
}
