//! List site content

use anyhow::Result;

use crate::search::sorted_tags;
use crate::Blog;

/// List site content by type
pub fn run(blog: &Blog, content_type: &str) -> Result<()> {
    let loader = blog.loader();

    match content_type {
        "post" | "posts" => {
            let posts = loader.load_all()?;
            println!("Posts ({}):", posts.len());
            for post in posts {
                println!(
                    "  {} - {} [{}] ({})",
                    post.date, post.title, post.slug, post.reading_time
                );
            }
        }
        "tag" | "tags" => {
            let counts = loader.load_tag_counts()?;
            println!("Tags ({}):", counts.len());
            for (tag, count) in sorted_tags(&counts) {
                println!("  {} ({})", tag, count);
            }
        }
        _ => {
            anyhow::bail!("Unknown type: {}. Available: post, tag", content_type);
        }
    }

    Ok(())
}
