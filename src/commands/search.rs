//! Search and tag lookups from the command line

use anyhow::Result;

use crate::content::PostMetadata;
use crate::search;
use crate::Blog;

/// Print posts matching a query, best match first
pub fn run(blog: &Blog, query: &str) -> Result<()> {
    let posts = blog.loader().load_all()?;
    let results = search::search(query, &posts);

    if results.is_empty() {
        println!("No posts match {:?}", query.trim());
        return Ok(());
    }

    println!("Results for {:?} ({}):", query.trim(), results.len());
    print_posts(&results);
    Ok(())
}

/// Print posts carrying a tag
pub fn by_tag(blog: &Blog, tag: &str) -> Result<()> {
    let posts = blog.loader().load_all()?;
    let tagged = search::filter_by_tag(tag, &posts);

    println!("Posts tagged {:?} ({}):", tag, tagged.len());
    print_posts(&tagged);
    Ok(())
}

fn print_posts(posts: &[&PostMetadata]) {
    for post in posts {
        println!("  {} - {} [{}]", post.date, post.title, post.slug);
        if !post.excerpt.is_empty() {
            println!("      {}", post.excerpt);
        }
    }
}
