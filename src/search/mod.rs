//! Search, tag filtering and tag counts over a loaded post collection
//!
//! Everything here is a pure function of the posts passed in; loading is
//! the caller's job.

use indexmap::IndexMap;

use crate::content::date::newest_first;
use crate::content::PostMetadata;

/// Tag name to number of occurrences across all posts
pub type TagIndex = IndexMap<String, usize>;

/// Case-insensitive search over title, excerpt and tags.
///
/// Title matches rank before all other matches; each group is newest first.
/// A blank query returns nothing.
pub fn search<'a>(query: &str, posts: &'a [PostMetadata]) -> Vec<&'a PostMetadata> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    let mut hits: Vec<(bool, &PostMetadata)> = posts
        .iter()
        .filter_map(|post| {
            let title_match = post.title.to_lowercase().contains(&query);
            let matched = title_match
                || post.excerpt.to_lowercase().contains(&query)
                || post.tags.iter().any(|tag| tag.to_lowercase().contains(&query));
            matched.then_some((title_match, post))
        })
        .collect();

    hits.sort_by(|(a_title, a), (b_title, b)| {
        b_title
            .cmp(a_title)
            .then_with(|| newest_first(&a.date, &b.date))
    });

    hits.into_iter().map(|(_, post)| post).collect()
}

/// Posts carrying exactly `tag` (case-sensitive), in input order
pub fn filter_by_tag<'a>(tag: &str, posts: &'a [PostMetadata]) -> Vec<&'a PostMetadata> {
    posts
        .iter()
        .filter(|post| post.tags.iter().any(|t| t == tag))
        .collect()
}

/// Count every tag occurrence, so a tag repeated in one post counts twice
pub fn tag_counts(posts: &[PostMetadata]) -> TagIndex {
    let mut counts = TagIndex::new();
    for post in posts {
        for tag in &post.tags {
            *counts.entry(tag.clone()).or_insert(0) += 1;
        }
    }
    counts
}

/// Tags by count descending, then name
pub fn sorted_tags(index: &TagIndex) -> Vec<(&str, usize)> {
    let mut tags: Vec<(&str, usize)> = index.iter().map(|(t, c)| (t.as_str(), *c)).collect();
    tags.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    tags
}
