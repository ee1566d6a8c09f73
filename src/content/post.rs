//! Post models

use serde::{Deserialize, Serialize};

use super::TocItem;
use crate::config::Theme;

/// Listing-level data for a post, everything but the body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMetadata {
    /// Unique identifier derived from the file name
    pub slug: String,

    /// Post title
    pub title: String,

    /// Publication date as authored
    pub date: String,

    /// Short summary shown in listings
    pub excerpt: String,

    /// Post tags, in authoring order
    pub tags: Vec<String>,

    /// Human-readable estimate, e.g. "3 min read"
    pub reading_time: String,
}

/// A blog post with its raw markdown body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    #[serde(flatten)]
    pub meta: PostMetadata,

    /// Raw markdown content, front-matter stripped
    pub content: String,
}

impl Post {
    pub fn slug(&self) -> &str {
        &self.meta.slug
    }

    pub fn into_metadata(self) -> PostMetadata {
        self.meta
    }
}

/// A post rendered for display
#[derive(Debug, Clone, Serialize)]
pub struct RenderedPost {
    #[serde(flatten)]
    pub meta: PostMetadata,
    pub html: String,
    pub toc: Vec<TocItem>,
    pub theme: Theme,
}
