//! Content loader - loads posts from the content directory

use chrono::{DateTime, Local};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

use super::date::newest_first;
use super::{FrontMatter, Post, PostMetadata, ReadingTime};
use crate::search::{tag_counts, TagIndex};
use crate::Blog;

const MARKDOWN_EXTENSIONS: [&str; 2] = ["md", "markdown"];
const MORE_MARKER: &str = "<!-- more -->";

/// Errors raised while loading posts
#[derive(Debug, Error)]
pub enum ContentError {
    /// No post file matches the slug, or it could not be read
    #[error("post not found: {slug}")]
    NotFound { slug: String },

    /// The content directory exists but could not be listed
    #[error("failed to read content directory {path:?}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Loads posts from the content directory, from scratch on every call
pub struct ContentLoader<'a> {
    blog: &'a Blog,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(blog: &'a Blog) -> Self {
        Self { blog }
    }

    /// Load every post, newest first
    pub fn load_posts(&self) -> Result<Vec<Post>, ContentError> {
        let content_dir = &self.blog.content_dir;
        if !content_dir.exists() {
            tracing::debug!("Content directory {:?} does not exist", content_dir);
            return Ok(Vec::new());
        }

        let mut posts = Vec::new();

        for entry in WalkDir::new(content_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                // Depth 0 is the content directory itself
                Err(e) if e.depth() == 0 => return Err(walk_error(content_dir, e)),
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry in {:?}: {}", content_dir, e);
                    continue;
                }
            };
            let path = entry.path();
            let Some(slug) = markdown_slug(path) else {
                continue;
            };
            if !path.is_file() {
                continue;
            }

            match fs::read_to_string(path) {
                Ok(raw) => posts.push(self.parse_post(slug, path, &raw)),
                Err(e) => {
                    tracing::warn!("Failed to load post {:?}: {}", path, e);
                }
            }
        }

        // Stable, so equal dates keep file name order
        posts.sort_by(|a, b| newest_first(&a.meta.date, &b.meta.date));

        tracing::debug!("Loaded {} posts from {:?}", posts.len(), content_dir);
        Ok(posts)
    }

    /// Load the metadata of every post, newest first
    pub fn load_all(&self) -> Result<Vec<PostMetadata>, ContentError> {
        Ok(self
            .load_posts()?
            .into_iter()
            .map(Post::into_metadata)
            .collect())
    }

    /// Load a single post by slug
    pub fn load_one(&self, slug: &str) -> Result<Post, ContentError> {
        let not_found = || ContentError::NotFound {
            slug: slug.to_string(),
        };

        if !is_valid_slug(slug) {
            return Err(not_found());
        }

        for ext in MARKDOWN_EXTENSIONS {
            let path = self.blog.content_dir.join(format!("{}.{}", slug, ext));
            match fs::read_to_string(&path) {
                Ok(raw) => return Ok(self.parse_post(slug.to_string(), &path, &raw)),
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => {
                    tracing::warn!("Failed to read post {:?}: {}", path, e);
                    return Err(not_found());
                }
            }
        }

        Err(not_found())
    }

    /// Count tag occurrences across all posts
    pub fn load_tag_counts(&self) -> Result<TagIndex, ContentError> {
        Ok(tag_counts(&self.load_all()?))
    }

    /// Build a post from a file's raw contents
    fn parse_post(&self, slug: String, path: &Path, raw: &str) -> Post {
        let (fm, body) = FrontMatter::parse(raw);

        let title = fm.title.unwrap_or_else(|| slug.clone());
        let date = fm.date.unwrap_or_else(|| file_date(path));
        let excerpt = fm
            .excerpt
            .or_else(|| split_excerpt(body))
            .unwrap_or_default();
        let reading_time = ReadingTime::estimate(body, self.blog.config.reading_speed);

        Post {
            meta: PostMetadata {
                slug,
                title,
                date,
                excerpt,
                tags: fm.tags,
                reading_time: reading_time.to_string(),
            },
            content: body.to_string(),
        }
    }
}

/// Slug of a markdown file, `None` for anything else
fn markdown_slug(path: &Path) -> Option<String> {
    let ext = path.extension().and_then(|e| e.to_str())?;
    if !MARKDOWN_EXTENSIONS.contains(&ext) {
        return None;
    }
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
}

/// Slugs name files directly inside the content directory
fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug != "."
        && slug != ".."
        && !slug.contains(['/', '\\', '\0'])
}

/// Text before the `<!-- more -->` marker
fn split_excerpt(body: &str) -> Option<String> {
    body.find(MORE_MARKER)
        .map(|pos| body[..pos].trim().to_string())
}

/// Modification date of the file, for posts without a front-matter date
fn file_date(path: &Path) -> String {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .map(|t| DateTime::<Local>::from(t).format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn walk_error(content_dir: &Path, e: walkdir::Error) -> ContentError {
    let source = e
        .into_io_error()
        .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "filesystem loop"));
    ContentError::ReadDir {
        path: content_dir.to_path_buf(),
        source,
    }
}
