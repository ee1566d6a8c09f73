//! Content module - handles posts, front-matter and markdown processing

pub mod date;
mod frontmatter;
pub mod loader;
mod markdown;
mod outline;
mod post;
mod reading_time;

pub use frontmatter::FrontMatter;
pub use loader::{ContentError, ContentLoader};
pub use markdown::{MarkdownRenderer, RenderedMarkdown};
pub use outline::{anchor_id, extract_outline, TocItem};
pub use post::{Post, PostMetadata, RenderedPost};
pub use reading_time::{ReadingTime, DEFAULT_WORDS_PER_MINUTE};
