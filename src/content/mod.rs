//! Content module - source documents, posts and the content snapshot

mod header;
mod markdown;
mod post;
mod snapshot;

pub use header::{split_header, Document, MarkdownDocumentParser, MetadataParser};
pub use markdown::MarkdownRenderer;
pub use post::{parse_date, split_tags, Post, PostMetadata, DATE_FORMAT};
pub use snapshot::{ContentLoader, ContentSnapshot};
