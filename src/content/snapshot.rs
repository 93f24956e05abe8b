//! Content snapshot and the loader that builds it

use indexmap::IndexMap;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

use super::{MarkdownDocumentParser, MetadataParser, Post, PostMetadata};
use crate::config::{SiteInfo, SiteSource};
use crate::error::{Error, Result};

/// Everything one build renders from, fixed once loading finishes
#[derive(Debug, Clone, Default)]
pub struct ContentSnapshot {
    posts: IndexMap<String, Post>,
    metadata: Vec<PostMetadata>,
    tags: BTreeSet<String>,
    tag_index: BTreeMap<String, Vec<usize>>,
    site: SiteInfo,
}

impl ContentSnapshot {
    /// Order `(file name, post)` pairs newest first and derive the indices.
    ///
    /// Posts sharing a date keep their input order.
    pub fn from_posts(mut entries: Vec<(String, Post)>, site: SiteInfo) -> Self {
        entries.sort_by(|(_, a), (_, b)| b.metadata.date.cmp(&a.metadata.date));

        let metadata: Vec<PostMetadata> = entries
            .iter()
            .map(|(_, post)| post.metadata.clone())
            .collect();

        let mut tag_index: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (i, meta) in metadata.iter().enumerate() {
            for tag in &meta.tags {
                tag_index.entry(tag.clone()).or_default().push(i);
            }
        }
        let tags = tag_index.keys().cloned().collect();

        Self {
            posts: entries.into_iter().collect(),
            metadata,
            tags,
            tag_index,
            site,
        }
    }

    /// Posts keyed by source file name, newest first
    pub fn posts(&self) -> &IndexMap<String, Post> {
        &self.posts
    }

    /// Post metadata in the same order as [`posts`](Self::posts)
    pub fn metadata_list(&self) -> &[PostMetadata] {
        &self.metadata
    }

    /// Union of every post's tags
    pub fn tag_set(&self) -> &BTreeSet<String> {
        &self.tags
    }

    /// Tag to positions in [`metadata_list`](Self::metadata_list), ascending
    pub fn tag_index(&self) -> &BTreeMap<String, Vec<usize>> {
        &self.tag_index
    }

    /// Posts carrying `tag`, in snapshot order
    pub fn posts_tagged<'a>(&'a self, tag: &str) -> impl Iterator<Item = &'a PostMetadata> + 'a {
        self.tag_index
            .get(tag)
            .into_iter()
            .flatten()
            .map(move |&i| &self.metadata[i])
    }

    pub fn site(&self) -> &SiteInfo {
        &self.site
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

/// Reads a prototypes directory into a [`ContentSnapshot`]
pub struct ContentLoader {
    parser: Box<dyn MetadataParser>,
}

impl ContentLoader {
    /// Create a loader with a custom document parser
    pub fn new(parser: Box<dyn MetadataParser>) -> Self {
        Self { parser }
    }

    /// Load every document directly inside `prototypes_dir`.
    ///
    /// Fails on the first unreadable or malformed document.
    pub fn load(&self, prototypes_dir: &Path, site: &SiteSource) -> Result<ContentSnapshot> {
        let site = SiteInfo::from_source(site)?;

        if !prototypes_dir.is_dir() {
            return Err(Error::SourceNotFound(prototypes_dir.to_path_buf()));
        }

        let mut entries = Vec::new();
        for entry in WalkDir::new(prototypes_dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| Error::SourceRead {
                path: e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| prototypes_dir.to_path_buf()),
                source: e
                    .into_io_error()
                    .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "walk failed")),
            })?;

            let file_name = entry.file_name().to_string_lossy().to_string();
            if !entry.file_type().is_file() || file_name.starts_with('.') {
                continue;
            }

            let post = self.load_post(entry.path(), &file_name)?;
            tracing::debug!("Loaded {} ({})", file_name, post.metadata.title);
            entries.push((file_name, post));
        }

        let snapshot = ContentSnapshot::from_posts(entries, site);
        tracing::info!(
            "Loaded {} posts with {} tags",
            snapshot.len(),
            snapshot.tag_set().len()
        );

        Ok(snapshot)
    }

    fn load_post(&self, path: &Path, file_name: &str) -> Result<Post> {
        let raw = fs::read(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::SourceNotFound(path.to_path_buf()),
            _ => Error::SourceRead {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        let document = self.parser.parse(file_name, &raw)?;
        let metadata = PostMetadata::from_header(file_name, document.metadata)?;
        Ok(Post::new(metadata, document.body_html))
    }
}

impl Default for ContentLoader {
    fn default() -> Self {
        Self::new(Box::new(MarkdownDocumentParser::new()))
    }
}
