//! Post model

use chrono::NaiveDate;
use indexmap::{IndexMap, IndexSet};
use serde::{Serialize, Serializer};

use crate::error::{Error, Result};

/// Pattern of the `date` header (`DD-MM-YYYY`)
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Metadata of one post, normalized from its header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostMetadata {
    pub title: String,

    /// Publication date
    #[serde(serialize_with = "serialize_date")]
    pub date: NaiveDate,

    /// Output file stem (`<name>.html`)
    pub name: String,

    pub summary: String,

    /// Trimmed, deduplicated, in the order the author wrote them
    pub tags: IndexSet<String>,

    /// Other header fields, exposed to templates as-is
    #[serde(flatten)]
    pub extra: IndexMap<String, String>,
}

impl PostMetadata {
    /// Build metadata from raw header entries of the document `source`
    pub fn from_header(source: &str, mut header: IndexMap<String, String>) -> Result<Self> {
        let title = take_required(source, &mut header, "title")?;
        let raw_date = take_required(source, &mut header, "date")?;
        let date = parse_date(&raw_date).ok_or_else(|| {
            Error::malformed(
                source,
                format!("`date` value {:?} does not match DD-MM-YYYY", raw_date),
            )
        })?;
        let name = take_required(source, &mut header, "name")?;
        check_file_stem(source, "name", &name)?;

        let summary = header.shift_remove("summary").unwrap_or_default();
        let tags = header
            .shift_remove("tags")
            .map(|raw| split_tags(&raw))
            .unwrap_or_default();
        for tag in &tags {
            check_file_stem(source, "tags", tag)?;
        }

        Ok(Self {
            title,
            date,
            name,
            summary,
            tags,
            extra: header,
        })
    }

    /// Output file name of this post
    pub fn file_name(&self) -> String {
        format!("{}.html", self.name)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

/// A post: normalized metadata plus rendered body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub metadata: PostMetadata,
    pub body_html: String,
}

impl Post {
    pub fn new(metadata: PostMetadata, body_html: String) -> Self {
        Self {
            metadata,
            body_html,
        }
    }
}

/// Split a comma separated `tags` value.
///
/// An empty value yields a single empty tag.
pub fn split_tags(raw: &str) -> IndexSet<String> {
    raw.split(',').map(|tag| tag.trim().to_string()).collect()
}

/// Parse a `DD-MM-YYYY` date
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

fn take_required(source: &str, header: &mut IndexMap<String, String>, key: &str) -> Result<String> {
    match header.shift_remove(key) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        Some(_) => Err(Error::malformed(source, format!("`{}` is empty", key))),
        None => Err(Error::malformed(source, format!("missing `{}`", key))),
    }
}

/// `name` and every tag become output file stems
fn check_file_stem(source: &str, key: &str, value: &str) -> Result<()> {
    if value.contains(['/', '\\']) || value == ".." {
        return Err(Error::malformed(
            source,
            format!("`{}` value {:?} must not contain path separators", key, value),
        ));
    }
    Ok(())
}

fn serialize_date<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&date.format(DATE_FORMAT))
}
