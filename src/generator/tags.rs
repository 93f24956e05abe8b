//! Tag pages

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use super::write_page;
use crate::config::SiteInfo;
use crate::content::PostMetadata;
use crate::error::Result;
use crate::templates::{TemplateEngine, TemplateId, Variables};

/// Output file name of a tag page
pub fn tag_file_name(tag: &str) -> String {
    format!("{}.html", tag.to_lowercase())
}

/// Render one `<tag lowercased>.html` per tag, listing its posts in
/// snapshot order.
///
/// Tags that differ only in case share one page listing the posts of all
/// of them, titled with the first spelling in sorted order.
pub fn render(
    engine: &dyn TemplateEngine,
    metadata: &[PostMetadata],
    tag_index: &BTreeMap<String, Vec<usize>>,
    site: &SiteInfo,
    out_dir: &Path,
) -> Result<usize> {
    let info = serde_json::to_value(site)?;

    let mut pages: BTreeMap<String, (&str, BTreeSet<usize>)> = BTreeMap::new();
    for (tag, positions) in tag_index {
        let (title, merged) = pages
            .entry(tag_file_name(tag))
            .or_insert_with(|| (tag.as_str(), BTreeSet::new()));
        if *title != tag.as_str() {
            tracing::warn!("Tags {:?} and {:?} share one page; merging them", title, tag);
        }
        merged.extend(positions.iter().copied());
    }

    for (file_name, (tag, positions)) in &pages {
        let posts: Vec<&PostMetadata> = positions.iter().map(|&i| &metadata[i]).collect();

        let mut variables = Variables::new();
        variables.insert("posts".to_string(), serde_json::to_value(&posts)?);
        variables.insert("tag".to_string(), tag.to_string().into());
        variables.insert("info".to_string(), info.clone());
        variables.insert("root".to_string(), super::PARENT_ROOT.into());

        let html = engine.render(TemplateId::Tag, &variables)?;
        write_page(&out_dir.join(file_name), &html)?;
        tracing::debug!("Generated tag page {} ({} posts)", file_name, posts.len());
    }

    Ok(pages.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_file_name() {
        assert_eq!(tag_file_name("Rust"), "rust.html");
        assert_eq!(tag_file_name("web dev"), "web dev.html");
        assert_eq!(tag_file_name(""), ".html");
    }
}
