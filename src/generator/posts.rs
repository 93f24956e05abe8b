//! Post pages

use indexmap::IndexMap;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use super::write_page;
use crate::config::SiteInfo;
use crate::content::{Post, PostMetadata};
use crate::error::Result;
use crate::templates::{TemplateEngine, TemplateId, Variables};

/// The `post` variable of the post template
#[derive(Debug, Serialize)]
struct PostPage<'a> {
    #[serde(flatten)]
    metadata: &'a PostMetadata,
    content: &'a str,
}

/// Render one `<name>.html` per post, in snapshot order.
///
/// When two posts share a `name` the older one overwrites the page.
pub fn render(
    engine: &dyn TemplateEngine,
    posts: &IndexMap<String, Post>,
    tags: &BTreeSet<String>,
    site: &SiteInfo,
    out_dir: &Path,
) -> Result<usize> {
    let tags = serde_json::to_value(tags)?;
    let info = serde_json::to_value(site)?;
    let mut written: HashMap<String, &str> = HashMap::new();

    for (source, post) in posts {
        let file_name = post.metadata.file_name();
        if let Some(previous) = written.insert(file_name.clone(), source.as_str()) {
            tracing::warn!("Posts {} and {} both write {}", previous, source, file_name);
        }

        let page = PostPage {
            metadata: &post.metadata,
            content: &post.body_html,
        };

        let mut variables = Variables::new();
        variables.insert("post".to_string(), serde_json::to_value(&page)?);
        variables.insert("tags".to_string(), tags.clone());
        variables.insert("info".to_string(), info.clone());
        variables.insert("root".to_string(), super::PARENT_ROOT.into());

        let html = engine.render(TemplateId::Post, &variables)?;
        let output_path = out_dir.join(&file_name);
        write_page(&output_path, &html)?;
        tracing::debug!("Generated post {:?} from {}", output_path, source);
    }

    Ok(written.len())
}
