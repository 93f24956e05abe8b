//! Home page

use std::collections::BTreeSet;
use std::path::Path;

use super::write_page;
use crate::config::SiteInfo;
use crate::content::PostMetadata;
use crate::error::Result;
use crate::templates::{TemplateEngine, TemplateId, Variables};

/// Output file of the home page
pub const INDEX_FILE: &str = "index.html";

/// Render `index.html` listing every post and the full tag set
pub fn render(
    engine: &dyn TemplateEngine,
    metadata: &[PostMetadata],
    tags: &BTreeSet<String>,
    site: &SiteInfo,
    out_dir: &Path,
) -> Result<usize> {
    let mut variables = Variables::new();
    variables.insert("posts".to_string(), serde_json::to_value(metadata)?);
    variables.insert("tags".to_string(), serde_json::to_value(tags)?);
    variables.insert("info".to_string(), serde_json::to_value(site)?);
    variables.insert("root".to_string(), "".into());

    let html = engine.render(TemplateId::Home, &variables)?;
    write_page(&out_dir.join(INDEX_FILE), &html)?;
    Ok(1)
}
