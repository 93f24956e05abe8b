//! Remove generated pages

use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::generator::home::INDEX_FILE;
use crate::Blog;

/// Delete `index.html` and the pages under the posts and tags directories.
/// Returns the number of files removed.
pub fn run(blog: &Blog) -> Result<usize> {
    let mut removed = remove_page(&blog.output.home.join(INDEX_FILE))?;

    for dir in [&blog.output.posts, &blog.output.tags] {
        if !dir.is_dir() {
            continue;
        }
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| Error::write(dir, e.into()))?;
            let path = entry.path();
            if entry.file_type().is_file() && path.extension().and_then(|e| e.to_str()) == Some("html")
            {
                removed += remove_page(path)?;
            }
        }
    }

    tracing::info!("Deleted {} generated pages", removed);
    Ok(removed)
}

fn remove_page(path: &Path) -> Result<usize> {
    match fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!("Deleted: {:?}", path);
            Ok(1)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(0),
        Err(e) => Err(Error::write(path, e)),
    }
}
