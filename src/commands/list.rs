//! List site content

use crate::content::DATE_FORMAT;
use crate::error::Result;
use crate::Blog;

/// Kind of content printed by `list`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Posts,
    Tags,
}

impl std::str::FromStr for ListKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "post" | "posts" => Ok(ListKind::Posts),
            "tag" | "tags" => Ok(ListKind::Tags),
            other => Err(format!("Unknown type: {}. Available: post, tag", other)),
        }
    }
}

/// Lines describing the site content, newest post first
pub fn lines(blog: &Blog, kind: ListKind) -> Result<Vec<String>> {
    let snapshot = blog.load_snapshot()?;
    let mut out = Vec::new();

    match kind {
        ListKind::Posts => {
            out.push(format!("Posts ({}):", snapshot.len()));
            for (source, post) in snapshot.posts() {
                out.push(format!(
                    "  {} - {} [{}]",
                    post.metadata.date.format(DATE_FORMAT),
                    post.metadata.title,
                    source
                ));
            }
        }
        ListKind::Tags => {
            out.push(format!("Tags ({}):", snapshot.tag_set().len()));
            let mut tags: Vec<_> = snapshot
                .tag_index()
                .iter()
                .map(|(tag, posts)| (tag, posts.len()))
                .collect();
            tags.sort_by(|a, b| b.1.cmp(&a.1));
            for (tag, count) in tags {
                out.push(format!("  {} ({})", tag, count));
            }
        }
    }

    Ok(out)
}

/// Print site content by kind
pub fn run(blog: &Blog, kind: ListKind) -> Result<()> {
    for line in lines(blog, kind)? {
        println!("{}", line);
    }
    Ok(())
}
