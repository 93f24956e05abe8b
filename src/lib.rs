//! blogforge: a static site generator for a personal markdown blog
//!
//! Posts are read from `<root>/prototypes/`, each starting with a
//! `key: value` metadata header. A build produces `<root>/index.html`,
//! `<root>/posts/<name>.html` and `<root>/tags/<tag>.html`.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod generator;
pub mod templates;

use std::path::{Path, PathBuf};

pub use error::{Error, Result};

use config::SiteSource;
use content::{ContentLoader, ContentSnapshot};
use generator::{OutputRoots, RenderSummary};
use templates::TeraEngine;

/// A blog project rooted at one directory
#[derive(Debug, Clone)]
pub struct Blog {
    /// Base directory
    pub base_dir: PathBuf,
    /// Source documents
    pub prototypes_dir: PathBuf,
    /// Site configuration source
    pub site_source: SiteSource,
    /// Template directory; the built-in theme is used when it does not exist
    pub templates_dir: PathBuf,
    /// Where pages are written
    pub output: OutputRoots,
}

impl Blog {
    /// Standard layout under `base_dir`
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        Self {
            prototypes_dir: base_dir.join("prototypes"),
            site_source: SiteSource::File(base_dir.join("config.yml")),
            templates_dir: base_dir.join("templates"),
            output: OutputRoots::under(&base_dir),
            base_dir,
        }
    }

    /// Build without reading `config.yml`
    pub fn without_site_config(mut self) -> Self {
        self.site_source = SiteSource::None;
        self
    }

    pub fn with_templates_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.templates_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Load all posts and the site config
    pub fn load_snapshot(&self) -> Result<ContentSnapshot> {
        ContentLoader::default().load(&self.prototypes_dir, &self.site_source)
    }

    /// Template engine for this project
    pub fn template_engine(&self) -> Result<TeraEngine> {
        if self.templates_dir.is_dir() {
            tracing::debug!("Using templates from {:?}", self.templates_dir);
            TeraEngine::from_dir(&self.templates_dir)
        } else {
            TeraEngine::embedded()
        }
    }

    /// Generate the static site
    pub async fn generate(&self) -> Result<RenderSummary> {
        commands::generate::run(self, generator::DEFAULT_WORKERS).await
    }

    /// Remove generated pages
    pub fn clean(&self) -> Result<usize> {
        commands::clean::run(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn setup(dir: &Path) {
        let prototypes = dir.join("prototypes");
        fs::create_dir_all(&prototypes).unwrap();
        let date = chrono::Local::now().format("%d-%m-%Y").to_string();
        fs::write(
            prototypes.join("test.md"),
            format!("title: test\ndate: {date}\ntags: test\nname: test\nsummary: test\n-------------\n\n#test header\ntest content"),
        )
        .unwrap();
        fs::write(
            dir.join("config.yml"),
            "github: github.com\nstackoverflow: stackoverflow.com\nlinkedin: linkedin.com\nemail: email@email.com\nresume: resume.pdf\nprofile_picture: my_profile.png\nblog_title: test blog\n",
        )
        .unwrap();
    }

    #[tokio::test]
    async fn test_single_post_site() {
        let dir = tempfile::tempdir().unwrap();
        setup(dir.path());
        let blog = Blog::new(dir.path());

        let summary = blog.generate().await.unwrap();
        assert_eq!(summary.total(), 3);

        let post = fs::read_to_string(dir.path().join("posts/test.html")).unwrap();
        assert!(post.contains("<h1>test header</h1>\n\n<p>test content</p>"));
        assert!(post.contains(r#"href="../tags/test.html""#));
        assert!(post.contains("<title>test - test blog</title>"));
        assert!(post.contains(r#"href="mailto:email@email.com""#));
        assert!(post.contains(r#"src="../my_profile.png""#));
        assert!(post.contains(r#"href="../resume.pdf""#));

        let tag = fs::read_to_string(dir.path().join("tags/test.html")).unwrap();
        assert!(tag.contains(r#"href="../posts/test.html""#));
        assert!(tag.contains("TEST"));
        assert!(tag.contains(r#"src="../my_profile.png""#));

        let home = fs::read_to_string(dir.path().join("index.html")).unwrap();
        assert!(home.contains(r#"href="posts/test.html""#));
        assert!(home.contains(r#"src="my_profile.png""#));
    }

    #[tokio::test]
    async fn test_rebuild_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        setup(dir.path());
        let blog = Blog::new(dir.path());

        blog.generate().await.unwrap();
        let pages = ["index.html", "posts/test.html", "tags/test.html"];
        let before: Vec<_> = pages
            .iter()
            .map(|p| fs::read(dir.path().join(p)).unwrap())
            .collect();

        blog.generate().await.unwrap();
        let after: Vec<_> = pages
            .iter()
            .map(|p| fs::read(dir.path().join(p)).unwrap())
            .collect();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_missing_date_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        setup(dir.path());
        fs::write(
            dir.path().join("prototypes/undated.md"),
            "title: undated\ntags: test\nname: undated\nsummary: none\n-------------\nbody",
        )
        .unwrap();

        let err = Blog::new(dir.path()).generate().await.unwrap_err();
        assert!(matches!(err, Error::MalformedMetadata { .. }));
        assert!(!dir.path().join("index.html").exists());
        assert!(!dir.path().join("posts").exists());
        assert!(!dir.path().join("tags").exists());
    }

    #[tokio::test]
    async fn test_empty_tags_field_renders_one_tag_page() {
        let dir = tempfile::tempdir().unwrap();
        setup(dir.path());
        fs::write(
            dir.path().join("prototypes/test.md"),
            "title: untagged\ndate: 01-01-2024\ntags: \"\"\nname: untagged\nsummary: none\n-------------\nbody",
        )
        .unwrap();

        let blog = Blog::new(dir.path());
        let snapshot = blog.load_snapshot().unwrap();
        assert_eq!(snapshot.tag_set().len(), 1);
        assert!(snapshot.tag_set().contains(""));

        let summary = blog.generate().await.unwrap();
        assert_eq!(summary.tags, 1);
        assert!(dir.path().join("tags/.html").is_file());
    }

    #[tokio::test]
    async fn test_tag_with_path_separator_writes_nothing() {
        for tags in ["../index", "ci/cd, rust"] {
            let dir = tempfile::tempdir().unwrap();
            setup(dir.path());
            fs::write(
                dir.path().join("prototypes/escape.md"),
                format!("title: escape\ndate: 01-01-2024\ntags: {tags}\nname: escape\n-------------\nbody"),
            )
            .unwrap();

            let err = Blog::new(dir.path()).generate().await.unwrap_err();
            assert!(matches!(err, Error::MalformedMetadata { .. }), "{tags}");
            assert!(!dir.path().join("index.html").exists());
            assert!(!dir.path().join("tags").exists());
        }
    }

    #[tokio::test]
    async fn test_without_site_config() {
        let dir = tempfile::tempdir().unwrap();
        setup(dir.path());
        fs::remove_file(dir.path().join("config.yml")).unwrap();

        let err = Blog::new(dir.path()).generate().await.unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound(_)));

        let blog = Blog::new(dir.path()).without_site_config();
        blog.generate().await.unwrap();
        let home = fs::read_to_string(dir.path().join("index.html")).unwrap();
        assert!(home.contains("<title>Blog</title>"));
    }

    #[tokio::test]
    async fn test_custom_templates_dir() {
        let dir = tempfile::tempdir().unwrap();
        setup(dir.path());
        let templates = dir.path().join("templates");
        fs::create_dir_all(&templates).unwrap();
        fs::write(templates.join("home.html"), "{% for p in posts %}{{ p.name }};{% endfor %}").unwrap();
        fs::write(templates.join("post.html"), "{{ post.content }}").unwrap();
        fs::write(templates.join("tags.html"), "{{ tag }}:{{ posts | length }}").unwrap();

        Blog::new(dir.path()).generate().await.unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("index.html")).unwrap(),
            "test;"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("tags/test.html")).unwrap(),
            "test:1"
        );
    }

    #[tokio::test]
    async fn test_incomplete_templates_dir_fails_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        setup(dir.path());
        let templates = dir.path().join("templates");
        fs::create_dir_all(&templates).unwrap();
        fs::write(templates.join("home.html"), "home").unwrap();

        let err = Blog::new(dir.path()).generate().await.unwrap_err();
        assert!(matches!(err, Error::TemplateNotFound(_)));
        assert!(!dir.path().join("index.html").exists());
    }
}
