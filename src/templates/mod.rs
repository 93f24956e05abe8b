//! Page templates
//!
//! Renderers only see the [`TemplateEngine`] trait. [`TeraEngine`] serves
//! either the built-in theme, embedded in the binary, or a user template
//! directory.

use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::Path;
use tera::{Context, Tera};
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Named variables handed to a template
pub type Variables = serde_json::Map<String, Value>;

/// The three page templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateId {
    Home,
    Post,
    Tag,
}

impl TemplateId {
    pub const ALL: [TemplateId; 3] = [TemplateId::Home, TemplateId::Post, TemplateId::Tag];

    /// Template file name
    pub fn file_name(self) -> &'static str {
        match self {
            TemplateId::Home => "home.html",
            TemplateId::Post => "post.html",
            TemplateId::Tag => "tags.html",
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Something that turns a template and its variables into a page
pub trait TemplateEngine: Send + Sync {
    fn render(&self, template: TemplateId, variables: &Variables) -> Result<String>;
}

/// Tera backed template engine
pub struct TeraEngine {
    tera: Tera,
}

impl TeraEngine {
    /// Engine with the built-in theme
    pub fn embedded() -> Result<Self> {
        Self::from_raw(vec![
            ("base.html", include_str!("default/base.html")),
            ("home.html", include_str!("default/home.html")),
            ("post.html", include_str!("default/post.html")),
            ("tags.html", include_str!("default/tags.html")),
        ])
    }

    /// Engine with every `*.html` file under `dir`, named by relative path
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(Error::TemplateNotFound(dir.display().to_string()));
        }

        let mut sources = Vec::new();
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|e| Error::TemplateNotFound(e.to_string()))?;
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().and_then(|e| e.to_str()) != Some("html")
            {
                continue;
            }

            let name = path
                .strip_prefix(dir)
                .unwrap_or(path)
                .to_string_lossy()
                .replace('\\', "/");
            let content = fs::read_to_string(path).map_err(|e| Error::SourceRead {
                path: path.to_path_buf(),
                source: e,
            })?;
            sources.push((name, content));
        }

        tracing::debug!("Loaded {} templates from {:?}", sources.len(), dir);
        Self::from_raw(sources)
    }

    fn from_raw<N, C>(sources: Vec<(N, C)>) -> Result<Self>
    where
        N: AsRef<str>,
        C: AsRef<str>,
    {
        let mut tera = Tera::default();

        // Bodies are already HTML
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(
            sources
                .iter()
                .map(|(name, content)| -> (&str, &str) { (name.as_ref(), content.as_ref()) }),
        )
        .map_err(|e| Error::Render {
            template: "<templates>".to_string(),
            source: Box::new(e),
        })?;

        let engine = Self { tera };
        for id in TemplateId::ALL {
            if !engine.has_template(id) {
                return Err(Error::TemplateNotFound(id.file_name().to_string()));
            }
        }

        Ok(engine)
    }

    fn has_template(&self, id: TemplateId) -> bool {
        self.tera
            .get_template_names()
            .any(|name| name == id.file_name())
    }
}

impl TemplateEngine for TeraEngine {
    fn render(&self, template: TemplateId, variables: &Variables) -> Result<String> {
        let context = Context::from_serialize(variables).map_err(|e| Error::Render {
            template: template.to_string(),
            source: Box::new(e),
        })?;

        self.tera
            .render(template.file_name(), &context)
            .map_err(|e| match e.kind {
                tera::ErrorKind::TemplateNotFound(name) => Error::TemplateNotFound(name),
                _ => Error::Render {
                    template: template.to_string(),
                    source: Box::new(e),
                },
            })
    }
}
