//! Site configuration (config.yml)

use indexmap::IndexMap;
use serde::Serialize;
use serde_yaml::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Keys the default templates know about. Any other key is passed through.
pub const KNOWN_KEYS: &[&str] = &[
    "github",
    "stackoverflow",
    "linkedin",
    "email",
    "resume",
    "profile_picture",
    "blog_title",
];

/// Where the site configuration comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteSource {
    /// Load from a YAML key-value file
    File(PathBuf),
    /// Build without site configuration
    None,
}

/// Site-wide settings handed to every template as `info`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SiteInfo {
    entries: IndexMap<String, String>,
}

impl SiteInfo {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::ConfigNotFound(path.to_path_buf()),
            _ => Error::ConfigParse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            },
        })?;

        let info = Self::parse(path, &content)?;
        tracing::debug!("Loaded {} site settings from {:?}", info.len(), path);

        let missing: Vec<_> = KNOWN_KEYS
            .iter()
            .filter(|key| !info.entries.contains_key(**key))
            .collect();
        if !missing.is_empty() {
            tracing::debug!("Site config has no value for {:?}", missing);
        }

        Ok(info)
    }

    /// Resolve a [`SiteSource`] into settings
    pub fn from_source(source: &SiteSource) -> Result<Self> {
        match source {
            SiteSource::File(path) => Self::load(path),
            SiteSource::None => Ok(Self::default()),
        }
    }

    /// Parse YAML content; `path` is only used for error messages
    pub fn parse(path: &Path, content: &str) -> Result<Self> {
        let parse_error = |reason: String| Error::ConfigParse {
            path: path.to_path_buf(),
            reason,
        };

        let document: Value =
            serde_yaml::from_str(content).map_err(|e| parse_error(e.to_string()))?;

        let mapping = match document {
            Value::Null => return Ok(Self::default()),
            Value::Mapping(mapping) => mapping,
            _ => return Err(parse_error("expected a mapping of key: value".to_string())),
        };

        let mut entries = IndexMap::with_capacity(mapping.len());
        for (key, value) in mapping {
            let key = scalar_to_string(&key)
                .ok_or_else(|| parse_error("keys must be plain scalars".to_string()))?;
            let value = scalar_to_string(&value)
                .ok_or_else(|| parse_error(format!("value for `{}` must be a scalar", key)))?;
            entries.insert(key, value);
        }

        Ok(Self { entries })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Title shown in page headers
    pub fn blog_title(&self) -> &str {
        self.get("blog_title").unwrap_or("Blog")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        _ => None,
    }
}
