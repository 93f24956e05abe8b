//! Error types shared by every stage of a build

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used across the crate
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised while loading content or rendering pages
#[derive(Debug, Error)]
pub enum Error {
    #[error("Source not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("Failed to read `{path}`")]
    SourceRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed metadata in `{file}`: {reason}")]
    MalformedMetadata { file: String, reason: String },

    #[error("Site config not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("Failed to parse site config `{path}`: {reason}")]
    ConfigParse { path: PathBuf, reason: String },

    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Failed to render template `{template}`: {source}")]
    Render {
        template: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to build template variables")]
    Variables(#[from] serde_json::Error),

    #[error("Failed to write `{path}`")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Render job `{job}` aborted: {reason}")]
    JobAborted { job: &'static str, reason: String },

    #[error("{} render jobs failed: {}", .0.len(), join_errors(.0))]
    RenderJobs(Vec<Error>),
}

impl Error {
    pub(crate) fn malformed(file: &str, reason: impl Into<String>) -> Self {
        Error::MalformedMetadata {
            file: file.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::OutputWrite {
            path: path.into(),
            source,
        }
    }
}

fn join_errors(errors: &[Error]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
