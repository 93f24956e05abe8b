//! Generator module - renders a content snapshot into HTML pages
//!
//! Three jobs (home, posts, tags) read the same immutable snapshot and
//! write disjoint directories, so [`RenderCoordinator`] runs them
//! concurrently and joins all of them before reporting.

pub mod home;
pub mod posts;
pub mod tags;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;

use crate::content::ContentSnapshot;
use crate::error::{Error, Result};
use crate::templates::TemplateEngine;

/// Worker budget of a full render: one per job
pub const DEFAULT_WORKERS: usize = 3;

/// `root` template variable of pages under `posts/` and `tags/`
pub(crate) const PARENT_ROOT: &str = "../";

/// Output directories of the three render jobs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRoots {
    pub home: PathBuf,
    pub posts: PathBuf,
    pub tags: PathBuf,
}

impl OutputRoots {
    /// `root/index.html`, `root/posts/`, `root/tags/`
    pub fn under<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref();
        Self {
            home: root.to_path_buf(),
            posts: root.join("posts"),
            tags: root.join("tags"),
        }
    }

    /// Create every output directory
    pub fn ensure(&self) -> Result<()> {
        for dir in [&self.home, &self.posts, &self.tags] {
            fs::create_dir_all(dir).map_err(|e| Error::write(dir, e))?;
        }
        Ok(())
    }

    pub fn dir_for(&self, job: RenderJob) -> &Path {
        match job {
            RenderJob::Home => &self.home,
            RenderJob::Posts => &self.posts,
            RenderJob::Tags => &self.tags,
        }
    }
}

/// One independent render pass over the snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderJob {
    Home,
    Posts,
    Tags,
}

impl RenderJob {
    pub const ALL: [RenderJob; 3] = [RenderJob::Home, RenderJob::Posts, RenderJob::Tags];

    pub fn name(self) -> &'static str {
        match self {
            RenderJob::Home => "home",
            RenderJob::Posts => "posts",
            RenderJob::Tags => "tags",
        }
    }

    /// Run this job to completion, returning the number of pages written
    pub fn run(
        self,
        snapshot: &ContentSnapshot,
        engine: &dyn TemplateEngine,
        out_dir: &Path,
    ) -> Result<usize> {
        match self {
            RenderJob::Home => home::render(
                engine,
                snapshot.metadata_list(),
                snapshot.tag_set(),
                snapshot.site(),
                out_dir,
            ),
            RenderJob::Posts => posts::render(
                engine,
                snapshot.posts(),
                snapshot.tag_set(),
                snapshot.site(),
                out_dir,
            ),
            RenderJob::Tags => tags::render(
                engine,
                snapshot.metadata_list(),
                snapshot.tag_index(),
                snapshot.site(),
                out_dir,
            ),
        }
    }
}

impl fmt::Display for RenderJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pages written by each job of a successful render
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderSummary {
    pub home: usize,
    pub posts: usize,
    pub tags: usize,
}

impl RenderSummary {
    fn record(&mut self, job: RenderJob, pages: usize) {
        match job {
            RenderJob::Home => self.home = pages,
            RenderJob::Posts => self.posts = pages,
            RenderJob::Tags => self.tags = pages,
        }
    }

    pub fn total(&self) -> usize {
        self.home + self.posts + self.tags
    }
}

/// Runs the render jobs against a shared snapshot
pub struct RenderCoordinator {
    engine: Arc<dyn TemplateEngine>,
    workers: usize,
}

impl RenderCoordinator {
    pub fn new(engine: Arc<dyn TemplateEngine>) -> Self {
        Self {
            engine,
            workers: DEFAULT_WORKERS,
        }
    }

    /// Limit how many jobs run at once (at least one)
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Run every job and wait for all of them.
    ///
    /// A single failure is returned as is, several are returned together as
    /// [`Error::RenderJobs`]. Pages written by jobs that succeeded are kept.
    pub async fn render_all(
        &self,
        snapshot: Arc<ContentSnapshot>,
        roots: &OutputRoots,
    ) -> Result<RenderSummary> {
        let permits = Arc::new(Semaphore::new(self.workers));
        let mut handles = Vec::with_capacity(RenderJob::ALL.len());

        for job in RenderJob::ALL {
            let permit = Arc::clone(&permits)
                .acquire_owned()
                .await
                .map_err(|e| Error::JobAborted {
                    job: job.name(),
                    reason: e.to_string(),
                })?;
            let snapshot = Arc::clone(&snapshot);
            let engine = Arc::clone(&self.engine);
            let out_dir = roots.dir_for(job).to_path_buf();

            let handle = tokio::task::spawn_blocking(move || {
                let _permit = permit;
                tracing::debug!("Render job {} started", job);
                job.run(&snapshot, engine.as_ref(), &out_dir)
            });
            handles.push((job, handle));
        }

        let mut summary = RenderSummary::default();
        let mut errors = Vec::new();
        for (job, handle) in handles {
            match handle.await {
                Ok(Ok(pages)) => {
                    tracing::info!("Render job {} wrote {} pages", job, pages);
                    summary.record(job, pages);
                }
                Ok(Err(e)) => {
                    tracing::error!("Render job {} failed: {}", job, e);
                    errors.push(e);
                }
                Err(e) => {
                    tracing::error!("Render job {} aborted: {}", job, e);
                    errors.push(Error::JobAborted {
                        job: job.name(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        match errors.len() {
            0 => Ok(summary),
            1 => Err(errors.remove(0)),
            _ => Err(Error::RenderJobs(errors)),
        }
    }
}

/// Write one page, replacing any existing file
pub(crate) fn write_page(path: &Path, html: &str) -> Result<()> {
    fs::write(path, html).map_err(|e| Error::write(path, e))
}
