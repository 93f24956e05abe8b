//! Generate static files

use std::sync::Arc;
use std::time::Instant;

use crate::error::Result;
use crate::generator::{RenderCoordinator, RenderSummary};
use crate::Blog;

/// Load the content, then render every page with at most `workers` jobs
/// running at once.
///
/// Nothing is written unless loading and template setup both succeed.
pub async fn run(blog: &Blog, workers: usize) -> Result<RenderSummary> {
    let start = Instant::now();

    let snapshot = blog.load_snapshot()?;
    let engine = blog.template_engine()?;
    blog.output.ensure()?;

    let summary = RenderCoordinator::new(Arc::new(engine))
        .with_workers(workers)
        .render_all(Arc::new(snapshot), &blog.output)
        .await?;

    let duration = start.elapsed();
    tracing::info!(
        "Generated {} pages in {:.2}s",
        summary.total(),
        duration.as_secs_f64()
    );

    Ok(summary)
}
