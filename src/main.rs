//! CLI entry point for blogforge

use anyhow::{Context, Result};
use blogforge::commands::list::ListKind;
use blogforge::generator::DEFAULT_WORKERS;
use blogforge::Blog;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "blogforge")]
#[command(version)]
#[command(about = "Build a personal blog from markdown prototypes", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate every page (the default)
    #[command(alias = "g")]
    Generate {
        /// Maximum number of render jobs running at once
        #[arg(short, long, default_value_t = DEFAULT_WORKERS)]
        jobs: usize,

        /// Build without reading config.yml
        #[arg(long)]
        no_config: bool,

        /// Template directory (defaults to <cwd>/templates, then the built-in theme)
        #[arg(short, long)]
        templates: Option<PathBuf>,
    },

    /// Remove generated pages
    Clean,

    /// List site information
    List {
        /// Type of content to list (post, tag)
        #[arg(default_value = "post")]
        r#type: ListKind,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "blogforge=debug,info"
    } else {
        "blogforge=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Cannot determine the current directory")?,
    };

    let command = cli.command.unwrap_or(Commands::Generate {
        jobs: DEFAULT_WORKERS,
        no_config: false,
        templates: None,
    });

    match command {
        Commands::Generate {
            jobs,
            no_config,
            templates,
        } => {
            let mut blog = Blog::new(&base_dir);
            if no_config {
                blog = blog.without_site_config();
            }
            if let Some(dir) = templates {
                blog = blog.with_templates_dir(dir);
            }

            tracing::info!("Generating site in {:?}", base_dir);
            let summary = blogforge::commands::generate::run(&blog, jobs)
                .await
                .with_context(|| format!("Build failed in {}", base_dir.display()))?;
            println!(
                "Generated {} pages ({} posts, {} tags)",
                summary.total(),
                summary.posts,
                summary.tags
            );
        }

        Commands::Clean => {
            let blog = Blog::new(&base_dir);
            tracing::info!("Cleaning generated pages...");
            let removed = blog.clean().context("Clean failed")?;
            println!("Removed {} pages", removed);
        }

        Commands::List { r#type } => {
            let blog = Blog::new(&base_dir);
            blogforge::commands::list::run(&blog, r#type)?;
        }

        Commands::Version => {
            println!("blogforge version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
