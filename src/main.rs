//! CLI entry point for postcheck

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use postcheck::commands::check::{CheckOptions, OutputFormat};

#[derive(Parser)]
#[command(name = "postcheck")]
#[command(version)]
#[command(about = "Check the posts of a Jekyll-style blog for broken content", long_about = None)]
struct Cli {
    /// Set the site directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check posts for front-matter, slug, fence and link problems
    #[command(alias = "c")]
    Check {
        /// Also check posts in the drafts directory
        #[arg(long)]
        drafts: bool,

        /// Report format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Fail on warnings as well as errors
        #[arg(long)]
        deny_warnings: bool,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// Layout to use
        #[arg(short, long)]
        layout: Option<String>,

        /// Tag for the post (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,

        /// Publication date, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// List site information
    List {
        /// Type of content to list (post, tag, layout, language)
        #[arg(default_value = "post")]
        r#type: String,

        /// Include drafts
        #[arg(long)]
        drafts: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "postcheck=debug,info"
    } else {
        "postcheck=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Check {
            drafts,
            format,
            deny_warnings,
        } => {
            let blog = postcheck::Blog::new(&base_dir)?;
            tracing::info!("Checking posts in {:?}", blog.posts_dir);
            postcheck::commands::check::run(
                &blog,
                CheckOptions {
                    drafts,
                    format,
                    deny_warnings,
                },
            )?;
        }

        Commands::New {
            title,
            layout,
            tags,
            date,
        } => {
            let blog = postcheck::Blog::new(&base_dir)?;
            tracing::info!("Creating new post with title: {}", title);
            let path =
                postcheck::commands::new::run(&blog, &title, layout.as_deref(), &tags, date)?;
            println!("Created: {}", blog.relative(&path));
        }

        Commands::List { r#type, drafts } => {
            let blog = postcheck::Blog::new(&base_dir)?;
            postcheck::commands::list::run(&blog, &r#type, drafts)?;
        }

        Commands::Version => {
            println!("postcheck version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
