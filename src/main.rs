//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `page_pointer` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;

use page_pointer::config::DEFAULT_SERVER_PORT;
use page_pointer::initialization::init_logger;
use page_pointer::server::{start_server, ServerState};
use page_pointer::{render_error, Config, OpenGraph, PagePointer, SavePost};

#[derive(Debug, Parser)]
#[command(name = "page_pointer", version, about)]
struct Cli {
    #[command(flatten)]
    config: Config,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the Open Graph data of a file, file:// URL or web page as JSON
    Parse {
        /// Path or URL of the document
        source: String,
    },
    /// Render the editor preview of a URL
    Preview {
        url: String,
        /// Pre-check the image import box
        #[arg(long)]
        import_flag: bool,
        /// Refetch the page instead of using the cached copy
        #[arg(long)]
        refresh: bool,
    },
    /// Point a post at a URL, optionally importing its image
    Save {
        /// Post id
        #[arg(long)]
        post: i64,
        /// Target URL; pass an empty string to clear the pointer
        #[arg(long)]
        url: String,
        /// Import the page's image as featured image
        #[arg(long)]
        import: bool,
    },
    /// Print where a post redirects to
    Redirect {
        /// Post id
        post: i64,
    },
    /// List pointer posts and their imported media as JSON
    List,
    /// Drop expired pages from the fetch cache
    Purge,
    /// Serve redirects and previews over HTTP
    Serve {
        #[arg(long, default_value_t = DEFAULT_SERVER_PORT)]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists), e.g. RUST_LOG
    if dotenvy::dotenv().is_err() {
        if let Some(env_path) = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(".env")))
            .filter(|path| path.exists())
        {
            let _ = dotenvy::from_path(&env_path);
        }
    }

    let cli = Cli::parse();
    init_logger(&cli.config).context("Failed to initialize logger")?;

    if let Err(e) = run(cli).await {
        eprintln!("page_pointer error: {e:#}");
        process::exit(1);
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.config;
    match cli.command {
        Command::Parse { source } => {
            let page = OpenGraph::fetch(&source)
                .await
                .with_context(|| format!("No Open Graph data found in {source}"))?;
            let output = json!({
                "properties": page,
                "schema": page.schema(),
                "has_location": page.has_location(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Command::Preview {
            url,
            import_flag,
            refresh,
        } => {
            let pointer = PagePointer::open(&config).await?;
            if refresh {
                pointer.forget_preview(&url).await?;
            }
            match pointer.preview(&url).await {
                Ok(preview) => println!("{}", preview.render_html(import_flag)),
                Err(e) => println!("{}", render_error(&e.to_string())),
            }
        }
        Command::Save { post, url, import } => {
            let pointer = PagePointer::open(&config).await?;
            let outcome = pointer
                .save_post(SavePost {
                    post_id: post,
                    url: Some(url),
                    import,
                })
                .await
                .with_context(|| format!("Failed to save post {post}"))?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        Command::Redirect { post } => {
            let pointer = PagePointer::open(&config).await?;
            match pointer.redirect_target(post).await? {
                Some(target) => println!("{target}"),
                None => anyhow::bail!("Post {post} is not a pointer"),
            }
        }
        Command::List => {
            let pointer = PagePointer::open(&config).await?;
            let pointers = pointer
                .list_pointers()
                .await
                .context("Failed to list pointer posts")?;
            println!("{}", serde_json::to_string_pretty(&pointers)?);
        }
        Command::Purge => {
            let pointer = PagePointer::open(&config).await?;
            let purged = pointer.purge_expired_cache().await?;
            println!("Purged {purged} expired cache entries");
        }
        Command::Serve { port } => {
            let pointer = Arc::new(PagePointer::open(&config).await?);
            start_server(port, ServerState::new(pointer)).await?;
        }
    }
    Ok(())
}
