//! CLI entry point for mdblog

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "mdblog")]
#[command(author = "Yukang Chen")]
#[command(version)]
#[command(about = "A markdown blog backend with search, tags and table-of-contents anchors", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
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
    /// Serve the JSON API
    #[command(alias = "s")]
    Serve {
        /// Port to listen on (defaults to server.port in _config.yml)
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to (defaults to server.ip in _config.yml)
        #[arg(short, long)]
        ip: Option<String>,
    },

    /// List site information
    List {
        /// Type of content to list (post, tag)
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Search posts by title, excerpt and tags
    Search {
        /// Search query
        query: String,
    },

    /// List posts carrying a tag
    Tag {
        /// Tag name (case-sensitive)
        tag: String,
    },

    /// Print the table of contents of a post
    Outline {
        /// Post slug
        slug: String,
    },

    /// Print the rendered HTML of a post
    Render {
        /// Post slug
        slug: String,

        /// Colour scheme for code highlighting (light, dark)
        #[arg(short, long)]
        theme: Option<String>,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "mdblog=debug,info"
    } else {
        "mdblog=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("cannot determine current directory")?,
    };

    match cli.command {
        Commands::Serve { port, ip } => {
            let blog = mdblog::Blog::new(&base_dir)?;
            let ip = ip.unwrap_or_else(|| blog.config.server.ip.clone());
            let port = port.unwrap_or(blog.config.server.port);
            tracing::info!("Starting server at http://{}:{}", ip, port);
            mdblog::server::start(&blog, &ip, port).await?;
        }

        Commands::List { r#type } => {
            let blog = mdblog::Blog::new(&base_dir)?;
            mdblog::commands::list::run(&blog, &r#type)?;
        }

        Commands::Search { query } => {
            let blog = mdblog::Blog::new(&base_dir)?;
            mdblog::commands::search::run(&blog, &query)?;
        }

        Commands::Tag { tag } => {
            let blog = mdblog::Blog::new(&base_dir)?;
            mdblog::commands::search::by_tag(&blog, &tag)?;
        }

        Commands::Outline { slug } => {
            let blog = mdblog::Blog::new(&base_dir)?;
            mdblog::commands::show::outline(&blog, &slug)?;
        }

        Commands::Render { slug, theme } => {
            let blog = mdblog::Blog::new(&base_dir)?;
            mdblog::commands::show::render(&blog, &slug, theme.as_deref())?;
        }

        Commands::Version => {
            println!("mdblog version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
