//! CLI entry point for postdeck

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "postdeck")]
#[command(version)]
#[command(about = "Schema-validated Markdown content collections", long_about = None)]
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
    /// Initialize a new site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// Slug (defaults to the slugified title)
        #[arg(short, long)]
        slug: Option<String>,

        /// Short description
        #[arg(short = 'D', long)]
        description: Option<String>,
    },

    /// Validate every collection
    #[command(alias = "c")]
    Check {
        /// Re-check whenever content or config changes
        #[arg(short, long)]
        watch: bool,
    },

    /// List the entries of a collection
    #[command(alias = "ls")]
    List {
        /// Collection name (defaults to the first configured one)
        #[arg(short = 'C', long)]
        collection: Option<String>,

        /// Only entries with this tag
        #[arg(short, long)]
        tag: Option<String>,

        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },

    /// List tags with post counts
    Tags {
        /// Collection name (defaults to the first configured one)
        #[arg(short = 'C', long)]
        collection: Option<String>,
    },

    /// Show one post by slug
    Show {
        slug: String,

        /// Collection name (defaults to the first configured one)
        #[arg(short = 'C', long)]
        collection: Option<String>,

        /// Print the rendered body instead of the record
        #[arg(long)]
        html: bool,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "postdeck=debug,info"
    } else {
        "postdeck=info"
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
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing site in {:?}", target_dir);
            postdeck::commands::init::init_site(&target_dir)?;
            println!("Initialized site in {:?}", target_dir);
        }

        Commands::New {
            title,
            slug,
            description,
        } => {
            let site = postdeck::Site::new(&base_dir)?;
            tracing::info!("Creating new post with title: {}", title);
            postdeck::commands::new::create_post(
                &site,
                &title,
                slug.as_deref(),
                description.as_deref(),
            )?;
        }

        Commands::Check { watch } => {
            let site = postdeck::Site::new(&base_dir)?;
            let result = postdeck::commands::check::run(&site);

            if watch {
                if let Err(e) = &result {
                    tracing::error!("Check failed: {}", e);
                }
                postdeck::commands::check::watch(&site).await?;
            } else {
                result?;
                println!("All collections valid.");
            }
        }

        Commands::List {
            collection,
            tag,
            json,
        } => {
            let site = postdeck::Site::new(&base_dir)?;
            postdeck::commands::list::run(&site, collection.as_deref(), tag.as_deref(), json)?;
        }

        Commands::Tags { collection } => {
            let site = postdeck::Site::new(&base_dir)?;
            postdeck::commands::list::tags(&site, collection.as_deref())?;
        }

        Commands::Show {
            slug,
            collection,
            html,
        } => {
            let site = postdeck::Site::new(&base_dir)?;
            postdeck::commands::show::run(&site, &slug, collection.as_deref(), html)?;
        }

        Commands::Version => {
            println!("postdeck version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
