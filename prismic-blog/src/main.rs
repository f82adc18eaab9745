use anyhow::Context;
use clap::{Parser, Subcommand};
use prismic_blog::{BlogConfig, BlogSite};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "prismic-blog", about = "Build blog page data from a Prismic repository")]
struct Cli {
    /// Overrides PRISMIC_API_ENDPOINT.
    #[arg(long, env = "PRISMIC_API_ENDPOINT")]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the listing page.
    List {
        /// Keep loading until every page has been fetched.
        #[arg(long)]
        all: bool,
    },
    /// Print every post slug.
    Paths,
    /// Print the page data of one post.
    Show {
        slug: String,
        #[arg(long)]
        preview_ref: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match cli.endpoint {
        Some(endpoint) => BlogConfig::from_lookup(|key| match key {
            "PRISMIC_API_ENDPOINT" => Some(endpoint.clone()),
            other => std::env::var(other).ok(),
        }),
        None => BlogConfig::from_env(),
    }
    .context("Failed to load blog configuration")?;

    info!("Using content API at {}", config.api_endpoint);
    let site = BlogSite::connect(&config)?;

    match cli.command {
        Command::List { all } => {
            let mut listing = site.home().await.context("Failed to fetch the first page")?;
            while all && !listing.is_exhausted() {
                listing = site.load_more(&listing).await.context("Failed to load more posts")?;
            }
            print_json(&site.listing_items(&listing)?)?;
        }
        Command::Paths => {
            print_json(&site.static_paths().await?)?;
        }
        Command::Show { slug, preview_ref } => {
            let page = site
                .post_page(&slug, preview_ref.as_deref())
                .await
                .with_context(|| format!("Failed to build page for {slug}"))?;
            print_json(&page)?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
