use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

use atomfeed::atom::{self, Atom, AtomFeed};
use atomfeed::config::Config;
use atomfeed::feed::Feed;

#[derive(Parser, Debug)]
#[command(name = "atomfeed", about = "Generate, parse and fetch Atom 1.0 feeds")]
struct Args {
    /// Config file (defaults to ~/.config/atomfeed/config.toml)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a generic feed (JSON) into an Atom document
    Convert {
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
    /// Parse an Atom document and print a summary
    Parse {
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
    /// Download an Atom document and print a summary
    Fetch {
        #[arg(value_name = "URL")]
        url: String,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let path = match path {
        Some(p) => p.clone(),
        None => match Config::default_path() {
            Some(p) => p,
            None => return Ok(Config::default()),
        },
    };
    Config::load(&path).with_context(|| format!("Failed to load config: {}", path.display()))
}

fn print_summary(feed: &AtomFeed) -> Result<()> {
    let mut out = std::io::stdout().lock();
    writeln!(out, "{}", feed.title)?;
    writeln!(out, "  id:      {}", feed.id)?;
    writeln!(out, "  updated: {}", feed.updated)?;
    if let Some(href) = feed.link("self") {
        writeln!(out, "  self:    {}", href)?;
    }
    writeln!(out, "  entries: {}", feed.entries.len())?;
    for entry in &feed.entries {
        let href = entry.link("alternate").or_else(|| entry.link("")).unwrap_or("");
        writeln!(out, "  - {} {}", entry.title, href)?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(args.config.as_ref())?;

    match args.command {
        Command::Convert { input } => {
            let content = std::fs::read_to_string(&input)
                .with_context(|| format!("Failed to read feed file: {}", input.display()))?;
            let feed: Feed = serde_json::from_str(&content)
                .with_context(|| format!("Invalid feed JSON in {}", input.display()))?;
            tracing::debug!(items = feed.items.len(), "Converting feed to Atom");

            let source = Atom::new(&feed);
            let xml = if config.pretty {
                atom::to_xml(&source)?
            } else {
                atom::to_xml_compact(&source)?
            };
            std::io::stdout()
                .lock()
                .write_all(xml.as_bytes())
                .context("Failed to write output")?;
        }
        Command::Parse { input } => {
            let content = std::fs::read_to_string(&input)
                .with_context(|| format!("Failed to read Atom file: {}", input.display()))?;
            let feed = atom::parse_atom_feed(&content)
                .with_context(|| format!("Failed to parse {}", input.display()))?;
            print_summary(&feed)?;
        }
        Command::Fetch { url } => {
            let client = config
                .http_client()
                .context("Failed to build HTTP client")?;
            let feed = atom::download_atom_feed(&client, &url)
                .await
                .with_context(|| format!("Failed to fetch {}", url))?;
            print_summary(&feed)?;
        }
    }

    Ok(())
}
