//! Command-line front end for resolving and rewriting asset URLs.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cache_buster::html::rewrite_asset_tags;
use cache_buster::{BusterConfig, VersionResolver};

#[derive(Parser)]
#[command(name = "cachebust")]
#[command(about = "Rewrite the version query parameter of CSS/JS asset URLs", long_about = None)]
#[command(version)]
struct Cli {
  /// Path to the configuration JSON file (default: ./cachebust.config.json)
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  /// Directory that relative asset paths resolve against
  #[arg(long, global = true)]
  root: Option<PathBuf>,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Resolve a single asset URL and print the result
  Resolve {
    /// Handle the asset was enqueued under
    handle: String,

    /// Asset URL to rewrite
    url: String,
  },

  /// Rewrite the enqueued asset tags of an HTML document
  Rewrite {
    /// Path to the HTML document
    file: PathBuf,

    /// Output path (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
  },
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  let resolver = load_resolver(cli.config.as_deref(), cli.root.as_deref())?;

  match cli.command {
    Commands::Resolve { handle, url } => {
      println!("{}", resolver.resolve(&url, &handle));
      Ok(())
    }
    Commands::Rewrite { file, output } => {
      let html = fs::read_to_string(&file)
        .with_context(|| format!("failed to read {}", file.display()))?;
      let rewritten = rewrite_asset_tags(&resolver, &html);

      match output {
        Some(path) => fs::write(&path, rewritten)
          .with_context(|| format!("failed to write {}", path.display()))?,
        None => print!("{rewritten}"),
      }
      Ok(())
    }
  }
}

/// Load configuration and build the resolver, honouring CLI overrides.
fn load_resolver(config_path: Option<&Path>, root: Option<&Path>) -> Result<VersionResolver> {
  let cwd = std::env::current_dir().context("failed to determine working directory")?;

  let (mut config, config_dir) = match config_path {
    Some(path) => {
      let loaded = BusterConfig::from_path(path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;
      let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map_or_else(|| cwd.clone(), Path::to_path_buf);
      (loaded, dir)
    }
    None => (BusterConfig::discover(&cwd), cwd.clone()),
  };

  if let Some(root) = root {
    config.root = Some(cwd.join(root));
  }

  Ok(config.into_resolver(&config_dir))
}
