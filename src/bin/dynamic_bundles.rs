//! Command line front end printing the bundles a set of asset directories resolves to.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use dynamic_bundles::{
  AssetRoot, AssetType, Bundle, BundleFactories, BundlerConfig, DynamicBundlesBuilder,
  InMemoryBundleCollection, MemoryCache,
};

#[derive(Debug, Parser)]
#[command(name = "dynamic-bundles", version, about = "Resolve view asset directories into bundles")]
struct Cli {
  /// Project directory that `~` refers to.
  #[arg(long, default_value = ".")]
  root: PathBuf,

  /// Configuration file; defaults to dynamic-bundles.config.json in the root when present.
  #[arg(long)]
  config: Option<PathBuf>,

  /// Increase log output (-v info, -vv debug). RUST_LOG takes precedence.
  #[arg(short, long, action = ArgAction::Count)]
  verbose: u8,

  /// Asset directories, e.g. `Views/Account/Details` or `'~/Views/Account/Details'`.
  #[arg(required = true)]
  directories: Vec<String>,
}

#[derive(Serialize)]
struct Report<'a> {
  scripts: Vec<&'a Bundle>,
  styles: Vec<&'a Bundle>,
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let config = match &cli.config {
    Some(path) => BundlerConfig::from_path(path)?,
    None => BundlerConfig::discover(&cli.root)?,
  };

  let directories: Vec<String> = cli
    .directories
    .iter()
    .map(|directory| as_virtual_directory(directory))
    .collect();

  let cache = MemoryCache::new();
  let mut builder = DynamicBundlesBuilder::new(
    AssetRoot::new(&cli.root),
    config,
    &cache,
    InMemoryBundleCollection::new(),
    BundleFactories::plain(),
  );
  let output = builder
    .build(directories.as_slice())
    .with_context(|| format!("failed to build bundles below {}", cli.root.display()))?;

  let collection = builder.collection();
  let lookup = |asset_type: AssetType| {
    output
      .bundle_virtual_paths(asset_type)
      .iter()
      .filter_map(|path| collection.get(path))
      .collect::<Vec<&Bundle>>()
  };
  let report = Report {
    scripts: lookup(AssetType::Script),
    styles: lookup(AssetType::StyleSheet),
  };

  let json = serde_json::to_string_pretty(&report).context("failed to serialise bundle report")?;
  println!("{json}");
  Ok(())
}

/// Accept directories with or without the leading `~/`, since shells expand an unquoted `~`.
fn as_virtual_directory(value: &str) -> String {
  let value = value.trim().replace('\\', "/");
  if value.starts_with('~') {
    value
  } else {
    format!("~/{}", value.trim_start_matches("./").trim_start_matches('/'))
  }
}

fn default_level(verbosity: u8) -> &'static str {
  match verbosity {
    0 => "warn",
    1 => "info",
    _ => "debug",
  }
}

fn init_tracing(verbosity: u8) {
  let filter = EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| EnvFilter::new(default_level(verbosity)));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .init();
}
