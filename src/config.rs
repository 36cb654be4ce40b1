//! Configuration loader describing asset invalidation rules.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::models::{AssetRule, RuleSet};
use crate::resolver::VersionResolver;

const DEFAULT_CONFIG_FILE: &str = "cachebust.config.json";

/// Discoverable configuration listing assets whose cache should be invalidated.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BusterConfig {
  /// Directory that relative asset paths resolve against. Defaults to the
  /// directory the configuration was discovered in.
  pub root: Option<PathBuf>,
  /// Per-asset invalidation rules, applied in declaration order.
  pub assets: Vec<AssetRule>,
}

impl BusterConfig {
  /// Attempt to load configuration from the provided directory.
  ///
  /// When the configuration file does not exist or fails to parse we fall
  /// back to an empty rule list so downstream callers degrade to leaving
  /// URLs untouched.
  pub fn discover(dir: &Path) -> Self {
    let candidate = dir.join(DEFAULT_CONFIG_FILE);
    Self::from_path(&candidate).unwrap_or_default()
  }

  /// Read configuration from a specific JSON file.
  pub fn from_path(path: &Path) -> Option<Self> {
    let content = fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
  }

  /// Build the resolver described by this configuration.
  ///
  /// `default_root` is used when no root directory is configured; a relative
  /// configured root is resolved against it.
  pub fn into_resolver(self, default_root: &Path) -> VersionResolver {
    let root = match self.root {
      Some(root) if root.is_absolute() => root,
      Some(root) => default_root.join(root),
      None => default_root.to_path_buf(),
    };

    VersionResolver::new(RuleSet::new(self.assets), root)
  }
}
