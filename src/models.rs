//! Data structures describing per-asset cache invalidation rules.

use serde::{Deserialize, Serialize};

/// A single cache invalidation rule for an enqueued asset.
///
/// Exactly one of [`version`](Self::version) or [`file_path`](Self::file_path)
/// should be set. When both are present the fixed version wins; when neither
/// is present the rule is a no-op for its handle.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssetRule {
  /// Handle the asset was enqueued under.
  pub handle: String,
  /// Fixed value for the `ver` query parameter (static invalidation).
  pub version: Option<String>,
  /// Path of the asset file relative to the asset root (dynamic invalidation).
  pub file_path: Option<String>,
}

impl AssetRule {
  /// Fixed version string, when configured and non-empty.
  pub fn static_version(&self) -> Option<&str> {
    self.version.as_deref().filter(|value| !value.is_empty())
  }

  /// Relative path of the file to stat, when configured and non-empty.
  pub fn tracked_file(&self) -> Option<&str> {
    self.file_path.as_deref().filter(|value| !value.is_empty())
  }
}

/// Ordered, immutable collection of asset rules.
///
/// Fixed at configuration time. Lookup scans in declaration order, so the
/// first rule wins when a handle is configured twice.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct RuleSet {
  rules: Vec<AssetRule>,
}

impl RuleSet {
  /// Build a rule set preserving the declaration order of `rules`.
  pub fn new(rules: Vec<AssetRule>) -> Self {
    Self { rules }
  }

  /// First rule configured for `handle`, if any.
  pub fn find(&self, handle: &str) -> Option<&AssetRule> {
    self.rules.iter().find(|rule| rule.handle == handle)
  }

  /// Returns `true` when no rules are configured.
  pub fn is_empty(&self) -> bool {
    self.rules.is_empty()
  }

  /// Number of configured rules.
  pub fn len(&self) -> usize {
    self.rules.len()
  }

  /// Iterate over the rules in declaration order.
  pub fn iter(&self) -> impl Iterator<Item = &AssetRule> {
    self.rules.iter()
  }
}

impl From<Vec<AssetRule>> for RuleSet {
  fn from(rules: Vec<AssetRule>) -> Self {
    Self::new(rules)
  }
}
