//! Version resolution for enqueued asset URLs.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use crate::models::{AssetRule, RuleSet};
use crate::query::set_query_param;

/// Query parameter carrying the cache-busting version.
pub const VERSION_PARAM: &str = "ver";

/// Rewrites asset URLs according to an immutable set of invalidation rules.
///
/// Construct one per process with the configured [`RuleSet`] and the root
/// directory that relative asset paths resolve against. Resolution never
/// fails: a rule that cannot be applied leaves the URL untouched, so the
/// worst case is a stale cached asset rather than a broken page.
#[derive(Debug, Clone)]
pub struct VersionResolver {
  rules: RuleSet,
  root: PathBuf,
}

impl VersionResolver {
  /// Create a resolver for `rules`, resolving relative paths against `root`.
  pub fn new(rules: RuleSet, root: impl Into<PathBuf>) -> Self {
    Self {
      rules,
      root: root.into(),
    }
  }

  /// Rules this resolver applies.
  pub fn rules(&self) -> &RuleSet {
    &self.rules
  }

  /// Root directory relative asset paths resolve against.
  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Return `url` with its `ver` query parameter set according to the rule
  /// configured for `handle`, or unchanged when no rule applies.
  ///
  /// A fixed version takes precedence over a tracked file path. For tracked
  /// files the parameter becomes the file's last-modified time in seconds
  /// since the Unix epoch, so any edit to the file changes the URL.
  pub fn resolve(&self, url: &str, handle: &str) -> String {
    let Some(rule) = self.rules.find(handle) else {
      return url.to_string();
    };

    tracing::debug!(handle, url, "before");

    if let Some(version) = rule.static_version() {
      let rewritten = set_query_param(url, VERSION_PARAM, version);
      tracing::debug!(handle, url = rewritten.as_str(), "after");
      return rewritten;
    }

    if let Some(rewritten) = self.resolve_tracked(url, handle, rule) {
      tracing::debug!(handle, url = rewritten.as_str(), "after");
      return rewritten;
    }

    url.to_string()
  }

  fn resolve_tracked(&self, url: &str, handle: &str, rule: &AssetRule) -> Option<String> {
    let relative = rule.tracked_file()?;
    let full_path = self.root.join(relative);

    if !full_path.exists() {
      tracing::warn!(
        handle,
        path = %full_path.display(),
        "cannot invalidate cache, asset file does not exist"
      );
      return None;
    }

    let last_modified = modified_epoch_seconds(&full_path)?;
    Some(set_query_param(url, VERSION_PARAM, &last_modified.to_string()))
  }
}

/// Last-modified time of `path` in whole seconds since the Unix epoch.
///
/// Returns `None` when the metadata cannot be read or the timestamp is zero
/// or precedes the epoch.
fn modified_epoch_seconds(path: &Path) -> Option<u64> {
  let modified = fs::metadata(path).ok()?.modified().ok()?;
  let seconds = modified.duration_since(UNIX_EPOCH).ok()?.as_secs();
  (seconds > 0).then_some(seconds)
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  fn rule(handle: &str, version: Option<&str>, file_path: Option<&str>) -> AssetRule {
    AssetRule {
      handle: handle.into(),
      version: version.map(Into::into),
      file_path: file_path.map(Into::into),
    }
  }

  fn resolver(root: &Path, rules: Vec<AssetRule>) -> VersionResolver {
    VersionResolver::new(RuleSet::new(rules), root)
  }

  #[test]
  fn leaves_urls_untouched_for_unconfigured_handles() {
    let dir = tempdir().expect("failed to create temp dir");
    let resolver = resolver(dir.path(), vec![rule("app-js", Some("42"), None)]);

    let url = "https://site/other.js?foo=bar";
    assert_eq!(resolver.resolve(url, "other-js"), url);
  }

  #[test]
  fn applies_fixed_versions_after_existing_parameters() {
    let dir = tempdir().expect("failed to create temp dir");
    let resolver = resolver(dir.path(), vec![rule("app-js", Some("42"), None)]);

    assert_eq!(
      resolver.resolve("https://site/app.js?foo=bar", "app-js"),
      "https://site/app.js?foo=bar&ver=42"
    );
  }

  #[test]
  fn replaces_a_preexisting_version_parameter() {
    let dir = tempdir().expect("failed to create temp dir");
    let resolver = resolver(dir.path(), vec![rule("app-js", Some("1.2.3"), None)]);

    assert_eq!(
      resolver.resolve("https://site/app.js?ver=0.9", "app-js"),
      "https://site/app.js?ver=1.2.3"
    );
  }

  #[test]
  fn uses_the_file_modification_time_for_tracked_assets() {
    let dir = tempdir().expect("failed to create temp dir");
    let asset = dir.path().join("static").join("app.js");
    fs::create_dir_all(asset.parent().expect("asset path should have a parent"))
      .expect("failed to create asset dir");
    fs::write(&asset, "console.log('hi');").expect("failed to write asset");

    let expected = fs::metadata(&asset)
      .expect("failed to stat asset")
      .modified()
      .expect("failed to read modification time")
      .duration_since(UNIX_EPOCH)
      .expect("modification time should follow the epoch")
      .as_secs();

    let resolver = resolver(
      dir.path(),
      vec![rule("app-js", None, Some("static/app.js"))],
    );

    assert_eq!(
      resolver.resolve("https://site/app.js", "app-js"),
      format!("https://site/app.js?ver={expected}")
    );
  }

  #[test]
  fn leaves_urls_untouched_when_the_tracked_file_is_missing() {
    let dir = tempdir().expect("failed to create temp dir");
    let resolver = resolver(
      dir.path(),
      vec![rule("app-js", None, Some("static/missing.js"))],
    );

    let url = "https://site/app.js?foo=bar";
    assert_eq!(resolver.resolve(url, "app-js"), url);
  }

  #[test]
  fn prefers_the_fixed_version_over_a_tracked_file() {
    let dir = tempdir().expect("failed to create temp dir");
    let asset = dir.path().join("app.js");
    fs::write(&asset, "content").expect("failed to write asset");

    let resolver = resolver(
      dir.path(),
      vec![rule("app-js", Some("7"), Some("app.js"))],
    );

    assert_eq!(
      resolver.resolve("https://site/app.js", "app-js"),
      "https://site/app.js?ver=7"
    );
  }

  #[test]
  fn rules_without_either_field_are_no_ops() {
    let dir = tempdir().expect("failed to create temp dir");
    let resolver = resolver(dir.path(), vec![rule("app-js", None, None)]);

    let url = "https://site/app.js";
    assert_eq!(resolver.resolve(url, "app-js"), url);
  }

  #[test]
  fn resolving_twice_yields_the_same_url() {
    let dir = tempdir().expect("failed to create temp dir");
    let resolver = resolver(dir.path(), vec![rule("app-js", Some("42"), None)]);

    let once = resolver.resolve("https://site/app.js?foo=bar", "app-js");
    let twice = resolver.resolve(&once, "app-js");
    assert_eq!(once, twice);
  }
}
