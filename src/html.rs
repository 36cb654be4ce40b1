//! Rewrite pass applying version resolution to a finalized HTML document.

use regex::{Captures, Regex};

use crate::resolver::VersionResolver;

/// Rewrite the URLs of enqueued stylesheet and script tags in `html`.
///
/// Scans `<link>` and `<script>` tags carrying both an `id` attribute and an
/// `href`/`src` URL. The handle is the tag id with the conventional `-css`
/// or `-js` suffix removed. Tags without an id, without a URL, or without a
/// matching rule pass through untouched.
pub fn rewrite_asset_tags(resolver: &VersionResolver, html: &str) -> String {
  let tag_pattern = Regex::new(r"<(?:link|script)\b[^>]*>").expect("invalid tag regex");
  let url_pattern = Regex::new(r#"\b(src|href)\s*=\s*"([^"]*)""#).expect("invalid url regex");
  let id_pattern = Regex::new(r#"\bid\s*=\s*"([^"]*)""#).expect("invalid id regex");

  tag_pattern
    .replace_all(html, |caps: &Captures| {
      let tag = &caps[0];

      let Some(id_caps) = id_pattern.captures(tag) else {
        return tag.to_string();
      };
      let Some(url_caps) = url_pattern.captures(tag) else {
        return tag.to_string();
      };

      let url = &url_caps[2];
      let resolved = resolver.resolve(url, handle_from_id(&id_caps[1]));
      if resolved == url {
        return tag.to_string();
      }

      let attribute = format!("{}=\"{}\"", &url_caps[1], resolved);
      tag.replacen(&url_caps[0], &attribute, 1)
    })
    .into_owned()
}

/// Strip the `-css`/`-js` suffix the enqueue mechanism appends to tag ids.
fn handle_from_id(id: &str) -> &str {
  id.strip_suffix("-css")
    .or_else(|| id.strip_suffix("-js"))
    .unwrap_or(id)
}
