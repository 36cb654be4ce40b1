//! Query-string manipulation for asset URLs.

/// Return `url` with the query parameter `key` set to `value` exactly once.
///
/// An existing occurrence of `key` is replaced in place and duplicates
/// collapse into one; other parameters, their order and any `#fragment`
/// suffix are preserved. When the key is absent the pair is appended.
pub fn set_query_param(url: &str, key: &str, value: &str) -> String {
  let (base, fragment) = match url.split_once('#') {
    Some((base, fragment)) => (base, Some(fragment)),
    None => (url, None),
  };

  let (path, query) = match base.split_once('?') {
    Some((path, query)) => (path, Some(query)),
    None => (base, None),
  };

  let mut pairs: Vec<String> = Vec::new();
  let mut replaced = false;

  for pair in query
    .unwrap_or_default()
    .split('&')
    .filter(|pair| !pair.is_empty())
  {
    let name = pair.split_once('=').map_or(pair, |(name, _)| name);
    if name == key {
      if !replaced {
        pairs.push(format!("{key}={value}"));
        replaced = true;
      }
    } else {
      pairs.push(pair.to_string());
    }
  }

  if !replaced {
    pairs.push(format!("{key}={value}"));
  }

  let mut rewritten = format!("{path}?{}", pairs.join("&"));
  if let Some(fragment) = fragment {
    rewritten.push('#');
    rewritten.push_str(fragment);
  }

  rewritten
}
