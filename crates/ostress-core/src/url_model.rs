//! Object URLs and local file names for manifest entries.

use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum UrlError {
    #[error(transparent)]
    Parse(#[from] url::ParseError),
    #[error("unsupported scheme {0:?}, expected http or https")]
    UnsupportedScheme(String),
    #[error("URL cannot carry a path")]
    CannotBeABase,
}

/// Parse and check an object-store base URL.
pub fn parse_base(base: &str) -> Result<Url, UrlError> {
    let url = Url::parse(base)?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(UrlError::UnsupportedScheme(other.to_string())),
    }
    if url.cannot_be_a_base() {
        return Err(UrlError::CannotBeABase);
    }
    Ok(url)
}

/// `{base}/{collection}/{entry}`. Each `/`-separated piece of `collection` and
/// `entry` becomes its own percent-encoded path segment.
///
/// A trailing `/` on `base` does not produce an empty segment.
pub fn object_url(base: &str, collection: &str, entry: &str) -> Result<Url, UrlError> {
    let mut url = parse_base(base)?;
    url.path_segments_mut()
        .map_err(|_| UrlError::CannotBeABase)?
        .pop_if_empty()
        .extend(collection.split('/').filter(|s| !s.is_empty()))
        .extend(entry.split('/').filter(|s| !s.is_empty()));
    Ok(url)
}

/// Name under which a manifest entry is saved in the work directory.
///
/// Uses the last `/`-separated segment; NUL, backslash and control characters
/// become `_`. Returns `None` when nothing usable is left (empty, `.`, `..`).
pub fn local_filename(entry: &str) -> Option<String> {
    let segment = entry.trim().rsplit('/').find(|s| !s.is_empty())?;
    let name: String = segment
        .chars()
        .map(|c| {
            if c == '\0' || c == '\\' || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();
    if name == "." || name == ".." {
        return None;
    }
    Some(name)
}

/// Last path segment of a URL, for one-off fetches without an explicit output path.
pub fn filename_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.filter(|s| !s.is_empty()).last()?;
    local_filename(segment)
}
