//! Open Graph metadata extraction.
//!
//! This module turns raw, possibly malformed HTML into an [`OpenGraph`] page:
//! - every `<meta property="og:*">` tag, keyed by its normalized suffix
//! - a virtual `schema` key derived from `og:type`
//! - a location check over the coordinate and address properties
//!
//! Parsing is done with the `scraper` crate, whose HTML5 tree builder recovers
//! from unclosed tags and invalid nesting instead of failing.

mod schema;

use std::sync::LazyLock;

use indexmap::IndexMap;
use log::{debug, warn};
use scraper::{Html, Selector};
use serde::Serialize;

use crate::error_handling::FetchError;

pub use schema::Schema;

const META_SELECTOR_STR: &str = "meta";

/// Attribute prefix selecting Open Graph properties.
pub const OG_PREFIX: &str = "og:";

/// Virtual key answered by classifying `type` instead of a stored value.
pub const SCHEMA_KEY: &str = "schema";

const COORDINATE_KEYS: [&str; 2] = ["latitude", "longitude"];
const ADDRESS_KEYS: [&str; 5] = [
    "street_address",
    "locality",
    "region",
    "postal_code",
    "country_name",
];

static META_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    crate::utils::parse_selector_with_fallback(META_SELECTOR_STR, "Open Graph meta extraction")
});

/// Open Graph data parsed from a single HTML document.
///
/// Keys are the `og:` suffix with every `-` replaced by `_` (`og:site-name`
/// becomes `site_name`). When a property appears more than once, the last
/// value wins but the key keeps the position of its first occurrence.
///
/// A page is never empty: [`OpenGraph::parse`] returns `None` instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OpenGraph {
    values: IndexMap<String, String>,
}

impl OpenGraph {
    /// Parses HTML and extracts its Open Graph properties.
    ///
    /// Never fails on malformed markup. Returns `None` when the document has no
    /// `meta` elements or none of them carries an `og:`-prefixed `property`.
    /// A matching tag without a `content` attribute stores an empty string.
    pub fn parse(html: &str) -> Option<OpenGraph> {
        let document = Html::parse_document(html);
        if !document.errors.is_empty() {
            debug!(
                "Recovered from {} HTML parse errors while extracting Open Graph data",
                document.errors.len()
            );
        }

        let mut meta_count = 0usize;
        let mut values = IndexMap::new();
        for element in document.select(&META_SELECTOR) {
            meta_count += 1;
            let Some(property) = element.value().attr("property") else {
                continue;
            };
            let Some(suffix) = property.strip_prefix(OG_PREFIX) else {
                continue;
            };
            let content = element.value().attr("content").unwrap_or_default();
            values.insert(normalize_key(suffix), content.to_string());
        }

        if meta_count == 0 {
            debug!("No meta elements found in document");
            return None;
        }
        if values.is_empty() {
            debug!("No Open Graph properties among {meta_count} meta elements");
            return None;
        }

        debug!(
            "Extracted {} Open Graph properties from {} meta elements",
            values.len(),
            meta_count
        );
        Some(OpenGraph { values })
    }

    /// Reads the full document at `uri` and parses it.
    ///
    /// `http`/`https` URIs are downloaded, `file://` URIs and plain paths are
    /// read from disk. No timeout or retry is applied. Read failures are
    /// logged and reported as `None`, the same as a page without Open Graph data.
    pub async fn fetch(uri: &str) -> Option<OpenGraph> {
        match read_uri(uri).await {
            Ok(body) => OpenGraph::parse(&String::from_utf8_lossy(&body)),
            Err(e) => {
                warn!("Failed to read {uri} for Open Graph data: {e}");
                None
            }
        }
    }

    /// Looks up a property by key.
    ///
    /// `"schema"` is virtual: it ignores stored values and returns the schema
    /// name admitting the page's `type`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        if key == SCHEMA_KEY {
            return self.schema().map(Schema::name);
        }
        self.values.get(key).map(String::as_str)
    }

    /// Returns whether `key` is stored on the page. `"schema"` is not special here.
    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// All stored keys in document order.
    pub fn keys(&self) -> Vec<&str> {
        self.values.keys().map(String::as_str).collect()
    }

    /// Iterates `(key, value)` pairs in the same order as [`OpenGraph::keys`].
    ///
    /// Every call starts an independent traversal.
    pub fn iter(&self) -> Entries<'_> {
        Entries {
            inner: self.values.iter(),
        }
    }

    /// Alias of [`OpenGraph::iter`].
    pub fn entries(&self) -> Entries<'_> {
        self.iter()
    }

    /// Number of stored properties.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always `false` for a page produced by [`OpenGraph::parse`].
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Schema classifying the page's `type`.
    pub fn schema(&self) -> Option<Schema> {
        self.values
            .get("type")
            .and_then(|og_type| Schema::for_type(og_type))
    }

    /// Returns `true` if the page embeds coordinates or a complete address.
    ///
    /// Both `latitude` and `longitude` must be present, or all five of
    /// `street_address`, `locality`, `region`, `postal_code` and `country_name`.
    pub fn has_location(&self) -> bool {
        COORDINATE_KEYS.iter().all(|key| self.has(key))
            || ADDRESS_KEYS.iter().all(|key| self.has(key))
    }

    /// Shorthand for `og:title`.
    pub fn title(&self) -> Option<&str> {
        self.get("title")
    }

    /// Shorthand for `og:image`.
    pub fn image(&self) -> Option<&str> {
        self.get("image")
    }

    /// Shorthand for `og:site_name` (or `og:site-name`).
    pub fn site_name(&self) -> Option<&str> {
        self.get("site_name")
    }

    /// Shorthand for `og:type`.
    pub fn og_type(&self) -> Option<&str> {
        self.get("type")
    }

    /// Shorthand for `og:url`.
    pub fn url(&self) -> Option<&str> {
        self.get("url")
    }

    /// Shorthand for `og:description`.
    pub fn description(&self) -> Option<&str> {
        self.get("description")
    }
}

impl<'a> IntoIterator for &'a OpenGraph {
    type Item = (&'a str, &'a str);
    type IntoIter = Entries<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Borrowing iterator over an [`OpenGraph`] page's properties.
#[derive(Debug, Clone)]
pub struct Entries<'a> {
    inner: indexmap::map::Iter<'a, String, String>,
}

impl<'a> Iterator for Entries<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Entries<'_> {}

/// Maps an `og:` suffix to its lookup key.
fn normalize_key(suffix: &str) -> String {
    suffix.replace('-', "_")
}

async fn read_uri(uri: &str) -> Result<Vec<u8>, FetchError> {
    match url::Url::parse(uri) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {
            let response = reqwest::get(parsed).await?.error_for_status()?;
            Ok(response.bytes().await?.to_vec())
        }
        Ok(parsed) if parsed.scheme() == "file" => {
            let path = parsed
                .to_file_path()
                .map_err(|_| FetchError::InvalidUrl(uri.to_string()))?;
            Ok(tokio::fs::read(path).await?)
        }
        _ => Ok(tokio::fs::read(uri).await?),
    }
}
