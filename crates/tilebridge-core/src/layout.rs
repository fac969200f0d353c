//! Store layout: where chunk files live relative to the store's base URL.
//!
//! Layout on the store side:
//!   {base_url}/{chunk_dir}[/{map}]/{file_name}
//!
//! `resource_path` is the pure, deterministic half (string form, used in
//! logs and by the CLI). `chunk_url` is what the client actually GETs; it
//! percent-encodes each segment, and a static file server decodes it back
//! to the exact file name.

use url::Url;

use crate::chunk_id::{validate_segment, ChunkId, IdError};

#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("invalid base url {0:?}: {1}")]
    InvalidBaseUrl(String, url::ParseError),
    #[error("base url {0:?} cannot carry a path")]
    NotHierarchical(String),
    #[error("invalid directory segment: {0}")]
    InvalidSegment(#[from] IdError),
}

/// Validated store location for one bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreLayout {
    base: Url,
    /// Directory segments between the base URL and the chunk file.
    prefix: Vec<String>,
}

impl StoreLayout {
    /// `chunk_dir` may contain `/` to nest several directories; each part is
    /// validated as a segment. `map` is a single segment appended after it.
    pub fn new(base_url: &str, chunk_dir: &str, map: Option<&str>) -> Result<Self, LayoutError> {
        let base =
            Url::parse(base_url).map_err(|e| LayoutError::InvalidBaseUrl(base_url.to_string(), e))?;
        if base.cannot_be_a_base() {
            return Err(LayoutError::NotHierarchical(base_url.to_string()));
        }

        let mut prefix = Vec::new();
        for part in chunk_dir.split('/').filter(|p| !p.is_empty()) {
            validate_segment(part)?;
            prefix.push(part.to_string());
        }
        if let Some(map) = map {
            validate_segment(map)?;
            prefix.push(map.to_string());
        }

        Ok(Self { base, prefix })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Path of a chunk relative to the base URL, e.g. `map/(3, -2).json`.
    pub fn resource_path(&self, id: &ChunkId) -> String {
        let mut path = String::new();
        for segment in &self.prefix {
            path.push_str(segment);
            path.push('/');
        }
        path.push_str(&id.file_name());
        path
    }

    /// Absolute URL of a chunk.
    pub fn chunk_url(&self, id: &ChunkId) -> Url {
        let mut url = self.base.clone();
        url.set_query(None);
        url.set_fragment(None);
        // cannot_be_a_base was rejected in `new`, so this always succeeds.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(self.prefix.iter())
                .push(&id.file_name());
        }
        url
    }
}

/// Extract the `map` parameter from a page query string such as
/// `?map=forest&debug=1`. Empty values count as absent.
pub fn map_from_query(query: &str) -> Option<String> {
    let query = query.strip_prefix('?').unwrap_or(query);
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "map")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}
