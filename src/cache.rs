/// Remote image cache
///
/// Fetched assets are decoded once and kept in memory, keyed by delivery
/// URL. Fetches are fire-and-forget: the controller that requested a warm-up
/// never waits on it, it just reads the cache by URL when rendering. A
/// failed fetch marks the entry failed so the affected block can show a
/// placeholder and offer a manual retry; nothing else is affected.

use std::collections::HashMap;

use iced::widget::image::Handle;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("decode failed: {0}")]
    Decode(#[from] image::ImageError),
    #[error("decode task aborted: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone)]
enum Entry {
    Loading,
    Ready(Handle),
    Failed,
}

/// URL-keyed store of decoded image handles
#[derive(Debug, Default)]
pub struct ImageCache {
    entries: HashMap<String, Entry>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decoded handle for a URL, if the fetch has completed successfully.
    pub fn handle(&self, url: &str) -> Option<Handle> {
        match self.entries.get(url) {
            Some(Entry::Ready(handle)) => Some(handle.clone()),
            _ => None,
        }
    }

    pub fn is_failed(&self, url: &str) -> bool {
        matches!(self.entries.get(url), Some(Entry::Failed))
    }

    /// Claim a URL for fetching. Returns true if the caller should start a
    /// fetch task: the URL is unknown, or it failed before and this is a
    /// retry. Loading and ready entries are left alone, so repeated
    /// requests while a fetch is in flight spawn nothing.
    pub fn request(&mut self, url: &str) -> bool {
        match self.entries.get(url) {
            Some(Entry::Loading) | Some(Entry::Ready(_)) => false,
            Some(Entry::Failed) | None => {
                self.entries.insert(url.to_string(), Entry::Loading);
                true
            }
        }
    }

    /// Record the outcome of a fetch task.
    pub fn store(&mut self, url: &str, result: Result<Handle, String>) {
        let entry = match result {
            Ok(handle) => Entry::Ready(handle),
            Err(error) => {
                tracing::warn!(url, %error, "image fetch failed");
                Entry::Failed
            }
        };
        self.entries.insert(url.to_string(), entry);
    }
}

/// Fetch and decode one image.
///
/// The download runs on the async runtime; decoding is CPU-bound, so it is
/// pushed onto a blocking thread. Errors come back as strings because the
/// message type must stay cheap to clone.
pub async fn fetch_image(url: String) -> (String, Result<Handle, String>) {
    let result = fetch_image_inner(&url).await.map_err(|e| e.to_string());
    (url, result)
}

/// Like `fetch_image`, after a delay. Story content fetches are staggered
/// by block position so images arrive in reading order.
pub async fn fetch_image_after(
    delay: std::time::Duration,
    url: String,
) -> (String, Result<Handle, String>) {
    tokio::time::sleep(delay).await;
    fetch_image(url).await
}

async fn fetch_image_inner(url: &str) -> Result<Handle, FetchError> {
    let bytes = reqwest::get(url).await?.error_for_status()?.bytes().await?;

    let handle = tokio::task::spawn_blocking(move || -> Result<Handle, FetchError> {
        let decoded = image::load_from_memory(&bytes)?.into_rgba8();
        let (width, height) = decoded.dimensions();
        Ok(Handle::from_rgba(width, height, decoded.into_raw()))
    })
    .await??;

    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_handle() -> Handle {
        Handle::from_rgba(1, 1, vec![0, 0, 0, 255])
    }

    #[test]
    fn test_request_claims_once() {
        let mut cache = ImageCache::new();

        assert!(cache.request("u"));
        // In flight: no duplicate fetch
        assert!(!cache.request("u"));
        assert!(cache.handle("u").is_none());
    }

    #[test]
    fn test_store_and_read() {
        let mut cache = ImageCache::new();
        cache.request("u");
        cache.store("u", Ok(dummy_handle()));

        assert!(cache.handle("u").is_some());
        assert!(!cache.is_failed("u"));
        // Ready entries are not re-fetched
        assert!(!cache.request("u"));
    }

    #[test]
    fn test_failure_allows_retry() {
        let mut cache = ImageCache::new();
        cache.request("u");
        cache.store("u", Err("boom".into()));

        assert!(cache.is_failed("u"));
        assert!(cache.handle("u").is_none());
        // Manual retry claims the entry again
        assert!(cache.request("u"));
        assert!(!cache.is_failed("u"));
    }

    #[test]
    fn test_failure_is_isolated_per_url() {
        let mut cache = ImageCache::new();
        cache.request("bad");
        cache.request("good");
        cache.store("bad", Err("404".into()));
        cache.store("good", Ok(dummy_handle()));

        assert!(cache.is_failed("bad"));
        assert!(cache.handle("good").is_some());
    }
}
