/// Remote asset URL construction
///
/// Every image in the catalog is referenced by a delivery-service public id,
/// not a URL. This module owns the deterministic transform from an asset id
/// plus sizing options to a fully-qualified delivery URL. No network calls
/// happen here; fetching is the cache's job (see cache.rs).

/// Cloud name of the delivery account. All asset ids in the catalog resolve
/// against this account.
const CLOUD_NAME: &str = "dq3pyoxxv";

/// Compression quality requested from the delivery service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quality {
    /// Let the service pick (q_auto) - galleries, inline images
    Auto,
    /// Best automatic tier (q_auto:best) - hero covers, lightbox display
    AutoBest,
    /// Fixed numeric quality 1-100
    Fixed(u8),
}

/// Sizing and quality options for one delivery URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageOptions {
    /// Target width in pixels; the service scales down, never up
    pub width: u32,
    pub quality: Quality,
}

impl ImageOptions {
    pub fn new(width: u32, quality: Quality) -> Self {
        Self { width, quality }
    }
}

/// Build the delivery URL for an asset id.
///
/// The transform string is stable for stable inputs, so the same id and
/// options always produce the same URL. The cache relies on that to key
/// fetched images by URL.
pub fn image_url(asset_id: &str, options: ImageOptions) -> String {
    let quality = match options.quality {
        Quality::Auto => "q_auto".to_string(),
        Quality::AutoBest => "q_auto:best".to_string(),
        Quality::Fixed(q) => format!("q_{}", q),
    };

    format!(
        "https://res.cloudinary.com/{}/image/upload/f_auto,{},w_{}/{}",
        CLOUD_NAME, quality, options.width, asset_id,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_quality_url() {
        let url = image_url("abc123", ImageOptions::new(1600, Quality::Auto));
        assert_eq!(
            url,
            "https://res.cloudinary.com/dq3pyoxxv/image/upload/f_auto,q_auto,w_1600/abc123"
        );
    }

    #[test]
    fn test_best_quality_url() {
        let url = image_url("hero_01", ImageOptions::new(3000, Quality::AutoBest));
        assert!(url.ends_with("/f_auto,q_auto:best,w_3000/hero_01"));
    }

    #[test]
    fn test_fixed_quality_url() {
        let url = image_url("x", ImageOptions::new(800, Quality::Fixed(72)));
        assert!(url.contains("q_72"));
        assert!(url.contains("w_800"));
    }

    #[test]
    fn test_deterministic() {
        let opts = ImageOptions::new(2400, Quality::Auto);
        assert_eq!(image_url("same", opts), image_url("same", opts));
    }
}
