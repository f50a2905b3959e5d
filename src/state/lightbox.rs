/// Global lightbox controller
///
/// One lightbox exists for the whole application. Any image-bearing block
/// can hand it an image set and a start index; the overlay, keyboard
/// bindings and preloading all follow from the single piece of state held
/// here. The controller is a two-state machine (closed / open) and all four
/// operations are total: bad input degrades by wraparound or no-op, never
/// by panicking.

use crate::assets::{self, ImageOptions, Quality};
use crate::catalog::story::GalleryImage;

/// Width requested for the on-screen lightbox image
pub const DISPLAY_WIDTH: u32 = 3000;

/// One image as the lightbox sees it
#[derive(Debug, Clone, PartialEq)]
pub struct LightboxImage {
    pub asset_id: String,
    pub alt: String,
    pub caption: Option<String>,
}

impl From<&GalleryImage> for LightboxImage {
    fn from(image: &GalleryImage) -> Self {
        Self {
            asset_id: image.public_id.clone(),
            alt: image.alt.clone(),
            caption: image.caption.clone(),
        }
    }
}

/// Whether the story scrollable currently accepts scroll input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollPolicy {
    Free,
    Locked,
}

#[derive(Debug, Clone, PartialEq)]
enum State {
    Closed,
    Open {
        images: Vec<LightboxImage>,
        index: usize,
    },
}

/// Wraparound index normalization, defined for any integer including
/// negative and out-of-range values. Returns 0 for an empty set so callers
/// never divide by zero.
fn wrap_index(index: i64, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let len = len as i64;
    (((index % len) + len) % len) as usize
}

/// The shared modal image viewer
#[derive(Debug)]
pub struct Lightbox {
    state: State,
    /// Scroll policy captured when the viewer opened, restored verbatim on
    /// close. `None` while closed.
    saved_policy: Option<ScrollPolicy>,
}

impl Lightbox {
    pub fn new() -> Self {
        Self {
            state: State::Closed,
            saved_policy: None,
        }
    }

    /// Open the viewer on `images`, starting at `start_index` (any integer;
    /// normalized by wraparound). Opening with an empty set is a no-op.
    ///
    /// The caller's scroll policy is captured and replaced with `Locked`;
    /// `close` restores whatever was captured, so repeated or nested opens
    /// are safe.
    pub fn open(
        &mut self,
        images: Vec<LightboxImage>,
        start_index: i64,
        policy: &mut ScrollPolicy,
    ) {
        if images.is_empty() {
            return;
        }

        if self.saved_policy.is_none() {
            self.saved_policy = Some(*policy);
        }
        *policy = ScrollPolicy::Locked;

        let index = wrap_index(start_index, images.len());
        self.state = State::Open { images, index };
    }

    /// Close the viewer, discarding the image set, and restore the scroll
    /// policy captured at open time.
    pub fn close(&mut self, policy: &mut ScrollPolicy) {
        if let Some(saved) = self.saved_policy.take() {
            *policy = saved;
        }
        self.state = State::Closed;
    }

    /// Advance one image forward, wrapping past the end.
    pub fn next(&mut self) {
        self.step(1);
    }

    /// Step one image backward; index 0 wraps to the last image.
    pub fn prev(&mut self) {
        self.step(-1);
    }

    fn step(&mut self, delta: i64) {
        if let State::Open { images, index } = &mut self.state {
            *index = wrap_index(*index as i64 + delta, images.len());
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, State::Open { .. })
    }

    /// Active image with its position, for rendering the overlay.
    /// `(image, index, count)` while open, `None` while closed.
    pub fn active(&self) -> Option<(&LightboxImage, usize, usize)> {
        match &self.state {
            State::Open { images, index } => Some((&images[*index], *index, images.len())),
            State::Closed => None,
        }
    }

    /// Delivery URL of the active image at display resolution.
    pub fn display_url(&self) -> Option<String> {
        self.active().map(|(image, _, _)| {
            assets::image_url(
                &image.asset_id,
                ImageOptions::new(DISPLAY_WIDTH, Quality::AutoBest),
            )
        })
    }

    /// URLs to warm so next/prev feel instantaneous: the images adjacent to
    /// the active one, one forward and one backward with wraparound. Warmed
    /// at display resolution, because the cache is keyed by exact URL; any
    /// other variant would never be read back by the overlay. Empty while
    /// closed or with a single image; a two-image set yields one URL, not
    /// the same one twice.
    pub fn preload_urls(&self) -> Vec<String> {
        let State::Open { images, index } = &self.state else {
            return Vec::new();
        };
        if images.len() <= 1 {
            return Vec::new();
        }

        let len = images.len();
        let forward = wrap_index(*index as i64 + 1, len);
        let backward = wrap_index(*index as i64 - 1, len);

        let mut targets = vec![forward];
        if backward != forward {
            targets.push(backward);
        }

        targets
            .into_iter()
            .map(|i| {
                assets::image_url(
                    &images[i].asset_id,
                    ImageOptions::new(DISPLAY_WIDTH, Quality::AutoBest),
                )
            })
            .collect()
    }
}

impl Default for Lightbox {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn images(n: usize) -> Vec<LightboxImage> {
        (0..n)
            .map(|i| LightboxImage {
                asset_id: format!("img_{}", i),
                alt: format!("image {}", i),
                caption: None,
            })
            .collect()
    }

    fn index_of(lightbox: &Lightbox) -> usize {
        lightbox.active().unwrap().1
    }

    #[test]
    fn test_wrap_index_arbitrary_integers() {
        assert_eq!(wrap_index(0, 4), 0);
        assert_eq!(wrap_index(5, 4), 1);
        assert_eq!(wrap_index(-1, 4), 3);
        assert_eq!(wrap_index(-9, 4), 3);
        assert_eq!(wrap_index(7, 0), 0);
    }

    #[test]
    fn test_open_with_empty_set_is_noop() {
        let mut lb = Lightbox::new();
        let mut policy = ScrollPolicy::Free;

        lb.open(vec![], 3, &mut policy);

        assert!(!lb.is_open());
        assert_eq!(policy, ScrollPolicy::Free);
        assert!(lb.active().is_none());
    }

    #[test]
    fn test_open_normalizes_start_index() {
        let mut lb = Lightbox::new();
        let mut policy = ScrollPolicy::Free;

        lb.open(images(4), -1, &mut policy);
        assert_eq!(index_of(&lb), 3);

        lb.close(&mut policy);
        lb.open(images(4), 10, &mut policy);
        assert_eq!(index_of(&lb), 2);
    }

    #[test]
    fn test_wraparound_invariant() {
        // k steps forward from index i lands on (i + k) mod n
        let mut lb = Lightbox::new();
        let mut policy = ScrollPolicy::Free;
        lb.open(images(5), 2, &mut policy);

        for k in 1..=13 {
            lb.next();
            assert_eq!(index_of(&lb), (2 + k) % 5);
        }

        lb.close(&mut policy);
        lb.open(images(5), 2, &mut policy);
        for k in 1..=13i64 {
            lb.prev();
            assert_eq!(index_of(&lb), wrap_index(2 - k, 5));
        }
    }

    #[test]
    fn test_navigation_while_closed_is_silent() {
        let mut lb = Lightbox::new();
        lb.next();
        lb.prev();
        assert!(!lb.is_open());
        assert!(lb.active().is_none());
    }

    #[test]
    fn test_close_discards_images() {
        let mut lb = Lightbox::new();
        let mut policy = ScrollPolicy::Free;

        lb.open(images(4), 2, &mut policy);
        lb.close(&mut policy);
        lb.open(images(2), 0, &mut policy);

        let (image, index, count) = lb.active().unwrap();
        assert_eq!(index, 0);
        assert_eq!(count, 2);
        assert_eq!(image.asset_id, "img_0");
    }

    #[test]
    fn test_scroll_policy_restored_exactly() {
        let mut lb = Lightbox::new();

        let mut policy = ScrollPolicy::Free;
        lb.open(images(2), 0, &mut policy);
        assert_eq!(policy, ScrollPolicy::Locked);
        lb.close(&mut policy);
        assert_eq!(policy, ScrollPolicy::Free);

        // Nested case: a policy that was already Locked stays Locked
        let mut policy = ScrollPolicy::Locked;
        lb.open(images(2), 0, &mut policy);
        lb.close(&mut policy);
        assert_eq!(policy, ScrollPolicy::Locked);
    }

    #[test]
    fn test_reopen_without_close_keeps_original_policy() {
        let mut lb = Lightbox::new();
        let mut policy = ScrollPolicy::Free;

        lb.open(images(3), 0, &mut policy);
        // Second open while already open must not capture Locked as the
        // value to restore
        lb.open(images(2), 1, &mut policy);
        lb.close(&mut policy);

        assert_eq!(policy, ScrollPolicy::Free);
    }

    #[test]
    fn test_preload_targets() {
        let mut lb = Lightbox::new();
        let mut policy = ScrollPolicy::Free;

        // Closed: nothing to warm
        assert!(lb.preload_urls().is_empty());

        // Single image: nothing to warm
        lb.open(images(1), 0, &mut policy);
        assert!(lb.preload_urls().is_empty());
        lb.close(&mut policy);

        // Two images: one neighbor, not the same URL twice
        lb.open(images(2), 0, &mut policy);
        let urls = lb.preload_urls();
        assert_eq!(urls.len(), 1);
        assert!(urls[0].contains("img_1"));
        lb.close(&mut policy);

        // Wraparound neighbors at the end of the set
        lb.open(images(4), 3, &mut policy);
        let urls = lb.preload_urls();
        assert_eq!(urls.len(), 2);
        assert!(urls[0].contains("img_0"));
        assert!(urls[1].contains("img_2"));
    }

    #[test]
    fn test_preload_warms_the_display_url() {
        let mut lb = Lightbox::new();
        let mut policy = ScrollPolicy::Free;
        lb.open(images(4), 1, &mut policy);

        // The warmed URLs must be the exact URLs the overlay will read
        // after stepping; the cache is keyed by URL, nothing else.
        let warmed = lb.preload_urls();

        lb.next();
        assert!(warmed.contains(&lb.display_url().unwrap()));

        lb.prev();
        lb.prev();
        assert!(warmed.contains(&lb.display_url().unwrap()));
    }

    #[test]
    fn test_end_to_end_keyboard_scenario() {
        // Click image 2 of 4, ArrowRight twice (2 -> 3 -> 0), Escape
        let mut lb = Lightbox::new();
        let mut policy = ScrollPolicy::Free;

        lb.open(images(4), 2, &mut policy);
        let (_, index, count) = lb.active().unwrap();
        assert_eq!((index, count), (2, 4));

        lb.next();
        lb.next();
        assert_eq!(index_of(&lb), 0);

        lb.close(&mut policy);
        assert!(!lb.is_open());
        assert_eq!(policy, ScrollPolicy::Free);
    }
}
