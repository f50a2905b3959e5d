/// Scroll-coupled horizontal gallery engine
///
/// Each horizontal gallery block gets one engine instance. The engine maps
/// the user's vertical progress through the gallery's section onto a
/// horizontal translation of the image track: the section is given enough
/// height that normal page scrolling traverses the whole track, then hands
/// the page back.
///
/// The math lives in pure functions so it is testable without a window:
/// `(scroll position, layout) -> track offset`. The engine itself only adds
/// the bookkeeping of when to recompute.

use crate::state::lightbox::LightboxImage;

/// Fixed width of one figure in the track, matching the rendered cards
pub const FIGURE_WIDTH: f32 = 700.0;
/// Horizontal gap between figures
pub const FIGURE_GAP: f32 = 16.0;
/// Inner padding of the track on each side
pub const TRACK_PADDING: f32 = 16.0;
/// Minimum section height, so short galleries still read as a section
pub const BASE_HEIGHT: f32 = 700.0;
/// Widest the story column gets regardless of window size
pub const MAX_CONTENT_WIDTH: f32 = 1152.0;
/// Horizontal padding the story column carries on each side
pub const CONTENT_PADDING: f32 = 24.0;

/// Total width of the image track for a given image count
pub fn track_width(image_count: usize) -> f32 {
    if image_count == 0 {
        return TRACK_PADDING * 2.0;
    }
    let figures = image_count as f32 * FIGURE_WIDTH;
    let gaps = (image_count - 1) as f32 * FIGURE_GAP;
    figures + gaps + TRACK_PADDING * 2.0
}

/// Width the gallery section actually occupies in a window of
/// `window_width`: the story column is capped and padded on both sides.
pub fn section_viewport_width(window_width: f32) -> f32 {
    (window_width.min(MAX_CONTENT_WIDTH) - CONTENT_PADDING * 2.0).max(0.0)
}

/// Measured bounds of one gallery's track against its viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GalleryLayout {
    pub track_width: f32,
    pub viewport_width: f32,
}

impl GalleryLayout {
    pub fn new(track_width: f32, viewport_width: f32) -> Self {
        Self {
            track_width,
            viewport_width,
        }
    }

    /// Maximum horizontal distance the track can be shifted. Never negative:
    /// a track narrower than its viewport simply does not move.
    pub fn travel(&self) -> f32 {
        (self.track_width - self.viewport_width).max(0.0)
    }

    /// Height the section needs so that vertical scroll distance covers the
    /// full horizontal travel, with a floor for short galleries.
    pub fn section_height(&self, viewport_height: f32) -> f32 {
        (self.travel() + viewport_height * 0.6).max(BASE_HEIGHT)
    }
}

/// Normalized progress through the section's scroll-tracked span: 0 when the
/// section top reaches the viewport top, 1 when the section bottom does.
pub fn scroll_progress(scroll_y: f32, region_top: f32, region_height: f32) -> f32 {
    if region_height <= 0.0 {
        return 0.0;
    }
    ((scroll_y - region_top) / region_height).clamp(0.0, 1.0)
}

/// Horizontal offset of the track at progress `p`: the track moves left as
/// the user scrolls down.
pub fn track_offset(progress: f32, travel: f32) -> f32 {
    -progress * travel
}

/// Per-instance gallery state
#[derive(Debug)]
pub struct GalleryEngine {
    images: Vec<LightboxImage>,
    layout: GalleryLayout,
    /// Section top in story-content coordinates, captured from layout
    /// sightings while the section top is on screen. Unknown until the user
    /// scrolls the section into view; unknown again after a resize.
    region_top: Option<f32>,
    progress: f32,
}

impl GalleryEngine {
    pub fn new(images: Vec<LightboxImage>, window_width: f32) -> Self {
        let layout = GalleryLayout::new(
            track_width(images.len()),
            section_viewport_width(window_width),
        );

        Self {
            images,
            layout,
            region_top: None,
            progress: 0.0,
        }
    }

    pub fn images(&self) -> &[LightboxImage] {
        &self.images
    }

    pub fn layout(&self) -> GalleryLayout {
        self.layout
    }

    /// Recompute layout for a new window width. Idempotent: the same width
    /// yields the same layout. Any cached section position is stale after a
    /// real width change and is dropped until the next sighting.
    pub fn set_window_width(&mut self, window_width: f32) {
        let layout = GalleryLayout::new(
            track_width(self.images.len()),
            section_viewport_width(window_width),
        );

        if layout != self.layout {
            self.layout = layout;
            self.region_top = None;
        }
    }

    /// One-shot recomputation after the surrounding content finished
    /// loading. Late image arrivals shift everything below them, so the
    /// cached section position cannot be trusted anymore.
    pub fn content_settled(&mut self) {
        self.region_top = None;
    }

    /// Record where the section sits, from a bounds query answered while
    /// scrolled near it. `section_y` is the section top in window
    /// coordinates; only accepted while the top edge is actually on screen,
    /// because a pinned section reports a clipped rectangle.
    pub fn record_sighting(&mut self, section_y: f32, scroll_y: f32) {
        if section_y > 0.5 {
            self.region_top = Some(scroll_y + section_y);
        }
    }

    pub fn has_sighting(&self) -> bool {
        self.region_top.is_some()
    }

    /// Position in story-content coordinates, for chapter jumps.
    pub fn region_top(&self) -> Option<f32> {
        self.region_top
    }

    /// Update progress from the story scroll position. Without a sighting
    /// the track stays where it is.
    pub fn on_scroll(&mut self, scroll_y: f32, viewport_height: f32) {
        let Some(region_top) = self.region_top else {
            return;
        };

        let region_height = self.layout.section_height(viewport_height);
        self.progress = scroll_progress(scroll_y, region_top, region_height);
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Current horizontal offset of the track (≤ 0; the track shifts left).
    pub fn offset(&self) -> f32 {
        track_offset(self.progress, self.layout.travel())
    }

    /// The same offset as a scroll distance for the horizontal track
    /// scrollable, which counts rightward travel as positive.
    pub fn track_scroll_x(&self) -> f32 {
        -self.offset()
    }

    pub fn section_height(&self, viewport_height: f32) -> f32 {
        self.layout.section_height(viewport_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_images(n: usize) -> Vec<LightboxImage> {
        (0..n)
            .map(|i| LightboxImage {
                asset_id: format!("g_{}", i),
                alt: String::new(),
                caption: None,
            })
            .collect()
    }

    #[test]
    fn test_travel_and_offsets() {
        let layout = GalleryLayout::new(3000.0, 1200.0);
        assert_eq!(layout.travel(), 1800.0);

        assert_eq!(track_offset(0.0, layout.travel()), 0.0);
        assert_eq!(track_offset(0.5, layout.travel()), -900.0);
        assert_eq!(track_offset(1.0, layout.travel()), -1800.0);
    }

    #[test]
    fn test_narrow_track_never_moves() {
        // One small image: track fits inside the viewport
        let layout = GalleryLayout::new(732.0, 1200.0);
        assert_eq!(layout.travel(), 0.0);

        for p in [0.0, 0.25, 0.5, 1.0] {
            let x = track_offset(p, layout.travel());
            assert_eq!(x, 0.0);
            assert!(x.is_finite());
        }
    }

    #[test]
    fn test_progress_clamps_outside_region() {
        // Region spans content y 1000..2800
        assert_eq!(scroll_progress(0.0, 1000.0, 1800.0), 0.0);
        assert_eq!(scroll_progress(1000.0, 1000.0, 1800.0), 0.0);
        assert_eq!(scroll_progress(1900.0, 1000.0, 1800.0), 0.5);
        assert_eq!(scroll_progress(2800.0, 1000.0, 1800.0), 1.0);
        assert_eq!(scroll_progress(9000.0, 1000.0, 1800.0), 1.0);

        // Degenerate region: no NaN, no panic
        assert_eq!(scroll_progress(500.0, 1000.0, 0.0), 0.0);
    }

    #[test]
    fn test_track_width_by_count() {
        assert_eq!(track_width(0), 32.0);
        assert_eq!(track_width(1), 700.0 + 32.0);
        assert_eq!(track_width(4), 4.0 * 700.0 + 3.0 * 16.0 + 32.0);
    }

    #[test]
    fn test_section_viewport_accounts_for_column_padding() {
        // Wide window: capped at the column width minus its padding
        assert_eq!(section_viewport_width(1920.0), 1152.0 - 48.0);
        // Narrow window: the window itself minus the padding
        assert_eq!(section_viewport_width(1000.0), 952.0);
        // Degenerate window never goes negative
        assert_eq!(section_viewport_width(30.0), 0.0);
    }

    #[test]
    fn test_section_height_floor_and_growth() {
        // Few narrow images: floor wins
        let short = GalleryLayout::new(800.0, 1200.0);
        assert_eq!(short.section_height(800.0), BASE_HEIGHT);

        // Long track: enough height to traverse the travel
        let long = GalleryLayout::new(3000.0, 1200.0);
        assert_eq!(long.section_height(800.0), 1800.0 + 0.6 * 800.0);
    }

    #[test]
    fn test_engine_scroll_coupling() {
        let mut engine = GalleryEngine::new(test_images(4), 1152.0);
        // 4 figures: 2848px track against an 1104px padded viewport
        assert_eq!(engine.layout().travel(), 2848.0 - 1104.0);

        // No sighting yet: scrolling leaves the track alone
        engine.on_scroll(5000.0, 800.0);
        assert_eq!(engine.offset(), 0.0);

        // Section top seen 300px below the viewport top at scroll 700
        engine.record_sighting(300.0, 700.0);
        assert_eq!(engine.region_top(), Some(1000.0));

        let height = engine.section_height(800.0);
        engine.on_scroll(1000.0 + height / 2.0, 800.0);
        assert_eq!(engine.progress(), 0.5);
        assert_eq!(engine.offset(), -0.5 * engine.layout().travel());
        assert_eq!(engine.track_scroll_x(), 0.5 * engine.layout().travel());
    }

    #[test]
    fn test_sighting_rejected_while_pinned() {
        let mut engine = GalleryEngine::new(test_images(4), 1152.0);

        // A pinned section reports its clipped top at the viewport edge
        engine.record_sighting(0.0, 2000.0);
        assert!(!engine.has_sighting());

        engine.record_sighting(120.0, 2000.0);
        assert_eq!(engine.region_top(), Some(2120.0));
    }

    #[test]
    fn test_resize_recompute_is_idempotent() {
        let mut engine = GalleryEngine::new(test_images(3), 1152.0);
        engine.record_sighting(100.0, 0.0);

        let before = engine.layout();
        engine.set_window_width(1152.0);
        assert_eq!(engine.layout(), before);
        // Same width: cached position survives
        assert!(engine.has_sighting());

        engine.set_window_width(900.0);
        assert_eq!(engine.layout().viewport_width, 852.0);
        // Real change: position must be re-sighted
        assert!(!engine.has_sighting());

        let after = engine.layout();
        engine.set_window_width(900.0);
        assert_eq!(engine.layout(), after);
    }

    #[test]
    fn test_content_settled_forces_remeasure() {
        let mut engine = GalleryEngine::new(test_images(2), 1152.0);
        engine.record_sighting(50.0, 0.0);
        assert!(engine.has_sighting());

        engine.content_settled();
        assert!(!engine.has_sighting());
    }

    #[test]
    fn test_empty_gallery_is_inert() {
        let mut engine = GalleryEngine::new(vec![], 1152.0);
        assert_eq!(engine.layout().travel(), 0.0);

        engine.record_sighting(10.0, 0.0);
        engine.on_scroll(10_000.0, 800.0);
        assert_eq!(engine.offset(), 0.0);
        assert!(engine.offset().is_finite());
    }
}
