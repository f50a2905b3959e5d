use iced::keyboard::{self, key::Named};
use iced::widget::image::Handle;
use iced::widget::scrollable::{self, AbsoluteOffset, RelativeOffset};
use iced::widget::{container, stack};
use iced::{Element, Length, Rectangle, Size, Subscription, Task, Theme};

use std::collections::{BTreeMap, HashMap, HashSet};
use std::time::Duration;

mod assets;
mod cache;
mod catalog;
mod state;
mod ui;

use assets::{ImageOptions, Quality};
use cache::ImageCache;
use catalog::store::Catalog;
use catalog::story::{Block, Story};
use state::gallery::GalleryEngine;
use state::lightbox::{Lightbox, LightboxImage, ScrollPolicy};
use ui::story::StoryContext;

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// Navigate to a story by slug
    OpenStory(String),
    /// Back to the browse screen
    BrowseStories,
    QueryChanged(String),
    TagSelected(Option<String>),

    /// The story scrollable moved
    StoryScrolled(scrollable::Viewport),
    WindowResized(Size),
    /// A block section answered a bounds query
    BlockSighted(usize, Option<Rectangle>),
    /// Chapter menu jump to a block
    JumpToBlock(usize),
    ScrollToTop,

    /// A block or gallery asked for the lightbox
    OpenLightbox(Vec<LightboxImage>, i64),
    CloseLightbox,
    LightboxNext,
    LightboxPrev,

    /// A background fetch resolved
    ImageFetched(String, Result<Handle, String>),
    /// Audio block hand-off to the system player
    PlayAudio(usize),
    RetryImage(String),

    /// Swallowed interaction (clicks inside the lightbox frame)
    Ignored,
}

/// Which screen is showing
enum Screen {
    Browse,
    Story(StoryScreen),
    NotFound { slug: String },
}

/// Per-story view state, rebuilt from scratch on every navigation
struct StoryScreen {
    slug: String,
    scroll_y: f32,
    content_height: f32,
    /// One engine per horizontal gallery block, keyed by block index
    galleries: BTreeMap<usize, GalleryEngine>,
    /// Measured content-space positions of anchored blocks
    anchors: HashMap<usize, f32>,
    audio_errors: HashMap<usize, String>,
    /// URLs still being fetched for this story's own content
    pending: HashSet<String>,
    /// Whether the one-shot post-load remeasure already ran
    settled: bool,
}

/// Main application state
struct StoryViewer {
    catalog: Catalog,
    screen: Screen,
    /// The one lightbox shared by every screen
    lightbox: Lightbox,
    scroll_policy: ScrollPolicy,
    cache: ImageCache,
    window: Size,
    query: String,
    selected_tag: Option<String>,
}

fn story_scroll_id() -> scrollable::Id {
    scrollable::Id::new(ui::story::SCROLL_ID)
}

fn fetch(url: String) -> Task<Message> {
    Task::perform(cache::fetch_image(url), |(url, result)| {
        Message::ImageFetched(url, result)
    })
}

fn fetch_after(delay: Duration, url: String) -> Task<Message> {
    Task::perform(cache::fetch_image_after(delay, url), |(url, result)| {
        Message::ImageFetched(url, result)
    })
}

/// Ask one block section where it currently sits on screen
fn sight_block(block_index: usize) -> Task<Message> {
    container::visible_bounds(ui::gallery::section_id(block_index))
        .map(move |bounds| Message::BlockSighted(block_index, bounds))
}

/// Every delivery URL a story's screen will want, paired with the block
/// index that drives its fetch stagger
fn story_image_urls(
    story: &Story,
    prev: Option<&Story>,
    next: Option<&Story>,
) -> Vec<(usize, String)> {
    let mut urls = vec![(
        0,
        assets::image_url(
            &story.hero_image_id,
            ImageOptions::new(ui::story::HERO_IMAGE_WIDTH, Quality::AutoBest),
        ),
    )];

    for (index, block) in story.blocks.iter().enumerate() {
        match block {
            Block::Image { public_id, .. } => urls.push((
                index,
                assets::image_url(
                    public_id,
                    ImageOptions::new(ui::story::INLINE_IMAGE_WIDTH, Quality::Auto),
                ),
            )),
            Block::SplitSticky { image, .. } => urls.push((
                index,
                assets::image_url(
                    &image.public_id,
                    ImageOptions::new(ui::story::SPLIT_IMAGE_WIDTH, Quality::Auto),
                ),
            )),
            Block::HorizontalGallery { images, .. } => {
                for image in images {
                    urls.push((
                        index,
                        assets::image_url(
                            &image.public_id,
                            ImageOptions::new(ui::gallery::FIGURE_IMAGE_WIDTH, Quality::Auto),
                        ),
                    ));
                }
            }
            Block::Text { .. } | Block::BehindShot { .. } | Block::Audio { .. } => {}
        }
    }

    let endcap_index = story.blocks.len();
    for neighbor in [prev, next].into_iter().flatten() {
        urls.push((
            endcap_index,
            assets::image_url(
                &neighbor.hero_image_id,
                ImageOptions::new(ui::story::ENDCAP_IMAGE_WIDTH, Quality::Auto),
            ),
        ));
    }

    urls
}

impl StoryViewer {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        // The catalog ships inside the binary; a parse failure means the
        // build itself is broken, so there is nothing sensible to render.
        let catalog = Catalog::load().expect("Failed to parse the embedded story catalog");

        tracing::info!(stories = catalog.stories().len(), "catalog loaded");

        let mut app = StoryViewer {
            catalog,
            screen: Screen::Browse,
            lightbox: Lightbox::new(),
            scroll_policy: ScrollPolicy::Free,
            cache: ImageCache::new(),
            window: Size::new(1280.0, 800.0),
            query: String::new(),
            selected_tag: None,
        };

        let warm_covers = app.fetch_browse_covers();

        // The runtime only reports sizes through resize events, so ask the
        // opened window for its actual size; hero and section heights use
        // the placeholder until this lands.
        let real_size = iced::window::get_latest()
            .and_then(iced::window::get_size)
            .map(Message::WindowResized);

        (app, Task::batch([warm_covers, real_size]))
    }

    /// Kick off fetches for every browse cover not already cached
    fn fetch_browse_covers(&mut self) -> Task<Message> {
        let urls: Vec<String> = self
            .catalog
            .stories()
            .iter()
            .map(|story| {
                assets::image_url(
                    &story.hero_image_id,
                    ImageOptions::new(ui::home::COVER_IMAGE_WIDTH, Quality::Auto),
                )
            })
            .collect();

        let tasks: Vec<Task<Message>> = urls
            .into_iter()
            .filter(|url| self.cache.request(url))
            .map(fetch)
            .collect();

        Task::batch(tasks)
    }

    /// Resolve a slug and build the story screen, or fall back to the
    /// not-found screen. Never fails.
    fn open_story(&mut self, slug: &str) -> Task<Message> {
        let Some(story) = self.catalog.find_by_slug(slug).cloned() else {
            tracing::warn!(slug, "story not found");
            self.screen = Screen::NotFound {
                slug: slug.to_string(),
            };
            return Task::none();
        };

        let mut galleries = BTreeMap::new();
        for (index, block) in story.blocks.iter().enumerate() {
            if let Block::HorizontalGallery { images, .. } = block {
                let images: Vec<LightboxImage> = images.iter().map(LightboxImage::from).collect();
                galleries.insert(index, GalleryEngine::new(images, self.window.width));
            }
        }

        let (prev, next) = self.catalog.neighbors(slug);
        let urls = story_image_urls(&story, prev, next);

        let mut pending = HashSet::new();
        let mut tasks = vec![scrollable::scroll_to(
            story_scroll_id(),
            AbsoluteOffset { x: 0.0, y: 0.0 },
        )];

        // Fetches are staggered by block position so content arrives top to
        // bottom, with the same cap the entrance styling uses.
        for (block_index, url) in urls {
            if self.cache.request(&url) {
                pending.insert(url.clone());
                let delay = Duration::from_secs_f32(ui::story::reveal_delay(block_index));
                tasks.push(fetch_after(delay, url));
            }
        }

        tracing::info!(slug, galleries = galleries.len(), "story opened");

        self.screen = Screen::Story(StoryScreen {
            slug: slug.to_string(),
            scroll_y: 0.0,
            content_height: 0.0,
            galleries,
            anchors: HashMap::new(),
            audio_errors: HashMap::new(),
            settled: pending.is_empty(),
            pending,
        });

        Task::batch(tasks)
    }

    /// Warm the lightbox's current and adjacent images
    fn lightbox_fetches(&mut self) -> Task<Message> {
        let mut urls = Vec::new();
        if let Some(url) = self.lightbox.display_url() {
            urls.push(url);
        }
        urls.extend(self.lightbox.preload_urls());

        let tasks: Vec<Task<Message>> = urls
            .into_iter()
            .filter(|url| self.cache.request(url))
            .map(fetch)
            .collect();

        Task::batch(tasks)
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::OpenStory(slug) => self.open_story(&slug),

            Message::BrowseStories => {
                self.screen = Screen::Browse;
                self.fetch_browse_covers()
            }

            Message::QueryChanged(query) => {
                self.query = query;
                Task::none()
            }

            Message::TagSelected(tag) => {
                self.selected_tag = tag;
                Task::none()
            }

            Message::StoryScrolled(viewport) => {
                let Screen::Story(screen) = &mut self.screen else {
                    return Task::none();
                };

                // While the lightbox is open the scrollable is locked: any
                // movement that slips through snaps straight back.
                if self.scroll_policy == ScrollPolicy::Locked {
                    return scrollable::scroll_to(
                        story_scroll_id(),
                        AbsoluteOffset {
                            x: 0.0,
                            y: screen.scroll_y,
                        },
                    );
                }

                let offset = viewport.absolute_offset();
                screen.scroll_y = offset.y;
                screen.content_height = viewport.content_bounds().height;
                let viewport_height = viewport.bounds().height;

                let mut tasks = Vec::new();

                for (index, engine) in screen.galleries.iter_mut() {
                    let before = engine.track_scroll_x();
                    engine.on_scroll(offset.y, viewport_height);
                    let after = engine.track_scroll_x();

                    if (after - before).abs() > 0.5 {
                        tasks.push(scrollable::scroll_to(
                            ui::gallery::track_id(*index),
                            AbsoluteOffset { x: after, y: 0.0 },
                        ));
                    }
                    if !engine.has_sighting() {
                        tasks.push(sight_block(*index));
                    }
                }

                if let Some(story) = self.catalog.find_by_slug(&screen.slug) {
                    for item in story.table_of_contents() {
                        if !screen.anchors.contains_key(&item.block_index)
                            && !screen.galleries.contains_key(&item.block_index)
                        {
                            tasks.push(sight_block(item.block_index));
                        }
                    }
                }

                Task::batch(tasks)
            }

            Message::WindowResized(size) => {
                self.window = size;
                let Screen::Story(screen) = &mut self.screen else {
                    return Task::none();
                };

                for engine in screen.galleries.values_mut() {
                    engine.set_window_width(size.width);
                }
                // Everything below a reflowed block may have moved; drop the
                // stale positions and measure again right away, so a chapter
                // jump straight after the resize lands exactly.
                screen.anchors.clear();

                let mut tasks: Vec<Task<Message>> =
                    screen.galleries.keys().map(|index| sight_block(*index)).collect();

                if let Some(story) = self.catalog.find_by_slug(&screen.slug) {
                    for item in story.table_of_contents() {
                        if !screen.galleries.contains_key(&item.block_index) {
                            tasks.push(sight_block(item.block_index));
                        }
                    }
                }

                Task::batch(tasks)
            }

            Message::BlockSighted(index, bounds) => {
                let Screen::Story(screen) = &mut self.screen else {
                    return Task::none();
                };

                if let Some(bounds) = bounds {
                    // Only trust sightings whose top edge is on screen; a
                    // pinned or clipped section reports a truncated rect.
                    if bounds.y > 0.5 {
                        screen.anchors.insert(index, screen.scroll_y + bounds.y);
                    }
                    if let Some(engine) = screen.galleries.get_mut(&index) {
                        engine.record_sighting(bounds.y, screen.scroll_y);
                    }
                }
                Task::none()
            }

            Message::JumpToBlock(index) => {
                let Screen::Story(screen) = &self.screen else {
                    return Task::none();
                };

                let anchor = screen
                    .anchors
                    .get(&index)
                    .copied()
                    .or_else(|| screen.galleries.get(&index).and_then(|e| e.region_top()));

                match anchor {
                    Some(y) => scrollable::scroll_to(
                        story_scroll_id(),
                        AbsoluteOffset {
                            x: 0.0,
                            y: (y - ui::story::ANCHOR_MARGIN).max(0.0),
                        },
                    ),
                    // Not measured yet: estimate by block position
                    None => {
                        let blocks = self
                            .catalog
                            .find_by_slug(&screen.slug)
                            .map(|s| s.blocks.len())
                            .unwrap_or(1);
                        let fraction = index as f32 / blocks.saturating_sub(1).max(1) as f32;
                        scrollable::snap_to(
                            story_scroll_id(),
                            RelativeOffset { x: 0.0, y: fraction },
                        )
                    }
                }
            }

            Message::ScrollToTop => {
                scrollable::scroll_to(story_scroll_id(), AbsoluteOffset { x: 0.0, y: 0.0 })
            }

            Message::OpenLightbox(images, start_index) => {
                self.lightbox
                    .open(images, start_index, &mut self.scroll_policy);
                self.lightbox_fetches()
            }

            Message::CloseLightbox => {
                self.lightbox.close(&mut self.scroll_policy);
                Task::none()
            }

            Message::LightboxNext => {
                self.lightbox.next();
                self.lightbox_fetches()
            }

            Message::LightboxPrev => {
                self.lightbox.prev();
                self.lightbox_fetches()
            }

            Message::ImageFetched(url, result) => {
                self.cache.store(&url, result);

                if let Screen::Story(screen) = &mut self.screen {
                    let was_pending = screen.pending.remove(&url);
                    if was_pending && screen.pending.is_empty() && !screen.settled {
                        // One-shot remeasure now that late images have
                        // taken their final size
                        screen.settled = true;
                        for engine in screen.galleries.values_mut() {
                            engine.content_settled();
                        }
                        screen.anchors.clear();
                        tracing::debug!(slug = %screen.slug, "story content settled");
                    }
                }
                Task::none()
            }

            Message::PlayAudio(index) => {
                let Screen::Story(screen) = &mut self.screen else {
                    return Task::none();
                };

                let src = self
                    .catalog
                    .find_by_slug(&screen.slug)
                    .and_then(|story| match story.blocks.get(index) {
                        Some(Block::Audio { src, .. }) => Some(src.clone()),
                        _ => None,
                    });

                if let Some(src) = src {
                    match webbrowser::open(&src) {
                        Ok(()) => {
                            screen.audio_errors.remove(&index);
                        }
                        Err(error) => {
                            tracing::warn!(%error, "audio hand-off failed");
                            screen.audio_errors.insert(index, error.to_string());
                        }
                    }
                }
                Task::none()
            }

            Message::RetryImage(url) => {
                if self.cache.request(&url) {
                    fetch(url)
                } else {
                    Task::none()
                }
            }

            Message::Ignored => Task::none(),
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let screen: Element<Message> = match &self.screen {
            Screen::Browse => ui::home::view(
                &self.catalog,
                &self.cache,
                &self.query,
                self.selected_tag.as_deref(),
            ),

            Screen::NotFound { slug } => ui::story::not_found(slug),

            Screen::Story(screen) => match self.catalog.find_by_slug(&screen.slug) {
                Some(story) => {
                    let (prev, next) = self.catalog.neighbors(&screen.slug);
                    ui::story::view(StoryContext {
                        story,
                        prev,
                        next,
                        galleries: &screen.galleries,
                        audio_errors: &screen.audio_errors,
                        cache: &self.cache,
                        window: self.window,
                        scroll_y: screen.scroll_y,
                        content_height: screen.content_height,
                    })
                }
                None => ui::story::not_found(&screen.slug),
            },
        };

        let page = container(screen)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(ui::theme::app);

        if self.lightbox.is_open() {
            stack![page, ui::lightbox::view(&self.lightbox, &self.cache)].into()
        } else {
            page.into()
        }
    }

    fn subscription(&self) -> Subscription<Message> {
        let resize = iced::window::resize_events().map(|(_id, size)| Message::WindowResized(size));

        // Keyboard bindings exist only while the lightbox is open; there is
        // structurally no listener to fire while it is closed.
        if !self.lightbox.is_open() {
            return resize;
        }

        Subscription::batch([resize, keyboard::on_key_press(handle_key)])
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn handle_key(key: keyboard::Key, _modifiers: keyboard::Modifiers) -> Option<Message> {
    match key.as_ref() {
        keyboard::Key::Named(Named::Escape) => Some(Message::CloseLightbox),
        keyboard::Key::Named(Named::ArrowRight) => Some(Message::LightboxNext),
        keyboard::Key::Named(Named::ArrowLeft) => Some(Message::LightboxPrev),
        _ => None,
    }
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("story_viewer=info")),
        )
        .init();

    iced::application("Photo Stories", StoryViewer::update, StoryViewer::view)
        .subscription(StoryViewer::subscription)
        .theme(StoryViewer::theme)
        .centered()
        .run_with(StoryViewer::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app_on_first_story() -> StoryViewer {
        let (mut app, _startup) = StoryViewer::new();
        let slug = app.catalog.stories()[0].slug.clone();
        let _ = app.update(Message::OpenStory(slug));
        app
    }

    #[test]
    fn test_resize_remeasures_story_layout() {
        let mut app = app_on_first_story();

        let Screen::Story(screen) = &mut app.screen else {
            panic!("expected the story screen");
        };
        assert!(!screen.galleries.is_empty());
        screen.anchors.insert(1, 500.0);
        for engine in screen.galleries.values_mut() {
            engine.record_sighting(100.0, 0.0);
        }

        let size = Size::new(900.0, 700.0);
        let _ = app.update(Message::WindowResized(size));

        assert_eq!(app.window, size);
        let Screen::Story(screen) = &app.screen else {
            panic!("expected the story screen");
        };
        // Stale positions are dropped and the engines relaid out
        assert!(screen.anchors.is_empty());
        for engine in screen.galleries.values() {
            assert_eq!(
                engine.layout().viewport_width,
                state::gallery::section_viewport_width(size.width),
            );
            assert!(!engine.has_sighting());
        }
    }

    #[test]
    fn test_resize_on_browse_screen_only_updates_window() {
        let (mut app, _startup) = StoryViewer::new();

        let size = Size::new(1600.0, 1000.0);
        let _ = app.update(Message::WindowResized(size));

        assert_eq!(app.window, size);
        assert!(matches!(app.screen, Screen::Browse));
    }
}
