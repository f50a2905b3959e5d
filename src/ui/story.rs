/// Story screen
///
/// Composes one story: hero cover, chapter menu, the block sequence in
/// order, and the endcap pointing at neighboring stories. The composer owns
/// no coordination logic beyond sequencing; the lightbox and gallery
/// engines do the heavy lifting.

use std::collections::{BTreeMap, HashMap};

use iced::widget::{button, column, container, progress_bar, row, scrollable, stack, text, Space};
use iced::{Alignment, Element, Length, Size};

use crate::assets::{self, ImageOptions, Quality};
use crate::cache::ImageCache;
use crate::catalog::story::{Block, Story};
use crate::state::gallery::{GalleryEngine, CONTENT_PADDING};
use crate::ui::{gallery, remote_image, theme};
use crate::Message;

/// Width requested for the hero cover
pub const HERO_IMAGE_WIDTH: u32 = 2800;
/// Width requested for inline image blocks
pub const INLINE_IMAGE_WIDTH: u32 = 2000;
/// Width requested for split-sticky images
pub const SPLIT_IMAGE_WIDTH: u32 = 2400;
/// Width requested for endcap cover cards
pub const ENDCAP_IMAGE_WIDTH: u32 = 2200;

/// Vertical offset chapter jumps leave above the target section
pub const ANCHOR_MARGIN: f32 = 96.0;
/// Scroll distance after which the back-to-top affordance appears
const SCROLL_TOP_THRESHOLD: f32 = 600.0;

pub const SCROLL_ID: &str = "story-scroll";

/// Entrance stagger for block `index`, in seconds. Grows with the block's
/// position and caps early so late content never feels sluggish.
pub fn reveal_delay(block_index: usize) -> f32 {
    (block_index as f32 * 0.04).min(0.18)
}

/// Reading progress through the whole story, 0 at the top and 1 once the
/// last line has scrolled into view.
pub fn reading_progress(scroll_y: f32, content_height: f32, viewport_height: f32) -> f32 {
    let span = content_height - viewport_height;
    if span <= 0.0 {
        return 0.0;
    }
    (scroll_y / span).clamp(0.0, 1.0)
}

/// Everything the story screen needs to draw one frame
pub struct StoryContext<'a> {
    pub story: &'a Story,
    pub prev: Option<&'a Story>,
    pub next: Option<&'a Story>,
    pub galleries: &'a BTreeMap<usize, GalleryEngine>,
    pub audio_errors: &'a HashMap<usize, String>,
    pub cache: &'a ImageCache,
    pub window: Size,
    pub scroll_y: f32,
    pub content_height: f32,
}

pub fn view(ctx: StoryContext<'_>) -> Element<'_, Message> {
    let mut content = column![hero(&ctx)].spacing(0);

    let toc = ctx.story.table_of_contents();
    if !toc.is_empty() {
        let chips = toc.iter().map(|item| {
            let mut label = column![text(item.label.clone()).size(13)].spacing(2);
            if let Some(sub) = &item.sublabel {
                label = label.push(text(sub.clone()).size(11).color(theme::TEXT_DIM));
            }
            button(label)
                .style(theme::ghost_button)
                .padding([8, 14])
                .on_press(Message::JumpToBlock(item.block_index))
                .into()
        });

        content = content.push(
            container(
                column![
                    text("CHAPTERS").size(11).color(theme::TEXT_FAINT),
                    row(chips).spacing(10).wrap(),
                ]
                .spacing(10),
            )
            .padding([24, 24])
            .width(Length::Fill),
        );
    }

    let mut blocks = column![]
        .spacing(56)
        .padding([40.0, CONTENT_PADDING])
        .max_width(1152);
    for (index, block) in ctx.story.blocks.iter().enumerate() {
        blocks = blocks.push(render_block(&ctx, index, block));
    }
    content = content.push(container(blocks).center_x(Length::Fill));

    content = content.push(endcap(&ctx));

    let page = scrollable(content)
        .id(scrollable::Id::new(SCROLL_ID))
        .on_scroll(Message::StoryScrolled)
        .width(Length::Fill)
        .height(Length::Fill);

    let progress = reading_progress(ctx.scroll_y, ctx.content_height, ctx.window.height);
    let progress_strip = container(
        progress_bar(0.0..=1.0, progress)
            .height(3.0)
            .width(Length::Fill),
    )
    .width(Length::Fill)
    .align_y(Alignment::Start);

    let mut layers = stack![page, progress_strip];

    if ctx.scroll_y > SCROLL_TOP_THRESHOLD {
        let to_top = container(
            button(text("↑ Top").size(13))
                .style(theme::ghost_button)
                .padding([10, 16])
                .on_press(Message::ScrollToTop),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .align_x(Alignment::End)
        .align_y(Alignment::End)
        .padding(20);

        layers = layers.push(to_top);
    }

    layers.into()
}

/// Not-found screen for a slug that resolves to nothing
pub fn not_found(slug: &str) -> Element<'_, Message> {
    container(
        column![
            text("Story not found").size(30),
            text(format!("No story lives at \"{}\".", slug))
                .size(15)
                .color(theme::TEXT_DIM),
            button(text("Browse stories").size(14))
                .style(theme::ghost_button)
                .padding([10, 18])
                .on_press(Message::BrowseStories),
        ]
        .spacing(16)
        .align_x(Alignment::Start),
    )
    .padding(60)
    .width(Length::Fill)
    .height(Length::Fill)
    .style(theme::app)
    .into()
}

fn hero<'a>(ctx: &StoryContext<'a>) -> Element<'a, Message> {
    let story = ctx.story;
    let height = (ctx.window.height * 0.95).max(560.0);

    let url = assets::image_url(
        &story.hero_image_id,
        ImageOptions::new(HERO_IMAGE_WIDTH, Quality::AutoBest),
    );
    let cover = remote_image(ctx.cache, url, Length::Fill, Length::Fixed(height));

    let meta = format!("{} • {}", story.location, story.date);
    let overlay = container(
        column![
            text(meta.to_uppercase()).size(12).color(theme::TEXT_DIM),
            text(story.title.as_str()).size(46),
            text(story.description.as_str())
                .size(17)
                .color(theme::TEXT_DIM),
            Space::with_height(12),
            text("Scroll to read ↓").size(13).color(theme::TEXT_DIM),
        ]
        .spacing(12)
        .max_width(860),
    )
    .width(Length::Fill)
    .height(Length::Fixed(height))
    .align_y(Alignment::End)
    .padding(48);

    stack![cover, overlay].into()
}

fn render_block<'a>(
    ctx: &StoryContext<'a>,
    index: usize,
    block: &'a Block,
) -> Element<'a, Message> {
    match block {
        Block::Text { content } => container(
            container(text(content.as_str()).size(17)).max_width(768),
        )
        .width(Length::Fill)
        .align_x(Alignment::Center)
        .into(),

        Block::Image {
            public_id,
            alt: _,
            caption,
        } => {
            let url = assets::image_url(
                public_id,
                ImageOptions::new(INLINE_IMAGE_WIDTH, Quality::Auto),
            );
            let mut figure = column![remote_image(
                ctx.cache,
                url,
                Length::Fill,
                Length::Fixed(560.0),
            )]
            .spacing(10);
            if let Some(caption) = caption {
                figure = figure.push(text(caption.as_str()).size(13).color(theme::TEXT_DIM));
            }
            figure.into()
        }

        Block::BehindShot {
            title,
            content,
            settings,
            ..
        } => {
            let mut card = column![
                text(title.as_str()).size(15),
                text(content.as_str()).size(15).color(theme::TEXT_DIM),
            ]
            .spacing(10);
            if let Some(settings) = settings {
                card = card.push(text(settings.as_str()).size(12).color(theme::TEXT_FAINT));
            }

            container(container(card).style(theme::card).padding(24).width(Length::Fill))
                .id(gallery::section_id(index))
                .width(Length::Fill)
                .into()
        }

        Block::Audio {
            title,
            src: _,
            subtitle,
        } => {
            let mut info = column![text(title.as_str()).size(15)].spacing(4);
            if let Some(subtitle) = subtitle {
                info = info.push(text(subtitle.as_str()).size(12).color(theme::TEXT_DIM));
            }

            let failed = ctx.audio_errors.get(&index);
            let listen = button(text(if failed.is_some() { "Try again ▶" } else { "Listen ▶" }).size(13))
                .style(theme::ghost_button)
                .padding([10, 16])
                .on_press(Message::PlayAudio(index));

            let mut card = column![row![
                info,
                Space::with_width(Length::Fill),
                listen
            ]
            .align_y(Alignment::Center)]
            .spacing(10);

            if let Some(error) = failed {
                card = card.push(
                    text(format!("Couldn't start playback: {}", error))
                        .size(12)
                        .color(theme::TEXT_FAINT),
                );
            }

            container(card)
                .style(theme::card)
                .padding(24)
                .width(Length::Fill)
                .into()
        }

        Block::SplitSticky {
            image,
            eyebrow,
            title,
            paragraphs,
            ..
        } => {
            let url = assets::image_url(
                &image.public_id,
                ImageOptions::new(SPLIT_IMAGE_WIDTH, Quality::Auto),
            );
            let mut picture = column![remote_image(
                ctx.cache,
                url,
                Length::Fill,
                Length::Fixed(520.0),
            )]
            .spacing(10)
            .width(Length::FillPortion(1));
            if let Some(caption) = &image.caption {
                picture = picture.push(text(caption.as_str()).size(12).color(theme::TEXT_DIM));
            }

            let mut prose = column![].spacing(16).width(Length::FillPortion(1));
            if let Some(eyebrow) = eyebrow {
                prose = prose.push(
                    text(eyebrow.to_uppercase())
                        .size(11)
                        .color(theme::TEXT_DIM),
                );
            }
            if let Some(title) = title {
                prose = prose.push(text(title.as_str()).size(24));
            }
            for paragraph in paragraphs {
                prose = prose.push(text(paragraph.as_str()).size(16).color(theme::TEXT_DIM));
            }

            container(row![picture, prose].spacing(40))
                .id(gallery::section_id(index))
                .width(Length::Fill)
                .into()
        }

        Block::HorizontalGallery {
            title, subtitle, ..
        } => match ctx.galleries.get(&index) {
            Some(engine) => gallery::view(
                index,
                title.as_deref(),
                subtitle.as_deref(),
                engine,
                ctx.cache,
                ctx.window.height,
            ),
            // A gallery block without an engine renders as nothing rather
            // than crashing; the composer builds one engine per gallery on
            // story open, so this only covers a malformed state.
            None => Space::new(0, 0).into(),
        },
    }
}

fn endcap<'a>(ctx: &StoryContext<'a>) -> Element<'a, Message> {
    if ctx.prev.is_none() && ctx.next.is_none() {
        return Space::new(0, 0).into();
    }

    let mut cards = row![].spacing(20);
    for (story, label) in [(ctx.prev, "PREVIOUS STORY"), (ctx.next, "READ NEXT")] {
        let Some(story) = story else {
            cards = cards.push(Space::with_width(Length::FillPortion(1)));
            continue;
        };

        let url = assets::image_url(
            &story.hero_image_id,
            ImageOptions::new(ENDCAP_IMAGE_WIDTH, Quality::Auto),
        );

        let card = column![
            remote_image(ctx.cache, url, Length::Fill, Length::Fixed(180.0)),
            text(label).size(11).color(theme::TEXT_FAINT),
            text(story.title.as_str()).size(20),
            text(story.description.as_str())
                .size(13)
                .color(theme::TEXT_DIM),
        ]
        .spacing(8)
        .padding(18);

        cards = cards.push(
            button(container(card).style(theme::card).width(Length::Fill))
                .style(theme::bare_button)
                .padding(0)
                .width(Length::FillPortion(1))
                .on_press(Message::OpenStory(story.slug.clone())),
        );
    }

    container(
        column![
            text("CONTINUE READING").size(11).color(theme::TEXT_FAINT),
            text("More stories").size(24),
            cards,
            button(text("Browse all stories").size(13))
                .style(theme::ghost_button)
                .padding([10, 16])
                .on_press(Message::BrowseStories),
        ]
        .spacing(14)
        .max_width(1024),
    )
    .width(Length::Fill)
    .align_x(Alignment::Center)
    .padding([48, 24])
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reveal_delay_grows_then_caps() {
        assert_eq!(reveal_delay(0), 0.0);
        assert_eq!(reveal_delay(1), 0.04);
        assert_eq!(reveal_delay(4), 0.16);
        // Capped from block five onward
        assert_eq!(reveal_delay(5), 0.18);
        assert_eq!(reveal_delay(100), 0.18);
    }

    #[test]
    fn test_reveal_delay_monotonic() {
        for i in 1..20 {
            assert!(reveal_delay(i) >= reveal_delay(i - 1));
        }
    }

    #[test]
    fn test_reading_progress() {
        assert_eq!(reading_progress(0.0, 5000.0, 800.0), 0.0);
        assert_eq!(reading_progress(2100.0, 5000.0, 800.0), 0.5);
        assert_eq!(reading_progress(4200.0, 5000.0, 800.0), 1.0);
        assert_eq!(reading_progress(9999.0, 5000.0, 800.0), 1.0);

        // Content shorter than the viewport never divides by zero
        assert_eq!(reading_progress(100.0, 600.0, 800.0), 0.0);
    }
}
