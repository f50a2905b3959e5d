/// Horizontal gallery section
///
/// The view side of the gallery engine: a tall section whose image track is
/// a horizontal scrollable driven programmatically from the engine's
/// progress (never by direct pointer scrolling). Each figure opens the
/// lightbox with the gallery's full image list.

use iced::widget::scrollable::{Direction, Scrollbar};
use iced::widget::{button, column, container, row, scrollable, text};
use iced::{Alignment, Element, Length};

use crate::assets::{self, ImageOptions, Quality};
use crate::cache::ImageCache;
use crate::state::gallery::{GalleryEngine, FIGURE_GAP, FIGURE_WIDTH, TRACK_PADDING};
use crate::ui::{remote_image, theme};
use crate::Message;

/// Width requested for track figures
pub const FIGURE_IMAGE_WIDTH: u32 = 1600;
/// Rendered height of a track figure's image
const FIGURE_HEIGHT: f32 = 440.0;

/// Container id of a block's section, used for layout sightings and
/// chapter jumps. Shared by every block kind that can be anchored.
pub fn section_id(block_index: usize) -> container::Id {
    container::Id::new(format!("story-block-{}", block_index))
}

/// Scrollable id of a gallery's image track
pub fn track_id(block_index: usize) -> scrollable::Id {
    scrollable::Id::new(format!("gallery-track-{}", block_index))
}

pub fn view<'a>(
    block_index: usize,
    title: Option<&'a str>,
    subtitle: Option<&'a str>,
    engine: &'a GalleryEngine,
    cache: &'a ImageCache,
    viewport_height: f32,
) -> Element<'a, Message> {
    let mut header = column![].spacing(8);
    if let Some(title) = title {
        header = header.push(text(title).size(24));
    }
    if let Some(subtitle) = subtitle {
        header = header.push(text(subtitle).size(14).color(theme::TEXT_DIM));
    }

    let figures = engine.images().iter().enumerate().map(|(i, img)| {
        let url = assets::image_url(
            &img.asset_id,
            ImageOptions::new(FIGURE_IMAGE_WIDTH, Quality::Auto),
        );

        let picture = remote_image(
            cache,
            url,
            Length::Fixed(FIGURE_WIDTH),
            Length::Fixed(FIGURE_HEIGHT),
        );

        let open = button(picture)
            .style(theme::bare_button)
            .padding(0)
            .on_press(Message::OpenLightbox(engine.images().to_vec(), i as i64));

        let mut figure = column![open].spacing(8).width(Length::Fixed(FIGURE_WIDTH));
        if let Some(caption) = &img.caption {
            figure = figure.push(text(caption.as_str()).size(12).color(theme::TEXT_DIM));
        }

        figure.into()
    });

    let track = scrollable(
        row(figures)
            .spacing(FIGURE_GAP)
            .padding(TRACK_PADDING),
    )
    .id(track_id(block_index))
    .direction(Direction::Horizontal(
        Scrollbar::new().width(0).scroller_width(0),
    ))
    .width(Length::Fill);

    let body = container(
        column![header, container(track).style(theme::card)]
            .spacing(18)
            .width(Length::Fill),
    )
    .width(Length::Fill);

    let tip = text("Tip: keep scrolling — the gallery moves sideways.")
        .size(12)
        .color(theme::TEXT_FAINT);

    // The section is taller than its content so vertical scrolling has the
    // distance to traverse the track; the engine owns that height.
    container(
        column![body, tip]
            .spacing(12)
            .align_x(Alignment::Start),
    )
    .id(section_id(block_index))
    .width(Length::Fill)
    .height(Length::Fixed(engine.section_height(viewport_height)))
    .align_y(Alignment::Start)
    .into()
}
