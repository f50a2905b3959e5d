/// Browse screen
///
/// The story index: searchable, tag-filterable cards built from catalog
/// metadata. Selecting a card navigates to its story.

use iced::widget::{button, column, container, row, scrollable, text, text_input, Space};
use iced::{Alignment, Element, Length};

use crate::assets::{self, ImageOptions, Quality};
use crate::cache::ImageCache;
use crate::catalog::store::Catalog;
use crate::catalog::story::Story;
use crate::ui::{remote_image, theme};
use crate::Message;

/// Width requested for browse covers
pub const COVER_IMAGE_WIDTH: u32 = 1800;
const COVER_HEIGHT: f32 = 240.0;

pub fn view<'a>(
    catalog: &'a Catalog,
    cache: &'a ImageCache,
    query: &'a str,
    selected_tag: Option<&'a str>,
) -> Element<'a, Message> {
    let header = column![
        text("Photo Stories").size(38),
        text("Scroll-based storytelling experiments. Digital magazine energy.")
            .size(15)
            .color(theme::TEXT_DIM),
    ]
    .spacing(8);

    let search = text_input("Search stories…", query)
        .on_input(Message::QueryChanged)
        .padding(10)
        .width(Length::Fixed(320.0));

    let mut chips = row![].spacing(8);
    let all_style = if selected_tag.is_none() {
        theme::chip_selected
    } else {
        theme::ghost_button
    };
    chips = chips.push(
        button(text("All").size(12))
            .style(all_style)
            .padding([6.0, 12.0])
            .on_press(Message::TagSelected(None)),
    );
    for tag in catalog.all_tags() {
        let style = if selected_tag == Some(tag.as_str()) {
            theme::chip_selected
        } else {
            theme::ghost_button
        };
        chips = chips.push(
            button(text(tag.clone()).size(12))
                .style(style)
                .padding([6.0, 12.0])
                .on_press(Message::TagSelected(Some(tag))),
        );
    }

    let filters = row![search, Space::with_width(16), chips.wrap()]
        .align_y(Alignment::Center)
        .spacing(8);

    let hits = catalog.filter(query, selected_tag);

    let mut grid = column![].spacing(20);
    if hits.is_empty() {
        grid = grid.push(
            text("No stories match those filters.")
                .size(14)
                .color(theme::TEXT_FAINT),
        );
    }
    for pair in hits.chunks(2) {
        let mut cards = row![].spacing(20);
        for story in pair {
            cards = cards.push(card(story, cache));
        }
        if pair.len() == 1 {
            cards = cards.push(Space::with_width(Length::FillPortion(1)));
        }
        grid = grid.push(cards);
    }

    let content = container(
        column![header, filters, grid]
            .spacing(28)
            .padding([48.0, 24.0])
            .max_width(1152),
    )
    .width(Length::Fill)
    .align_x(Alignment::Center);

    container(scrollable(content).width(Length::Fill).height(Length::Fill))
        .style(theme::app)
        .into()
}

fn card<'a>(story: &'a Story, cache: &'a ImageCache) -> Element<'a, Message> {
    let cover_url = assets::image_url(
        &story.hero_image_id,
        ImageOptions::new(COVER_IMAGE_WIDTH, Quality::Auto),
    );

    let meta = format!("{} • {}", story.location, story.date).to_uppercase();

    let mut body = column![
        remote_image(cache, cover_url, Length::Fill, Length::Fixed(COVER_HEIGHT)),
        text(meta).size(11).color(theme::TEXT_FAINT),
        text(story.title.as_str()).size(21),
        text(story.description.as_str())
            .size(13)
            .color(theme::TEXT_DIM),
    ]
    .spacing(8)
    .padding(16);

    if story.featured {
        body = body.push(
            text("FEATURED STORY").size(10).color(theme::TEXT_DIM),
        );
    }

    if !story.tags.is_empty() {
        let tags = story.tags.iter().take(4).map(|t| {
            container(text(t.as_str()).size(11).color(theme::TEXT_DIM))
                .padding([4.0, 10.0])
                .style(theme::card)
                .into()
        });
        body = body.push(row(tags).spacing(6));
    }

    button(container(body).style(theme::card).width(Length::Fill))
        .style(theme::bare_button)
        .padding(0)
        .width(Length::FillPortion(1))
        .on_press(Message::OpenStory(story.slug.clone()))
        .into()
}
