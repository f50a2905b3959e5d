/// Lightbox overlay
///
/// Rendered on top of whatever screen is showing whenever the controller is
/// open. Clicking the dimmed backdrop closes; clicks inside the image frame
/// are swallowed so they don't fall through to the backdrop.

use iced::widget::{button, column, container, mouse_area, row, text, Space};
use iced::{Alignment, Element, Length};

use crate::cache::ImageCache;
use crate::state::lightbox::Lightbox;
use crate::ui::{remote_image, theme};
use crate::Message;

/// Build the overlay. Callers only invoke this while the controller is
/// open; a closed controller renders nothing.
pub fn view<'a>(lightbox: &'a Lightbox, cache: &'a ImageCache) -> Element<'a, Message> {
    let Some((image, index, count)) = lightbox.active() else {
        return Space::new(0, 0).into();
    };

    let counter = text(format!("{} / {}", index + 1, count))
        .size(13)
        .color(theme::TEXT_DIM);

    let close = button(text("✕").size(15))
        .style(theme::ghost_button)
        .padding([8, 12])
        .on_press(Message::CloseLightbox);

    let header = row![counter, Space::with_width(Length::Fill), close]
        .align_y(Alignment::Center)
        .spacing(12);

    let url = lightbox
        .display_url()
        .unwrap_or_default();
    let picture = container(remote_image(
        cache,
        url,
        Length::Fill,
        Length::Fixed(620.0),
    ))
    .style(theme::frame)
    .padding(2)
    .width(Length::Fill);

    let caption = image
        .caption
        .as_deref()
        .unwrap_or(&image.alt);

    let mut content = column![header, picture, text(caption).size(14).color(theme::TEXT_DIM)]
        .spacing(14)
        .max_width(1100);

    if count > 1 {
        let prev = button(text("‹").size(22))
            .style(theme::ghost_button)
            .padding([10, 18])
            .on_press(Message::LightboxPrev);
        let next = button(text("›").size(22))
            .style(theme::ghost_button)
            .padding([10, 18])
            .on_press(Message::LightboxNext);

        content = content.push(
            row![prev, Space::with_width(Length::Fill), next].align_y(Alignment::Center),
        );
    }

    // The frame swallows clicks; anything outside it reaches the backdrop
    // and closes the viewer.
    let framed = mouse_area(content).on_press(Message::Ignored);

    let backdrop = mouse_area(
        container(framed)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .padding(24)
            .style(theme::backdrop),
    )
    .on_press(Message::CloseLightbox);

    backdrop.into()
}
