/// UI module
///
/// Screen and block rendering, all stateless views over the application
/// state:
/// - Browse screen with search and tag filters (home.rs)
/// - Story screen: hero, chapters, block dispatch, endcap (story.rs)
/// - Scroll-coupled gallery section (gallery.rs)
/// - Lightbox overlay (lightbox.rs)
/// - Shared palette and widget styles (theme.rs)

pub mod gallery;
pub mod home;
pub mod lightbox;
pub mod story;
pub mod theme;

use iced::widget::{button, container, text};
use iced::{Alignment, ContentFit, Element, Length};

use crate::cache::ImageCache;
use crate::Message;

/// Render a remote image by delivery URL: the decoded handle when the fetch
/// has landed, a quiet placeholder while it is in flight, and a retry
/// affordance when it failed. A failed image never takes its siblings down.
pub fn remote_image<'a>(
    cache: &ImageCache,
    url: String,
    width: Length,
    height: Length,
) -> Element<'a, Message> {
    if let Some(handle) = cache.handle(&url) {
        return iced::widget::image(handle)
            .width(width)
            .height(height)
            .content_fit(ContentFit::Cover)
            .into();
    }

    if cache.is_failed(&url) {
        let retry = button(text("Retry").size(13))
            .style(theme::ghost_button)
            .padding([6, 14])
            .on_press(Message::RetryImage(url));

        return container(
            iced::widget::column![text("Couldn't load image").size(13).color(theme::TEXT_DIM), retry]
                .spacing(10)
                .align_x(Alignment::Center),
        )
        .width(width)
        .height(height)
        .align_x(Alignment::Center)
        .align_y(Alignment::Center)
        .style(theme::placeholder)
        .into();
    }

    container(text("Loading…").size(13).color(theme::TEXT_FAINT))
        .width(width)
        .height(height)
        .align_x(Alignment::Center)
        .align_y(Alignment::Center)
        .style(theme::placeholder)
        .into()
}
