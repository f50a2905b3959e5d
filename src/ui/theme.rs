/// Shared palette and widget styles
///
/// A dark neutral palette matching the published site: near-black surfaces,
/// hairline borders, warm gray text.

use iced::widget::{button, container};
use iced::{Border, Color, Theme};

const fn rgb8(r: u8, g: u8, b: u8) -> Color {
    Color {
        r: r as f32 / 255.0,
        g: g as f32 / 255.0,
        b: b as f32 / 255.0,
        a: 1.0,
    }
}

pub const BG: Color = rgb8(0x0a, 0x0a, 0x0a);
pub const SURFACE: Color = rgb8(0x17, 0x17, 0x17);
pub const SURFACE_RAISED: Color = rgb8(0x26, 0x26, 0x26);
pub const BORDER: Color = rgb8(0x26, 0x26, 0x26);
pub const BORDER_LIGHT: Color = rgb8(0x40, 0x40, 0x40);
pub const TEXT: Color = rgb8(0xf5, 0xf5, 0xf5);
pub const TEXT_DIM: Color = rgb8(0xa3, 0xa3, 0xa3);
pub const TEXT_FAINT: Color = rgb8(0x73, 0x73, 0x73);

fn rounded(color: Color, radius: f32) -> container::Style {
    container::Style {
        background: Some(color.into()),
        border: Border {
            color: BORDER,
            width: 1.0,
            radius: radius.into(),
        },
        ..container::Style::default()
    }
}

/// Application background
pub fn app(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(BG.into()),
        text_color: Some(TEXT),
        ..container::Style::default()
    }
}

/// Bordered card for blocks and story tiles
pub fn card(_theme: &Theme) -> container::Style {
    rounded(SURFACE, 16.0)
}

/// Recessed area behind images that have not arrived yet
pub fn placeholder(_theme: &Theme) -> container::Style {
    rounded(Color::from_rgb8(0x12, 0x12, 0x12), 12.0)
}

/// Dimmed full-screen backdrop behind the lightbox
pub fn backdrop(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Color { a: 0.85, ..Color::BLACK }.into()),
        ..container::Style::default()
    }
}

/// Frame around the lightbox image
pub fn frame(_theme: &Theme) -> container::Style {
    rounded(Color::from_rgb8(0x0e, 0x0e, 0x0e), 16.0)
}

/// Subtle bordered button: chips, chevrons, close
pub fn ghost_button(_theme: &Theme, status: button::Status) -> button::Style {
    let background = match status {
        button::Status::Hovered | button::Status::Pressed => SURFACE_RAISED,
        _ => SURFACE,
    };

    button::Style {
        background: Some(background.into()),
        text_color: TEXT,
        border: Border {
            color: BORDER_LIGHT,
            width: 1.0,
            radius: 12.0.into(),
        },
        ..button::Style::default()
    }
}

/// Selected variant of a filter chip
pub fn chip_selected(_theme: &Theme, _status: button::Status) -> button::Style {
    button::Style {
        background: Some(TEXT.into()),
        text_color: BG,
        border: Border {
            color: TEXT,
            width: 1.0,
            radius: 12.0.into(),
        },
        ..button::Style::default()
    }
}

/// Invisible button wrapper for clickable images and large cards
pub fn bare_button(_theme: &Theme, _status: button::Status) -> button::Style {
    button::Style {
        background: None,
        text_color: TEXT,
        ..button::Style::default()
    }
}
