use iced::{widget::button, Background, Color, Theme};

// Zendesk Garden palette.
pub const ACCENT: Color = Color::from_rgb8(0x03, 0x36, 0x3d);
pub const DRAWER_BG: Color = Color::from_rgb8(0x0b, 0x12, 0x14);
pub const DRAWER_ITEM_BG: Color = Color::from_rgb8(0x10, 0x1d, 0x20);
pub const DRAWER_TEXT_ACTIVE: Color = Color::from_rgb8(0xe6, 0xf1, 0xf4);
pub const DRAWER_TEXT_INACTIVE: Color = Color::from_rgb8(0xa5, 0xaf, 0xb3);
pub const TEXT_ON_ACCENT: Color = Color::from_rgb8(0xe9, 0xf4, 0xf7);

pub const SERIES_PRIMARY: Color = Color::from_rgb8(0x03, 0x36, 0x3d);
pub const SERIES_INFO: Color = Color::from_rgb8(0x0d, 0x6e, 0xfd);
pub const SERIES_SUCCESS: Color = Color::from_rgb8(0x19, 0x87, 0x54);
pub const SERIES_WARNING: Color = Color::from_rgb8(0xff, 0xc1, 0x07);
pub const SERIES_DANGER: Color = Color::from_rgb8(0xdc, 0x35, 0x45);

pub fn accent_button_style(_theme: &Theme, status: button::Status) -> button::Style {
    let mut background = ACCENT;

    if matches!(status, button::Status::Hovered) {
        background.a = 0.85;
    }

    if matches!(status, button::Status::Pressed) {
        background.a = 0.7;
    }

    button::Style {
        background: Some(Background::Color(background)),
        text_color: TEXT_ON_ACCENT,
        ..Default::default()
    }
}
