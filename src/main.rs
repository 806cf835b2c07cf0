mod app;
mod charts;
mod data;
mod message;
mod screens;
mod status;
mod theme;
mod zendesk;

use app::App;
use iced::Settings;
use lucide_icons::LUCIDE_FONT_BYTES;

fn main() -> iced::Result {
    env_logger::init();

    iced::application(App::new, App::update, App::view)
        .subscription(App::subscription)
        .theme(App::theme)
        .settings(Settings {
            fonts: vec![LUCIDE_FONT_BYTES.into()],
            ..Default::default()
        })
        .window_size((1024.0, 768.0))
        .run()
}
