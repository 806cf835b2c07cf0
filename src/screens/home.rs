use iced::widget::{column, container, text, Space};
use iced::{Element, Length};

use crate::message::Message;
use crate::theme::DRAWER_TEXT_INACTIVE;

pub fn view<'a>(_collapsed: bool) -> Element<'a, Message> {
    let content = column![
        text("Ticket Analytics").size(28),
        Space::new().height(Length::Fixed(8.0)),
        text("Daily ticket volume, breakdowns and a naive projection, built from the Zendesk search API.")
            .size(14)
            .style(|_| iced::widget::text::Style {
                color: Some(DRAWER_TEXT_INACTIVE),
            }),
        text("Open the Dashboard page to filter by created date and explore the charts.")
            .size(14)
            .style(|_| iced::widget::text::Style {
                color: Some(DRAWER_TEXT_INACTIVE),
            }),
    ]
    .spacing(8);

    container(content).padding(24).into()
}
