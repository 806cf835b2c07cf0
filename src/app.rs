use std::sync::Arc;
use std::time::Duration;

use iced::widget::{button, column, container, row, text, Space};
use iced::{Alignment, Background, Element, Length, Subscription, Task, Theme};

use crate::data::{analyze, project};
use crate::message::Message;
use crate::screens::dashboard::DashboardState;
use crate::screens::Page;
use crate::status::StatusLine;
use crate::theme::{ACCENT, DRAWER_BG, DRAWER_ITEM_BG, DRAWER_TEXT_ACTIVE, DRAWER_TEXT_INACTIVE};
use crate::zendesk::{
    load_batch, validate_range, DateRange, HttpZafClient, TicketSource, ZafClient, ZafConfig,
};
use lucide_icons::iced::{
    icon_chart_line, icon_house, icon_panel_left_close, icon_panel_left_open,
};

const REFRESH_INTERVAL: Duration = Duration::from_secs(300);

pub struct App {
    theme: Theme,
    current_page: Page,
    sidebar_collapsed: bool,
    client: Arc<dyn ZafClient>,
    dashboard: DashboardState,
}

impl App {
    pub fn new() -> (Self, Task<Message>) {
        let client: Arc<dyn ZafClient> = Arc::new(HttpZafClient::new(ZafConfig::from_env()));

        let mut app = Self {
            theme: Theme::Dark,
            current_page: Page::Dashboard,
            sidebar_collapsed: true,
            client,
            dashboard: DashboardState::new(),
        };
        let task = app.start_fetch(DateRange::default());

        (app, task)
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::ToggleSidebar => {
                self.sidebar_collapsed = !self.sidebar_collapsed;
                Task::none()
            }
            Message::Navigate(page) => {
                self.current_page = page;
                Task::none()
            }
            Message::StartDateChanged(value) => {
                self.dashboard.start_input = value;
                Task::none()
            }
            Message::EndDateChanged(value) => {
                self.dashboard.end_input = value;
                Task::none()
            }
            Message::ApplyFilter => {
                match validate_range(&self.dashboard.start_input, &self.dashboard.end_input) {
                    Err(err) => {
                        // Invalid input never reaches the API.
                        self.dashboard.validation_error = Some(err.to_string());
                        self.dashboard.status =
                            Some(StatusLine::error("Invalid date filter; request not sent"));
                        Task::none()
                    }
                    Ok(range) => {
                        self.dashboard.validation_error = None;
                        self.dashboard.applied_range = range;
                        self.start_fetch(range)
                    }
                }
            }
            Message::ToggleProjectionSeries(index) => {
                self.dashboard.toggle_projection_series(index);
                Task::none()
            }
            Message::RefreshTick => {
                // Ticks are independent full pipeline runs; a tick landing
                // while a fetch is still in flight races it and the last
                // response wins. Known limitation.
                self.start_fetch(self.dashboard.applied_range)
            }
            Message::BatchLoaded(batch) => {
                self.dashboard.loading = false;

                let analysis = analyze(&batch.tickets);
                self.dashboard.status = Some(match &batch.source {
                    TicketSource::Live => {
                        StatusLine::success(format!("{} tickets loaded", analysis.total))
                    }
                    TicketSource::Simulated { reason } => StatusLine::warning(format!(
                        "Live fetch failed ({reason}); showing {} simulated tickets",
                        analysis.total
                    )),
                });
                self.dashboard.projection = project(&analysis.by_date);
                self.dashboard.analysis = Some(analysis);
                self.dashboard.source = Some(batch.source);
                self.dashboard.renew_charts();

                Task::none()
            }
        }
    }

    fn start_fetch(&mut self, range: DateRange) -> Task<Message> {
        self.dashboard.loading = true;
        self.dashboard.status = Some(StatusLine::info(if range.is_unbounded() {
            "Fetching all tickets..."
        } else {
            "Fetching filtered tickets..."
        }));

        Task::perform(load_batch(self.client.clone(), range), Message::BatchLoaded)
    }

    pub fn subscription(&self) -> Subscription<Message> {
        iced::time::every(REFRESH_INTERVAL).map(|_| Message::RefreshTick)
    }

    pub fn view<'a>(&'a self) -> Element<'a, Message> {
        let sidebar = self.sidebar_view();
        let content = self.content_view();

        row![sidebar, content].height(Length::Fill).into()
    }

    pub fn theme(&self) -> Theme {
        self.theme.clone()
    }

    fn sidebar_view<'a>(&'a self) -> Element<'a, Message> {
        let toggle_icon = if self.sidebar_collapsed {
            icon_panel_left_open()
        } else {
            icon_panel_left_close()
        };

        let toggle = button(toggle_icon.size(18))
            .on_press(Message::ToggleSidebar)
            .style(|_theme, status| {
                let mut background = ACCENT;
                if matches!(status, button::Status::Hovered) {
                    background.a = 0.85;
                }
                if matches!(status, button::Status::Pressed) {
                    background.a = 0.7;
                }

                button::Style {
                    background: Some(Background::Color(background)),
                    text_color: DRAWER_TEXT_ACTIVE,
                    ..Default::default()
                }
            });

        let pages = [Page::Home, Page::Dashboard]
            .into_iter()
            .map(|page| self.sidebar_button(page));

        let content = column![toggle, Space::new().height(Length::Fixed(12.0))]
            .push(column(pages).spacing(6))
            .spacing(12)
            .padding(12)
            .width(if self.sidebar_collapsed {
                Length::Fixed(64.0)
            } else {
                Length::Fixed(220.0)
            })
            .height(Length::Fill);

        container(content)
            .style(|_| iced::widget::container::background(DRAWER_BG))
            .into()
    }

    fn sidebar_button<'a>(&'a self, page: Page) -> Element<'a, Message> {
        let selected = self.current_page == page;
        let label = page.label();
        let icon = match page {
            Page::Home => icon_house(),
            Page::Dashboard => icon_chart_line(),
        }
        .size(18)
        .style(move |_| iced::widget::text::Style {
            color: Some(if selected {
                DRAWER_TEXT_ACTIVE
            } else {
                DRAWER_TEXT_INACTIVE
            }),
        });

        let label_text = text(label).style(move |_| iced::widget::text::Style {
            color: Some(if selected {
                DRAWER_TEXT_ACTIVE
            } else {
                DRAWER_TEXT_INACTIVE
            }),
        });

        let row_content = if self.sidebar_collapsed {
            row![
                Space::new().width(Length::Fill),
                icon,
                Space::new().width(Length::Fill)
            ]
            .align_y(Alignment::Center)
        } else {
            row![icon, label_text]
                .spacing(12)
                .align_y(Alignment::Center)
        };

        button(row_content)
            .on_press(Message::Navigate(page))
            .width(Length::Fill)
            .style(move |_, status| {
                let background = if selected { ACCENT } else { DRAWER_ITEM_BG };

                let mut color = background;
                if matches!(status, button::Status::Hovered) {
                    color.a = 0.85;
                }
                if matches!(status, button::Status::Pressed) {
                    color.a = 0.7;
                }

                button::Style {
                    background: Some(Background::Color(color)),
                    ..Default::default()
                }
            })
            .padding(8)
            .into()
    }

    fn content_view<'a>(&'a self) -> Element<'a, Message> {
        match self.current_page {
            Page::Home => crate::screens::home::view(self.sidebar_collapsed),
            Page::Dashboard => crate::screens::dashboard::view(&self.dashboard),
        }
    }
}
