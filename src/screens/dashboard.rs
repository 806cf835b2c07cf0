use std::cell::RefCell;
use std::rc::Rc;

use chrono::{NaiveDate, NaiveTime, Utc};
use iced::widget::canvas::Canvas;
use iced::widget::{button, column, container, row, text, text_input};
use iced::{Element, Fill, Length};

use crate::charts::{
    AxisKind, BarChart, BarPoint, ChartConfig, ChartId, InteractionContext, InteractionToggles,
    LineChart, LineSeries, TooltipEvent,
};
use crate::data::{Projection, TicketAnalysis};
use crate::message::Message;
use crate::status::StatusLine;
use crate::theme::{
    accent_button_style, DRAWER_TEXT_INACTIVE, SERIES_DANGER, SERIES_INFO, SERIES_PRIMARY,
    SERIES_SUCCESS, SERIES_WARNING,
};
use crate::zendesk::{DateRange, TicketSource};

/// Ids for the charts of the current render cycle. Instances are torn down
/// whenever a new batch arrives; `renew` releases every old id from the
/// interaction context before allocating fresh ones.
#[derive(Debug, Clone, Copy)]
pub struct ChartIds {
    pub trend: ChartId,
    pub hourly: ChartId,
    pub weekday: ChartId,
    pub status: ChartId,
    pub priority: ChartId,
    pub projection: ChartId,
}

impl ChartIds {
    fn register(ctx: &mut InteractionContext) -> Self {
        Self {
            trend: ctx.register(),
            hourly: ctx.register(),
            weekday: ctx.register(),
            status: ctx.register(),
            priority: ctx.register(),
            projection: ctx.register(),
        }
    }

    fn release(&self, ctx: &mut InteractionContext) {
        for id in [
            self.trend,
            self.hourly,
            self.weekday,
            self.status,
            self.priority,
            self.projection,
        ] {
            ctx.release(id);
        }
    }
}

/// Legend order of the projection chart's series.
const PROJECTION_SERIES: [&str; 4] = ["Actual", "Projection", "Upper band", "Lower band"];

pub struct DashboardState {
    pub start_input: String,
    pub end_input: String,
    pub validation_error: Option<String>,
    pub applied_range: DateRange,
    pub loading: bool,
    pub status: Option<StatusLine>,
    pub analysis: Option<TicketAnalysis>,
    pub projection: Option<Projection>,
    pub source: Option<TicketSource>,
    pub projection_visible: [bool; PROJECTION_SERIES.len()],
    pub interaction: Rc<RefCell<InteractionContext>>,
    pub chart_ids: ChartIds,
}

impl DashboardState {
    pub fn new() -> Self {
        let interaction = Rc::new(RefCell::new(InteractionContext::new()));
        let chart_ids = ChartIds::register(&mut interaction.borrow_mut());

        Self {
            start_input: String::new(),
            end_input: String::new(),
            validation_error: None,
            applied_range: DateRange::default(),
            loading: false,
            status: None,
            analysis: None,
            projection: None,
            source: None,
            projection_visible: [true; PROJECTION_SERIES.len()],
            interaction,
            chart_ids,
        }
    }

    /// Flips one projection series in and out of the chart. Hiding or
    /// showing a series changes the tooltip's content set, so the shared
    /// tooltip hides until the cursor moves again.
    pub fn toggle_projection_series(&mut self, index: usize) {
        if let Some(flag) = self.projection_visible.get_mut(index) {
            *flag = !*flag;
            self.interaction
                .borrow_mut()
                .tooltip_event(self.chart_ids.projection, TooltipEvent::SeriesToggled);
        }
    }

    /// Invalidates the previous render cycle's chart instances and hands
    /// out ids for the next one.
    pub fn renew_charts(&mut self) {
        let mut ctx = self.interaction.borrow_mut();
        self.chart_ids.release(&mut ctx);
        self.chart_ids = ChartIds::register(&mut ctx);
    }
}

pub fn view<'a>(state: &'a DashboardState) -> Element<'a, Message> {
    let mut content = column![text("Dashboard").size(28)].spacing(24);

    content = content.push(filter_row(state));

    if let Some(error) = &state.validation_error {
        content = content.push(
            text(error.clone())
                .size(14)
                .style(|_| iced::widget::text::Style {
                    color: Some(SERIES_DANGER),
                }),
        );
    }

    if let Some(status) = &state.status {
        let color = status.level.color();
        content = content.push(text(status.message.clone()).size(14).style(
            move |_| iced::widget::text::Style { color: Some(color) },
        ));
    }

    if let Some(TicketSource::Simulated { reason }) = &state.source {
        content = content.push(
            text(format!("Showing simulated data ({reason})"))
                .size(13)
                .style(|_| iced::widget::text::Style {
                    color: Some(SERIES_WARNING),
                }),
        );
    }

    match &state.analysis {
        None if state.loading => {
            content = content.push(text("Loading ticket data...").size(14));
        }
        None => {
            content = content.push(text("No data available yet.").size(14));
        }
        Some(analysis) => {
            content = content.push(metric_row(analysis));
            content = content.push(trend_section(state, analysis));
            content = content.push(hourly_section(state, analysis));
            content = content.push(weekday_section(state, analysis));
            content = content.push(status_section(state, analysis));
            content = content.push(priority_section(state, analysis));
            if let Some(projection) = &state.projection {
                content = content.push(projection_section(state, projection));
            }
        }
    }

    container(iced::widget::scrollable(content.padding(24)))
        .width(Fill)
        .into()
}

fn filter_row<'a>(state: &'a DashboardState) -> Element<'a, Message> {
    let apply = button(text("Apply filter").size(14))
        .style(accent_button_style)
        .on_press(Message::ApplyFilter);

    row![
        text("Created from").size(14),
        text_input("YYYY-MM-DD", &state.start_input)
            .on_input(Message::StartDateChanged)
            .width(Length::Fixed(130.0)),
        text("to").size(14),
        text_input("YYYY-MM-DD", &state.end_input)
            .on_input(Message::EndDateChanged)
            .width(Length::Fixed(130.0)),
        apply,
    ]
    .spacing(12)
    .align_y(iced::Alignment::Center)
    .into()
}

fn metric_row<'a>(analysis: &TicketAnalysis) -> Element<'a, Message> {
    let today = Utc::now().date_naive();

    row![
        metric_tile("Total tickets", analysis.total.to_string()),
        metric_tile("Today", analysis.tickets_today(today).to_string()),
        metric_tile("Pending", analysis.pending.to_string()),
        metric_tile("Resolution rate", format!("{}%", analysis.resolution_rate())),
    ]
    .spacing(16)
    .into()
}

fn metric_tile<'a>(label: &'a str, value: String) -> Element<'a, Message> {
    container(
        column![
            text(value).size(26),
            text(label).size(13).style(|_| iced::widget::text::Style {
                color: Some(DRAWER_TEXT_INACTIVE),
            }),
        ]
        .spacing(4),
    )
    .padding(16)
    .width(Fill)
    .style(|theme| iced::widget::container::bordered_box(theme))
    .into()
}

fn trend_section<'a>(
    state: &'a DashboardState,
    analysis: &TicketAnalysis,
) -> Element<'a, Message> {
    let xs: Vec<f64> = analysis.by_date.dates.iter().copied().map(day_to_ts).collect();
    let ys: Vec<Option<f64>> = analysis
        .by_date
        .counts
        .iter()
        .map(|count| Some(f64::from(*count)))
        .collect();

    let chart = LineChart::new(
        state.interaction.clone(),
        state.chart_ids.trend,
        xs,
        vec![LineSeries::new("Tickets", SERIES_PRIMARY, ys).filled()],
    )
    .with_config(ChartConfig {
        x_axis: AxisKind::Time,
        ..ChartConfig::default()
    });

    chart_section(
        "Tickets per Day",
        "Created tickets bucketed by calendar day. Drag or ctrl-scroll to zoom, double-click to reset.",
        Canvas::new(chart).width(Fill).height(320),
        analysis.by_date.is_empty(),
    )
}

fn hourly_section<'a>(
    state: &'a DashboardState,
    analysis: &TicketAnalysis,
) -> Element<'a, Message> {
    let xs: Vec<f64> = (0..24).map(f64::from).collect();
    let ys: Vec<Option<f64>> = analysis
        .by_hour
        .iter()
        .map(|count| Some(f64::from(*count)))
        .collect();

    let chart = LineChart::new(
        state.interaction.clone(),
        state.chart_ids.hourly,
        xs,
        vec![LineSeries::new("Tickets", SERIES_INFO, ys).filled()],
    )
    .with_config(ChartConfig {
        grid_lines: 6,
        ..ChartConfig::default()
    })
    .with_interaction(InteractionToggles::tooltip_only());

    chart_section(
        "Tickets per Hour",
        "Hour of day the tickets were created (UTC).",
        Canvas::new(chart).width(Fill).height(240),
        analysis.total == 0,
    )
}

fn weekday_section<'a>(
    state: &'a DashboardState,
    analysis: &TicketAnalysis,
) -> Element<'a, Message> {
    const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

    let points = WEEKDAYS
        .iter()
        .zip(analysis.by_weekday)
        .map(|(label, count)| BarPoint {
            label: (*label).to_owned(),
            value: f64::from(count),
        })
        .collect();

    let chart = BarChart::new(
        state.interaction.clone(),
        state.chart_ids.weekday,
        "Tickets",
        SERIES_WARNING,
        points,
    );

    chart_section(
        "Tickets by Weekday",
        "Created tickets grouped by day of week.",
        Canvas::new(chart).width(Fill).height(240),
        analysis.total == 0,
    )
}

fn status_section<'a>(
    state: &'a DashboardState,
    analysis: &TicketAnalysis,
) -> Element<'a, Message> {
    let points = analysis
        .by_status
        .iter()
        .map(|(status, count)| BarPoint {
            label: status.label().to_owned(),
            value: f64::from(*count),
        })
        .collect();

    let chart = BarChart::new(
        state.interaction.clone(),
        state.chart_ids.status,
        "Tickets",
        SERIES_PRIMARY,
        points,
    );

    chart_section(
        "Tickets by Status",
        "Current status of the fetched tickets.",
        Canvas::new(chart).width(Fill).height(240),
        analysis.by_status.is_empty(),
    )
}

fn priority_section<'a>(
    state: &'a DashboardState,
    analysis: &TicketAnalysis,
) -> Element<'a, Message> {
    let points = analysis
        .by_priority
        .iter()
        .map(|(priority, count)| BarPoint {
            label: priority.label().to_owned(),
            value: f64::from(*count),
        })
        .collect();

    let chart = BarChart::new(
        state.interaction.clone(),
        state.chart_ids.priority,
        "Tickets",
        SERIES_INFO,
        points,
    );

    chart_section(
        "Tickets by Priority",
        "Distribution across priorities.",
        Canvas::new(chart).width(Fill).height(240),
        analysis.by_priority.is_empty(),
    )
}

fn projection_section<'a>(
    state: &'a DashboardState,
    projection: &Projection,
) -> Element<'a, Message> {
    let xs: Vec<f64> = projection.dates.iter().copied().map(day_to_ts).collect();
    let len = xs.len();

    let flat = |value: f64| vec![Some(value); len];

    let series: Vec<LineSeries> = [
        LineSeries::new("Actual", SERIES_PRIMARY, projection.actual.clone()),
        LineSeries::new("Projection", SERIES_SUCCESS, flat(projection.mean)).dashed(),
        LineSeries::new("Upper band", SERIES_WARNING, flat(projection.upper)).dashed(),
        LineSeries::new("Lower band", SERIES_DANGER, flat(projection.lower)).dashed(),
    ]
    .into_iter()
    .zip(state.projection_visible)
    .map(|(series, visible)| series.visible(visible))
    .collect();

    let legend = row(series.iter().enumerate().map(|(index, entry)| {
        let color = if entry.visible {
            entry.color
        } else {
            DRAWER_TEXT_INACTIVE
        };
        button(
            text(PROJECTION_SERIES[index])
                .size(12)
                .style(move |_| iced::widget::text::Style { color: Some(color) }),
        )
        .style(iced::widget::button::text)
        .padding(4)
        .on_press(Message::ToggleProjectionSeries(index))
        .into()
    }))
    .spacing(8);

    let chart = LineChart::new(
        state.interaction.clone(),
        state.chart_ids.projection,
        xs,
        series,
    )
    .with_config(ChartConfig {
        x_axis: AxisKind::Time,
        ..ChartConfig::default()
    });

    let projected_from = projection.dates[projection.horizon_start()];
    let body = column![legend, Canvas::new(chart).width(Fill).height(300)].spacing(8);

    chart_section(
        "Projection",
        format!(
            "Trailing 7-day average with a one-standard-deviation band, projected from {projected_from}."
        ),
        body,
        len == 0,
    )
}

fn chart_section<'a>(
    title: &'static str,
    subtitle: impl Into<String>,
    chart: impl Into<Element<'a, Message>>,
    empty: bool,
) -> Element<'a, Message> {
    let mut section = column![text(title).size(18), text(subtitle.into()).size(13)]
        .spacing(8)
        .push(chart);

    if empty {
        section = section.push(text("No data in the selected range.").size(14));
    }

    container(section)
        .padding(16)
        .style(|theme| iced::widget::container::bordered_box(theme))
        .into()
}

fn day_to_ts(date: NaiveDate) -> f64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp() as f64
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggling_a_projection_series_flips_visibility_and_hides_the_tooltip() {
        let mut state = DashboardState::new();
        let id = state.chart_ids.projection;

        state.interaction.borrow_mut().tooltip_event(
            id,
            TooltipEvent::CursorMoved {
                x: 10.0,
                y: 10.0,
                lines: vec!["Projection: 5".to_owned()],
            },
        );
        assert!(state.interaction.borrow().tooltip().is_shown());

        state.toggle_projection_series(1);
        assert!(!state.projection_visible[1]);
        assert!(!state.interaction.borrow().tooltip().is_shown());

        state.toggle_projection_series(1);
        assert!(state.projection_visible[1]);
    }

    #[test]
    fn out_of_range_series_index_is_ignored() {
        let mut state = DashboardState::new();
        state.toggle_projection_series(PROJECTION_SERIES.len());
        assert_eq!(state.projection_visible, [true; PROJECTION_SERIES.len()]);
    }

    #[test]
    fn renewing_charts_drops_the_old_ids() {
        let mut state = DashboardState::new();
        let old = state.chart_ids.trend;
        state
            .interaction
            .borrow_mut()
            .record_original(
                old,
                crate::charts::ScaleBounds {
                    x_min: 0.0,
                    x_max: 1.0,
                    y_min: 0.0,
                    y_max: 1.0,
                },
            );

        state.renew_charts();

        assert!(state.interaction.borrow().original(old).is_none());
        assert_ne!(state.chart_ids.trend, old);
    }
}
