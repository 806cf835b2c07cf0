use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use chrono::DateTime;
use iced::keyboard;
use iced::mouse;
use iced::widget::canvas::{self, Cache, Frame, Geometry, LineDash, Path, Stroke, Text};
use iced::{Point, Rectangle, Renderer, Theme};

use super::interaction::{
    tooltip_lines, ChartId, InteractionContext, PlotFrame, ScaleBounds, SeriesSample, Tooltip,
    TooltipEvent, ZOOM_IN_FACTOR, ZOOM_OUT_FACTOR,
};
use super::model::{AxisKind, ChartConfig, InteractionToggles, LineSeries};
use crate::message::Message;

const DOUBLE_CLICK: Duration = Duration::from_millis(400);
const DASH_SEGMENTS: [f32; 2] = [5.0, 5.0];

/// A line chart over one shared x column with aligned, possibly gapped,
/// series columns. Interaction state shared with other charts (tooltip,
/// original zoom bounds) lives in the `InteractionContext`; per-widget
/// zoom/drag state lives in `PlotState`.
pub struct LineChart {
    ctx: Rc<RefCell<InteractionContext>>,
    id: ChartId,
    cache: Cache,
    xs: Vec<f64>,
    series: Vec<LineSeries>,
    config: ChartConfig,
    toggles: InteractionToggles,
}

impl LineChart {
    /// Builds the chart and records its original axis bounds for this id
    /// (first mount wins; zoomed re-renders do not overwrite).
    pub fn new(
        ctx: Rc<RefCell<InteractionContext>>,
        id: ChartId,
        xs: Vec<f64>,
        series: Vec<LineSeries>,
    ) -> Self {
        if let Some(bounds) = data_bounds(&xs, &series) {
            ctx.borrow_mut().record_original(id, bounds);
        }

        Self {
            ctx,
            id,
            cache: Cache::new(),
            xs,
            series,
            config: ChartConfig::default(),
            toggles: InteractionToggles::default(),
        }
    }

    pub fn with_config(mut self, config: ChartConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_interaction(mut self, toggles: InteractionToggles) -> Self {
        self.toggles = toggles;
        self
    }

    fn frame(&self, state: &PlotState, bounds: Rectangle) -> PlotFrame {
        // Widget state persists by tree position; bounds zoomed under a
        // previous instance's id must not pin a renewed chart's axes.
        let instance_bounds = if state.owner == Some(self.id) {
            state.bounds
        } else {
            None
        };

        let scales = instance_bounds
            .or_else(|| self.ctx.borrow().original(self.id))
            .or_else(|| data_bounds(&self.xs, &self.series))
            .unwrap_or(ScaleBounds {
                x_min: 0.0,
                x_max: 1.0,
                y_min: 0.0,
                y_max: 1.0,
            });

        let padding = self.config.padding;
        PlotFrame {
            left: padding,
            top: padding,
            right: bounds.width - padding,
            bottom: bounds.height - padding,
            scales,
        }
    }

    fn x_label(&self, value: f64) -> String {
        match self.config.x_axis {
            AxisKind::Time => format_day(value),
            AxisKind::Linear => format!("{value:.0}"),
        }
    }

    fn lines_at(&self, state: &PlotState, bounds: Rectangle, position: Point) -> Vec<String> {
        let frame = self.frame(state, bounds);
        let Some(index) = frame.nearest_index(&self.xs, position.x, position.y) else {
            return Vec::new();
        };

        let samples: Vec<SeriesSample<'_>> = self
            .series
            .iter()
            .map(|series| SeriesSample {
                label: &series.label,
                visible: series.visible,
                value: series.ys.get(index).copied().flatten(),
            })
            .collect();

        tooltip_lines(Some(self.x_label(self.xs[index])), &samples)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PlotState {
    owner: Option<ChartId>,
    bounds: Option<ScaleBounds>,
    drag: Option<((f32, f32), (f32, f32))>,
    modifiers: keyboard::Modifiers,
    last_click: Option<Instant>,
}

impl canvas::Program<Message> for LineChart {
    type State = PlotState;

    fn update(
        &self,
        state: &mut Self::State,
        event: &canvas::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        if state.owner != Some(self.id) {
            *state = PlotState {
                owner: Some(self.id),
                ..PlotState::default()
            };
        }

        match event {
            canvas::Event::Keyboard(keyboard::Event::ModifiersChanged(modifiers)) => {
                state.modifiers = *modifiers;
                None
            }
            canvas::Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                let position = cursor.position_in(bounds)?;

                if let Some((_, end)) = &mut state.drag {
                    *end = (position.x, position.y);
                }

                if self.toggles.tooltip {
                    let lines = self.lines_at(state, bounds, position);
                    self.ctx.borrow_mut().tooltip_event(
                        self.id,
                        TooltipEvent::CursorMoved {
                            x: position.x,
                            y: position.y,
                            lines,
                        },
                    );
                }

                Some(canvas::Action::request_redraw())
            }
            canvas::Event::Mouse(mouse::Event::CursorLeft) => {
                self.ctx
                    .borrow_mut()
                    .tooltip_event(self.id, TooltipEvent::PointerLeft);
                state.drag = None;
                Some(canvas::Action::request_redraw())
            }
            canvas::Event::Mouse(mouse::Event::WheelScrolled { delta }) => {
                if !self.toggles.wheel_zoom || !state.modifiers.control() {
                    return None;
                }
                let position = cursor.position_in(bounds)?;
                let frame = self.frame(state, bounds);
                if !frame.contains(position.x, position.y) {
                    return None;
                }

                let scroll = match delta {
                    mouse::ScrollDelta::Lines { y, .. } => *y,
                    mouse::ScrollDelta::Pixels { y, .. } => *y / 60.0,
                };
                if scroll == 0.0 {
                    return None;
                }

                let factor = if scroll > 0.0 {
                    ZOOM_IN_FACTOR
                } else {
                    ZOOM_OUT_FACTOR
                };
                state.bounds = Some(frame.scales.zoom_around(
                    frame.px_to_x(position.x),
                    frame.px_to_y(position.y),
                    factor,
                ));
                self.cache.clear();
                self.ctx
                    .borrow_mut()
                    .tooltip_event(self.id, TooltipEvent::ScaleChanged);
                Some(canvas::Action::request_redraw())
            }
            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                let position = cursor.position_in(bounds)?;
                let frame = self.frame(state, bounds);
                if !frame.contains(position.x, position.y) {
                    return None;
                }

                let now = Instant::now();
                let double_click = state
                    .last_click
                    .is_some_and(|last| now.duration_since(last) < DOUBLE_CLICK);
                state.last_click = Some(now);

                if double_click && self.toggles.zoom_reset {
                    // No-op when nothing was recorded for this instance.
                    if let Some(original) = self.ctx.borrow().original(self.id) {
                        state.bounds = Some(original);
                        self.cache.clear();
                    }
                    state.drag = None;
                    self.ctx
                        .borrow_mut()
                        .tooltip_event(self.id, TooltipEvent::ScaleChanged);
                } else if self.toggles.drag_zoom {
                    state.drag = Some(((position.x, position.y), (position.x, position.y)));
                }

                Some(canvas::Action::request_redraw())
            }
            canvas::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                let drag = state.drag.take()?;
                let frame = self.frame(state, bounds);

                if let Some(zoomed) = frame.drag_zoom(drag.0, drag.1) {
                    state.bounds = Some(zoomed);
                    self.cache.clear();
                    self.ctx
                        .borrow_mut()
                        .tooltip_event(self.id, TooltipEvent::ScaleChanged);
                }

                Some(canvas::Action::request_redraw())
            }
            _ => None,
        }
    }

    fn draw(
        &self,
        state: &Self::State,
        renderer: &Renderer,
        theme: &Theme,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut geometries = Vec::new();
        if self.xs.is_empty() {
            return geometries;
        }

        let plot = self.frame(state, bounds);

        let geometry = self.cache.draw(renderer, bounds.size(), |frame| {
            let palette = theme.extended_palette();
            let size = frame.size();
            let padding = self.config.padding;

            if size.width <= padding * 2.0 || size.height <= padding * 2.0 {
                return;
            }

            let grid_stroke = Stroke::default()
                .with_width(1.0)
                .with_color(palette.background.weak.color);

            let grid_lines = self.config.grid_lines.max(1);
            for i in 0..=grid_lines {
                let t = i as f32 / grid_lines as f32;

                let y = plot.bottom - t * (plot.bottom - plot.top);
                frame.stroke(
                    &Path::line(Point::new(plot.left, y), Point::new(plot.right, y)),
                    grid_stroke,
                );
                let y_value = plot.scales.y_min + f64::from(t) * plot.scales.y_span();
                frame.fill_text(Text {
                    content: format!("{y_value:.0}"),
                    position: Point::new(plot.left - 8.0, y - 6.0),
                    color: palette.background.base.text,
                    size: 11.0.into(),
                    align_x: iced::alignment::Horizontal::Right.into(),
                    ..Text::default()
                });

                let x = plot.left + t * (plot.right - plot.left);
                frame.stroke(
                    &Path::line(Point::new(x, plot.top), Point::new(x, plot.bottom)),
                    grid_stroke,
                );
                let x_value = plot.scales.x_min + f64::from(t) * plot.scales.x_span();
                frame.fill_text(Text {
                    content: self.tick_label(x_value),
                    position: Point::new(x, plot.bottom + 8.0),
                    color: palette.background.base.text,
                    size: 11.0.into(),
                    align_x: iced::alignment::Horizontal::Center.into(),
                    ..Text::default()
                });
            }

            for series in self.series.iter().filter(|s| s.visible) {
                self.draw_series(frame, &plot, series);
            }
        });
        geometries.push(geometry);

        let mut overlay = Frame::new(renderer, bounds.size());
        let palette = theme.extended_palette();

        if let Some(((sx, sy), (ex, ey))) = state.drag.filter(|_| state.owner == Some(self.id)) {
            let rect = Path::rectangle(
                Point::new(sx.min(ex), sy.min(ey)),
                iced::Size::new((sx - ex).abs().max(1.0), (sy - ey).abs().max(1.0)),
            );
            overlay.stroke(
                &rect,
                Stroke::default()
                    .with_width(1.0)
                    .with_color(palette.primary.strong.color),
            );
        }

        if let Tooltip::Shown { owner, lines, x, y } = self.ctx.borrow().tooltip() {
            if *owner == self.id && cursor.position_in(bounds).is_some() {
                draw_tooltip(&mut overlay, palette, lines, *x, *y, bounds);
            }
        }

        geometries.push(overlay.into_geometry());
        geometries
    }

    fn mouse_interaction(
        &self,
        _state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if cursor.position_in(bounds).is_some() {
            mouse::Interaction::Crosshair
        } else {
            mouse::Interaction::default()
        }
    }
}

impl LineChart {
    fn tick_label(&self, value: f64) -> String {
        match self.config.x_axis {
            AxisKind::Time => format_tick(value),
            AxisKind::Linear => format!("{value:.0}"),
        }
    }

    fn draw_series(&self, frame: &mut Frame, plot: &PlotFrame, series: &LineSeries) {
        let mut stroke = Stroke::default()
            .with_width(series.width)
            .with_color(series.color);
        if series.dashed {
            stroke = Stroke {
                line_dash: LineDash {
                    segments: &DASH_SEGMENTS,
                    offset: 0,
                },
                ..stroke
            };
        }

        // Null entries split the series into independently drawn runs.
        let mut run: Vec<Point> = Vec::new();
        for (index, value) in series.ys.iter().enumerate() {
            match value {
                Some(y) => run.push(Point::new(
                    plot.x_to_px(self.xs[index]),
                    plot.y_to_px(*y),
                )),
                None => flush_run(frame, plot, series, &stroke, &mut run),
            }
        }
        flush_run(frame, plot, series, &stroke, &mut run);
    }
}

fn flush_run(
    frame: &mut Frame,
    plot: &PlotFrame,
    series: &LineSeries,
    stroke: &Stroke<'_>,
    run: &mut Vec<Point>,
) {
    match run.len() {
        0 => return,
        1 => {
            frame.fill(&Path::circle(run[0], series.width * 1.5), series.color);
        }
        _ => {
            let path = Path::new(|builder| {
                builder.move_to(run[0]);
                for point in &run[1..] {
                    builder.line_to(*point);
                }
            });
            frame.stroke(&path, *stroke);

            if series.fill {
                let area = Path::new(|builder| {
                    builder.move_to(Point::new(run[0].x, plot.bottom));
                    for point in run.iter() {
                        builder.line_to(*point);
                    }
                    builder.line_to(Point::new(run[run.len() - 1].x, plot.bottom));
                    builder.close();
                });
                let mut fill_color = series.color;
                fill_color.a = 0.1;
                frame.fill(&area, fill_color);
            }
        }
    }
    run.clear();
}

pub(super) fn draw_tooltip(
    overlay: &mut Frame,
    palette: &iced::theme::palette::Extended,
    lines: &[String],
    x: f32,
    y: f32,
    bounds: Rectangle,
) {
    if lines.is_empty() {
        return;
    }

    let padding = 6.0;
    let line_height = 16.0;
    let longest = lines.iter().map(String::len).max().unwrap_or(0) as f32;
    let width = longest * 7.0 + padding * 2.0;
    let height = lines.len() as f32 * line_height + padding * 2.0;

    let mut left = x;
    let mut top = y;
    if left + width > bounds.width {
        left = (x - width - 20.0).max(0.0);
    }
    if top < 0.0 {
        top = y + 40.0;
    }

    let rect = Path::rectangle(Point::new(left, top), iced::Size::new(width, height));
    overlay.fill(&rect, palette.background.strong.color);
    overlay.stroke(
        &rect,
        Stroke::default()
            .with_width(1.0)
            .with_color(palette.background.weak.color),
    );

    for (index, line) in lines.iter().enumerate() {
        overlay.fill_text(Text {
            content: line.clone(),
            position: Point::new(left + padding, top + padding + index as f32 * line_height),
            color: palette.background.strong.text,
            size: 12.0.into(),
            ..Text::default()
        });
    }
}

fn format_day(timestamp: f64) -> String {
    DateTime::from_timestamp(timestamp as i64, 0)
        .map(|stamp| stamp.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn format_tick(timestamp: f64) -> String {
    DateTime::from_timestamp(timestamp as i64, 0)
        .map(|stamp| stamp.format("%b %d").to_string())
        .unwrap_or_default()
}

fn data_bounds(xs: &[f64], series: &[LineSeries]) -> Option<ScaleBounds> {
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    for x in xs {
        x_min = x_min.min(*x);
        x_max = x_max.max(*x);
    }

    let mut y_max = f64::NEG_INFINITY;
    for series in series {
        for y in series.ys.iter().flatten() {
            y_max = y_max.max(*y);
        }
    }

    if !x_min.is_finite() || !y_max.is_finite() {
        return None;
    }

    if x_max - x_min < f64::EPSILON {
        x_min -= 0.5;
        x_max += 0.5;
    }

    // Counts start at zero, like the original y scale.
    Some(ScaleBounds {
        x_min,
        x_max,
        y_min: 0.0,
        y_max: y_max.max(1.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use iced::Color;

    #[test]
    fn mount_records_original_bounds_once() {
        let ctx = Rc::new(RefCell::new(InteractionContext::new()));
        let id = ctx.borrow_mut().register();

        let series = vec![LineSeries::new(
            "Tickets",
            Color::BLACK,
            vec![Some(2.0), Some(8.0), None],
        )];
        let _chart = LineChart::new(ctx.clone(), id, vec![0.0, 10.0, 20.0], series.clone());

        let original = ctx.borrow().original(id).unwrap();
        assert_eq!(original.x_min, 0.0);
        assert_eq!(original.x_max, 20.0);
        assert_eq!(original.y_min, 0.0);
        assert_eq!(original.y_max, 8.0);

        // Rebuilding with different data keeps the first mount's bounds.
        let _again = LineChart::new(ctx.clone(), id, vec![0.0, 50.0], series);
        assert_eq!(ctx.borrow().original(id).unwrap().x_max, 20.0);
    }

    #[test]
    fn empty_chart_records_nothing() {
        let ctx = Rc::new(RefCell::new(InteractionContext::new()));
        let id = ctx.borrow_mut().register();
        let _chart = LineChart::new(ctx.clone(), id, Vec::new(), Vec::new());
        assert_eq!(ctx.borrow().original(id), None);
    }

    #[test]
    fn renewed_chart_ignores_the_previous_instances_zoom() {
        let ctx = Rc::new(RefCell::new(InteractionContext::new()));
        let old_id = ctx.borrow_mut().register();
        let series = vec![LineSeries::new(
            "Tickets",
            Color::BLACK,
            vec![Some(2.0), Some(8.0)],
        )];
        let old = LineChart::new(ctx.clone(), old_id, vec![0.0, 10.0], series.clone());

        let area = Rectangle::new(Point::ORIGIN, iced::Size::new(400.0, 300.0));
        let mut state = PlotState {
            owner: Some(old_id),
            ..PlotState::default()
        };
        state.bounds = Some(old.frame(&state, area).scales.zoom_around(
            5.0,
            4.0,
            ZOOM_IN_FACTOR,
        ));

        // A new batch tears the instance down and mounts a fresh one.
        ctx.borrow_mut().release(old_id);
        let new_id = ctx.borrow_mut().register();
        let renewed = LineChart::new(ctx.clone(), new_id, vec![0.0, 50.0], series);

        let scales = renewed.frame(&state, area).scales;
        assert_eq!(scales, ctx.borrow().original(new_id).unwrap());
        assert_ne!(Some(scales), state.bounds);
    }

    #[test]
    fn single_point_bounds_are_not_degenerate() {
        let ctx = Rc::new(RefCell::new(InteractionContext::new()));
        let id = ctx.borrow_mut().register();
        let series = vec![LineSeries::new("Tickets", Color::BLACK, vec![Some(3.0)])];
        let _chart = LineChart::new(ctx.clone(), id, vec![100.0], series);

        let original = ctx.borrow().original(id).unwrap();
        assert!(original.x_max > original.x_min);
    }
}
