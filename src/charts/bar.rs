use std::cell::RefCell;
use std::rc::Rc;

use iced::mouse;
use iced::widget::canvas::{self, Cache, Frame, Geometry, Path, Stroke, Text};
use iced::{Color, Point, Rectangle, Renderer, Theme};

use super::interaction::{
    tooltip_lines, ChartId, InteractionContext, SeriesSample, Tooltip, TooltipEvent,
};
use super::line::draw_tooltip;
use super::model::{BarPoint, ChartConfig};
use crate::message::Message;

/// A categorical bar chart. Bars join the shared tooltip protocol (the
/// hovered category is the axis label) but keep no zoom state.
pub struct BarChart {
    ctx: Rc<RefCell<InteractionContext>>,
    id: ChartId,
    cache: Cache,
    label: String,
    color: Color,
    points: Vec<BarPoint>,
    config: ChartConfig,
}

impl BarChart {
    pub fn new(
        ctx: Rc<RefCell<InteractionContext>>,
        id: ChartId,
        label: impl Into<String>,
        color: Color,
        points: Vec<BarPoint>,
    ) -> Self {
        Self {
            ctx,
            id,
            cache: Cache::new(),
            label: label.into(),
            color,
            points,
            config: ChartConfig {
                grid_lines: 4,
                ..ChartConfig::default()
            },
        }
    }

    fn bar_index(&self, bounds: Rectangle, position: Point) -> Option<usize> {
        if self.points.is_empty() {
            return None;
        }

        let padding = self.config.padding;
        let left = padding;
        let right = bounds.width - padding;
        if position.x < left
            || position.x > right
            || position.y < padding
            || position.y > bounds.height - padding
        {
            return None;
        }

        let bar_width = (right - left) / self.points.len() as f32;
        let index = ((position.x - left) / bar_width).floor() as usize;
        (index < self.points.len()).then_some(index)
    }

    fn lines_at(&self, bounds: Rectangle, position: Point) -> Vec<String> {
        let Some(index) = self.bar_index(bounds, position) else {
            return Vec::new();
        };
        let point = &self.points[index];

        tooltip_lines(
            Some(point.label.clone()),
            &[SeriesSample {
                label: &self.label,
                visible: true,
                value: Some(point.value),
            }],
        )
    }
}

impl canvas::Program<Message> for BarChart {
    type State = ();

    fn update(
        &self,
        _state: &mut Self::State,
        event: &canvas::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        match event {
            canvas::Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                let position = cursor.position_in(bounds)?;
                let lines = self.lines_at(bounds, position);
                self.ctx.borrow_mut().tooltip_event(
                    self.id,
                    TooltipEvent::CursorMoved {
                        x: position.x,
                        y: position.y,
                        lines,
                    },
                );
                Some(canvas::Action::request_redraw())
            }
            canvas::Event::Mouse(mouse::Event::CursorLeft) => {
                self.ctx
                    .borrow_mut()
                    .tooltip_event(self.id, TooltipEvent::PointerLeft);
                Some(canvas::Action::request_redraw())
            }
            _ => None,
        }
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        theme: &Theme,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut geometries = Vec::new();
        if self.points.is_empty() {
            return geometries;
        }

        let geometry = self.cache.draw(renderer, bounds.size(), |frame| {
            let palette = theme.extended_palette();
            let size = frame.size();
            let padding = self.config.padding;

            if size.width <= padding * 2.0 || size.height <= padding * 2.0 {
                return;
            }

            let left = padding;
            let top = padding;
            let right = size.width - padding;
            let bottom = size.height - padding;

            let axis_stroke = Stroke::default()
                .with_width(1.0)
                .with_color(palette.background.weak.color);
            frame.stroke(
                &Path::line(Point::new(left, bottom), Point::new(right, bottom)),
                axis_stroke,
            );
            frame.stroke(
                &Path::line(Point::new(left, bottom), Point::new(left, top)),
                axis_stroke,
            );

            let max_value = self
                .points
                .iter()
                .map(|point| point.value)
                .fold(0.0_f64, f64::max)
                .max(1.0);

            let grid_lines = self.config.grid_lines.max(1);
            for i in 0..=grid_lines {
                let t = i as f32 / grid_lines as f32;
                let y = bottom - t * (bottom - top);
                frame.stroke(
                    &Path::line(Point::new(left, y), Point::new(right, y)),
                    axis_stroke,
                );
                frame.fill_text(Text {
                    content: format!("{:.0}", max_value * f64::from(t)),
                    position: Point::new(left - 8.0, y - 6.0),
                    color: palette.background.base.text,
                    size: 11.0.into(),
                    align_x: iced::alignment::Horizontal::Right.into(),
                    ..Text::default()
                });
            }

            let bar_width = (right - left) / self.points.len() as f32;
            for (index, point) in self.points.iter().enumerate() {
                let x = left + index as f32 * bar_width;
                let height = ((point.value / max_value) as f32) * (bottom - top);
                let rect = Path::rectangle(
                    Point::new(x + bar_width * 0.1, bottom - height),
                    iced::Size::new(bar_width * 0.8, height),
                );
                frame.fill(&rect, self.color);

                frame.fill_text(Text {
                    content: point.label.clone(),
                    position: Point::new(x + bar_width * 0.5, bottom + 6.0),
                    color: palette.background.base.text,
                    size: 11.0.into(),
                    align_x: iced::alignment::Horizontal::Center.into(),
                    ..Text::default()
                });
            }
        });
        geometries.push(geometry);

        if let Tooltip::Shown { owner, lines, x, y } = self.ctx.borrow().tooltip() {
            if *owner == self.id && cursor.position_in(bounds).is_some() {
                let mut overlay = Frame::new(renderer, bounds.size());
                draw_tooltip(
                    &mut overlay,
                    theme.extended_palette(),
                    lines,
                    *x,
                    *y,
                    bounds,
                );
                geometries.push(overlay.into_geometry());
            }
        }

        geometries
    }

    fn mouse_interaction(
        &self,
        _state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if cursor.position_in(bounds).is_some() {
            mouse::Interaction::Pointer
        } else {
            mouse::Interaction::default()
        }
    }
}
