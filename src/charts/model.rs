use iced::Color;

/// How x-axis values are labeled on ticks and in tooltips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisKind {
    /// Values are unix timestamps in seconds.
    Time,
    Linear,
}

/// One line series over the chart's shared x column. `ys` is aligned with
/// the x values; `None` entries are gaps (e.g. the projected tail of an
/// actuals series).
#[derive(Debug, Clone)]
pub struct LineSeries {
    pub label: String,
    pub color: Color,
    pub width: f32,
    pub fill: bool,
    pub dashed: bool,
    pub visible: bool,
    pub ys: Vec<Option<f64>>,
}

impl LineSeries {
    pub fn new(label: impl Into<String>, color: Color, ys: Vec<Option<f64>>) -> Self {
        Self {
            label: label.into(),
            color,
            width: 2.0,
            fill: false,
            dashed: false,
            visible: true,
            ys,
        }
    }

    pub fn filled(mut self) -> Self {
        self.fill = true;
        self
    }

    pub fn dashed(mut self) -> Self {
        self.dashed = true;
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ChartConfig {
    pub padding: f32,
    pub grid_lines: usize,
    pub x_axis: AxisKind,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            padding: 40.0,
            grid_lines: 5,
            x_axis: AxisKind::Linear,
        }
    }
}

/// Which interaction behaviors a chart participates in. Behaviors are
/// independent and composable; categorical charts typically keep only the
/// tooltip.
#[derive(Debug, Clone, Copy)]
pub struct InteractionToggles {
    pub tooltip: bool,
    pub wheel_zoom: bool,
    pub drag_zoom: bool,
    pub zoom_reset: bool,
}

impl Default for InteractionToggles {
    fn default() -> Self {
        Self {
            tooltip: true,
            wheel_zoom: true,
            drag_zoom: true,
            zoom_reset: true,
        }
    }
}

impl InteractionToggles {
    pub fn tooltip_only() -> Self {
        Self {
            tooltip: true,
            wheel_zoom: false,
            drag_zoom: false,
            zoom_reset: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BarPoint {
    pub label: String,
    pub value: f64,
}
