//! Chart-library-agnostic interaction behaviors: the shared tooltip state
//! machine, original-bounds bookkeeping for zoom reset, and the pixel/value
//! mapping used by wheel zoom and drag zoom. Canvas programs own the
//! drawing; everything in here is plain state that can be tested without a
//! renderer.

use std::collections::HashMap;

/// Tooltip offset from the cursor, in pixels.
pub const TOOLTIP_OFFSET_X: f32 = 10.0;
pub const TOOLTIP_OFFSET_Y: f32 = -30.0;

/// Per-tick wheel zoom factors.
pub const ZOOM_IN_FACTOR: f64 = 0.9;
pub const ZOOM_OUT_FACTOR: f64 = 1.1;

/// Drag rectangles smaller than this in either dimension are ignored.
pub const MIN_DRAG_PX: f32 = 10.0;

/// Axis bounds in data space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleBounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl ScaleBounds {
    /// Scales both axes around a data-space center point. Factors below 1
    /// zoom in, above 1 zoom out.
    pub fn zoom_around(self, cx: f64, cy: f64, factor: f64) -> Self {
        Self {
            x_min: cx - (cx - self.x_min) * factor,
            x_max: cx + (self.x_max - cx) * factor,
            y_min: cy - (cy - self.y_min) * factor,
            y_max: cy + (self.y_max - cy) * factor,
        }
    }

    pub fn x_span(&self) -> f64 {
        (self.x_max - self.x_min).max(f64::EPSILON)
    }

    pub fn y_span(&self) -> f64 {
        (self.y_max - self.y_min).max(f64::EPSILON)
    }
}

/// Identity of one rendered chart instance. Charts are rebuilt every
/// render cycle; the id is what survives, and it is explicitly released
/// when the instance it names is torn down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChartId(u64);

#[derive(Debug, Clone, PartialEq)]
pub enum Tooltip {
    Hidden,
    Shown {
        owner: ChartId,
        lines: Vec<String>,
        x: f32,
        y: f32,
    },
}

impl Tooltip {
    pub fn is_shown(&self) -> bool {
        matches!(self, Tooltip::Shown { .. })
    }
}

#[derive(Debug, Clone)]
pub enum TooltipEvent {
    /// Cursor over the plot; `lines` is the content at the hovered index,
    /// empty when the cursor maps to no valid data.
    CursorMoved { x: f32, y: f32, lines: Vec<String> },
    SeriesToggled,
    ScaleChanged,
    PointerLeft,
}

/// Owns the interaction state shared across all chart instances: one
/// tooltip (a deliberate configuration choice, so at most one tooltip is
/// visible process-wide) and the original-bounds table used by zoom reset.
#[derive(Debug, Default)]
pub struct InteractionContext {
    next_id: u64,
    original: HashMap<ChartId, ScaleBounds>,
    tooltip: Tooltip,
}

impl Default for Tooltip {
    fn default() -> Self {
        Tooltip::Hidden
    }
}

impl InteractionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self) -> ChartId {
        self.next_id += 1;
        ChartId(self.next_id)
    }

    /// Records the bounds a chart mounted with. First mount wins: later
    /// calls for the same id (re-renders, zoomed states) are ignored.
    pub fn record_original(&mut self, id: ChartId, bounds: ScaleBounds) {
        self.original.entry(id).or_insert(bounds);
    }

    /// The bounds to restore on zoom reset, if any were recorded.
    pub fn original(&self, id: ChartId) -> Option<ScaleBounds> {
        self.original.get(&id).copied()
    }

    /// Invalidates a torn-down instance: drops its bounds entry and hides
    /// the tooltip if that instance owned it.
    pub fn release(&mut self, id: ChartId) {
        self.original.remove(&id);
        if matches!(self.tooltip, Tooltip::Shown { owner, .. } if owner == id) {
            self.tooltip = Tooltip::Hidden;
        }
    }

    pub fn tooltip(&self) -> &Tooltip {
        &self.tooltip
    }

    /// Drives the tooltip state machine. A cursor move with non-empty
    /// content shows (or re-targets) the tooltip at the cursor plus the
    /// fixed offset; everything else hides it.
    pub fn tooltip_event(&mut self, id: ChartId, event: TooltipEvent) {
        match event {
            TooltipEvent::CursorMoved { x, y, lines } => {
                if lines.is_empty() {
                    self.tooltip = Tooltip::Hidden;
                } else {
                    self.tooltip = Tooltip::Shown {
                        owner: id,
                        lines,
                        x: x + TOOLTIP_OFFSET_X,
                        y: y + TOOLTIP_OFFSET_Y,
                    };
                }
            }
            TooltipEvent::SeriesToggled
            | TooltipEvent::ScaleChanged
            | TooltipEvent::PointerLeft => {
                self.tooltip = Tooltip::Hidden;
            }
        }
    }
}

/// One visible-series sample at a hovered index.
pub struct SeriesSample<'a> {
    pub label: &'a str,
    pub visible: bool,
    pub value: Option<f64>,
}

/// Tooltip content: the axis label first (date for time axes, category
/// otherwise), then one line per visible series with a non-null value at
/// the index. Hidden series and null values contribute nothing.
pub fn tooltip_lines(axis_label: Option<String>, samples: &[SeriesSample<'_>]) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(label) = axis_label {
        lines.push(label);
    }

    for sample in samples {
        if !sample.visible {
            continue;
        }
        if let Some(value) = sample.value {
            lines.push(format!("{}: {}", sample.label, format_value(value)));
        }
    }

    lines
}

fn format_value(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        format!("{}", value.round() as i64)
    } else {
        format!("{value:.2}")
    }
}

/// The plot rectangle in pixels together with the bounds it displays;
/// the bridge between screen space and data space.
#[derive(Debug, Clone, Copy)]
pub struct PlotFrame {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub scales: ScaleBounds,
}

impl PlotFrame {
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }

    pub fn x_to_px(&self, value: f64) -> f32 {
        let t = (value - self.scales.x_min) / self.scales.x_span();
        self.left + (t as f32) * (self.right - self.left)
    }

    pub fn y_to_px(&self, value: f64) -> f32 {
        let t = (value - self.scales.y_min) / self.scales.y_span();
        self.bottom - (t as f32) * (self.bottom - self.top)
    }

    pub fn px_to_x(&self, px: f32) -> f64 {
        let t = f64::from((px - self.left) / (self.right - self.left));
        self.scales.x_min + t * self.scales.x_span()
    }

    pub fn px_to_y(&self, px: f32) -> f64 {
        let t = f64::from((self.bottom - px) / (self.bottom - self.top));
        self.scales.y_min + t * self.scales.y_span()
    }

    /// Index of the x value nearest to a cursor column, or `None` when the
    /// column is outside the plot or there is no data.
    pub fn nearest_index(&self, xs: &[f64], px: f32, py: f32) -> Option<usize> {
        if xs.is_empty() || !self.contains(px, py) {
            return None;
        }

        let mut best = 0;
        let mut best_distance = f32::INFINITY;
        for (index, x) in xs.iter().enumerate() {
            let distance = (self.x_to_px(*x) - px).abs();
            if distance < best_distance {
                best = index;
                best_distance = distance;
            }
        }

        Some(best)
    }

    /// Converts a screen-space drag rectangle to axis bounds, applied
    /// atomically by the caller. Rectangles under `MIN_DRAG_PX` in either
    /// dimension are treated as accidental and rejected.
    pub fn drag_zoom(&self, start: (f32, f32), end: (f32, f32)) -> Option<ScaleBounds> {
        if (end.0 - start.0).abs() < MIN_DRAG_PX || (end.1 - start.1).abs() < MIN_DRAG_PX {
            return None;
        }

        let left_px = start.0.min(end.0);
        let right_px = start.0.max(end.0);
        let top_px = start.1.min(end.1);
        let bottom_px = start.1.max(end.1);

        Some(ScaleBounds {
            x_min: self.px_to_x(left_px),
            x_max: self.px_to_x(right_px),
            y_min: self.px_to_y(bottom_px),
            y_max: self.px_to_y(top_px),
        })
    }
}
