pub mod bar;
pub mod interaction;
pub mod line;
pub mod model;

pub use bar::BarChart;
pub use interaction::{ChartId, InteractionContext, ScaleBounds, TooltipEvent};
pub use line::LineChart;
pub use model::{AxisKind, BarPoint, ChartConfig, InteractionToggles, LineSeries};
