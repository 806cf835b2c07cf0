pub mod aggregate;
pub mod forecast;

pub use aggregate::{analyze, DailyHistogram, TicketAnalysis};
pub use forecast::{project, Projection};
