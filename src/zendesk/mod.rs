pub mod api;
pub mod fetch;
pub mod mock;
pub mod query;
pub mod ticket;

pub use api::{HttpZafClient, ZafClient, ZafConfig};
pub use fetch::{load_batch, TicketBatch, TicketSource};
pub use query::{validate_range, DateRange};
pub use ticket::{Priority, Status, Ticket};
