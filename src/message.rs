use crate::screens::Page;
use crate::zendesk::TicketBatch;

#[derive(Debug, Clone)]
pub enum Message {
    ToggleSidebar,
    Navigate(Page),
    StartDateChanged(String),
    EndDateChanged(String),
    ApplyFilter,
    ToggleProjectionSeries(usize),
    RefreshTick,
    BatchLoaded(TicketBatch),
}
