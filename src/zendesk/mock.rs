use chrono::{Duration, NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::query::DateRange;
use super::ticket::{Priority, Status, Ticket};

const FALLBACK_SPAN_DAYS: i64 = 90;

const STATUSES: [Status; 4] = [Status::New, Status::Open, Status::Pending, Status::Solved];
const PRIORITIES: [Priority; 4] = [
    Priority::Low,
    Priority::Normal,
    Priority::High,
    Priority::Urgent,
];

/// Synthetic tickets spanning the requested range, or the trailing 90 days
/// when unbounded. Deterministic in shape (1..=20 tickets on every day of
/// the span) but randomized in content; callers must tag the result as
/// simulated so it is never mistaken for live data.
pub fn generate(range: DateRange) -> Vec<Ticket> {
    generate_with(range, &mut StdRng::from_entropy())
}

pub fn generate_with(range: DateRange, rng: &mut StdRng) -> Vec<Ticket> {
    let today = Utc::now().date_naive();
    let start = range
        .start
        .unwrap_or_else(|| today - Duration::days(FALLBACK_SPAN_DAYS));
    let end = range.end.unwrap_or(today);

    let mut tickets = Vec::new();
    let mut day = start;

    while day <= end {
        let count = rng.gen_range(1..=20);
        for n in 0..count {
            tickets.push(Ticket {
                id: rng.gen_range(1..100_000),
                status: STATUSES[rng.gen_range(0..STATUSES.len())],
                created_at: timestamp_on(day, rng),
                subject: format!("Simulated ticket {}", n + 1),
                priority: PRIORITIES[rng.gen_range(0..PRIORITIES.len())],
            });
        }
        day += Duration::days(1);
    }

    tickets
}

fn timestamp_on(day: NaiveDate, rng: &mut StdRng) -> String {
    format!(
        "{}T{:02}:{:02}:00Z",
        day.format("%Y-%m-%d"),
        rng.gen_range(0..24),
        rng.gen_range(0..60)
    )
}
