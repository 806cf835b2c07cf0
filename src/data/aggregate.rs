use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};

use crate::zendesk::{Priority, Status, Ticket};

/// Counts per distinct calendar day, ascending, no zero-filling. The two
/// vectors are parallel; `dates` is strictly increasing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailyHistogram {
    pub dates: Vec<NaiveDate>,
    pub counts: Vec<u32>,
}

impl DailyHistogram {
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn count_on(&self, date: NaiveDate) -> u32 {
        self.dates
            .iter()
            .position(|d| *d == date)
            .map(|idx| self.counts[idx])
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketAnalysis {
    /// Tickets with a parseable timestamp; unparseable records count nowhere.
    pub total: u32,
    pub by_date: DailyHistogram,
    pub by_hour: [u32; 24],
    pub by_weekday: [u32; 7],
    pub by_status: Vec<(Status, u32)>,
    pub by_priority: Vec<(Priority, u32)>,
    pub pending: u32,
    pub resolved: u32,
}

impl TicketAnalysis {
    pub fn tickets_today(&self, today: NaiveDate) -> u32 {
        self.by_date.count_on(today)
    }

    /// Share of solved or closed tickets, in percent.
    pub fn resolution_rate(&self) -> u32 {
        if self.total == 0 {
            0
        } else {
            (self.resolved * 100 + self.total / 2) / self.total
        }
    }
}

/// Buckets tickets by the UTC calendar day of their creation timestamp,
/// plus hour-of-day, weekday, status and priority breakdowns. Pure and
/// order-independent; records whose timestamp fails to parse are skipped.
pub fn analyze(tickets: &[Ticket]) -> TicketAnalysis {
    let mut date_counts: BTreeMap<NaiveDate, u32> = BTreeMap::new();
    let mut by_hour = [0u32; 24];
    let mut by_weekday = [0u32; 7];
    let mut status_counts: BTreeMap<Status, u32> = BTreeMap::new();
    let mut priority_counts: BTreeMap<Priority, u32> = BTreeMap::new();
    let mut total = 0u32;
    let mut pending = 0u32;
    let mut resolved = 0u32;

    for ticket in tickets {
        let Some(stamp) = parse_created_at(&ticket.created_at) else {
            continue;
        };

        total += 1;
        *date_counts.entry(stamp.date_naive()).or_default() += 1;
        by_hour[stamp.hour() as usize] += 1;
        by_weekday[stamp.weekday().num_days_from_sunday() as usize] += 1;
        *status_counts.entry(ticket.status).or_default() += 1;
        *priority_counts.entry(ticket.priority).or_default() += 1;

        match ticket.status {
            Status::Pending => pending += 1,
            Status::Solved | Status::Closed => resolved += 1,
            _ => {}
        }
    }

    let (dates, counts) = date_counts.into_iter().unzip();

    TicketAnalysis {
        total,
        by_date: DailyHistogram { dates, counts },
        by_hour,
        by_weekday,
        by_status: status_counts.into_iter().collect(),
        by_priority: priority_counts.into_iter().collect(),
        pending,
        resolved,
    }
}

/// Parses an ISO-8601 creation timestamp; the calendar day is taken in UTC,
/// matching day-truncation of the normalized timestamp string.
fn parse_created_at(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|stamp| stamp.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket(id: u64, created_at: &str) -> Ticket {
        Ticket {
            id,
            status: Status::Open,
            created_at: created_at.to_owned(),
            subject: String::new(),
            priority: Priority::Normal,
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn empty_input_yields_empty_analysis() {
        let analysis = analyze(&[]);
        assert_eq!(analysis.total, 0);
        assert!(analysis.by_date.is_empty());
        assert_eq!(analysis.resolution_rate(), 0);
    }

    #[test]
    fn buckets_by_calendar_day() {
        let tickets = vec![
            ticket(1, "2024-01-01T10:00:00Z"),
            ticket(2, "2024-01-01T23:00:00Z"),
            ticket(3, "2024-01-02T01:00:00Z"),
        ];

        let analysis = analyze(&tickets);
        assert_eq!(analysis.total, 3);
        assert_eq!(
            analysis.by_date.dates,
            vec![date("2024-01-01"), date("2024-01-02")]
        );
        assert_eq!(analysis.by_date.counts, vec![2, 1]);
    }

    #[test]
    fn unparseable_timestamps_are_skipped_not_fatal() {
        let tickets = vec![
            ticket(1, "2024-01-01T10:00:00Z"),
            ticket(2, "not a timestamp"),
            ticket(3, ""),
        ];

        let analysis = analyze(&tickets);
        assert_eq!(analysis.total, 1);
        assert_eq!(analysis.by_date.counts, vec![1]);
    }

    #[test]
    fn counts_sum_to_total_and_dates_strictly_increase() {
        let tickets: Vec<Ticket> = (0..50)
            .map(|n| {
                ticket(
                    n,
                    &format!("2024-02-{:02}T{:02}:30:00Z", 1 + n % 9, n % 24),
                )
            })
            .collect();

        let analysis = analyze(&tickets);
        let sum: u32 = analysis.by_date.counts.iter().sum();
        assert_eq!(sum, analysis.total);

        for pair in analysis.by_date.dates.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn result_is_order_independent() {
        let mut tickets = vec![
            ticket(1, "2024-01-03T08:00:00Z"),
            ticket(2, "2024-01-01T09:00:00Z"),
            ticket(3, "2024-01-02T10:00:00Z"),
            ticket(4, "2024-01-01T11:00:00Z"),
        ];

        let forward = analyze(&tickets);
        tickets.reverse();
        let backward = analyze(&tickets);

        assert_eq!(forward, backward);
    }

    #[test]
    fn offset_timestamps_bucket_on_their_utc_day() {
        // 23:30-05:00 is 04:30Z the next day.
        let tickets = vec![ticket(1, "2024-01-01T23:30:00-05:00")];
        let analysis = analyze(&tickets);
        assert_eq!(analysis.by_date.dates, vec![date("2024-01-02")]);
    }

    #[test]
    fn status_breakdown_feeds_the_metric_tiles() {
        let mut tickets = vec![
            ticket(1, "2024-01-01T10:00:00Z"),
            ticket(2, "2024-01-01T11:00:00Z"),
            ticket(3, "2024-01-01T12:00:00Z"),
            ticket(4, "2024-01-01T13:00:00Z"),
        ];
        tickets[1].status = Status::Pending;
        tickets[2].status = Status::Solved;
        tickets[3].status = Status::Closed;

        let analysis = analyze(&tickets);
        assert_eq!(analysis.pending, 1);
        assert_eq!(analysis.resolved, 2);
        assert_eq!(analysis.resolution_rate(), 50);
        assert_eq!(
            analysis.by_status,
            vec![
                (Status::Open, 1),
                (Status::Pending, 1),
                (Status::Solved, 1),
                (Status::Closed, 1),
            ]
        );
    }
}
