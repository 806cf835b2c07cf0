use serde::Deserialize;

/// A normalized ticket as returned by the search API. Immutable once
/// fetched; `created_at` stays the raw ISO-8601 string so the aggregator
/// can skip records whose timestamp fails to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub id: u64,
    pub status: Status,
    pub created_at: String,
    pub subject: String,
    pub priority: Priority,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Status {
    New,
    Open,
    Pending,
    Solved,
    Closed,
}

impl Status {
    pub const ALL: [Status; 5] = [
        Status::New,
        Status::Open,
        Status::Pending,
        Status::Solved,
        Status::Closed,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Status::New => "new",
            Status::Open => "open",
            Status::Pending => "pending",
            Status::Solved => "solved",
            Status::Closed => "closed",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "new" => Some(Status::New),
            "open" => Some(Status::Open),
            "pending" => Some(Status::Pending),
            "solved" => Some(Status::Solved),
            "closed" => Some(Status::Closed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    Low,
    Normal,
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub const ALL: [Priority; 5] = [
        Priority::Low,
        Priority::Normal,
        Priority::Medium,
        Priority::High,
        Priority::Urgent,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Normal => "normal",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "low" => Some(Priority::Low),
            "normal" => Some(Priority::Normal),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            "urgent" => Some(Priority::Urgent),
            _ => None,
        }
    }
}

/// One entry of the search API `results` array, as deserialized. Fields the
/// API may omit are optional here; normalization fills the gaps.
#[derive(Debug, Deserialize)]
pub struct RawTicket {
    pub id: Option<u64>,
    pub status: Option<String>,
    pub created_at: Option<String>,
    pub subject: Option<String>,
    pub priority: Option<String>,
}

impl RawTicket {
    /// Normalizes a raw search result. Returns `None` when the record lacks
    /// an id or a creation timestamp; a missing or unknown priority maps to
    /// `normal` and an unknown status to `new`.
    pub fn normalize(self) -> Option<Ticket> {
        let id = self.id?;
        let created_at = self.created_at?;

        let status = self
            .status
            .as_deref()
            .and_then(Status::parse)
            .unwrap_or(Status::New);
        let priority = self
            .priority
            .as_deref()
            .and_then(Priority::parse)
            .unwrap_or(Priority::Normal);

        Some(Ticket {
            id,
            status,
            created_at,
            subject: self.subject.unwrap_or_default(),
            priority,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_fills_missing_priority_and_status() {
        let raw = RawTicket {
            id: Some(42),
            status: None,
            created_at: Some("2024-01-01T10:00:00Z".to_owned()),
            subject: None,
            priority: Some("escalated".to_owned()),
        };

        let ticket = raw.normalize().unwrap();
        assert_eq!(ticket.status, Status::New);
        assert_eq!(ticket.priority, Priority::Normal);
        assert_eq!(ticket.subject, "");
    }

    #[test]
    fn normalize_drops_records_without_id_or_timestamp() {
        let no_id = RawTicket {
            id: None,
            status: Some("open".to_owned()),
            created_at: Some("2024-01-01T10:00:00Z".to_owned()),
            subject: Some("x".to_owned()),
            priority: None,
        };
        assert!(no_id.normalize().is_none());

        let no_stamp = RawTicket {
            id: Some(7),
            status: Some("open".to_owned()),
            created_at: None,
            subject: Some("x".to_owned()),
            priority: None,
        };
        assert!(no_stamp.normalize().is_none());
    }

    #[test]
    fn status_and_priority_round_trip_labels() {
        for status in Status::ALL {
            assert_eq!(Status::parse(status.label()), Some(status));
        }
        for priority in Priority::ALL {
            assert_eq!(Priority::parse(priority.label()), Some(priority));
        }
    }
}
