use chrono::NaiveDate;
use thiserror::Error;

/// An optional created-date filter, inclusive on both ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RangeError {
    #[error("'{0}' is not a valid date (expected YYYY-MM-DD)")]
    Unparseable(String),
    #[error("start date {start} is after end date {end}")]
    StartAfterEnd { start: NaiveDate, end: NaiveDate },
}

/// Validates the raw filter inputs before any request is sent. Empty
/// fields are allowed on either side (open-ended range); both empty means
/// no filter at all.
pub fn validate_range(start: &str, end: &str) -> Result<DateRange, RangeError> {
    let start = parse_bound(start)?;
    let end = parse_bound(end)?;

    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(RangeError::StartAfterEnd { start, end });
        }
    }

    Ok(DateRange { start, end })
}

fn parse_bound(value: &str) -> Result<Option<NaiveDate>, RangeError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| RangeError::Unparseable(value.to_owned()))
}

/// Builds the search query string: `type:ticket` plus inclusive created
/// bounds for whichever sides of the range are set. URL encoding is the
/// transport's concern, not ours.
pub fn search_query(range: DateRange) -> String {
    let mut query = String::from("type:ticket");

    if let Some(start) = range.start {
        query.push_str(&format!(" created>={}", start.format("%Y-%m-%d")));
    }
    if let Some(end) = range.end {
        query.push_str(&format!(" created<={}", end.format("%Y-%m-%d")));
    }

    query
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn empty_bounds_are_valid() {
        assert_eq!(validate_range("", "").unwrap(), DateRange::default());
        assert_eq!(
            validate_range("2024-01-01", "").unwrap(),
            DateRange {
                start: Some(date("2024-01-01")),
                end: None,
            }
        );
        assert_eq!(
            validate_range("", "2024-01-01").unwrap(),
            DateRange {
                start: None,
                end: Some(date("2024-01-01")),
            }
        );
    }

    #[test]
    fn start_after_end_is_rejected() {
        let err = validate_range("2024-05-10", "2024-05-01").unwrap_err();
        assert_eq!(
            err,
            RangeError::StartAfterEnd {
                start: date("2024-05-10"),
                end: date("2024-05-01"),
            }
        );
    }

    #[test]
    fn garbage_input_is_rejected() {
        assert!(matches!(
            validate_range("next tuesday", ""),
            Err(RangeError::Unparseable(_))
        ));
        assert!(matches!(
            validate_range("", "2024-13-40"),
            Err(RangeError::Unparseable(_))
        ));
    }

    #[test]
    fn query_covers_all_filter_shapes() {
        assert_eq!(search_query(DateRange::default()), "type:ticket");

        let both = validate_range("2024-01-01", "2024-02-01").unwrap();
        assert_eq!(
            search_query(both),
            "type:ticket created>=2024-01-01 created<=2024-02-01"
        );

        let from = validate_range("2024-01-01", "").unwrap();
        assert_eq!(search_query(from), "type:ticket created>=2024-01-01");

        let until = validate_range("", "2024-02-01").unwrap();
        assert_eq!(search_query(until), "type:ticket created<=2024-02-01");
    }
}
