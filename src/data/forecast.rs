use chrono::{Duration, NaiveDate};

use super::aggregate::DailyHistogram;

const WINDOW: usize = 7;
const HORIZON_DAYS: usize = 7;

/// Naive projection: mean of the trailing seven daily counts, banded by
/// one standard deviation, extended seven days past the last observed day.
/// No statistical rigor is claimed; the band formula (population variance,
/// lower band clamped at zero) is provisional pending product sign-off.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    /// Observed dates followed by the projected ones.
    pub dates: Vec<NaiveDate>,
    /// Observed counts, null-tailed over the projected days.
    pub actual: Vec<Option<f64>>,
    pub mean: f64,
    pub upper: f64,
    pub lower: f64,
}

impl Projection {
    pub fn horizon_start(&self) -> usize {
        self.dates.len() - HORIZON_DAYS
    }
}

pub fn project(histogram: &DailyHistogram) -> Option<Projection> {
    let last_day = *histogram.dates.last()?;

    let tail: Vec<f64> = histogram
        .counts
        .iter()
        .rev()
        .take(WINDOW)
        .rev()
        .map(|count| f64::from(*count))
        .collect();

    let mean = tail.iter().sum::<f64>() / tail.len() as f64;
    let variance = tail.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / tail.len() as f64;
    let std = variance.sqrt();

    let mut dates = histogram.dates.clone();
    let mut actual: Vec<Option<f64>> = histogram
        .counts
        .iter()
        .map(|count| Some(f64::from(*count)))
        .collect();

    for offset in 1..=HORIZON_DAYS as i64 {
        dates.push(last_day + Duration::days(offset));
        actual.push(None);
    }

    Some(Projection {
        dates,
        actual,
        mean,
        upper: mean + std,
        lower: (mean - std).max(0.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn histogram(start: (i32, u32, u32), counts: &[u32]) -> DailyHistogram {
        let first = NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap();
        DailyHistogram {
            dates: (0..counts.len())
                .map(|n| first + Duration::days(n as i64))
                .collect(),
            counts: counts.to_vec(),
        }
    }

    #[test]
    fn empty_histogram_has_no_projection() {
        assert_eq!(project(&DailyHistogram::default()), None);
    }

    #[test]
    fn mean_and_band_use_the_trailing_week() {
        // Ten days; the last seven are all 4s except one 11 -> mean 5.
        let h = histogram((2024, 1, 1), &[100, 100, 100, 4, 4, 4, 11, 4, 4, 4]);
        let p = project(&h).unwrap();

        assert!((p.mean - 5.0).abs() < 1e-9);
        let expected_std = (42.0_f64 / 7.0).sqrt();
        assert!((p.upper - (5.0 + expected_std)).abs() < 1e-9);
        assert!((p.lower - (5.0 - expected_std)).abs() < 1e-9);
    }

    #[test]
    fn lower_band_never_goes_negative() {
        let h = histogram((2024, 1, 1), &[0, 0, 0, 0, 0, 0, 20]);
        let p = project(&h).unwrap();
        assert!(p.lower >= 0.0);
    }

    #[test]
    fn horizon_extends_seven_null_tailed_days() {
        let h = histogram((2024, 1, 1), &[3, 5, 2]);
        let p = project(&h).unwrap();

        assert_eq!(p.dates.len(), 10);
        assert_eq!(p.actual.len(), 10);
        assert_eq!(p.horizon_start(), 3);
        assert!(p.actual[..3].iter().all(Option::is_some));
        assert!(p.actual[3..].iter().all(Option::is_none));
        assert_eq!(
            *p.dates.last().unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
        );
    }

    #[test]
    fn short_history_uses_what_exists() {
        let h = histogram((2024, 1, 1), &[6]);
        let p = project(&h).unwrap();
        assert!((p.mean - 6.0).abs() < 1e-9);
        assert!((p.upper - 6.0).abs() < 1e-9);
    }
}
