use crate::entities::recurrences::Frequency;
use crate::error::{AppError, AppResult};
use chrono::{DateTime, Days, Months, NaiveDate, NaiveTime, Utc};

/// Combine a UTC calendar date with a UTC time-of-day into an instant.
pub fn combine_date_time(date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    date.and_time(time).and_utc()
}

/// Parse an "HH:mm" time-of-day string (seconds tolerated).
pub fn parse_time_of_day(value: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| AppError::ValidationError(format!("Invalid time of day: {value}")))
}

/// Round a money amount to 2 decimal places, half away from zero.
pub fn round_money(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Total price of a meeting: hourly rate times the span in hours, 2 decimals.
pub fn meeting_price_total(
    price_per_hour: f64,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
) -> f64 {
    let hours = (end_time - start_time).num_seconds() as f64 / 3600.0;
    round_money(price_per_hour * hours)
}

/// Expand a recurrence pattern into concrete (start, end) instants.
///
/// Every occurrence date is derived from the anchor `start_date`, so a
/// monthly series anchored on the 31st clamps to the last day of shorter
/// months and returns to the 31st afterwards. The `end_date` bound is
/// inclusive; an inverted range yields no occurrences. `cap` limits how many
/// instances are produced.
pub fn expand_occurrences(
    frequency: Frequency,
    start_date: NaiveDate,
    end_date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
    cap: Option<usize>,
) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
    let mut occurrences = Vec::new();

    let mut step: u32 = 0;
    loop {
        if let Some(cap) = cap
            && occurrences.len() >= cap
        {
            break;
        }

        let date = match frequency {
            Frequency::Weekly => start_date.checked_add_days(Days::new(7 * step as u64)),
            Frequency::Biweekly => start_date.checked_add_days(Days::new(14 * step as u64)),
            Frequency::Monthly => start_date.checked_add_months(Months::new(step)),
        };

        let Some(date) = date else {
            break;
        };
        if date > end_date {
            break;
        }

        occurrences.push((
            combine_date_time(date, start_time),
            combine_date_time(date, end_time),
        ));
        step += 1;
    }

    occurrences
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_combine_date_time_is_utc() {
        let instant = combine_date_time(date(2025, 3, 10), time(9, 30));
        assert_eq!(instant.to_rfc3339(), "2025-03-10T09:30:00+00:00");
        assert_eq!(instant.hour(), 9);
        assert_eq!(instant.minute(), 30);
    }

    #[test]
    fn test_parse_time_of_day() {
        assert_eq!(parse_time_of_day("09:00").unwrap(), time(9, 0));
        assert_eq!(parse_time_of_day("23:45").unwrap(), time(23, 45));
        assert_eq!(parse_time_of_day("10:15:00").unwrap(), time(10, 15));
        assert!(parse_time_of_day("25:00").is_err());
        assert!(parse_time_of_day("nine").is_err());
        assert!(parse_time_of_day("").is_err());
    }

    #[test]
    fn test_weekly_expansion_ascending_within_bounds() {
        let occurrences = expand_occurrences(
            Frequency::Weekly,
            date(2025, 1, 6),
            date(2025, 2, 3),
            time(10, 0),
            time(11, 0),
            None,
        );

        assert_eq!(occurrences.len(), 5);
        let end_bound = combine_date_time(date(2025, 2, 3), time(10, 0));
        for window in occurrences.windows(2) {
            assert!(window[0].0 < window[1].0);
        }
        for (start, end) in &occurrences {
            assert!(*start <= end_bound);
            assert!(end > start);
        }
        assert_eq!(occurrences[1].0, combine_date_time(date(2025, 1, 13), time(10, 0)));
    }

    #[test]
    fn test_biweekly_expansion_step() {
        let occurrences = expand_occurrences(
            Frequency::Biweekly,
            date(2025, 1, 6),
            date(2025, 2, 3),
            time(14, 0),
            time(15, 30),
            None,
        );

        assert_eq!(occurrences.len(), 3);
        assert_eq!(occurrences[0].0, combine_date_time(date(2025, 1, 6), time(14, 0)));
        assert_eq!(occurrences[1].0, combine_date_time(date(2025, 1, 20), time(14, 0)));
        assert_eq!(occurrences[2].0, combine_date_time(date(2025, 2, 3), time(14, 0)));
    }

    #[test]
    fn test_inverted_range_is_empty_not_error() {
        let occurrences = expand_occurrences(
            Frequency::Weekly,
            date(2025, 5, 1),
            date(2025, 4, 1),
            time(9, 0),
            time(10, 0),
            None,
        );
        assert!(occurrences.is_empty());
    }

    #[test]
    fn test_monthly_day_31_clamps_without_drift() {
        let occurrences = expand_occurrences(
            Frequency::Monthly,
            date(2025, 1, 31),
            date(2025, 3, 31),
            time(9, 0),
            time(10, 0),
            None,
        );

        assert_eq!(occurrences.len(), 3);
        assert_eq!(occurrences[0].0.date_naive(), date(2025, 1, 31));
        assert_eq!(occurrences[1].0.date_naive(), date(2025, 2, 28));
        assert_eq!(occurrences[2].0.date_naive(), date(2025, 3, 31));
    }

    #[test]
    fn test_monthly_day_31_leap_february() {
        let occurrences = expand_occurrences(
            Frequency::Monthly,
            date(2024, 1, 31),
            date(2024, 4, 30),
            time(9, 0),
            time(10, 0),
            None,
        );

        assert_eq!(occurrences.len(), 3);
        assert_eq!(occurrences[1].0.date_naive(), date(2024, 2, 29));
        assert_eq!(occurrences[2].0.date_naive(), date(2024, 3, 31));
    }

    #[test]
    fn test_cap_truncates_expansion() {
        let occurrences = expand_occurrences(
            Frequency::Weekly,
            date(2025, 1, 6),
            date(2025, 2, 24),
            time(10, 0),
            time(11, 0),
            Some(5),
        );
        assert_eq!(occurrences.len(), 5);

        let uncapped = expand_occurrences(
            Frequency::Weekly,
            date(2025, 1, 6),
            date(2025, 2, 24),
            time(10, 0),
            time(11, 0),
            None,
        );
        assert_eq!(uncapped.len(), 8);
        assert_eq!(&uncapped[..5], &occurrences[..]);
    }

    #[test]
    fn test_cap_zero_yields_nothing() {
        let occurrences = expand_occurrences(
            Frequency::Weekly,
            date(2025, 1, 6),
            date(2025, 2, 24),
            time(10, 0),
            time(11, 0),
            Some(0),
        );
        assert!(occurrences.is_empty());
    }

    #[test]
    fn test_end_date_is_inclusive() {
        let occurrences = expand_occurrences(
            Frequency::Weekly,
            date(2025, 1, 6),
            date(2025, 1, 13),
            time(10, 0),
            time(11, 0),
            None,
        );
        assert_eq!(occurrences.len(), 2);
        assert_eq!(occurrences[1].0.date_naive(), date(2025, 1, 13));
    }

    #[test]
    fn test_single_day_range() {
        let occurrences = expand_occurrences(
            Frequency::Monthly,
            date(2025, 6, 15),
            date(2025, 6, 15),
            time(8, 0),
            time(9, 0),
            None,
        );
        assert_eq!(occurrences.len(), 1);
    }

    #[test]
    fn test_round_money() {
        assert_eq!(round_money(83.333333), 83.33);
        assert_eq!(round_money(83.335), 83.34);
        assert_eq!(round_money(150.0), 150.0);
        assert_eq!(round_money(0.005), 0.01);
    }

    #[test]
    fn test_meeting_price_total() {
        let start = combine_date_time(date(2025, 1, 6), time(10, 0));

        let end = combine_date_time(date(2025, 1, 6), time(11, 30));
        assert_eq!(meeting_price_total(100.0, start, end), 150.0);

        let end = combine_date_time(date(2025, 1, 6), time(10, 50));
        assert_eq!(meeting_price_total(100.0, start, end), 83.33);

        let end = combine_date_time(date(2025, 1, 6), time(11, 0));
        assert_eq!(meeting_price_total(85.5, start, end), 85.5);
    }
}
