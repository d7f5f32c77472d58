use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Today's calendar date in UTC, the date stamped on newly created goals.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Whole days from `now` until the start (00:00 UTC) of `date`, rounded up.
///
/// A date later today yields 0, yesterday yields -1 and tomorrow yields 1
/// for any `now` that is not exactly midnight.
pub fn days_until(date: NaiveDate, now: DateTime<Utc>) -> i64 {
    let start_of_day = date.and_time(NaiveTime::MIN).and_utc();
    let millis = (start_of_day - now).num_milliseconds();
    ceil_div(millis, MILLIS_PER_DAY)
}

fn ceil_div(numerator: i64, denominator: i64) -> i64 {
    let quotient = numerator.div_euclid(denominator);
    if numerator.rem_euclid(denominator) == 0 {
        quotient
    } else {
        quotient + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_days_until_same_day_is_zero() {
        assert_eq!(days_until(date(2024, 3, 10), at(2024, 3, 10, 15)), 0);
        assert_eq!(days_until(date(2024, 3, 10), at(2024, 3, 10, 0)), 0);
    }

    #[test]
    fn test_days_until_rounds_up_partial_days() {
        assert_eq!(days_until(date(2024, 3, 11), at(2024, 3, 10, 15)), 1);
        assert_eq!(days_until(date(2024, 3, 20), at(2024, 3, 10, 9)), 10);
    }

    #[test]
    fn test_days_until_past_dates_are_negative() {
        assert_eq!(days_until(date(2024, 3, 9), at(2024, 3, 10, 15)), -1);
        assert_eq!(days_until(date(2024, 3, 1), at(2024, 3, 10, 12)), -9);
    }

    #[test]
    fn test_ceil_div() {
        assert_eq!(ceil_div(10, 5), 2);
        assert_eq!(ceil_div(11, 5), 3);
        assert_eq!(ceil_div(-11, 5), -2);
        assert_eq!(ceil_div(-10, 5), -2);
        assert_eq!(ceil_div(-1, 5), 0);
    }
}
