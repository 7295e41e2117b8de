use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Utc};

/// Civil calendar date in the display timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CivilDate {
    pub year: i32,
    /// 1-based month.
    pub month: u32,
    /// 1-based day of month.
    pub day: u32,
}

#[must_use]
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Length of `month` in `year`; months outside 1..=12 count as 31 days
/// so callers can feed unnormalized values without panicking.
#[must_use]
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 31,
    }
}

/// Normalizes an out-of-range `(year, month, day)` triple into a valid
/// civil date using real month lengths.
///
/// Month 13 rolls into January of the next year, day 0 into the last
/// day of the previous month, day 35 into the next month, and so on.
/// This makes the rollover rules the calendar navigation relies on
/// explicit and testable without any platform date type.
#[must_use]
pub fn normalize(year: i32, month: i64, day: i64) -> CivilDate {
    let mut year = i64::from(year) + (month - 1).div_euclid(12);
    let mut month = (month - 1).rem_euclid(12) + 1;
    let mut day = day;

    while day < 1 {
        month -= 1;
        if month < 1 {
            month = 12;
            year -= 1;
        }
        day += i64::from(days_in_month(year as i32, month as u32));
    }
    loop {
        let len = i64::from(days_in_month(year as i32, month as u32));
        if day <= len {
            break;
        }
        day -= len;
        month += 1;
        if month > 12 {
            month = 1;
            year += 1;
        }
    }

    CivilDate {
        year: year as i32,
        month: month as u32,
        day: day as u32,
    }
}

/// Civil date of `secs` (Unix seconds UTC) in the display timezone.
#[must_use]
pub fn civil_from_epoch(secs: i64, offset_hours: i32) -> Option<CivilDate> {
    let offset = FixedOffset::east_opt(offset_hours * 3600)?;
    let local = DateTime::<Utc>::from_timestamp(secs, 0)?.with_timezone(&offset);
    Some(CivilDate {
        year: local.year(),
        month: local.month(),
        day: local.day(),
    })
}

/// Unix seconds of civil midnight in the display timezone.
#[must_use]
pub fn epoch_from_civil(date: CivilDate, offset_hours: i32) -> Option<i64> {
    let midnight = NaiveDate::from_ymd_opt(date.year, date.month, date.day)?.and_hms_opt(0, 0, 0)?;
    Some(midnight.and_utc().timestamp() - i64::from(offset_hours) * 3600)
}

/// Day of week with Sunday = 0.
#[must_use]
pub fn weekday_from_sunday(date: CivilDate) -> Option<u32> {
    let day = NaiveDate::from_ymd_opt(date.year, date.month, date.day)?;
    Some(day.weekday().num_days_from_sunday())
}
