use chrono::{DateTime, FixedOffset, Utc};

/// `YYYY/MM/DD hh:mm` label in the display timezone.
#[must_use]
pub fn human_label(secs: i64, offset_hours: i32) -> String {
    match display_time(secs, offset_hours) {
        Some(ts) => ts.format("%Y/%m/%d %H:%M").to_string(),
        None => "nan".to_owned(),
    }
}

/// Filename-safe `YYYYMMDDhhmm` token in the display timezone.
#[must_use]
pub fn compact_token(secs: i64, offset_hours: i32) -> String {
    match display_time(secs, offset_hours) {
        Some(ts) => ts.format("%Y%m%d%H%M").to_string(),
        None => "nan".to_owned(),
    }
}

/// Header label for a response window, e.g.
/// `2021/03/01 00:00 - 2021/03/02 00:00 UTC+9 (resolution: 300s = 5.0min)`.
#[must_use]
pub fn range_label(start: i64, end: i64, interval: i64, offset_hours: i32) -> String {
    let mut label = format!(
        "{} - {} UTC{:+}",
        human_label(start, offset_hours),
        human_label(end, offset_hours),
        offset_hours
    );
    label.push_str(&format!(" (resolution: {interval}s"));
    if interval < 60 {
        label.push(')');
    } else if interval < 3_600 {
        label.push_str(&format!(" = {:.1}min)", interval as f64 / 60.0));
    } else if interval < 86_400 {
        label.push_str(&format!(" = {:.1}hour)", interval as f64 / 3_600.0));
    } else {
        label.push_str(&format!(" = {:.1}day)", interval as f64 / 86_400.0));
    }
    label
}

/// Name for a downloaded export: `<start>to<end>.txt` in compact tokens.
#[must_use]
pub fn download_filename(start: i64, end: i64, offset_hours: i32) -> String {
    format!(
        "{}to{}.txt",
        compact_token(start, offset_hours),
        compact_token(end, offset_hours)
    )
}

fn display_time(secs: i64, offset_hours: i32) -> Option<DateTime<FixedOffset>> {
    let offset = FixedOffset::east_opt(offset_hours * 3600)?;
    Some(DateTime::<Utc>::from_timestamp(secs, 0)?.with_timezone(&offset))
}
