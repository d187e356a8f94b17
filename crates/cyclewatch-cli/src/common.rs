//! Argument parsing shared by subcommands.
//!
//! Start times use the `YYYYMMDDHH` grammar: a single value, a `/`-separated
//! inclusive range, or a `,`-separated list. Run dates use `YYYYMMDD` with a
//! `/`-separated half-open range.

use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};
use cyclewatch_core::TimeSelector;

/// Parse `YYYYMMDDHH`, `YYYYMMDDHH/YYYYMMDDHH` or `A,B,...` into a selector.
pub fn parse_start_time(raw: &str) -> Result<TimeSelector, Box<dyn std::error::Error>> {
    if let Some((start, end)) = raw.split_once('/') {
        return Ok(TimeSelector::Range(
            parse_hour(start)?,
            parse_hour(end)?,
        ));
    }
    if raw.contains(',') {
        let times = raw
            .split(',')
            .map(parse_hour)
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(TimeSelector::List(times));
    }
    Ok(TimeSelector::Single(parse_hour(raw)?))
}

fn parse_hour(token: &str) -> Result<chrono::DateTime<Utc>, Box<dyn std::error::Error>> {
    let naive = NaiveDateTime::parse_from_str(&format!("{token}0000"), "%Y%m%d%H%M%S")
        .map_err(|_| format!("invalid start time '{token}', expected YYYYMMDDHH"))?;
    Ok(Utc.from_utc_datetime(&naive))
}

/// Parse `YYYYMMDD/YYYYMMDD` into a half-open date range.
pub fn parse_run_date_range(
    raw: &str,
) -> Result<(NaiveDate, NaiveDate), Box<dyn std::error::Error>> {
    let (start, end) = raw
        .split_once('/')
        .ok_or_else(|| format!("invalid run date range '{raw}', expected YYYYMMDD/YYYYMMDD"))?;
    Ok((parse_date(start)?, parse_date(end)?))
}

fn parse_date(token: &str) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    Ok(NaiveDate::parse_from_str(token, "%Y%m%d")
        .map_err(|_| format!("invalid date '{token}', expected YYYYMMDD"))?)
}

/// Selector covering the days of a half-open `[start, end)` date range,
/// for index-partition resolution and run-date query terms.
pub fn run_date_selector(start: NaiveDate, end: NaiveDate) -> TimeSelector {
    let start_time = Utc.from_utc_datetime(&start.and_hms_opt(0, 0, 0).unwrap_or_default());
    let last = end.pred_opt().unwrap_or(end).max(start);
    let end_time = Utc.from_utc_datetime(&last.and_hms_opt(0, 0, 0).unwrap_or_default());
    TimeSelector::Range(start_time, end_time)
}
