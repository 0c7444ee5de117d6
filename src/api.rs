mod csv_file;
mod influxdb;

use chrono::{DateTime, NaiveDateTime};

pub use self::{csv_file::CsvFiles, influxdb::Api as InfluxDb};
use crate::prelude::*;

/// Parse an RFC 3339 timestamp, or a naive one written in local time.
fn parse_timestamp(text: &str) -> Result<NaiveDateTime> {
    let text = text.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Ok(timestamp.naive_local());
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"]
        .into_iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .with_context(|| format!("invalid timestamp: `{text}`"))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(hour: u32, minute: u32, second: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap().and_hms_opt(hour, minute, second).unwrap()
    }

    #[test]
    fn test_parse_utc() -> Result {
        assert_eq!(parse_timestamp("2024-01-15T10:07:30Z")?, at(10, 7, 30));
        Ok(())
    }

    #[test]
    fn test_parse_keeps_wall_clock() -> Result {
        assert_eq!(parse_timestamp("2024-01-15T10:07:30+01:00")?, at(10, 7, 30));
        Ok(())
    }

    #[test]
    fn test_parse_naive() -> Result {
        assert_eq!(parse_timestamp("2024-01-15 10:07:30")?, at(10, 7, 30));
        assert_eq!(parse_timestamp(" 2024-01-15T10:15 ")?, at(10, 15, 0));
        Ok(())
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_timestamp("yesterday").is_err());
    }
}
