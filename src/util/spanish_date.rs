use std::ops::Index;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use lazy_static::lazy_static;
use regex::Regex;

const MONTHS: [&str; 12] = [
    "enero", "febrero", "marzo", "abril", "mayo", "junio",
    "julio", "agosto", "septiembre", "octubre", "noviembre", "diciembre",
];

// Sunday first
const WEEKDAYS: [&str; 7] = ["Domingo", "Lunes", "Martes", "Miércoles", "Jueves", "Viernes", "Sábado"];

lazy_static! {
    static ref DATE_TIME_REGEX: Regex = Regex::new(
        r"^\s*(\d{4})-(\d{1,2})-(\d{1,2})(?:[T ](\d{1,2}):(\d{1,2})(?::(\d{1,2}))?)?"
    ).unwrap();
}

fn to_int<T: std::str::FromStr>(num_str: &str, date_str: &str) -> Result<T, String> {
    match num_str.parse::<T>() {
        Ok(x) => Ok(x),
        Err(_) => Err(format!("Error parsing {} from the date {}", num_str, date_str)),
    }
}

/// Parses the WordPress date (`2024-05-01T10:20:30`). Time and any trailing
/// fraction or offset are optional and ignored when absent.
pub fn parse_date_time(buf: &str) -> Result<NaiveDateTime, String> {
    let Some(caps) = DATE_TIME_REGEX.captures(buf) else {
        return Err(format!("Unable to parse date time {}", buf));
    };

    let to_i32 = |num_str: &str| to_int::<i32>(num_str, buf);
    let to_u32 = |num_str: &str| to_int::<u32>(num_str, buf);
    let opt_u32 = |idx: usize| caps.get(idx).map_or(Ok(0), |m| to_u32(m.as_str()));

    let y: i32 = to_i32(caps.index(1))?;
    let m: u32 = to_u32(caps.index(2))?;
    let d: u32 = to_u32(caps.index(3))?;
    let h: u32 = opt_u32(4)?;
    let mn: u32 = opt_u32(5)?;
    let s: u32 = opt_u32(6)?;

    let date = NaiveDate::from_ymd_opt(y, m, d)
        .ok_or_else(|| format!("Invalid date {}", buf))?;
    let time = NaiveTime::from_hms_opt(h, mn, s)
        .ok_or_else(|| format!("Invalid time {}", buf))?;

    Ok(NaiveDateTime::new(date, time))
}

fn month_name(date: &impl Datelike) -> &'static str {
    MONTHS[date.month0() as usize]
}

/// `1 de mayo de 2024`
pub fn format_post_date(date: &impl Datelike) -> String {
    format!("{} de {} de {}", date.day(), month_name(date), date.year())
}

/// `Viernes 16 de octubre de 2026`, used by the page banner
pub fn format_banner_date(date: &impl Datelike) -> String {
    let weekday = WEEKDAYS[date.weekday().num_days_from_sunday() as usize];
    format!("{} {}", weekday, format_post_date(date))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_time() {
        let date_time = parse_date_time("2024-05-01T10:20:30").unwrap();
        assert_eq!(date_time.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-05-01 10:20:30");

        let date_time = parse_date_time("2024-05-01T10:20:30.000+00:00").unwrap();
        assert_eq!(date_time.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-05-01 10:20:30");

        let date_time = parse_date_time("2024-05-01 10:20").unwrap();
        assert_eq!(date_time.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-05-01 10:20:00");

        let date_time = parse_date_time("2024-5-1").unwrap();
        assert_eq!(date_time.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-05-01 00:00:00");
    }

    #[test]
    fn test_parse_invalid() {
        assert!(parse_date_time("").is_err());
        assert!(parse_date_time("ayer").is_err());
        assert!(parse_date_time("2024-13-01T00:00:00").is_err());
        assert!(parse_date_time("2024-02-30").is_err());
        assert!(parse_date_time("2024-01-01T25:00:00").is_err());
    }

    #[test]
    fn test_format_post_date() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(format_post_date(&date), "1 de mayo de 2024");
        let date = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        assert_eq!(format_post_date(&date), "31 de diciembre de 2023");
        let date_time = parse_date_time("2025-09-07T23:59:59").unwrap();
        assert_eq!(format_post_date(&date_time), "7 de septiembre de 2025");
    }

    #[test]
    fn test_format_banner_date() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        assert_eq!(format_banner_date(&date), "Viernes 16 de octubre de 2026");
        let date = NaiveDate::from_ymd_opt(2024, 3, 3).unwrap();
        assert_eq!(format_banner_date(&date), "Domingo 3 de marzo de 2024");
        let date = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        assert_eq!(format_banner_date(&date), "Miércoles 3 de enero de 2024");
    }
}
