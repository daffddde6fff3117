use crate::error::EvaluationError;
use chrono::{DateTime, Datelike, NaiveDate};

/// Parses a date-of-birth value: a plain `YYYY-MM-DD` date or an RFC 3339 timestamp.
pub fn parse_date(raw: &str) -> Result<NaiveDate, EvaluationError> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(trimmed).map(|dt| dt.date_naive()))
        .map_err(|_| EvaluationError::InvalidDate(raw.to_string()))
}

/// Whole years between `birth` and `today`.
///
/// The year difference drops by one until the birthday has been reached in
/// the current year, so the age flips exactly on the anniversary.
pub fn calculate_age(birth: NaiveDate, today: NaiveDate) -> i64 {
    let mut age = i64::from(today.year() - birth.year());
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_age_flips_on_anniversary() {
        let birth = date(2000, 6, 15);
        assert_eq!(calculate_age(birth, date(2024, 6, 14)), 23);
        assert_eq!(calculate_age(birth, date(2024, 6, 15)), 24);
        assert_eq!(calculate_age(birth, date(2024, 5, 30)), 23);
    }

    #[test]
    fn test_parse_date_forms() {
        assert_eq!(parse_date("2000-06-15").unwrap(), date(2000, 6, 15));
        assert_eq!(
            parse_date("2000-06-15T10:30:00Z").unwrap(),
            date(2000, 6, 15)
        );
        assert_eq!(
            parse_date("15/06/2000"),
            Err(EvaluationError::InvalidDate("15/06/2000".to_string()))
        );
    }
}
