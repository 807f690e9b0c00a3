//! Amount and date normalization.
//!
//! Statement amounts arrive as `"12,345.67"`; dates arrive either as `DD/MM`
//! (year inferred elsewhere) or with a month abbreviation and year.

use chrono::NaiveDate;

use crate::error::NormalizeError;

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Parse a locale-formatted amount (`"1,234.56"`, `"-20.00"`).
///
/// Thousands separators are stripped; exactly two fractional digits are required.
pub fn parse_amount(text: &str) -> Result<f64, NormalizeError> {
    let raw = text.trim();
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    let unsigned = cleaned.strip_prefix('-').unwrap_or(&cleaned);

    let well_formed = match unsigned.split_once('.') {
        Some((int, frac)) => {
            !int.is_empty()
                && int.bytes().all(|b| b.is_ascii_digit())
                && frac.len() == 2
                && frac.bytes().all(|b| b.is_ascii_digit())
        }
        None => false,
    };
    if !well_formed {
        return Err(NormalizeError::MalformedAmount(raw.to_string()));
    }

    cleaned
        .parse::<f64>()
        .map_err(|_| NormalizeError::MalformedAmount(raw.to_string()))
}

/// Case-insensitive three-letter month lookup (`"Jan"` → 1).
pub fn resolve_month_name(abbr: &str) -> Result<u32, NormalizeError> {
    let lower = abbr.trim().to_ascii_lowercase();
    MONTH_ABBREVIATIONS
        .iter()
        .position(|m| *m == lower)
        .map(|idx| idx as u32 + 1)
        .ok_or_else(|| NormalizeError::UnknownMonth(abbr.trim().to_string()))
}

pub fn compose_date(year: i32, month: u32, day: u32) -> Result<NaiveDate, NormalizeError> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| NormalizeError::InvalidDate(format!("{year:04}-{month:02}-{day:02}")))
}

fn parse_component(text: &str) -> Result<u32, NormalizeError> {
    let t = text.trim();
    if t.is_empty() || !t.bytes().all(|b| b.is_ascii_digit()) {
        return Err(NormalizeError::InvalidDate(t.to_string()));
    }
    t.parse()
        .map_err(|_| NormalizeError::InvalidDate(t.to_string()))
}

/// Parse a `DD/MM` token into `(day, month)`.
///
/// The pair is checked against a leap year, so `29/02` is accepted here and
/// rejected later by [`compose_date`] if the inferred year has no such day.
pub fn parse_day_month(token: &str) -> Result<(u32, u32), NormalizeError> {
    let (d, m) = token
        .trim()
        .split_once('/')
        .ok_or_else(|| NormalizeError::InvalidDate(token.trim().to_string()))?;
    let day = parse_component(d)?;
    let month = parse_component(m)?;
    compose_date(2000, month, day)?;
    Ok((day, month))
}

/// Two-digit years are taken to be in the 2000s.
pub fn expand_year(text: &str) -> Result<i32, NormalizeError> {
    let t = text.trim();
    let n = parse_component(t)? as i32;
    match t.len() {
        2 => Ok(2000 + n),
        4 => Ok(n),
        _ => Err(NormalizeError::InvalidDate(t.to_string())),
    }
}

/// Whole cents, for exact sums of two-decimal amounts.
pub fn to_cents(value: f64) -> i64 {
    (value * 100.0).round() as i64
}

pub fn from_cents(cents: i64) -> f64 {
    cents as f64 / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount_ignores_thousands_separators() {
        assert_eq!(parse_amount("1,234.56"), parse_amount("1234.56"));
        assert_eq!(parse_amount("12,345,678.90").unwrap(), 12_345_678.90);
        assert_eq!(parse_amount(" 0.05 ").unwrap(), 0.05);
        assert_eq!(parse_amount("-250.00").unwrap(), -250.0);
    }

    #[test]
    fn test_parse_amount_rejects_garbage() {
        for bad in ["", "abc", "12.3", "12", "1.234", "1O.00", "--1.00", ".50", "12.34-"] {
            assert!(
                matches!(parse_amount(bad), Err(NormalizeError::MalformedAmount(_))),
                "expected MalformedAmount for {bad:?}"
            );
        }
    }

    #[test]
    fn test_resolve_month_name_case_insensitive() {
        assert_eq!(resolve_month_name("Jan").unwrap(), 1);
        assert_eq!(resolve_month_name("SEP").unwrap(), 9);
        assert_eq!(resolve_month_name("dec").unwrap(), 12);
    }

    #[test]
    fn test_unknown_month_does_not_default_to_january() {
        assert_eq!(
            resolve_month_name("Foo"),
            Err(NormalizeError::UnknownMonth("Foo".to_string()))
        );
        assert!(resolve_month_name("January").is_err());
    }

    #[test]
    fn test_compose_date_bounds() {
        assert_eq!(
            compose_date(2024, 2, 29).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert!(matches!(compose_date(2025, 2, 29), Err(NormalizeError::InvalidDate(_))));
        assert!(compose_date(2025, 13, 1).is_err());
        assert!(compose_date(2025, 4, 0).is_err());
    }

    #[test]
    fn test_parse_day_month() {
        assert_eq!(parse_day_month("05/11").unwrap(), (5, 11));
        assert_eq!(parse_day_month("29/02").unwrap(), (29, 2));
        assert!(parse_day_month("31/04").is_err());
        assert!(parse_day_month("aa/01").is_err());
        assert!(parse_day_month("0511").is_err());
    }

    #[test]
    fn test_expand_year() {
        assert_eq!(expand_year("24").unwrap(), 2024);
        assert_eq!(expand_year("2019").unwrap(), 2019);
        assert!(expand_year("202").is_err());
    }

    #[test]
    fn test_cents_are_exact() {
        let total: i64 = [0.10, 0.20, 0.30].iter().map(|v| to_cents(*v)).sum();
        assert_eq!(total, 60);
        assert_eq!(from_cents(total), 0.60);
    }
}
