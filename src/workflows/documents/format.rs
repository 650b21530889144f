use chrono::{Datelike, NaiveDate};

use crate::workflows::exams::{HeldDate, MONTH_NAMES};

/// Blank printed in place of any missing value.
pub const PLACEHOLDER: &str = "__________";
pub const COUNT_PLACEHOLDER: &str = "___";
pub const SIGNATURE_PLACEHOLDER: &str = "____________________";

pub fn or_placeholder(value: &str) -> &str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        PLACEHOLDER
    } else {
        trimmed
    }
}

/// `5 April 2025`: day without padding, full month name.
pub fn format_long_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => format!(
            "{} {} {}",
            date.day(),
            MONTH_NAMES[date.month0() as usize],
            date.year()
        ),
        None => PLACEHOLDER.to_string(),
    }
}

/// `04/2025` for the reference line of the appointment letter.
pub fn held_date_numeric(held: Option<&HeldDate>) -> String {
    held.map(HeldDate::numeric)
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

pub fn exam_count(count: Option<u32>) -> String {
    match count {
        Some(count) if count > 0 => format!("{count:02}"),
        _ => COUNT_PLACEHOLDER.to_string(),
    }
}

pub fn media_marker(reference: Option<&str>, attached: &'static str) -> &'static str {
    match reference {
        Some(value) if !value.trim().is_empty() => attached,
        _ => SIGNATURE_PLACEHOLDER,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_dates_drop_day_padding() {
        let date = NaiveDate::from_ymd_opt(2025, 4, 5);
        assert_eq!(format_long_date(date), "5 April 2025");
        assert_eq!(format_long_date(None), PLACEHOLDER);
    }

    #[test]
    fn held_dates_render_numerically() {
        let held = HeldDate::parse("September 2025");
        assert_eq!(held_date_numeric(held.as_ref()), "09/2025");
        assert_eq!(held_date_numeric(None), PLACEHOLDER);
    }

    #[test]
    fn counts_pad_to_two_digits() {
        assert_eq!(exam_count(Some(3)), "03");
        assert_eq!(exam_count(Some(12)), "12");
        assert_eq!(exam_count(Some(0)), COUNT_PLACEHOLDER);
        assert_eq!(exam_count(None), COUNT_PLACEHOLDER);
    }

    #[test]
    fn blanks_become_placeholders() {
        assert_eq!(or_placeholder("  "), PLACEHOLDER);
        assert_eq!(or_placeholder(" Pune "), "Pune");
        assert_eq!(media_marker(Some("https://cdn/sig.png"), "[signed]"), "[signed]");
        assert_eq!(media_marker(None, "[signed]"), SIGNATURE_PLACEHOLDER);
    }
}
