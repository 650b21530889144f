use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Identifier wrapper for published exam windows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExamFormId(pub String);

impl ExamFormId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

/// Month and year of an exam administration, written `Month YYYY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HeldDate {
    month: u32,
    year: u16,
}

impl HeldDate {
    pub fn new(month: u32, year: u16) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { month, year })
    }

    /// Accepts a full English month name, one space, then a four digit year.
    pub fn parse(raw: &str) -> Option<Self> {
        let (month, year) = raw.split_once(' ')?;

        let month = MONTH_NAMES.iter().position(|name| *name == month)? as u32 + 1;
        if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let year = year.parse().ok()?;

        Some(Self { month, year })
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[(self.month - 1) as usize]
    }

    /// `MM/YYYY`, as printed on the appointment letter reference line.
    pub fn numeric(&self) -> String {
        format!("{:02}/{}", self.month, self.year)
    }
}

impl fmt::Display for HeldDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month_name(), self.year)
    }
}

impl TryFrom<String> for HeldDate {
    type Error = ExamFormViolation;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or(ExamFormViolation::InvalidHeldDate)
    }
}

impl From<HeldDate> for String {
    fn from(value: HeldDate) -> Self {
        value.to_string()
    }
}

/// Parse the date formats the admin form emits: `05 April 2025` or `2025-04-05`.
pub fn parse_exam_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    NaiveDate::parse_from_str(trimmed, "%d %B %Y")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y-%m-%d"))
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

/// Canonical `dd MMMM yyyy` rendering used on the wire.
pub fn format_exam_date(date: NaiveDate) -> String {
    date.format("%d %B %Y").to_string()
}

pub(crate) mod exam_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub(crate) fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_exam_date(*date))
    }

    pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_exam_date(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid exam date '{raw}'")))
    }
}

/// A published exam window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamForm {
    pub id: ExamFormId,
    pub exam_name: String,
    pub held_date: HeldDate,
    #[serde(with = "exam_date")]
    pub start_date: NaiveDate,
    #[serde(with = "exam_date")]
    pub end_date: NaiveDate,
    pub exam_count: u32,
    pub created_at: DateTime<Utc>,
}

/// Exam count as submitted; the admin form may send a number or a numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExamCountInput {
    Number(serde_json::Number),
    Text(String),
}

impl ExamCountInput {
    fn positive(&self) -> Option<u32> {
        let value = match self {
            ExamCountInput::Number(number) => number.as_i64()?,
            ExamCountInput::Text(text) => text.trim().parse::<i64>().ok()?,
        };
        u32::try_from(value).ok().filter(|count| *count > 0)
    }
}

impl From<u32> for ExamCountInput {
    fn from(value: u32) -> Self {
        Self::Number(value.into())
    }
}

/// Unvalidated create request for an exam window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExamForm {
    #[serde(default)]
    pub exam_name: Option<String>,
    #[serde(default)]
    pub held_date: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub exam_count: Option<ExamCountInput>,
}

/// Validation failures, checked in the order they are declared.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExamFormViolation {
    #[error("All fields are required")]
    MissingFields,
    #[error("Invalid held date format (Month YYYY)")]
    InvalidHeldDate,
    #[error("Invalid exam count")]
    InvalidExamCount,
    #[error("Invalid date format")]
    InvalidDate,
    #[error("End date must be after start date")]
    EndNotAfterStart,
}

impl NewExamForm {
    pub fn validate(self, created_at: DateTime<Utc>) -> Result<ExamForm, ExamFormViolation> {
        fn present(value: Option<String>) -> Option<String> {
            value
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        }

        let (Some(exam_name), Some(held_date), Some(start_date), Some(end_date), Some(count)) = (
            present(self.exam_name),
            present(self.held_date),
            present(self.start_date),
            present(self.end_date),
            self.exam_count,
        ) else {
            return Err(ExamFormViolation::MissingFields);
        };

        let held_date = HeldDate::parse(&held_date).ok_or(ExamFormViolation::InvalidHeldDate)?;
        let exam_count = count.positive().ok_or(ExamFormViolation::InvalidExamCount)?;

        let start_date = parse_exam_date(&start_date).ok_or(ExamFormViolation::InvalidDate)?;
        let end_date = parse_exam_date(&end_date).ok_or(ExamFormViolation::InvalidDate)?;
        if start_date >= end_date {
            return Err(ExamFormViolation::EndNotAfterStart);
        }

        Ok(ExamForm {
            id: ExamFormId::generate(),
            exam_name,
            held_date,
            start_date,
            end_date,
            exam_count,
            created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> NewExamForm {
        NewExamForm {
            exam_name: Some("  CCAT  ".to_string()),
            held_date: Some("April 2025".to_string()),
            start_date: Some("05 April 2025".to_string()),
            end_date: Some("2025-04-07".to_string()),
            exam_count: Some(3.into()),
        }
    }

    #[test]
    fn held_date_requires_full_month_and_four_digit_year() {
        let held = HeldDate::parse("January 2026").expect("valid held date");
        assert_eq!(held.month(), 1);
        assert_eq!(held.year(), 2026);
        assert_eq!(held.numeric(), "01/2026");
        assert_eq!(held.to_string(), "January 2026");

        assert_eq!(HeldDate::parse("Jan 2026"), None);
        assert_eq!(HeldDate::parse("january 2026"), None);
        assert_eq!(HeldDate::parse("January 26"), None);
        assert_eq!(HeldDate::parse("January 2026 extra"), None);
        assert_eq!(HeldDate::parse("January"), None);
    }

    #[test]
    fn held_date_separator_is_exactly_one_space() {
        assert_eq!(HeldDate::parse("January  2026"), None);
        assert_eq!(HeldDate::parse("January\t2026"), None);
        assert_eq!(HeldDate::parse("January\n2026"), None);
        assert_eq!(HeldDate::parse(" January 2026"), None);
        assert_eq!(HeldDate::new(1, 2026), HeldDate::parse("January 2026"));
    }

    #[test]
    fn exam_dates_accept_long_and_iso_forms() {
        let expected = NaiveDate::from_ymd_opt(2025, 4, 5).expect("valid date");
        assert_eq!(parse_exam_date("05 April 2025"), Some(expected));
        assert_eq!(parse_exam_date("2025-04-05"), Some(expected));
        assert_eq!(parse_exam_date("2025-04-05T10:00:00Z"), Some(expected));
        assert_eq!(parse_exam_date("next tuesday"), None);
        assert_eq!(format_exam_date(expected), "05 April 2025");
    }

    #[test]
    fn validate_trims_name_and_normalizes_dates() {
        let created_at = Utc::now();
        let form = request().validate(created_at).expect("valid form");

        assert_eq!(form.exam_name, "CCAT");
        assert_eq!(form.exam_count, 3);
        assert_eq!(form.created_at, created_at);
        assert_eq!(
            form.end_date,
            NaiveDate::from_ymd_opt(2025, 4, 7).expect("valid date")
        );
    }

    #[test]
    fn validate_reports_violations_in_order() {
        let mut missing = request();
        missing.exam_name = Some("   ".to_string());
        missing.held_date = Some("Smarch 2025".to_string());
        assert_eq!(
            missing.validate(Utc::now()),
            Err(ExamFormViolation::MissingFields)
        );

        let mut held = request();
        held.held_date = Some("Smarch 2025".to_string());
        held.exam_count = Some(0.into());
        assert_eq!(
            held.validate(Utc::now()),
            Err(ExamFormViolation::InvalidHeldDate)
        );

        let mut count = request();
        count.exam_count = Some(ExamCountInput::Text("-2".to_string()));
        assert_eq!(
            count.validate(Utc::now()),
            Err(ExamFormViolation::InvalidExamCount)
        );

        let mut dates = request();
        dates.start_date = Some("someday".to_string());
        assert_eq!(
            dates.validate(Utc::now()),
            Err(ExamFormViolation::InvalidDate)
        );

        let mut order = request();
        order.end_date = Some("05 April 2025".to_string());
        assert_eq!(
            order.validate(Utc::now()),
            Err(ExamFormViolation::EndNotAfterStart)
        );
    }

    #[test]
    fn exam_count_accepts_numeric_strings() {
        let mut form = request();
        form.exam_count = Some(ExamCountInput::Text(" 12 ".to_string()));
        assert_eq!(form.validate(Utc::now()).expect("valid").exam_count, 12);
    }

    #[test]
    fn forms_serialize_with_wire_formats() {
        let form = request().validate(Utc::now()).expect("valid form");
        let value = serde_json::to_value(&form).expect("serializes");

        assert_eq!(value["examName"], "CCAT");
        assert_eq!(value["heldDate"], "April 2025");
        assert_eq!(value["startDate"], "05 April 2025");
        assert_eq!(value["endDate"], "07 April 2025");
        assert_eq!(value["examCount"], 3);

        let back: ExamForm = serde_json::from_value(value).expect("deserializes");
        assert_eq!(back, form);
    }
}
