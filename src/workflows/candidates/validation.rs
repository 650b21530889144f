use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

use super::domain::{CandidateProfile, ProfileUpdate};

struct Patterns {
    name: Regex,
    email: Regex,
    iso_date: Regex,
    aadhaar: Regex,
    phone: Regex,
    ifsc: Regex,
}

static PATTERNS: OnceLock<Patterns> = OnceLock::new();

fn patterns() -> &'static Patterns {
    PATTERNS.get_or_init(|| Patterns {
        name: Regex::new(r"^[A-Za-z][A-Za-z\s]*$").expect("valid regex"),
        email: Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid regex"),
        iso_date: Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid regex"),
        aadhaar: Regex::new(r"^\d{12}$").expect("valid regex"),
        phone: Regex::new(r"^\d{10}$").expect("valid regex"),
        ifsc: Regex::new(r"^[A-Z]{4}0[A-Z0-9]{6}$").expect("valid regex"),
    })
}

/// Input rejected before anything is persisted. Messages are shown to users verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CandidateViolation {
    #[error("Name, email, and password are required")]
    MissingCredentials,
    #[error("Name may only contain letters and spaces")]
    InvalidName,
    #[error("Invalid email address")]
    InvalidEmail,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Invalid currentDate format (use YYYY-MM-DD)")]
    InvalidCurrentDate,
    #[error("Aadhaar number must be 12 digits")]
    InvalidAadhaar,
    #[error("Phone number must be 10 digits")]
    InvalidPhone,
    #[error("Invalid IFSC code")]
    InvalidIfsc,
    #[error("Please accept the declaration to proceed.")]
    DeclarationNotAccepted,
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("Please agree to the penalty clause")]
    PenaltyClauseNotAgreed,
    #[error("Please agree to the COVID-19 declaration")]
    CovidDeclarationNotAgreed,
    #[error("Invalid status")]
    InvalidStatus,
    #[error("Please enter a remark")]
    EmptyRemark,
    #[error("User phone number not available")]
    MissingPhone,
    #[error("Invalid phone number format")]
    InvalidPhoneFormat,
}

pub fn validate_name(name: &str) -> Result<(), CandidateViolation> {
    if patterns().name.is_match(name.trim()) {
        Ok(())
    } else {
        Err(CandidateViolation::InvalidName)
    }
}

pub fn validate_email(email: &str) -> Result<(), CandidateViolation> {
    if patterns().email.is_match(email.trim()) {
        Ok(())
    } else {
        Err(CandidateViolation::InvalidEmail)
    }
}

/// Emails are compared case-insensitively everywhere.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

/// Check an incoming edit and return the parsed `currentDate`, if any.
pub fn validate_update(update: &ProfileUpdate) -> Result<Option<NaiveDate>, CandidateViolation> {
    let patterns = patterns();

    // A supplied name replaces the stored one, so blank is not "unchanged".
    if let Some(name) = update.name.as_deref() {
        validate_name(name)?;
    }

    let current_date = match present(&update.current_date) {
        Some(raw) if patterns.iso_date.is_match(raw) => Some(
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| CandidateViolation::InvalidCurrentDate)?,
        ),
        Some(_) => return Err(CandidateViolation::InvalidCurrentDate),
        None => None,
    };

    if let Some(aadhaar) = present(&update.aadhaar_no) {
        if !patterns.aadhaar.is_match(aadhaar) {
            return Err(CandidateViolation::InvalidAadhaar);
        }
    }
    if let Some(phone) = present(&update.phone) {
        if !patterns.phone.is_match(phone) {
            return Err(CandidateViolation::InvalidPhone);
        }
    }
    if let Some(ifsc) = present(&update.ifsc) {
        if !patterns.ifsc.is_match(&ifsc.to_ascii_uppercase()) {
            return Err(CandidateViolation::InvalidIfsc);
        }
    }

    Ok(current_date)
}

/// Gate for the final submission.
pub fn validate_submission(
    email: &str,
    profile: &CandidateProfile,
) -> Result<(), CandidateViolation> {
    let required = [
        ("Name", profile.name.as_str()),
        ("Aadhaar number", profile.personal.aadhaar_no.as_str()),
        ("Phone number", profile.personal.phone.as_str()),
        ("Email", email),
    ];
    if let Some((label, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
        return Err(CandidateViolation::MissingField(*label));
    }

    if !profile.penalty_clause_agreement {
        return Err(CandidateViolation::PenaltyClauseNotAgreed);
    }
    if !profile.health.covid_declaration_agreement {
        return Err(CandidateViolation::CovidDeclarationNotAgreed);
    }

    Ok(())
}

/// Strip everything but digits; used for the remark link.
pub fn phone_digits(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|raw| !raw.is_empty())
}
