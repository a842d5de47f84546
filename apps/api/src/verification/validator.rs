//! Per-field answer validators.
//!
//! Each validator returns a typed value or a specific `FieldError`. A
//! `FieldError` is never surfaced as a request failure: the orchestrator
//! turns it into a clarifying re-prompt for the same stage, using the
//! error's `Display` text as the hint spoken back to the caller.

use chrono::{NaiveDate, Utc};
use thiserror::Error;

pub const MIN_EXPERIENCE_YEARS: u32 = 0;
pub const MAX_EXPERIENCE_YEARS: u32 = 50;
pub const MIN_AGE_YEARS: u32 = 18;
pub const MAX_AGE_YEARS: u32 = 80;

const DOB_FORMATS: &[&str] = &["%m/%d/%Y", "%Y-%m-%d", "%B %d, %Y", "%d %B %Y"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("the answer must include at least a first and last name")]
    NameIncomplete,

    #[error("the answer did not contain a number of years")]
    ExperienceNotNumeric,

    #[error("years of experience must be between {MIN_EXPERIENCE_YEARS} and {MAX_EXPERIENCE_YEARS}")]
    ExperienceOutOfRange,

    #[error("the date could not be understood; month, day and year are needed")]
    DobUnparseable,

    #[error("the date of birth must put the caller between {MIN_AGE_YEARS} and {MAX_AGE_YEARS} years old")]
    DobAgeOutOfRange,

    #[error("the answer does not look like a valid email address")]
    EmailInvalid,
}

/// Full name: non-empty, at least first + last name.
pub fn validate_name(input: &str) -> Result<String, FieldError> {
    let name = input.trim();
    if name.split_whitespace().count() < 2 {
        return Err(FieldError::NameIncomplete);
    }
    Ok(name.to_string())
}

/// First word of a full name, used to address the caller.
pub fn first_name(full_name: &str) -> String {
    full_name
        .split_whitespace()
        .next()
        .unwrap_or(full_name)
        .to_string()
}

/// Years of experience: first integer found in the answer ("7" or
/// "7 years"), bounded to 0..=50.
pub fn validate_experience(input: &str) -> Result<u32, FieldError> {
    for token in input.split_whitespace() {
        let cleaned = token.trim_matches(|c: char| matches!(c, ',' | '.' | '!' | '?'));
        if let Ok(value) = cleaned.parse::<i64>() {
            let range = i64::from(MIN_EXPERIENCE_YEARS)..=i64::from(MAX_EXPERIENCE_YEARS);
            if range.contains(&value) {
                return Ok(value as u32);
            }
            return Err(FieldError::ExperienceOutOfRange);
        }
    }
    Err(FieldError::ExperienceNotNumeric)
}

/// Date of birth: any supported spoken/written format, caller aged 18..=80.
pub fn validate_dob(input: &str) -> Result<NaiveDate, FieldError> {
    let raw = input.trim();
    let dob = DOB_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .ok_or(FieldError::DobUnparseable)?;

    let today = Utc::now().date_naive();
    let age = today
        .years_since(dob)
        .ok_or(FieldError::DobAgeOutOfRange)?;
    if !(MIN_AGE_YEARS..=MAX_AGE_YEARS).contains(&age) {
        return Err(FieldError::DobAgeOutOfRange);
    }

    Ok(dob)
}

/// Email: single `@`, dotted domain, no whitespace. Lower-cased so it can
/// be used directly as the record-store identity key.
pub fn validate_email(input: &str) -> Result<String, FieldError> {
    let email = input.trim().to_lowercase();
    if email.is_empty() || email.chars().any(char::is_whitespace) {
        return Err(FieldError::EmailInvalid);
    }

    let (local, domain) = email.split_once('@').ok_or(FieldError::EmailInvalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(FieldError::EmailInvalid);
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(FieldError::EmailInvalid);
    }

    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Months;

    fn years_ago(years: u32) -> NaiveDate {
        Utc::now()
            .date_naive()
            .checked_sub_months(Months::new(years * 12))
            .unwrap()
    }

    #[test]
    fn test_name_requires_first_and_last() {
        assert_eq!(validate_name("  Jane Smith "), Ok("Jane Smith".to_string()));
        assert_eq!(validate_name("Jane"), Err(FieldError::NameIncomplete));
        assert_eq!(validate_name("   "), Err(FieldError::NameIncomplete));
    }

    #[test]
    fn test_first_name_is_leading_word() {
        assert_eq!(first_name("Jane Smith"), "Jane");
        assert_eq!(first_name("Jane Anne Smith"), "Jane");
    }

    #[test]
    fn test_experience_plain_number() {
        assert_eq!(validate_experience("7"), Ok(7));
        assert_eq!(validate_experience("0"), Ok(0));
        assert_eq!(validate_experience("50"), Ok(50));
    }

    #[test]
    fn test_experience_spoken_answer() {
        assert_eq!(validate_experience("7 years"), Ok(7));
        assert_eq!(validate_experience("about 12 years, I think"), Ok(12));
    }

    #[test]
    fn test_experience_non_numeric_rejected() {
        assert_eq!(
            validate_experience("quite a while"),
            Err(FieldError::ExperienceNotNumeric)
        );
    }

    #[test]
    fn test_experience_out_of_range_rejected() {
        assert_eq!(validate_experience("51"), Err(FieldError::ExperienceOutOfRange));
        assert_eq!(validate_experience("-3"), Err(FieldError::ExperienceOutOfRange));
    }

    #[test]
    fn test_dob_accepts_us_and_iso_formats() {
        assert_eq!(
            validate_dob("03/15/1990"),
            Ok(NaiveDate::from_ymd_opt(1990, 3, 15).unwrap())
        );
        assert_eq!(
            validate_dob("1990-03-15"),
            Ok(NaiveDate::from_ymd_opt(1990, 3, 15).unwrap())
        );
        assert_eq!(
            validate_dob("March 15, 1990"),
            Ok(NaiveDate::from_ymd_opt(1990, 3, 15).unwrap())
        );
    }

    #[test]
    fn test_dob_garbage_rejected() {
        assert_eq!(validate_dob("soon"), Err(FieldError::DobUnparseable));
        assert_eq!(validate_dob("15/45/1990"), Err(FieldError::DobUnparseable));
    }

    #[test]
    fn test_dob_age_bounds() {
        let underage = years_ago(10).format("%m/%d/%Y").to_string();
        assert_eq!(validate_dob(&underage), Err(FieldError::DobAgeOutOfRange));

        let too_old = years_ago(95).format("%m/%d/%Y").to_string();
        assert_eq!(validate_dob(&too_old), Err(FieldError::DobAgeOutOfRange));

        let fine = years_ago(30).format("%m/%d/%Y").to_string();
        assert!(validate_dob(&fine).is_ok());
    }

    #[test]
    fn test_email_accepted_and_lowercased() {
        assert_eq!(
            validate_email("  Jane.Smith@Example.COM "),
            Ok("jane.smith@example.com".to_string())
        );
    }

    #[test]
    fn test_email_rejected_shapes() {
        for bad in ["", "plainaddress", "a b@example.com", "@example.com", "jane@", "jane@nodot", "jane@.com"] {
            assert_eq!(validate_email(bad), Err(FieldError::EmailInvalid), "{bad}");
        }
    }
}
