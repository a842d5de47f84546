//! Verification state machine.
//!
//! `COLLECT_NAME → COLLECT_EXPERIENCE → COLLECT_DOB → COLLECT_EMAIL →
//! VERIFY → {VERIFIED, REJECTED}`. A well-formed answer advances one stage;
//! a malformed answer re-prompts the same stage without touching the
//! collected fields. `VERIFY` compares the collected identity against the
//! employment record looked up by email and terminates in either outcome;
//! terminal stages accept no further field collection.

use serde::{Deserialize, Serialize};

use crate::models::record::EmploymentRecord;
use crate::models::session::CollectedFields;
use crate::verification::matcher;
use crate::verification::validator::{
    self, first_name, FieldError,
};

/// Allowed gap between stated and recorded years of experience.
pub const EXPERIENCE_TOLERANCE_YEARS: u32 = 2;

/// Whole-answer confirmations and denials recognized during `VERIFY`.
const AFFIRMATIVES: &[&str] = &[
    "yes",
    "yeah",
    "yep",
    "correct",
    "right",
    "that's right",
    "that's correct",
    "yes it is",
];

const NEGATIVES: &[&str] = &[
    "no",
    "nope",
    "not correct",
    "wrong",
    "incorrect",
    "no it's not",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    CollectName,
    CollectExperience,
    CollectDob,
    CollectEmail,
    Verify,
    Verified,
    Rejected,
}

/// Result of the `VERIFY` comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifyDecision {
    pub verified: bool,
    /// Canonical company on success, the caller's stated company otherwise.
    pub company: Option<String>,
    /// Which checks failed; used for logging and to brief the agent reply.
    pub reasons: Vec<String>,
}

/// Outcome of applying one user answer to a session.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnTransition {
    /// Field stored, moved to the given stage.
    Advanced(Stage),
    /// Malformed answer; stage and fields unchanged.
    Reprompt(FieldError),
    /// `VERIFY` evaluated to a terminal outcome.
    Decision(VerifyDecision),
    /// Session already terminal; nothing left to collect.
    Closed,
}

/// Applies `answer` to the current stage. `record` is the store lookup for
/// the collected email and is only consulted in `VERIFY`.
pub fn advance(
    stage: Stage,
    fields: &mut CollectedFields,
    answer: &str,
    record: Option<&EmploymentRecord>,
) -> TurnTransition {
    match stage {
        Stage::CollectName => match validator::validate_name(answer) {
            Ok(name) => {
                fields.first_name = Some(first_name(&name));
                fields.name = Some(name);
                TurnTransition::Advanced(Stage::CollectExperience)
            }
            Err(e) => TurnTransition::Reprompt(e),
        },
        Stage::CollectExperience => match validator::validate_experience(answer) {
            Ok(years) => {
                fields.years_of_experience = Some(years);
                TurnTransition::Advanced(Stage::CollectDob)
            }
            Err(e) => TurnTransition::Reprompt(e),
        },
        Stage::CollectDob => match validator::validate_dob(answer) {
            Ok(dob) => {
                fields.date_of_birth = Some(dob);
                TurnTransition::Advanced(Stage::CollectEmail)
            }
            Err(e) => TurnTransition::Reprompt(e),
        },
        Stage::CollectEmail => match validator::validate_email(answer) {
            Ok(email) => {
                fields.email = Some(email);
                TurnTransition::Advanced(Stage::Verify)
            }
            Err(e) => TurnTransition::Reprompt(e),
        },
        Stage::Verify => TurnTransition::Decision(evaluate(fields, answer, record)),
        Stage::Verified | Stage::Rejected => TurnTransition::Closed,
    }
}

/// Compares the collected identity and the caller's company answer against
/// the stored record. All checks must pass: company confirmed or
/// fuzzy-matched, name fuzzy-matched, experience within tolerance, date of
/// birth exact.
fn evaluate(
    fields: &mut CollectedFields,
    answer: &str,
    record: Option<&EmploymentRecord>,
) -> VerifyDecision {
    let reply = answer.trim().to_lowercase();
    let affirmative = AFFIRMATIVES.contains(&reply.as_str());
    let negative = NEGATIVES.contains(&reply.as_str());

    if !affirmative && !negative {
        fields.stated_company = Some(answer.trim().to_string());
    }

    let Some(record) = record else {
        return VerifyDecision {
            verified: false,
            company: fields.stated_company.clone(),
            reasons: vec!["no employment record found for the provided email".to_string()],
        };
    };

    let mut reasons = Vec::new();

    let company_ok = if affirmative {
        true
    } else if negative {
        reasons.push("caller reports a different employer".to_string());
        false
    } else if matcher::matches(answer, &record.company_name, matcher::MATCH_THRESHOLD) {
        true
    } else {
        reasons.push(format!(
            "stated company does not match {}",
            record.company_name
        ));
        false
    };

    let name_ok = fields
        .name
        .as_deref()
        .map(|name| matcher::matches(name, &record.name, matcher::MATCH_THRESHOLD))
        .unwrap_or(false);
    if !name_ok {
        reasons.push("name does not match our records".to_string());
    }

    let experience_ok = fields
        .years_of_experience
        .map(|years| years.abs_diff(record.years_of_experience) <= EXPERIENCE_TOLERANCE_YEARS)
        .unwrap_or(false);
    if !experience_ok {
        reasons.push("years of experience outside tolerance".to_string());
    }

    let dob_ok = fields
        .date_of_birth
        .map(|dob| dob == record.date_of_birth)
        .unwrap_or(false);
    if !dob_ok {
        reasons.push("date of birth does not match".to_string());
    }

    let verified = company_ok && name_ok && experience_ok && dob_ok;

    VerifyDecision {
        verified,
        company: if verified {
            Some(record.company_name.clone())
        } else {
            fields.stated_company.clone()
        },
        reasons,
    }
}
