//! Prompt text for the verification voice agent.
//!
//! The system prompt carries the fixed behavioral rules; each turn appends
//! a CURRENT OBJECTIVE section telling the model exactly what the next
//! utterance must accomplish. The orchestrator owns all state decisions:
//! the model only phrases them.

use crate::models::session::CollectedFields;
use crate::verification::state_machine::{Stage, VerifyDecision};
use crate::verification::validator::FieldError;

/// Scripted opening line spoken when a session is created.
pub const GREETING: &str = "Hello! Welcome to the Employment Verification System. \
    Let's start by collecting some information. What is your full name?";

pub const SYSTEM_PROMPT: &str = "\
You are a professional Employment Verification Voice Agent conducting structured \
identity and employment verification calls.

## CONVERSATION RULES
- Follow a STRICT LINEAR PROGRESSION: collect full name, then years of \
experience, then date of birth, then email, then confirm employment. Never \
skip ahead and never ask two questions at once.
- The CURRENT OBJECTIVE below tells you exactly what this reply must \
accomplish. Do not pursue anything else.
- If the caller gives irrelevant information or asks questions, acknowledge \
briefly without engaging, then restate the current question.
- Never fabricate or assume information; if an answer was unusable you will \
be told why, so ask again with that hint.

## VOICE & TONE
- Maximum 2-3 sentences per reply, phrased for speech, not for reading.
- Warm but professional; use contractions naturally.
- Address the caller by first name once it is known.
- Say \"date of birth\", not \"DOB\". Avoid filler like \"um\" or \"maybe\".";

/// Assembles the full system prompt for one turn.
pub fn build_system_prompt(objective: &str) -> String {
    format!("{SYSTEM_PROMPT}\n\n## CURRENT OBJECTIVE\n{objective}")
}

/// Objective for the turn after a stage was successfully advanced.
/// `known_company` is the record-store company when the session just moved
/// into the verification step.
pub fn collect_objective(
    stage: Stage,
    fields: &CollectedFields,
    known_company: Option<&str>,
) -> String {
    let first_name = fields.first_name.as_deref().unwrap_or("the caller");
    match stage {
        Stage::CollectName => "Ask for the caller's full name.".to_string(),
        Stage::CollectExperience => format!(
            "The caller's name is {}. Thank them and ask how many years of \
             professional experience they have in total.",
            fields.name.as_deref().unwrap_or("unknown")
        ),
        Stage::CollectDob => format!(
            "Ask {first_name} for their date of birth, month, day, and year."
        ),
        Stage::CollectEmail => format!(
            "Thank {first_name} and ask for their email address so our \
             employment records can be checked."
        ),
        Stage::Verify => match known_company {
            Some(company) => format!(
                "Tell {first_name} that our records show they work at {company} \
                 and ask whether that is still correct."
            ),
            None => format!(
                "Tell {first_name} no employment record was found for their \
                 email, and ask which company they currently work with."
            ),
        },
        Stage::Verified | Stage::Rejected => closed_objective(fields),
    }
}

/// Objective after a malformed answer: re-ask the same question.
pub fn reprompt_objective(stage: Stage, error: &FieldError) -> String {
    format!(
        "The caller's answer could not be used: {error}. Apologize briefly \
         and ask again for their {}.",
        field_label(stage)
    )
}

/// Objective for the terminal verification decision.
pub fn decision_objective(
    decision: &VerifyDecision,
    fields: &CollectedFields,
    suggestions: &[String],
) -> String {
    let first_name = fields.first_name.as_deref().unwrap_or("the caller");
    if decision.verified {
        let company = decision.company.as_deref().unwrap_or("their employer");
        return format!(
            "Employment at {company} is verified. Thank {first_name} warmly, \
             tell them their verification is complete, and close the call."
        );
    }

    let mut objective = format!(
        "The details could not be verified ({}). Apologize, tell {first_name} \
         the verification could not be completed, and close the call politely.",
        decision.reasons.join("; ")
    );
    if !suggestions.is_empty() {
        objective.push_str(&format!(
            " Mention these close company matches in case one applies: {}.",
            suggestions.join(", ")
        ));
    }
    objective
}

/// Objective once the session is already terminal.
pub fn closed_objective(fields: &CollectedFields) -> String {
    let first_name = fields.first_name.as_deref().unwrap_or("the caller");
    format!(
        "The verification for {first_name} is already complete. Respond \
         politely and close the conversation; collect nothing further."
    )
}

fn field_label(stage: Stage) -> &'static str {
    match stage {
        Stage::CollectName => "full name",
        Stage::CollectExperience => "total years of professional experience",
        Stage::CollectDob => "date of birth",
        Stage::CollectEmail => "email address",
        Stage::Verify => "current company",
        Stage::Verified | Stage::Rejected => "answer",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> CollectedFields {
        CollectedFields {
            name: Some("Jane Smith".to_string()),
            first_name: Some("Jane".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_system_prompt_carries_objective() {
        let prompt = build_system_prompt("Ask for the caller's full name.");
        assert!(prompt.contains("CURRENT OBJECTIVE"));
        assert!(prompt.ends_with("Ask for the caller's full name."));
    }

    #[test]
    fn test_verify_objective_states_recorded_company() {
        let objective = collect_objective(Stage::Verify, &fields(), Some("Tech Innovations Inc"));
        assert!(objective.contains("Tech Innovations Inc"));
        assert!(objective.contains("Jane"));
    }

    #[test]
    fn test_verify_objective_without_record_asks_for_company() {
        let objective = collect_objective(Stage::Verify, &fields(), None);
        assert!(objective.contains("no employment record"));
    }

    #[test]
    fn test_reprompt_objective_includes_hint_and_field() {
        let objective =
            reprompt_objective(Stage::CollectExperience, &FieldError::ExperienceNotNumeric);
        assert!(objective.contains("number of years"));
        assert!(objective.contains("years of professional experience"));
    }

    #[test]
    fn test_rejection_objective_lists_suggestions() {
        let decision = VerifyDecision {
            verified: false,
            company: Some("Tech Inovations".to_string()),
            reasons: vec!["stated company does not match Tech Innovations Inc".to_string()],
        };
        let suggestions = vec!["Tech Innovations Inc".to_string()];
        let objective = decision_objective(&decision, &fields(), &suggestions);
        assert!(objective.contains("could not be completed"));
        assert!(objective.contains("Tech Innovations Inc"));
    }
}
