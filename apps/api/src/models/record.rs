use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A known employment record, keyed by email. Immutable reference data
/// loaded once at process start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmploymentRecord {
    pub email: String,
    pub name: String,
    pub company_name: String,
    pub years_of_experience: u32,
    pub date_of_birth: NaiveDate,
}
