use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

use crate::models::record::EmploymentRecord;

/// Read-only repository of known employment records. Injected as a trait
/// object so handlers and the orchestrator can be tested against fixture
/// data without a file on disk.
pub trait EmploymentStore: Send + Sync {
    /// Looks up a record by lower-cased email.
    fn find(&self, email: &str) -> Option<EmploymentRecord>;

    /// Canonical company list used for mismatch suggestions.
    fn companies(&self) -> &[String];
}

#[derive(Debug, Deserialize)]
struct RecordsFile {
    records: Vec<EmploymentRecord>,
    company_list: Vec<String>,
}

/// Employment records loaded once from a JSON file at process start.
/// Read-only afterwards, so no locking is needed.
pub struct JsonRecordStore {
    by_email: HashMap<String, EmploymentRecord>,
    companies: Vec<String>,
}

impl JsonRecordStore {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading employment records from {}", path.display()))?;
        let file: RecordsFile = serde_json::from_str(&raw)
            .with_context(|| format!("parsing employment records in {}", path.display()))?;

        let store = Self::from_records(file.records, file.company_list);
        info!(
            "Employment records loaded: {} records, {} companies",
            store.by_email.len(),
            store.companies.len()
        );
        Ok(store)
    }

    pub fn from_records(records: Vec<EmploymentRecord>, companies: Vec<String>) -> Self {
        let by_email = records
            .into_iter()
            .map(|record| (record.email.to_lowercase(), record))
            .collect();
        JsonRecordStore { by_email, companies }
    }
}

impl EmploymentStore for JsonRecordStore {
    fn find(&self, email: &str) -> Option<EmploymentRecord> {
        self.by_email.get(&email.to_lowercase()).cloned()
    }

    fn companies(&self) -> &[String] {
        &self.companies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;

    fn sample_record() -> EmploymentRecord {
        EmploymentRecord {
            email: "Jane.Smith@Example.com".to_string(),
            name: "Jane Smith".to_string(),
            company_name: "Tech Innovations Inc".to_string(),
            years_of_experience: 7,
            date_of_birth: NaiveDate::from_ymd_opt(1990, 3, 15).unwrap(),
        }
    }

    #[test]
    fn test_find_is_case_insensitive() {
        let store = JsonRecordStore::from_records(
            vec![sample_record()],
            vec!["Tech Innovations Inc".to_string()],
        );

        assert!(store.find("jane.smith@example.com").is_some());
        assert!(store.find("JANE.SMITH@EXAMPLE.COM").is_some());
        assert!(store.find("nobody@example.com").is_none());
    }

    #[test]
    fn test_load_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "records": [{{
                    "email": "jane.smith@example.com",
                    "name": "Jane Smith",
                    "company_name": "Tech Innovations Inc",
                    "years_of_experience": 7,
                    "date_of_birth": "1990-03-15"
                }}],
                "company_list": ["Tech Innovations Inc", "Globex Inc"]
            }}"#
        )
        .unwrap();

        let store = JsonRecordStore::load(file.path()).unwrap();
        let record = store.find("jane.smith@example.com").unwrap();
        assert_eq!(record.company_name, "Tech Innovations Inc");
        assert_eq!(record.years_of_experience, 7);
        assert_eq!(store.companies().len(), 2);
    }

    #[test]
    fn test_load_missing_file_fails() {
        assert!(JsonRecordStore::load(Path::new("/nonexistent/records.json")).is_err());
    }
}
