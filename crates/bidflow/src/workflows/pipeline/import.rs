use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;

use super::domain::{NewSolicitation, Priority, SolicitationId};

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read solicitation export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid solicitation CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: {message}")]
    InvalidRow { row: usize, message: String },
}

/// Loads ingestion exports into records ready for [`super::SolicitationStore::with_records`].
pub struct SolicitationImporter;

impl SolicitationImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<NewSolicitation>, ImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<NewSolicitation>, ImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut solicitations = Vec::new();

        for (index, row) in csv_reader.deserialize::<SolicitationRow>().enumerate() {
            let row = row?;
            if row.id.is_empty() {
                continue;
            }
            // header is line 1
            solicitations.push(row.into_new(index + 2)?);
        }

        Ok(solicitations)
    }
}

#[derive(Debug, Deserialize)]
struct SolicitationRow {
    #[serde(rename = "Id")]
    id: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Company Id")]
    company_id: String,
    #[serde(rename = "Company Name")]
    company_name: String,
    #[serde(rename = "Due Date")]
    due_date: String,
    #[serde(rename = "Value", default)]
    value: Option<u64>,
    #[serde(rename = "Score", default)]
    score: Option<u8>,
    #[serde(rename = "Match Percentage", default)]
    match_percentage: Option<u8>,
    #[serde(rename = "Priority")]
    priority: String,
    #[serde(rename = "Account Manager")]
    account_manager: String,
}

impl SolicitationRow {
    fn into_new(self, row: usize) -> Result<NewSolicitation, ImportError> {
        let invalid = |message: String| ImportError::InvalidRow { row, message };

        if self.company_id.is_empty() {
            return Err(invalid("company id is required".to_string()));
        }

        let due_date = NaiveDate::parse_from_str(&self.due_date, "%Y-%m-%d").map_err(|err| {
            invalid(format!(
                "failed to parse due date '{}' as YYYY-MM-DD ({err})",
                self.due_date
            ))
        })?;

        let priority = Priority::from_label(&self.priority)
            .ok_or_else(|| invalid(format!("unknown priority '{}'", self.priority)))?;

        let match_percentage = self.match_percentage.unwrap_or_default();
        if match_percentage > 100 {
            return Err(invalid(format!(
                "match percentage {match_percentage} exceeds 100"
            )));
        }

        Ok(NewSolicitation {
            id: SolicitationId(self.id),
            name: self.name,
            company_id: self.company_id,
            company_name: self.company_name,
            due_date,
            value: self.value.unwrap_or_default(),
            score: self.score.unwrap_or_default(),
            match_percentage,
            priority,
            account_manager: self.account_manager,
        })
    }
}
