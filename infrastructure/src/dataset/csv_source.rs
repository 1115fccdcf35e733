//! CSV question source.
//!
//! Each domain has one headerless CSV file with rows
//! `question,option_a,option_b,option_c,option_d,answer`.

use async_trait::async_trait;
use quizbench_application::ports::question_source::{QuestionSource, SourceError};
use quizbench_domain::{Domain, NewQuestion};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const FIELDS_PER_ROW: usize = 6;

/// Reads `<dir>/<file>` for each domain
#[derive(Debug, Clone)]
pub struct CsvQuestionSource {
    dir: PathBuf,
}

impl CsvQuestionSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Default dataset file name for a domain
    pub fn file_name(domain: Domain) -> &'static str {
        match domain {
            Domain::History => "prehistory_test.csv",
            Domain::SocialScience => "sociology_test.csv",
            Domain::ComputerSecurity => "computer_security_test.csv",
        }
    }

    pub fn path_for(&self, domain: Domain) -> PathBuf {
        self.dir.join(Self::file_name(domain))
    }
}

/// Parse one dataset file. Duplicate question texts keep their first row.
fn read_questions(path: &Path) -> Result<Vec<NewQuestion>, SourceError> {
    let path_label = path.display().to_string();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| SourceError::Read {
            path: path_label.clone(),
            message: e.to_string(),
        })?;

    let mut questions = Vec::new();
    let mut seen = HashSet::new();
    for (idx, result) in reader.records().enumerate() {
        let row = idx + 1;
        let record = result.map_err(|e| SourceError::Malformed {
            path: path_label.clone(),
            row,
            message: e.to_string(),
        })?;

        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        if record.len() != FIELDS_PER_ROW {
            return Err(SourceError::Malformed {
                path: path_label,
                row,
                message: format!("expected {} fields, found {}", FIELDS_PER_ROW, record.len()),
            });
        }

        let field = |i: usize| record.get(i).unwrap_or("").trim().to_string();
        let question = NewQuestion::try_new(
            field(0),
            [field(1), field(2), field(3), field(4)],
            field(5),
        )
        .map_err(|e| SourceError::Malformed {
            path: path_label.clone(),
            row,
            message: e.to_string(),
        })?;

        if !seen.insert(question.prompt_text.clone()) {
            warn!("{}: row {} repeats an earlier question, skipping", path_label, row);
            continue;
        }
        questions.push(question);
    }

    Ok(questions)
}

#[async_trait]
impl QuestionSource for CsvQuestionSource {
    async fn load(&self, domain: Domain) -> Result<Vec<NewQuestion>, SourceError> {
        let path = self.path_for(domain);
        if !path.exists() {
            warn!("{}: dataset {} not found", domain, path.display());
            return Ok(Vec::new());
        }

        let path_label = path.display().to_string();
        let questions = tokio::task::spawn_blocking(move || read_questions(&path))
            .await
            .map_err(|e| SourceError::Read {
                path: path_label.clone(),
                message: e.to_string(),
            })??;
        debug!("{}: read {} question(s) from {}", domain, questions.len(), path_label);
        Ok(questions)
    }
}
