//! Import Questions use case
//!
//! Populates the store from a reference dataset, once per domain. A domain
//! that already holds questions is left untouched, so the import can run on
//! every start without duplicating rows.

use crate::ports::question_source::QuestionSource;
use crate::ports::question_store::QuestionStore;
use quizbench_domain::Domain;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

/// Result of importing one domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportStatus {
    /// Rows were inserted into an empty domain
    Inserted(usize),
    /// The domain already had this many questions; nothing was read
    AlreadyPopulated(usize),
    /// The dataset was missing or empty
    SourceEmpty,
    /// Reading the dataset or writing the rows failed
    Failed(String),
}

impl fmt::Display for ImportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportStatus::Inserted(n) => write!(f, "imported {} question(s)", n),
            ImportStatus::AlreadyPopulated(n) => write!(f, "already has {} question(s)", n),
            ImportStatus::SourceEmpty => write!(f, "no dataset rows found"),
            ImportStatus::Failed(e) => write!(f, "failed: {}", e),
        }
    }
}

/// Per-domain import results, in processing order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub entries: Vec<(Domain, ImportStatus)>,
}

impl ImportReport {
    pub fn total_inserted(&self) -> usize {
        self.entries
            .iter()
            .map(|(_, status)| match status {
                ImportStatus::Inserted(n) => *n,
                _ => 0,
            })
            .sum()
    }

    pub fn has_failures(&self) -> bool {
        self.entries
            .iter()
            .any(|(_, status)| matches!(status, ImportStatus::Failed(_)))
    }
}

/// Use case for seeding the store from a question source
pub struct ImportQuestionsUseCase<S: QuestionStore + ?Sized, Q: QuestionSource + ?Sized> {
    store: Arc<S>,
    source: Arc<Q>,
}

impl<S: QuestionStore + ?Sized, Q: QuestionSource + ?Sized> ImportQuestionsUseCase<S, Q> {
    pub fn new(store: Arc<S>, source: Arc<Q>) -> Self {
        Self { store, source }
    }

    pub async fn execute(&self, domains: &[Domain]) -> ImportReport {
        let mut report = ImportReport::default();
        for &domain in domains {
            let status = self.import_domain(domain).await;
            match &status {
                ImportStatus::Failed(e) => warn!("{}: import {}", domain, e),
                other => info!("{}: {}", domain, other),
            }
            report.entries.push((domain, status));
        }
        report
    }

    async fn import_domain(&self, domain: Domain) -> ImportStatus {
        match self.store.count(domain).await {
            Ok(0) => {}
            Ok(n) => return ImportStatus::AlreadyPopulated(n),
            Err(e) => return ImportStatus::Failed(e.to_string()),
        }

        let questions = match self.source.load(domain).await {
            Ok(questions) if questions.is_empty() => return ImportStatus::SourceEmpty,
            Ok(questions) => questions,
            Err(e) => return ImportStatus::Failed(e.to_string()),
        };

        match self.store.insert_many(domain, questions).await {
            Ok(n) => ImportStatus::Inserted(n),
            Err(e) => ImportStatus::Failed(e.to_string()),
        }
    }
}
