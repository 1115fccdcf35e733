//! Summarize Results use case
//!
//! Reads answered records per domain and hands them to
//! [`ResultsSummary::aggregate`]. Read-only; a store failure is reported to
//! the caller instead of being folded into a zero-filled summary.

use crate::ports::question_store::{QuestionStore, StoreError};
use quizbench_domain::{AnsweredRecord, Domain, ResultsSummary};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum SummarizeError {
    #[error("Could not read answers for {domain}: {source}")]
    Store {
        domain: Domain,
        #[source]
        source: StoreError,
    },
}

/// Use case for aggregating stored answers into a summary
pub struct SummarizeResultsUseCase<S: QuestionStore + ?Sized> {
    store: Arc<S>,
}

impl<S: QuestionStore + ?Sized> SummarizeResultsUseCase<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Summarize the given domains, in the given order
    pub async fn execute(&self, domains: &[Domain]) -> Result<ResultsSummary, SummarizeError> {
        let mut groups: Vec<(Domain, Vec<AnsweredRecord>)> = Vec::with_capacity(domains.len());
        for &domain in domains {
            let records = self
                .store
                .list_answered(domain)
                .await
                .map_err(|source| SummarizeError::Store { domain, source })?;
            debug!("{}: {} answered record(s)", domain, records.len());
            groups.push((domain, records));
        }

        Ok(ResultsSummary::aggregate(
            groups.iter().map(|(domain, records)| (*domain, records.as_slice())),
        ))
    }

    /// Summarize every known domain
    pub async fn execute_all(&self) -> Result<ResultsSummary, SummarizeError> {
        self.execute(&Domain::ALL).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::question_store::AnswerFilter;
    use async_trait::async_trait;
    use quizbench_domain::{NewQuestion, Question, QuestionId, RecordedAnswer};
    use std::collections::HashMap;

    struct FixedStore {
        answered: HashMap<Domain, Vec<AnsweredRecord>>,
        broken: Option<Domain>,
    }

    #[async_trait]
    impl QuestionStore for FixedStore {
        async fn list(
            &self,
            _domain: Domain,
            _filter: AnswerFilter,
        ) -> Result<Vec<Question>, StoreError> {
            Ok(Vec::new())
        }

        async fn list_answered(&self, domain: Domain) -> Result<Vec<AnsweredRecord>, StoreError> {
            if self.broken == Some(domain) {
                return Err(StoreError::Read("no such table".to_string()));
            }
            Ok(self.answered.get(&domain).cloned().unwrap_or_default())
        }

        async fn record_answer(
            &self,
            domain: Domain,
            id: QuestionId,
            _answer: &RecordedAnswer,
        ) -> Result<Question, StoreError> {
            Err(StoreError::NotFound { domain, id })
        }

        async fn count(&self, _domain: Domain) -> Result<usize, StoreError> {
            Ok(0)
        }

        async fn insert_many(
            &self,
            _domain: Domain,
            _questions: Vec<NewQuestion>,
        ) -> Result<usize, StoreError> {
            Ok(0)
        }
    }

    fn record(expected: &str, got: &str, ms: f64) -> AnsweredRecord {
        AnsweredRecord::new(expected, got, Some(ms))
    }

    #[tokio::test]
    async fn test_summarizes_each_domain() {
        let mut answered = HashMap::new();
        answered.insert(
            Domain::History,
            vec![record("A", "A", 100.0), record("B", "C", 300.0)],
        );
        answered.insert(Domain::ComputerSecurity, vec![record("d", "D", 900.0)]);
        let use_case = SummarizeResultsUseCase::new(Arc::new(FixedStore {
            answered,
            broken: None,
        }));

        let summary = use_case.execute_all().await.unwrap();

        let history = summary.domain(Domain::History).unwrap();
        assert_eq!(history.total_questions, 2);
        assert_eq!(history.total_correct, 1);
        assert_eq!(history.accuracy_pct, 50.0);
        assert_eq!(history.avg_response_time_ms, Some(200.0));

        let social = summary.domain(Domain::SocialScience).unwrap();
        assert_eq!(social.total_questions, 0);
        assert_eq!(social.accuracy_pct, 0.0);
        assert_eq!(social.avg_response_time_ms, None);

        assert_eq!(summary.overall.total_questions, 3);
        assert_eq!(summary.overall.total_correct, 2);
        assert_eq!(summary.overall.best_domain, Some(Domain::ComputerSecurity));
        assert_eq!(summary.overall.slowest_domain, Some(Domain::ComputerSecurity));
    }

    #[tokio::test]
    async fn test_domain_order_follows_request() {
        let use_case = SummarizeResultsUseCase::new(Arc::new(FixedStore {
            answered: HashMap::new(),
            broken: None,
        }));

        let summary = use_case
            .execute(&[Domain::ComputerSecurity, Domain::History])
            .await
            .unwrap();

        let order: Vec<_> = summary.domains.iter().map(|d| d.domain).collect();
        assert_eq!(order, vec![Domain::ComputerSecurity, Domain::History]);
        assert_eq!(summary.overall.best_domain, None);
    }

    #[tokio::test]
    async fn test_read_failure_propagates() {
        let use_case = SummarizeResultsUseCase::new(Arc::new(FixedStore {
            answered: HashMap::new(),
            broken: Some(Domain::SocialScience),
        }));

        let err = use_case.execute_all().await.unwrap_err();
        match err {
            SummarizeError::Store { domain, .. } => assert_eq!(domain, Domain::SocialScience),
        }
    }
}
