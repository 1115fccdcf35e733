//! Run Evaluation use case
//!
//! Drives one evaluation pass over a list of domains. For every unanswered
//! question the model is invoked, its reply normalized, and a valid letter
//! persisted together with the measured latency. No per-question or
//! per-domain failure aborts the pass.

use crate::config::InvokerParams;
use crate::ports::completion_provider::CompletionProvider;
use crate::ports::progress::{NoProgress, ProgressPublisher};
use crate::ports::question_store::{AnswerFilter, QuestionStore};
use crate::use_cases::invoke_model::{InvokeError, ModelInvoker};
use quizbench_domain::{
    Domain, EvaluationOutcome, OutcomeStatus, ProgressEvent, Question, RecordedAnswer,
    normalize_str,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Input for the evaluation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunEvaluationInput {
    /// Domains to process, in order
    pub domains: Vec<Domain>,
}

impl RunEvaluationInput {
    /// Duplicates are dropped, keeping first occurrence
    pub fn new(domains: impl IntoIterator<Item = Domain>) -> Self {
        let mut unique = Vec::new();
        for domain in domains {
            if !unique.contains(&domain) {
                unique.push(domain);
            }
        }
        Self { domains: unique }
    }

    /// Every known domain in canonical order
    pub fn all() -> Self {
        Self::new(Domain::ALL)
    }
}

impl Default for RunEvaluationInput {
    fn default() -> Self {
        Self::all()
    }
}

/// What happened during a pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvaluationReport {
    /// Questions whose answer was persisted
    pub total_processed: usize,
    /// Questions where the model call or the write failed
    pub failed: usize,
    /// Questions whose reply held no A-D letter
    pub unparseable: usize,
    /// Domains skipped because their questions could not be listed
    pub failed_domains: Vec<Domain>,
    /// Per-question outcomes in processing order
    pub outcomes: Vec<EvaluationOutcome>,
    /// Whether the pass was stopped early
    pub cancelled: bool,
}

impl EvaluationReport {
    fn push(&mut self, outcome: EvaluationOutcome) {
        match &outcome.status {
            OutcomeStatus::Answered { .. } => self.total_processed += 1,
            OutcomeStatus::Unparseable { .. } => self.unparseable += 1,
            OutcomeStatus::Failed { .. } => self.failed += 1,
        }
        self.outcomes.push(outcome);
    }
}

/// Use case for evaluating the model over unanswered questions
pub struct RunEvaluationUseCase<S: QuestionStore + ?Sized, P: CompletionProvider + ?Sized> {
    store: Arc<S>,
    invoker: ModelInvoker<P>,
    cancellation_token: Option<CancellationToken>,
}

impl<S: QuestionStore + ?Sized, P: CompletionProvider + ?Sized> RunEvaluationUseCase<S, P> {
    pub fn new(store: Arc<S>, provider: Arc<P>, params: InvokerParams) -> Self {
        Self {
            store,
            invoker: ModelInvoker::new(provider, params),
            cancellation_token: None,
        }
    }

    /// Stop the pass between questions, or mid-retry, once `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.invoker = self.invoker.with_cancellation(token.clone());
        self.cancellation_token = Some(token);
        self
    }

    /// Execute the pass without progress reporting
    pub async fn execute(&self, input: RunEvaluationInput) -> EvaluationReport {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the pass, publishing an event for every state change
    pub async fn execute_with_progress(
        &self,
        input: RunEvaluationInput,
        progress: &dyn ProgressPublisher,
    ) -> EvaluationReport {
        let mut report = EvaluationReport::default();
        info!(
            "Starting evaluation of {} domain(s) with model {}",
            input.domains.len(),
            self.invoker.params().model
        );

        'domains: for domain in input.domains {
            progress.publish(&ProgressEvent::Started { domain });

            let questions = match self.store.list(domain, AnswerFilter::Unanswered).await {
                Ok(questions) => questions,
                Err(e) => {
                    warn!("{}: could not list unanswered questions: {}", domain, e);
                    progress.publish(&ProgressEvent::DomainFailed {
                        domain,
                        error: e.to_string(),
                    });
                    report.failed_domains.push(domain);
                    continue;
                }
            };

            if questions.is_empty() {
                info!("{}: no unanswered questions", domain);
                progress.publish(&ProgressEvent::NoWork { domain });
                continue;
            }
            info!("{}: {} unanswered question(s)", domain, questions.len());

            for question in &questions {
                if self.is_cancelled() {
                    report.cancelled = true;
                    break 'domains;
                }

                match self.evaluate_question(domain, question, progress).await {
                    Some(outcome) => report.push(outcome),
                    None => {
                        report.cancelled = true;
                        break 'domains;
                    }
                }
            }
        }

        let total_processed = report.total_processed;
        if report.cancelled {
            warn!("Evaluation cancelled after {} answer(s)", total_processed);
            progress.publish(&ProgressEvent::Cancelled { total_processed });
        } else {
            info!(
                "Evaluation complete: {} processed, {} failed, {} unparseable",
                total_processed, report.failed, report.unparseable
            );
            progress.publish(&ProgressEvent::Completed { total_processed });
        }
        report
    }

    /// Evaluate one question. Returns `None` if the pass was cancelled.
    async fn evaluate_question(
        &self,
        domain: Domain,
        question: &Question,
        progress: &dyn ProgressPublisher,
    ) -> Option<EvaluationOutcome> {
        let question_id = question.id;

        let invocation = match self.invoker.invoke(question).await {
            Ok(invocation) => invocation,
            Err(InvokeError::Cancelled) => return None,
            Err(e) => {
                warn!("{}: question {} failed: {}", domain, question_id, e);
                progress.publish(&ProgressEvent::QuestionFailed {
                    domain,
                    question_id,
                    error: e.to_string(),
                });
                return Some(EvaluationOutcome::failed(
                    domain,
                    question_id,
                    e.to_string(),
                    None,
                ));
            }
        };

        let Some(letter) = normalize_str(&invocation.answer) else {
            warn!(
                "{}: question {} got an unusable answer {:?}",
                domain, question_id, invocation.answer
            );
            progress.publish(&ProgressEvent::InvalidAnswer {
                domain,
                question_id,
                raw: invocation.answer.clone(),
            });
            return Some(EvaluationOutcome::unparseable(
                domain,
                question_id,
                invocation.answer,
                invocation.latency_ms,
            ));
        };

        let recorded = RecordedAnswer::new(letter, invocation.latency_ms);
        match self.store.record_answer(domain, question_id, &recorded).await {
            Ok(_) => {
                info!(
                    "{}: question {} answered {} in {:.1} ms",
                    domain, question_id, letter, invocation.latency_ms
                );
                progress.publish(&ProgressEvent::QuestionOk {
                    domain,
                    question_id,
                    latency_ms: invocation.latency_ms,
                    answer: letter,
                });
                Some(EvaluationOutcome::answered(
                    domain,
                    question_id,
                    letter,
                    invocation.latency_ms,
                ))
            }
            Err(e) => {
                warn!(
                    "{}: could not save answer for question {}: {}",
                    domain, question_id, e
                );
                progress.publish(&ProgressEvent::QuestionFailed {
                    domain,
                    question_id,
                    error: e.to_string(),
                });
                Some(EvaluationOutcome::failed(
                    domain,
                    question_id,
                    e.to_string(),
                    Some(invocation.latency_ms),
                ))
            }
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation_token
            .as_ref()
            .is_some_and(|token| token.is_cancelled())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::completion_provider::{CompletionRequest, ProviderError};
    use crate::ports::question_store::StoreError;
    use async_trait::async_trait;
    use quizbench_domain::{AnswerLetter, AnsweredRecord, NewQuestion, QuestionId};
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;
    use std::time::Duration;

    // ==================== Fakes ====================

    /// In-memory store recording every write
    #[derive(Default)]
    struct MemoryStore {
        questions: Mutex<Vec<Question>>,
        writes: Mutex<Vec<(Domain, QuestionId, RecordedAnswer)>>,
        failing_lists: HashSet<Domain>,
        failing_writes: HashSet<QuestionId>,
    }

    impl MemoryStore {
        fn with_questions(questions: Vec<Question>) -> Self {
            Self {
                questions: Mutex::new(questions),
                ..Default::default()
            }
        }

        fn writes(&self) -> Vec<(Domain, QuestionId, RecordedAnswer)> {
            self.writes.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl QuestionStore for MemoryStore {
        async fn list(
            &self,
            domain: Domain,
            filter: AnswerFilter,
        ) -> Result<Vec<Question>, StoreError> {
            if self.failing_lists.contains(&domain) {
                return Err(StoreError::Read("database is locked".to_string()));
            }
            Ok(self
                .questions
                .lock()
                .unwrap()
                .iter()
                .filter(|q| q.domain == domain && filter.matches(q.is_answered))
                .cloned()
                .collect())
        }

        async fn list_answered(&self, _domain: Domain) -> Result<Vec<AnsweredRecord>, StoreError> {
            Ok(Vec::new())
        }

        async fn record_answer(
            &self,
            domain: Domain,
            id: QuestionId,
            answer: &RecordedAnswer,
        ) -> Result<Question, StoreError> {
            if self.failing_writes.contains(&id) {
                return Err(StoreError::Write("disk full".to_string()));
            }
            self.writes.lock().unwrap().push((domain, id, answer.clone()));
            let mut questions = self.questions.lock().unwrap();
            let question = questions
                .iter_mut()
                .find(|q| q.domain == domain && q.id == id)
                .ok_or(StoreError::NotFound { domain, id })?;
            question.model_response = Some(answer.model_response.to_string());
            question.response_time_ms = Some(answer.response_time_ms);
            question.is_answered = true;
            Ok(question.clone())
        }

        async fn count(&self, domain: Domain) -> Result<usize, StoreError> {
            Ok(self.list(domain, AnswerFilter::All).await?.len())
        }

        async fn insert_many(
            &self,
            _domain: Domain,
            _questions: Vec<NewQuestion>,
        ) -> Result<usize, StoreError> {
            Ok(0)
        }
    }

    /// Provider answering by question text; unknown prompts fail
    struct KeyedProvider {
        answers: HashMap<String, Result<String, ProviderError>>,
        calls: Mutex<usize>,
    }

    impl KeyedProvider {
        fn new(answers: Vec<(&str, Result<String, ProviderError>)>) -> Self {
            Self {
                answers: answers
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v))
                    .collect(),
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl CompletionProvider for KeyedProvider {
        async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
            *self.calls.lock().unwrap() += 1;
            self.answers
                .iter()
                .find(|(key, _)| request.user.contains(key.as_str()))
                .map(|(_, answer)| answer.clone())
                .unwrap_or_else(|| Err(ProviderError::Other("unexpected prompt".to_string())))
        }
    }

    /// Publisher recording every event
    #[derive(Default)]
    struct RecordingProgress {
        events: Mutex<Vec<ProgressEvent>>,
    }

    impl RecordingProgress {
        fn kinds(&self) -> Vec<&'static str> {
            self.events.lock().unwrap().iter().map(|e| e.kind()).collect()
        }
    }

    impl ProgressPublisher for RecordingProgress {
        fn publish(&self, event: &ProgressEvent) {
            self.events.lock().unwrap().push(event.clone());
        }
    }

    fn question(id: i64, domain: Domain, text: &str) -> Question {
        Question {
            id: QuestionId::new(id),
            domain,
            prompt_text: text.to_string(),
            options: [
                "one".to_string(),
                "two".to_string(),
                "three".to_string(),
                "four".to_string(),
            ],
            expected_answer: "A".to_string(),
            model_response: None,
            response_time_ms: None,
            is_answered: false,
        }
    }

    fn params() -> InvokerParams {
        InvokerParams::default()
            .with_retries(2)
            .with_backoff_base(Duration::from_millis(1))
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_failed_question_does_not_stop_pass() {
        let store = Arc::new(MemoryStore::with_questions(vec![
            question(1, Domain::History, "first"),
            question(2, Domain::History, "second"),
            question(3, Domain::History, "third"),
        ]));
        let provider = Arc::new(KeyedProvider::new(vec![
            ("first", Ok("A".to_string())),
            ("second", Err(ProviderError::Timeout)),
            ("third", Ok("c".to_string())),
        ]));
        let use_case = RunEvaluationUseCase::new(store.clone(), provider.clone(), params());
        let progress = RecordingProgress::default();

        let report = use_case
            .execute_with_progress(RunEvaluationInput::new([Domain::History]), &progress)
            .await;

        assert_eq!(report.total_processed, 2);
        assert_eq!(report.failed, 1);
        assert!(!report.cancelled);

        let written: Vec<_> = store.writes().iter().map(|(_, id, a)| (*id, a.model_response)).collect();
        assert_eq!(
            written,
            vec![
                (QuestionId::new(1), AnswerLetter::A),
                (QuestionId::new(3), AnswerLetter::C),
            ]
        );
        // Question 2 retried once
        assert_eq!(provider.calls(), 4);
        assert_eq!(
            progress.kinds(),
            vec![
                "started",
                "question_ok",
                "question_failed",
                "question_ok",
                "completed"
            ]
        );
    }

    #[tokio::test]
    async fn test_unusable_answer_is_not_persisted() {
        let store = Arc::new(MemoryStore::with_questions(vec![question(
            7,
            Domain::SocialScience,
            "norms",
        )]));
        let provider = Arc::new(KeyedProvider::new(vec![("norms", Ok("  e\n".to_string()))]));
        let use_case = RunEvaluationUseCase::new(store.clone(), provider, params());
        let progress = RecordingProgress::default();

        let report = use_case
            .execute_with_progress(RunEvaluationInput::new([Domain::SocialScience]), &progress)
            .await;

        assert_eq!(report.total_processed, 0);
        assert_eq!(report.unparseable, 1);
        assert!(store.writes().is_empty());
        assert_eq!(
            report.outcomes[0].status,
            OutcomeStatus::Unparseable {
                raw: "e".to_string()
            }
        );
        assert_eq!(
            progress.kinds(),
            vec!["started", "invalid_answer", "completed"]
        );

        // Still pending for the next pass
        let pending = store
            .list(Domain::SocialScience, AnswerFilter::Unanswered)
            .await
            .unwrap();
        assert_eq!(pending.len(), 1);
    }

    #[tokio::test]
    async fn test_persisted_latency_matches_event() {
        let store = Arc::new(MemoryStore::with_questions(vec![question(
            1,
            Domain::History,
            "rome",
        )]));
        let provider = Arc::new(KeyedProvider::new(vec![("rome", Ok("The answer is B".to_string()))]));
        let use_case = RunEvaluationUseCase::new(store.clone(), provider, params());
        let progress = RecordingProgress::default();

        use_case
            .execute_with_progress(RunEvaluationInput::new([Domain::History]), &progress)
            .await;

        let writes = store.writes();
        assert_eq!(writes.len(), 1);
        // First A-D letter anywhere in the reply
        assert_eq!(writes[0].2.model_response, AnswerLetter::A);

        let events = progress.events.lock().unwrap();
        match &events[1] {
            ProgressEvent::QuestionOk { latency_ms, .. } => {
                assert_eq!(*latency_ms, writes[0].2.response_time_ms)
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_and_failing_domains() {
        let mut store = MemoryStore::with_questions(vec![question(5, Domain::ComputerSecurity, "xss")]);
        store.failing_lists.insert(Domain::History);
        let store = Arc::new(store);
        let provider = Arc::new(KeyedProvider::new(vec![("xss", Ok("D".to_string()))]));
        let use_case = RunEvaluationUseCase::new(store, provider, params());
        let progress = RecordingProgress::default();

        let report = use_case
            .execute_with_progress(RunEvaluationInput::all(), &progress)
            .await;

        assert_eq!(report.total_processed, 1);
        assert_eq!(report.failed_domains, vec![Domain::History]);
        assert_eq!(
            progress.kinds(),
            vec![
                "started",
                "domain_failed",
                "started",
                "no_work",
                "started",
                "question_ok",
                "completed"
            ]
        );
    }

    #[tokio::test]
    async fn test_write_failure_counts_as_failed() {
        let mut store = MemoryStore::with_questions(vec![
            question(1, Domain::History, "first"),
            question(2, Domain::History, "second"),
        ]);
        store.failing_writes.insert(QuestionId::new(1));
        let store = Arc::new(store);
        let provider = Arc::new(KeyedProvider::new(vec![
            ("first", Ok("B".to_string())),
            ("second", Ok("B".to_string())),
        ]));
        let use_case = RunEvaluationUseCase::new(store.clone(), provider, params());

        let report = use_case
            .execute(RunEvaluationInput::new([Domain::History]))
            .await;

        assert_eq!(report.total_processed, 1);
        assert_eq!(report.failed, 1);
        assert!(report.outcomes[0].latency_ms.is_some());
        assert_eq!(store.writes().len(), 1);
    }

    #[tokio::test]
    async fn test_second_pass_has_no_work() {
        let store = Arc::new(MemoryStore::with_questions(vec![question(
            1,
            Domain::History,
            "first",
        )]));
        let provider = Arc::new(KeyedProvider::new(vec![("first", Ok("A".to_string()))]));
        let use_case = RunEvaluationUseCase::new(store, provider.clone(), params());

        let first = use_case.execute(RunEvaluationInput::new([Domain::History])).await;
        let second = use_case.execute(RunEvaluationInput::new([Domain::History])).await;

        assert_eq!(first.total_processed, 1);
        assert_eq!(second.total_processed, 0);
        assert!(second.outcomes.is_empty());
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_cancelled_pass_reports_cancelled() {
        let store = Arc::new(MemoryStore::with_questions(vec![question(
            1,
            Domain::History,
            "first",
        )]));
        let provider = Arc::new(KeyedProvider::new(vec![("first", Ok("A".to_string()))]));
        let token = CancellationToken::new();
        token.cancel();
        let use_case =
            RunEvaluationUseCase::new(store.clone(), provider.clone(), params()).with_cancellation(token);
        let progress = RecordingProgress::default();

        let report = use_case
            .execute_with_progress(RunEvaluationInput::new([Domain::History]), &progress)
            .await;

        assert!(report.cancelled);
        assert_eq!(provider.calls(), 0);
        assert!(store.writes().is_empty());
        assert_eq!(progress.kinds(), vec!["started", "cancelled"]);
    }

    #[test]
    fn test_input_dedups_domains() {
        let input = RunEvaluationInput::new([Domain::History, Domain::History, Domain::ComputerSecurity]);
        assert_eq!(input.domains, vec![Domain::History, Domain::ComputerSecurity]);
        assert_eq!(RunEvaluationInput::default().domains, Domain::ALL.to_vec());
    }
}
