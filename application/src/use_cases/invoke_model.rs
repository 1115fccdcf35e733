//! Model invocation with timing and exponential-backoff retry.
//!
//! [`ModelInvoker`] asks the provider for one question's answer:
//!
//! 1. Build the fixed single-letter request from the question.
//! 2. Time each attempt around the provider call only (backoff sleeps excluded).
//! 3. Treat errors, timeouts and blank content alike; sleep
//!    `backoff_base * 2^attempt` and retry until `retries` attempts are used.
//! 4. Surface a terminal [`InvokeError::Exhausted`] carrying the last error.
//!
//! Nothing is persisted here; the caller decides what to do with the answer.

use crate::config::InvokerParams;
use crate::ports::completion_provider::{CompletionProvider, CompletionRequest, ProviderError};
use crate::use_cases::shared::{check_cancelled, sleep_cancellable};
use quizbench_domain::{PromptTemplate, Question, QuestionId};
use std::sync::Arc;
use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Errors surfaced after the retry loop
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvokeError {
    #[error("Question {question_id}: model call failed after {attempts} attempts: {last_error}")]
    Exhausted {
        question_id: QuestionId,
        attempts: u32,
        last_error: ProviderError,
    },

    #[error("Operation cancelled")]
    Cancelled,
}

impl InvokeError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, InvokeError::Cancelled)
    }
}

/// A successful model answer
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    /// Trimmed raw text returned by the model (not yet normalized)
    pub answer: String,
    /// Wall-clock time of the successful attempt, in milliseconds
    pub latency_ms: f64,
    /// Attempts used, including the successful one
    pub attempts: u32,
}

/// Calls the model for one question with bounded retry
pub struct ModelInvoker<P: CompletionProvider + ?Sized> {
    provider: Arc<P>,
    params: InvokerParams,
    cancellation_token: Option<CancellationToken>,
}

impl<P: CompletionProvider + ?Sized> ModelInvoker<P> {
    pub fn new(provider: Arc<P>, params: InvokerParams) -> Self {
        Self {
            provider,
            params,
            cancellation_token: None,
        }
    }

    /// Stop retrying (and skip pending backoff) once `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    pub fn params(&self) -> &InvokerParams {
        &self.params
    }

    /// The request sent for `question`
    pub fn build_request(&self, question: &Question) -> CompletionRequest {
        CompletionRequest {
            model: self.params.model.clone(),
            system: PromptTemplate::answer_system().to_string(),
            user: PromptTemplate::question_prompt(question),
            temperature: self.params.temperature,
            max_tokens: self.params.max_tokens,
        }
    }

    /// Ask the model for `question`'s answer
    pub async fn invoke(&self, question: &Question) -> Result<Invocation, InvokeError> {
        let request = self.build_request(question);
        let attempts = self.params.attempts();
        let mut last_error = ProviderError::Other("no attempt made".to_string());

        for attempt in 0..attempts {
            check_cancelled(&self.cancellation_token)?;
            debug!(
                "Question {} ({}): attempt {}/{}",
                question.id,
                question.domain,
                attempt + 1,
                attempts
            );

            let start = Instant::now();
            let result = self.call(&request).await;
            let latency_ms = start.elapsed().as_secs_f64() * 1000.0;

            match result {
                Ok(answer) => {
                    return Ok(Invocation {
                        answer,
                        latency_ms,
                        attempts: attempt + 1,
                    });
                }
                Err(e) => {
                    warn!(
                        "Attempt {}/{} failed for question {}: {}",
                        attempt + 1,
                        attempts,
                        question.id,
                        e
                    );
                    last_error = e;
                }
            }

            if attempt + 1 < attempts {
                sleep_cancellable(self.params.backoff_delay(attempt), &self.cancellation_token)
                    .await?;
            }
        }

        Err(InvokeError::Exhausted {
            question_id: question.id,
            attempts,
            last_error,
        })
    }

    /// One provider call, bounded by the attempt timeout, with blank content rejected
    async fn call(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        let text = match self.params.attempt_timeout {
            Some(timeout) => tokio::time::timeout(timeout, self.provider.complete(request))
                .await
                .map_err(|_| ProviderError::Timeout)??,
            None => self.provider.complete(request).await?,
        };

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ProviderError::EmptyResponse);
        }
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use quizbench_domain::Domain;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Provider that replays scripted results and records every request
    struct ScriptedProvider {
        script: Mutex<VecDeque<Result<String, ProviderError>>>,
        requests: Mutex<Vec<CompletionRequest>>,
        latency: Duration,
    }

    impl ScriptedProvider {
        fn new(script: Vec<Result<String, ProviderError>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                requests: Mutex::new(Vec::new()),
                latency: Duration::ZERO,
            }
        }

        fn with_latency(mut self, latency: Duration) -> Self {
            self.latency = latency;
            self
        }

        fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CompletionProvider for ScriptedProvider {
        async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
            self.requests.lock().unwrap().push(request.clone());
            if !self.latency.is_zero() {
                tokio::time::sleep(self.latency).await;
            }
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ProviderError::Other("script exhausted".to_string())))
        }
    }

    fn question() -> Question {
        Question {
            id: QuestionId::new(11),
            domain: Domain::ComputerSecurity,
            prompt_text: "Which is a symmetric cipher?".to_string(),
            options: [
                "RSA".to_string(),
                "AES".to_string(),
                "ECDSA".to_string(),
                "DH".to_string(),
            ],
            expected_answer: "B".to_string(),
            model_response: None,
            response_time_ms: None,
            is_answered: false,
        }
    }

    fn transient() -> Result<String, ProviderError> {
        Err(ProviderError::Status {
            status: 503,
            body: "busy".to_string(),
        })
    }

    fn fast_params() -> InvokerParams {
        InvokerParams::default().with_backoff_base(Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_first_attempt_success() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(" B\n".to_string())]));
        let invoker = ModelInvoker::new(provider.clone(), fast_params());

        let invocation = invoker.invoke(&question()).await.unwrap();
        assert_eq!(invocation.answer, "B");
        assert_eq!(invocation.attempts, 1);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_request_shape() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok("B".to_string())]));
        let invoker = ModelInvoker::new(provider.clone(), fast_params());
        invoker.invoke(&question()).await.unwrap();

        let request = provider.requests.lock().unwrap()[0].clone();
        assert_eq!(request.model, "gpt-4o");
        assert_eq!(request.max_tokens, 5);
        assert_eq!(request.system, PromptTemplate::answer_system());
        assert!(request.user.starts_with("Question: Which is a symmetric cipher?"));
        assert!(request.user.contains("\nB. AES"));
    }

    #[tokio::test]
    async fn test_succeeds_after_k_failures() {
        for k in 0..3u32 {
            let mut script: Vec<_> = (0..k).map(|_| transient()).collect();
            script.push(Ok("C".to_string()));
            let provider = Arc::new(ScriptedProvider::new(script));
            let invoker = ModelInvoker::new(provider.clone(), fast_params().with_retries(3));

            let invocation = invoker.invoke(&question()).await.unwrap();
            assert_eq!(invocation.attempts, k + 1);
            assert_eq!(provider.calls(), (k + 1) as usize);
        }
    }

    #[tokio::test]
    async fn test_always_failing_exhausts_attempts() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Err(ProviderError::Connection("reset".to_string())),
            Err(ProviderError::Timeout),
            transient(),
            Ok("never reached".to_string()),
        ]));
        let invoker = ModelInvoker::new(provider.clone(), fast_params().with_retries(3));

        let err = invoker.invoke(&question()).await.unwrap_err();
        assert_eq!(provider.calls(), 3);
        match err {
            InvokeError::Exhausted {
                question_id,
                attempts,
                last_error,
            } => {
                assert_eq!(question_id, QuestionId::new(11));
                assert_eq!(attempts, 3);
                assert_eq!(
                    last_error,
                    ProviderError::Status {
                        status: 503,
                        body: "busy".to_string()
                    }
                );
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_blank_content_is_retried() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Ok("   ".to_string()),
            Ok("".to_string()),
            Ok("a".to_string()),
        ]));
        let invoker = ModelInvoker::new(provider.clone(), fast_params());

        let invocation = invoker.invoke(&question()).await.unwrap();
        assert_eq!(invocation.answer, "a");
        assert_eq!(invocation.attempts, 3);
    }

    #[tokio::test]
    async fn test_blank_content_on_last_attempt_reports_empty_response() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok("\n".to_string())]));
        let invoker = ModelInvoker::new(provider, fast_params().with_retries(1));

        let err = invoker.invoke(&question()).await.unwrap_err();
        assert!(matches!(
            err,
            InvokeError::Exhausted {
                last_error: ProviderError::EmptyResponse,
                ..
            }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_schedule_and_latency_excludes_sleep() {
        let provider = Arc::new(
            ScriptedProvider::new(vec![transient(), transient(), Ok("D".to_string())])
                .with_latency(Duration::from_millis(50)),
        );
        let params = InvokerParams::default()
            .with_retries(3)
            .with_backoff_base(Duration::from_secs(1));
        let invoker = ModelInvoker::new(provider, params);

        let start = Instant::now();
        let invocation = invoker.invoke(&question()).await.unwrap();
        let elapsed = start.elapsed();

        // 3 calls of 50ms plus 1s + 2s of backoff
        assert!(elapsed >= Duration::from_millis(3150));
        assert!(elapsed < Duration::from_millis(3300));
        assert!(invocation.latency_ms >= 50.0 && invocation.latency_ms < 100.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_attempt_timeout_counts_as_failure() {
        let provider = Arc::new(
            ScriptedProvider::new(vec![Ok("A".to_string())])
                .with_latency(Duration::from_secs(120)),
        );
        let params = fast_params()
            .with_retries(1)
            .with_attempt_timeout(Some(Duration::from_secs(5)));
        let invoker = ModelInvoker::new(provider, params);

        let err = invoker.invoke(&question()).await.unwrap_err();
        assert!(matches!(
            err,
            InvokeError::Exhausted {
                last_error: ProviderError::Timeout,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_cancelled_before_first_attempt() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok("A".to_string())]));
        let token = CancellationToken::new();
        token.cancel();
        let invoker = ModelInvoker::new(provider.clone(), fast_params()).with_cancellation(token);

        let err = invoker.invoke(&question()).await.unwrap_err();
        assert!(err.is_cancelled());
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_backoff_stops_retrying() {
        let provider = Arc::new(ScriptedProvider::new(vec![transient(), Ok("A".to_string())]));
        let params = InvokerParams::default().with_backoff_base(Duration::from_secs(60));
        let token = CancellationToken::new();
        let invoker = ModelInvoker::new(provider.clone(), params).with_cancellation(token.clone());

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            token.cancel();
        });

        let err = invoker.invoke(&question()).await.unwrap_err();
        canceller.await.unwrap();
        assert!(err.is_cancelled());
        assert_eq!(provider.calls(), 1);
    }
}
