//! Shared utilities for use cases.
//!
//! Cancellation checks used between questions, before each model attempt
//! and during backoff sleeps.

use crate::use_cases::invoke_model::InvokeError;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Check if cancellation has been requested.
///
/// Returns `Err(InvokeError::Cancelled)` if the token exists and is cancelled.
pub(crate) fn check_cancelled(token: &Option<CancellationToken>) -> Result<(), InvokeError> {
    if let Some(token) = token
        && token.is_cancelled()
    {
        return Err(InvokeError::Cancelled);
    }
    Ok(())
}

/// Sleep for `duration`, waking early if the token is cancelled.
pub(crate) async fn sleep_cancellable(
    duration: Duration,
    token: &Option<CancellationToken>,
) -> Result<(), InvokeError> {
    match token {
        Some(token) => {
            tokio::select! {
                biased;
                _ = token.cancelled() => Err(InvokeError::Cancelled),
                _ = tokio::time::sleep(duration) => Ok(()),
            }
        }
        None => {
            tokio::time::sleep(duration).await;
            Ok(())
        }
    }
}
