//! Bounded exponential-backoff retry for loads that can fail transiently.
//!
//! Whether a failure is worth retrying is decided by the error type through
//! [`Retryable`], never by inspecting message text.

use std::fmt::Display;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tokio::sync::OnceCell;

use crate::types::errors::{GenerationError, KeywordError, LoadError};

/// Default number of retries after the first attempt.
pub const DEFAULT_RETRIES: u32 = 3;

/// Default delay before the first retry.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(500);

/// Errors that know whether retrying can help.
pub trait Retryable {
    fn is_transient(&self) -> bool;
}

impl Retryable for LoadError {
    fn is_transient(&self) -> bool {
        matches!(self, LoadError::Transient(_))
    }
}

fn is_transient_status(status: u16) -> bool {
    matches!(status, 408 | 429 | 502 | 503 | 504)
}

impl Retryable for GenerationError {
    fn is_transient(&self) -> bool {
        match self {
            GenerationError::Network(_) => true,
            GenerationError::Api { status, .. } => is_transient_status(*status),
            _ => false,
        }
    }
}

impl Retryable for KeywordError {
    fn is_transient(&self) -> bool {
        match self {
            KeywordError::Network(_) => true,
            KeywordError::Api { status, .. } => is_transient_status(*status),
            _ => false,
        }
    }
}

/// How many times to retry and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    retries: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    /// `retries` below 1 is raised to 1.
    pub fn new(retries: u32, base_delay: Duration) -> Self {
        Self {
            retries: retries.max(1),
            base_delay,
        }
    }

    pub fn retries(&self) -> u32 {
        self.retries
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Delay before retry number `attempt_index` (zero-based): `base * 2^attempt_index`.
    pub fn delay_for(&self, attempt_index: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt_index).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_RETRIES, DEFAULT_BASE_DELAY)
    }
}

/// Runs `factory` until it succeeds, fails fatally, or the retries run out.
///
/// Transient failures sleep `policy.delay_for(n)` before retry `n`. The last
/// error is returned unchanged when retries are exhausted.
pub async fn retry_load<T, E, F, Fut>(policy: &RetryPolicy, mut factory: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + Display,
{
    let mut attempt: u32 = 0;
    loop {
        match factory().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt < policy.retries => {
                let delay = policy.delay_for(attempt);
                tracing::warn!(
                    attempt = attempt + 1,
                    max_retries = policy.retries,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "transient failure, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => {
                if err.is_transient() {
                    tracing::error!(attempts = attempt + 1, error = %err, "retries exhausted");
                }
                return Err(err);
            }
        }
    }
}

type BoxedLoad<T> = Pin<Box<dyn Future<Output = Result<T, LoadError>> + Send>>;
type Factory<T> = Box<dyn Fn() -> BoxedLoad<T> + Send + Sync>;

/// A value built on first use by an async factory, retried on transient
/// failures and cached once it succeeds.
///
/// A failed load is not cached; the next `get` starts a fresh retry cycle.
pub struct LazyWithRetry<T> {
    cell: OnceCell<T>,
    factory: Factory<T>,
    policy: RetryPolicy,
}

impl<T> LazyWithRetry<T> {
    pub fn new<F, Fut>(policy: RetryPolicy, factory: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, LoadError>> + Send + 'static,
    {
        Self {
            cell: OnceCell::new(),
            factory: Box::new(move || Box::pin(factory())),
            policy,
        }
    }

    /// Returns the loaded value, running the factory if needed.
    pub async fn get(&self) -> Result<&T, LoadError> {
        self.cell
            .get_or_try_init(|| retry_load(&self.policy, || (self.factory)()))
            .await
    }

    /// Returns the value only if it has already been loaded.
    pub fn loaded(&self) -> Option<&T> {
        self.cell.get()
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}
