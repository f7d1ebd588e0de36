//! Unit tests for bounded retry and the lazily loaded value.
//!
//! Timing assertions run on tokio's paused clock, so the backoff delays are
//! checked exactly without sleeping in real time.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use seoforge::services::lazy_retry::{retry_load, LazyWithRetry, RetryPolicy, Retryable};
use seoforge::types::errors::{GenerationError, LoadError};
use tokio::time::Instant;

const BASE: Duration = Duration::from_millis(500);

#[tokio::test(start_paused = true)]
async fn test_transient_twice_then_success_uses_doubling_delays() {
    let policy = RetryPolicy::new(3, BASE);
    let attempts = Arc::new(Mutex::new(Vec::<Instant>::new()));

    let log = attempts.clone();
    let result: Result<&str, LoadError> = retry_load(&policy, || {
        let log = log.clone();
        async move {
            let mut log = log.lock().unwrap();
            log.push(Instant::now());
            if log.len() <= 2 {
                Err(LoadError::Transient("chunk load failed".into()))
            } else {
                Ok("module")
            }
        }
    })
    .await;

    assert_eq!(result, Ok("module"));
    let attempts = attempts.lock().unwrap();
    assert_eq!(attempts.len(), 3);
    assert_eq!(attempts[1] - attempts[0], BASE);
    assert_eq!(attempts[2] - attempts[1], BASE * 2);
}

#[tokio::test(start_paused = true)]
async fn test_fatal_error_is_not_retried() {
    let policy = RetryPolicy::new(3, BASE);
    let calls = AtomicU32::new(0);
    let started = Instant::now();

    let result: Result<(), LoadError> = retry_load(&policy, || {
        calls.fetch_add(1, Ordering::SeqCst);
        async { Err(LoadError::Fatal("syntax error".into())) }
    })
    .await;

    assert_eq!(result, Err(LoadError::Fatal("syntax error".into())));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(started.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_exhausted_retries_return_last_error() {
    let policy = RetryPolicy::new(2, Duration::from_millis(100));
    let calls = AtomicU32::new(0);
    let started = Instant::now();

    let result: Result<(), LoadError> = retry_load(&policy, || {
        let n = calls.fetch_add(1, Ordering::SeqCst);
        async move { Err(LoadError::Transient(format!("attempt {}", n))) }
    })
    .await;

    assert_eq!(result, Err(LoadError::Transient("attempt 2".into())));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(started.elapsed(), Duration::from_millis(300));
}

#[tokio::test(start_paused = true)]
async fn test_zero_retries_is_raised_to_one() {
    let policy = RetryPolicy::new(0, BASE);
    let calls = AtomicU32::new(0);

    let _: Result<(), LoadError> = retry_load(&policy, || {
        calls.fetch_add(1, Ordering::SeqCst);
        async { Err(LoadError::Transient("x".into())) }
    })
    .await;

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_generation_errors_follow_status_taxonomy() {
    let policy = RetryPolicy::new(3, BASE);
    let calls = AtomicU32::new(0);

    let result: Result<(), GenerationError> = retry_load(&policy, || {
        calls.fetch_add(1, Ordering::SeqCst);
        async {
            Err(GenerationError::Api {
                status: 401,
                message: "bad key".into(),
            })
        }
    })
    .await;

    assert!(result.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(!GenerationError::Parse("x".into()).is_transient());
    assert!(GenerationError::Api { status: 504, message: String::new() }.is_transient());
}

#[tokio::test(start_paused = true)]
async fn test_lazy_value_loads_once_and_caches() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    let lazy = LazyWithRetry::new(RetryPolicy::new(3, BASE), move || {
        let counter = counter.clone();
        async move {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            if n == 0 {
                Err(LoadError::Transient("stale chunk".into()))
            } else {
                Ok(format!("loaded after {} attempts", n + 1))
            }
        }
    });

    assert!(lazy.loaded().is_none());
    assert_eq!(lazy.get().await.unwrap(), "loaded after 2 attempts");
    assert_eq!(lazy.get().await.unwrap(), "loaded after 2 attempts");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert!(lazy.loaded().is_some());
}

#[tokio::test(start_paused = true)]
async fn test_lazy_failure_is_not_cached() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    let lazy: LazyWithRetry<u32> = LazyWithRetry::new(RetryPolicy::new(1, BASE), move || {
        let counter = counter.clone();
        async move {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            if n < 1 {
                Err(LoadError::Fatal("offline".into()))
            } else {
                Ok(n)
            }
        }
    });

    assert!(lazy.get().await.is_err());
    assert_eq!(*lazy.get().await.unwrap(), 1);
}
