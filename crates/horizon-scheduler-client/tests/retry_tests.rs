//! Tests for the per-method reliability policy: retry cadence, deadline
//! enforcement and failure propagation.
//!
//! These run on tokio's paused clock, so sleeps resolve instantly while
//! elapsed time remains observable and exact.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use horizon_scheduler_client::{Method, RpcCode, RpcStatus, SchedulerError};
use tokio::time::Instant;

/// Records the virtual instant of every attempt and fails each attempt
/// with the scripted errors until those run out, then succeeds.
struct Script {
    attempts: Arc<Mutex<Vec<Instant>>>,
    failures: Arc<Mutex<Vec<SchedulerError>>>,
}

impl Script {
    fn failing_with(failures: Vec<SchedulerError>) -> Self {
        Self {
            attempts: Arc::new(Mutex::new(Vec::new())),
            failures: Arc::new(Mutex::new(failures)),
        }
    }

    fn attempt_count(&self) -> usize {
        self.attempts.lock().unwrap().len()
    }

    /// Delays between consecutive attempts.
    fn observed_delays(&self) -> Vec<Duration> {
        let attempts = self.attempts.lock().unwrap();
        attempts.windows(2).map(|w| w[1] - w[0]).collect()
    }

    fn run(
        &self,
    ) -> impl FnMut((), Duration) -> std::future::Ready<Result<(), SchedulerError>> + use<> {
        let attempts = self.attempts.clone();
        let failures = self.failures.clone();
        move |_, _| {
            attempts.lock().unwrap().push(Instant::now());
            let mut failures = failures.lock().unwrap();
            if failures.is_empty() {
                std::future::ready(Ok(()))
            } else {
                std::future::ready(Err(failures.remove(0)))
            }
        }
    }
}

fn unavailable() -> SchedulerError {
    SchedulerError::Rpc(RpcStatus::unavailable("backend unreachable"))
}

#[tokio::test(start_paused = true)]
async fn test_retryable_failures_then_success() {
    // Two unavailable responses, success on the third attempt.
    let script = Script::failing_with(vec![unavailable(), unavailable()]);
    let policy = Method::ListJobs.policy();
    let started = Instant::now();

    let result = policy.invoke(Method::ListJobs, (), script.run()).await;

    assert!(result.is_ok());
    assert_eq!(script.attempt_count(), 3);

    // Backoff follows initial * multiplier^(n-1): 100ms then 130ms.
    let delays = script.observed_delays();
    assert_eq!(delays.len(), 2);
    assert_eq!(delays[0].as_millis(), 100);
    assert_eq!(delays[1].as_millis(), 130);

    // Well inside the retry budget.
    assert!(started.elapsed() < Duration::from_secs(60));
}

#[tokio::test(start_paused = true)]
async fn test_deadline_exceeded_status_is_retried() {
    let script = Script::failing_with(vec![SchedulerError::Rpc(RpcStatus::deadline_exceeded(
        "server side deadline",
    ))]);
    let policy = Method::GetJob.policy();

    let result = policy.invoke(Method::GetJob, (), script.run()).await;

    assert!(result.is_ok());
    assert_eq!(script.attempt_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_non_retrying_method_fails_immediately() {
    // CreateJob carries no retry policy; a single transient failure
    // propagates with zero additional attempts.
    let script = Script::failing_with(vec![unavailable()]);
    let policy = Method::CreateJob.policy();
    let started = Instant::now();

    let result = policy.invoke(Method::CreateJob, (), script.run()).await;

    match result {
        Err(SchedulerError::Rpc(status)) => assert_eq!(status.code, RpcCode::Unavailable),
        other => panic!("expected an unavailable failure, got {other:?}"),
    }
    assert_eq!(script.attempt_count(), 1);
    assert_eq!(started.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_non_retryable_kind_propagates_unmodified() {
    let script = Script::failing_with(vec![SchedulerError::Rpc(RpcStatus::not_found(
        "no such job",
    ))]);
    let policy = Method::ListJobs.policy();

    let result = policy.invoke(Method::ListJobs, (), script.run()).await;

    match result {
        Err(SchedulerError::Rpc(status)) => {
            assert_eq!(status.code, RpcCode::NotFound);
            assert_eq!(status.message, "no such job");
        }
        other => panic!("expected a not-found failure, got {other:?}"),
    }
    assert_eq!(script.attempt_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_connection_errors_are_not_retried() {
    let script = Script::failing_with(vec![SchedulerError::Connection("refused".into())]);
    let policy = Method::ListJobs.policy();

    let result = policy.invoke(Method::ListJobs, (), script.run()).await;

    assert!(matches!(result, Err(SchedulerError::Connection(_))));
    assert_eq!(script.attempt_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_deadline_cuts_off_remaining_retry_budget() {
    // Every attempt fails with a retryable kind; the wall-clock deadline
    // must end the call even though the retry policy never gives up.
    let attempts = Arc::new(Mutex::new(Vec::<Instant>::new()));
    let seen = attempts.clone();
    let policy = Method::ListJobs.policy();
    let started = Instant::now();

    let result = policy
        .invoke(Method::ListJobs, (), move |_, _| {
            seen.lock().unwrap().push(Instant::now());
            std::future::ready(Err::<(), _>(unavailable()))
        })
        .await;

    match result {
        Err(SchedulerError::DeadlineExceeded { method, timeout }) => {
            assert_eq!(method, "ListJobs");
            assert_eq!(timeout, Duration::from_secs(600));
        }
        other => panic!("expected a deadline failure, got {other:?}"),
    }
    assert_eq!(started.elapsed(), Duration::from_secs(600));

    // The schedule grows geometrically and is capped at 60s.
    let attempts = attempts.lock().unwrap();
    let delays: Vec<Duration> = attempts.windows(2).map(|w| w[1] - w[0]).collect();
    assert!(delays.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(delays.last().copied(), Some(Duration::from_secs(60)));
}

#[tokio::test(start_paused = true)]
async fn test_stalled_call_times_out() {
    // An attempt that never completes is abandoned at the deadline even
    // without any failures to retry.
    let policy = Method::RunJob.policy();
    let started = Instant::now();

    let result = policy
        .invoke(Method::RunJob, (), |_, _| std::future::pending::<Result<(), SchedulerError>>())
        .await;

    assert!(matches!(
        result,
        Err(SchedulerError::DeadlineExceeded {
            method: "RunJob",
            ..
        })
    ));
    assert_eq!(started.elapsed(), Duration::from_secs(600));
}

#[tokio::test(start_paused = true)]
async fn test_attempts_carry_remaining_budget() {
    let budgets = Arc::new(Mutex::new(Vec::<Duration>::new()));
    let seen = budgets.clone();
    let mut failures = vec![unavailable()];
    let policy = Method::ListJobs.policy();

    let result = policy
        .invoke(Method::ListJobs, (), move |_, remaining| {
            seen.lock().unwrap().push(remaining);
            if failures.is_empty() {
                std::future::ready(Ok(()))
            } else {
                std::future::ready(Err(failures.remove(0)))
            }
        })
        .await;

    assert!(result.is_ok());
    let budgets = budgets.lock().unwrap();
    assert_eq!(budgets.len(), 2);
    assert_eq!(budgets[0], Duration::from_secs(600));
    assert_eq!(budgets[1], Duration::from_secs(600) - Duration::from_millis(100));
}
