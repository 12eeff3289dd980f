//! Per-call reliability policy: deadlines and automatic retry.
//!
//! Every invocation runs under a wall-clock deadline measured from the
//! first attempt. Methods with a retry policy resubmit the same request
//! after a transient failure, sleeping an exponentially growing delay
//! between attempts; everything else surfaces the first failure as-is.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use crate::error::{Result, SchedulerError};
use crate::method::Method;
use crate::status::RpcCode;

/// Declarative retry rule set for one method.
#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    /// Delay before the first resubmission.
    pub initial_backoff: Duration,
    /// Ceiling on the delay between attempts.
    pub max_backoff: Duration,
    /// Factor applied to the delay after each attempt.
    pub multiplier: f64,
    /// Status codes that trigger a resubmission.
    pub retry_on: &'static [RpcCode],
}

impl RetryPolicy {
    /// Whether a failure with this code should be resubmitted.
    pub fn is_retryable(&self, code: RpcCode) -> bool {
        self.retry_on.contains(&code)
    }
}

/// The complete reliability envelope for one method: an optional retry
/// rule set plus the wall-clock deadline covering all attempts.
#[derive(Clone, Copy, Debug)]
pub struct CallPolicy {
    /// Retry rules; `None` means a single attempt bounded only by the timeout.
    pub retry: Option<RetryPolicy>,
    /// Wall-clock deadline from the start of the first attempt.
    pub timeout: Duration,
}

/// Exponential backoff schedule. Deterministic: the nth delay is
/// `initial * multiplier^(n-1)`, capped at the policy maximum.
struct Backoff {
    delay: Duration,
    max: Duration,
    multiplier: f64,
}

impl Backoff {
    fn new(policy: &RetryPolicy) -> Self {
        Self {
            delay: policy.initial_backoff,
            max: policy.max_backoff,
            multiplier: policy.multiplier,
        }
    }

    fn next_delay(&mut self) -> Duration {
        let delay = self.delay;
        let grown = self.delay.as_secs_f64() * self.multiplier;
        self.delay = Duration::from_secs_f64(grown.min(self.max.as_secs_f64()));
        delay
    }
}

impl CallPolicy {
    /// Run `attempt` under this policy.
    ///
    /// The attempt closure receives a clone of the request and the time
    /// remaining until the deadline, so each attempt can carry the caller's
    /// deadline to the server. Retryable failures are resubmitted per the
    /// backoff schedule; non-retryable failures propagate unmodified; once
    /// the deadline elapses the call fails with
    /// [`SchedulerError::DeadlineExceeded`] regardless of remaining retry
    /// budget. Dropping the returned future aborts any in-progress backoff.
    pub async fn invoke<Req, Res, F, Fut>(
        &self,
        method: Method,
        request: Req,
        mut attempt: F,
    ) -> Result<Res>
    where
        Req: Clone,
        F: FnMut(Req, Duration) -> Fut,
        Fut: Future<Output = Result<Res>>,
    {
        let started = Instant::now();
        let attempts = async {
            let mut backoff = self.retry.as_ref().map(|p| (p, Backoff::new(p)));
            let mut tries: u32 = 0;
            loop {
                tries += 1;
                let remaining = self.timeout.saturating_sub(started.elapsed());
                let error = match attempt(request.clone(), remaining).await {
                    Ok(response) => return Ok(response),
                    Err(error) => error,
                };
                match (&mut backoff, error.rpc_code()) {
                    (Some((policy, schedule)), Some(code)) if policy.is_retryable(code) => {
                        let delay = schedule.next_delay();
                        tracing::debug!(
                            method = method.name(),
                            attempt = tries,
                            code = %code,
                            delay_ms = delay.as_millis() as u64,
                            "transient failure, backing off before resubmitting"
                        );
                        tokio::time::sleep(delay).await;
                    }
                    _ => return Err(error),
                }
            }
        };

        match tokio::time::timeout(self.timeout, attempts).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    method = method.name(),
                    timeout_s = self.timeout.as_secs(),
                    "call abandoned at deadline"
                );
                Err(SchedulerError::DeadlineExceeded {
                    method: method.name(),
                    timeout: self.timeout,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short_policy() -> CallPolicy {
        CallPolicy {
            retry: Some(RetryPolicy {
                initial_backoff: Duration::from_millis(100),
                max_backoff: Duration::from_secs(60),
                multiplier: 1.3,
                retry_on: &[RpcCode::Unavailable, RpcCode::DeadlineExceeded],
            }),
            timeout: Duration::from_secs(600),
        }
    }

    #[test]
    fn test_backoff_schedule_caps_at_max() {
        let policy = RetryPolicy {
            initial_backoff: Duration::from_secs(20),
            max_backoff: Duration::from_secs(60),
            multiplier: 2.0,
            retry_on: &[RpcCode::Unavailable],
        };
        let mut backoff = Backoff::new(&policy);
        assert_eq!(backoff.next_delay(), Duration::from_secs(20));
        assert_eq!(backoff.next_delay(), Duration::from_secs(40));
        assert_eq!(backoff.next_delay(), Duration::from_secs(60));
        assert_eq!(backoff.next_delay(), Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn test_remaining_budget_shrinks_across_attempts() {
        let policy = short_policy();
        let budgets = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let seen = budgets.clone();
        let mut left = 2u32;
        let result = policy
            .invoke(Method::ListJobs, (), move |_, remaining| {
                seen.lock().unwrap().push(remaining);
                let fail = left > 0;
                left = left.saturating_sub(1);
                async move {
                    if fail {
                        Err(SchedulerError::Rpc(crate::status::RpcStatus::unavailable(
                            "try again",
                        )))
                    } else {
                        Ok(())
                    }
                }
            })
            .await;
        assert!(result.is_ok());

        let budgets = budgets.lock().unwrap();
        assert_eq!(budgets.len(), 3);
        assert_eq!(budgets[0], Duration::from_secs(600));
        // Attempts after a backoff sleep see a smaller remaining budget.
        assert!(budgets[1] < budgets[0]);
        assert!(budgets[2] < budgets[1]);
    }
}
