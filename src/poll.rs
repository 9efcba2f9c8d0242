//! Fibonacci backoff polling for slow asynchronous provider operations.
//!
//! The provider answers with transient conflict/lock statuses while a VM is
//! being reconfigured; [`poll`] re-issues the operation until it stabilizes
//! or the try budget runs out. Attempts are strictly sequential and the
//! sleeps block the calling task.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;

use crate::{ApiResponse, Result, SkytapError};

/// Infinite Fibonacci sequence: 1, 1, 2, 3, 5, 8, ...
#[derive(Clone, Copy, Debug)]
pub struct Fibonacci {
    current: u64,
    next: u64,
}

impl Fibonacci {
    pub fn new() -> Self {
        Self {
            current: 1,
            next: 1,
        }
    }

    fn advance(&mut self) -> u64 {
        let term = self.current;
        self.current = self.next;
        self.next = term + self.current;
        term
    }
}

impl Default for Fibonacci {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for Fibonacci {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        Some(self.advance())
    }
}

/// Implemented by operation results the poller can classify.
pub trait HasStatus {
    /// HTTP status code of the result.
    fn status(&self) -> u16;
}

impl HasStatus for ApiResponse {
    fn status(&self) -> u16 {
        self.status
    }
}

/// Repeatedly invokes `attempt` until its status falls outside `retry_codes`
/// or `tries` attempts are exhausted.
///
/// Sleeps `initial_delay` once before the first attempt, then a Fibonacci
/// number of seconds (1, 1, 2, 3, 5, ...) between attempts, advancing the
/// sequence one term per backoff. The first non-retryable result is returned
/// as-is; errors from `attempt` itself propagate immediately. When all
/// `tries` attempts land in `retry_codes` the poll fails with
/// [`SkytapError::RetriesExceeded`] naming `operation`, the try count and
/// the last observed status.
pub async fn poll<T, F, Fut>(
    tries: usize,
    initial_delay: Duration,
    retry_codes: &[u16],
    operation: &str,
    mut attempt: F,
) -> Result<T>
where
    T: HasStatus,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut backoff = Fibonacci::new();
    sleep(initial_delay).await;

    let mut last_status = None;
    for attempt_no in 1..=tries {
        let result = attempt().await?;
        let status = result.status();
        if !retry_codes.contains(&status) {
            return Ok(result);
        }
        last_status = Some(status);

        if attempt_no < tries {
            let delay = backoff.advance();
            #[cfg(feature = "tracing")]
            tracing::debug!(
                "'{operation}' attempt {attempt_no}/{tries} returned {status}; \
                 sleeping {delay} s before retrying"
            );
            sleep(Duration::from_secs(delay)).await;
        }
    }

    Err(SkytapError::RetriesExceeded {
        operation: operation.to_owned(),
        tries,
        last_status,
    })
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;
    use std::time::Duration;

    use tokio::time::Instant;

    use super::{poll, Fibonacci};
    use crate::{ApiResponse, SkytapError};

    fn response(status: u16) -> ApiResponse {
        ApiResponse {
            status,
            body: String::new(),
        }
    }

    #[test]
    fn fibonacci_first_six_terms() {
        let terms: Vec<u64> = Fibonacci::new().take(6).collect();
        assert_eq!(terms, vec![1, 1, 2, 3, 5, 8]);
    }

    #[tokio::test(start_paused = true)]
    async fn non_retryable_first_attempt_returns_after_initial_delay_only() {
        let calls = Cell::new(0usize);
        let start = Instant::now();

        let result = poll(5, Duration::from_secs(3), &[409], "get service", || {
            calls.set(calls.get() + 1);
            async { Ok(response(200)) }
        })
        .await
        .expect("must succeed");

        assert_eq!(result.status, 200);
        assert_eq!(calls.get(), 1);
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn exhaustion_makes_exactly_tries_attempts_with_fibonacci_sleeps() {
        let calls = Cell::new(0usize);
        let start = Instant::now();

        let err = poll(4, Duration::from_secs(7), &[409], "delete service", || {
            calls.set(calls.get() + 1);
            async { Ok(response(409)) }
        })
        .await
        .expect_err("must exhaust retries");

        assert_eq!(calls.get(), 4);
        // initial 7 s plus the first three backoff terms 1 + 1 + 2.
        assert_eq!(start.elapsed(), Duration::from_secs(11));
        match err {
            SkytapError::RetriesExceeded {
                operation,
                tries,
                last_status,
            } => {
                assert_eq!(operation, "delete service");
                assert_eq!(tries, 4);
                assert_eq!(last_status, Some(409));
            }
            other => panic!("expected retries exceeded, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn returns_first_non_retryable_status_in_sequence() {
        let statuses = RefCell::new(VecDeque::from([409u16, 423, 200]));
        let calls = Cell::new(0usize);
        let start = Instant::now();

        let result = poll(3, Duration::ZERO, &[409, 423], "delete service", || {
            calls.set(calls.get() + 1);
            let status = statuses
                .borrow_mut()
                .pop_front()
                .expect("status sequence must not run out");
            async move { Ok(response(status)) }
        })
        .await
        .expect("must succeed on third attempt");

        assert_eq!(result.status, 200);
        assert_eq!(calls.get(), 3);
        assert_eq!(start.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn exhaustion_error_mentions_last_status() {
        let calls = Cell::new(0usize);

        let err = poll(2, Duration::ZERO, &[409], "delete service", || {
            calls.set(calls.get() + 1);
            async { Ok(response(409)) }
        })
        .await
        .expect_err("must exhaust retries");

        assert_eq!(calls.get(), 2);
        assert!(err.to_string().contains("409"));
        assert!(err.to_string().contains("delete service"));
    }

    #[tokio::test(start_paused = true)]
    async fn attempt_errors_propagate_without_retry() {
        let calls = Cell::new(0usize);

        let err = poll(5, Duration::ZERO, &[409], "get service", || {
            calls.set(calls.get() + 1);
            async {
                Err::<ApiResponse, _>(SkytapError::Decode("bad body".to_owned()))
            }
        })
        .await
        .expect_err("must propagate");

        assert_eq!(calls.get(), 1);
        assert!(matches!(err, SkytapError::Decode(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_tries_fails_without_attempting() {
        let calls = Cell::new(0usize);

        let err = poll(0, Duration::ZERO, &[409], "noop", || {
            calls.set(calls.get() + 1);
            async { Ok(response(200)) }
        })
        .await
        .expect_err("must fail");

        assert_eq!(calls.get(), 0);
        match err {
            SkytapError::RetriesExceeded { last_status, .. } => {
                assert_eq!(last_status, None);
            }
            other => panic!("expected retries exceeded, got {other:?}"),
        }
    }
}
