use std::time::Duration;
use tokio::time::sleep;

/// How many times a lookup is repeated and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            delay: Duration::from_secs(5),
        }
    }
}

/// Constant-delay retry counter. Indexing lag on a node is short and bounded,
/// so the delay does not grow between attempts.
#[derive(Debug)]
pub struct FixedDelay {
    delay: Duration,
    max_retries: u32,
    current_attempt: u32,
}

#[derive(Debug, PartialEq, Eq)]
pub struct MaxRetriesExceeded;

impl std::fmt::Display for MaxRetriesExceeded {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Maximum retry attempts exceeded")
    }
}

impl std::error::Error for MaxRetriesExceeded {}

impl FixedDelay {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            delay: policy.delay,
            max_retries: policy.max_retries,
            current_attempt: 0,
        }
    }

    /// Wait before the next retry, or fail once `max_retries` waits were spent.
    pub async fn sleep(&mut self) -> Result<(), MaxRetriesExceeded> {
        if self.current_attempt >= self.max_retries {
            return Err(MaxRetriesExceeded);
        }

        sleep(self.delay).await;
        self.current_attempt += 1;
        Ok(())
    }

    /// Retries spent so far.
    pub fn attempts(&self) -> u32 {
        self.current_attempt
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}
