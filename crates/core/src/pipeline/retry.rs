//! Authorization-retry state machine
//!
//! Tracks one original call through `Sending -> Renewing -> Resending`.
//! The bound counts every dispatch of the call, the first one included.
//! Once any redispatch has happened, reaching the bound is terminal whatever
//! the last status was.

/// Where a call is in the protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    /// First dispatch in flight
    Sending,
    /// Waiting on a token renewal
    Renewing,
    /// A redispatch after renewal is in flight
    Resending,
    /// A response is being handed to normal processing
    Delivered,
    /// Bound reached; the call fails as unauthorized
    Exhausted,
}

/// What the caller does with the latest response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    Deliver,
    Renew,
    Exhausted,
}

#[derive(Debug, Clone)]
pub struct AuthRetry {
    max_attempts: u32,
    attempts: u32,
    state: RetryState,
}

impl AuthRetry {
    /// `max_attempts` is clamped to at least one dispatch.
    pub fn new(max_attempts: u32) -> Self {
        Self { max_attempts: max_attempts.max(1), attempts: 0, state: RetryState::Sending }
    }

    /// Count a dispatch about to go out.
    pub fn record_dispatch(&mut self) {
        self.attempts += 1;
        self.state = if self.attempts == 1 { RetryState::Sending } else { RetryState::Resending };
    }

    /// Feed the status of the dispatch just recorded.
    pub fn observe(&mut self, unauthorized: bool) -> RetryDecision {
        let at_bound = self.attempts >= self.max_attempts;
        let decision = if !unauthorized && !(self.has_retried() && at_bound) {
            RetryDecision::Deliver
        } else if at_bound {
            RetryDecision::Exhausted
        } else {
            RetryDecision::Renew
        };

        self.state = match decision {
            RetryDecision::Deliver => RetryState::Delivered,
            RetryDecision::Renew => RetryState::Renewing,
            RetryDecision::Exhausted => RetryState::Exhausted,
        };
        decision
    }

    /// Renewal left nothing to redispatch with.
    pub fn exhaust(&mut self) {
        self.state = RetryState::Exhausted;
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn state(&self) -> RetryState {
        self.state
    }

    pub fn has_retried(&self) -> bool {
        self.attempts > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drive(retry: &mut AuthRetry, statuses: &[bool]) -> Vec<RetryDecision> {
        statuses
            .iter()
            .map(|unauthorized| {
                retry.record_dispatch();
                retry.observe(*unauthorized)
            })
            .collect()
    }

    #[test]
    fn first_success_is_delivered() {
        let mut retry = AuthRetry::new(5);
        assert_eq!(drive(&mut retry, &[false]), vec![RetryDecision::Deliver]);
        assert_eq!(retry.state(), RetryState::Delivered);
        assert!(!retry.has_retried());
    }

    #[test]
    fn always_unauthorized_exhausts_after_five_dispatches() {
        let mut retry = AuthRetry::new(5);
        let decisions = drive(&mut retry, &[true; 5]);

        assert_eq!(&decisions[..4], &[RetryDecision::Renew; 4]);
        assert_eq!(decisions[4], RetryDecision::Exhausted);
        assert_eq!(retry.attempts(), 5);
        assert_eq!(retry.state(), RetryState::Exhausted);
    }

    #[test]
    fn recovery_mid_retry_is_delivered() {
        let mut retry = AuthRetry::new(5);
        assert_eq!(drive(&mut retry, &[true, false]), vec![RetryDecision::Renew, RetryDecision::Deliver]);
        assert!(retry.has_retried());
    }

    #[test]
    fn success_on_the_final_redispatch_is_still_terminal() {
        let mut retry = AuthRetry::new(5);
        let decisions = drive(&mut retry, &[true, true, true, true, false]);
        assert_eq!(decisions[4], RetryDecision::Exhausted);
    }

    #[test]
    fn bound_of_one_never_renews() {
        let mut retry = AuthRetry::new(0);
        assert_eq!(retry.max_attempts(), 1);
        assert_eq!(drive(&mut retry, &[true]), vec![RetryDecision::Exhausted]);

        let mut retry = AuthRetry::new(1);
        assert_eq!(drive(&mut retry, &[false]), vec![RetryDecision::Deliver]);
    }
}
