/// Why a reception ended without a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiveFault {
    /// The burst did not fit in the receive memory. The channel was armed and works; the
    /// capture is lost.
    Overrun,
    /// The channel could not be armed.
    Arm,
}

/// What the receive loop should do after a [`ReceiveFault`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RearmAction {
    /// Drop the capture and arm again right away.
    Rearm,
    /// Wait this many milliseconds before arming again.
    RetryAfter(u32),
    /// Give up on the receiver.
    Escalate,
}

/// Decides how long to wait before re-arming a receiver that failed to arm, and when to
/// give up.
///
/// The delay starts at `base_delay_ms` and doubles with every consecutive failure, capped
/// at `max_delay_ms`. Once `max_failures` failures happen in a row,
/// [`record_failure`](Self::record_failure) returns `None` and the caller should escalate.
#[derive(Debug, Clone)]
pub struct RearmPolicy {
    failures: u8,
    max_failures: u8,
    base_delay_ms: u32,
    max_delay_ms: u32,
}

impl RearmPolicy {
    pub const fn new(max_failures: u8, base_delay_ms: u32, max_delay_ms: u32) -> RearmPolicy {
        RearmPolicy {
            failures: 0,
            max_failures,
            base_delay_ms,
            max_delay_ms,
        }
    }

    /// Record a failed arm attempt. Returns the delay before the next attempt.
    pub fn record_failure(&mut self) -> Option<u32> {
        self.failures = self.failures.saturating_add(1);
        if self.failures >= self.max_failures {
            return None;
        }
        // Base fits in 32 bits, so a shift of at most 32 cannot overflow 64 bits
        let shift = (self.failures - 1).min(32);
        let delay = u64::from(self.base_delay_ms) << shift;
        Some(delay.min(u64::from(self.max_delay_ms)) as u32)
    }

    /// Record a reception that produced no frame and decide how to continue.
    ///
    /// Only arm failures count toward escalation. An overrun proves the channel was armed,
    /// so it clears the failure count like a successful reception.
    pub fn on_fault(&mut self, fault: ReceiveFault) -> RearmAction {
        match fault {
            ReceiveFault::Overrun => {
                self.record_success();
                RearmAction::Rearm
            }
            ReceiveFault::Arm => match self.record_failure() {
                Some(delay_ms) => RearmAction::RetryAfter(delay_ms),
                None => RearmAction::Escalate,
            },
        }
    }

    pub fn record_success(&mut self) {
        self.failures = 0;
    }

    pub fn failures(&self) -> u8 {
        self.failures
    }
}

impl Default for RearmPolicy {
    fn default() -> RearmPolicy {
        RearmPolicy::new(5, 10, 1000)
    }
}
