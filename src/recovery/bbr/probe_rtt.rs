// SPDX-License-Identifier: Apache-2.0

//! PROBE_RTT periodically shrinks the window to `min_cwnd` so queued
//! bytes at other points in the path drain and `min_rtt` can be
//! re-measured without interference from self-induced queuing.

use crate::time::Timestamp;
use core::time::Duration;

/// The minimum duration PROBE_RTT holds the window down, once it has
/// actually reached `min_cwnd`.
pub(crate) const PROBE_RTT_DURATION: Duration = Duration::from_millis(200);

/// Whatever mode PROBE_RTT was entered from, so it can be resumed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PriorMode {
    Startup,
    ProbeBw,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ProbeRttState {
    prior_mode: PriorMode,
    /// Set once `bytes_in_flight` first reaches `min_cwnd`; PROBE_RTT
    /// does not exit until this elapses and a full round has passed.
    done_timestamp: Option<Timestamp>,
    round_done: bool,
}

impl ProbeRttState {
    pub fn enter(prior_mode: PriorMode) -> Self {
        Self {
            prior_mode,
            done_timestamp: None,
            round_done: false,
        }
    }

    pub fn prior_mode(&self) -> PriorMode {
        self.prior_mode
    }

    /// Updates the hold timer and round-passed flag; returns whether
    /// PROBE_RTT is done and should hand control back to `prior_mode`.
    pub fn on_congestion_event(
        &mut self,
        bytes_in_flight: u64,
        min_cwnd: u64,
        round_started: bool,
        now: Timestamp,
    ) -> bool {
        if self.done_timestamp.is_none() && bytes_in_flight <= min_cwnd {
            self.done_timestamp = Some(now + PROBE_RTT_DURATION);
            self.round_done = false;
        } else if self.done_timestamp.is_some() && round_started {
            self.round_done = true;
        }

        match self.done_timestamp {
            Some(done_at) => self.round_done && now >= done_at,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::{Clock, NoopClock};

    #[test]
    fn does_not_exit_before_inflight_reaches_floor() {
        let mut state = ProbeRttState::enter(PriorMode::ProbeBw);
        let now = NoopClock.get_time();
        assert!(!state.on_congestion_event(5000, 1000, true, now));
    }

    #[test]
    fn exits_after_duration_and_a_full_round_past_the_floor() {
        let mut state = ProbeRttState::enter(PriorMode::ProbeBw);
        let now = NoopClock.get_time();
        assert!(!state.on_congestion_event(900, 1000, false, now));
        assert!(!state.on_congestion_event(
            900,
            1000,
            true,
            now + Duration::from_millis(199)
        ));
        assert!(state.on_congestion_event(900, 1000, true, now + PROBE_RTT_DURATION));
    }
}
