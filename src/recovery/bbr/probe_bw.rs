// SPDX-License-Identifier: Apache-2.0

//! PROBE_BW cycles pacing_gain through an 8-slot schedule to probe for
//! extra bandwidth (gain > 1) and drain any resulting queue (gain < 1)
//! while holding cwnd_gain steady, once STARTUP/DRAIN have found and
//! drained the pipe.

use crate::{random::Generator, time::Timestamp};
use core::time::Duration;
use num_rational::Ratio;

/// `BBR.pacing_gain` rotates through this schedule while in PROBE_BW;
/// one slot above unity to probe, one below to drain, the rest at
/// unity to hold steady while delivering the verdict.
pub(crate) const PACING_GAIN_CYCLE: [Ratio<u64>; 8] = [
    Ratio::new_raw(125, 100),
    Ratio::new_raw(75, 100),
    Ratio::new_raw(1, 1),
    Ratio::new_raw(1, 1),
    Ratio::new_raw(1, 1),
    Ratio::new_raw(1, 1),
    Ratio::new_raw(1, 1),
    Ratio::new_raw(1, 1),
];

pub(crate) const CWND_GAIN: Ratio<u64> = super::startup::DERIVED_HIGH_CWND_GAIN;

const UNITY: Ratio<u64> = Ratio::new_raw(1, 1);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ProbeBwState {
    cycle_index: usize,
    cycle_start: Timestamp,
}

impl ProbeBwState {
    /// Enters PROBE_BW with a randomized starting offset in the cycle,
    /// so multiple flows sharing a bottleneck don't probe in lockstep.
    pub fn enter(now: Timestamp, random: &mut dyn Generator) -> Self {
        let offset = crate::random::gen_range_biased(random, 0..=(PACING_GAIN_CYCLE.len() as u64 - 1));
        Self {
            cycle_index: offset as usize,
            cycle_start: now,
        }
    }

    pub fn pacing_gain(&self) -> Ratio<u64> {
        PACING_GAIN_CYCLE[self.cycle_index]
    }

    /// Advances the cycle when the current slot's elapsed time and exit
    /// condition are both satisfied:
    /// - gain == 1: always eligible once `min_rtt` has elapsed.
    /// - gain > 1: only after losses were observed (the probe found the
    ///   limit).
    /// - gain < 1: only once `bytes_in_flight` has drained back to the
    ///   BDP.
    pub fn maybe_advance_cycle(
        &mut self,
        now: Timestamp,
        min_rtt: Duration,
        bytes_in_flight: u64,
        target_cwnd_at_unity_gain: u64,
        losses_observed: bool,
    ) -> bool {
        let elapsed = now.saturating_duration_since(self.cycle_start);
        if elapsed < min_rtt {
            return false;
        }

        let gain = self.pacing_gain();
        let should_advance = if gain == UNITY {
            true
        } else if gain > UNITY {
            losses_observed
        } else {
            bytes_in_flight <= target_cwnd_at_unity_gain
        };

        if should_advance {
            self.cycle_index = (self.cycle_index + 1) % PACING_GAIN_CYCLE.len();
            self.cycle_start = now;
        }

        should_advance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{random, time::Clock as _, time::NoopClock};

    #[test]
    fn enter_picks_an_in_range_offset() {
        let now = NoopClock.get_time();
        let mut generator = random::testing::Generator::default();
        let state = ProbeBwState::enter(now, &mut generator);
        assert!(state.cycle_index < PACING_GAIN_CYCLE.len());
    }

    #[test]
    fn unity_gain_advances_once_min_rtt_elapses() {
        let now = NoopClock.get_time();
        let mut state = ProbeBwState {
            cycle_index: 2,
            cycle_start: now,
        };
        assert!(!state.maybe_advance_cycle(now, Duration::from_millis(50), 0, 0, false));
        assert!(state.maybe_advance_cycle(
            now + Duration::from_millis(50),
            Duration::from_millis(50),
            0,
            0,
            false
        ));
        assert_eq!(3, state.cycle_index);
    }

    #[test]
    fn gain_above_unity_waits_for_losses() {
        let now = NoopClock.get_time();
        let mut state = ProbeBwState {
            cycle_index: 0,
            cycle_start: now,
        };
        let later = now + Duration::from_millis(50);
        assert!(!state.maybe_advance_cycle(later, Duration::from_millis(50), 0, 0, false));
        assert!(state.maybe_advance_cycle(later, Duration::from_millis(50), 0, 0, true));
        assert_eq!(1, state.cycle_index);
    }

    #[test]
    fn gain_below_unity_waits_for_inflight_to_drain() {
        let now = NoopClock.get_time();
        let mut state = ProbeBwState {
            cycle_index: 1,
            cycle_start: now,
        };
        let later = now + Duration::from_millis(50);
        assert!(!state.maybe_advance_cycle(later, Duration::from_millis(50), 2000, 1000, false));
        assert!(state.maybe_advance_cycle(later, Duration::from_millis(50), 900, 1000, false));
        assert_eq!(2, state.cycle_index);
    }
}

