// SPDX-License-Identifier: Apache-2.0

//! Pacing rate bookkeeping: `calculatePacingRate`'s overshoot-detection
//! branch and the `time_until_send` / `has_pacing_budget` queries the
//! transport polls before every send.

use crate::{recovery::bandwidth::Bandwidth, time::Timestamp};
use core::time::Duration;
use num_rational::Ratio;

#[derive(Clone, Copy, Debug)]
pub(crate) struct Pacer {
    pacing_rate: Bandwidth,
    last_send_time: Option<Timestamp>,
    bytes_lost_while_detecting_overshoot: u64,
    max_datagram_size: u16,
}

impl Pacer {
    pub fn new(initial_cwnd: u32, initial_gain: Ratio<u64>, max_datagram_size: u16) -> Self {
        let nominal_bandwidth = Bandwidth::new(initial_cwnd as u64, Duration::from_millis(1));
        Self {
            pacing_rate: nominal_bandwidth * initial_gain,
            last_send_time: None,
            bytes_lost_while_detecting_overshoot: 0,
            max_datagram_size,
        }
    }

    pub fn pacing_rate(&self) -> Bandwidth {
        self.pacing_rate
    }

    pub fn set_max_datagram_size(&mut self, max_datagram_size: u16) {
        self.max_datagram_size = self.max_datagram_size.max(max_datagram_size);
    }

    pub fn on_packet_sent(&mut self, now: Timestamp) {
        self.last_send_time = Some(now);
    }

    /// `calculatePacingRate`: recomputes `pacing_rate` for one congestion
    /// event. `bytes_lost` is the total lost this event; `in_startup`
    /// enforces the monotone-during-STARTUP clause.
    #[allow(clippy::too_many_arguments)]
    pub fn calculate_pacing_rate(
        &mut self,
        pacing_gain: Ratio<u64>,
        bandwidth_estimate: Bandwidth,
        at_full_bandwidth: bool,
        min_rtt: Duration,
        initial_cwnd: u32,
        bytes_lost: u64,
        in_startup: bool,
        detect_overshooting: bool,
        bytes_lost_multiplier: u8,
        cwnd_to_calculate_min_pacing_rate: u32,
        has_non_app_limited_sample: bool,
    ) {
        let target_rate = bandwidth_estimate * pacing_gain;

        if at_full_bandwidth {
            self.pacing_rate = target_rate;
        } else {
            if self.pacing_rate.is_zero() && !min_rtt.is_zero() {
                self.pacing_rate = Bandwidth::new(initial_cwnd as u64, min_rtt);
            }

            if detect_overshooting {
                self.bytes_lost_while_detecting_overshoot = self
                    .bytes_lost_while_detecting_overshoot
                    .saturating_add(bytes_lost);

                let lost_enough = has_non_app_limited_sample
                    || self
                        .bytes_lost_while_detecting_overshoot
                        .saturating_mul(bytes_lost_multiplier as u64)
                        > initial_cwnd as u64;

                if self.pacing_rate > target_rate
                    && self.bytes_lost_while_detecting_overshoot > 0
                    && lost_enough
                {
                    let min_pacing_rate = if min_rtt.is_zero() {
                        target_rate
                    } else {
                        Bandwidth::new(cwnd_to_calculate_min_pacing_rate as u64, min_rtt)
                    };
                    self.pacing_rate = target_rate.max(min_pacing_rate);
                    self.bytes_lost_while_detecting_overshoot = 0;
                }
            }

            if in_startup {
                self.pacing_rate = self.pacing_rate.max(target_rate);
            }
        }
    }

    /// The earliest instant a packet of `bytes_in_flight` may depart,
    /// never earlier than `now`.
    pub fn time_until_send(&self, now: Timestamp, bytes_in_flight: u64) -> Timestamp {
        let next_send_time = match self.last_send_time {
            Some(last) if !self.pacing_rate.is_zero() => last + (bytes_in_flight / self.pacing_rate),
            _ => now,
        };
        next_send_time.max(now)
    }

    /// Whether a full datagram may depart immediately.
    pub fn has_pacing_budget(&self, now: Timestamp) -> bool {
        self.time_until_send(now, self.max_datagram_size as u64) <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calculate_pacing_rate_tracks_target_once_full() {
        let mut pacer = Pacer::new(12_000, Ratio::new_raw(2885, 1000), 1200);
        let bw = Bandwidth::new(100_000, Duration::from_secs(1));
        pacer.calculate_pacing_rate(
            Ratio::new_raw(1, 1),
            bw,
            true,
            Duration::from_millis(100),
            12_000,
            0,
            false,
            false,
            2,
            12_000,
            false,
        );
        assert_eq!(bw, pacer.pacing_rate());
    }

    #[test]
    fn startup_pacing_rate_never_drops_below_target() {
        let mut pacer = Pacer::new(12_000, Ratio::new_raw(2885, 1000), 1200);
        pacer.pacing_rate = Bandwidth::new(1, Duration::from_secs(1));
        let bw = Bandwidth::new(100_000, Duration::from_secs(1));
        pacer.calculate_pacing_rate(
            Ratio::new_raw(2885, 1000),
            bw,
            false,
            Duration::from_millis(100),
            12_000,
            0,
            true,
            false,
            2,
            12_000,
            false,
        );
        assert!(pacer.pacing_rate() >= bw * Ratio::new_raw(2885, 1000));
    }

    #[test]
    fn overshoot_detection_lowers_rate_after_enough_loss() {
        let mut pacer = Pacer::new(12_000, Ratio::new_raw(1, 1), 1200);
        let target = Bandwidth::new(1_000, Duration::from_secs(1));
        pacer.pacing_rate = Bandwidth::new(10_000, Duration::from_secs(1));
        pacer.calculate_pacing_rate(
            Ratio::new_raw(1, 1),
            target,
            false,
            Duration::from_millis(100),
            12_000,
            20_000,
            false,
            true,
            2,
            1,
            true,
        );
        assert_eq!(target, pacer.pacing_rate());
        assert_eq!(0, pacer.bytes_lost_while_detecting_overshoot);
    }

    #[test]
    fn has_pacing_budget_true_before_any_send() {
        let pacer = Pacer::new(12_000, Ratio::new_raw(2885, 1000), 1200);
        let now = unsafe { Timestamp::from_duration(Duration::from_secs(1)) };
        assert!(pacer.has_pacing_budget(now));
    }

    #[test]
    fn time_until_send_waits_for_the_paced_interval() {
        let mut pacer = Pacer::new(12_000, Ratio::new_raw(1, 1), 1200);
        pacer.pacing_rate = Bandwidth::new(1_000, Duration::from_secs(1));
        let now = unsafe { Timestamp::from_duration(Duration::from_secs(1)) };
        pacer.on_packet_sent(now);
        let next = pacer.time_until_send(now, 1_000);
        assert_eq!(now + Duration::from_secs(1), next);
    }
}
