// SPDX-License-Identifier: Apache-2.0

//! Quantifies ack aggregation: the degree to which bytes arrive faster
//! than the current bandwidth estimate would predict, bucketed into
//! epochs and tracked with a windowed max filter so a single burst
//! doesn't permanently inflate the congestion window target.

use crate::{
    recovery::{
        bandwidth::Bandwidth,
        bbr::windowed_filter::{Filter, MaxFilter, WindowedFilter},
        packet_number::PacketNumber,
    },
    time::Timestamp,
};
use core::time::Duration;

/// Default number of rounds the max-ack-height filter spans.
pub(crate) const DEFAULT_FILTER_WINDOW_LENGTH: u64 = 10;

/// Default threshold: a new aggregation epoch opens once the ack arrival
/// rate falls to or below `threshold * expected_rate`.
pub(crate) const DEFAULT_AGGREGATION_BANDWIDTH_THRESHOLD: f64 = 1.0;

#[derive(Clone, Copy, Debug, Default)]
struct ExtraAckedEvent {
    extra_acked: u64,
    bytes_acked: u64,
    time_delta: Duration,
    round: u64,
}

impl PartialEq for ExtraAckedEvent {
    fn eq(&self, other: &Self) -> bool {
        self.extra_acked == other.extra_acked
    }
}

impl PartialOrd for ExtraAckedEvent {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        self.extra_acked.partial_cmp(&other.extra_acked)
    }
}

pub(crate) struct MaxAckHeightTracker {
    filter: WindowedFilter<ExtraAckedEvent, u64, u64, MaxFilter>,
    aggregation_epoch_start_time: Option<Timestamp>,
    aggregation_epoch_bytes: u64,
    last_sent_packet_number_before_epoch: PacketNumber,
    num_ack_aggregation_epochs: u64,
    ack_aggregation_bandwidth_threshold: f64,
    start_new_aggregation_epoch_after_full_round: bool,
    reduce_extra_acked_on_bandwidth_increase: bool,
}

impl Default for MaxAckHeightTracker {
    fn default() -> Self {
        Self {
            filter: WindowedFilter::new(DEFAULT_FILTER_WINDOW_LENGTH),
            aggregation_epoch_start_time: None,
            aggregation_epoch_bytes: 0,
            last_sent_packet_number_before_epoch: PacketNumber::INVALID,
            num_ack_aggregation_epochs: 0,
            ack_aggregation_bandwidth_threshold: DEFAULT_AGGREGATION_BANDWIDTH_THRESHOLD,
            start_new_aggregation_epoch_after_full_round: false,
            reduce_extra_acked_on_bandwidth_increase: false,
        }
    }
}

impl MaxAckHeightTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> u64 {
        self.filter.best().map_or(0, |e| e.extra_acked)
    }

    pub fn num_ack_aggregation_epochs(&self) -> u64 {
        self.num_ack_aggregation_epochs
    }

    pub fn set_filter_window_length(&mut self, length: u64) {
        self.filter.set_window_length(length);
    }

    pub fn reset(&mut self, new_height: u64, new_time: u64) {
        self.filter.reset(
            ExtraAckedEvent {
                extra_acked: new_height,
                round: new_time,
                ..Default::default()
            },
            new_time,
        );
    }

    pub fn set_ack_aggregation_bandwidth_threshold(&mut self, threshold: f64) {
        self.ack_aggregation_bandwidth_threshold = threshold;
    }

    pub fn ack_aggregation_bandwidth_threshold(&self) -> f64 {
        self.ack_aggregation_bandwidth_threshold
    }

    pub fn set_start_new_aggregation_epoch_after_full_round(&mut self, value: bool) {
        self.start_new_aggregation_epoch_after_full_round = value;
    }

    pub fn set_reduce_extra_acked_on_bandwidth_increase(&mut self, value: bool) {
        self.reduce_extra_acked_on_bandwidth_increase = value;
    }

    /// Feeds the tracker with this congestion event's bandwidth estimate
    /// and acked-byte count, returning the extra bytes acked beyond what
    /// the bandwidth estimate predicted for this epoch (0 if no epoch is
    /// in progress yet, or one was just (re)started).
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        bandwidth_estimate: Bandwidth,
        is_new_max_bandwidth: bool,
        round_trip_count: u64,
        last_sent_packet_number: PacketNumber,
        last_acked_packet_number: PacketNumber,
        ack_time: Timestamp,
        bytes_acked: u64,
    ) -> u64 {
        if self.reduce_extra_acked_on_bandwidth_increase && is_new_max_bandwidth {
            self.reduce_extra_acked(bandwidth_estimate);
        }

        let mut force_new_epoch = false;

        if self.start_new_aggregation_epoch_after_full_round
            && self.last_sent_packet_number_before_epoch.is_valid()
            && last_acked_packet_number.is_valid()
            && last_acked_packet_number > self.last_sent_packet_number_before_epoch
        {
            force_new_epoch = true;
        }

        if self.aggregation_epoch_start_time.is_none() || force_new_epoch {
            self.start_new_epoch(bytes_acked, ack_time, last_sent_packet_number);
            return 0;
        }

        let epoch_start_time = self
            .aggregation_epoch_start_time
            .expect("checked above");
        let aggregation_delta = ack_time.saturating_duration_since(epoch_start_time);
        let expected_bytes_acked = bandwidth_estimate * aggregation_delta;

        if (self.aggregation_epoch_bytes as f64)
            <= self.ack_aggregation_bandwidth_threshold * expected_bytes_acked as f64
        {
            self.start_new_epoch(bytes_acked, ack_time, last_sent_packet_number);
            return 0;
        }

        self.aggregation_epoch_bytes += bytes_acked;
        let extra_bytes_acked = self.aggregation_epoch_bytes.saturating_sub(expected_bytes_acked);

        let event = ExtraAckedEvent {
            extra_acked: extra_bytes_acked,
            bytes_acked: self.aggregation_epoch_bytes,
            time_delta: aggregation_delta,
            round: round_trip_count,
        };
        self.filter.update(event, round_trip_count);

        extra_bytes_acked
    }

    fn start_new_epoch(
        &mut self,
        bytes_acked: u64,
        ack_time: Timestamp,
        last_sent_packet_number: PacketNumber,
    ) {
        self.aggregation_epoch_bytes = bytes_acked;
        self.aggregation_epoch_start_time = Some(ack_time);
        self.last_sent_packet_number_before_epoch = last_sent_packet_number;
        self.num_ack_aggregation_epochs += 1;
    }

    fn reduce_extra_acked(&mut self, bandwidth_estimate: Bandwidth) {
        let best = self.filter.best();
        let second_best = self.filter.second_best();
        let third_best = self.filter.third_best();
        self.filter.clear();

        for event in [best, second_best, third_best].into_iter().flatten() {
            let expected_bytes_acked = bandwidth_estimate * event.time_delta;
            if expected_bytes_acked < event.bytes_acked {
                let recalculated = ExtraAckedEvent {
                    extra_acked: event.bytes_acked - expected_bytes_acked,
                    ..event
                };
                self.filter.update(recalculated, recalculated.round);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::{Clock, NoopClock};

    #[test]
    fn first_update_opens_an_epoch_and_returns_zero() {
        let mut tracker = MaxAckHeightTracker::new();
        let now = NoopClock.get_time();
        let extra = tracker.update(
            Bandwidth::new(1000, Duration::from_secs(1)),
            false,
            0,
            PacketNumber::new(1),
            PacketNumber::new(1),
            now,
            1200,
        );
        assert_eq!(0, extra);
        assert_eq!(1, tracker.num_ack_aggregation_epochs());
    }

    #[test]
    fn aggregation_burst_yields_increasing_extra_acked() {
        let mut tracker = MaxAckHeightTracker::new();
        tracker.set_ack_aggregation_bandwidth_threshold(1.8);
        let bandwidth = Bandwidth::new(10_000, Duration::from_secs(1)); // 80_000 bps
        let mut now = NoopClock.get_time();

        // open the epoch
        tracker.update(
            bandwidth,
            false,
            0,
            PacketNumber::new(1),
            PacketNumber::new(1),
            now,
            1200,
        );

        let mut last_extra = 0;
        for n in 2..8u64 {
            now = now + Duration::from_millis(1);
            let extra = tracker.update(
                bandwidth,
                false,
                0,
                PacketNumber::new(n),
                PacketNumber::new(n),
                now,
                1200,
            );
            assert!(extra >= last_extra, "extra_acked should not regress within a burst");
            last_extra = extra;
        }
        assert!(last_extra > 0);
    }

    #[test]
    fn idle_interval_resets_epoch() {
        let mut tracker = MaxAckHeightTracker::new();
        let bandwidth = Bandwidth::new(10_000, Duration::from_secs(1));
        let now = NoopClock.get_time();

        tracker.update(
            bandwidth,
            false,
            0,
            PacketNumber::new(1),
            PacketNumber::new(1),
            now,
            1200,
        );

        // A long quiescent gap means the ack rate is far below the
        // bandwidth estimate, so the epoch resets and returns 0.
        let later = now + Duration::from_secs(10);
        let extra = tracker.update(
            bandwidth,
            false,
            0,
            PacketNumber::new(2),
            PacketNumber::new(2),
            later,
            100,
        );
        assert_eq!(0, extra);
        assert_eq!(2, tracker.num_ack_aggregation_epochs());
    }
}
