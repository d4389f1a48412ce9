// SPDX-License-Identifier: Apache-2.0

//! Estimates bandwidth from the slope of the send and ack curves.
//!
//! For each acked packet the sampler computes two candidate rates: how
//! fast the sender was sending around that packet (`send_rate`) and how
//! fast the network delivered bytes around its ack (`ack_rate`). The
//! smaller of the two is the sample, since a higher send rate than the
//! path can sustain cannot produce a larger ack rate than the path's
//! actual capacity, and vice versa.

use crate::{
    recovery::{
        bandwidth::Bandwidth,
        bbr::{max_ack_height::MaxAckHeightTracker, packet_number_queue::PacketNumberIndexedQueue},
        packet_number::PacketNumber,
    },
    time::Timestamp,
};
use alloc::collections::VecDeque;
use core::time::Duration;

/// A snapshot of the sampler's running totals, captured at some instant
/// and carried forward on every packet sent after that instant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct SendTimeState {
    pub is_valid: bool,
    pub is_app_limited: bool,
    pub total_bytes_sent: u64,
    pub total_bytes_acked: u64,
    pub total_bytes_lost: u64,
    pub bytes_in_flight: u64,
}

/// What the sampler remembers about a packet between `on_packet_sent` and
/// its eventual ack or loss.
#[derive(Clone, Debug)]
struct ConnectionStateOnSentPacket {
    send_time: Timestamp,
    size: u64,
    total_bytes_sent_at_last_acked_packet: u64,
    last_acked_packet_sent_time: Timestamp,
    last_acked_packet_ack_time: Timestamp,
    send_time_state: SendTimeState,
}

/// One endpoint of the ack curve: the total bytes acked as of `ack_time`.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct AckPoint {
    ack_time: Timestamp,
    total_bytes_acked: u64,
}

/// The two most recent points on the ack curve, used as the A1/A0 pair
/// for `ack_rate`.
#[derive(Clone, Copy, Debug, Default)]
struct RecentAckPoints {
    points: [AckPoint; 2],
}

impl RecentAckPoints {
    fn update(&mut self, ack_time: Timestamp, total_bytes_acked: u64) {
        if ack_time < self.points[1].ack_time {
            // A reordered ack arriving for an earlier send; only the byte
            // count at the most recent point can move.
            self.points[1].total_bytes_acked = total_bytes_acked;
            return;
        }

        if ack_time > self.points[1].ack_time {
            self.points[0] = self.points[1];
        }

        self.points[1] = AckPoint {
            ack_time,
            total_bytes_acked,
        };
    }

    fn clear(&mut self) {
        *self = Self::default();
    }

    fn most_recent_point(&self) -> AckPoint {
        self.points[1]
    }

    /// Falls back to the most recent point if the less recent one was
    /// never populated (byte count still at its default of zero).
    fn less_recent_point(&self) -> AckPoint {
        if self.points[0].total_bytes_acked != 0 {
            self.points[0]
        } else {
            self.points[1]
        }
    }
}

/// The larger of two inputs to [`BandwidthSampler::on_congestion_event`],
/// describing a single packet the transport just learned was acked.
#[derive(Clone, Copy, Debug)]
pub struct AckedPacket {
    pub packet_number: PacketNumber,
    pub bytes_acked: u64,
}

/// A packet the transport just learned was lost.
#[derive(Clone, Copy, Debug)]
pub struct LostPacket {
    pub packet_number: PacketNumber,
    pub bytes_lost: u64,
}

/// One `(bandwidth, rtt)` estimate derived from a single acked packet.
#[derive(Clone, Copy, Debug)]
struct BandwidthSample {
    bandwidth: Bandwidth,
    rtt: Duration,
    is_app_limited: bool,
}

/// The aggregate of every per-packet sample produced by one call to
/// [`BandwidthSampler::on_congestion_event`].
#[derive(Clone, Copy, Debug)]
pub(crate) struct CongestionEventSample {
    pub sample_max_bandwidth: Bandwidth,
    pub sample_is_app_limited: bool,
    /// `None` if no acked packet in this event produced a usable RTT.
    pub sample_rtt: Option<Duration>,
    pub sample_max_inflight: u64,
    pub last_packet_send_state: SendTimeState,
    pub extra_acked: u64,
}

impl Default for CongestionEventSample {
    fn default() -> Self {
        Self {
            sample_max_bandwidth: Bandwidth::ZERO,
            sample_is_app_limited: false,
            sample_rtt: None,
            sample_max_inflight: 0,
            last_packet_send_state: SendTimeState::default(),
            extra_acked: 0,
        }
    }
}

/// The fixed depth of the A0 candidate ring. Overestimate avoidance only
/// ever needs to look back across a handful of acks before it finds a
/// candidate whose byte count exceeds the current ack's.
const MAX_A0_CANDIDATES: usize = 8;

/// Tracks the send and ack curves and samples bandwidth on every ack.
pub(crate) struct BandwidthSampler {
    total_bytes_sent: u64,
    total_bytes_acked: u64,
    total_bytes_lost: u64,
    total_bytes_sent_at_last_acked_packet: u64,
    last_acked_packet_sent_time: Timestamp,
    last_acked_packet_ack_time: Timestamp,
    last_sent_packet: PacketNumber,
    last_acked_packet: PacketNumber,
    is_app_limited: bool,
    end_of_app_limited_phase: PacketNumber,
    connection_state_map: PacketNumberIndexedQueue<ConnectionStateOnSentPacket>,
    recent_ack_points: RecentAckPoints,
    a0_candidates: VecDeque<AckPoint>,
    max_ack_height_tracker: MaxAckHeightTracker,
    overestimate_avoidance: bool,
    limit_max_ack_height_by_send_rate: bool,
}

impl Default for BandwidthSampler {
    fn default() -> Self {
        Self {
            total_bytes_sent: 0,
            total_bytes_acked: 0,
            total_bytes_lost: 0,
            total_bytes_sent_at_last_acked_packet: 0,
            last_acked_packet_sent_time: Timestamp::default(),
            last_acked_packet_ack_time: Timestamp::default(),
            last_sent_packet: PacketNumber::INVALID,
            last_acked_packet: PacketNumber::INVALID,
            is_app_limited: false,
            end_of_app_limited_phase: PacketNumber::INVALID,
            connection_state_map: PacketNumberIndexedQueue::new(),
            recent_ack_points: RecentAckPoints::default(),
            a0_candidates: VecDeque::new(),
            max_ack_height_tracker: MaxAckHeightTracker::new(),
            overestimate_avoidance: false,
            limit_max_ack_height_by_send_rate: false,
        }
    }
}

impl BandwidthSampler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_app_limited(&self) -> bool {
        self.is_app_limited
    }

    pub fn last_sent_packet(&self) -> PacketNumber {
        self.last_sent_packet
    }

    pub fn last_acked_packet(&self) -> PacketNumber {
        self.last_acked_packet
    }

    pub fn total_bytes_sent(&self) -> u64 {
        self.total_bytes_sent
    }

    pub fn total_bytes_acked(&self) -> u64 {
        self.total_bytes_acked
    }

    pub fn total_bytes_lost(&self) -> u64 {
        self.total_bytes_lost
    }

    pub fn max_ack_height(&self) -> u64 {
        self.max_ack_height_tracker.get()
    }

    pub fn num_ack_aggregation_epochs(&self) -> u64 {
        self.max_ack_height_tracker.num_ack_aggregation_epochs()
    }

    pub fn set_max_ack_height_tracker_window_length(&mut self, length: u64) {
        self.max_ack_height_tracker.set_filter_window_length(length);
    }

    pub fn set_start_new_aggregation_epoch_after_full_round(&mut self, value: bool) {
        self.max_ack_height_tracker
            .set_start_new_aggregation_epoch_after_full_round(value);
    }

    pub fn set_reduce_extra_acked_on_bandwidth_increase(&mut self, value: bool) {
        self.max_ack_height_tracker
            .set_reduce_extra_acked_on_bandwidth_increase(value);
    }

    pub fn set_limit_max_ack_height_by_send_rate(&mut self, value: bool) {
        self.limit_max_ack_height_by_send_rate = value;
    }

    /// Switches the A0 selection strategy to favor the most recent
    /// candidate that clearly overtook the ack curve, and raises the
    /// ack-aggregation threshold to 2.0. Idempotent: calling this twice
    /// does not double-apply the threshold bump.
    pub fn enable_overestimate_avoidance(&mut self) {
        if self.overestimate_avoidance {
            return;
        }
        self.overestimate_avoidance = true;
        self.max_ack_height_tracker
            .set_ack_aggregation_bandwidth_threshold(2.0);
    }

    pub fn is_overestimate_avoidance_enabled(&self) -> bool {
        self.overestimate_avoidance
    }

    /// Drops sent-packet bookkeeping for every packet number strictly
    /// less than `least_unacked`; the loss detector considers them gone.
    pub fn remove_obsolete_packets(&mut self, least_unacked: PacketNumber) {
        self.connection_state_map.remove_up_to(least_unacked);
    }

    fn current_send_time_state(&self, bytes_in_flight: u64) -> SendTimeState {
        SendTimeState {
            is_valid: true,
            is_app_limited: self.is_app_limited,
            total_bytes_sent: self.total_bytes_sent,
            total_bytes_acked: self.total_bytes_acked,
            total_bytes_lost: self.total_bytes_lost,
            bytes_in_flight,
        }
    }

    pub fn on_packet_sent(
        &mut self,
        sent_time: Timestamp,
        bytes_in_flight: u64,
        packet_number: PacketNumber,
        bytes: u64,
        is_retransmittable: bool,
    ) {
        self.last_sent_packet = packet_number;

        if !is_retransmittable {
            return;
        }

        self.total_bytes_sent += bytes;

        if bytes_in_flight == 0 {
            // The connection was idle; restart the send curve here so the
            // upcoming send rate isn't diluted by the idle gap.
            self.last_acked_packet_ack_time = sent_time;
            if self.overestimate_avoidance {
                self.recent_ack_points.clear();
                self.a0_candidates.clear();
            }
            self.total_bytes_sent_at_last_acked_packet = self.total_bytes_sent;
            self.last_acked_packet_sent_time = sent_time;
        }

        self.connection_state_map.emplace(
            packet_number,
            ConnectionStateOnSentPacket {
                send_time: sent_time,
                size: bytes,
                total_bytes_sent_at_last_acked_packet: self.total_bytes_sent_at_last_acked_packet,
                last_acked_packet_sent_time: self.last_acked_packet_sent_time,
                last_acked_packet_ack_time: self.last_acked_packet_ack_time,
                send_time_state: self.current_send_time_state(bytes_in_flight),
            },
        );
    }

    pub fn on_app_limited(&mut self) {
        self.is_app_limited = true;
        self.end_of_app_limited_phase = self.last_sent_packet;
    }

    /// Picks the A0 point for overestimate avoidance: the candidate whose
    /// byte count most tightly precedes `total_bytes_acked`, so the ack
    /// rate is measured against the steepest recent stretch of the ack
    /// curve rather than the shallowest.
    ///
    /// The candidate ring is popped strictly before the chosen element;
    /// the chosen element itself is read by value and left at the front
    /// of the ring for the next call. A ring with a single candidate
    /// always returns that candidate without popping anything.
    fn choose_a0_point(&mut self, total_bytes_acked: u64) -> Option<AckPoint> {
        if self.a0_candidates.is_empty() {
            return None;
        }

        if self.a0_candidates.len() == 1 {
            return Some(self.a0_candidates[0]);
        }

        for i in 1..self.a0_candidates.len() {
            if self.a0_candidates[i].total_bytes_acked > total_bytes_acked {
                let chosen_index = i - 1;
                for _ in 0..chosen_index {
                    self.a0_candidates.pop_front();
                }
                return Some(self.a0_candidates[0]);
            }
        }

        // No candidate exceeded the target; fall back to the most recent
        // one, discarding everything older.
        while self.a0_candidates.len() > 1 {
            self.a0_candidates.pop_front();
        }
        self.a0_candidates.back().copied()
    }

    fn record_a0_candidate(&mut self, ack_time: Timestamp, total_bytes_acked: u64) {
        if self.a0_candidates.len() == MAX_A0_CANDIDATES {
            self.a0_candidates.pop_front();
        }
        self.a0_candidates.push_back(AckPoint {
            ack_time,
            total_bytes_acked,
        });
    }

    fn sample_for_acked_packet(
        &mut self,
        ack_time: Timestamp,
        sent: &ConnectionStateOnSentPacket,
    ) -> Option<BandwidthSample> {
        let send_interval = if sent.send_time > sent.last_acked_packet_sent_time {
            Some(sent.send_time - sent.last_acked_packet_sent_time)
        } else {
            None
        };

        let a0 = if self.overestimate_avoidance {
            self.choose_a0_point(sent.send_time_state.total_bytes_acked)
        } else {
            Some(self.recent_ack_points.less_recent_point())
        };

        let ack_interval = a0.and_then(|a0| {
            if ack_time > a0.ack_time {
                Some((ack_time - a0.ack_time, a0.total_bytes_acked))
            } else {
                None
            }
        });

        let rtt = ack_time.saturating_duration_since(sent.send_time);

        let (Some(send_dt), Some((ack_dt, a0_total_bytes_acked))) = (send_interval, ack_interval)
        else {
            // One of the two curves has a zero or negative interval: the
            // rate over it is undefined, so the sample is invalid.
            return Some(BandwidthSample {
                bandwidth: Bandwidth::ZERO,
                rtt,
                is_app_limited: sent.send_time_state.is_app_limited,
            });
        };

        let send_rate = Bandwidth::new(
            sent.send_time_state
                .total_bytes_sent
                .saturating_sub(sent.total_bytes_sent_at_last_acked_packet),
            send_dt,
        );
        let ack_rate = Bandwidth::new(
            self.total_bytes_acked.saturating_sub(a0_total_bytes_acked),
            ack_dt,
        );

        Some(BandwidthSample {
            bandwidth: send_rate.min(ack_rate),
            rtt,
            is_app_limited: sent.send_time_state.is_app_limited,
        })
    }

    /// Feeds the sampler every packet acked or lost in one congestion
    /// event, producing the aggregate sample the mode machine consumes.
    ///
    /// `acked` must already be sorted in ascending packet-number order;
    /// this is a contract the loss detector upholds, not something this
    /// method re-validates. `bandwidth_estimate` and `bandwidth_upper_bound`
    /// are the mode machine's bandwidth estimate and send-rate ceiling
    /// from just before this event, used to seed the ack-aggregation
    /// epoch math and to tell whether this event set a new bandwidth
    /// record.
    #[allow(clippy::too_many_arguments)]
    pub fn on_congestion_event(
        &mut self,
        ack_time: Timestamp,
        acked: &[AckedPacket],
        lost: &[LostPacket],
        bandwidth_estimate: Bandwidth,
        bandwidth_upper_bound: Bandwidth,
        round_trip_count: u64,
    ) -> CongestionEventSample {
        let mut sample = CongestionEventSample::default();
        let mut total_newly_acked_bytes = 0u64;

        let mut largest_lost: Option<(PacketNumber, SendTimeState)> = None;
        for lost_packet in lost {
            self.total_bytes_lost += lost_packet.bytes_lost;
            if let Some(sent) = self.connection_state_map.remove(lost_packet.packet_number) {
                if largest_lost.map_or(true, |(pn, _)| lost_packet.packet_number > pn) {
                    largest_lost = Some((lost_packet.packet_number, sent.send_time_state));
                }
            }
        }

        let mut largest_acked: Option<(PacketNumber, SendTimeState)> = None;

        for acked_packet in acked {
            self.total_bytes_acked += acked_packet.bytes_acked;
            total_newly_acked_bytes += acked_packet.bytes_acked;
            self.last_acked_packet = acked_packet.packet_number;

            let Some(sent) = self.connection_state_map.remove(acked_packet.packet_number) else {
                continue;
            };

            if let Some(bw_sample) = self.sample_for_acked_packet(ack_time, &sent) {
                if bw_sample.bandwidth > sample.sample_max_bandwidth {
                    sample.sample_max_bandwidth = bw_sample.bandwidth;
                    sample.sample_is_app_limited = bw_sample.is_app_limited;
                }
                sample.sample_rtt = Some(match sample.sample_rtt {
                    Some(current) => current.min(bw_sample.rtt),
                    None => bw_sample.rtt,
                });
            }

            sample.sample_max_inflight = sample
                .sample_max_inflight
                .max(sent.send_time_state.bytes_in_flight);

            if largest_acked.map_or(true, |(pn, _)| acked_packet.packet_number > pn) {
                largest_acked = Some((acked_packet.packet_number, sent.send_time_state));
            }

            if self.overestimate_avoidance {
                self.record_a0_candidate(ack_time, self.total_bytes_acked);
            }
            self.recent_ack_points.update(ack_time, self.total_bytes_acked);

            self.total_bytes_sent_at_last_acked_packet = sent.send_time_state.total_bytes_sent;
            self.last_acked_packet_sent_time = sent.send_time;
            self.last_acked_packet_ack_time = ack_time;
        }

        sample.last_packet_send_state = largest_acked
            .or(largest_lost)
            .map(|(_, state)| state)
            .unwrap_or_default();

        let bandwidth_for_height = if self.limit_max_ack_height_by_send_rate {
            bandwidth_estimate.min(bandwidth_upper_bound)
        } else {
            bandwidth_estimate
        };
        let is_new_max_bandwidth = sample.sample_max_bandwidth > bandwidth_estimate;

        if total_newly_acked_bytes > 0 {
            sample.extra_acked = self.max_ack_height_tracker.update(
                bandwidth_for_height,
                is_new_max_bandwidth,
                round_trip_count,
                self.last_sent_packet,
                self.last_acked_packet,
                ack_time,
                total_newly_acked_bytes,
            );
        }

        if self.last_sent_packet > self.end_of_app_limited_phase {
            self.is_app_limited = false;
        }

        sample
    }
}
