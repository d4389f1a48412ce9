// SPDX-License-Identifier: Apache-2.0

//! The BBR mode machine: STARTUP, DRAIN, PROBE_BW, and PROBE_RTT, driving
//! pacing rate and congestion window from the samples produced by
//! [`bandwidth_sampler`].
//!
//! Every external entry point takes the values it needs (`now`,
//! `bytes_in_flight`, the acked/lost packet slices) as arguments rather than
//! tracking them independently; the transport remains the single source of
//! truth for what is actually in flight.

mod bandwidth_sampler;
mod drain;
mod max_ack_height;
mod packet_number_queue;
mod pacing;
mod probe_bw;
mod probe_rtt;
mod recovery;
mod round;
mod startup;
mod windowed_filter;

use crate::{
    random::Generator,
    recovery::{
        bandwidth::Bandwidth,
        config::{BbrConfigError, Config},
        packet_number::PacketNumber,
        rtt::RttStats,
        tracer::Tracer,
    },
    time::Timestamp,
};
use core::time::Duration;
use num_rational::Ratio;

pub use bandwidth_sampler::{AckedPacket, LostPacket};
pub use recovery::RecoveryState;

const UNITY: Ratio<u64> = Ratio::new_raw(1, 1);

/// How long a windowed RTT measurement remains valid before the next
/// sample, however large, is taken unconditionally.
const MIN_RTT_EXPIRY: Duration = Duration::from_secs(10);

/// `default_minimum_cwnd`: the floor a congestion window is never allowed
/// to fall below, expressed in datagrams.
const MIN_PIPE_CWND_PACKETS: u64 = 4;

/// The number of rounds the maxBandwidth filter spans: one full PROBE_BW
/// gain cycle plus two rounds of slack.
const MAX_BANDWIDTH_FILTER_WINDOW_ROUNDS: u64 = probe_bw::PACING_GAIN_CYCLE.len() as u64 + 2;

/// Which phase of the mode machine is currently driving pacing and cwnd
/// gains.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Mode {
    /// Doubling the sending rate each round while probing for the
    /// bottleneck.
    Startup,
    /// Draining the queue STARTUP's high gain built up.
    Drain,
    /// Steady state: cycling the pacing gain to probe for more bandwidth
    /// and yield it back.
    ProbeBw(probe_bw::ProbeBwState),
    /// Periodically shrinking the window to re-measure `min_rtt`.
    ProbeRtt(probe_rtt::ProbeRttState),
}

impl Mode {
    fn pacing_gain(&self) -> Ratio<u64> {
        match self {
            Mode::Startup => startup::HIGH_GAIN,
            Mode::Drain => drain::pacing_gain(),
            Mode::ProbeBw(state) => state.pacing_gain(),
            Mode::ProbeRtt(_) => UNITY,
        }
    }

    fn cwnd_gain(&self) -> Ratio<u64> {
        match self {
            Mode::Startup => startup::HIGH_GAIN,
            Mode::Drain => drain::CWND_GAIN,
            Mode::ProbeBw(_) | Mode::ProbeRtt(_) => probe_bw::CWND_GAIN,
        }
    }
}

/// Drives pacing rate and congestion window for one connection.
///
/// Owns its [`bandwidth_sampler::BandwidthSampler`] exclusively; nothing
/// outside this type ever touches it directly. Every method that needs
/// `bytes_in_flight` takes it as an argument instead of tracking sends and
/// acks itself, matching how the sampler's own `on_packet_sent` already
/// requires the caller to supply it.
pub struct BbrSender {
    mode: Mode,
    config: Config,
    max_datagram_size: u16,
    sampler: bandwidth_sampler::BandwidthSampler,
    round_counter: round::RoundCounter,
    max_bandwidth: windowed_filter::WindowedMaxFilter<Bandwidth, u64, u64>,
    min_rtt: Duration,
    min_rtt_timestamp: Option<Timestamp>,
    congestion_window: u64,
    min_congestion_window: u64,
    max_congestion_window: u64,
    initial_congestion_window: u64,
    congestion_window_gain: Ratio<u64>,
    pacer: pacing::Pacer,
    is_at_full_bandwidth: bool,
    rounds_without_bandwidth_gain: u32,
    bandwidth_at_last_round: Bandwidth,
    has_non_app_limited_sample: bool,
    recovery: recovery::RecoveryTracker,
}

impl BbrSender {
    /// Builds a `BbrSender` with the default [`Config`].
    pub fn new(max_datagram_size: u16) -> Result<Self, BbrConfigError> {
        Self::with_config(max_datagram_size, Config::default())
    }

    /// Builds a `BbrSender`, validating `config` against
    /// `max_datagram_size`.
    pub fn with_config(max_datagram_size: u16, config: Config) -> Result<Self, BbrConfigError> {
        config.validate(max_datagram_size)?;

        let initial_congestion_window =
            config.initial_congestion_window_packets as u64 * max_datagram_size as u64;
        let max_congestion_window =
            config.max_congestion_window_packets as u64 * max_datagram_size as u64;
        let min_congestion_window = MIN_PIPE_CWND_PACKETS * max_datagram_size as u64;

        let mut sampler = bandwidth_sampler::BandwidthSampler::new();
        if config.overestimate_avoidance {
            sampler.enable_overestimate_avoidance();
        }
        sampler.set_limit_max_ack_height_by_send_rate(config.limit_max_ack_height_by_send_rate);
        if config.expire_ack_aggregation_in_startup {
            sampler.set_start_new_aggregation_epoch_after_full_round(true);
        }

        Ok(Self {
            mode: Mode::Startup,
            config,
            max_datagram_size,
            sampler,
            round_counter: round::RoundCounter::new(),
            max_bandwidth: windowed_filter::WindowedMaxFilter::new(
                MAX_BANDWIDTH_FILTER_WINDOW_ROUNDS,
            ),
            min_rtt: Duration::ZERO,
            min_rtt_timestamp: None,
            congestion_window: initial_congestion_window,
            min_congestion_window,
            max_congestion_window,
            initial_congestion_window,
            congestion_window_gain: startup::HIGH_GAIN,
            pacer: pacing::Pacer::new(
                initial_congestion_window as u32,
                startup::HIGH_GAIN,
                max_datagram_size,
            ),
            is_at_full_bandwidth: false,
            rounds_without_bandwidth_gain: 0,
            bandwidth_at_last_round: Bandwidth::ZERO,
            has_non_app_limited_sample: false,
            recovery: recovery::RecoveryTracker::new(),
        })
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn bandwidth_estimate(&self) -> Bandwidth {
        self.max_bandwidth.best().unwrap_or(Bandwidth::ZERO)
    }

    pub fn min_rtt(&self) -> Duration {
        self.min_rtt
    }

    pub fn pacing_rate(&self) -> Bandwidth {
        self.pacer.pacing_rate()
    }

    pub fn recovery_state(&self) -> RecoveryState {
        self.recovery.state()
    }

    pub fn get_congestion_window(&self) -> u64 {
        self.congestion_window
    }

    pub fn in_slow_start(&self) -> bool {
        matches!(self.mode, Mode::Startup)
    }

    pub fn in_recovery(&self) -> bool {
        self.recovery.in_recovery()
    }

    /// BBR's cwnd is never adjusted by a slow-start exit signal; the mode
    /// machine alone decides when STARTUP ends.
    pub fn maybe_exit_slow_start(&mut self) {}

    pub fn on_packet_sent(
        &mut self,
        sent_time: Timestamp,
        bytes_in_flight: u64,
        packet_number: PacketNumber,
        bytes: u64,
        is_retransmittable: bool,
    ) {
        self.sampler.on_packet_sent(
            sent_time,
            bytes_in_flight,
            packet_number,
            bytes,
            is_retransmittable,
        );
        self.pacer.on_packet_sent(sent_time);
    }

    pub fn on_app_limited(&mut self) {
        self.sampler.on_app_limited();
    }

    /// Drops sent-packet bookkeeping below `least_unacked`, once the
    /// transport has confirmed nothing below it can still be acked.
    pub fn remove_obsolete_packets(&mut self, least_unacked: PacketNumber) {
        self.sampler.remove_obsolete_packets(least_unacked);
    }

    /// Updates the datagram size used to derive the minimum and initial
    /// congestion windows. Never shrinks a size already in effect.
    pub fn set_max_datagram_size(&mut self, bytes: u16) {
        let bytes = bytes.max(self.max_datagram_size);
        if bytes == self.max_datagram_size {
            return;
        }
        self.max_datagram_size = bytes;
        self.min_congestion_window = MIN_PIPE_CWND_PACKETS * bytes as u64;
        self.initial_congestion_window =
            self.config.initial_congestion_window_packets as u64 * bytes as u64;
        self.max_congestion_window =
            self.config.max_congestion_window_packets as u64 * bytes as u64;
        self.pacer.set_max_datagram_size(bytes);
    }

    /// Collapses the congestion window to `min_cwnd`; the mode machine
    /// itself is left untouched.
    pub fn on_retransmission_timeout(&mut self, _packets_retransmitted: bool) {
        self.congestion_window = self.min_congestion_window;
    }

    pub fn can_send(&self, bytes_in_flight: u64) -> bool {
        bytes_in_flight < self.effective_congestion_window()
    }

    pub fn has_pacing_budget(&self, now: Timestamp) -> bool {
        self.pacer.has_pacing_budget(now)
    }

    pub fn time_until_send(&self, now: Timestamp, bytes_in_flight: u64) -> Timestamp {
        self.pacer.time_until_send(now, bytes_in_flight)
    }

    fn effective_congestion_window(&self) -> u64 {
        if self.recovery.in_recovery() {
            self.congestion_window.min(self.recovery.recovery_window())
        } else {
            self.congestion_window
        }
    }

    fn effective_min_rtt(&self, rtt_stats: &dyn RttStats) -> Duration {
        if self.min_rtt.is_zero() {
            rtt_stats.min_rtt()
        } else {
            self.min_rtt
        }
    }

    /// `getTargetCongestionWindow`: the BDP at `gain`, floored at
    /// `min_cwnd` and substituting `gain * initial_cwnd` while the
    /// bandwidth estimate is still unknown.
    fn target_congestion_window(&self, gain: Ratio<u64>, min_rtt: Duration) -> u64 {
        let bandwidth = self.bandwidth_estimate();
        let target = if bandwidth.is_zero() {
            (gain * self.initial_congestion_window).to_integer()
        } else {
            let bdp = bandwidth * min_rtt;
            (gain * bdp).to_integer()
        };
        target.max(self.min_congestion_window)
    }

    fn current_pacing_gain(&self) -> Ratio<u64> {
        let gain = self.mode.pacing_gain();
        if matches!(self.mode, Mode::Startup) && self.config.slower_startup {
            gain * Ratio::new_raw(3, 2)
        } else {
            gain
        }
    }

    /// Feeds one congestion event through the full per-ack update order:
    /// round counter, `min_rtt`, the maxBandwidth filter, the
    /// full-bandwidth detector, mode transitions, the recovery sub-state
    /// machine, and finally the pacing rate, congestion window, and
    /// recovery window recalculations.
    ///
    /// `bytes_in_flight` is the amount outstanding immediately before this
    /// event; the mode transitions that need the post-event figure derive
    /// it from the acked and lost totals rather than requiring the caller
    /// to compute it twice.
    #[allow(clippy::too_many_arguments)]
    pub fn on_congestion_event(
        &mut self,
        now: Timestamp,
        bytes_in_flight: u64,
        acked: &[AckedPacket],
        lost: &[LostPacket],
        rtt_stats: &dyn RttStats,
        random_generator: &mut dyn Generator,
        tracer: &mut dyn Tracer,
    ) {
        let any_loss = !lost.is_empty();
        let bytes_acked_this_event: u64 = acked.iter().map(|a| a.bytes_acked).sum();
        let bytes_lost_this_event: u64 = lost.iter().map(|l| l.bytes_lost).sum();

        let bandwidth_estimate_before = self.bandwidth_estimate();
        let bandwidth_upper_bound = self.pacer.pacing_rate();

        let sample = self.sampler.on_congestion_event(
            now,
            acked,
            lost,
            bandwidth_estimate_before,
            bandwidth_upper_bound,
            self.round_counter.round_trip_count(),
        );

        let largest_acked = acked.last().map(|a| a.packet_number);
        let last_sent_packet = self.sampler.last_sent_packet();

        // 1. round counter.
        let round_started = self
            .round_counter
            .on_congestion_event(largest_acked, last_sent_packet);

        // 2. min_rtt, with its 10s expiry re-probe. The expiry flag is
        // captured before any reset below, so the mode transitions in
        // step 5 see whether the *previous* min_rtt measurement had aged
        // out, not the timestamp this same event just refreshed.
        let min_rtt_expired = self
            .min_rtt_timestamp
            .map_or(false, |ts| now >= ts + MIN_RTT_EXPIRY);
        if let Some(sample_rtt) = sample.sample_rtt {
            if self.min_rtt.is_zero() || sample_rtt < self.min_rtt || min_rtt_expired {
                self.min_rtt = sample_rtt;
                self.min_rtt_timestamp = Some(now);
                tracer.on_min_rtt_updated(self.min_rtt);
            }
        }
        let min_rtt = self.effective_min_rtt(rtt_stats);

        // 3. maxBandwidth filter (skip app-limited samples that wouldn't
        // have set a new record even at full bandwidth).
        if !(sample.sample_is_app_limited
            && sample.sample_max_bandwidth < bandwidth_estimate_before)
        {
            self.max_bandwidth.update(
                sample.sample_max_bandwidth,
                self.round_counter.round_trip_count(),
            );
            tracer.on_bandwidth_estimate(self.bandwidth_estimate());
        }
        if !acked.is_empty() && !sample.sample_is_app_limited {
            self.has_non_app_limited_sample = true;
        }

        // 4. is_at_full_bandwidth detection.
        if !self.is_at_full_bandwidth && round_started {
            let target = self.bandwidth_at_last_round * startup::STARTUP_GROWTH_TARGET;
            if self.bandwidth_estimate() >= target {
                self.rounds_without_bandwidth_gain = 0;
                self.bandwidth_at_last_round = self.bandwidth_estimate();
            } else {
                self.rounds_without_bandwidth_gain += 1;
                if self.rounds_without_bandwidth_gain >= self.config.num_startup_rtts
                    && self.has_non_app_limited_sample
                {
                    self.is_at_full_bandwidth = true;
                }
            }
        }

        // 5. mode transitions.
        let bytes_in_flight_after = bytes_in_flight
            .saturating_sub(bytes_acked_this_event)
            .saturating_sub(bytes_lost_this_event);

        let previous_mode = self.mode;
        self.update_mode(
            now,
            bytes_in_flight_after,
            any_loss,
            round_started,
            min_rtt,
            min_rtt_expired,
            random_generator,
        );
        if self.mode != previous_mode {
            tracer.on_mode_changed(previous_mode, self.mode);
        }

        // 6. recovery state.
        let previous_recovery = self.recovery.state();
        self.recovery
            .on_congestion_event(any_loss, round_started, largest_acked, last_sent_packet);
        if self.recovery.state() != previous_recovery {
            tracer.on_recovery_state_changed(previous_recovery, self.recovery.state());
        }

        // 7. pacing rate.
        self.calculate_pacing_rate(bytes_lost_this_event, min_rtt);
        tracer.on_pacing_rate_updated(self.pacer.pacing_rate());

        // 8. congestion window.
        self.calculate_congestion_window(bytes_acked_this_event, sample.extra_acked, min_rtt);
        tracer.on_congestion_window_updated(
            self.congestion_window.min(u64::from(u32::MAX)) as u32
        );

        // 9. recovery window.
        self.recovery.calculate_recovery_window(
            bytes_acked_this_event,
            bytes_lost_this_event,
            bytes_in_flight,
            self.min_congestion_window,
            self.max_datagram_size as u64,
        );
    }

    #[allow(clippy::too_many_arguments)]
    fn update_mode(
        &mut self,
        now: Timestamp,
        bytes_in_flight: u64,
        any_loss: bool,
        round_started: bool,
        min_rtt: Duration,
        min_rtt_expired: bool,
        random_generator: &mut dyn Generator,
    ) {
        if min_rtt_expired && !matches!(self.mode, Mode::ProbeRtt(_)) {
            self.enter_probe_rtt();
            self.congestion_window_gain = self.mode.cwnd_gain();
            return;
        }

        match self.mode {
            Mode::Startup => {
                if self.is_at_full_bandwidth {
                    self.enter_drain();
                }
            }
            Mode::Drain => {
                let gain = if self.config.drain_to_target {
                    UNITY
                } else {
                    self.congestion_window_gain
                };
                let target = self.target_congestion_window(gain, min_rtt);
                if bytes_in_flight <= target {
                    self.enter_probe_bw(now, random_generator);
                }
            }
            Mode::ProbeBw(mut state) => {
                let target = self.target_congestion_window(UNITY, min_rtt);
                state.maybe_advance_cycle(now, min_rtt, bytes_in_flight, target, any_loss);
                self.mode = Mode::ProbeBw(state);
            }
            Mode::ProbeRtt(mut state) => {
                let min_cwnd = self.min_congestion_window;
                let done =
                    state.on_congestion_event(bytes_in_flight, min_cwnd, round_started, now);
                self.mode = Mode::ProbeRtt(state);
                if done {
                    self.exit_probe_rtt(now, random_generator, state.prior_mode());
                }
            }
        }

        self.congestion_window_gain = self.mode.cwnd_gain();
    }

    fn enter_drain(&mut self) {
        self.mode = Mode::Drain;
    }

    fn enter_probe_bw(&mut self, now: Timestamp, random_generator: &mut dyn Generator) {
        self.mode = Mode::ProbeBw(probe_bw::ProbeBwState::enter(now, random_generator));
    }

    fn enter_probe_rtt(&mut self) {
        let prior_mode = match self.mode {
            Mode::Startup => probe_rtt::PriorMode::Startup,
            _ => probe_rtt::PriorMode::ProbeBw,
        };
        self.mode = Mode::ProbeRtt(probe_rtt::ProbeRttState::enter(prior_mode));
        self.congestion_window = self.min_congestion_window;
    }

    fn exit_probe_rtt(
        &mut self,
        now: Timestamp,
        random_generator: &mut dyn Generator,
        prior_mode: probe_rtt::PriorMode,
    ) {
        self.min_rtt_timestamp = Some(now);
        match prior_mode {
            probe_rtt::PriorMode::Startup if !self.is_at_full_bandwidth => {
                self.mode = Mode::Startup;
            }
            _ => {
                self.enter_probe_bw(now, random_generator);
            }
        }
    }

    /// `calculatePacingRate`.
    fn calculate_pacing_rate(&mut self, bytes_lost: u64, min_rtt: Duration) {
        let pacing_gain = self.current_pacing_gain();
        let bandwidth_estimate = self.bandwidth_estimate();
        self.pacer.calculate_pacing_rate(
            pacing_gain,
            bandwidth_estimate,
            self.is_at_full_bandwidth,
            min_rtt,
            self.initial_congestion_window as u32,
            bytes_lost,
            matches!(self.mode, Mode::Startup),
            self.config.detect_overshooting,
            self.config.bytes_lost_multiplier,
            self.initial_congestion_window as u32,
            self.has_non_app_limited_sample,
        );
    }

    /// `calculateCongestionWindow`.
    fn calculate_congestion_window(
        &mut self,
        bytes_acked: u64,
        excess_acked: u64,
        min_rtt: Duration,
    ) {
        if matches!(self.mode, Mode::ProbeRtt(_)) {
            return;
        }

        let mut target = self.target_congestion_window(self.congestion_window_gain, min_rtt);

        if self.is_at_full_bandwidth {
            target = target.saturating_add(self.sampler.max_ack_height());
        } else if self.config.enable_ack_aggregation_during_startup {
            target = target.saturating_add(excess_acked);
        }

        if self.is_at_full_bandwidth {
            self.congestion_window =
                target.min(self.congestion_window.saturating_add(bytes_acked));
        } else if self.congestion_window < target
            || self.sampler.total_bytes_acked() < self.initial_congestion_window
        {
            self.congestion_window = self.congestion_window.saturating_add(bytes_acked);
        }

        self.congestion_window = self
            .congestion_window
            .clamp(self.min_congestion_window, self.max_congestion_window);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        random,
        recovery::{rtt::testing::Rtt, tracer::testing::Recorder, tracer::NoopTracer},
        time::{testing::Clock as TestClock, Clock as _},
    };

    fn ack(packet_number: u64, bytes_acked: u64) -> AckedPacket {
        AckedPacket {
            packet_number: PacketNumber::new(packet_number),
            bytes_acked,
        }
    }

    #[test]
    fn starts_in_startup_with_the_initial_window() {
        let sender = BbrSender::new(1200).unwrap();
        assert_eq!(Mode::Startup, sender.mode());
        assert_eq!(12_000, sender.get_congestion_window());
        assert!(sender.in_slow_start());
        assert!(!sender.in_recovery());
    }

    #[test]
    fn rejects_zero_max_datagram_size() {
        assert_eq!(
            Err(BbrConfigError::ZeroMaxDatagramSize),
            BbrSender::new(0).map(|_| ())
        );
    }

    #[test]
    fn set_max_datagram_size_never_shrinks() {
        let mut sender = BbrSender::new(1200).unwrap();
        sender.set_max_datagram_size(1000);
        assert_eq!(1200, sender.max_datagram_size);
        sender.set_max_datagram_size(1500);
        assert_eq!(1500, sender.max_datagram_size);
    }

    #[test]
    fn on_retransmission_timeout_collapses_to_min_cwnd() {
        let mut sender = BbrSender::new(1200).unwrap();
        sender.congestion_window = 100_000;
        sender.on_retransmission_timeout(true);
        assert_eq!(
            sender.min_congestion_window,
            sender.get_congestion_window()
        );
    }

    #[test]
    fn can_send_respects_the_congestion_window() {
        let sender = BbrSender::new(1200).unwrap();
        let cwnd = sender.get_congestion_window();
        assert!(sender.can_send(cwnd - 1));
        assert!(!sender.can_send(cwnd));
    }

    #[test]
    fn steady_acks_drive_startup_to_full_bandwidth_and_beyond() {
        let mut sender = BbrSender::new(1200).unwrap();
        let mut clock = TestClock::default();
        let rtt_stats = Rtt::new(Duration::from_millis(50));
        let mut generator = random::testing::Generator::default();
        let mut tracer = NoopTracer;

        let mut pn = 1u64;
        for _round in 0..40 {
            let now = clock.get_time();
            sender.on_packet_sent(now, 12_000, PacketNumber::new(pn), 1200, true);
            clock.inc_by(Duration::from_millis(50));
            let now = clock.get_time();
            sender.on_congestion_event(
                now,
                12_000,
                &[ack(pn, 1200)],
                &[],
                &rtt_stats,
                &mut generator,
                &mut tracer,
            );
            pn += 1;
        }

        // After many rounds at a constant rate STARTUP should have
        // declared the pipe full and moved on.
        assert_ne!(Mode::Startup, sender.mode());
        assert!(sender.bandwidth_estimate().bits_per_second() > 0);
    }

    #[test]
    fn loss_enters_recovery_and_caps_the_effective_window() {
        let mut sender = BbrSender::new(1200).unwrap();
        let rtt_stats = Rtt::default();
        let mut generator = random::testing::Generator::default();
        let mut tracer = NoopTracer;
        let now = unsafe { Timestamp::from_duration(Duration::from_secs(1)) };

        sender.on_packet_sent(now, 0, PacketNumber::new(1), 1200, true);
        sender.on_congestion_event(
            now + Duration::from_millis(10),
            1200,
            &[],
            &[LostPacket {
                packet_number: PacketNumber::new(1),
                bytes_lost: 1200,
            }],
            &rtt_stats,
            &mut generator,
            &mut tracer,
        );

        assert!(sender.in_recovery());
        assert_eq!(RecoveryState::Conservation, sender.recovery_state());
    }

    #[test]
    fn tracer_observes_pacing_and_window_updates() {
        let mut sender = BbrSender::new(1200).unwrap();
        let rtt_stats = Rtt::new(Duration::from_millis(20));
        let mut generator = random::testing::Generator::default();
        let mut recorder = Recorder::default();
        let now = unsafe { Timestamp::from_duration(Duration::from_secs(1)) };

        sender.on_packet_sent(now, 0, PacketNumber::new(1), 1200, true);
        sender.on_congestion_event(
            now + Duration::from_millis(20),
            1200,
            &[ack(1, 1200)],
            &[],
            &rtt_stats,
            &mut generator,
            &mut recorder,
        );

        assert_eq!(1, recorder.pacing_rate_updates);
        assert_eq!(1, recorder.congestion_window_updates);
        assert_eq!(1, recorder.min_rtt_updates);
    }

    #[test]
    fn maybe_exit_slow_start_is_a_no_op() {
        let mut sender = BbrSender::new(1200).unwrap();
        let before = sender.mode();
        sender.maybe_exit_slow_start();
        assert_eq!(before, sender.mode());
    }
}
