// SPDX-License-Identifier: Apache-2.0

//! Observability sink for the controller.
//!
//! The controller never requires a tracer to function; every call site
//! takes `&mut dyn Tracer` and the no-op implementation compiles away to
//! nothing under optimization. `event-tracing` layers a `tracing`-based
//! implementation on top for callers that want structured logs.

use crate::recovery::{bandwidth::Bandwidth, bbr::Mode, bbr::RecoveryState};
use core::time::Duration;

/// Receives observability events emitted by the controller on each update.
pub trait Tracer {
    /// The mode machine transitioned to a new `Mode`.
    fn on_mode_changed(&mut self, _previous: Mode, _current: Mode) {}

    /// The recovery sub-state machine transitioned.
    fn on_recovery_state_changed(&mut self, _previous: RecoveryState, _current: RecoveryState) {}

    /// A new bandwidth estimate was produced.
    fn on_bandwidth_estimate(&mut self, _bandwidth: Bandwidth) {}

    /// `min_rtt` was updated.
    fn on_min_rtt_updated(&mut self, _min_rtt: Duration) {}

    /// The pacing rate was recomputed.
    fn on_pacing_rate_updated(&mut self, _pacing_rate: Bandwidth) {}

    /// The congestion window was recomputed.
    fn on_congestion_window_updated(&mut self, _congestion_window: u32) {}
}

/// A `Tracer` that discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopTracer;

impl Tracer for NoopTracer {}

#[cfg(feature = "event-tracing")]
mod tracing_impl {
    use super::*;

    /// A `Tracer` that forwards every event to the `tracing` crate at
    /// `Level::DEBUG`, under the `bbr` span target.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct TracingTracer;

    impl Tracer for TracingTracer {
        fn on_mode_changed(&mut self, previous: Mode, current: Mode) {
            tracing::debug!(target: "bbr", ?previous, ?current, "mode changed");
        }

        fn on_recovery_state_changed(&mut self, previous: RecoveryState, current: RecoveryState) {
            tracing::debug!(target: "bbr", ?previous, ?current, "recovery state changed");
        }

        fn on_bandwidth_estimate(&mut self, bandwidth: Bandwidth) {
            tracing::debug!(target: "bbr", bits_per_second = bandwidth.bits_per_second(), "bandwidth estimate");
        }

        fn on_min_rtt_updated(&mut self, min_rtt: Duration) {
            tracing::debug!(target: "bbr", ?min_rtt, "min_rtt updated");
        }

        fn on_pacing_rate_updated(&mut self, pacing_rate: Bandwidth) {
            tracing::debug!(target: "bbr", bits_per_second = pacing_rate.bits_per_second(), "pacing rate updated");
        }

        fn on_congestion_window_updated(&mut self, congestion_window: u32) {
            tracing::debug!(target: "bbr", congestion_window, "congestion window updated");
        }
    }
}

#[cfg(feature = "event-tracing")]
pub use tracing_impl::TracingTracer;

#[cfg(any(test, feature = "testing"))]
pub mod testing {
    use super::*;

    /// A `Tracer` that records the number of times each event fired, for
    /// assertions in tests.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct Recorder {
        pub mode_changes: u32,
        pub recovery_state_changes: u32,
        pub bandwidth_estimates: u32,
        pub min_rtt_updates: u32,
        pub pacing_rate_updates: u32,
        pub congestion_window_updates: u32,
    }

    impl Tracer for Recorder {
        fn on_mode_changed(&mut self, _previous: Mode, _current: Mode) {
            self.mode_changes += 1;
        }

        fn on_recovery_state_changed(&mut self, _previous: RecoveryState, _current: RecoveryState) {
            self.recovery_state_changes += 1;
        }

        fn on_bandwidth_estimate(&mut self, _bandwidth: Bandwidth) {
            self.bandwidth_estimates += 1;
        }

        fn on_min_rtt_updated(&mut self, _min_rtt: Duration) {
            self.min_rtt_updates += 1;
        }

        fn on_pacing_rate_updated(&mut self, _pacing_rate: Bandwidth) {
            self.pacing_rate_updates += 1;
        }

        fn on_congestion_window_updated(&mut self, _congestion_window: u32) {
            self.congestion_window_updates += 1;
        }
    }
}
