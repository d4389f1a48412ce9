// SPDX-License-Identifier: Apache-2.0

//! Construction-time configuration for [`BbrSender`](super::bbr::BbrSender).
//!
//! Every field here is read once at construction; nothing in the
//! steady-state per-packet path returns a `Result`.

use core::fmt;

/// An error constructing a `BbrCongestionController` or one of its
/// internal fixed-capacity collections.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BbrConfigError {
    /// `max_datagram_size` must be non-zero; it anchors the minimum and
    /// initial congestion window.
    ZeroMaxDatagramSize,
    /// A fixed-capacity collection was constructed with a capacity of
    /// zero where a positive capacity is required.
    InvalidCapacity { requested: usize },
}

impl fmt::Display for BbrConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BbrConfigError::ZeroMaxDatagramSize => {
                write!(f, "max_datagram_size must be non-zero")
            }
            BbrConfigError::InvalidCapacity { requested } => {
                write!(f, "invalid capacity: {requested}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BbrConfigError {}

/// The enumerated configuration knobs the transport may tune before the
/// mode machine starts.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    pub(crate) initial_congestion_window_packets: u32,
    pub(crate) max_congestion_window_packets: u32,
    pub(crate) enable_ack_aggregation_during_startup: bool,
    pub(crate) expire_ack_aggregation_in_startup: bool,
    pub(crate) slower_startup: bool,
    pub(crate) rate_based_startup: bool,
    pub(crate) drain_to_target: bool,
    pub(crate) detect_overshooting: bool,
    pub(crate) bytes_lost_multiplier: u8,
    pub(crate) overestimate_avoidance: bool,
    pub(crate) limit_max_ack_height_by_send_rate: bool,
    pub(crate) num_startup_rtts: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_congestion_window_packets: 10,
            max_congestion_window_packets: 200,
            enable_ack_aggregation_during_startup: false,
            expire_ack_aggregation_in_startup: false,
            slower_startup: false,
            rate_based_startup: false,
            drain_to_target: false,
            detect_overshooting: false,
            bytes_lost_multiplier: 2,
            overestimate_avoidance: false,
            limit_max_ack_height_by_send_rate: false,
            num_startup_rtts: 3,
        }
    }
}

impl Config {
    pub fn builder() -> Self {
        Self::default()
    }

    pub fn with_initial_congestion_window_packets(mut self, packets: u32) -> Self {
        self.initial_congestion_window_packets = packets;
        self
    }

    pub fn with_max_congestion_window_packets(mut self, packets: u32) -> Self {
        self.max_congestion_window_packets = packets;
        self
    }

    pub fn with_ack_aggregation_during_startup(mut self, enabled: bool) -> Self {
        self.enable_ack_aggregation_during_startup = enabled;
        self
    }

    pub fn with_expire_ack_aggregation_in_startup(mut self, enabled: bool) -> Self {
        self.expire_ack_aggregation_in_startup = enabled;
        self
    }

    /// Pace at 1.5x `high_gain` and disable packet conservation in STARTUP.
    pub fn with_slower_startup(mut self, enabled: bool) -> Self {
        self.slower_startup = enabled;
        self
    }

    /// Disable packet conservation in STARTUP.
    pub fn with_rate_based_startup(mut self, enabled: bool) -> Self {
        self.rate_based_startup = enabled;
        self
    }

    /// Do not exit DRAIN until `bytes_in_flight` is at or below the BDP.
    pub fn with_drain_to_target(mut self, enabled: bool) -> Self {
        self.drain_to_target = enabled;
        self
    }

    pub fn with_detect_overshooting(mut self, enabled: bool, bytes_lost_multiplier: u8) -> Self {
        self.detect_overshooting = enabled;
        self.bytes_lost_multiplier = bytes_lost_multiplier;
        self
    }

    /// Switches the A0 selection strategy and the ack-aggregation
    /// threshold to 2.0.
    pub fn with_overestimate_avoidance(mut self, enabled: bool) -> Self {
        self.overestimate_avoidance = enabled;
        self
    }

    pub fn with_limit_max_ack_height_by_send_rate(mut self, enabled: bool) -> Self {
        self.limit_max_ack_height_by_send_rate = enabled;
        self
    }

    pub fn with_num_startup_rtts(mut self, rtts: u32) -> Self {
        self.num_startup_rtts = rtts;
        self
    }

    pub(crate) fn validate(&self, max_datagram_size: u16) -> Result<(), BbrConfigError> {
        if max_datagram_size == 0 {
            return Err(BbrConfigError::ZeroMaxDatagramSize);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let config = Config::default();
        assert_eq!(10, config.initial_congestion_window_packets);
        assert_eq!(200, config.max_congestion_window_packets);
        assert_eq!(3, config.num_startup_rtts);
    }

    #[test]
    fn builder_overrides_fields() {
        let config = Config::builder()
            .with_initial_congestion_window_packets(32)
            .with_overestimate_avoidance(true);
        assert_eq!(32, config.initial_congestion_window_packets);
        assert!(config.overestimate_avoidance);
    }

    #[test]
    fn validate_rejects_zero_max_datagram_size() {
        let config = Config::default();
        assert_eq!(
            Err(BbrConfigError::ZeroMaxDatagramSize),
            config.validate(0)
        );
        assert!(config.validate(1200).is_ok());
    }
}
