// SPDX-License-Identifier: Apache-2.0

//! The recovery sub-state machine: on loss, clamp the window to a
//! dedicated `recovery_window` until an ack crosses the packet sent at
//! the moment recovery was entered.

use crate::recovery::packet_number::PacketNumber;

/// Where the connection stands with respect to the most recent loss.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecoveryState {
    /// No loss is currently being recovered from.
    NotInRecovery,
    /// A loss was observed this round or the last; `recovery_window`
    /// only shrinks as further losses arrive.
    Conservation,
    /// A full round has passed with no further losses;
    /// `recovery_window` grows by the bytes acked each event.
    Growth,
}

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct RecoveryTracker {
    state_storage: Option<RecoveryState>,
    end_recovery_at: PacketNumber,
    recovery_window: u64,
}

impl RecoveryTracker {
    pub fn new() -> Self {
        Self {
            state_storage: None,
            end_recovery_at: PacketNumber::INVALID,
            recovery_window: 0,
        }
    }

    pub fn state(&self) -> RecoveryState {
        self.state_storage.unwrap_or(RecoveryState::NotInRecovery)
    }

    pub fn recovery_window(&self) -> u64 {
        self.recovery_window
    }

    pub fn in_recovery(&self) -> bool {
        self.state() != RecoveryState::NotInRecovery
    }

    /// Advances the sub-state machine for one congestion event. Returns
    /// the previous state so the caller can tell whether it changed.
    pub fn on_congestion_event(
        &mut self,
        any_loss: bool,
        round_started: bool,
        largest_acked: Option<PacketNumber>,
        last_sent_packet: PacketNumber,
    ) -> RecoveryState {
        let previous = self.state();

        if any_loss {
            if previous == RecoveryState::NotInRecovery {
                self.state_storage = Some(RecoveryState::Conservation);
                self.end_recovery_at = last_sent_packet;
                self.recovery_window = 0;
            }
            return previous;
        }

        if previous == RecoveryState::Conservation && round_started {
            self.state_storage = Some(RecoveryState::Growth);
        }

        if self.state() != RecoveryState::NotInRecovery {
            if let Some(acked) = largest_acked {
                if self.end_recovery_at.is_valid() && acked > self.end_recovery_at {
                    self.state_storage = Some(RecoveryState::NotInRecovery);
                    self.recovery_window = 0;
                }
            }
        }

        previous
    }

    /// Recomputes `recovery_window` for this event; a no-op outside
    /// recovery.
    pub fn calculate_recovery_window(
        &mut self,
        bytes_acked: u64,
        bytes_lost: u64,
        prior_in_flight: u64,
        min_cwnd: u64,
        max_datagram_size: u64,
    ) {
        if self.state() == RecoveryState::NotInRecovery {
            return;
        }

        if self.recovery_window == 0 {
            self.recovery_window = min_cwnd.max(prior_in_flight.saturating_add(bytes_acked));
            return;
        }

        self.recovery_window = self
            .recovery_window
            .saturating_sub(bytes_lost)
            .max(max_datagram_size);

        if self.state() == RecoveryState::Growth {
            self.recovery_window = self.recovery_window.saturating_add(bytes_acked);
        }

        self.recovery_window = self
            .recovery_window
            .max(min_cwnd.max(prior_in_flight.saturating_add(bytes_acked)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loss_enters_conservation_and_sets_end_recovery_at() {
        let mut tracker = RecoveryTracker::new();
        let previous =
            tracker.on_congestion_event(true, false, Some(PacketNumber::new(5)), PacketNumber::new(10));
        assert_eq!(RecoveryState::NotInRecovery, previous);
        assert_eq!(RecoveryState::Conservation, tracker.state());
    }

    #[test]
    fn a_round_without_loss_advances_to_growth() {
        let mut tracker = RecoveryTracker::new();
        tracker.on_congestion_event(true, false, Some(PacketNumber::new(5)), PacketNumber::new(10));
        tracker.on_congestion_event(false, true, Some(PacketNumber::new(6)), PacketNumber::new(11));
        assert_eq!(RecoveryState::Growth, tracker.state());
    }

    #[test]
    fn ack_crossing_end_recovery_at_exits() {
        let mut tracker = RecoveryTracker::new();
        tracker.on_congestion_event(true, false, Some(PacketNumber::new(5)), PacketNumber::new(10));
        tracker.on_congestion_event(
            false,
            true,
            Some(PacketNumber::new(11)),
            PacketNumber::new(12),
        );
        assert_eq!(RecoveryState::NotInRecovery, tracker.state());
    }

    #[test]
    fn recovery_window_initializes_then_shrinks_on_loss() {
        let mut tracker = RecoveryTracker::new();
        tracker.on_congestion_event(true, false, Some(PacketNumber::new(1)), PacketNumber::new(5));
        tracker.calculate_recovery_window(0, 0, 10_000, 1200, 1200);
        assert_eq!(10_000, tracker.recovery_window());

        tracker.calculate_recovery_window(0, 3000, 7000, 1200, 1200);
        assert_eq!(7000, tracker.recovery_window());
    }

    #[test]
    fn recovery_window_floors_at_max_datagram_size() {
        let mut tracker = RecoveryTracker::new();
        tracker.on_congestion_event(true, false, Some(PacketNumber::new(1)), PacketNumber::new(5));
        tracker.calculate_recovery_window(0, 0, 1000, 1200, 1200);
        tracker.calculate_recovery_window(0, 50_000, 0, 1200, 1200);
        assert!(tracker.recovery_window() >= 1200);
    }
}
