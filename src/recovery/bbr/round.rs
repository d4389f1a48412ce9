// SPDX-License-Identifier: Apache-2.0

//! Counts round trips by watching a packet-number watermark rather than
//! delivery rate: a round ends once every packet outstanding when it
//! started has been acked.

use crate::recovery::packet_number::PacketNumber;

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct RoundCounter {
    round_trip_count: u64,
    current_round_trip_end: PacketNumber,
}

impl RoundCounter {
    pub fn new() -> Self {
        Self {
            round_trip_count: 0,
            current_round_trip_end: PacketNumber::INVALID,
        }
    }

    pub fn round_trip_count(&self) -> u64 {
        self.round_trip_count
    }

    /// Advances the round if `largest_acked` has crossed the current
    /// watermark, arming the next watermark at `last_sent_packet`.
    /// Returns whether a new round started.
    pub fn on_congestion_event(
        &mut self,
        largest_acked: Option<PacketNumber>,
        last_sent_packet: PacketNumber,
    ) -> bool {
        let Some(largest_acked) = largest_acked else {
            return false;
        };

        if !self.current_round_trip_end.is_valid() || largest_acked > self.current_round_trip_end
        {
            self.round_trip_count += 1;
            self.current_round_trip_end = last_sent_packet;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_ack_always_starts_a_round() {
        let mut counter = RoundCounter::new();
        assert!(counter.on_congestion_event(Some(PacketNumber::new(1)), PacketNumber::new(5)));
        assert_eq!(1, counter.round_trip_count());
    }

    #[test]
    fn round_holds_until_watermark_crossed() {
        let mut counter = RoundCounter::new();
        counter.on_congestion_event(Some(PacketNumber::new(1)), PacketNumber::new(10));
        assert!(!counter.on_congestion_event(Some(PacketNumber::new(5)), PacketNumber::new(15)));
        assert_eq!(1, counter.round_trip_count());
        assert!(counter.on_congestion_event(Some(PacketNumber::new(11)), PacketNumber::new(20)));
        assert_eq!(2, counter.round_trip_count());
    }

    #[test]
    fn no_acked_packets_does_not_advance() {
        let mut counter = RoundCounter::new();
        assert!(!counter.on_congestion_event(None, PacketNumber::new(1)));
        assert_eq!(0, counter.round_trip_count());
    }
}

