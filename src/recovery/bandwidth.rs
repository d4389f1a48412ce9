// SPDX-License-Identifier: Apache-2.0

//! A scalar rate in bits per second, with the conversions to and from
//! byte counts over a `Duration` that the sampler and sender need.

use core::time::Duration;
use num_rational::Ratio;

const MICRO_BITS_PER_BYTE: u64 = 8 * 1_000_000;

/// A rate in bits per second.
///
/// `Bandwidth::MAX` stands in for "infinity": several computations in the
/// mode machine initialize a bound to infinity and only ever lower it.
#[derive(Copy, Clone, Debug, Default, Eq, Ord, PartialOrd, PartialEq, Hash)]
pub struct Bandwidth {
    bits_per_second: u64,
}

impl Bandwidth {
    pub const ZERO: Bandwidth = Bandwidth { bits_per_second: 0 };

    pub const INFINITY: Bandwidth = Bandwidth {
        bits_per_second: u64::MAX,
    };

    pub const MAX: Bandwidth = Self::INFINITY;

    /// Constructs a `Bandwidth` from a byte count delivered over `interval`.
    ///
    /// `bytes = Bandwidth * seconds / 8` and `Bandwidth = bytes * 8 /
    /// seconds` are the exact identities this rounds towards zero from.
    pub const fn new(bytes: u64, interval: Duration) -> Self {
        if interval.is_zero() {
            Bandwidth::ZERO
        } else {
            Self {
                bits_per_second: match bytes.checked_mul(MICRO_BITS_PER_BYTE) {
                    Some(micro_bits) => micro_bits / interval.as_micros() as u64,
                    None => {
                        (bytes / interval.as_micros() as u64).saturating_mul(MICRO_BITS_PER_BYTE)
                    }
                },
            }
        }
    }

    pub const fn bits_per_second(self) -> u64 {
        self.bits_per_second
    }

    pub const fn is_zero(self) -> bool {
        self.bits_per_second == 0
    }

    pub fn saturating_add(self, rhs: Bandwidth) -> Bandwidth {
        Bandwidth {
            bits_per_second: self.bits_per_second.saturating_add(rhs.bits_per_second),
        }
    }
}

impl core::ops::Mul<Ratio<u64>> for Bandwidth {
    type Output = Bandwidth;

    fn mul(self, rhs: Ratio<u64>) -> Self::Output {
        Bandwidth {
            bits_per_second: (rhs * self.bits_per_second).to_integer(),
        }
    }
}

/// Converts a `Bandwidth` sustained over `rhs` into a byte count.
impl core::ops::Mul<Duration> for Bandwidth {
    type Output = u64;

    fn mul(self, rhs: Duration) -> Self::Output {
        match self.bits_per_second.checked_mul(rhs.as_micros() as u64) {
            Some(micro_bits) => micro_bits / MICRO_BITS_PER_BYTE,
            None => {
                (self.bits_per_second / MICRO_BITS_PER_BYTE).saturating_mul(rhs.as_micros() as u64)
            }
        }
    }
}

/// Divides a byte count by a `Bandwidth`, yielding the `Duration` a path at
/// that rate would take to transmit it.
impl core::ops::Div<Bandwidth> for u64 {
    type Output = Duration;

    fn div(self, rhs: Bandwidth) -> Self::Output {
        if rhs.is_zero() {
            return Duration::MAX;
        }
        match self.checked_mul(MICRO_BITS_PER_BYTE) {
            Some(micro_bits) => Duration::from_micros(micro_bits / rhs.bits_per_second),
            None => Duration::from_micros(
                (self / rhs.bits_per_second).saturating_mul(MICRO_BITS_PER_BYTE),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_from_bandwidth_and_time_delta() {
        // BytesFromBandwidthAndTimeDelta(80_000, 100ms) = 1000 bytes
        let bw = Bandwidth {
            bits_per_second: 80_000,
        };
        assert_eq!(1000, bw * Duration::from_millis(100));
    }

    #[test]
    fn bandwidth_from_delta() {
        // BandwidthFromDelta(1 byte, 1ms) = 8000 bits/s
        let bw = Bandwidth::new(1, Duration::from_millis(1));
        assert_eq!(8000, bw.bits_per_second());
    }

    #[test]
    fn zero_interval_is_zero() {
        assert_eq!(Bandwidth::ZERO, Bandwidth::new(1000, Duration::ZERO));
    }

    #[test]
    fn mul_by_ratio() {
        let bw = Bandwidth::new(1000, Duration::from_secs(1));
        let doubled = bw * Ratio::new_raw(2, 1);
        assert_eq!(2 * bw.bits_per_second(), doubled.bits_per_second());
    }
}
