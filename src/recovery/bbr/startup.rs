// SPDX-License-Identifier: Apache-2.0

//! STARTUP gains and the full-bandwidth detector that ends it.
//!
//! BBR treats the pipe as full once a few consecutive rounds fail to
//! grow the bandwidth estimate by much; from there DRAIN empties the
//! queue STARTUP's aggressive gain built up.

use num_rational::Ratio;

/// `2/ln(2)`, the gain that doubles the sending rate each round while
/// probing for the bottleneck in STARTUP.
pub(crate) const HIGH_GAIN: Ratio<u64> = Ratio::new_raw(2885, 1000);

/// The STARTUP congestion-window gain used once a round has passed
/// without further bandwidth growth but before DRAIN is entered;
/// distinct from `HIGH_GAIN` so cwnd growth lags pacing slightly.
pub(crate) const DERIVED_HIGH_GAIN: Ratio<u64> = Ratio::new_raw(2773, 1000);

/// The congestion-window gain used in PROBE_BW and PROBE_RTT, once the
/// pipe has been found and drained.
pub(crate) const DERIVED_HIGH_CWND_GAIN: Ratio<u64> = Ratio::new_raw(2, 1);

/// A round's bandwidth estimate must grow by at least this factor over
/// `bandwidth_at_last_round` to count as still filling the pipe.
pub(crate) const STARTUP_GROWTH_TARGET: Ratio<u64> = Ratio::new_raw(125, 100);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn high_gain_is_two_over_ln2() {
        assert!(HIGH_GAIN.to_integer() >= 2);
        assert!(HIGH_GAIN < Ratio::new_raw(3, 1));
    }
}
