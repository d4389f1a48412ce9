// SPDX-License-Identifier: Apache-2.0

//! DRAIN paces below the delivery rate for one round to empty the
//! queue STARTUP's `HIGH_GAIN` pacing built up, then hands off to
//! PROBE_BW once `bytes_in_flight` has fallen back to the BDP.

use num_rational::Ratio;
use num_traits::Inv;

/// The inverse of `startup::HIGH_GAIN`, chosen to drain in about one
/// round what STARTUP's gain queued up in roughly the same span.
pub(crate) fn pacing_gain() -> Ratio<u64> {
    super::startup::HIGH_GAIN.inv()
}

/// The congestion-window gain held over from STARTUP's full-bandwidth
/// detection, giving the queue room to drain without the cwnd itself
/// collapsing mid-round.
pub(crate) const CWND_GAIN: Ratio<u64> = super::startup::DERIVED_HIGH_GAIN;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pacing_gain_is_inverse_of_high_gain() {
        let gain = pacing_gain();
        assert!(gain < Ratio::new_raw(1, 1));
    }
}
