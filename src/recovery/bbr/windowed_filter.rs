// SPDX-License-Identifier: Apache-2.0

use core::marker::PhantomData;

/// Tracks the best, second-best, and third-best sample observed over a
/// sliding `window_length`, according to a `Filter`'s polarity (max or
/// min).
///
/// Based on Kathleen Nichols' windowed min/max filter, as used by Linux's
/// TCP BBR. The invariant maintained is that the measurement time of the
/// n'th best sample is always >= the (n-1)'th best's. On a reset all three
/// slots collapse to the new sample; as time passes without a better
/// sample, `best` expires into `second`, `second` into `third`, and `third`
/// is refreshed from the newest arrival.
#[derive(Clone, Debug)]
pub(crate) struct WindowedFilter<T, TimeType, DurationType, FilterType> {
    estimates: [Option<Estimate<T, TimeType>>; 3],
    window_length: DurationType,
    filter: PhantomData<FilterType>,
}

#[derive(Clone, Copy, Debug)]
struct Estimate<T, TimeType> {
    sample: T,
    time: TimeType,
}

pub(crate) trait Filter<T> {
    /// Returns true if `a` is at least as good as `b` for this filter's
    /// polarity.
    fn better(a: T, b: T) -> bool;
}

#[derive(Clone, Debug)]
pub(crate) struct MaxFilter;
#[derive(Clone, Debug)]
pub(crate) struct MinFilter;

impl<T: core::cmp::PartialOrd> Filter<T> for MaxFilter {
    fn better(a: T, b: T) -> bool {
        a >= b
    }
}

impl<T: core::cmp::PartialOrd> Filter<T> for MinFilter {
    fn better(a: T, b: T) -> bool {
        a <= b
    }
}

/// Filter that maintains the maximum value seen over the window
pub(crate) type WindowedMaxFilter<T, TimeType, DurationType> =
    WindowedFilter<T, TimeType, DurationType, MaxFilter>;
/// Filter that maintains the minimum value seen over the window
#[allow(dead_code)]
pub(crate) type WindowedMinFilter<T, TimeType, DurationType> =
    WindowedFilter<T, TimeType, DurationType, MinFilter>;

impl<T, TimeType, DurationType, FilterType> WindowedFilter<T, TimeType, DurationType, FilterType>
where
    T: Copy + PartialEq + PartialOrd,
    TimeType: Copy + PartialOrd + core::ops::Add<DurationType, Output = TimeType>,
    DurationType: Copy + PartialOrd,
    FilterType: Filter<T>,
{
    /// Constructs a new `WindowedFilter` with the given `window_length`
    pub fn new(window_length: DurationType) -> Self {
        Self {
            estimates: [None, None, None],
            window_length,
            filter: PhantomData,
        }
    }

    /// Changes the window length. Does not update any current samples.
    pub fn set_window_length(&mut self, window_length: DurationType) {
        self.window_length = window_length;
    }

    pub fn best(&self) -> Option<T> {
        self.estimates[0].map(|e| e.sample)
    }

    pub fn second_best(&self) -> Option<T> {
        self.estimates[1].map(|e| e.sample)
    }

    pub fn third_best(&self) -> Option<T> {
        self.estimates[2].map(|e| e.sample)
    }

    /// Re-initializes all three slots to `(sample, time)`.
    pub fn reset(&mut self, sample: T, time: TimeType) {
        let estimate = Some(Estimate { sample, time });
        self.estimates = [estimate, estimate, estimate];
    }

    /// Discards all recorded samples, returning the filter to its
    /// uninitialized state. The next `update` call will `reset`.
    pub fn clear(&mut self) {
        self.estimates = [None, None, None];
    }

    /// Updates the best estimates with `sample`, expiring and promoting
    /// estimates as necessary.
    pub fn update(&mut self, sample: T, time: TimeType) {
        let best = match self.estimates[0] {
            None => {
                self.reset(sample, time);
                return;
            }
            Some(e) => e,
        };

        let third = self.estimates[2].expect("initialized together with best");

        if FilterType::better(sample, best.sample) || !(time <= third.time + self.window_length) {
            self.reset(sample, time);
            return;
        }

        let second = self.estimates[1].expect("initialized together with best");

        if FilterType::better(sample, second.sample) {
            self.estimates[1] = Some(Estimate { sample, time });
            self.estimates[2] = Some(Estimate { sample, time });
        } else if FilterType::better(sample, third.sample) {
            self.estimates[2] = Some(Estimate { sample, time });
        }

        if !(time <= best.time + self.window_length) {
            // best hasn't been updated for an entire window; promote second
            // and third, and install the new sample as third.
            let second = self.estimates[1].expect("initialized together with best");
            let third = self.estimates[2].expect("initialized together with best");
            self.estimates[0] = Some(second);
            self.estimates[1] = Some(third);
            self.estimates[2] = Some(Estimate { sample, time });

            let new_best = self.estimates[0].expect("just assigned");
            if !(time <= new_best.time + self.window_length) {
                let second = self.estimates[1].expect("just assigned");
                let third = self.estimates[2].expect("just assigned");
                self.estimates[0] = Some(second);
                self.estimates[1] = Some(third);
            }
            return;
        }

        let best = self.estimates[0].expect("initialized together with best");
        let second = self.estimates[1].expect("initialized together with best");
        if second.sample == best.sample && !(time <= second.time + quarter(self.window_length)) {
            // A quarter of the window has passed without a better sample, so
            // take the second-best estimate from the second quarter.
            self.estimates[1] = Some(Estimate { sample, time });
            self.estimates[2] = Some(Estimate { sample, time });
            return;
        }

        let second = self.estimates[1].expect("initialized together with best");
        let third = self.estimates[2].expect("initialized together with best");
        if third.sample == second.sample && !(time <= third.time + half(self.window_length)) {
            // Half the window has passed without a better estimate, so take
            // a third-best estimate from the second half.
            self.estimates[2] = Some(Estimate { sample, time });
        }
    }
}

// These divisions only need to be correct enough to bound worst-case error;
// integer truncation on Duration/u64 types is acceptable.
fn quarter<D: core::ops::Div<u32, Output = D> + Copy>(window_length: D) -> D {
    window_length / 4
}

fn half<D: core::ops::Div<u32, Output = D> + Copy>(window_length: D) -> D {
    window_length / 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::{Clock, Duration, NoopClock};

    #[test]
    fn uninitialized_filter_has_no_value() {
        let filter: WindowedMinFilter<u32, crate::time::Timestamp, Duration> =
            WindowedFilter::new(Duration::from_secs(10));
        assert_eq!(None, filter.best());
        assert_eq!(None, filter.second_best());
        assert_eq!(None, filter.third_best());
    }

    #[test]
    fn min_filter_expires_best() {
        let mut filter: WindowedMinFilter<u32, crate::time::Timestamp, Duration> =
            WindowedFilter::new(Duration::from_secs(10));

        let now = NoopClock.get_time();
        filter.update(7, now);
        assert_eq!(Some(7), filter.best());

        let now = now + Duration::from_secs(5);
        filter.update(3, now);
        assert_eq!(Some(3), filter.best());

        // A value higher than the min doesn't move the best
        let now = now + Duration::from_secs(9);
        filter.update(4, now);
        assert_eq!(Some(3), filter.best());

        // best has now aged out of the window; it is replaced by second/third
        let now = now + Duration::from_secs(1);
        filter.update(5, now);
        assert!(filter.best().unwrap() <= 5);
    }

    #[test]
    fn max_filter_promotes_second_and_third() {
        let mut filter: WindowedMaxFilter<u32, u32, u32> = WindowedFilter::new(10);

        filter.update(7, 0);
        assert_eq!(Some(7), filter.best());

        // second-best is recorded from a later, lower sample
        filter.update(5, 1);
        assert_eq!(Some(7), filter.best());
        assert_eq!(Some(5), filter.second_best());
        assert_eq!(Some(5), filter.third_best());

        // a higher sample anywhere resets the whole window
        filter.update(9, 2);
        assert_eq!(Some(9), filter.best());
        assert_eq!(Some(9), filter.second_best());
        assert_eq!(Some(9), filter.third_best());
    }

    #[test]
    fn reset_and_clear() {
        let mut filter: WindowedMaxFilter<u32, u32, u32> = WindowedFilter::new(10);
        filter.update(1, 0);
        filter.reset(4, 1);
        assert_eq!(Some(4), filter.best());
        assert_eq!(Some(4), filter.second_best());
        assert_eq!(Some(4), filter.third_best());

        filter.clear();
        assert_eq!(None, filter.best());
    }

    #[test]
    fn best_never_regresses_without_expiry() {
        let mut filter: WindowedMaxFilter<u32, u32, u32> = WindowedFilter::new(100);
        filter.update(10, 0);
        for t in 1..50 {
            filter.update(5, t);
            assert_eq!(Some(10), filter.best());
        }
    }
}
