// SPDX-License-Identifier: Apache-2.0

use core::{cmp::Ordering, marker::PhantomData, ops};
use num_traits::{CheckedAdd, CheckedSub, SaturatingAdd, SaturatingSub};

/// A checked-overflow counter.
///
/// Rather than silently wrapping, counting errors should stay isolated: the
/// counter panics on overflow when `debug_assertions` are enabled, and
/// saturates in release builds. Pass the [`Saturating`] behavior to always
/// saturate regardless of build profile.
///
/// ```
/// use bbr_core::counter::{Counter, Saturating};
///
/// let counter: Counter<u32, Saturating> = Default::default();
/// ```
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub struct Counter<T, Behavior = ()>(T, PhantomData<Behavior>);

/// Overrides the behavior of a counter to always saturate
#[derive(Clone, Copy, Debug, Default, Hash)]
pub struct Saturating;

impl<T, Behavior> Counter<T, Behavior> {
    /// Creates a new counter with an initial value
    #[inline]
    pub const fn new(value: T) -> Self {
        Self(value, PhantomData)
    }

    #[inline]
    pub fn set(&mut self, value: T) {
        self.0 = value;
    }
}

macro_rules! assign_trait {
    ($op:ident, $method:ident, $saturating_trait:ident, $saturating_method:ident, $checked_trait:ident, $checked_method:ident) => {
        impl<T> ops::$op<T> for Counter<T, ()>
        where
            T: $saturating_trait + $checked_trait + Copy,
        {
            #[inline]
            fn $method(&mut self, rhs: T) {
                if cfg!(debug_assertions) {
                    self.0 = self.0.$checked_method(&rhs).expect("counter overflow");
                } else {
                    self.0 = self.0.$saturating_method(&rhs);
                }
            }
        }

        impl<T> ops::$op<T> for Counter<T, Saturating>
        where
            T: $saturating_trait + Copy,
        {
            #[inline]
            fn $method(&mut self, rhs: T) {
                self.0 = self.0.$saturating_method(&rhs);
            }
        }
    };
}

assign_trait!(
    AddAssign,
    add_assign,
    SaturatingAdd,
    saturating_add,
    CheckedAdd,
    checked_add
);

assign_trait!(
    SubAssign,
    sub_assign,
    SaturatingSub,
    saturating_sub,
    CheckedSub,
    checked_sub
);

impl<T, B> ops::Deref for Counter<T, B> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T, B> PartialEq<T> for Counter<T, B>
where
    T: PartialEq,
{
    #[inline]
    fn eq(&self, other: &T) -> bool {
        &self.0 == other
    }
}

impl<T, B> PartialOrd<T> for Counter<T, B>
where
    T: PartialOrd,
{
    #[inline]
    fn partial_cmp(&self, other: &T) -> Option<Ordering> {
        self.0.partial_cmp(other)
    }
}

impl<T, B> PartialOrd for Counter<T, B>
where
    T: PartialOrd,
{
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.0.partial_cmp(&other.0)
    }
}

impl<T, B> Ord for Counter<T, B>
where
    T: Ord,
{
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saturating() {
        let mut a: Counter<u8, Saturating> = Counter::new(0);
        a += 250;
        a += 250;
        a += 123;

        assert_eq!(a, Counter::new(255));
    }

    #[test]
    fn checked_add() {
        let mut a: Counter<u32> = Counter::new(1);
        a += 2u32;
        assert_eq!(a, 3);
    }
}
