// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(any(test, feature = "std")), no_std)]

#[cfg(not(any(test, feature = "std", feature = "alloc")))]
compile_error!("either the `std` or `alloc` feature must be enabled");

#[cfg(any(feature = "alloc", feature = "std", test))]
extern crate alloc;

pub mod counter;
pub mod random;
pub mod recovery;
pub mod time;
