// SPDX-License-Identifier: Apache-2.0

mod clock;
mod timestamp;

pub use clock::*;
pub use core::time::Duration;
pub use timestamp::*;
