// SPDX-License-Identifier: Apache-2.0

//! The BBR congestion controller: mode machine, bandwidth sampler, and the
//! supporting types the transport shares with it.

pub use bandwidth::Bandwidth;
pub use bbr::{BbrSender, Mode, RecoveryState};
pub use config::{BbrConfigError, Config};
pub use packet_number::PacketNumber;
pub use rtt::RttStats;
pub use tracer::{NoopTracer, Tracer};

pub mod bandwidth;
pub mod bbr;
pub mod config;
pub mod packet_number;
pub mod rtt;
pub mod tracer;
