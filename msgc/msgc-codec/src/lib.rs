//! ROS1 binary wire-format runtime.
//!
//! - [`WireReader`] / [`WireWriter`]: primitive reads and writes, used by
//!   generated [`RosMessage`] bindings
//! - [`encode`] / [`decode`]: the same format for dynamic [`Value`](msgc_core::Value)s,
//!   driven by a [`PlanTable`](msgc_plan::PlanTable)
//! - [`frame`] / [`unframe`]: the length prefix used on TCPROS connections
//!
//! All calls are pure; nothing is shared between them.

mod dynamic;
mod frame;
mod message;
mod wire;

pub use dynamic::{decode, encode};
pub use frame::{frame, unframe};
pub use message::{RosMessage, RosService};
pub use wire::{WireReader, WireWriter};
