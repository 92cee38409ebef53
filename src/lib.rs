#![no_std]

mod config;
mod decode;
mod dispatch;
mod frame;
mod monitor;
mod pid;
mod poller;
mod report;
mod state;

// Receive path: frame -> masked PID -> decoded value -> report + state update
// Tick path: poller counts to the interval, checks the stop condition, sends a query

/// Payload capacity of a classic CAN frame
pub const MAX_PAYLOAD_LENGTH: usize = 8;

pub use config::*;
pub use decode::*;
pub use dispatch::*;
pub use frame::*;
pub use monitor::*;
pub use pid::*;
pub use poller::*;
pub use report::*;
pub use state::*;

pub use embedded_can::{ExtendedId, Id, StandardId};
