//! Serial Command Link
//!
//! Wires the RX interrupt (producer) to the polling loop (consumer):
//! bytes land in a shared fixed-capacity queue and each `poll()` drains
//! them through the command recognizer.

mod config;
mod error;
mod link;
mod token;

pub use config::{LinkConfig, RATE_COMMANDS};
pub use error::LinkError;
pub use link::{CommandLink, Producer};
pub use token::Token;

pub use byte_queue::OverflowPolicy;
pub use command_matcher::{Completed, Discipline, PatternId};
