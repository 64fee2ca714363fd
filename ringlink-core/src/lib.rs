//! Board-agnostic serial core
//!
//! This crate contains the parts of the serial stack that sit between a
//! UART interrupt handler and application code:
//!
//! - Fixed-capacity single-producer/single-consumer byte queue
//! - Serial channel driver (RX/TX queues, interrupt hooks, loopback)
//!
//! Exactly two execution contexts touch a channel: the UART interrupt and
//! one cooperative application loop. Everything here is allocation-free.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// Must come first so the logging macros are visible to the other modules
mod fmt;

pub mod queue;
pub mod serial;

pub use queue::RingQueue;
pub use serial::{SerialChannel, SerialError, SerialPort};
