//! Ringlink Hardware Abstraction Layer
//!
//! This crate defines the seams between the board-agnostic serial core and
//! the vendor code that actually pokes UART registers. Chip-specific crates
//! implement [`uart::SerialBinding`]; the serial channel implements
//! [`uart::SerialHooks`] and hands itself to the binding during init.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application / ringlink-protocol (SLIP) │
//! └─────────────────────────────────────────┘
//!                     │  ByteSource / ByteSink
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  ringlink-core (queues, serial channel) │
//! └─────────────────────────────────────────┘
//!                     │  SerialBinding ▲ SerialHooks
//!                     ▼                │
//! ┌─────────────────────────────────────────┐
//! │  vendor binding (registers, ISR glue)   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::SerialBinding`] - Register-level init/deinit/start-transmit
//! - [`uart::SerialHooks`] - Interrupt-context callbacks into the channel
//! - [`io::ByteSource`], [`io::ByteSink`] - Byte-at-a-time capabilities

#![no_std]
#![deny(unsafe_code)]

pub mod io;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use io::{ByteSink, ByteSource, SliceSource};
pub use uart::{
    ConfigError, Direction, Parity, PinPair, SerialBinding, SerialConfig, SerialHooks, StopBits,
    TxPull,
};
