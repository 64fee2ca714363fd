//! SLIP stream packet framing
//!
//! Implements RFC 1055 Serial Line IP framing over byte-at-a-time sources
//! and sinks, so packets can be assembled from a UART one interrupt's worth
//! of data at a time.
//!
//! # Wire Format
//!
//! ```text
//! ┌─────┬──────────────────────────────┬─────┐
//! │ END │ payload (END/ESC escaped)    │ END │
//! │ C0  │ C0 -> DB DC   DB -> DB DD    │ C0  │
//! └─────┴──────────────────────────────┴─────┘
//! ```
//!
//! The leading `END` flushes any line noise accumulated at the receiver,
//! so a frame damaged mid-stream costs only that frame.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// Must come first so the logging macros are visible to the other modules
mod fmt;

pub mod packet;
pub mod reader;
pub mod writer;

pub use packet::{Packet, SlipError};
pub use reader::PacketReader;
pub use writer::{encoded_len, PacketWriter};

/// Frame delimiter
pub const END: u8 = 0xC0;
/// Escape introducer
pub const ESC: u8 = 0xDB;
/// Escaped `END`
pub const ESC_END: u8 = 0xDC;
/// Escaped `ESC`
pub const ESC_ESC: u8 = 0xDD;
