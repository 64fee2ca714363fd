//! Serial channel driver
//!
//! A [`SerialChannel`] owns one RX and one TX [`RingQueue`](crate::RingQueue)
//! and sits between a vendor [`SerialBinding`](ringlink_hal::SerialBinding)
//! and the application:
//!
//! ```text
//!  RX ISR ──on_rx──▶ [rx queue] ──read──▶ application
//!  application ──write──▶ [tx queue] ──on_tx_ready──▶ TX ISR
//! ```
//!
//! With loopback enabled, `on_rx` feeds the TX queue instead.

mod channel;
mod error;
mod port;

pub use channel::SerialChannel;
pub use error::SerialError;
pub use port::SerialPort;
