//! UART serial communication abstractions
//!
//! Configuration types plus the two traits that connect a serial channel to
//! a vendor UART driver. The binding side owns the registers and the
//! interrupt vector; the hooks side owns the queues.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Parity {
    #[default]
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StopBits {
    #[default]
    One,
    Two,
}

/// Which halves of the UART are in use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// Full duplex
    #[default]
    RxTx,
    /// Receive only
    Rx,
    /// Transmit only
    Tx,
}

impl Direction {
    /// Check if the receiver is enabled
    pub const fn has_rx(&self) -> bool {
        matches!(self, Direction::RxTx | Direction::Rx)
    }

    /// Check if the transmitter is enabled
    pub const fn has_tx(&self) -> bool {
        matches!(self, Direction::RxTx | Direction::Tx)
    }
}

/// RX/TX pin assignment
///
/// Pin numbers are opaque to the serial core; the binding maps them onto
/// whatever numbering its chip uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinPair {
    /// Receive pin
    pub rx: u8,
    /// Transmit pin
    pub tx: u8,
}

impl PinPair {
    /// Create a pin pair
    pub const fn new(rx: u8, tx: u8) -> Self {
        Self { rx, tx }
    }
}

impl Default for PinPair {
    fn default() -> Self {
        Self { rx: 0, tx: 1 }
    }
}

/// Configuration rejected before reaching the hardware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Baud rate of zero
    ZeroBaudrate,
    /// RX and TX share a pin while both directions are enabled
    PinConflict,
}

/// Serial channel configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SerialConfig {
    /// Peripheral index (UART0, UART1, ...)
    pub channel: u8,
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
    /// Enabled directions
    pub direction: Direction,
    /// Pin assignment
    pub pins: PinPair,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self::new(0, 115_200)
    }
}

impl SerialConfig {
    /// Create an 8N1 full-duplex config for a channel
    pub const fn new(channel: u8, baudrate: u32) -> Self {
        Self {
            channel,
            baudrate,
            parity: Parity::None,
            stop_bits: StopBits::One,
            direction: Direction::RxTx,
            pins: PinPair::new(0, 1),
        }
    }

    pub const fn with_parity(mut self, parity: Parity) -> Self {
        self.parity = parity;
        self
    }

    pub const fn with_stop_bits(mut self, stop_bits: StopBits) -> Self {
        self.stop_bits = stop_bits;
        self
    }

    pub const fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub const fn with_pins(mut self, rx: u8, tx: u8) -> Self {
        self.pins = PinPair::new(rx, tx);
        self
    }

    /// Check the parts of the config that do not depend on the chip
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.baudrate == 0 {
            return Err(ConfigError::ZeroBaudrate);
        }
        if self.direction == Direction::RxTx && self.pins.rx == self.pins.tx {
            return Err(ConfigError::PinConflict);
        }
        Ok(())
    }
}

/// Result of asking the channel for the next byte to transmit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TxPull {
    /// Byte to load into the shift register, if any
    pub byte: Option<u8>,
    /// Bytes still queued after this one
    ///
    /// The binding disarms its transmit-ready interrupt once this reaches zero.
    pub remaining: usize,
}

/// Interrupt-context callbacks implemented by a serial channel
///
/// Both methods are invoked by the binding from its UART interrupt handler.
/// The handler must not re-enter itself.
pub trait SerialHooks: Sync {
    /// A byte arrived on the wire
    fn on_rx(&self, byte: u8);

    /// The transmitter can accept another byte
    fn on_tx_ready(&self) -> TxPull;
}

/// Vendor-specific UART driver
///
/// Implementations program clocks, pins and registers and route the UART
/// interrupt into the registered [`SerialHooks`]. Methods take `&self`
/// because `start_tx` is reached from both application and interrupt context.
pub trait SerialBinding {
    /// Error type for init/deinit
    type Error: core::fmt::Debug;

    /// Number of UART peripherals this binding can drive
    const CHANNEL_COUNT: u8;

    /// Bring up the peripheral and register the hooks
    ///
    /// On failure the peripheral must be left untouched.
    fn init(&self, config: &SerialConfig, hooks: &'static dyn SerialHooks)
        -> Result<(), Self::Error>;

    /// Shut the peripheral down and forget the hooks
    fn deinit(&self, config: &SerialConfig) -> Result<(), Self::Error>;

    /// Arm the transmit-ready interrupt
    ///
    /// Must be a no-op if transmission is already in progress.
    fn start_tx(&self, config: &SerialConfig);
}
