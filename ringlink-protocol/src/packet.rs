//! SLIP packet buffer and incremental decoder
//!
//! A [`Packet`] owns a fixed payload buffer. For encoding it simply holds
//! the payload. For decoding it also carries the in-progress cursor and
//! escape state between calls, so bytes can be fed in one at a time as
//! they come off the wire.

use crate::{END, ESC, ESC_END, ESC_ESC};

/// Errors from building or transmitting packets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SlipError {
    /// Payload does not fit in the packet buffer
    PayloadTooLarge,
    /// The byte sink refused a byte mid-frame
    SinkRejected,
}

/// Fixed-capacity SLIP packet
#[derive(Debug, Clone)]
pub struct Packet<const N: usize> {
    buf: [u8; N],
    /// Valid bytes: the payload to send, or the last completed decode
    len: usize,
    /// Bytes stored so far for the packet being decoded
    read_counter: usize,
    /// Previous byte was `ESC`
    escaping: bool,
    /// In-progress packet has lost bytes to overflow
    overflowed: bool,
    /// Last completed packet lost bytes to overflow
    truncated: bool,
}

impl<const N: usize> Default for Packet<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Packet<N> {
    /// Create an empty packet
    pub const fn new() -> Self {
        Self {
            buf: [0; N],
            len: 0,
            read_counter: 0,
            escaping: false,
            overflowed: false,
            truncated: false,
        }
    }

    /// Create a packet holding `payload`
    pub fn from_slice(payload: &[u8]) -> Result<Self, SlipError> {
        let mut packet = Self::new();
        packet.set_payload(payload)?;
        Ok(packet)
    }

    /// Replace the payload
    pub fn set_payload(&mut self, payload: &[u8]) -> Result<(), SlipError> {
        if payload.len() > N {
            return Err(SlipError::PayloadTooLarge);
        }
        self.buf[..payload.len()].copy_from_slice(payload);
        self.len = payload.len();
        self.truncated = false;
        Ok(())
    }

    /// Maximum payload size
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Payload length
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Payload bytes
    ///
    /// After a decode completes this stays valid until the next byte is
    /// appended; the buffer is shared with the packet being assembled.
    pub fn payload(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Whether the last completed packet overflowed the buffer
    ///
    /// Bytes past `capacity()` are dropped; the payload holds the first
    /// `capacity()` bytes of what was sent.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Bytes accumulated for the packet currently being decoded
    pub fn pending(&self) -> usize {
        self.read_counter
    }

    /// Forget the payload and any partially decoded packet
    pub fn clear(&mut self) {
        self.len = 0;
        self.truncated = false;
        self.abort();
    }

    /// Feed one received byte to the decoder
    ///
    /// Returns `true` when `END` closes a packet; [`payload`](Self::payload)
    /// then holds it. Back-to-back `END`s complete zero-length packets.
    pub fn append(&mut self, byte: u8) -> bool {
        if byte == END {
            self.len = self.read_counter;
            self.truncated = self.overflowed;
            if self.truncated {
                warn!("slip: packet truncated to {} bytes", self.len);
            }
            self.read_counter = 0;
            self.escaping = false;
            self.overflowed = false;
            return true;
        }

        if self.escaping {
            self.escaping = false;
            let decoded = match byte {
                ESC_END => END,
                ESC_ESC => ESC,
                ESC => {
                    warn!(
                        "slip: double escape, discarding {} buffered bytes",
                        self.read_counter
                    );
                    self.abort();
                    return false;
                }
                // Not a valid escape; RFC 1055 keeps the byte as-is
                other => {
                    trace!("slip: stray escape before {=u8:#x}", other);
                    other
                }
            };
            self.store(decoded);
            return false;
        }

        if byte == ESC {
            self.escaping = true;
        } else {
            self.store(byte);
        }
        false
    }

    fn store(&mut self, byte: u8) {
        match self.buf.get_mut(self.read_counter) {
            Some(slot) => {
                *slot = byte;
                self.read_counter += 1;
            }
            None => self.overflowed = true,
        }
    }

    fn abort(&mut self) {
        self.read_counter = 0;
        self.escaping = false;
        self.overflowed = false;
    }
}
