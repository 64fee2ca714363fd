//! Packet writer

use ringlink_hal::ByteSink;

use crate::packet::{Packet, SlipError};
use crate::{END, ESC, ESC_END, ESC_ESC};

/// Number of bytes `payload` occupies on the wire, delimiters included
pub fn encoded_len(payload: &[u8]) -> usize {
    let escaped = payload.iter().filter(|&&b| b == END || b == ESC).count();
    payload.len() + escaped + 2
}

/// Writes SLIP packets to a byte sink
#[derive(Debug)]
pub struct PacketWriter<S> {
    sink: S,
}

impl<S: ByteSink> PacketWriter<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    /// Encode and send a packet's payload
    pub fn write<const N: usize>(&mut self, packet: &Packet<N>) -> Result<(), SlipError> {
        self.write_payload(packet.payload())
    }

    /// Encode and send a raw payload
    ///
    /// Stops at the first byte the sink refuses. Whatever was already sent
    /// stays on the wire; the receiver discards it at the next `END`.
    pub fn write_payload(&mut self, payload: &[u8]) -> Result<(), SlipError> {
        self.emit(END)?;
        for &byte in payload {
            match byte {
                END => {
                    self.emit(ESC)?;
                    self.emit(ESC_END)?;
                }
                ESC => {
                    self.emit(ESC)?;
                    self.emit(ESC_ESC)?;
                }
                _ => self.emit(byte)?,
            }
        }
        self.emit(END)
    }

    /// Send a single bare `ESC`
    ///
    /// Outside any frame. A receiver sees a pending escape that the next
    /// frame's leading `END` cancels, so this never corrupts a packet.
    pub fn flush(&mut self) -> Result<(), SlipError> {
        self.emit(ESC)
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_inner(self) -> S {
        self.sink
    }

    fn emit(&mut self, byte: u8) -> Result<(), SlipError> {
        if self.sink.write_byte(byte) {
            Ok(())
        } else {
            warn!("slip: sink rejected byte, frame aborted");
            Err(SlipError::SinkRejected)
        }
    }
}
