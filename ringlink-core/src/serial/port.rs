//! `embedded-io` adapter
//!
//! Lets drivers written against `embedded_io::{Read, Write}` (or their async
//! counterparts) talk through a [`SerialChannel`].

use core::hint::spin_loop;

use ringlink_hal::SerialBinding;

use super::{SerialChannel, SerialError};

/// Borrowed handle implementing the `embedded-io` traits
pub struct SerialPort<'a, B, const RX: usize, const TX: usize> {
    channel: &'a SerialChannel<B, RX, TX>,
}

impl<'a, B: SerialBinding, const RX: usize, const TX: usize> SerialPort<'a, B, RX, TX> {
    pub(crate) fn new(channel: &'a SerialChannel<B, RX, TX>) -> Self {
        Self { channel }
    }

    /// The underlying channel
    pub fn channel(&self) -> &'a SerialChannel<B, RX, TX> {
        self.channel
    }
}

impl<B: SerialBinding, const RX: usize, const TX: usize> embedded_io::ErrorType
    for SerialPort<'_, B, RX, TX>
{
    type Error = SerialError<B::Error>;
}

impl<B: SerialBinding, const RX: usize, const TX: usize> embedded_io::Read
    for SerialPort<'_, B, RX, TX>
{
    /// Blocks until at least one byte has been received
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.channel.rx_config()?;
        if buf.is_empty() {
            return Ok(0);
        }

        loop {
            let count = self.channel.read(buf);
            if count > 0 {
                return Ok(count);
            }
            spin_loop();
        }
    }
}

impl<B: SerialBinding, const RX: usize, const TX: usize> embedded_io::ReadReady
    for SerialPort<'_, B, RX, TX>
{
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(self.channel.rx_available() > 0)
    }
}

impl<B: SerialBinding, const RX: usize, const TX: usize> embedded_io::Write
    for SerialPort<'_, B, RX, TX>
{
    /// Blocks until at least one byte has been queued
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.channel.tx_config()?;
        if buf.is_empty() {
            return Ok(0);
        }

        loop {
            let accepted = self.channel.try_write(buf)?;
            if accepted > 0 {
                return Ok(accepted);
            }
            spin_loop();
        }
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.channel.flush()
    }
}

impl<B: SerialBinding, const RX: usize, const TX: usize> embedded_io::WriteReady
    for SerialPort<'_, B, RX, TX>
{
    fn write_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(self.channel.tx_pending() < TX - 1)
    }
}

impl<B: SerialBinding, const RX: usize, const TX: usize> embedded_io_async::Read
    for SerialPort<'_, B, RX, TX>
{
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.channel.read_async(buf).await
    }
}

impl<B: SerialBinding, const RX: usize, const TX: usize> embedded_io_async::Write
    for SerialPort<'_, B, RX, TX>
{
    async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.channel.write_async(buf).await
    }

    async fn flush(&mut self) -> Result<(), Self::Error> {
        self.channel.flush_async().await
    }
}
