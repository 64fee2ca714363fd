//! Serial channel state machine
//!
//! `Uninitialized -> Initialized -> Uninitialized`. The stored config doubles
//! as the state: `Some` while the binding is up.

use core::cell::Cell;
use core::hint::spin_loop;

use critical_section::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use portable_atomic::{AtomicBool, Ordering};
use ringlink_hal::{ByteSink, ByteSource, SerialBinding, SerialConfig, SerialHooks, TxPull};

use super::{SerialError, SerialPort};
use crate::queue::RingQueue;

/// Interrupt-driven serial channel
///
/// `RX` and `TX` are the queue capacities (powers of two; one slot of each
/// is reserved). Meant to live in a `static` so the binding can call back
/// into it from the UART interrupt:
///
/// ```ignore
/// static UART0: SerialChannel<Rp2040Uart, 64, 64> = SerialChannel::new(Rp2040Uart::new());
///
/// UART0.init(SerialConfig::new(0, 115_200))?;
/// UART0.write(b"hello")?;
/// ```
pub struct SerialChannel<B, const RX: usize, const TX: usize> {
    binding: B,
    config: Mutex<Cell<Option<SerialConfig>>>,
    /// Written by the application, read by the RX interrupt
    loopback: AtomicBool,
    /// Producer: RX interrupt. Consumer: application.
    rx: RingQueue<u8, RX>,
    /// Producer: application (or RX interrupt in loopback). Consumer: TX interrupt.
    tx: RingQueue<u8, TX>,
    rx_ready: Signal<CriticalSectionRawMutex, ()>,
    tx_space: Signal<CriticalSectionRawMutex, ()>,
}

impl<B: SerialBinding, const RX: usize, const TX: usize> SerialChannel<B, RX, TX> {
    /// Create an uninitialized channel around a binding
    pub const fn new(binding: B) -> Self {
        Self {
            binding,
            config: Mutex::new(Cell::new(None)),
            loopback: AtomicBool::new(false),
            rx: RingQueue::new(),
            tx: RingQueue::new(),
            rx_ready: Signal::new(),
            tx_space: Signal::new(),
        }
    }

    /// Access the hardware binding
    pub fn binding(&self) -> &B {
        &self.binding
    }

    /// Bring the channel up
    ///
    /// Validates the config, then hands `self` to the binding as the
    /// interrupt hooks. The config is published before the binding runs so
    /// hooks firing during peripheral bring-up see a live channel; it is
    /// withdrawn again if the binding fails.
    pub fn init(&'static self, config: SerialConfig) -> Result<(), SerialError<B::Error>>
    where
        B: Sync + 'static,
    {
        if config.channel >= B::CHANNEL_COUNT {
            warn!(
                "serial: channel {} out of range ({} available)",
                config.channel,
                B::CHANNEL_COUNT
            );
            return Err(SerialError::InvalidChannel);
        }
        config.validate()?;

        let claimed = critical_section::with(|cs| {
            let state = self.config.borrow(cs);
            if state.get().is_some() {
                return false;
            }
            state.set(Some(config));
            true
        });
        if !claimed {
            return Err(SerialError::AlreadyInitialized);
        }

        if let Err(e) = self.binding.init(&config, self) {
            warn!("serial: binding init failed on channel {}", config.channel);
            self.rx.reset();
            self.tx.reset();
            self.rx_ready.reset();
            self.tx_space.reset();
            critical_section::with(|cs| self.config.borrow(cs).set(None));
            return Err(SerialError::Binding(e));
        }

        debug!(
            "serial: channel {} up at {} baud",
            config.channel,
            config.baudrate
        );
        Ok(())
    }

    /// Shut the channel down
    ///
    /// Clears loopback and discards anything still queued in either
    /// direction. If the binding refuses, the channel stays initialized.
    pub fn deinit(&self) -> Result<(), SerialError<B::Error>> {
        let config = self.config().ok_or(SerialError::NotInitialized)?;

        if let Err(e) = self.binding.deinit(&config) {
            warn!("serial: binding deinit failed on channel {}", config.channel);
            return Err(SerialError::Binding(e));
        }

        self.loopback.store(false, Ordering::Release);
        self.rx.reset();
        self.tx.reset();
        self.rx_ready.reset();
        self.tx_space.reset();
        critical_section::with(|cs| self.config.borrow(cs).set(None));

        debug!("serial: channel {} down", config.channel);
        Ok(())
    }

    /// Check if `init` has succeeded and `deinit` has not been called since
    pub fn is_initialized(&self) -> bool {
        self.config().is_some()
    }

    /// Effective configuration, if initialized
    pub fn config(&self) -> Option<SerialConfig> {
        critical_section::with(|cs| self.config.borrow(cs).get())
    }

    /// Config of a running channel with its receiver enabled
    pub(super) fn rx_config(&self) -> Result<SerialConfig, SerialError<B::Error>> {
        let config = self.config().ok_or(SerialError::NotInitialized)?;
        if !config.direction.has_rx() {
            return Err(SerialError::DirectionDisabled);
        }
        Ok(config)
    }

    /// Config of a running channel with its transmitter enabled
    pub(super) fn tx_config(&self) -> Result<SerialConfig, SerialError<B::Error>> {
        let config = self.config().ok_or(SerialError::NotInitialized)?;
        if !config.direction.has_tx() {
            return Err(SerialError::DirectionDisabled);
        }
        Ok(config)
    }

    /// Redirect received bytes straight back out of the transmitter
    pub fn set_loopback(&self, enabled: bool) {
        self.loopback.store(enabled, Ordering::Release);
    }

    pub fn is_loopback(&self) -> bool {
        self.loopback.load(Ordering::Acquire)
    }

    /// Bytes waiting to be read
    pub fn rx_available(&self) -> usize {
        self.rx.size()
    }

    /// Bytes waiting to be transmitted
    pub fn tx_pending(&self) -> usize {
        self.tx.size()
    }

    /// Drain up to `buf.len()` received bytes
    ///
    /// Returns the number of bytes copied; zero means nothing was available.
    pub fn read(&self, buf: &mut [u8]) -> usize {
        let mut count = 0;
        for slot in buf.iter_mut() {
            match self.rx.remove() {
                Some(byte) => {
                    *slot = byte;
                    count += 1;
                }
                None => break,
            }
        }
        count
    }

    /// Take a single received byte
    pub fn read_byte(&self) -> Option<u8> {
        self.rx.remove()
    }

    /// Queue bytes for transmission
    ///
    /// Spins while the TX queue is full, re-arming the transmitter so the
    /// interrupt keeps draining it. There is no timeout; use [`try_write`]
    /// where blocking is not acceptable.
    ///
    /// [`try_write`]: Self::try_write
    pub fn write(&self, data: &[u8]) -> Result<(), SerialError<B::Error>> {
        let config = self.tx_config()?;

        for &byte in data {
            while self.tx.insert(byte).is_err() {
                self.binding.start_tx(&config);
                spin_loop();
            }
        }

        if !data.is_empty() {
            self.binding.start_tx(&config);
        }
        Ok(())
    }

    /// Queue a single byte for transmission
    pub fn write_byte(&self, byte: u8) -> Result<(), SerialError<B::Error>> {
        self.write(&[byte])
    }

    /// Queue as many bytes as currently fit, without waiting
    ///
    /// Returns the number of bytes accepted from the front of `data`.
    pub fn try_write(&self, data: &[u8]) -> Result<usize, SerialError<B::Error>> {
        let config = self.tx_config()?;

        let accepted = data
            .iter()
            .take_while(|&&byte| self.tx.insert(byte).is_ok())
            .count();

        if accepted > 0 {
            self.binding.start_tx(&config);
        }
        Ok(accepted)
    }

    /// Spin until the TX queue is empty
    ///
    /// The last byte may still be in the shift register when this returns.
    pub fn flush(&self) -> Result<(), SerialError<B::Error>> {
        let config = self.config().ok_or(SerialError::NotInitialized)?;

        while !self.tx.is_empty() {
            self.binding.start_tx(&config);
            spin_loop();
        }
        Ok(())
    }

    /// Wait until at least one byte is available, then drain like [`read`]
    ///
    /// [`read`]: Self::read
    pub async fn read_async(&self, buf: &mut [u8]) -> Result<usize, SerialError<B::Error>> {
        self.rx_config()?;
        if buf.is_empty() {
            return Ok(0);
        }

        loop {
            let count = self.read(buf);
            if count > 0 {
                return Ok(count);
            }
            self.rx_ready.wait().await;
        }
    }

    /// Wait until at least one byte fits, then queue like [`try_write`]
    ///
    /// [`try_write`]: Self::try_write
    pub async fn write_async(&self, data: &[u8]) -> Result<usize, SerialError<B::Error>> {
        self.tx_config()?;
        if data.is_empty() {
            return Ok(0);
        }

        loop {
            let accepted = self.try_write(data)?;
            if accepted > 0 {
                return Ok(accepted);
            }
            self.tx_space.wait().await;
        }
    }

    /// Wait until the TX queue is empty
    pub async fn flush_async(&self) -> Result<(), SerialError<B::Error>> {
        let config = self.config().ok_or(SerialError::NotInitialized)?;

        while !self.tx.is_empty() {
            self.binding.start_tx(&config);
            self.tx_space.wait().await;
        }
        Ok(())
    }

    /// Borrow the channel as an `embedded-io` port
    pub fn port(&self) -> SerialPort<'_, B, RX, TX> {
        SerialPort::new(self)
    }
}

impl<B, const RX: usize, const TX: usize> SerialHooks for SerialChannel<B, RX, TX>
where
    B: SerialBinding + Sync,
{
    fn on_rx(&self, byte: u8) {
        if !self.loopback.load(Ordering::Acquire) {
            // Already off the wire, nowhere to push back to
            if self.rx.insert(byte).is_err() {
                trace!("serial: rx queue full, dropped {=u8:#x}", byte);
            } else {
                self.rx_ready.signal(());
            }
            return;
        }

        if self.tx.insert(byte).is_ok() {
            if let Some(config) = self.config() {
                self.binding.start_tx(&config);
            }
        } else {
            trace!("serial: loopback tx queue full, dropped {=u8:#x}", byte);
        }
    }

    fn on_tx_ready(&self) -> TxPull {
        let byte = self.tx.remove();
        let remaining = self.tx.size();
        self.tx_space.signal(());
        TxPull { byte, remaining }
    }
}

impl<B: SerialBinding, const RX: usize, const TX: usize> ByteSource
    for &SerialChannel<B, RX, TX>
{
    fn read_byte(&mut self) -> Option<u8> {
        self.rx.remove()
    }
}

impl<B: SerialBinding, const RX: usize, const TX: usize> ByteSink for &SerialChannel<B, RX, TX> {
    fn write_byte(&mut self, byte: u8) -> bool {
        SerialChannel::write_byte(*self, byte).is_ok()
    }
}
