//! SLIP packets carried between two serial channels over a simulated wire

use core::cell::Cell;

use critical_section::Mutex;
use ringlink_core::SerialChannel;
use ringlink_hal::{SerialBinding, SerialConfig, SerialHooks};
use ringlink_protocol::{Packet, PacketReader, PacketWriter};

type Link = SerialChannel<Crossover, 64, 16>;

/// UART whose transmitter is wired straight into a peer channel's receiver
struct Crossover {
    hooks: Mutex<Cell<Option<&'static dyn SerialHooks>>>,
    peer: &'static Link,
}

impl Crossover {
    const fn new(peer: &'static Link) -> Self {
        Self {
            hooks: Mutex::new(Cell::new(None)),
            peer,
        }
    }
}

impl SerialBinding for Crossover {
    type Error = ();
    const CHANNEL_COUNT: u8 = 2;

    fn init(&self, _config: &SerialConfig, hooks: &'static dyn SerialHooks) -> Result<(), ()> {
        critical_section::with(|cs| self.hooks.borrow(cs).set(Some(hooks)));
        Ok(())
    }

    fn deinit(&self, _config: &SerialConfig) -> Result<(), ()> {
        critical_section::with(|cs| self.hooks.borrow(cs).set(None));
        Ok(())
    }

    fn start_tx(&self, _config: &SerialConfig) {
        let Some(local) = critical_section::with(|cs| self.hooks.borrow(cs).get()) else {
            return;
        };
        while let Some(byte) = local.on_tx_ready().byte {
            self.peer.on_rx(byte);
        }
    }
}

static HOST: Link = SerialChannel::new(Crossover::new(&DEVICE));
static DEVICE: Link = SerialChannel::new(Crossover::new(&HOST));

#[test]
fn packets_cross_between_channels() {
    HOST.init(SerialConfig::new(0, 115_200)).unwrap();
    DEVICE.init(SerialConfig::new(1, 115_200)).unwrap();

    let mut writer = PacketWriter::new(&HOST);
    let mut reader = PacketReader::new(&DEVICE);
    let mut packet = Packet::<32>::new();

    // Nothing on the wire yet
    assert!(!reader.read(&mut packet));

    let request = Packet::<32>::from_slice(&[0x01, 0xC0, 0xDB, 0x02]).unwrap();
    writer.write(&request).unwrap();
    assert!(reader.read(&mut packet));
    assert_eq!(packet.payload(), request.payload());

    // Device echoes it back the other way
    let mut writer = PacketWriter::new(&DEVICE);
    let mut reader = PacketReader::new(&HOST);
    writer.write(&packet).unwrap();

    let mut reply = Packet::<32>::new();
    assert!(reader.read(&mut reply));
    assert_eq!(reply.payload(), &[0x01, 0xC0, 0xDB, 0x02]);
    assert!(!reader.read(&mut reply));
}
