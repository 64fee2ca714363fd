//! Packet reader
//!
//! Pulls bytes from a non-blocking source into a [`Packet`] until a frame
//! completes or the source runs dry. Safe to call on every pass of a
//! polling loop; partial packets carry over in the `Packet`.

use ringlink_hal::ByteSource;

use crate::packet::Packet;

/// Reads SLIP packets from a byte source
#[derive(Debug)]
pub struct PacketReader<S> {
    source: S,
}

impl<S: ByteSource> PacketReader<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Decode until a packet is ready or no byte is available
    ///
    /// Returns `true` with the packet in `packet.payload()`. Zero-length
    /// frames (the `END END` between back-to-back packets) are skipped.
    pub fn read<const N: usize>(&mut self, packet: &mut Packet<N>) -> bool {
        while let Some(byte) = self.source.read_byte() {
            if packet.append(byte) && !packet.is_empty() {
                trace!("slip: packet ready, {} bytes", packet.len());
                return true;
            }
        }
        false
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn into_inner(self) -> S {
        self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringlink_hal::SliceSource;

    #[test]
    fn test_read_single_packet() {
        let mut reader = PacketReader::new(SliceSource::new(&[0xC0, 0x41, 0x42, 0xC0]));
        let mut packet = Packet::<8>::new();

        assert!(reader.read(&mut packet));
        assert_eq!(packet.payload(), &[0x41, 0x42]);
        assert_eq!(packet.len(), 2);
        assert!(!reader.read(&mut packet));
    }

    #[test]
    fn test_read_back_to_back_packets() {
        let stream = [0xC0, 0x01, 0xC0, 0xC0, 0x02, 0x03, 0xC0];
        let mut reader = PacketReader::new(SliceSource::new(&stream));
        let mut packet = Packet::<8>::new();

        assert!(reader.read(&mut packet));
        assert_eq!(packet.payload(), &[0x01]);
        assert!(reader.read(&mut packet));
        assert_eq!(packet.payload(), &[0x02, 0x03]);
        assert!(!reader.read(&mut packet));
    }

    #[test]
    fn test_read_stops_mid_packet() {
        let mut reader = PacketReader::new(SliceSource::new(&[0xC0, 0x10, 0x20]));
        let mut packet = Packet::<8>::new();

        assert!(!reader.read(&mut packet));
        assert_eq!(packet.pending(), 2);
        assert!(reader.source().remaining().is_empty());
    }

    #[test]
    fn test_malformed_prefix_yields_only_valid_packet() {
        let stream = [0xDB, 0xDB, 0xC0, 0xC0, 0x55, 0xDB, 0xDC, 0xC0];
        let mut reader = PacketReader::new(SliceSource::new(&stream));
        let mut packet = Packet::<8>::new();

        assert!(reader.read(&mut packet));
        assert_eq!(packet.payload(), &[0x55, 0xC0]);
        assert!(!reader.read(&mut packet));
    }

    #[test]
    fn test_resync_after_noise() {
        // Garbage before the first END ends up in a packet of its own
        let stream = [0x12, 0x34, 0xC0, 0xAA, 0xC0];
        let mut reader = PacketReader::new(SliceSource::new(&stream));
        let mut packet = Packet::<8>::new();

        assert!(reader.read(&mut packet));
        assert_eq!(packet.payload(), &[0x12, 0x34]);
        assert!(reader.read(&mut packet));
        assert_eq!(packet.payload(), &[0xAA]);
    }
}
