//! Byte-at-a-time I/O capabilities
//!
//! The SLIP codec only ever needs "give me a byte if you have one" and
//! "take this byte if you can". A serial channel provides both, but so do
//! plain buffers, which is what the host tests use.

use heapless::{Deque, Vec};

/// Non-blocking byte producer
pub trait ByteSource {
    /// Take the next byte, or `None` if nothing is available right now
    fn read_byte(&mut self) -> Option<u8>;
}

/// Byte consumer
pub trait ByteSink {
    /// Offer one byte; returns `false` if it was not accepted
    fn write_byte(&mut self, byte: u8) -> bool;
}

impl<T: ByteSource + ?Sized> ByteSource for &mut T {
    fn read_byte(&mut self) -> Option<u8> {
        (**self).read_byte()
    }
}

impl<T: ByteSink + ?Sized> ByteSink for &mut T {
    fn write_byte(&mut self, byte: u8) -> bool {
        (**self).write_byte(byte)
    }
}

impl<const N: usize> ByteSink for Vec<u8, N> {
    fn write_byte(&mut self, byte: u8) -> bool {
        self.push(byte).is_ok()
    }
}

impl<const N: usize> ByteSource for Deque<u8, N> {
    fn read_byte(&mut self) -> Option<u8> {
        self.pop_front()
    }
}

/// Cursor over a borrowed byte slice
#[derive(Debug, Clone)]
pub struct SliceSource<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceSource<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes not yet consumed
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }
}

impl ByteSource for SliceSource<'_> {
    fn read_byte(&mut self) -> Option<u8> {
        let byte = *self.data.get(self.pos)?;
        self.pos += 1;
        Some(byte)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_source_drains_in_order() {
        let mut src = SliceSource::new(&[1, 2, 3]);
        assert_eq!(src.read_byte(), Some(1));
        assert_eq!(src.remaining(), &[2, 3]);
        assert_eq!(src.read_byte(), Some(2));
        assert_eq!(src.read_byte(), Some(3));
        assert_eq!(src.read_byte(), None);
        assert_eq!(src.read_byte(), None);
    }

    #[test]
    fn test_vec_sink_rejects_when_full() {
        let mut sink: Vec<u8, 2> = Vec::new();
        assert!(sink.write_byte(0xAA));
        assert!(sink.write_byte(0xBB));
        assert!(!sink.write_byte(0xCC));
        assert_eq!(sink.as_slice(), &[0xAA, 0xBB]);
    }

    #[test]
    fn test_deque_source() {
        let mut q: Deque<u8, 4> = Deque::new();
        q.push_back(7).unwrap();
        q.push_back(8).unwrap();

        fn pull(mut src: impl ByteSource) -> Option<u8> {
            src.read_byte()
        }

        assert_eq!(pull(&mut q), Some(7));
        assert_eq!(q.read_byte(), Some(8));
        assert_eq!(q.read_byte(), None);
    }
}
