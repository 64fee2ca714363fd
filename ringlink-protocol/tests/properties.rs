//! Codec properties over arbitrary payloads

use heapless::{Deque, Vec};
use proptest::prelude::*;
use ringlink_hal::SliceSource;
use ringlink_protocol::{encoded_len, Packet, PacketReader, PacketWriter, END, ESC};

const CAP: usize = 32;

fn encode(payload: &[u8]) -> Vec<u8, 128> {
    let mut writer = PacketWriter::new(Vec::<u8, 128>::new());
    writer.write_payload(payload).unwrap();
    writer.into_inner()
}

/// Payloads biased towards the two bytes that need escaping
fn payload() -> impl Strategy<Value = std::vec::Vec<u8>> {
    let byte = prop_oneof![Just(END), Just(ESC), any::<u8>()];
    proptest::collection::vec(byte, 0..=CAP)
}

fn read_all<S: ringlink_hal::ByteSource>(
    reader: &mut PacketReader<S>,
    packet: &mut Packet<CAP>,
    out: &mut std::vec::Vec<std::vec::Vec<u8>>,
) {
    while reader.read(packet) {
        out.push(packet.payload().to_vec());
    }
}

proptest! {
    #[test]
    fn roundtrip_through_append(data in payload()) {
        let encoded = encode(&data);
        prop_assert_eq!(encoded.len(), encoded_len(&data));

        let mut packet = Packet::<CAP>::new();
        let mut last = None;
        for &byte in encoded.iter() {
            if packet.append(byte) {
                last = Some(packet.payload().to_vec());
            }
        }

        prop_assert_eq!(last, Some(data));
        prop_assert!(!packet.is_truncated());
    }

    #[test]
    fn roundtrip_through_packets(data in payload()) {
        prop_assume!(!data.is_empty());

        let sent = Packet::<CAP>::from_slice(&data).unwrap();
        let mut writer = PacketWriter::new(Vec::<u8, 128>::new());
        writer.write(&sent).unwrap();

        let wire = writer.into_inner();
        let mut reader = PacketReader::new(SliceSource::new(&wire));
        let mut received = Packet::<CAP>::new();
        prop_assert!(reader.read(&mut received));
        prop_assert_eq!(received.payload(), sent.payload());
    }

    #[test]
    fn byte_at_a_time_matches_bulk(
        payloads in proptest::collection::vec(payload(), 1..6),
        chunk in 1usize..9,
    ) {
        let mut stream = std::vec::Vec::new();
        for p in &payloads {
            stream.extend_from_slice(&encode(p));
        }

        let mut bulk = std::vec::Vec::new();
        let mut reader = PacketReader::new(SliceSource::new(&stream));
        read_all(&mut reader, &mut Packet::new(), &mut bulk);

        // Same stream arriving in small bursts with the source running dry between them
        let mut trickled = std::vec::Vec::new();
        let mut reader = PacketReader::new(Deque::<u8, 16>::new());
        let mut packet = Packet::new();
        for piece in stream.chunks(chunk) {
            for &byte in piece {
                reader.source_mut().push_back(byte).unwrap();
            }
            read_all(&mut reader, &mut packet, &mut trickled);
        }

        let expected: std::vec::Vec<_> = payloads.into_iter().filter(|p| !p.is_empty()).collect();
        prop_assert_eq!(&bulk, &expected);
        prop_assert_eq!(&trickled, &expected);
    }

    #[test]
    fn garbage_prefix_does_not_leak_into_next_packet(data in payload()) {
        prop_assume!(!data.is_empty());

        let mut stream = std::vec::Vec::from([ESC, ESC, END]);
        stream.extend_from_slice(&encode(&data));

        let mut packets = std::vec::Vec::new();
        let mut reader = PacketReader::new(SliceSource::new(&stream));
        read_all(&mut reader, &mut Packet::new(), &mut packets);
        prop_assert_eq!(packets, vec![data]);
    }
}

#[test]
fn capacity_sized_payload_roundtrips() {
    let data = [END; CAP];
    let wire = encode(&data);
    assert_eq!(wire.len(), 2 * CAP + 2);

    let mut reader = PacketReader::new(SliceSource::new(&wire));
    let mut packet = Packet::<CAP>::new();
    assert!(reader.read(&mut packet));
    assert_eq!(packet.payload(), &data);
    assert!(!packet.is_truncated());
}

#[test]
fn oversized_payload_is_truncated_not_dropped() {
    let data = [0x11u8; CAP + 5];
    let wire = encode(&data);

    let mut reader = PacketReader::new(SliceSource::new(&wire));
    let mut packet = Packet::<CAP>::new();
    assert!(reader.read(&mut packet));
    assert_eq!(packet.len(), CAP);
    assert!(packet.is_truncated());
}
