use quic_fec::config::FecConfig;
use quic_fec::fec::{
    coeffs::gen_coeffs, linear::linear_combination, FecEncoder, FecRecoverer, RepairPacketSink,
    RepairSymbol, SourceSymbol,
};
use quic_fec::packet::{CryptoContext, NullCrypto, PacketBuilder};

#[derive(Default)]
struct RepairCollector {
    emitted: Vec<RepairSymbol>,
}

impl RepairPacketSink for RepairCollector {
    fn build_repair_packet(
        &mut self,
        _crypto: &mut dyn CryptoContext,
        fss_esi: u64,
        nss: u8,
        repair_key: u8,
        payload: &[u8],
    ) {
        self.emitted.push(RepairSymbol {
            fss_esi,
            nss,
            repair_key,
            data: payload.to_vec(),
        });
    }
}

/// The scenario walked through in the design notes: five 100-byte source
/// packets fill the encoding window exactly once, triggering two repair
/// packets on packet 5; packets 2 and 4 are lost in flight and both
/// recovered from those two repairs.
#[test]
fn five_packets_two_losses_recovered_via_two_repairs() {
    let cfg = FecConfig::default();
    let mut encoder = FecEncoder::new(cfg);
    let mut recoverer = FecRecoverer::new(cfg);
    let mut sink = RepairCollector::default();
    let mut crypto = NullCrypto;

    let payloads: Vec<Vec<u8>> = (1u64..=5).map(|i| vec![i as u8; 100]).collect();
    let dropped = [1u64, 3u64];

    for (i, payload) in payloads.iter().enumerate() {
        let packet_number = i as u64;
        encoder.on_short_header_packet(packet_number, payload, &mut sink, &mut crypto);

        if !dropped.contains(&packet_number) {
            recoverer.add_source_symbol(SourceSymbol {
                packet_number,
                data: payload.clone(),
            });
        }
    }

    assert_eq!(sink.emitted.len(), 2, "fec_pace=2 triggers num_repair=2 once the window fills");
    for repair in sink.emitted.drain(..) {
        recoverer.add_repair_symbol(repair);
    }

    let mut recovered = recoverer.recover().expect("two repairs should recover two losses");
    recovered.sort_by_key(|s| s.packet_number);
    assert_eq!(recovered.len(), 2);
    assert_eq!(recovered[0].packet_number, 1);
    assert_eq!(recovered[0].data, payloads[1]);
    assert_eq!(recovered[1].packet_number, 3);
    assert_eq!(recovered[1].data, payloads[3]);
}

/// Repair packets travel the exact same datagram path as a short-header
/// data packet: building one does not disturb the builder's running
/// packet-number counter or its notion of the last source payload.
#[test]
fn repair_packets_share_the_short_header_datagram_path() {
    let mut builder = PacketBuilder::new(vec![1, 2, 3, 4]);
    let mut crypto = NullCrypto;

    let (pn0, _) = builder.build_short_header_packet(&mut crypto, b"first payload");
    let (pn1, _) = builder.build_short_header_packet(&mut crypto, b"second payload");
    assert_eq!(pn1, pn0 + 1);

    let repair_bytes = builder.build_repair_packet(&mut crypto, pn1, 2, 5, b"repair payload");
    assert!(!repair_bytes.is_empty());

    // Building a repair packet does not record it as a short-header packet.
    assert_eq!(
        builder.current_short_header_packet_payload,
        Some(b"second payload".to_vec())
    );
    assert_eq!(builder.current_short_header_packet_num, pn1);
}

/// Coefficients are regenerated independently by sender and receiver
/// from only the repair_key; the combination round-trips through the
/// public linear-combination and recoverer API without ever sharing a
/// coefficient vector out of band.
#[test]
fn coefficients_regenerate_identically_on_both_sides() {
    let window_size = 4;
    let density = 15;
    let repair_key = 200u8;

    let sender_coeffs = gen_coeffs(repair_key, window_size, density);
    let receiver_coeffs = gen_coeffs(repair_key, window_size, density);
    assert_eq!(sender_coeffs, receiver_coeffs);

    let payloads: Vec<Vec<u8>> = (0..window_size).map(|i| vec![(i * 3) as u8; 10]).collect();
    let refs: Vec<&[u8]> = payloads.iter().map(|v| v.as_slice()).collect();
    let repair_payload = linear_combination(&refs, &sender_coeffs);

    let mut recoverer = FecRecoverer::new(FecConfig::default());
    for (i, payload) in payloads.iter().enumerate().take(window_size - 1) {
        recoverer.add_source_symbol(SourceSymbol {
            packet_number: i as u64,
            data: payload.clone(),
        });
    }
    recoverer.add_repair_symbol(RepairSymbol {
        fss_esi: (window_size - 1) as u64,
        nss: window_size as u8,
        repair_key,
        data: repair_payload,
    });

    let recovered = recoverer.recover().expect("single loss should recover");
    assert_eq!(recovered.len(), 1);
    assert_eq!(recovered[0].packet_number, (window_size - 1) as u64);
    assert_eq!(recovered[0].data, payloads[window_size - 1]);
}

/// When loss exceeds the available repair rank, recovery must report
/// nothing rather than publish a partially-solved payload.
#[test]
fn unrecoverable_loss_yields_no_recovery() {
    let mut recoverer = FecRecoverer::new(FecConfig::default());
    recoverer.add_source_symbol(SourceSymbol {
        packet_number: 0,
        data: vec![1, 2, 3],
    });
    recoverer.add_repair_symbol(RepairSymbol {
        fss_esi: 4,
        nss: 5,
        repair_key: 0,
        data: vec![9, 9, 9],
    });
    // Packets 1..4 are all missing but only one repair row is available.
    assert!(recoverer.recover().is_none());
}
