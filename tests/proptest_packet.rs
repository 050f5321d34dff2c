use std::net::Ipv4Addr;

use proptest::prelude::*;

use dhcp_discover::packet::{DHCP_MAGIC_COOKIE, DHCP_OPTIONS_OFFSET};
use dhcp_discover::{DhcpPacket, parse_options};

fn valid_header() -> Vec<u8> {
    let mut packet = vec![0u8; DHCP_OPTIONS_OFFSET];
    packet[0] = 2;
    packet[1] = 1;
    packet[2] = 6;
    packet[236..240].copy_from_slice(&DHCP_MAGIC_COOKIE);
    packet
}

fn mac_string() -> impl Strategy<Value = String> {
    prop::array::uniform6(any::<u8>()).prop_map(|octets| {
        octets
            .iter()
            .map(|octet| format!("{:02x}", octet))
            .collect::<Vec<_>>()
            .join(":")
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2000))]

    #[test]
    fn parse_never_panics_on_arbitrary_bytes(data: Vec<u8>) {
        if let Ok(packet) = DhcpPacket::parse(&data) {
            let _ = packet.decode_options();
        }
    }

    #[test]
    fn parse_never_panics_on_valid_header_with_random_options(
        options_data in prop::collection::vec(any::<u8>(), 0..512)
    ) {
        let mut packet = valid_header();
        packet.extend_from_slice(&options_data);
        let parsed = DhcpPacket::parse(&packet).unwrap();
        let _ = parsed.decode_options();
    }

    #[test]
    fn parse_options_never_panics(data in prop::collection::vec(any::<u8>(), 0..300)) {
        let _ = parse_options(&data);
    }

    #[test]
    fn end_stops_scan_regardless_of_trailing_bytes(
        trailing in prop::collection::vec(any::<u8>(), 0..64)
    ) {
        let mut data = vec![53, 1, 2, 54, 4, 10, 0, 0, 1, 255];
        data.extend_from_slice(&trailing);

        let list = parse_options(&data);
        prop_assert!(list.terminated);
        prop_assert!(list.corruption.is_none());
        prop_assert_eq!(list.len(), 2);
    }

    #[test]
    fn pad_runs_produce_no_records(count in 0usize..200) {
        let mut data = vec![0u8; count];
        data.extend_from_slice(&[53, 1, 2]);
        data.extend(std::iter::repeat_n(0u8, count));
        data.push(255);

        let list = parse_options(&data);
        prop_assert_eq!(list.len(), 1);
        prop_assert!(list.terminated);
    }

    #[test]
    fn fixed_length_mismatch_stops_scan(
        wrong in (0u8..=255).prop_filter("must differ from 4", |len| *len != 4),
        trailing in prop::collection::vec(any::<u8>(), 0..32)
    ) {
        let mut data = vec![53, 1, 2, 54, wrong];
        data.extend(std::iter::repeat_n(1u8, wrong as usize));
        data.extend_from_slice(&[12, 2, b'h', b'i', 255]);
        data.extend_from_slice(&trailing);

        let list = parse_options(&data);
        prop_assert_eq!(list.len(), 1);
        prop_assert!(!list.terminated);
        let corruption = list.corruption.unwrap();
        prop_assert_eq!(corruption.code, 54);
        prop_assert_eq!(corruption.offset, 3);
    }

    #[test]
    fn header_fields_roundtrip(
        xid: u32,
        flags: u16,
        ciaddr: [u8; 4],
        yiaddr: [u8; 4],
        siaddr: [u8; 4],
        giaddr: [u8; 4],
        mac in mac_string()
    ) {
        let mut packet = DhcpPacket::discover_with_xid(xid);
        packet.flags = flags;
        packet.ciaddr = Ipv4Addr::from(ciaddr);
        packet.yiaddr = Ipv4Addr::from(yiaddr);
        packet.siaddr = Ipv4Addr::from(siaddr);
        packet.giaddr = Ipv4Addr::from(giaddr);
        packet.set_hardware_address(&mac).unwrap();

        let encoded = packet.encode();
        prop_assert_eq!(&encoded[236..240], &DHCP_MAGIC_COOKIE[..]);

        let parsed = DhcpPacket::parse(&encoded).unwrap();
        prop_assert_eq!(parsed.op, 1);
        prop_assert_eq!(parsed.htype, 1);
        prop_assert_eq!(parsed.hlen, 6);
        prop_assert_eq!(parsed.xid, packet.xid);
        prop_assert_eq!(parsed.flags, packet.flags);
        prop_assert_eq!(parsed.ciaddr, packet.ciaddr);
        prop_assert_eq!(parsed.yiaddr, packet.yiaddr);
        prop_assert_eq!(parsed.siaddr, packet.siaddr);
        prop_assert_eq!(parsed.giaddr, packet.giaddr);
        prop_assert_eq!(parsed.chaddr, packet.chaddr);
        prop_assert_eq!(parsed.format_mac(), mac);
    }
}
