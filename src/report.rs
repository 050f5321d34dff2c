//! Console rendering of packets.
//!
//! Each packet is printed as its four address fields, then one line per
//! decoded option, then a blank line:
//!
//! ```text
//! Client IP address : 0.0.0.0
//! Your IP address   : 192.168.1.100
//! Server IP address : 192.168.1.1
//! Relay IP address  : 0.0.0.0
//! Options:
//!        DHCP Message Type : DHCPOFFER
//!        Server Identifier : 192.168.1.1
//! End Option
//! ```

use std::fmt::Write;

use crate::packet::DhcpPacket;
use crate::parser::OptionList;

const LABEL_WIDTH: usize = 24;

pub fn format_packet(packet: &DhcpPacket) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Client IP address : {}", packet.ciaddr);
    let _ = writeln!(out, "Your IP address   : {}", packet.yiaddr);
    let _ = writeln!(out, "Server IP address : {}", packet.siaddr);
    let _ = writeln!(out, "Relay IP address  : {}", packet.giaddr);
    out.push_str(&format_options(&packet.decode_options()));
    out.push('\n');
    out
}

pub fn format_options(options: &OptionList) -> String {
    let mut out = String::from("Options:\n");

    for option in options.iter() {
        let _ = writeln!(
            out,
            "{:>width$} : {}",
            option.label(),
            option.value,
            width = LABEL_WIDTH
        );
    }

    if let Some(corruption) = &options.corruption {
        let _ = writeln!(out, "corrupted option ({})", corruption);
    } else if options.terminated {
        out.push_str("End Option\n");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_options;
    use std::net::Ipv4Addr;

    #[test]
    fn test_option_lines_are_right_aligned() {
        let options = parse_options(&[53, 1, 2, 3, 4, 10, 0, 0, 1, 200, 1, 7, 255]);
        let text = format_options(&options);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Options:");
        assert_eq!(lines[1], "       DHCP Message Type : DHCPOFFER");
        assert_eq!(lines[2], "                  Router : 10.0.0.1 ");
        assert_eq!(lines[3], "                     200 : 07");
        assert_eq!(lines[4], "End Option");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_corrupted_list_is_reported() {
        let options = parse_options(&[53, 1, 2, 1, 3, 255, 255, 0, 255]);
        let text = format_options(&options);

        assert!(text.contains("DHCPOFFER"));
        assert!(text.contains("corrupted option (option 1 at offset 3"));
        assert!(!text.contains("End Option"));
    }

    #[test]
    fn test_packet_report() {
        let mut packet = DhcpPacket::discover_with_xid(7);
        packet.yiaddr = Ipv4Addr::new(192, 168, 1, 100);
        let text = format_packet(&packet);

        assert!(text.starts_with("Client IP address : 0.0.0.0\n"));
        assert!(text.contains("Your IP address   : 192.168.1.100\n"));
        assert!(text.contains("Server IP address : 0.0.0.0\n"));
        assert!(text.contains("Relay IP address  : 0.0.0.0\n"));
        assert!(text.contains("       DHCP Message Type : DHCPDISCOVER\n"));
        assert!(text.ends_with("End Option\n\n"));
    }
}
