//! DHCP packet parsing and encoding per RFC 2131.
//!
//! A DHCP packet consists of a fixed 236-byte header followed by a 4-byte
//! magic cookie and variable-length options. This module builds the client's
//! DISCOVER and decodes the headers of the replies; the options area is kept
//! as raw bytes and decoded on demand by the [parser](crate::parser).
//!
//! # Packet Structure
//!
//! ```text
//! 0                   1                   2                   3
//! 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |     op (1)    |   htype (1)   |   hlen (1)    |   hops (1)    |
//! +---------------+---------------+---------------+---------------+
//! |                            xid (4)                            |
//! +-------------------------------+-------------------------------+
//! |           secs (2)            |           flags (2)           |
//! +-------------------------------+-------------------------------+
//! |                          ciaddr (4)                           |
//! +---------------------------------------------------------------+
//! |                          yiaddr (4)                           |
//! +---------------------------------------------------------------+
//! |                          siaddr (4)                           |
//! +---------------------------------------------------------------+
//! |                          giaddr (4)                           |
//! +---------------------------------------------------------------+
//! |                          chaddr (16)                          |
//! +---------------------------------------------------------------+
//! |                          sname (64)                           |
//! +---------------------------------------------------------------+
//! |                          file (128)                           |
//! +---------------------------------------------------------------+
//! |                    magic cookie (4) = 99.130.83.99            |
//! +---------------------------------------------------------------+
//! |                          options (variable)                   |
//! +---------------------------------------------------------------+
//! ```

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use crate::codec::{decode_ipv4, decode_u16_be, decode_u32_be, read_array};
use crate::error::{Error, Result};
use crate::options::{MessageType, OptionCode, encode_option};
use crate::parser::{OptionList, parse_options};

/// DHCP magic cookie that marks the start of the options area.
pub const DHCP_MAGIC_COOKIE: [u8; 4] = [99, 130, 83, 99];

const DHCP_CHADDR_OFFSET: usize = 28;
const DHCP_CHADDR_SIZE: usize = 16;
const DHCP_SNAME_OFFSET: usize = DHCP_CHADDR_OFFSET + DHCP_CHADDR_SIZE;
const DHCP_SNAME_SIZE: usize = 64;
const DHCP_FILE_OFFSET: usize = DHCP_SNAME_OFFSET + DHCP_SNAME_SIZE;
const DHCP_FILE_SIZE: usize = 128;

/// Size of the BOOTP header, up to the magic cookie.
pub const BOOTP_HEADER_SIZE: usize = DHCP_FILE_OFFSET + DHCP_FILE_SIZE;

/// Offset of the first option byte.
pub const DHCP_OPTIONS_OFFSET: usize = BOOTP_HEADER_SIZE + DHCP_MAGIC_COOKIE.len();

/// Minimum DHCP packet size per RFC 2131 §2.
///
/// DHCP requires packets to be at least 300 bytes for compatibility
/// with BOOTP relay agents.
pub const DHCP_MIN_PACKET_SIZE: usize = 300;

/// Initial capacity for packet encoding buffer.
///
/// 576 bytes is the minimum MTU that all hosts must accept per RFC 791.
const DHCP_ENCODE_CAPACITY: usize = 576;

/// BOOTP/DHCP operation code for client requests.
pub const BOOTREQUEST: u8 = 1;

/// BOOTP/DHCP operation code for server replies.
pub const BOOTREPLY: u8 = 2;

/// Hardware type for Ethernet.
pub const HTYPE_ETHERNET: u8 = 1;

/// Hardware address length for Ethernet (6 bytes).
pub const HLEN_ETHERNET: u8 = 6;

/// Broadcast bit of the flags field.
pub const BROADCAST_FLAG: u16 = 0x8000;

/// Options a DISCOVER asks the server to include in its offer.
const DISCOVER_PARAMETER_REQUEST_LIST: [OptionCode; 10] = [
    OptionCode::SubnetMask,
    OptionCode::Router,
    OptionCode::DomainNameServer,
    OptionCode::HostName,
    OptionCode::DomainName,
    OptionCode::BroadcastAddress,
    OptionCode::IpAddressLeaseTime,
    OptionCode::ServerIdentifier,
    OptionCode::RenewalTimeValue,
    OptionCode::RebindingTimeValue,
];

/// A 48-bit Ethernet hardware address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MacAddress(pub [u8; 6]);

impl FromStr for MacAddress {
    type Err = Error;

    /// Parses six hex octets separated by `:` or `-`.
    fn from_str(s: &str) -> Result<Self> {
        let malformed = || Error::MalformedAddress(s.to_string());

        let separator = if s.contains('-') { '-' } else { ':' };
        let mut octets = [0u8; 6];
        let mut parts = s.split(separator);

        for octet in octets.iter_mut() {
            let part = parts.next().ok_or_else(malformed)?;
            if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(malformed());
            }
            *octet = u8::from_str_radix(part, 16).map_err(|_| malformed())?;
        }

        if parts.next().is_some() {
            return Err(malformed());
        }

        Ok(Self(octets))
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            a, b, c, d, e, g
        )
    }
}

/// A DHCP packet.
///
/// Use [`discover`](Self::discover) to build the client's request and
/// [`parse`](Self::parse) for datagrams received from servers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DhcpPacket {
    /// Operation code: [`BOOTREQUEST`] (1) or [`BOOTREPLY`] (2).
    pub op: u8,

    /// Hardware address type. [`HTYPE_ETHERNET`] (1) for Ethernet.
    pub htype: u8,

    /// Hardware address length. [`HLEN_ETHERNET`] (6) for Ethernet.
    pub hlen: u8,

    /// Hop count, incremented by relay agents.
    pub hops: u8,

    /// Transaction ID chosen by client, echoed in replies.
    pub xid: u32,

    /// Seconds elapsed since client began address acquisition.
    pub secs: u16,

    /// Flags. Bit 15 (0x8000) = broadcast flag.
    pub flags: u16,

    /// Client IP address.
    pub ciaddr: Ipv4Addr,

    /// "Your" IP address - the address offered to the client.
    pub yiaddr: Ipv4Addr,

    /// Server IP address (next server to use in bootstrap).
    pub siaddr: Ipv4Addr,

    /// Gateway IP address - set by relay agents.
    pub giaddr: Ipv4Addr,

    /// Client hardware address (MAC for Ethernet), zero-padded.
    pub chaddr: [u8; 16],

    /// Server host name, null-padded.
    pub sname: [u8; 64],

    /// Boot file name, null-padded.
    pub file: [u8; 128],

    /// Raw options area following the magic cookie.
    pub options: Vec<u8>,
}

impl DhcpPacket {
    /// Builds a DISCOVER with a random transaction ID.
    pub fn discover() -> Self {
        Self::discover_with_xid(rand::random())
    }

    /// Builds a DISCOVER with the given transaction ID.
    ///
    /// The broadcast flag is set and all addresses are zero. Options carry
    /// the message type, a parameter request list, and End. The hardware
    /// address is left zero until [`set_hardware_address`](Self::set_hardware_address).
    pub fn discover_with_xid(xid: u32) -> Self {
        let mut options = Vec::new();
        encode_option(
            OptionCode::MessageType as u8,
            &[MessageType::Discover as u8],
            &mut options,
        );
        let requested: Vec<u8> = DISCOVER_PARAMETER_REQUEST_LIST
            .iter()
            .map(|code| *code as u8)
            .collect();
        encode_option(
            OptionCode::ParameterRequestList as u8,
            &requested,
            &mut options,
        );
        options.push(OptionCode::End as u8);

        Self {
            op: BOOTREQUEST,
            htype: HTYPE_ETHERNET,
            hlen: HLEN_ETHERNET,
            hops: 0,
            xid,
            secs: 0,
            flags: BROADCAST_FLAG,
            ciaddr: Ipv4Addr::UNSPECIFIED,
            yiaddr: Ipv4Addr::UNSPECIFIED,
            siaddr: Ipv4Addr::UNSPECIFIED,
            giaddr: Ipv4Addr::UNSPECIFIED,
            chaddr: [0u8; 16],
            sname: [0u8; 64],
            file: [0u8; 128],
            options,
        }
    }

    /// Parses a colon-separated MAC string and writes it into `chaddr`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedAddress`] unless `mac` is six hex octets.
    pub fn set_hardware_address(&mut self, mac: &str) -> Result<()> {
        let mac: MacAddress = mac.parse()?;
        self.set_mac(mac);
        Ok(())
    }

    /// Writes an Ethernet address into `chaddr`.
    pub fn set_mac(&mut self, mac: MacAddress) {
        self.htype = HTYPE_ETHERNET;
        self.hlen = HLEN_ETHERNET;
        self.chaddr = [0u8; 16];
        self.chaddr[..6].copy_from_slice(&mac.0);
    }

    /// Parses a DHCP packet from raw bytes.
    ///
    /// Only the fixed header is validated here; the options area is copied
    /// as is and decoded by [`decode_options`](Self::decode_options).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPacket`] if:
    /// - Packet is shorter than 240 bytes (fixed header + magic cookie)
    /// - Magic cookie is invalid (not 99.130.83.99)
    /// - Hardware length doesn't match type (e.g., Ethernet must be 6)
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < DHCP_OPTIONS_OFFSET {
            return Err(Error::InvalidPacket(format!(
                "Packet too short: {} bytes (minimum {})",
                data.len(),
                DHCP_OPTIONS_OFFSET
            )));
        }

        if data[BOOTP_HEADER_SIZE..DHCP_OPTIONS_OFFSET] != DHCP_MAGIC_COOKIE {
            return Err(Error::InvalidPacket("Invalid magic cookie".to_string()));
        }

        let op = data[0];
        let htype = data[1];
        let hlen = data[2];
        let hops = data[3];

        if htype == HTYPE_ETHERNET && hlen != HLEN_ETHERNET {
            return Err(Error::InvalidPacket(format!(
                "Invalid hlen {} for Ethernet (expected {})",
                hlen, HLEN_ETHERNET
            )));
        }

        let header = |offset| read_array::<4>(data, offset).unwrap_or_default();

        let mut chaddr = [0u8; 16];
        chaddr.copy_from_slice(&data[DHCP_CHADDR_OFFSET..DHCP_SNAME_OFFSET]);

        let mut sname = [0u8; 64];
        sname.copy_from_slice(&data[DHCP_SNAME_OFFSET..DHCP_FILE_OFFSET]);

        let mut file = [0u8; 128];
        file.copy_from_slice(&data[DHCP_FILE_OFFSET..BOOTP_HEADER_SIZE]);

        Ok(Self {
            op,
            htype,
            hlen,
            hops,
            xid: decode_u32_be(header(4)),
            secs: decode_u16_be([data[8], data[9]]),
            flags: decode_u16_be([data[10], data[11]]),
            ciaddr: decode_ipv4(header(12)),
            yiaddr: decode_ipv4(header(16)),
            siaddr: decode_ipv4(header(20)),
            giaddr: decode_ipv4(header(24)),
            chaddr,
            sname,
            file,
            options: data[DHCP_OPTIONS_OFFSET..].to_vec(),
        })
    }

    /// Encodes the packet to bytes for transmission.
    ///
    /// The options area is written verbatim and the result is zero-padded
    /// to at least 300 bytes.
    pub fn encode(&self) -> Vec<u8> {
        let mut packet = Vec::with_capacity(DHCP_ENCODE_CAPACITY);

        packet.push(self.op);
        packet.push(self.htype);
        packet.push(self.hlen);
        packet.push(self.hops);

        packet.extend_from_slice(&self.xid.to_be_bytes());
        packet.extend_from_slice(&self.secs.to_be_bytes());
        packet.extend_from_slice(&self.flags.to_be_bytes());

        packet.extend_from_slice(&self.ciaddr.octets());
        packet.extend_from_slice(&self.yiaddr.octets());
        packet.extend_from_slice(&self.siaddr.octets());
        packet.extend_from_slice(&self.giaddr.octets());

        packet.extend_from_slice(&self.chaddr);
        packet.extend_from_slice(&self.sname);
        packet.extend_from_slice(&self.file);

        packet.extend_from_slice(&DHCP_MAGIC_COOKIE);
        packet.extend_from_slice(&self.options);

        if packet.len() < DHCP_MIN_PACKET_SIZE {
            packet.resize(DHCP_MIN_PACKET_SIZE, 0);
        }

        packet
    }

    /// Decodes the options area.
    ///
    /// When the Option Overload option (52) is present and the main area
    /// decoded cleanly, the `file` and then the `sname` field are decoded
    /// too and their records appended.
    pub fn decode_options(&self) -> OptionList {
        let mut options = parse_options(&self.options);

        if options.corruption.is_some() {
            return options;
        }

        if let Some(flag) = options.overload() {
            if flag == 1 || flag == 3 {
                options.append(parse_options(&self.file));
            }
            if flag == 2 || flag == 3 {
                options.append(parse_options(&self.sname));
            }
        }

        options
    }

    /// Returns the DHCP message type (Option 53) if present.
    pub fn message_type(&self) -> Option<MessageType> {
        self.decode_options().message_type()
    }

    /// Returns the client hardware address bytes (respecting hlen).
    pub fn chaddr_bytes(&self) -> &[u8] {
        let len = (self.hlen as usize).min(self.chaddr.len());
        &self.chaddr[..len]
    }

    /// Formats the client hardware address as a colon-separated string.
    ///
    /// For Ethernet, returns format like "aa:bb:cc:dd:ee:ff".
    pub fn format_mac(&self) -> String {
        self.chaddr_bytes()
            .iter()
            .map(|byte| format!("{:02x}", byte))
            .collect::<Vec<_>>()
            .join(":")
    }

    /// Returns true if the broadcast flag (bit 15) is set.
    pub fn is_broadcast(&self) -> bool {
        (self.flags & BROADCAST_FLAG) != 0
    }

    /// Server host name up to the first NUL.
    pub fn server_name(&self) -> String {
        trim_field(&self.sname)
    }

    /// Boot file name up to the first NUL.
    pub fn boot_file(&self) -> String {
        trim_field(&self.file)
    }

    /// Writes a server host name, truncated and null-padded to 64 bytes.
    pub fn set_server_name(&mut self, name: &str) {
        self.sname = pad_field(name);
    }

    /// Writes a boot file name, truncated and null-padded to 128 bytes.
    pub fn set_boot_file(&mut self, name: &str) {
        self.file = pad_field(name);
    }
}

fn trim_field(field: &[u8]) -> String {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    String::from_utf8_lossy(&field[..end]).into_owned()
}

fn pad_field<const N: usize>(value: &str) -> [u8; N] {
    let mut field = [0u8; N];
    let bytes = value.as_bytes();
    let len = bytes.len().min(N);
    field[..len].copy_from_slice(&bytes[..len]);
    field
}
