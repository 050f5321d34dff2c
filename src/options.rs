//! DHCP option schema as defined in RFC 2132.
//!
//! Each option has a code (1 byte), length (1 byte), and variable-length data.
//! The schema below maps a code to its expected length, a display name, and
//! the [`OptionKind`] that decides how the [parser](crate::parser) renders it.
//! Codes without an entry are still decoded, as raw bytes.
//!
//! # References
//!
//! - RFC 2131: Dynamic Host Configuration Protocol
//! - RFC 2132: DHCP Options and BOOTP Vendor Extensions

/// DHCP option codes known to the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OptionCode {
    /// Padding (no operation). Has no length byte.
    Pad = 0,
    /// Subnet mask (RFC 2132 §3.3).
    SubnetMask = 1,
    /// Router/gateway addresses (RFC 2132 §3.5).
    Router = 3,
    /// DNS server addresses (RFC 2132 §3.8).
    DomainNameServer = 6,
    /// Host name (RFC 2132 §3.14).
    HostName = 12,
    /// Domain name (RFC 2132 §3.17).
    DomainName = 15,
    /// Interface MTU (RFC 2132 §5.1).
    InterfaceMtu = 26,
    /// Broadcast address (RFC 2132 §5.3).
    BroadcastAddress = 28,
    /// Static routes (RFC 2132 §5.8).
    StaticRoute = 33,
    /// Vendor specific information (RFC 2132 §8.4).
    VendorSpecific = 43,
    /// NetBIOS over TCP/IP name servers (RFC 2132 §8.5).
    NetBiosNameServer = 44,
    /// IP address lease time in seconds (RFC 2132 §9.2).
    IpAddressLeaseTime = 51,
    /// Option overload (RFC 2132 §9.3).
    OptionOverload = 52,
    /// DHCP message type (RFC 2132 §9.6).
    MessageType = 53,
    /// Server identifier (RFC 2132 §9.7).
    ServerIdentifier = 54,
    /// Parameter request list (RFC 2132 §9.8).
    ParameterRequestList = 55,
    /// Renewal time T1 (RFC 2132 §9.11).
    RenewalTimeValue = 58,
    /// Rebinding time T2 (RFC 2132 §9.12).
    RebindingTimeValue = 59,
    /// Client identifier (RFC 2132 §9.14).
    ClientIdentifier = 61,
    /// Domain search list, RFC 1035 compressed (RFC 3397).
    DomainSearch = 119,
    /// Web proxy auto-discovery URL (WPAD).
    WebProxyServer = 252,
    /// End of options marker. Has no length byte.
    End = 255,
}

impl TryFrom<u8> for OptionCode {
    type Error = u8;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Pad),
            1 => Ok(Self::SubnetMask),
            3 => Ok(Self::Router),
            6 => Ok(Self::DomainNameServer),
            12 => Ok(Self::HostName),
            15 => Ok(Self::DomainName),
            26 => Ok(Self::InterfaceMtu),
            28 => Ok(Self::BroadcastAddress),
            33 => Ok(Self::StaticRoute),
            43 => Ok(Self::VendorSpecific),
            44 => Ok(Self::NetBiosNameServer),
            51 => Ok(Self::IpAddressLeaseTime),
            52 => Ok(Self::OptionOverload),
            53 => Ok(Self::MessageType),
            54 => Ok(Self::ServerIdentifier),
            55 => Ok(Self::ParameterRequestList),
            58 => Ok(Self::RenewalTimeValue),
            59 => Ok(Self::RebindingTimeValue),
            61 => Ok(Self::ClientIdentifier),
            119 => Ok(Self::DomainSearch),
            252 => Ok(Self::WebProxyServer),
            255 => Ok(Self::End),
            other => Err(other),
        }
    }
}

/// DHCP message types (Option 53) as defined in RFC 2131 and RFC 2132 §9.6.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MessageType {
    /// Client broadcast to locate servers.
    Discover = 1,
    /// Server response to DISCOVER with an address offer.
    Offer = 2,
    /// Client request for offered parameters.
    Request = 3,
    /// Client indicates address is already in use.
    Decline = 4,
    /// Server acknowledgement with configuration.
    Ack = 5,
    /// Server negative acknowledgement.
    Nack = 6,
    /// Client releases its address.
    Release = 7,
    /// Client requests config without address allocation.
    Inform = 8,
}

impl TryFrom<u8> for MessageType {
    type Error = u8;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Discover),
            2 => Ok(Self::Offer),
            3 => Ok(Self::Request),
            4 => Ok(Self::Decline),
            5 => Ok(Self::Ack),
            6 => Ok(Self::Nack),
            7 => Ok(Self::Release),
            8 => Ok(Self::Inform),
            other => Err(other),
        }
    }
}

impl MessageType {
    /// The protocol mnemonic, e.g. `DHCPDISCOVER`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Discover => "DHCPDISCOVER",
            Self::Offer => "DHCPOFFER",
            Self::Request => "DHCPREQUEST",
            Self::Decline => "DHCPDECLINE",
            Self::Ack => "DHCPACK",
            Self::Nack => "DHCPNACK",
            Self::Release => "DHCPRELEASE",
            Self::Inform => "DHCPINFORM",
        }
    }
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Looks up the mnemonic for a raw message type value.
pub fn message_type_name(value: u8) -> Option<&'static str> {
    MessageType::try_from(value).ok().map(MessageType::name)
}

/// Length the schema expects on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedLength {
    Fixed(usize),
    Variable,
}

/// How an option's value bytes are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// Pad and End; never carry a value.
    Marker,
    /// One byte, rendered through the message type table.
    MessageType,
    /// Consecutive 4-byte addresses.
    AddressList,
    /// Exactly one address.
    Address,
    /// 32-bit big-endian seconds.
    Seconds,
    /// 16-bit big-endian integer.
    Integer16,
    /// Raw bytes read as text.
    Text,
    /// Only the byte count is reported.
    SizeOnly,
    /// RFC 1035 compressed names, not decoded.
    CompressedNames,
    /// A list of option codes.
    CodeList,
    /// Option overload flag.
    Overload,
    /// Bytes without a further structure.
    Opaque,
}

/// One entry of the option schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionSpec {
    pub code: u8,
    pub expected: ExpectedLength,
    pub name: &'static str,
    pub kind: OptionKind,
}

const fn entry(
    code: OptionCode,
    expected: ExpectedLength,
    name: &'static str,
    kind: OptionKind,
) -> OptionSpec {
    OptionSpec {
        code: code as u8,
        expected,
        name,
        kind,
    }
}

use ExpectedLength::{Fixed, Variable};

/// The option schema. Read-only for the lifetime of the process.
pub static OPTION_SCHEMA: &[OptionSpec] = &[
    entry(OptionCode::Pad, Fixed(0), "Pad Option", OptionKind::Marker),
    entry(OptionCode::SubnetMask, Fixed(4), "Subnet Mask", OptionKind::Address),
    entry(OptionCode::Router, Variable, "Router", OptionKind::AddressList),
    entry(
        OptionCode::DomainNameServer,
        Variable,
        "Domain Name Server",
        OptionKind::AddressList,
    ),
    entry(OptionCode::HostName, Variable, "Host Name", OptionKind::Text),
    entry(OptionCode::DomainName, Variable, "Domain Name", OptionKind::Text),
    entry(
        OptionCode::InterfaceMtu,
        Fixed(2),
        "Interface MTU",
        OptionKind::Integer16,
    ),
    entry(
        OptionCode::BroadcastAddress,
        Fixed(4),
        "Broadcast Address",
        OptionKind::Address,
    ),
    entry(OptionCode::StaticRoute, Variable, "Static Route", OptionKind::Opaque),
    entry(
        OptionCode::VendorSpecific,
        Variable,
        "Vendor Specific",
        OptionKind::SizeOnly,
    ),
    entry(
        OptionCode::NetBiosNameServer,
        Variable,
        "NetBIOS Name Server",
        OptionKind::AddressList,
    ),
    entry(
        OptionCode::IpAddressLeaseTime,
        Fixed(4),
        "IP Address Lease Time",
        OptionKind::Seconds,
    ),
    entry(
        OptionCode::OptionOverload,
        Fixed(1),
        "Option Overload",
        OptionKind::Overload,
    ),
    entry(
        OptionCode::MessageType,
        Fixed(1),
        "DHCP Message Type",
        OptionKind::MessageType,
    ),
    entry(
        OptionCode::ServerIdentifier,
        Fixed(4),
        "Server Identifier",
        OptionKind::Address,
    ),
    entry(
        OptionCode::ParameterRequestList,
        Variable,
        "Parameter Request List",
        OptionKind::CodeList,
    ),
    entry(
        OptionCode::RenewalTimeValue,
        Fixed(4),
        "Renewal Time Value",
        OptionKind::Seconds,
    ),
    entry(
        OptionCode::RebindingTimeValue,
        Fixed(4),
        "Rebinding Time Value",
        OptionKind::Seconds,
    ),
    entry(
        OptionCode::ClientIdentifier,
        Variable,
        "Client Identifier",
        OptionKind::Opaque,
    ),
    entry(
        OptionCode::DomainSearch,
        Variable,
        "Domain Search",
        OptionKind::CompressedNames,
    ),
    entry(
        OptionCode::WebProxyServer,
        Variable,
        "Web Proxy Server",
        OptionKind::Text,
    ),
    entry(OptionCode::End, Fixed(0), "End Option", OptionKind::Marker),
];

/// Finds the schema entry for `code`.
pub fn lookup(code: u8) -> Option<&'static OptionSpec> {
    OPTION_SCHEMA.iter().find(|spec| spec.code == code)
}

/// Appends one option in wire format (code + length + data).
///
/// Data longer than 255 bytes is truncated to fit the length byte.
pub fn encode_option(code: u8, data: &[u8], out: &mut Vec<u8>) {
    let len = data.len().min(u8::MAX as usize);
    out.push(code);
    out.push(len as u8);
    out.extend_from_slice(&data[..len]);
}
