//! Big-endian integer and IPv4 helpers shared by the packet and option code.

use std::net::Ipv4Addr;

/// Interprets four bytes as a big-endian unsigned integer.
pub fn decode_u32_be(bytes: [u8; 4]) -> u32 {
    u32::from_be_bytes(bytes)
}

/// Interprets two bytes as a big-endian unsigned integer.
pub fn decode_u16_be(bytes: [u8; 2]) -> u16 {
    u16::from_be_bytes(bytes)
}

/// Copies four bytes into an IPv4 address.
pub fn decode_ipv4(bytes: [u8; 4]) -> Ipv4Addr {
    Ipv4Addr::from(bytes)
}

/// Reads `N` bytes at `offset`, or `None` if the slice is too short.
pub fn read_array<const N: usize>(data: &[u8], offset: usize) -> Option<[u8; N]> {
    let end = offset.checked_add(N)?;
    data.get(offset..end)?.try_into().ok()
}
