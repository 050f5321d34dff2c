use nix::ifaddrs::getifaddrs;

use crate::error::{Error, Result};
use crate::packet::MacAddress;

/// Resolves a network interface name to its hardware address.
///
/// # Errors
///
/// Returns [`Error::InterfaceNotFound`] when no interface called `name`
/// carries a link-layer address.
pub fn hardware_address(name: &str) -> Result<MacAddress> {
    let interfaces = getifaddrs().map_err(std::io::Error::from)?;

    interfaces
        .filter(|ifa| ifa.interface_name == name)
        .find_map(|ifa| {
            ifa.address
                .as_ref()
                .and_then(|addr| addr.as_link_addr())
                .and_then(|link| link.addr())
        })
        .map(MacAddress)
        .ok_or_else(|| Error::InterfaceNotFound(name.to_string()))
}
