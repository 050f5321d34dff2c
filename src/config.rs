use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddrV4};
use std::path::Path;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::transport::{DHCP_CLIENT_PORT, DHCP_SERVER_PORT};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub interface: Option<String>,
    pub timeout_seconds: u64,
    pub client_port: u16,
    pub server_port: u16,
    pub broadcast_address: Ipv4Addr,
    pub bind_address: Ipv4Addr,
    pub bind_to_device: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interface: None,
            timeout_seconds: 5,
            client_port: DHCP_CLIENT_PORT,
            server_port: DHCP_SERVER_PORT,
            broadcast_address: Ipv4Addr::BROADCAST,
            bind_address: Ipv4Addr::UNSPECIFIED,
            bind_to_device: false,
        }
    }
}

impl Config {
    /// Reads and validates a JSON config file. Missing keys take defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout_seconds == 0 {
            return Err(Error::InvalidConfig(
                "timeout_seconds must be greater than 0".to_string(),
            ));
        }

        if self.client_port == 0 || self.server_port == 0 {
            return Err(Error::InvalidConfig(
                "client_port and server_port must be non-zero".to_string(),
            ));
        }

        if self.client_port == self.server_port {
            return Err(Error::InvalidConfig(
                "client_port and server_port must differ".to_string(),
            ));
        }

        if let Some(interface) = &self.interface
            && interface.trim().is_empty()
        {
            return Err(Error::InvalidConfig(
                "interface must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn bind_addr(&self) -> SocketAddrV4 {
        SocketAddrV4::new(self.bind_address, self.client_port)
    }

    pub fn target_addr(&self) -> SocketAddrV4 {
        SocketAddrV4::new(self.broadcast_address, self.server_port)
    }
}
