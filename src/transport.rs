//! UDP transport for the client side of DHCP.
//!
//! The socket is bound to the client port (68) with `SO_BROADCAST` so the
//! DISCOVER can go to 255.255.255.255:67, and replies are read with a
//! deadline rather than a per-call timeout.

use std::net::{SocketAddr, SocketAddrV4};

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;
use tokio::time::Instant;
use tracing::debug;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::packet::DhcpPacket;

pub const DHCP_SERVER_PORT: u16 = 67;
pub const DHCP_CLIENT_PORT: u16 = 68;
const RECV_BUFFER_SIZE: usize = 1500;

/// A datagram that decoded as a DHCP packet.
#[derive(Debug, Clone)]
pub struct Received {
    pub packet: DhcpPacket,
    pub source: SocketAddr,
}

pub struct Transport {
    socket: UdpSocket,
    target: SocketAddr,
}

impl Transport {
    /// Binds the client socket described by `config`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn from_config(config: &Config) -> Result<Self> {
        let device = if config.bind_to_device {
            config.interface.as_deref()
        } else {
            None
        };
        Self::bind(config.bind_addr(), config.target_addr(), device)
    }

    /// Binds to `local` and sends to `target`.
    ///
    /// When `device` is given the socket is also tied to that interface
    /// (Linux only; ignored with a warning elsewhere).
    pub fn bind(local: SocketAddrV4, target: SocketAddrV4, device: Option<&str>) -> Result<Self> {
        let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))
            .map_err(|error| Error::Socket(format!("Failed to create socket: {}", error)))?;

        socket
            .set_reuse_address(true)
            .map_err(|error| Error::Socket(format!("Failed to set SO_REUSEADDR: {}", error)))?;

        socket
            .set_broadcast(true)
            .map_err(|error| Error::Socket(format!("Failed to set SO_BROADCAST: {}", error)))?;

        socket
            .set_nonblocking(true)
            .map_err(|error| Error::Socket(format!("Failed to set non-blocking: {}", error)))?;

        if let Some(device) = device {
            bind_device(&socket, device)?;
        }

        socket
            .bind(&local.into())
            .map_err(|error| Error::Socket(format!("Failed to bind to {}: {}", local, error)))?;

        let std_socket: std::net::UdpSocket = socket.into();
        let socket = UdpSocket::from_std(std_socket).map_err(|error| {
            Error::Socket(format!("Failed to convert to tokio socket: {}", error))
        })?;

        debug!("Bound DHCP client socket to {}", local);

        Ok(Self {
            socket,
            target: SocketAddr::V4(target),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Sends `packet` as one datagram to the configured target.
    pub async fn send(&self, packet: &DhcpPacket) -> Result<()> {
        self.send_to(packet, self.target).await
    }

    pub async fn send_to(&self, packet: &DhcpPacket, target: SocketAddr) -> Result<()> {
        let encoded = packet.encode();

        self.socket
            .send_to(&encoded, target)
            .await
            .map_err(|error| Error::Socket(format!("Failed to send to {}: {}", target, error)))?;

        debug!("Sent {} bytes to {}", encoded.len(), target);

        Ok(())
    }

    /// Waits for one datagram until `deadline`.
    ///
    /// # Errors
    ///
    /// - [`Error::Timeout`] once the deadline passes.
    /// - [`Error::InvalidPacket`] when a datagram arrived but is not DHCP.
    /// - [`Error::Socket`] on any other receive failure.
    pub async fn receive(&self, deadline: Instant) -> Result<Received> {
        let mut buffer = [0u8; RECV_BUFFER_SIZE];

        let (size, source) =
            match tokio::time::timeout_at(deadline, self.socket.recv_from(&mut buffer)).await {
                Ok(result) => result
                    .map_err(|error| Error::Socket(format!("Failed to receive: {}", error)))?,
                Err(_) => return Err(Error::Timeout),
            };

        debug!("Received {} bytes from {}", size, source);

        let packet = DhcpPacket::parse(&buffer[..size]).map_err(|error| match error {
            Error::InvalidPacket(reason) => {
                Error::InvalidPacket(format!("{} (from {})", reason, source))
            }
            other => other,
        })?;

        Ok(Received { packet, source })
    }
}

#[cfg(any(target_os = "linux", target_os = "android"))]
fn bind_device(socket: &Socket, device: &str) -> Result<()> {
    socket.bind_device(Some(device.as_bytes())).map_err(|error| {
        Error::Socket(format!("Failed to bind to device {}: {}", device, error))
    })
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
fn bind_device(_socket: &Socket, device: &str) -> Result<()> {
    tracing::warn!(
        "binding to device {} is only supported on Linux and will be ignored",
        device
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;
    use std::time::Duration;

    fn loopback() -> SocketAddrV4 {
        SocketAddrV4::new(Ipv4Addr::LOCALHOST, 0)
    }

    #[test]
    fn test_constants() {
        assert_eq!(DHCP_SERVER_PORT, 67);
        assert_eq!(DHCP_CLIENT_PORT, 68);
        assert_eq!(RECV_BUFFER_SIZE, 1500);
    }

    #[tokio::test]
    async fn test_send_and_receive() {
        let server = Transport::bind(loopback(), loopback(), None).unwrap();
        let server_addr = match server.local_addr().unwrap() {
            SocketAddr::V4(addr) => addr,
            other => panic!("unexpected address {}", other),
        };
        let client = Transport::bind(loopback(), server_addr, None).unwrap();

        let mut packet = DhcpPacket::discover_with_xid(0x0badf00d);
        packet.set_hardware_address("02:00:00:00:00:01").unwrap();
        client.send(&packet).await.unwrap();

        let deadline = Instant::now() + Duration::from_secs(2);
        let received = server.receive(deadline).await.unwrap();
        assert_eq!(received.packet.xid, 0x0badf00d);
        assert_eq!(received.packet.chaddr, packet.chaddr);
        assert_eq!(received.source, client.local_addr().unwrap());
    }

    #[tokio::test]
    async fn test_receive_times_out_at_deadline() {
        let transport = Transport::bind(loopback(), loopback(), None).unwrap();

        let started = Instant::now();
        let result = transport
            .receive(started + Duration::from_millis(100))
            .await;

        assert!(matches!(result, Err(Error::Timeout)));
        assert!(started.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_receive_rejects_non_dhcp_datagram() {
        let transport = Transport::bind(loopback(), loopback(), None).unwrap();
        let target = transport.local_addr().unwrap();

        let sender = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        sender.send_to(b"not a dhcp packet", target).await.unwrap();

        let result = transport
            .receive(Instant::now() + Duration::from_secs(2))
            .await;
        assert!(matches!(result, Err(Error::InvalidPacket(_))));
    }

    #[tokio::test]
    async fn test_bind_conflict_is_socket_error() {
        let first = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
        let taken = match first.local_addr().unwrap() {
            SocketAddr::V4(addr) => addr,
            other => panic!("unexpected address {}", other),
        };

        let result = Transport::bind(taken, loopback(), None);
        assert!(matches!(result, Err(Error::Socket(_))));
    }
}
