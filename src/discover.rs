//! The discover/offer exchange.
//!
//! One DISCOVER is broadcast, then replies are collected until a single
//! deadline computed before the first receive. Each receive is bounded by
//! whatever is left of that window, so a steady trickle of datagrams cannot
//! stretch the run.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::packet::{BOOTREPLY, DhcpPacket, MacAddress};
use crate::transport::{Received, Transport};

/// A reply that matched the DISCOVER's transaction ID.
#[derive(Debug, Clone)]
pub struct Offer {
    pub packet: DhcpPacket,
    pub source: SocketAddr,
}

/// Progress reported while the exchange runs.
#[derive(Debug, Clone, Copy)]
pub enum Event<'a> {
    /// The DISCOVER, just before it is sent.
    Sent(&'a DhcpPacket),
    Offer(&'a Offer),
}

pub struct Discovery {
    transport: Transport,
    packet: DhcpPacket,
    timeout: Duration,
}

impl Discovery {
    /// Prepares a DISCOVER from `mac` with a fresh transaction ID.
    pub fn new(transport: Transport, mac: MacAddress, timeout: Duration) -> Self {
        let mut packet = DhcpPacket::discover();
        packet.set_mac(mac);
        Self::with_packet(transport, packet, timeout)
    }

    pub fn with_packet(transport: Transport, packet: DhcpPacket, timeout: Duration) -> Self {
        Self {
            transport,
            packet,
            timeout,
        }
    }

    pub fn packet(&self) -> &DhcpPacket {
        &self.packet
    }

    /// Sends the DISCOVER and collects offers until the window closes.
    ///
    /// The socket is closed when this returns, on success or error.
    pub async fn run<F>(self, mut report: F) -> Result<Vec<Offer>>
    where
        F: FnMut(Event<'_>),
    {
        let Self {
            transport,
            packet,
            timeout,
        } = self;

        report(Event::Sent(&packet));
        transport.send(&packet).await?;
        info!(
            "Sent DHCPDISCOVER xid=0x{:08x} from {}",
            packet.xid,
            packet.format_mac()
        );

        let deadline = Instant::now() + timeout;
        let mut offers = Vec::new();

        loop {
            match transport.receive(deadline).await {
                Ok(Received {
                    packet: reply,
                    source,
                }) => {
                    if reply.op != BOOTREPLY || reply.xid != packet.xid {
                        debug!(
                            "Skipping op={} xid=0x{:08x} from {}",
                            reply.op, reply.xid, source
                        );
                        continue;
                    }

                    info!("Received reply from {}", source);
                    let offer = Offer {
                        packet: reply,
                        source,
                    };
                    report(Event::Offer(&offer));
                    offers.push(offer);
                }
                Err(Error::Timeout) => {
                    debug!("Receive window closed after {:?}", timeout);
                    break;
                }
                Err(Error::InvalidPacket(reason)) => {
                    warn!("Ignoring datagram: {}", reason);
                }
                Err(error) => return Err(error),
            }
        }

        Ok(offers)
    }
}
