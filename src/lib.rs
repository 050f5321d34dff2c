//! # dhcp-discover
//!
//! A diagnostic DHCP client for the discovery phase of RFC 2131: it broadcasts
//! one DHCPDISCOVER on an interface and decodes every DHCPOFFER that arrives
//! within a time window.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::time::Duration;
//! use dhcp_discover::{Config, Discovery, Transport, format_packet, hardware_address};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> dhcp_discover::Result<()> {
//!     let config = Config::default();
//!     let mac = hardware_address("eth0")?;
//!     let transport = Transport::from_config(&config)?;
//!     let offers = Discovery::new(transport, mac, Duration::from_secs(5))
//!         .run(|_| {})
//!         .await?;
//!     for offer in &offers {
//!         print!("{}", format_packet(&offer.packet));
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`codec`] - Big-endian integer and IPv4 field helpers
//! - [`options`] - Option schema and message type table (RFC 2132)
//! - [`parser`] - Option list decoding with Pad/End handling
//! - [`DhcpPacket`] - BOOTP header encoding and decoding
//! - [`Transport`] - UDP broadcast send and deadline-bounded receive
//! - [`Discovery`] - One DISCOVER, many offers

pub mod codec;
pub mod config;
pub mod discover;
pub mod error;
pub mod interface;
pub mod options;
pub mod packet;
pub mod parser;
pub mod report;
pub mod transport;

pub use config::Config;
pub use discover::{Discovery, Event, Offer};
pub use error::{CorruptedOption, Corruption, Error, Result};
pub use interface::hardware_address;
pub use options::{MessageType, OptionCode};
pub use packet::{DhcpPacket, MacAddress};
pub use parser::{DecodedOption, OptionList, OptionValue, parse_options};
pub use report::{format_options, format_packet};
pub use transport::Transport;
