//! Error types for the discovery client.
//!
//! All fallible operations in this crate return [`Result<T>`], which uses
//! the [`Error`] enum for error variants.

use std::fmt;

/// Errors that can occur while building, sending, or decoding DHCP packets.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File system or network I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON deserialization error (config file).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed DHCP packet received.
    ///
    /// Packets that are too short, carry an invalid magic cookie, or whose
    /// hardware length disagrees with the hardware type.
    #[error("Invalid DHCP packet: {0}")]
    InvalidPacket(String),

    /// A hardware address string is not six hex octets.
    #[error("Malformed hardware address: {0}")]
    MalformedAddress(String),

    /// An option in the options area could not be decoded.
    ///
    /// The option parser reports this inside [`OptionList`](crate::OptionList)
    /// instead of failing, so callers still see every option before it.
    #[error("Corrupted option: {0}")]
    CorruptedOption(#[from] CorruptedOption),

    /// No datagram arrived before the receive deadline.
    #[error("Timed out waiting for a reply")]
    Timeout,

    /// Socket creation, configuration, or bind error.
    ///
    /// Typically occurs when binding to port 68 without administrator
    /// privileges or while another DHCP client holds the port.
    #[error("Socket error: {0}")]
    Socket(String),

    /// The named network interface does not exist or has no hardware address.
    #[error("{0}: no such interface")]
    InterfaceNotFound(String),

    /// Invalid client configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Returns true for the expected end-of-window outcome.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }
}

/// Where and why the option parser stopped early.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("option {code} at offset {offset}: {reason}")]
pub struct CorruptedOption {
    /// Code of the option being decoded.
    pub code: u8,
    /// Offset of the option's code byte within the scanned region.
    pub offset: usize,
    pub reason: Corruption,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corruption {
    /// The wire length disagrees with the schema's fixed length.
    LengthMismatch { expected: usize, actual: usize },
    /// The region ended right after the code byte.
    MissingLength,
    /// The declared length runs past the end of the region.
    Truncated { declared: usize, available: usize },
    /// An address list whose length is not a multiple of four.
    Misaligned { length: usize },
}

impl fmt::Display for Corruption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthMismatch { expected, actual } => {
                write!(f, "expected length {}, found {}", expected, actual)
            }
            Self::MissingLength => write!(f, "length byte missing"),
            Self::Truncated {
                declared,
                available,
            } => write!(
                f,
                "declared length {} but only {} bytes remain",
                declared, available
            ),
            Self::Misaligned { length } => {
                write!(f, "address list length {} is not a multiple of 4", length)
            }
        }
    }
}

/// A specialized Result type for discovery operations.
pub type Result<T> = std::result::Result<T, Error>;
