//! Option list decoding.
//!
//! [`parse_options`] walks an options region left to right, applying the
//! [schema](crate::options) to each TLV record. Pad bytes are skipped without
//! a length byte and End stops the scan, whatever follows it. A record that
//! cannot be decoded stops the scan too, but everything decoded before it is
//! kept and the problem is reported through [`OptionList::corruption`].

use std::fmt;
use std::net::Ipv4Addr;

use crate::codec::{decode_ipv4, decode_u16_be, decode_u32_be};
use crate::error::{CorruptedOption, Corruption, Error, Result};
use crate::options::{
    ExpectedLength, MessageType, OptionCode, OptionKind, OptionSpec, lookup, message_type_name,
};

/// A decoded option value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    /// Raw message type byte; rendered through the message type table.
    MessageType(u8),
    Addresses(Vec<Ipv4Addr>),
    Address(Ipv4Addr),
    Seconds(u32),
    Integer(u16),
    Text(String),
    /// Only the length of an opaque vendor blob.
    Size(usize),
    /// Compressed domain names, which are not decoded.
    Unsupported,
    Codes(Vec<u8>),
    Overload(u8),
    /// Bytes of an option the schema has no rendering for.
    Raw(Vec<u8>),
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MessageType(value) => match message_type_name(*value) {
                Some(name) => f.write_str(name),
                None => write!(f, "{}", value),
            },
            Self::Addresses(addrs) => {
                for addr in addrs {
                    write!(f, "{} ", addr)?;
                }
                Ok(())
            }
            Self::Address(addr) => write!(f, "{}", addr),
            Self::Seconds(secs) => write!(f, "{}", secs),
            Self::Integer(value) => write!(f, "{}", value),
            Self::Text(text) => f.write_str(text),
            Self::Size(len) => write!(f, "({} bytes)", len),
            Self::Unsupported => f.write_str("[unsupported: RFC 1035 section 4.1.4 compression]"),
            Self::Codes(codes) => {
                for (index, code) in codes.iter().enumerate() {
                    if index > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", code)?;
                }
                Ok(())
            }
            Self::Overload(flag) => match flag {
                1 => f.write_str("file"),
                2 => f.write_str("sname"),
                3 => f.write_str("file+sname"),
                other => write!(f, "{}", other),
            },
            Self::Raw(bytes) => {
                for (index, byte) in bytes.iter().enumerate() {
                    if index > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{:02x}", byte)?;
                }
                Ok(())
            }
        }
    }
}

/// One decoded TLV record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedOption {
    pub code: u8,
    pub spec: Option<&'static OptionSpec>,
    pub value: OptionValue,
}

impl DecodedOption {
    /// The schema's display name, if the code has an entry.
    pub fn name(&self) -> Option<&'static str> {
        self.spec.map(|spec| spec.name)
    }

    /// The display name, or the numeric code for codes outside the schema.
    pub fn label(&self) -> String {
        match self.name() {
            Some(name) => name.to_string(),
            None => self.code.to_string(),
        }
    }
}

/// Result of scanning one options region.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionList {
    pub options: Vec<DecodedOption>,
    /// True when the scan stopped on an End option.
    pub terminated: bool,
    /// Set when the scan stopped on an undecodable record.
    pub corruption: Option<CorruptedOption>,
}

impl OptionList {
    pub fn iter(&self) -> impl Iterator<Item = &DecodedOption> {
        self.options.iter()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Returns the value of the first option with `code`.
    pub fn get(&self, code: u8) -> Option<&OptionValue> {
        self.options
            .iter()
            .find(|option| option.code == code)
            .map(|option| &option.value)
    }

    /// Returns the DHCP message type (Option 53) if present and known.
    pub fn message_type(&self) -> Option<MessageType> {
        match self.get(OptionCode::MessageType as u8)? {
            OptionValue::MessageType(value) => MessageType::try_from(*value).ok(),
            _ => None,
        }
    }

    /// Returns the server identifier (Option 54) if present.
    pub fn server_identifier(&self) -> Option<Ipv4Addr> {
        match self.get(OptionCode::ServerIdentifier as u8)? {
            OptionValue::Address(addr) => Some(*addr),
            _ => None,
        }
    }

    /// Returns the offered lease time in seconds (Option 51) if present.
    pub fn lease_time(&self) -> Option<u32> {
        match self.get(OptionCode::IpAddressLeaseTime as u8)? {
            OptionValue::Seconds(secs) => Some(*secs),
            _ => None,
        }
    }

    /// Returns the option overload flag (Option 52) if present.
    pub fn overload(&self) -> Option<u8> {
        match self.get(OptionCode::OptionOverload as u8)? {
            OptionValue::Overload(flag) => Some(*flag),
            _ => None,
        }
    }

    /// Appends the records of a further region, such as an overloaded field.
    ///
    /// The first corruption seen is the one kept.
    pub fn append(&mut self, other: OptionList) {
        self.options.extend(other.options);
        if self.corruption.is_none() {
            self.corruption = other.corruption;
        }
    }

    /// Converts a corrupted list into an error, for callers that need every
    /// option or nothing.
    pub fn into_result(self) -> Result<Vec<DecodedOption>> {
        match self.corruption {
            Some(corruption) => Err(Error::CorruptedOption(corruption)),
            None => Ok(self.options),
        }
    }
}

/// Decodes an options region.
pub fn parse_options(data: &[u8]) -> OptionList {
    let mut list = OptionList::default();
    let mut index = 0;

    while index < data.len() {
        let code = data[index];

        if code == OptionCode::End as u8 {
            list.terminated = true;
            break;
        }

        if code == OptionCode::Pad as u8 {
            index += 1;
            continue;
        }

        match decode_record(data, index) {
            Ok((option, next)) => {
                list.options.push(option);
                index = next;
            }
            Err(reason) => {
                list.corruption = Some(CorruptedOption {
                    code,
                    offset: index,
                    reason,
                });
                break;
            }
        }
    }

    list
}

fn decode_record(
    data: &[u8],
    index: usize,
) -> std::result::Result<(DecodedOption, usize), Corruption> {
    let code = data[index];
    let length = *data.get(index + 1).ok_or(Corruption::MissingLength)? as usize;
    let spec = lookup(code);

    if let Some(ExpectedLength::Fixed(expected)) = spec.map(|spec| spec.expected)
        && expected != length
    {
        return Err(Corruption::LengthMismatch {
            expected,
            actual: length,
        });
    }

    let start = index + 2;
    let end = start + length;
    let value = data.get(start..end).ok_or(Corruption::Truncated {
        declared: length,
        available: data.len() - start,
    })?;

    let value = match spec {
        Some(spec) => decode_value(spec.kind, value)?,
        None => OptionValue::Raw(value.to_vec()),
    };

    Ok((DecodedOption { code, spec, value }, end))
}

fn decode_value(
    kind: OptionKind,
    value: &[u8],
) -> std::result::Result<OptionValue, Corruption> {
    let decoded = match kind {
        OptionKind::MessageType => OptionValue::MessageType(fixed::<1>(value)?[0]),
        OptionKind::AddressList => {
            if !value.len().is_multiple_of(4) {
                return Err(Corruption::Misaligned {
                    length: value.len(),
                });
            }
            OptionValue::Addresses(
                value
                    .chunks_exact(4)
                    .map(|chunk| decode_ipv4([chunk[0], chunk[1], chunk[2], chunk[3]]))
                    .collect(),
            )
        }
        OptionKind::Address => OptionValue::Address(decode_ipv4(fixed(value)?)),
        OptionKind::Seconds => OptionValue::Seconds(decode_u32_be(fixed(value)?)),
        OptionKind::Integer16 => OptionValue::Integer(decode_u16_be(fixed(value)?)),
        OptionKind::Text => OptionValue::Text(String::from_utf8_lossy(value).into_owned()),
        OptionKind::SizeOnly => OptionValue::Size(value.len()),
        OptionKind::CompressedNames => OptionValue::Unsupported,
        OptionKind::CodeList => OptionValue::Codes(value.to_vec()),
        OptionKind::Overload => OptionValue::Overload(fixed::<1>(value)?[0]),
        OptionKind::Opaque | OptionKind::Marker => OptionValue::Raw(value.to_vec()),
    };
    Ok(decoded)
}

fn fixed<const N: usize>(value: &[u8]) -> std::result::Result<[u8; N], Corruption> {
    value.try_into().map_err(|_| Corruption::LengthMismatch {
        expected: N,
        actual: value.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(list: &OptionList) -> Vec<(String, String)> {
        list.iter()
            .map(|option| (option.label(), option.value.to_string()))
            .collect()
    }

    #[test]
    fn test_single_address() {
        let list = parse_options(&[54, 4, 10, 0, 0, 1, 255]);
        assert!(list.terminated);
        assert!(list.corruption.is_none());
        assert_eq!(
            rendered(&list),
            vec![("Server Identifier".to_string(), "10.0.0.1".to_string())]
        );
        assert_eq!(list.server_identifier(), Some(Ipv4Addr::new(10, 0, 0, 1)));
    }

    #[test]
    fn test_address_list() {
        let list = parse_options(&[3, 8, 192, 168, 1, 1, 192, 168, 1, 2, 255]);
        assert_eq!(
            rendered(&list),
            vec![(
                "Router".to_string(),
                "192.168.1.1 192.168.1.2 ".to_string()
            )]
        );
    }

    #[test]
    fn test_corrupted_length_stops_scan() {
        let list = parse_options(&[1, 3, 255, 255, 0, 255]);
        assert!(list.is_empty());
        assert!(!list.terminated);
        assert_eq!(
            list.corruption,
            Some(CorruptedOption {
                code: 1,
                offset: 0,
                reason: Corruption::LengthMismatch {
                    expected: 4,
                    actual: 3
                },
            })
        );
    }

    #[test]
    fn test_corruption_keeps_earlier_options() {
        let list = parse_options(&[53, 1, 2, 51, 2, 0, 0, 54, 4, 10, 0, 0, 1, 255]);
        assert_eq!(list.len(), 1);
        assert_eq!(list.message_type(), Some(MessageType::Offer));
        assert_eq!(list.server_identifier(), None);
        assert_eq!(list.corruption.map(|c| c.offset), Some(3));
    }

    #[test]
    fn test_message_type() {
        let list = parse_options(&[53, 1, 1, 255]);
        assert_eq!(
            rendered(&list),
            vec![("DHCP Message Type".to_string(), "DHCPDISCOVER".to_string())]
        );
        assert_eq!(list.message_type(), Some(MessageType::Discover));
    }

    #[test]
    fn test_unknown_message_type_value() {
        let list = parse_options(&[53, 1, 42, 255]);
        assert_eq!(list.iter().next().unwrap().value.to_string(), "42");
        assert_eq!(list.message_type(), None);
    }

    #[test]
    fn test_unknown_code_uses_numeric_label() {
        let list = parse_options(&[200, 2, 9, 9, 255]);
        let option = list.iter().next().unwrap();
        assert_eq!(option.label(), "200");
        assert!(option.name().is_none());
        assert_eq!(option.value, OptionValue::Raw(vec![9, 9]));
        assert_eq!(option.value.to_string(), "09 09");
        assert!(list.terminated);
    }

    #[test]
    fn test_pad_bytes_produce_no_records() {
        let list = parse_options(&[0, 0, 0, 0, 53, 1, 2, 0, 255]);
        assert_eq!(list.len(), 1);
        assert!(list.terminated);

        let only_pad = parse_options(&[0; 16]);
        assert!(only_pad.is_empty());
        assert!(!only_pad.terminated);
        assert!(only_pad.corruption.is_none());
    }

    #[test]
    fn test_end_ignores_trailing_bytes() {
        let list = parse_options(&[53, 1, 1, 255, 1, 3, 0xde, 0xad]);
        assert_eq!(list.len(), 1);
        assert!(list.terminated);
        assert!(list.corruption.is_none());
    }

    #[test]
    fn test_region_without_end() {
        let list = parse_options(&[53, 1, 2]);
        assert_eq!(list.len(), 1);
        assert!(!list.terminated);
        assert!(list.corruption.is_none());
    }

    #[test]
    fn test_seconds() {
        let list = parse_options(&[51, 4, 0, 1, 0x51, 0x80, 58, 4, 0, 0, 0xa8, 0xc0, 255]);
        assert_eq!(list.lease_time(), Some(86400));
        assert_eq!(
            rendered(&list),
            vec![
                ("IP Address Lease Time".to_string(), "86400".to_string()),
                ("Renewal Time Value".to_string(), "43200".to_string()),
            ]
        );
    }

    #[test]
    fn test_text_without_terminator() {
        let mut data = vec![15, 11];
        data.extend_from_slice(b"example.com");
        data.extend_from_slice(&[12, 4]);
        data.extend_from_slice(b"host");
        let list = parse_options(&data);
        assert_eq!(
            rendered(&list),
            vec![
                ("Domain Name".to_string(), "example.com".to_string()),
                ("Host Name".to_string(), "host".to_string()),
            ]
        );
    }

    #[test]
    fn test_vendor_specific_reports_size_only() {
        let list = parse_options(&[43, 5, 1, 2, 3, 4, 5, 255]);
        assert_eq!(list.iter().next().unwrap().value.to_string(), "(5 bytes)");
    }

    #[test]
    fn test_domain_search_is_not_decoded() {
        let list = parse_options(&[119, 5, 3, b'f', b'o', b'o', 0, 255]);
        let option = list.iter().next().unwrap();
        assert_eq!(option.value, OptionValue::Unsupported);
        assert_eq!(option.label(), "Domain Search");
        assert!(list.terminated);
    }

    #[test]
    fn test_truncated_value() {
        let list = parse_options(&[6, 8, 8, 8, 8, 8]);
        assert!(list.is_empty());
        assert_eq!(
            list.corruption.map(|c| c.reason),
            Some(Corruption::Truncated {
                declared: 8,
                available: 4
            })
        );
    }

    #[test]
    fn test_missing_length() {
        let list = parse_options(&[53, 1, 2, 12]);
        assert_eq!(list.len(), 1);
        assert_eq!(
            list.corruption.map(|c| c.reason),
            Some(Corruption::MissingLength)
        );
    }

    #[test]
    fn test_misaligned_address_list() {
        let list = parse_options(&[3, 6, 192, 168, 1, 1, 0, 0, 255]);
        assert!(list.is_empty());
        assert_eq!(
            list.corruption.map(|c| c.reason),
            Some(Corruption::Misaligned { length: 6 })
        );
    }

    #[test]
    fn test_parameter_request_list() {
        let list = parse_options(&[55, 3, 1, 3, 6, 255]);
        assert_eq!(list.iter().next().unwrap().value.to_string(), "1 3 6");
    }

    #[test]
    fn test_into_result() {
        assert!(parse_options(&[53, 1, 2, 255]).into_result().is_ok());
        assert!(matches!(
            parse_options(&[1, 3, 255, 255, 0, 255]).into_result(),
            Err(Error::CorruptedOption(_))
        ));
    }

    #[test]
    fn test_append_keeps_first_corruption() {
        let mut list = parse_options(&[53, 1, 2, 255]);
        list.append(parse_options(&[12, 2, b'h', b'i', 1, 3]));
        list.append(parse_options(&[54, 2, 0, 0]));
        assert_eq!(list.len(), 2);
        assert_eq!(list.corruption.map(|c| c.code), Some(1));
    }
}
