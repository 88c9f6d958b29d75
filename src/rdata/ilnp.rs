//! ILNP rdata layouts: NID, L32, L64 and LP (RFC 6742).
use std::fmt;
use std::net::Ipv4Addr;

use crate::error::{DNSError, DNSResult};
use crate::network_order::{FromNetworkOrder, PacketBuffer, ToNetworkOrder};
use crate::rdata::{field, number};
use crate::rfc1035::DomainName;

use dns_derive::DnsStruct;

// NID RR: https://datatracker.ietf.org/doc/html/rfc6742#section-2
#[derive(Debug, Default, Clone, DnsStruct)]
pub struct NID {
    pub preference: u16,
    pub node_id: [u8; 8],
}

impl NID {
    pub fn from_text(tokens: &[&str]) -> DNSResult<Self> {
        Ok(NID {
            preference: number(tokens, 0, "preference")?,
            node_id: parse_id64(field(tokens, 1, "node id")?)?,
        })
    }
}

impl fmt::Display for NID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.preference, id64_to_text(&self.node_id))
    }
}

// L32 RR: https://datatracker.ietf.org/doc/html/rfc6742#section-3
#[derive(Debug, Clone)]
pub struct L32 {
    pub preference: u16,
    pub locator: Ipv4Addr,
}

impl Default for L32 {
    fn default() -> Self {
        L32 {
            preference: 0,
            locator: Ipv4Addr::UNSPECIFIED,
        }
    }
}

impl ToNetworkOrder for L32 {
    fn to_network_bytes(&self, buffer: &mut PacketBuffer) -> DNSResult<usize> {
        let mut length = self.preference.to_network_bytes(buffer)?;
        length += self.locator.to_network_bytes(buffer)?;
        Ok(length)
    }
}

impl<'a> FromNetworkOrder<'a> for L32 {
    fn from_network_bytes(&mut self, buffer: &mut std::io::Cursor<&'a [u8]>) -> DNSResult<()> {
        self.preference.from_network_bytes(buffer)?;
        self.locator.from_network_bytes(buffer)?;
        Ok(())
    }
}

impl L32 {
    pub fn from_text(tokens: &[&str]) -> DNSResult<Self> {
        Ok(L32 {
            preference: number(tokens, 0, "preference")?,
            locator: field(tokens, 1, "locator")?
                .parse()
                .map_err(|_| DNSError::RRInvalid("bad L32 locator".to_string()))?,
        })
    }
}

impl fmt::Display for L32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.preference, self.locator)
    }
}

// L64 RR: https://datatracker.ietf.org/doc/html/rfc6742#section-4
#[derive(Debug, Default, Clone, DnsStruct)]
pub struct L64 {
    pub preference: u16,
    pub locator: [u8; 8],
}

impl L64 {
    pub fn from_text(tokens: &[&str]) -> DNSResult<Self> {
        Ok(L64 {
            preference: number(tokens, 0, "preference")?,
            locator: parse_id64(field(tokens, 1, "locator")?)?,
        })
    }
}

impl fmt::Display for L64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.preference, id64_to_text(&self.locator))
    }
}

// LP RR: https://datatracker.ietf.org/doc/html/rfc6742#section-5
#[derive(Debug, Default, Clone, DnsStruct)]
pub struct LP {
    pub preference: u16,
    pub fqdn: DomainName,
}

impl LP {
    pub fn from_text(tokens: &[&str]) -> DNSResult<Self> {
        Ok(LP {
            preference: number(tokens, 0, "preference")?,
            fqdn: DomainName::try_from(field(tokens, 1, "fqdn")?)?,
        })
    }
}

impl fmt::Display for LP {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.preference, self.fqdn)
    }
}

// 64-bit identifiers are presented as four colon-separated groups of 16 bits
fn id64_to_text(id: &[u8; 8]) -> String {
    format!(
        "{:02x}{:02x}:{:02x}{:02x}:{:02x}{:02x}:{:02x}{:02x}",
        id[0], id[1], id[2], id[3], id[4], id[5], id[6], id[7]
    )
}

fn parse_id64(s: &str) -> DNSResult<[u8; 8]> {
    let groups: Vec<&str> = s.split(':').collect();
    if groups.len() != 4 {
        return Err(DNSError::RRInvalid(format!("bad 64-bit identifier <{}>", s)));
    }

    let mut id = [0u8; 8];
    for (i, group) in groups.iter().enumerate() {
        let v = u16::from_str_radix(group, 16)
            .map_err(|_| DNSError::RRInvalid(format!("bad 64-bit identifier <{}>", s)))?;
        id[i * 2] = (v >> 8) as u8;
        id[i * 2 + 1] = (v & 0xFF) as u8;
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nid_text_round_trip() {
        let nid = NID::from_text(&["10", "0014:4fff:ff20:ee64"]).unwrap();
        assert_eq!(nid.node_id, [0x00, 0x14, 0x4f, 0xff, 0xff, 0x20, 0xee, 0x64]);
        assert_eq!(nid.to_string(), "10 0014:4fff:ff20:ee64");
    }

    #[test]
    fn lp_text() {
        let lp = LP::from_text(&["20", "l64-subnet.example.com."]).unwrap();
        assert_eq!(lp.to_string(), "20 l64-subnet.example.com.");
    }

    #[test]
    fn bad_identifier() {
        assert!(NID::from_text(&["10", "0014:4fff:ff20"]).is_err());
        assert!(NID::from_text(&["10", "zz14:4fff:ff20:ee64"]).is_err());
    }
}
