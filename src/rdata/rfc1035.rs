//! Rdata layouts from RFC 1035 §3.3.
use std::fmt;
use std::io::Cursor;
use std::net::Ipv4Addr;

use crate::error::DNSResult;
use crate::network_order::primitive::read_bytes;
use crate::network_order::{FromNetworkOrder, PacketBuffer, ToNetworkOrder};
use crate::rdata::{field, number};
use crate::rfc1035::{CharacterString, DomainName};
use crate::util;

use dns_derive::DnsStruct;

// SOA RR: https://datatracker.ietf.org/doc/html/rfc1035#section-3.3.13
#[derive(Debug, Default, Clone, DnsStruct)]
pub struct SOA {
    /// name server that was the original or primary source of data for this zone
    pub mname: DomainName,
    /// mailbox of the person responsible for this zone
    pub rname: DomainName,
    /// version number of the original copy of the zone
    pub serial: u32,
    /// time interval before the zone should be refreshed
    pub refresh: u32,
    /// time interval that should elapse before a failed refresh should be retried
    pub retry: u32,
    /// upper limit on the time interval that can elapse before the zone is no
    /// longer authoritative
    pub expire: u32,
    /// minimum TTL field that should be exported with any RR from this zone
    pub minimum: u32,
}

impl SOA {
    pub fn from_text(tokens: &[&str]) -> DNSResult<Self> {
        Ok(SOA {
            mname: DomainName::try_from(field(tokens, 0, "mname")?)?,
            rname: DomainName::try_from(field(tokens, 1, "rname")?)?,
            serial: number(tokens, 2, "serial")?,
            refresh: number(tokens, 3, "refresh")?,
            retry: number(tokens, 4, "retry")?,
            expire: number(tokens, 5, "expire")?,
            minimum: number(tokens, 6, "minimum")?,
        })
    }
}

impl fmt::Display for SOA {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {} {}",
            self.mname, self.rname, self.serial, self.refresh, self.retry, self.expire, self.minimum
        )
    }
}

// MX RR: https://datatracker.ietf.org/doc/html/rfc1035#section-3.3.9
#[derive(Debug, Default, Clone, DnsStruct)]
pub struct MX {
    /// preference given to this RR among others at the same owner, lower
    /// values preferred
    pub preference: u16,
    /// host willing to act as a mail exchange for the owner name
    pub exchange: DomainName,
}

impl MX {
    pub fn from_text(tokens: &[&str]) -> DNSResult<Self> {
        Ok(MX {
            preference: number(tokens, 0, "preference")?,
            exchange: DomainName::try_from(field(tokens, 1, "exchange")?)?,
        })
    }
}

impl fmt::Display for MX {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.preference, self.exchange)
    }
}

// HINFO RR: https://datatracker.ietf.org/doc/html/rfc1035#section-3.3.2
#[derive(Debug, Default, Clone, DnsStruct)]
pub struct HINFO {
    pub cpu: CharacterString,
    pub os: CharacterString,
}

impl HINFO {
    pub fn from_text(tokens: &[&str]) -> DNSResult<Self> {
        Ok(HINFO {
            cpu: CharacterString::from(util::unquote(field(tokens, 0, "cpu")?)),
            os: CharacterString::from(util::unquote(field(tokens, 1, "os")?)),
        })
    }
}

impl fmt::Display for HINFO {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" \"{}\"", self.cpu, self.os)
    }
}

// RP RR: https://datatracker.ietf.org/doc/html/rfc1183#section-2.2
#[derive(Debug, Default, Clone, DnsStruct)]
pub struct RP {
    /// mailbox of the responsible person, mailbox-as-domain-name
    pub mbox: DomainName,
    /// name of a TXT record with further information
    pub txt: DomainName,
}

impl RP {
    pub fn from_text(tokens: &[&str]) -> DNSResult<Self> {
        Ok(RP {
            mbox: DomainName::try_from(field(tokens, 0, "mbox")?)?,
            txt: DomainName::try_from(field(tokens, 1, "txt")?)?,
        })
    }
}

impl fmt::Display for RP {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.mbox, self.txt)
    }
}

// WKS RR: https://datatracker.ietf.org/doc/html/rfc1035#section-3.4.2
//
// The bitmap runs to the end of the rdata; bit N set means port N is served.
#[derive(Debug, Clone)]
pub struct WKS {
    pub address: Ipv4Addr,
    pub protocol: u8,
    pub bitmap: Vec<u8>,
}

impl WKS {
    pub fn from_wire(buffer: &mut Cursor<&[u8]>, end: u64) -> DNSResult<Self> {
        let mut address = Ipv4Addr::UNSPECIFIED;
        address.from_network_bytes(buffer)?;
        let mut protocol = 0u8;
        protocol.from_network_bytes(buffer)?;
        let remaining = end.saturating_sub(buffer.position()) as usize;
        let bitmap = read_bytes(buffer, remaining)?;

        Ok(WKS {
            address,
            protocol,
            bitmap,
        })
    }

    pub fn from_text(tokens: &[&str]) -> DNSResult<Self> {
        let address: Ipv4Addr = field(tokens, 0, "address")?
            .parse()
            .map_err(|_| crate::error::DNSError::RRInvalid("bad WKS address".to_string()))?;
        let protocol = number(tokens, 1, "protocol")?;

        // remaining tokens are port numbers
        let mut bitmap = Vec::new();
        for tok in &tokens[2..] {
            let port: usize = tok
                .parse()
                .map_err(|_| crate::error::DNSError::RRInvalid(format!("bad port <{}>", tok)))?;
            if bitmap.len() <= port / 8 {
                bitmap.resize(port / 8 + 1, 0);
            }
            bitmap[port / 8] |= 0x80 >> (port % 8);
        }

        Ok(WKS {
            address,
            protocol,
            bitmap,
        })
    }

    fn ports(&self) -> Vec<usize> {
        let mut ports = Vec::new();
        for (i, byte) in self.bitmap.iter().enumerate() {
            for bit in 0..8 {
                if byte & (0x80 >> bit) != 0 {
                    ports.push(i * 8 + bit);
                }
            }
        }
        ports
    }
}

impl ToNetworkOrder for WKS {
    fn to_network_bytes(&self, buffer: &mut PacketBuffer) -> DNSResult<usize> {
        let mut length = self.address.to_network_bytes(buffer)?;
        length += self.protocol.to_network_bytes(buffer)?;
        length += self.bitmap.to_network_bytes(buffer)?;
        Ok(length)
    }
}

impl fmt::Display for WKS {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.address, self.protocol)?;
        for port in self.ports() {
            write!(f, " {}", port)?;
        }
        Ok(())
    }
}
