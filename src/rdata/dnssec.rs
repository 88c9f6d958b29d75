//! Rdata layouts for the DNSSEC record family (RFC 4034, RFC 5155) and the
//! windowed type bitmaps they share.
use byteorder::{ReadBytesExt, WriteBytesExt};
use std::fmt;
use std::io::Cursor;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::error::{DNSError, DNSResult};
use crate::network_order::primitive::read_bytes;
use crate::network_order::{FromNetworkOrder, PacketBuffer, ToNetworkOrder};
use crate::rdata::{field, number, type_from_mnemonic, type_mnemonic};
use crate::rfc1035::DomainName;
use crate::util;

/// The windowed type bitmap used by NSEC, NSEC3 and CSYNC
/// (RFC 4034 §4.1.2). Held as the list of type codes it encodes.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TypeBitMaps(pub Vec<u16>);

impl TypeBitMaps {
    pub fn from_wire(buffer: &mut Cursor<&[u8]>, end: u64) -> DNSResult<Self> {
        let mut types = Vec::new();

        while buffer.position() < end {
            let window = buffer.read_u8()?;
            let len = buffer.read_u8()? as usize;
            if len == 0 || len > 32 {
                return Err(DNSError::Parse(format!(
                    "type bitmap window length {} out of range",
                    len
                )));
            }

            let octets = read_bytes(buffer, len)?;
            for (i, octet) in octets.iter().enumerate() {
                for bit in 0..8u16 {
                    if octet & (0x80 >> bit) != 0 {
                        types.push((window as u16) << 8 | (i as u16 * 8 + bit));
                    }
                }
            }
        }

        Ok(TypeBitMaps(types))
    }

    pub fn from_text(tokens: &[&str]) -> DNSResult<Self> {
        let mut types = Vec::with_capacity(tokens.len());
        for tok in tokens {
            types.push(type_from_mnemonic(tok)?);
        }
        Ok(TypeBitMaps(types))
    }
}

impl ToNetworkOrder for TypeBitMaps {
    fn to_network_bytes(&self, buffer: &mut PacketBuffer) -> DNSResult<usize> {
        let mut types = self.0.clone();
        types.sort_unstable();
        types.dedup();

        let mut length = 0usize;
        let mut i = 0usize;

        while i < types.len() {
            let window = (types[i] >> 8) as u8;
            let mut octets = [0u8; 32];
            let mut used = 0usize;

            while i < types.len() && (types[i] >> 8) as u8 == window {
                let low = (types[i] & 0xFF) as usize;
                octets[low / 8] |= 0x80 >> (low % 8);
                used = used.max(low / 8 + 1);
                i += 1;
            }

            buffer.write_u8(window)?;
            buffer.write_u8(used as u8)?;
            buffer.extend_from_slice(&octets[..used]);
            length += 2 + used;
        }

        Ok(length)
    }
}

impl fmt::Display for TypeBitMaps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for code in &self.0 {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{}", type_mnemonic(*code))?;
            first = false;
        }
        Ok(())
    }
}

// DNSKEY RR: https://datatracker.ietf.org/doc/html/rfc4034#section-2
// CDNSKEY (RFC 7344) shares the exact same layout.
#[derive(Debug, Default, Clone)]
pub struct DNSKEY {
    /// bit 7 = zone key, bit 15 = secure entry point
    pub flags: u16,
    /// must be 3
    pub protocol: u8,
    pub algorithm: u8,
    pub key: Vec<u8>,
}

impl DNSKEY {
    pub fn from_wire(buffer: &mut Cursor<&[u8]>, end: u64) -> DNSResult<Self> {
        let mut key = DNSKEY {
            flags: buffer.read_u16::<byteorder::BigEndian>()?,
            protocol: buffer.read_u8()?,
            algorithm: buffer.read_u8()?,
            key: Vec::new(),
        };
        let remaining = end.saturating_sub(buffer.position()) as usize;
        key.key = read_bytes(buffer, remaining)?;
        Ok(key)
    }

    pub fn from_text(tokens: &[&str]) -> DNSResult<Self> {
        Ok(DNSKEY {
            flags: number(tokens, 0, "flags")?,
            protocol: number(tokens, 1, "protocol")?,
            algorithm: number(tokens, 2, "algorithm")?,
            key: decode_base64_tail(tokens, 3, "key")?,
        })
    }

    /// Key tag over the rdata, per RFC 4034 appendix B.
    pub fn key_tag(&self) -> u16 {
        let mut rdata = Vec::with_capacity(4 + self.key.len());
        rdata.extend_from_slice(&self.flags.to_be_bytes());
        rdata.push(self.protocol);
        rdata.push(self.algorithm);
        rdata.extend_from_slice(&self.key);

        let mut acc: u32 = 0;
        for (i, b) in rdata.iter().enumerate() {
            acc += if i & 1 == 0 {
                (*b as u32) << 8
            } else {
                *b as u32
            };
        }
        acc += (acc >> 16) & 0xFFFF;
        (acc & 0xFFFF) as u16
    }
}

impl ToNetworkOrder for DNSKEY {
    fn to_network_bytes(&self, buffer: &mut PacketBuffer) -> DNSResult<usize> {
        let mut length = self.flags.to_network_bytes(buffer)?;
        length += self.protocol.to_network_bytes(buffer)?;
        length += self.algorithm.to_network_bytes(buffer)?;
        length += self.key.to_network_bytes(buffer)?;
        Ok(length)
    }
}

impl fmt::Display for DNSKEY {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.flags,
            self.protocol,
            self.algorithm,
            BASE64.encode(&self.key)
        )
    }
}

// DS RR: https://datatracker.ietf.org/doc/html/rfc4034#section-5
// CDS (RFC 7344) shares the exact same layout.
#[derive(Debug, Default, Clone)]
pub struct DS {
    pub key_tag: u16,
    pub algorithm: u8,
    pub digest_type: u8,
    pub digest: Vec<u8>,
}

impl DS {
    pub fn from_wire(buffer: &mut Cursor<&[u8]>, end: u64) -> DNSResult<Self> {
        let mut ds = DS {
            key_tag: buffer.read_u16::<byteorder::BigEndian>()?,
            algorithm: buffer.read_u8()?,
            digest_type: buffer.read_u8()?,
            digest: Vec::new(),
        };
        let remaining = end.saturating_sub(buffer.position()) as usize;
        ds.digest = read_bytes(buffer, remaining)?;
        Ok(ds)
    }

    pub fn from_text(tokens: &[&str]) -> DNSResult<Self> {
        Ok(DS {
            key_tag: number(tokens, 0, "key tag")?,
            algorithm: number(tokens, 1, "algorithm")?,
            digest_type: number(tokens, 2, "digest type")?,
            digest: util::from_hex(&tokens[3..].concat())?,
        })
    }
}

impl ToNetworkOrder for DS {
    fn to_network_bytes(&self, buffer: &mut PacketBuffer) -> DNSResult<usize> {
        let mut length = self.key_tag.to_network_bytes(buffer)?;
        length += self.algorithm.to_network_bytes(buffer)?;
        length += self.digest_type.to_network_bytes(buffer)?;
        length += self.digest.to_network_bytes(buffer)?;
        Ok(length)
    }
}

impl fmt::Display for DS {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.key_tag,
            self.algorithm,
            self.digest_type,
            util::to_hex(&self.digest)
        )
    }
}

// RRSIG RR: https://datatracker.ietf.org/doc/html/rfc4034#section-3
// SIG (RFC 2931) shares the layout; for SIG(0) the covered type is 0.
//
// The signer's name is never compressed on the wire (RFC 4034 §3.1.7).
#[derive(Debug, Default, Clone)]
pub struct RRSIG {
    pub type_covered: u16,
    pub algorithm: u8,
    pub labels: u8,
    pub original_ttl: u32,
    pub expiration: u32,
    pub inception: u32,
    pub key_tag: u16,
    pub signer: DomainName,
    pub signature: Vec<u8>,
}

impl RRSIG {
    pub fn from_wire(buffer: &mut Cursor<&[u8]>, end: u64) -> DNSResult<Self> {
        let mut sig = RRSIG {
            type_covered: buffer.read_u16::<byteorder::BigEndian>()?,
            algorithm: buffer.read_u8()?,
            labels: buffer.read_u8()?,
            original_ttl: buffer.read_u32::<byteorder::BigEndian>()?,
            expiration: buffer.read_u32::<byteorder::BigEndian>()?,
            inception: buffer.read_u32::<byteorder::BigEndian>()?,
            key_tag: buffer.read_u16::<byteorder::BigEndian>()?,
            ..RRSIG::default()
        };
        sig.signer.from_network_bytes(buffer)?;
        let remaining = end.saturating_sub(buffer.position()) as usize;
        sig.signature = read_bytes(buffer, remaining)?;
        Ok(sig)
    }

    pub fn from_text(tokens: &[&str]) -> DNSResult<Self> {
        Ok(RRSIG {
            type_covered: type_from_mnemonic(field(tokens, 0, "type covered")?)?,
            algorithm: number(tokens, 1, "algorithm")?,
            labels: number(tokens, 2, "labels")?,
            original_ttl: number(tokens, 3, "original ttl")?,
            expiration: number(tokens, 4, "expiration")?,
            inception: number(tokens, 5, "inception")?,
            key_tag: number(tokens, 6, "key tag")?,
            signer: DomainName::try_from(field(tokens, 7, "signer")?)?,
            signature: decode_base64_tail(tokens, 8, "signature")?,
        })
    }

    /// The rdata with an empty signature field, the prefix both signing and
    /// verification digest (RFC 2931 §4, RFC 4034 §3.1.8.1).
    pub fn to_presigned_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(18 + self.signer.encoded_len());
        bytes.extend_from_slice(&self.type_covered.to_be_bytes());
        bytes.push(self.algorithm);
        bytes.push(self.labels);
        bytes.extend_from_slice(&self.original_ttl.to_be_bytes());
        bytes.extend_from_slice(&self.expiration.to_be_bytes());
        bytes.extend_from_slice(&self.inception.to_be_bytes());
        bytes.extend_from_slice(&self.key_tag.to_be_bytes());
        bytes.extend_from_slice(&self.signer.to_canonical_bytes());
        bytes
    }
}

impl ToNetworkOrder for RRSIG {
    fn to_network_bytes(&self, buffer: &mut PacketBuffer) -> DNSResult<usize> {
        let mut length = self.type_covered.to_network_bytes(buffer)?;
        length += self.algorithm.to_network_bytes(buffer)?;
        length += self.labels.to_network_bytes(buffer)?;
        length += self.original_ttl.to_network_bytes(buffer)?;
        length += self.expiration.to_network_bytes(buffer)?;
        length += self.inception.to_network_bytes(buffer)?;
        length += self.key_tag.to_network_bytes(buffer)?;

        // signer name is exempt from compression
        let compression = buffer.compression_enabled();
        buffer.set_compression(false);
        length += self.signer.to_network_bytes(buffer)?;
        buffer.set_compression(compression);

        length += self.signature.to_network_bytes(buffer)?;
        Ok(length)
    }
}

impl fmt::Display for RRSIG {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {} {} {} {}",
            type_mnemonic(self.type_covered),
            self.algorithm,
            self.labels,
            self.original_ttl,
            self.expiration,
            self.inception,
            self.key_tag,
            self.signer,
            BASE64.encode(&self.signature)
        )
    }
}

// NSEC RR: https://datatracker.ietf.org/doc/html/rfc4034#section-4
#[derive(Debug, Default, Clone)]
pub struct NSEC {
    pub next: DomainName,
    pub types: TypeBitMaps,
}

impl NSEC {
    pub fn from_wire(buffer: &mut Cursor<&[u8]>, end: u64) -> DNSResult<Self> {
        let mut nsec = NSEC::default();
        nsec.next.from_network_bytes(buffer)?;
        nsec.types = TypeBitMaps::from_wire(buffer, end)?;
        Ok(nsec)
    }

    pub fn from_text(tokens: &[&str]) -> DNSResult<Self> {
        Ok(NSEC {
            next: DomainName::try_from(field(tokens, 0, "next domain")?)?,
            types: TypeBitMaps::from_text(&tokens[1..])?,
        })
    }
}

impl ToNetworkOrder for NSEC {
    fn to_network_bytes(&self, buffer: &mut PacketBuffer) -> DNSResult<usize> {
        let compression = buffer.compression_enabled();
        buffer.set_compression(false);
        let mut length = self.next.to_network_bytes(buffer)?;
        buffer.set_compression(compression);

        length += self.types.to_network_bytes(buffer)?;
        Ok(length)
    }
}

impl fmt::Display for NSEC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.next, self.types)
    }
}

// NSEC3 RR: https://datatracker.ietf.org/doc/html/rfc5155#section-3
#[derive(Debug, Default, Clone)]
pub struct NSEC3 {
    pub hash_algorithm: u8,
    pub flags: u8,
    pub iterations: u16,
    pub salt: Vec<u8>,
    pub next_hashed: Vec<u8>,
    pub types: TypeBitMaps,
}

impl NSEC3 {
    pub fn from_wire(buffer: &mut Cursor<&[u8]>, end: u64) -> DNSResult<Self> {
        let mut nsec3 = NSEC3 {
            hash_algorithm: buffer.read_u8()?,
            flags: buffer.read_u8()?,
            iterations: buffer.read_u16::<byteorder::BigEndian>()?,
            ..NSEC3::default()
        };
        let salt_len = buffer.read_u8()? as usize;
        nsec3.salt = read_bytes(buffer, salt_len)?;
        let hash_len = buffer.read_u8()? as usize;
        nsec3.next_hashed = read_bytes(buffer, hash_len)?;
        nsec3.types = TypeBitMaps::from_wire(buffer, end)?;
        Ok(nsec3)
    }

    pub fn from_text(tokens: &[&str]) -> DNSResult<Self> {
        Ok(NSEC3 {
            hash_algorithm: number(tokens, 0, "hash algorithm")?,
            flags: number(tokens, 1, "flags")?,
            iterations: number(tokens, 2, "iterations")?,
            salt: parse_salt(field(tokens, 3, "salt")?)?,
            next_hashed: base32::decode(
                base32::Alphabet::Rfc4648Hex { padding: false },
                &field(tokens, 4, "next hashed owner")?.to_ascii_uppercase(),
            )
            .ok_or_else(|| DNSError::RRInvalid("bad base32 next hashed owner".to_string()))?,
            types: TypeBitMaps::from_text(&tokens[5..])?,
        })
    }
}

impl ToNetworkOrder for NSEC3 {
    fn to_network_bytes(&self, buffer: &mut PacketBuffer) -> DNSResult<usize> {
        let mut length = self.hash_algorithm.to_network_bytes(buffer)?;
        length += self.flags.to_network_bytes(buffer)?;
        length += self.iterations.to_network_bytes(buffer)?;

        buffer.write_u8(self.salt.len() as u8)?;
        buffer.extend_from_slice(&self.salt);
        buffer.write_u8(self.next_hashed.len() as u8)?;
        buffer.extend_from_slice(&self.next_hashed);
        length += 2 + self.salt.len() + self.next_hashed.len();

        length += self.types.to_network_bytes(buffer)?;
        Ok(length)
    }
}

impl fmt::Display for NSEC3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {}",
            self.hash_algorithm,
            self.flags,
            self.iterations,
            salt_to_text(&self.salt),
            base32::encode(
                base32::Alphabet::Rfc4648Hex { padding: false },
                &self.next_hashed
            ),
            self.types
        )
    }
}

// NSEC3PARAM RR: https://datatracker.ietf.org/doc/html/rfc5155#section-4
#[derive(Debug, Default, Clone)]
pub struct NSEC3PARAM {
    pub hash_algorithm: u8,
    pub flags: u8,
    pub iterations: u16,
    pub salt: Vec<u8>,
}

impl NSEC3PARAM {
    pub fn from_wire(buffer: &mut Cursor<&[u8]>) -> DNSResult<Self> {
        let mut param = NSEC3PARAM {
            hash_algorithm: buffer.read_u8()?,
            flags: buffer.read_u8()?,
            iterations: buffer.read_u16::<byteorder::BigEndian>()?,
            ..NSEC3PARAM::default()
        };
        let salt_len = buffer.read_u8()? as usize;
        param.salt = read_bytes(buffer, salt_len)?;
        Ok(param)
    }

    pub fn from_text(tokens: &[&str]) -> DNSResult<Self> {
        Ok(NSEC3PARAM {
            hash_algorithm: number(tokens, 0, "hash algorithm")?,
            flags: number(tokens, 1, "flags")?,
            iterations: number(tokens, 2, "iterations")?,
            salt: parse_salt(field(tokens, 3, "salt")?)?,
        })
    }
}

impl ToNetworkOrder for NSEC3PARAM {
    fn to_network_bytes(&self, buffer: &mut PacketBuffer) -> DNSResult<usize> {
        let mut length = self.hash_algorithm.to_network_bytes(buffer)?;
        length += self.flags.to_network_bytes(buffer)?;
        length += self.iterations.to_network_bytes(buffer)?;
        buffer.write_u8(self.salt.len() as u8)?;
        buffer.extend_from_slice(&self.salt);
        Ok(length + 1 + self.salt.len())
    }
}

impl fmt::Display for NSEC3PARAM {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.hash_algorithm,
            self.flags,
            self.iterations,
            salt_to_text(&self.salt)
        )
    }
}

// an absent salt is written as a single dash
fn salt_to_text(salt: &[u8]) -> String {
    if salt.is_empty() {
        "-".to_string()
    } else {
        util::to_hex(salt)
    }
}

fn parse_salt(s: &str) -> DNSResult<Vec<u8>> {
    if s == "-" {
        Ok(Vec::new())
    } else {
        util::from_hex(s)
    }
}

// base64 fields come last in their records and may be split across tokens
fn decode_base64_tail(tokens: &[&str], from: usize, what: &str) -> DNSResult<Vec<u8>> {
    if tokens.len() <= from {
        return Err(DNSError::RRInvalid(format!("missing {} field", what)));
    }
    BASE64
        .decode(tokens[from..].concat())
        .map_err(|e| DNSError::RRInvalid(format!("bad base64 {}: {}", what, e)))
}
