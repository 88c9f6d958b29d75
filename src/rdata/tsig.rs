//! TSIG record layout: https://datatracker.ietf.org/doc/html/rfc2845
//!
//! The signing logic that fills this record lives in `crate::tsig`; this is
//! just the wire shape. The algorithm name is a domain name and is never
//! compressed.
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::fmt;
use std::io::Cursor;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::error::DNSResult;
use crate::network_order::primitive::read_bytes;
use crate::network_order::{FromNetworkOrder, PacketBuffer, ToNetworkOrder};
use crate::rfc1035::DomainName;

#[derive(Debug, Default, Clone)]
pub struct TSIG {
    /// name of the HMAC algorithm, e.g. hmac-sha256.
    pub algorithm: DomainName,
    /// seconds since the epoch, 48 bits on the wire
    pub time_signed: u64,
    /// permitted clock skew in seconds
    pub fudge: u16,
    pub mac: Vec<u8>,
    /// the untranslated ID of the message this record signs
    pub original_id: u16,
    pub error: u16,
    pub other: Vec<u8>,
}

impl TSIG {
    pub fn from_wire(buffer: &mut Cursor<&[u8]>) -> DNSResult<Self> {
        let mut tsig = TSIG::default();
        tsig.algorithm.from_network_bytes(buffer)?;
        tsig.time_signed = buffer.read_uint::<BigEndian>(6)?;
        tsig.fudge = buffer.read_u16::<BigEndian>()?;

        let mac_size = buffer.read_u16::<BigEndian>()? as usize;
        tsig.mac = read_bytes(buffer, mac_size)?;

        tsig.original_id = buffer.read_u16::<BigEndian>()?;
        tsig.error = buffer.read_u16::<BigEndian>()?;

        let other_len = buffer.read_u16::<BigEndian>()? as usize;
        tsig.other = read_bytes(buffer, other_len)?;

        Ok(tsig)
    }
}

impl ToNetworkOrder for TSIG {
    fn to_network_bytes(&self, buffer: &mut PacketBuffer) -> DNSResult<usize> {
        let compression = buffer.compression_enabled();
        buffer.set_compression(false);
        let mut length = self.algorithm.to_network_bytes(buffer)?;
        buffer.set_compression(compression);

        buffer.write_uint::<BigEndian>(self.time_signed, 6)?;
        buffer.write_u16::<BigEndian>(self.fudge)?;
        buffer.write_u16::<BigEndian>(self.mac.len() as u16)?;
        buffer.extend_from_slice(&self.mac);
        buffer.write_u16::<BigEndian>(self.original_id)?;
        buffer.write_u16::<BigEndian>(self.error)?;
        buffer.write_u16::<BigEndian>(self.other.len() as u16)?;
        buffer.extend_from_slice(&self.other);

        length += 16 + self.mac.len() + self.other.len();
        Ok(length)
    }
}

impl fmt::Display for TSIG {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {}",
            self.algorithm,
            self.time_signed,
            self.fudge,
            BASE64.encode(&self.mac),
            self.original_id,
            self.error
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_to_network;

    #[test]
    fn wire_round_trip() {
        let tsig = TSIG {
            algorithm: DomainName::try_from("hmac-sha256").unwrap(),
            time_signed: 0x0000_6245_3A11,
            fudge: 300,
            mac: vec![0xAB; 32],
            original_id: 0x1234,
            error: 0,
            other: Vec::new(),
        };

        let (bytes, length) = test_to_network!(tsig);
        assert_eq!(length, 13 + 16 + 32);

        let mut cursor = Cursor::new(bytes.as_slice());
        let back = TSIG::from_wire(&mut cursor).unwrap();
        assert_eq!(back.algorithm.to_string(), "hmac-sha256.");
        assert_eq!(back.time_signed, 0x0000_6245_3A11);
        assert_eq!(back.fudge, 300);
        assert_eq!(back.mac.len(), 32);
        assert_eq!(back.original_id, 0x1234);
    }
}
