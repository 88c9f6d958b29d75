//! OPT pseudo-record for EDNS(0): https://datatracker.ietf.org/doc/html/rfc6891
//!
//! OPT re-purposes the resource record fixed fields: CLASS carries the
//! requestor's UDP payload size and TTL packs extended RCODE, version and the
//! DO flag. The record writer takes both from this structure instead of the
//! regular class/ttl fields.
//!
//!             +0 (MSB)                            +1 (LSB)
//!    +---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+
//! 0: |         EXTENDED-RCODE        |            VERSION            |
//!    +---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+
//! 2: | DO|                           Z                               |
//!    +---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+
use byteorder::{ReadBytesExt, WriteBytesExt};
use std::fmt;
use std::io::Cursor;

use crate::error::DNSResult;
use crate::network_order::primitive::read_bytes;
use crate::network_order::{PacketBuffer, ToNetworkOrder};
use crate::rfc1035::DNSSEC_PAYLOAD_SIZE;
use crate::util;

#[derive(Debug, Clone)]
pub struct OPT {
    /// requestor's UDP payload size, carried in the record CLASS field
    pub udp_payload_size: u16,
    /// upper 8 bits of the extended 12-bit RCODE
    pub ext_rcode: u8,
    pub version: u8,
    /// DNSSEC OK: the requestor can cope with DNSSEC records in the response
    pub dnssec_ok: bool,
    pub z: u16,
    /// {attribute, value} pairs carried in the rdata
    pub options: Vec<EdnsOption>,
}

#[derive(Debug, Default, Clone)]
pub struct EdnsOption {
    pub code: u16,
    pub data: Vec<u8>,
}

impl Default for OPT {
    fn default() -> Self {
        Self {
            udp_payload_size: DNSSEC_PAYLOAD_SIZE,
            ext_rcode: 0,
            version: 0,
            dnssec_ok: false,
            z: 0,
            options: Vec::new(),
        }
    }
}

impl OPT {
    pub fn new(udp_payload_size: u16, dnssec_ok: bool) -> Self {
        OPT {
            udp_payload_size,
            dnssec_ok,
            ..OPT::default()
        }
    }

    /// The synthesized TTL field.
    pub fn pack_ttl(&self) -> u32 {
        let mut ttl = (self.ext_rcode as u32) << 24;
        ttl |= (self.version as u32) << 16;
        if self.dnssec_ok {
            ttl |= 0x8000;
        }
        ttl |= (self.z & 0x7FFF) as u32;
        ttl
    }

    /// Rebuild the pseudo-record from the raw class/ttl fields of a received
    /// record plus its rdata (the option list).
    pub fn from_class_ttl(
        class: u16,
        ttl: u32,
        buffer: &mut Cursor<&[u8]>,
        end: u64,
    ) -> DNSResult<Self> {
        let mut opt = OPT {
            udp_payload_size: class,
            ext_rcode: (ttl >> 24) as u8,
            version: ((ttl >> 16) & 0xFF) as u8,
            dnssec_ok: ttl & 0x8000 != 0,
            z: (ttl & 0x7FFF) as u16,
            options: Vec::new(),
        };

        while buffer.position() < end {
            let code = buffer.read_u16::<byteorder::BigEndian>()?;
            let length = buffer.read_u16::<byteorder::BigEndian>()? as usize;
            let data = read_bytes(buffer, length)?;
            opt.options.push(EdnsOption { code, data });
        }

        Ok(opt)
    }
}

// only the option list lives in the rdata proper
impl ToNetworkOrder for OPT {
    fn to_network_bytes(&self, buffer: &mut PacketBuffer) -> DNSResult<usize> {
        let mut length = 0usize;
        for option in &self.options {
            buffer.write_u16::<byteorder::BigEndian>(option.code)?;
            buffer.write_u16::<byteorder::BigEndian>(option.data.len() as u16)?;
            buffer.extend_from_slice(&option.data);
            length += 4 + option.data.len();
        }
        Ok(length)
    }
}

impl fmt::Display for OPT {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "payload:{} ext-rcode:{} version:{} do:{}",
            self.udp_payload_size, self.ext_rcode, self.version, self.dnssec_ok as u8
        )?;
        for option in &self.options {
            write!(f, " opt{}:{}", option.code, util::to_hex(&option.data))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ttl_packing() {
        let mut opt = OPT::new(4000, true);
        assert_eq!(opt.pack_ttl(), 0x0000_8000);

        opt.ext_rcode = 1;
        opt.version = 0;
        assert_eq!(opt.pack_ttl(), 0x0100_8000);

        opt.dnssec_ok = false;
        assert_eq!(opt.pack_ttl(), 0x0100_0000);
    }

    #[test]
    fn class_ttl_round_trip() {
        let mut opt = OPT::new(1232, true);
        opt.options.push(EdnsOption {
            code: 10,
            data: vec![1, 2, 3, 4, 5, 6, 7, 8],
        });

        let mut buffer = PacketBuffer::new();
        opt.to_network_bytes(&mut buffer).unwrap();
        let rdata = buffer.into_bytes();

        let mut cursor = Cursor::new(rdata.as_slice());
        let back =
            OPT::from_class_ttl(1232, opt.pack_ttl(), &mut cursor, rdata.len() as u64).unwrap();
        assert_eq!(back.udp_payload_size, 1232);
        assert!(back.dnssec_ok);
        assert_eq!(back.options.len(), 1);
        assert_eq!(back.options[0].code, 10);
    }
}
