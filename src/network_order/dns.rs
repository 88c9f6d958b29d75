//! Wire conversions for the DNS-specific structures: domain names with label
//! compression, character strings, header flags.
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::collections::HashSet;
use std::io::Cursor;

use crate::derive_enum;
use crate::error::{DNSError, DNSResult};
use crate::network_order::primitive::read_bytes;
use crate::network_order::{FromNetworkOrder, PacketBuffer, ToNetworkOrder};
use crate::rfc1035::{
    CharacterString, DNSPacketFlags, DomainName, OpCode, PacketType, QClass, QType, ResponseCode,
    MAX_LABEL_LENGTH, MAX_NAME_LENGTH,
};

// Impl QType & QClass enums
derive_enum!(QType, u16);
derive_enum!(QClass, u16);

impl ToNetworkOrder for CharacterString {
    /// ```
    /// use netdns::network_order::{PacketBuffer, ToNetworkOrder};
    /// use netdns::rfc1035::CharacterString;
    ///
    /// let mut buffer = PacketBuffer::new();
    /// let cs = CharacterString::from("www");
    /// assert_eq!(cs.to_network_bytes(&mut buffer).unwrap(), 4);
    /// assert_eq!(buffer.as_slice(), &[0x03, 0x77, 0x77, 0x77]);
    /// ```
    fn to_network_bytes(&self, buffer: &mut PacketBuffer) -> DNSResult<usize> {
        if self.len() > 255 {
            return Err(DNSError::Parse(format!(
                "character string longer than 255 bytes: <{}>",
                self.0
            )));
        }

        buffer.write_u8(self.len() as u8)?;
        buffer.extend_from_slice(self.0.as_bytes());
        Ok(self.len() + 1)
    }
}

impl<'a> FromNetworkOrder<'a> for CharacterString {
    /// ```
    /// use std::io::Cursor;
    /// use netdns::network_order::FromNetworkOrder;
    /// use netdns::rfc1035::CharacterString;
    ///
    /// let b = [0x06_u8, 0x67, 0x6f, 0x6f, 0x67, 0x6c, 0x65];
    /// let mut buffer = Cursor::new(b.as_slice());
    /// let mut cs = CharacterString::default();
    /// assert!(cs.from_network_bytes(&mut buffer).is_ok());
    /// assert_eq!(cs.to_string(), "google");
    /// ```
    fn from_network_bytes(&mut self, buffer: &mut Cursor<&'a [u8]>) -> DNSResult<()> {
        let size = buffer.read_u8()? as usize;
        let bytes = read_bytes(buffer, size)?;

        // rdata strings are arbitrary octets; keep what we can show
        self.0 = String::from_utf8_lossy(&bytes).into_owned();
        Ok(())
    }
}

impl ToNetworkOrder for DomainName {
    /// Emit the name label by label. Before each label, the remaining suffix is
    /// looked up in the buffer dictionary; on a hit a 2-byte pointer replaces
    /// the rest of the name. Otherwise the current offset is recorded against
    /// the suffix so later names can point here.
    fn to_network_bytes(&self, buffer: &mut PacketBuffer) -> DNSResult<usize> {
        if self.encoded_len() > MAX_NAME_LENGTH {
            return Err(DNSError::Parse(format!(
                "domain name <{}> longer than {} bytes",
                self, MAX_NAME_LENGTH
            )));
        }

        let start = buffer.offset();

        for i in 0..self.0.len() {
            let suffix = self.0[i..].join(".").to_lowercase();

            if let Some(offset) = buffer.lookup_suffix(&suffix) {
                // the dictionary only ever holds earlier offsets, so this
                // pointer is guaranteed to point backward
                buffer.write_u16::<BigEndian>(0xC000 | offset)?;
                return Ok(buffer.offset() - start);
            }

            buffer.record_suffix(suffix);

            let label = &self.0[i];
            if label.len() > MAX_LABEL_LENGTH {
                return Err(DNSError::Parse(format!(
                    "label <{}> longer than {} bytes",
                    label, MAX_LABEL_LENGTH
                )));
            }
            buffer.write_u8(label.len() as u8)?;
            buffer.extend_from_slice(label.as_bytes());
        }

        // add sentinel 0x00
        buffer.write_u8(0)?;

        Ok(buffer.offset() - start)
    }
}

impl<'a> FromNetworkOrder<'a> for DomainName {
    /// Walk labels from the cursor position. A length octet with top bits 11
    /// together with the following octet forms a 14-bit offset to continue
    /// from; once a pointer is followed the cursor is frozen just past the
    /// pointer, since pointers never extend the consumed range.
    fn from_network_bytes(&mut self, buffer: &mut Cursor<&'a [u8]>) -> DNSResult<()> {
        let data = *buffer.get_ref();
        let mut pos = buffer.position() as usize;
        let mut jumped = false;

        // offsets already jumped to, for compression loop detection
        let mut visited: HashSet<usize> = HashSet::new();

        // running size of the equivalent uncompressed encoding (labels plus
        // their length octets plus the final zero octet)
        let mut encoded = 1usize;

        self.0.clear();

        loop {
            let length = *data
                .get(pos)
                .ok_or_else(|| DNSError::Parse("name runs past end of buffer".to_string()))?;

            match length & 0b1100_0000 {
                // regular label
                0b0000_0000 => {
                    if length == 0 {
                        if !jumped {
                            buffer.set_position((pos + 1) as u64);
                        }
                        break;
                    }

                    let size = length as usize;
                    encoded += size + 1;
                    if encoded > MAX_NAME_LENGTH {
                        return Err(DNSError::Parse(format!(
                            "domain name longer than {} bytes at offset {}",
                            MAX_NAME_LENGTH, pos
                        )));
                    }

                    let label = data.get(pos + 1..pos + 1 + size).ok_or_else(|| {
                        DNSError::Parse(format!("label runs past end of buffer at offset {}", pos))
                    })?;
                    self.0.push(std::str::from_utf8(label)?.to_string());

                    pos += size + 1;
                }

                // compression pointer
                0b1100_0000 => {
                    let low = *data.get(pos + 1).ok_or_else(|| {
                        DNSError::Parse(format!("truncated pointer at offset {}", pos))
                    })?;
                    let target = (((length & 0b0011_1111) as usize) << 8) | low as usize;

                    // pointers always reference an earlier offset
                    if target >= pos {
                        return Err(DNSError::Parse(format!(
                            "forward compression pointer {} at offset {}",
                            target, pos
                        )));
                    }
                    if !visited.insert(target) {
                        return Err(DNSError::Parse(format!(
                            "compression loop through offset {}",
                            target
                        )));
                    }

                    if !jumped {
                        // freeze the advancing offset right after the pointer
                        buffer.set_position((pos + 2) as u64);
                        jumped = true;
                    }

                    pos = target;
                }

                // the 10 and 01 combinations are reserved
                _ => {
                    return Err(DNSError::Parse(format!(
                        "unsupported label type {:#04x} at offset {}",
                        length, pos
                    )));
                }
            }
        }

        Ok(())
    }
}

impl ToNetworkOrder for DNSPacketFlags {
    fn to_network_bytes(&self, buffer: &mut PacketBuffer) -> DNSResult<usize> {
        // combine all flags according to structure
        //                               1  1  1  1  1  1
        // 0  1  2  3  4  5  6  7  8  9  0  1  2  3  4  5
        // +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
        // |QR|   Opcode  |AA|TC|RD|RA| Z|AD|CD|   RCODE   |
        // +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
        let mut flags = (self.packet_type as u16) << 15;
        flags |= (self.op_code as u16) << 11;
        flags |= (self.authoritative_answer as u16) << 10;
        flags |= (self.truncated as u16) << 9;
        flags |= (self.recursion_desired as u16) << 8;
        flags |= (self.recursion_available as u16) << 7;
        flags |= ((self.z & 0b1) as u16) << 6;
        flags |= (self.authentic_data as u16) << 5;
        flags |= (self.checking_disabled as u16) << 4;
        flags |= self.response_code as u16;

        buffer.write_u16::<BigEndian>(flags)?;
        Ok(2)
    }
}

impl<'a> FromNetworkOrder<'a> for DNSPacketFlags {
    fn from_network_bytes(&mut self, buffer: &mut Cursor<&'a [u8]>) -> DNSResult<()> {
        let flags = buffer.read_u16::<BigEndian>()?;

        self.packet_type = PacketType::try_from(flags >> 15).map_err(DNSError::Parse)?;
        self.op_code = OpCode::try_from((flags >> 11) & 0b1111).map_err(DNSError::HeaderInvalid)?;
        self.authoritative_answer = (flags >> 10) & 1 == 1;
        self.truncated = (flags >> 9) & 1 == 1;
        self.recursion_desired = (flags >> 8) & 1 == 1;
        self.recursion_available = (flags >> 7) & 1 == 1;
        self.z = ((flags >> 6) & 0b1) as u8;
        self.authentic_data = (flags >> 5) & 1 == 1;
        self.checking_disabled = (flags >> 4) & 1 == 1;
        self.response_code = ResponseCode::try_from(flags & 0b1111).map_err(DNSError::Parse)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rfc1035::{DNSPacketHeader, DNSQuestion};
    use crate::util::get_sample_slice;
    use crate::{test_from_network, test_to_network};

    // sample is taken from real data using wireshark to be able to test
    // domain name compression
    const SAMPLE: &[u8] = &[
        0x41, 0x2a, 0x81, 0x80, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x06, 0x67, 0x6f,
        0x6f, 0x67, 0x6c, 0x65, 0x03, 0x63, 0x6f, 0x6d, 0x00, 0x00, 0x05, 0x00, 0x01, 0xc0, 0x0c,
        0x00, 0x06, 0x00, 0x01, 0x00, 0x00, 0x00, 0x3c, 0x00, 0x26, 0x03, 0x6e, 0x73, 0x31, 0xc0,
        0x0c, 0x09, 0x64, 0x6e, 0x73, 0x2d, 0x61, 0x64, 0x6d, 0x69, 0x6e, 0xc0, 0x0c, 0x19, 0x1b,
        0xc0, 0x0c, 0x00, 0x00, 0x03, 0x84, 0x00, 0x00, 0x03, 0x84, 0x00, 0x00, 0x07, 0x08, 0x00,
        0x00, 0x00, 0x3c, 0x00, 0x00, 0x29, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    ];

    fn name_at(pos: u64) -> (DomainName, u64) {
        let mut buffer = Cursor::new(SAMPLE);
        buffer.set_position(pos);

        let mut dn = DomainName::default();
        dn.from_network_bytes(&mut buffer).unwrap();
        (dn, buffer.position())
    }

    #[test]
    fn domain_name() {
        // plain name right after the header
        let (dn, end) = name_at(12);
        assert_eq!(dn.0, &["google", "com"]);
        assert_eq!(dn.to_string(), "google.com.");
        assert_eq!(end, 24);

        // a lone pointer back to the question name
        let (dn, end) = name_at(28);
        assert_eq!(dn.to_string(), "google.com.");
        assert_eq!(end, 30);

        // a label followed by a pointer
        let (dn, end) = name_at(40);
        assert_eq!(dn.to_string(), "ns1.google.com.");
        assert_eq!(end, 46);

        let (dn, end) = name_at(46);
        assert_eq!(dn.to_string(), "dns-admin.google.com.");
        assert_eq!(end, 58);
    }

    #[test]
    fn compressed_encoding() {
        let mut buffer = PacketBuffer::new();
        // stand-in for the header so offsets look like a real message
        buffer.extend_from_slice(&[0u8; 12]);

        let first = DomainName::try_from("mail.example.com").unwrap();
        let len = first.to_network_bytes(&mut buffer).unwrap();
        assert_eq!(len, 18);

        // whole-name hit: a single pointer to offset 17 ("example.com")
        let second = DomainName::try_from("example.com").unwrap();
        let len = second.to_network_bytes(&mut buffer).unwrap();
        assert_eq!(len, 2);
        assert_eq!(&buffer.as_slice()[30..32], &[0xC0, 17]);

        // partial hit: one label then a pointer
        let third = DomainName::try_from("www.example.com").unwrap();
        let len = third.to_network_bytes(&mut buffer).unwrap();
        assert_eq!(len, 6);
        assert_eq!(&buffer.as_slice()[32..38], &[3, b'w', b'w', b'w', 0xC0, 17]);

        // decoding everything back yields the original names
        let bytes = buffer.into_bytes();
        let mut cursor = Cursor::new(bytes.as_slice());
        cursor.set_position(12);
        for expected in ["mail.example.com.", "example.com.", "www.example.com."] {
            let mut dn = DomainName::default();
            dn.from_network_bytes(&mut cursor).unwrap();
            assert_eq!(dn.to_string(), expected);
        }
    }

    #[test]
    fn uncompressed_when_disabled() {
        let mut buffer = PacketBuffer::new();
        let dn = DomainName::try_from("example.com").unwrap();
        dn.to_network_bytes(&mut buffer).unwrap();

        buffer.set_compression(false);
        let len = dn.to_network_bytes(&mut buffer).unwrap();
        // written in full again, no pointer
        assert_eq!(len, 13);
    }

    #[test]
    fn compression_loop_detected() {
        // 'a' label, then a pointer to offset 0, which loops through itself
        let bytes = [0x01, b'a', 0xC0, 0x00];
        let mut cursor = Cursor::new(bytes.as_slice());
        cursor.set_position(2);

        let mut dn = DomainName::default();
        let err = dn.from_network_bytes(&mut cursor).unwrap_err();
        assert!(matches!(err, DNSError::Parse(_)));
    }

    #[test]
    fn forward_pointer_rejected() {
        let bytes = [0xC0, 0x02, 0x01, b'a', 0x00];
        let mut cursor = Cursor::new(bytes.as_slice());

        let mut dn = DomainName::default();
        let err = dn.from_network_bytes(&mut cursor).unwrap_err();
        assert!(matches!(err, DNSError::Parse(_)));
    }

    #[test]
    fn reserved_label_type_rejected() {
        // top bits 01
        let bytes = [0x40, 0x00];
        let mut cursor = Cursor::new(bytes.as_slice());

        let mut dn = DomainName::default();
        assert!(dn.from_network_bytes(&mut cursor).is_err());
    }

    #[test]
    fn truncated_name_rejected() {
        let bytes = [0x03, b'w', b'w'];
        let mut cursor = Cursor::new(bytes.as_slice());

        let mut dn = DomainName::default();
        assert!(dn.from_network_bytes(&mut cursor).is_err());
    }

    #[test]
    fn dns_packet_header() {
        const PACKET: &str = r#"
0000   76 86 81 a0 00 01 00 08 00 00 00 01
        "#;

        // from
        let header = test_from_network!(PACKET, DNSPacketHeader);
        assert_eq!(header.id, 0x7686);
        assert_eq!(header.flags.packet_type, PacketType::Response);
        assert_eq!(header.flags.op_code, OpCode::Query);
        assert!(!header.flags.authoritative_answer);
        assert!(!header.flags.truncated);
        assert!(header.flags.recursion_desired);
        assert!(header.flags.recursion_available);
        assert_eq!(header.flags.z, 0);
        assert!(header.flags.authentic_data);
        assert!(!header.flags.checking_disabled);
        assert_eq!(header.flags.response_code, ResponseCode::NoError);
        assert_eq!(header.qd_count, 1);
        assert_eq!(header.an_count, 8);
        assert_eq!(header.ns_count, 0);
        assert_eq!(header.ar_count, 1);

        // to
        let values = test_to_network!(header);
        assert_eq!(values.0, get_sample_slice(PACKET));
        assert_eq!(values.1, 12);
    }

    #[test]
    fn question_round_trip() {
        let question = DNSQuestion::new("www.google.ie", QType::A, None).unwrap();

        let (bytes, length) = test_to_network!(question);
        assert_eq!(length, 19);
        assert_eq!(
            bytes,
            &[
                0x03, 0x77, 0x77, 0x77, 0x06, 0x67, 0x6f, 0x6f, 0x67, 0x6c, 0x65, 0x02, 0x69,
                0x65, 0x00, 0x00, 0x01, 0x00, 0x01
            ]
        );

        let mut cursor = Cursor::new(bytes.as_slice());
        let mut back = DNSQuestion::default();
        back.from_network_bytes(&mut cursor).unwrap();
        assert_eq!(back.name.to_string(), "www.google.ie.");
        assert_eq!(back.r#type, QType::A);
        assert_eq!(back.class, QClass::IN);
    }
}
