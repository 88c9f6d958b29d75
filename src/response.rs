//! Parsing and validating received DNS messages.
use std::fmt;
use std::io::Cursor;

use log::trace;

use crate::error::{DNSError, DNSResult};
use crate::network_order::FromNetworkOrder;
use crate::rdata::{RData, OPT};
use crate::rfc1035::{
    DNSPacketHeader, DNSQuestion, DNSResourceRecord, PacketType, QType, ResponseCode,
    HEADER_LENGTH,
};

#[derive(Debug, Default)]
pub struct DNSResponse {
    pub header: DNSPacketHeader,
    pub questions: Vec<DNSQuestion>,
    pub answers: Vec<DNSResourceRecord>,
    pub authorities: Vec<DNSResourceRecord>,
    pub additionals: Vec<DNSResourceRecord>,
}

impl DNSResponse {
    /// Parse a whole message. Every section must hold exactly as many records
    /// as the header counts declare; anything short is a parse error.
    pub fn from_bytes(data: &[u8]) -> DNSResult<Self> {
        if data.len() < HEADER_LENGTH {
            return Err(DNSError::Parse(format!(
                "message of {} bytes is shorter than a header",
                data.len()
            )));
        }

        let mut cursor = Cursor::new(data);
        let mut response = DNSResponse::default();
        response.header.from_network_bytes(&mut cursor)?;

        for _ in 0..response.header.qd_count {
            let mut question = DNSQuestion::default();
            question.from_network_bytes(&mut cursor)?;
            response.questions.push(question);
        }

        response.answers = Self::read_section(&mut cursor, response.header.an_count)?;
        response.authorities = Self::read_section(&mut cursor, response.header.ns_count)?;
        response.additionals = Self::read_section(&mut cursor, response.header.ar_count)?;

        trace!(
            "parsed response id={:#06x} an={} ns={} ar={}",
            response.header.id,
            response.answers.len(),
            response.authorities.len(),
            response.additionals.len()
        );
        Ok(response)
    }

    fn read_section(
        cursor: &mut Cursor<&[u8]>,
        count: u16,
    ) -> DNSResult<Vec<DNSResourceRecord>> {
        let mut records = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let mut record = DNSResourceRecord::default();
            record.from_network_bytes(cursor)?;
            records.push(record);
        }
        Ok(records)
    }

    /// Check this response against the query it answers: matching ID, the QR
    /// bit set, and a NOERROR rcode.
    pub fn validate(&self, expected_id: u16) -> DNSResult<()> {
        if self.header.id != expected_id {
            return Err(DNSError::HeaderInvalid(format!(
                "response id {:#06x} does not match query id {:#06x}",
                self.header.id, expected_id
            )));
        }
        if self.header.flags.packet_type != PacketType::Response {
            return Err(DNSError::HeaderInvalid(
                "QR bit not set in response".to_string(),
            ));
        }
        if self.header.flags.response_code != ResponseCode::NoError {
            return Err(DNSError::Rcode(self.header.flags.response_code));
        }
        Ok(())
    }

    pub fn is_truncated(&self) -> bool {
        self.header.flags.truncated
    }

    /// The EDNS0 pseudo-record, if the server sent one.
    pub fn opt(&self) -> Option<&OPT> {
        self.additionals.iter().find_map(|rr| match &rr.r_data {
            RData::OPT(opt) => Some(opt),
            _ => None,
        })
    }

    /// Smallest TTL across the answer section, the lifetime of the response
    /// as a cache entry.
    pub fn min_answer_ttl(&self) -> Option<u32> {
        self.answers.iter().map(|rr| rr.ttl).min()
    }

    /// Count of SOA records in the answer section; a zone transfer stream is
    /// over once two of them have been seen.
    pub fn soa_count(&self) -> usize {
        self.answers
            .iter()
            .filter(|rr| rr.qtype() == Some(QType::SOA))
            .count()
    }

    /// Drop answers whose owner name does not match the question. Policy
    /// behind the `strict_query_mode` option, applied after parse.
    pub fn retain_matching_answers(&mut self) {
        let question_name = match self.questions.first() {
            Some(q) => q.name.clone(),
            None => return,
        };
        self.answers
            .retain(|rr| rr.name.eq_ignore_case(&question_name));
    }
}

impl fmt::Display for DNSResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "id:{:#06x} rcode:{:?} qd:{} an:{} ns:{} ar:{}",
            self.header.id,
            self.header.flags.response_code,
            self.header.qd_count,
            self.header.an_count,
            self.header.ns_count,
            self.header.ar_count
        )?;
        for question in &self.questions {
            writeln!(f, ";; {}", question)?;
        }
        for record in self
            .answers
            .iter()
            .chain(&self.authorities)
            .chain(&self.additionals)
        {
            writeln!(f, "{}", record)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::DNSQuery;
    use crate::rfc1035::{QClass, QType};
    use crate::util::get_sample_slice;

    // a captured google.com CNAME/SOA response (wireshark)
    const SOA_SAMPLE: &str = r#"
0000   41 2a 81 80 00 01 00 00 00 01 00 01 06 67 6f 6f
0010   67 6c 65 03 63 6f 6d 00 00 05 00 01 c0 0c 00 06
0020   00 01 00 00 00 3c 00 26 03 6e 73 31 c0 0c 09 64
0030   6e 73 2d 61 64 6d 69 6e c0 0c 19 1b c0 0c 00 00
0040   03 84 00 00 03 84 00 00 07 08 00 00 00 3c 00 00
0050   29 02 00 00 00 00 00 00 00
    "#;

    #[test]
    fn parse_captured_response() {
        let bytes = get_sample_slice(SOA_SAMPLE);
        let response = DNSResponse::from_bytes(&bytes).unwrap();

        assert_eq!(response.header.id, 0x412a);
        assert_eq!(response.header.flags.packet_type, PacketType::Response);
        assert_eq!(response.questions.len(), 1);
        assert_eq!(response.questions[0].r#type, QType::CNAME);
        assert_eq!(response.authorities.len(), 1);

        match &response.authorities[0].r_data {
            RData::SOA(soa) => {
                assert_eq!(soa.mname.to_string(), "ns1.google.com.");
                assert_eq!(soa.rname.to_string(), "dns-admin.google.com.");
                assert_eq!(soa.serial, 0x191bc00c);
                assert_eq!(soa.minimum, 60);
            }
            other => panic!("expected SOA rdata, got {:?}", other),
        }

        // the trailing OPT pseudo-record advertises a 512-byte payload
        let opt = response.opt().expect("OPT record expected");
        assert_eq!(opt.udp_payload_size, 512);
        assert!(!opt.dnssec_ok);
    }

    #[test]
    fn count_mismatch_is_a_parse_error() {
        let mut bytes = get_sample_slice(SOA_SAMPLE);
        // claim one more additional record than the message holds
        bytes[11] = 2;
        assert!(matches!(
            DNSResponse::from_bytes(&bytes),
            Err(DNSError::Parse(_) | DNSError::Io(_))
        ));
    }

    #[test]
    fn validation() {
        let bytes = get_sample_slice(SOA_SAMPLE);
        let response = DNSResponse::from_bytes(&bytes).unwrap();

        assert!(response.validate(0x412a).is_ok());
        assert!(matches!(
            response.validate(0xBEEF),
            Err(DNSError::HeaderInvalid(_))
        ));
    }

    #[test]
    fn rcode_validation() {
        let mut bytes = get_sample_slice(SOA_SAMPLE);
        bytes[3] |= 0x03; // NXDOMAIN
        let response = DNSResponse::from_bytes(&bytes).unwrap();
        assert!(matches!(
            response.validate(0x412a),
            Err(DNSError::Rcode(ResponseCode::NXDomain))
        ));
    }

    #[test]
    fn strict_answer_filter() {
        let mut query = DNSQuery::new("example.com", QType::A).unwrap();
        query.push_answer(
            DNSResourceRecord::new(
                "example.com.",
                QType::A,
                QClass::IN,
                60,
                RData::A("192.0.2.1".parse().unwrap()),
            )
            .unwrap(),
        );
        query.push_answer(
            DNSResourceRecord::new(
                "poison.invalid.",
                QType::A,
                QClass::IN,
                60,
                RData::A("192.0.2.66".parse().unwrap()),
            )
            .unwrap(),
        );
        query.header.flags.packet_type = PacketType::Response;
        let wire = query.serialize().unwrap();

        let mut response = DNSResponse::from_bytes(&wire).unwrap();
        assert_eq!(response.answers.len(), 2);
        response.retain_matching_answers();
        assert_eq!(response.answers.len(), 1);
        assert_eq!(response.answers[0].name.to_string(), "example.com.");
    }

    #[test]
    fn round_trip_mx_answers() {
        let mut query = DNSQuery::new("google.com", QType::MX).unwrap();
        query.header.flags.packet_type = PacketType::Response;
        for (pref, host) in [(10u16, "smtp1.google.com."), (20, "smtp2.google.com.")] {
            let tokens = [pref.to_string(), host.to_string()];
            let toks: Vec<&str> = tokens.iter().map(|s| s.as_str()).collect();
            query.push_answer(
                DNSResourceRecord::new(
                    "google.com.",
                    QType::MX,
                    QClass::IN,
                    600,
                    RData::from_text(QType::MX, &toks).unwrap(),
                )
                .unwrap(),
            );
        }
        let wire = query.serialize().unwrap();

        let response = DNSResponse::from_bytes(&wire).unwrap();
        assert_eq!(response.answers.len(), 2);
        match &response.answers[1].r_data {
            RData::MX(mx) => {
                assert_eq!(mx.preference, 20);
                assert_eq!(mx.exchange.to_string(), "smtp2.google.com.");
            }
            other => panic!("expected MX rdata, got {:?}", other),
        }
        assert_eq!(response.min_answer_ttl(), Some(600));
    }
}
