//! Building and serializing DNS requests: questions, extra sections, EDNS0
//! injection and the transaction signature hooks.
use rand::Rng;

use log::trace;

use crate::error::{DNSError, DNSResult};
use crate::network_order::{PacketBuffer, ToNetworkOrder};
use crate::rdata::{RData, OPT};
use crate::rfc1035::{
    DNSPacketHeader, DNSQuestion, DNSResourceRecord, DomainName, OpCode, PacketType, QType,
};
use crate::sig0::{self, KeySigner};
use crate::tsig::TsigKey;
use crate::util;

#[derive(Debug, Default)]
pub struct DNSQuery {
    pub header: DNSPacketHeader,
    pub questions: Vec<DNSQuestion>,
    pub answers: Vec<DNSResourceRecord>,
    pub authorities: Vec<DNSResourceRecord>,
    pub additionals: Vec<DNSResourceRecord>,

    tsig: Option<TsigKey>,
    sig0: Option<Box<dyn KeySigner>>,
}

impl DNSQuery {
    /// A standard recursive query with a random transaction ID, like the
    /// stub resolvers everyone talks to first.
    pub fn new(domain: &str, qtype: QType) -> DNSResult<Self> {
        let mut query = DNSQuery::default();

        let mut rng = rand::thread_rng();
        query.header.id = rng.gen::<u16>();
        query.header.flags.packet_type = PacketType::Query;
        query.header.flags.op_code = OpCode::Query;
        query.header.flags.recursion_desired = true;

        query.push_question(DNSQuestion::new(domain, qtype, None)?);
        Ok(query)
    }

    // Add another question into the list of questions to send
    pub fn push_question(&mut self, question: DNSQuestion) {
        self.questions.push(question);

        // as we add a question, we need to increment the counter
        self.header.qd_count += 1;
    }

    pub fn push_answer(&mut self, record: DNSResourceRecord) {
        self.answers.push(record);
        self.header.an_count += 1;
    }

    pub fn push_authority(&mut self, record: DNSResourceRecord) {
        self.authorities.push(record);
        self.header.ns_count += 1;
    }

    pub fn push_additional(&mut self, record: DNSResourceRecord) {
        self.additionals.push(record);
        self.header.ar_count += 1;
    }

    /// Prepend an OPT pseudo-record advertising `payload_size` with the DO
    /// flag set (RFC 6891, RFC 3225). The AD/CD header bits are the caller's
    /// business.
    pub fn set_dnssec(&mut self, payload_size: u16) {
        let opt = OPT::new(payload_size, true);
        let record = DNSResourceRecord {
            name: DomainName::root(),
            type_code: QType::OPT as u16,
            class: opt.udp_payload_size,
            ttl: opt.pack_ttl(),
            rd_length: 0,
            r_data: RData::OPT(opt),
        };
        self.additionals.insert(0, record);
        self.header.ar_count += 1;
    }

    /// Attach a TSIG key; the signature is computed and appended at
    /// serialization time.
    pub fn set_tsig(&mut self, key: TsigKey) {
        self.tsig = Some(key);
        self.sig0 = None;
    }

    /// Attach a SIG(0) signer instead.
    pub fn set_sig0(&mut self, signer: Box<dyn KeySigner>) -> DNSResult<()> {
        sig0::check_algorithm(signer.algorithm())?;
        self.sig0 = Some(signer);
        self.tsig = None;
        Ok(())
    }

    pub fn first_question(&self) -> Option<&DNSQuestion> {
        self.questions.first()
    }

    /// Serialize the whole message. Sections are emitted in order, then any
    /// attached signer computes its signature over the assembled bytes and
    /// appends the signing record.
    pub fn serialize(&mut self) -> DNSResult<Vec<u8>> {
        if self.questions.is_empty()
            && self.answers.is_empty()
            && self.authorities.is_empty()
            && self.additionals.is_empty()
        {
            return Err(DNSError::PacketInvalid(
                "nothing to send: all sections are empty".to_string(),
            ));
        }

        self.header.qd_count = self.questions.len() as u16;
        self.header.an_count = self.answers.len() as u16;
        self.header.ns_count = self.authorities.len() as u16;
        self.header.ar_count = self.additionals.len() as u16;

        let mut buffer = PacketBuffer::new();
        self.header.to_network_bytes(&mut buffer)?;

        for question in &self.questions {
            question.to_network_bytes(&mut buffer)?;
        }
        for record in self
            .answers
            .iter()
            .chain(&self.authorities)
            .chain(&self.additionals)
        {
            record.to_network_bytes(&mut buffer)?;
        }

        if let Some(key) = &self.tsig {
            key.append_signature(&mut buffer, self.header.id)?;
        } else if let Some(signer) = &self.sig0 {
            sig0::append_signature(&mut buffer, signer.as_ref())?;
        }

        trace!("serialized query: {}", util::to_hex(&buffer));
        Ok(buffer.into_bytes())
    }
}

/// Bump the ARCOUNT of an already-serialized message, after a signing record
/// was appended past the section counts.
pub(crate) fn increment_arcount(buffer: &mut PacketBuffer) {
    let ar_count = u16::from_be_bytes([buffer[10], buffer[11]]).wrapping_add(1);
    buffer[10..12].copy_from_slice(&ar_count.to_be_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::DNSResponse;
    use crate::rfc1035::HEADER_LENGTH;
    use crate::tsig::TsigAlgorithm;

    #[test]
    fn empty_query_is_rejected() {
        let mut query = DNSQuery::default();
        assert!(matches!(
            query.serialize(),
            Err(DNSError::PacketInvalid(_))
        ));
    }

    #[test]
    fn question_layout() {
        let mut query = DNSQuery::new("www.google.ie", QType::A).unwrap();
        query.header.id = 0x1234;
        let wire = query.serialize().unwrap();

        assert_eq!(wire.len(), HEADER_LENGTH + 19);
        assert_eq!(&wire[0..2], &[0x12, 0x34]);
        // RD set, QR clear
        assert_eq!(wire[2], 0x01);
        // QDCOUNT = 1
        assert_eq!(&wire[4..6], &[0x00, 0x01]);
    }

    #[test]
    fn shared_suffix_compresses_across_questions() {
        let mut query = DNSQuery::new("mail.example.com", QType::A).unwrap();
        query.push_question(DNSQuestion::new("www.example.com", QType::A, None).unwrap());
        let wire = query.serialize().unwrap();

        // first QNAME in full at 12; second is www + pointer to offset 17
        let second = HEADER_LENGTH + 18 + 4;
        assert_eq!(&wire[second..second + 6], &[3, b'w', b'w', b'w', 0xC0, 17]);

        // both decode back to full names
        let response = DNSResponse::from_bytes(&wire).unwrap();
        assert_eq!(response.questions[0].name.to_string(), "mail.example.com.");
        assert_eq!(response.questions[1].name.to_string(), "www.example.com.");
    }

    #[test]
    fn dnssec_opt_injection() {
        let mut query = DNSQuery::new("org", QType::SOA).unwrap();
        query.set_dnssec(4000);
        query.header.flags.authentic_data = true;
        let wire = query.serialize().unwrap();

        let response = DNSResponse::from_bytes(&wire).unwrap();
        assert_eq!(response.header.ar_count, 1);
        let opt = response.opt().expect("OPT record expected");
        assert_eq!(opt.udp_payload_size, 4000);
        assert!(opt.dnssec_ok);
        assert!(response.header.flags.authentic_data);
    }

    #[test]
    fn tsig_signature_is_appended_last() {
        let key = TsigKey::new(
            "local-ddns.",
            TsigAlgorithm::HmacSha256,
            "c2VjcmV0c2VjcmV0c2VjcmV0",
        )
        .unwrap();

        let mut query = DNSQuery::new("host.dyn.example.com", QType::A).unwrap();
        query.set_tsig(key.clone());
        let wire = query.serialize().unwrap();

        // ARCOUNT was bumped after serialization
        assert_eq!(&wire[10..12], &[0x00, 0x01]);

        let response = DNSResponse::from_bytes(&wire).unwrap();
        let last = response.additionals.last().unwrap();
        assert_eq!(last.qtype(), Some(QType::TSIG));
        match &last.r_data {
            RData::TSIG(tsig) => {
                assert_eq!(tsig.mac.len(), TsigAlgorithm::HmacSha256.mac_size());
                assert_eq!(tsig.original_id, response.header.id);

                // the MAC verifies over the unsigned part of the message
                let unsigned_len = wire.len() - 16 - last.name.encoded_len() - tsig.mac.len()
                    - tsig.algorithm.encoded_len()
                    - 10;
                let mut unsigned = wire[..unsigned_len].to_vec();
                // restore the pre-signing ARCOUNT
                unsigned[11] = 0;
                assert!(key.verify(&unsigned, tsig).unwrap());
            }
            other => panic!("expected TSIG rdata, got {:?}", other),
        }
    }
}
