//! Dynamic update requests (RFC 2136). The wire layout is the ordinary
//! four-section message with the sections re-labeled: zone rides in the
//! question slot, prerequisites in answer, update operations in authority.
use rand::Rng;

use crate::error::DNSResult;
use crate::query::DNSQuery;
use crate::rdata::RData;
use crate::rfc1035::{
    DNSQuestion, DNSResourceRecord, DomainName, OpCode, PacketType, QClass, QType,
};
use crate::sig0::KeySigner;
use crate::tsig::TsigKey;

#[derive(Debug, Default)]
pub struct DNSUpdate {
    query: DNSQuery,
}

impl DNSUpdate {
    /// An update request scoped to `zone`.
    pub fn new(zone: &str) -> DNSResult<Self> {
        let mut query = DNSQuery::default();

        let mut rng = rand::thread_rng();
        query.header.id = rng.gen::<u16>();
        query.header.flags.packet_type = PacketType::Query;
        query.header.flags.op_code = OpCode::Update;

        query.push_question(DNSQuestion::new(zone, QType::SOA, None)?);
        Ok(DNSUpdate { query })
    }

    /// Add a record to the zone.
    pub fn add(&mut self, record: DNSResourceRecord) {
        self.query.push_authority(record);
    }

    /// Delete one specific record: class NONE, TTL 0 (RFC 2136 §2.5.4).
    pub fn delete(&mut self, mut record: DNSResourceRecord) {
        record.class = QClass::NONE as u16;
        record.ttl = 0;
        self.query.push_authority(record);
    }

    /// Delete a whole RRset at a name: class ANY, empty rdata (§2.5.2).
    pub fn delete_rrset(&mut self, name: &str, qtype: QType) -> DNSResult<()> {
        self.query.push_authority(empty_record(name, qtype, QClass::ANY)?);
        Ok(())
    }

    /// Delete every record at a name: class ANY, type ANY (§2.5.3).
    pub fn delete_all(&mut self, name: &str) -> DNSResult<()> {
        self.query
            .push_authority(empty_record(name, QType::ANY, QClass::ANY)?);
        Ok(())
    }

    /// Prerequisite: the RRset exists, value-independent (§2.4.1).
    pub fn prereq_rrset_exists(&mut self, name: &str, qtype: QType) -> DNSResult<()> {
        self.query.push_answer(empty_record(name, qtype, QClass::ANY)?);
        Ok(())
    }

    /// Prerequisite: the RRset exists with exactly this value (§2.4.2).
    pub fn prereq_rrset_is(&mut self, mut record: DNSResourceRecord) {
        record.ttl = 0;
        self.query.push_answer(record);
    }

    /// Prerequisite: the RRset does not exist (§2.4.3).
    pub fn prereq_rrset_absent(&mut self, name: &str, qtype: QType) -> DNSResult<()> {
        self.query.push_answer(empty_record(name, qtype, QClass::NONE)?);
        Ok(())
    }

    /// Prerequisite: the name owns at least one record (§2.4.4).
    pub fn prereq_name_in_use(&mut self, name: &str) -> DNSResult<()> {
        self.query
            .push_answer(empty_record(name, QType::ANY, QClass::ANY)?);
        Ok(())
    }

    /// Prerequisite: the name owns no records at all (§2.4.5).
    pub fn prereq_name_not_in_use(&mut self, name: &str) -> DNSResult<()> {
        self.query
            .push_answer(empty_record(name, QType::ANY, QClass::NONE)?);
        Ok(())
    }

    pub fn set_tsig(&mut self, key: TsigKey) {
        self.query.set_tsig(key);
    }

    pub fn set_sig0(&mut self, signer: Box<dyn KeySigner>) -> DNSResult<()> {
        self.query.set_sig0(signer)
    }

    pub fn zone(&self) -> Option<&DomainName> {
        self.query.first_question().map(|q| &q.name)
    }

    /// The update is sent through the same engine as any query.
    pub fn as_query_mut(&mut self) -> &mut DNSQuery {
        &mut self.query
    }
}

fn empty_record(name: &str, qtype: QType, qclass: QClass) -> DNSResult<DNSResourceRecord> {
    let mut record = DNSResourceRecord::new(name, qtype, qclass, 0, RData::Unknown(Vec::new()))?;
    record.rd_length = 0;
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::DNSResponse;

    #[test]
    fn update_wire_layout() {
        let mut update = DNSUpdate::new("dyn.example.com").unwrap();
        update
            .prereq_name_not_in_use("host.dyn.example.com")
            .unwrap();
        update.add(
            DNSResourceRecord::new(
                "host.dyn.example.com.",
                QType::A,
                QClass::IN,
                300,
                RData::A("192.0.2.55".parse().unwrap()),
            )
            .unwrap(),
        );
        update.delete_rrset("old.dyn.example.com", QType::AAAA).unwrap();

        let wire = update.as_query_mut().serialize().unwrap();
        let parsed = DNSResponse::from_bytes(&wire).unwrap();

        assert_eq!(parsed.header.flags.op_code, OpCode::Update);
        // zone, prerequisite, two update operations
        assert_eq!(parsed.header.qd_count, 1);
        assert_eq!(parsed.header.an_count, 1);
        assert_eq!(parsed.header.ns_count, 2);
        assert_eq!(parsed.questions[0].r#type, QType::SOA);

        // the not-in-use prerequisite: type ANY, class NONE, empty rdata
        let prereq = &parsed.answers[0];
        assert_eq!(prereq.qtype(), Some(QType::ANY));
        assert_eq!(prereq.qclass(), Some(QClass::NONE));
        assert_eq!(prereq.rd_length, 0);

        // the deletion: class ANY, ttl 0
        let deletion = &parsed.authorities[1];
        assert_eq!(deletion.qtype(), Some(QType::AAAA));
        assert_eq!(deletion.qclass(), Some(QClass::ANY));
        assert_eq!(deletion.ttl, 0);
    }
}
