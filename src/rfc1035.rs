//! Base structures for DNS messages. Taken from https://datatracker.ietf.org/doc/html/rfc1035
//! and the IANA DNS parameters registry.
//!
//! The DnsStruct procedural macro defines the implementation of the wire
//! conversion traits field by field. The DnsEnum procedural macro implements
//! Default, FromStr, TryFrom<u8> and TryFrom<u16> for the code enums.
use std::fmt;

use crate::error::{DNSError, DNSResult};

use dns_derive::{DnsEnum, DnsStruct};

/// Maximum size of a DNS message over UDP without EDNS0 (RFC 1035 §2.3.4).
pub const MAX_UDP_PACKET_SIZE: usize = 512;
/// Default requestor payload size advertised in the OPT record when DNSSEC
/// is enabled.
pub const DNSSEC_PAYLOAD_SIZE: u16 = 4000;
/// A label is limited to 63 octets, a whole encoded name to 255.
pub const MAX_LABEL_LENGTH: usize = 63;
pub const MAX_NAME_LENGTH: usize = 255;
/// Size of the fixed message header.
pub const HEADER_LENGTH: usize = 12;
/// Well-known DNS port.
pub const DNS_PORT: u16 = 53;

// DNS packet header: https://datatracker.ietf.org/doc/html/rfc1035#section-4.1.1
#[derive(Debug, Default, Clone, DnsStruct)]
pub struct DNSPacketHeader {
    /// A 16 bit identifier assigned by the program that generates any kind of
    /// query. This identifier is copied to the corresponding reply and can be
    /// used by the requester to match up replies to outstanding queries.
    pub id: u16,
    pub flags: DNSPacketFlags,
    /// number of entries in the question section
    pub qd_count: u16,
    /// number of resource records in the answer section
    pub an_count: u16,
    /// number of name server resource records in the authority section
    pub ns_count: u16,
    /// number of resource records in the additional section
    pub ar_count: u16,
}

// Flags: https://datatracker.ietf.org/doc/html/rfc1035#section-4.1.1,
// AD & CD added by https://datatracker.ietf.org/doc/html/rfc4035#section-3.1.3
#[derive(Debug, Default, Clone)]
pub struct DNSPacketFlags {
    /// one bit: query (0) or response (1)
    pub packet_type: PacketType,
    /// four bits specifying the kind of query in this message
    pub op_code: OpCode,
    /// valid in responses: the responding server is an authority for the
    /// domain name in the question section
    pub authoritative_answer: bool,
    /// this message was truncated by the transmission channel
    pub truncated: bool,
    /// may be set in a query and is copied into the response; directs the
    /// server to pursue the query recursively
    pub recursion_desired: bool,
    /// set or cleared in a response: recursive query support is available
    pub recursion_available: bool,
    /// reserved, must be zero in all queries and responses
    pub z: u8,
    /// the response data was authenticated by the upstream validator
    pub authentic_data: bool,
    /// the requester disables upstream signature validation
    pub checking_disabled: bool,
    pub response_code: ResponseCode,
}

/// The flags' first bit is 0 or 1 meaning a query or a response. Better is to
/// use an enum which is both clearer and type oriented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, DnsEnum)]
#[repr(u8)]
pub enum PacketType {
    Query = 0,
    Response = 1,
}

impl fmt::Display for PacketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            PacketType::Query => write!(f, "QUERY"),
            PacketType::Response => write!(f, "RESPONSE"),
        }
    }
}

// op codes: https://www.iana.org/assignments/dns-parameters/dns-parameters.xhtml#dns-parameters-5
#[derive(Debug, Clone, Copy, PartialEq, Eq, DnsEnum)]
#[repr(u8)]
pub enum OpCode {
    Query = 0,  // [RFC1035]
    IQuery = 1, // (Inverse Query, OBSOLETE) [RFC3425]
    Status = 2, // [RFC1035]
    Notify = 4, // [RFC1996]
    Update = 5, // [RFC2136]
    DSO = 6,    // DNS Stateful Operations [RFC8490]
}

// response codes: https://www.iana.org/assignments/dns-parameters/dns-parameters.xhtml#dns-parameters-6
// 12-15 are unassigned but fit in the 4-bit header field, so they stay
// representable rather than breaking the parse on a nonconforming server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, DnsEnum)]
#[repr(u16)]
pub enum ResponseCode {
    NoError = 0,    // [RFC1035]
    FormErr = 1,    // Format Error [RFC1035]
    ServFail = 2,   // Server Failure [RFC1035]
    NXDomain = 3,   // Non-Existent Domain [RFC1035]
    NotImp = 4,     // Not Implemented [RFC1035]
    Refused = 5,    // Query Refused [RFC1035]
    YXDomain = 6,   // Name Exists when it should not [RFC2136]
    YXRRSet = 7,    // RR Set Exists when it should not [RFC2136]
    NXRRSet = 8,    // RR Set that should exist does not [RFC2136]
    NotAuth = 9,    // Not Authorized [RFC8945]
    NotZone = 10,   // Name not contained in zone [RFC2136]
    DSOTYPENI = 11, // DSO-TYPE Not Implemented [RFC8490]
    Reserved12 = 12,
    Reserved13 = 13,
    Reserved14 = 14,
    Reserved15 = 15,
    BADVERS = 16,   // Bad OPT Version [RFC6891]
    BADKEY = 17,    // Key not recognized [RFC8945]
    BADTIME = 18,   // Signature out of time window [RFC8945]
    BADMODE = 19,   // Bad TKEY Mode [RFC2930]
    BADNAME = 20,   // Duplicate key name [RFC2930]
    BADALG = 21,    // Algorithm not supported [RFC2930]
    BADTRUNC = 22,  // Bad Truncation [RFC8945]
    BADCOOKIE = 23, // Bad/missing Server Cookie [RFC7873]
}

// RR type codes: https://www.iana.org/assignments/dns-parameters/dns-parameters.xhtml#dns-parameters-4
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, DnsEnum)]
#[repr(u16)]
pub enum QType {
    A = 1,            // a host address [RFC1035]
    NS = 2,           // an authoritative name server [RFC1035]
    MD = 3,           // a mail destination (OBSOLETE - use MX) [RFC1035]
    MF = 4,           // a mail forwarder (OBSOLETE - use MX) [RFC1035]
    CNAME = 5,        // the canonical name for an alias [RFC1035]
    SOA = 6,          // marks the start of a zone of authority [RFC1035]
    MB = 7,           // a mailbox domain name (EXPERIMENTAL) [RFC1035]
    MG = 8,           // a mail group member (EXPERIMENTAL) [RFC1035]
    MR = 9,           // a mail rename domain name (EXPERIMENTAL) [RFC1035]
    NULL = 10,        // a null RR (EXPERIMENTAL) [RFC1035]
    WKS = 11,         // a well known service description [RFC1035]
    PTR = 12,         // a domain name pointer [RFC1035]
    HINFO = 13,       // host information [RFC1035]
    MINFO = 14,       // mailbox or mail list information [RFC1035]
    MX = 15,          // mail exchange [RFC1035]
    TXT = 16,         // text strings [RFC1035]
    RP = 17,          // for Responsible Person [RFC1183]
    AFSDB = 18,       // for AFS Data Base location [RFC1183][RFC5864]
    X25 = 19,         // for X.25 PSDN address [RFC1183]
    ISDN = 20,        // for ISDN address [RFC1183]
    RT = 21,          // for Route Through [RFC1183]
    NSAP = 22,        // for NSAP address, NSAP style A record [RFC1706]
    NSAPPTR = 23,     // for domain name pointer, NSAP style [RFC1706]
    SIG = 24,         // for security signature [RFC2931][RFC4034]
    KEY = 25,         // for security key [RFC2536][RFC4034]
    PX = 26,          // X.400 mail mapping information [RFC2163]
    GPOS = 27,        // Geographical Position [RFC1712]
    AAAA = 28,        // IP6 Address [RFC3596]
    LOC = 29,         // Location Information [RFC1876]
    NXT = 30,         // Next Domain (OBSOLETE) [RFC3755]
    EID = 31,         // Endpoint Identifier
    NIMLOC = 32,      // Nimrod Locator
    SRV = 33,         // Server Selection [RFC2782]
    ATMA = 34,        // ATM Address
    NAPTR = 35,       // Naming Authority Pointer [RFC3403]
    KX = 36,          // Key Exchanger [RFC2230]
    CERT = 37,        // CERT [RFC4398]
    A6 = 38,          // A6 (OBSOLETE - use AAAA) [RFC6563]
    DNAME = 39,       // DNAME [RFC6672]
    SINK = 40,        // SINK [draft-eastlake-kitchen-sink]
    OPT = 41,         // OPT [RFC3225][RFC6891]
    APL = 42,         // APL [RFC3123]
    DS = 43,          // Delegation Signer [RFC4034]
    SSHFP = 44,       // SSH Key Fingerprint [RFC4255]
    IPSECKEY = 45,    // IPSECKEY [RFC4025]
    RRSIG = 46,       // RRSIG [RFC4034]
    NSEC = 47,        // NSEC [RFC4034][RFC9077]
    DNSKEY = 48,      // DNSKEY [RFC4034]
    DHCID = 49,       // DHCID [RFC4701]
    NSEC3 = 50,       // NSEC3 [RFC5155][RFC9077]
    NSEC3PARAM = 51,  // NSEC3PARAM [RFC5155]
    TLSA = 52,        // TLSA [RFC6698]
    SMIMEA = 53,      // S/MIME cert association [RFC8162]
    HIP = 55,         // Host Identity Protocol [RFC8005]
    NINFO = 56,       // NINFO
    RKEY = 57,        // RKEY
    TALINK = 58,      // Trust Anchor LINK
    CDS = 59,         // Child DS [RFC7344]
    CDNSKEY = 60,     // DNSKEY(s) the Child wants reflected in DS [RFC7344]
    OPENPGPKEY = 61,  // OpenPGP Key [RFC7929]
    CSYNC = 62,       // Child-To-Parent Synchronization [RFC7477]
    ZONEMD = 63,      // Message Digest Over Zone Data [RFC8976]
    SVCB = 64,        // Service Binding [RFC9460]
    HTTPS = 65,       // HTTPS Binding [RFC9460]
    SPF = 99,         // [RFC7208]
    NID = 104,        // [RFC6742] ILNP
    L32 = 105,        // [RFC6742] ILNP
    L64 = 106,        // [RFC6742] ILNP
    LP = 107,         // [RFC6742] ILNP
    EUI48 = 108,      // an EUI-48 address [RFC7043]
    EUI64 = 109,      // an EUI-64 address [RFC7043]
    TKEY = 249,       // Transaction Key [RFC2930]
    TSIG = 250,       // Transaction Signature [RFC8945]
    IXFR = 251,       // incremental transfer [RFC1995]
    AXFR = 252,       // transfer of an entire zone [RFC1035][RFC5936]
    MAILB = 253,      // mailbox-related RRs (MB, MG or MR) [RFC1035]
    MAILA = 254,      // mail agent RRs (OBSOLETE - see MX) [RFC1035]
    ANY = 255,        // a request for some or all records [RFC8482]
    URI = 256,        // URI [RFC7553]
    CAA = 257,        // Certification Authority Restriction [RFC8659]
    AVC = 258,        // Application Visibility and Control
    DOA = 259,        // Digital Object Architecture
    AMTRELAY = 260,   // Automatic Multicast Tunneling Relay [RFC8777]
    TA = 32768,       // DNSSEC Trust Authorities
    DLV = 32769,      // DNSSEC Lookaside Validation (OBSOLETE) [RFC8749]
}

impl QType {
    /// Responses for these are either pseudo-records or whole-zone snapshots
    /// and never land in the lookup cache.
    pub fn is_cacheable(&self) -> bool {
        !matches!(self, QType::AXFR | QType::IXFR | QType::OPT)
    }
}

// RR Class values: https://datatracker.ietf.org/doc/html/rfc1035#section-3.2.4
// NONE (254) comes from RFC 2136 and is used by update prerequisites.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, DnsEnum)]
#[repr(u16)]
pub enum QClass {
    IN = 1, // the Internet
    CS = 2, // the CSNET class (obsolete)
    CH = 3, // the CHAOS class
    HS = 4, // Hesiod
    NONE = 254,
    ANY = 255,
}

// Character string as described in: https://datatracker.ietf.org/doc/html/rfc1035#section-3.3
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CharacterString(pub String);

/// ```
/// use netdns::rfc1035::CharacterString;
///
/// let cs = CharacterString::from("www");
/// assert_eq!(cs.len(), 3);
/// assert_eq!(cs.to_string(), "www");
/// ```
impl From<&str> for CharacterString {
    fn from(s: &str) -> Self {
        CharacterString(s.to_string())
    }
}

impl CharacterString {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CharacterString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Domain name: https://datatracker.ietf.org/doc/html/rfc1035#section-3.1
//
// Labels are stored in text form without the trailing root label; the root
// name is the empty vector.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct DomainName(pub Vec<String>);

impl DomainName {
    pub fn root() -> Self {
        DomainName(Vec::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of labels, root excluded.
    pub fn label_count(&self) -> u8 {
        self.0.len() as u8
    }

    /// Length of the uncompressed wire form: every label prefixed by its
    /// length octet, plus the final zero octet.
    pub fn encoded_len(&self) -> usize {
        self.0.iter().map(|l| l.len() + 1).sum::<usize>() + 1
    }

    /// Uncompressed, lowercased wire form, as used by the TSIG and SIG(0)
    /// digest input (RFC 2845 §3.4.2, RFC 4034 §6.2).
    pub fn to_canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.encoded_len());
        for label in &self.0 {
            let lower = label.to_lowercase();
            bytes.push(lower.len() as u8);
            bytes.extend_from_slice(lower.as_bytes());
        }
        bytes.push(0);
        bytes
    }

    /// Case-insensitive comparison, as name matching is throughout the DNS.
    pub fn eq_ignore_case(&self, other: &DomainName) -> bool {
        self.0.len() == other.0.len()
            && self
                .0
                .iter()
                .zip(other.0.iter())
                .all(|(a, b)| a.eq_ignore_ascii_case(b))
    }
}

/// ```
/// use netdns::rfc1035::DomainName;
///
/// let dn = DomainName::try_from("www.google.com").unwrap();
/// assert_eq!(dn.0, &["www", "google", "com"]);
/// assert_eq!(dn.to_string(), "www.google.com.");
///
/// let dn = DomainName::try_from(".").unwrap();
/// assert!(dn.is_root());
/// assert_eq!(dn.to_string(), ".");
///
/// assert!(DomainName::try_from("").is_err());
/// ```
impl TryFrom<&str> for DomainName {
    type Error = DNSError;

    fn try_from(domain: &str) -> Result<Self, Self::Error> {
        // safeguard
        if domain.is_empty() {
            return Err(DNSError::Parse("empty domain name".to_string()));
        }

        // handle case for root domain
        let labels: Vec<String> = if domain == "." {
            Vec::new()
        } else {
            domain
                .split('.')
                .filter(|x| !x.is_empty())
                .map(|x| x.to_string())
                .collect()
        };

        let dn = DomainName(labels);

        if dn.0.iter().any(|l| l.len() > MAX_LABEL_LENGTH) {
            return Err(DNSError::Parse(format!(
                "label longer than {} bytes in <{}>",
                MAX_LABEL_LENGTH, domain
            )));
        }
        if dn.encoded_len() > MAX_NAME_LENGTH {
            return Err(DNSError::Parse(format!(
                "domain name <{}> longer than {} bytes",
                domain, MAX_NAME_LENGTH
            )));
        }

        Ok(dn)
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            write!(f, ".")
        } else {
            for label in &self.0 {
                write!(f, "{}.", label)?;
            }
            Ok(())
        }
    }
}

//--------------------------------------------------------------------------------
// Question structure: https://datatracker.ietf.org/doc/html/rfc1035#section-4.1.2
//--------------------------------------------------------------------------------
#[derive(Debug, Default, Clone, DnsStruct)]
pub struct DNSQuestion {
    pub name: DomainName,
    pub r#type: QType,
    pub class: QClass,
}

impl DNSQuestion {
    /// Create a new question. By default, the IN class is used if None is
    /// provided as the qclass parameter.
    pub fn new(domain: &str, qtype: QType, qclass: Option<QClass>) -> DNSResult<Self> {
        let dn = DomainName::try_from(domain)?;

        Ok(DNSQuestion {
            name: dn,
            r#type: qtype,
            class: qclass.unwrap_or(QClass::IN),
        })
    }
}

impl fmt::Display for DNSQuestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "domain:{} qtype:{:?} class:{:?}",
            self.name, self.r#type, self.class
        )
    }
}

//------------------------------------------------------------------------
// Resource record: https://datatracker.ietf.org/doc/html/rfc1035#section-4.1.3
//------------------------------------------------------------------------
//
// TYPE and CLASS stay numeric: unknown types must survive a decode as opaque
// rdata, and OPT re-purposes the class field as a payload size no QClass
// variant could carry.
#[derive(Debug, Default, Clone)]
pub struct DNSResourceRecord {
    /// owner name, i.e., the name of the node to which this record pertains
    pub name: DomainName,
    pub type_code: u16,
    pub class: u16,
    /// time interval the record may be cached; zero means use-once
    pub ttl: u32,
    /// length of the rdata as received; recomputed on write
    pub rd_length: u16,
    pub r_data: crate::rdata::RData,
}

impl DNSResourceRecord {
    pub fn new(
        name: &str,
        qtype: QType,
        qclass: QClass,
        ttl: u32,
        r_data: crate::rdata::RData,
    ) -> DNSResult<Self> {
        Ok(DNSResourceRecord {
            name: DomainName::try_from(name)?,
            type_code: qtype as u16,
            class: qclass as u16,
            ttl,
            rd_length: 0,
            r_data,
        })
    }

    pub fn qtype(&self) -> Option<QType> {
        QType::try_from(self.type_code).ok()
    }

    pub fn qclass(&self) -> Option<QClass> {
        QClass::try_from(self.class).ok()
    }
}

impl crate::network_order::ToNetworkOrder for DNSResourceRecord {
    /// NAME, TYPE, CLASS, TTL, a 2-byte RDLENGTH placeholder, then the rdata;
    /// the placeholder is patched once the handler has returned. For OPT the
    /// class/ttl bytes come from the pseudo-record's synthesized values.
    fn to_network_bytes(
        &self,
        buffer: &mut crate::network_order::PacketBuffer,
    ) -> DNSResult<usize> {
        use crate::network_order::ToNetworkOrder;
        use crate::rdata::RData;

        let start = buffer.offset();

        self.name.to_network_bytes(buffer)?;
        self.type_code.to_network_bytes(buffer)?;

        match &self.r_data {
            RData::OPT(opt) => {
                opt.udp_payload_size.to_network_bytes(buffer)?;
                opt.pack_ttl().to_network_bytes(buffer)?;
            }
            _ => {
                self.class.to_network_bytes(buffer)?;
                self.ttl.to_network_bytes(buffer)?;
            }
        }

        // rdlength placeholder, filled in below
        let length_offset = buffer.offset();
        0u16.to_network_bytes(buffer)?;

        let rdata_start = buffer.offset();
        self.r_data.to_network_bytes(buffer)?;
        let rd_length = (buffer.offset() - rdata_start) as u16;

        buffer[length_offset..length_offset + 2].copy_from_slice(&rd_length.to_be_bytes());

        Ok(buffer.offset() - start)
    }
}

impl<'a> crate::network_order::FromNetworkOrder<'a> for DNSResourceRecord {
    fn from_network_bytes(&mut self, buffer: &mut std::io::Cursor<&'a [u8]>) -> DNSResult<()> {
        use crate::network_order::FromNetworkOrder;
        use crate::rdata::RData;

        self.name.from_network_bytes(buffer)?;
        self.type_code.from_network_bytes(buffer)?;
        self.class.from_network_bytes(buffer)?;
        self.ttl.from_network_bytes(buffer)?;
        self.rd_length.from_network_bytes(buffer)?;

        let rdata_start = buffer.position();
        self.r_data = RData::from_wire(self.type_code, self.class, self.ttl, buffer, self.rd_length)?;

        // a handler must consume exactly its declared rdata
        if buffer.position() != rdata_start + self.rd_length as u64 {
            return Err(DNSError::Parse(format!(
                "rdata decoder for type {} consumed {} bytes, rdlength said {}",
                self.type_code,
                buffer.position() - rdata_start,
                self.rd_length
            )));
        }

        Ok(())
    }
}

impl fmt::Display for DNSResourceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let class = match self.qclass() {
            Some(qc) => format!("{:?}", qc),
            None => format!("CLASS{}", self.class),
        };
        write!(
            f,
            "{} {} {} {} {}",
            self.name,
            self.ttl,
            class,
            crate::rdata::type_mnemonic(self.type_code),
            self.r_data
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qtype_conversions() {
        use std::str::FromStr;

        assert_eq!(QType::try_from(1u16).unwrap(), QType::A);
        assert_eq!(QType::try_from(257u16).unwrap(), QType::CAA);
        assert!(QType::try_from(54u16).is_err());
        assert_eq!(QType::from_str("AXFR").unwrap(), QType::AXFR);
        assert!(QType::from_str("BOGUS").is_err());
    }

    #[test]
    fn cacheable_types() {
        assert!(QType::A.is_cacheable());
        assert!(QType::MX.is_cacheable());
        assert!(!QType::AXFR.is_cacheable());
        assert!(!QType::OPT.is_cacheable());
    }

    #[test]
    fn domain_name_limits() {
        let label64 = "a".repeat(64);
        assert!(DomainName::try_from(label64.as_str()).is_err());

        // 4 * (63 + 1) + 1 = 257 > 255
        let long = [
            "a".repeat(63),
            "b".repeat(63),
            "c".repeat(63),
            "d".repeat(63),
        ]
        .join(".");
        assert!(DomainName::try_from(long.as_str()).is_err());

        let ok = ["a".repeat(63), "b".repeat(63), "c".repeat(63)].join(".");
        assert!(DomainName::try_from(ok.as_str()).is_ok());
    }

    #[test]
    fn resource_record_round_trip() {
        use crate::network_order::{FromNetworkOrder, PacketBuffer, ToNetworkOrder};
        use crate::rdata::RData;

        let rr = DNSResourceRecord::new(
            "www.example.com.",
            QType::A,
            QClass::IN,
            3600,
            RData::A("192.0.2.7".parse().unwrap()),
        )
        .unwrap();

        let mut buffer = PacketBuffer::new();
        rr.to_network_bytes(&mut buffer).unwrap();
        let bytes = buffer.into_bytes();

        // the backpatched rdlength and the 4 address bytes close the record
        let n = bytes.len();
        assert_eq!(&bytes[n - 6..], &[0, 4, 192, 0, 2, 7]);

        let mut cursor = std::io::Cursor::new(bytes.as_slice());
        let mut back = DNSResourceRecord::default();
        back.from_network_bytes(&mut cursor).unwrap();
        assert_eq!(back.qtype(), Some(QType::A));
        assert_eq!(back.rd_length, 4);
        assert_eq!(back.to_string(), "www.example.com. 3600 IN A 192.0.2.7");
    }

    #[test]
    fn canonical_bytes() {
        let dn = DomainName::try_from("WWW.Example.COM").unwrap();
        assert_eq!(
            dn.to_canonical_bytes(),
            b"\x03www\x07example\x03com\x00".to_vec()
        );
        assert!(dn.eq_ignore_case(&DomainName::try_from("www.example.com").unwrap()));
    }
}
