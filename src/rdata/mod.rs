//! The resource record data registry: one tagged variant per concrete TYPE,
//! with the four operations every handler supports — wire decode against the
//! whole-message cursor, wire encode into the packet buffer, zone-format
//! parse from pre-split tokens, and zone-format rendering via `Display`.
//!
//! Unknown TYPEs are carried as opaque bytes and rendered in the RFC 3597
//! `\# <length> <hex>` form.
use std::fmt;
use std::io::Cursor;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use crate::error::{DNSError, DNSResult};
use crate::network_order::primitive::read_bytes;
use crate::network_order::{FromNetworkOrder, PacketBuffer, ToNetworkOrder};
use crate::rfc1035::{CharacterString, DomainName, QType};
use crate::util;

pub mod dnssec;
pub mod ilnp;
pub mod misc;
pub mod opt;
pub mod rfc1035;
pub mod tsig;

pub use dnssec::{DNSKEY, DS, NSEC, NSEC3, NSEC3PARAM, RRSIG};
pub use ilnp::{L32, L64, LP, NID};
pub use misc::{CAA, CSYNC, HIP, KX, LOC, NAPTR, SRV, SSHFP, TLSA, URI, ZONEMD};
pub use opt::{EdnsOption, OPT};
pub use rfc1035::{HINFO, MX, RP, SOA, WKS};
pub use tsig::TSIG;

/// Typed rdata. Record families sharing a wire layout share a carrier type:
/// SIG rides on RRSIG, CDS on DS, CDNSKEY on DNSKEY, SMIMEA on TLSA and SPF
/// on the TXT string list.
#[derive(Debug, Clone)]
pub enum RData {
    A(Ipv4Addr),
    AAAA(Ipv6Addr),
    NS(DomainName),
    CNAME(DomainName),
    PTR(DomainName),
    DNAME(DomainName),
    SOA(SOA),
    MX(MX),
    TXT(Vec<CharacterString>),
    SPF(Vec<CharacterString>),
    HINFO(HINFO),
    WKS(WKS),
    RP(RP),
    KX(KX),
    SRV(SRV),
    NAPTR(NAPTR),
    CAA(CAA),
    SSHFP(SSHFP),
    TLSA(TLSA),
    SMIMEA(TLSA),
    URI(URI),
    LOC(LOC),
    CSYNC(CSYNC),
    HIP(HIP),
    DHCID(Vec<u8>),
    OPENPGPKEY(Vec<u8>),
    EUI48([u8; 6]),
    EUI64([u8; 8]),
    ZONEMD(ZONEMD),
    DNSKEY(DNSKEY),
    CDNSKEY(DNSKEY),
    DS(DS),
    CDS(DS),
    RRSIG(RRSIG),
    SIG(RRSIG),
    NSEC(NSEC),
    NSEC3(NSEC3),
    NSEC3PARAM(NSEC3PARAM),
    NID(NID),
    L32(L32),
    L64(L64),
    LP(LP),
    OPT(OPT),
    TSIG(TSIG),
    Unknown(Vec<u8>),
}

impl Default for RData {
    fn default() -> Self {
        RData::Unknown(Vec::new())
    }
}

impl RData {
    /// Decode the rdata of a record of type `type_code`. The cursor sits on
    /// the first rdata byte of the whole received message, so embedded names
    /// can chase compression pointers. `class` and `ttl` are only consulted
    /// by OPT, which overloads both fields.
    pub fn from_wire(
        type_code: u16,
        class: u16,
        ttl: u32,
        buffer: &mut Cursor<&[u8]>,
        rd_length: u16,
    ) -> DNSResult<RData> {
        let end = buffer.position() + rd_length as u64;

        let qtype = match QType::try_from(type_code) {
            Ok(qt) => qt,
            Err(_) => return Ok(RData::Unknown(read_bytes(buffer, rd_length as usize)?)),
        };

        let rdata = match qtype {
            QType::A => {
                let mut address = Ipv4Addr::UNSPECIFIED;
                address.from_network_bytes(buffer)?;
                RData::A(address)
            }
            QType::AAAA => {
                let mut address = Ipv6Addr::UNSPECIFIED;
                address.from_network_bytes(buffer)?;
                RData::AAAA(address)
            }
            QType::NS => RData::NS(read_name(buffer)?),
            QType::CNAME => RData::CNAME(read_name(buffer)?),
            QType::PTR => RData::PTR(read_name(buffer)?),
            QType::DNAME => RData::DNAME(read_name(buffer)?),
            QType::SOA => {
                let mut soa = SOA::default();
                soa.from_network_bytes(buffer)?;
                RData::SOA(soa)
            }
            QType::MX => {
                let mut mx = MX::default();
                mx.from_network_bytes(buffer)?;
                RData::MX(mx)
            }
            QType::TXT => RData::TXT(read_strings(buffer, end)?),
            QType::SPF => RData::SPF(read_strings(buffer, end)?),
            QType::HINFO => {
                let mut hinfo = HINFO::default();
                hinfo.from_network_bytes(buffer)?;
                RData::HINFO(hinfo)
            }
            QType::WKS => RData::WKS(WKS::from_wire(buffer, end)?),
            QType::RP => {
                let mut rp = RP::default();
                rp.from_network_bytes(buffer)?;
                RData::RP(rp)
            }
            QType::KX => {
                let mut kx = KX::default();
                kx.from_network_bytes(buffer)?;
                RData::KX(kx)
            }
            QType::SRV => {
                let mut srv = SRV::default();
                srv.from_network_bytes(buffer)?;
                RData::SRV(srv)
            }
            QType::NAPTR => {
                let mut naptr = NAPTR::default();
                naptr.from_network_bytes(buffer)?;
                RData::NAPTR(naptr)
            }
            QType::CAA => RData::CAA(CAA::from_wire(buffer, end)?),
            QType::SSHFP => RData::SSHFP(SSHFP::from_wire(buffer, end)?),
            QType::TLSA => RData::TLSA(TLSA::from_wire(buffer, end)?),
            QType::SMIMEA => RData::SMIMEA(TLSA::from_wire(buffer, end)?),
            QType::URI => RData::URI(URI::from_wire(buffer, end)?),
            QType::LOC => {
                let mut loc = LOC::default();
                loc.from_network_bytes(buffer)?;
                RData::LOC(loc)
            }
            QType::CSYNC => RData::CSYNC(CSYNC::from_wire(buffer, end)?),
            QType::HIP => RData::HIP(HIP::from_wire(buffer, end)?),
            QType::DHCID => RData::DHCID(read_tail(buffer, end)?),
            QType::OPENPGPKEY => RData::OPENPGPKEY(read_tail(buffer, end)?),
            QType::EUI48 => {
                let mut address = [0u8; 6];
                address.from_network_bytes(buffer)?;
                RData::EUI48(address)
            }
            QType::EUI64 => {
                let mut address = [0u8; 8];
                address.from_network_bytes(buffer)?;
                RData::EUI64(address)
            }
            QType::ZONEMD => RData::ZONEMD(ZONEMD::from_wire(buffer, end)?),
            QType::DNSKEY => RData::DNSKEY(DNSKEY::from_wire(buffer, end)?),
            QType::CDNSKEY => RData::CDNSKEY(DNSKEY::from_wire(buffer, end)?),
            QType::DS => RData::DS(DS::from_wire(buffer, end)?),
            QType::CDS => RData::CDS(DS::from_wire(buffer, end)?),
            QType::RRSIG => RData::RRSIG(RRSIG::from_wire(buffer, end)?),
            QType::SIG => RData::SIG(RRSIG::from_wire(buffer, end)?),
            QType::NSEC => RData::NSEC(NSEC::from_wire(buffer, end)?),
            QType::NSEC3 => RData::NSEC3(NSEC3::from_wire(buffer, end)?),
            QType::NSEC3PARAM => RData::NSEC3PARAM(NSEC3PARAM::from_wire(buffer)?),
            QType::NID => {
                let mut nid = NID::default();
                nid.from_network_bytes(buffer)?;
                RData::NID(nid)
            }
            QType::L32 => {
                let mut l32 = L32::default();
                l32.from_network_bytes(buffer)?;
                RData::L32(l32)
            }
            QType::L64 => {
                let mut l64 = L64::default();
                l64.from_network_bytes(buffer)?;
                RData::L64(l64)
            }
            QType::LP => {
                let mut lp = LP::default();
                lp.from_network_bytes(buffer)?;
                RData::LP(lp)
            }
            QType::OPT => RData::OPT(OPT::from_class_ttl(class, ttl, buffer, end)?),
            QType::TSIG => RData::TSIG(TSIG::from_wire(buffer)?),
            _ => RData::Unknown(read_bytes(buffer, rd_length as usize)?),
        };

        Ok(rdata)
    }

    /// Parse a zone-format rdata fragment, pre-split on whitespace with any
    /// multi-line continuation already joined by the caller.
    pub fn from_text(qtype: QType, tokens: &[&str]) -> DNSResult<RData> {
        // RFC 3597 opaque form works for any type
        if tokens.first() == Some(&"\\#") {
            return unknown_from_text(tokens);
        }

        let rdata = match qtype {
            QType::A => RData::A(
                field(tokens, 0, "address")?
                    .parse()
                    .map_err(|_| DNSError::RRInvalid("bad IPv4 address".to_string()))?,
            ),
            QType::AAAA => RData::AAAA(
                field(tokens, 0, "address")?
                    .parse()
                    .map_err(|_| DNSError::RRInvalid("bad IPv6 address".to_string()))?,
            ),
            QType::NS => RData::NS(DomainName::try_from(field(tokens, 0, "nsdname")?)?),
            QType::CNAME => RData::CNAME(DomainName::try_from(field(tokens, 0, "cname")?)?),
            QType::PTR => RData::PTR(DomainName::try_from(field(tokens, 0, "ptrdname")?)?),
            QType::DNAME => RData::DNAME(DomainName::try_from(field(tokens, 0, "target")?)?),
            QType::SOA => RData::SOA(SOA::from_text(tokens)?),
            QType::MX => RData::MX(MX::from_text(tokens)?),
            QType::TXT => RData::TXT(strings_from_text(tokens)),
            QType::SPF => RData::SPF(strings_from_text(tokens)),
            QType::HINFO => RData::HINFO(HINFO::from_text(tokens)?),
            QType::WKS => RData::WKS(WKS::from_text(tokens)?),
            QType::RP => RData::RP(RP::from_text(tokens)?),
            QType::KX => RData::KX(KX::from_text(tokens)?),
            QType::SRV => RData::SRV(SRV::from_text(tokens)?),
            QType::NAPTR => RData::NAPTR(NAPTR::from_text(tokens)?),
            QType::CAA => RData::CAA(CAA::from_text(tokens)?),
            QType::SSHFP => RData::SSHFP(SSHFP::from_text(tokens)?),
            QType::TLSA => RData::TLSA(TLSA::from_text(tokens)?),
            QType::SMIMEA => RData::SMIMEA(TLSA::from_text(tokens)?),
            QType::URI => RData::URI(URI::from_text(tokens)?),
            QType::LOC => RData::LOC(LOC::from_text(tokens)?),
            QType::CSYNC => RData::CSYNC(CSYNC::from_text(tokens)?),
            QType::HIP => RData::HIP(HIP::from_text(tokens)?),
            QType::DHCID => RData::DHCID(base64_field(tokens, "dhcid")?),
            QType::OPENPGPKEY => RData::OPENPGPKEY(base64_field(tokens, "key")?),
            QType::EUI48 => {
                let mut address = [0u8; 6];
                parse_eui(field(tokens, 0, "address")?, &mut address)?;
                RData::EUI48(address)
            }
            QType::EUI64 => {
                let mut address = [0u8; 8];
                parse_eui(field(tokens, 0, "address")?, &mut address)?;
                RData::EUI64(address)
            }
            QType::ZONEMD => RData::ZONEMD(ZONEMD::from_text(tokens)?),
            QType::DNSKEY => RData::DNSKEY(DNSKEY::from_text(tokens)?),
            QType::CDNSKEY => RData::CDNSKEY(DNSKEY::from_text(tokens)?),
            QType::DS => RData::DS(DS::from_text(tokens)?),
            QType::CDS => RData::CDS(DS::from_text(tokens)?),
            QType::RRSIG => RData::RRSIG(RRSIG::from_text(tokens)?),
            QType::SIG => RData::SIG(RRSIG::from_text(tokens)?),
            QType::NSEC => RData::NSEC(NSEC::from_text(tokens)?),
            QType::NSEC3 => RData::NSEC3(NSEC3::from_text(tokens)?),
            QType::NSEC3PARAM => RData::NSEC3PARAM(NSEC3PARAM::from_text(tokens)?),
            QType::NID => RData::NID(NID::from_text(tokens)?),
            QType::L32 => RData::L32(L32::from_text(tokens)?),
            QType::L64 => RData::L64(L64::from_text(tokens)?),
            QType::LP => RData::LP(LP::from_text(tokens)?),
            _ => {
                return Err(DNSError::RRInvalid(format!(
                    "no zone format for type {:?}",
                    qtype
                )))
            }
        };

        Ok(rdata)
    }
}

impl ToNetworkOrder for RData {
    fn to_network_bytes(&self, buffer: &mut PacketBuffer) -> DNSResult<usize> {
        match self {
            RData::A(address) => address.to_network_bytes(buffer),
            RData::AAAA(address) => address.to_network_bytes(buffer),
            RData::NS(name) | RData::CNAME(name) | RData::PTR(name) | RData::DNAME(name) => {
                name.to_network_bytes(buffer)
            }
            RData::SOA(soa) => soa.to_network_bytes(buffer),
            RData::MX(mx) => mx.to_network_bytes(buffer),
            RData::TXT(strings) | RData::SPF(strings) => strings.to_network_bytes(buffer),
            RData::HINFO(hinfo) => hinfo.to_network_bytes(buffer),
            RData::WKS(wks) => wks.to_network_bytes(buffer),
            RData::RP(rp) => rp.to_network_bytes(buffer),
            RData::KX(kx) => kx.to_network_bytes(buffer),
            RData::SRV(srv) => srv.to_network_bytes(buffer),
            RData::NAPTR(naptr) => naptr.to_network_bytes(buffer),
            RData::CAA(caa) => caa.to_network_bytes(buffer),
            RData::SSHFP(sshfp) => sshfp.to_network_bytes(buffer),
            RData::TLSA(tlsa) | RData::SMIMEA(tlsa) => tlsa.to_network_bytes(buffer),
            RData::URI(uri) => uri.to_network_bytes(buffer),
            RData::LOC(loc) => loc.to_network_bytes(buffer),
            RData::CSYNC(csync) => csync.to_network_bytes(buffer),
            RData::HIP(hip) => hip.to_network_bytes(buffer),
            RData::DHCID(data) | RData::OPENPGPKEY(data) => data.to_network_bytes(buffer),
            RData::EUI48(address) => address.to_network_bytes(buffer),
            RData::EUI64(address) => address.to_network_bytes(buffer),
            RData::ZONEMD(zonemd) => zonemd.to_network_bytes(buffer),
            RData::DNSKEY(key) | RData::CDNSKEY(key) => key.to_network_bytes(buffer),
            RData::DS(ds) | RData::CDS(ds) => ds.to_network_bytes(buffer),
            RData::RRSIG(sig) | RData::SIG(sig) => sig.to_network_bytes(buffer),
            RData::NSEC(nsec) => nsec.to_network_bytes(buffer),
            RData::NSEC3(nsec3) => nsec3.to_network_bytes(buffer),
            RData::NSEC3PARAM(param) => param.to_network_bytes(buffer),
            RData::NID(nid) => nid.to_network_bytes(buffer),
            RData::L32(l32) => l32.to_network_bytes(buffer),
            RData::L64(l64) => l64.to_network_bytes(buffer),
            RData::LP(lp) => lp.to_network_bytes(buffer),
            RData::OPT(opt) => opt.to_network_bytes(buffer),
            RData::TSIG(tsig) => tsig.to_network_bytes(buffer),
            RData::Unknown(data) => data.to_network_bytes(buffer),
        }
    }
}

impl fmt::Display for RData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RData::A(address) => write!(f, "{}", address),
            RData::AAAA(address) => write!(f, "{}", address),
            RData::NS(name) | RData::CNAME(name) | RData::PTR(name) | RData::DNAME(name) => {
                write!(f, "{}", name)
            }
            RData::SOA(soa) => write!(f, "{}", soa),
            RData::MX(mx) => write!(f, "{}", mx),
            RData::TXT(strings) | RData::SPF(strings) => {
                let mut first = true;
                for s in strings {
                    if !first {
                        write!(f, " ")?;
                    }
                    write!(f, "\"{}\"", s)?;
                    first = false;
                }
                Ok(())
            }
            RData::HINFO(hinfo) => write!(f, "{}", hinfo),
            RData::WKS(wks) => write!(f, "{}", wks),
            RData::RP(rp) => write!(f, "{}", rp),
            RData::KX(kx) => write!(f, "{}", kx),
            RData::SRV(srv) => write!(f, "{}", srv),
            RData::NAPTR(naptr) => write!(f, "{}", naptr),
            RData::CAA(caa) => write!(f, "{}", caa),
            RData::SSHFP(sshfp) => write!(f, "{}", sshfp),
            RData::TLSA(tlsa) | RData::SMIMEA(tlsa) => write!(f, "{}", tlsa),
            RData::URI(uri) => write!(f, "{}", uri),
            RData::LOC(loc) => write!(f, "{}", loc),
            RData::CSYNC(csync) => write!(f, "{}", csync),
            RData::HIP(hip) => write!(f, "{}", hip),
            RData::DHCID(data) | RData::OPENPGPKEY(data) => {
                use base64::Engine;
                write!(
                    f,
                    "{}",
                    base64::engine::general_purpose::STANDARD.encode(data)
                )
            }
            RData::EUI48(address) => write!(f, "{}", eui_to_text(address)),
            RData::EUI64(address) => write!(f, "{}", eui_to_text(address)),
            RData::ZONEMD(zonemd) => write!(f, "{}", zonemd),
            RData::DNSKEY(key) | RData::CDNSKEY(key) => write!(f, "{}", key),
            RData::DS(ds) | RData::CDS(ds) => write!(f, "{}", ds),
            RData::RRSIG(sig) | RData::SIG(sig) => write!(f, "{}", sig),
            RData::NSEC(nsec) => write!(f, "{}", nsec),
            RData::NSEC3(nsec3) => write!(f, "{}", nsec3),
            RData::NSEC3PARAM(param) => write!(f, "{}", param),
            RData::NID(nid) => write!(f, "{}", nid),
            RData::L32(l32) => write!(f, "{}", l32),
            RData::L64(l64) => write!(f, "{}", l64),
            RData::LP(lp) => write!(f, "{}", lp),
            RData::OPT(opt) => write!(f, "{}", opt),
            RData::TSIG(tsig) => write!(f, "{}", tsig),
            RData::Unknown(data) => {
                write!(f, "\\# {} {}", data.len(), util::to_hex(data))
            }
        }
    }
}

// names embedded in rdata decode against the whole message
fn read_name(buffer: &mut Cursor<&[u8]>) -> DNSResult<DomainName> {
    let mut name = DomainName::default();
    name.from_network_bytes(buffer)?;
    Ok(name)
}

fn read_strings(buffer: &mut Cursor<&[u8]>, end: u64) -> DNSResult<Vec<CharacterString>> {
    let mut strings = Vec::new();
    while buffer.position() < end {
        let mut cs = CharacterString::default();
        cs.from_network_bytes(buffer)?;
        strings.push(cs);
    }
    Ok(strings)
}

fn read_tail(buffer: &mut Cursor<&[u8]>, end: u64) -> DNSResult<Vec<u8>> {
    let remaining = end.saturating_sub(buffer.position()) as usize;
    read_bytes(buffer, remaining)
}

fn strings_from_text(tokens: &[&str]) -> Vec<CharacterString> {
    tokens
        .iter()
        .map(|tok| CharacterString::from(util::unquote(tok)))
        .collect()
}

fn base64_field(tokens: &[&str], what: &str) -> DNSResult<Vec<u8>> {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD
        .decode(tokens.concat())
        .map_err(|e| DNSError::RRInvalid(format!("bad base64 {}: {}", what, e)))
}

fn unknown_from_text(tokens: &[&str]) -> DNSResult<RData> {
    let length: usize = field(tokens, 1, "rdata length")?
        .parse()
        .map_err(|_| DNSError::RRInvalid("bad opaque rdata length".to_string()))?;
    let data = util::from_hex(&tokens[2..].concat())?;
    if data.len() != length {
        return Err(DNSError::RRInvalid(format!(
            "opaque rdata length {} does not match {} bytes",
            length,
            data.len()
        )));
    }
    Ok(RData::Unknown(data))
}

fn eui_to_text(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join("-")
}

fn parse_eui(s: &str, out: &mut [u8]) -> DNSResult<()> {
    let parts: Vec<&str> = s.split('-').collect();
    if parts.len() != out.len() {
        return Err(DNSError::RRInvalid(format!("bad EUI address <{}>", s)));
    }
    for (i, part) in parts.iter().enumerate() {
        out[i] = u8::from_str_radix(part, 16)
            .map_err(|_| DNSError::RRInvalid(format!("bad EUI address <{}>", s)))?;
    }
    Ok(())
}

/// Mnemonic for a type code, falling back to the RFC 3597 `TYPEnnn` form.
pub(crate) fn type_mnemonic(code: u16) -> String {
    match QType::try_from(code) {
        Ok(qt) => format!("{:?}", qt),
        Err(_) => format!("TYPE{}", code),
    }
}

/// The reverse: a mnemonic or `TYPEnnn` back to the numeric code.
pub(crate) fn type_from_mnemonic(s: &str) -> DNSResult<u16> {
    if let Some(num) = s.strip_prefix("TYPE") {
        return num
            .parse()
            .map_err(|_| DNSError::RRInvalid(format!("bad type mnemonic <{}>", s)));
    }
    QType::from_str(s)
        .map(|qt| qt as u16)
        .map_err(DNSError::RRInvalid)
}

// token accessors shared by every handler's from_text
pub(crate) fn field<'a>(tokens: &[&'a str], index: usize, what: &str) -> DNSResult<&'a str> {
    tokens
        .get(index)
        .copied()
        .ok_or_else(|| DNSError::RRInvalid(format!("missing {} field", what)))
}

pub(crate) fn number<T: FromStr>(tokens: &[&str], index: usize, what: &str) -> DNSResult<T> {
    field(tokens, index, what)?
        .parse()
        .map_err(|_| DNSError::RRInvalid(format!("bad {} field", what)))
}
