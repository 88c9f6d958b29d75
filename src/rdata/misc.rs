//! Rdata layouts collected from the service, security and addressing RFCs:
//! SRV, NAPTR, CAA, SSHFP, TLSA/SMIMEA, URI, LOC, KX, CSYNC, HIP, ZONEMD.
use byteorder::{ReadBytesExt, WriteBytesExt};
use std::fmt;
use std::io::Cursor;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::error::{DNSError, DNSResult};
use crate::network_order::primitive::read_bytes;
use crate::network_order::{FromNetworkOrder, PacketBuffer, ToNetworkOrder};
use crate::rdata::dnssec::TypeBitMaps;
use crate::rdata::{field, number};
use crate::rfc1035::{CharacterString, DomainName};
use crate::util;

use dns_derive::DnsStruct;

// SRV RR: https://datatracker.ietf.org/doc/html/rfc2782
#[derive(Debug, Default, Clone, DnsStruct)]
pub struct SRV {
    pub priority: u16,
    pub weight: u16,
    pub port: u16,
    pub target: DomainName,
}

impl SRV {
    pub fn from_text(tokens: &[&str]) -> DNSResult<Self> {
        Ok(SRV {
            priority: number(tokens, 0, "priority")?,
            weight: number(tokens, 1, "weight")?,
            port: number(tokens, 2, "port")?,
            target: DomainName::try_from(field(tokens, 3, "target")?)?,
        })
    }
}

impl fmt::Display for SRV {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.priority, self.weight, self.port, self.target
        )
    }
}

// KX RR: https://datatracker.ietf.org/doc/html/rfc2230
#[derive(Debug, Default, Clone, DnsStruct)]
pub struct KX {
    pub preference: u16,
    pub exchanger: DomainName,
}

impl KX {
    pub fn from_text(tokens: &[&str]) -> DNSResult<Self> {
        Ok(KX {
            preference: number(tokens, 0, "preference")?,
            exchanger: DomainName::try_from(field(tokens, 1, "exchanger")?)?,
        })
    }
}

impl fmt::Display for KX {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.preference, self.exchanger)
    }
}

// NAPTR RR: https://datatracker.ietf.org/doc/html/rfc3403
#[derive(Debug, Default, Clone, DnsStruct)]
pub struct NAPTR {
    pub order: u16,
    pub preference: u16,
    pub flags: CharacterString,
    pub services: CharacterString,
    pub regexp: CharacterString,
    pub replacement: DomainName,
}

impl NAPTR {
    pub fn from_text(tokens: &[&str]) -> DNSResult<Self> {
        Ok(NAPTR {
            order: number(tokens, 0, "order")?,
            preference: number(tokens, 1, "preference")?,
            flags: CharacterString::from(util::unquote(field(tokens, 2, "flags")?)),
            services: CharacterString::from(util::unquote(field(tokens, 3, "services")?)),
            regexp: CharacterString::from(util::unquote(field(tokens, 4, "regexp")?)),
            replacement: DomainName::try_from(field(tokens, 5, "replacement")?)?,
        })
    }
}

impl fmt::Display for NAPTR {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} \"{}\" \"{}\" \"{}\" {}",
            self.order, self.preference, self.flags, self.services, self.regexp, self.replacement
        )
    }
}

// CAA RR: https://datatracker.ietf.org/doc/html/rfc8659
#[derive(Debug, Default, Clone)]
pub struct CAA {
    pub flags: u8,
    pub tag: CharacterString,
    pub value: String,
}

impl CAA {
    pub fn from_wire(buffer: &mut Cursor<&[u8]>, end: u64) -> DNSResult<Self> {
        let mut caa = CAA {
            flags: buffer.read_u8()?,
            ..CAA::default()
        };
        caa.tag.from_network_bytes(buffer)?;
        let remaining = end.saturating_sub(buffer.position()) as usize;
        caa.value = String::from_utf8_lossy(&read_bytes(buffer, remaining)?).into_owned();
        Ok(caa)
    }

    pub fn from_text(tokens: &[&str]) -> DNSResult<Self> {
        Ok(CAA {
            flags: number(tokens, 0, "flags")?,
            tag: CharacterString::from(field(tokens, 1, "tag")?),
            value: util::unquote(field(tokens, 2, "value")?).to_string(),
        })
    }
}

impl ToNetworkOrder for CAA {
    fn to_network_bytes(&self, buffer: &mut PacketBuffer) -> DNSResult<usize> {
        let mut length = self.flags.to_network_bytes(buffer)?;
        length += self.tag.to_network_bytes(buffer)?;
        buffer.extend_from_slice(self.value.as_bytes());
        Ok(length + self.value.len())
    }
}

impl fmt::Display for CAA {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} \"{}\"", self.flags, self.tag, self.value)
    }
}

// SSHFP RR: https://datatracker.ietf.org/doc/html/rfc4255
#[derive(Debug, Default, Clone)]
pub struct SSHFP {
    pub algorithm: u8,
    pub fp_type: u8,
    pub fingerprint: Vec<u8>,
}

impl SSHFP {
    pub fn from_wire(buffer: &mut Cursor<&[u8]>, end: u64) -> DNSResult<Self> {
        let mut sshfp = SSHFP {
            algorithm: buffer.read_u8()?,
            fp_type: buffer.read_u8()?,
            ..SSHFP::default()
        };
        let remaining = end.saturating_sub(buffer.position()) as usize;
        sshfp.fingerprint = read_bytes(buffer, remaining)?;
        Ok(sshfp)
    }

    pub fn from_text(tokens: &[&str]) -> DNSResult<Self> {
        Ok(SSHFP {
            algorithm: number(tokens, 0, "algorithm")?,
            fp_type: number(tokens, 1, "fingerprint type")?,
            fingerprint: util::from_hex(&tokens[2..].concat())?,
        })
    }
}

impl ToNetworkOrder for SSHFP {
    fn to_network_bytes(&self, buffer: &mut PacketBuffer) -> DNSResult<usize> {
        let mut length = self.algorithm.to_network_bytes(buffer)?;
        length += self.fp_type.to_network_bytes(buffer)?;
        length += self.fingerprint.to_network_bytes(buffer)?;
        Ok(length)
    }
}

impl fmt::Display for SSHFP {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.algorithm,
            self.fp_type,
            util::to_hex(&self.fingerprint)
        )
    }
}

// TLSA RR: https://datatracker.ietf.org/doc/html/rfc6698
// SMIMEA (RFC 8162) shares the exact same layout.
#[derive(Debug, Default, Clone)]
pub struct TLSA {
    pub cert_usage: u8,
    pub selector: u8,
    pub matching_type: u8,
    pub certificate: Vec<u8>,
}

impl TLSA {
    pub fn from_wire(buffer: &mut Cursor<&[u8]>, end: u64) -> DNSResult<Self> {
        let mut tlsa = TLSA {
            cert_usage: buffer.read_u8()?,
            selector: buffer.read_u8()?,
            matching_type: buffer.read_u8()?,
            ..TLSA::default()
        };
        let remaining = end.saturating_sub(buffer.position()) as usize;
        tlsa.certificate = read_bytes(buffer, remaining)?;
        Ok(tlsa)
    }

    pub fn from_text(tokens: &[&str]) -> DNSResult<Self> {
        Ok(TLSA {
            cert_usage: number(tokens, 0, "certificate usage")?,
            selector: number(tokens, 1, "selector")?,
            matching_type: number(tokens, 2, "matching type")?,
            certificate: util::from_hex(&tokens[3..].concat())?,
        })
    }
}

impl ToNetworkOrder for TLSA {
    fn to_network_bytes(&self, buffer: &mut PacketBuffer) -> DNSResult<usize> {
        let mut length = self.cert_usage.to_network_bytes(buffer)?;
        length += self.selector.to_network_bytes(buffer)?;
        length += self.matching_type.to_network_bytes(buffer)?;
        length += self.certificate.to_network_bytes(buffer)?;
        Ok(length)
    }
}

impl fmt::Display for TLSA {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.cert_usage,
            self.selector,
            self.matching_type,
            util::to_hex(&self.certificate)
        )
    }
}

// URI RR: https://datatracker.ietf.org/doc/html/rfc7553
#[derive(Debug, Default, Clone)]
pub struct URI {
    pub priority: u16,
    pub weight: u16,
    pub target: String,
}

impl URI {
    pub fn from_wire(buffer: &mut Cursor<&[u8]>, end: u64) -> DNSResult<Self> {
        let mut uri = URI {
            priority: buffer.read_u16::<byteorder::BigEndian>()?,
            weight: buffer.read_u16::<byteorder::BigEndian>()?,
            ..URI::default()
        };
        let remaining = end.saturating_sub(buffer.position()) as usize;
        uri.target = String::from_utf8_lossy(&read_bytes(buffer, remaining)?).into_owned();
        Ok(uri)
    }

    pub fn from_text(tokens: &[&str]) -> DNSResult<Self> {
        Ok(URI {
            priority: number(tokens, 0, "priority")?,
            weight: number(tokens, 1, "weight")?,
            target: util::unquote(field(tokens, 2, "target")?).to_string(),
        })
    }
}

impl ToNetworkOrder for URI {
    fn to_network_bytes(&self, buffer: &mut PacketBuffer) -> DNSResult<usize> {
        let mut length = self.priority.to_network_bytes(buffer)?;
        length += self.weight.to_network_bytes(buffer)?;
        buffer.extend_from_slice(self.target.as_bytes());
        Ok(length + self.target.len())
    }
}

impl fmt::Display for URI {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} \"{}\"", self.priority, self.weight, self.target)
    }
}

// LOC RR: https://datatracker.ietf.org/doc/html/rfc1876
//
// Latitude/longitude are thousandths of an arc second offset by 2^31;
// altitude is centimeters above a base 100000m below sea level; the three
// precision fields use a 4-bit mantissa / 4-bit power-of-ten encoding in
// centimeters.
#[derive(Debug, Default, Clone, DnsStruct)]
pub struct LOC {
    pub version: u8,
    pub size: u8,
    pub horiz_pre: u8,
    pub vert_pre: u8,
    pub latitude: u32,
    pub longitude: u32,
    pub altitude: u32,
}

const LOC_EQUATOR: i64 = 1 << 31;
const LOC_ALTITUDE_BASE: i64 = 10_000_000;

impl LOC {
    pub fn from_text(tokens: &[&str]) -> DNSResult<Self> {
        // latitude then longitude, each "deg [min [sec]] hemisphere"
        let (latitude, used_lat) = parse_coordinate(tokens, 'N', 'S')?;
        let rest = &tokens[used_lat..];
        let (longitude, used_lon) = parse_coordinate(rest, 'E', 'W')?;
        let rest = &rest[used_lon..];

        let alt_m: f64 = strip_meters(field(rest, 0, "altitude")?).parse().map_err(|_| {
            DNSError::RRInvalid("bad altitude".to_string())
        })?;
        let altitude = (alt_m * 100.0).round() as i64 + LOC_ALTITUDE_BASE;

        let mut loc = LOC {
            version: 0,
            size: encode_precision(rest.get(1).copied(), 100)?, // 1m
            horiz_pre: encode_precision(rest.get(2).copied(), 1_000_000)?, // 10000m
            vert_pre: encode_precision(rest.get(3).copied(), 1_000)?, // 10m
            latitude: 0,
            longitude: 0,
            altitude: altitude as u32,
        };
        loc.latitude = latitude;
        loc.longitude = longitude;
        Ok(loc)
    }
}

impl fmt::Display for LOC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let alt = self.altitude as i64 - LOC_ALTITUDE_BASE;
        write!(
            f,
            "{} {} {}m {} {} {}",
            coordinate_to_text(self.latitude, 'N', 'S'),
            coordinate_to_text(self.longitude, 'E', 'W'),
            format_cm(alt),
            precision_to_text(self.size),
            precision_to_text(self.horiz_pre),
            precision_to_text(self.vert_pre)
        )
    }
}

fn format_cm(cm: i64) -> String {
    if cm % 100 == 0 {
        format!("{}", cm / 100)
    } else {
        format!("{}.{:02}", cm / 100, (cm % 100).abs())
    }
}

fn coordinate_to_text(value: u32, positive: char, negative: char) -> String {
    let arc = value as i64 - LOC_EQUATOR;
    let hemisphere = if arc < 0 { negative } else { positive };
    let abs = arc.abs();

    let degrees = abs / 3_600_000;
    let minutes = (abs % 3_600_000) / 60_000;
    let msec = abs % 60_000;
    format!(
        "{} {} {}.{:03} {}",
        degrees,
        minutes,
        msec / 1000,
        msec % 1000,
        hemisphere
    )
}

// consumes "deg [min [sec]] {N|S|E|W}", returns the wire value and the number
// of tokens eaten
fn parse_coordinate(tokens: &[&str], positive: char, negative: char) -> DNSResult<(u32, usize)> {
    let mut millis: i64 = 0;
    let mut used = 0usize;

    let degrees: i64 = number(tokens, 0, "degrees")?;
    millis += degrees * 3_600_000;
    used += 1;

    for scale in [60_000i64, 1_000] {
        match tokens.get(used).and_then(|tok| tok.parse::<f64>().ok()) {
            Some(v) => {
                millis += (v * scale as f64).round() as i64;
                used += 1;
            }
            None => break,
        }
    }

    let hemisphere = field(tokens, used, "hemisphere")?;
    used += 1;
    let signed = match hemisphere.chars().next() {
        Some(c) if c == positive => millis,
        Some(c) if c == negative => -millis,
        _ => {
            return Err(DNSError::RRInvalid(format!(
                "bad hemisphere <{}>",
                hemisphere
            )))
        }
    };

    Ok(((signed + LOC_EQUATOR) as u32, used))
}

fn strip_meters(s: &str) -> &str {
    s.strip_suffix('m').unwrap_or(s)
}

fn precision_to_text(encoded: u8) -> String {
    let mantissa = (encoded >> 4) as u64;
    let exponent = (encoded & 0x0F) as u32;
    let cm = mantissa * 10u64.pow(exponent.min(9));
    format!("{}m", format_cm(cm as i64))
}

fn encode_precision(token: Option<&str>, default_cm: u64) -> DNSResult<u8> {
    let mut cm = match token {
        None => default_cm,
        Some(tok) => {
            let meters: f64 = strip_meters(tok)
                .parse()
                .map_err(|_| DNSError::RRInvalid(format!("bad precision <{}>", tok)))?;
            (meters * 100.0).round() as u64
        }
    };

    let mut exponent = 0u8;
    while cm >= 10 && cm % 10 == 0 {
        cm /= 10;
        exponent += 1;
    }
    if cm > 9 {
        return Err(DNSError::RRInvalid(
            "precision mantissa out of range".to_string(),
        ));
    }
    Ok((cm as u8) << 4 | exponent)
}

// CSYNC RR: https://datatracker.ietf.org/doc/html/rfc7477
#[derive(Debug, Default, Clone)]
pub struct CSYNC {
    pub soa_serial: u32,
    pub flags: u16,
    pub types: TypeBitMaps,
}

impl CSYNC {
    pub fn from_wire(buffer: &mut Cursor<&[u8]>, end: u64) -> DNSResult<Self> {
        Ok(CSYNC {
            soa_serial: buffer.read_u32::<byteorder::BigEndian>()?,
            flags: buffer.read_u16::<byteorder::BigEndian>()?,
            types: TypeBitMaps::from_wire(buffer, end)?,
        })
    }

    pub fn from_text(tokens: &[&str]) -> DNSResult<Self> {
        Ok(CSYNC {
            soa_serial: number(tokens, 0, "soa serial")?,
            flags: number(tokens, 1, "flags")?,
            types: TypeBitMaps::from_text(&tokens[2..])?,
        })
    }
}

impl ToNetworkOrder for CSYNC {
    fn to_network_bytes(&self, buffer: &mut PacketBuffer) -> DNSResult<usize> {
        let mut length = self.soa_serial.to_network_bytes(buffer)?;
        length += self.flags.to_network_bytes(buffer)?;
        length += self.types.to_network_bytes(buffer)?;
        Ok(length)
    }
}

impl fmt::Display for CSYNC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.soa_serial, self.flags, self.types)
    }
}

// HIP RR: https://datatracker.ietf.org/doc/html/rfc8005
#[derive(Debug, Default, Clone)]
pub struct HIP {
    pub pk_algorithm: u8,
    pub hit: Vec<u8>,
    pub public_key: Vec<u8>,
    pub servers: Vec<DomainName>,
}

impl HIP {
    pub fn from_wire(buffer: &mut Cursor<&[u8]>, end: u64) -> DNSResult<Self> {
        let hit_len = buffer.read_u8()? as usize;
        let pk_algorithm = buffer.read_u8()?;
        let pk_len = buffer.read_u16::<byteorder::BigEndian>()? as usize;

        let mut hip = HIP {
            pk_algorithm,
            hit: read_bytes(buffer, hit_len)?,
            public_key: read_bytes(buffer, pk_len)?,
            servers: Vec::new(),
        };

        // rendezvous servers, uncompressed names, run to the end of the rdata
        while buffer.position() < end {
            let mut server = DomainName::default();
            server.from_network_bytes(buffer)?;
            hip.servers.push(server);
        }

        Ok(hip)
    }

    pub fn from_text(tokens: &[&str]) -> DNSResult<Self> {
        let mut hip = HIP {
            pk_algorithm: number(tokens, 0, "pk algorithm")?,
            hit: util::from_hex(field(tokens, 1, "hit")?)?,
            public_key: BASE64
                .decode(field(tokens, 2, "public key")?)
                .map_err(|e| DNSError::RRInvalid(format!("bad base64 public key: {}", e)))?,
            servers: Vec::new(),
        };
        for tok in &tokens[3..] {
            hip.servers.push(DomainName::try_from(*tok)?);
        }
        Ok(hip)
    }
}

impl ToNetworkOrder for HIP {
    fn to_network_bytes(&self, buffer: &mut PacketBuffer) -> DNSResult<usize> {
        buffer.write_u8(self.hit.len() as u8)?;
        buffer.write_u8(self.pk_algorithm)?;
        buffer.write_u16::<byteorder::BigEndian>(self.public_key.len() as u16)?;
        buffer.extend_from_slice(&self.hit);
        buffer.extend_from_slice(&self.public_key);
        let mut length = 4 + self.hit.len() + self.public_key.len();

        let compression = buffer.compression_enabled();
        buffer.set_compression(false);
        for server in &self.servers {
            length += server.to_network_bytes(buffer)?;
        }
        buffer.set_compression(compression);

        Ok(length)
    }
}

impl fmt::Display for HIP {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.pk_algorithm,
            util::to_hex(&self.hit),
            BASE64.encode(&self.public_key)
        )?;
        for server in &self.servers {
            write!(f, " {}", server)?;
        }
        Ok(())
    }
}

// ZONEMD RR: https://datatracker.ietf.org/doc/html/rfc8976
#[derive(Debug, Default, Clone)]
pub struct ZONEMD {
    pub serial: u32,
    pub scheme: u8,
    pub hash_algorithm: u8,
    pub digest: Vec<u8>,
}

impl ZONEMD {
    pub fn from_wire(buffer: &mut Cursor<&[u8]>, end: u64) -> DNSResult<Self> {
        let mut zonemd = ZONEMD {
            serial: buffer.read_u32::<byteorder::BigEndian>()?,
            scheme: buffer.read_u8()?,
            hash_algorithm: buffer.read_u8()?,
            ..ZONEMD::default()
        };
        let remaining = end.saturating_sub(buffer.position()) as usize;
        zonemd.digest = read_bytes(buffer, remaining)?;
        Ok(zonemd)
    }

    pub fn from_text(tokens: &[&str]) -> DNSResult<Self> {
        Ok(ZONEMD {
            serial: number(tokens, 0, "serial")?,
            scheme: number(tokens, 1, "scheme")?,
            hash_algorithm: number(tokens, 2, "hash algorithm")?,
            digest: util::from_hex(&tokens[3..].concat())?,
        })
    }
}

impl ToNetworkOrder for ZONEMD {
    fn to_network_bytes(&self, buffer: &mut PacketBuffer) -> DNSResult<usize> {
        let mut length = self.serial.to_network_bytes(buffer)?;
        length += self.scheme.to_network_bytes(buffer)?;
        length += self.hash_algorithm.to_network_bytes(buffer)?;
        length += self.digest.to_network_bytes(buffer)?;
        Ok(length)
    }
}

impl fmt::Display for ZONEMD {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.serial,
            self.scheme,
            self.hash_algorithm,
            util::to_hex(&self.digest)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_to_network;

    #[test]
    fn srv_round_trip() {
        let srv = SRV::from_text(&["0", "5", "5060", "sip.example.com."]).unwrap();
        let (bytes, _) = test_to_network!(srv);

        let mut cursor = Cursor::new(bytes.as_slice());
        let mut back = SRV::default();
        back.from_network_bytes(&mut cursor).unwrap();
        assert_eq!(back.port, 5060);
        assert_eq!(back.target.to_string(), "sip.example.com.");
        assert_eq!(back.to_string(), "0 5 5060 sip.example.com.");
    }

    #[test]
    fn caa_round_trip() {
        let caa = CAA::from_text(&["0", "issue", "\"letsencrypt.org\""]).unwrap();
        assert_eq!(caa.to_string(), "0 issue \"letsencrypt.org\"");

        let (bytes, _) = test_to_network!(caa);
        // flags, tag length, tag, then the raw value
        assert_eq!(bytes[0], 0);
        assert_eq!(bytes[1], 5);

        let mut cursor = Cursor::new(bytes.as_slice());
        let back = CAA::from_wire(&mut cursor, bytes.len() as u64).unwrap();
        assert_eq!(back.tag.to_string(), "issue");
        assert_eq!(back.value, "letsencrypt.org");
    }

    #[test]
    fn tlsa_round_trip() {
        let tlsa = TLSA::from_text(&["3", "1", "1", "d2abde240d7cd3ee6b4b28c54df034b9"]).unwrap();
        let (bytes, _) = test_to_network!(tlsa);

        let mut cursor = Cursor::new(bytes.as_slice());
        let back = TLSA::from_wire(&mut cursor, bytes.len() as u64).unwrap();
        assert_eq!(back.cert_usage, 3);
        assert_eq!(back.certificate.len(), 16);
        assert_eq!(
            back.to_string(),
            "3 1 1 d2abde240d7cd3ee6b4b28c54df034b9"
        );
    }

    #[test]
    fn loc_text_round_trip() {
        let tokens = vec![
            "52", "22", "23.000", "N", "4", "53", "32.000", "E", "-2m", "0m", "10000m", "10m",
        ];
        let loc = LOC::from_text(&tokens).unwrap();
        assert_eq!(
            loc.to_string(),
            "52 22 23.000 N 4 53 32.000 E -2m 0m 10000m 10m"
        );

        // degrees only
        let short = LOC::from_text(&["31", "S", "25", "E", "20m"]).unwrap();
        assert_eq!(short.to_string(), "31 0 0.000 S 25 0 0.000 E 20m 1m 10000m 10m");
    }

    #[test]
    fn csync_round_trip() {
        let csync = CSYNC::from_text(&["66", "3", "A", "NS", "AAAA"]).unwrap();
        let (bytes, _) = test_to_network!(csync);

        let mut cursor = Cursor::new(bytes.as_slice());
        let back = CSYNC::from_wire(&mut cursor, bytes.len() as u64).unwrap();
        assert_eq!(back.soa_serial, 66);
        assert_eq!(back.types.0, vec![1, 2, 28]);
        assert_eq!(back.to_string(), "66 3 A NS AAAA");
    }

    #[test]
    fn hip_round_trip() {
        let tokens = vec![
            "2",
            "200100107b1a74df365639cc39f1d578",
            "AwEAAbdxyhNuSutc5EMzxTs9LBPCIkOFH8cIvM4p9+LrV4e19WzK00+CI6zBCQTdtWsuxKbWIy87UOoJTwkUs7lBu+Upr1gsNrut79ryra+bSRGQb1slImA8YVJyuIDsj7kwzG7jnERNqnWxZ48AWkskmdHaVDP4BcelrTI3rMXdXF5D",
            "rvs.example.com.",
        ];
        let hip = HIP::from_text(&tokens).unwrap();
        assert_eq!(hip.hit.len(), 16);
        assert_eq!(hip.servers.len(), 1);

        let (bytes, _) = test_to_network!(hip);
        let mut cursor = Cursor::new(bytes.as_slice());
        let back = HIP::from_wire(&mut cursor, bytes.len() as u64).unwrap();
        assert_eq!(back.hit, hip.hit);
        assert_eq!(back.public_key, hip.public_key);
        assert_eq!(back.servers[0].to_string(), "rvs.example.com.");
    }
}
