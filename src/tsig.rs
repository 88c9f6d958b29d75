//! Transaction signatures (RFC 2845): a shared-secret HMAC computed over the
//! assembled message plus a pseudo-record of the TSIG fields, appended as the
//! last record of the additional section.
use hmac::{Hmac, Mac};
use md5::Md5;
use sha1::Sha1;
use sha2::{Sha224, Sha256, Sha384, Sha512};
use std::time::{SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::error::{DNSError, DNSResult};
use crate::network_order::{PacketBuffer, ToNetworkOrder};
use crate::query::increment_arcount;
use crate::rdata::{RData, TSIG};
use crate::rfc1035::{DNSResourceRecord, DomainName, QClass, QType};

/// Permitted clock skew, in seconds, advertised in the TSIG record.
pub const TSIG_FUDGE: u16 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TsigAlgorithm {
    HmacMd5,
    HmacSha1,
    HmacSha224,
    HmacSha256,
    HmacSha384,
    HmacSha512,
}

impl TsigAlgorithm {
    /// The algorithm's domain-name identifier carried in the TSIG rdata.
    pub fn name(&self) -> &'static str {
        match self {
            TsigAlgorithm::HmacMd5 => "hmac-md5.sig-alg.reg.int",
            TsigAlgorithm::HmacSha1 => "hmac-sha1",
            TsigAlgorithm::HmacSha224 => "hmac-sha224",
            TsigAlgorithm::HmacSha256 => "hmac-sha256",
            TsigAlgorithm::HmacSha384 => "hmac-sha384",
            TsigAlgorithm::HmacSha512 => "hmac-sha512",
        }
    }

    pub fn from_name(name: &DomainName) -> DNSResult<Self> {
        let flat = name.to_string().to_lowercase();
        let flat = flat.trim_end_matches('.');
        match flat {
            "hmac-md5.sig-alg.reg.int" => Ok(TsigAlgorithm::HmacMd5),
            "hmac-sha1" => Ok(TsigAlgorithm::HmacSha1),
            "hmac-sha224" => Ok(TsigAlgorithm::HmacSha224),
            "hmac-sha256" => Ok(TsigAlgorithm::HmacSha256),
            "hmac-sha384" => Ok(TsigAlgorithm::HmacSha384),
            "hmac-sha512" => Ok(TsigAlgorithm::HmacSha512),
            _ => Err(DNSError::SignerUnavailable(format!(
                "unknown TSIG algorithm <{}>",
                name
            ))),
        }
    }

    /// Size of the MAC this algorithm produces.
    pub fn mac_size(&self) -> usize {
        match self {
            TsigAlgorithm::HmacMd5 => 16,
            TsigAlgorithm::HmacSha1 => 20,
            TsigAlgorithm::HmacSha224 => 28,
            TsigAlgorithm::HmacSha256 => 32,
            TsigAlgorithm::HmacSha384 => 48,
            TsigAlgorithm::HmacSha512 => 64,
        }
    }
}

/// A named shared secret for signing queries and updates.
#[derive(Debug, Clone)]
pub struct TsigKey {
    pub name: DomainName,
    pub algorithm: TsigAlgorithm,
    secret: Vec<u8>,
}

impl TsigKey {
    /// Key secrets are exchanged in base64, as `dnssec-keygen` emits them.
    pub fn new(name: &str, algorithm: TsigAlgorithm, secret_base64: &str) -> DNSResult<Self> {
        let secret = BASE64
            .decode(secret_base64)
            .map_err(|e| DNSError::SignerUnavailable(format!("bad base64 key secret: {}", e)))?;

        Ok(TsigKey {
            name: DomainName::try_from(name)?,
            algorithm,
            secret,
        })
    }

    /// Sign `message` as of now and return the filled TSIG rdata.
    pub fn sign(&self, message: &[u8], original_id: u16) -> DNSResult<TSIG> {
        let time_signed = unix_now()?;
        self.sign_at(message, original_id, time_signed)
    }

    /// Same, with the timestamp supplied, so exchanges can be replayed.
    pub fn sign_at(&self, message: &[u8], original_id: u16, time_signed: u64) -> DNSResult<TSIG> {
        let mut record = TSIG {
            algorithm: DomainName::try_from(self.algorithm.name())?,
            time_signed,
            fudge: TSIG_FUDGE,
            mac: Vec::new(),
            original_id,
            error: 0,
            other: Vec::new(),
        };

        record.mac = self.compute_mac(&self.digest_input(message, &record))?;
        Ok(record)
    }

    /// Recompute the MAC for a received message (stripped of its TSIG record)
    /// and compare.
    pub fn verify(&self, message: &[u8], record: &TSIG) -> DNSResult<bool> {
        let mac = self.compute_mac(&self.digest_input(message, record))?;
        Ok(mac == record.mac)
    }

    /// The digest input per RFC 2845 §3.4: the whole unsigned message, then
    /// the pseudo-record fields — key name, class ANY, TTL 0, algorithm name,
    /// time, fudge, error and other data. Names enter in canonical
    /// (lowercase, uncompressed) form.
    fn digest_input(&self, message: &[u8], record: &TSIG) -> Vec<u8> {
        let mut data = Vec::with_capacity(message.len() + 64);
        data.extend_from_slice(message);

        data.extend_from_slice(&self.name.to_canonical_bytes());
        data.extend_from_slice(&(QClass::ANY as u16).to_be_bytes());
        data.extend_from_slice(&0u32.to_be_bytes());

        data.extend_from_slice(&record.algorithm.to_canonical_bytes());
        data.extend_from_slice(&record.time_signed.to_be_bytes()[2..]);
        data.extend_from_slice(&record.fudge.to_be_bytes());
        data.extend_from_slice(&record.error.to_be_bytes());
        data.extend_from_slice(&(record.other.len() as u16).to_be_bytes());
        data.extend_from_slice(&record.other);

        data
    }

    pub fn compute_mac(&self, data: &[u8]) -> DNSResult<Vec<u8>> {
        macro_rules! hmac_over {
            ($digest:ty) => {{
                let mut mac = Hmac::<$digest>::new_from_slice(&self.secret)
                    .map_err(|_| DNSError::SignerUnavailable("bad TSIG secret".to_string()))?;
                mac.update(data);
                Ok(mac.finalize().into_bytes().to_vec())
            }};
        }

        match self.algorithm {
            TsigAlgorithm::HmacMd5 => hmac_over!(Md5),
            TsigAlgorithm::HmacSha1 => hmac_over!(Sha1),
            TsigAlgorithm::HmacSha224 => hmac_over!(Sha224),
            TsigAlgorithm::HmacSha256 => hmac_over!(Sha256),
            TsigAlgorithm::HmacSha384 => hmac_over!(Sha384),
            TsigAlgorithm::HmacSha512 => hmac_over!(Sha512),
        }
    }

    /// Sign the message assembled in `buffer`, append the TSIG record to the
    /// additional section and fix up ARCOUNT.
    pub(crate) fn append_signature(
        &self,
        buffer: &mut PacketBuffer,
        original_id: u16,
    ) -> DNSResult<()> {
        let rdata = self.sign(buffer, original_id)?;

        let record = DNSResourceRecord {
            name: self.name.clone(),
            type_code: QType::TSIG as u16,
            class: QClass::ANY as u16,
            ttl: 0,
            rd_length: 0,
            r_data: RData::TSIG(rdata),
        };
        record.to_network_bytes(buffer)?;

        increment_arcount(buffer);
        Ok(())
    }
}

pub(crate) fn unix_now() -> DNSResult<u64> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|_| DNSError::SignerUnavailable("system clock before epoch".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key(algorithm: TsigAlgorithm) -> TsigKey {
        TsigKey::new("local-ddns.", algorithm, "c2VjcmV0c2VjcmV0c2VjcmV0").unwrap()
    }

    #[test]
    fn mac_sizes() {
        let message = b"\x12\x34\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00";
        for algorithm in [
            TsigAlgorithm::HmacMd5,
            TsigAlgorithm::HmacSha1,
            TsigAlgorithm::HmacSha224,
            TsigAlgorithm::HmacSha256,
            TsigAlgorithm::HmacSha384,
            TsigAlgorithm::HmacSha512,
        ] {
            let key = test_key(algorithm);
            let record = key.sign_at(message, 0x1234, 1_600_000_000).unwrap();
            assert_eq!(record.mac.len(), algorithm.mac_size());
        }
    }

    #[test]
    fn sign_then_verify() {
        let key = test_key(TsigAlgorithm::HmacSha256);
        let message = b"\xAB\xCD\x00\x00\x00\x01\x00\x00\x00\x00\x00\x00";

        let record = key.sign_at(message, 0xABCD, 1_600_000_000).unwrap();
        assert!(key.verify(message, &record).unwrap());

        // a tampered message must not verify
        let mut tampered = message.to_vec();
        tampered[2] ^= 0x80;
        assert!(!key.verify(&tampered, &record).unwrap());
    }

    #[test]
    fn deterministic_for_fixed_time() {
        let key = test_key(TsigAlgorithm::HmacSha1);
        let message = b"\x00\x01\x02\x03";
        let a = key.sign_at(message, 1, 1_000_000).unwrap();
        let b = key.sign_at(message, 1, 1_000_000).unwrap();
        assert_eq!(a.mac, b.mac);
    }

    #[test]
    fn algorithm_names_round_trip() {
        for algorithm in [
            TsigAlgorithm::HmacMd5,
            TsigAlgorithm::HmacSha256,
            TsigAlgorithm::HmacSha512,
        ] {
            let name = DomainName::try_from(algorithm.name()).unwrap();
            assert_eq!(TsigAlgorithm::from_name(&name).unwrap(), algorithm);
        }
    }
}
