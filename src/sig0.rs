//! SIG(0) transaction signatures (RFC 2931): an asymmetric signature over the
//! message carried in a SIG record with an empty type-covered field.
//!
//! The private-key loader lives outside the library; the core only consumes
//! the [`KeySigner`] contract it returns. The signer's domain name inside the
//! record is never compressed.
use crate::error::{DNSError, DNSResult};
use crate::network_order::{PacketBuffer, ToNetworkOrder};
use crate::query::increment_arcount;
use crate::rdata::{RData, RRSIG};
use crate::rfc1035::{DNSResourceRecord, DomainName, QClass, QType};
use crate::tsig::unix_now;

/// Signatures are valid from "now" to "now + 500s".
pub const SIG0_VALIDITY_WINDOW: u32 = 500;

/// Security algorithm numbers this library will emit
/// (https://www.iana.org/assignments/dns-sec-alg-numbers).
pub mod algorithm {
    pub const RSAMD5: u8 = 1;
    pub const DSA: u8 = 3;
    pub const RSASHA1: u8 = 5;
    pub const RSASHA256: u8 = 8;
    pub const RSASHA512: u8 = 10;
}

/// What a loaded private key must provide: its identity and a handle that can
/// sign arbitrary bytes.
pub trait KeySigner: std::fmt::Debug {
    fn algorithm(&self) -> u8;
    fn key_tag(&self) -> u16;
    fn signer_name(&self) -> &DomainName;
    fn sign(&self, data: &[u8]) -> DNSResult<Vec<u8>>;
}

/// Only the RSA variants and DSA are supported.
pub fn check_algorithm(code: u8) -> DNSResult<()> {
    match code {
        algorithm::RSAMD5
        | algorithm::DSA
        | algorithm::RSASHA1
        | algorithm::RSASHA256
        | algorithm::RSASHA512 => Ok(()),
        other => Err(DNSError::SignerInvalidAlgorithm(other)),
    }
}

/// Sign the message assembled in `buffer`, append the SIG(0) record to the
/// additional section and fix up ARCOUNT. The signature is computed over the
/// SIG rdata with an empty signature field followed by the unsigned message
/// (RFC 2931 §4).
pub(crate) fn append_signature(buffer: &mut PacketBuffer, signer: &dyn KeySigner) -> DNSResult<()> {
    check_algorithm(signer.algorithm())?;

    let now = unix_now()? as u32;
    let mut sig = RRSIG {
        type_covered: 0,
        algorithm: signer.algorithm(),
        labels: signer.signer_name().label_count(),
        original_ttl: 0,
        expiration: now.wrapping_add(SIG0_VALIDITY_WINDOW),
        inception: now,
        key_tag: signer.key_tag(),
        signer: signer.signer_name().clone(),
        signature: Vec::new(),
    };

    let mut data = sig.to_presigned_bytes();
    data.extend_from_slice(buffer);
    sig.signature = signer.sign(&data)?;

    let record = DNSResourceRecord {
        name: DomainName::root(),
        type_code: QType::SIG as u16,
        class: QClass::ANY as u16,
        ttl: 0,
        rd_length: 0,
        r_data: RData::SIG(sig),
    };
    record.to_network_bytes(buffer)?;

    increment_arcount(buffer);
    Ok(())
}
