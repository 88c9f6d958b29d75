//! A client-side DNS resolver and updater library.
//!
//! The crate builds queries, sends them over UDP or TCP to the configured
//! name servers, parses the binary responses into typed resource records and
//! optionally caches and signs them. Besides plain lookups it speaks dynamic
//! updates (RFC 2136), full zone transfers (AXFR), TSIG and SIG(0) transaction
//! signatures, and EDNS(0) for DNSSEC-aware answers.
//!
//! ```no_run
//! use netdns::config::ResolverConfig;
//! use netdns::resolver::Resolver;
//! use netdns::rfc1035::{QClass, QType};
//!
//! fn main() -> netdns::error::DNSResult<()> {
//!     let config = ResolverConfig::with_nameservers(&["8.8.8.8"])?;
//!     let mut resolver = Resolver::new(config)?;
//!
//!     let response = resolver.query("google.com", QType::A, QClass::IN)?;
//!     for answer in &response.answers {
//!         println!("{}", answer);
//!     }
//!     Ok(())
//! }
//! ```
pub mod cache;
pub mod config;
pub mod error;
pub mod macros;
pub mod network_order;
pub mod query;
pub mod rdata;
pub mod resolver;
pub mod response;
pub mod rfc1035;
pub mod sig0;
pub mod transport;
pub mod tsig;
pub mod update;
pub mod util;
