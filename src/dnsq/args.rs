//! Manage command line arguments here.
use clap::{App, Arg};
use std::str::FromStr;

use netdns::error::{DNSError, DNSResult};
use netdns::rfc1035::QType;

/// This structure holds the command line arguments.
#[derive(Debug, Default)]
pub struct CliOptions {
    pub qtype: QType,
    pub ns: Option<String>,
    pub domain: String,
    pub tcp: bool,
    pub dnssec: bool,
    pub timeout: u64,
    pub debug: bool,
}

impl CliOptions {
    pub fn options() -> DNSResult<Self> {
        let matches = App::new("dnsq")
            .version("0.1")
            .about(
                r#"A simple DNS query client

            Resolves a domain against a given name server, or against the
            servers found in /etc/resolv.conf when none is given.
            "#,
            )
            .arg(
                Arg::new("qtype")
                    .short('q')
                    .long("qtype")
                    .default_value("A")
                    .long_help("record type to query (A, AAAA, MX, SOA, AXFR, ...)")
                    .takes_value(true),
            )
            .arg(
                Arg::new("ns")
                    .short('n')
                    .long("ns")
                    .required(false)
                    .long_help("DNS server to address")
                    .takes_value(true),
            )
            .arg(
                Arg::new("domain")
                    .short('d')
                    .long("domain")
                    .required(true)
                    .long_help("domain to query")
                    .takes_value(true),
            )
            .arg(
                Arg::new("tcp")
                    .short('t')
                    .long("tcp")
                    .required(false)
                    .long_help("force TCP transport")
                    .takes_value(false),
            )
            .arg(
                Arg::new("dnssec")
                    .short('s')
                    .long("dnssec")
                    .required(false)
                    .long_help("set the EDNS0 DO bit and a 4000-byte payload")
                    .takes_value(false),
            )
            .arg(
                Arg::new("timeout")
                    .long("timeout")
                    .default_value("5")
                    .long_help("per-exchange timeout in seconds")
                    .takes_value(true),
            )
            .arg(
                Arg::new("debug")
                    .short('g')
                    .long("debug")
                    .required(false)
                    .long_help("debug mode")
                    .takes_value(false),
            )
            .get_matches();

        // save all cli options into a structure
        let mut options = CliOptions::default();

        options.domain = String::from(matches.value_of("domain").unwrap_or_default());
        options.ns = matches.value_of("ns").map(String::from);
        options.qtype = QType::from_str(
            &matches
                .value_of("qtype")
                .unwrap_or("A")
                .to_uppercase(),
        )
        .map_err(DNSError::RRInvalid)?;
        options.tcp = matches.is_present("tcp");
        options.dnssec = matches.is_present("dnssec");
        options.timeout = matches
            .value_of("timeout")
            .unwrap_or("5")
            .parse()
            .map_err(|_| DNSError::NSInvalidEntry("bad timeout value".to_string()))?;
        options.debug = matches.is_present("debug");

        Ok(options)
    }
}
