//! Resolver configuration: the option set, its defaults, and ingestion of
//! resolv.conf-style text handed in by the caller.
use std::net::IpAddr;
use std::path::PathBuf;
use std::str::FromStr;

use log::warn;

use crate::error::{DNSError, DNSResult};
use crate::rfc1035::{DNS_PORT, DNSSEC_PAYLOAD_SIZE, MAX_UDP_PACKET_SIZE};

/// Which backend the resolver should consult around its send loop. The
/// shared-memory and file backends are provided by the application; the
/// library only ships the in-process one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheType {
    None,
    Memory,
    Shared,
    File,
}

impl FromStr for CacheType {
    type Err = DNSError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(CacheType::None),
            "memory" => Ok(CacheType::Memory),
            "shared" => Ok(CacheType::Shared),
            "file" => Ok(CacheType::File),
            other => Err(DNSError::CacheUnsupported(format!(
                "unknown cache type <{}>",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// servers tried in order (or shuffled once per query, see `ns_random`)
    pub nameservers: Vec<IpAddr>,
    pub dns_port: u16,
    /// always use TCP, even for small queries
    pub use_tcp: bool,
    pub local_host: Option<IpAddr>,
    pub local_port: Option<u16>,
    /// per-exchange deadline in seconds
    pub timeout: u64,
    /// shuffle the server list once at the start of each query
    pub ns_random: bool,
    /// default domain appended to single-label names
    pub domain: Option<String>,
    /// suffixes tried in order for unqualified names
    pub search_list: Vec<String>,
    pub cache_type: CacheType,
    pub cache_file: Option<PathBuf>,
    pub cache_size: usize,
    /// serialization hint passed through to external cache backends
    pub cache_serializer: Option<String>,
    /// drop answers whose owner name differs from the question
    pub strict_query_mode: bool,
    /// ask the server to recurse (the RD bit)
    pub recurse: bool,
    /// inject an EDNS0 OPT record with the DO bit
    pub dnssec: bool,
    pub dnssec_ad_flag: bool,
    pub dnssec_cd_flag: bool,
    pub dnssec_payload_size: u16,
    /// honor `options` lines when ingesting resolv.conf text
    pub use_resolv_options: bool,
    pub max_udp_size: u16,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            nameservers: Vec::new(),
            dns_port: DNS_PORT,
            use_tcp: false,
            local_host: None,
            local_port: None,
            timeout: 5,
            ns_random: false,
            domain: None,
            search_list: Vec::new(),
            cache_type: CacheType::None,
            cache_file: None,
            cache_size: 50_000,
            cache_serializer: None,
            strict_query_mode: false,
            recurse: true,
            dnssec: false,
            dnssec_ad_flag: false,
            dnssec_cd_flag: false,
            dnssec_payload_size: DNSSEC_PAYLOAD_SIZE,
            use_resolv_options: false,
            max_udp_size: MAX_UDP_PACKET_SIZE as u16,
        }
    }
}

impl ResolverConfig {
    /// A config pointed at the given servers, everything else default.
    pub fn with_nameservers(servers: &[&str]) -> DNSResult<Self> {
        let mut config = ResolverConfig::default();
        for server in servers {
            config.add_nameserver(server)?;
        }
        Ok(config)
    }

    pub fn add_nameserver(&mut self, address: &str) -> DNSResult<()> {
        let ip: IpAddr = address
            .parse()
            .map_err(|_| DNSError::NSInvalidEntry(format!("bad name server <{}>", address)))?;
        self.nameservers.push(ip);
        Ok(())
    }

    /// Ingest resolv.conf-style text (the caller reads the file). Lines
    /// starting with `#` or `;` are comments; recognized directives are
    /// `nameserver`, `domain`, `search` and — only when `use_resolv_options`
    /// is set — `options timeout:N` (clamped to 1..=30) and `options rotate`.
    pub fn read_resolv_text(&mut self, text: &str) -> DNSResult<()> {
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            let mut tokens = line.split_whitespace();
            match tokens.next() {
                Some("nameserver") => {
                    let address = tokens.next().ok_or_else(|| {
                        DNSError::NSInvalidEntry("nameserver line without address".to_string())
                    })?;
                    self.add_nameserver(address)?;
                }
                Some("domain") => {
                    self.domain = tokens.next().map(|s| s.to_string());
                }
                Some("search") => {
                    self.search_list = tokens.map(|s| s.to_string()).collect();
                }
                Some("options") => {
                    if self.use_resolv_options {
                        for option in tokens {
                            self.apply_resolv_option(option);
                        }
                    }
                }
                Some(other) => {
                    warn!("ignoring resolv.conf directive <{}>", other);
                }
                None => {}
            }
        }
        Ok(())
    }

    fn apply_resolv_option(&mut self, option: &str) {
        if option == "rotate" {
            self.ns_random = true;
        } else if let Some(value) = option.strip_prefix("timeout:") {
            match value.parse::<u64>() {
                Ok(t) => self.timeout = t.clamp(1, 30),
                Err(_) => warn!("ignoring bad timeout option <{}>", option),
            }
        }
    }

    /// The list of fully-qualified lookup candidates for a caller-supplied
    /// name: qualified names go out as-is; single-label names walk the search
    /// list (or the default domain) first.
    pub fn qualified_names(&self, name: &str) -> Vec<String> {
        if name.ends_with('.') || name.contains('.') {
            return vec![name.to_string()];
        }

        let mut candidates: Vec<String> = self
            .search_list
            .iter()
            .map(|suffix| format!("{}.{}", name, suffix))
            .collect();
        if candidates.is_empty() {
            if let Some(domain) = &self.domain {
                candidates.push(format!("{}.{}", name, domain));
            }
        }

        candidates.push(name.to_string());
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolv_text_directives() {
        let text = r#"
# generated by NetworkManager
; with both comment styles
nameserver 192.0.2.53
nameserver 2001:db8::53
domain example.com
search lab.example.com example.com
options timeout:7 rotate
        "#;

        let mut config = ResolverConfig::default();
        config.use_resolv_options = true;
        config.read_resolv_text(text).unwrap();

        assert_eq!(config.nameservers.len(), 2);
        assert_eq!(config.domain.as_deref(), Some("example.com"));
        assert_eq!(config.search_list, vec!["lab.example.com", "example.com"]);
        assert_eq!(config.timeout, 7);
        assert!(config.ns_random);
    }

    #[test]
    fn options_require_opt_in() {
        let mut config = ResolverConfig::default();
        config.read_resolv_text("options timeout:9 rotate").unwrap();
        assert_eq!(config.timeout, 5);
        assert!(!config.ns_random);
    }

    #[test]
    fn timeout_is_clamped() {
        let mut config = ResolverConfig::default();
        config.use_resolv_options = true;
        config.read_resolv_text("options timeout:90").unwrap();
        assert_eq!(config.timeout, 30);
    }

    #[test]
    fn bad_nameserver_entry() {
        let mut config = ResolverConfig::default();
        let err = config.read_resolv_text("nameserver not-an-ip").unwrap_err();
        assert!(matches!(err, DNSError::NSInvalidEntry(_)));
    }

    #[test]
    fn search_candidates() {
        let mut config = ResolverConfig::default();
        config.domain = Some("example.com".to_string());
        assert_eq!(
            config.qualified_names("host"),
            vec!["host.example.com", "host"]
        );
        assert_eq!(config.qualified_names("host.example.org"), vec!["host.example.org"]);

        config.search_list = vec!["a.example".to_string(), "b.example".to_string()];
        assert_eq!(
            config.qualified_names("host"),
            vec!["host.a.example", "host.b.example", "host"]
        );
    }
}
