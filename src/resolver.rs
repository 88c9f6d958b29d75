//! The send engine: walks the configured name servers, escalates from UDP to
//! TCP on truncation, validates response headers, assembles zone transfer
//! streams and consults the cache around the loop.
//!
//! Per-server failures are recorded, not raised; only when every server has
//! been tried does the last failure surface.
use rand::seq::SliceRandom;
use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use log::{debug, info};

use crate::cache::{fingerprint, MemoryCache, ResponseCache};
use crate::config::{CacheType, ResolverConfig};
use crate::error::{DNSError, DNSResult};
use crate::query::DNSQuery;
use crate::response::DNSResponse;
use crate::rfc1035::{DNSQuestion, OpCode, QClass, QType};
use crate::transport::{LocalBind, TcpTransport, UdpTransport};
use crate::update::DNSUpdate;

/// A synchronous, one-query-at-a-time resolver. Instances are independent;
/// run one per thread.
pub struct Resolver {
    pub config: ResolverConfig,
    cache: Option<Box<dyn ResponseCache>>,
    udp_sockets: HashMap<SocketAddr, UdpTransport>,
    tcp_connections: HashMap<SocketAddr, TcpTransport>,
    last_errors: HashMap<IpAddr, String>,
}

impl Resolver {
    pub fn new(config: ResolverConfig) -> DNSResult<Self> {
        let cache: Option<Box<dyn ResponseCache>> = match config.cache_type {
            CacheType::None => None,
            CacheType::Memory => Some(Box::new(MemoryCache::new(config.cache_size))),
            CacheType::Shared | CacheType::File => {
                // those backends live with the application; it must hand one in
                return Err(DNSError::CacheUnsupported(format!(
                    "{:?} cache backend must be attached with with_cache()",
                    config.cache_type
                )));
            }
        };

        Ok(Resolver {
            config,
            cache,
            udp_sockets: HashMap::new(),
            tcp_connections: HashMap::new(),
            last_errors: HashMap::new(),
        })
    }

    /// A resolver using an application-provided cache backend.
    pub fn with_cache(config: ResolverConfig, cache: Box<dyn ResponseCache>) -> Self {
        Resolver {
            config,
            cache: Some(cache),
            udp_sockets: HashMap::new(),
            tcp_connections: HashMap::new(),
            last_errors: HashMap::new(),
        }
    }

    /// What went wrong per server during the last send loop.
    pub fn last_errors(&self) -> &HashMap<IpAddr, String> {
        &self.last_errors
    }

    /// Look up `name`, walking the search list for unqualified names and the
    /// cache for repeat questions.
    pub fn query(&mut self, name: &str, qtype: QType, qclass: QClass) -> DNSResult<DNSResponse> {
        let candidates = self.config.qualified_names(name);

        let mut last_error = None;
        for candidate in &candidates {
            match self.query_one(candidate, qtype, qclass) {
                Ok(response) => return Ok(response),
                Err(e) => {
                    debug!("lookup of <{}> failed: {}", candidate, e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| DNSError::NSFailed(format!("no lookup candidates for <{}>", name))))
    }

    fn query_one(&mut self, name: &str, qtype: QType, qclass: QClass) -> DNSResult<DNSResponse> {
        let key = fingerprint(name, qtype, qclass);
        let cacheable = qtype.is_cacheable();

        if cacheable {
            let blob = self.cache.as_mut().and_then(|cache| cache.get(&key));
            if let Some(blob) = blob {
                let mut response = DNSResponse::from_bytes(&blob)?;
                if self.config.strict_query_mode {
                    response.retain_matching_answers();
                }
                return Ok(response);
            }
        }

        let mut query = self.build_query(name, qtype, qclass)?;
        let (response, raw) = self.exchange(&mut query)?;

        if cacheable {
            if let Some(ttl) = response.min_answer_ttl() {
                if let Some(cache) = &mut self.cache {
                    cache.put(&key, &raw, ttl);
                }
            }
        }

        Ok(response)
    }

    fn build_query(&self, name: &str, qtype: QType, qclass: QClass) -> DNSResult<DNSQuery> {
        let mut query = DNSQuery::new(name, qtype)?;
        if qclass != QClass::IN {
            query.questions[0].class = qclass;
        }
        query.header.flags.recursion_desired = self.config.recurse;
        query.header.flags.authentic_data = self.config.dnssec_ad_flag;
        query.header.flags.checking_disabled = self.config.dnssec_cd_flag;
        if self.config.dnssec {
            query.set_dnssec(self.config.dnssec_payload_size);
        }
        Ok(query)
    }

    /// Send an already-built request through the server loop.
    pub fn send(&mut self, query: &mut DNSQuery) -> DNSResult<DNSResponse> {
        self.exchange(query).map(|(response, _)| response)
    }

    /// Send a dynamic update through the same loop.
    pub fn update(&mut self, update: &mut DNSUpdate) -> DNSResult<DNSResponse> {
        self.send(update.as_query_mut())
    }

    /// NOTIFY a server that `zone` changed (RFC 1996).
    pub fn notify(&mut self, zone: &str) -> DNSResult<DNSResponse> {
        let mut query = DNSQuery::default();
        query.header.id = rand::random();
        query.header.flags.op_code = OpCode::Notify;
        query.push_question(DNSQuestion::new(zone, QType::SOA, None)?);
        self.send(&mut query)
    }

    fn exchange(&mut self, query: &mut DNSQuery) -> DNSResult<(DNSResponse, Vec<u8>)> {
        if self.config.nameservers.is_empty() {
            return Err(DNSError::NSInvalidEntry(
                "no name servers configured".to_string(),
            ));
        }

        let wire = query.serialize()?;

        let mut servers = self.config.nameservers.clone();
        if self.config.ns_random {
            // one permutation per query, never per packet
            servers.shuffle(&mut rand::thread_rng());
        }

        self.last_errors.clear();
        let mut last_error = None;

        for ip in servers {
            let server = SocketAddr::new(ip, self.config.dns_port);
            match self.exchange_with_server(&wire, server, query.header.id) {
                Ok((mut response, raw)) => {
                    if self.config.strict_query_mode {
                        response.retain_matching_answers();
                    }
                    return Ok((response, raw));
                }
                Err(e) => {
                    info!("name server {} failed: {}", server, e);
                    self.last_errors.insert(ip, e.to_string());
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| DNSError::NSFailed("all name servers failed".to_string())))
    }

    fn exchange_with_server(
        &mut self,
        wire: &[u8],
        server: SocketAddr,
        expected_id: u16,
    ) -> DNSResult<(DNSResponse, Vec<u8>)> {
        // TCP when forced, or when the request does not fit a datagram
        let use_tcp = self.config.use_tcp || wire.len() > self.config.max_udp_size as usize;

        let mut raw = if use_tcp {
            self.exchange_tcp(server, wire)?
        } else {
            self.exchange_udp(server, wire)?
        };
        let mut response = DNSResponse::from_bytes(&raw)?;

        if !use_tcp && response.is_truncated() {
            debug!("truncated reply from {}, retrying over tcp", server);
            raw = self.exchange_tcp(server, wire)?;
            response = DNSResponse::from_bytes(&raw)?;
        }

        response.validate(expected_id)?;
        Ok((response, raw))
    }

    /// UDP sockets sit in a per-server cache like the TCP connections and are
    /// evicted on any I/O error.
    fn exchange_udp(&mut self, server: SocketAddr, wire: &[u8]) -> DNSResult<Vec<u8>> {
        let bind = self.local_bind();
        let timeout = self.timeout();

        if !self.udp_sockets.contains_key(&server) {
            let transport = UdpTransport::connect(server, bind, timeout)?;
            self.udp_sockets.insert(server, transport);
        }

        let max_size = self.udp_reply_size();
        let result = match self.udp_sockets.get(&server) {
            Some(transport) => transport.exchange(wire, max_size),
            None => Err(DNSError::NSFailed(format!("no socket for {}", server))),
        };

        if result.is_err() {
            self.udp_sockets.remove(&server);
        }
        result
    }

    /// TCP connections are kept per server across queries; any failure
    /// discards the connection for good.
    fn exchange_tcp(&mut self, server: SocketAddr, wire: &[u8]) -> DNSResult<Vec<u8>> {
        let bind = self.local_bind();
        let timeout = self.timeout();

        if !self.tcp_connections.contains_key(&server) {
            let transport = TcpTransport::connect(server, bind, timeout)?;
            self.tcp_connections.insert(server, transport);
        }

        let result = match self.tcp_connections.get_mut(&server) {
            Some(transport) => transport.exchange(wire),
            None => Err(DNSError::NSFailed(format!("no connection to {}", server))),
        };

        if result.is_err() {
            self.tcp_connections.remove(&server);
        }
        result
    }

    /// Full zone transfer: TCP, length-prefixed chunks accumulated until the
    /// second SOA record closes the stream.
    pub fn axfr(&mut self, zone: &str) -> DNSResult<DNSResponse> {
        if self.config.nameservers.is_empty() {
            return Err(DNSError::NSInvalidEntry(
                "no name servers configured".to_string(),
            ));
        }

        let mut query = DNSQuery::new(zone, QType::AXFR)?;
        query.header.flags.recursion_desired = false;
        let wire = query.serialize()?;

        self.last_errors.clear();
        let mut last_error = None;

        for ip in self.config.nameservers.clone() {
            let server = SocketAddr::new(ip, self.config.dns_port);
            match self.axfr_from_server(server, &wire, query.header.id) {
                Ok(response) => return Ok(response),
                Err(e) => {
                    info!("zone transfer from {} failed: {}", server, e);
                    self.last_errors.insert(ip, e.to_string());
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| DNSError::NSFailed("all name servers failed".to_string())))
    }

    fn axfr_from_server(
        &mut self,
        server: SocketAddr,
        wire: &[u8],
        expected_id: u16,
    ) -> DNSResult<DNSResponse> {
        let bind = self.local_bind();
        let timeout = self.timeout();

        if !self.tcp_connections.contains_key(&server) {
            let transport = TcpTransport::connect(server, bind, timeout)?;
            self.tcp_connections.insert(server, transport);
        }

        let result = match self.tcp_connections.get_mut(&server) {
            Some(transport) => Self::axfr_stream(transport, wire, expected_id),
            None => Err(DNSError::NSFailed(format!("no connection to {}", server))),
        };

        if result.is_err() {
            self.tcp_connections.remove(&server);
        }
        result
    }

    fn axfr_stream(
        transport: &mut TcpTransport,
        wire: &[u8],
        expected_id: u16,
    ) -> DNSResult<DNSResponse> {
        transport.send_message(wire)?;

        let mut combined: Option<DNSResponse> = None;
        let mut soa_seen = 0usize;

        while soa_seen < 2 {
            let raw = transport.read_message()?;
            let chunk = DNSResponse::from_bytes(&raw)?;

            match &mut combined {
                None => {
                    // a bad rcode on the first chunk ends the transfer
                    chunk.validate(expected_id)?;
                    soa_seen += chunk.soa_count();
                    combined = Some(chunk);
                }
                Some(stream) => {
                    if chunk.header.id != expected_id {
                        return Err(DNSError::HeaderInvalid(format!(
                            "zone transfer chunk id {:#06x} does not match {:#06x}",
                            chunk.header.id, expected_id
                        )));
                    }
                    soa_seen += chunk.soa_count();
                    stream.answers.extend(chunk.answers);
                }
            }
        }

        let mut response = combined
            .ok_or_else(|| DNSError::Parse("empty zone transfer stream".to_string()))?;
        response.header.an_count = response.answers.len() as u16;
        debug!(
            "zone transfer complete: {} records",
            response.answers.len()
        );
        Ok(response)
    }

    /// Drop the socket caches and close the lookup cache.
    pub fn close(&mut self) {
        self.udp_sockets.clear();
        self.tcp_connections.clear();
        if let Some(cache) = &mut self.cache {
            cache.close();
        }
    }

    fn local_bind(&self) -> LocalBind {
        LocalBind {
            host: self.config.local_host,
            port: self.config.local_port,
        }
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout.max(1))
    }

    /// Datagram replies may be as large as the advertised EDNS0 payload when
    /// DNSSEC is on; 512 bytes otherwise.
    fn udp_reply_size(&self) -> usize {
        if self.config.dnssec {
            self.config.dnssec_payload_size as usize
        } else {
            self.config.max_udp_size as usize
        }
    }
}

impl Drop for Resolver {
    fn drop(&mut self) {
        self.close();
    }
}
