//! End-to-end tests of the send engine against mock name servers running on
//! loopback threads. No outside network access is needed.
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, UdpSocket};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use netdns::config::{CacheType, ResolverConfig};
use netdns::error::DNSError;
use netdns::query::DNSQuery;
use netdns::rdata::RData;
use netdns::resolver::Resolver;
use netdns::response::DNSResponse;
use netdns::rfc1035::{
    DNSResourceRecord, PacketType, QClass, QType, ResponseCode,
};

fn a_record(name: &str, address: &str) -> DNSResourceRecord {
    DNSResourceRecord::new(
        name,
        QType::A,
        QClass::IN,
        300,
        RData::A(address.parse().unwrap()),
    )
    .unwrap()
}

fn soa_record(zone: &str) -> DNSResourceRecord {
    let tokens = [
        "ns1.example.com.",
        "admin.example.com.",
        "2024010101",
        "900",
        "300",
        "1800",
        "60",
    ];
    DNSResourceRecord::new(
        zone,
        QType::SOA,
        QClass::IN,
        3600,
        RData::from_text(QType::SOA, &tokens).unwrap(),
    )
    .unwrap()
}

/// A response echoing the request's id and question.
fn build_reply(
    request: &[u8],
    answers: Vec<DNSResourceRecord>,
    truncated: bool,
    rcode: ResponseCode,
) -> Vec<u8> {
    let parsed = DNSResponse::from_bytes(request).expect("mock server got a bad request");

    let mut reply = DNSQuery::default();
    reply.header.id = parsed.header.id;
    reply.header.flags.packet_type = PacketType::Response;
    reply.header.flags.recursion_available = true;
    reply.header.flags.truncated = truncated;
    reply.header.flags.response_code = rcode;

    for question in parsed.questions {
        reply.push_question(question);
    }
    for answer in answers {
        reply.push_answer(answer);
    }
    reply.serialize().unwrap()
}

/// One-shot UDP server; the handler maps a request to a reply.
fn spawn_udp_server<F>(handler: F) -> (SocketAddr, thread::JoinHandle<()>)
where
    F: Fn(&[u8]) -> Vec<u8> + Send + 'static,
{
    let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
    let address = socket.local_addr().unwrap();

    let handle = thread::spawn(move || {
        let mut buffer = [0u8; 4096];
        let (received, peer) = socket.recv_from(&mut buffer).unwrap();
        let reply = handler(&buffer[..received]);
        socket.send_to(&reply, peer).unwrap();
    });

    (address, handle)
}

fn resolver_for(address: SocketAddr) -> Resolver {
    let mut config = ResolverConfig::default();
    config.nameservers.push(address.ip());
    config.dns_port = address.port();
    config.timeout = 2;
    Resolver::new(config).unwrap()
}

fn read_framed(stream: &mut impl Read) -> Vec<u8> {
    let mut length = [0u8; 2];
    stream.read_exact(&mut length).unwrap();
    let length = u16::from_be_bytes(length) as usize;
    let mut payload = vec![0u8; length];
    stream.read_exact(&mut payload).unwrap();
    payload
}

fn write_framed(stream: &mut impl Write, payload: &[u8]) {
    stream
        .write_all(&(payload.len() as u16).to_be_bytes())
        .unwrap();
    stream.write_all(payload).unwrap();
}

#[test]
fn basic_a_lookup() {
    let (address, server) = spawn_udp_server(|request| {
        build_reply(
            request,
            vec![a_record("example.com.", "93.184.216.34")],
            false,
            ResponseCode::NoError,
        )
    });

    let mut resolver = resolver_for(address);
    let response = resolver.query("example.com", QType::A, QClass::IN).unwrap();
    server.join().unwrap();

    assert_eq!(response.header.flags.packet_type, PacketType::Response);
    assert!(response.header.an_count >= 1);
    match &response.answers[0].r_data {
        RData::A(ip) => assert_eq!(ip.to_string(), "93.184.216.34"),
        other => panic!("expected an A answer, got {:?}", other),
    }
}

#[test]
fn mx_lookup() {
    let (address, server) = spawn_udp_server(|request| {
        let mx = DNSResourceRecord::new(
            "example.com.",
            QType::MX,
            QClass::IN,
            600,
            RData::from_text(QType::MX, &["10", "mail.example.com."]).unwrap(),
        )
        .unwrap();
        build_reply(request, vec![mx], false, ResponseCode::NoError)
    });

    let mut resolver = resolver_for(address);
    let response = resolver.query("example.com", QType::MX, QClass::IN).unwrap();
    server.join().unwrap();

    match &response.answers[0].r_data {
        RData::MX(mx) => {
            assert_eq!(mx.preference, 10);
            assert_eq!(mx.exchange.to_string(), "mail.example.com.");
        }
        other => panic!("expected an MX answer, got {:?}", other),
    }
}

#[test]
fn mismatched_id_is_a_server_failure() {
    let (address, server) = spawn_udp_server(|request| {
        let mut reply = build_reply(request, Vec::new(), false, ResponseCode::NoError);
        // corrupt the transaction id
        reply[0] ^= 0xFF;
        reply
    });

    let mut resolver = resolver_for(address);
    let err = resolver
        .query("example.com", QType::A, QClass::IN)
        .unwrap_err();
    server.join().unwrap();

    assert!(matches!(err, DNSError::HeaderInvalid(_)));
    assert_eq!(resolver.last_errors().len(), 1);
}

#[test]
fn nxdomain_surfaces_the_rcode() {
    let (address, server) = spawn_udp_server(|request| {
        build_reply(request, Vec::new(), false, ResponseCode::NXDomain)
    });

    let mut resolver = resolver_for(address);
    let err = resolver
        .query("nope.example.com", QType::A, QClass::IN)
        .unwrap_err();
    server.join().unwrap();

    assert!(matches!(err, DNSError::Rcode(ResponseCode::NXDomain)));
}

#[test]
fn truncation_escalates_to_tcp_on_the_same_server() {
    // one port number serving both transports
    let (tcp_listener, udp_socket) = {
        let mut pair = None;
        for _ in 0..20 {
            let tcp = TcpListener::bind("127.0.0.1:0").unwrap();
            let port = tcp.local_addr().unwrap().port();
            if let Ok(udp) = UdpSocket::bind(("127.0.0.1", port)) {
                pair = Some((tcp, udp));
                break;
            }
        }
        pair.expect("could not bind a tcp/udp port pair")
    };
    let address = tcp_listener.local_addr().unwrap();

    let udp_thread = thread::spawn(move || {
        let mut buffer = [0u8; 4096];
        let (received, peer) = udp_socket.recv_from(&mut buffer).unwrap();
        // too big for a datagram: answer truncated and empty
        let reply = build_reply(&buffer[..received], Vec::new(), true, ResponseCode::NoError);
        udp_socket.send_to(&reply, peer).unwrap();
    });

    let tcp_thread = thread::spawn(move || {
        let (mut stream, _) = tcp_listener.accept().unwrap();
        let request = read_framed(&mut stream);
        let reply = build_reply(
            &request,
            vec![a_record("big.example.com.", "192.0.2.99")],
            false,
            ResponseCode::NoError,
        );
        write_framed(&mut stream, &reply);
    });

    let mut resolver = resolver_for(address);
    let response = resolver
        .query("big.example.com", QType::A, QClass::IN)
        .unwrap();

    udp_thread.join().unwrap();
    tcp_thread.join().unwrap();

    assert!(!response.is_truncated());
    assert_eq!(response.answers.len(), 1);
    match &response.answers[0].r_data {
        RData::A(ip) => assert_eq!(ip.to_string(), "192.0.2.99"),
        other => panic!("expected an A answer, got {:?}", other),
    }
}

#[test]
fn axfr_concatenates_chunks_until_second_soa() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap();

    let server = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let request = read_framed(&mut stream);

        // opening chunk: the first SOA plus a record
        let first = build_reply(
            &request,
            vec![
                soa_record("example.com."),
                a_record("one.example.com.", "192.0.2.1"),
            ],
            false,
            ResponseCode::NoError,
        );
        write_framed(&mut stream, &first);

        // closing chunk: another record, then the second SOA
        let second = build_reply(
            &request,
            vec![
                a_record("two.example.com.", "192.0.2.2"),
                soa_record("example.com."),
            ],
            false,
            ResponseCode::NoError,
        );
        write_framed(&mut stream, &second);
    });

    let mut resolver = resolver_for(address);
    let response = resolver.axfr("example.com").unwrap();
    server.join().unwrap();

    assert_eq!(response.answers.len(), 4);
    assert_eq!(response.soa_count(), 2);
    assert_eq!(response.answers[0].qtype(), Some(QType::SOA));
    assert_eq!(response.answers[3].qtype(), Some(QType::SOA));
}

#[test]
fn axfr_stops_on_bad_rcode() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap();

    let server = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let request = read_framed(&mut stream);
        let refused = build_reply(&request, Vec::new(), false, ResponseCode::Refused);
        write_framed(&mut stream, &refused);
    });

    let mut resolver = resolver_for(address);
    let err = resolver.axfr("example.com").unwrap_err();
    server.join().unwrap();

    assert!(matches!(err, DNSError::Rcode(ResponseCode::Refused)));
}

#[test]
fn all_servers_failed_records_each_one() {
    // a port nothing listens on, reachable under two loopback addresses
    let dead_port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        port
    };

    let mut config = ResolverConfig::default();
    config.nameservers.push("127.0.0.1".parse().unwrap());
    config.nameservers.push("127.0.0.2".parse().unwrap());
    config.dns_port = dead_port;
    config.use_tcp = true;
    config.timeout = 1;

    let mut resolver = Resolver::new(config).unwrap();
    let err = resolver
        .query("example.com", QType::A, QClass::IN)
        .unwrap_err();

    assert!(matches!(
        err,
        DNSError::Io(_) | DNSError::SocketTimeout | DNSError::NSFailed(_)
    ));
    assert_eq!(resolver.last_errors().len(), 2);
}

#[test]
fn cache_hit_skips_the_network() {
    let hits = Arc::new(AtomicUsize::new(0));
    let hits_in_server = Arc::clone(&hits);

    let (address, server) = spawn_udp_server(move |request| {
        hits_in_server.fetch_add(1, Ordering::SeqCst);
        build_reply(
            request,
            vec![a_record("cached.example.com.", "192.0.2.10")],
            false,
            ResponseCode::NoError,
        )
    });

    let mut config = ResolverConfig::default();
    config.nameservers.push(address.ip());
    config.dns_port = address.port();
    config.timeout = 2;
    config.cache_type = CacheType::Memory;

    let mut resolver = Resolver::new(config).unwrap();

    let first = resolver
        .query("cached.example.com", QType::A, QClass::IN)
        .unwrap();
    server.join().unwrap();
    assert_eq!(first.answers.len(), 1);

    // the server thread is gone; only the cache can answer now
    let second = resolver
        .query("cached.example.com", QType::A, QClass::IN)
        .unwrap();
    assert_eq!(second.answers.len(), 1);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(second.answers[0].r_data.to_string(), "192.0.2.10");
}

#[test]
fn strict_query_mode_drops_mismatched_answers() {
    let (address, server) = spawn_udp_server(|request| {
        build_reply(
            request,
            vec![
                a_record("host.example.com.", "192.0.2.1"),
                a_record("evil.example.net.", "192.0.2.66"),
            ],
            false,
            ResponseCode::NoError,
        )
    });

    let mut config = ResolverConfig::default();
    config.nameservers.push(address.ip());
    config.dns_port = address.port();
    config.timeout = 2;
    config.strict_query_mode = true;

    let mut resolver = Resolver::new(config).unwrap();
    let response = resolver
        .query("host.example.com", QType::A, QClass::IN)
        .unwrap();
    server.join().unwrap();

    assert_eq!(response.answers.len(), 1);
    assert_eq!(response.answers[0].name.to_string(), "host.example.com.");
}
