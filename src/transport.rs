//! UDP and TCP socket wrappers: connected datagram exchange with a read
//! deadline, and length-prefixed TCP framing. Both honor an optional local
//! bind address.
use byteorder::{BigEndian, ByteOrder};
use socket2::{Domain, Protocol, Socket, Type};
use std::io::{Read, Write};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, TcpStream, UdpSocket};
use std::time::Duration;

use log::debug;

use crate::error::{DNSError, DNSResult};

/// Where a transport binds locally when the caller asked for a specific
/// interface or source port.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalBind {
    pub host: Option<IpAddr>,
    pub port: Option<u16>,
}

impl LocalBind {
    fn address_for(&self, server: &SocketAddr) -> SocketAddr {
        let host = self.host.unwrap_or(match server {
            SocketAddr::V4(_) => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            SocketAddr::V6(_) => IpAddr::V6(Ipv6Addr::UNSPECIFIED),
        });
        SocketAddr::new(host, self.port.unwrap_or(0))
    }
}

pub struct UdpTransport {
    socket: UdpSocket,
}

impl UdpTransport {
    /// A datagram socket connected to one server, with both I/O deadlines set.
    pub fn connect(server: SocketAddr, bind: LocalBind, timeout: Duration) -> DNSResult<Self> {
        let socket = UdpSocket::bind(bind.address_for(&server))?;
        socket.connect(server)?;
        socket.set_read_timeout(Some(timeout))?;
        socket.set_write_timeout(Some(timeout))?;

        debug!("udp socket {:?} connected to {}", socket.local_addr(), server);
        Ok(UdpTransport { socket })
    }

    /// One send, one reply of at most `max_size` bytes.
    pub fn exchange(&self, wire: &[u8], max_size: usize) -> DNSResult<Vec<u8>> {
        self.socket.send(wire)?;

        let mut reply = vec![0u8; max_size];
        let received = self.socket.recv(&mut reply)?;
        reply.truncate(received);
        Ok(reply)
    }
}

pub struct TcpTransport {
    stream: TcpStream,
}

impl TcpTransport {
    pub fn connect(server: SocketAddr, bind: LocalBind, timeout: Duration) -> DNSResult<Self> {
        let domain = match server {
            SocketAddr::V4(_) => Domain::IPV4,
            SocketAddr::V6(_) => Domain::IPV6,
        };
        let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
        socket.bind(&bind.address_for(&server).into())?;
        socket
            .connect_timeout(&server.into(), timeout)
            .map_err(DNSError::from)?;

        let stream: TcpStream = socket.into();
        stream.set_read_timeout(Some(timeout))?;
        stream.set_write_timeout(Some(timeout))?;
        stream.set_nodelay(true)?;

        debug!("tcp stream {:?} connected to {}", stream.local_addr(), server);
        Ok(TcpTransport { stream })
    }

    /// Each message is prefixed by its 16-bit length in network order.
    pub fn send_message(&mut self, wire: &[u8]) -> DNSResult<()> {
        if wire.len() > u16::MAX as usize {
            return Err(DNSError::PacketInvalid(format!(
                "message of {} bytes does not fit a TCP length prefix",
                wire.len()
            )));
        }

        let mut length = [0u8; 2];
        BigEndian::write_u16(&mut length, wire.len() as u16);
        self.stream.write_all(&length)?;
        self.stream.write_all(wire)?;
        Ok(())
    }

    /// Read the 2-byte length, then exactly that many bytes.
    pub fn read_message(&mut self) -> DNSResult<Vec<u8>> {
        let mut length = [0u8; 2];
        self.stream.read_exact(&mut length)?;
        let length = BigEndian::read_u16(&length) as usize;

        let mut reply = vec![0u8; length];
        self.stream.read_exact(&mut reply)?;
        Ok(reply)
    }

    pub fn exchange(&mut self, wire: &[u8]) -> DNSResult<Vec<u8>> {
        self.send_message(wire)?;
        self.read_message()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use std::thread;

    #[test]
    fn udp_timeout_is_distinguished() {
        // a bound socket nobody answers on
        let sink = UdpSocket::bind("127.0.0.1:0").unwrap();
        let server = sink.local_addr().unwrap();

        let transport =
            UdpTransport::connect(server, LocalBind::default(), Duration::from_millis(50))
                .unwrap();
        let err = transport.exchange(b"ping", 512).unwrap_err();
        assert!(matches!(err, DNSError::SocketTimeout));
    }

    #[test]
    fn tcp_framing_round_trip() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let server = listener.local_addr().unwrap();

        let echo = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut length = [0u8; 2];
            stream.read_exact(&mut length).unwrap();
            let n = BigEndian::read_u16(&length) as usize;
            let mut payload = vec![0u8; n];
            stream.read_exact(&mut payload).unwrap();

            // echo the same frame back
            stream.write_all(&length).unwrap();
            stream.write_all(&payload).unwrap();
        });

        let mut transport =
            TcpTransport::connect(server, LocalBind::default(), Duration::from_secs(2)).unwrap();
        let reply = transport.exchange(b"\x12\x34hello").unwrap();
        assert_eq!(reply, b"\x12\x34hello");

        echo.join().unwrap();
    }

    #[test]
    fn tcp_refused_connection() {
        // bind then drop to get a port with nothing listening
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let server = listener.local_addr().unwrap();
        drop(listener);

        let result = TcpTransport::connect(server, LocalBind::default(), Duration::from_secs(1));
        assert!(result.is_err());
    }
}
