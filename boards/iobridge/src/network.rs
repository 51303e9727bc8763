//! `std::net` backed implementations of `kernel::hil::network`'s polled
//! traits. Tock's own network HILs hand out `&'a dyn Client` callbacks
//! fired from interrupt context; a std binary has no embedded allocator
//! arena to borrow those references from for `'static`, so this board
//! drains readiness the way the main loop drains everything else: a
//! non-blocking poll every tick (see `kernel::hil::network`'s module
//! doc comment for the full reasoning).

use std::io::{ErrorKind, Read, Write};
use std::net::{self, SocketAddr};

use kernel::errorcode::ErrorCode;
use kernel::hil::network::{TcpEvent, TcpListener, TcpStream, UdpEvent, UdpSocket};

fn map_io_error(e: &std::io::Error) -> ErrorCode {
    match e.kind() {
        ErrorKind::ConnectionReset | ErrorKind::ConnectionAborted | ErrorKind::BrokenPipe => {
            ErrorCode::Cancel
        }
        ErrorKind::NotConnected => ErrorCode::Off,
        _ => ErrorCode::Fail,
    }
}

pub struct StdTcpListener {
    inner: net::TcpListener,
}

impl StdTcpListener {
    pub fn bind(port: u16) -> std::io::Result<Self> {
        let inner = net::TcpListener::bind(("0.0.0.0", port))?;
        inner.set_nonblocking(true)?;
        Ok(StdTcpListener { inner })
    }
}

impl TcpListener for StdTcpListener {
    fn poll_accept(&mut self) -> Option<Box<dyn TcpStream>> {
        match self.inner.accept() {
            Ok((stream, _addr)) => {
                let _ = stream.set_nonblocking(true);
                let _ = stream.set_nodelay(true);
                Some(Box::new(StdTcpStream { inner: stream, sent_pending: false }))
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock => None,
            Err(e) => {
                log::warn!("tcp accept failed: {}", e);
                None
            }
        }
    }
}

pub struct StdTcpStream {
    inner: net::TcpStream,
    /// `send()` on a std socket either completes or fails outright; there
    /// is no asynchronous "sent" callback to wait on the way
    /// `espconn_sent`'s completion interrupt provides one. A `Sent` event
    /// is synthesized on the following `poll()` so callers that gate on
    /// it (the socket mux's `send_busy`) still see the same handshake.
    sent_pending: bool,
}

impl TcpStream for StdTcpStream {
    fn send(&mut self, data: Vec<u8>) -> Result<(), ErrorCode> {
        match self.inner.write_all(&data) {
            Ok(()) => {
                self.sent_pending = true;
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock => Err(ErrorCode::Busy),
            Err(e) => Err(map_io_error(&e)),
        }
    }

    fn poll(&mut self) -> Vec<TcpEvent> {
        let mut out = Vec::new();
        if self.sent_pending {
            self.sent_pending = false;
            out.push(TcpEvent::Sent);
        }

        let mut buf = [0u8; 2048];
        loop {
            match self.inner.read(&mut buf) {
                Ok(0) => {
                    out.push(TcpEvent::Disconnected);
                    break;
                }
                Ok(n) => out.push(TcpEvent::Received(buf[..n].to_vec())),
                Err(e) if e.kind() == ErrorKind::WouldBlock => break,
                Err(e) => {
                    out.push(TcpEvent::Error(map_io_error(&e)));
                    break;
                }
            }
        }
        out
    }

    fn disconnect(&mut self) {
        let _ = self.inner.shutdown(net::Shutdown::Both);
    }
}

pub struct StdUdpSocket {
    inner: net::UdpSocket,
    sent_pending: bool,
}

impl StdUdpSocket {
    pub fn bind(port: u16) -> std::io::Result<Self> {
        let inner = net::UdpSocket::bind(("0.0.0.0", port))?;
        inner.set_nonblocking(true)?;
        Ok(StdUdpSocket { inner, sent_pending: false })
    }
}

impl UdpSocket for StdUdpSocket {
    fn send_to(&mut self, remote: ([u8; 4], u16), data: Vec<u8>) -> Result<(), ErrorCode> {
        let addr = SocketAddr::from((std::net::Ipv4Addr::from(remote.0), remote.1));
        match self.inner.send_to(&data, addr) {
            Ok(_) => {
                self.sent_pending = true;
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock => Err(ErrorCode::Busy),
            Err(e) => Err(map_io_error(&e)),
        }
    }

    fn poll(&mut self) -> Vec<UdpEvent> {
        let mut out = Vec::new();
        if self.sent_pending {
            self.sent_pending = false;
            out.push(UdpEvent::Sent);
        }

        let mut buf = [0u8; 2048];
        loop {
            match self.inner.recv_from(&mut buf) {
                Ok((n, SocketAddr::V4(addr))) => out.push(UdpEvent::Received {
                    remote_ip: addr.ip().octets(),
                    remote_port: addr.port(),
                    data: buf[..n].to_vec(),
                }),
                Ok((_, SocketAddr::V6(_))) => continue,
                Err(e) if e.kind() == ErrorKind::WouldBlock => break,
                Err(e) => {
                    out.push(UdpEvent::Error(map_io_error(&e)));
                    break;
                }
            }
        }
        out
    }
}
