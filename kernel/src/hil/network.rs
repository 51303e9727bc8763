//! Non-blocking TCP/UDP socket interface.
//!
//! Models the "underlying non-blocking callback API" this core's socket
//! multiplexer is built on top of — the Rust equivalent of the espconn
//! primitives `socket.c` wraps (`espconn_accept`, `espconn_sent`,
//! `espconn_regist_recvcb`/`sentcb`/`disconcb`). Tock itself delivers these
//! as registered `&'static dyn Client` callbacks, which it can do because
//! boards allocate components once into `'static` storage via
//! `static_init!`. A std binary with one owning `Firmware` struct has no
//! such allocator, so this core takes the same events and inverts them into
//! a `poll` the 10ms main loop drains every tick — still non-blocking,
//! still a normalized accept/receive/sent/error/disconnect stream, just
//! pulled instead of pushed. The concrete implementation (backed by real
//! non-blocking `std::net` sockets) is an external collaborator supplied
//! by `boards/iobridge`; everything in `capsules::net` is written purely
//! against these traits.

use crate::errorcode::ErrorCode;

/// One normalized event out of a TCP stream's non-blocking socket.
#[derive(Debug)]
pub enum TcpEvent {
    Received(Vec<u8>),
    Sent,
    Error(ErrorCode),
    Disconnected,
}

/// A bound, listening TCP socket, analogous to one `espconn_accept` plus
/// `espconn_tcp_set_max_con_allow(.., 1)`.
pub trait TcpListener {
    /// Non-blocking accept. Returns a new connection if one is pending.
    fn poll_accept(&mut self) -> Option<Box<dyn TcpStream>>;
}

/// A single accepted TCP connection, analogous to one `struct espconn *`.
pub trait TcpStream {
    /// Sends `data`. This is the raw primitive and performs no
    /// busy-tracking of its own — `capsules::net::SocketMux` is the layer
    /// responsible for not calling this again before the previous send's
    /// `TcpEvent::Sent` has been drained, matching how `socket.c` guards
    /// calls to the raw `espconn_sent`.
    fn send(&mut self, data: Vec<u8>) -> Result<(), ErrorCode>;

    /// Drains every event that has arrived since the last poll.
    fn poll(&mut self) -> Vec<TcpEvent>;

    fn disconnect(&mut self);
}

#[derive(Debug)]
pub enum UdpEvent {
    Received { remote_ip: [u8; 4], remote_port: u16, data: Vec<u8> },
    Sent,
    Error(ErrorCode),
}

/// A bound UDP socket, analogous to an `espconn` configured `ESPCONN_UDP`.
pub trait UdpSocket {
    /// Sends to `remote`, mirroring the original's `set_remote` capturing
    /// the sender's `ip`/`port` off of `espconn_get_connection_info` and
    /// replying to that same address.
    fn send_to(&mut self, remote: ([u8; 4], u16), data: Vec<u8>) -> Result<(), ErrorCode>;

    fn poll(&mut self) -> Vec<UdpEvent>;
}
