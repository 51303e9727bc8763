//! Generic socket multiplexer.
//!
//! Grounded on `original_source/socket.c`: a fixed two-entry table
//! (`sockets[2]`), a single `send_busy` gate per slot checked before every
//! `espconn_sent` (`socket_send`), a TCP `has_child` reject-if-already-
//! connected rule (`socket_callback_accept`'s `espconn_disconnect` of a
//! second client), and per-protocol remote-address handling: TCP always
//! replies to its one connected child, UDP captures the sender's address
//! off of `espconn_get_connection_info` on every receive and replies to
//! that (`set_remote`). This plays the same role
//! `virtual_uart::MuxUart` plays for the UART: a thin layer of bookkeeping
//! normalizing a raw non-blocking callback API for its clients, generic
//! over which of the two TCP bridge channels is using it.

use kernel::errorcode::ErrorCode;
use kernel::hil::network::{TcpEvent, TcpListener, TcpStream, UdpEvent, UdpSocket};

pub const SOCKET_CAPACITY: usize = 2;

/// One normalized event surfaced by [`SocketMux::poll`].
#[derive(Debug)]
pub enum Event {
    /// A new TCP client was accepted onto a previously-unconnected slot.
    Accepted,
    /// A second TCP client attempted to connect while one was already
    /// active; it was disconnected immediately, matching the original.
    Rejected,
    Received { remote: Option<([u8; 4], u16)>, data: Vec<u8> },
    Sent,
    Error(ErrorCode),
    Disconnected,
}

enum Transport {
    Tcp {
        listener: Box<dyn TcpListener>,
        stream: Option<Box<dyn TcpStream>>,
    },
    Udp(Box<dyn UdpSocket>),
}

struct Slot {
    local_port: u16,
    transport: Transport,
    send_busy: bool,
    remote: Option<([u8; 4], u16)>,
}

/// A handle identifying one registered slot. Opaque to callers beyond
/// equality, mirroring the original's bare socket-table index.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SocketId(usize);

pub struct SocketMux {
    slots: Vec<Slot>,
}

impl SocketMux {
    pub fn new() -> Self {
        SocketMux { slots: Vec::new() }
    }

    /// Registers a listening TCP slot. `NoMem` once `SOCKET_CAPACITY`
    /// slots are already registered, matching the fixed-size `sockets[2]`
    /// table.
    pub fn register_tcp(
        &mut self,
        local_port: u16,
        listener: Box<dyn TcpListener>,
    ) -> Result<SocketId, ErrorCode> {
        self.push(Slot {
            local_port,
            transport: Transport::Tcp { listener, stream: None },
            send_busy: false,
            remote: None,
        })
    }

    pub fn register_udp(
        &mut self,
        local_port: u16,
        socket: Box<dyn UdpSocket>,
    ) -> Result<SocketId, ErrorCode> {
        self.push(Slot {
            local_port,
            transport: Transport::Udp(socket),
            send_busy: false,
            remote: None,
        })
    }

    fn push(&mut self, slot: Slot) -> Result<SocketId, ErrorCode> {
        if self.slots.len() >= SOCKET_CAPACITY {
            return Err(ErrorCode::NoMem);
        }
        self.slots.push(slot);
        Ok(SocketId(self.slots.len() - 1))
    }

    pub fn local_port(&self, id: SocketId) -> Result<u16, ErrorCode> {
        Ok(self.slot(id)?.local_port)
    }

    pub fn is_connected(&self, id: SocketId) -> Result<bool, ErrorCode> {
        match &self.slot(id)?.transport {
            Transport::Tcp { stream, .. } => Ok(stream.is_some()),
            Transport::Udp(_) => Ok(true),
        }
    }

    pub fn is_busy(&self, id: SocketId) -> Result<bool, ErrorCode> {
        Ok(self.slot(id)?.send_busy)
    }

    /// Forcibly closes a connected TCP slot, matching `espconn_disconnect`
    /// invoked by the data channel's 30s inactivity timer
    /// (`espconn_regist_time`).
    pub fn disconnect(&mut self, id: SocketId) -> Result<(), ErrorCode> {
        let slot = self.slot_mut(id)?;
        if let Transport::Tcp { stream, .. } = &mut slot.transport {
            if let Some(s) = stream {
                s.disconnect();
            }
            *stream = None;
        }
        slot.send_busy = false;
        Ok(())
    }

    /// Sends `data` on `id`. `Busy` if a previous send has not yet
    /// completed; `NoDevice` if the TCP slot has no connected child.
    pub fn send(&mut self, id: SocketId, data: Vec<u8>) -> Result<(), ErrorCode> {
        let slot = self.slot_mut(id)?;
        if slot.send_busy {
            return Err(ErrorCode::Busy);
        }
        match &mut slot.transport {
            Transport::Tcp { stream, .. } => {
                let stream = stream.as_deref_mut().ok_or(ErrorCode::NoDevice)?;
                stream.send(data)?;
            }
            Transport::Udp(socket) => {
                let remote = slot.remote.ok_or(ErrorCode::NoDevice)?;
                socket.send_to(remote, data)?;
            }
        }
        slot.send_busy = true;
        Ok(())
    }

    /// Drains and normalizes every pending event on `id`. Advances TCP
    /// accept/disconnect bookkeeping and the UDP remote-address capture as
    /// a side effect.
    pub fn poll(&mut self, id: SocketId) -> Result<Vec<Event>, ErrorCode> {
        let slot = self.slot_mut(id)?;
        let mut out = Vec::new();

        match &mut slot.transport {
            Transport::Tcp { listener, stream } => {
                if let Some(mut new_stream) = listener.poll_accept() {
                    if stream.is_some() {
                        new_stream.disconnect();
                        out.push(Event::Rejected);
                    } else {
                        *stream = Some(new_stream);
                        slot.send_busy = false;
                        out.push(Event::Accepted);
                    }
                }
                if let Some(s) = stream.as_deref_mut() {
                    for ev in s.poll() {
                        match ev {
                            TcpEvent::Received(data) => {
                                out.push(Event::Received { remote: None, data })
                            }
                            TcpEvent::Sent => {
                                slot.send_busy = false;
                                out.push(Event::Sent);
                            }
                            TcpEvent::Error(e) => out.push(Event::Error(e)),
                            TcpEvent::Disconnected => {
                                *stream = None;
                                slot.send_busy = false;
                                out.push(Event::Disconnected);
                            }
                        }
                    }
                }
            }
            Transport::Udp(socket) => {
                for ev in socket.poll() {
                    match ev {
                        UdpEvent::Received { remote_ip, remote_port, data } => {
                            slot.remote = Some((remote_ip, remote_port));
                            out.push(Event::Received {
                                remote: slot.remote,
                                data,
                            });
                        }
                        UdpEvent::Sent => {
                            slot.send_busy = false;
                            out.push(Event::Sent);
                        }
                        UdpEvent::Error(e) => out.push(Event::Error(e)),
                    }
                }
            }
        }

        Ok(out)
    }

    fn slot(&self, id: SocketId) -> Result<&Slot, ErrorCode> {
        self.slots.get(id.0).ok_or(ErrorCode::NoDevice)
    }

    fn slot_mut(&mut self, id: SocketId) -> Result<&mut Slot, ErrorCode> {
        self.slots.get_mut(id.0).ok_or(ErrorCode::NoDevice)
    }
}

impl Default for SocketMux {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct FakeStream {
        outbox: Rc<RefCell<Vec<Vec<u8>>>>,
        inbox: Rc<RefCell<Vec<TcpEvent>>>,
        disconnected: Rc<RefCell<bool>>,
    }

    impl TcpStream for FakeStream {
        fn send(&mut self, data: Vec<u8>) -> Result<(), ErrorCode> {
            self.outbox.borrow_mut().push(data);
            Ok(())
        }
        fn poll(&mut self) -> Vec<TcpEvent> {
            self.inbox.borrow_mut().drain(..).collect()
        }
        fn disconnect(&mut self) {
            *self.disconnected.borrow_mut() = true;
        }
    }

    struct FakeListener {
        pending: Vec<Option<Rc<RefCell<Vec<TcpEvent>>>>>,
        outboxes: Vec<Rc<RefCell<Vec<Vec<u8>>>>>,
        disconnects: Vec<Rc<RefCell<bool>>>,
    }

    impl FakeListener {
        fn empty() -> Self {
            FakeListener { pending: Vec::new(), outboxes: Vec::new(), disconnects: Vec::new() }
        }

        fn queue_connection(&mut self) -> (Rc<RefCell<Vec<TcpEvent>>>, Rc<RefCell<Vec<Vec<u8>>>>) {
            let inbox = Rc::new(RefCell::new(Vec::new()));
            let outbox = Rc::new(RefCell::new(Vec::new()));
            self.pending.push(Some(inbox.clone()));
            self.outboxes.push(outbox.clone());
            self.disconnects.push(Rc::new(RefCell::new(false)));
            (inbox, outbox)
        }
    }

    impl TcpListener for FakeListener {
        fn poll_accept(&mut self) -> Option<Box<dyn TcpStream>> {
            let idx = self.pending.iter().position(|p| p.is_some())?;
            let inbox = self.pending[idx].take().unwrap();
            Some(Box::new(FakeStream {
                outbox: self.outboxes[idx].clone(),
                inbox,
                disconnected: self.disconnects[idx].clone(),
            }))
        }
    }

    #[test]
    fn second_tcp_client_is_rejected() {
        let mut listener = FakeListener::empty();
        listener.queue_connection();
        listener.queue_connection();
        let mut mux = SocketMux::new();
        let id = mux.register_tcp(24, Box::new(listener)).unwrap();

        let events = mux.poll(id).unwrap();
        assert!(matches!(events[0], Event::Accepted));
        let events = mux.poll(id).unwrap();
        assert!(matches!(events[0], Event::Rejected));
    }

    #[test]
    fn send_busy_rejects_concurrent_send() {
        let mut listener = FakeListener::empty();
        let (_inbox, _outbox) = listener.queue_connection();
        let mut mux = SocketMux::new();
        let id = mux.register_tcp(25, Box::new(listener)).unwrap();
        mux.poll(id).unwrap();

        mux.send(id, vec![1, 2, 3]).unwrap();
        assert_eq!(mux.send(id, vec![4]), Err(ErrorCode::Busy));
    }

    #[test]
    fn sent_event_clears_busy() {
        let mut listener = FakeListener::empty();
        let (inbox, _outbox) = listener.queue_connection();
        let mut mux = SocketMux::new();
        let id = mux.register_tcp(25, Box::new(listener)).unwrap();
        mux.poll(id).unwrap();

        mux.send(id, vec![1]).unwrap();
        inbox.borrow_mut().push(TcpEvent::Sent);
        mux.poll(id).unwrap();
        assert!(!mux.is_busy(id).unwrap());
    }

    #[test]
    fn capacity_is_fixed_at_two() {
        let mut mux = SocketMux::new();
        mux.register_tcp(24, Box::new(FakeListener::empty())).unwrap();
        mux.register_tcp(25, Box::new(FakeListener::empty())).unwrap();
        assert_eq!(
            mux.register_tcp(26, Box::new(FakeListener::empty())),
            Err(ErrorCode::NoMem)
        );
    }
}
