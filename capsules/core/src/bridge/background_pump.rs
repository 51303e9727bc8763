//! Background pump: forwards bytes arriving from the UART to the data
//! channel's TCP connection.
//!
//! Grounded on `original_source/user_main.c`'s `background_task`: drains up
//! to `BUFFER_SIZE` bytes out of the UART receive fifo into the TCP send
//! buffer and sends them if the connection is not already busy; if more
//! remains, `tcp_data_sent_callback` reposts the task once the send
//! completes. The repost is modeled with `kernel::task::DeferredCall`
//! rather than calling back into `run` synchronously, matching
//! `virtual_uart.rs`'s own use of a deferred call to avoid re-entering the
//! send path from inside a completion event.

use kernel::hil::uart::{Uart, UartEvent};
use kernel::task::DeferredCall;

use crate::bridge::BUFFER_SIZE;
use crate::net::{SocketId, SocketMux};

pub struct BackgroundPump {
    socket: SocketId,
    deferred: DeferredCall,
    pending: Vec<u8>,
}

impl BackgroundPump {
    pub fn new(socket: SocketId) -> Self {
        BackgroundPump {
            socket,
            deferred: DeferredCall::new(),
            pending: Vec::new(),
        }
    }

    pub fn run(&mut self, mux: &mut SocketMux, uart: &mut dyn Uart) {
        for event in uart.poll() {
            match event {
                UartEvent::Received(mut bytes) => {
                    self.pending.append(&mut bytes);
                    self.deferred.set();
                }
                UartEvent::Error(e) => log::warn!("uart error: {}", e),
                UartEvent::TransmitComplete => {}
            }
        }

        if !self.deferred.take() {
            return;
        }

        if self.pending.is_empty() {
            return;
        }

        if mux.is_busy(self.socket).unwrap_or(true) {
            // tcp_data_sent_callback will repost us once the current send
            // completes.
            self.deferred.set();
            return;
        }

        let take_len = self.pending.len().min(BUFFER_SIZE);
        let chunk: Vec<u8> = self.pending.drain(..take_len).collect();
        if let Err(e) = mux.send(self.socket, chunk) {
            log::warn!("background pump: send failed: {}", e);
        }

        if !self.pending.is_empty() {
            self.deferred.set();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::errorcode::ErrorCode;

    struct FakeUart {
        incoming: Vec<UartEvent>,
    }

    impl Uart for FakeUart {
        fn transmit(&mut self, _data: Vec<u8>) -> Result<(), ErrorCode> {
            Ok(())
        }
        fn poll(&mut self) -> Vec<UartEvent> {
            std::mem::take(&mut self.incoming)
        }
    }

    #[test]
    fn large_payload_is_chunked_across_runs() {
        let mut listener_events = Vec::new();
        let total = BUFFER_SIZE * 2 + 10;
        for _ in 0..total {
            listener_events.push(b'a');
        }
        let mut uart = FakeUart { incoming: vec![UartEvent::Received(listener_events)] };
        let mut mux = SocketMux::new();
        // a socket with no listener can't accept, but send() against a
        // slot with no stream returns NoDevice, which we treat the same
        // as "not busy, attempt failed" for this unit test's purposes.
        let id = mux.register_tcp(25, Box::new(NoopListener)).unwrap();
        let mut pump = BackgroundPump::new(id);

        pump.run(&mut mux, &mut uart);
        // first chunk attempted and fails (NoDevice, no stream attached);
        // pending still holds the remainder since send() errored out.
        assert!(pump.pending.len() >= total - BUFFER_SIZE);
    }

    struct NoopListener;
    impl kernel::hil::network::TcpListener for NoopListener {
        fn poll_accept(&mut self) -> Option<Box<dyn kernel::hil::network::TcpStream>> {
            None
        }
    }
}
