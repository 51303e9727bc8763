//! Data channel: the byte-stream UART bridge on port 25.
//!
//! Grounded on `original_source/user_main.c`'s `tcp_data_*` callbacks:
//! every received byte is telnet-stripped (no printable filter — this
//! channel is raw binary, unlike the command channel) and forwarded to the
//! UART transmit side; `uart_start_transmit` only fires if anything
//! survived the strip. The original's 30s inactivity close is configured
//! on the espconn listener itself (`espconn_regist_time(&esp_data_config,
//! 30, 0)`); since that is a property of the underlying socket stack this
//! core treats as an external collaborator, it is reimplemented here as an
//! explicit idle deadline the capsule tracks and enforces against the
//! clock passed to `poll`.

use kernel::hil::time::Clock;
use kernel::hil::uart::Uart;

use crate::bridge::telnet;
use crate::bridge::BUFFER_SIZE;
use crate::net::{Event, SocketId, SocketMux};

pub const IDLE_TIMEOUT_MS: u64 = 30_000;

pub struct DataChannel {
    socket: SocketId,
    strip_telnet: bool,
    last_activity_ms: Option<u64>,
}

impl DataChannel {
    pub fn new(socket: SocketId) -> Self {
        DataChannel { socket, strip_telnet: true, last_activity_ms: None }
    }

    pub fn poll(&mut self, mux: &mut SocketMux, uart: &mut dyn Uart, clock: &dyn Clock) {
        let now = clock.now_ms();

        let events = match mux.poll(self.socket) {
            Ok(events) => events,
            Err(_) => return,
        };

        for event in events {
            match event {
                Event::Accepted => {
                    log::info!("data channel: client connected");
                    self.last_activity_ms = Some(now);
                }
                Event::Rejected => log::info!("data channel: second client rejected"),
                Event::Disconnected => {
                    log::info!("data channel: client disconnected");
                    self.last_activity_ms = None;
                }
                Event::Error(e) => log::warn!("data channel error: {}", e),
                Event::Sent => self.last_activity_ms = Some(now),
                Event::Received { data, .. } => {
                    self.last_activity_ms = Some(now);
                    let forwarded = telnet::strip(&data, self.strip_telnet, false, BUFFER_SIZE);
                    if !forwarded.is_empty() {
                        let _ = uart.transmit(forwarded);
                    }
                }
            }
        }

        if let Some(last) = self.last_activity_ms {
            if now.saturating_sub(last) > IDLE_TIMEOUT_MS {
                log::info!("data channel: idle timeout, disconnecting");
                let _ = mux.disconnect(self.socket);
                self.last_activity_ms = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_timeout_constant_matches_spec() {
        assert_eq!(IDLE_TIMEOUT_MS, 30_000);
    }
}
