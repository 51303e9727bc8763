//! Command channel: the line-oriented TCP bridge on port 24.
//!
//! Grounded on `original_source/user_main.c`'s `tcp_cmd_*` callbacks: every
//! receive is telnet-stripped and filtered to printable ASCII
//! (`' '..='~'`), copied into a send buffer, terminated with `\r\n`
//! (truncating the payload by exactly 2 bytes if it would not otherwise
//! fit `BUFFER_SIZE`), and sent only if the previous send has completed —
//! otherwise the response is dropped, exactly as the original does (there
//! is no retry queue for the command channel). The original's own
//! `tcp_cmd_receive_callback` just echoes the filtered bytes back
//! (terminal echo); the response content here instead comes from
//! dispatching the line through `capsules::command`, since this core's
//! scope includes the `io-mode`/`io-read`/`io-write`/`io-flag` command
//! verbs as an external interface (spec) and the dispatcher that would
//! normally produce that response (`application.c`) was not part of the
//! retrieved original source.

use kernel::errorcode::ErrorCode;

use crate::bridge::telnet;
use crate::bridge::BUFFER_SIZE;
use crate::command;
use crate::io_core::IoCore;
use crate::net::{Event, SocketId, SocketMux};

pub struct CommandChannel {
    socket: SocketId,
    strip_telnet: bool,
}

impl CommandChannel {
    pub fn new(socket: SocketId) -> Self {
        CommandChannel { socket, strip_telnet: true }
    }

    /// Drains pending socket events, dispatching any received line and
    /// framing/sending its response. Returns every line that was
    /// dispatched this call, so the board can persist the
    /// configuration-affecting ones.
    pub fn poll(&mut self, mux: &mut SocketMux, io: &mut IoCore) -> Vec<String> {
        let events = match mux.poll(self.socket) {
            Ok(events) => events,
            Err(_) => return Vec::new(),
        };

        let mut dispatched = Vec::new();
        for event in events {
            match event {
                Event::Accepted => log::info!("command channel: client connected"),
                Event::Rejected => log::info!("command channel: second client rejected"),
                Event::Disconnected => log::info!("command channel: client disconnected"),
                Event::Error(e) => log::warn!("command channel error: {}", e),
                Event::Sent => {}
                Event::Received { data, .. } => {
                    if let Some(line) = self.handle_line(mux, io, &data) {
                        dispatched.push(line);
                    }
                }
            }
        }
        dispatched
    }

    fn handle_line(&mut self, mux: &mut SocketMux, io: &mut IoCore, data: &[u8]) -> Option<String> {
        let filtered = telnet::strip(data, self.strip_telnet, true, BUFFER_SIZE);
        let line = String::from_utf8_lossy(&filtered).into_owned();
        if line.trim().is_empty() {
            return None;
        }
        let response = command::dispatch_line(&line, io);
        self.send_framed(mux, response.as_bytes());
        Some(line)
    }

    fn send_framed(&mut self, mux: &mut SocketMux, payload: &[u8]) {
        let mut body = payload.to_vec();
        if body.len() + 2 > BUFFER_SIZE {
            body.truncate(BUFFER_SIZE - 2);
        }
        body.push(b'\r');
        body.push(b'\n');

        match mux.send(self.socket, body) {
            Ok(()) => {}
            Err(ErrorCode::Busy) => {
                // matches the original: a response is simply dropped if
                // the previous send has not completed yet.
                log::debug!("command channel: send busy, dropping response");
            }
            Err(e) => log::warn!("command channel: send failed: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_payload_by_exactly_two_when_it_would_overflow() {
        let mut body = vec![b'x'; BUFFER_SIZE];
        if body.len() + 2 > BUFFER_SIZE {
            body.truncate(BUFFER_SIZE - 2);
        }
        body.push(b'\r');
        body.push(b'\n');
        assert_eq!(body.len(), BUFFER_SIZE);
    }
}
