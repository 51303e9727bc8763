//! UART transmit/receive interface.
//!
//! Mirrors the shape of Tock's `hil::uart::{Transmit, Receive}` as used by
//! `capsules/core/src/virtualizers/virtual_uart.rs`, inverted to polling
//! for the same reason `hil::network` is (see its module doc). The
//! concrete driver — and its queue/string-builder internals — is
//! explicitly out of scope for this core; `boards/iobridge` supplies a
//! loopback stand-in.

use crate::errorcode::ErrorCode;

#[derive(Debug)]
pub enum UartEvent {
    Received(Vec<u8>),
    TransmitComplete,
    Error(ErrorCode),
}

pub trait Uart {
    /// Queues `data` for transmission. Matches `uart_start_transmit`: does
    /// not block, and may be called again before the previous buffer has
    /// fully drained — the driver's own queue (out of scope here) absorbs
    /// backpressure.
    fn transmit(&mut self, data: Vec<u8>) -> Result<(), ErrorCode>;

    fn poll(&mut self) -> Vec<UartEvent>;
}
