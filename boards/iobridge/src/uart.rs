//! Stand-in UART backed by the process's own stdio.
//!
//! The real UART peripheral driver is out of scope (SPEC_FULL §1
//! Non-goals carry this forward unchanged from the distilled
//! specification); something has to sit behind `kernel::hil::uart::Uart`
//! for the bridge capsules to drive, though, so this treats the board
//! process's stdin/stdout as the serial console the original talks to
//! over a real UART. Reads happen on a background thread (`std::io::Stdin`
//! has no non-blocking mode) and are handed to `poll()` over a channel,
//! mirroring how `virtual_uart.rs`'s `MuxUart` decouples a hardware
//! receive interrupt from the client that eventually drains it.

use std::io::{self, Read, Write};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use kernel::errorcode::ErrorCode;
use kernel::hil::uart::{Uart, UartEvent};

pub struct StdioUart {
    rx: Receiver<io::Result<Vec<u8>>>,
}

impl StdioUart {
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut stdin = io::stdin();
            let mut buf = [0u8; 256];
            loop {
                let result = stdin.read(&mut buf).map(|n| buf[..n].to_vec());
                let eof = matches!(&result, Ok(v) if v.is_empty());
                if tx.send(result).is_err() || eof {
                    break;
                }
            }
        });
        StdioUart { rx }
    }
}

impl Uart for StdioUart {
    fn transmit(&mut self, data: Vec<u8>) -> Result<(), ErrorCode> {
        io::stdout().write_all(&data).map_err(|_| ErrorCode::Fail)
    }

    fn poll(&mut self) -> Vec<UartEvent> {
        let mut out = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(Ok(bytes)) if !bytes.is_empty() => out.push(UartEvent::Received(bytes)),
                Ok(Ok(_)) => {}
                Ok(Err(_)) => out.push(UartEvent::Error(ErrorCode::Fail)),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => break,
            }
        }
        out
    }
}
