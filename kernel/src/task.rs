//! Deferred-call task queue.
//!
//! Grounded on the pattern `virtual_uart.rs`'s `MuxUart` uses
//! (`self.deferred_call.set()` inside `do_next_op_async`, polled later by
//! the kernel's deferred-call dispatcher) and on the original firmware's
//! `system_os_post(background_task_id, 0, 0)` re-posting itself from
//! `tcp_data_sent_callback`. There is no interrupt context here and no
//! reentrancy to avoid except via explicit callback nesting, so a single
//! pending flag is enough: setting it from within a callback defers the
//! actual work to the next iteration of the board's main loop rather than
//! running it synchronously inside that callback.

use std::cell::Cell;

#[derive(Default)]
pub struct DeferredCall {
    pending: Cell<bool>,
}

impl DeferredCall {
    pub const fn new() -> Self {
        DeferredCall {
            pending: Cell::new(false),
        }
    }

    /// Request that the associated work run on the next main-loop pass.
    pub fn set(&self) {
        self.pending.set(true);
    }

    pub fn is_pending(&self) -> bool {
        self.pending.get()
    }

    /// Consume the pending flag; returns whether it was set.
    pub fn take(&self) -> bool {
        self.pending.replace(false)
    }
}
