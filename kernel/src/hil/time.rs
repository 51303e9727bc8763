//! Clock service interface.
//!
//! The time subsystem's internals (system/rtc/timer/ntp wrap-counters) are
//! an out-of-scope external collaborator per this core's design; capsules
//! only ever need a monotonic millisecond tick to drive the 10ms periodic
//! scan, arm timeouts, and detect the data channel's 30s idle window.

/// A monotonic millisecond clock. Never goes backwards within one boot.
pub trait Clock {
    fn now_ms(&self) -> u64;
}
