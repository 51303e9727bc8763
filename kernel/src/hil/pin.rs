//! Provider adapter contract.
//!
//! A provider owns a fixed-size bank of pins and knows how to drive one
//! electrically in whichever [`ModeKind`] it has been switched into.
//! Grounded on `original_source/io.c`'s `io_info[]` descriptor table: each
//! entry pairs a pin count with a [`Capabilities`] bitset, an `init`
//! routine run once at boot, and a pair of dispatch tables
//! (`io_read_pin_x`/`io_write_pin_x`) keyed by mode. The mode-specific
//! *state machines* — timer arm/disarm cadence, analog ramp stepping,
//! reset-on-read bookkeeping — are not a provider's concern; they belong
//! to the I/O core, which only ever asks a provider to read or write a
//! raw value once it has already decided what that value should be.

use crate::errorcode::ErrorCode;

/// Capability bitset, matching `io_info[]`'s two concrete providers: the
/// internal GPIO bank supports everything but analog input; the auxiliary
/// ADC/RTC bank supports only digital I/O plus analog input.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Capabilities {
    pub input_digital: bool,
    pub counter: bool,
    pub output_digital: bool,
    pub output_analog: bool,
    pub input_analog: bool,
    pub i2c: bool,
    pub pullup: bool,
}

/// The electrical configuration of one pin. Carries no runtime state —
/// that lives in the I/O core's `PinConfig`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ModeKind {
    Disabled,
    InputDigital,
    Counter,
    OutputDigital,
    Timer,
    InputAnalog,
    OutputAnalog,
    I2c,
}

impl ModeKind {
    /// Wire vocabulary, taken verbatim from the original's
    /// `io_mode_traits` name table.
    pub fn as_str(self) -> &'static str {
        match self {
            ModeKind::Disabled => "disabled",
            ModeKind::InputDigital => "inputd",
            ModeKind::Counter => "counter",
            ModeKind::OutputDigital => "outputd",
            ModeKind::Timer => "timer",
            ModeKind::InputAnalog => "inputa",
            ModeKind::OutputAnalog => "outputa",
            ModeKind::I2c => "i2c",
        }
    }

    pub fn from_str(s: &str) -> Option<ModeKind> {
        Some(match s {
            "disabled" => ModeKind::Disabled,
            "inputd" => ModeKind::InputDigital,
            "counter" => ModeKind::Counter,
            "outputd" => ModeKind::OutputDigital,
            "timer" => ModeKind::Timer,
            "inputa" => ModeKind::InputAnalog,
            "outputa" => ModeKind::OutputAnalog,
            "i2c" => ModeKind::I2c,
            _ => return None,
        })
    }
}

/// One bank of pins, e.g. "internal GPIO" or "auxiliary ADC/RTC".
///
/// The six functions below mirror `io_info[]`'s per-provider function
/// table exactly (`init`, `init_pin_mode`, `read_pin`, `write_pin`,
/// `periodic`, plus the capability/pin-count metadata read through
/// `get_pin_info`): a provider that fails `init` is marked undetected by
/// its caller, the I/O core, and every other call against it
/// short-circuits from then on.
pub trait PinProvider {
    fn name(&self) -> &'static str;
    fn pin_count(&self) -> usize;
    fn capabilities(&self, pin: usize) -> Result<Capabilities, ErrorCode>;
    fn electrical_mode(&self, pin: usize) -> Result<ModeKind, ErrorCode>;

    /// Probes/resets the device as a whole. Called once at boot by the
    /// I/O core; `Err` marks the whole provider undetected.
    fn init(&mut self) -> Result<(), ErrorCode>;

    /// Switches `pin`'s electrical configuration, validating against
    /// `capabilities`. Does not perform any bootstrap write; the I/O core
    /// issues that separately via `write_raw`/`read_raw`.
    fn init_pin_mode(&mut self, pin: usize, kind: ModeKind) -> Result<(), ErrorCode>;

    /// Reads the pin's raw value in its current electrical mode: 0/1 for
    /// digital, an accumulated edge count for a counter, a raw sample for
    /// analog input. Matches `io_read_pin_x`'s per-mode dispatch.
    fn read_raw(&mut self, pin: usize) -> Result<i32, ErrorCode>;

    /// Writes a raw value to the pin in its current electrical mode.
    /// Refused for modes that cannot be written (`input_digital`,
    /// `counter`, `input_analog`, `i2c`), matching `io_write_pin_x`. A
    /// counter accepts a write only to reset it to a given count.
    fn write_raw(&mut self, pin: usize, value: i32) -> Result<(), ErrorCode>;

    /// Enables or disables the internal pull-up, where supported.
    fn set_pullup(&mut self, pin: usize, enabled: bool) -> Result<(), ErrorCode>;

    /// Advances provider-internal bookkeeping (debounce, edge counting)
    /// by one tick. Returns whether any counter pin's value changed
    /// during this tick, the signal `io_periodic` uses to decide whether
    /// to pulse the configured status-trigger pin.
    fn periodic(&mut self) -> bool;

    /// One-line, provider-specific description of `pin` for the
    /// configuration dump's "provider info" column.
    fn get_pin_info(&self, pin: usize) -> String;
}
