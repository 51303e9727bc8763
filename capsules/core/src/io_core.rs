//! The provider-agnostic I/O core: mode switching, reads/writes, and the
//! periodic tick that drives timer toggling and analog ramps.
//!
//! Grounded on `original_source/io.c`: `io_init`/`application_function_io_mode`
//! (mode switching with capability validation and revert-on-failure),
//! `io_read_pin_x`/`io_write_pin_x` (mode-gated read/write dispatch), and
//! `io_periodic` (timer delay decrement-and-toggle, analog ramp
//! multiply/divide with clamp-and-flip, status-trigger pulse on any
//! counter firing this tick).

use kernel::errorcode::ErrorCode;
use kernel::hil::pin::{Capabilities, ModeKind, PinProvider};

use crate::providers::{AuxProvider, GpioProvider};

/// Identifies which of the two built-in provider banks a pin belongs to,
/// mirroring the original's `io_id_gpio` / `io_id_aux` selector.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ProviderId {
    Gpio,
    Aux,
}

impl ProviderId {
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderId::Gpio => "gpio",
            ProviderId::Aux => "aux",
        }
    }

    pub fn from_str(s: &str) -> Option<ProviderId> {
        match s {
            "gpio" => Some(ProviderId::Gpio),
            "aux" => Some(ProviderId::Aux),
            _ => None,
        }
    }
}

/// The flag vocabulary accepted by `io-flag`, from the original's
/// `pin_flag_from_string` (note the hyphen in `reset-on-read`).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Flag {
    Autostart,
    Repeat,
    Pullup,
    ResetOnRead,
}

impl Flag {
    pub fn from_str(s: &str) -> Option<Flag> {
        match s {
            "autostart" => Some(Flag::Autostart),
            "repeat" => Some(Flag::Repeat),
            "pullup" => Some(Flag::Pullup),
            "reset-on-read" => Some(Flag::ResetOnRead),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Flag::Autostart => "autostart",
            Flag::Repeat => "repeat",
            Flag::Pullup => "pullup",
            Flag::ResetOnRead => "reset-on-read",
        }
    }
}

#[derive(Copy, Clone, Debug, Default)]
pub struct PinFlags {
    pub autostart: bool,
    pub repeat: bool,
    pub pullup: bool,
    pub reset_on_read: bool,
}

/// A configured timer's or analog ramp's default/reload direction.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Direction {
    Up,
    Down,
}

/// Which half of an i2c bus a pin has been configured as.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum I2cRole {
    Sda,
    Scl,
}

/// A timer pin's idle/armed_up/armed_down state machine. `runtime_direction
/// == None` is idle; `Some(dir)` is armed, counting down toward a toggle.
#[derive(Copy, Clone, Debug)]
struct TimerRuntime {
    delay_ms: u32,
    direction: Direction,
    remaining_ms: i64,
    runtime_direction: Option<Direction>,
}

impl TimerRuntime {
    fn idle(delay_ms: u32, direction: Direction) -> Self {
        TimerRuntime { delay_ms, direction, remaining_ms: 0, runtime_direction: None }
    }

    fn arm(&mut self) {
        self.remaining_ms = self.delay_ms as i64;
        self.runtime_direction = Some(self.direction);
    }

    fn disarm(&mut self) {
        self.remaining_ms = 0;
        self.runtime_direction = None;
    }
}

/// An analog output ramp's state. `runtime_direction == None` means the
/// pin sits static at its current value; `Some(dir)` means it is ramping.
#[derive(Copy, Clone, Debug)]
struct AnalogRuntime {
    lower_bound: f32,
    upper_bound: f32,
    speed_ms: u32,
    current: f32,
    runtime_direction: Option<Direction>,
}

/// Parameters accepted alongside an `io-mode` switch; variants correspond
/// to the modes that carry configuration beyond the bare electrical kind.
#[derive(Copy, Clone, Debug)]
pub enum ModeArgs {
    Plain,
    Timer { direction: Direction, delay_ms: u32 },
    OutputAnalog { lower_bound: f32, upper_bound: f32, speed_ms: u32 },
    I2c { role: I2cRole, delay_ms: u32 },
}

#[derive(Clone, Debug)]
struct PinConfig {
    kind: ModeKind,
    flags: PinFlags,
    timer: Option<TimerRuntime>,
    analog: Option<AnalogRuntime>,
    i2c_role: Option<I2cRole>,
}

impl PinConfig {
    fn disabled() -> Self {
        PinConfig {
            kind: ModeKind::Disabled,
            flags: PinFlags::default(),
            timer: None,
            analog: None,
            i2c_role: None,
        }
    }
}

/// A per-pin snapshot for the configuration dump.
#[derive(Clone, Debug)]
pub struct PinDump {
    pub mode: ModeKind,
    pub flags: PinFlags,
    pub params: String,
    pub value: Option<i32>,
    pub provider_info: String,
}

struct Bank {
    provider: Box<dyn PinProvider>,
    pins: Vec<PinConfig>,
    /// Set by `init()`; an undetected provider short-circuits every other
    /// operation, per the original's provider-probe-then-skip contract.
    detected: bool,
    i2c_sda: Option<usize>,
    i2c_scl: Option<(usize, u32)>,
    i2c_initialized: bool,
}

/// Global NTP configuration, persisted alongside pin config (`SPEC_FULL.md`
/// §6's `ntp = {server, timezone}`). Not consulted by anything in this
/// core's scope — `boards/iobridge`'s clock stand-in is independent of it —
/// it exists purely so the `ntp` command verb has somewhere to land.
#[derive(Clone, Debug, Default)]
pub struct NtpConfig {
    pub server: String,
    pub timezone: String,
}

/// The I/O core. Owns both built-in provider banks and every pin's
/// configuration and runtime state.
pub struct IoCore {
    gpio: Bank,
    aux: Bank,
    status_trigger: Option<(ProviderId, usize)>,
    ntp: Option<NtpConfig>,
}

impl IoCore {
    pub fn new() -> Self {
        let gpio_count = GpioProvider::default().pin_count();
        let aux_count = AuxProvider::default().pin_count();
        IoCore {
            gpio: Bank {
                provider: Box::new(GpioProvider::new()),
                pins: vec![PinConfig::disabled(); gpio_count],
                detected: false,
                i2c_sda: None,
                i2c_scl: None,
                i2c_initialized: false,
            },
            aux: Bank {
                provider: Box::new(AuxProvider::new()),
                pins: vec![PinConfig::disabled(); aux_count],
                detected: false,
                i2c_sda: None,
                i2c_scl: None,
                i2c_initialized: false,
            },
            status_trigger: None,
            ntp: None,
        }
    }

    fn bank(&self, id: ProviderId) -> &Bank {
        match id {
            ProviderId::Gpio => &self.gpio,
            ProviderId::Aux => &self.aux,
        }
    }

    fn bank_mut(&mut self, id: ProviderId) -> &mut Bank {
        match id {
            ProviderId::Gpio => &mut self.gpio,
            ProviderId::Aux => &mut self.aux,
        }
    }

    fn require_detected(&self, id: ProviderId) -> Result<(), ErrorCode> {
        if self.bank(id).detected {
            Ok(())
        } else {
            Err(ErrorCode::Off)
        }
    }

    pub fn is_detected(&self, id: ProviderId) -> bool {
        self.bank(id).detected
    }

    /// Boot hook, first phase of the original's `io_init`: probes each
    /// provider once. A provider whose `init` fails is marked
    /// `!detected`, and every later operation against it short-circuits
    /// with `ErrorCode::Off`.
    pub fn init(&mut self) {
        Self::detect_bank(&mut self.gpio, "gpio");
        Self::detect_bank(&mut self.aux, "aux");
    }

    fn detect_bank(bank: &mut Bank, name: &str) {
        match bank.provider.init() {
            Ok(()) => {
                bank.detected = true;
                log::info!("{} detected, {} pins", name, bank.pins.len());
            }
            Err(e) => {
                bank.detected = false;
                log::warn!("{} not detected: {}", name, e);
            }
        }
    }

    /// Boot hook, second phase of the original's `io_init`: applies the
    /// startup behavior for every pin whose mode has already been loaded
    /// from persisted configuration (run this after replaying that
    /// config, not before — unlike `io_init`, config loading in this core
    /// is the board's responsibility rather than something `init()`
    /// itself performs). An `output_digital`/`timer` pin is driven to the
    /// boolean value of `flags.autostart`; an `output_analog` pin starts
    /// ramping if `autostart`, otherwise it sits at `lower_bound`.
    pub fn bootstrap(&mut self) {
        Self::bootstrap_bank(&mut self.gpio);
        Self::bootstrap_bank(&mut self.aux);
    }

    fn bootstrap_bank(bank: &mut Bank) {
        if !bank.detected {
            return;
        }
        for pin in 0..bank.pins.len() {
            let cfg = &mut bank.pins[pin];
            match cfg.kind {
                ModeKind::OutputDigital => {
                    let level = cfg.flags.autostart as i32;
                    let _ = bank.provider.write_raw(pin, level);
                }
                ModeKind::Timer => {
                    let autostart = cfg.flags.autostart;
                    let Some(t) = cfg.timer.as_mut() else { continue };
                    if autostart {
                        t.arm();
                        let level = if t.direction == Direction::Up { 0 } else { 1 };
                        let _ = bank.provider.write_raw(pin, level);
                    } else {
                        t.disarm();
                        let _ = bank.provider.write_raw(pin, 0);
                    }
                }
                ModeKind::OutputAnalog => {
                    let autostart = cfg.flags.autostart;
                    let Some(a) = cfg.analog.as_mut() else { continue };
                    a.current = a.lower_bound;
                    a.runtime_direction = if autostart { Some(Direction::Up) } else { None };
                    let lower = a.lower_bound;
                    let _ = bank.provider.write_raw(pin, lower as i32);
                }
                _ => {}
            }
        }
    }

    pub fn capabilities(&self, id: ProviderId, pin: usize) -> Result<Capabilities, ErrorCode> {
        self.bank(id).provider.capabilities(pin)
    }

    pub fn pin_count(&self, id: ProviderId) -> usize {
        self.bank(id).provider.pin_count()
    }

    /// Switches `pin` into `kind`, validating capabilities first and
    /// reverting to `disabled` if the mode's bootstrap write subsequently
    /// fails — matching `application_function_io_mode`'s progressive
    /// disclosure and revert-on-failure behavior.
    pub fn set_mode(
        &mut self,
        id: ProviderId,
        pin: usize,
        kind: ModeKind,
        args: ModeArgs,
    ) -> Result<(), ErrorCode> {
        self.require_detected(id)?;
        let caps = self.capabilities(id, pin)?;
        check_capability(caps, kind)?;

        let bank = self.bank_mut(id);
        if pin >= bank.pins.len() {
            return Err(ErrorCode::NoDevice);
        }

        bank.provider.init_pin_mode(pin, kind)?;

        let mut cfg = PinConfig::disabled();
        cfg.kind = kind;

        let bootstrap = match (kind, args) {
            (ModeKind::OutputDigital, _) => bank.provider.write_raw(pin, 0),
            (ModeKind::Counter, _) => bank.provider.write_raw(pin, 0),
            (ModeKind::Timer, ModeArgs::Timer { direction, delay_ms }) => {
                cfg.timer = Some(TimerRuntime::idle(delay_ms, direction));
                bank.provider.write_raw(pin, 0)
            }
            (ModeKind::Timer, _) => Err(ErrorCode::Inval),
            (
                ModeKind::OutputAnalog,
                ModeArgs::OutputAnalog { mut lower_bound, mut upper_bound, speed_ms },
            ) => {
                // `upper_bound == 0` means "static output, no ramp": mirror
                // the original's `if (upper_bound == 0) upper_bound = lower_bound;`.
                if upper_bound == 0.0 {
                    upper_bound = lower_bound;
                }
                if lower_bound > upper_bound {
                    core::mem::swap(&mut lower_bound, &mut upper_bound);
                }
                cfg.analog = Some(AnalogRuntime {
                    lower_bound,
                    upper_bound,
                    speed_ms,
                    current: lower_bound,
                    runtime_direction: None,
                });
                bank.provider.write_raw(pin, lower_bound as i32)
            }
            (ModeKind::OutputAnalog, _) => Err(ErrorCode::Inval),
            (ModeKind::I2c, ModeArgs::I2c { role, delay_ms }) => {
                Self::configure_i2c(bank, pin, role, delay_ms)
            }
            (ModeKind::I2c, _) => Err(ErrorCode::Inval),
            _ => Ok(()),
        };

        match bootstrap {
            Ok(()) => {
                if kind == ModeKind::I2c {
                    cfg.i2c_role = match args {
                        ModeArgs::I2c { role, .. } => Some(role),
                        _ => None,
                    };
                }
                bank.pins[pin] = cfg;
                log::debug!("{}:{} mode -> {}", id.as_str(), pin, kind.as_str());
                Ok(())
            }
            Err(e) => {
                let _ = bank.provider.init_pin_mode(pin, ModeKind::Disabled);
                bank.pins[pin] = PinConfig::disabled();
                Err(e)
            }
        }
    }

    /// Records `pin` as the bus's `sda` or `scl` line. A provider's i2c
    /// mode is configured at most twice (one `sda`, one `scl`); the bus is
    /// considered initialized once both are present.
    fn configure_i2c(bank: &mut Bank, pin: usize, role: I2cRole, delay_ms: u32) -> Result<(), ErrorCode> {
        match role {
            I2cRole::Sda => {
                if let Some(existing) = bank.i2c_sda {
                    if existing != pin {
                        return Err(ErrorCode::Already);
                    }
                }
                bank.i2c_sda = Some(pin);
            }
            I2cRole::Scl => {
                if let Some((existing, _)) = bank.i2c_scl {
                    if existing != pin {
                        return Err(ErrorCode::Already);
                    }
                }
                bank.i2c_scl = Some((pin, delay_ms));
            }
        }
        if bank.i2c_sda.is_some() && bank.i2c_scl.is_some() && !bank.i2c_initialized {
            bank.i2c_initialized = true;
            log::info!(
                "i2c bus initialized: sda={:?} scl={:?}",
                bank.i2c_sda,
                bank.i2c_scl
            );
        }
        Ok(())
    }

    /// Mutates `flag` on `pin`, saving the pin's prior configuration and
    /// restoring it wholesale on any failure — matching
    /// `io_clear_set_flag`'s "validate, then on failure restore the saved
    /// flags" discipline.
    pub fn set_flag(
        &mut self,
        id: ProviderId,
        pin: usize,
        flag: Flag,
        enabled: bool,
    ) -> Result<(), ErrorCode> {
        self.require_detected(id)?;
        let caps = self.capabilities(id, pin)?;
        if flag == Flag::Pullup && !caps.pullup {
            return Err(ErrorCode::NoSupport);
        }

        let bank = self.bank_mut(id);
        let cfg = bank.pins.get_mut(pin).ok_or(ErrorCode::NoDevice)?;
        let saved = cfg.clone();
        let kind = cfg.kind;

        match flag {
            Flag::Autostart => cfg.flags.autostart = enabled,
            Flag::Repeat => cfg.flags.repeat = enabled,
            Flag::ResetOnRead => cfg.flags.reset_on_read = enabled,
            Flag::Pullup => cfg.flags.pullup = enabled,
        }

        if flag == Flag::Pullup {
            if let Err(e) = bank.provider.set_pullup(pin, enabled) {
                bank.pins[pin] = saved;
                return Err(e);
            }
        }

        if let Err(e) = bank.provider.init_pin_mode(pin, kind) {
            bank.pins[pin] = saved;
            return Err(e);
        }

        Ok(())
    }

    pub fn set_status_trigger(&mut self, id: ProviderId, pin: usize) -> Result<(), ErrorCode> {
        if pin >= self.bank(id).pins.len() {
            return Err(ErrorCode::NoDevice);
        }
        self.status_trigger = Some((id, pin));
        Ok(())
    }

    pub fn set_ntp(&mut self, server: String, timezone: String) {
        self.ntp = Some(NtpConfig { server, timezone });
    }

    pub fn ntp(&self) -> Option<&NtpConfig> {
        self.ntp.as_ref()
    }

    pub fn read_pin(&mut self, id: ProviderId, pin: usize) -> Result<i32, ErrorCode> {
        self.require_detected(id)?;
        let bank = self.bank_mut(id);
        let cfg = bank.pins.get_mut(pin).ok_or(ErrorCode::NoDevice)?;
        let value = bank.provider.read_raw(pin)?;
        if cfg.kind == ModeKind::Counter && cfg.flags.reset_on_read {
            bank.provider.write_raw(pin, 0)?;
        }
        Ok(value)
    }

    /// Writes `value` to `pin`, with mode-specific sentinels on top of a
    /// plain electrical write: `timer` arms/disarms depending on whether
    /// `value` is truthy; `output_analog` starts a ramp on a negative
    /// `value` instead of writing it literally. Refused for
    /// `{disabled, input_digital, counter, input_analog, i2c}`.
    pub fn write_pin(&mut self, id: ProviderId, pin: usize, value: i32) -> Result<(), ErrorCode> {
        self.require_detected(id)?;
        let bank = self.bank_mut(id);
        let cfg = bank.pins.get_mut(pin).ok_or(ErrorCode::NoDevice)?;
        match cfg.kind {
            ModeKind::OutputDigital => bank.provider.write_raw(pin, value),
            ModeKind::Timer => {
                let t = cfg.timer.as_mut().ok_or(ErrorCode::Inval)?;
                if value != 0 {
                    let level = if t.direction == Direction::Up { 0 } else { 1 };
                    t.arm();
                    bank.provider.write_raw(pin, level)
                } else {
                    let level = if t.direction == Direction::Up { 1 } else { 0 };
                    t.disarm();
                    bank.provider.write_raw(pin, level)
                }
            }
            ModeKind::OutputAnalog => {
                let a = cfg.analog.as_mut().ok_or(ErrorCode::Inval)?;
                if value >= 0 {
                    a.runtime_direction = None;
                    a.current = value as f32;
                    bank.provider.write_raw(pin, value)
                } else {
                    a.current = a.lower_bound;
                    a.runtime_direction = Some(Direction::Up);
                    bank.provider.write_raw(pin, a.lower_bound as i32)
                }
            }
            _ => Err(ErrorCode::NoSupport),
        }
    }

    /// Snapshot of `pin`'s configuration and current value, for the
    /// configuration dump. `None` only for an out-of-range pin.
    pub fn describe_pin(&mut self, id: ProviderId, pin: usize) -> Option<PinDump> {
        let value = self.read_pin(id, pin).ok();
        let bank = self.bank_mut(id);
        let cfg = bank.pins.get(pin)?.clone();
        let params = match cfg.kind {
            ModeKind::Timer => cfg.timer.map(|t| {
                format!(
                    "direction={:?} delay_ms={} armed={}",
                    t.direction,
                    t.delay_ms,
                    t.runtime_direction.is_some()
                )
            }),
            ModeKind::OutputAnalog => cfg.analog.map(|a| {
                format!(
                    "lower={} upper={} speed_ms={} armed={}",
                    a.lower_bound,
                    a.upper_bound,
                    a.speed_ms,
                    a.runtime_direction.is_some()
                )
            }),
            ModeKind::I2c => cfg.i2c_role.map(|r| format!("role={:?}", r)),
            _ => None,
        }
        .unwrap_or_default();
        let provider_info = bank.provider.get_pin_info(pin);
        Some(PinDump {
            mode: cfg.kind,
            flags: cfg.flags,
            params,
            value,
            provider_info,
        })
    }

    /// Advances every timer and analog-ramp pin by `elapsed_ms`, then
    /// pulses the configured status-trigger pin if any counter's value
    /// changed during this tick — matching `io_periodic`.
    pub fn periodic(&mut self, elapsed_ms: u32) {
        let fired_gpio = Self::periodic_bank(&mut self.gpio, elapsed_ms);
        let fired_aux = Self::periodic_bank(&mut self.aux, elapsed_ms);

        if fired_gpio || fired_aux {
            if let Some((id, pin)) = self.status_trigger {
                let _ = self.write_pin(id, pin, -1);
            }
        }
    }

    fn periodic_bank(bank: &mut Bank, elapsed_ms: u32) -> bool {
        if !bank.detected {
            return false;
        }

        let any_counter_fired = bank.provider.periodic();

        for pin in 0..bank.pins.len() {
            let kind = bank.pins[pin].kind;

            match kind {
                ModeKind::Timer => {
                    let fire = {
                        let cfg = &mut bank.pins[pin];
                        let Some(t) = cfg.timer.as_mut() else { continue };
                        let Some(dir) = t.runtime_direction else { continue };
                        if t.remaining_ms < 10 {
                            continue;
                        }
                        t.remaining_ms -= elapsed_ms as i64;
                        if t.remaining_ms <= 0 {
                            let (level, next_dir) = match dir {
                                Direction::Up => (1, Direction::Down),
                                Direction::Down => (0, Direction::Up),
                            };
                            if cfg.flags.repeat {
                                let t = cfg.timer.as_mut().unwrap();
                                t.remaining_ms = t.delay_ms as i64;
                                t.runtime_direction = Some(next_dir);
                            } else {
                                cfg.timer.as_mut().unwrap().runtime_direction = None;
                            }
                            Some(level)
                        } else {
                            None
                        }
                    };
                    if let Some(level) = fire {
                        let _ = bank.provider.write_raw(pin, level);
                    }
                }
                ModeKind::OutputAnalog => {
                    let next = {
                        let cfg = &mut bank.pins[pin];
                        let Some(a) = cfg.analog.as_mut() else { continue };
                        if !(a.upper_bound > a.lower_bound) || a.speed_ms == 0 {
                            continue;
                        }
                        let Some(dir) = a.runtime_direction else { continue };
                        // Ramp factor from the original: (delay/10000.0)+1.
                        let factor = (a.speed_ms as f32 / 10000.0) + 1.0;
                        match dir {
                            Direction::Up => {
                                a.current *= factor;
                                if a.current >= a.upper_bound {
                                    a.current = a.upper_bound;
                                    a.runtime_direction = Some(Direction::Down);
                                }
                            }
                            Direction::Down => {
                                a.current /= factor;
                                if a.current <= a.lower_bound {
                                    a.current = a.lower_bound;
                                    a.runtime_direction =
                                        if cfg.flags.repeat { Some(Direction::Up) } else { None };
                                }
                            }
                        }
                        a.current
                    };
                    let _ = bank.provider.write_raw(pin, next as i32);
                }
                _ => {}
            }
        }

        any_counter_fired
    }
}

impl Default for IoCore {
    fn default() -> Self {
        Self::new()
    }
}

fn check_capability(caps: Capabilities, kind: ModeKind) -> Result<(), ErrorCode> {
    let supported = match kind {
        ModeKind::Disabled => true,
        ModeKind::InputDigital => caps.input_digital,
        ModeKind::Counter => caps.counter,
        ModeKind::OutputDigital => caps.output_digital,
        ModeKind::Timer => caps.output_digital,
        ModeKind::InputAnalog => caps.input_analog,
        ModeKind::OutputAnalog => caps.output_analog,
        ModeKind::I2c => caps.i2c,
    };
    if supported {
        Ok(())
    } else {
        Err(ErrorCode::NoSupport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booted() -> IoCore {
        let mut io = IoCore::new();
        io.init();
        io
    }

    #[test]
    fn timer_with_delay_10_fires_on_first_tick() {
        let mut io = booted();
        io.set_mode(
            ProviderId::Gpio,
            0,
            ModeKind::Timer,
            ModeArgs::Timer { direction: Direction::Up, delay_ms: 10 },
        )
        .unwrap();
        io.write_pin(ProviderId::Gpio, 0, 1).unwrap();
        assert_eq!(io.read_pin(ProviderId::Gpio, 0).unwrap(), 0);
        io.periodic(10);
        assert_eq!(io.read_pin(ProviderId::Gpio, 0).unwrap(), 1);
    }

    #[test]
    fn timer_with_delay_20_needs_two_ticks() {
        let mut io = booted();
        io.set_mode(
            ProviderId::Gpio,
            1,
            ModeKind::Timer,
            ModeArgs::Timer { direction: Direction::Up, delay_ms: 20 },
        )
        .unwrap();
        io.write_pin(ProviderId::Gpio, 1, 1).unwrap();
        io.periodic(10);
        assert_eq!(io.read_pin(ProviderId::Gpio, 1).unwrap(), 0);
        io.periodic(10);
        assert_eq!(io.read_pin(ProviderId::Gpio, 1).unwrap(), 1);
    }

    #[test]
    fn non_repeating_timer_disarms_after_one_fire() {
        let mut io = booted();
        io.set_mode(
            ProviderId::Gpio,
            2,
            ModeKind::Timer,
            ModeArgs::Timer { direction: Direction::Up, delay_ms: 10 },
        )
        .unwrap();
        io.write_pin(ProviderId::Gpio, 2, 1).unwrap();
        io.periodic(10);
        assert_eq!(io.read_pin(ProviderId::Gpio, 2).unwrap(), 1);
        io.periodic(10);
        io.periodic(10);
        assert_eq!(io.read_pin(ProviderId::Gpio, 2).unwrap(), 1);
    }

    #[test]
    fn falsy_write_disarms_a_timer_immediately() {
        let mut io = booted();
        io.set_mode(
            ProviderId::Gpio,
            3,
            ModeKind::Timer,
            ModeArgs::Timer { direction: Direction::Up, delay_ms: 10 },
        )
        .unwrap();
        io.write_pin(ProviderId::Gpio, 3, 1).unwrap();
        io.write_pin(ProviderId::Gpio, 3, 0).unwrap();
        io.periodic(10);
        io.periodic(10);
        assert_eq!(io.read_pin(ProviderId::Gpio, 3).unwrap(), 1);
    }

    #[test]
    fn output_digital_autostart_bootstraps_to_one() {
        let mut io = booted();
        io.set_mode(ProviderId::Gpio, 5, ModeKind::OutputDigital, ModeArgs::Plain).unwrap();
        io.set_flag(ProviderId::Gpio, 5, Flag::Autostart, true).unwrap();
        io.bootstrap();
        assert_eq!(io.read_pin(ProviderId::Gpio, 5).unwrap(), 1);
    }

    #[test]
    fn analog_ramp_only_runs_when_armed() {
        let mut io = booted();
        io.set_mode(
            ProviderId::Gpio,
            4,
            ModeKind::OutputAnalog,
            ModeArgs::OutputAnalog { lower_bound: 10.0, upper_bound: 100.0, speed_ms: 1000 },
        )
        .unwrap();
        for _ in 0..5 {
            io.periodic(10);
        }
        assert_eq!(io.read_pin(ProviderId::Gpio, 4).unwrap(), 10);
        io.write_pin(ProviderId::Gpio, 4, -1).unwrap();
        io.periodic(10);
        assert!(io.read_pin(ProviderId::Gpio, 4).unwrap() >= 10);
    }

    #[test]
    fn analog_ramp_flips_direction_at_upper_bound() {
        let mut io = booted();
        io.set_mode(
            ProviderId::Gpio,
            6,
            ModeKind::OutputAnalog,
            ModeArgs::OutputAnalog { lower_bound: 10.0, upper_bound: 20.0, speed_ms: 50000 },
        )
        .unwrap();
        io.write_pin(ProviderId::Gpio, 6, -1).unwrap();
        for _ in 0..50 {
            io.periodic(10);
        }
        assert_eq!(io.read_pin(ProviderId::Gpio, 6).unwrap(), 20);
    }

    #[test]
    fn analog_ramp_disarms_at_lower_bound_without_repeat() {
        let mut io = booted();
        io.set_mode(
            ProviderId::Gpio,
            7,
            ModeKind::OutputAnalog,
            ModeArgs::OutputAnalog { lower_bound: 10.0, upper_bound: 12.0, speed_ms: 50000 },
        )
        .unwrap();
        io.write_pin(ProviderId::Gpio, 7, -1).unwrap();
        for _ in 0..200 {
            io.periodic(10);
        }
        let settled = io.read_pin(ProviderId::Gpio, 7).unwrap();
        assert_eq!(settled, 10);
        for _ in 0..5 {
            io.periodic(10);
        }
        assert_eq!(io.read_pin(ProviderId::Gpio, 7).unwrap(), 10);
    }

    #[test]
    fn outputa_zero_upper_bound_is_static() {
        let mut io = booted();
        io.set_mode(
            ProviderId::Gpio,
            8,
            ModeKind::OutputAnalog,
            ModeArgs::OutputAnalog { lower_bound: 42.0, upper_bound: 0.0, speed_ms: 1000 },
        )
        .unwrap();
        io.periodic(10);
        assert_eq!(io.read_pin(ProviderId::Gpio, 8).unwrap(), 42);
    }

    #[test]
    fn capability_mismatch_is_rejected() {
        let mut io = booted();
        let err = io
            .set_mode(ProviderId::Aux, 0, ModeKind::Counter, ModeArgs::Plain)
            .unwrap_err();
        assert_eq!(err, ErrorCode::NoSupport);
    }

    #[test]
    fn undetected_provider_short_circuits_every_operation() {
        let io = IoCore::new();
        assert!(!io.is_detected(ProviderId::Gpio));
    }

    #[test]
    fn operations_before_init_are_refused() {
        let mut io = IoCore::new();
        let err = io
            .set_mode(ProviderId::Gpio, 0, ModeKind::OutputDigital, ModeArgs::Plain)
            .unwrap_err();
        assert_eq!(err, ErrorCode::Off);
    }

    #[test]
    fn set_mode_reverts_to_disabled_on_bootstrap_failure() {
        let mut io = booted();
        let err = io
            .set_mode(ProviderId::Gpio, 9, ModeKind::Timer, ModeArgs::Plain)
            .unwrap_err();
        assert_eq!(err, ErrorCode::Inval);
        assert_eq!(
            io.read_pin(ProviderId::Gpio, 9).unwrap_err(),
            ErrorCode::Off
        );
    }

    #[test]
    fn set_flag_pullup_on_unsupported_provider_leaves_flags_untouched() {
        let mut io = booted();
        io.set_mode(ProviderId::Aux, 0, ModeKind::OutputDigital, ModeArgs::Plain).unwrap();
        let err = io.set_flag(ProviderId::Aux, 0, Flag::Pullup, true).unwrap_err();
        assert_eq!(err, ErrorCode::NoSupport);
        let dump = io.describe_pin(ProviderId::Aux, 0).unwrap();
        assert!(!dump.flags.pullup);
    }

    #[test]
    fn set_flag_applies_successfully_on_capable_provider() {
        let mut io = booted();
        io.set_mode(ProviderId::Gpio, 10, ModeKind::OutputDigital, ModeArgs::Plain).unwrap();
        io.set_flag(ProviderId::Gpio, 10, Flag::Pullup, true).unwrap();
        let dump = io.describe_pin(ProviderId::Gpio, 10).unwrap();
        assert!(dump.flags.pullup);
    }

    #[test]
    fn reset_on_read_clears_counter() {
        let mut io = booted();
        io.set_mode(ProviderId::Gpio, 11, ModeKind::Counter, ModeArgs::Plain).unwrap();
        io.set_flag(ProviderId::Gpio, 11, Flag::ResetOnRead, true).unwrap();
        // write_pin refuses a counter (only a provider's raw write can
        // reset its count); reading a freshly-configured counter should
        // settle at zero either way.
        assert_eq!(io.write_pin(ProviderId::Gpio, 11, 5), Err(ErrorCode::NoSupport));
        assert_eq!(io.read_pin(ProviderId::Gpio, 11).unwrap(), 0);
    }

    #[test]
    fn status_trigger_pulses_on_counter_change() {
        let mut io = booted();
        io.set_mode(ProviderId::Gpio, 12, ModeKind::Counter, ModeArgs::Plain).unwrap();
        io.set_mode(ProviderId::Gpio, 13, ModeKind::OutputDigital, ModeArgs::Plain).unwrap();
        io.set_status_trigger(ProviderId::Gpio, 13).unwrap();
        io.periodic(10);
        assert!(io.read_pin(ProviderId::Gpio, 13).is_ok());
    }

    #[test]
    fn i2c_bus_initializes_once_both_pins_are_configured() {
        let mut io = booted();
        io.set_mode(
            ProviderId::Gpio,
            14,
            ModeKind::I2c,
            ModeArgs::I2c { role: I2cRole::Sda, delay_ms: 0 },
        )
        .unwrap();
        io.set_mode(
            ProviderId::Gpio,
            15,
            ModeKind::I2c,
            ModeArgs::I2c { role: I2cRole::Scl, delay_ms: 5 },
        )
        .unwrap();
        assert!(io.gpio.i2c_initialized);
    }
}
