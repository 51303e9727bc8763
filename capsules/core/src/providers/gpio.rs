//! Internal GPIO provider, grounded on `io_info[io_id_gpio]`: 16 pins,
//! capabilities `{input_digital, counter, output_digital, output_analog,
//! i2c, pullup}` — no `input_analog`. Electrical state is simulated in
//! memory; a real board would replace this with register access, which is
//! explicitly out of scope for this core.

use kernel::errorcode::ErrorCode;
use kernel::hil::pin::{Capabilities, ModeKind, PinProvider};

pub const PIN_COUNT: usize = 16;

const CAPS: Capabilities = Capabilities {
    input_digital: true,
    counter: true,
    output_digital: true,
    output_analog: true,
    input_analog: false,
    i2c: true,
    pullup: true,
};

#[derive(Copy, Clone)]
struct GpioPin {
    mode: ModeKind,
    level: bool,
    analog: i32,
    counter: u32,
    last_counter: u32,
    pullup: bool,
}

impl Default for GpioPin {
    fn default() -> Self {
        GpioPin {
            mode: ModeKind::Disabled,
            level: false,
            analog: 0,
            counter: 0,
            last_counter: 0,
            pullup: false,
        }
    }
}

pub struct GpioProvider {
    pins: [GpioPin; PIN_COUNT],
    /// Test/simulation hook: force the next `init()` call to fail, to
    /// exercise the undetected-provider short-circuit path.
    fail_init: bool,
}

impl GpioProvider {
    pub fn new() -> Self {
        GpioProvider {
            pins: [GpioPin::default(); PIN_COUNT],
            fail_init: false,
        }
    }

    /// Test/simulation hook: inject an edge on a counter pin, or a level on
    /// a digital input pin, as a real GPIO interrupt would.
    pub fn simulate_input(&mut self, pin: usize, level: bool) -> Result<(), ErrorCode> {
        let p = self.pins.get_mut(pin).ok_or(ErrorCode::NoDevice)?;
        match p.mode {
            ModeKind::InputDigital => p.level = level,
            ModeKind::Counter => {
                if level {
                    p.counter = p.counter.wrapping_add(1);
                }
            }
            _ => return Err(ErrorCode::NoSupport),
        }
        Ok(())
    }

    #[cfg(test)]
    pub fn simulate_init_failure(&mut self) {
        self.fail_init = true;
    }
}

impl PinProvider for GpioProvider {
    fn name(&self) -> &'static str {
        "gpio"
    }

    fn pin_count(&self) -> usize {
        PIN_COUNT
    }

    fn capabilities(&self, pin: usize) -> Result<Capabilities, ErrorCode> {
        if pin >= PIN_COUNT {
            return Err(ErrorCode::NoDevice);
        }
        Ok(CAPS)
    }

    fn electrical_mode(&self, pin: usize) -> Result<ModeKind, ErrorCode> {
        Ok(self.pins.get(pin).ok_or(ErrorCode::NoDevice)?.mode)
    }

    fn init(&mut self) -> Result<(), ErrorCode> {
        if self.fail_init {
            return Err(ErrorCode::Fail);
        }
        self.pins = [GpioPin::default(); PIN_COUNT];
        Ok(())
    }

    fn init_pin_mode(&mut self, pin: usize, kind: ModeKind) -> Result<(), ErrorCode> {
        let p = self.pins.get_mut(pin).ok_or(ErrorCode::NoDevice)?;
        p.mode = kind;
        p.level = false;
        p.analog = 0;
        p.counter = 0;
        p.last_counter = 0;
        Ok(())
    }

    fn read_raw(&mut self, pin: usize) -> Result<i32, ErrorCode> {
        let p = self.pins.get(pin).ok_or(ErrorCode::NoDevice)?;
        match p.mode {
            ModeKind::InputDigital | ModeKind::OutputDigital | ModeKind::Timer => {
                Ok(p.level as i32)
            }
            ModeKind::Counter => Ok(p.counter as i32),
            ModeKind::OutputAnalog => Ok(p.analog),
            ModeKind::Disabled => Err(ErrorCode::Off),
            ModeKind::InputAnalog => Err(ErrorCode::NoSupport),
            ModeKind::I2c => Err(ErrorCode::NoSupport),
        }
    }

    fn write_raw(&mut self, pin: usize, value: i32) -> Result<(), ErrorCode> {
        let p = self.pins.get_mut(pin).ok_or(ErrorCode::NoDevice)?;
        match p.mode {
            ModeKind::OutputDigital | ModeKind::Timer => {
                p.level = value != 0;
                Ok(())
            }
            ModeKind::OutputAnalog => {
                p.analog = value;
                Ok(())
            }
            ModeKind::Counter => {
                // A write to a counter resets its accumulated count.
                p.counter = value as u32;
                p.last_counter = p.counter;
                Ok(())
            }
            ModeKind::Disabled => Err(ErrorCode::Off),
            ModeKind::InputDigital | ModeKind::InputAnalog | ModeKind::I2c => {
                Err(ErrorCode::NoSupport)
            }
        }
    }

    fn set_pullup(&mut self, pin: usize, enabled: bool) -> Result<(), ErrorCode> {
        let p = self.pins.get_mut(pin).ok_or(ErrorCode::NoDevice)?;
        p.pullup = enabled;
        Ok(())
    }

    fn periodic(&mut self) -> bool {
        let mut any = false;
        for p in self.pins.iter_mut() {
            if p.mode == ModeKind::Counter && p.counter != p.last_counter {
                any = true;
                p.last_counter = p.counter;
            }
        }
        any
    }

    fn get_pin_info(&self, pin: usize) -> String {
        match self.pins.get(pin) {
            Some(p) => format!("gpio[{}] pullup={}", pin, p.pullup),
            None => "no such pin".to_string(),
        }
    }
}

impl Default for GpioProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_input_analog() {
        let p = GpioProvider::new();
        assert!(!p.capabilities(0).unwrap().input_analog);
    }

    #[test]
    fn counter_accumulates_and_resets() {
        let mut p = GpioProvider::new();
        p.init_pin_mode(3, ModeKind::Counter).unwrap();
        p.simulate_input(3, true).unwrap();
        p.simulate_input(3, true).unwrap();
        assert_eq!(p.read_raw(3).unwrap(), 2);
        p.write_raw(3, 0).unwrap();
        assert_eq!(p.read_raw(3).unwrap(), 0);
    }

    #[test]
    fn out_of_range_pin_is_no_device() {
        let mut p = GpioProvider::new();
        assert_eq!(p.read_raw(99), Err(ErrorCode::NoDevice));
    }

    #[test]
    fn periodic_reports_counter_edges_once() {
        let mut p = GpioProvider::new();
        p.init_pin_mode(0, ModeKind::Counter).unwrap();
        assert!(!p.periodic());
        p.simulate_input(0, true).unwrap();
        assert!(p.periodic());
        assert!(!p.periodic());
    }

    #[test]
    fn forced_init_failure_is_reported() {
        let mut p = GpioProvider::new();
        p.simulate_init_failure();
        assert!(p.init().is_err());
    }
}
