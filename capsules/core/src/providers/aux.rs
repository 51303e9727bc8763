//! Auxiliary ADC/RTC provider, grounded on `io_info[io_id_aux]`: 2 pins,
//! capabilities `{input_digital, output_digital, input_analog}` — notably
//! no `counter`, `output_analog`, `i2c`, or `pullup`.

use kernel::errorcode::ErrorCode;
use kernel::hil::pin::{Capabilities, ModeKind, PinProvider};

pub const PIN_COUNT: usize = 2;

const CAPS: Capabilities = Capabilities {
    input_digital: true,
    counter: false,
    output_digital: true,
    output_analog: false,
    input_analog: true,
    i2c: false,
    pullup: false,
};

#[derive(Copy, Clone)]
struct AuxPin {
    mode: ModeKind,
    level: bool,
    analog_sample: i32,
}

impl Default for AuxPin {
    fn default() -> Self {
        AuxPin {
            mode: ModeKind::Disabled,
            level: false,
            analog_sample: 0,
        }
    }
}

pub struct AuxProvider {
    pins: [AuxPin; PIN_COUNT],
}

impl AuxProvider {
    pub fn new() -> Self {
        AuxProvider {
            pins: [AuxPin::default(); PIN_COUNT],
        }
    }

    /// Test/simulation hook standing in for a real ADC conversion.
    pub fn simulate_analog_sample(&mut self, pin: usize, sample: i32) -> Result<(), ErrorCode> {
        let p = self.pins.get_mut(pin).ok_or(ErrorCode::NoDevice)?;
        if p.mode != ModeKind::InputAnalog {
            return Err(ErrorCode::NoSupport);
        }
        p.analog_sample = sample;
        Ok(())
    }
}

impl PinProvider for AuxProvider {
    fn name(&self) -> &'static str {
        "aux"
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
        self.pins = [AuxPin::default(); PIN_COUNT];
        Ok(())
    }

    fn init_pin_mode(&mut self, pin: usize, kind: ModeKind) -> Result<(), ErrorCode> {
        let p = self.pins.get_mut(pin).ok_or(ErrorCode::NoDevice)?;
        p.mode = kind;
        p.level = false;
        p.analog_sample = 0;
        Ok(())
    }

    fn read_raw(&mut self, pin: usize) -> Result<i32, ErrorCode> {
        let p = self.pins.get(pin).ok_or(ErrorCode::NoDevice)?;
        match p.mode {
            ModeKind::InputDigital | ModeKind::OutputDigital => Ok(p.level as i32),
            ModeKind::InputAnalog => Ok(p.analog_sample),
            ModeKind::Disabled => Err(ErrorCode::Off),
            _ => Err(ErrorCode::NoSupport),
        }
    }

    fn write_raw(&mut self, pin: usize, value: i32) -> Result<(), ErrorCode> {
        let p = self.pins.get_mut(pin).ok_or(ErrorCode::NoDevice)?;
        match p.mode {
            ModeKind::OutputDigital => {
                p.level = value != 0;
                Ok(())
            }
            ModeKind::Disabled => Err(ErrorCode::Off),
            _ => Err(ErrorCode::NoSupport),
        }
    }

    fn set_pullup(&mut self, _pin: usize, _enabled: bool) -> Result<(), ErrorCode> {
        Err(ErrorCode::NoSupport)
    }

    fn periodic(&mut self) -> bool {
        false
    }

    fn get_pin_info(&self, pin: usize) -> String {
        match self.pins.get(pin) {
            Some(_) => format!("aux[{}]", pin),
            None => "no such pin".to_string(),
        }
    }
}

impl Default for AuxProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_no_counter_or_i2c() {
        let p = AuxProvider::new();
        let caps = p.capabilities(0).unwrap();
        assert!(!caps.counter);
        assert!(!caps.i2c);
        assert!(caps.input_analog);
    }

    #[test]
    fn analog_input_ignores_writes() {
        let mut p = AuxProvider::new();
        p.init_pin_mode(1, ModeKind::InputAnalog).unwrap();
        assert_eq!(p.write_raw(1, 5), Err(ErrorCode::NoSupport));
    }
}
