//! The two built-in provider adapters, grounded on `original_source/io.c`'s
//! `io_info[]` table: internal GPIO (`io_id_gpio`) and the auxiliary
//! ADC/RTC bank (`io_id_aux`). Both are software-simulated here — real
//! register access is the hardware-specific body a platform layer would
//! supply, out of scope for this core — but they implement the exact
//! capability sets and mode restrictions of the original descriptors so the
//! I/O core's validation logic has a faithful adapter to exercise against.

pub mod aux;
pub mod gpio;

pub use aux::AuxProvider;
pub use gpio::GpioProvider;
