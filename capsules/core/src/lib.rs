//! Platform-independent I/O core, socket multiplexer, and TCP bridge.
//!
//! Everything here is written purely against `kernel::hil::*` traits; no
//! module in this crate touches a real socket, GPIO register, or clock.
//! That boundary is the same one Tock draws between `capsules` and
//! `boards`/`chips`.

pub mod bridge;
pub mod command;
pub mod io_core;
pub mod net;
pub mod providers;
