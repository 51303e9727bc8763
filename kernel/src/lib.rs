//! HIL traits, error codes, and cooperative-scheduling primitives shared by
//! every capsule and board in this workspace.
//!
//! Reconstructed in the idiom of Tock's own `kernel` crate: HIL traits at
//! `hil::*`, a `Copy` `ErrorCode` rather than a boxed error, and a
//! `Cell`-based `task::DeferredCall` instead of locks, since nothing in
//! this firmware runs on more than one thread (see the concurrency model
//! in `SPEC_FULL.md` §5).

pub mod errorcode;
pub mod hil;
pub mod task;

pub use errorcode::{CoreError, ErrorCode};
