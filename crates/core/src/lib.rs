//! Bridge between a host runtime and a native speech-recognition engine.
//!
//! Hosts either embed [`session::session_registry::SessionRegistry`] directly or
//! call the C ABI in [`ffi`]. Every request yields one JSON-shaped payload.

pub mod audio;
pub mod encoding;
pub mod ffi;
pub mod inference;
pub mod session;
pub mod shared;
