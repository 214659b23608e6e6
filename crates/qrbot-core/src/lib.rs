//! Core logic for a QR chat-bot plugin: turn a URL in a message into a QR
//! image file, or decode a QR image back into text.
//!
//! This crate is intentionally framework-agnostic. The chat platform
//! (message delivery, image downloads) lives behind ports (traits)
//! implemented in adapter crates.

pub mod config;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod messaging;
pub mod qr;
pub mod service;
pub mod tempfiles;

pub use errors::{Error, Result};
