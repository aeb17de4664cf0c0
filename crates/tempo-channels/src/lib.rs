//! # tempo-channels
//!
//! Transport integrations for Tempo.

pub mod console;

pub use console::ConsoleTransport;
