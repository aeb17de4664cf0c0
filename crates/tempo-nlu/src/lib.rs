//! # tempo-nlu
//!
//! Intent classification and parameter extraction for the Tempo skill.

pub mod action;
pub mod extract;
pub mod scanner;

pub use action::Action;
pub use extract::{find_parameters, Parameters, TimerSummary};
pub use scanner::WordScanner;
