//! PROFIBUS FDL telegram toolkit.
//!
//! # Crate Structure
//!
//! - [`telegram`]: Telegram codec, stream reader/writer, FC and address helpers
//!
//! The `fdl` binary (behind the `cli` feature) decodes, encodes and
//! inspects telegrams from the command line.

/// Re-export telegram types.
pub mod telegram {
    pub use fdl_telegram::*;
}

pub use fdl_telegram::{decode, encode, Frame, TelegramError};
