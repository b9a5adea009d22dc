//! PROFIBUS FDL telegram codec.
//!
//! Translates between raw bytes from a serial-line transceiver and typed
//! telegrams. The start delimiter selects the shape:
//! - `0xE5` short acknowledgement
//! - `0x10` fixed length, no data unit
//! - `0xA2` fixed length, 8 byte data unit
//! - `0x68` variable length, 0-246 byte data unit
//! - `0xDC` token
//!
//! Every shape except the acknowledgement and the token carries a mod-256
//! checksum and ends with `0x16`. [`decode`] checks lengths before any
//! indexed access, so truncated or hostile input is always an error, never
//! a panic.
//!
//! [`TelegramReader`] and [`TelegramWriter`] frame telegrams on blocking
//! byte streams; with the `async` feature, [`TelegramCodec`] does the same
//! for `tokio_util::codec`.

pub mod codec;
pub mod control;
pub mod delimiter;
pub mod error;
pub mod reader;
pub mod writer;

#[cfg(feature = "async")]
pub mod async_codec;

pub use codec::{
    checksum, decode, decode_telegram, encode, encode_into, skip_to_start_delimiter,
    telegram_len, DataUnit, Frame, TelegramConfig, FIXED_DATA_LEN, MAX_DATA_LEN, MAX_LE, MIN_LE,
};
pub use control::FrameControl;
pub use delimiter::{delimiter_name, is_start_delimiter, ED, SC, SD1, SD2, SD3, SD4};
pub use error::{Result, TelegramError};
pub use reader::TelegramReader;
pub use writer::TelegramWriter;

#[cfg(feature = "async")]
pub use async_codec::TelegramCodec;
