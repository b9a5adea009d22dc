use std::ops::Deref;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::delimiter::{ED, SC, SD1, SD2, SD3, SD4};
use crate::error::{Result, TelegramError};

/// Data unit length of an SD3 telegram.
pub const FIXED_DATA_LEN: usize = 8;

/// Largest data unit an SD2 telegram can carry.
pub const MAX_DATA_LEN: usize = 246;

/// Smallest LE value: DA + SA + FC.
pub const MIN_LE: u8 = 3;

/// Largest LE value.
pub const MAX_LE: u8 = 249;

/// Wire size of an SD1 telegram.
pub const FIXED_NO_DATA_SIZE: usize = 6;

/// Wire size of an SD3 telegram.
pub const FIXED_DATA_SIZE: usize = 14;

/// Wire size of an SD4 telegram.
pub const TOKEN_SIZE: usize = 3;

/// Wire size of an SC telegram.
pub const SHORT_ACK_SIZE: usize = 1;

/// Framing bytes of an SD2 telegram around its LE bytes: SD, LE, LEr, SD, FCS, ED.
pub const VARIABLE_OVERHEAD: usize = 6;

/// Data unit of a variable-length telegram, at most [`MAX_DATA_LEN`] bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DataUnit(Bytes);

impl DataUnit {
    /// Wrap `data`, rejecting anything longer than [`MAX_DATA_LEN`].
    pub fn new(data: impl Into<Bytes>) -> Result<Self> {
        let data = data.into();
        if data.len() > MAX_DATA_LEN {
            return Err(TelegramError::InvalidDataLength {
                kind: "SD2",
                len: data.len(),
                expected: "at most 246",
            });
        }
        Ok(Self(data))
    }

    pub fn into_bytes(self) -> Bytes {
        self.0
    }
}

impl Deref for DataUnit {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for DataUnit {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<Vec<u8>> for DataUnit {
    type Error = TelegramError;

    fn try_from(value: Vec<u8>) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&[u8]> for DataUnit {
    type Error = TelegramError;

    fn try_from(value: &[u8]) -> Result<Self> {
        Self::new(Bytes::copy_from_slice(value))
    }
}

/// One FDL telegram.
///
/// Each variant corresponds to one start delimiter and carries only the
/// fields its wire shape has. `da`/`sa` are raw address bytes (bit 7 is
/// the SAP flag), `fc` is the raw frame-control byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Frame {
    /// `SC` (0xE5) single-character acknowledgement.
    ShortAck,
    /// `SD1` (0x10) fixed-length telegram without data unit.
    FixedNoData { da: u8, sa: u8, fc: u8 },
    /// `SD3` (0xA2) fixed-length telegram with an 8 byte data unit.
    FixedData {
        da: u8,
        sa: u8,
        fc: u8,
        du: [u8; FIXED_DATA_LEN],
    },
    /// `SD2` (0x68) variable-length telegram.
    VariableData {
        da: u8,
        sa: u8,
        fc: u8,
        du: DataUnit,
    },
    /// `SD4` (0xDC) token telegram.
    Token { da: u8, sa: u8 },
}

impl Frame {
    pub fn short_ack() -> Self {
        Self::ShortAck
    }

    pub fn token(da: u8, sa: u8) -> Self {
        Self::Token { da, sa }
    }

    pub fn fixed_no_data(da: u8, sa: u8, fc: u8) -> Self {
        Self::FixedNoData { da, sa, fc }
    }

    /// Create an SD3 telegram; `du` must be exactly 8 bytes.
    pub fn fixed_data(da: u8, sa: u8, fc: u8, du: &[u8]) -> Result<Self> {
        let fixed: [u8; FIXED_DATA_LEN] =
            du.try_into().map_err(|_| TelegramError::InvalidDataLength {
                kind: "SD3",
                len: du.len(),
                expected: "exactly 8",
            })?;
        Ok(Self::FixedData {
            da,
            sa,
            fc,
            du: fixed,
        })
    }

    /// Create an SD2 telegram; `du` must be at most 246 bytes.
    pub fn variable_data(da: u8, sa: u8, fc: u8, du: impl Into<Bytes>) -> Result<Self> {
        Ok(Self::VariableData {
            da,
            sa,
            fc,
            du: DataUnit::new(du)?,
        })
    }

    /// The start delimiter this frame is sent with.
    pub fn start_delimiter(&self) -> u8 {
        match self {
            Self::ShortAck => SC,
            Self::FixedNoData { .. } => SD1,
            Self::FixedData { .. } => SD3,
            Self::VariableData { .. } => SD2,
            Self::Token { .. } => SD4,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::ShortAck => "short_ack",
            Self::FixedNoData { .. } => "fixed_no_data",
            Self::FixedData { .. } => "fixed_data",
            Self::VariableData { .. } => "variable_data",
            Self::Token { .. } => "token",
        }
    }

    pub fn destination(&self) -> Option<u8> {
        match self {
            Self::ShortAck => None,
            Self::FixedNoData { da, .. }
            | Self::FixedData { da, .. }
            | Self::VariableData { da, .. }
            | Self::Token { da, .. } => Some(*da),
        }
    }

    pub fn source(&self) -> Option<u8> {
        match self {
            Self::ShortAck => None,
            Self::FixedNoData { sa, .. }
            | Self::FixedData { sa, .. }
            | Self::VariableData { sa, .. }
            | Self::Token { sa, .. } => Some(*sa),
        }
    }

    pub fn control(&self) -> Option<u8> {
        match self {
            Self::ShortAck | Self::Token { .. } => None,
            Self::FixedNoData { fc, .. }
            | Self::FixedData { fc, .. }
            | Self::VariableData { fc, .. } => Some(*fc),
        }
    }

    /// The data unit; empty for shapes without one.
    pub fn data_unit(&self) -> &[u8] {
        match self {
            Self::FixedData { du, .. } => &du[..],
            Self::VariableData { du, .. } => &du[..],
            _ => &[],
        }
    }

    /// Number of bytes this frame occupies on the wire.
    pub fn wire_size(&self) -> usize {
        match self {
            Self::ShortAck => SHORT_ACK_SIZE,
            Self::Token { .. } => TOKEN_SIZE,
            Self::FixedNoData { .. } => FIXED_NO_DATA_SIZE,
            Self::FixedData { .. } => FIXED_DATA_SIZE,
            Self::VariableData { du, .. } => VARIABLE_OVERHEAD + MIN_LE as usize + du.len(),
        }
    }

    /// Encode into a freshly allocated buffer.
    pub fn to_bytes(&self) -> Bytes {
        encode(self)
    }
}

impl TryFrom<&[u8]> for Frame {
    type Error = TelegramError;

    fn try_from(data: &[u8]) -> Result<Self> {
        decode(data)
    }
}

/// Frame check sequence: unsigned sum of `data`, truncated to 8 bits.
pub fn checksum(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |acc, b| acc.wrapping_add(*b))
}

/// Encode a frame into its wire format.
pub fn encode(frame: &Frame) -> Bytes {
    let mut dst = BytesMut::with_capacity(frame.wire_size());
    encode_into(frame, &mut dst);
    dst.freeze()
}

/// Append the wire format of `frame` to `dst`.
///
/// ```text
/// SC   E5
/// SD4  DC DA SA
/// SD1  10 DA SA FC FCS 16
/// SD3  A2 DA SA FC DU[8] FCS 16
/// SD2  68 LE LEr 68 DA SA FC DU[LE-3] FCS 16
/// ```
///
/// The SD1/SD3 FCS covers DA through the last DU byte. The SD2 FCS covers
/// the repeated SD through the last DU byte.
pub fn encode_into(frame: &Frame, dst: &mut BytesMut) {
    dst.reserve(frame.wire_size());
    match frame {
        Frame::ShortAck => dst.put_u8(SC),
        Frame::Token { da, sa } => {
            dst.put_slice(&[SD4, *da, *sa]);
        }
        Frame::FixedNoData { da, sa, fc } => {
            let start = dst.len();
            dst.put_slice(&[SD1, *da, *sa, *fc]);
            put_trailer(dst, start + 1);
        }
        Frame::FixedData { da, sa, fc, du } => {
            let start = dst.len();
            dst.put_slice(&[SD3, *da, *sa, *fc]);
            dst.put_slice(du);
            put_trailer(dst, start + 1);
        }
        Frame::VariableData { da, sa, fc, du } => {
            // DataUnit caps the length at 246, so LE fits in a byte.
            let le = MIN_LE + du.len() as u8;
            dst.put_slice(&[SD2, le, le]);
            let start = dst.len();
            dst.put_slice(&[SD2, *da, *sa, *fc]);
            dst.put_slice(du);
            put_trailer(dst, start);
        }
    }
}

fn put_trailer(dst: &mut BytesMut, fcs_start: usize) {
    let fcs = checksum(&dst[fcs_start..]);
    dst.put_u8(fcs);
    dst.put_u8(ED);
}

/// Decode exactly one telegram from `data`.
///
/// The whole buffer must be the telegram: shapes with a fixed size reject
/// any other length, SD2 rejects bytes past its own end delimiter.
pub fn decode(data: &[u8]) -> Result<Frame> {
    let sd = byte_at(data, 0)?;
    match sd {
        SC => {
            expect_len(data, SHORT_ACK_SIZE)?;
            Ok(Frame::ShortAck)
        }
        SD4 => {
            expect_len(data, TOKEN_SIZE)?;
            Ok(Frame::Token {
                da: data[1],
                sa: data[2],
            })
        }
        SD1 => {
            expect_len(data, FIXED_NO_DATA_SIZE)?;
            check_trailer(data, 1, 4)?;
            Ok(Frame::FixedNoData {
                da: data[1],
                sa: data[2],
                fc: data[3],
            })
        }
        SD3 => {
            expect_len(data, FIXED_DATA_SIZE)?;
            check_trailer(data, 1, 12)?;
            let mut du = [0u8; FIXED_DATA_LEN];
            du.copy_from_slice(&data[4..12]);
            Ok(Frame::FixedData {
                da: data[1],
                sa: data[2],
                fc: data[3],
                du,
            })
        }
        SD2 => decode_variable(data),
        other => Err(TelegramError::InvalidStartDelimiter(other)),
    }
}

fn decode_variable(data: &[u8]) -> Result<Frame> {
    let le = variable_le(data)?;
    let repeated_sd = byte_at(data, 3)?;
    if repeated_sd != SD2 {
        return Err(TelegramError::RepeatedStartDelimiterMismatch(repeated_sd));
    }

    let le = le as usize;
    let fcs_at = 4 + le;
    let total = fcs_at + 2;
    if data.len() < total {
        return Err(TelegramError::MalformedPacket {
            needed: total,
            actual: data.len(),
        });
    }
    if data.len() > total {
        return Err(TelegramError::InvalidLength {
            expected: total,
            actual: data.len(),
        });
    }
    check_trailer(data, 3, fcs_at)?;

    Ok(Frame::VariableData {
        da: data[4],
        sa: data[5],
        fc: data[6],
        du: DataUnit(Bytes::copy_from_slice(&data[7..fcs_at])),
    })
}

/// Validate LE/LEr of an SD2 telegram and return LE.
fn variable_le(data: &[u8]) -> Result<u8> {
    let le = byte_at(data, 1)?;
    let ler = byte_at(data, 2)?;
    if le != ler {
        return Err(TelegramError::RepeatedLengthMismatch { le, ler });
    }
    if !(MIN_LE..=MAX_LE).contains(&le) {
        return Err(TelegramError::InvalidLengthField(le));
    }
    Ok(le)
}

/// FCS over `data[fcs_start..fcs_at]` must equal `data[fcs_at]`, followed by ED.
/// Callers have already checked that `data` reaches `fcs_at + 1`.
fn check_trailer(data: &[u8], fcs_start: usize, fcs_at: usize) -> Result<()> {
    let computed = checksum(&data[fcs_start..fcs_at]);
    let received = data[fcs_at];
    if computed != received {
        return Err(TelegramError::ChecksumMismatch { computed, received });
    }
    let ed = data[fcs_at + 1];
    if ed != ED {
        return Err(TelegramError::InvalidEndDelimiter(ed));
    }
    Ok(())
}

fn byte_at(data: &[u8], index: usize) -> Result<u8> {
    data.get(index)
        .copied()
        .ok_or(TelegramError::MalformedPacket {
            needed: index + 1,
            actual: data.len(),
        })
}

fn expect_len(data: &[u8], expected: usize) -> Result<()> {
    if data.len() != expected {
        return Err(TelegramError::InvalidLength {
            expected,
            actual: data.len(),
        });
    }
    Ok(())
}

/// Wire length of the telegram at the head of `buf`.
///
/// Returns `Ok(None)` if more bytes are needed to tell. Fails if the head
/// cannot start a telegram at all.
pub fn telegram_len(buf: &[u8]) -> Result<Option<usize>> {
    let Some(&sd) = buf.first() else {
        return Ok(None);
    };
    let len = match sd {
        SC => SHORT_ACK_SIZE,
        SD4 => TOKEN_SIZE,
        SD1 => FIXED_NO_DATA_SIZE,
        SD3 => FIXED_DATA_SIZE,
        SD2 => {
            if buf.len() < 3 {
                return Ok(None);
            }
            let le = variable_le(buf)?;
            if let Some(&repeated_sd) = buf.get(3) {
                if repeated_sd != SD2 {
                    return Err(TelegramError::RepeatedStartDelimiterMismatch(repeated_sd));
                }
            }
            VARIABLE_OVERHEAD + le as usize
        }
        other => return Err(TelegramError::InvalidStartDelimiter(other)),
    };
    Ok(Some(len))
}

/// Decode one telegram from the head of a stream buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete telegram yet.
/// Once a complete telegram is present its bytes are consumed, even if it
/// then fails validation.
pub fn decode_telegram(src: &mut BytesMut) -> Result<Option<Frame>> {
    let Some(len) = telegram_len(&src[..])? else {
        return Ok(None); // Need more data
    };
    if src.len() < len {
        return Ok(None); // Need more data
    }
    let raw = src.split_to(len);
    decode(&raw).map(Some)
}

/// Drop bytes from the head of `src` until it starts with a known start delimiter.
///
/// Returns the number of bytes discarded.
pub fn skip_to_start_delimiter(src: &mut BytesMut) -> usize {
    let skip = src
        .iter()
        .position(|b| crate::delimiter::is_start_delimiter(*b))
        .unwrap_or(src.len());
    src.advance(skip);
    skip
}

/// Configuration for stream telegram decoding.
#[derive(Debug, Clone, Default)]
pub struct TelegramConfig {
    /// Discard bytes that cannot start a telegram instead of failing.
    /// Default: false.
    pub resync_on_garbage: bool,
}
