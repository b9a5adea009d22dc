/// Errors that can occur during telegram construction, encoding and decoding.
#[derive(Debug, thiserror::Error)]
pub enum TelegramError {
    /// The first byte does not match any known start delimiter.
    #[error("invalid start delimiter 0x{0:02X}")]
    InvalidStartDelimiter(u8),

    /// The buffer length does not match the fixed length of the telegram shape.
    #[error("invalid telegram length ({actual} bytes, expected {expected})")]
    InvalidLength { expected: usize, actual: usize },

    /// The two LE bytes of a variable-length telegram disagree.
    #[error("repeated length field mismatch (LE 0x{le:02X}, LEr 0x{ler:02X})")]
    RepeatedLengthMismatch { le: u8, ler: u8 },

    /// The LE byte of a variable-length telegram is outside [3, 249].
    #[error("invalid LE field {0} (allowed 3..=249)")]
    InvalidLengthField(u8),

    /// The repeated start delimiter of a variable-length telegram disagrees.
    #[error("repeated start delimiter mismatch (got 0x{0:02X})")]
    RepeatedStartDelimiterMismatch(u8),

    /// The transmitted frame check sequence does not match the computed one.
    #[error("checksum mismatch (computed 0x{computed:02X}, received 0x{received:02X})")]
    ChecksumMismatch { computed: u8, received: u8 },

    /// The trailing byte is not the end delimiter.
    #[error("invalid end delimiter 0x{0:02X}")]
    InvalidEndDelimiter(u8),

    /// The buffer is too short for the fields its own length byte implies.
    #[error("malformed telegram ({actual} bytes, need at least {needed})")]
    MalformedPacket { needed: usize, actual: usize },

    /// A data unit does not fit the frame shape it was given to.
    #[error("invalid data unit length for {kind} ({len} bytes, {expected})")]
    InvalidDataLength {
        kind: &'static str,
        len: usize,
        expected: &'static str,
    },

    /// An I/O error occurred while reading or writing telegrams.
    #[error("telegram I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream ended before a complete telegram was received.
    #[error("connection closed (incomplete telegram)")]
    ConnectionClosed,
}

impl TelegramError {
    /// Stable machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidStartDelimiter(_) => "invalid_start_delimiter",
            Self::InvalidLength { .. } => "invalid_length",
            Self::RepeatedLengthMismatch { .. } => "repeated_length_mismatch",
            Self::InvalidLengthField(_) => "invalid_length_field",
            Self::RepeatedStartDelimiterMismatch(_) => "repeated_start_delimiter_mismatch",
            Self::ChecksumMismatch { .. } => "checksum_mismatch",
            Self::InvalidEndDelimiter(_) => "invalid_end_delimiter",
            Self::MalformedPacket { .. } => "malformed_packet",
            Self::InvalidDataLength { .. } => "invalid_data_length",
            Self::Io(_) => "io",
            Self::ConnectionClosed => "connection_closed",
        }
    }

    /// True for errors caused by the telegram bytes themselves, as opposed to the stream.
    pub fn is_validation(&self) -> bool {
        !matches!(self, Self::Io(_) | Self::ConnectionClosed)
    }

    /// True if the stream head could not be sized as a telegram at all.
    ///
    /// Stream decoding leaves the offending bytes in place for these.
    pub fn is_framing_loss(&self) -> bool {
        matches!(
            self,
            Self::InvalidStartDelimiter(_)
                | Self::RepeatedLengthMismatch { .. }
                | Self::InvalidLengthField(_)
                | Self::RepeatedStartDelimiterMismatch(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, TelegramError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_bytes() {
        let err = TelegramError::ChecksumMismatch {
            computed: 0x4E,
            received: 0x00,
        };
        assert_eq!(
            err.to_string(),
            "checksum mismatch (computed 0x4E, received 0x00)"
        );
        assert_eq!(
            TelegramError::InvalidLengthField(2).to_string(),
            "invalid LE field 2 (allowed 3..=249)"
        );
    }

    #[test]
    fn kind_and_validation_class() {
        assert_eq!(
            TelegramError::InvalidEndDelimiter(0x17).kind(),
            "invalid_end_delimiter"
        );
        assert!(TelegramError::InvalidStartDelimiter(0).is_validation());
        assert!(!TelegramError::ConnectionClosed.is_validation());
        assert!(TelegramError::InvalidLengthField(250).is_framing_loss());
        assert!(TelegramError::RepeatedStartDelimiterMismatch(0).is_framing_loss());
        assert!(!TelegramError::InvalidEndDelimiter(0).is_framing_loss());
    }
}
