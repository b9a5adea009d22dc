//! Start and end delimiters.
//!
//! The first byte of every telegram selects its shape. All shapes except
//! the short acknowledgement and the token close with [`ED`].

/// Fixed-length telegram without data unit.
pub const SD1: u8 = 0x10;

/// Variable-length telegram.
pub const SD2: u8 = 0x68;

/// Fixed-length telegram with an 8 byte data unit.
pub const SD3: u8 = 0xA2;

/// Token telegram.
pub const SD4: u8 = 0xDC;

/// Single-character acknowledgement.
pub const SC: u8 = 0xE5;

/// End delimiter.
pub const ED: u8 = 0x16;

/// Returns a human-readable name for a delimiter byte.
pub fn delimiter_name(byte: u8) -> &'static str {
    match byte {
        SD1 => "SD1",
        SD2 => "SD2",
        SD3 => "SD3",
        SD4 => "SD4",
        SC => "SC",
        ED => "ED",
        _ => "UNKNOWN",
    }
}

/// Returns true if the byte can start a telegram.
pub fn is_start_delimiter(byte: u8) -> bool {
    matches!(byte, SD1 | SD2 | SD3 | SD4 | SC)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names() {
        assert_eq!(delimiter_name(0x68), "SD2");
        assert_eq!(delimiter_name(0x16), "ED");
        assert_eq!(delimiter_name(0x00), "UNKNOWN");
    }

    #[test]
    fn end_delimiter_does_not_start_a_telegram() {
        assert!(is_start_delimiter(SC));
        assert!(is_start_delimiter(SD4));
        assert!(!is_start_delimiter(ED));
    }
}
