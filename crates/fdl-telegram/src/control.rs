//! Address and frame-control byte helpers.
//!
//! The codec passes these bytes through untouched. The accessors here are
//! for callers above the data link that need to look inside them.

/// Address value mask.
pub const ADDRESS_MASK: u8 = 0x7F;
/// DSAP/SSAP present.
pub const SAP_PRESENT: u8 = 0x80;

/// Request flag.
pub const FC_REQ: u8 = 0x40;

// Request function codes (FC_REQ set).
pub const FC_REQ_MASK: u8 = 0x0F;
pub const FC_TIME_EV: u8 = 0x00;
pub const FC_SDN_LO: u8 = 0x04;
pub const FC_SDN_HI: u8 = 0x06;
pub const FC_DDB: u8 = 0x07;
pub const FC_FDL_STAT: u8 = 0x09;
pub const FC_TE: u8 = 0x0A;
pub const FC_CE: u8 = 0x0B;
pub const FC_SRD_LO: u8 = 0x0C;
pub const FC_SRD_HI: u8 = 0x0D;
pub const FC_IDENT: u8 = 0x0E;
pub const FC_LSAP: u8 = 0x0F;
/// Frame count bit valid.
pub const FC_FCV: u8 = 0x10;
/// Frame count bit.
pub const FC_FCB: u8 = 0x20;

// Response error codes (FC_REQ clear).
pub const FC_ERR_MASK: u8 = 0x0F;
pub const FC_OK: u8 = 0x00;
pub const FC_UE: u8 = 0x01;
pub const FC_RR: u8 = 0x02;
pub const FC_RS: u8 = 0x03;
pub const FC_DL: u8 = 0x08;
pub const FC_NR: u8 = 0x09;
pub const FC_DH: u8 = 0x0A;
pub const FC_RDL: u8 = 0x0C;
pub const FC_RDH: u8 = 0x0D;

// Response station status.
pub const FC_STAT_MASK: u8 = 0x30;
pub const FC_SLAVE: u8 = 0x00;
pub const FC_MNRDY: u8 = 0x10;
pub const FC_MRDYNT: u8 = 0x20;
pub const FC_NRDYTR: u8 = 0x30;

/// Address value (bits 0-6) of an address byte.
pub fn address_value(byte: u8) -> u8 {
    byte & ADDRESS_MASK
}

/// True if the address byte announces a service access point.
pub fn has_sap(byte: u8) -> bool {
    byte & SAP_PRESENT != 0
}

/// Address byte for `value` with the SAP flag set.
pub fn with_sap(value: u8) -> u8 {
    (value & ADDRESS_MASK) | SAP_PRESENT
}

/// View over a frame-control byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameControl(pub u8);

impl FrameControl {
    /// Build a request FC from a function code and the frame count bits.
    pub fn request(function: u8, fcb: bool, fcv: bool) -> Self {
        let mut fc = FC_REQ | (function & FC_REQ_MASK);
        if fcb {
            fc |= FC_FCB;
        }
        if fcv {
            fc |= FC_FCV;
        }
        Self(fc)
    }

    /// Build a response FC from an error code and station status.
    pub fn response(error_code: u8, station_status: u8) -> Self {
        Self((error_code & FC_ERR_MASK) | (station_status & FC_STAT_MASK))
    }

    pub fn is_request(self) -> bool {
        self.0 & FC_REQ != 0
    }

    /// Function code of a request; `None` for responses.
    pub fn function(self) -> Option<u8> {
        self.is_request().then_some(self.0 & FC_REQ_MASK)
    }

    pub fn fcb(self) -> bool {
        self.is_request() && self.0 & FC_FCB != 0
    }

    pub fn fcv(self) -> bool {
        self.is_request() && self.0 & FC_FCV != 0
    }

    /// Error code of a response; `None` for requests.
    pub fn error_code(self) -> Option<u8> {
        (!self.is_request()).then_some(self.0 & FC_ERR_MASK)
    }

    /// Station status of a response; `None` for requests.
    pub fn station_status(self) -> Option<u8> {
        (!self.is_request()).then_some(self.0 & FC_STAT_MASK)
    }

    /// Short mnemonic of the function code or response error code.
    pub fn name(self) -> &'static str {
        if self.is_request() {
            match self.0 & FC_REQ_MASK {
                FC_TIME_EV => "TIME_EV",
                FC_SDN_LO => "SDN_LO",
                FC_SDN_HI => "SDN_HI",
                FC_DDB => "DDB",
                FC_FDL_STAT => "FDL_STAT",
                FC_TE => "TE",
                FC_CE => "CE",
                FC_SRD_LO => "SRD_LO",
                FC_SRD_HI => "SRD_HI",
                FC_IDENT => "IDENT",
                FC_LSAP => "LSAP",
                _ => "RESERVED",
            }
        } else {
            match self.0 & FC_ERR_MASK {
                FC_OK => "OK",
                FC_UE => "UE",
                FC_RR => "RR",
                FC_RS => "RS",
                FC_DL => "DL",
                FC_NR => "NR",
                FC_DH => "DH",
                FC_RDL => "RDL",
                FC_RDH => "RDH",
                _ => "RESERVED",
            }
        }
    }
}

impl From<u8> for FrameControl {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl From<FrameControl> for u8 {
    fn from(value: FrameControl) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_bits() {
        assert_eq!(address_value(0x85), 5);
        assert!(has_sap(0x85));
        assert!(!has_sap(0x05));
        assert_eq!(with_sap(0x7F), 0xFF);
    }

    #[test]
    fn request_fields() {
        let fc = FrameControl::request(FC_SRD_HI, true, true);
        assert_eq!(fc.0, 0x7D);
        assert!(fc.is_request());
        assert_eq!(fc.function(), Some(FC_SRD_HI));
        assert!(fc.fcb());
        assert!(fc.fcv());
        assert_eq!(fc.error_code(), None);
        assert_eq!(fc.name(), "SRD_HI");
    }

    #[test]
    fn response_fields() {
        let fc = FrameControl::response(FC_DL, FC_MNRDY);
        assert_eq!(fc.0, 0x18);
        assert!(!fc.is_request());
        assert_eq!(fc.function(), None);
        assert_eq!(fc.error_code(), Some(FC_DL));
        assert_eq!(fc.station_status(), Some(FC_MNRDY));
        assert!(!fc.fcb());
        assert_eq!(fc.name(), "DL");
    }

    #[test]
    fn fdl_status_request() {
        let fc = FrameControl::from(0x49);
        assert_eq!(fc.function(), Some(FC_FDL_STAT));
        assert_eq!(fc.name(), "FDL_STAT");
    }
}
