use core::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    symbol::{Bit, Symbol},
    timing::{LEADING_CODE, REPEAT_CODE},
};

const FIELD_BITS: usize = 16;

/// The address and command identifying a key press.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanCode {
    pub address: u16,
    pub command: u16,
}

impl ScanCode {
    pub const fn new(address: u16, command: u16) -> ScanCode {
        ScanCode { address, command }
    }

    /// The byte used to look the key up in a [`KeyMap`](crate::KeyMap): the upper byte of
    /// the command, which standard remotes fill with the inverted key code.
    pub fn key(&self) -> u8 {
        (self.command >> 8) as u8
    }
}

impl fmt::Display for ScanCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "addr=0x{:04X} cmd=0x{:04X}", self.address, self.command)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Address,
    Command,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Address => f.write_str("address"),
            Field::Command => f.write_str("command"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("bad leading code")]
    BadLeadingCode,
    #[error("{field} bit {index} is invalid")]
    InvalidBit { field: Field, index: u8 },
    #[error("frame too short ({len} symbols)")]
    TooShort { len: usize },
}

/// Parse a normal frame into its scan code.
///
/// The first symbol must be the leading code, followed by 16 address and 16 command
/// symbols. Anything after that (the ending burst) is ignored. The first symbol that is
/// neither logic 0 nor logic 1 fails the whole frame; no partial value is returned.
pub fn parse_frame(symbols: &[Symbol]) -> Result<ScanCode, ParseError> {
    let Some((leading, payload)) = symbols.split_first() else {
        return Err(ParseError::TooShort { len: 0 });
    };
    if !leading.matches(&LEADING_CODE) {
        return Err(ParseError::BadLeadingCode);
    }
    if payload.len() < 2 * FIELD_BITS {
        return Err(ParseError::TooShort { len: symbols.len() });
    }

    let address = parse_field(&payload[..FIELD_BITS], Field::Address)?;
    let command = parse_field(&payload[FIELD_BITS..2 * FIELD_BITS], Field::Command)?;
    let code = ScanCode { address, command };
    log::debug!("NEC decoded: {code}");
    Ok(code)
}

fn parse_field(symbols: &[Symbol], field: Field) -> Result<u16, ParseError> {
    symbols
        .iter()
        .enumerate()
        .try_fold(0u16, |value, (index, symbol)| match symbol.classify() {
            Bit::One => Ok(value | 1 << index),
            Bit::Zero => Ok(value),
            Bit::Invalid => Err(ParseError::InvalidBit {
                field,
                index: index as u8,
            }),
        })
}

/// Whether `symbol` is the repeat code sent while a key is held down.
pub fn is_repeat(symbol: &Symbol) -> bool {
    symbol.matches(&REPEAT_CODE)
}
