use core::ops::Deref;

use crate::timing::{check_range, MAX_FRAME_SYMBOLS, PAYLOAD_ONE, PAYLOAD_ZERO};

/// One mark/space pair as reported by the receive hardware, in microseconds.
///
/// `high` is the first phase of the pair (carrier present) and `low` the second, whatever
/// electrical level the receiver module happens to drive for them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Symbol {
    pub high: u16,
    pub low: u16,
}

/// The logic value carried by a payload [`Symbol`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bit {
    Zero,
    One,
    Invalid,
}

impl Symbol {
    pub const fn new(high: u16, low: u16) -> Symbol {
        Symbol { high, low }
    }

    /// Whether both phases fall within tolerance of `reference`.
    pub fn matches(&self, reference: &Symbol) -> bool {
        check_range(self.high, reference.high) && check_range(self.low, reference.low)
    }

    pub fn classify(&self) -> Bit {
        if self.matches(&PAYLOAD_ONE) {
            Bit::One
        } else if self.matches(&PAYLOAD_ZERO) {
            Bit::Zero
        } else {
            Bit::Invalid
        }
    }
}

/// An ordered capture of [`Symbol`]s making up one reception.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    symbols: heapless::Vec<Symbol, MAX_FRAME_SYMBOLS>,
}

impl Frame {
    pub fn new() -> Frame {
        Frame::default()
    }

    /// Build a frame from raw `(high, low)` duration pairs.
    ///
    /// A zero `high` duration is the end marker and is not part of the frame. A zero `low`
    /// duration means the line went idle after the mark; that pair is kept and ends the
    /// frame. Pairs beyond [`MAX_FRAME_SYMBOLS`] are dropped.
    pub fn from_durations<I>(durations: I) -> Frame
    where
        I: IntoIterator<Item = (u16, u16)>,
    {
        let mut frame = Frame::new();
        for (high, low) in durations {
            if high == 0 {
                break;
            }
            if frame.symbols.push(Symbol::new(high, low)).is_err() {
                log::trace!("capture longer than {MAX_FRAME_SYMBOLS} symbols; truncating");
                break;
            }
            if low == 0 {
                break;
            }
        }
        frame
    }

    /// Copy `symbols` into a frame, keeping at most [`MAX_FRAME_SYMBOLS`] of them.
    pub fn from_symbols(symbols: &[Symbol]) -> Frame {
        let count = symbols.len().min(MAX_FRAME_SYMBOLS);
        let mut frame = Frame::new();
        // Cannot fail, `count` is bounded by the capacity
        frame.symbols.extend_from_slice(&symbols[..count]).ok();
        frame
    }
}

impl Deref for Frame {
    type Target = [Symbol];

    fn deref(&self) -> &[Symbol] {
        &self.symbols
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::{DECODE_MARGIN_US, LEADING_CODE};

    #[test]
    fn nominal_payload_symbols_classify() {
        assert_eq!(PAYLOAD_ZERO.classify(), Bit::Zero);
        assert_eq!(PAYLOAD_ONE.classify(), Bit::One);
    }

    #[test]
    fn symbol_just_outside_margin_is_invalid() {
        let long_space = Symbol::new(560, PAYLOAD_ONE.low + DECODE_MARGIN_US);
        assert_eq!(long_space.classify(), Bit::Invalid);
        let short_mark = Symbol::new(560 - DECODE_MARGIN_US, 560);
        assert_eq!(short_mark.classify(), Bit::Invalid);
    }

    #[test]
    fn symbol_just_inside_margin_is_valid() {
        let s = Symbol::new(560 + DECODE_MARGIN_US - 1, PAYLOAD_ONE.low - DECODE_MARGIN_US + 1);
        assert_eq!(s.classify(), Bit::One);
    }

    #[test]
    fn leading_code_is_not_a_payload_bit() {
        assert_eq!(LEADING_CODE.classify(), Bit::Invalid);
    }

    #[test]
    fn from_durations_stops_at_end_marker() {
        let frame = Frame::from_durations([(9000, 4500), (560, 560), (0, 0), (560, 1690)]);
        assert_eq!(frame.len(), 2);
    }

    #[test]
    fn from_durations_keeps_ending_burst() {
        let frame = Frame::from_durations([(9000, 2250), (560, 0), (123, 456)]);
        assert_eq!(&frame[..], &[Symbol::new(9000, 2250), Symbol::new(560, 0)]);
    }

    #[test]
    fn from_durations_truncates_at_capacity() {
        let frame = Frame::from_durations(core::iter::repeat((560, 560)).take(100));
        assert_eq!(frame.len(), MAX_FRAME_SYMBOLS);
    }

    #[test]
    fn empty_capture_is_empty_frame() {
        assert!(Frame::from_durations([(0u16, 0u16)]).is_empty());
    }
}
