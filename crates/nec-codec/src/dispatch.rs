use core::fmt;

use crate::{
    decode::{is_repeat, parse_frame, ParseError, ScanCode},
    keymap::KeyMap,
    symbol::Symbol,
    timing::{NORMAL_FRAME_LEN, REPEAT_FRAME_LEN},
};

/// What a received frame turned out to be. Every frame produces exactly one outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome<'a> {
    /// A full frame was decoded. `label` is `None` when the key is not in the key map.
    Key {
        code: ScanCode,
        label: Option<&'a str>,
    },
    /// The previously decoded key is being held down. `last` is `None` if nothing has been
    /// decoded since startup.
    Repeat {
        last: Option<ScanCode>,
        label: Option<&'a str>,
    },
    /// A frame of normal length failed to parse.
    ParseFailed(ParseError),
    /// A frame of repeat length that does not carry the repeat code.
    Unrecognized,
    /// A frame of any other length.
    Unknown { len: usize },
}

impl fmt::Display for Outcome<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Key {
                label: Some(label), ..
            } => f.write_str(label),
            Outcome::Key { label: None, .. } => f.write_str("unrecognized key"),
            Outcome::Repeat { .. } => f.write_str("repeat"),
            Outcome::ParseFailed(e) => write!(f, "parse failed: {e}"),
            Outcome::Unrecognized => f.write_str("unrecognized"),
            Outcome::Unknown { len } => write!(f, "unknown frame ({len} symbols)"),
        }
    }
}

/// Receive-side protocol state: the key map and the last successfully decoded scan code.
pub struct Decoder {
    keymap: KeyMap,
    last: Option<ScanCode>,
}

impl Decoder {
    pub fn new(keymap: KeyMap) -> Decoder {
        Decoder { keymap, last: None }
    }

    pub fn keymap(&self) -> &KeyMap {
        &self.keymap
    }

    pub fn last(&self) -> Option<ScanCode> {
        self.last
    }

    /// Classify a captured frame by its length and decode it.
    ///
    /// A failed parse leaves the last decoded scan code untouched.
    pub fn dispatch(&mut self, symbols: &[Symbol]) -> Outcome<'_> {
        match symbols.len() {
            NORMAL_FRAME_LEN => match parse_frame(symbols) {
                Ok(code) => {
                    self.last = Some(code);
                    Outcome::Key {
                        code,
                        label: self.keymap.lookup(code.key()),
                    }
                }
                Err(e) => Outcome::ParseFailed(e),
            },
            REPEAT_FRAME_LEN if is_repeat(&symbols[0]) => Outcome::Repeat {
                last: self.last,
                label: self.last.and_then(|code| self.keymap.lookup(code.key())),
            },
            REPEAT_FRAME_LEN => Outcome::Unrecognized,
            len => Outcome::Unknown { len },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        encode::{encode_repeat, encode_scan_code},
        symbol::Frame,
        timing::{LEADING_CODE, MAX_FRAME_SYMBOLS, PAYLOAD_ZERO},
    };

    /// What the receive channel reports for `symbols`: the space after the final mark is
    /// cut short by the idle threshold and reads as zero, then comes the end marker.
    fn capture(symbols: &[Symbol]) -> Frame {
        let last = symbols.len() - 1;
        Frame::from_durations(
            symbols
                .iter()
                .enumerate()
                .map(|(i, s)| (s.high, if i == last { 0 } else { s.low }))
                .chain([(0, 0), (0, 0)]),
        )
    }

    fn decoder() -> Decoder {
        Decoder::new(KeyMap::from_entries(&[(0xBA, "POWER"), (0xB9, "UP")]).unwrap())
    }

    #[test]
    fn mapped_key_reports_label() {
        let mut d = decoder();
        let code = ScanCode::new(0x00FF, 0xBA45);
        let outcome = d.dispatch(&encode_scan_code(code));
        assert_eq!(
            outcome,
            Outcome::Key {
                code,
                label: Some("POWER")
            }
        );
        assert_eq!(outcome.to_string(), "POWER");
    }

    #[test]
    fn unmapped_key_reports_unrecognized_key() {
        let mut d = decoder();
        let outcome = d.dispatch(&encode_scan_code(ScanCode::new(0x00FF, 0x00FF)));
        assert_eq!(outcome.to_string(), "unrecognized key");
        assert!(matches!(outcome, Outcome::Key { label: None, .. }));
    }

    #[test]
    fn repeat_refers_to_last_decoded_command() {
        let mut d = decoder();
        let code = ScanCode::new(0x00FF, 0xB946);
        d.dispatch(&encode_scan_code(code));
        let outcome = d.dispatch(&encode_repeat());
        assert_eq!(
            outcome,
            Outcome::Repeat {
                last: Some(code),
                label: Some("UP")
            }
        );
        assert_eq!(d.last(), Some(code));
    }

    #[test]
    fn repeat_before_any_key_has_no_command() {
        let mut d = decoder();
        assert_eq!(
            d.dispatch(&encode_repeat()),
            Outcome::Repeat {
                last: None,
                label: None
            }
        );
    }

    #[test]
    fn two_symbols_without_repeat_code_are_unrecognized() {
        let mut d = decoder();
        let outcome = d.dispatch(&[LEADING_CODE, PAYLOAD_ZERO]);
        assert_eq!(outcome, Outcome::Unrecognized);
    }

    #[test]
    fn other_lengths_are_unknown() {
        let mut d = decoder();
        let frame = encode_scan_code(ScanCode::new(1, 2));
        assert_eq!(d.dispatch(&frame[..5]), Outcome::Unknown { len: 5 });
        assert_eq!(d.dispatch(&[]), Outcome::Unknown { len: 0 });
        assert_eq!(d.dispatch(&frame[..1]), Outcome::Unknown { len: 1 });
        assert_eq!(d.dispatch(&frame[..5]).to_string(), "unknown frame (5 symbols)");
    }

    #[test]
    fn failed_parse_keeps_previous_code() {
        let mut d = decoder();
        let good = ScanCode::new(0x00FF, 0xBA45);
        d.dispatch(&encode_scan_code(good));

        let mut bad = encode_scan_code(ScanCode::new(0x1111, 0x2222));
        bad[0] = PAYLOAD_ZERO;
        let outcome = d.dispatch(&bad);
        assert_eq!(outcome, Outcome::ParseFailed(ParseError::BadLeadingCode));
        assert_eq!(d.last(), Some(good));
    }

    #[test]
    fn captured_frame_decodes_to_sent_code() {
        let mut d = decoder();
        let code = ScanCode::new(0x00FF, 0xBA45);
        let frame = capture(&encode_scan_code(code));
        assert_eq!(frame.len(), NORMAL_FRAME_LEN);
        assert_eq!(
            d.dispatch(&frame),
            Outcome::Key {
                code,
                label: Some("POWER")
            }
        );
    }

    #[test]
    fn captured_repeat_refers_to_previous_capture() {
        let mut d = decoder();
        let code = ScanCode::new(0x00FF, 0xB946);
        d.dispatch(&capture(&encode_scan_code(code)));
        let frame = capture(&encode_repeat());
        assert_eq!(frame.len(), REPEAT_FRAME_LEN);
        assert_eq!(
            d.dispatch(&frame),
            Outcome::Repeat {
                last: Some(code),
                label: Some("UP")
            }
        );
    }

    #[test]
    fn oversized_capture_is_unknown() {
        let mut d = decoder();
        let frame = Frame::from_durations(core::iter::repeat((560, 560)).take(80));
        assert_eq!(
            d.dispatch(&frame),
            Outcome::Unknown {
                len: MAX_FRAME_SYMBOLS
            }
        );
        assert_eq!(d.last(), None);
    }
}
