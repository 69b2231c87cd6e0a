//! Nominal NEC pulse timings. All durations are in microseconds, which is also the tick
//! length the RMT channels are configured for.

use crate::Symbol;

/// Tolerance applied to every duration comparison. The band is exclusive on both ends.
pub const DECODE_MARGIN_US: u16 = 200;

pub const LEADING_CODE: Symbol = Symbol::new(9000, 4500);
pub const REPEAT_CODE: Symbol = Symbol::new(9000, 2250);
pub const PAYLOAD_ZERO: Symbol = Symbol::new(560, 560);
pub const PAYLOAD_ONE: Symbol = Symbol::new(560, 1690);
/// Final mark of every transmission. The space is the longest duration an RMT pulse code
/// can hold (15 bits), which keeps the line idle until the end marker.
pub const ENDING_CODE: Symbol = Symbol::new(560, 0x7FFF);

/// Leading code, 16 address bits, 16 command bits and the ending burst.
pub const NORMAL_FRAME_LEN: usize = 34;
/// Repeat code and the ending burst.
pub const REPEAT_FRAME_LEN: usize = 2;
/// Capacity of one RMT channel memory block on the ESP32-S3. No capture can be longer.
pub const MAX_FRAME_SYMBOLS: usize = 48;

// Logic 0 and logic 1 share the mark, so the spaces must be told apart.
const _: () = assert!(
    PAYLOAD_ZERO.low + DECODE_MARGIN_US <= PAYLOAD_ONE.low - DECODE_MARGIN_US,
    "logic 0 and logic 1 tolerance bands overlap"
);

/// Longest the transmitter may take to put any encoded frame on the wire, ending space
/// included.
pub const TRANSMIT_TIMEOUT_MS: u32 = 200;

/// Start-to-start spacing of the frames sent while a key is held.
pub const REPEAT_PERIOD_MS: u32 = 108;

/// Total on-air time of `symbols`, in microseconds.
pub fn duration_us(symbols: &[Symbol]) -> u32 {
    symbols
        .iter()
        .map(|s| u32::from(s.high) + u32::from(s.low))
        .sum()
}

/// Returns `true` when `measured` lies strictly inside `nominal ± DECODE_MARGIN_US`.
#[inline]
pub fn check_range(measured: u16, nominal: u16) -> bool {
    measured.abs_diff(nominal) < DECODE_MARGIN_US
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{encode_repeat, encode_scan_code, ScanCode};

    #[test]
    fn nominal_value_is_in_range() {
        assert!(check_range(560, 560));
        assert!(check_range(9000, 9000));
    }

    #[test]
    fn band_is_exclusive() {
        assert!(check_range(560 + DECODE_MARGIN_US - 1, 560));
        assert!(check_range(560 - DECODE_MARGIN_US + 1, 560));
        assert!(!check_range(560 + DECODE_MARGIN_US, 560));
        assert!(!check_range(560 - DECODE_MARGIN_US, 560));
    }

    #[test]
    fn every_frame_fits_in_the_transmit_timeout() {
        let timeout_us = TRANSMIT_TIMEOUT_MS * 1000;
        let all_ones = duration_us(&encode_scan_code(ScanCode::new(0xFFFF, 0xFFFF)));
        let shipped = duration_us(&encode_scan_code(ScanCode::new(0x00FF, 0x00FF)));
        assert_eq!(all_ones, 9000 + 4500 + 32 * (560 + 1690) + 560 + 0x7FFF);
        assert!(shipped < all_ones);
        assert!(all_ones < timeout_us, "{all_ones} us frame exceeds {timeout_us} us");
    }

    #[test]
    fn repeat_frame_fits_in_its_period() {
        assert!(duration_us(&encode_repeat()) < REPEAT_PERIOD_MS * 1000);
    }

    #[test]
    fn small_nominal_does_not_underflow() {
        assert!(check_range(0, 100));
        assert!(!check_range(300, 100));
    }
}
