use crate::{
    decode::ScanCode,
    symbol::Symbol,
    timing::{
        ENDING_CODE, LEADING_CODE, NORMAL_FRAME_LEN, PAYLOAD_ONE, PAYLOAD_ZERO, REPEAT_CODE,
        REPEAT_FRAME_LEN,
    },
};

/// Encode `code` as a full NEC frame: leading code, address and command (LSB first), and
/// the ending burst.
pub fn encode_scan_code(code: ScanCode) -> [Symbol; NORMAL_FRAME_LEN] {
    let payload = (code.command as u32) << 16 | code.address as u32;
    core::array::from_fn(|i| match i {
        0 => LEADING_CODE,
        i if i == NORMAL_FRAME_LEN - 1 => ENDING_CODE,
        i if payload >> (i - 1) & 1 == 1 => PAYLOAD_ONE,
        _ => PAYLOAD_ZERO,
    })
}

/// Encode the frame sent while a key stays pressed.
pub fn encode_repeat() -> [Symbol; REPEAT_FRAME_LEN] {
    [REPEAT_CODE, ENDING_CODE]
}
