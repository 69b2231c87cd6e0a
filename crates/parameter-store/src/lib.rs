#![cfg_attr(not(any(test, feature = "std")), no_std)]
//! Device parameters persisted in a single CRC-protected flash block.
//!
//! The firmware reads them once at startup; `bsp-config` edits an image of the block on
//! the host.

mod abstract_io;
mod parameter_store;

use nec_codec::{KeyMap, ScanCode};
use serde::{Deserialize, Serialize};

pub use self::{abstract_io::*, parameter_store::*};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameters {
    /// Scan code sent by the transmit task.
    pub transmit: ScanCode,
    /// Seconds between periodic transmissions. Zero disables them.
    pub transmit_interval_secs: u32,
    /// Labels for received keys.
    pub keymap: KeyMap,
}
