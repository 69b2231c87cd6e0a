//! Defaults generated by `build.rs` from `config/parameters.ron`.

mod parameters;

use nec_codec::{KeyMap, KeyMapError};
use parameter_store::Parameters;

pub use self::parameters::*;

/// The parameters written to flash when the stored block is missing or corrupt.
pub fn default_parameters() -> Result<Parameters, KeyMapError> {
    Ok(Parameters {
        transmit: DEFAULT_SCAN_CODE,
        transmit_interval_secs: DEFAULT_TX_INTERVAL_SECS,
        keymap: KeyMap::from_entries(DEFAULT_KEYS)?,
    })
}
