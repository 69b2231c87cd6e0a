use embassy_executor::SpawnError;
use esp_rmt_nec::NecError;
use nec_codec::KeyMapError;
use parameter_store::ParameterStoreError;

/// Failures while bringing the board up. None of them are recoverable without a reset.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("IR transceiver: {0}")]
    Nec(#[from] NecError),
    #[error("parameters: {0}")]
    Parameters(#[from] ParameterStoreError),
    #[error("default key map: {0}")]
    KeyMap(#[from] KeyMapError),
    #[error("could not spawn task: {0:?}")]
    Spawn(SpawnError),
}

impl From<SpawnError> for InitError {
    fn from(value: SpawnError) -> Self {
        InitError::Spawn(value)
    }
}
