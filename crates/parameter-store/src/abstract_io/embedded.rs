#![cfg(feature = "embedded")]

use embedded_storage::{ReadStorage, Storage};

use super::AbstractIO;
use crate::ParameterStoreError;

/// The parameter block at `address` in a flash device.
pub struct EmbeddedStorageIO<S> {
    storage: S,
    address: u32,
}

impl<S> EmbeddedStorageIO<S>
where
    S: Storage,
{
    pub fn new(storage: S, address: u32) -> EmbeddedStorageIO<S> {
        EmbeddedStorageIO { storage, address }
    }

    fn check_bounds(&self, len: usize) -> Result<(), ParameterStoreError> {
        let end = self.address as usize + len;
        if end > self.storage.capacity() {
            log::error!(
                "parameter block 0x{:X}..0x{end:X} is outside the flash",
                self.address
            );
            return Err(ParameterStoreError::IO);
        }
        Ok(())
    }
}

impl<S> AbstractIO for EmbeddedStorageIO<S>
where
    S: Storage,
{
    fn write(&mut self, buf: &[u8]) -> Result<(), ParameterStoreError> {
        self.check_bounds(buf.len())?;
        // Storage::write erases the sectors it touches
        Storage::write(&mut self.storage, self.address, buf).map_err(|_| ParameterStoreError::IO)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<(), ParameterStoreError> {
        self.check_bounds(buf.len())?;
        ReadStorage::read(&mut self.storage, self.address, buf)
            .map_err(|_| ParameterStoreError::IO)
    }
}
