mod embedded;
mod file;

#[cfg(feature = "embedded")]
pub use embedded::*;

#[cfg(feature = "std")]
pub use file::*;

use crate::ParameterStoreError;

/// Byte value of erased NOR flash.
pub const ERASED: u8 = 0xFF;

/// A medium holding exactly one parameter block.
///
/// Both calls transfer the whole block starting at its first byte. A medium that holds less
/// than a block reads the missing tail as [`ERASED`], the same as blank flash.
pub trait AbstractIO {
    fn write(&mut self, buf: &[u8]) -> Result<(), ParameterStoreError>;

    fn read(&mut self, buf: &mut [u8]) -> Result<(), ParameterStoreError>;
}
