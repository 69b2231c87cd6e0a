use core::marker::PhantomData;

use crc::Crc;

use crate::abstract_io::AbstractIO;

/// Size of the block on flash. The payload gets 8 bytes less: a big-endian length in front
/// and a CRC-32 of length and payload behind.
pub const PARAMETER_BLOCK_SIZE: usize = 2048;
const CRC: Crc<u32> = Crc::<u32>::new(&crc::CRC_32_CKSUM);

#[derive(Debug, thiserror::Error)]
pub enum ParameterStoreError {
    #[error("IO Error")]
    IO,
    #[error("Postcard Error: {0}")]
    Postcard(#[from] postcard::Error),
    #[error("Parameters too large")]
    Size,
    #[error("invalid checksum")]
    Corrupt,
}

pub struct ParameterStore<T, IO> {
    io: IO,
    _pd: PhantomData<T>,
}

impl<T, IO> ParameterStore<T, IO> {
    pub fn new(io: IO) -> ParameterStore<T, IO> {
        ParameterStore::<T, IO> {
            io,
            _pd: PhantomData,
        }
    }

    pub fn into_inner(self) -> IO {
        self.io
    }
}

impl<T, IO> ParameterStore<T, IO>
where
    T: Sized + serde::Serialize + for<'a> serde::Deserialize<'a>,
    IO: AbstractIO,
{
    /// Write `v` and read it back, so a successful return means the block on the medium
    /// holds `v`.
    pub fn store(&mut self, v: &T) -> Result<T, ParameterStoreError> {
        let serialized_bytes = postcard::to_allocvec(v)?;
        if serialized_bytes.len() + 8 > PARAMETER_BLOCK_SIZE {
            return Err(ParameterStoreError::Size);
        }

        let mut buffer: heapless::Vec<u8, PARAMETER_BLOCK_SIZE> = heapless::Vec::new();
        buffer
            .extend_from_slice(&(serialized_bytes.len() as u32).to_be_bytes())
            .map_err(|_| ParameterStoreError::Size)?;
        buffer
            .extend_from_slice(&serialized_bytes)
            .map_err(|_| ParameterStoreError::Size)?;
        let checksum = CRC.checksum(&buffer).to_be_bytes();
        buffer
            .extend_from_slice(&checksum)
            .map_err(|_| ParameterStoreError::Size)?;
        buffer
            .resize(PARAMETER_BLOCK_SIZE, 0)
            .map_err(|_| ParameterStoreError::Size)?;
        self.io.write(&buffer)?;
        self.fetch()
    }

    pub fn fetch(&mut self) -> Result<T, ParameterStoreError> {
        let mut buffer = [0u8; PARAMETER_BLOCK_SIZE];
        self.io
            .read(&mut buffer)
            .map_err(|_| ParameterStoreError::IO)?;
        let data_size = u32::from_be_bytes([buffer[0], buffer[1], buffer[2], buffer[3]]) as usize;
        if data_size > PARAMETER_BLOCK_SIZE - 8 {
            return Err(ParameterStoreError::Corrupt);
        }
        let checksum = CRC.checksum(&buffer[0..data_size + 4]).to_be_bytes();
        if checksum != buffer[data_size + 4..data_size + 8] {
            return Err(ParameterStoreError::Corrupt);
        }
        let v = postcard::from_bytes(&buffer[4..data_size + 4])?;
        Ok(v)
    }

    pub fn update<F>(&mut self, f: F) -> Result<T, ParameterStoreError>
    where
        F: FnOnce(&mut T),
    {
        let mut v = self.fetch()?;
        f(&mut v);
        self.store(&v)
    }
}

#[cfg(test)]
mod tests {
    use nec_codec::{KeyMap, ScanCode};

    use super::*;
    use crate::Parameters;

    /// Erased flash reads back as all ones.
    struct MemoryIO {
        block: Vec<u8>,
    }

    impl MemoryIO {
        fn erased() -> MemoryIO {
            MemoryIO {
                block: vec![0xFF; PARAMETER_BLOCK_SIZE],
            }
        }
    }

    impl AbstractIO for MemoryIO {
        fn write(&mut self, buf: &[u8]) -> Result<(), ParameterStoreError> {
            self.block.copy_from_slice(buf);
            Ok(())
        }

        fn read(&mut self, buf: &mut [u8]) -> Result<(), ParameterStoreError> {
            buf.copy_from_slice(&self.block);
            Ok(())
        }
    }

    fn parameters() -> Parameters {
        Parameters {
            transmit: ScanCode::new(0x00FF, 0xBA45),
            transmit_interval_secs: 10,
            keymap: KeyMap::from_entries(&[(0xBA, "POWER"), (0xB5, "DELETE")]).unwrap(),
        }
    }

    #[test]
    fn erased_flash_is_corrupt() {
        let mut store: ParameterStore<Parameters, _> = ParameterStore::new(MemoryIO::erased());
        assert!(matches!(store.fetch(), Err(ParameterStoreError::Corrupt)));
    }

    #[test]
    fn stored_parameters_are_fetched_back() {
        let mut store = ParameterStore::new(MemoryIO::erased());
        let p = parameters();
        assert_eq!(store.store(&p).unwrap(), p);
        assert_eq!(store.fetch().unwrap().keymap.lookup(0xB5), Some("DELETE"));
    }

    #[test]
    fn flipped_byte_is_detected() {
        let mut store = ParameterStore::new(MemoryIO::erased());
        store.store(&parameters()).unwrap();
        let mut io = store.into_inner();
        io.block[6] ^= 0x01;
        let mut store: ParameterStore<Parameters, _> = ParameterStore::new(io);
        assert!(matches!(store.fetch(), Err(ParameterStoreError::Corrupt)));
    }

    #[test]
    fn update_persists_change() {
        let mut store = ParameterStore::new(MemoryIO::erased());
        store.store(&parameters()).unwrap();
        store.update(|p| p.transmit_interval_secs = 0).unwrap();
        assert_eq!(store.fetch().unwrap().transmit_interval_secs, 0);
    }

    #[test]
    fn shipped_defaults_fit_in_a_block() {
        let p: Parameters = ron::from_str(include_str!("../../../config/parameters.ron")).unwrap();
        let mut store = ParameterStore::new(MemoryIO::erased());
        assert_eq!(store.store(&p).unwrap(), p);
        assert_eq!(p.transmit, ScanCode::new(0x00FF, 0x00FF));
    }
}
