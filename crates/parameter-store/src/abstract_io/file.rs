#![cfg(feature = "std")]

use std::{
    fs::File,
    io::{ErrorKind, Read, Seek, SeekFrom, Write},
};

use super::{AbstractIO, ERASED};
use crate::ParameterStoreError;

/// A parameter block image on the host, as flashed to or dumped from a device.
///
/// Writing replaces the whole file. A new or truncated file reads as erased flash past
/// its end.
pub struct FileIO {
    f: File,
}

impl FileIO {
    pub fn new(f: File) -> FileIO {
        FileIO { f }
    }
}

impl AbstractIO for FileIO {
    fn write(&mut self, buf: &[u8]) -> Result<(), ParameterStoreError> {
        self.f.seek(SeekFrom::Start(0))?;
        self.f.write_all(buf)?;
        self.f.set_len(buf.len() as u64)?;
        self.f.flush()?;
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<(), ParameterStoreError> {
        self.f.seek(SeekFrom::Start(0))?;
        let mut filled = 0;
        while filled < buf.len() {
            match self.f.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        buf[filled..].fill(ERASED);
        Ok(())
    }
}

impl From<std::io::Error> for ParameterStoreError {
    fn from(_value: std::io::Error) -> Self {
        ParameterStoreError::IO
    }
}

#[cfg(test)]
mod tests {
    use std::{fs::OpenOptions, path::PathBuf};

    use super::*;

    fn image(name: &str) -> (PathBuf, File) {
        let path = std::env::temp_dir().join(format!("{}-{name}.bin", std::process::id()));
        let f = OpenOptions::new()
            .create(true)
            .truncate(true)
            .read(true)
            .write(true)
            .open(&path)
            .unwrap();
        (path, f)
    }

    #[test]
    fn empty_image_reads_as_erased() {
        let (path, f) = image("empty");
        let mut io = FileIO::new(f);
        let mut buf = [0u8; 16];
        io.read(&mut buf).unwrap();
        assert_eq!(buf, [ERASED; 16]);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn write_replaces_longer_contents() {
        let (path, mut f) = image("replace");
        f.write_all(&[0u8; 32]).unwrap();
        let mut io = FileIO::new(f);
        io.write(&[1, 2, 3]).unwrap();
        let mut buf = [0u8; 5];
        io.read(&mut buf).unwrap();
        assert_eq!(buf, [1, 2, 3, ERASED, ERASED]);
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 3);
        std::fs::remove_file(path).unwrap();
    }
}
