// SPDX-License-Identifier: MIT

//! Binary test input.
//!
//! The judge pipes the test input to the program's STDIN as raw
//! little-endian values.  `InputReader` decodes them; a short read is always
//! an `UnexpectedEof` error.

use std::io::Read;

/// Reads little-endian values from a byte stream.
pub struct InputReader<R: Read> {
    source: R,
}

impl InputReader<std::io::StdinLock<'static>> {
    /// Reader on the process STDIN.
    pub fn stdin() -> Self {
        InputReader::new(std::io::stdin().lock())
    }
}

/// Generates the fixed-width readers for each integer type.
macro_rules! read_le {
    ($name:ident, $many:ident, $ty:ty) => {
        pub fn $name(&mut self) -> Result<$ty, std::io::Error> {
            let mut buf = [0u8; size_of::<$ty>()];
            self.source.read_exact(&mut buf)?;
            Ok(<$ty>::from_le_bytes(buf))
        }

        /// Read `count` consecutive values.
        pub fn $many(&mut self, count: usize) -> Result<Vec<$ty>, std::io::Error> {
            let len = count.checked_mul(size_of::<$ty>()).ok_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "value count too large")
            })?;
            let data = self.read_bytes(len)?;
            Ok(data
                .chunks_exact(size_of::<$ty>())
                .map(|c| {
                    let mut buf = [0u8; size_of::<$ty>()];
                    buf.copy_from_slice(c);
                    <$ty>::from_le_bytes(buf)
                })
                .collect())
        }
    };
}

impl<R: Read> InputReader<R> {
    pub fn new(source: R) -> Self {
        InputReader { source }
    }

    read_le!(read_i8, read_i8s, i8);
    read_le!(read_u8, read_u8s, u8);
    read_le!(read_i16, read_i16s, i16);
    read_le!(read_i32, read_i32s, i32);
    read_le!(read_i64, read_i64s, i64);

    /// Read exactly `count` raw bytes, in chunks.
    pub fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>, std::io::Error> {
        const CHUNK: usize = 8 * 1024;
        let mut buff = [0u8; CHUNK];
        let mut payload = Vec::with_capacity(count.min(CHUNK));
        let mut remaining = count;
        while remaining > 0 {
            let read_count = std::cmp::min(CHUNK, remaining);
            self.source.read_exact(&mut buff[0..read_count])?;
            payload.extend_from_slice(&buff[0..read_count]);
            remaining -= read_count;
        }
        Ok(payload)
    }

    pub fn into_inner(self) -> R {
        self.source
    }
}
