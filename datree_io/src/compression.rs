//! Compression codec table for the document payload.
//!
//! Only Deflate is wired end-to-end. The other codes are part of the wire
//! format and must be recognized, but selecting them is an explicit error
//! rather than a silent passthrough.

use std::fmt;
use std::io::{self, Read, Write};

use flate2::Compression as Level;
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None = 0,
    Lz4 = 1,
    Lzma = 2,
    Deflate = 3,
}

impl Compression {
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Compression::None),
            1 => Some(Compression::Lz4),
            2 => Some(Compression::Lzma),
            3 => Some(Compression::Deflate),
            _ => None,
        }
    }

    pub fn code(self) -> u32 {
        self as u32
    }

    pub fn is_supported(self) -> bool {
        matches!(self, Compression::Deflate)
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Compression::None => "None",
            Compression::Lz4 => "LZ4",
            Compression::Lzma => "LZMA",
            Compression::Deflate => "Deflate",
        };
        write!(f, "{name} ({})", self.code())
    }
}

pub fn compress_deflate_best(data: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Level::best());
    encoder.write_all(data)?;
    encoder.finish()
}

pub fn decompress_deflate(data: &[u8]) -> io::Result<Vec<u8>> {
    let mut decoder = DeflateDecoder::new(data);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(out)
}
