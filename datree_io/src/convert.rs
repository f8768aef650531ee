//! Whole-document codec: magic + version + compression code, then the
//! compressed generic document.

use datree_model::{DataTreeRoot, ValidationError};
use log::debug;
use serde_json::Value;
use thiserror::Error;

use crate::compression::{Compression, compress_deflate_best, decompress_deflate};
use crate::reader::ByteReader;
use crate::writer::ByteWriter;

pub const DATA_TREE_MAGIC: [u8; 4] = *b"FrDT";

/// Newest header version this build reads and the version it writes.
pub const FORMAT_VERSION: i32 = 0;

#[derive(Debug, Clone, Copy)]
pub struct DataTreeHeader {
    pub version: i32,
    /// Raw code as read; may name a codec this build does not implement.
    pub compression: u32,
}

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("document version too new: {0}")]
    VersionTooNew(i32),
    #[error("compression not supported: {0}")]
    CompressionNotSupported(Compression),
    #[error("unrecognized compression code: {0}")]
    UnknownCompression(u32),
    #[error("payload is not a valid document: {0}")]
    Payload(#[from] serde_json::Error),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Read the framing header, or `None` when the bytes are not a recognized
/// document (wrong magic, or truncated before the header ends).
pub fn try_read_header(reader: &mut ByteReader<'_>) -> Option<DataTreeHeader> {
    let mut magic = [0u8; 4];
    reader.read_into(&mut magic)?;
    if magic != DATA_TREE_MAGIC {
        return None;
    }
    let version = reader.next_i32()?;
    let compression = reader.next_7bit_encoded_uint()?;
    Some(DataTreeHeader {
        version,
        compression,
    })
}

pub fn write_header(writer: &mut ByteWriter, version: i32, compression: Compression) {
    writer.push_buffer(&DATA_TREE_MAGIC);
    writer.push_i32(version);
    writer.push_7bit_encoded_uint(compression.code());
}

/// Decode a full document, auto-detecting the codec from the header.
///
/// `Ok(None)` means "not one of ours", so callers probing arbitrary files get
/// a quiet answer. Everything past a valid header fails loudly.
pub fn load_auto(bytes: &[u8]) -> Result<Option<DataTreeRoot>, ConvertError> {
    let mut reader = ByteReader::new(bytes);
    let Some(header) = try_read_header(&mut reader) else {
        return Ok(None);
    };
    if header.version > FORMAT_VERSION {
        return Err(ConvertError::VersionTooNew(header.version));
    }
    debug!(
        "data tree header: version {} compression code {}",
        header.version, header.compression
    );

    match Compression::from_code(header.compression) {
        Some(Compression::Deflate) => {
            let payload = decompress_deflate(reader.remaining())?;
            let document: Value = serde_json::from_slice(&payload)?;
            let root = DataTreeRoot::from_value(&document)?;
            Ok(Some(root))
        }
        Some(unsupported) => Err(ConvertError::CompressionNotSupported(unsupported)),
        None => Err(ConvertError::UnknownCompression(header.compression)),
    }
}

/// Encode with the default (and only functional) codec.
pub fn save(root: &DataTreeRoot) -> Result<Vec<u8>, ConvertError> {
    save_with(root, Compression::Deflate)
}

/// Encode with an explicit codec selection. Reserved codecs are rejected up
/// front, before any of the tree is serialized.
pub fn save_with(root: &DataTreeRoot, compression: Compression) -> Result<Vec<u8>, ConvertError> {
    if !compression.is_supported() {
        return Err(ConvertError::CompressionNotSupported(compression));
    }
    let document = root.to_value();
    let payload = serde_json::to_vec(&document)?;
    let compressed = compress_deflate_best(&payload)?;
    debug!(
        "data tree payload: {} bytes, {} compressed",
        payload.len(),
        compressed.len()
    );

    let mut writer = ByteWriter::new();
    write_header(&mut writer, FORMAT_VERSION, compression);
    writer.push_buffer(&compressed);
    Ok(writer.into_bytes())
}
