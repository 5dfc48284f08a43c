// ---------------------------------------------------------------------------
// save_file – Savegame container: header, checksum, optional compression
// ---------------------------------------------------------------------------
//
// Header format (24 bytes, fixed-size, little-endian):
//   [0..4]   Magic bytes: "CIVS"
//   [4..8]   Header format version (u32)
//   [8..12]  Flags (u32: bit 0 = compressed)
//   [12..16] Compression kind (u32, see `CompressionKind`)
//   [16..20] Uncompressed payload size (u32)
//   [20..24] xxHash32 checksum of the stored payload (everything after the header)
//
// On save: bitcode-encode the document -> compress -> prepend header
// On load: check magic -> validate checksum -> decompress -> decode
// Legacy: if the first 4 bytes are not "CIVS", the file is a plain-text
// save (the JSON rendering of the document).

use std::io::{Read, Write};

use bevy::prelude::*;
use xxhash_rust::xxh32::xxh32;

use crate::document::Document;
use crate::save_error::SaveError;

/// Magic bytes identifying a savegame container.
pub const MAGIC: [u8; 4] = *b"CIVS";

pub const HEADER_SIZE: usize = 24;

/// Layout version of the header itself, unrelated to `savefile.version`.
pub const HEADER_FORMAT_VERSION: u32 = 1;

const FLAG_COMPRESSED: u32 = 1;

const XXHASH_SEED: u32 = 0;

// =============================================================================
// Compression
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionKind {
    Plain,
    Lz4,
    Deflate,
}

impl CompressionKind {
    pub const ALL: [CompressionKind; 3] = [
        CompressionKind::Plain,
        CompressionKind::Lz4,
        CompressionKind::Deflate,
    ];

    /// Name used by the `compresstype` setting.
    pub fn name(self) -> &'static str {
        match self {
            CompressionKind::Plain => "PLAIN",
            CompressionKind::Lz4 => "LZ4",
            CompressionKind::Deflate => "DEFLATE",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(name))
    }

    fn code(self) -> u32 {
        match self {
            CompressionKind::Plain => 0,
            CompressionKind::Lz4 => 1,
            CompressionKind::Deflate => 2,
        }
    }

    fn from_code(code: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.code() == code)
    }

    /// Whether this build can read and write this compression.
    pub fn is_available(self) -> bool {
        match self {
            CompressionKind::Plain => true,
            CompressionKind::Lz4 => cfg!(feature = "lz4"),
            CompressionKind::Deflate => cfg!(feature = "deflate"),
        }
    }

    /// Best available backend: LZ4, then deflate, then none.
    pub fn preferred() -> Self {
        [CompressionKind::Lz4, CompressionKind::Deflate]
            .into_iter()
            .find(|k| k.is_available())
            .unwrap_or(CompressionKind::Plain)
    }
}

fn unavailable(kind: CompressionKind) -> SaveError {
    SaveError::Decode(format!(
        "{} compression is not available in this build",
        kind.name()
    ))
}

fn compress(kind: CompressionKind, data: &[u8]) -> Result<Vec<u8>, SaveError> {
    match kind {
        CompressionKind::Plain => Ok(data.to_vec()),
        #[cfg(feature = "lz4")]
        CompressionKind::Lz4 => Ok(lz4_flex::compress_prepend_size(data)),
        #[cfg(feature = "deflate")]
        CompressionKind::Deflate => {
            let mut encoder =
                flate2::write::DeflateEncoder::new(Vec::new(), flate2::Compression::default());
            encoder
                .write_all(data)
                .map_err(|e| SaveError::Encode(format!("compression write error: {e}")))?;
            encoder
                .finish()
                .map_err(|e| SaveError::Encode(format!("compression finish error: {e}")))
        }
        #[allow(unreachable_patterns)]
        other => Err(unavailable(other)),
    }
}

fn decompress(kind: CompressionKind, data: &[u8]) -> Result<Vec<u8>, SaveError> {
    match kind {
        CompressionKind::Plain => Ok(data.to_vec()),
        #[cfg(feature = "lz4")]
        CompressionKind::Lz4 => lz4_flex::decompress_size_prepended(data)
            .map_err(|e| SaveError::Decode(format!("LZ4 decompression failed: {e}"))),
        #[cfg(feature = "deflate")]
        CompressionKind::Deflate => {
            let mut out = Vec::new();
            flate2::read::DeflateDecoder::new(data)
                .read_to_end(&mut out)
                .map_err(|e| SaveError::Decode(format!("deflate decompression failed: {e}")))?;
            Ok(out)
        }
        #[allow(unreachable_patterns)]
        other => Err(unavailable(other)),
    }
}

// =============================================================================
// Header
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    pub format_version: u32,
    pub flags: u32,
    pub compression: CompressionKind,
    pub uncompressed_size: u32,
    pub checksum: u32,
}

impl FileHeader {
    fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&MAGIC);
        out.extend_from_slice(&self.format_version.to_le_bytes());
        out.extend_from_slice(&self.flags.to_le_bytes());
        out.extend_from_slice(&self.compression.code().to_le_bytes());
        out.extend_from_slice(&self.uncompressed_size.to_le_bytes());
        out.extend_from_slice(&self.checksum.to_le_bytes());
    }

    pub fn is_compressed(&self) -> bool {
        self.flags & FLAG_COMPRESSED != 0
    }
}

/// Result of unwrapping a save file's bytes.
pub enum UnwrapResult<'a> {
    /// File has a valid header; the stored payload follows.
    WithHeader {
        header: FileHeader,
        payload: &'a [u8],
    },
    /// No header: a plain-text save.
    Legacy(&'a [u8]),
}

fn le_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

/// Parse and validate the container header.
///
/// # Errors
///
/// Returns an error if the header is truncated, comes from a newer build,
/// names an unknown compression, or the checksum does not match.
pub fn unwrap_header(bytes: &[u8]) -> Result<UnwrapResult<'_>, String> {
    if bytes.len() < 4 || bytes[..4] != MAGIC {
        return Ok(UnwrapResult::Legacy(bytes));
    }

    if bytes.len() < HEADER_SIZE {
        return Err(format!(
            "Save file has CIVS magic bytes but is too short ({} bytes, \
             need at least {} for header)",
            bytes.len(),
            HEADER_SIZE
        ));
    }

    let format_version = le_u32(bytes, 4);
    let flags = le_u32(bytes, 8);
    let compression_code = le_u32(bytes, 12);
    let uncompressed_size = le_u32(bytes, 16);
    let checksum = le_u32(bytes, 20);

    if format_version > HEADER_FORMAT_VERSION {
        return Err(format!(
            "Save file uses header format version {format_version}, but this build only \
             supports up to version {HEADER_FORMAT_VERSION}."
        ));
    }

    let compression = CompressionKind::from_code(compression_code)
        .ok_or_else(|| format!("Unknown compression kind {compression_code}"))?;

    let payload = &bytes[HEADER_SIZE..];
    let computed = xxh32(payload, XXHASH_SEED);
    if computed != checksum {
        return Err(format!(
            "Save file is corrupted: checksum mismatch \
             (expected {checksum:#010X}, got {computed:#010X})."
        ));
    }

    Ok(UnwrapResult::WithHeader {
        header: FileHeader {
            format_version,
            flags,
            compression,
            uncompressed_size,
            checksum,
        },
        payload,
    })
}

// =============================================================================
// Document encode / decode
// =============================================================================

/// Encode a document into a savegame container.
pub fn encode_document(doc: &Document, compression: CompressionKind) -> Result<Vec<u8>, SaveError> {
    if !compression.is_available() {
        return Err(SaveError::Encode(format!(
            "{} compression is not available in this build",
            compression.name()
        )));
    }
    let encoded = bitcode::encode(doc);
    let uncompressed_size = u32::try_from(encoded.len())
        .map_err(|_| SaveError::Encode(format!("document too large ({} bytes)", encoded.len())))?;
    let payload = compress(compression, &encoded)?;

    let header = FileHeader {
        format_version: HEADER_FORMAT_VERSION,
        flags: if compression == CompressionKind::Plain {
            0
        } else {
            FLAG_COMPRESSED
        },
        compression,
        uncompressed_size,
        checksum: xxh32(&payload, XXHASH_SEED),
    };
    let mut out = Vec::with_capacity(HEADER_SIZE + payload.len());
    header.write(&mut out);
    out.extend_from_slice(&payload);
    Ok(out)
}

/// Decode a savegame container, or a plain-text save.
pub fn decode_document(bytes: &[u8]) -> Result<Document, SaveError> {
    if bytes.is_empty() {
        return Err(SaveError::NoData);
    }
    match unwrap_header(bytes).map_err(SaveError::Decode)? {
        UnwrapResult::Legacy(text) => {
            debug!("Reading plain-text savegame ({} bytes)", text.len());
            Ok(serde_json::from_slice(text)?)
        }
        UnwrapResult::WithHeader { header, payload } => {
            let data = if header.is_compressed() {
                decompress(header.compression, payload)?
            } else {
                payload.to_vec()
            };
            if data.len() != header.uncompressed_size as usize {
                return Err(SaveError::Decode(format!(
                    "payload size mismatch: header says {}, got {}",
                    header.uncompressed_size,
                    data.len()
                )));
            }
            Ok(bitcode::decode(&data)?)
        }
    }
}

/// Render a document as a plain-text save.
pub fn document_to_text(doc: &Document) -> Result<String, SaveError> {
    serde_json::to_string_pretty(doc).map_err(|e| SaveError::Encode(e.to_string()))
}
