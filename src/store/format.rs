//! Database file format
//!
//! ## Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Header (14 bytes)                                       │
//! │   Magic: "CNTD" (4) | Version: u16 (2) | Len: u64 (8)   │
//! ├─────────────────────────────────────────────────────────┤
//! │ Payload (Len bytes)                                     │
//! │   bincode(Namespaces)                                   │
//! ├─────────────────────────────────────────────────────────┤
//! │ Footer (8 bytes)                                        │
//! │   PayloadCRC: u32 (4) | Padding (4)                     │
//! └─────────────────────────────────────────────────────────┘
//! ```
//! All integers are little-endian.

use super::Namespaces;
use crate::error::{CountDbError, Result};

/// Magic bytes identifying a CountDB database file
pub(crate) const MAGIC: &[u8; 4] = b"CNTD";

/// Current file format version
pub(crate) const VERSION: u16 = 1;

/// Header size: Magic (4) + Version (2) + PayloadLen (8) = 14 bytes
pub(crate) const HEADER_SIZE: usize = 14;

/// Footer size: PayloadCRC (4) + Padding (4) = 8 bytes
pub(crate) const FOOTER_SIZE: usize = 8;

/// Serialize namespaces into a complete file image
pub(crate) fn encode(namespaces: &Namespaces) -> Result<Vec<u8>> {
    let payload =
        bincode::serialize(namespaces).map_err(|e| CountDbError::Serialization(e.to_string()))?;

    let mut image = Vec::with_capacity(HEADER_SIZE + payload.len() + FOOTER_SIZE);
    image.extend_from_slice(MAGIC);
    image.extend_from_slice(&VERSION.to_le_bytes());
    image.extend_from_slice(&(payload.len() as u64).to_le_bytes());
    image.extend_from_slice(&payload);
    image.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
    image.extend_from_slice(&[0u8; 4]);

    Ok(image)
}

/// Validate and decode a file image
///
/// Errors carry a human-readable reason; the caller attaches the path.
pub(crate) fn decode(image: &[u8]) -> std::result::Result<Namespaces, String> {
    if image.len() < HEADER_SIZE + FOOTER_SIZE {
        return Err(format!("file too short ({} bytes)", image.len()));
    }

    if &image[0..4] != MAGIC {
        return Err(format!(
            "invalid magic: expected CNTD, got {:?}",
            &image[0..4]
        ));
    }

    let version = u16::from_le_bytes([image[4], image[5]]);
    if version != VERSION {
        return Err(format!("unsupported version: {}", version));
    }

    let mut len_bytes = [0u8; 8];
    len_bytes.copy_from_slice(&image[6..HEADER_SIZE]);
    let payload_len = u64::from_le_bytes(len_bytes) as usize;

    let expected = HEADER_SIZE
        .checked_add(payload_len)
        .and_then(|n| n.checked_add(FOOTER_SIZE));
    if expected != Some(image.len()) {
        return Err(format!(
            "payload length {} does not match file size {}",
            payload_len,
            image.len()
        ));
    }

    let payload = &image[HEADER_SIZE..HEADER_SIZE + payload_len];
    let footer = &image[HEADER_SIZE + payload_len..];

    let stored_crc = u32::from_le_bytes([footer[0], footer[1], footer[2], footer[3]]);
    let actual_crc = crc32fast::hash(payload);
    if stored_crc != actual_crc {
        return Err(format!(
            "checksum mismatch: stored {:#010x}, computed {:#010x}",
            stored_crc, actual_crc
        ));
    }

    bincode::deserialize(payload).map_err(|e| format!("undecodable payload: {}", e))
}
