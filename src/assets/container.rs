//! Container-format correction.
//!
//! Distributed exhibit assets are binary glTF files whose magic has been
//! altered from `glTF` to `gltf`, so generic viewers refuse them. The loader
//! verifies the altered header and restores the canonical one before
//! decoding.

use crate::errors::{Result, VitrineError};

/// Header found on distributed assets.
pub const DISTRIBUTED_MAGIC: [u8; 4] = *b"gltf";

/// Canonical binary glTF header.
pub const GLB_MAGIC: [u8; 4] = *b"glTF";

/// Checks the altered header and rewrites it to the canonical one in place.
///
/// All four bytes must match [`DISTRIBUTED_MAGIC`]. A canonical `glTF`
/// header is rejected as well: the exhibit only accepts its own packaging.
pub fn restore_magic(bytes: &mut [u8]) -> Result<()> {
    let Some(header) = bytes.get(..4) else {
        return Err(VitrineError::Format(format!(
            "asset is {} byte(s), too short for a container header",
            bytes.len()
        )));
    };

    if header[..2] != DISTRIBUTED_MAGIC[..2] {
        return Err(VitrineError::Format(format!(
            "unexpected leading bytes {:02X?}",
            &header[..2]
        )));
    }
    if header[2..4] != DISTRIBUTED_MAGIC[2..4] {
        return Err(VitrineError::Format(format!(
            "unexpected header {:02X?}, expected {:02X?}",
            header, DISTRIBUTED_MAGIC
        )));
    }

    bytes[2..4].copy_from_slice(&GLB_MAGIC[2..4]);
    Ok(())
}

/// Inverse of [`restore_magic`], used when packaging assets.
pub fn alter_magic(bytes: &mut [u8]) -> Result<()> {
    match bytes.get(..4) {
        Some(header) if header == GLB_MAGIC => {
            bytes[2..4].copy_from_slice(&DISTRIBUTED_MAGIC[2..4]);
            Ok(())
        }
        _ => Err(VitrineError::Format("not a binary glTF file".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restores_altered_header() {
        let mut bytes = vec![0x67, 0x6C, 0x74, 0x66, 2, 0, 0, 0];
        restore_magic(&mut bytes).unwrap();
        assert_eq!(&bytes[..4], b"glTF");
        assert_eq!(&bytes[4..], &[2, 0, 0, 0]);
    }

    #[test]
    fn rejects_wrong_suffix() {
        let mut bytes = vec![0x67, 0x6C, 0x58, 0x59, 0, 0];
        let err = restore_magic(&mut bytes).unwrap_err();
        assert!(matches!(err, VitrineError::Format(_)));
        assert_eq!(&bytes[..4], &[0x67, 0x6C, 0x58, 0x59]);
    }

    #[test]
    fn rejects_wrong_prefix() {
        let mut bytes = b"PK\x03\x04rest".to_vec();
        assert!(matches!(restore_magic(&mut bytes), Err(VitrineError::Format(_))));
    }

    #[test]
    fn rejects_canonical_header() {
        let mut bytes = b"glTF\x02\0\0\0".to_vec();
        assert!(restore_magic(&mut bytes).is_err());
    }

    #[test]
    fn rejects_truncated_input() {
        let mut bytes = vec![0x67, 0x6C];
        assert!(matches!(restore_magic(&mut bytes), Err(VitrineError::Format(_))));
    }

    #[test]
    fn alter_then_restore() {
        let mut bytes = b"glTF\x02\0\0\0".to_vec();
        alter_magic(&mut bytes).unwrap();
        assert_eq!(&bytes[..4], b"gltf");
        restore_magic(&mut bytes).unwrap();
        assert_eq!(&bytes[..4], b"glTF");
    }
}
