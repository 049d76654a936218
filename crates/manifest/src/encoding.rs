//! Byte-order-mark aware decoding of manifest files

use mhlcheck_errors::ManifestError;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF16_LE_BOM: &[u8] = &[0xFF, 0xFE];
const UTF16_BE_BOM: &[u8] = &[0xFE, 0xFF];

/// Decode raw manifest bytes to text.
///
/// UTF-8 (with or without BOM) and BOM-prefixed UTF-16 in either byte
/// order are accepted.
pub(crate) fn decode(bytes: &[u8]) -> Result<String, ManifestError> {
    if let Some(rest) = bytes.strip_prefix(UTF8_BOM) {
        return utf8(rest);
    }
    if let Some(rest) = bytes.strip_prefix(UTF16_LE_BOM) {
        return utf16(rest, u16::from_le_bytes);
    }
    if let Some(rest) = bytes.strip_prefix(UTF16_BE_BOM) {
        return utf16(rest, u16::from_be_bytes);
    }
    utf8(bytes)
}

fn utf8(bytes: &[u8]) -> Result<String, ManifestError> {
    String::from_utf8(bytes.to_vec()).map_err(|e| ManifestError::Parse {
        message: format!("invalid UTF-8: {e}"),
    })
}

fn utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> Result<String, ManifestError> {
    if bytes.len() % 2 != 0 {
        return Err(ManifestError::Parse {
            message: "truncated UTF-16 data".to_string(),
        });
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| to_unit([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).map_err(|e| ManifestError::Parse {
        message: format!("invalid UTF-16: {e}"),
    })
}
