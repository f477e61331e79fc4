//! Byte-transform collaborators over the core string types.
//!
//! These consume the primitive append path and add no invariants of
//! their own: given bytes in one encoding they produce bytes in the
//! other, reporting malformed input instead of guessing.

use thiserror::Error;

use crate::AllocError;
use crate::CowByteString;
use crate::CowString;

/// Byte order of UTF-16 data without a byte order mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
}

/// Transcoding failure.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscodeError {
    /// the input was not well-formed in the source encoding
    #[error("malformed UTF-16 input")]
    Malformed,
    #[error(transparent)]
    Alloc(#[from] AllocError),
}

/// Decodes UTF-16 bytes into a UTF-8 string.
///
/// A leading byte order mark selects the byte order and is consumed;
/// otherwise `default_endian` applies. Odd-length input and unpaired
/// surrogates are reported as [`TranscodeError::Malformed`].
pub fn utf16_to_utf8(bytes: &[u8], default_endian: Endian) -> Result<CowString, TranscodeError> {
    let (endian, rest) = match bytes {
        [0xFF, 0xFE, rest @ ..] => (Endian::Little, rest),
        [0xFE, 0xFF, rest @ ..] => (Endian::Big, rest),
        _ => (default_endian, bytes),
    };
    if rest.len() % 2 != 0 {
        return Err(TranscodeError::Malformed);
    }
    let units = rest.chunks_exact(2).map(|pair| match endian {
        Endian::Little => u16::from_le_bytes([pair[0], pair[1]]),
        Endian::Big => u16::from_be_bytes([pair[0], pair[1]]),
    });
    let mut out = CowByteString::new();
    out.reserve(rest.len() / 2)?;
    let mut buf = [0u8; 4];
    for unit in char::decode_utf16(units) {
        let c = unit.map_err(|_| TranscodeError::Malformed)?;
        out.append(c.encode_utf8(&mut buf).as_bytes())?;
    }
    // SAFETY: built exclusively from encode_utf8 output
    Ok(unsafe { CowString::from_utf8_unchecked(out) })
}

/// Encodes a UTF-8 string as UTF-16 bytes in the requested byte order,
/// optionally preceded by a byte order mark.
pub fn utf8_to_utf16(
    s: &str,
    endian: Endian,
    write_bom: bool,
) -> Result<CowByteString, AllocError> {
    let mut out = CowByteString::new();
    let estimate = s.len().checked_mul(2).and_then(|n| n.checked_add(2)).ok_or(AllocError)?;
    out.reserve(estimate)?;
    if write_bom {
        out.append(match endian {
            Endian::Little => &[0xFF, 0xFE],
            Endian::Big => &[0xFE, 0xFF],
        })?;
    }
    for unit in s.encode_utf16() {
        out.append(&match endian {
            Endian::Little => unit.to_le_bytes(),
            Endian::Big => unit.to_be_bytes(),
        })?;
    }
    Ok(out)
}

#[test]
fn test_utf16_round_trip() {
    let encoded = utf8_to_utf16("Hi \u{1f40d}", Endian::Little, true).unwrap();
    assert_eq!(&encoded[..2], &[0xFF, 0xFE]);
    let decoded = utf16_to_utf8(&encoded, Endian::Big).unwrap(); // BOM wins
    assert_eq!(decoded, "Hi \u{1f40d}");
}

#[test]
fn test_utf16_malformed() {
    // lone high surrogate
    assert_eq!(
        utf16_to_utf8(&[0x00, 0xD8], Endian::Little),
        Err(TranscodeError::Malformed)
    );
    // odd number of bytes
    assert_eq!(utf16_to_utf8(&[0xFF, 0xFE, 0x41], Endian::Little), Err(TranscodeError::Malformed));
}
