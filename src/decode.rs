use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::alloc_util::{try_vec_from_slice, try_vec_with_capacity};
use crate::stream::CborStream;
use crate::value::{CborInt, CborMap, CborValue, Float, Simple};
use crate::{CborError, ErrorKind};

/// Decode exactly one data item spanning the whole input.
///
/// Trailing bytes after the item are rejected as `Malformed`. Use
/// [`decode_at`] to consume a sequence of adjacent items.
///
/// # Errors
///
/// Returns an error if the input is malformed, uses a reserved or
/// unsupported encoding, or an allocation fails. On failure no partial
/// result is exposed; everything built so far is released.
pub fn decode(bytes: &[u8]) -> Result<CborValue, CborError> {
    let mut s = CborStream::new(bytes, 0);
    let v = parse_item(&mut s)?;
    if !s.eof() {
        return Err(CborError::new(ErrorKind::Malformed, s.position()));
    }
    Ok(v)
}

/// Decode the item starting at `*cursor`, advancing the cursor one byte
/// past the item's end on success.
///
/// On failure the cursor is left unchanged, so a caller iterating a
/// sequence observes exactly which offset failed.
///
/// # Errors
///
/// Same failure conditions as [`decode`], without the trailing-bytes check.
pub fn decode_at(bytes: &[u8], cursor: &mut usize) -> Result<CborValue, CborError> {
    let mut s = CborStream::new(bytes, *cursor);
    let v = parse_item(&mut s)?;
    *cursor = s.position();
    Ok(v)
}

fn argument_to_len(argument: u64, off: usize) -> Result<usize, CborError> {
    usize::try_from(argument).map_err(|_| CborError::new(ErrorKind::Malformed, off))
}

fn parse_item(s: &mut CborStream<'_>) -> Result<CborValue, CborError> {
    let off = s.position();
    let head = s.read_head()?;

    debug_assert!(head.major <= 7);
    match head.major {
        0 => Ok(CborValue::Int(CborInt::new_unchecked(i128::from(
            head.argument,
        )))),
        1 => Ok(CborValue::Int(CborInt::new_unchecked(
            -1 - i128::from(head.argument),
        ))),
        2 => {
            let len = argument_to_len(head.argument, off)?;
            let payload = s.read_exact(len)?;
            Ok(CborValue::Bytes(try_vec_from_slice(payload, off)?))
        }
        3 => {
            // Text payloads are copied verbatim; UTF-8 validation is the
            // caller's concern (CborValue::as_str).
            let len = argument_to_len(head.argument, off)?;
            let payload = s.read_exact(len)?;
            Ok(CborValue::Text(try_vec_from_slice(payload, off)?))
        }
        4 => {
            let len = argument_to_len(head.argument, off)?;
            let mut items: Vec<CborValue> = try_vec_with_capacity(len, off)?;
            for _ in 0..len {
                items.push(parse_item(s)?);
            }
            Ok(CborValue::Array(items))
        }
        5 => {
            let len = argument_to_len(head.argument, off)?;
            let mut entries: Vec<(CborValue, CborValue)> = try_vec_with_capacity(len, off)?;
            for _ in 0..len {
                let key = parse_item(s)?;
                let value = parse_item(s)?;
                entries.push((key, value));
            }
            Ok(CborValue::Map(CborMap::from_entries(entries)))
        }
        6 => {
            let item = parse_item(s)?;
            Ok(CborValue::Tag(head.argument, Box::new(item)))
        }
        7 => match head.ai {
            20 => Ok(CborValue::Simple(Simple::False)),
            21 => Ok(CborValue::Simple(Simple::True)),
            22 => Ok(CborValue::Simple(Simple::Null)),
            23 => Ok(CborValue::Simple(Simple::Undefined)),
            24 => {
                // One-byte simple values: < 32 overlaps the reserved
                // small-simple range, the rest are legal but not modeled.
                if head.argument < 32 {
                    Err(CborError::new(ErrorKind::Malformed, off))
                } else {
                    Err(CborError::new(ErrorKind::Unsupported, off))
                }
            }
            25 => {
                let bits =
                    u16::try_from(head.argument).map_err(|_| CborError::new(ErrorKind::Malformed, off))?;
                Ok(CborValue::Float(Float::Half(bits)))
            }
            26 => {
                let bits =
                    u32::try_from(head.argument).map_err(|_| CborError::new(ErrorKind::Malformed, off))?;
                Ok(CborValue::Float(Float::Single(bits)))
            }
            27 => Ok(CborValue::Float(Float::Double(head.argument))),
            // ai 28..=31 never reach here; the head reader rejects them.
            _ => Err(CborError::new(ErrorKind::Malformed, off)),
        },
        _ => unreachable!("major out of range"),
    }
}
