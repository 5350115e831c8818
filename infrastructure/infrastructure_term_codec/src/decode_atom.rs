//! Decode Atom Module
//!
//! Decodes the payload of the four atom wire forms into the raw name
//! string. Latin-1 names map codepoint-for-codepoint; UTF-8 names are
//! validated.

use entities_terms::Atom;

use crate::consts::{
    TAG_ATOM_EXT, TAG_ATOM_UTF8_EXT, TAG_SMALL_ATOM_EXT, TAG_SMALL_ATOM_UTF8_EXT,
};
use crate::decoding::need;
use crate::errors::{CodecError, CodecResult};

/// Decode an atom name given the buffer position just past the tag byte.
///
/// # Returns
/// * `Ok((name, new_pos))` - the resolved name and the position after it
/// * `Err(CodecError)` - truncated input or invalid name encoding
pub(crate) fn decode_atom_name(buf: &[u8], pos: usize, tag: u8) -> CodecResult<(String, usize)> {
    let (len, data_pos) = match tag {
        // 2-byte big-endian length
        TAG_ATOM_EXT | TAG_ATOM_UTF8_EXT => {
            need(buf, tag, pos, 2)?;
            (u16::from_be_bytes([buf[pos], buf[pos + 1]]) as usize, pos + 2)
        }
        // 1-byte length
        TAG_SMALL_ATOM_EXT | TAG_SMALL_ATOM_UTF8_EXT => {
            need(buf, tag, pos, 1)?;
            (buf[pos] as usize, pos + 1)
        }
        _ => {
            return Err(CodecError::UnknownTag {
                tag,
                offset: pos.saturating_sub(1),
            })
        }
    };

    need(buf, tag, data_pos, len)?;
    let raw = &buf[data_pos..data_pos + len];

    let name = match tag {
        TAG_ATOM_UTF8_EXT | TAG_SMALL_ATOM_UTF8_EXT => match std::str::from_utf8(raw) {
            Ok(text) => text.to_string(),
            Err(_) => {
                return Err(CodecError::Format {
                    detail: format!("invalid UTF-8 in atom name at offset {}", data_pos),
                })
            }
        },
        _ => Atom::from_latin1(raw).into_name(),
    };

    Ok((name, data_pos + len))
}
