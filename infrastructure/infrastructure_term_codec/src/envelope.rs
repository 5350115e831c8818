//! Compression Envelope Module
//!
//! The optional whole-payload compression wrapper: a marker byte, a 4-byte
//! big-endian uncompressed length, then a zlib stream covering the term
//! body. Inflation is strict about the declared length; a stream that
//! inflates to anything else is rejected rather than passed along.

use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::consts::TAG_COMPRESSED;
use crate::errors::{CodecError, CodecResult};

/// Inflate a compressed section, given the bytes just past the marker:
/// the 4-byte declared length followed by the zlib stream.
///
/// # Returns
/// * `Ok(body)` - the inflated term body, exactly the declared length
/// * `Err(CodecError)` - truncated header, corrupt stream or length mismatch
pub fn inflate_section(data: &[u8]) -> CodecResult<Vec<u8>> {
    if data.len() < 4 {
        return Err(CodecError::Truncated {
            tag: Some(TAG_COMPRESSED),
            offset: 0,
            needed: 4,
            available: data.len(),
        });
    }
    let declared = u32::from_be_bytes([data[0], data[1], data[2], data[3]]) as usize;

    let mut body = Vec::with_capacity(declared.min(data.len() * 8));
    let mut decoder = ZlibDecoder::new(&data[4..]);
    decoder
        .read_to_end(&mut body)
        .map_err(|err| CodecError::Decompression {
            detail: format!("corrupt stream: {}", err),
        })?;

    if body.len() != declared {
        return Err(CodecError::Decompression {
            detail: format!(
                "declared length {} does not match inflated length {}",
                declared,
                body.len()
            ),
        });
    }
    Ok(body)
}

/// Deflate a term body into the full envelope section: marker byte,
/// declared length, zlib stream.
pub fn deflate_section(body: &[u8]) -> CodecResult<Vec<u8>> {
    let declared = u32::try_from(body.len()).map_err(|_| CodecError::Format {
        detail: format!("body length {} exceeds the 32-bit wire limit", body.len()),
    })?;

    let mut section = vec![TAG_COMPRESSED];
    section.extend_from_slice(&declared.to_be_bytes());
    let mut encoder = ZlibEncoder::new(section, Compression::default());
    encoder
        .write_all(body)
        .map_err(|err| CodecError::Decompression {
            detail: format!("deflate failed: {}", err),
        })?;
    encoder.finish().map_err(|err| CodecError::Decompression {
        detail: format!("deflate failed: {}", err),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let body = b"Lorem ipsum dolor sit amet, consectetur adipisicing elit".repeat(4);
        let section = deflate_section(&body).unwrap();
        assert_eq!(section[0], TAG_COMPRESSED);
        assert_eq!(
            u32::from_be_bytes([section[1], section[2], section[3], section[4]]) as usize,
            body.len()
        );
        assert_eq!(inflate_section(&section[1..]).unwrap(), body);
    }

    #[test]
    fn test_repetitive_body_shrinks() {
        let body = vec![97u8; 4096];
        let section = deflate_section(&body).unwrap();
        assert!(section.len() < body.len());
    }

    #[test]
    fn test_declared_length_mismatch() {
        let body = b"some term bytes";
        let mut section = deflate_section(body).unwrap();
        // Overstate the declared length by one
        let wrong = (body.len() + 1) as u32;
        section[1..5].copy_from_slice(&wrong.to_be_bytes());
        let result = inflate_section(&section[1..]);
        match result {
            Err(CodecError::Decompression { detail }) => {
                assert!(detail.contains(&format!("{}", body.len())));
                assert!(detail.contains(&format!("{}", body.len() + 1)));
            }
            other => panic!("expected a length mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_corrupt_stream() {
        let result = inflate_section(&[0, 0, 0, 10, 1, 2, 3, 4]);
        assert!(matches!(result, Err(CodecError::Decompression { .. })));
    }

    #[test]
    fn test_truncated_length_header() {
        let result = inflate_section(&[0, 0]);
        assert!(matches!(
            result,
            Err(CodecError::Truncated {
                tag: Some(TAG_COMPRESSED),
                needed: 4,
                available: 2,
                ..
            })
        ));
    }

    #[test]
    fn test_empty_body_round_trips() {
        let section = deflate_section(&[]).unwrap();
        assert_eq!(inflate_section(&section[1..]).unwrap(), Vec::<u8>::new());
    }
}
