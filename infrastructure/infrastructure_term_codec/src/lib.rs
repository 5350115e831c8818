//! Infrastructure Layer: External Term Format Codec
//!
//! A bidirectional codec between the external term format byte stream and
//! the in-memory term tree defined by `entities_terms`. Decoding walks an
//! untrusted buffer under a depth budget and returns the term together with
//! whatever trailing bytes it did not consume; encoding flattens a term
//! back into wire bytes, optionally wrapped in the whole-payload
//! compression envelope.
//!
//! ## Modules
//!
//! - **[`config`](config/index.html)**: the codec configuration, atom
//!   resolution policies and encode hook
//! - **[`consts`](consts/index.html)**: the wire tag constants
//! - **[`decoding`](decoding/index.html)**: tag dispatch and the recursive
//!   decode walkers
//! - **[`encoding`](encoding/index.html)**: variant dispatch and the wire
//!   serializers
//! - **[`envelope`](envelope/index.html)**: the compressed-payload wrapper
//! - **[`errors`](errors/index.html)**: the codec error taxonomy
//!
//! ## Entry points
//!
//! [`binary_to_term`] / [`term_to_binary`] work on complete payloads
//! carrying the leading version byte; the `_body` variants skip the version
//! byte and the envelope for callers that handle framing themselves.

pub mod config;
pub mod consts;
mod decode_atom;
pub mod decoding;
pub mod encoding;
pub mod envelope;
pub mod errors;

use std::borrow::Cow;

pub use config::{AtomPolicy, AtomResolver, CodecConfig, EncodeHook};
pub use errors::{CodecError, CodecResult};

use consts::{TAG_COMPRESSED, VERSION_MAGIC};
use decoding::Decoder;
use encoding::Encoder;
use entities_terms::Term;

/// Decode a complete payload: version byte, optional compression envelope,
/// term body.
///
/// # Returns
/// * `Ok((term, tail))` - the decoded term and the unconsumed trailing
///   bytes; the tail borrows from `data` for plain payloads and is owned
///   when it comes out of a decompressed buffer
/// * `Err(CodecError)` - missing version byte or any decode failure
pub fn binary_to_term<'a>(
    data: &'a [u8],
    config: &CodecConfig,
) -> CodecResult<(Term, Cow<'a, [u8]>)> {
    match data.first() {
        Some(&VERSION_MAGIC) => {}
        Some(&other) => {
            return Err(CodecError::Format {
                detail: format!("expected version byte {}, found {}", VERSION_MAGIC, other),
            })
        }
        None => {
            return Err(CodecError::Format {
                detail: "empty input has no version byte".to_string(),
            })
        }
    }

    let rest = &data[1..];
    if rest.first() == Some(&TAG_COMPRESSED) {
        let body = envelope::inflate_section(&rest[1..])?;
        let (term, consumed) = Decoder::new(config).decode(&body)?;
        return Ok((term, Cow::Owned(body[consumed..].to_vec())));
    }

    let (term, consumed) = Decoder::new(config).decode(rest)?;
    Ok((term, Cow::Borrowed(&rest[consumed..])))
}

/// Decode a bare term body: no version byte, no compression envelope.
pub fn binary_to_term_body<'a>(
    data: &'a [u8],
    config: &CodecConfig,
) -> CodecResult<(Term, Cow<'a, [u8]>)> {
    let (term, consumed) = Decoder::new(config).decode(data)?;
    Ok((term, Cow::Borrowed(&data[consumed..])))
}

/// Encode a term into a complete payload with the leading version byte,
/// compressing the body when the configuration enables compression and the
/// body reaches the configured threshold.
pub fn term_to_binary(term: &Term, config: &CodecConfig) -> CodecResult<Vec<u8>> {
    let body = Encoder::new(config).encode(term)?;
    let mut out = Vec::with_capacity(body.len() + 1);
    out.push(VERSION_MAGIC);
    if config.compress && body.len() >= config.compress_threshold {
        out.extend_from_slice(&envelope::deflate_section(&body)?);
    } else {
        out.extend_from_slice(&body);
    }
    Ok(out)
}

/// Encode a bare term body: no version byte, never compressed.
pub fn term_to_binary_body(term: &Term, config: &CodecConfig) -> CodecResult<Vec<u8>> {
    Encoder::new(config).encode(term)
}
