//! Codec Error Module
//!
//! Provides the error taxonomy surfaced by decoding and encoding. Every
//! variant carries enough context (tag, byte offset, expected vs actual
//! length) to diagnose malformed input at the call site. Nothing is retried
//! internally and no partial result is ever returned alongside an error.

use std::fmt;

/// Errors produced by decoding or encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Bad or missing version byte, or a structurally invalid fixed field
    /// (unparseable float text, bit count outside 1..=8, non-atom node
    /// name).
    Format { detail: String },
    /// Unrecognized term tag byte at the given offset.
    UnknownTag { tag: u8, offset: usize },
    /// Buffer ended before a field the stream declared. `tag` is the term
    /// tag being decoded, `None` when the tag byte itself was missing.
    Truncated {
        tag: Option<u8>,
        offset: usize,
        needed: usize,
        available: usize,
    },
    /// Recursion guard tripped while walking nested terms.
    DepthExceeded { max_depth: usize },
    /// Corrupt compressed section, or inflated length not matching the
    /// declared length.
    Decompression { detail: String },
    /// Encode-side: value not classifiable by the built-in rules, and the
    /// encode hook (if any) declined it.
    Unencodable { value_type: String },
    /// Encode-side: atom name longer than the wire limit of 65535 bytes.
    AtomTooLong,
}

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::Format { detail } => write!(f, "format error: {}", detail),
            CodecError::UnknownTag { tag, offset } => {
                write!(f, "unknown term tag {} at offset {}", tag, offset)
            }
            CodecError::Truncated {
                tag,
                offset,
                needed,
                available,
            } => match tag {
                Some(tag) => write!(
                    f,
                    "truncated input: tag {} at offset {} needs {} more byte(s), {} available",
                    tag, offset, needed, available
                ),
                None => write!(
                    f,
                    "truncated input: expected a term tag at offset {}",
                    offset
                ),
            },
            CodecError::DepthExceeded { max_depth } => {
                write!(f, "term nesting exceeds the depth limit of {}", max_depth)
            }
            CodecError::Decompression { detail } => {
                write!(f, "decompression failed: {}", detail)
            }
            CodecError::Unencodable { value_type } => {
                write!(f, "value of type {} cannot be encoded", value_type)
            }
            CodecError::AtomTooLong => {
                write!(f, "atom text is too long (65535 bytes limit reached)")
            }
        }
    }
}

impl std::error::Error for CodecError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_context() {
        let err = CodecError::UnknownTag {
            tag: 200,
            offset: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("200"));
        assert!(msg.contains("3"));

        let err = CodecError::Truncated {
            tag: Some(109),
            offset: 5,
            needed: 4,
            available: 1,
        };
        let msg = err.to_string();
        assert!(msg.contains("109"));
        assert!(msg.contains("4"));
        assert!(msg.contains("1"));
    }

    #[test]
    fn test_display_missing_tag() {
        let err = CodecError::Truncated {
            tag: None,
            offset: 0,
            needed: 1,
            available: 0,
        };
        assert!(err.to_string().contains("term tag"));
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(CodecError::AtomTooLong, CodecError::AtomTooLong);
        assert_ne!(
            CodecError::DepthExceeded { max_depth: 10 },
            CodecError::DepthExceeded { max_depth: 11 }
        );
    }

    #[test]
    fn test_is_std_error() {
        let err: &dyn std::error::Error = &CodecError::AtomTooLong;
        assert!(!err.to_string().is_empty());
    }
}
