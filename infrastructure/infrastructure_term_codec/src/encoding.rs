//! Encoding Module
//!
//! Variant dispatch and the serializers that flatten a term tree into wire
//! bytes. The encoder appends to one output buffer, visiting each term
//! before its children, and shares the decoder's depth budget so a
//! caller-supplied tree cannot push the walk past the configured nesting
//! limit.
//!
//! Wire forms are chosen by normalization policy, not dictated by the
//! format: integers take the smallest applicable form, atoms always emit
//! the UTF-8 tags, pids, references and funs emit the modern sub-tags, and
//! lists use the generic form unless compact strings are enabled. Every
//! legacy form still decodes; it is just never produced.

use entities_terms::{Atom, BigInt, BitString, Fun, List, Pid, Reference, Term, MAX_ATOM_BYTES};

use crate::config::CodecConfig;
use crate::consts::*;
use crate::errors::{CodecError, CodecResult};

/// Aggregate lengths on the wire are 32-bit.
fn len_u32(len: usize, what: &str) -> CodecResult<u32> {
    u32::try_from(len).map_err(|_| CodecError::Format {
        detail: format!("{} length {} exceeds the 32-bit wire limit", what, len),
    })
}

/// The byte payload for the compact string form, when the list qualifies:
/// a proper, non-empty list of at most 65535 integers all in 0..=255.
fn compact_string_bytes(list: &List) -> Option<Vec<u8>> {
    if !list.is_proper() || list.elements.is_empty() || list.elements.len() > u16::MAX as usize {
        return None;
    }
    list.elements
        .iter()
        .map(|element| match element {
            Term::Int(value) if (0..=255).contains(value) => Some(*value as u8),
            _ => None,
        })
        .collect()
}

/// Encoder for a single term tree.
pub struct Encoder<'a> {
    config: &'a CodecConfig,
}

impl<'a> Encoder<'a> {
    pub fn new(config: &'a CodecConfig) -> Self {
        Self { config }
    }

    /// Encode one term into its body bytes (no version byte, no envelope).
    pub fn encode(&self, term: &Term) -> CodecResult<Vec<u8>> {
        let mut buf = Vec::new();
        self.encode_term(&mut buf, term, self.config.max_depth)?;
        Ok(buf)
    }

    fn encode_term(&self, buf: &mut Vec<u8>, term: &Term, depth: usize) -> CodecResult<()> {
        if depth == 0 {
            return Err(CodecError::DepthExceeded {
                max_depth: self.config.max_depth,
            });
        }

        match term {
            Term::Int(value) => {
                self.encode_int(buf, *value);
                Ok(())
            }
            Term::BigInt(value) => self.encode_big(buf, value),
            Term::Float(value) => {
                buf.push(TAG_NEW_FLOAT_EXT);
                buf.extend_from_slice(&value.to_be_bytes());
                Ok(())
            }
            Term::Atom(atom) | Term::StrictAtom(atom) => {
                let start = buf.len();
                match self.encode_atom_name(buf, atom) {
                    Err(err) => self.reject(buf, start, term, err, depth),
                    ok => ok,
                }
            }
            Term::Tuple(elements) => {
                if elements.len() <= u8::MAX as usize {
                    buf.push(TAG_SMALL_TUPLE_EXT);
                    buf.push(elements.len() as u8);
                } else {
                    buf.push(TAG_LARGE_TUPLE_EXT);
                    buf.extend_from_slice(&len_u32(elements.len(), "tuple")?.to_be_bytes());
                }
                for element in elements {
                    self.encode_term(buf, element, depth - 1)?;
                }
                Ok(())
            }
            Term::List(list) => self.encode_list(buf, list, depth),
            Term::Map(pairs) => {
                buf.push(TAG_MAP_EXT);
                buf.extend_from_slice(&len_u32(pairs.len(), "map")?.to_be_bytes());
                for (key, value) in pairs {
                    self.encode_term(buf, key, depth - 1)?;
                    self.encode_term(buf, value, depth - 1)?;
                }
                Ok(())
            }
            Term::Binary(bytes) => {
                buf.push(TAG_BINARY_EXT);
                buf.extend_from_slice(&len_u32(bytes.len(), "binary")?.to_be_bytes());
                buf.extend_from_slice(bytes);
                Ok(())
            }
            Term::BitString(bits) => self.encode_bitstring(buf, term, bits, depth),
            Term::Pid(pid) => self.encode_pid(buf, pid),
            Term::Reference(reference) => self.encode_ref(buf, term, reference, depth),
            Term::Fun(fun) => self.encode_fun(buf, fun, depth),
        }
    }

    /// A built-in rule rejected `term`. Unwind anything already written for
    /// it, offer the value to the encode hook, and keep the original error
    /// when the hook is absent or declines.
    fn reject(
        &self,
        buf: &mut Vec<u8>,
        written_from: usize,
        term: &Term,
        err: CodecError,
        depth: usize,
    ) -> CodecResult<()> {
        buf.truncate(written_from);
        if let Some(hook) = &self.config.encode_hook {
            if let Some(replacement) = hook(term) {
                return self.encode_term(buf, &replacement, depth - 1);
            }
        }
        Err(err)
    }

    /// Smallest applicable fixed form: 1-byte unsigned, then 4-byte signed,
    /// then the big form. An i64 magnitude never needs more than 8 digits.
    fn encode_int(&self, buf: &mut Vec<u8>, value: i64) {
        if (0..=255).contains(&value) {
            buf.push(TAG_SMALL_INTEGER_EXT);
            buf.push(value as u8);
        } else if let Ok(narrow) = i32::try_from(value) {
            buf.push(TAG_INTEGER_EXT);
            buf.extend_from_slice(&narrow.to_be_bytes());
        } else {
            let magnitude = value.unsigned_abs();
            let digits = magnitude.to_le_bytes();
            let used = ((u64::BITS - magnitude.leading_zeros() + 7) / 8) as usize;
            buf.push(TAG_SMALL_BIG_EXT);
            buf.push(used as u8);
            buf.push(u8::from(value < 0));
            buf.extend_from_slice(&digits[..used]);
        }
    }

    fn encode_big(&self, buf: &mut Vec<u8>, value: &BigInt) -> CodecResult<()> {
        let (negative, digits) = value.to_sign_le_digits();
        if digits.len() <= u8::MAX as usize {
            buf.push(TAG_SMALL_BIG_EXT);
            buf.push(digits.len() as u8);
        } else {
            buf.push(TAG_LARGE_BIG_EXT);
            buf.extend_from_slice(&len_u32(digits.len(), "big integer digit")?.to_be_bytes());
        }
        buf.push(u8::from(negative));
        buf.extend_from_slice(&digits);
        Ok(())
    }

    /// Atom names always emit the UTF-8 tags, split on the 255-byte length
    /// boundary. Also used for the node and module names inside pid,
    /// reference and fun terms.
    fn encode_atom_name(&self, buf: &mut Vec<u8>, atom: &Atom) -> CodecResult<()> {
        let name = atom.name().as_bytes();
        if name.len() <= u8::MAX as usize {
            buf.push(TAG_SMALL_ATOM_UTF8_EXT);
            buf.push(name.len() as u8);
        } else if name.len() <= MAX_ATOM_BYTES {
            buf.push(TAG_ATOM_UTF8_EXT);
            buf.extend_from_slice(&(name.len() as u16).to_be_bytes());
        } else {
            return Err(CodecError::AtomTooLong);
        }
        buf.extend_from_slice(name);
        Ok(())
    }

    fn encode_list(&self, buf: &mut Vec<u8>, list: &List, depth: usize) -> CodecResult<()> {
        if list.is_empty() {
            buf.push(TAG_NIL_EXT);
            return Ok(());
        }
        if self.config.compact_strings {
            if let Some(bytes) = compact_string_bytes(list) {
                buf.push(TAG_STRING_EXT);
                buf.extend_from_slice(&(bytes.len() as u16).to_be_bytes());
                buf.extend_from_slice(&bytes);
                return Ok(());
            }
        }
        buf.push(TAG_LIST_EXT);
        buf.extend_from_slice(&len_u32(list.elements.len(), "list")?.to_be_bytes());
        for element in &list.elements {
            self.encode_term(buf, element, depth - 1)?;
        }
        match &list.tail {
            None => {
                buf.push(TAG_NIL_EXT);
                Ok(())
            }
            Some(tail) => self.encode_term(buf, tail, depth - 1),
        }
    }

    fn encode_bitstring(
        &self,
        buf: &mut Vec<u8>,
        term: &Term,
        bits: &BitString,
        depth: usize,
    ) -> CodecResult<()> {
        let start = buf.len();
        if !(1..=8).contains(&bits.last_byte_bits) {
            let err = CodecError::Unencodable {
                value_type: format!(
                    "BitString with {} used bits in the final byte",
                    bits.last_byte_bits
                ),
            };
            return self.reject(buf, start, term, err, depth);
        }
        buf.push(TAG_BIT_BINARY_EXT);
        buf.extend_from_slice(&len_u32(bits.bytes.len(), "bit string")?.to_be_bytes());
        buf.push(bits.last_byte_bits);
        buf.extend_from_slice(&bits.bytes);
        Ok(())
    }

    /// Pids always emit the modern sub-tag: the normalized creation field is
    /// 32-bit and the legacy form would truncate it.
    fn encode_pid(&self, buf: &mut Vec<u8>, pid: &Pid) -> CodecResult<()> {
        buf.push(TAG_NEW_PID_EXT);
        self.encode_atom_name(buf, &pid.node)?;
        buf.extend_from_slice(&pid.id.to_be_bytes());
        buf.extend_from_slice(&pid.serial.to_be_bytes());
        buf.extend_from_slice(&pid.creation.to_be_bytes());
        Ok(())
    }

    fn encode_ref(
        &self,
        buf: &mut Vec<u8>,
        term: &Term,
        reference: &Reference,
        depth: usize,
    ) -> CodecResult<()> {
        let start = buf.len();
        if !(1..=3).contains(&reference.ids.len()) {
            let err = CodecError::Unencodable {
                value_type: format!("Reference with {} id words", reference.ids.len()),
            };
            return self.reject(buf, start, term, err, depth);
        }
        buf.push(TAG_NEWER_REF_EXT);
        buf.extend_from_slice(&(reference.ids.len() as u16).to_be_bytes());
        self.encode_atom_name(buf, &reference.node)?;
        buf.extend_from_slice(&reference.creation.to_be_bytes());
        for id in &reference.ids {
            buf.extend_from_slice(&id.to_be_bytes());
        }
        Ok(())
    }

    fn encode_fun(&self, buf: &mut Vec<u8>, fun: &Fun, depth: usize) -> CodecResult<()> {
        buf.push(TAG_NEW_FUN_EXT);
        // The size word counts every byte after the tag, itself included;
        // reserve it now and patch once the fields are written.
        let size_at = buf.len();
        buf.extend_from_slice(&[0; 4]);
        buf.push(fun.arity);
        buf.extend_from_slice(&fun.uniq);
        buf.extend_from_slice(&fun.index.to_be_bytes());
        buf.extend_from_slice(&len_u32(fun.free.len(), "free variable")?.to_be_bytes());
        self.encode_atom_name(buf, &fun.module)?;
        self.encode_int(buf, fun.old_index);
        self.encode_int(buf, fun.old_uniq);
        self.encode_pid(buf, &fun.pid)?;
        for var in &fun.free {
            self.encode_term(buf, var, depth - 1)?;
        }
        let size = len_u32(buf.len() - size_at, "fun")?;
        buf[size_at..size_at + 4].copy_from_slice(&size.to_be_bytes());
        Ok(())
    }
}
