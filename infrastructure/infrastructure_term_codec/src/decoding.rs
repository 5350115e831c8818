//! Decoding Module
//!
//! Tag dispatch and the recursive structure walkers that rebuild a term
//! tree from wire bytes. Every handler receives the buffer and the position
//! just past the bytes already consumed and returns the new position, so
//! the caller advances by exactly what was read.
//!
//! Decoding is strictly recursive and bounded: each descent into a nested
//! element spends one unit of the configured depth budget, and exhausting
//! the budget fails with `DepthExceeded` instead of exhausting the call
//! stack on adversarial input.

use entities_terms::{Atom, BigInt, BitString, Fun, List, Pid, Reference, Term};

use crate::config::{AtomPolicy, CodecConfig};
use crate::consts::*;
use crate::decode_atom::decode_atom_name;
use crate::errors::{CodecError, CodecResult};

/// Bounds check for a fixed-size read belonging to `tag`.
pub(crate) fn need(buf: &[u8], tag: u8, offset: usize, n: usize) -> CodecResult<()> {
    let available = buf.len().saturating_sub(offset);
    if n > available {
        return Err(CodecError::Truncated {
            tag: Some(tag),
            offset,
            needed: n,
            available,
        });
    }
    Ok(())
}

fn read_u8(buf: &[u8], tag: u8, pos: usize) -> CodecResult<(u8, usize)> {
    need(buf, tag, pos, 1)?;
    Ok((buf[pos], pos + 1))
}

fn read_u16(buf: &[u8], tag: u8, pos: usize) -> CodecResult<(u16, usize)> {
    need(buf, tag, pos, 2)?;
    Ok((u16::from_be_bytes([buf[pos], buf[pos + 1]]), pos + 2))
}

fn read_u32(buf: &[u8], tag: u8, pos: usize) -> CodecResult<(u32, usize)> {
    need(buf, tag, pos, 4)?;
    Ok((
        u32::from_be_bytes([buf[pos], buf[pos + 1], buf[pos + 2], buf[pos + 3]]),
        pos + 4,
    ))
}

/// Capacity hint for length-prefixed aggregates. A hostile length prefix
/// must not drive allocation past what the remaining input could hold.
fn capacity_hint(declared: usize, buf: &[u8], pos: usize) -> usize {
    declared.min(buf.len().saturating_sub(pos))
}

/// Decoder for a single input buffer.
pub struct Decoder<'a> {
    config: &'a CodecConfig,
}

impl<'a> Decoder<'a> {
    pub fn new(config: &'a CodecConfig) -> Self {
        Self { config }
    }

    /// Decode one term from the start of `buf`.
    ///
    /// # Returns
    /// * `Ok((term, consumed))` - the decoded term and the number of bytes
    ///   consumed; trailing bytes are the caller's
    /// * `Err(CodecError)` - decoding error
    pub fn decode(&self, buf: &[u8]) -> CodecResult<(Term, usize)> {
        self.decode_term(buf, 0, self.config.max_depth)
    }

    fn decode_term(&self, buf: &[u8], pos: usize, depth: usize) -> CodecResult<(Term, usize)> {
        if depth == 0 {
            return Err(CodecError::DepthExceeded {
                max_depth: self.config.max_depth,
            });
        }

        let tag = match buf.get(pos) {
            Some(&tag) => tag,
            None => {
                return Err(CodecError::Truncated {
                    tag: None,
                    offset: pos,
                    needed: 1,
                    available: 0,
                })
            }
        };
        let pos = pos + 1;

        match tag {
            TAG_SMALL_INTEGER_EXT => {
                let (value, pos) = read_u8(buf, tag, pos)?;
                Ok((Term::Int(value as i64), pos))
            }
            TAG_INTEGER_EXT => {
                need(buf, tag, pos, 4)?;
                let value =
                    i32::from_be_bytes([buf[pos], buf[pos + 1], buf[pos + 2], buf[pos + 3]]);
                Ok((Term::Int(value as i64), pos + 4))
            }
            TAG_FLOAT_EXT => self.decode_text_float(buf, pos),
            TAG_NEW_FLOAT_EXT => {
                need(buf, tag, pos, 8)?;
                let mut raw = [0u8; 8];
                raw.copy_from_slice(&buf[pos..pos + 8]);
                Ok((Term::Float(f64::from_be_bytes(raw)), pos + 8))
            }
            TAG_SMALL_BIG_EXT => {
                let (n, pos) = read_u8(buf, tag, pos)?;
                let (sign, pos) = read_u8(buf, tag, pos)?;
                self.decode_big(buf, pos, tag, n as usize, sign)
            }
            TAG_LARGE_BIG_EXT => {
                let (n, pos) = read_u32(buf, tag, pos)?;
                let (sign, pos) = read_u8(buf, tag, pos)?;
                self.decode_big(buf, pos, tag, n as usize, sign)
            }
            TAG_ATOM_EXT | TAG_SMALL_ATOM_EXT | TAG_ATOM_UTF8_EXT | TAG_SMALL_ATOM_UTF8_EXT => {
                let (name, pos) = decode_atom_name(buf, pos, tag)?;
                Ok((self.resolve_atom(name), pos))
            }
            TAG_NIL_EXT => Ok((Term::nil(), pos)),
            TAG_STRING_EXT => {
                let (len, pos) = read_u16(buf, tag, pos)?;
                let len = len as usize;
                need(buf, tag, pos, len)?;
                let elements = buf[pos..pos + len]
                    .iter()
                    .map(|&b| Term::Int(b as i64))
                    .collect();
                Ok((Term::List(List::proper(elements)), pos + len))
            }
            TAG_LIST_EXT => self.decode_list(buf, pos, depth),
            TAG_SMALL_TUPLE_EXT => {
                let (arity, pos) = read_u8(buf, tag, pos)?;
                self.decode_tuple(buf, pos, arity as usize, depth)
            }
            TAG_LARGE_TUPLE_EXT => {
                let (arity, pos) = read_u32(buf, tag, pos)?;
                self.decode_tuple(buf, pos, arity as usize, depth)
            }
            TAG_MAP_EXT => self.decode_map(buf, pos, depth),
            TAG_BINARY_EXT => {
                let (len, pos) = read_u32(buf, tag, pos)?;
                let len = len as usize;
                need(buf, tag, pos, len)?;
                Ok((Term::Binary(buf[pos..pos + len].to_vec()), pos + len))
            }
            TAG_BIT_BINARY_EXT => self.decode_bitstring(buf, pos),
            TAG_PID_EXT | TAG_NEW_PID_EXT => {
                let (pid, pos) = self.decode_pid(buf, pos, tag)?;
                Ok((Term::Pid(pid), pos))
            }
            TAG_REF_EXT | TAG_NEW_REF_EXT | TAG_NEWER_REF_EXT => self.decode_ref(buf, pos, tag),
            TAG_NEW_FUN_EXT => self.decode_new_fun(buf, pos, depth),
            TAG_FUN_EXT => self.decode_legacy_fun(buf, pos, depth),
            _ => Err(CodecError::UnknownTag {
                tag,
                offset: pos - 1,
            }),
        }
    }

    fn resolve_atom(&self, name: String) -> Term {
        match &self.config.atom_policy {
            AtomPolicy::Default => Term::Atom(Atom::from(name)),
            AtomPolicy::Strict => Term::StrictAtom(Atom::from(name)),
            AtomPolicy::Custom(resolver) => resolver(&name),
        }
    }

    /// 31 fixed ASCII bytes holding a decimal float literal, NUL padded.
    fn decode_text_float(&self, buf: &[u8], pos: usize) -> CodecResult<(Term, usize)> {
        need(buf, TAG_FLOAT_EXT, pos, 31)?;
        let text = std::str::from_utf8(&buf[pos..pos + 31])
            .map(|s| s.trim_end_matches('\0'))
            .map_err(|_| CodecError::Format {
                detail: format!("float text at offset {} is not ASCII", pos),
            })?;
        let value = text.parse::<f64>().map_err(|_| CodecError::Format {
            detail: format!("unparseable float text {:?} at offset {}", text, pos),
        })?;
        Ok((Term::Float(value), pos + 31))
    }

    fn decode_big(
        &self,
        buf: &[u8],
        pos: usize,
        tag: u8,
        n: usize,
        sign: u8,
    ) -> CodecResult<(Term, usize)> {
        need(buf, tag, pos, n)?;
        let value = BigInt::from_le_digits(sign != 0, &buf[pos..pos + n]);
        // Values in i64 range normalize to the plain integer variant so the
        // decoded term never depends on the wire form that carried it.
        let term = match value.to_i64() {
            Some(small) => Term::Int(small),
            None => Term::BigInt(value),
        };
        Ok((term, pos + n))
    }

    fn decode_tuple(
        &self,
        buf: &[u8],
        mut pos: usize,
        arity: usize,
        depth: usize,
    ) -> CodecResult<(Term, usize)> {
        let mut elements = Vec::with_capacity(capacity_hint(arity, buf, pos));
        for _ in 0..arity {
            let (element, new_pos) = self.decode_term(buf, pos, depth - 1)?;
            elements.push(element);
            pos = new_pos;
        }
        Ok((Term::Tuple(elements), pos))
    }

    fn decode_list(&self, buf: &[u8], pos: usize, depth: usize) -> CodecResult<(Term, usize)> {
        let (len, mut pos) = read_u32(buf, TAG_LIST_EXT, pos)?;
        let len = len as usize;
        let mut elements = Vec::with_capacity(capacity_hint(len, buf, pos));
        for _ in 0..len {
            let (element, new_pos) = self.decode_term(buf, pos, depth - 1)?;
            elements.push(element);
            pos = new_pos;
        }
        // The tail term follows the counted elements: nil closes a proper
        // list, anything else rides along as the improper tail.
        let (tail, pos) = self.decode_term(buf, pos, depth - 1)?;
        let list = if tail.is_nil() {
            List::proper(elements)
        } else {
            List::improper(elements, tail)
        };
        Ok((Term::List(list), pos))
    }

    fn decode_map(&self, buf: &[u8], pos: usize, depth: usize) -> CodecResult<(Term, usize)> {
        let (arity, mut pos) = read_u32(buf, TAG_MAP_EXT, pos)?;
        let arity = arity as usize;
        let mut pairs = Vec::with_capacity(capacity_hint(arity, buf, pos));
        for _ in 0..arity {
            let (key, new_pos) = self.decode_term(buf, pos, depth - 1)?;
            let (value, new_pos) = self.decode_term(buf, new_pos, depth - 1)?;
            pairs.push((key, value));
            pos = new_pos;
        }
        Ok((Term::Map(pairs), pos))
    }

    fn decode_bitstring(&self, buf: &[u8], pos: usize) -> CodecResult<(Term, usize)> {
        let (len, pos) = read_u32(buf, TAG_BIT_BINARY_EXT, pos)?;
        let len = len as usize;
        let (bits, pos) = read_u8(buf, TAG_BIT_BINARY_EXT, pos)?;
        if !(1..=8).contains(&bits) {
            return Err(CodecError::Format {
                detail: format!("bit count {} outside 1..=8 at offset {}", bits, pos - 1),
            });
        }
        need(buf, TAG_BIT_BINARY_EXT, pos, len)?;
        let term = Term::BitString(BitString {
            bytes: buf[pos..pos + len].to_vec(),
            last_byte_bits: bits,
        });
        Ok((term, pos + len))
    }

    /// Node and module names are structural: they bypass the atom policy
    /// and land as plain `Atom` fields.
    fn decode_node_atom(&self, buf: &[u8], pos: usize) -> CodecResult<(Atom, usize)> {
        let tag = match buf.get(pos) {
            Some(&tag) => tag,
            None => {
                return Err(CodecError::Truncated {
                    tag: None,
                    offset: pos,
                    needed: 1,
                    available: 0,
                })
            }
        };
        match tag {
            TAG_ATOM_EXT | TAG_SMALL_ATOM_EXT | TAG_ATOM_UTF8_EXT | TAG_SMALL_ATOM_UTF8_EXT => {
                let (name, new_pos) = decode_atom_name(buf, pos + 1, tag)?;
                Ok((Atom::from(name), new_pos))
            }
            _ => Err(CodecError::Format {
                detail: format!("node name at offset {} must be an atom, found tag {}", pos, tag),
            }),
        }
    }

    fn decode_pid(&self, buf: &[u8], pos: usize, tag: u8) -> CodecResult<(Pid, usize)> {
        let (node, pos) = self.decode_node_atom(buf, pos)?;
        let (id, pos) = read_u32(buf, tag, pos)?;
        let (serial, pos) = read_u32(buf, tag, pos)?;
        let (creation, pos) = if tag == TAG_PID_EXT {
            let (creation, pos) = read_u8(buf, tag, pos)?;
            (creation as u32, pos)
        } else {
            read_u32(buf, tag, pos)?
        };
        Ok((
            Pid {
                node,
                id,
                serial,
                creation,
            },
            pos,
        ))
    }

    fn decode_ref(&self, buf: &[u8], pos: usize, tag: u8) -> CodecResult<(Term, usize)> {
        if tag == TAG_REF_EXT {
            // Legacy form: node, one id word, 1-byte creation
            let (node, pos) = self.decode_node_atom(buf, pos)?;
            let (id, pos) = read_u32(buf, tag, pos)?;
            let (creation, pos) = read_u8(buf, tag, pos)?;
            let reference = Reference {
                node,
                creation: creation as u32,
                ids: vec![id],
            };
            return Ok((Term::Reference(reference), pos));
        }

        let (len, pos) = read_u16(buf, tag, pos)?;
        let len = len as usize;
        if !(1..=3).contains(&len) {
            return Err(CodecError::Format {
                detail: format!("reference id count {} outside 1..=3", len),
            });
        }
        let (node, pos) = self.decode_node_atom(buf, pos)?;
        let (creation, mut pos) = if tag == TAG_NEW_REF_EXT {
            let (creation, pos) = read_u8(buf, tag, pos)?;
            (creation as u32, pos)
        } else {
            read_u32(buf, tag, pos)?
        };
        let mut ids = Vec::with_capacity(len);
        for _ in 0..len {
            let (id, new_pos) = read_u32(buf, tag, pos)?;
            ids.push(id);
            pos = new_pos;
        }
        Ok((
            Term::Reference(Reference {
                node,
                creation,
                ids,
            }),
            pos,
        ))
    }

    /// Decode a term that must be an integer (the legacy index/uniq slots
    /// of fun terms are term-encoded integers on the wire).
    fn decode_int_term(&self, buf: &[u8], pos: usize, depth: usize) -> CodecResult<(i64, usize)> {
        let (term, new_pos) = self.decode_term(buf, pos, depth - 1)?;
        match term {
            Term::Int(value) => Ok((value, new_pos)),
            _ => Err(CodecError::Format {
                detail: format!("expected an integer term at offset {}", pos),
            }),
        }
    }

    fn decode_pid_term(&self, buf: &[u8], pos: usize) -> CodecResult<(Pid, usize)> {
        let tag = match buf.get(pos) {
            Some(&tag) => tag,
            None => {
                return Err(CodecError::Truncated {
                    tag: None,
                    offset: pos,
                    needed: 1,
                    available: 0,
                })
            }
        };
        match tag {
            TAG_PID_EXT | TAG_NEW_PID_EXT => self.decode_pid(buf, pos + 1, tag),
            _ => Err(CodecError::Format {
                detail: format!("expected a pid at offset {}, found tag {}", pos, tag),
            }),
        }
    }

    fn decode_new_fun(&self, buf: &[u8], pos: usize, depth: usize) -> CodecResult<(Term, usize)> {
        let tag = TAG_NEW_FUN_EXT;
        // Size is redundant with the parsed fields and is not trusted
        let (_size, pos) = read_u32(buf, tag, pos)?;
        let (arity, pos) = read_u8(buf, tag, pos)?;
        need(buf, tag, pos, 16)?;
        let mut uniq = [0u8; 16];
        uniq.copy_from_slice(&buf[pos..pos + 16]);
        let pos = pos + 16;
        let (index, pos) = read_u32(buf, tag, pos)?;
        let (num_free, pos) = read_u32(buf, tag, pos)?;
        let (module, pos) = self.decode_node_atom(buf, pos)?;
        let (old_index, pos) = self.decode_int_term(buf, pos, depth)?;
        let (old_uniq, pos) = self.decode_int_term(buf, pos, depth)?;
        let (pid, mut pos) = self.decode_pid_term(buf, pos)?;

        let num_free = num_free as usize;
        let mut free = Vec::with_capacity(capacity_hint(num_free, buf, pos));
        for _ in 0..num_free {
            let (var, new_pos) = self.decode_term(buf, pos, depth - 1)?;
            free.push(var);
            pos = new_pos;
        }

        let fun = Fun {
            module,
            arity,
            uniq,
            index,
            old_index,
            old_uniq,
            pid,
            free,
        };
        Ok((Term::Fun(Box::new(fun)), pos))
    }

    fn decode_legacy_fun(&self, buf: &[u8], pos: usize, depth: usize) -> CodecResult<(Term, usize)> {
        let (num_free, pos) = read_u32(buf, TAG_FUN_EXT, pos)?;
        let (pid, pos) = self.decode_pid_term(buf, pos)?;
        let (module, pos) = self.decode_node_atom(buf, pos)?;
        let (old_index, pos) = self.decode_int_term(buf, pos, depth)?;
        let (old_uniq, mut pos) = self.decode_int_term(buf, pos, depth)?;

        let num_free = num_free as usize;
        let mut free = Vec::with_capacity(capacity_hint(num_free, buf, pos));
        for _ in 0..num_free {
            let (var, new_pos) = self.decode_term(buf, pos, depth - 1)?;
            free.push(var);
            pos = new_pos;
        }

        // Fields the legacy form does not carry normalize to zero
        let fun = Fun {
            module,
            arity: 0,
            uniq: [0u8; 16],
            index: 0,
            old_index,
            old_uniq,
            pid,
            free,
        };
        Ok((Term::Fun(Box::new(fun)), pos))
    }
}
