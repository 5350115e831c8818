//! Node-Scoped Identifier Terms
//!
//! Provides the process identifier, reference and function-closure values.
//! Each wire sub-tag family (legacy and modern) normalizes into the single
//! shape defined here, with narrow creation counters widened to 32 bits.

use crate::atom::Atom;
use crate::term::Term;

/// A process identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pid {
    pub node: Atom,
    pub id: u32,
    pub serial: u32,
    pub creation: u32,
}

impl Pid {
    pub fn new(node: impl Into<Atom>, id: u32, serial: u32, creation: u32) -> Self {
        Self {
            node: node.into(),
            id,
            serial,
            creation,
        }
    }
}

/// A reference.
///
/// `ids` holds 1 to 3 id words; the legacy single-word wire form decodes to
/// a one-element sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    pub node: Atom,
    pub creation: u32,
    pub ids: Vec<u32>,
}

impl Reference {
    pub fn new(node: impl Into<Atom>, creation: u32, ids: Vec<u32>) -> Self {
        Self {
            node: node.into(),
            creation,
            ids,
        }
    }
}

/// A function closure.
///
/// Carries every field needed to reconstruct the wire form. Fields absent
/// from the legacy sub-tag default to zero (arity, index, uniq) so that both
/// sub-tags normalize to this one shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Fun {
    pub module: Atom,
    pub arity: u8,
    pub uniq: [u8; 16],
    pub index: u32,
    pub old_index: i64,
    pub old_uniq: i64,
    pub pid: Pid,
    pub free: Vec<Term>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pid_equality() {
        let a = Pid::new("node@host", 1, 2, 3);
        let b = Pid::new(Atom::new("node@host"), 1, 2, 3);
        assert_eq!(a, b);
        assert_ne!(a, Pid::new("node@host", 1, 2, 4));
    }

    #[test]
    fn test_reference_id_words() {
        let r = Reference::new("node@host", 1, vec![314, 2, 0]);
        assert_eq!(r.ids.len(), 3);
        assert_ne!(r, Reference::new("node@host", 1, vec![314]));
    }

    #[test]
    fn test_fun_defaults_compare() {
        let pid = Pid::new("nonode@nohost", 58, 0, 0);
        let f = Fun {
            module: Atom::new("test1"),
            arity: 0,
            uniq: [0; 16],
            index: 0,
            old_index: 0,
            old_uniq: 0,
            pid: pid.clone(),
            free: vec![Term::Int(123)],
        };
        let mut g = f.clone();
        assert_eq!(f, g);
        g.free.clear();
        assert_ne!(f, g);
    }
}
