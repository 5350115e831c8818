//! Term Module
//!
//! Provides the closed `Term` union that decoding produces and encoding
//! consumes, together with the `List` and `BitString` aggregate payloads.
//!
//! The wire format is a tree, so a `Term` is a tree: ownership runs strictly
//! parent to child and no back-references exist. Equality is value-based and
//! form-independent: every wire form of the same logical value decodes to
//! the same `Term`.

use crate::atom::Atom;
use crate::big::BigInt;
use crate::node::{Fun, Pid, Reference};

/// An ordered sequence of terms with an optional improper tail.
///
/// `tail: None` is a proper list (nil-terminated on the wire); `Some(term)`
/// is an improper list whose final cons cell holds `term`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct List {
    pub elements: Vec<Term>,
    pub tail: Option<Box<Term>>,
}

impl List {
    /// The empty proper list.
    pub fn nil() -> Self {
        Self::default()
    }

    pub fn proper(elements: Vec<Term>) -> Self {
        Self {
            elements,
            tail: None,
        }
    }

    pub fn improper(elements: Vec<Term>, tail: Term) -> Self {
        Self {
            elements,
            tail: Some(Box::new(tail)),
        }
    }

    pub fn is_proper(&self) -> bool {
        self.tail.is_none()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty() && self.tail.is_none()
    }
}

/// A byte sequence whose logical length may end mid-byte.
///
/// `last_byte_bits` counts the used bits of the final byte and must be in
/// 1..=8 for the value to be encodable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BitString {
    pub bytes: Vec<u8>,
    pub last_byte_bits: u8,
}

/// Any decodable value.
///
/// Integers are canonical across the small and large wire forms: values in
/// i64 range are always `Int`, everything else is always `BigInt`.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    Int(i64),
    BigInt(BigInt),
    Float(f64),
    /// Atom decoded under the default resolution policy.
    Atom(Atom),
    /// Atom decoded under the strict resolution policy. Same spelling as a
    /// default atom, distinguishable by variant.
    StrictAtom(Atom),
    Tuple(Vec<Term>),
    List(List),
    /// Key/value pairs in wire order. Duplicate keys from a malformed
    /// stream are preserved as-is.
    Map(Vec<(Term, Term)>),
    Binary(Vec<u8>),
    BitString(BitString),
    Pid(Pid),
    Reference(Reference),
    Fun(Box<Fun>),
}

impl Term {
    /// The empty proper list.
    pub fn nil() -> Self {
        Term::List(List::nil())
    }

    pub fn atom(name: impl Into<Atom>) -> Self {
        Term::Atom(name.into())
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Term::List(list) if list.is_empty())
    }
}

impl From<i64> for Term {
    fn from(value: i64) -> Self {
        Term::Int(value)
    }
}

impl From<f64> for Term {
    fn from(value: f64) -> Self {
        Term::Float(value)
    }
}

impl From<Atom> for Term {
    fn from(value: Atom) -> Self {
        Term::Atom(value)
    }
}
