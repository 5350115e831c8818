//! Entities Layer: Term Values
//!
//! Provides the in-memory value types that the external term format codec
//! produces and consumes. This layer knows nothing about wire bytes; it only
//! defines the closed `Term` union and its leaf value types.
//!
//! ## Modules
//!
//! - **[`term`](term/index.html)**: the `Term` union plus the `List` and
//!   `BitString` aggregate payloads
//! - **[`atom`](atom/index.html)**: the `Atom` value type with
//!   spelling-based string equality
//! - **[`big`](big/index.html)**: arbitrary-precision integers backed by
//!   `malachite::Integer`
//! - **[`node`](node/index.html)**: node-scoped identifier terms
//!   (`Pid`, `Reference`, `Fun`)

pub mod atom;
pub mod big;
pub mod node;
pub mod term;

pub use atom::{Atom, MAX_ATOM_BYTES};
pub use big::BigInt;
pub use node::{Fun, Pid, Reference};
pub use term::{BitString, List, Term};
