//! Codec Configuration Module
//!
//! Provides the read-only configuration consumed by the decode and encode
//! entry points. A configuration value is immutable during a call and safe
//! to share across threads; the callable options are held behind `Arc` so
//! cloning a configuration is cheap.

use std::fmt;
use std::sync::Arc;

use entities_terms::Term;

/// Caller-supplied atom resolver: decoded atom name in, application term out.
pub type AtomResolver = Arc<dyn Fn(&str) -> Term + Send + Sync>;

/// Caller-supplied encode hook, tried for any value the built-in encoder
/// rules reject. Returning `Some` substitutes the replacement term;
/// returning `None` lets the rejection stand.
pub type EncodeHook = Arc<dyn Fn(&Term) -> Option<Term> + Send + Sync>;

/// How decoded atoms surface to the application.
#[derive(Clone, Default)]
pub enum AtomPolicy {
    /// Atoms decode to `Term::Atom`.
    #[default]
    Default,
    /// Atoms decode to `Term::StrictAtom`, keeping atom-origin values
    /// distinguishable from every other variant of the same spelling.
    Strict,
    /// Atoms decode to whatever the resolver returns. Round-tripping the
    /// resolved values back to atoms is the caller's job, via the encode
    /// hook.
    Custom(AtomResolver),
}

impl fmt::Debug for AtomPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AtomPolicy::Default => f.write_str("Default"),
            AtomPolicy::Strict => f.write_str("Strict"),
            AtomPolicy::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Encode-side compression kicks in at this body size unless overridden.
pub const DEFAULT_COMPRESS_THRESHOLD: usize = 64;

/// Default limit on term nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Options recognized by the codec entry points.
#[derive(Clone)]
pub struct CodecConfig {
    pub atom_policy: AtomPolicy,
    /// Compress the encoded body when it reaches `compress_threshold`.
    pub compress: bool,
    pub compress_threshold: usize,
    /// Encode proper lists of byte-range integers in the compact string
    /// form. Off by default: the compact form is lossy about the original
    /// integer type.
    pub compact_strings: bool,
    /// Maximum nesting depth walked before `DepthExceeded` is returned.
    pub max_depth: usize,
    pub encode_hook: Option<EncodeHook>,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            atom_policy: AtomPolicy::Default,
            compress: false,
            compress_threshold: DEFAULT_COMPRESS_THRESHOLD,
            compact_strings: false,
            max_depth: DEFAULT_MAX_DEPTH,
            encode_hook: None,
        }
    }
}

impl fmt::Debug for CodecConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecConfig")
            .field("atom_policy", &self.atom_policy)
            .field("compress", &self.compress)
            .field("compress_threshold", &self.compress_threshold)
            .field("compact_strings", &self.compact_strings)
            .field("max_depth", &self.max_depth)
            .field(
                "encode_hook",
                if self.encode_hook.is_some() {
                    &"Some(..)"
                } else {
                    &"None"
                },
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CodecConfig::default();
        assert!(!config.compress);
        assert!(!config.compact_strings);
        assert_eq!(config.compress_threshold, DEFAULT_COMPRESS_THRESHOLD);
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        assert!(config.encode_hook.is_none());
        assert!(matches!(config.atom_policy, AtomPolicy::Default));
    }

    #[test]
    fn test_config_clone_shares_callables() {
        let config = CodecConfig {
            atom_policy: AtomPolicy::Custom(Arc::new(|name| Term::Binary(name.as_bytes().to_vec()))),
            encode_hook: Some(Arc::new(|_| None)),
            ..CodecConfig::default()
        };
        let cloned = config.clone();
        assert!(matches!(cloned.atom_policy, AtomPolicy::Custom(_)));
        assert!(cloned.encode_hook.is_some());
    }

    #[test]
    fn test_debug_output_hides_callables() {
        let config = CodecConfig {
            atom_policy: AtomPolicy::Custom(Arc::new(|name| Term::atom(name))),
            ..CodecConfig::default()
        };
        let rendered = format!("{:?}", config);
        assert!(rendered.contains("Custom(..)"));
        assert!(rendered.contains("max_depth"));
    }
}
