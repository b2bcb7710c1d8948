//! Fuzzy file resolution for `photojobs-resolver`.
//!
//! [`Resolver::resolve`] maps a nominal filename (extension possibly wrong,
//! file possibly already renamed) to every plausible file under a root. Rules
//! are tried in a fixed order and the first one that yields anything wins:
//!
//! 1. [`StemRule`] — exact stem, or stem followed by `_…`
//! 2. [`CameraTailRule`] — camera number tail inside a renamed file
//! 3. [`PersonPrefixRule`] — every shot under the person prefix
//!
//! Each rule is tried first in the intended directory (the nominal's own
//! parent when it exists, non-recursive) and only then across the whole root.
//! An empty result is a normal outcome, never an error.

mod index;
pub mod rules;

use std::path::{Path, PathBuf};

use photojobs_core::PersonHint;
use thiserror::Error;

pub use index::{list_dir, FileIndex};
pub use rules::{
    default_rules, CameraTailRule, MatchRule, Nominal, PersonPrefixRule, RuleKind, StemRule,
};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Where a match was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// The nominal's own directory, non-recursive.
    IntendedDir,
    /// Anywhere under the root.
    Root,
}

/// A successful resolution: the candidates and how they were found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Lexically ordered, never empty.
    pub paths: Vec<PathBuf>,
    pub rule: RuleKind,
    pub scope: Scope,
}

impl Resolution {
    /// Lexically first candidate; the tie-break used when one file is needed.
    pub fn first(&self) -> &Path {
        &self.paths[0]
    }

    pub fn is_ambiguous(&self) -> bool {
        self.paths.len() > 1
    }
}

/// Errors from building a resolver.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("search root not found or not a directory: {path}")]
    RootNotFound { path: PathBuf },
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Cascade over one indexed root.
pub struct Resolver {
    index: FileIndex,
    rules: Vec<Box<dyn MatchRule>>,
}

impl Resolver {
    /// Index `root` and use the default rule order.
    pub fn new(root: &Path) -> Result<Self, ResolveError> {
        Ok(Self::with_rules(FileIndex::scan(root)?, default_rules()))
    }

    pub fn with_rules(index: FileIndex, rules: Vec<Box<dyn MatchRule>>) -> Self {
        Self { index, rules }
    }

    pub fn root(&self) -> &Path {
        self.index.root()
    }

    pub fn index(&self) -> &FileIndex {
        &self.index
    }

    /// Run the cascade for `nominal`.
    pub fn resolve(&self, nominal: &str, hint: Option<&PersonHint>) -> Option<Resolution> {
        let nominal = Nominal::new(nominal, hint.cloned())?;
        let intended = self.intended_dir(&nominal.raw);
        let narrow = match list_dir(&intended) {
            Ok(files) => files,
            Err(err) => {
                tracing::warn!("{err}");
                Vec::new()
            }
        };

        for rule in &self.rules {
            if let Some(paths) = rule.try_match(&nominal, &narrow) {
                tracing::debug!(
                    "'{}' -> {} file(s) via {} rule in {}",
                    nominal.raw,
                    paths.len(),
                    rule.kind(),
                    intended.display()
                );
                return Some(Resolution {
                    paths,
                    rule: rule.kind(),
                    scope: Scope::IntendedDir,
                });
            }
            if let Some(paths) = rule.try_match(&nominal, self.index.files()) {
                tracing::debug!(
                    "'{}' -> {} file(s) via {} rule under {}",
                    nominal.raw,
                    paths.len(),
                    rule.kind(),
                    self.index.root().display()
                );
                return Some(Resolution {
                    paths,
                    rule: rule.kind(),
                    scope: Scope::Root,
                });
            }
        }

        tracing::debug!("'{}' -> no match", nominal.raw);
        None
    }

    /// Candidate paths only; empty when nothing matched.
    pub fn locate(&self, nominal: &str, hint: Option<&PersonHint>) -> Vec<PathBuf> {
        self.resolve(nominal, hint)
            .map(|r| r.paths)
            .unwrap_or_default()
    }

    /// The nominal's parent (relative references are taken from the root)
    /// when that directory exists, otherwise the root itself.
    fn intended_dir(&self, raw: &str) -> PathBuf {
        let raw = Path::new(raw);
        let full = if raw.is_absolute() {
            raw.to_path_buf()
        } else {
            self.index.root().join(raw)
        };
        match full.parent() {
            Some(parent) if parent.is_dir() => parent.to_path_buf(),
            _ => self.index.root().to_path_buf(),
        }
    }
}

/// One-shot [`Resolver::locate`] that indexes `search_root` first.
pub fn locate(
    nominal: &str,
    search_root: &Path,
    hint: Option<&PersonHint>,
) -> Result<Vec<PathBuf>, ResolveError> {
    Ok(Resolver::new(search_root)?.locate(nominal, hint))
}
