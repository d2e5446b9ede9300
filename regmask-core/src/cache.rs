//! cache.rs - Thread-safe, compile-once cache of named patterns.
//!
//! Each key moves through at most one transition: from "not yet attempted"
//! (no entry) to either `Compiled` or `Failed`. Hits are served under a shared
//! read lock. A miss on a registered key takes the write lock for the whole
//! check-compile-install sequence, so a key is compiled at most once per
//! cache no matter how many threads miss on it at the same time.
//!
//! Keys the registry does not know are answered from the registry without
//! touching the write lock and are never recorded, so the map is bounded by
//! the size of the registry.
//!
//! License: MIT OR APACHE 2.0

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use log::{debug, warn};

use crate::compiler::{CompiledPattern, PatternCompiler, RegexCompiler};
use crate::errors::MaskError;
use crate::registry::PatternRegistry;

#[derive(Debug)]
enum CacheEntry {
    Compiled(Arc<CompiledPattern>),
    Failed(MaskError),
}

impl CacheEntry {
    fn compiled(&self) -> Option<Arc<CompiledPattern>> {
        match self {
            CacheEntry::Compiled(pattern) => Some(Arc::clone(pattern)),
            CacheEntry::Failed(_) => None,
        }
    }

    fn to_result(&self) -> Result<Arc<CompiledPattern>, MaskError> {
        match self {
            CacheEntry::Compiled(pattern) => Ok(Arc::clone(pattern)),
            CacheEntry::Failed(err) => Err(err.clone()),
        }
    }
}

/// Counts of settled entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub compiled: usize,
    pub failed: usize,
}

/// Lazily compiles patterns from a `PatternRegistry` and keeps them for the
/// lifetime of the cache.
#[derive(Debug)]
pub struct CompiledPatternCache<C: PatternCompiler = RegexCompiler> {
    registry: Arc<PatternRegistry>,
    compiler: C,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl CompiledPatternCache<RegexCompiler> {
    pub fn new(registry: Arc<PatternRegistry>) -> Self {
        Self::with_compiler(registry, RegexCompiler)
    }
}

impl<C: PatternCompiler> CompiledPatternCache<C> {
    pub fn with_compiler(registry: Arc<PatternRegistry>, compiler: C) -> Self {
        Self {
            registry,
            compiler,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn registry(&self) -> &PatternRegistry {
        &self.registry
    }

    pub fn compiler(&self) -> &C {
        &self.compiler
    }

    /// Returns the compiled pattern for `key`, or `None` when the key is
    /// unknown or its source failed to compile.
    pub fn get(&self, key: &str) -> Option<Arc<CompiledPattern>> {
        self.with_entry(key, CacheEntry::compiled).ok().flatten()
    }

    /// Like [`get`](Self::get), but reports why no pattern is available.
    pub fn resolve(&self, key: &str) -> Result<Arc<CompiledPattern>, MaskError> {
        self.with_entry(key, CacheEntry::to_result).and_then(|result| result)
    }

    /// Settles `key` and applies `read` to its entry. Fails only for keys the
    /// registry does not know.
    fn with_entry<R>(&self, key: &str, read: impl FnOnce(&CacheEntry) -> R) -> Result<R, MaskError> {
        // Entries are only ever replaced whole under the write guard, so a
        // poisoned lock still holds a consistent map.
        {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(entry) = entries.get(key) {
                return Ok(read(entry));
            }
        }

        // The registry is immutable, so unknown keys never need the write lock.
        let Some(source) = self.registry.lookup(key) else {
            return Err(MaskError::UnknownPattern(key.to_string()));
        };

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);

        // Another thread may have settled the key between the two guards.
        if let Some(entry) = entries.get(key) {
            return Ok(read(entry));
        }

        debug!("Pattern '{}' not cached. Compiling now.", key);
        let entry = match self.compiler.compile(key, source) {
            Ok(pattern) => CacheEntry::Compiled(Arc::new(pattern)),
            Err(err) => {
                warn!("Pattern '{}' disabled for the lifetime of this cache: {}", key, err);
                CacheEntry::Failed(err)
            }
        };

        let result = read(&entry);
        entries.insert(key.to_string(), entry);
        Ok(result)
    }

    pub fn stats(&self) -> CacheStats {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.values().fold(CacheStats::default(), |mut stats, entry| {
            match entry {
                CacheEntry::Compiled(_) => stats.compiled += 1,
                CacheEntry::Failed(_) => stats.failed += 1,
            }
            stats
        })
    }
}
