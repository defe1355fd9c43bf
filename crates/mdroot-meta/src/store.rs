//! Per-document root hint cache.
//!
//! Entries expire after a TTL and are dropped on [`FrontMatterStore::invalidate`].
//! An entry whose stored content no longer matches the text being resolved
//! is treated as invalidated as well, so a missed change notification cannot
//! serve a stale hint.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use serde_yaml::Value;

use crate::RootHint;
use crate::front_matter;
use crate::parser::{FrontMatterParser, YamlFrontMatterParser};

/// Front matter key read by default.
pub const DEFAULT_ROOT_KEY: &str = "typora-root-url";

/// Default entry lifetime.
pub const DEFAULT_TTL: Duration = Duration::from_millis(30_000);

#[derive(Debug)]
struct CacheEntry {
    root_hint: Option<RootHint>,
    content: String,
    created_at: Instant,
}

impl CacheEntry {
    fn is_live(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() < ttl
    }

    fn is_fresh(&self, content: &str, ttl: Duration) -> bool {
        self.is_live(ttl) && self.content == content
    }
}

/// Resolves and caches the root hint declared in each document's front matter.
pub struct FrontMatterStore {
    parser: Box<dyn FrontMatterParser>,
    root_key: String,
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl FrontMatterStore {
    /// Create a store backed by the YAML parser with default key and TTL.
    #[must_use]
    pub fn new() -> Self {
        Self::with_parser(YamlFrontMatterParser)
    }

    /// Create a store backed by a custom parser.
    #[must_use]
    pub fn with_parser(parser: impl FrontMatterParser + 'static) -> Self {
        Self {
            parser: Box::new(parser),
            root_key: DEFAULT_ROOT_KEY.to_owned(),
            ttl: DEFAULT_TTL,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Set the entry lifetime.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the front matter key holding the root hint.
    #[must_use]
    pub fn with_root_key(mut self, key: impl Into<String>) -> Self {
        self.root_key = key.into();
        self
    }

    /// Entry lifetime.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Resolve the root hint for a document.
    ///
    /// Returns the cached result while the entry is fresh. Otherwise the
    /// front matter is parsed again and the result, including the absence of
    /// a hint, is cached. Parse failures yield `None`.
    pub fn resolve_root_hint(&self, document_id: &str, content: &str) -> Option<RootHint> {
        {
            let entries = self.entries();
            if let Some(entry) = entries.get(document_id)
                && entry.is_fresh(content, self.ttl)
            {
                tracing::debug!(document = %document_id, "Root hint cache hit");
                return entry.root_hint.clone();
            }
        }

        tracing::debug!(document = %document_id, "Root hint cache miss");
        let root_hint = self.read_root_hint(document_id, content);

        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|_, entry| entry.is_live(self.ttl));
        if entries.len() < before {
            tracing::debug!(pruned = before - entries.len(), "Pruned expired root hints");
        }
        entries.insert(
            document_id.to_owned(),
            CacheEntry {
                root_hint: root_hint.clone(),
                content: content.to_owned(),
                created_at: Instant::now(),
            },
        );
        root_hint
    }

    /// Entries survive a panic in another holder of the lock; each
    /// operation leaves the map consistent.
    fn entries(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_root_hint(&self, document_id: &str, content: &str) -> Option<RootHint> {
        let fm = front_matter::extract(content)?;
        let map = match self.parser.parse(fm.body) {
            Ok(map) => map,
            Err(e) => {
                tracing::debug!(document = %document_id, error = %e, "Ignoring unparsable front matter");
                return None;
            }
        };
        match map.get(&self.root_key) {
            Some(Value::String(hint)) if !hint.trim().is_empty() => {
                Some(RootHint::new(hint.trim()))
            }
            _ => None,
        }
    }

    /// Drop the entry for one document.
    pub fn invalidate(&self, document_id: &str) {
        if self.entries().remove(document_id).is_some() {
            tracing::debug!(document = %document_id, "Invalidated root hint");
        }
    }

    /// Drop all entries.
    pub fn clear(&self) {
        self.entries().clear();
    }

    /// Number of cached entries. Expired entries are pruned on the next
    /// insert.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Check whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for FrontMatterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FrontMatterStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrontMatterStore")
            .field("root_key", &self.root_key)
            .field("ttl", &self.ttl)
            .field("entries", &self.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::parser::{FrontMatterError, FrontMatterMap};
    use pretty_assertions::assert_eq;

    /// Delegates to the YAML parser and counts invocations.
    #[derive(Clone, Default)]
    struct CountingParser {
        calls: Arc<AtomicUsize>,
    }

    impl CountingParser {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl FrontMatterParser for CountingParser {
        fn parse(&self, body: &str) -> Result<FrontMatterMap, FrontMatterError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            YamlFrontMatterParser.parse(body)
        }
    }

    const DOC: &str = "---\ntypora-root-url: ./assets\n---\n![a](x.png)\n";

    #[test]
    fn test_resolves_hint() {
        let store = FrontMatterStore::new();
        let hint = store.resolve_root_hint("doc.md", DOC).unwrap();
        assert_eq!(hint.as_str(), "./assets");
    }

    #[test]
    fn test_parses_once_within_ttl() {
        let parser = CountingParser::default();
        let store = FrontMatterStore::with_parser(parser.clone());

        let first = store.resolve_root_hint("doc.md", DOC);
        for _ in 0..5 {
            assert_eq!(store.resolve_root_hint("doc.md", DOC), first);
        }
        assert_eq!(parser.calls(), 1);
    }

    #[test]
    fn test_absent_hint_is_cached() {
        let parser = CountingParser::default();
        let store = FrontMatterStore::with_parser(parser.clone());
        let doc = "---\ntitle: No hint\n---\n";

        assert!(store.resolve_root_hint("a", doc).is_none());
        assert!(store.resolve_root_hint("a", doc).is_none());
        assert_eq!(parser.calls(), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_invalidate_forces_reparse() {
        let parser = CountingParser::default();
        let store = FrontMatterStore::with_parser(parser.clone());

        store.resolve_root_hint("doc.md", DOC);
        store.invalidate("doc.md");
        assert!(store.is_empty());
        store.resolve_root_hint("doc.md", DOC);
        assert_eq!(parser.calls(), 2);
    }

    #[test]
    fn test_invalidate_only_touches_one_document() {
        let store = FrontMatterStore::new();
        store.resolve_root_hint("a", DOC);
        store.resolve_root_hint("b", DOC);
        store.invalidate("a");
        assert_eq!(store.len(), 1);
        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_expired_entry_reparsed() {
        let parser = CountingParser::default();
        let store = FrontMatterStore::with_parser(parser.clone()).with_ttl(Duration::ZERO);

        store.resolve_root_hint("doc.md", DOC);
        store.resolve_root_hint("doc.md", DOC);
        assert_eq!(parser.calls(), 2);
    }

    #[test]
    fn test_changed_content_not_served_stale() {
        let store = FrontMatterStore::new();
        assert_eq!(
            store.resolve_root_hint("doc.md", DOC).unwrap().as_str(),
            "./assets"
        );
        let edited = "---\ntypora-root-url: /shared\n---\n";
        assert_eq!(
            store.resolve_root_hint("doc.md", edited).unwrap().as_str(),
            "/shared"
        );
    }

    #[test]
    fn test_fail_open() {
        let store = FrontMatterStore::new();
        assert!(store.resolve_root_hint("a", "---\n: [bad\n---\n").is_none());
        assert!(store.resolve_root_hint("b", "no front matter").is_none());
        assert!(store.resolve_root_hint("c", "---\ntypora-root-url: 42\n---\n").is_none());
        assert!(store.resolve_root_hint("d", "---\ntypora-root-url: \"\"\n---\n").is_none());
    }

    #[test]
    fn test_no_front_matter_skips_parser() {
        let parser = CountingParser::default();
        let store = FrontMatterStore::with_parser(parser.clone());
        assert!(store.resolve_root_hint("a", "# Title").is_none());
        assert_eq!(parser.calls(), 0);
    }

    #[test]
    fn test_custom_root_key() {
        let store = FrontMatterStore::new().with_root_key("image-root");
        let doc = "---\nimage-root: media\ntypora-root-url: ./assets\n---\n";
        assert_eq!(store.resolve_root_hint("a", doc).unwrap().as_str(), "media");
    }

    #[test]
    fn test_expired_entries_pruned_on_insert() {
        let store = FrontMatterStore::new().with_ttl(Duration::ZERO);
        store.resolve_root_hint("a", DOC);
        store.resolve_root_hint("b", DOC);
        store.resolve_root_hint("c", DOC);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_live_entries_kept_on_insert() {
        let store = FrontMatterStore::new();
        store.resolve_root_hint("a", DOC);
        store.resolve_root_hint("b", DOC);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_recovers_from_poisoned_lock() {
        let store = Arc::new(FrontMatterStore::new());
        let holder = Arc::clone(&store);
        let result = std::thread::spawn(move || {
            let _guard = holder.entries.lock().unwrap();
            panic!("panic while holding the cache lock");
        })
        .join();
        assert!(result.is_err());
        assert!(store.entries.is_poisoned());

        assert_eq!(
            store.resolve_root_hint("doc.md", DOC).map(|h| h.as_str().to_owned()),
            Some("./assets".to_owned())
        );
        store.invalidate("doc.md");
        assert!(store.is_empty());
    }
}
