use serde::Serialize;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::domain::{BookRecord, CatalogMatch};
use crate::pipeline::processing::catalog::CatalogMatcher;

/// Append-only catalog matches keyed by book title.
///
/// Writers copy-on-write a fresh map, so a snapshot handed out earlier never
/// changes underneath its reader. Entries are never replaced or removed.
#[derive(Clone, Default)]
pub struct EnrichmentStore {
    inner: Arc<RwLock<Arc<HashMap<String, CatalogMatch>>>>,
}

impl EnrichmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` (and keeps the existing entry) if the title is already enriched.
    pub fn insert(&self, title: &str, catalog: CatalogMatch) -> bool {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if guard.contains_key(title) {
            return false;
        }
        Arc::make_mut(&mut *guard).insert(title.to_string(), catalog);
        true
    }

    pub fn snapshot(&self) -> EnrichmentSnapshot {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        EnrichmentSnapshot(Arc::clone(&guard))
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A consistent read-only view of the store at one point in time.
#[derive(Clone, Debug, Default)]
pub struct EnrichmentSnapshot(Arc<HashMap<String, CatalogMatch>>);

impl EnrichmentSnapshot {
    pub fn get(&self, title: &str) -> Option<&CatalogMatch> {
        self.0.get(title)
    }

    pub fn contains(&self, title: &str) -> bool {
        self.0.contains_key(title)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Result of one lookup, emitted as soon as it resolves.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichmentUpdate {
    pub title: String,
    pub catalog: Option<CatalogMatch>,
}

/// Bounded-concurrency catalog lookup queue.
///
/// `concurrency` workers pull jobs in feed order; with the default of one,
/// lookups run strictly one after another.
pub struct EnrichmentQueue {
    matcher: Arc<CatalogMatcher>,
    store: EnrichmentStore,
    concurrency: usize,
}

impl EnrichmentQueue {
    pub fn new(matcher: Arc<CatalogMatcher>, store: EnrichmentStore, concurrency: usize) -> Self {
        Self {
            matcher,
            store,
            concurrency: concurrency.max(1),
        }
    }

    pub fn store(&self) -> &EnrichmentStore {
        &self.store
    }

    /// Queue one lookup per distinct, not-yet-enriched title and start the workers.
    pub fn start(&self, books: &[BookRecord]) -> EnrichmentHandle {
        let already = self.store.snapshot();
        let mut seen = HashSet::new();
        let jobs: VecDeque<BookRecord> = books
            .iter()
            .filter(|b| seen.insert(b.title.as_str()))
            .filter(|b| !already.contains(&b.title))
            .cloned()
            .collect();

        let total = jobs.len();
        let worker_count = self.concurrency.min(total);
        info!("Queued {} catalog lookups across {} worker(s)", total, worker_count);

        let jobs = Arc::new(Mutex::new(jobs));
        let cancelled = Arc::new(RwLock::new(false));
        let (tx, rx) = mpsc::unbounded_channel();
        let mut workers = JoinSet::new();

        for worker_id in 0..worker_count {
            let jobs = Arc::clone(&jobs);
            let matcher = Arc::clone(&self.matcher);
            let store = self.store.clone();
            let tx = tx.clone();
            let cancelled = Arc::clone(&cancelled);

            workers.spawn(async move {
                loop {
                    let next = jobs.lock().unwrap_or_else(PoisonError::into_inner).pop_front();
                    let Some(book) = next else { break };

                    let catalog = matcher.match_book(&book).await;

                    // Held across the write so cancel() cannot return mid-insert
                    let gate = cancelled.read().unwrap_or_else(PoisonError::into_inner);
                    if *gate {
                        debug!(worker_id, title = %book.title, "lookup resolved after cancel");
                        break;
                    }
                    if let Some(found) = &catalog {
                        store.insert(&book.title, found.clone());
                    }
                    let matched = catalog.is_some();
                    debug!(worker_id, title = %book.title, matched, "lookup resolved");

                    // Receiver gone just means nobody is listening for progress
                    let _ = tx.send(EnrichmentUpdate { title: book.title, catalog });
                }
            });
        }

        EnrichmentHandle { workers, updates: rx, total, cancelled }
    }
}

/// Running enrichment. Dropping or cancelling it aborts queued and in-flight lookups,
/// and no lookup touches the store once that has happened.
pub struct EnrichmentHandle {
    workers: JoinSet<()>,
    updates: mpsc::UnboundedReceiver<EnrichmentUpdate>,
    total: usize,
    cancelled: Arc<RwLock<bool>>,
}

impl EnrichmentHandle {
    /// Number of lookups queued when the run started.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Next resolved lookup; `None` once every job has been processed.
    pub async fn next_update(&mut self) -> Option<EnrichmentUpdate> {
        self.updates.recv().await
    }

    /// Wait for all lookups and return how many produced a match.
    pub async fn finish(mut self) -> usize {
        let mut matched = 0;
        while let Some(update) = self.updates.recv().await {
            if update.catalog.is_some() {
                matched += 1;
            }
        }
        while let Some(joined) = self.workers.join_next().await {
            if let Err(e) = joined {
                warn!("Enrichment worker ended abnormally: {}", e);
            }
        }
        matched
    }

    pub fn cancel(mut self) {
        debug!("Cancelling enrichment with {} worker(s) live", self.workers.len());
        self.teardown();
    }

    fn teardown(&mut self) {
        *self.cancelled.write().unwrap_or_else(PoisonError::into_inner) = true;
        self.workers.abort_all();
    }
}

impl Drop for EnrichmentHandle {
    fn drop(&mut self) {
        self.teardown();
    }
}
