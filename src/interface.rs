//! Threaded interface for submitting and controlling searches.
//!
//! This module provides a minimal, thread-per-search runner that accepts
//! search requests, executes them on a background thread, and streams the
//! result back to the caller. It uses cooperative cancellation via an
//! `Arc<AtomicBool>`.
//!
//! SQLite connections don't travel across threads, so every submitted
//! search opens its own scoped connection to the catalog and releases it
//! when the request finishes.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rusqlite::Connection;
use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::engine::{Engine, SearchResult};
use crate::error::Result;

/// A search request as submitted by a caller.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub search_string: String,
    pub offset: usize,
    pub limit: usize,
}

/// Cancellation token shared with the worker thread.
#[derive(Debug)]
pub struct CancelToken(Arc<AtomicBool>);
impl CancelToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
    pub fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Opaque search identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SearchId(u64);

/// Handle to a running or completed search.
pub struct SearchHandle {
    pub id: SearchId,
    cancel: CancelToken,
    started: Instant,
    join: Option<JoinHandle<()>>,
    pub results: Receiver<Result<SearchResult>>,
}
impl SearchHandle {
    /// Request cancellation (cooperative). The worker may take a short time
    /// to observe it.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }
    /// Wait for the search to finish.
    pub fn join(mut self) {
        if let Some(j) = self.join.take() {
            let _ = j.join();
        }
    }
    /// Elapsed time since submission.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// Registry managing search lifecycles.
pub struct SearchInterface {
    catalog_path: PathBuf,
    next_id: Mutex<u64>,
    // Shared with every worker thread so entries disappear as soon as their
    // search finishes; only currently running searches stay cancellable.
    active: Arc<Mutex<HashMap<SearchId, CancelToken>>>,
}

impl SearchInterface {
    pub fn new(catalog_path: impl Into<PathBuf>) -> Self {
        Self {
            catalog_path: catalog_path.into(),
            next_id: Mutex::new(0),
            active: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn allocate_id(&self) -> SearchId {
        let mut g = self.next_id.lock().unwrap();
        *g += 1;
        SearchId(*g)
    }

    /// Submit a search for execution on a background thread. The result
    /// arrives on the handle's channel.
    pub fn start_search(&self, request: SearchRequest) -> SearchHandle {
        let id = self.allocate_id();
        let cancel = CancelToken::new();
        self.active.lock().unwrap().insert(id, cancel.clone());

        let (tx, rx) = mpsc::channel();
        let path = self.catalog_path.clone();
        let cancel_for_thread = cancel.clone();
        let active = Arc::clone(&self.active);
        let join = std::thread::spawn(move || {
            if cancel_for_thread.is_cancelled() {
                info!(id = ?id, "search cancelled before execution");
                active.lock().unwrap().remove(&id);
                return;
            }
            let outcome = run_scoped(&path, &request);
            if let Err(e) = &outcome {
                warn!(id = ?id, error = %e, "search failed");
            }
            let _ = tx.send(outcome);
            active.lock().unwrap().remove(&id);
        });

        SearchHandle {
            id,
            cancel,
            started: Instant::now(),
            join: Some(join),
            results: rx,
        }
    }

    /// Run a search synchronously on the current thread, still with its own
    /// scoped connection. Appropriate for one-off lookups or environments
    /// where spawning a thread per request isn't wanted.
    pub fn run_sync(&self, request: &SearchRequest) -> Result<SearchResult> {
        run_scoped(&self.catalog_path, request)
    }

    /// Cancel a search by id.
    pub fn cancel(&self, id: SearchId) -> bool {
        if let Some(tok) = self.active.lock().unwrap().get(&id) {
            tok.cancel();
            true
        } else {
            false
        }
    }
}

// One logical request: acquire a connection, search, release.
fn run_scoped(path: &Path, request: &SearchRequest) -> Result<SearchResult> {
    let connection = Connection::open(path)?;
    let mut catalog = Catalog::new(&connection)?;
    let mut engine = Engine::new(&mut catalog);
    engine.search(&request.search_string, request.offset, request.limit)
}
