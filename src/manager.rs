//! Lifecycle management for in-flight requests
//!
//! Request threads are started eagerly and must all be joined eventually,
//! without ever blocking the thread that issued them. The manager keeps the
//! in-flight requests in a mutex-protected map and runs one reaper thread.
//! Each request signals a completion channel as it finishes; the reaper
//! joins exactly that request, so one slow request never delays the
//! reclamation of faster ones. Shutdown drains synchronously: it does not
//! return while any request thread is still un-joined.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, warn};

use crate::listener::ResultListener;
use crate::request::{Operation, Request};
use crate::transport::Transport;

/// How long the reaper waits for a completion signal before rechecking the
/// stop flag.
const REAPER_IDLE_WAIT: Duration = Duration::from_millis(250);

#[derive(Default)]
struct Pending {
    requests: HashMap<u64, Request>,
    /// Completion signals that arrived before `add` registered the request.
    orphans: HashSet<u64>,
}

/// Registry of in-flight requests plus the reaper that reclaims their
/// threads.
pub struct RequestManager {
    pending: Arc<Mutex<Pending>>,
    stop: Arc<AtomicBool>,
    done_tx: Sender<u64>,
    next_id: AtomicU64,
    reaper: Option<JoinHandle<()>>,
}

impl RequestManager {
    pub fn new() -> Self {
        let (done_tx, done_rx) = mpsc::channel();
        let pending = Arc::new(Mutex::new(Pending::default()));
        let stop = Arc::new(AtomicBool::new(false));
        let reaper = {
            let pending = Arc::clone(&pending);
            let stop = Arc::clone(&stop);
            thread::spawn(move || reap(done_rx, pending, stop))
        };
        Self {
            pending,
            stop,
            done_tx,
            next_id: AtomicU64::new(0),
            reaper: Some(reaper),
        }
    }

    /// Construct and start a request for `operation`, register it, return.
    /// Never blocks on network or on other requests.
    pub(crate) fn submit(
        &self,
        server_address: &str,
        transport: Transport,
        operation: Operation,
        listener: Box<dyn ResultListener>,
    ) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = Request::spawn(
            id,
            server_address.to_string(),
            transport,
            operation,
            listener,
            self.done_tx.clone(),
        );
        self.add(request);
    }

    /// Register an already-started request. If its completion signal has
    /// raced ahead, the thread is already finished and is joined on the
    /// spot instead.
    pub(crate) fn add(&self, request: Request) {
        let id = request.id();
        let mut pending = self.pending.lock().expect("requests lock poisoned");
        if pending.orphans.remove(&id) {
            drop(pending);
            request.join();
            debug!("request {} joined on add", id);
        } else {
            pending.requests.insert(id, request);
        }
    }

    /// Number of requests currently registered and not yet reaped.
    #[cfg(test)]
    pub(crate) fn pending_len(&self) -> usize {
        self.pending
            .lock()
            .expect("requests lock poisoned")
            .requests
            .len()
    }

    /// Stop the reaper and join every remaining request thread. Returns
    /// only when no request thread is left un-joined.
    pub fn shutdown(&mut self) {
        if let Some(reaper) = self.reaper.take() {
            self.stop.store(true, Ordering::Release);
            if reaper.join().is_err() {
                warn!("reaper thread panicked");
            }
        }
    }
}

impl Default for RequestManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for RequestManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn reap(done_rx: Receiver<u64>, pending: Arc<Mutex<Pending>>, stop: Arc<AtomicBool>) {
    while !stop.load(Ordering::Acquire) {
        match done_rx.recv_timeout(REAPER_IDLE_WAIT) {
            Ok(id) => {
                let request = {
                    let mut pending = pending.lock().expect("requests lock poisoned");
                    match pending.requests.remove(&id) {
                        Some(request) => Some(request),
                        None => {
                            // Finished before add() registered it; add()
                            // will join it.
                            pending.orphans.insert(id);
                            None
                        }
                    }
                };
                if let Some(request) = request {
                    // The thread has already signalled completion, so this
                    // join returns promptly.
                    request.join();
                    debug!("request {} reaped", id);
                }
            }
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    // Synchronous drain: join whatever is still in flight, however slow.
    let remaining: Vec<Request> = {
        let mut pending = pending.lock().expect("requests lock poisoned");
        pending.requests.drain().map(|(_, request)| request).collect()
    };
    for request in remaining {
        let id = request.id();
        request.join();
        debug!("request {} joined on shutdown", id);
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
