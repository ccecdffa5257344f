//! Asynchronous request core for the MediaHome desktop media browser.
//!
//! The browser's screens (profile picker, media grid, picture editor) are
//! thin consumers of data served by a remote HTTP/JSON API. This crate is
//! the part that talks to that API: each operation on [`Core`] starts a
//! dedicated worker thread that performs one blocking HTTP exchange,
//! decodes the JSON envelope into a typed result and delivers it through a
//! [`ResultListener`], exactly once, success or failure. A background
//! reaper joins finished worker threads so none are leaked.
//!
//! The presentation layer runs a single-threaded event loop and must never
//! be touched from a worker thread. The supported delivery pattern is a
//! channel: hand each request a `Sender<CoreEvent>` clone and drain the
//! receiver in the loop's idle phase.
//!
//! ```no_run
//! use std::sync::mpsc;
//! use mediahome_core::{Core, CoreEvent};
//!
//! let (tx, rx) = mpsc::channel();
//! let core = Core::new("http://tv.local:8888");
//! core.request_profiles(tx.clone());
//!
//! // In the UI loop's idle phase, on the UI thread:
//! while let Ok(event) = rx.try_recv() {
//!     match event {
//!         CoreEvent::Profiles(r) if !r.error => { /* rebuild the profile grid */ }
//!         _ => { /* show an error, retry after RETRY_DELAY, ... */ }
//!     }
//! }
//!
//! core.shutdown();
//! ```

pub mod config;
pub mod core;
pub mod envelope;
pub mod error;
pub mod listener;
pub mod manager;
pub mod models;
pub mod request;
pub mod results;
pub mod transport;

#[cfg(test)]
mod testserver;

pub use crate::config::CoreConfig;
pub use crate::core::{Core, RETRY_DELAY};
pub use crate::error::Error;
pub use crate::listener::ResultListener;
pub use crate::models::{Media, MediaStatus, MediaStatusKind};
pub use crate::results::CoreEvent;
