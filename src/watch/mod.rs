//! Source watcher
//!
//! Watches a directory tree and recompiles mjml sources as they change.
//!
//! Architecture:
//! ```text
//! notify backend thread → mpsc channel → dispatcher thread → ChangeHandler
//! ```
//!
//! Every modification event compiles again; there is no debouncing, so an
//! editor that writes a file in several steps triggers several compiles.

mod event;


use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use thiserror::Error;

use crate::compiler::{CompileError, Compiler};
use crate::core;
use crate::log;
use crate::utils::path::normalize_path;

/// How often the main thread checks for shutdown.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Reacts to a changed source file.
///
/// Returning a fatal error (see [`CompileError::is_fatal`]) stops the watch.
pub trait ChangeHandler: Send + 'static {
    fn on_source_changed(&self, path: &Path) -> Result<(), CompileError>;
}

impl ChangeHandler for Compiler {
    fn on_source_changed(&self, path: &Path) -> Result<(), CompileError> {
        self.compile(path)
    }
}

/// Errors ending a watch.
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("failed to watch `{}`", .0.display())]
    Notify(PathBuf, #[source] notify::Error),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error("watch dispatcher thread panicked")]
    Panicked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    Stopped,
    Running,
}

/// A running recursive watch with its dispatcher thread.
pub struct SourceWatcher {
    root: PathBuf,
    /// Dropping the watcher ends the notify thread and closes the channel.
    watcher: Option<RecommendedWatcher>,
    dispatcher: Option<JoinHandle<Result<(), CompileError>>>,
    state: WatchState,
}

impl SourceWatcher {
    /// Register a recursive watch on `root` and start dispatching to `handler`.
    pub fn start<H: ChangeHandler>(root: &Path, handler: H) -> Result<Self, WatchError> {
        let root = normalize_path(root);
        let (tx, rx) = mpsc::channel::<notify::Result<notify::Event>>();

        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })
        .map_err(|e| WatchError::Notify(root.clone(), e))?;
        watcher
            .watch(&root, RecursiveMode::Recursive)
            .map_err(|e| WatchError::Notify(root.clone(), e))?;

        let dispatcher = thread::spawn(move || {
            for res in rx {
                match res {
                    Ok(event) => event::dispatch(&event, &handler)?,
                    Err(e) => log!("watch"; "notify error: {}", e),
                }
            }
            Ok(())
        });

        Ok(Self {
            root,
            watcher: Some(watcher),
            dispatcher: Some(dispatcher),
            state: WatchState::Running,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    #[cfg(test)]
    pub fn state(&self) -> WatchState {
        self.state
    }

    /// Whether the dispatcher gave up on its own (fatal error or panic).
    pub fn is_finished(&self) -> bool {
        self.dispatcher
            .as_ref()
            .is_none_or(JoinHandle::is_finished)
    }

    /// Remove the watch and wait for queued events to be handled.
    ///
    /// Returns the fatal error that ended dispatching early, if any.
    /// Calling it again is a no-op.
    pub fn stop(&mut self) -> Result<(), WatchError> {
        if self.state == WatchState::Stopped {
            return Ok(());
        }
        self.state = WatchState::Stopped;

        drop(self.watcher.take());
        match self.dispatcher.take().map(JoinHandle::join) {
            Some(Ok(result)) => result.map_err(WatchError::from),
            Some(Err(_)) => Err(WatchError::Panicked),
            None => Ok(()),
        }
    }
}

impl Drop for SourceWatcher {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            log!("watch"; "{}", e);
        }
    }
}

/// Watch `root` until Ctrl+C, compiling changed sources with `compiler`.
pub fn watch(root: &Path, compiler: Compiler) -> Result<(), WatchError> {
    if !root.is_dir() {
        return Err(CompileError::NotADirectory(root.to_path_buf()).into());
    }

    let mut watcher = SourceWatcher::start(root, compiler)?;
    core::set_watching(true);
    log!("watch"; "watching {} for changes (Ctrl+C to stop)", watcher.root().display());

    run_until(&watcher, core::is_shutdown);

    core::set_watching(false);
    watcher.stop()
}

/// Sleep until `stop` returns true or the dispatcher ends by itself.
fn run_until(watcher: &SourceWatcher, stop: impl Fn() -> bool) {
    while !stop() && !watcher.is_finished() {
        thread::sleep(POLL_INTERVAL);
    }
}
