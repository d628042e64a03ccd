//! Single-slot toggle queue
//!
//! One thread runs toggles one after another. At most one request waits
//! behind the running toggle; further requests are dropped.

use std::io;
use std::sync::mpsc::{self, SyncSender, TrySendError};
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

/// Outcome of [`ToggleWorker::request`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    Queued,
    /// A run is already waiting; this one was dropped
    Busy,
    /// The worker thread has exited
    Stopped,
}

pub struct ToggleWorker {
    slot: Option<SyncSender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl ToggleWorker {
    pub fn spawn<F>(mut job: F) -> io::Result<Self>
    where
        F: FnMut() + Send + 'static,
    {
        let (slot, requests) = mpsc::sync_channel::<()>(1);
        let thread = thread::Builder::new()
            .name("toggle-worker".into())
            .spawn(move || {
                while requests.recv().is_ok() {
                    job();
                }
                debug!("Toggle worker stopped");
            })?;

        Ok(Self {
            slot: Some(slot),
            thread: Some(thread),
        })
    }

    /// Queue one run of the job
    pub fn request(&self) -> Request {
        let Some(slot) = &self.slot else {
            return Request::Stopped;
        };
        match slot.try_send(()) {
            Ok(()) => Request::Queued,
            Err(TrySendError::Full(())) => Request::Busy,
            Err(TrySendError::Disconnected(())) => {
                warn!("Toggle worker has stopped, hotkey presses are ignored");
                Request::Stopped
            }
        }
    }
}

impl Drop for ToggleWorker {
    fn drop(&mut self) {
        // Closing the slot ends the loop once the queued run (if any) is done
        self.slot.take();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("Toggle worker panicked");
            }
        }
    }
}
