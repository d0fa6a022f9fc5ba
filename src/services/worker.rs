//! Background analysis worker
//!
//! Runs one job on its own thread and hands the result back over a channel,
//! so a caller driving an interactive loop is never blocked by file reading
//! and aggregation. Jobs cannot be interrupted; abandoning a worker discards
//! its result once the job finishes.

use std::sync::mpsc;
use std::thread;

use crate::error::{AnalyzerError, AnalyzerResult};

/// Handle to a job running on a background thread
pub struct AnalysisWorker<T> {
    /// Result receiver
    receiver: mpsc::Receiver<T>,
    /// Worker thread handle
    handle: thread::JoinHandle<()>,
}

impl<T: Send + 'static> AnalysisWorker<T> {
    /// Start `job` on a new thread
    pub fn spawn<F>(job: F) -> AnalyzerResult<Self>
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("analysis-worker".into())
            .spawn(move || {
                // The receiver is gone when the caller abandoned the job
                if sender.send(job()).is_err() {
                    log::debug!("analysis result discarded");
                }
            })
            .map_err(|e| AnalyzerError::Worker(format!("Failed to start worker: {}", e)))?;

        Ok(Self { receiver, handle })
    }

    /// Get the result if the job has finished (non-blocking)
    pub fn try_result(&self) -> AnalyzerResult<Option<T>> {
        match self.receiver.try_recv() {
            Ok(result) => Ok(Some(result)),
            Err(mpsc::TryRecvError::Empty) => Ok(None),
            Err(mpsc::TryRecvError::Disconnected) => Err(worker_died()),
        }
    }

    /// Check if the job has stopped running
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Block until the job finishes
    pub fn wait(self) -> AnalyzerResult<T> {
        let result = self.receiver.recv().map_err(|_| worker_died());
        if self.handle.join().is_err() {
            return Err(worker_died());
        }
        result
    }

    /// Stop waiting for the job; its result is dropped when it completes
    pub fn abandon(self) {
        drop(self.receiver);
    }
}

fn worker_died() -> AnalyzerError {
    AnalyzerError::Worker("analysis thread stopped without a result".into())
}
