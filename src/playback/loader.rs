//! Background decoding of user-selected files.

use std::path::{Path, PathBuf};
use std::thread;

use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::{debug, warn};

use super::{is_audio_path, AudioClip};
use crate::error::{Result, VisualizerError};

type LoadOutcome = (u64, Result<AudioClip>);

/// Decodes files on a worker thread; results are picked up by polling once
/// per frame. Only the most recent request is ever delivered.
pub struct AudioLoader {
    sender: Sender<LoadOutcome>,
    receiver: Receiver<LoadOutcome>,
    latest_request: u64,
    pending: bool,
}

impl Default for AudioLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioLoader {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self {
            sender,
            receiver,
            latest_request: 0,
            pending: false,
        }
    }

    /// Whether a request is still decoding
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Start decoding `path`. Non-audio files are rejected immediately.
    pub fn request(&mut self, path: &Path) -> Result<()> {
        if !is_audio_path(path) {
            return Err(VisualizerError::UnsupportedFile(path.to_path_buf()));
        }

        let id = self.latest_request + 1;
        let path: PathBuf = path.to_path_buf();
        let sender = self.sender.clone();

        debug!("Loading {} (request {})", path.display(), id);
        thread::Builder::new()
            .name("audio-decode".to_string())
            .spawn(move || {
                let outcome = AudioClip::decode_file(&path);
                // The loader may be gone; nothing to report to then
                let _ = sender.send((id, outcome));
            })?;

        self.latest_request = id;
        self.pending = true;
        Ok(())
    }

    /// Take the outcome of the latest request, if it has finished
    pub fn poll(&mut self) -> Option<Result<AudioClip>> {
        while let Ok((id, outcome)) = self.receiver.try_recv() {
            if id == self.latest_request {
                self.pending = false;
                return Some(outcome);
            }
            debug!("Discarding superseded load (request {})", id);
        }
        None
    }

    /// Block until the latest request finishes (used by headless runs)
    pub fn wait(&mut self) -> Option<Result<AudioClip>> {
        while self.pending {
            match self.receiver.recv() {
                Ok((id, outcome)) if id == self.latest_request => {
                    self.pending = false;
                    return Some(outcome);
                }
                Ok((id, _)) => debug!("Discarding superseded load (request {})", id),
                Err(e) => {
                    warn!("Loader channel closed: {}", e);
                    self.pending = false;
                }
            }
        }
        None
    }
}
