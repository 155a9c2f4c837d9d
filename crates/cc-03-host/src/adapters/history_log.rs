//! Committed-history adapters.
//!
//! The file log is a sequence of frames, each a big-endian `u32` length
//! followed by a bincode-encoded [`CommittedBlock`] that fills the frame
//! exactly. A truncated trailing frame (a crash mid-append) is cut off when
//! the log is opened, so later appends start on a frame boundary.

use crate::domain::{CommittedBlock, HostError};
use crate::ports::HistoryStore;
use bincode::Options;
use parking_lot::{Mutex, RwLock};
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const FRAME_HEADER: usize = 4;

/// Same layout as `bincode::serialize`, but a frame with bytes left over
/// after the block is an error.
fn frame_codec() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .reject_trailing_bytes()
}

/// Decode every complete frame. Returns the blocks and the length of the
/// prefix they occupy; anything past it is a torn tail.
fn decode_frames(raw: &[u8]) -> Result<(Vec<CommittedBlock>, usize), HostError> {
    let mut blocks = Vec::new();
    let mut offset = 0;
    while offset < raw.len() {
        let rest = &raw[offset..];
        let Some((len, body)) = rest.split_first_chunk::<FRAME_HEADER>() else {
            break;
        };
        let len = u32::from_be_bytes(*len) as usize;
        if body.len() < len {
            break;
        }
        let block = frame_codec()
            .deserialize(&body[..len])
            .map_err(|e| HostError::History(format!("corrupt frame at offset {offset}: {e}")))?;
        blocks.push(block);
        offset += FRAME_HEADER + len;
    }
    Ok((blocks, offset))
}

/// History kept only in memory; lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryHistory {
    blocks: RwLock<Vec<CommittedBlock>>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for InMemoryHistory {
    fn append(&self, block: &CommittedBlock) -> Result<(), HostError> {
        self.blocks.write().push(block.clone());
        Ok(())
    }

    fn load(&self) -> Result<Vec<CommittedBlock>, HostError> {
        Ok(self.blocks.read().clone())
    }
}

/// Append-only bincode log on disk.
#[derive(Debug)]
pub struct FileHistoryLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileHistoryLog {
    /// Open or create the log at `path`, creating parent directories.
    /// A torn trailing frame is truncated away.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, HostError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&path)?;

        let mut raw = Vec::new();
        file.read_to_end(&mut raw)?;
        let (blocks, valid) = decode_frames(&raw)?;
        if valid < raw.len() {
            warn!(
                path = %path.display(),
                kept = blocks.len(),
                discarded = raw.len() - valid,
                "Truncating torn history tail"
            );
            file.set_len(valid as u64)?;
            file.sync_data()?;
        }
        info!(path = %path.display(), blocks = blocks.len(), "Opened history log");
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryStore for FileHistoryLog {
    fn append(&self, block: &CommittedBlock) -> Result<(), HostError> {
        let body = frame_codec().serialize(block)?;
        let len = u32::try_from(body.len())
            .map_err(|_| HostError::History(format!("block too large: {} bytes", body.len())))?;
        let mut frame = Vec::with_capacity(FRAME_HEADER + body.len());
        frame.extend_from_slice(&len.to_be_bytes());
        frame.extend_from_slice(&body);

        let mut file = self.file.lock();
        let start = file.metadata()?.len();
        let written = file.write_all(&frame).and_then(|()| file.sync_data());
        if let Err(e) = written {
            // Leave no partial frame behind for the next append to follow.
            if let Err(rollback) = file.set_len(start) {
                warn!(error = %rollback, "Failed to roll back partial history frame");
            }
            return Err(e.into());
        }
        Ok(())
    }

    fn load(&self) -> Result<Vec<CommittedBlock>, HostError> {
        let mut raw = Vec::new();
        File::open(&self.path)?.read_to_end(&mut raw)?;

        let (blocks, valid) = decode_frames(&raw)?;
        if valid < raw.len() {
            warn!(
                discarded = raw.len() - valid,
                "Ignoring truncated history frame"
            );
        }
        Ok(blocks)
    }
}
