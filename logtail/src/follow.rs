//! Live following of newly appended lines.
//!
//! A [`Follower`] owns its own file handle and read cursor. It starts at the
//! end of the file as it was when opened, so content written before that
//! moment (the backlog) is never emitted. Reads that stop short of a newline
//! keep their bytes buffered until the rest of the record arrives; a partial
//! record is never emitted.

use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use std::time::Duration;

use futures::Stream;
use futures::stream;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncSeekExt, BufReader};
use tokio_util::sync::CancellationToken;

use crate::counter::decode_line;
use crate::error::{Error, Result};

/// A reader that yields lines appended to a file after it was opened.
#[derive(Debug)]
pub struct Follower {
    path: PathBuf,
    reader: BufReader<File>,
    /// Bytes of the record currently being assembled.
    pending: Vec<u8>,
    /// Offset of the first byte not yet emitted as part of a complete line.
    position: u64,
    poll_interval: Duration,
}

impl Follower {
    /// Opens `path` and positions the cursor at its current end.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Open`] if the file cannot be opened, or
    /// [`Error::Read`] if seeking to the end fails.
    pub async fn open(path: impl AsRef<Path>, poll_interval: Duration) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = File::open(&path).await.map_err(|source| Error::Open {
            path: path.clone(),
            source,
        })?;
        let position = file.seek(SeekFrom::End(0)).await.map_err(Error::Read)?;
        tracing::debug!(path = %path.display(), position, "following log file");

        Ok(Self {
            path,
            reader: BufReader::new(file),
            pending: Vec::new(),
            position,
            poll_interval,
        })
    }

    /// Path of the followed file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Byte offset just past the last line this follower emitted.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Waits for the next complete line.
    ///
    /// Returns `Ok(None)` once `cancel` fires. Cancellation is checked
    /// before every read attempt and races the wait between attempts, so it
    /// takes effect within one poll interval.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Read`] if a read fails and [`Error::Truncated`] if
    /// the file shrinks below the bytes already consumed. Either error ends
    /// the session; callers should not retry on the same follower.
    pub async fn next_line(&mut self, cancel: &CancellationToken) -> Result<Option<String>> {
        loop {
            if cancel.is_cancelled() {
                return Ok(None);
            }

            self.reader
                .read_until(b'\n', &mut self.pending)
                .await
                .map_err(Error::Read)?;

            if self.pending.last() == Some(&b'\n') {
                let raw = std::mem::take(&mut self.pending);
                self.position += raw.len() as u64;
                return Ok(Some(decode_line(&raw)));
            }

            self.check_truncation().await?;

            tokio::select! {
                _ = cancel.cancelled() => return Ok(None),
                _ = tokio::time::sleep(self.poll_interval) => {}
            }
        }
    }

    /// Turns the follower into an unbounded stream of lines.
    ///
    /// The stream ends when `cancel` fires, or right after yielding the
    /// first error. Dropping the stream releases the file handle.
    pub fn into_stream(self, cancel: CancellationToken) -> impl Stream<Item = Result<String>> {
        stream::unfold(Some((self, cancel)), |state| async move {
            let (mut follower, cancel) = state?;
            match follower.next_line(&cancel).await {
                Ok(Some(line)) => Some((Ok(line), Some((follower, cancel)))),
                Ok(None) => None,
                Err(err) => Some((Err(err), None)),
            }
        })
    }

    async fn check_truncation(&self) -> Result<()> {
        let len = self
            .reader
            .get_ref()
            .metadata()
            .await
            .map_err(Error::Read)?
            .len();
        let consumed = self.position + self.pending.len() as u64;
        if len < consumed {
            return Err(Error::Truncated {
                position: consumed,
                len,
            });
        }
        Ok(())
    }
}
