//! One-shot retrieval of the last lines of the log.

use std::io::{self, SeekFrom};
use std::path::Path;

use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncSeekExt, BufReader};

use crate::counter::{count_lines, decode_line};
use crate::error::{Error, Result};

/// Returns the last `n` complete lines of the file at `path`, oldest first.
///
/// The file is scanned once to count its lines, then rewound and re-read
/// past the lines that are not wanted. The result reflects the file as of
/// the counting pass: lines appended afterwards are not included, and a
/// trailing fragment without a newline is never returned. Files with fewer
/// than `n` lines yield all of their lines.
///
/// # Errors
///
/// Returns [`Error::Open`] if the file cannot be opened and [`Error::Read`]
/// if a read fails, including when the file shrinks between the two passes.
pub async fn tail(path: impl AsRef<Path>, n: usize) -> Result<Vec<String>> {
    let path = path.as_ref();
    let mut file = File::open(path).await.map_err(|source| Error::Open {
        path: path.to_path_buf(),
        source,
    })?;

    if n == 0 {
        return Ok(Vec::new());
    }

    let total = count_lines(&mut file).await.map_err(Error::Read)?;
    let skip = total.saturating_sub(n as u64);
    let wanted = total - skip;
    tracing::debug!(path = %path.display(), total, skip, "reading log tail");

    file.seek(SeekFrom::Start(0)).await.map_err(Error::Read)?;
    read_after_skip(&mut BufReader::new(file), skip, wanted).await
}

/// Discards `skip` lines from `reader`, then collects the next `wanted`.
///
/// Running out of complete lines before that means the file shrank since
/// it was counted, which is reported as an `UnexpectedEof` read error.
async fn read_after_skip<R>(reader: &mut R, skip: u64, wanted: u64) -> Result<Vec<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();

    for _ in 0..skip {
        if !read_complete_line(reader, &mut buf).await? {
            return Err(shrunk());
        }
    }

    let mut lines = Vec::with_capacity(wanted as usize);
    for _ in 0..wanted {
        if !read_complete_line(reader, &mut buf).await? {
            return Err(shrunk());
        }
        lines.push(decode_line(&buf));
    }

    Ok(lines)
}

/// Reads one line into `buf`, returning `false` if EOF came before a newline.
async fn read_complete_line<R>(reader: &mut R, buf: &mut Vec<u8>) -> Result<bool>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    reader
        .read_until(b'\n', buf)
        .await
        .map_err(Error::Read)?;
    Ok(buf.last() == Some(&b'\n'))
}

fn shrunk() -> Error {
    Error::Read(io::Error::new(
        io::ErrorKind::UnexpectedEof,
        "log file shrank while reading tail",
    ))
}
