//! Newline counting over async byte streams.

use std::io;

use tokio::io::{AsyncRead, AsyncReadExt};

/// Size of the scratch buffer used by [`count_lines`].
///
/// Memory use is bounded by this value regardless of the stream length.
pub const COUNT_BUFFER_SIZE: usize = 32 * 1024;

/// Counts the newline-terminated records in `reader`.
///
/// The stream is consumed to its end in [`COUNT_BUFFER_SIZE`] chunks, so the
/// reader's position is at end-of-stream when this returns. A trailing
/// fragment with no `\n` is a record still being written and is not counted.
///
/// # Errors
///
/// Returns the underlying I/O error if any read fails.
pub async fn count_lines<R>(reader: &mut R) -> io::Result<u64>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut buf = vec![0u8; COUNT_BUFFER_SIZE];
    let mut count = 0u64;

    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            return Ok(count);
        }
        count += buf[..n].iter().filter(|&&b| b == b'\n').count() as u64;
    }
}

/// Decodes one raw record into text, dropping its line terminator.
///
/// Accepts `\n` and `\r\n` endings. Records are opaque, so invalid UTF-8 is
/// replaced rather than rejected.
pub(crate) fn decode_line(raw: &[u8]) -> String {
    let line = raw.strip_suffix(b"\n").unwrap_or(raw);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line).into_owned()
}
