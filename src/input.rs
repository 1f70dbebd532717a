use std::fs;
use std::io::Read;
use std::path::Path;

use memmap2::Mmap;
use tracing::debug;

use crate::error::HighlightError;

/// Files at or above this size are memory-mapped instead of read.
const MMAP_THRESHOLD: u64 = 64 * 1024;

/// Read a source text file. Source text must be UTF-8; anything else is
/// rejected rather than lossily decoded, since output must reproduce the
/// input exactly.
pub fn read_source(path: &Path) -> Result<String, HighlightError> {
    let meta = fs::metadata(path).map_err(|e| HighlightError::from_io(path, e))?;

    if meta.is_dir() {
        return Err(HighlightError::IoError {
            path: path.to_path_buf(),
            source: std::io::Error::other("is a directory"),
        });
    }

    let byte_len = meta.len();
    // mmap on a 0-byte file may fail on some platforms
    if byte_len == 0 {
        return Ok(String::new());
    }

    let file = fs::File::open(path).map_err(|e| HighlightError::from_io(path, e))?;

    if byte_len < MMAP_THRESHOLD {
        let mut buf = Vec::with_capacity(byte_len as usize);
        (&file)
            .read_to_end(&mut buf)
            .map_err(|e| HighlightError::from_io(path, e))?;
        return decode(path, buf);
    }

    debug!(path = %path.display(), byte_len, "mapping source file");
    let mmap = unsafe { Mmap::map(&file) }.map_err(|e| HighlightError::from_io(path, e))?;
    std::str::from_utf8(&mmap)
        .map(str::to_owned)
        .map_err(|_| HighlightError::InvalidUtf8 {
            path: path.to_path_buf(),
        })
}

/// Read all of stdin as source text.
pub fn read_stdin() -> Result<String, HighlightError> {
    read_reader(std::io::stdin().lock())
}

pub(crate) fn read_reader(mut reader: impl Read) -> Result<String, HighlightError> {
    let mut buf = Vec::new();
    reader
        .read_to_end(&mut buf)
        .map_err(|e| HighlightError::from_io("-", e))?;
    decode(Path::new("-"), buf)
}

fn decode(path: &Path, buf: Vec<u8>) -> Result<String, HighlightError> {
    String::from_utf8(buf).map_err(|_| HighlightError::InvalidUtf8 {
        path: path.to_path_buf(),
    })
}
