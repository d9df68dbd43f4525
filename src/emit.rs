//! Writes the assembled solution buffer to the output file.
//!
//! The solutions already exist as a single, contiguous byte buffer by
//! the time this runs; this module's only job is getting those bytes
//! onto disk, truncating away any stale longer content from a previous
//! run and retrying through short writes.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::error::{PipelineError, Result};

/// Writes `solutions` to `path`, creating it if necessary and
/// truncating it to exactly `solutions.len()` bytes if it already
/// existed and was longer. Retries on short writes until the whole
/// buffer is flushed or a hard error occurs.
pub fn write_solutions(path: &Path, solutions: &[u8]) -> Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .open(path)
        .map_err(PipelineError::OutputWrite)?;

    file.set_len(solutions.len() as u64).map_err(PipelineError::OutputWrite)?;

    let mut written = 0;
    while written < solutions.len() {
        let n = file.write(&solutions[written..]).map_err(PipelineError::OutputWrite)?;
        if n == 0 {
            return Err(PipelineError::OutputWrite(std::io::Error::new(
                std::io::ErrorKind::WriteZero,
                "write returned zero bytes before the buffer was flushed",
            )));
        }
        written += n;
    }

    Ok(())
}
