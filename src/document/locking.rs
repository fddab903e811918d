//! Locked document writes
//!
//! Documents are written under an exclusive `fs2` advisory lock so a
//! cooperating writer can never observe (or produce) a half-written file.
//! Advisory locks are cooperative: only writers using these functions are
//! kept out.

use fs2::FileExt;
use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Write file contents with an exclusive (write) lock.
///
/// The sequence is: open → lock → truncate → write → flush. Truncating only
/// after the lock is held keeps other lock holders from reading an empty file.
pub fn locked_write(path: &Path, content: &[u8]) -> io::Result<()> {
    #[allow(clippy::suspicious_open_options)]
    let file = OpenOptions::new().write(true).create(true).open(path)?;
    file.lock_exclusive()?;
    file.set_len(0)?;
    let mut writer = BufWriter::new(&file);
    writer.write_all(content)?;
    writer.flush()?;
    Ok(())
}
