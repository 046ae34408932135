//! Logging setup: stdout plus an append-only log file rotated by size.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Rotate the log file once it grows past this size.
pub const MAX_LOG_BYTES: u64 = 50_000_000;

/// Number of rotated files kept next to the active one.
pub const LOG_BACKUPS: usize = 5;

/// Filter directives for a `-v` count.
pub fn filter_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "homework_bot=info,homework_api=info,teloxide=warn",
        1 => "homework_bot=debug,homework_api=debug,teloxide=info",
        2 => "homework_bot=trace,homework_api=trace,teloxide=debug",
        _ => "trace",
    }
}

/// Path of the `index`-th backup of `path`, e.g. `bot.log.2`.
fn backup_path(path: &Path, index: usize) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(format!(".{}", index));
    PathBuf::from(name)
}

/// Shift `path` into `path.1`, `path.1` into `path.2` and so on when it is
/// at least `max_bytes` long. The oldest backup beyond `backups` is dropped.
///
/// Returns whether a rotation happened.
pub fn rotate_if_needed(path: &Path, max_bytes: u64, backups: usize) -> io::Result<bool> {
    let size = match fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };
    if size < max_bytes {
        return Ok(false);
    }

    if backups == 0 {
        fs::remove_file(path)?;
        return Ok(true);
    }

    for index in (1..backups).rev() {
        let from = backup_path(path, index);
        if from.exists() {
            let to = backup_path(path, index + 1);
            if to.exists() {
                fs::remove_file(&to)?;
            }
            fs::rename(&from, &to)?;
        }
    }

    let first = backup_path(path, 1);
    if first.exists() {
        fs::remove_file(&first)?;
    }
    fs::rename(path, &first)?;
    Ok(true)
}

/// Append-only log file that rotates itself once it would grow past
/// `max_bytes`. Rotation happens between writes, so a formatted event is
/// never split across two files.
#[derive(Debug)]
pub struct RotatingFile {
    path: PathBuf,
    file: File,
    size: u64,
    max_bytes: u64,
    backups: usize,
}

impl RotatingFile {
    /// Open `path` for appending, creating its parent and rotating an
    /// already oversized file first.
    pub fn open(path: &Path, max_bytes: u64, backups: usize) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        rotate_if_needed(path, max_bytes, backups)?;
        let file = open_append(path)?;
        let size = file.metadata()?.len();
        Ok(Self {
            path: path.to_path_buf(),
            file,
            size,
            max_bytes,
            backups,
        })
    }

    /// Bytes in the active file.
    pub fn size(&self) -> u64 {
        self.size
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;
        // A zero threshold rotates whatever is on disk.
        rotate_if_needed(&self.path, 0, self.backups)?;
        self.file = open_append(&self.path)?;
        self.size = 0;
        Ok(())
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.size > 0 && self.size + buf.len() as u64 > self.max_bytes {
            self.rotate()?;
        }
        let written = self.file.write(buf)?;
        self.size += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global subscriber.
///
/// Logs go to stdout and, when `log_file` can be opened, to that file without
/// ANSI colours. A file that cannot be opened only costs the file sink.
pub fn init(verbose: u8, log_file: &Path) {
    let filter = EnvFilter::try_new(filter_for_verbosity(verbose))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let file = RotatingFile::open(log_file, MAX_LOG_BYTES, LOG_BACKUPS);
    let (file_layer, file_error) = match file {
        Ok(file) => (
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file))),
            None,
        ),
        Err(e) => (None, Some(e)),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .init();

    match file_error {
        Some(e) => tracing::warn!(path = %log_file.display(), error = %e, "log file unavailable"),
        None => tracing::debug!(path = %log_file.display(), "logging to file"),
    }
}
