//! Shared file writer for the file log layer

use crate::logger::config::FileConfig;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// Append-or-truncate log file shared between all writer guards.
///
/// Writes that fail are redirected to stderr so that a broken log file never
/// takes request handling down with it.
#[derive(Clone)]
pub struct LogFileWriter {
    file: Arc<Mutex<BufWriter<File>>>,
}

impl LogFileWriter {
    pub fn new(config: &FileConfig) -> io::Result<Self> {
        if let Some(parent) = config.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let file = open_log_file(&config.path, config.append)?;
        Ok(Self {
            file: Arc::new(Mutex::new(file)),
        })
    }
}

impl<'a> MakeWriter<'a> for LogFileWriter {
    type Writer = LogFileGuard;

    fn make_writer(&'a self) -> Self::Writer {
        LogFileGuard {
            file: self.file.clone(),
        }
    }
}

pub struct LogFileGuard {
    file: Arc<Mutex<BufWriter<File>>>,
}

impl Write for LogFileGuard {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let Ok(mut file) = self.file.lock() else {
            return io::stderr().write(buf);
        };
        match file.write(buf) {
            Ok(written) => Ok(written),
            Err(error) => {
                eprintln!("[Logger] File write failed, writing to stderr: {}", error);
                io::stderr().write(buf)
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.lock() {
            Ok(mut file) => file.flush(),
            Err(_) => io::stderr().flush(),
        }
    }
}

impl Drop for LogFileGuard {
    fn drop(&mut self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

fn open_log_file(path: &Path, append: bool) -> io::Result<BufWriter<File>> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(append)
        .truncate(!append)
        .open(path)?;

    Ok(BufWriter::new(file))
}
