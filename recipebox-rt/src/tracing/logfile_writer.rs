use std::{fs, io, path::PathBuf};

use itertools::Itertools;
use tracing::trace;
use tracing_appender::rolling::RollingFileAppender;

/// Keeps the store's log directory small. Only the newest `files_to_keep` logfiles starting
/// with `prefix` survive the first flush and every 256th flush after it. Config files and
/// anything else next to them are never touched.
pub(super) struct LogFileWriter<T> {
    inner: T,
    directory: PathBuf,
    prefix: String,
    files_to_keep: usize,
    cnt: u8,
}

impl<T> LogFileWriter<T> {
    pub(super) fn new(
        inner: T,
        directory: impl Into<PathBuf>,
        prefix: impl Into<String>,
        files_to_keep: usize,
    ) -> Self {
        Self {
            inner,
            directory: directory.into(),
            prefix: prefix.into(),
            files_to_keep,
            cnt: 0,
        }
    }

    fn is_logfile(&self, entry: &fs::DirEntry) -> io::Result<bool> {
        Ok(entry.file_type()?.is_file()
            && entry.file_name().to_string_lossy().starts_with(&self.prefix))
    }
}

impl io::Write for LogFileWriter<RollingFileAppender> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.cnt = self.cnt.wrapping_add(1);
        if self.cnt == 1 {
            let files = itertools::process_results(
                fs::read_dir(&self.directory)?.filter_map(|f| {
                    let f = match f {
                        Ok(f) => f,
                        Err(e) => return Some(Err(e)),
                    };
                    match self.is_logfile(&f) {
                        Ok(true) => {}
                        Ok(false) => return None,
                        Err(e) => return Some(Err(e)),
                    }
                    Some(f.metadata().and_then(|m| m.modified()).map(|t| (t, f.path())))
                }),
                |i| i.sorted_by_key(|x| x.0).rev().skip(self.files_to_keep),
            )?;

            for (_, p) in files {
                trace!("Delete old recipebox log '{p:?}'");
                fs::remove_file(p)?;
            }
        }

        self.inner.flush()
    }
}
