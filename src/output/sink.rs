use crate::output::{OutputError, OutputResult};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Destination for matching URLs
///
/// Implementations append one line per match and must not batch: each call
/// is durable in the underlying writer when it returns.
pub trait ResultSink: Send {
    /// Records that `url` contains the search term
    fn record_match(&mut self, url: &str) -> OutputResult<()>;
}

impl<S: ResultSink + ?Sized> ResultSink for &mut S {
    fn record_match(&mut self, url: &str) -> OutputResult<()> {
        (**self).record_match(url)
    }
}

impl<S: ResultSink + ?Sized> ResultSink for Box<S> {
    fn record_match(&mut self, url: &str) -> OutputResult<()> {
        (**self).record_match(url)
    }
}

/// Formats the result line for a matching URL (without the newline)
pub fn format_match_line(url: &str) -> String {
    format!("{} has term", url)
}

/// Result sink over any writer, flushed after every line
#[derive(Debug)]
pub struct WriterSink<W: Write + Send> {
    writer: W,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> ResultSink for WriterSink<W> {
    fn record_match(&mut self, url: &str) -> OutputResult<()> {
        writeln!(self.writer, "{}", format_match_line(url))?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Result sink backed by a file
///
/// The file is created (or truncated) when the sink is opened, before any
/// fetching starts.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    inner: WriterSink<File>,
}

impl FileSink {
    /// Creates the results file at `path`
    pub fn create(path: impl AsRef<Path>) -> OutputResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path).map_err(|source| OutputError::Create {
            path: path.display().to_string(),
            source,
        })?;

        Ok(Self {
            path,
            inner: WriterSink::new(file),
        })
    }

    /// Path of the results file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResultSink for FileSink {
    fn record_match(&mut self, url: &str) -> OutputResult<()> {
        self.inner.record_match(url)
    }
}
