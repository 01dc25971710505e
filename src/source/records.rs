use crate::source::{UrlLimit, UrlSender};
use crate::SourceError;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use tokio::task::JoinHandle;

/// Where the URL records come from
enum Provider {
    Path(PathBuf),
    Reader(Box<dyn Read + Send>),
}

/// Reads URL records from a CSV provider and emits them in order
///
/// Each record's URL sits at `url_column` (the second field by default).
/// Header rows, whose URL field equals `header_label`, and malformed records
/// are skipped with a debug trace. A provider failure ends the sequence and
/// is reported once; it never aborts the run.
pub struct UrlSource {
    provider: Provider,
    url_column: usize,
    header_label: String,
    limit: UrlLimit,
}

impl UrlSource {
    /// Reads records from the CSV file at `path`
    ///
    /// The file is opened when the source runs, so a missing file surfaces
    /// as an empty sequence rather than an error here.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::with_provider(Provider::Path(path.into()))
    }

    /// Reads records from any reader of CSV data
    pub fn from_reader(reader: impl Read + Send + 'static) -> Self {
        Self::with_provider(Provider::Reader(Box::new(reader)))
    }

    fn with_provider(provider: Provider) -> Self {
        Self {
            provider,
            url_column: 1,
            header_label: "URL".to_string(),
            limit: UrlLimit::UNLIMITED,
        }
    }

    /// Sets the zero-based field index holding the URL
    pub fn url_column(mut self, column: usize) -> Self {
        self.url_column = column;
        self
    }

    /// Sets the field value that marks a header row
    pub fn header_label(mut self, label: impl Into<String>) -> Self {
        self.header_label = label.into();
        self
    }

    /// Caps the number of URLs emitted
    pub fn limit(mut self, limit: UrlLimit) -> Self {
        self.limit = limit;
        self
    }

    /// Human-readable name of the provider, for progress messages
    pub fn describe(&self) -> String {
        match &self.provider {
            Provider::Path(path) => path.display().to_string(),
            Provider::Reader(_) => "<reader>".to_string(),
        }
    }

    /// Runs the source on the blocking pool
    ///
    /// The sender is dropped when the task returns, which closes the URL
    /// sequence exactly once on every path. The task yields the number of
    /// URLs emitted.
    pub fn spawn(self, urls: UrlSender) -> JoinHandle<usize> {
        let span = tracing::info_span!("url_source");
        tokio::task::spawn_blocking(move || {
            let _enter = span.enter();
            self.emit(&urls)
        })
    }

    /// Emits every valid URL into `urls`, blocking the current thread
    ///
    /// Returns the number of URLs emitted. Provider failures are logged and
    /// end emission early.
    pub fn emit(self, urls: &UrlSender) -> usize {
        tracing::info!("Reading URLs from {}", self.describe());

        let mut emitted = 0;
        if let Err(e) = self.read_into(urls, &mut emitted) {
            tracing::error!("{}", e);
        }

        tracing::debug!("Done reading, {} URLs emitted", emitted);
        emitted
    }

    fn read_into(self, urls: &UrlSender, emitted: &mut usize) -> Result<(), SourceError> {
        let reader: Box<dyn Read + Send> = match self.provider {
            Provider::Path(path) => {
                let file = File::open(&path).map_err(|source| SourceError::Open {
                    path: path.display().to_string(),
                    source,
                })?;
                Box::new(file)
            }
            Provider::Reader(reader) => reader,
        };

        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        for (index, record) in csv_reader.records().enumerate() {
            if self.limit.is_reached(*emitted) {
                tracing::debug!("Stopping at URL limit of {}", self.limit);
                break;
            }

            let line = index + 1;
            let record = match record {
                Ok(record) => record,
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => {
                    tracing::debug!("Skipping malformed record {}: {}", line, e);
                    continue;
                }
            };

            let url = match record.get(self.url_column) {
                Some(url) if !url.is_empty() => url,
                _ => {
                    tracing::debug!("Skipping record {}: no URL in field {}", line, self.url_column);
                    continue;
                }
            };

            if url == self.header_label {
                tracing::debug!("Skipping header record {}", line);
                continue;
            }

            tracing::debug!("Found url {}", url);
            if !urls.send_blocking(url.to_string()) {
                tracing::debug!("URL receiver closed, stopping source");
                break;
            }
            *emitted += 1;
        }

        Ok(())
    }
}
