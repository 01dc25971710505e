/// The outcome of fetching one URL
///
/// A page is either fetched, holding the decoded response body, or failed,
/// holding a human-readable error message and never partial content. Pages
/// are immutable once built and are moved from the fetcher to the matcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    url: String,
    body: String,
    failed: bool,
}

impl Page {
    /// A successfully fetched page
    pub fn fetched(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            body: body.into(),
            failed: false,
        }
    }

    /// A page whose fetch failed with `error`
    pub fn failed(url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            body: error.into(),
            failed: true,
        }
    }

    /// The normalized URL that was requested
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The response body, or the error message if the fetch failed
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns true if the fetch failed
    pub fn is_failed(&self) -> bool {
        self.failed
    }
}
