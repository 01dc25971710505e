/// Raw limit value meaning "crawl every URL the provider yields"
pub const NO_LIMIT: i64 = -1;

/// Maximum number of URLs the source may emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UrlLimit(Option<usize>);

impl UrlLimit {
    /// No cap on emitted URLs
    pub const UNLIMITED: UrlLimit = UrlLimit(None);

    /// Caps emission at `max` URLs
    pub fn at_most(max: usize) -> Self {
        Self(Some(max))
    }

    /// Builds a limit from a raw integer; any negative value means no limit
    pub fn from_raw(raw: i64) -> Self {
        match usize::try_from(raw) {
            Ok(max) => Self::at_most(max),
            Err(_) => Self::UNLIMITED,
        }
    }

    /// Returns true once `emitted` URLs exhaust the limit
    pub fn is_reached(&self, emitted: usize) -> bool {
        matches!(self.0, Some(max) if emitted >= max)
    }
}

impl std::fmt::Display for UrlLimit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(max) => write!(f, "{}", max),
            None => write!(f, "unlimited"),
        }
    }
}
