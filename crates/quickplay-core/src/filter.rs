use crate::similarity::partial_ratio;
use crate::types::{Classification, ListSet, ServerRecord};

/// Similarity score at or above which a list phrase matches a server name.
pub const DEFAULT_THRESHOLD: u32 = 80;

/// Classifies servers against a blacklist/greylist pair.
///
/// Blacklist always wins: a name matching both lists is `Blacklisted`, never
/// `Greylisted`. A record is classified exactly once per pass and stays in
/// the collection whatever the verdict; hiding is the selection policy's
/// business, not the filter's.
#[derive(Debug, Clone, Copy)]
pub struct ListFilter {
    threshold: u32,
}

impl Default for ListFilter {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl ListFilter {
    /// Creates a filter with a custom match threshold
    #[must_use]
    pub const fn with_threshold(threshold: u32) -> Self {
        Self { threshold }
    }

    /// The active match threshold
    #[must_use]
    pub const fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Computes the verdict for a single server name.
    #[must_use]
    pub fn classify(&self, name: &str, lists: &ListSet) -> Classification {
        if lists
            .blacklist
            .phrases()
            .any(|phrase| partial_ratio(name, phrase) >= self.threshold)
        {
            return Classification::Blacklisted;
        }
        // First matching row wins; the table is curated in priority order.
        for entry in lists.greylist.entries() {
            if partial_ratio(name, &entry.server) >= self.threshold {
                return Classification::Greylisted {
                    reason: entry.reason.clone(),
                };
            }
        }
        Classification::Clear
    }

    /// Classifies every record in place.
    pub fn classify_all(&self, records: &mut [ServerRecord], lists: &ListSet) {
        for record in records {
            record.classification = self.classify(&record.name, lists);
        }
    }
}
