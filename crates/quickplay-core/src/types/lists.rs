use serde::{Deserialize, Serialize};

/// Phrases whose fuzzy match against a server name hides that server.
///
/// Serialized form is a bare JSON array of strings, matching the on-disk
/// `blacklist.json` the lists have always been maintained in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlacklistSet(Vec<String>);

impl BlacklistSet {
    /// Creates a blacklist from a set of phrases
    #[must_use]
    pub fn new(phrases: Vec<String>) -> Self {
        Self(phrases)
    }

    /// Iterates the phrases
    pub fn phrases(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Number of phrases
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the list holds no phrases
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<String> for BlacklistSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One greylist row: a phrase and the operator's note explaining it.
///
/// Field names are capitalized on the wire because the curated
/// `greylist.json` spells them that way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GreyEntry {
    /// Phrase matched against server names
    #[serde(rename = "Server")]
    pub server: String,

    /// Why the phrase was listed; attached to matching servers
    #[serde(rename = "Reason")]
    pub reason: String,
}

impl GreyEntry {
    /// Creates a greylist entry
    #[must_use]
    pub fn new(server: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            reason: reason.into(),
        }
    }
}

/// Ordered greylist table; during classification the first matching row
/// wins, so curation order is meaningful.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GreylistTable(Vec<GreyEntry>);

impl GreylistTable {
    /// Creates a greylist table from rows, preserving their order
    #[must_use]
    pub fn new(entries: Vec<GreyEntry>) -> Self {
        Self(entries)
    }

    /// Iterates the rows in table order
    pub fn entries(&self) -> impl Iterator<Item = &GreyEntry> {
        self.0.iter()
    }

    /// Number of rows
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the table holds no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<GreyEntry> for GreylistTable {
    fn from_iter<I: IntoIterator<Item = GreyEntry>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A loaded blacklist/greylist pair.
///
/// Loaded fresh at the start of every fetch cycle; a cycle owns its set, so
/// list edits land on the next cycle without racing in-flight
/// classifications.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListSet {
    /// Hiding phrases
    pub blacklist: BlacklistSet,
    /// Warning phrases with reasons
    pub greylist: GreylistTable,
}

impl ListSet {
    /// Creates a list set from its two halves
    #[must_use]
    pub const fn new(blacklist: BlacklistSet, greylist: GreylistTable) -> Self {
        Self {
            blacklist,
            greylist,
        }
    }
}
