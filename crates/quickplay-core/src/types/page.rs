use serde::{Deserialize, Serialize};

use crate::error::QuickplayError;
use crate::types::ServerRecord;

/// Validated 1-based pagination parameters.
///
/// Both fields are validated at construction; a `Pagination` value in hand
/// is always usable. Out-of-range *pages* are not an error (they yield an
/// empty page), only zero parameters are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pagination {
    page: u32,
    per_page: u32,
}

impl Pagination {
    /// Creates pagination parameters.
    ///
    /// # Errors
    ///
    /// Returns [`QuickplayError::InvalidPagination`] when either parameter
    /// is zero.
    pub fn new(page: u32, per_page: u32) -> crate::Result<Self> {
        if page == 0 || per_page == 0 {
            return Err(QuickplayError::InvalidPagination { page, per_page });
        }
        Ok(Self { page, per_page })
    }

    /// 1-based page number
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Page size
    #[must_use]
    pub const fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Index of the first record on this page
    #[must_use]
    pub const fn offset(&self) -> usize {
        ((self.page - 1) as usize) * (self.per_page as usize)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 10,
        }
    }
}

/// One page of annotated server records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerPage {
    /// Records on this page, in the order the full set was given
    pub servers: Vec<ServerRecord>,

    /// 1-based page number this slice came from
    pub page: u32,

    /// Requested page size; the last page may hold fewer
    pub per_page: u32,

    /// Size of the full annotated set, not of this slice
    pub total: usize,
}

impl ServerPage {
    /// Slices one page out of the full annotated set.
    ///
    /// A page past the end yields an empty `servers` with `total` still
    /// reporting the full set size.
    #[must_use]
    pub fn paginate(all: Vec<ServerRecord>, pagination: Pagination) -> Self {
        let total = all.len();
        let start = pagination.offset().min(total);
        let end = (start + pagination.per_page() as usize).min(total);
        Self {
            servers: all[start..end].to_vec(),
            page: pagination.page(),
            per_page: pagination.per_page(),
            total,
        }
    }
}
