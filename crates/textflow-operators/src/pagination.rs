//! Limit/offset bounding applied by an operator to the tuples it yields.

use serde::{Deserialize, Serialize};

/// Optional `(limit, offset)` pair. `None` means "not requested", which is
/// different from zero: a limit of zero yields nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl Pagination {
    pub fn new(limit: Option<usize>, offset: Option<usize>) -> Self {
        Self { limit, offset }
    }

    pub fn is_unbounded(&self) -> bool {
        self.limit.is_none() && self.offset.is_none()
    }
}

/// Per-run counter that admits results according to a `Pagination`.
#[derive(Debug, Clone, Default)]
pub struct Paginator {
    pagination: Pagination,
    skipped: usize,
    emitted: usize,
}

impl Paginator {
    pub fn new(pagination: Pagination) -> Self {
        Self {
            pagination,
            skipped: 0,
            emitted: 0,
        }
    }

    /// True once the limit has been reached; callers should stop pulling.
    pub fn exhausted(&self) -> bool {
        self.pagination.limit.is_some_and(|l| self.emitted >= l)
    }

    /// Offer one result. Returns true if it should be emitted.
    pub fn admit(&mut self) -> bool {
        if self.exhausted() {
            return false;
        }
        if self.skipped < self.pagination.offset.unwrap_or(0) {
            self.skipped += 1;
            return false;
        }
        self.emitted += 1;
        true
    }

    pub fn emitted(&self) -> usize {
        self.emitted
    }

    pub fn reset(&mut self) {
        self.skipped = 0;
        self.emitted = 0;
    }
}
