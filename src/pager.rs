//! Pagination cursor for list views

use crate::model::Page;

/// Tracks one list view's position in a paged collection.
///
/// `has_next`/`has_previous` come from the server verbatim on every
/// applied response; they are never incremented or inferred locally.
/// Each fetch takes a sequence ticket from [`Pager::begin`], and
/// [`Pager::apply`] discards responses older than the newest one already
/// applied, so two rapid page clicks cannot leave a stale page on screen.
#[derive(Debug, Clone)]
pub struct Pager {
    page: u32,
    size: u32,
    has_next: bool,
    has_previous: bool,
    latest: u64,
    applied: u64,
}

impl Pager {
    pub fn new(size: u32) -> Self {
        Self {
            page: 0,
            size,
            has_next: false,
            has_previous: false,
            latest: 0,
            applied: 0,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn has_next(&self) -> bool {
        self.has_next
    }

    pub fn has_previous(&self) -> bool {
        self.has_previous
    }

    /// Advance to the next page; the caller refetches afterwards
    pub fn next(&mut self) {
        self.page += 1;
    }

    /// Step back one page. Page 0 is the floor: stepping back from it is
    /// a no-op, never a negative page number.
    pub fn previous(&mut self) {
        self.page = self.page.saturating_sub(1);
    }

    /// Return to page 0, dropping stale paging flags. Must be called when
    /// the list's filter changes, before refetching, so the new filter is
    /// never asked for an out-of-range page.
    pub fn reset(&mut self) {
        self.page = 0;
        self.has_next = false;
        self.has_previous = false;
    }

    /// Take a sequence ticket for a fetch that is about to be issued
    pub fn begin(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    /// Apply a fetched page's metadata. Returns false (and changes
    /// nothing) when a newer response has already been applied; the
    /// caller must then discard the page body as well.
    pub fn apply<T>(&mut self, ticket: u64, page: &Page<T>) -> bool {
        if ticket < self.applied {
            return false;
        }
        self.applied = ticket;
        self.has_next = page.next;
        self.has_previous = page.previous;
        true
    }
}
