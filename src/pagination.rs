use serde::Serialize;

use crate::error::{AppError, AppResult};

pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// A validated 1-based page request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    page_size: u64,
}

impl PageRequest {
    pub fn new(page: u64, page_size: u64) -> AppResult<Self> {
        if page < 1 {
            return Err(AppError::invalid("page must be at least 1"));
        }
        if page_size < 1 {
            return Err(AppError::invalid("page_size must be at least 1"));
        }
        Ok(Self { page, page_size })
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.page_size).min(i64::MAX as u64)
    }

    pub fn limit(&self) -> u64 {
        self.page_size.min(i64::MAX as u64)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1, page_size: DEFAULT_PAGE_SIZE }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub page_size: u64,
    pub total_items: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total_items: u64) -> Self {
        Self { items, page: request.page, page_size: request.page_size, total_items }
    }

    pub fn total_pages(&self) -> u64 {
        self.total_items.div_ceil(self.page_size)
    }

    pub fn pagination(&self) -> Pagination {
        let total_pages = self.total_pages();
        Pagination {
            current_page: self.page,
            next_page: (self.page < total_pages).then(|| self.page + 1),
            prev_page: (self.page > 1).then(|| self.page - 1),
            total_pages,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub current_page: u64,
    pub next_page: Option<u64>,
    pub prev_page: Option<u64>,
    pub total_pages: u64,
}

/// A page with its navigation fields inlined next to the items.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LinkedPage<T> {
    #[serde(flatten)]
    pub page: Page<T>,
    pub total_pages: u64,
    pub next_page: Option<u64>,
    pub prev_page: Option<u64>,
}

impl<T> From<Page<T>> for LinkedPage<T> {
    fn from(page: Page<T>) -> Self {
        let links = page.pagination();
        Self {
            page,
            total_pages: links.total_pages,
            next_page: links.next_page,
            prev_page: links.prev_page,
        }
    }
}
