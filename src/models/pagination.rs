//! Page requests and paged results

use std::{fmt, str::FromStr};

use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::AppError;

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Book properties a page can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookSortKey {
    Isbn,
    Title,
}

impl BookSortKey {
    pub fn column(self) -> &'static str {
        match self {
            BookSortKey::Isbn => "b.isbn",
            BookSortKey::Title => "b.title",
        }
    }
}

impl FromStr for BookSortKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "isbn" => Ok(BookSortKey::Isbn),
            "title" => Ok(BookSortKey::Title),
            other => Err(AppError::BadRequest(format!("Cannot sort books by '{}'", other))),
        }
    }
}

/// Ordering parsed from `property[,asc|desc]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub property: BookSortKey,
    pub direction: SortDirection,
}

impl FromStr for Sort {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(2, ',');
        let property: BookSortKey = parts.next().unwrap_or_default().parse()?;
        let direction = match parts.next().map(|d| d.trim().to_ascii_lowercase()) {
            None => SortDirection::Asc,
            Some(d) if d == "asc" => SortDirection::Asc,
            Some(d) if d == "desc" => SortDirection::Desc,
            Some(d) => {
                return Err(AppError::BadRequest(format!("Unknown sort direction '{}'", d)));
            }
        };
        Ok(Self { property, direction })
    }
}

/// Pagination query parameters as they arrive on the wire
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Zero-based page index (default: 0)
    pub page: Option<u32>,
    /// Page size (default: 20, max: 2000)
    pub size: Option<u32>,
    /// Sort order, e.g. `title,desc`
    pub sort: Option<String>,
}

impl PageQuery {
    /// True when the caller asked for a window rather than the full list
    pub fn is_paged(&self) -> bool {
        self.page.is_some() || self.size.is_some() || self.sort.is_some()
    }
}

/// Window into an ordered collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub sort: Option<Sort>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: None,
        }
    }
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size: size.clamp(1, MAX_PAGE_SIZE),
            sort: None,
        }
    }

    pub fn sorted(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }
}

impl TryFrom<&PageQuery> for PageRequest {
    type Error = AppError;

    fn try_from(query: &PageQuery) -> Result<Self, Self::Error> {
        let mut request = PageRequest::new(
            query.page.unwrap_or(0),
            query.size.unwrap_or(DEFAULT_PAGE_SIZE),
        );
        if let Some(ref sort) = query.sort {
            request = request.sorted(sort.parse()?);
        }
        Ok(request)
    }
}

/// One page of results plus the totals needed to navigate the rest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u32,
    pub page: u32,
    pub size: u32,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        let size = u64::from(request.size.max(1));
        let total_pages = total_elements.div_ceil(size);
        Self {
            content,
            total_elements,
            total_pages: u32::try_from(total_pages).unwrap_or(u32::MAX),
            page: request.page,
            size: request.size,
        }
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            page: self.page,
            size: self.size,
        }
    }
}

impl fmt::Display for PageRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page {} (size {})", self.page, self.size)
    }
}
