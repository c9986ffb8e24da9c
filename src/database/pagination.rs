use std::cmp::Ordering;
use std::str::FromStr;

use thiserror::Error;

use crate::database::models::Note;

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 2000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PageRequestError {
    #[error("unknown sort property '{0}'")]
    UnknownSortField(String),

    #[error("sort parameter is empty")]
    EmptySort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Title,
    Content,
    Owner,
}

impl SortField {
    /// Column name in the `notes` table.
    pub fn column(self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Title => "title",
            SortField::Content => "content",
            SortField::Owner => "owner",
        }
    }

    /// Byte-wise, so `"B"` sorts before `"a"`.
    fn compare(self, a: &Note, b: &Note) -> Ordering {
        match self {
            SortField::Id => a.id.cmp(&b.id),
            SortField::Title => a.title.cmp(&b.title),
            SortField::Content => a.content.cmp(&b.content),
            SortField::Owner => a.owner.cmp(&b.owner),
        }
    }
}

impl FromStr for SortField {
    type Err = PageRequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "id" => Ok(SortField::Id),
            "title" => Ok(SortField::Title),
            "content" => Ok(SortField::Content),
            "owner" => Ok(SortField::Owner),
            other => Err(PageRequestError::UnknownSortField(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortOrder {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }
}

/// Page index, page size and ordering for a list query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub sort: Vec<SortOrder>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: vec![SortOrder::new(SortField::Id, SortDirection::Desc)],
        }
    }
}

impl PageRequest {
    pub fn new(page: u32, size: u32, sort: Vec<SortOrder>) -> Self {
        let size = match size {
            0 => DEFAULT_PAGE_SIZE,
            s => s.min(MAX_PAGE_SIZE),
        };
        let sort = if sort.is_empty() {
            PageRequest::default().sort
        } else {
            sort
        };
        Self { page, size, sort }
    }

    /// Parse `page`, `size` and repeated `sort` parameters from a raw query
    /// string, e.g. `page=0&size=1&sort=id,desc&sort=title`.
    ///
    /// Bad `page`/`size` values fall back to defaults; bad `sort` values are rejected.
    pub fn from_query(raw: Option<&str>) -> Result<Self, PageRequestError> {
        let mut page = 0;
        let mut size = DEFAULT_PAGE_SIZE;
        let mut sort = Vec::new();

        for (key, value) in url::form_urlencoded::parse(raw.unwrap_or("").as_bytes()) {
            match key.as_ref() {
                "page" => page = value.trim().parse::<u32>().unwrap_or(0),
                "size" => size = value.trim().parse::<u32>().unwrap_or(DEFAULT_PAGE_SIZE),
                "sort" => sort.extend(parse_sort(&value)?),
                _ => {}
            }
        }

        Ok(Self::new(page, size, sort))
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }

    /// Sort orders plus an `id ASC` tiebreaker when `id` is not already ordered on.
    pub fn effective_sort(&self) -> Vec<SortOrder> {
        let mut orders = self.sort.clone();
        if !orders.iter().any(|o| o.field == SortField::Id) {
            orders.push(SortOrder::new(SortField::Id, SortDirection::Asc));
        }
        orders
    }

    pub fn compare(&self, a: &Note, b: &Note) -> Ordering {
        self.effective_sort()
            .iter()
            .map(|order| {
                let ord = order.field.compare(a, b);
                match order.direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            })
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }
}

/// `"title,content,desc"` -> `[title DESC, content DESC]`
fn parse_sort(value: &str) -> Result<Vec<SortOrder>, PageRequestError> {
    let mut tokens: Vec<&str> = value
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();

    let direction = match tokens.last().and_then(|t| SortDirection::parse(t)) {
        Some(direction) => {
            tokens.pop();
            direction
        }
        None => SortDirection::Asc,
    };

    if tokens.is_empty() {
        return Err(PageRequestError::EmptySort);
    }

    tokens
        .into_iter()
        .map(|t| t.parse().map(|field| SortOrder::new(field, direction)))
        .collect()
}
