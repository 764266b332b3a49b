//! Turns raw list query parameters into a store filter, sort order and page window.

use crate::error::{AppError, FieldError};
use crate::model::{Property, PropertyStatus};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use utoipa::IntoParams;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;

/// Query string of `GET /properties`. Everything arrives as text.
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Case-insensitive substring matched against title or description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Exact status: available, rented or maintenance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Inclusive lower price bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<String>,
    /// Inclusive upper price bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<String>,
    /// Case-insensitive substring matched against location city.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Sort keys, comma or space separated, `-` prefix for descending. Defaults to `-createdAt`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    /// 1-based page number. Defaults to 1.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    /// Page size. Defaults to 10. No upper bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
}

/// Case-insensitive literal substring matcher.
#[derive(Debug, Clone)]
pub struct TextMatch {
    term: String,
    regex: Regex,
}

impl TextMatch {
    pub fn new(term: &str) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(&regex::escape(term)).case_insensitive(true).build()?;
        Ok(TextMatch {
            term: term.to_string(),
            regex,
        })
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn is_match(&self, haystack: &str) -> bool {
        self.regex.is_match(haystack)
    }
}

/// Conjunction of the supplied predicates. An empty filter matches every record.
#[derive(Debug, Clone, Default)]
pub struct PropertyFilter {
    pub search: Option<TextMatch>,
    pub status: Option<PropertyStatus>,
    pub city: Option<TextMatch>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl PropertyFilter {
    pub fn matches(&self, p: &Property) -> bool {
        if let Some(search) = &self.search {
            if !search.is_match(&p.title) && !search.is_match(&p.description) {
                return false;
            }
        }
        if let Some(status) = self.status {
            if p.status != status {
                return false;
            }
        }
        if let Some(city) = &self.city {
            if !city.is_match(&p.location.city) {
                return false;
            }
        }
        if self.min_price.is_some_and(|min| p.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| p.price > max) {
            return false;
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CreatedAt,
    UpdatedAt,
    Price,
    Title,
    Status,
    City,
}

impl SortField {
    fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "createdAt" => SortField::CreatedAt,
            "updatedAt" => SortField::UpdatedAt,
            "price" => SortField::Price,
            "title" => SortField::Title,
            "status" => SortField::Status,
            "location.city" => SortField::City,
            _ => return None,
        })
    }

    fn compare(&self, a: &Property, b: &Property) -> Ordering {
        match self {
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            SortField::Price => a.price.total_cmp(&b.price),
            SortField::Title => a.title.cmp(&b.title),
            SortField::Status => a.status.as_str().cmp(b.status.as_str()),
            SortField::City => a.location.city.cmp(&b.location.city),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: SortField,
    pub descending: bool,
}

/// Ordered list of sort keys, applied left to right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort(pub Vec<SortKey>);

impl Default for Sort {
    /// Newest first.
    fn default() -> Self {
        Sort(vec![SortKey {
            field: SortField::CreatedAt,
            descending: true,
        }])
    }
}

impl Sort {
    pub fn parse(raw: &str) -> Result<Self, FieldError> {
        let mut keys = Vec::new();
        for token in raw.split(|c: char| c == ',' || c.is_whitespace()).filter(|t| !t.is_empty()) {
            let (descending, name) = match token.strip_prefix('-') {
                Some(rest) => (true, rest),
                None => (false, token.strip_prefix('+').unwrap_or(token)),
            };
            let field = SortField::parse(name)
                .ok_or_else(|| FieldError::new("sort", format!("Unsupported sort key '{}'", name)))?;
            keys.push(SortKey { field, descending });
        }
        if keys.is_empty() {
            return Ok(Sort::default());
        }
        Ok(Sort(keys))
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.0
    }

    pub fn compare(&self, a: &Property, b: &Property) -> Ordering {
        for key in &self.0 {
            let ord = key.field.compare(a, b);
            let ord = if key.descending { ord.reverse() } else { ord };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u32,
    pub limit: u32,
}

impl Default for PageWindow {
    fn default() -> Self {
        PageWindow {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageWindow {
    /// Non-numeric or zero values fall back to the defaults.
    pub fn parse(page: Option<&str>, limit: Option<&str>) -> Self {
        PageWindow {
            page: positive_or(page, DEFAULT_PAGE),
            limit: positive_or(limit, DEFAULT_LIMIT),
        }
    }

    pub fn skip(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }

    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(u64::from(self.limit))
    }
}

fn positive_or(raw: Option<&str>, default: u32) -> u32 {
    raw.and_then(|s| s.trim().parse::<u32>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(default)
}

#[derive(Debug, Clone, Default)]
pub struct PropertyQuery {
    pub filter: PropertyFilter,
    pub sort: Sort,
    pub window: PageWindow,
}

fn non_empty(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn price_bound(field: &str, raw: Option<&str>, errs: &mut Vec<FieldError>) -> Option<f64> {
    let raw = raw?;
    match raw.parse::<f64>() {
        Ok(n) if n.is_finite() => Some(n),
        _ => {
            errs.push(FieldError::new(field, format!("Expected a number, received '{}'", raw)));
            None
        }
    }
}

fn text_match(field: &str, raw: Option<&str>, errs: &mut Vec<FieldError>) -> Option<TextMatch> {
    match TextMatch::new(raw?) {
        Ok(m) => Some(m),
        Err(e) => {
            errs.push(FieldError::new(field, e.to_string()));
            None
        }
    }
}

/// Build the filter, sort and page window for a list request.
pub fn build_property_query(params: &ListParams) -> Result<PropertyQuery, AppError> {
    let mut errs = Vec::new();

    let search = text_match("search", non_empty(&params.search), &mut errs);
    let city = text_match("city", non_empty(&params.city), &mut errs);
    let status = match non_empty(&params.status) {
        Some(s) => match s.parse::<PropertyStatus>() {
            Ok(st) => Some(st),
            Err(e) => {
                errs.push(FieldError::new("status", e.to_string()));
                None
            }
        },
        None => None,
    };
    let min_price = price_bound("minPrice", non_empty(&params.min_price), &mut errs);
    let max_price = price_bound("maxPrice", non_empty(&params.max_price), &mut errs);
    let sort = match non_empty(&params.sort) {
        Some(raw) => Sort::parse(raw).unwrap_or_else(|e| {
            errs.push(e);
            Sort::default()
        }),
        None => Sort::default(),
    };
    let window = PageWindow::parse(params.page.as_deref(), params.limit.as_deref());

    if !errs.is_empty() {
        return Err(AppError::Validation(errs));
    }
    Ok(PropertyQuery {
        filter: PropertyFilter {
            search,
            status,
            city,
            min_price,
            max_price,
        },
        sort,
        window,
    })
}
