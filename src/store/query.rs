//! Query engine for collection listings.
//!
//! A [`ListQuery`] is built from the list endpoint's query parameters and
//! applied to a collection in a fixed order: field filters, pagination,
//! sort, then global search. Pagination runs before sorting, so a page is
//! cut from the filtered but unsorted sequence and then sorted.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::HashMap;

use serde_json::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Ascending (default).
    #[default]
    Asc,
    /// Descending.
    Desc,
}

impl SortOrder {
    /// Parse an `_order` value. Anything other than `desc` is ascending.
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("desc") {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }
}

/// Sort specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    /// Field to sort by.
    pub field: String,
    /// Direction.
    pub order: SortOrder,
}

/// Substring filter on a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFilter {
    /// Field name.
    pub field: String,
    /// Substring the field's text must contain.
    pub needle: String,
}

impl FieldFilter {
    /// Check whether an item passes this filter. Missing fields never match.
    pub fn matches(&self, item: &Value) -> bool {
        item.get(&self.field)
            .map(|v| text_of(v).contains(self.needle.as_str()))
            .unwrap_or(false)
    }
}

/// A 1-based page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// Page number, starting at 1.
    pub page: i64,
    /// Page size.
    pub limit: i64,
}

impl PageWindow {
    /// Parse `_page` and `_limit` by their leading integer, so `"2.5"` and
    /// `"2px"` both read as 2. Values without leading digits count as 0.
    pub fn parse(page: &str, limit: &str) -> Self {
        Self {
            page: leading_integer(page),
            limit: leading_integer(limit),
        }
    }

    /// Slice bounds `[start, end)` for a sequence of `len` items.
    ///
    /// Windows with a page or limit below 1 are empty.
    pub fn bounds(&self, len: usize) -> (usize, usize) {
        if self.page < 1 || self.limit < 1 {
            return (0, 0);
        }

        let start = (self.page - 1).saturating_mul(self.limit);
        let end = start.saturating_add(self.limit);

        let clamp = |n: i64| usize::try_from(n).unwrap_or(usize::MAX).min(len);
        (clamp(start), clamp(end))
    }
}

/// Optionally signed run of digits at the start of `s`, saturating on overflow.
fn leading_integer(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, rest) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };

    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..end];
    if digits.is_empty() {
        return 0;
    }

    match digits.parse::<i64>() {
        Ok(n) if negative => -n,
        Ok(n) => n,
        Err(_) if negative => i64::MIN,
        Err(_) => i64::MAX,
    }
}

/// Parsed list query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Field filters, applied in order.
    pub filters: Vec<FieldFilter>,
    /// Page window, present only when both `_page` and `_limit` are given.
    pub page: Option<PageWindow>,
    /// Sort specification.
    pub sort: Option<SortSpec>,
    /// Global search text.
    pub search: Option<String>,
}

impl ListQuery {
    /// Build a query from raw query parameters.
    ///
    /// Only names in `filter_fields` become field filters. Empty values
    /// are treated as absent.
    pub fn from_params(params: &HashMap<String, String>, filter_fields: &[String]) -> Self {
        let get = |key: &str| {
            params
                .get(key)
                .map(String::as_str)
                .filter(|v| !v.is_empty())
        };

        let filters = filter_fields
            .iter()
            .filter_map(|field| {
                get(field.as_str()).map(|needle| FieldFilter {
                    field: field.clone(),
                    needle: needle.to_string(),
                })
            })
            .collect();

        let page = match (get("_page"), get("_limit")) {
            (Some(page), Some(limit)) => Some(PageWindow::parse(page, limit)),
            _ => None,
        };

        let sort = get("_sort").map(|field| SortSpec {
            field: field.to_string(),
            order: get("_order").map(SortOrder::parse).unwrap_or_default(),
        });

        Self {
            filters,
            page,
            sort,
            search: get("q").map(str::to_string),
        }
    }

    /// Whether this query leaves a collection untouched.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty() && self.page.is_none() && self.sort.is_none() && self.search.is_none()
    }

    /// Apply the query to a collection's items.
    pub fn apply(&self, mut items: Vec<Value>) -> Vec<Value> {
        for filter in &self.filters {
            items.retain(|item| filter.matches(item));
        }

        if let Some(window) = &self.page {
            let (start, end) = window.bounds(items.len());
            items.truncate(end);
            items.drain(..start);
        }

        if let Some(sort) = &self.sort {
            sort_items(&mut items, sort);
        }

        if let Some(needle) = &self.search {
            items.retain(|item| contains_text(item, needle));
        }

        items
    }
}

/// Stable sort of items by one field.
pub fn sort_items(items: &mut [Value], spec: &SortSpec) {
    items.sort_by(|a, b| {
        let ordering = compare_values(a.get(&spec.field), b.get(&spec.field));
        match spec.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

/// Compare two optional field values.
///
/// Missing values sort first. Values of different types order as
/// null < bool < number < string < array < object; arrays and objects of
/// the same type compare equal.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let (a, b) = match (a, b) {
        (None, None) => return Ordering::Equal,
        (None, Some(_)) => return Ordering::Less,
        (Some(_), None) => return Ordering::Greater,
        (Some(a), Some(b)) => (a, b),
    };

    let rank = |v: &Value| -> u8 {
        match v {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    };

    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

/// Textual representation of a field value.
///
/// Strings are used as-is, scalars through their JSON form, and arrays or
/// objects as compact JSON.
pub fn text_of(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        other => Cow::Owned(other.to_string()),
    }
}

/// Whether any leaf value under `value` contains `needle`.
///
/// Arrays and objects are searched recursively; object keys are not.
pub fn contains_text(value: &Value, needle: &str) -> bool {
    match value {
        Value::Array(items) => items.iter().any(|v| contains_text(v, needle)),
        Value::Object(fields) => fields.values().any(|v| contains_text(v, needle)),
        leaf => text_of(leaf).contains(needle),
    }
}
