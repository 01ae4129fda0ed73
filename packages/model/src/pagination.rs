//! # Paginated collections and their envelopes
//!
//! List endpoints return a Laravel-style paginator object
//! (`{ data: [...], current_page, last_page, per_page, total }`), but not at a
//! consistent depth: some endpoints return it flat, some wrap it once in
//! `data`, some twice. [`Page::from_value`] looks for the paginator at each
//! depth in turn and fails closed with [`EnvelopeError`] when none is found,
//! instead of guessing at field presence.
//!
//! Query parameter naming is inconsistent too, so [`PageRequest::query`]
//! takes the [`PerPageParam`] spelling the endpoint expects.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How deep the paginator may be nested under `data` keys.
const MAX_ENVELOPE_DEPTH: usize = 3;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EnvelopeError {
    #[error("response does not contain a paginated list")]
    Missing,
    #[error("paginated rows could not be read: {0}")]
    Rows(String),
}

/// One page of a server-owned collection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub current_page: u32,
    pub last_page: u32,
    pub per_page: u32,
    pub total: Option<u64>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            current_page: 1,
            last_page: 1,
            per_page: 0,
            total: None,
        }
    }
}

impl<T: DeserializeOwned> Page<T> {
    /// Find and parse the paginator anywhere from zero to
    /// [`MAX_ENVELOPE_DEPTH`] `data` levels deep.
    pub fn from_value(value: &Value) -> Result<Self, EnvelopeError> {
        let mut node = value;
        for _ in 0..=MAX_ENVELOPE_DEPTH {
            if let Some(page) = Self::paginator_at(node)? {
                return Ok(page);
            }
            match node.get("data") {
                Some(inner) if inner.is_object() => node = inner,
                _ => break,
            }
        }
        Err(EnvelopeError::Missing)
    }

    fn paginator_at(node: &Value) -> Result<Option<Self>, EnvelopeError> {
        let Some(object) = node.as_object() else {
            return Ok(None);
        };
        let (Some(rows), Some(current_page)) = (
            object.get("data").filter(|d| d.is_array()),
            object.get("current_page").and_then(as_u32),
        ) else {
            return Ok(None);
        };
        let data: Vec<T> = serde_json::from_value(rows.clone())
            .map_err(|e| EnvelopeError::Rows(e.to_string()))?;
        let last_page = object
            .get("last_page")
            .and_then(as_u32)
            .unwrap_or(current_page)
            .max(1);
        let per_page = object
            .get("per_page")
            .and_then(as_u32)
            .unwrap_or(data.len() as u32);
        let total = object.get("total").and_then(|t| match t {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        });
        Ok(Some(Page {
            data,
            current_page: current_page.max(1),
            last_page,
            per_page,
            total,
        }))
    }
}

// Some endpoints send page numbers as strings.
fn as_u32(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.last_page
    }

    /// Page numbers to show in the pager: a window of `radius` pages around
    /// the current one, always including the first and last page. `None`
    /// marks a gap.
    pub fn page_links(&self, radius: u32) -> Vec<Option<u32>> {
        let last = self.last_page.max(1);
        let current = self.current_page.clamp(1, last);
        let start = current.saturating_sub(radius).max(1);
        let end = current.saturating_add(radius).min(last);

        let mut links = Vec::new();
        if start > 1 {
            links.push(Some(1));
            if start > 2 {
                links.push(None);
            }
        }
        links.extend((start..=end).map(Some));
        if end < last {
            if end + 1 < last {
                links.push(None);
            }
            links.push(Some(last));
        }
        links
    }
}

/// Spelling of the page-size parameter an endpoint expects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PerPageParam {
    #[default]
    Snake,
    Camel,
}

impl PerPageParam {
    pub fn name(self) -> &'static str {
        match self {
            PerPageParam::Snake => "per_page",
            PerPageParam::Camel => "perPage",
        }
    }
}

/// Page the user asked for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    pub fn first(per_page: u32) -> Self {
        Self::new(1, per_page)
    }

    pub fn with_page(self, page: u32) -> Self {
        Self::new(page, self.per_page)
    }

    pub fn query(&self, param: PerPageParam) -> Vec<(String, String)> {
        vec![
            ("page".to_string(), self.page.to_string()),
            (param.name().to_string(), self.per_page.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Row {
        id: u32,
    }

    fn paginator() -> Value {
        json!({
            "data": [{"id": 1}, {"id": 2}],
            "current_page": 2,
            "last_page": 5,
            "per_page": 2,
            "total": 10
        })
    }

    #[test]
    fn flat_envelope() {
        let page: Page<Row> = Page::from_value(&paginator()).unwrap();
        assert_eq!(page.data, vec![Row { id: 1 }, Row { id: 2 }]);
        assert_eq!(page.current_page, 2);
        assert_eq!(page.last_page, 5);
        assert_eq!(page.total, Some(10));
    }

    #[test]
    fn nested_envelopes() {
        let once = json!({"success": true, "data": paginator()});
        let twice = json!({"success": true, "data": {"message": "ok", "data": paginator()}});
        for value in [once, twice] {
            let page: Page<Row> = Page::from_value(&value).unwrap();
            assert_eq!(page.data.len(), 2);
            assert_eq!(page.current_page, 2);
        }
    }

    #[test]
    fn plain_arrays_fail_closed() {
        let value = json!({"success": true, "data": [{"id": 1}]});
        assert_eq!(
            Page::<Row>::from_value(&value),
            Err(EnvelopeError::Missing)
        );
        assert_eq!(Page::<Row>::from_value(&json!(null)), Err(EnvelopeError::Missing));
    }

    #[test]
    fn malformed_rows_are_an_error() {
        let value = json!({"data": [{"id": "x"}], "current_page": 1});
        assert!(matches!(
            Page::<Row>::from_value(&value),
            Err(EnvelopeError::Rows(_))
        ));
    }

    #[test]
    fn string_page_numbers() {
        let value = json!({"data": [], "current_page": "3", "last_page": "4"});
        let page: Page<Row> = Page::from_value(&value).unwrap();
        assert_eq!((page.current_page, page.last_page), (3, 4));
        assert!(page.is_empty());
        assert!(page.has_prev() && page.has_next());
    }

    #[test]
    fn page_links_window() {
        let page = Page::<Row> {
            current_page: 6,
            last_page: 12,
            ..Default::default()
        };
        assert_eq!(
            page.page_links(1),
            vec![Some(1), None, Some(5), Some(6), Some(7), None, Some(12)]
        );

        let single = Page::<Row>::default();
        assert_eq!(single.page_links(2), vec![Some(1)]);
    }

    #[test]
    fn page_links_at_the_top_of_the_range() {
        let value = json!({
            "data": [],
            "current_page": u32::MAX,
            "last_page": u32::MAX,
            "per_page": 10
        });
        let page: Page<Row> = Page::from_value(&value).unwrap();
        assert_eq!(
            page.page_links(2),
            vec![Some(1), None, Some(u32::MAX - 2), Some(u32::MAX - 1), Some(u32::MAX)]
        );
    }

    #[test]
    fn page_links_clamp_a_current_page_past_the_end() {
        let page = Page::<Row> {
            current_page: 40,
            last_page: 3,
            ..Default::default()
        };
        assert_eq!(page.page_links(1), vec![Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn request_query_spelling() {
        let request = PageRequest::new(0, 25).with_page(3);
        assert_eq!(request.page, 3);
        assert_eq!(
            request.query(PerPageParam::Camel),
            vec![
                ("page".to_string(), "3".to_string()),
                ("perPage".to_string(), "25".to_string())
            ]
        );
    }
}
