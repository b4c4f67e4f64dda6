//! Pagination envelope shared by every list endpoint.
//!
//! Lists always answer 200 with `{success, data, pagination}`, zero
//! results included.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;

/// `?page=&limit=` query parameters.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PageParams {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(DEFAULT_PAGE).max(1)
    }

    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_LIMIT).max(1)
    }
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct Paging {
    pub page: u32,
    pub limit: u32,
    pub total: usize,
    pub pages: usize,
}

/// List response body.
#[derive(Debug, Serialize)]
pub struct ListEnvelope<T> {
    pub success: bool,
    pub data: Vec<T>,
    pub pagination: Paging,
}

/// Single-item / message response body.
#[derive(Debug, Serialize)]
pub struct DataEnvelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: T,
}

impl<T> DataEnvelope<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data,
        }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data,
        }
    }
}

/// Slice a filtered result set into one page, cloning just that page.
pub fn paginate<T: Clone>(items: Vec<&T>, params: PageParams) -> ListEnvelope<T> {
    let page = params.page();
    let limit = params.limit();
    let total = items.len();
    let pages = total.div_ceil(limit as usize);
    let start = ((page - 1) * limit) as usize;
    let data: Vec<T> = items
        .into_iter()
        .skip(start)
        .take(limit as usize)
        .cloned()
        .collect();
    ListEnvelope {
        success: true,
        data,
        pagination: Paging {
            page,
            limit,
            total,
            pages,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<u32> {
        (1..=23).collect()
    }

    #[test]
    fn test_first_page_defaults() {
        let source = items();
        let envelope = paginate(source.iter().collect(), PageParams::default());
        assert_eq!(envelope.data.len(), 10);
        assert_eq!(envelope.data[0], 1);
        assert_eq!(
            envelope.pagination,
            Paging {
                page: 1,
                limit: 10,
                total: 23,
                pages: 3
            }
        );
    }

    #[test]
    fn test_last_page_is_short() {
        let source = items();
        let envelope = paginate(
            source.iter().collect(),
            PageParams {
                page: Some(3),
                limit: Some(10),
            },
        );
        assert_eq!(envelope.data, vec![21, 22, 23]);
    }

    #[test]
    fn test_page_past_the_end_is_empty_but_successful() {
        let source = items();
        let envelope = paginate(
            source.iter().collect(),
            PageParams {
                page: Some(9),
                limit: Some(10),
            },
        );
        assert!(envelope.success);
        assert!(envelope.data.is_empty());
        assert_eq!(envelope.pagination.total, 23);
    }

    #[test]
    fn test_zero_page_and_limit_are_clamped() {
        let params = PageParams {
            page: Some(0),
            limit: Some(0),
        };
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), 1);
    }
}
