use serde::{Deserialize, Serialize};

/// Page envelope returned by the paginated list endpoints (`orders`, `inventory/movements`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PagedResponse<T> {
    pub items: Vec<T>,
    pub total: usize,
    #[serde(default)]
    pub page: usize,
    #[serde(default)]
    pub page_size: usize,
}

impl<T> PagedResponse<T> {
    pub fn total_pages(&self) -> usize {
        if self.page_size == 0 {
            return if self.total > 0 { 1 } else { 0 };
        }
        self.total.div_ceil(self.page_size)
    }
}

impl<T> Default for PagedResponse<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page: 0,
            page_size: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        let page: PagedResponse<u8> = PagedResponse {
            items: vec![],
            total: 101,
            page: 0,
            page_size: 50,
        };
        assert_eq!(page.total_pages(), 3);

        let empty: PagedResponse<u8> = PagedResponse::default();
        assert_eq!(empty.total_pages(), 0);
    }

    #[test]
    fn test_deserialize_without_paging_fields() {
        let page: PagedResponse<String> =
            serde_json::from_str(r#"{"items":["a","b"],"total":2}"#).unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_pages(), 1);
    }
}
