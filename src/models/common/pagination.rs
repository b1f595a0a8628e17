use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginationInfo {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginatedResponse<T: TS> {
    pub items: Vec<T>,
    pub pagination: PaginationInfo,
}

/// Normalise `page` (à partir de 1) et `size` (1..=100) d'une requête
pub fn page_window(page: Option<i64>, size: Option<i64>) -> (u64, u64) {
    let page = page.unwrap_or(1).max(1) as u64;
    let size = size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE) as u64;
    (page, size)
}

impl PaginationInfo {
    pub fn new(page: u64, size: u64, total: u64, total_pages: u64) -> Self {
        Self {
            page: page as i64,
            page_size: size as i64,
            total: total as i64,
            total_pages: total_pages as i64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_window_bounds() {
        assert_eq!(page_window(None, None), (1, DEFAULT_PAGE_SIZE as u64));
        assert_eq!(page_window(Some(0), Some(1000)), (1, 100));
        assert_eq!(page_window(Some(3), Some(0)), (3, 1));
    }
}
