pub mod error_code;
pub mod pagination;
pub mod response;

pub use error_code::ErrorCode;
pub use pagination::{PaginatedResponse, PaginationInfo, page_window};
pub use response::ApiResponse;
