//! Response headers carrying pagination metadata.

use axum::http::HeaderName;

/// Item count of the whole result set, before paging
pub const TOTAL_COUNT: HeaderName = HeaderName::from_static("x-total-count");

/// Page number the server actually served, after clamping
pub const PAGE_NUMBER: HeaderName = HeaderName::from_static("x-page-number");

/// Page size the server actually served, after clamping
pub const PAGE_SIZE: HeaderName = HeaderName::from_static("x-page-size");
