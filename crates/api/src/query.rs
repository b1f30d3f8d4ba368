//! Query parameter types shared by several handler modules.

use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`), clamped by the handler
/// with `clamp_limit` / `clamp_offset`.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
