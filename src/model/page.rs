//! Server-side pagination envelope

use serde::{Deserialize, Serialize};

/// One page of a list plus paging metadata.
///
/// `next`/`previous` are computed by the server and must not be inferred
/// from `content.len()` on the client; `total_element` is the size of the
/// whole collection, not of this page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub next: bool,
    pub previous: bool,
    pub total_element: i64,
}
