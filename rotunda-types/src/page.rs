use serde::{Deserialize, Serialize};

use crate::record::{ContractSnapshot, TradeRecord};

/// Continuation marker for a paginated upstream.
///
/// Offset-style upstreams advance a page number; cursor-style upstreams hand
/// back an opaque token. Connectors translate between the two so callers never
/// see the mechanics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PageToken {
    /// Zero-based page index for offset/limit upstreams.
    Offset(u32),
    /// Opaque continuation token handed back by the upstream.
    Cursor(String),
}

/// One page worth of upstream work: where to resume and how much to ask for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Continuation marker from the previous page; `None` requests the first.
    pub token: Option<PageToken>,
    /// Requested page size. Connectors clamp to their upstream maximum.
    pub limit: usize,
}

impl PageRequest {
    /// Request for the first page.
    #[must_use]
    pub const fn first(limit: usize) -> Self {
        Self { token: None, limit }
    }

    /// Request resuming at `token`.
    #[must_use]
    pub const fn resume(token: PageToken, limit: usize) -> Self {
        Self {
            token: Some(token),
            limit,
        }
    }
}

/// One page of normalized trade records.
#[derive(Debug, Clone, Default)]
pub struct TradePage {
    /// Records in upstream order.
    pub records: Vec<TradeRecord>,
    /// Marker for the next page; `None` means end-of-data.
    pub next: Option<PageToken>,
}

/// One page of contract snapshots.
#[derive(Debug, Clone, Default)]
pub struct ChainPage {
    /// Snapshots in upstream order.
    pub records: Vec<ContractSnapshot>,
    /// Marker for the next page; `None` means end-of-data.
    pub next: Option<PageToken>,
}
