use core::fmt;

use serde::{Serialize, Serializer};

/// Stable identity of a data source, used in priority lists, provenance tags,
/// and aggregate failure reports.
///
/// Keys are backed by the connector's static name so they are cheap to copy
/// and compare; construct them via [`SourceKey::new`] or a connector's `key()`
/// helper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceKey(&'static str);

impl SourceKey {
    /// Wrap a static connector name.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// The underlying name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for SourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl std::error::Error for SourceKey {}

impl Serialize for SourceKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0)
    }
}
