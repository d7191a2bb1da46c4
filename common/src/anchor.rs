use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque reference returned by the ledger-anchor simulator.
///
/// Stored verbatim; the core never interprets it beyond non-emptiness.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnchorRef(pub String);

impl AnchorRef {
    pub fn is_well_formed(&self) -> bool {
        !self.0.is_empty()
    }
}

impl fmt::Display for AnchorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
