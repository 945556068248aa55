use serde::{Deserialize, Serialize};

/// Optional checks layered on top of the mandatory operation, budget, room
/// and location rules. Both are off unless configured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchPolicy {
    pub check_bathrooms: bool,
    pub check_area: bool,
}

impl MatchPolicy {
    pub const fn strict() -> Self {
        Self {
            check_bathrooms: true,
            check_area: true,
        }
    }
}
