//! Demand matching: decides which registered profiles a newly published
//! listing should be announced to.

mod policy;
mod rules;

pub use policy::MatchPolicy;

use serde::{Deserialize, Serialize};

use super::demand::{DemandProfile, DemandProfileId};
use super::listing::Listing;

/// Individual compatibility rule, reported when a profile is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchCheck {
    Operation,
    Budget,
    Rooms,
    Location,
    Bathrooms,
    Area,
}

/// Outcome of checking one profile against one listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchVerdict {
    pub demand_profile_id: DemandProfileId,
    pub failed: Vec<MatchCheck>,
}

impl MatchVerdict {
    pub fn is_match(&self) -> bool {
        self.failed.is_empty()
    }
}

pub fn evaluate_profile(
    listing: &Listing,
    profile: &DemandProfile,
    policy: &MatchPolicy,
) -> MatchVerdict {
    MatchVerdict {
        demand_profile_id: profile.id.clone(),
        failed: rules::failed_checks(listing, profile, policy),
    }
}

/// Returns the profiles compatible with `listing`, in input order.
pub fn match_demand<'a>(
    listing: &Listing,
    profiles: &'a [DemandProfile],
    policy: &MatchPolicy,
) -> Vec<&'a DemandProfile> {
    profiles
        .iter()
        .filter(|profile| rules::failed_checks(listing, profile, policy).is_empty())
        .collect()
}
